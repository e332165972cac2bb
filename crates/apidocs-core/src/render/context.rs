//! Serializable view of a document, shaped for the page template.
//!
//! Everything a template needs is precomputed here: anchors, outlines and
//! examples as pretty JSON text, and code snippets. Templates only iterate.

use serde::Serialize;
use serde_json::Value as JsonValue;

use super::Theme;
use crate::config::Config;
use crate::endpoints::{Endpoint, TagGroup, Webhook};
use crate::openapi::{media_schema, ApiDocument};
use crate::snippets::{Snippet, SnippetGenerator, SnippetLanguage, SnippetRequest};
use crate::utils::{operation_anchor, path_params, scalar_text, slugify, UniqueAnchors};

/// Knobs for building a [`PageContext`]
#[derive(Debug, Clone, PartialEq)]
pub struct PageOptions {
    /// Overrides the document title
    pub title: Option<String>,
    pub theme: Theme,
    /// Overrides the document's server URL in snippets
    pub base_url: Option<String>,
    pub snippet_languages: Vec<SnippetLanguage>,
}

impl Default for PageOptions {
    fn default() -> Self {
        Self {
            title: None,
            theme: Theme::default(),
            base_url: None,
            snippet_languages: SnippetLanguage::all().collect(),
        }
    }
}

impl From<&Config> for PageOptions {
    fn from(config: &Config) -> Self {
        Self {
            title: config.title.clone(),
            theme: config.theme,
            base_url: config
                .base_url
                .as_ref()
                .map(|url| url.as_str().trim_end_matches('/').to_string()),
            snippet_languages: config.snippet_languages.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PageContext {
    pub title: String,
    pub version: Option<String>,
    pub description: Option<String>,
    pub base_url: String,
    pub theme: Theme,
    pub tag_groups: Vec<TagGroupView>,
    pub webhooks: Vec<WebhookView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TagGroupView {
    pub name: String,
    pub anchor: String,
    pub description: String,
    pub endpoints: Vec<EndpointView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EndpointView {
    pub anchor: String,
    pub method: String,
    pub path: String,
    pub operation_id: Option<String>,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub deprecated: bool,
    pub parameters: Vec<ParameterView>,
    pub request_body: Option<BodyView>,
    pub responses: Vec<ResponseView>,
    pub snippets: Vec<Snippet>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParameterView {
    pub name: String,
    /// `path`, `query`, `header` or `cookie`
    pub location: String,
    pub required: bool,
    pub description: Option<String>,
    /// Compact outline of the parameter schema
    pub schema: Option<JsonValue>,
    pub example: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BodyView {
    pub content_type: String,
    /// Pretty-printed outline
    pub outline: Option<String>,
    /// Pretty-printed example
    pub example: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResponseView {
    pub status: String,
    pub description: Option<String>,
    pub body: Option<BodyView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct WebhookView {
    pub anchor: String,
    pub name: String,
    pub method: String,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub request_body: Option<BodyView>,
}

impl PageContext {
    /// Build the page view of `document`
    pub fn build(document: &ApiDocument, options: &PageOptions) -> crate::Result<Self> {
        let generator = SnippetGenerator::new()?;
        let base_url = options
            .base_url
            .clone()
            .or_else(|| document.base_url())
            .unwrap_or_default();

        let mut tag_groups = document
            .endpoints_by_tags()
            .iter()
            .map(|group| TagGroupView::build(document, group, &base_url, &generator, options))
            .collect::<crate::Result<Vec<_>>>()?;

        let mut webhooks: Vec<WebhookView> = document
            .webhooks()
            .iter()
            .map(|hook| WebhookView::build(document, hook))
            .collect();

        let mut anchors = UniqueAnchors::default();
        for group in &mut tag_groups {
            group.anchor = anchors.claim(&group.anchor);
            for endpoint in &mut group.endpoints {
                endpoint.anchor = anchors.claim(&endpoint.anchor);
            }
        }
        for hook in &mut webhooks {
            hook.anchor = anchors.claim(&hook.anchor);
        }

        Ok(Self {
            title: options
                .title
                .clone()
                .or_else(|| document.title().map(String::from))
                .unwrap_or_else(|| "API Reference".to_string()),
            version: document.version().map(String::from),
            description: document.description().map(String::from),
            base_url,
            theme: options.theme,
            tag_groups,
            webhooks,
        })
    }

    /// Number of endpoint entries across groups, counting fan-out copies
    pub fn endpoint_count(&self) -> usize {
        self.tag_groups.iter().map(|g| g.endpoints.len()).sum()
    }
}

impl TagGroupView {
    fn build(
        document: &ApiDocument,
        group: &TagGroup,
        base_url: &str,
        generator: &SnippetGenerator,
        options: &PageOptions,
    ) -> crate::Result<Self> {
        let anchor = format!("tag-{}", slugify(&group.name));
        let endpoints = group
            .endpoints
            .iter()
            .map(|endpoint| -> crate::Result<EndpointView> {
                let request = SnippetRequest::for_endpoint(document, endpoint, base_url);
                let snippets = generator.render_all(&options.snippet_languages, &request)?;
                Ok(EndpointView::build(document, endpoint, &anchor, snippets))
            })
            .collect::<crate::Result<Vec<_>>>()?;

        Ok(Self {
            name: group.name.clone(),
            anchor,
            description: group.description.clone(),
            endpoints,
        })
    }
}

impl EndpointView {
    /// `group_anchor` keeps anchors unique when one endpoint is listed under several tags.
    fn build(
        document: &ApiDocument,
        endpoint: &Endpoint,
        group_anchor: &str,
        snippets: Vec<Snippet>,
    ) -> Self {
        let mut parameters: Vec<ParameterView> = document
            .parameters(endpoint)
            .iter()
            .filter_map(|parameter| ParameterView::build(document, parameter))
            .collect();
        for name in path_params(&endpoint.path) {
            let documented = parameters
                .iter()
                .any(|p| p.location == "path" && p.name == name);
            if !documented {
                parameters.push(ParameterView::undocumented_path(name));
            }
        }

        let request_body = document
            .request_body_schema(endpoint)
            .map(|(content_type, schema)| BodyView::build(document, content_type, &schema));

        let responses = document
            .responses(endpoint)
            .into_iter()
            .map(|(status, response)| ResponseView {
                status,
                description: text(&response, "description"),
                body: media_schema(&response)
                    .map(|(content_type, schema)| BodyView::build(document, content_type, &schema)),
            })
            .collect();

        Self {
            anchor: format!(
                "{}-{}",
                group_anchor,
                operation_anchor(endpoint.method.as_str(), &endpoint.path)
            ),
            method: endpoint.method.as_str().to_uppercase(),
            path: endpoint.path.clone(),
            operation_id: endpoint.operation_id().map(String::from),
            summary: endpoint.summary().map(String::from),
            description: endpoint.description().map(String::from),
            deprecated: endpoint.is_deprecated(),
            parameters,
            request_body,
            responses,
            snippets,
        }
    }
}

impl ParameterView {
    fn build(document: &ApiDocument, parameter: &JsonValue) -> Option<Self> {
        let name = parameter.get("name")?.as_str()?.to_string();
        let location = parameter
            .get("in")
            .and_then(JsonValue::as_str)
            .unwrap_or("query")
            .to_string();
        Some(Self {
            required: parameter
                .get("required")
                .and_then(JsonValue::as_bool)
                .unwrap_or(location == "path"),
            name,
            location,
            description: text(parameter, "description"),
            schema: parameter
                .get("schema")
                .and_then(|schema| document.outline(schema)),
            example: document
                .parameter_example(parameter)
                .map(|example| scalar_text(&example)),
        })
    }

    fn undocumented_path(name: &str) -> Self {
        Self {
            name: name.to_string(),
            location: "path".to_string(),
            required: true,
            description: None,
            schema: None,
            example: None,
        }
    }
}

impl BodyView {
    fn build(document: &ApiDocument, content_type: String, schema: &JsonValue) -> Self {
        Self {
            content_type,
            outline: document.outline(schema).map(|o| pretty(&o)),
            example: document.generate_example(schema).map(|e| pretty(&e)),
        }
    }
}

impl WebhookView {
    fn build(document: &ApiDocument, hook: &Webhook) -> Self {
        let request_body = hook
            .operation
            .get("requestBody")
            .and_then(|body| document.follow(body))
            .and_then(|body| media_schema(&body))
            .map(|(content_type, schema)| BodyView::build(document, content_type, &schema));
        Self {
            anchor: format!("webhook-{}", operation_anchor(&hook.method, &hook.name)),
            name: hook.name.clone(),
            method: hook.method.to_uppercase(),
            summary: hook.summary().map(String::from),
            description: hook
                .operation
                .get("description")
                .and_then(JsonValue::as_str)
                .map(String::from),
            request_body,
        }
    }
}

fn text(node: &JsonValue, key: &str) -> Option<String> {
    node.get(key).and_then(JsonValue::as_str).map(String::from)
}

fn pretty(value: &JsonValue) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}
