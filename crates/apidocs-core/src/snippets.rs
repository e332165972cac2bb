//! Client code snippets for endpoints.
//!
//! A [`SnippetRequest`] captures what a client needs to send (method, URL with
//! path and query parameters filled in, headers, JSON body). The
//! [`SnippetGenerator`] renders it once per [`SnippetLanguage`] through
//! built-in tera templates.

// Internal imports (std, crate)
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::endpoints::Endpoint;
use crate::openapi::ApiDocument;
use crate::utils::{fill_path_params, scalar_text};

// External imports (alphabetized)
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use tera::{Context, Tera};

const CURL_TEMPLATE: &str = r#"curl -X {{ method }} '{{ url | shell_escape }}'
{%- for header in headers %} \
  -H '{{ header.name | shell_escape }}: {{ header.value | shell_escape }}'
{%- endfor %}
{%- if body %} \
  -d '{{ body | shell_escape }}'
{%- endif %}"#;

const JAVASCRIPT_TEMPLATE: &str = r#"const response = await fetch({{ url | json_encode }}, {
  method: '{{ method }}',
{%- if headers %}
  headers: {
{%- for header in headers %}
    {{ header.name | json_encode }}: {{ header.value | json_encode }},
{%- endfor %}
  },
{%- endif %}
{%- if body %}
  body: JSON.stringify({{ body }}),
{%- endif %}
});
const data = await response.json();"#;

const PYTHON_TEMPLATE: &str = r#"import requests

response = requests.{{ method | lower }}(
    {{ url | json_encode }},
{%- if headers %}
    headers={
{%- for header in headers %}
        {{ header.name | json_encode }}: {{ header.value | json_encode }},
{%- endfor %}
    },
{%- endif %}
{%- if body %}
    json={{ python_body }},
{%- endif %}
)
print(response.json())"#;

const RUST_TEMPLATE: &str = r#"let client = reqwest::Client::new();
let response = client
    .{{ method | lower }}({{ url | rust_string }})
{%- for header in headers %}
    .header({{ header.name | rust_string }}, {{ header.value | rust_string }})
{%- endfor %}
{%- if body %}
    .json(&serde_json::json!({{ body }}))
{%- endif %}
    .send()
    .await?;"#;

/// Supported snippet languages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SnippetLanguage {
    /// Shell, using curl
    #[default]
    Curl,
    /// Browser or Node fetch
    JavaScript,
    /// Python with requests
    Python,
    /// Rust with reqwest
    Rust,
}

impl FromStr for SnippetLanguage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "curl" | "shell" => Ok(Self::Curl),
            "javascript" | "js" => Ok(Self::JavaScript),
            "python" | "py" => Ok(Self::Python),
            "rust" | "rs" => Ok(Self::Rust),
            _ => Err(format!("Unknown snippet language: {}", s)),
        }
    }
}

impl SnippetLanguage {
    /// Returns the language identifier as a string slice
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Curl => "curl",
            Self::JavaScript => "javascript",
            Self::Python => "python",
            Self::Rust => "rust",
        }
    }

    /// Human readable tab label
    pub fn label(&self) -> &'static str {
        match self {
            Self::Curl => "cURL",
            Self::JavaScript => "JavaScript",
            Self::Python => "Python",
            Self::Rust => "Rust",
        }
    }

    fn template_name(&self) -> &'static str {
        match self {
            Self::Curl => "curl.sh",
            Self::JavaScript => "fetch.js",
            Self::Python => "requests.py",
            Self::Rust => "reqwest.rs",
        }
    }

    /// Returns an iterator over all snippet languages
    pub fn all() -> impl Iterator<Item = Self> {
        use SnippetLanguage::*;
        [Curl, JavaScript, Python, Rust].iter().copied()
    }
}

impl fmt::Display for SnippetLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Name/value pair sent as a header or query parameter
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NameValue {
    pub name: String,
    pub value: String,
}

impl NameValue {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Everything a snippet needs to describe one request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SnippetRequest {
    /// Uppercase HTTP method
    pub method: String,
    /// Absolute URL including the query string
    pub url: String,
    pub headers: Vec<NameValue>,
    /// Example JSON body
    pub body: Option<JsonValue>,
}

impl SnippetRequest {
    /// Build the request for `endpoint`, filling parameters with example values.
    ///
    /// Path parameters without an example keep their `{name}` placeholder.
    /// Only required query and header parameters are included. A JSON body
    /// and its `Content-Type` are attached for POST, PUT and PATCH when an
    /// example can be synthesized from the body schema.
    pub fn for_endpoint(document: &ApiDocument, endpoint: &Endpoint, base_url: &str) -> Self {
        let mut path_values = HashMap::new();
        let mut query = Vec::new();
        let mut headers = Vec::new();

        for parameter in document.parameters(endpoint) {
            let Some(name) = parameter.get("name").and_then(JsonValue::as_str) else {
                continue;
            };
            let required = parameter
                .get("required")
                .and_then(JsonValue::as_bool)
                .unwrap_or(false);
            let example = document.parameter_example(&parameter);
            match parameter.get("in").and_then(JsonValue::as_str) {
                Some("path") => {
                    if let Some(value) = example {
                        path_values.insert(name.to_string(), scalar_text(&value));
                    }
                }
                Some("query") if required => {
                    let value = example.map(|v| scalar_text(&v)).unwrap_or_default();
                    query.push(NameValue::new(name, value));
                }
                Some("header") if required => {
                    let value = example.map(|v| scalar_text(&v)).unwrap_or_default();
                    headers.push(NameValue::new(name, value));
                }
                _ => {}
            }
        }

        let body = document
            .request_body_schema(endpoint)
            .filter(|_| endpoint.method.has_body())
            .filter(|(content_type, _)| content_type.contains("json"))
            .and_then(|(content_type, schema)| {
                let example = document.generate_example(&schema)?;
                headers.push(NameValue::new("Content-Type", content_type));
                Some(example)
            });

        let mut url = format!(
            "{}{}",
            base_url.trim_end_matches('/'),
            fill_path_params(&endpoint.path, &path_values)
        );
        if !query.is_empty() {
            let mut serializer = url::form_urlencoded::Serializer::new(String::new());
            for pair in &query {
                serializer.append_pair(&pair.name, &pair.value);
            }
            url.push('?');
            url.push_str(&serializer.finish());
        }

        Self {
            method: endpoint.method.as_str().to_uppercase(),
            url,
            headers,
            body,
        }
    }
}

/// A rendered snippet
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snippet {
    pub language: SnippetLanguage,
    pub label: String,
    pub code: String,
}

/// Renders [`SnippetRequest`]s through the built-in templates
#[derive(Debug, Clone)]
pub struct SnippetGenerator {
    tera: Tera,
}

impl SnippetGenerator {
    pub fn new() -> crate::Result<Self> {
        let mut tera = Tera::default();
        tera.add_raw_templates(vec![
            (SnippetLanguage::Curl.template_name(), CURL_TEMPLATE),
            (SnippetLanguage::JavaScript.template_name(), JAVASCRIPT_TEMPLATE),
            (SnippetLanguage::Python.template_name(), PYTHON_TEMPLATE),
            (SnippetLanguage::Rust.template_name(), RUST_TEMPLATE),
        ])?;
        tera.register_filter("shell_escape", shell_escape);
        tera.register_filter("rust_string", rust_string);
        Ok(Self { tera })
    }

    /// Render one snippet
    pub fn render(
        &self,
        language: SnippetLanguage,
        request: &SnippetRequest,
    ) -> crate::Result<Snippet> {
        let mut context = Context::new();
        context.insert("method", &request.method);
        context.insert("url", &request.url);
        context.insert("headers", &request.headers);
        if let Some(body) = &request.body {
            context.insert("body", &serde_json::to_string_pretty(body)?);
            context.insert("python_body", &python_literal(body));
        }
        let code = self.tera.render(language.template_name(), &context)?;
        Ok(Snippet {
            language,
            label: language.label().to_string(),
            code,
        })
    }

    /// Render one snippet per language, in the order given
    pub fn render_all(
        &self,
        languages: &[SnippetLanguage],
        request: &SnippetRequest,
    ) -> crate::Result<Vec<Snippet>> {
        languages
            .iter()
            .map(|language| self.render(*language, request))
            .collect()
    }
}

/// Escape a value for use inside single quotes in a POSIX shell
fn shell_escape(value: &JsonValue, _: &HashMap<String, JsonValue>) -> tera::Result<JsonValue> {
    let text = tera::try_get_value!("shell_escape", "value", String, value);
    Ok(JsonValue::String(text.replace('\'', r"'\''")))
}

/// Quote a value as a Rust string literal
fn rust_string(value: &JsonValue, _: &HashMap<String, JsonValue>) -> tera::Result<JsonValue> {
    let text = tera::try_get_value!("rust_string", "value", String, value);
    Ok(JsonValue::String(format!("{:?}", text)))
}

/// Render a JSON value as a Python literal
fn python_literal(value: &JsonValue) -> String {
    match value {
        JsonValue::Null => "None".to_string(),
        JsonValue::Bool(true) => "True".to_string(),
        JsonValue::Bool(false) => "False".to_string(),
        JsonValue::Number(n) => n.to_string(),
        JsonValue::String(_) => value.to_string(),
        JsonValue::Array(items) => format!(
            "[{}]",
            items.iter().map(python_literal).collect::<Vec<_>>().join(", ")
        ),
        JsonValue::Object(map) => format!(
            "{{{}}}",
            map.iter()
                .map(|(k, v)| format!("{}: {}", JsonValue::String(k.clone()), python_literal(v)))
                .collect::<Vec<_>>()
                .join(", ")
        ),
    }
}
