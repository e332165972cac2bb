//! Color themes for the rendered page.
//!
//! ```
//! use apidocs_core::Theme;
//! use std::str::FromStr;
//!
//! let theme = Theme::from_str("Dark").unwrap();
//! assert_eq!(theme.as_str(), "dark");
//! assert_eq!(Theme::default(), Theme::Light);
//! ```

// Internal imports (std, crate)
use std::fmt;
use std::str::FromStr;

// External imports (alphabetized)
use serde::{Deserialize, Serialize};

/// Supported page themes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    /// Dark text on a light background
    #[default]
    Light,
    /// Light text on a dark background
    Dark,
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            _ => Err(format!(
                "Unknown theme: {} (expected one of: {})",
                s,
                Theme::all()
                    .map(|theme| theme.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            )),
        }
    }
}

impl Theme {
    /// Returns the theme identifier as a string slice
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    /// Returns an iterator over all available themes
    pub fn all() -> impl Iterator<Item = Self> {
        [Theme::Light, Theme::Dark].iter().copied()
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
