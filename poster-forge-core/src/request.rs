//! The marketing brief a poster is generated from, and its validation rules.

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// Longest headline accepted, in characters.
pub const MAX_HEADLINE_CHARS: usize = 200;
/// Longest details text accepted, in characters.
pub const MAX_DETAILS_CHARS: usize = 1000;

fn default_style() -> String {
    "modern".to_string()
}

fn default_color_theme() -> String {
    "bright".to_string()
}

// An explicit `null` on the wire means the same as an absent field.
fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn null_as_default_style<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_else(default_style))
}

fn null_as_default_color_theme<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_else(default_color_theme))
}

/// Rejection of a request before the pipeline starts. User-facing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("headline is required")]
    EmptyHeadline,

    #[error("headline is {actual} characters, the maximum is {max}")]
    HeadlineTooLong { max: usize, actual: usize },

    #[error("details are {actual} characters, the maximum is {max}")]
    DetailsTooLong { max: usize, actual: usize },
}

/// A structured marketing brief.
///
/// Deserializes from the wire body of `POST /generatePoster` and `POST /generateCaption`;
/// absent or `null` fields fall back to their defaults so that the caption endpoint can always answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PosterRequest {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub business_type: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub headline: String,
    #[serde(default)]
    pub details: Option<String>,
    #[serde(default = "default_style", deserialize_with = "null_as_default_style")]
    pub style: String,
    #[serde(
        default = "default_color_theme",
        deserialize_with = "null_as_default_color_theme",
        rename = "colors",
        alias = "colorTheme"
    )]
    pub color_theme: String,
    /// An already uploaded logo, referenced from the image prompt.
    #[serde(default)]
    pub logo_url: Option<String>,
}

impl PosterRequest {
    /// A request with the given business type and headline, everything else defaulted.
    pub fn new(business_type: impl Into<String>, headline: impl Into<String>) -> Self {
        Self {
            business_type: business_type.into(),
            headline: headline.into(),
            details: None,
            style: default_style(),
            color_theme: default_color_theme(),
            logo_url: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Details text, empty when absent.
    pub fn details(&self) -> &str {
        self.details.as_deref().unwrap_or("")
    }

    /// Check the invariants that must hold before any provider is called.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.headline.trim().is_empty() {
            return Err(ValidationError::EmptyHeadline);
        }
        let headline_len = self.headline.chars().count();
        if headline_len > MAX_HEADLINE_CHARS {
            return Err(ValidationError::HeadlineTooLong {
                max: MAX_HEADLINE_CHARS,
                actual: headline_len,
            });
        }
        let details_len = self.details().chars().count();
        if details_len > MAX_DETAILS_CHARS {
            return Err(ValidationError::DetailsTooLong {
                max: MAX_DETAILS_CHARS,
                actual: details_len,
            });
        }
        Ok(())
    }
}
