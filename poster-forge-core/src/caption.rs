//! # caption: social-media captions with a deterministic fallback
//!
//! The text provider is asked for a numbered list (`"1. ...\n2. ...\n3. ..."`). Its answer is
//! split on the number-dot-space marker into trimmed, non-empty segments, keeping at most
//! [`MAX_CAPTIONS`]. When the provider fails, times out, or answers without any numbered
//! segment, three captions are synthesized from fixed templates instead.
//!
//! [`CaptionWriter::generate`] therefore never fails and never returns an empty set.

use std::sync::{Arc, LazyLock};
use std::time::Duration;

use regex::Regex;
use serde::Serialize;
use tracing::{info, warn};

use crate::contract::{ProviderError, TextGenerator};

pub const MAX_CAPTIONS: usize = 3;

/// Where a caption set came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CaptionSource {
    Provider,
    Fallback,
}

/// One to three non-empty captions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CaptionSet {
    captions: Vec<String>,
    #[serde(skip)]
    source: CaptionSource,
}

impl CaptionSet {
    pub fn captions(&self) -> &[String] {
        &self.captions
    }

    pub fn source(&self) -> CaptionSource {
        self.source
    }

    pub fn into_captions(self) -> Vec<String> {
        self.captions
    }
}

// `None` only if the pattern fails to compile; parsing then yields nothing and the fallback applies.
static NUMBERED_MARKER: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"\d+\.\s").ok());

/// Split a numbered list into captions.
///
/// Text before the first marker is discarded; text without any marker yields no captions.
pub fn parse_captions(raw: &str) -> Vec<String> {
    let Some(marker) = NUMBERED_MARKER.as_ref() else {
        return Vec::new();
    };
    let bounds: Vec<(usize, usize)> = marker.find_iter(raw).map(|m| (m.start(), m.end())).collect();

    bounds
        .iter()
        .enumerate()
        .map(|(idx, &(_, start))| {
            let end = bounds.get(idx + 1).map(|&(next, _)| next).unwrap_or(raw.len());
            raw[start..end].trim()
        })
        .filter(|segment| !segment.is_empty())
        .take(MAX_CAPTIONS)
        .map(str::to_string)
        .collect()
}

/// The three fixed captions used when the provider cannot be relied on.
pub fn fallback_captions(headline: &str, details: &str) -> Vec<String> {
    let offer = if details.is_empty() {
        format!("✨ Special offer: {headline} 🛍️")
    } else {
        format!("✨ Special offer: {headline} - {details} 🛍️")
    };
    vec![
        format!("🎉 {headline} — Don't miss out! Visit us today! 💫"),
        offer,
        format!("🔥 Limited time: {headline} — Tag a friend who needs this! 👇"),
    ]
}

/// Caption stage of the pipeline: calls the text provider and absorbs its failures.
pub struct CaptionWriter {
    generator: Arc<dyn TextGenerator>,
    timeout: Duration,
}

impl CaptionWriter {
    pub fn new(generator: Arc<dyn TextGenerator>, timeout: Duration) -> Self {
        Self { generator, timeout }
    }

    /// Produce captions for `prompt`, falling back to templates built from `headline`/`details`.
    pub async fn generate(&self, prompt: &str, headline: &str, details: &str) -> CaptionSet {
        let raw = match tokio::time::timeout(self.timeout, self.generator.generate(prompt)).await
        {
            Ok(result) => result,
            Err(_) => Err(ProviderError::Timeout(self.timeout)),
        };

        match raw {
            Ok(text) => {
                let captions = parse_captions(&text);
                if !captions.is_empty() {
                    info!(count = captions.len(), "[CAPTION] Parsed provider captions");
                    return CaptionSet {
                        captions,
                        source: CaptionSource::Provider,
                    };
                }
                warn!(raw = %text, "[CAPTION] Provider answer had no numbered captions, using fallback");
            }
            Err(e) => {
                warn!(error = %e, "[CAPTION] Provider failed, using fallback");
            }
        }

        CaptionSet {
            captions: fallback_captions(headline, details),
            source: CaptionSource::Fallback,
        }
    }
}
