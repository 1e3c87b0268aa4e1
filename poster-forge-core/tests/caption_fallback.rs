use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use poster_forge_core::caption::{
    fallback_captions, parse_captions, CaptionSource, CaptionWriter, MAX_CAPTIONS,
};
use poster_forge_core::contract::{MockTextGenerator, ProviderError, TextGenerator};

fn writer_returning(result: Result<String, ProviderError>) -> CaptionWriter {
    let mut generator = MockTextGenerator::new();
    let mut result = Some(result);
    generator
        .expect_generate()
        .times(1)
        .returning(move |_| result.take().unwrap_or(Ok(String::new())));
    CaptionWriter::new(Arc::new(generator), Duration::from_secs(5))
}

fn assert_caption_contract(captions: &[String]) {
    assert!(
        (1..=MAX_CAPTIONS).contains(&captions.len()),
        "expected 1-3 captions, got {captions:?}"
    );
    assert!(captions.iter().all(|c| !c.trim().is_empty()), "{captions:?}");
}

#[test]
fn parses_numbered_list_into_trimmed_captions() {
    let raw = "1. Fresh cakes daily 🎂\n2. Sweet deals inside 🍰 \n3. Treat yourself today ✨\n";
    assert_eq!(
        parse_captions(raw),
        vec![
            "Fresh cakes daily 🎂",
            "Sweet deals inside 🍰",
            "Treat yourself today ✨"
        ]
    );
}

#[test]
fn parse_drops_preamble_and_extra_entries() {
    let raw = "Here are your captions:\n1. One\n2. Two\n3. Three\n4. Four";
    assert_eq!(parse_captions(raw), vec!["One", "Two", "Three"]);
}

#[test]
fn parse_yields_nothing_without_numbered_markers() {
    struct TestCase {
        name: &'static str,
        raw: &'static str,
    }
    let test_cases = vec![
        TestCase { name: "empty", raw: "" },
        TestCase { name: "whitespace", raw: "  \n\t " },
        TestCase {
            name: "prose",
            raw: "I cannot help with that request.",
        },
        TestCase {
            name: "markers without content",
            raw: "1. \n2. \n3. ",
        },
    ];
    for tc in test_cases {
        assert!(parse_captions(tc.raw).is_empty(), "{}", tc.name);
    }
}

#[test]
fn fallback_templates_substitute_headline_and_details() {
    assert_eq!(
        fallback_captions("50% OFF this week", ""),
        vec![
            "🎉 50% OFF this week — Don't miss out! Visit us today! 💫",
            "✨ Special offer: 50% OFF this week 🛍️",
            "🔥 Limited time: 50% OFF this week — Tag a friend who needs this! 👇",
        ]
    );
    assert_eq!(
        fallback_captions("Grand opening", "Free coffee")[1],
        "✨ Special offer: Grand opening - Free coffee 🛍️"
    );
}

#[tokio::test]
async fn provider_captions_are_used_when_parseable() {
    let writer = writer_returning(Ok("1. First\n2. Second".to_string()));
    let set = writer.generate("prompt", "Headline", "").await;
    assert_eq!(set.source(), CaptionSource::Provider);
    assert_eq!(set.captions(), ["First", "Second"]);
    assert_caption_contract(set.captions());
}

#[tokio::test]
async fn provider_failure_falls_back_to_templates() {
    let writer = writer_returning(Err(ProviderError::Status {
        provider: "gemini".to_string(),
        status: 429,
        body: "quota exceeded".to_string(),
    }));
    let set = writer.generate("prompt", "50% OFF this week", "").await;
    assert_eq!(set.source(), CaptionSource::Fallback);
    assert_eq!(set.captions(), fallback_captions("50% OFF this week", "").as_slice());
    assert_caption_contract(set.captions());
}

#[tokio::test]
async fn unparseable_answer_falls_back_to_templates() {
    let writer = writer_returning(Ok("Sorry, no captions today.".to_string()));
    let set = writer.generate("prompt", "Summer sale", "Up to 70%").await;
    assert_eq!(set.source(), CaptionSource::Fallback);
    assert_eq!(set.captions().len(), 3);
    assert_caption_contract(set.captions());
}

struct StalledGenerator;

#[async_trait]
impl TextGenerator for StalledGenerator {
    async fn generate(&self, _prompt: &str) -> Result<String, ProviderError> {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        Ok("1. Too late".to_string())
    }
}

#[tokio::test(start_paused = true)]
async fn provider_timeout_falls_back_to_templates() {
    let writer = CaptionWriter::new(Arc::new(StalledGenerator), Duration::from_secs(30));
    let set = writer.generate("prompt", "Flash sale", "").await;
    assert_eq!(set.source(), CaptionSource::Fallback);
    assert_eq!(set.captions(), fallback_captions("Flash sale", "").as_slice());
}
