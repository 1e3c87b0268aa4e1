use poster_forge_core::prompt::{compose_caption_prompt, compose_image_prompt};
use poster_forge_core::request::{PosterRequest, ValidationError, MAX_DETAILS_CHARS, MAX_HEADLINE_CHARS};
use poster_forge_core::template::lookup;

#[test]
fn cake_shop_image_prompt_carries_fragment_and_literal_headline() {
    let request = PosterRequest::new("Cake Shop", "50% OFF this week").with_details("");
    let prompt = compose_image_prompt(&request, &lookup(&request.business_type));

    assert!(prompt.contains("cakes"));
    assert!(prompt.contains("pastries"));
    assert!(prompt.contains("\"50% OFF this week\""));
    assert!(prompt.contains("1080x1080"));
    assert!(prompt.contains("1:1"));
    assert!(prompt.contains("No watermark"));
    assert!(prompt.contains("Poster style: modern"));
    assert!(prompt.contains("Color theme: bright"));
}

#[test]
fn headline_and_details_are_embedded_verbatim_up_to_the_limits() {
    let tricky_headline = "Buy 2 \"get\" 1 free! {now} 100% <b>real</b> ✨".to_string();
    let longest_headline = "H".repeat(MAX_HEADLINE_CHARS);
    let longest_details = "déjà vu\n".repeat(MAX_DETAILS_CHARS / 8);

    for (headline, details) in [
        (tricky_headline.clone(), "Line one\nLine two\t$5".to_string()),
        (longest_headline, longest_details),
    ] {
        let request = PosterRequest::new("Boutique", headline.clone()).with_details(details.clone());
        assert_eq!(request.validate(), Ok(()));

        let prompt = compose_image_prompt(&request, &lookup(&request.business_type));
        assert!(prompt.contains(&headline), "headline not embedded verbatim");
        assert!(prompt.contains(&details), "details not embedded verbatim");
    }
}

#[test]
fn image_prompt_is_deterministic() {
    let request = PosterRequest::new("Cafe", "Latte Tuesdays").with_details("Two for one");
    let template = lookup(&request.business_type);
    assert_eq!(
        compose_image_prompt(&request, &template),
        compose_image_prompt(&request, &template)
    );
    assert_eq!(compose_caption_prompt(&request), compose_caption_prompt(&request));
}

#[test]
fn image_prompt_references_logo_only_when_present() {
    let mut request = PosterRequest::new("Cafe", "Grand opening");
    let template = lookup(&request.business_type);
    assert!(!compose_image_prompt(&request, &template).contains("logo"));

    request.logo_url = Some("https://cdn.example.com/logo.png".to_string());
    let prompt = compose_image_prompt(&request, &template);
    assert!(prompt.contains("https://cdn.example.com/logo.png"));
}

#[test]
fn caption_prompt_asks_for_three_short_numbered_captions() {
    let request = PosterRequest::new("Gym / Fitness", "New Year Membership").with_details("Join for $1");
    let prompt = compose_caption_prompt(&request);

    assert!(prompt.contains("3 engaging captions"));
    assert!(prompt.contains("Gym / Fitness"));
    assert!(prompt.contains("Headline: New Year Membership"));
    assert!(prompt.contains("Details: Join for $1"));
    assert!(prompt.contains("Under 150 characters"));
    assert!(prompt.contains("emojis"));
    assert!(prompt.contains("Instagram/Facebook"));
    assert!(prompt.contains("Numbered 1, 2, 3"));
}

#[test]
fn validation_rejects_empty_and_oversized_fields() {
    assert_eq!(
        PosterRequest::new("Cafe", "").validate(),
        Err(ValidationError::EmptyHeadline)
    );
    assert_eq!(
        PosterRequest::new("Cafe", "   ").validate(),
        Err(ValidationError::EmptyHeadline)
    );
    assert_eq!(
        PosterRequest::new("Cafe", "x".repeat(MAX_HEADLINE_CHARS + 1)).validate(),
        Err(ValidationError::HeadlineTooLong {
            max: MAX_HEADLINE_CHARS,
            actual: MAX_HEADLINE_CHARS + 1
        })
    );
    assert_eq!(
        PosterRequest::new("Cafe", "ok")
            .with_details("d".repeat(MAX_DETAILS_CHARS + 1))
            .validate(),
        Err(ValidationError::DetailsTooLong {
            max: MAX_DETAILS_CHARS,
            actual: MAX_DETAILS_CHARS + 1
        })
    );
}

#[test]
fn request_deserializes_wire_body_with_defaults() {
    let request: PosterRequest = serde_json::from_str(
        r#"{"businessType":"Cake Shop","headline":"50% OFF this week","details":"","colors":"pastel"}"#,
    )
    .expect("wire body should deserialize");
    assert_eq!(request.business_type, "Cake Shop");
    assert_eq!(request.style, "modern");
    assert_eq!(request.color_theme, "pastel");
    assert_eq!(request.details(), "");
    assert_eq!(request.logo_url, None);

    let bare: PosterRequest = serde_json::from_str("{}").expect("empty body should deserialize");
    assert_eq!(bare.headline, "");
    assert_eq!(bare.color_theme, "bright");
    assert!(bare.validate().is_err());
}

#[test]
fn null_wire_fields_behave_like_absent_ones() {
    let request: PosterRequest = serde_json::from_str(
        r#"{"businessType":null,"headline":null,"details":null,"style":null,"colors":null,"logoUrl":null}"#,
    )
    .expect("null fields should deserialize");
    assert_eq!(request.business_type, "");
    assert_eq!(request.headline, "");
    assert_eq!(request.details(), "");
    assert_eq!(request.style, "modern");
    assert_eq!(request.color_theme, "bright");
    assert_eq!(request.logo_url, None);
    assert_eq!(request.validate(), Err(ValidationError::EmptyHeadline));

    let styled: PosterRequest =
        serde_json::from_str(r#"{"headline":"Grand opening","style":null,"colorTheme":"pastel"}"#)
            .expect("alias with null style should deserialize");
    assert_eq!(styled.style, "modern");
    assert_eq!(styled.color_theme, "pastel");
    assert!(styled.validate().is_ok());
}
