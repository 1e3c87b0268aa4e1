//! Prompt composition for the image and caption providers.
//!
//! Both functions are pure: identical requests produce identical prompts. Headline and
//! details are embedded verbatim; any escaping a provider needs happens in its client
//! (JSON encoding of the request body).

use std::fmt::Write as _;

use crate::request::PosterRequest;
use crate::template::TemplateDescriptor;

/// Build the image-generation prompt for `request` in the visual style of `template`.
pub fn compose_image_prompt(request: &PosterRequest, template: &TemplateDescriptor) -> String {
    let mut prompt = String::new();
    let _ = writeln!(
        prompt,
        "Create a high-quality 1080x1080 promotional poster for a {} business.",
        request.business_type
    );
    let _ = writeln!(prompt);
    let _ = writeln!(prompt, "Visual style: {}", template.fragment);
    let _ = writeln!(prompt, "Poster style: {}", request.style);
    let _ = writeln!(prompt, "Color theme: {}", request.color_theme);
    let _ = writeln!(prompt);
    let _ = writeln!(prompt, "Text to include:");
    let _ = writeln!(prompt, "- Headline: \"{}\"", request.headline);
    let _ = writeln!(prompt, "- Details: \"{}\"", request.details());
    if let Some(logo_url) = request.logo_url.as_deref().filter(|url| !url.is_empty()) {
        let _ = writeln!(prompt, "- Place the business logo from {logo_url} in a corner");
    }
    let _ = writeln!(prompt);
    let _ = writeln!(prompt, "Rules:");
    let _ = writeln!(prompt, "- No watermark");
    let _ = writeln!(prompt, "- No distorted or misspelled text");
    let _ = writeln!(prompt, "- No random objects");
    let _ = writeln!(prompt, "- Clean, symmetrical, aesthetic composition");
    let _ = write!(prompt, "- 1:1 aspect ratio, social media friendly");
    prompt
}

/// Build the prompt asking the text provider for three numbered captions.
pub fn compose_caption_prompt(request: &PosterRequest) -> String {
    format!(
        "You are a social media marketing expert. Generate 3 engaging captions for a {} promotional post.\n\
         \n\
         Headline: {}\n\
         Details: {}\n\
         \n\
         Requirements:\n\
         - Catchy and engaging\n\
         - Include emojis\n\
         - Under 150 characters each\n\
         - Suitable for Instagram/Facebook\n\
         - Numbered 1, 2, 3",
        request.business_type,
        request.headline,
        request.details()
    )
}
