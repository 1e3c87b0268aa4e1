//! Business-category visual styles.
//!
//! Lookup is an exact, case-sensitive match on the label the UI sends. Anything else
//! resolves to the generic descriptor, so a lookup never fails.

use serde::Serialize;

/// Fragment used for every business type missing from [`TEMPLATES`].
pub const GENERIC_FRAGMENT: &str =
    "clean professional poster, elegant layout, soft gradient lighting";

/// Known business categories and their visual-style fragments, in display order.
pub const TEMPLATES: &[(&str, &str)] = &[
    (
        "Restaurant",
        "realistic restaurant dish photography, elegant menu layout, warm lighting, clean modern typography, premium dining vibe",
    ),
    (
        "Clothing Store",
        "fashion model, stylish clothing, minimal boutique layout, soft shadows, premium fashion aesthetic",
    ),
    (
        "Beauty Salon",
        "luxury beauty visual, makeup brushes, soft gradients, glowing skin retouching, elegant salon vibe",
    ),
    (
        "Gym / Fitness",
        "sporty fitness poster, dumbbells, gym machines, bold high-energy layout, strong contrast",
    ),
    (
        "Real Estate",
        "modern house interior, architectural lighting, premium property showcasing, clean real estate brochure style",
    ),
    (
        "Grocery Store",
        "fresh fruits & vegetables, colorful grocery layout, discount box space, clean and friendly vibe",
    ),
    (
        "Home Services",
        "cleaning tools, handyman tools, service icons, clean layout, professional service poster",
    ),
    (
        "Tuition / Coaching",
        "books, classroom illustrations, study desk, educational visuals, clean academic layout",
    ),
    (
        "Cake Shop",
        "delicious cakes, pastries, dessert photography, pastel bakery colors, sweet shop vibe",
    ),
    (
        "Tiffin Service",
        "Indian homemade meals, tiffin boxes, steel plates, warm food lighting, homely comfort style",
    ),
    (
        "Boutique",
        "designer fabric textures, elegant patterns, beauty-oriented clothing theme, boutique elegance",
    ),
    (
        "Cafe",
        "coffee cup, latte art, cozy cafe interior, warm brown tones, aesthetic cafe poster",
    ),
];

/// The visual style resolved for a business type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemplateDescriptor {
    /// The business type as requested, including unknown labels.
    pub business_type: String,
    pub fragment: &'static str,
    /// True when no category matched and [`GENERIC_FRAGMENT`] was used.
    pub generic: bool,
}

/// Resolve the visual style for `business_type`.
pub fn lookup(business_type: &str) -> TemplateDescriptor {
    match TEMPLATES.iter().find(|(key, _)| *key == business_type) {
        Some(&(_, fragment)) => TemplateDescriptor {
            business_type: business_type.to_string(),
            fragment,
            generic: false,
        },
        None => TemplateDescriptor {
            business_type: business_type.to_string(),
            fragment: GENERIC_FRAGMENT,
            generic: true,
        },
    }
}

/// Known business types in display order.
pub fn business_types() -> impl Iterator<Item = &'static str> {
    TEMPLATES.iter().map(|(key, _)| *key)
}
