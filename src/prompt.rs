/// Prompt construction for the remote image models
///
/// Both functions are deterministic template fills: the same inputs always
/// produce byte-identical instructions. The generation prompt is assembled
/// in a fixed order:
/// 1. Preamble framing the user's description as a plain, unbranded item
/// 2. Display style clause
/// 3. Fabric quality clause
/// 4. Stitching detail clause
/// 5. Closing constraints (blank garment, studio backdrop, camera setup)

use crate::state::options::{DisplayStyle, FabricQuality, GenerationOptions, StitchingDetail};
use crate::state::transform::PlacementTransform;

/// Scales above this are described as very large
const LARGE_SCALE_THRESHOLD: f32 = 0.4;

/// Scales above this (and up to LARGE_SCALE_THRESHOLD) are medium
const MEDIUM_SCALE_THRESHOLD: f32 = 0.2;

const CLOSING_CONSTRAINTS: &str = "Crucially, the clothing item must be completely blank, with no pre-existing logos, graphics, or designs.\n\
The background must be a clean, minimalist, neutral gray studio setting.\n\
Shot on a DSLR camera, 50mm lens, f/1.8, professional studio lighting, creating soft shadows and highlighting all details.\n\
Focus on hyper-realistic details, textures, and seams.";

const INTEGRATION_CONSTRAINTS: &str = "Crucially, the applied design must look photorealistic. \
It must conform perfectly to the fabric's texture, folds, lighting, and shadows. \
It should not look like a flat sticker. \
Integrate it seamlessly and naturally into the clothing.";

/// Coarse size bucket sent to the compositing model
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeClass {
    Small,
    Medium,
    Large,
}

impl SizeClass {
    fn sentence(self) -> &'static str {
        match self {
            SizeClass::Large => "The design should be very large on the apparel.",
            SizeClass::Medium => "The design should be a standard, medium size.",
            SizeClass::Small => "The design should be small, like a pocket logo.",
        }
    }
}

/// Bucket a scale: (0.4, ..] large, (0.2, 0.4] medium, [.., 0.2] small
pub fn size_class(scale: f32) -> SizeClass {
    if scale > LARGE_SCALE_THRESHOLD {
        SizeClass::Large
    } else if scale > MEDIUM_SCALE_THRESHOLD {
        SizeClass::Medium
    } else {
        SizeClass::Small
    }
}

/// Build the text-to-image instruction for a blank mockup
pub fn compose_generation_prompt(description: &str, options: &GenerationOptions) -> String {
    let preamble = format!(
        "A professional 8k ultra-high resolution photorealistic mockup of a plain, unbranded: \"{}\".",
        description
    );

    [
        preamble.as_str(),
        display_clause(options.display_style),
        fabric_clause(options.fabric_quality),
        stitching_clause(options.stitching_detail),
        CLOSING_CONSTRAINTS,
    ]
    .join("\n")
}

/// Build the compositing instruction for a placed design
///
/// Only the placement matters here; the description and options already
/// live in the base image the instruction is sent alongside.
pub fn compose_composite_prompt(transform: &PlacementTransform) -> String {
    format!(
        "You are an expert apparel designer. Apply the second image (the design graphic) onto the first image (the clothing mockup).\n\
         \n\
         Placement Instructions:\n\
         1. Position the center of the design at approximately {x}% from the left and {y}% from the top of the garment's printable area.\n\
         2. {size}\n\
         \n\
         {constraints}",
        x = transform.x.round() as i32,
        y = transform.y.round() as i32,
        size = size_class(transform.scale).sentence(),
        constraints = INTEGRATION_CONSTRAINTS,
    )
}

fn display_clause(style: DisplayStyle) -> &'static str {
    match style {
        DisplayStyle::Ghost => "The clothing is displayed on a ghost mannequin to highlight the product's shape and design clearly. No humans or models are visible.",
        DisplayStyle::MaleModel => "The clothing is worn by a professional male model with a neutral expression, posed to showcase the apparel effectively.",
        DisplayStyle::FemaleModel => "The clothing is worn by a professional female model with a neutral expression, posed to showcase the apparel effectively.",
    }
}

fn fabric_clause(quality: FabricQuality) -> &'static str {
    match quality {
        FabricQuality::Standard => "The fabric has a standard, realistic texture.",
        FabricQuality::Premium => "The fabric is of premium quality, showing a detailed and realistic texture, weave, and drape.",
        FabricQuality::Luxury => "The fabric is luxurious and high-end, with an exceptionally detailed texture, sheen, and drape, indicating superior material quality.",
    }
}

fn stitching_clause(detail: StitchingDetail) -> &'static str {
    match detail {
        StitchingDetail::Standard => "Seams and stitching are realistic and well-executed.",
        StitchingDetail::Reinforced => "The stitching is clearly visible, clean, and reinforced, suggesting durability and high-quality construction.",
        StitchingDetail::Decorative => "Features intricate decorative stitching that is clearly visible and adds a unique design element.",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_class_boundaries() {
        assert_eq!(size_class(0.41), SizeClass::Large);
        assert_eq!(size_class(0.40), SizeClass::Medium);
        assert_eq!(size_class(0.21), SizeClass::Medium);
        assert_eq!(size_class(0.20), SizeClass::Small);
        assert_eq!(size_class(0.05), SizeClass::Small);
        assert_eq!(size_class(1.5), SizeClass::Large);
    }

    #[test]
    fn test_composite_prompt_sizes() {
        let large = compose_composite_prompt(&PlacementTransform::new(50.0, 40.0, 0.41));
        assert!(large.contains("very large"));

        let medium = compose_composite_prompt(&PlacementTransform::new(50.0, 40.0, 0.40));
        assert!(medium.contains("standard, medium size"));

        let small = compose_composite_prompt(&PlacementTransform::new(50.0, 40.0, 0.20));
        assert!(small.contains("small, like a pocket logo"));
    }

    #[test]
    fn test_composite_prompt_rounds_position() {
        let prompt = compose_composite_prompt(&PlacementTransform::new(69.6, 30.2, 0.25));
        assert!(prompt.contains("at approximately 70% from the left and 30% from the top"));
        assert!(prompt.contains("should not look like a flat sticker"));
    }

    #[test]
    fn test_composite_prompt_is_deterministic() {
        let transform = PlacementTransform::new(33.3, 66.6, 0.7);
        assert_eq!(
            compose_composite_prompt(&transform),
            compose_composite_prompt(&transform)
        );
    }

    #[test]
    fn test_generation_prompt_clause_order() {
        let options = GenerationOptions {
            display_style: DisplayStyle::FemaleModel,
            fabric_quality: FabricQuality::Luxury,
            stitching_detail: StitchingDetail::Reinforced,
        };
        let prompt = compose_generation_prompt("A black oversized hoodie.", &options);

        let preamble = prompt.find("plain, unbranded: \"A black oversized hoodie.\"").unwrap();
        let style = prompt.find("professional female model").unwrap();
        let fabric = prompt.find("exceptionally detailed texture, sheen, and drape").unwrap();
        let stitching = prompt.find("reinforced, suggesting durability").unwrap();
        let closing = prompt.find("neutral gray studio setting").unwrap();

        assert!(preamble < style);
        assert!(style < fabric);
        assert!(fabric < stitching);
        assert!(stitching < closing);
    }

    #[test]
    fn test_ghost_excludes_models() {
        let prompt = compose_generation_prompt("A white tee", &GenerationOptions::default());
        assert!(prompt.contains("ghost mannequin"));
        assert!(prompt.contains("No humans or models are visible."));
        assert!(!prompt.contains("worn by"));
        assert!(prompt.contains("8k ultra-high resolution"));
    }

    #[test]
    fn test_description_is_quoted_verbatim() {
        let prompt = compose_generation_prompt("  A grey hoodie ", &GenerationOptions::default());
        assert!(prompt.starts_with(
            "A professional 8k ultra-high resolution photorealistic mockup of a plain, unbranded: \"  A grey hoodie \"."
        ));
    }
}
