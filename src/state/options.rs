/// Discrete choices that shape the generated mockup
///
/// These are picked before the first generation and locked once a base
/// image exists, so the mockup always matches the options it was made with.

use std::fmt;

/// How the garment is presented
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayStyle {
    /// Ghost mannequin, no visible person
    #[default]
    Ghost,
    MaleModel,
    FemaleModel,
}

impl DisplayStyle {
    pub const ALL: [DisplayStyle; 3] = [
        DisplayStyle::Ghost,
        DisplayStyle::MaleModel,
        DisplayStyle::FemaleModel,
    ];
}

impl fmt::Display for DisplayStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DisplayStyle::Ghost => "Ghost",
            DisplayStyle::MaleModel => "Male",
            DisplayStyle::FemaleModel => "Female",
        })
    }
}

/// Rendered fabric quality
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FabricQuality {
    Standard,
    #[default]
    Premium,
    Luxury,
}

impl FabricQuality {
    pub const ALL: [FabricQuality; 3] = [
        FabricQuality::Standard,
        FabricQuality::Premium,
        FabricQuality::Luxury,
    ];
}

impl fmt::Display for FabricQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FabricQuality::Standard => "Standard",
            FabricQuality::Premium => "Premium",
            FabricQuality::Luxury => "Luxury",
        })
    }
}

/// Rendered seam and stitching detail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StitchingDetail {
    #[default]
    Standard,
    Reinforced,
    Decorative,
}

impl StitchingDetail {
    pub const ALL: [StitchingDetail; 3] = [
        StitchingDetail::Standard,
        StitchingDetail::Reinforced,
        StitchingDetail::Decorative,
    ];
}

impl fmt::Display for StitchingDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            StitchingDetail::Standard => "Standard",
            StitchingDetail::Reinforced => "Reinforced",
            StitchingDetail::Decorative => "Decorative",
        })
    }
}

/// Everything the generation prompt needs besides the description
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GenerationOptions {
    pub display_style: DisplayStyle,
    pub fabric_quality: FabricQuality,
    pub stitching_detail: StitchingDetail,
}
