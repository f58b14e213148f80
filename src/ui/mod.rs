/// User interface components
///
/// - Placement canvas for dragging and resizing the design (placement.rs)
/// - Panels composing the main window (panels.rs)

pub mod placement;
pub mod panels;
