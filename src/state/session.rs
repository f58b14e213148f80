/// Mockup workflow state machine
///
/// The session walks through four phases:
/// - Empty: nothing generated yet
/// - BaseReady: a blank mockup exists
/// - DesignStaged: a design file is chosen and being positioned
/// - Final: the design has been composited onto the mockup
///
/// Each phase carries only the data valid in it, so a final image without
/// a base image (or a transform without a design) cannot be represented.
/// The session never performs I/O itself: `submit` and `apply` hand out
/// tickets the caller turns into remote calls, and the results come back
/// through `finish_generation` / `finish_composite`. Results whose ticket
/// is no longer the latest one issued are dropped.

use std::fmt;
use std::sync::Arc;

use iced::widget::image::Handle;

use super::options::{DisplayStyle, FabricQuality, GenerationOptions, StitchingDetail};
use super::transform::PlacementTransform;
use crate::prompt;
use crate::service::upload::DesignFile;
use crate::service::ImageData;

/// Description the editor starts with (and returns to on start over)
pub const DEFAULT_DESCRIPTION: &str = "A black oversized hoodie.";

pub const GENERATION_FAILED: &str =
    "Failed to generate base mockup. Please check your prompt and try again.";

pub const COMPOSITE_FAILED: &str =
    "Failed to apply the design. Please try a different design file or position.";

/// Identifies one remote call
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RequestId(u64);

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Image bytes plus a display handle built once
#[derive(Debug, Clone)]
pub struct Picture {
    pub data: Arc<ImageData>,
    pub handle: Handle,
}

impl Picture {
    pub fn new(data: ImageData) -> Self {
        let handle = data.handle();
        Self {
            data: Arc::new(data),
            handle,
        }
    }
}

/// Where the workflow currently stands
#[derive(Debug, Clone, Default)]
pub enum Phase {
    #[default]
    Empty,
    BaseReady {
        base: Picture,
    },
    DesignStaged {
        base: Picture,
        design: DesignFile,
        transform: PlacementTransform,
    },
    Final {
        base: Picture,
        design: DesignFile,
        transform: PlacementTransform,
        output: Picture,
    },
}

impl Phase {
    /// The blank mockup, if one exists
    pub fn base(&self) -> Option<&Picture> {
        match self {
            Phase::Empty => None,
            Phase::BaseReady { base }
            | Phase::DesignStaged { base, .. }
            | Phase::Final { base, .. } => Some(base),
        }
    }

    pub fn design(&self) -> Option<&DesignFile> {
        match self {
            Phase::DesignStaged { design, .. } | Phase::Final { design, .. } => Some(design),
            _ => None,
        }
    }

    pub fn transform(&self) -> Option<PlacementTransform> {
        match self {
            Phase::DesignStaged { transform, .. } | Phase::Final { transform, .. } => {
                Some(*transform)
            }
            _ => None,
        }
    }

    /// The composited result, only present in Final
    pub fn output(&self) -> Option<&Picture> {
        match self {
            Phase::Final { output, .. } => Some(output),
            _ => None,
        }
    }
}

/// Work order for a generation call
#[derive(Debug, Clone)]
pub struct GenerateTicket {
    pub id: RequestId,
    pub prompt: String,
}

/// Work order for a composite call
#[derive(Debug, Clone)]
pub struct CompositeTicket {
    pub id: RequestId,
    pub base: Arc<ImageData>,
    pub design: Arc<ImageData>,
    pub prompt: String,
}

/// All transient state of one user session
#[derive(Debug)]
pub struct Session {
    description: String,
    options: GenerationOptions,
    phase: Phase,
    error: Option<String>,
    generating: bool,
    applying: bool,
    /// Last id handed out; only responses carrying it are accepted
    latest_request: u64,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            description: DEFAULT_DESCRIPTION.to_string(),
            options: GenerationOptions::default(),
            phase: Phase::Empty,
            error: None,
            generating: false,
            applying: false,
            latest_request: 0,
        }
    }
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn set_description(&mut self, description: String) {
        if !self.generating {
            self.description = description;
        }
    }

    pub fn options(&self) -> GenerationOptions {
        self.options
    }

    /// Options are frozen while generating and once a mockup exists
    pub fn options_locked(&self) -> bool {
        self.generating || !matches!(self.phase, Phase::Empty)
    }

    pub fn set_display_style(&mut self, style: DisplayStyle) {
        if !self.options_locked() {
            self.options.display_style = style;
        }
    }

    pub fn set_fabric_quality(&mut self, quality: FabricQuality) {
        if !self.options_locked() {
            self.options.fabric_quality = quality;
        }
    }

    pub fn set_stitching_detail(&mut self, detail: StitchingDetail) {
        if !self.options_locked() {
            self.options.stitching_detail = detail;
        }
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_generating(&self) -> bool {
        self.generating
    }

    pub fn is_applying(&self) -> bool {
        self.applying
    }

    pub fn is_busy(&self) -> bool {
        self.generating || self.applying
    }

    /// Whether the generate action would do anything right now
    pub fn can_submit(&self) -> bool {
        !self.is_busy() && !self.description.trim().is_empty()
    }

    /// Whether a design file can be chosen right now
    pub fn can_select_design(&self) -> bool {
        !self.is_busy()
            && matches!(self.phase, Phase::BaseReady { .. } | Phase::DesignStaged { .. })
    }

    /// Whether the apply action would do anything right now
    pub fn can_apply(&self) -> bool {
        !self.is_busy() && matches!(self.phase, Phase::DesignStaged { .. })
    }

    fn next_request(&mut self) -> RequestId {
        self.latest_request += 1;
        RequestId(self.latest_request)
    }

    fn is_current(&self, id: RequestId) -> bool {
        id.0 == self.latest_request
    }

    /// Surface why a generate request cannot reach the image service
    pub fn service_unavailable(&mut self, reason: impl fmt::Display) {
        if !self.can_submit() {
            return;
        }
        log::warn!("Generate requested without an image service: {}", reason);
        self.error = Some(format!("Image service unavailable: {}", reason));
    }

    /// Start generating a new mockup
    ///
    /// Blank descriptions and re-entrant submissions are ignored without
    /// touching any state. Otherwise previous images and the design are
    /// discarded and a ticket for the generation call is returned.
    pub fn submit(&mut self) -> Option<GenerateTicket> {
        if !self.can_submit() {
            return None;
        }

        self.generating = true;
        self.error = None;
        self.phase = Phase::Empty;

        let id = self.next_request();
        let prompt = prompt::compose_generation_prompt(&self.description, &self.options);
        log::info!("Generation {} requested ({} prompt chars)", id, prompt.len());

        Some(GenerateTicket { id, prompt })
    }

    /// Record the outcome of a generation call. Returns false if dropped.
    pub fn finish_generation<E: fmt::Display>(
        &mut self,
        id: RequestId,
        result: Result<ImageData, E>,
    ) -> bool {
        if !self.generating || !self.is_current(id) {
            log::warn!("Discarding stale generation response {}", id);
            return false;
        }

        self.generating = false;

        match result {
            Ok(image) => {
                log::info!(
                    "Generation {} complete ({} bytes, {})",
                    id,
                    image.bytes.len(),
                    image.mime_type
                );
                self.phase = Phase::BaseReady {
                    base: Picture::new(image),
                };
            }
            Err(e) => {
                log::error!("Generation {} failed: {}", id, e);
                self.error = Some(GENERATION_FAILED.to_string());
            }
        }

        true
    }

    /// Stage a newly chosen design file
    ///
    /// The placement always resets to the default for a new file.
    pub fn select_design(&mut self, design: DesignFile) -> bool {
        if !self.can_select_design() {
            return false;
        }

        let base = match std::mem::take(&mut self.phase) {
            Phase::BaseReady { base } | Phase::DesignStaged { base, .. } => base,
            other => {
                self.phase = other;
                return false;
            }
        };

        log::info!("Design {} staged", design.name);
        self.error = None;
        self.phase = Phase::DesignStaged {
            base,
            design,
            transform: PlacementTransform::default(),
        };
        true
    }

    /// Surface a design file that could not be read
    pub fn design_load_failed(&mut self, reason: impl fmt::Display) {
        log::warn!("Design file rejected: {}", reason);
        self.error = Some(format!("Could not read design file: {}", reason));
    }

    /// Update the placement while positioning
    pub fn set_transform(&mut self, new_transform: PlacementTransform) {
        if self.applying {
            return;
        }
        if let Phase::DesignStaged { transform, .. } = &mut self.phase {
            *transform = new_transform;
        }
    }

    /// Start compositing the staged design onto the mockup
    pub fn apply(&mut self) -> Option<CompositeTicket> {
        if !self.can_apply() {
            return None;
        }

        let (base, design, transform) = match &self.phase {
            Phase::DesignStaged {
                base,
                design,
                transform,
            } => (base.data.clone(), design.image.clone(), *transform),
            _ => return None,
        };

        self.applying = true;
        self.error = None;

        let id = self.next_request();
        let prompt = prompt::compose_composite_prompt(&transform);
        log::info!(
            "Composite {} requested at ({:.1}%, {:.1}%) scale {:.2}",
            id,
            transform.x,
            transform.y,
            transform.scale
        );

        Some(CompositeTicket {
            id,
            base,
            design,
            prompt,
        })
    }

    /// Record the outcome of a composite call. Returns false if dropped.
    ///
    /// On failure the staged design and its placement are kept for a retry.
    pub fn finish_composite<E: fmt::Display>(
        &mut self,
        id: RequestId,
        result: Result<ImageData, E>,
    ) -> bool {
        if !self.applying || !self.is_current(id) {
            log::warn!("Discarding stale composite response {}", id);
            return false;
        }

        self.applying = false;

        match result {
            Ok(image) => {
                log::info!("Composite {} complete ({} bytes)", id, image.bytes.len());
                self.phase = match std::mem::take(&mut self.phase) {
                    Phase::DesignStaged {
                        base,
                        design,
                        transform,
                    } => Phase::Final {
                        base,
                        design,
                        transform,
                        output: Picture::new(image),
                    },
                    other => other,
                };
            }
            Err(e) => {
                log::error!("Composite {} failed: {}", id, e);
                self.error = Some(COMPOSITE_FAILED.to_string());
            }
        }

        true
    }

    /// Drop the composited image and go back to positioning
    pub fn adjust_design(&mut self) {
        self.phase = match std::mem::take(&mut self.phase) {
            Phase::Final {
                base,
                design,
                transform,
                ..
            } => Phase::DesignStaged {
                base,
                design,
                transform,
            },
            other => other,
        };
    }

    /// Discard everything and return to the initial state
    ///
    /// Options are kept. Calls still in flight are invalidated.
    pub fn start_over(&mut self) {
        self.phase = Phase::Empty;
        self.description = DEFAULT_DESCRIPTION.to_string();
        self.error = None;
        self.generating = false;
        self.applying = false;
        self.latest_request += 1;
    }
}
