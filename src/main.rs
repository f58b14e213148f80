use iced::widget::{column, container, horizontal_rule, row, scrollable, text};
use iced::{Alignment, Element, Length, Task, Theme};
use rfd::FileDialog;
use std::sync::Arc;

mod config;
mod prompt;
mod service;
mod state;
mod ui;

use service::gemini::GeminiClient;
use service::upload::{self, DesignFile, UploadError};
use service::{ImageData, ImageService, ServiceError};
use state::options::{DisplayStyle, FabricQuality, StitchingDetail};
use state::session::{RequestId, Session};
use state::transform::PlacementTransform;

/// Main application state
struct MockupStudio {
    /// The generate / place / apply workflow
    session: Session,
    /// Remote image service, None if configuration failed
    service: Option<Arc<dyn ImageService>>,
    /// Why the service is unavailable
    startup_error: Option<String>,
}

/// Application messages (events)
#[derive(Debug, Clone)]
pub enum Message {
    /// Description text edited
    DescriptionEdited(String),
    DisplayStyleSelected(DisplayStyle),
    FabricQualitySelected(FabricQuality),
    StitchingDetailSelected(StitchingDetail),
    /// User asked for a new base mockup
    Generate,
    /// Background generation finished
    GenerationFinished(RequestId, Result<ImageData, Arc<ServiceError>>),
    /// User clicked the design file chooser
    PickDesign,
    /// Background file read finished
    DesignLoaded(Result<DesignFile, Arc<UploadError>>),
    /// Placement canvas moved or resized the design
    TransformChanged(PlacementTransform),
    /// User asked to composite the design
    ApplyDesign,
    /// Background composite finished
    CompositeFinished(RequestId, Result<ImageData, Arc<ServiceError>>),
    /// Back from the final image to positioning
    AdjustDesign,
    /// Discard everything
    StartOver,
}

impl MockupStudio {
    /// Create a new instance of the application
    fn new() -> (Self, Task<Message>) {
        let service = config::Config::load()
            .map_err(|e| e.to_string())
            .and_then(|config| {
                log::info!(
                    "Using {} (generate: {}, composite: {})",
                    config.base_url,
                    config.generation_model,
                    config.composite_model
                );
                GeminiClient::new(config).map_err(|e| e.to_string())
            });

        let app = match service {
            Ok(client) => Self::with_service(Arc::new(client)),
            Err(e) => {
                log::error!("Image service unavailable: {}", e);
                MockupStudio {
                    session: Session::new(),
                    service: None,
                    startup_error: Some(e),
                }
            }
        };

        (app, Task::none())
    }

    fn with_service(service: Arc<dyn ImageService>) -> Self {
        MockupStudio {
            session: Session::new(),
            service: Some(service),
            startup_error: None,
        }
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::DescriptionEdited(description) => {
                self.session.set_description(description);
                Task::none()
            }
            Message::DisplayStyleSelected(style) => {
                self.session.set_display_style(style);
                Task::none()
            }
            Message::FabricQualitySelected(quality) => {
                self.session.set_fabric_quality(quality);
                Task::none()
            }
            Message::StitchingDetailSelected(detail) => {
                self.session.set_stitching_detail(detail);
                Task::none()
            }
            Message::Generate => {
                let Some(service) = self.service.clone() else {
                    let reason = self.startup_error.as_deref().unwrap_or("not configured");
                    self.session.service_unavailable(reason);
                    return Task::none();
                };
                let Some(ticket) = self.session.submit() else {
                    return Task::none();
                };

                Task::perform(
                    async move {
                        let result = service.generate(&ticket.prompt).await.map_err(Arc::new);
                        (ticket.id, result)
                    },
                    |(id, result)| Message::GenerationFinished(id, result),
                )
            }
            Message::GenerationFinished(id, result) => {
                self.session.finish_generation(id, result);
                Task::none()
            }
            Message::PickDesign => {
                if !self.session.can_select_design() {
                    return Task::none();
                }

                // Show the native file picker dialog
                let file = FileDialog::new()
                    .set_title("Choose a design file")
                    .add_filter("Images", &upload::ACCEPTED_EXTENSIONS)
                    .pick_file();

                match file {
                    Some(path) => Task::perform(upload::load_design_file(path), |result| {
                        Message::DesignLoaded(result.map_err(Arc::new))
                    }),
                    None => Task::none(),
                }
            }
            Message::DesignLoaded(Ok(design)) => {
                self.session.select_design(design);
                Task::none()
            }
            Message::DesignLoaded(Err(e)) => {
                self.session.design_load_failed(e);
                Task::none()
            }
            Message::TransformChanged(transform) => {
                self.session.set_transform(transform);
                Task::none()
            }
            Message::ApplyDesign => {
                let Some(service) = self.service.clone() else {
                    return Task::none();
                };
                let Some(ticket) = self.session.apply() else {
                    return Task::none();
                };

                Task::perform(
                    async move {
                        let result = service
                            .composite(&ticket.base, &ticket.design, &ticket.prompt)
                            .await
                            .map_err(Arc::new);
                        (ticket.id, result)
                    },
                    |(id, result)| Message::CompositeFinished(id, result),
                )
            }
            Message::CompositeFinished(id, result) => {
                self.session.finish_composite(id, result);
                Task::none()
            }
            Message::AdjustDesign => {
                self.session.adjust_design();
                Task::none()
            }
            Message::StartOver => {
                self.session.start_over();
                Task::none()
            }
        }
    }

    /// Build the user interface
    fn view(&self) -> Element<'_, Message> {
        let mut controls = column![
            text("8K Clothing Mockup Generator").size(32),
            text("Describe your vision and get a photorealistic mockup in seconds.").size(14),
        ]
        .spacing(20);

        if let Some(error) = &self.startup_error {
            controls = controls.push(
                text(error.as_str())
                    .size(14)
                    .color(iced::Color::from_rgb(0.97, 0.44, 0.44)),
            );
        }

        controls = controls
            .push(ui::panels::description_panel(&self.session, self.service.is_some()))
            .push(ui::panels::options_panel(&self.session));

        // Uploading only makes sense while a mockup is shown without a result
        if self.session.phase().base().is_some() && self.session.phase().output().is_none() {
            controls = controls
                .push(horizontal_rule(1))
                .push(ui::panels::upload_panel(&self.session));
        }

        let content = row![
            scrollable(controls.width(Length::Fixed(420.0)).padding(8)),
            ui::panels::display_panel(&self.session),
        ]
        .spacing(32)
        .padding(32)
        .align_y(Alignment::Start);

        container(content)
            .width(Length::Fill)
            .height(Length::Fill)
            .center_x(Length::Fill)
            .into()
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Dark
    }
}

fn main() -> iced::Result {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("mockup_studio=info"))
        .init();

    iced::application(
        "Mockup Studio",
        MockupStudio::update,
        MockupStudio::view,
    )
    .theme(MockupStudio::theme)
    .window_size((1100.0, 720.0))
    .centered()
    .run_with(MockupStudio::new)
}
