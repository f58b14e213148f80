/// View helpers for the main window
///
/// Left column: description, options, design upload.
/// Right column: loading, error, placement canvas or final image.

use std::fmt::Display;

use iced::widget::{button, canvas, column, container, image, row, text, text_input, Column, Row};
use iced::{Alignment, Color, Element, Length};

use super::placement::PlacementCanvas;
use crate::state::options::{DisplayStyle, FabricQuality, StitchingDetail};
use crate::state::session::{Phase, Session};
use crate::Message;

/// Side of the square image area
pub const DISPLAY_SIZE: f32 = 560.0;

const ERROR_COLOR: Color = Color::from_rgb(0.97, 0.44, 0.44);
const MUTED_COLOR: Color = Color::from_rgb(0.6, 0.6, 0.65);

/// Step 1: description + generate
pub fn description_panel(session: &Session, service_ready: bool) -> Element<'_, Message> {
    let editable = !session.is_generating();

    let input = text_input("e.g., A white t-shirt made of heavy cotton...", session.description())
        .on_input_maybe(editable.then_some(Message::DescriptionEdited))
        .on_submit(Message::Generate)
        .padding(12);

    let label = if session.is_generating() {
        "Generating..."
    } else {
        "Generate Base Mockup"
    };

    let generate = button(text(label).width(Length::Fill).align_x(Alignment::Center))
        .on_press_maybe((service_ready && session.can_submit()).then_some(Message::Generate))
        .width(Length::Fill)
        .padding(12);

    column![
        text("Step 1: Describe the Apparel").size(20),
        input,
        generate,
    ]
    .spacing(12)
    .into()
}

/// Display style, fabric and stitching selectors
pub fn options_panel(session: &Session) -> Element<'_, Message> {
    let options = session.options();
    let locked = session.options_locked();

    column![
        text("Options").size(16),
        choice_row(
            "Display Style",
            &DisplayStyle::ALL,
            options.display_style,
            locked,
            Message::DisplayStyleSelected,
        ),
        choice_row(
            "Fabric Quality",
            &FabricQuality::ALL,
            options.fabric_quality,
            locked,
            Message::FabricQualitySelected,
        ),
        choice_row(
            "Stitching Detail",
            &StitchingDetail::ALL,
            options.stitching_detail,
            locked,
            Message::StitchingDetailSelected,
        ),
    ]
    .spacing(12)
    .into()
}

/// Exclusive choice rendered as a row of buttons
fn choice_row<'a, T>(
    label: &'a str,
    choices: &[T],
    selected: T,
    locked: bool,
    on_select: fn(T) -> Message,
) -> Element<'a, Message>
where
    T: Copy + PartialEq + Display + 'a,
{
    let buttons = choices.iter().fold(Row::new().spacing(8), |buttons, &choice| {
        let style = if choice == selected {
            button::primary
        } else {
            button::secondary
        };

        buttons.push(
            button(text(choice.to_string()).width(Length::Fill).align_x(Alignment::Center))
                .style(style)
                .width(Length::Fill)
                .on_press_maybe((!locked).then(|| on_select(choice))),
        )
    });

    column![text(label).size(14).color(MUTED_COLOR), buttons]
        .spacing(6)
        .into()
}

/// Step 2: choose a design file and apply it
pub fn upload_panel(session: &Session) -> Element<'_, Message> {
    let file_label = match session.phase().design() {
        Some(design) => design.name.as_str(),
        None => "Choose a file (PNG recommended)...",
    };

    let choose = button(text(file_label))
        .style(button::secondary)
        .on_press_maybe(session.can_select_design().then_some(Message::PickDesign))
        .width(Length::Fill)
        .padding(10);

    let apply_label = if session.is_applying() {
        "Applying..."
    } else {
        "Apply Design"
    };

    let apply = button(text(apply_label).width(Length::Fill).align_x(Alignment::Center))
        .style(button::success)
        .on_press_maybe(session.can_apply().then_some(Message::ApplyDesign))
        .width(Length::Fill)
        .padding(12);

    // Discards the mockup from any step, also while a call is in flight
    let start_over = button(text("Start Over").width(Length::Fill).align_x(Alignment::Center))
        .style(button::secondary)
        .on_press(Message::StartOver)
        .width(Length::Fill)
        .padding(10);

    column![
        text("Step 2: Upload & Position Design").size(20),
        text("Upload Design File").size(14).color(MUTED_COLOR),
        choose,
        apply,
        start_over,
    ]
    .spacing(12)
    .into()
}

/// Right-hand image area
pub fn display_panel(session: &Session) -> Element<'_, Message> {
    let content: Element<'_, Message> = if session.is_busy() {
        let status = if session.is_generating() {
            "Generating your 8K mockup..."
        } else {
            "Applying your design..."
        };
        centered_message(status, "This may take a moment.", MUTED_COLOR)
    } else {
        let body: Element<'_, Message> = match session.phase() {
            Phase::Empty => centered_message(
                "Your generated mockup will appear here.",
                "",
                MUTED_COLOR,
            ),
            Phase::BaseReady { base } => placement_canvas(PlacementCanvas {
                base: base.handle.clone(),
                design: None,
                transform: Default::default(),
                enabled: false,
            }),
            Phase::DesignStaged {
                base,
                design,
                transform,
            } => placement_canvas(PlacementCanvas {
                base: base.handle.clone(),
                design: Some(design.preview.clone()),
                transform: *transform,
                enabled: !session.is_applying(),
            }),
            Phase::Final { output, .. } => final_view(output.handle.clone()),
        };

        // With an image on screen the error sits above it so the user can retry
        match (session.error(), session.phase()) {
            (Some(error), Phase::Empty) => centered_message("An error occurred", error, ERROR_COLOR),
            (Some(error), _) => column![text(error).size(14).color(ERROR_COLOR), body]
                .spacing(8)
                .into(),
            (None, _) => body,
        }
    };

    container(content)
        .width(Length::Fixed(DISPLAY_SIZE))
        .height(Length::Fixed(DISPLAY_SIZE))
        .center_x(Length::Fixed(DISPLAY_SIZE))
        .center_y(Length::Fixed(DISPLAY_SIZE))
        .style(container::bordered_box)
        .into()
}

fn placement_canvas<'a>(program: PlacementCanvas) -> Element<'a, Message> {
    canvas(program)
        .width(Length::Fill)
        .height(Length::Fill)
        .into()
}

fn final_view<'a>(output: image::Handle) -> Element<'a, Message> {
    let actions = row![
        button(text("Adjust Design").width(Length::Fill).align_x(Alignment::Center))
            .on_press(Message::AdjustDesign)
            .width(Length::Fill)
            .padding(10),
        button(text("Start Over").width(Length::Fill).align_x(Alignment::Center))
            .style(button::secondary)
            .on_press(Message::StartOver)
            .width(Length::Fill)
            .padding(10),
    ]
    .spacing(12);

    column![
        image(output).width(Length::Fill).height(Length::FillPortion(6)),
        actions,
    ]
    .spacing(12)
    .padding(8)
    .align_x(Alignment::Center)
    .into()
}

fn centered_message<'a>(title: &'a str, detail: &'a str, color: Color) -> Element<'a, Message> {
    let mut content: Column<'a, Message> = column![text(title).size(18).color(color)]
        .spacing(6)
        .align_x(Alignment::Center);

    if !detail.is_empty() {
        content = content.push(text(detail).size(14).color(color));
    }

    container(content).padding(16).into()
}
