/// Interactive design placement on top of the mockup
///
/// The overlay is a square centered at (x%, y%) of the container with a
/// side of `base_size * scale`, where the base size is one fifth of the
/// container width. Pressing on the overlay body starts a drag, pressing on
/// the round handle at its bottom-right corner starts a resize. Releasing
/// the button anywhere, even outside the canvas, ends the gesture.

use iced::mouse::{self, Cursor};
use iced::widget::canvas::{self, LineDash, Path, Program, Stroke};
use iced::widget::image::Handle;
use iced::{Color, Point, Rectangle, Renderer, Size, Theme, Vector};

use crate::state::transform::{clamp_scale, PlacementTransform};
use crate::Message;

/// Base design size as a fraction of the container width (scale 1.0)
const BASE_SIZE_RATIO: f32 = 0.2;

/// Drawn radius of the resize handle
const HANDLE_RADIUS: f32 = 7.0;

/// Grab radius around the handle center
const HANDLE_HIT_RADIUS: f32 = 10.0;

const OUTLINE_DASH: [f32; 2] = [6.0, 4.0];

/// Side length of the overlay at scale 1.0
pub fn base_size(container: Size) -> f32 {
    container.width * BASE_SIZE_RATIO
}

/// Overlay square in container coordinates
pub fn overlay_bounds(transform: &PlacementTransform, container: Size) -> Rectangle {
    let side = base_size(container) * transform.scale;
    let center = Point::new(
        transform.x * container.width / 100.0,
        transform.y * container.height / 100.0,
    );
    Rectangle {
        x: center.x - side / 2.0,
        y: center.y - side / 2.0,
        width: side,
        height: side,
    }
}

/// Center of the resize handle
pub fn handle_center(overlay: &Rectangle) -> Point {
    Point::new(overlay.x + overlay.width, overlay.y + overlay.height)
}

/// What a pointer press landed on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hit {
    Handle,
    Body,
    Outside,
}

/// Hit-test a point; the handle wins over the body it overlaps
pub fn hit_test(transform: &PlacementTransform, container: Size, point: Point) -> Hit {
    let overlay = overlay_bounds(transform, container);
    if handle_center(&overlay).distance(point) <= HANDLE_HIT_RADIUS {
        Hit::Handle
    } else if overlay.contains(point) {
        Hit::Body
    } else {
        Hit::Outside
    }
}

/// Pointer gesture in progress
///
/// All points are relative to the container's top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Gesture {
    #[default]
    Idle,
    Dragging {
        pointer_start: Point,
        center_start: Point,
    },
    Resizing {
        pointer_start: Point,
        size_start: f32,
    },
}

impl Gesture {
    pub fn is_active(&self) -> bool {
        !matches!(self, Gesture::Idle)
    }

    /// Begin a drag or resize. Returns true if a gesture started.
    pub fn press(
        &mut self,
        pointer: Point,
        transform: &PlacementTransform,
        container: Size,
        enabled: bool,
    ) -> bool {
        if !enabled || self.is_active() {
            return false;
        }

        let overlay = overlay_bounds(transform, container);
        *self = match hit_test(transform, container, pointer) {
            Hit::Handle => Gesture::Resizing {
                pointer_start: pointer,
                size_start: overlay.width,
            },
            Hit::Body => Gesture::Dragging {
                pointer_start: pointer,
                center_start: overlay.center(),
            },
            Hit::Outside => return false,
        };
        true
    }

    /// Transform implied by the pointer's current position, if any
    pub fn pointer_moved(
        &self,
        pointer: Point,
        transform: &PlacementTransform,
        container: Size,
    ) -> Option<PlacementTransform> {
        if container.width <= 0.0 || container.height <= 0.0 {
            return None;
        }

        match *self {
            Gesture::Idle => None,
            Gesture::Dragging {
                pointer_start,
                center_start,
            } => {
                let moved = center_start + (pointer - pointer_start);
                let x = moved.x.clamp(0.0, container.width);
                let y = moved.y.clamp(0.0, container.height);

                Some(PlacementTransform::new(
                    x * 100.0 / container.width,
                    y * 100.0 / container.height,
                    transform.scale,
                ))
            }
            Gesture::Resizing {
                pointer_start,
                size_start,
            } => {
                // Uniform scaling follows the larger of the two deltas
                let delta = (pointer.x - pointer_start.x).max(pointer.y - pointer_start.y);
                let scale = clamp_scale((size_start + delta) / base_size(container));

                Some(transform.with_scale(scale))
            }
        }
    }

    /// End any gesture. Returns true if one was active.
    pub fn release(&mut self) -> bool {
        let was_active = self.is_active();
        *self = Gesture::Idle;
        was_active
    }
}

/// Canvas showing the mockup with the draggable design on top
pub struct PlacementCanvas {
    /// The blank mockup filling the canvas
    pub base: Handle,
    /// Design preview; no overlay is drawn without one
    pub design: Option<Handle>,
    pub transform: PlacementTransform,
    /// False while the design is being applied
    pub enabled: bool,
}

impl Program<Message> for PlacementCanvas {
    type State = Gesture;

    fn draw(
        &self,
        state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: Cursor,
    ) -> Vec<canvas::Geometry> {
        let mut frame = canvas::Frame::new(renderer, bounds.size());
        frame.draw_image(Rectangle::with_size(bounds.size()), &self.base);

        let Some(design) = &self.design else {
            return vec![frame.into_geometry()];
        };

        let overlay = overlay_bounds(&self.transform, bounds.size());
        frame.draw_image(overlay, design);

        let accent = if state.is_active() {
            Color::from_rgb8(0xa5, 0xb4, 0xfc)
        } else {
            Color::from_rgba8(0x81, 0x8c, 0xf8, 0.7)
        };

        frame.stroke(
            &Path::rectangle(overlay.position(), overlay.size()),
            Stroke {
                line_dash: LineDash {
                    segments: &OUTLINE_DASH,
                    offset: 0,
                },
                ..Stroke::default().with_color(accent).with_width(2.0)
            },
        );

        if self.enabled {
            let handle = Path::circle(handle_center(&overlay), HANDLE_RADIUS);
            frame.fill(&handle, Color::from_rgb8(0x63, 0x66, 0xf1));
            frame.stroke(
                &handle,
                Stroke::default()
                    .with_color(Color::from_rgb8(0x11, 0x18, 0x27))
                    .with_width(2.0),
            );
        }

        vec![frame.into_geometry()]
    }

    fn update(
        &self,
        state: &mut Self::State,
        event: canvas::Event,
        bounds: Rectangle,
        cursor: Cursor,
    ) -> (canvas::event::Status, Option<Message>) {
        if self.design.is_none() || !self.enabled {
            state.release();
            return (canvas::event::Status::Ignored, None);
        }

        // Relative to the canvas, also when the cursor has left it
        let pointer = cursor
            .position()
            .map(|p| p - Vector::new(bounds.x, bounds.y));

        match event {
            canvas::Event::Mouse(mouse::Event::ButtonPressed(mouse::Button::Left)) => {
                if let Some(pointer) = cursor.position_in(bounds) {
                    if state.press(pointer, &self.transform, bounds.size(), self.enabled) {
                        return (canvas::event::Status::Captured, None);
                    }
                }
            }

            canvas::Event::Mouse(mouse::Event::ButtonReleased(mouse::Button::Left)) => {
                if state.release() {
                    return (canvas::event::Status::Captured, None);
                }
            }

            canvas::Event::Mouse(mouse::Event::CursorMoved { .. }) => {
                if let Some(pointer) = pointer {
                    if let Some(transform) =
                        state.pointer_moved(pointer, &self.transform, bounds.size())
                    {
                        return (
                            canvas::event::Status::Captured,
                            Some(Message::TransformChanged(transform)),
                        );
                    }
                }
            }

            _ => {}
        }

        (canvas::event::Status::Ignored, None)
    }

    fn mouse_interaction(
        &self,
        state: &Self::State,
        bounds: Rectangle,
        cursor: Cursor,
    ) -> mouse::Interaction {
        match state {
            Gesture::Dragging { .. } => return mouse::Interaction::Grabbing,
            Gesture::Resizing { .. } => return mouse::Interaction::Crosshair,
            Gesture::Idle => {}
        }

        if self.design.is_none() || !self.enabled {
            return mouse::Interaction::Idle;
        }

        match cursor.position_in(bounds) {
            Some(pointer) => match hit_test(&self.transform, bounds.size(), pointer) {
                Hit::Handle => mouse::Interaction::Crosshair,
                Hit::Body => mouse::Interaction::Grab,
                Hit::Outside => mouse::Interaction::Idle,
            },
            None => mouse::Interaction::Idle,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::transform::{MAX_SCALE, MIN_SCALE};

    const CONTAINER: Size = Size {
        width: 500.0,
        height: 400.0,
    };

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-3
    }

    #[test]
    fn test_overlay_geometry() {
        let overlay = overlay_bounds(&PlacementTransform::default(), CONTAINER);
        // base size 100px, scale 0.25 -> 25px square centered at (250, 160)
        assert!(approx(overlay.width, 25.0));
        assert!(approx(overlay.height, 25.0));
        assert!(approx(overlay.center().x, 250.0));
        assert!(approx(overlay.center().y, 160.0));
    }

    #[test]
    fn test_handle_takes_precedence_over_body() {
        let transform = PlacementTransform::new(50.0, 50.0, 1.0);
        let overlay = overlay_bounds(&transform, CONTAINER);
        let corner_inside = handle_center(&overlay) - Vector::new(3.0, 3.0);

        assert_eq!(hit_test(&transform, CONTAINER, corner_inside), Hit::Handle);
        assert_eq!(hit_test(&transform, CONTAINER, overlay.center()), Hit::Body);
        assert_eq!(hit_test(&transform, CONTAINER, Point::new(5.0, 5.0)), Hit::Outside);
    }

    #[test]
    fn test_press_starts_matching_gesture() {
        let transform = PlacementTransform::new(50.0, 50.0, 1.0);
        let overlay = overlay_bounds(&transform, CONTAINER);

        let mut gesture = Gesture::default();
        assert!(gesture.press(overlay.center(), &transform, CONTAINER, true));
        assert!(matches!(gesture, Gesture::Dragging { .. }));

        let mut gesture = Gesture::default();
        assert!(gesture.press(handle_center(&overlay), &transform, CONTAINER, true));
        assert!(matches!(gesture, Gesture::Resizing { size_start, .. } if approx(size_start, 100.0)));

        let mut gesture = Gesture::default();
        assert!(!gesture.press(Point::new(1.0, 1.0), &transform, CONTAINER, true));
        assert_eq!(gesture, Gesture::Idle);
    }

    #[test]
    fn test_disabled_ignores_presses() {
        let transform = PlacementTransform::default();
        let center = overlay_bounds(&transform, CONTAINER).center();

        let mut gesture = Gesture::default();
        assert!(!gesture.press(center, &transform, CONTAINER, false));
        assert!(!gesture.is_active());
    }

    #[test]
    fn test_drag_moves_center() {
        let transform = PlacementTransform::default();
        let start = Point::new(250.0, 160.0);

        let mut gesture = Gesture::default();
        gesture.press(start, &transform, CONTAINER, true);

        let moved = gesture
            .pointer_moved(Point::new(350.0, 120.0), &transform, CONTAINER)
            .unwrap();
        assert!(approx(moved.x, 70.0));
        assert!(approx(moved.y, 30.0));
        assert_eq!(moved.scale, transform.scale);
    }

    #[test]
    fn test_drag_is_clamped_to_container() {
        let transform = PlacementTransform::default();
        let mut gesture = Gesture::default();
        gesture.press(Point::new(250.0, 160.0), &transform, CONTAINER, true);

        let deltas = [
            (-10_000.0, -10_000.0),
            (10_000.0, 10_000.0),
            (-10_000.0, 10_000.0),
            (333.3, -777.7),
            (0.0, 0.0),
            (249.9, 239.9),
        ];
        for (dx, dy) in deltas {
            let moved = gesture
                .pointer_moved(Point::new(250.0 + dx, 160.0 + dy), &transform, CONTAINER)
                .unwrap();
            assert!((0.0..=100.0).contains(&moved.x), "x out of range: {}", moved.x);
            assert!((0.0..=100.0).contains(&moved.y), "y out of range: {}", moved.y);
        }

        let corner = gesture
            .pointer_moved(Point::new(-500.0, 9_000.0), &transform, CONTAINER)
            .unwrap();
        assert_eq!((corner.x, corner.y), (0.0, 100.0));
    }

    #[test]
    fn test_resize_uses_larger_delta() {
        let transform = PlacementTransform::new(50.0, 50.0, 0.5);
        let overlay = overlay_bounds(&transform, CONTAINER);
        let handle = handle_center(&overlay);

        let mut gesture = Gesture::default();
        gesture.press(handle, &transform, CONTAINER, true);

        // 50px + max(30, -20) = 80px over a 100px base
        let resized = gesture
            .pointer_moved(handle + Vector::new(30.0, -20.0), &transform, CONTAINER)
            .unwrap();
        assert!(approx(resized.scale, 0.8));
        assert_eq!((resized.x, resized.y), (50.0, 50.0));
    }

    #[test]
    fn test_resize_is_clamped() {
        let transform = PlacementTransform::new(50.0, 50.0, 0.5);
        let handle = handle_center(&overlay_bounds(&transform, CONTAINER));

        let mut gesture = Gesture::default();
        gesture.press(handle, &transform, CONTAINER, true);

        for delta in [-10_000.0, -49.0, -45.0, 0.0, 99.0, 10_000.0] {
            let resized = gesture
                .pointer_moved(handle + Vector::new(delta, delta), &transform, CONTAINER)
                .unwrap();
            assert!(resized.scale >= MIN_SCALE && resized.scale <= MAX_SCALE);
        }

        let tiny = gesture
            .pointer_moved(handle - Vector::new(400.0, 400.0), &transform, CONTAINER)
            .unwrap();
        assert_eq!(tiny.scale, MIN_SCALE);

        let huge = gesture
            .pointer_moved(handle + Vector::new(400.0, 0.0), &transform, CONTAINER)
            .unwrap();
        assert_eq!(huge.scale, MAX_SCALE);
    }

    #[test]
    fn test_release_returns_to_idle() {
        let transform = PlacementTransform::default();
        let mut gesture = Gesture::default();
        gesture.press(Point::new(250.0, 160.0), &transform, CONTAINER, true);

        assert!(gesture.release());
        assert!(!gesture.release());
        assert_eq!(
            gesture.pointer_moved(Point::new(0.0, 0.0), &transform, CONTAINER),
            None
        );
    }

    #[test]
    fn test_press_during_gesture_is_ignored() {
        let transform = PlacementTransform::new(50.0, 50.0, 1.0);
        let overlay = overlay_bounds(&transform, CONTAINER);

        let mut gesture = Gesture::default();
        gesture.press(overlay.center(), &transform, CONTAINER, true);
        assert!(!gesture.press(handle_center(&overlay), &transform, CONTAINER, true));
        assert!(matches!(gesture, Gesture::Dragging { .. }));
    }

    fn canvas(design: bool, enabled: bool) -> PlacementCanvas {
        PlacementCanvas {
            base: Handle::from_bytes(vec![0u8; 4]),
            design: design.then(|| Handle::from_bytes(vec![0u8; 4])),
            transform: PlacementTransform::default(),
            enabled,
        }
    }

    fn mouse_event(event: mouse::Event) -> canvas::Event {
        canvas::Event::Mouse(event)
    }

    #[test]
    fn test_release_outside_canvas_ends_drag() {
        let program = canvas(true, true);
        let bounds = Rectangle::new(Point::new(10.0, 20.0), CONTAINER);
        let mut state = Gesture::default();

        // Default overlay center is (250, 160) inside the canvas
        let center = Cursor::Available(Point::new(260.0, 180.0));
        let (status, message) = program.update(
            &mut state,
            mouse_event(mouse::Event::ButtonPressed(mouse::Button::Left)),
            bounds,
            center,
        );
        assert_eq!(status, canvas::event::Status::Captured);
        assert!(message.is_none());
        assert!(matches!(state, Gesture::Dragging { .. }));

        let outside = Point::new(2000.0, -50.0);
        let (status, message) = program.update(
            &mut state,
            mouse_event(mouse::Event::CursorMoved { position: outside }),
            bounds,
            Cursor::Available(outside),
        );
        assert_eq!(status, canvas::event::Status::Captured);
        match message {
            Some(Message::TransformChanged(transform)) => {
                assert_eq!(transform.x, 100.0);
                assert_eq!(transform.y, 0.0);
                assert_eq!(transform.scale, 0.25);
            }
            other => panic!("expected a transform change, got {:?}", other),
        }

        let (status, _) = program.update(
            &mut state,
            mouse_event(mouse::Event::ButtonReleased(mouse::Button::Left)),
            bounds,
            Cursor::Available(outside),
        );
        assert_eq!(status, canvas::event::Status::Captured);
        assert_eq!(state, Gesture::Idle);
    }

    #[test]
    fn test_press_ignored_when_disabled_or_without_design() {
        let bounds = Rectangle::with_size(CONTAINER);
        let center = Cursor::Available(Point::new(250.0, 160.0));

        for program in [canvas(true, false), canvas(false, true)] {
            let mut state = Gesture::default();
            let (status, message) = program.update(
                &mut state,
                mouse_event(mouse::Event::ButtonPressed(mouse::Button::Left)),
                bounds,
                center,
            );

            assert_eq!(status, canvas::event::Status::Ignored);
            assert!(message.is_none());
            assert_eq!(state, Gesture::Idle);
        }
    }
}
