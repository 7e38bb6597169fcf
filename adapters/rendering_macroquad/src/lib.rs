#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Macroquad-backed rendering adapter for Circle Dash.
//!
//! The game makes no sound, so macroquad is built without its `audio` feature.
//!
//! Play/Restart/Auto-Play and the point field are drawn with macroquad's
//! immediate-mode UI; those calls stay inside the `ui` module.

mod ui;

use self::ui::{draw_control_panel_ui, ControlPanelUiContext, ControlPanelUiResult};
use anyhow::Result;
use circle_dash_rendering::{
    CirclePresentation, Color, FrameInput, Presentation, RenderingBackend, Scene, CIRCLE_RADIUS,
};
use glam::Vec2;
use macroquad::{
    input::{is_key_pressed, is_mouse_button_pressed, mouse_position, KeyCode, MouseButton},
    math::Vec2 as MacroquadVec2,
    text::{draw_text, measure_text},
};
use std::time::Duration;

/// Height reserved above the play area for the control panel.
const PANEL_HEIGHT: f32 = 150.0;
/// Width of the UI window hosting the point field and buttons.
const PANEL_UI_WIDTH: f32 = 280.0;
/// Gap kept between the play area and the window edges.
const MARGIN: f32 = 16.0;

/// Tracks UI-sourced interactions so they can be merged with physical input on the next frame.
#[doc(hidden)]
#[derive(Clone, Copy, Debug, Default)]
pub struct ControlPanelInputState {
    play_latched: bool,
    restart_latched: bool,
    auto_play_latched: bool,
}

impl ControlPanelInputState {
    /// Returns whether the Play button was pressed and clears the latch so the
    /// action fires only once.
    pub fn take_play(&mut self) -> bool {
        std::mem::take(&mut self.play_latched)
    }

    /// Records that the Play button was pressed this frame.
    pub fn register_play(&mut self) {
        self.play_latched = true;
    }

    /// Returns whether the Restart button was pressed, clearing the latch.
    pub fn take_restart(&mut self) -> bool {
        std::mem::take(&mut self.restart_latched)
    }

    /// Records that the Restart button was pressed this frame.
    pub fn register_restart(&mut self) {
        self.restart_latched = true;
    }

    /// Returns whether the Auto-Play button was pressed, clearing the latch.
    pub fn take_auto_play(&mut self) -> bool {
        std::mem::take(&mut self.auto_play_latched)
    }

    /// Records that the Auto-Play button was pressed this frame.
    pub fn register_auto_play(&mut self) {
        self.auto_play_latched = true;
    }
}

/// Snapshot of edge-triggered keyboard shortcuts observed during a single frame.
#[derive(Clone, Copy, Debug, Default)]
struct KeyboardShortcuts {
    /// `Escape` quits the game loop.
    quit_requested: bool,
    /// `Enter` acts like the Play button.
    play: bool,
}

impl KeyboardShortcuts {
    fn poll() -> Self {
        Self {
            quit_requested: is_key_pressed(KeyCode::Escape),
            play: is_key_pressed(KeyCode::Enter),
        }
    }
}

/// Rendering backend implemented on top of macroquad.
#[derive(Debug, Default)]
pub struct MacroquadBackend {
    swap_interval: Option<i32>,
    point_text: String,
}

impl MacroquadBackend {
    /// Returns a backend that requests the platform's default swap interval.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the backend to request a specific swap interval from the platform.
    #[must_use]
    pub fn with_swap_interval(mut self, swap_interval: Option<i32>) -> Self {
        self.swap_interval = swap_interval;
        self
    }

    /// Configures the backend to either synchronise presentation with the display refresh rate
    /// or render as fast as possible.
    #[must_use]
    pub fn with_vsync(self, enabled: bool) -> Self {
        let swap_interval = if enabled { Some(1) } else { Some(0) };
        self.with_swap_interval(swap_interval)
    }

    /// Prefills the point-count field shown before the first game.
    #[must_use]
    pub fn with_point_text(mut self, text: impl Into<String>) -> Self {
        self.point_text = text.into();
        self
    }
}

impl RenderingBackend for MacroquadBackend {
    fn run<F>(self, presentation: Presentation, mut update_scene: F) -> Result<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static,
    {
        let Self {
            swap_interval,
            point_text,
        } = self;

        let Presentation {
            window_title,
            clear_color,
            scene,
        } = presentation;

        let mut config = macroquad::window::Conf {
            window_title,
            window_width: (scene.play_area.width + 2.0 * MARGIN).ceil() as i32,
            window_height: (scene.play_area.height + PANEL_HEIGHT + 2.0 * MARGIN).ceil() as i32,
            ..macroquad::window::Conf::default()
        };
        if let Some(swap_interval) = swap_interval {
            config.platform.swap_interval = Some(swap_interval);
        }

        macroquad::Window::from_config(config, async move {
            let mut scene = scene;
            let background = to_macroquad_color(clear_color);
            let mut control_panel_input = ControlPanelInputState::default();
            let mut point_text = point_text;

            loop {
                let keyboard = KeyboardShortcuts::poll();
                if keyboard.quit_requested {
                    break;
                }

                macroquad::window::clear_background(background);

                let screen_width = macroquad::window::screen_width();
                let screen_height = macroquad::window::screen_height();

                let dt_seconds = macroquad::time::get_frame_time();
                let frame_dt = Duration::from_secs_f32(dt_seconds.max(0.0));
                let metrics_before = SceneMetrics::from_scene(&scene, screen_width, screen_height);
                let latched = LatchedButtons {
                    play: control_panel_input.take_play() || keyboard.play,
                    restart: control_panel_input.take_restart(),
                    auto_play: control_panel_input.take_auto_play(),
                };
                let frame_input =
                    gather_frame_input(&scene, &metrics_before, latched, &point_text);

                update_scene(frame_dt, frame_input, &mut scene);

                if scene.clear_point_input {
                    point_text.clear();
                    scene.clear_point_input = false;
                }

                let metrics = SceneMetrics::from_scene(&scene, screen_width, screen_height);
                draw_play_area(&scene, &metrics);
                draw_circles(&scene, &metrics);
                draw_status(&scene, screen_width);

                let ControlPanelUiResult {
                    play,
                    restart,
                    auto_play,
                } = {
                    let mut control_panel_ui = macroquad::ui::root_ui();
                    draw_control_panel_ui(
                        &mut control_panel_ui,
                        ControlPanelUiContext {
                            origin: MacroquadVec2::new(MARGIN, MARGIN),
                            size: MacroquadVec2::new(PANEL_UI_WIDTH, PANEL_HEIGHT - MARGIN),
                            background,
                            panel: &scene.panel,
                        },
                        &mut point_text,
                    )
                };
                if play {
                    control_panel_input.register_play();
                }
                if restart {
                    control_panel_input.register_restart();
                }
                if auto_play {
                    control_panel_input.register_auto_play();
                }

                macroquad::window::next_frame().await;
            }
        });

        Ok(())
    }
}

/// Button presses carried over from the previous frame's UI pass.
#[derive(Clone, Copy, Debug, Default)]
struct LatchedButtons {
    play: bool,
    restart: bool,
    auto_play: bool,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct SceneMetrics {
    scale: f32,
    offset_x: f32,
    offset_y: f32,
}

impl SceneMetrics {
    fn from_scene(scene: &Scene, screen_width: f32, screen_height: f32) -> Self {
        let available_width = (screen_width - 2.0 * MARGIN).max(0.0);
        let available_height = (screen_height - PANEL_HEIGHT - 2.0 * MARGIN).max(0.0);
        let scale = (available_width / scene.play_area.width)
            .min(available_height / scene.play_area.height)
            .min(1.0)
            .max(0.0);

        let scaled_width = scene.play_area.width * scale;
        Self {
            scale,
            offset_x: MARGIN + (available_width - scaled_width) * 0.5,
            offset_y: PANEL_HEIGHT + MARGIN,
        }
    }

    fn to_screen(&self, point: Vec2) -> Vec2 {
        Vec2::new(
            self.offset_x + point.x * self.scale,
            self.offset_y + point.y * self.scale,
        )
    }

    fn to_play_area(&self, screen: Vec2) -> Option<Vec2> {
        if self.scale <= f32::EPSILON {
            return None;
        }
        Some(Vec2::new(
            (screen.x - self.offset_x) / self.scale,
            (screen.y - self.offset_y) / self.scale,
        ))
    }
}

fn gather_frame_input(
    scene: &Scene,
    metrics: &SceneMetrics,
    latched: LatchedButtons,
    point_text: &str,
) -> FrameInput {
    let (cursor_x, cursor_y) = mouse_position();
    let click = is_mouse_button_pressed(MouseButton::Left);
    gather_frame_input_from_observations(
        scene,
        metrics,
        Vec2::new(cursor_x, cursor_y),
        click,
        latched,
        point_text,
    )
}

fn gather_frame_input_from_observations(
    scene: &Scene,
    metrics: &SceneMetrics,
    cursor_position: Vec2,
    click: bool,
    latched: LatchedButtons,
    point_text: &str,
) -> FrameInput {
    let cursor = metrics
        .to_play_area(cursor_position)
        .filter(|point| scene.play_area.contains(*point));

    FrameInput {
        cursor,
        click: click && cursor.is_some(),
        play_pressed: latched.play,
        restart_pressed: latched.restart,
        auto_play_pressed: latched.auto_play,
        point_text: point_text.to_owned(),
    }
}

fn draw_play_area(scene: &Scene, metrics: &SceneMetrics) {
    let top_left = metrics.to_screen(Vec2::ZERO);
    macroquad::shapes::draw_rectangle_lines(
        top_left.x,
        top_left.y,
        scene.play_area.width * metrics.scale,
        scene.play_area.height * metrics.scale,
        2.0,
        to_macroquad_color(scene.play_area.border),
    );
}

fn draw_circles(scene: &Scene, metrics: &SceneMetrics) {
    if metrics.scale <= f32::EPSILON {
        return;
    }

    let radius = CIRCLE_RADIUS * metrics.scale;
    let border_thickness = (radius * 0.08).max(1.0);

    for circle in scene.draw_order() {
        if circle.opacity <= f32::EPSILON {
            continue;
        }
        let center = metrics.to_screen(circle.center());
        macroquad::shapes::draw_circle(
            center.x,
            center.y,
            radius,
            to_macroquad_color(circle.fill.fade(circle.opacity)),
        );
        macroquad::shapes::draw_circle_lines(
            center.x,
            center.y,
            radius,
            border_thickness,
            to_macroquad_color(
                circle_dash_rendering::palette::CIRCLE_BORDER.fade(circle.opacity),
            ),
        );
        draw_circle_text(circle, center, metrics.scale);
    }
}

fn draw_circle_text(circle: &CirclePresentation, center: Vec2, scale: f32) {
    let color = to_macroquad_color(circle.text.fade(circle.opacity));
    let id_label = circle.id.to_string();
    let id_size = (18.0 * scale).max(8.0) as u16;
    let id_dims = measure_text(&id_label, None, id_size, 1.0);
    let id_baseline = if circle.countdown_label.is_some() {
        center.y
    } else {
        center.y + id_dims.height * 0.5
    };
    draw_label(
        &id_label,
        center.x - id_dims.width * 0.5,
        id_baseline,
        f32::from(id_size),
        color,
    );

    if let Some(label) = &circle.countdown_label {
        let size = (13.0 * scale).max(7.0) as u16;
        let dims = measure_text(label, None, size, 1.0);
        draw_label(
            label,
            center.x - dims.width * 0.5,
            center.y + dims.height + 2.0,
            f32::from(size),
            color,
        );
    }
}

fn draw_status(scene: &Scene, screen_width: f32) {
    let left = MARGIN * 2.0 + PANEL_UI_WIDTH;
    if left >= screen_width {
        return;
    }

    draw_label(
        scene.status.text(),
        left,
        MARGIN + 28.0,
        32.0,
        to_macroquad_color(scene.status.color()),
    );

    let ink = to_macroquad_color(circle_dash_rendering::palette::INK);
    draw_label(
        &format!("Time: {}", scene.elapsed_label()),
        left,
        MARGIN + 64.0,
        24.0,
        ink,
    );

    if let Some(hint) = scene.next_hint_label() {
        draw_label(&hint, left, MARGIN + 96.0, 24.0, ink);
    }
}

fn draw_label(text: &str, x: f32, y: f32, font_size: f32, color: macroquad::color::Color) {
    let _ = draw_text(text, x, y, font_size, color);
}

fn to_macroquad_color(color: Color) -> macroquad::color::Color {
    macroquad::color::Color::new(color.red, color.green, color.blue, color.alpha)
}

#[cfg(test)]
mod tests {
    use super::*;
    use circle_dash_core::{CircleId, CircleSnapshot, GamePhase, Position, Tenths};
    use circle_dash_rendering::{palette, PlayAreaPresentation};

    fn scene_with_circle(x: f32, y: f32) -> Scene {
        let area = PlayAreaPresentation::new(800.0, 384.0, palette::INK).expect("valid area");
        let mut scene = Scene::new(area);
        scene.circles = vec![CirclePresentation::from_snapshot(
            &CircleSnapshot {
                id: CircleId::new(1),
                position: Position::new(x, y),
                countdown: Tenths::new(30),
                counting: false,
            },
            1,
            GamePhase::InProgress,
        )];
        scene
    }

    #[test]
    fn metrics_keep_native_scale_when_window_fits() {
        let scene = scene_with_circle(0.0, 0.0);
        let metrics = SceneMetrics::from_scene(
            &scene,
            800.0 + 2.0 * MARGIN,
            384.0 + PANEL_HEIGHT + 2.0 * MARGIN,
        );

        assert_eq!(metrics.scale, 1.0);
        assert_eq!(metrics.offset_x, MARGIN);
        assert_eq!(metrics.offset_y, PANEL_HEIGHT + MARGIN);
    }

    #[test]
    fn metrics_shrink_to_fit_small_windows() {
        let scene = scene_with_circle(0.0, 0.0);
        let metrics = SceneMetrics::from_scene(&scene, 400.0 + 2.0 * MARGIN, 2_000.0);

        assert!((metrics.scale - 0.5).abs() < 1e-6);
    }

    #[test]
    fn screen_and_play_area_coordinates_round_trip() {
        let scene = scene_with_circle(0.0, 0.0);
        let metrics = SceneMetrics::from_scene(&scene, 1_000.0, 800.0);
        let point = Vec2::new(123.0, 45.0);

        let back = metrics
            .to_play_area(metrics.to_screen(point))
            .expect("positive scale");
        assert!((back - point).length() < 1e-3);
    }

    #[test]
    fn click_only_reported_inside_play_area() {
        let scene = scene_with_circle(100.0, 100.0);
        let metrics = SceneMetrics::from_scene(&scene, 1_000.0, 800.0);

        let outside = gather_frame_input_from_observations(
            &scene,
            &metrics,
            Vec2::new(5.0, 5.0),
            true,
            LatchedButtons::default(),
            "",
        );
        assert!(outside.cursor.is_none());
        assert!(!outside.click);

        let on_circle = metrics.to_screen(Vec2::new(122.0, 122.0));
        let inside = gather_frame_input_from_observations(
            &scene,
            &metrics,
            on_circle,
            true,
            LatchedButtons::default(),
            "",
        );
        let cursor = inside.cursor.expect("cursor inside play area");
        assert!(inside.click);
        assert_eq!(scene.circle_at(cursor), Some(CircleId::new(1)));
    }

    #[test]
    fn latched_buttons_and_text_are_forwarded() {
        let scene = scene_with_circle(0.0, 0.0);
        let metrics = SceneMetrics::from_scene(&scene, 1_000.0, 800.0);

        let input = gather_frame_input_from_observations(
            &scene,
            &metrics,
            Vec2::ZERO,
            false,
            LatchedButtons {
                play: true,
                restart: false,
                auto_play: true,
            },
            "12",
        );

        assert!(input.play_pressed);
        assert!(!input.restart_pressed);
        assert!(input.auto_play_pressed);
        assert_eq!(input.point_text, "12");
    }

    #[test]
    fn degenerate_window_disables_pointer() {
        let scene = scene_with_circle(0.0, 0.0);
        let metrics = SceneMetrics::from_scene(&scene, 0.0, 0.0);

        assert_eq!(metrics.scale, 0.0);
        assert!(metrics.to_play_area(Vec2::new(10.0, 10.0)).is_none());
    }
}
