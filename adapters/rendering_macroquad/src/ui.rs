//! Immediate-mode UI helpers for the Macroquad rendering backend.
//!
//! This module hosts all uses of `macroquad::ui` so the rest of the adapter can
//! remain agnostic of Macroquad's UI types.

use circle_dash_rendering::ControlPanelPresentation;
use macroquad::{
    color::{Color, BLACK, WHITE},
    math::{RectOffset, Vec2},
    ui::{hash, Ui},
};

/// Buttons pressed while drawing the control panel this frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct ControlPanelUiResult {
    /// Whether the Play button was pressed.
    pub play: bool,
    /// Whether the Restart button was pressed.
    pub restart: bool,
    /// Whether the Auto-Play button was pressed.
    pub auto_play: bool,
}

/// Snapshot of the control panel's UI layout and data for the current frame.
#[derive(Clone, Copy, Debug)]
pub(crate) struct ControlPanelUiContext<'a> {
    /// Top-left corner of the panel in screen coordinates.
    pub origin: Vec2,
    /// Panel dimensions in screen space.
    pub size: Vec2,
    /// Background colour applied to the window skin so the panel blends with the frame.
    pub background: Color,
    /// Buttons and feedback to show.
    pub panel: &'a ControlPanelPresentation,
}

/// Renders the control panel's interactive elements for the current frame.
pub(crate) fn draw_control_panel_ui(
    ui: &mut Ui,
    context: ControlPanelUiContext<'_>,
    point_text: &mut String,
) -> ControlPanelUiResult {
    let mut skin = ui.default_skin();
    skin.margin = 0.0;

    let window_style = ui
        .style_builder()
        .color(context.background)
        .color_hovered(context.background)
        .color_clicked(context.background)
        .color_selected(context.background)
        .color_selected_hovered(context.background)
        .color_inactive(context.background)
        .text_color(BLACK)
        .margin(RectOffset::new(8.0, 8.0, 8.0, 8.0))
        .build();
    skin.window_style = window_style;

    let button_style = ui
        .style_builder()
        .text_color(WHITE)
        .text_color_hovered(WHITE)
        .text_color_clicked(WHITE)
        .color(Color::from_rgba(194, 65, 12, 255))
        .color_hovered(Color::from_rgba(214, 95, 42, 255))
        .color_clicked(Color::from_rgba(154, 52, 10, 255))
        .color_inactive(Color::from_rgba(194, 65, 12, 200))
        .margin(RectOffset::new(8.0, 8.0, 4.0, 4.0))
        .build();
    skin.button_style = button_style;

    ui.push_skin(&skin);

    let panel = context.panel;
    let mut result = ControlPanelUiResult::default();
    let _ = ui.window(hash!("control_panel"), context.origin, context.size, |ui| {
        if panel.show_play {
            ui.input_text(hash!("points"), "Points", point_text);
            result.play = ui.button(None, "Play");
        }
        if panel.show_restart {
            result.restart = ui.button(None, "Restart");
        }
        if let Some(auto_play) = panel.auto_play {
            result.auto_play = ui.button(None, auto_play.label());
        }
        if let Some(feedback) = &panel.feedback {
            ui.label(None, feedback);
        }
    });

    ui.pop_skin();

    result
}
