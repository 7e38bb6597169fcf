#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Circle Dash adapters.

use anyhow::Result as AnyResult;
use circle_dash_core::{CircleId, CircleSnapshot, GamePhase, Tenths};
use glam::Vec2;
use std::{error::Error, fmt, time::Duration};

/// Radius of a rendered circle in play-area pixels.
pub const CIRCLE_RADIUS: f32 = 22.0;

/// Countdown at or below which a circle switches to its tinted fill.
const TINT_THRESHOLD: Tenths = Tenths::new(29);

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Returns the same color with its alpha multiplied by `opacity`.
    #[must_use]
    pub fn fade(self, opacity: f32) -> Self {
        Self {
            alpha: self.alpha * opacity.clamp(0.0, 1.0),
            ..self
        }
    }
}

/// Palette shared by every backend.
pub mod palette {
    use super::Color;

    /// Window background.
    pub const BACKGROUND: Color = Color::from_rgb_u8(0xff, 0xff, 0xff);
    /// Play area border and default text.
    pub const INK: Color = Color::from_rgb_u8(0x00, 0x00, 0x00);
    /// Fill of circles whose countdown has not started.
    pub const CIRCLE_IDLE: Color = Color::from_rgb_u8(0xff, 0xff, 0xff);
    /// Fill of circles whose countdown is running.
    pub const CIRCLE_ACTIVE: Color = Color::from_rgb_u8(194, 65, 12);
    /// Circle outline.
    pub const CIRCLE_BORDER: Color = Color::from_rgb_u8(194, 65, 12);
    /// Banner shown after a loss.
    pub const GAME_OVER: Color = Color::from_rgb_u8(0xc2, 0x41, 0x0c);
    /// Banner shown after a win.
    pub const ALL_CLEARED: Color = Color::from_rgb_u8(0x16, 0xa3, 0x4a);
    /// Validation feedback text.
    pub const WARNING: Color = Color::from_rgb_u8(0xb9, 0x1c, 0x1c);
}

/// Input snapshot gathered by adapters before updating the scene.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct FrameInput {
    /// Cursor position in play-area pixels, when the cursor is over the play area.
    pub cursor: Option<Vec2>,
    /// Whether the primary mouse button was pressed on this frame.
    pub click: bool,
    /// Whether the Play button was pressed.
    pub play_pressed: bool,
    /// Whether the Restart button was pressed.
    pub restart_pressed: bool,
    /// Whether the Auto-Play button was pressed.
    pub auto_play_pressed: bool,
    /// Current contents of the point-count field.
    pub point_text: String,
}

/// Headline shown above the controls.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StatusBanner {
    /// No result yet.
    Ready,
    /// The last game was lost.
    GameOver,
    /// The last game was won.
    AllCleared,
}

impl StatusBanner {
    /// Derives the banner from the world's phase.
    #[must_use]
    pub const fn from_phase(phase: GamePhase) -> Self {
        match phase {
            GamePhase::GameOver { .. } => Self::GameOver,
            GamePhase::Finished => Self::AllCleared,
            GamePhase::NotStarted | GamePhase::InProgress => Self::Ready,
        }
    }

    /// Text displayed for the banner.
    #[must_use]
    pub const fn text(self) -> &'static str {
        match self {
            Self::Ready => "LET'S PLAY",
            Self::GameOver => "GAME OVER",
            Self::AllCleared => "ALL CLEARED",
        }
    }

    /// Color the banner text is drawn with.
    #[must_use]
    pub const fn color(self) -> Color {
        match self {
            Self::Ready => palette::INK,
            Self::GameOver => palette::GAME_OVER,
            Self::AllCleared => palette::ALL_CLEARED,
        }
    }
}

/// Declarative description of a single circle.
#[derive(Clone, Debug, PartialEq)]
pub struct CirclePresentation {
    /// Identifier of the circle.
    pub id: CircleId,
    /// Top-left corner of the circle's bounding box in play-area pixels.
    pub origin: Vec2,
    /// Overall opacity; zero once the countdown ran out.
    pub opacity: f32,
    /// Whether clicks on the circle reach the simulation.
    pub interactive: bool,
    /// Fill color.
    pub fill: Color,
    /// Color of the id and countdown text.
    pub text: Color,
    /// Remaining countdown formatted for display, once it started moving.
    pub countdown_label: Option<String>,
    /// Stacking order; higher values draw on top.
    pub z_order: u32,
}

impl CirclePresentation {
    /// Derives the presentation of a circle from its snapshot.
    #[must_use]
    pub fn from_snapshot(snapshot: &CircleSnapshot, circle_count: u32, phase: GamePhase) -> Self {
        let expired = snapshot.is_expired();
        let tinted = snapshot.countdown <= TINT_THRESHOLD;
        let countdown_label = snapshot
            .has_started_countdown()
            .then(|| format!("{}s", snapshot.countdown));

        Self {
            id: snapshot.id,
            origin: Vec2::new(snapshot.position.x(), snapshot.position.y()),
            opacity: if expired { 0.0 } else { 1.0 },
            interactive: !expired && !phase.is_terminal(),
            fill: if tinted {
                palette::CIRCLE_ACTIVE
            } else {
                palette::CIRCLE_IDLE
            },
            text: if tinted {
                palette::CIRCLE_IDLE
            } else {
                palette::INK
            },
            countdown_label,
            z_order: circle_count.saturating_sub(snapshot.id.get()),
        }
    }

    /// Center of the circle in play-area pixels.
    #[must_use]
    pub fn center(&self) -> Vec2 {
        self.origin + Vec2::splat(CIRCLE_RADIUS)
    }

    /// Reports whether the point lies within the circle.
    #[must_use]
    pub fn contains(&self, point: Vec2) -> bool {
        self.center().distance_squared(point) <= CIRCLE_RADIUS * CIRCLE_RADIUS
    }
}

/// Bordered region the circles live in.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlayAreaPresentation {
    /// Width in pixels.
    pub width: f32,
    /// Height in pixels.
    pub height: f32,
    /// Border color.
    pub border: Color,
}

impl PlayAreaPresentation {
    /// Creates a new play area descriptor, rejecting degenerate dimensions.
    pub fn new(width: f32, height: f32, border: Color) -> Result<Self, RenderingError> {
        if !(width.is_finite() && height.is_finite()) || width <= 0.0 || height <= 0.0 {
            return Err(RenderingError::InvalidPlayArea { width, height });
        }

        Ok(Self {
            width,
            height,
            border,
        })
    }

    /// Reports whether a play-area point lies inside the region.
    #[must_use]
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= 0.0 && point.y >= 0.0 && point.x < self.width && point.y < self.height
    }
}

/// Buttons and labels shown above the play area.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct ControlPanelPresentation {
    /// Whether the Play button is offered (no game on screen).
    pub show_play: bool,
    /// Whether the Restart button is offered.
    pub show_restart: bool,
    /// Auto-Play button state; `None` hides the button.
    pub auto_play: Option<AutoPlayButton>,
    /// Validation message from the last Play press.
    pub feedback: Option<String>,
}

/// Auto-Play toggle as displayed to the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AutoPlayButton {
    /// Whether auto-play is currently enabled.
    pub enabled: bool,
}

impl AutoPlayButton {
    /// Label describing what pressing the button does.
    #[must_use]
    pub const fn label(self) -> &'static str {
        if self.enabled {
            "Auto Play OFF"
        } else {
            "Auto Play ON"
        }
    }
}

/// Complete scene description handed to backends every frame.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Region circles are drawn in.
    pub play_area: PlayAreaPresentation,
    /// Headline above the controls.
    pub status: StatusBanner,
    /// Stopwatch reading.
    pub elapsed: Tenths,
    /// Circles in the current game.
    pub circles: Vec<CirclePresentation>,
    /// Circle the player should click next, once the first circle was cleared.
    pub next_hint: Option<CircleId>,
    /// Controls shown above the play area.
    pub panel: ControlPanelPresentation,
    /// Request for the backend to empty the point-count field.
    pub clear_point_input: bool,
}

impl Scene {
    /// Creates an empty scene ready for a new game.
    #[must_use]
    pub fn new(play_area: PlayAreaPresentation) -> Self {
        Self {
            play_area,
            status: StatusBanner::Ready,
            elapsed: Tenths::ZERO,
            circles: Vec::new(),
            next_hint: None,
            panel: ControlPanelPresentation {
                show_play: true,
                ..ControlPanelPresentation::default()
            },
            clear_point_input: false,
        }
    }

    /// Stopwatch reading formatted for display.
    #[must_use]
    pub fn elapsed_label(&self) -> String {
        format!("{}s", self.elapsed)
    }

    /// Prompt naming the next circle, if any.
    #[must_use]
    pub fn next_hint_label(&self) -> Option<String> {
        self.next_hint.map(|circle| format!("Next: {circle}"))
    }

    /// Circles ordered from bottom to top of the stack.
    #[must_use]
    pub fn draw_order(&self) -> Vec<&CirclePresentation> {
        let mut ordered: Vec<&CirclePresentation> = self.circles.iter().collect();
        ordered.sort_by_key(|circle| circle.z_order);
        ordered
    }

    /// Finds the topmost interactive circle under the provided play-area point.
    #[must_use]
    pub fn circle_at(&self, point: Vec2) -> Option<CircleId> {
        self.circles
            .iter()
            .filter(|circle| circle.interactive && circle.contains(point))
            .max_by_key(|circle| circle.z_order)
            .map(|circle| circle.id)
    }
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title used by the created window.
    pub window_title: String,
    /// Solid color used to clear each frame.
    pub clear_color: Color,
    /// Scene content that should be displayed.
    pub scene: Scene,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(window_title: T, clear_color: Color, scene: Scene) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            clear_color,
            scene,
        }
    }
}

/// Rendering backend capable of presenting Circle Dash scenes.
pub trait RenderingBackend {
    /// Runs the rendering backend until it is requested to exit.
    ///
    /// The provided `update_scene` closure receives the real frame delta,
    /// per-frame input captured by the adapter, and may mutate the scene
    /// before it is rendered.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static;
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Debug, PartialEq)]
pub enum RenderingError {
    /// The play area must have positive, finite dimensions.
    InvalidPlayArea {
        /// Provided width that failed validation.
        width: f32,
        /// Provided height that failed validation.
        height: f32,
    },
}

impl fmt::Display for RenderingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidPlayArea { width, height } => {
                write!(
                    f,
                    "play area must have positive dimensions (received {width}x{height})"
                )
            }
        }
    }
}

impl Error for RenderingError {}
