#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Control system that turns player input into world commands.
//!
//! The system mirrors the control panel: a point-count field with a Play
//! button before a game starts, then Restart and an Auto-Play toggle. It
//! tracks the world's lifecycle by observing events, validates the point
//! count before any start command is produced, and keeps the validation
//! failure around so adapters can display it.

use circle_dash_core::{CircleId, Command, Event, PlayArea, PointCount, PointCountError};
use circle_dash_system_layout::{Config as LayoutConfig, Layout};

/// Configuration parameters required to construct the control system.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    play_area: PlayArea,
    max_points: u32,
    layout: LayoutConfig,
}

impl Config {
    /// Creates a new configuration.
    #[must_use]
    pub const fn new(play_area: PlayArea, max_points: u32, layout: LayoutConfig) -> Self {
        Self {
            play_area,
            max_points,
            layout,
        }
    }

    /// Region circles are scattered across.
    #[must_use]
    pub const fn play_area(&self) -> PlayArea {
        self.play_area
    }

    /// Largest accepted point count.
    #[must_use]
    pub const fn max_points(&self) -> u32 {
        self.max_points
    }
}

/// Player interactions captured by an adapter during a single frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ControlInput<'a> {
    /// Whether the Play button was pressed.
    pub play: bool,
    /// Whether the Restart button was pressed.
    pub restart: bool,
    /// Whether the Auto-Play button was pressed.
    pub toggle_auto_play: bool,
    /// Circle under the cursor when the player clicked, if any.
    pub clicked: Option<CircleId>,
    /// Current contents of the point-count field.
    pub point_text: &'a str,
}

/// Pure system that emits commands in response to player input.
#[derive(Clone, Debug)]
pub struct Controls {
    config: Config,
    layout: Layout,
    started: bool,
    finished: bool,
    auto_play: bool,
    feedback: Option<PointCountError>,
    clear_point_input: bool,
}

impl Controls {
    /// Creates a new control system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            config,
            layout: Layout::new(config.layout),
            started: false,
            finished: false,
            auto_play: false,
            feedback: None,
            clear_point_input: false,
        }
    }

    /// Consumes world events and the frame's input to emit commands.
    pub fn handle(&mut self, events: &[Event], input: ControlInput<'_>, out: &mut Vec<Command>) {
        self.observe(events);

        if !self.started {
            if input.play {
                self.request_start(input.point_text, out);
            }
            return;
        }

        if input.restart {
            self.feedback = None;
            self.clear_point_input = true;
            out.push(Command::Restart);
            return;
        }

        if input.toggle_auto_play && self.auto_play_available() {
            out.push(Command::SetAutoPlay {
                enabled: !self.auto_play,
            });
        }

        if let Some(circle) = input.clicked {
            out.push(Command::Click { circle });
        }
    }

    fn observe(&mut self, events: &[Event]) {
        for event in events {
            match event {
                Event::GameStarted { .. } => {
                    self.started = true;
                    self.finished = false;
                    self.feedback = None;
                }
                Event::GameFinished { .. } => self.finished = true,
                Event::GameReset => {
                    self.started = false;
                    self.finished = false;
                    self.auto_play = false;
                }
                Event::AutoPlayChanged { enabled, .. } => self.auto_play = *enabled,
                _ => {}
            }
        }
    }

    fn request_start(&mut self, point_text: &str, out: &mut Vec<Command>) {
        match PointCount::parse(point_text, self.config.max_points) {
            Ok(count) => {
                self.feedback = None;
                out.push(self.layout.start_command(count, self.config.play_area));
            }
            Err(error) => self.feedback = Some(error),
        }
    }

    /// Reports whether a game is on screen (in progress or awaiting restart).
    #[must_use]
    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Reports whether the Auto-Play button should be offered.
    #[must_use]
    pub fn auto_play_available(&self) -> bool {
        self.started && !self.finished
    }

    /// Reports whether auto-play is enabled according to the observed events.
    #[must_use]
    pub fn auto_play_enabled(&self) -> bool {
        self.auto_play
    }

    /// Validation failure from the most recent Play press, if any.
    #[must_use]
    pub fn feedback(&self) -> Option<&PointCountError> {
        self.feedback.as_ref()
    }

    /// Returns whether the point-count field should be emptied and clears the request.
    pub fn take_clear_point_input(&mut self) -> bool {
        std::mem::take(&mut self.clear_point_input)
    }
}
