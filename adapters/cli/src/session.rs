//! Per-frame wiring between adapters, the control system and the world.

use std::time::Duration;

use circle_dash_core::{Command, Event, GamePhase, Tenths};
use circle_dash_rendering::{
    AutoPlayButton, CirclePresentation, ControlPanelPresentation, FrameInput, Scene, StatusBanner,
};
use circle_dash_system_controls::{Config as ControlsConfig, ControlInput, Controls};
use circle_dash_world::{self as world, query, World};
use tracing::trace;

/// Owns the simulation and translates frames into commands and scene updates.
#[derive(Debug)]
pub(crate) struct Session {
    world: World,
    controls: Controls,
    events: Vec<Event>,
    commands: Vec<Command>,
}

impl Session {
    /// Creates a session with no game in progress.
    pub(crate) fn new(config: ControlsConfig) -> Self {
        Self {
            world: World::new(),
            controls: Controls::new(config),
            events: Vec::new(),
            commands: Vec::new(),
        }
    }

    /// Processes one frame of input and time, then refreshes the scene.
    pub(crate) fn handle_frame(&mut self, dt: Duration, input: FrameInput, scene: &mut Scene) {
        let clicked = input
            .click
            .then_some(input.cursor)
            .flatten()
            .and_then(|cursor| scene.circle_at(cursor));

        let previous_events = std::mem::take(&mut self.events);
        self.controls.handle(
            &previous_events,
            ControlInput {
                play: input.play_pressed,
                restart: input.restart_pressed,
                toggle_auto_play: input.auto_play_pressed,
                clicked,
                point_text: &input.point_text,
            },
            &mut self.commands,
        );

        for command in self.commands.drain(..) {
            world::apply(&mut self.world, command, &mut self.events);
        }
        if !dt.is_zero() {
            world::apply(&mut self.world, Command::Tick { dt }, &mut self.events);
        }

        for event in &self.events {
            trace!(?event, "world event");
        }

        self.populate_scene(scene);
    }

    fn populate_scene(&mut self, scene: &mut Scene) {
        let phase = query::phase(&self.world);
        let view = query::circle_view(&self.world);
        let circle_count = u32::try_from(view.len()).unwrap_or(u32::MAX);

        scene.status = StatusBanner::from_phase(phase);
        scene.elapsed = query::elapsed(&self.world);
        scene.circles.clear();
        scene.circles.extend(
            view.iter()
                .map(|snapshot| CirclePresentation::from_snapshot(snapshot, circle_count, phase)),
        );
        scene.next_hint = query::next_target(&self.world);
        scene.panel = ControlPanelPresentation {
            show_play: !self.controls.is_started(),
            show_restart: self.controls.is_started(),
            auto_play: self.controls.auto_play_available().then(|| AutoPlayButton {
                enabled: query::auto_play_enabled(&self.world),
            }),
            feedback: self.controls.feedback().map(ToString::to_string),
        };
        if self.controls.take_clear_point_input() {
            scene.clear_point_input = true;
        }
    }

    /// Current lifecycle phase of the game.
    pub(crate) fn phase(&self) -> GamePhase {
        query::phase(&self.world)
    }

    /// Current stopwatch reading.
    pub(crate) fn elapsed(&self) -> Tenths {
        query::elapsed(&self.world)
    }
}
