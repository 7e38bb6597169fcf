#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative game state management for Circle Dash.

mod timers;
mod transition;

use std::time::Duration;

use circle_dash_core::{
    AutoPlayRejection, CircleId, ClickRejection, Command, Event, GameOverReason, GamePhase,
    Position, StartRejection, Tenths, AUTO_PLAY_SPACING, COUNTDOWN_START,
};
use tracing::{debug, info};

use self::timers::{Fired, TimerSet};

/// Single clickable target tracked by the world.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Circle {
    pub(crate) id: CircleId,
    pub(crate) position: Position,
    pub(crate) countdown: Tenths,
}

/// Represents the authoritative Circle Dash game state.
#[derive(Debug, Default)]
pub struct World {
    phase: GamePhase,
    circles: Vec<Circle>,
    elapsed: Tenths,
    current_target: u32,
    auto_play: bool,
    timers: TimerSet,
}

impl World {
    /// Creates a new world with no game in progress.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn circle(&self, id: CircleId) -> Option<&Circle> {
        let index = usize::try_from(id.get().checked_sub(1)?).ok()?;
        self.circles.get(index)
    }

    fn circle_mut(&mut self, id: CircleId) -> Option<&mut Circle> {
        let index = usize::try_from(id.get().checked_sub(1)?).ok()?;
        self.circles.get_mut(index)
    }

    fn start(&mut self, positions: Vec<Position>, out_events: &mut Vec<Event>) {
        if self.phase != GamePhase::NotStarted {
            debug!(phase = ?self.phase, "start rejected");
            out_events.push(Event::StartRejected {
                reason: StartRejection::AlreadyStarted,
            });
            return;
        }
        if positions.is_empty() {
            debug!("start rejected without circles");
            out_events.push(Event::StartRejected {
                reason: StartRejection::NoCircles,
            });
            return;
        }

        self.circles = positions
            .into_iter()
            .zip(1u32..)
            .map(|(position, id)| Circle {
                id: CircleId::new(id),
                position,
                countdown: COUNTDOWN_START,
            })
            .collect();
        self.elapsed = Tenths::ZERO;
        self.current_target = 0;
        self.auto_play = false;
        self.phase = GamePhase::InProgress;
        self.timers.teardown();
        self.timers.start_stopwatch();

        let circles = u32::try_from(self.circles.len()).unwrap_or(u32::MAX);
        info!(circles, "game started");
        out_events.push(Event::GameStarted { circles });
    }

    fn click(&mut self, circle: CircleId, out_events: &mut Vec<Event>) {
        if self.phase != GamePhase::InProgress {
            self.ignore_click(circle, ClickRejection::NotInProgress, out_events);
            return;
        }
        let Some(target) = self.circle(circle) else {
            self.ignore_click(circle, ClickRejection::UnknownCircle, out_events);
            return;
        };
        if target.countdown == Tenths::ZERO {
            self.ignore_click(circle, ClickRejection::Hidden, out_events);
            return;
        }

        let expected = CircleId::new(self.current_target.saturating_add(1));
        if circle != expected {
            self.enter_phase(
                GamePhase::GameOver {
                    reason: GameOverReason::WrongCircle {
                        expected,
                        clicked: circle,
                    },
                },
                out_events,
            );
            return;
        }

        self.current_target = circle.get();
        self.timers.start_countdown(circle);
        self.timers.cancel_auto_click(circle);
        out_events.push(Event::CircleCleared {
            circle,
            elapsed: self.elapsed,
        });
        self.evaluate(out_events);
    }

    fn ignore_click(&self, circle: CircleId, reason: ClickRejection, out_events: &mut Vec<Event>) {
        debug!(circle = circle.get(), ?reason, "click ignored");
        out_events.push(Event::ClickIgnored { circle, reason });
    }

    fn set_auto_play(&mut self, enabled: bool, out_events: &mut Vec<Event>) {
        if !enabled {
            self.timers.cancel_auto_clicks();
            self.auto_play = false;
            out_events.push(Event::AutoPlayChanged {
                enabled: false,
                scheduled: 0,
            });
            return;
        }

        if self.phase != GamePhase::InProgress {
            debug!(phase = ?self.phase, "auto-play rejected");
            out_events.push(Event::AutoPlayRejected {
                reason: AutoPlayRejection::NotInProgress,
            });
            return;
        }

        let current_target = self.current_target;
        let remaining = self
            .circles
            .iter()
            .map(|circle| circle.id)
            .filter(|id| id.get() > current_target);
        // The first simulated click must land before the current target expires.
        let first_delay = (current_target > 0)
            .then(|| CircleId::new(current_target))
            .and_then(|target| self.timers.time_to_expiry(target))
            .map_or(AUTO_PLAY_SPACING, |left| AUTO_PLAY_SPACING.min(left / 2));
        let scheduled = self.timers.schedule_auto_clicks(remaining, first_delay);
        self.auto_play = true;
        debug!(scheduled, "auto-play enabled");
        out_events.push(Event::AutoPlayChanged {
            enabled: true,
            scheduled,
        });
    }

    fn tick(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        out_events.push(Event::TimeAdvanced { dt });

        let mut remaining = dt;
        while !remaining.is_zero() {
            let Some(deadline) = self.timers.next_deadline() else {
                break;
            };
            let step = deadline.min(remaining);
            remaining -= step;

            let fired = self.timers.advance(step);
            if fired.is_empty() {
                continue;
            }
            self.resolve_fired(fired, out_events);
        }
    }

    fn resolve_fired(&mut self, fired: Fired, out_events: &mut Vec<Event>) {
        if fired.stopwatch {
            self.elapsed = self.elapsed.increment();
        }

        for tick in fired.countdowns {
            if let Some(circle) = self.circle_mut(tick.circle) {
                circle.countdown = circle.countdown.decrement();
            }
            if tick.window_closed {
                out_events.push(Event::CountdownElapsed {
                    circle: tick.circle,
                });
            }
        }
        self.evaluate(out_events);

        for circle in fired.auto_clicks {
            if self.phase != GamePhase::InProgress {
                break;
            }
            self.click(circle, out_events);
        }
    }

    fn evaluate(&mut self, out_events: &mut Vec<Event>) {
        let next = transition::next_phase(self.phase, self.current_target, &self.circles);
        if next != self.phase {
            self.enter_phase(next, out_events);
        }
    }

    fn enter_phase(&mut self, phase: GamePhase, out_events: &mut Vec<Event>) {
        self.phase = phase;
        if !phase.is_terminal() {
            return;
        }

        self.teardown(out_events);
        match phase {
            GamePhase::GameOver { reason } => {
                info!(?reason, elapsed = %self.elapsed, "game over");
                out_events.push(Event::GameOver {
                    reason,
                    elapsed: self.elapsed,
                });
            }
            GamePhase::Finished => {
                info!(elapsed = %self.elapsed, "all circles cleared");
                out_events.push(Event::GameFinished {
                    elapsed: self.elapsed,
                });
            }
            GamePhase::NotStarted | GamePhase::InProgress => {}
        }
    }

    fn teardown(&mut self, out_events: &mut Vec<Event>) {
        self.timers.teardown();
        if self.auto_play {
            self.auto_play = false;
            out_events.push(Event::AutoPlayChanged {
                enabled: false,
                scheduled: 0,
            });
        }
    }

    fn restart(&mut self, out_events: &mut Vec<Event>) {
        self.teardown(out_events);
        self.circles.clear();
        self.elapsed = Tenths::ZERO;
        self.current_target = 0;
        self.phase = GamePhase::NotStarted;
        info!("game reset");
        out_events.push(Event::GameReset);
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::StartGame { positions } => world.start(positions, out_events),
        Command::Click { circle } => world.click(circle, out_events),
        Command::SetAutoPlay { enabled } => world.set_auto_play(enabled, out_events),
        Command::Tick { dt } => world.tick(dt, out_events),
        Command::Restart => world.restart(out_events),
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use circle_dash_core::{CircleId, CircleSnapshot, CircleView, GamePhase, Tenths};

    use super::World;

    /// Current lifecycle phase of the game.
    #[must_use]
    pub fn phase(world: &World) -> GamePhase {
        world.phase
    }

    /// Stopwatch reading since the game started.
    #[must_use]
    pub fn elapsed(world: &World) -> Tenths {
        world.elapsed
    }

    /// Identifier of the last correctly clicked circle, or zero before the first click.
    #[must_use]
    pub fn current_target(world: &World) -> u32 {
        world.current_target
    }

    /// Circle the player is prompted to click next.
    ///
    /// The prompt appears only after the first circle was cleared, while the
    /// game is still in progress and circles remain.
    #[must_use]
    pub fn next_target(world: &World) -> Option<CircleId> {
        let last = world.circles.last()?.id.get();
        let current = world.current_target;
        (world.phase == GamePhase::InProgress && current > 0 && current < last)
            .then(|| CircleId::new(current + 1))
    }

    /// Number of circles in the current game.
    #[must_use]
    pub fn circle_count(world: &World) -> usize {
        world.circles.len()
    }

    /// Captures a read-only view of every circle.
    #[must_use]
    pub fn circle_view(world: &World) -> CircleView {
        CircleView::from_snapshots(
            world
                .circles
                .iter()
                .map(|circle| CircleSnapshot {
                    id: circle.id,
                    position: circle.position,
                    countdown: circle.countdown,
                    counting: world.timers.is_counting(circle.id),
                })
                .collect(),
        )
    }

    /// Reports whether auto-play is enabled.
    #[must_use]
    pub fn auto_play_enabled(world: &World) -> bool {
        world.auto_play
    }

    /// Number of simulated clicks still waiting to fire.
    #[must_use]
    pub fn pending_auto_clicks(world: &World) -> usize {
        world.timers.pending_auto_clicks()
    }

    /// Number of circle countdown timers currently running.
    #[must_use]
    pub fn active_countdowns(world: &World) -> usize {
        world.timers.active_countdowns()
    }

    /// Reports whether the stopwatch is running.
    #[must_use]
    pub fn stopwatch_running(world: &World) -> bool {
        world.timers.stopwatch_running()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn started(count: u32) -> (World, Vec<Event>) {
        let mut world = World::new();
        let mut events = Vec::new();
        let positions = (0..count)
            .map(|index| Position::new(index as f32 * 10.0, 5.0))
            .collect();
        apply(
            &mut world,
            Command::StartGame { positions },
            &mut events,
        );
        (world, events)
    }

    #[test]
    fn start_assigns_sequential_ids() {
        let (world, events) = started(4);

        let ids: Vec<u32> = query::circle_view(&world)
            .iter()
            .map(|circle| circle.id.get())
            .collect();
        assert_eq!(ids, vec![1, 2, 3, 4]);
        assert_eq!(events, vec![Event::GameStarted { circles: 4 }]);
        assert_eq!(query::phase(&world), GamePhase::InProgress);
        assert!(query::stopwatch_running(&world));
    }

    #[test]
    fn start_keeps_positions_in_order() {
        let (world, _) = started(3);
        let view = query::circle_view(&world);
        let third = view.get(CircleId::new(3)).expect("third circle");
        assert_eq!(third.position, Position::new(20.0, 5.0));
        assert_eq!(third.countdown, COUNTDOWN_START);
        assert!(!third.counting);
    }

    #[test]
    fn start_without_positions_is_rejected() {
        let mut world = World::new();
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::StartGame {
                positions: Vec::new(),
            },
            &mut events,
        );

        assert_eq!(
            events,
            vec![Event::StartRejected {
                reason: StartRejection::NoCircles
            }]
        );
        assert_eq!(query::phase(&world), GamePhase::NotStarted);
    }

    #[test]
    fn second_start_is_rejected_until_restart() {
        let (mut world, _) = started(2);
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::StartGame {
                positions: vec![Position::default()],
            },
            &mut events,
        );

        assert_eq!(
            events,
            vec![Event::StartRejected {
                reason: StartRejection::AlreadyStarted
            }]
        );
        assert_eq!(query::circle_count(&world), 2);
    }

    #[test]
    fn stopwatch_counts_tenths() {
        let (mut world, _) = started(1);
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::Tick {
                dt: Duration::from_millis(250),
            },
            &mut events,
        );
        assert_eq!(query::elapsed(&world), Tenths::new(2));

        apply(
            &mut world,
            Command::Tick {
                dt: Duration::from_millis(50),
            },
            &mut events,
        );
        assert_eq!(query::elapsed(&world), Tenths::new(3));
    }

    #[test]
    fn correct_click_starts_countdown() {
        let (mut world, _) = started(2);
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::Click {
                circle: CircleId::new(1),
            },
            &mut events,
        );
        apply(
            &mut world,
            Command::Tick {
                dt: Duration::from_millis(300),
            },
            &mut events,
        );

        let view = query::circle_view(&world);
        let first = view.get(CircleId::new(1)).expect("first circle");
        assert!(first.counting);
        assert_eq!(first.countdown, Tenths::new(27));
        assert_eq!(query::current_target(&world), 1);
        assert_eq!(query::next_target(&world), Some(CircleId::new(2)));
    }

    #[test]
    fn click_before_start_is_ignored() {
        let mut world = World::new();
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::Click {
                circle: CircleId::new(1),
            },
            &mut events,
        );

        assert_eq!(
            events,
            vec![Event::ClickIgnored {
                circle: CircleId::new(1),
                reason: ClickRejection::NotInProgress,
            }]
        );
    }

    #[test]
    fn click_on_unknown_circle_is_ignored() {
        let (mut world, _) = started(2);
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::Click {
                circle: CircleId::new(9),
            },
            &mut events,
        );

        assert_eq!(
            events,
            vec![Event::ClickIgnored {
                circle: CircleId::new(9),
                reason: ClickRejection::UnknownCircle,
            }]
        );
        assert_eq!(query::phase(&world), GamePhase::InProgress);
    }

    #[test]
    fn reclicking_cleared_circle_loses() {
        let (mut world, _) = started(3);
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::Click {
                circle: CircleId::new(1),
            },
            &mut events,
        );
        apply(
            &mut world,
            Command::Click {
                circle: CircleId::new(1),
            },
            &mut events,
        );

        assert_eq!(
            query::phase(&world),
            GamePhase::GameOver {
                reason: GameOverReason::WrongCircle {
                    expected: CircleId::new(2),
                    clicked: CircleId::new(1),
                }
            }
        );
        assert_eq!(query::active_countdowns(&world), 0);
    }

    #[test]
    fn auto_play_rejected_before_start() {
        let mut world = World::new();
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::SetAutoPlay { enabled: true },
            &mut events,
        );

        assert_eq!(
            events,
            vec![Event::AutoPlayRejected {
                reason: AutoPlayRejection::NotInProgress
            }]
        );
        assert!(!query::auto_play_enabled(&world));
    }

    #[test]
    fn auto_play_schedules_remaining_circles_only() {
        let (mut world, _) = started(4);
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::Click {
                circle: CircleId::new(1),
            },
            &mut events,
        );
        events.clear();
        apply(
            &mut world,
            Command::SetAutoPlay { enabled: true },
            &mut events,
        );

        assert_eq!(
            events,
            vec![Event::AutoPlayChanged {
                enabled: true,
                scheduled: 3
            }]
        );
        assert_eq!(query::pending_auto_clicks(&world), 3);
    }

    #[test]
    fn manual_click_cancels_matching_auto_click() {
        let (mut world, _) = started(3);
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::SetAutoPlay { enabled: true },
            &mut events,
        );
        apply(
            &mut world,
            Command::Click {
                circle: CircleId::new(1),
            },
            &mut events,
        );

        assert_eq!(query::pending_auto_clicks(&world), 2);
        assert_eq!(query::phase(&world), GamePhase::InProgress);
    }

    #[test]
    fn disabling_auto_play_cancels_pending_clicks() {
        let (mut world, _) = started(3);
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::SetAutoPlay { enabled: true },
            &mut events,
        );
        apply(
            &mut world,
            Command::SetAutoPlay { enabled: false },
            &mut events,
        );
        apply(
            &mut world,
            Command::Tick {
                dt: Duration::from_secs(5),
            },
            &mut events,
        );

        assert!(!query::auto_play_enabled(&world));
        assert_eq!(query::pending_auto_clicks(&world), 0);
        assert_eq!(query::current_target(&world), 0);
        assert_eq!(query::phase(&world), GamePhase::InProgress);
    }

    #[test]
    fn game_over_disables_auto_play() {
        let (mut world, _) = started(3);
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::SetAutoPlay { enabled: true },
            &mut events,
        );
        events.clear();
        apply(
            &mut world,
            Command::Click {
                circle: CircleId::new(3),
            },
            &mut events,
        );

        assert_eq!(
            events,
            vec![
                Event::AutoPlayChanged {
                    enabled: false,
                    scheduled: 0
                },
                Event::GameOver {
                    reason: GameOverReason::WrongCircle {
                        expected: CircleId::new(1),
                        clicked: CircleId::new(3),
                    },
                    elapsed: Tenths::ZERO,
                },
            ]
        );
        assert!(!query::auto_play_enabled(&world));
        assert_eq!(query::pending_auto_clicks(&world), 0);
    }
}
