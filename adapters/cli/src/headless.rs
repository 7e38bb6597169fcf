//! Windowless mode that auto-plays a single game and reports the result.

use std::{fmt, time::Duration};

use anyhow::{bail, Context, Result};
use circle_dash_core::{GameOverReason, GamePhase, Tenths, TICK_PERIOD};
use circle_dash_rendering::{palette, FrameInput, PlayAreaPresentation, Scene};
use circle_dash_system_controls::Config as ControlsConfig;
use circle_dash_system_layout::Config as LayoutConfig;
use tracing::info;

use crate::{config::Settings, session::Session};

/// Ticks allowed past the expected finish before the run is declared stuck.
const SLACK_TICKS: u64 = 50;

/// Final state of a headless game.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Outcome {
    /// Every circle was cleared.
    Cleared {
        /// Number of circles in the game.
        circles: u32,
        /// Stopwatch reading when the game finished.
        elapsed: Tenths,
    },
    /// The game ended early.
    Over {
        /// Why the game ended.
        reason: GameOverReason,
        /// Stopwatch reading when the game ended.
        elapsed: Tenths,
    },
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cleared { circles, elapsed } => {
                write!(f, "ALL CLEARED: {circles} circles in {elapsed}s")
            }
            Self::Over {
                reason: GameOverReason::Expired { circle },
                elapsed,
            } => write!(f, "GAME OVER: circle {circle} expired at {elapsed}s"),
            Self::Over {
                reason: GameOverReason::WrongCircle { expected, clicked },
                elapsed,
            } => write!(
                f,
                "GAME OVER: clicked {clicked} while {expected} was next at {elapsed}s"
            ),
        }
    }
}

/// Runs one auto-played game to completion using fixed simulation steps.
pub(crate) fn run(settings: &Settings) -> Result<Outcome> {
    let points = settings
        .points
        .context("headless mode requires a point count (--points)")?;

    let mut session = Session::new(ControlsConfig::new(
        settings.play_area,
        settings.max_points,
        LayoutConfig::new(settings.seed),
    ));
    let mut scene = Scene::new(PlayAreaPresentation::new(
        settings.play_area.width(),
        settings.play_area.height(),
        palette::INK,
    )?);

    session.handle_frame(
        Duration::ZERO,
        FrameInput {
            play_pressed: true,
            point_text: points.to_string(),
            ..FrameInput::default()
        },
        &mut scene,
    );
    if let Some(feedback) = scene.panel.feedback.take() {
        bail!("cannot start game: {feedback}");
    }
    if !session.phase().is_started() {
        bail!("game did not start");
    }
    info!(circles = points, seed = settings.seed, "headless game started");

    session.handle_frame(
        Duration::ZERO,
        FrameInput {
            auto_play_pressed: true,
            ..FrameInput::default()
        },
        &mut scene,
    );

    let tick_budget = (u64::from(points) + 3) * 10 + SLACK_TICKS;
    for _ in 0..tick_budget {
        if session.phase().is_terminal() {
            break;
        }
        session.handle_frame(TICK_PERIOD, FrameInput::default(), &mut scene);
    }

    let elapsed = session.elapsed();
    match session.phase() {
        GamePhase::Finished => Ok(Outcome::Cleared {
            circles: points,
            elapsed,
        }),
        GamePhase::GameOver { reason } => Ok(Outcome::Over { reason, elapsed }),
        phase => bail!("game still {phase:?} after {tick_budget} ticks"),
    }
}
