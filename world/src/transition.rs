//! Explicit phase transition evaluated after every state-mutating step.

use circle_dash_core::{GameOverReason, GamePhase, Tenths, FINISH_THRESHOLD};

use crate::Circle;

/// Derives the phase the game should occupy given the current circle state.
///
/// Only an in-progress game can move. The final circle completing its
/// countdown finishes the game; the current target running out of time
/// before the next circle is cleared loses it. Wrong clicks are handled at
/// click time because they depend on the clicked identifier rather than on
/// state.
pub(crate) fn next_phase(phase: GamePhase, current_target: u32, circles: &[Circle]) -> GamePhase {
    if phase != GamePhase::InProgress || current_target == 0 {
        return phase;
    }

    let Some(last) = circles.last() else {
        return phase;
    };

    if last.id.get() == current_target && last.countdown <= FINISH_THRESHOLD {
        return GamePhase::Finished;
    }

    let target = usize::try_from(current_target - 1)
        .ok()
        .and_then(|index| circles.get(index));
    match target {
        Some(circle) if circle.countdown == Tenths::ZERO => GamePhase::GameOver {
            reason: GameOverReason::Expired { circle: circle.id },
        },
        _ => phase,
    }
}
