#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Circle Dash engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values that adapters and
//! systems react to deterministically. Time is measured in [`Tenths`] so that
//! every countdown comparison is an exact integer comparison.

use std::{fmt, time::Duration};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Period of every recurring game timer (stopwatch and circle countdowns).
pub const TICK_PERIOD: Duration = Duration::from_millis(100);

/// Window after which a circle countdown timer cancels itself.
pub const COUNTDOWN_WINDOW: Duration = Duration::from_millis(3_000);

/// Value every circle countdown starts from.
pub const COUNTDOWN_START: Tenths = Tenths::new(30);

/// Countdown value at or below which the final circle completes the game.
pub const FINISH_THRESHOLD: Tenths = Tenths::new(1);

/// Spacing between consecutive simulated clicks while auto-play is enabled.
pub const AUTO_PLAY_SPACING: Duration = Duration::from_secs(1);

/// Largest point count accepted unless configured otherwise.
pub const DEFAULT_MAX_POINTS: u32 = 500;

/// Horizontal space reserved for a circle's label box when placing circles.
pub const CIRCLE_MARGIN_X: f32 = 200.0;

/// Vertical space reserved for a circle's label box when placing circles.
pub const CIRCLE_MARGIN_Y: f32 = 50.0;

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Starts a new game with one circle per provided position.
    ///
    /// Circle identifiers are assigned in order, starting at 1.
    StartGame {
        /// Pixel position of each circle, indexed by click order.
        positions: Vec<Position>,
    },
    /// Reports that the player clicked the provided circle.
    Click {
        /// Identifier of the clicked circle.
        circle: CircleId,
    },
    /// Enables or disables auto-play.
    SetAutoPlay {
        /// Whether simulated clicks should be scheduled.
        enabled: bool,
    },
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Abandons the current game and returns to the initial state.
    Restart,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Confirms that a new game started.
    GameStarted {
        /// Number of circles placed in the play area.
        circles: u32,
    },
    /// Reports that a start request was refused.
    StartRejected {
        /// Specific reason the start failed.
        reason: StartRejection,
    },
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Confirms that a circle was clicked in the correct order.
    CircleCleared {
        /// Identifier of the cleared circle.
        circle: CircleId,
        /// Stopwatch reading at the moment of the click.
        elapsed: Tenths,
    },
    /// Announces that a circle's countdown window closed and its timer was released.
    CountdownElapsed {
        /// Identifier of the circle whose timer ended.
        circle: CircleId,
    },
    /// Reports that a click had no effect.
    ClickIgnored {
        /// Identifier of the clicked circle.
        circle: CircleId,
        /// Specific reason the click was ignored.
        reason: ClickRejection,
    },
    /// Confirms that auto-play was switched on or off.
    AutoPlayChanged {
        /// Whether auto-play is now enabled.
        enabled: bool,
        /// Number of simulated clicks scheduled (zero when disabling).
        scheduled: u32,
    },
    /// Reports that an auto-play request was refused.
    AutoPlayRejected {
        /// Specific reason the request failed.
        reason: AutoPlayRejection,
    },
    /// Announces that the game was lost.
    GameOver {
        /// Cause of the loss.
        reason: GameOverReason,
        /// Stopwatch reading frozen at the moment of the loss.
        elapsed: Tenths,
    },
    /// Announces that every circle was cleared.
    GameFinished {
        /// Stopwatch reading frozen at the moment of completion.
        elapsed: Tenths,
    },
    /// Confirms that the world returned to its initial state.
    GameReset,
}

/// Duration expressed in whole tenths of a second.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Tenths(u32);

impl Tenths {
    /// Zero duration.
    pub const ZERO: Self = Self(0);

    /// Creates a new value from a count of tenths.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the number of tenths.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Adds one tenth, saturating at the numeric bound.
    #[must_use]
    pub const fn increment(self) -> Self {
        Self(self.0.saturating_add(1))
    }

    /// Removes one tenth, saturating at zero.
    #[must_use]
    pub const fn decrement(self) -> Self {
        Self(self.0.saturating_sub(1))
    }
}

impl fmt::Display for Tenths {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.0 / 10, self.0 % 10)
    }
}

/// Unique identifier of a circle, equal to its position in the click order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CircleId(u32);

impl CircleId {
    /// Creates a new circle identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for CircleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Top-left corner of a circle expressed in play-area pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    x: f32,
    y: f32,
}

impl Position {
    /// Creates a new position from pixel coordinates.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Horizontal offset from the play area's left edge.
    #[must_use]
    pub const fn x(&self) -> f32 {
        self.x
    }

    /// Vertical offset from the play area's top edge.
    #[must_use]
    pub const fn y(&self) -> f32 {
        self.y
    }
}

/// Dimensions of the region circles are scattered across.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayArea {
    width: f32,
    height: f32,
}

impl Default for PlayArea {
    fn default() -> Self {
        Self::new(800.0, 384.0)
    }
}

impl PlayArea {
    /// Creates a new play area from pixel dimensions.
    #[must_use]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Width of the play area in pixels.
    #[must_use]
    pub const fn width(&self) -> f32 {
        self.width
    }

    /// Height of the play area in pixels.
    #[must_use]
    pub const fn height(&self) -> f32 {
        self.height
    }

    /// Exclusive upper bounds for circle positions along each axis.
    ///
    /// The label margins are subtracted so circles stay inside the area; the
    /// result never drops below zero.
    #[must_use]
    pub fn placement_bounds(&self) -> (f32, f32) {
        (
            (self.width - CIRCLE_MARGIN_X).max(0.0),
            (self.height - CIRCLE_MARGIN_Y).max(0.0),
        )
    }
}

/// Validated number of circles requested by the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PointCount(u32);

impl PointCount {
    /// Validates a numeric point count against the provided upper bound.
    pub fn new(value: i64, max: u32) -> Result<Self, PointCountError> {
        if value <= 0 {
            return Err(PointCountError::NonPositive { value });
        }
        match u32::try_from(value) {
            Ok(count) if count <= max => Ok(Self(count)),
            _ => Err(PointCountError::TooMany {
                requested: value,
                max,
            }),
        }
    }

    /// Parses free-form text entered by the player.
    pub fn parse(input: &str, max: u32) -> Result<Self, PointCountError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(PointCountError::Empty);
        }

        if let Ok(value) = trimmed.parse::<i64>() {
            return Self::new(value, max);
        }

        if trimmed.parse::<f64>().is_ok() {
            Err(PointCountError::NotAnInteger {
                input: trimmed.to_owned(),
            })
        } else {
            Err(PointCountError::NotANumber {
                input: trimmed.to_owned(),
            })
        }
    }

    /// Retrieves the number of circles.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Reasons a point count entered by the player is refused.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum PointCountError {
    /// The input field was left blank.
    #[error("enter the number of points to play")]
    Empty,
    /// The input was not a number at all.
    #[error("`{input}` is not a number")]
    NotANumber {
        /// Text that failed to parse.
        input: String,
    },
    /// The input was a number with a fractional part.
    #[error("`{input}` is not a whole number")]
    NotAnInteger {
        /// Text that failed to parse.
        input: String,
    },
    /// The input was zero or negative.
    #[error("point count must be positive (received {value})")]
    NonPositive {
        /// Value that was entered.
        value: i64,
    },
    /// The input exceeded the configured maximum.
    #[error("point count {requested} exceeds the maximum of {max}")]
    TooMany {
        /// Value that was entered.
        requested: i64,
        /// Largest accepted value.
        max: u32,
    },
}

/// Discrete lifecycle phase of a game.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum GamePhase {
    /// No game has been started since launch or the last restart.
    #[default]
    NotStarted,
    /// Circles are on screen and the stopwatch is running.
    InProgress,
    /// The player lost.
    GameOver {
        /// Cause of the loss.
        reason: GameOverReason,
    },
    /// Every circle was cleared.
    Finished,
}

impl GamePhase {
    /// Reports whether a game has been started and not yet reset.
    #[must_use]
    pub const fn is_started(&self) -> bool {
        !matches!(self, Self::NotStarted)
    }

    /// Reports whether the game reached one of its terminal phases.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::GameOver { .. } | Self::Finished)
    }

    /// Reports whether the game was lost.
    #[must_use]
    pub const fn is_over(&self) -> bool {
        matches!(self, Self::GameOver { .. })
    }

    /// Reports whether the game was won.
    #[must_use]
    pub const fn is_finished(&self) -> bool {
        matches!(self, Self::Finished)
    }
}

/// Causes of a lost game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GameOverReason {
    /// A circle was clicked out of order.
    WrongCircle {
        /// Circle that should have been clicked.
        expected: CircleId,
        /// Circle that was clicked instead.
        clicked: CircleId,
    },
    /// The current target's countdown ran out before the next circle was clicked.
    Expired {
        /// Circle whose countdown reached zero.
        circle: CircleId,
    },
}

/// Reasons a start request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StartRejection {
    /// The request did not contain any circle positions.
    NoCircles,
    /// A game is already running or awaiting restart.
    AlreadyStarted,
}

/// Reasons a click may be ignored by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ClickRejection {
    /// The game is not in progress.
    NotInProgress,
    /// No circle with the provided identifier exists.
    UnknownCircle,
    /// The circle's countdown already reached zero, so it is hidden.
    Hidden,
}

/// Reasons an auto-play request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AutoPlayRejection {
    /// Auto-play can only be enabled while a game is in progress.
    NotInProgress,
}

/// Immutable representation of a single circle's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CircleSnapshot {
    /// Identifier and click order of the circle.
    pub id: CircleId,
    /// Top-left corner of the circle in play-area pixels.
    pub position: Position,
    /// Remaining countdown.
    pub countdown: Tenths,
    /// Whether the circle's countdown timer is currently running.
    pub counting: bool,
}

impl CircleSnapshot {
    /// Reports whether the countdown has run out.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.countdown == Tenths::ZERO
    }

    /// Reports whether the countdown has started moving.
    #[must_use]
    pub fn has_started_countdown(&self) -> bool {
        self.countdown < COUNTDOWN_START
    }
}

/// Read-only snapshot describing all circles of the current game.
#[derive(Clone, Debug, Default)]
pub struct CircleView {
    snapshots: Vec<CircleSnapshot>,
}

impl CircleView {
    /// Creates a new circle view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<CircleSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured circle snapshots in click order.
    pub fn iter(&self) -> impl Iterator<Item = &CircleSnapshot> {
        self.snapshots.iter()
    }

    /// Number of captured circles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the view contains no circles.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Looks up the snapshot of a single circle.
    #[must_use]
    pub fn get(&self, id: CircleId) -> Option<&CircleSnapshot> {
        self.snapshots
            .binary_search_by_key(&id, |snapshot| snapshot.id)
            .ok()
            .and_then(|index| self.snapshots.get(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tenths_display_uses_one_decimal() {
        assert_eq!(Tenths::new(0).to_string(), "0.0");
        assert_eq!(Tenths::new(7).to_string(), "0.7");
        assert_eq!(Tenths::new(38).to_string(), "3.8");
        assert_eq!(Tenths::new(120).to_string(), "12.0");
    }

    #[test]
    fn tenths_decrement_saturates_at_zero() {
        assert_eq!(Tenths::ZERO.decrement(), Tenths::ZERO);
        assert_eq!(Tenths::new(2).decrement(), Tenths::new(1));
    }

    #[test]
    fn point_count_accepts_whole_numbers_with_whitespace() {
        let count = PointCount::parse(" 12 ", DEFAULT_MAX_POINTS).expect("valid count");
        assert_eq!(count.get(), 12);
    }

    #[test]
    fn point_count_rejects_blank_input() {
        assert_eq!(
            PointCount::parse("   ", DEFAULT_MAX_POINTS),
            Err(PointCountError::Empty)
        );
    }

    #[test]
    fn point_count_rejects_zero_and_negative_values() {
        assert_eq!(
            PointCount::parse("0", DEFAULT_MAX_POINTS),
            Err(PointCountError::NonPositive { value: 0 })
        );
        assert_eq!(
            PointCount::parse("-4", DEFAULT_MAX_POINTS),
            Err(PointCountError::NonPositive { value: -4 })
        );
    }

    #[test]
    fn point_count_distinguishes_fractions_from_garbage() {
        assert!(matches!(
            PointCount::parse("2.5", DEFAULT_MAX_POINTS),
            Err(PointCountError::NotAnInteger { .. })
        ));
        assert!(matches!(
            PointCount::parse("five", DEFAULT_MAX_POINTS),
            Err(PointCountError::NotANumber { .. })
        ));
    }

    #[test]
    fn point_count_enforces_maximum() {
        assert_eq!(
            PointCount::parse("11", 10),
            Err(PointCountError::TooMany {
                requested: 11,
                max: 10
            })
        );
        assert!(PointCount::new(i64::MAX, u32::MAX).is_err());
        assert_eq!(PointCount::new(10, 10).map(|count| count.get()), Ok(10));
    }

    #[test]
    fn point_count_error_messages_are_user_facing() {
        let error = PointCount::parse("-1", 10).expect_err("negative count");
        assert_eq!(
            error.to_string(),
            "point count must be positive (received -1)"
        );
    }

    #[test]
    fn placement_bounds_subtract_label_margins() {
        let area = PlayArea::new(800.0, 384.0);
        assert_eq!(area.placement_bounds(), (600.0, 334.0));
        let tiny = PlayArea::new(120.0, 20.0);
        assert_eq!(tiny.placement_bounds(), (0.0, 0.0));
    }

    #[test]
    fn circle_view_sorts_and_finds_snapshots() {
        let snapshot = |id: u32| CircleSnapshot {
            id: CircleId::new(id),
            position: Position::new(id as f32, 0.0),
            countdown: COUNTDOWN_START,
            counting: false,
        };
        let view = CircleView::from_snapshots(vec![snapshot(3), snapshot(1), snapshot(2)]);

        let ids: Vec<u32> = view.iter().map(|circle| circle.id.get()).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(
            view.get(CircleId::new(2)).map(|circle| circle.position.x()),
            Some(2.0)
        );
        assert!(view.get(CircleId::new(4)).is_none());
    }

    #[test]
    fn countdown_counts_as_started_once_below_full_window() {
        let snapshot = |countdown: u32| CircleSnapshot {
            id: CircleId::new(1),
            position: Position::new(0.0, 0.0),
            countdown: Tenths::new(countdown),
            counting: countdown > 0,
        };

        assert!(!snapshot(COUNTDOWN_START.get()).has_started_countdown());
        assert!(snapshot(COUNTDOWN_START.get() - 1).has_started_countdown());
        assert!(snapshot(0).has_started_countdown());
        assert!(!snapshot(COUNTDOWN_START.get() - 1).is_expired());
        assert!(snapshot(0).is_expired());
    }

    #[test]
    fn phase_predicates_partition_lifecycle() {
        let over = GamePhase::GameOver {
            reason: GameOverReason::Expired {
                circle: CircleId::new(1),
            },
        };
        assert!(!GamePhase::NotStarted.is_started());
        assert!(GamePhase::InProgress.is_started());
        assert!(!GamePhase::InProgress.is_terminal());
        assert!(over.is_terminal() && over.is_over() && !over.is_finished());
        assert!(GamePhase::Finished.is_terminal() && GamePhase::Finished.is_finished());
    }
}
