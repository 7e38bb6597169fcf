//! Cancellable game timers owned by the world.
//!
//! Three families exist: the stopwatch, one countdown per cleared circle, and
//! the simulated clicks scheduled by auto-play. All of them are advanced by
//! simulated time only, and [`TimerSet::teardown`] releases every family at
//! once.

use std::{collections::BTreeMap, time::Duration};

use circle_dash_core::{CircleId, AUTO_PLAY_SPACING, COUNTDOWN_WINDOW, TICK_PERIOD};

/// Recurring timer that fires once per elapsed period.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Interval {
    period: Duration,
    until_next: Duration,
}

impl Interval {
    fn new(period: Duration) -> Self {
        Self {
            period,
            until_next: period,
        }
    }

    /// Consumes `step`, which must not exceed the time until the next firing.
    fn advance(&mut self, step: Duration) -> bool {
        debug_assert!(step <= self.until_next, "interval stepped past deadline");
        self.until_next = self.until_next.saturating_sub(step);
        if self.until_next.is_zero() {
            self.until_next = self.period;
            true
        } else {
            false
        }
    }
}

/// Per-circle countdown that cancels itself once its window has elapsed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Countdown {
    interval: Interval,
    ticks_left: u32,
}

impl Countdown {
    fn new() -> Self {
        Self {
            interval: Interval::new(TICK_PERIOD),
            ticks_left: window_ticks(),
        }
    }
}

fn window_ticks() -> u32 {
    let period = TICK_PERIOD.as_millis().max(1);
    u32::try_from(COUNTDOWN_WINDOW.as_millis() / period).unwrap_or(u32::MAX)
}

/// Countdown firing reported by [`TimerSet::advance`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct CountdownTick {
    /// Circle whose countdown moved by one tenth.
    pub(crate) circle: CircleId,
    /// Whether this was the last tick of the window; the timer is gone afterwards.
    pub(crate) window_closed: bool,
}

/// Timers that fired while advancing by a single step.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct Fired {
    /// Whether the stopwatch advanced by one tenth.
    pub(crate) stopwatch: bool,
    /// Countdown ticks in circle order.
    pub(crate) countdowns: Vec<CountdownTick>,
    /// Simulated clicks that became due, in circle order.
    pub(crate) auto_clicks: Vec<CircleId>,
}

impl Fired {
    pub(crate) fn is_empty(&self) -> bool {
        !self.stopwatch && self.countdowns.is_empty() && self.auto_clicks.is_empty()
    }
}

/// Owned set of every active game timer.
#[derive(Clone, Debug, Default)]
pub(crate) struct TimerSet {
    stopwatch: Option<Interval>,
    countdowns: BTreeMap<CircleId, Countdown>,
    auto_clicks: BTreeMap<CircleId, Duration>,
}

impl TimerSet {
    pub(crate) fn start_stopwatch(&mut self) {
        self.stopwatch = Some(Interval::new(TICK_PERIOD));
    }

    pub(crate) fn stopwatch_running(&self) -> bool {
        self.stopwatch.is_some()
    }

    /// Starts a fresh countdown for the circle, replacing any previous one.
    pub(crate) fn start_countdown(&mut self, circle: CircleId) {
        let _ = self.countdowns.insert(circle, Countdown::new());
    }

    pub(crate) fn is_counting(&self, circle: CircleId) -> bool {
        self.countdowns.contains_key(&circle)
    }

    pub(crate) fn active_countdowns(&self) -> usize {
        self.countdowns.len()
    }

    /// Time until the circle's countdown reaches zero, if it is counting.
    pub(crate) fn time_to_expiry(&self, circle: CircleId) -> Option<Duration> {
        let countdown = self.countdowns.get(&circle)?;
        let later_ticks = countdown.ticks_left.saturating_sub(1);
        Some(
            countdown
                .interval
                .until_next
                .saturating_add(countdown.interval.period.saturating_mul(later_ticks)),
        )
    }

    /// Schedules one simulated click per circle, the first after `first_delay`
    /// and each following one [`AUTO_PLAY_SPACING`] later.
    ///
    /// Any previously scheduled clicks are discarded first. Returns the number
    /// of clicks scheduled.
    pub(crate) fn schedule_auto_clicks<I>(&mut self, circles: I, first_delay: Duration) -> u32
    where
        I: IntoIterator<Item = CircleId>,
    {
        self.auto_clicks.clear();
        let mut delay = first_delay;
        let mut scheduled = 0;
        for circle in circles {
            let _ = self.auto_clicks.insert(circle, delay);
            delay = delay.saturating_add(AUTO_PLAY_SPACING);
            scheduled += 1;
        }
        scheduled
    }

    pub(crate) fn cancel_auto_click(&mut self, circle: CircleId) {
        let _ = self.auto_clicks.remove(&circle);
    }

    pub(crate) fn cancel_auto_clicks(&mut self) {
        self.auto_clicks.clear();
    }

    pub(crate) fn pending_auto_clicks(&self) -> usize {
        self.auto_clicks.len()
    }

    /// Cancels every timer of every family.
    pub(crate) fn teardown(&mut self) {
        self.stopwatch = None;
        self.countdowns.clear();
        self.auto_clicks.clear();
    }

    /// Time until the earliest timer fires, if any timer is active.
    pub(crate) fn next_deadline(&self) -> Option<Duration> {
        let stopwatch = self.stopwatch.map(|interval| interval.until_next);
        let countdowns = self
            .countdowns
            .values()
            .map(|countdown| countdown.interval.until_next);
        let auto_clicks = self.auto_clicks.values().copied();

        stopwatch.into_iter().chain(countdowns).chain(auto_clicks).min()
    }

    /// Advances every timer by `step`, which must not exceed [`Self::next_deadline`].
    pub(crate) fn advance(&mut self, step: Duration) -> Fired {
        let mut fired = Fired::default();

        if let Some(stopwatch) = self.stopwatch.as_mut() {
            fired.stopwatch = stopwatch.advance(step);
        }

        for (circle, countdown) in self.countdowns.iter_mut() {
            if countdown.interval.advance(step) {
                countdown.ticks_left = countdown.ticks_left.saturating_sub(1);
                fired.countdowns.push(CountdownTick {
                    circle: *circle,
                    window_closed: countdown.ticks_left == 0,
                });
            }
        }
        self.countdowns
            .retain(|_, countdown| countdown.ticks_left > 0);

        for (circle, remaining) in self.auto_clicks.iter_mut() {
            *remaining = remaining.saturating_sub(step);
            if remaining.is_zero() {
                fired.auto_clicks.push(*circle);
            }
        }
        self.auto_clicks.retain(|_, remaining| !remaining.is_zero());

        fired
    }
}
