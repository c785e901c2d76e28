/*!
This module handles the two periodic schedules driving an engine: render ticks and gravity ticks.

Schedules live on the engine's own timeline ([`InGameTime`]), so nothing here touches a real clock.
The engine asks [`Scheduler::next_due`] for the earliest pending tick, and calls
[`Scheduler::fire`] once it has processed it.
*/

use std::time::Duration;

use crate::{Configuration, InGameTime};

/// Identifies one of the two schedules.
#[derive(Eq, PartialEq, Ord, PartialOrd, Clone, Copy, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TimerKind {
    /// Advances the gravity counter, occasionally dropping the active piece.
    Gravity,
    /// Asks the front-end to redraw.
    Render,
}

/// A periodic schedule.
#[derive(Eq, PartialEq, Clone, Copy, Default, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Timer {
    period: Duration,
    next_fire: Option<InGameTime>,
}

/// Both schedules of an engine.
#[derive(Eq, PartialEq, Clone, Copy, Default, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Scheduler {
    gravity: Timer,
    render: Timer,
}

impl Timer {
    // A zero period would make a schedule fire forever without time advancing.
    const MIN_PERIOD: Duration = Duration::from_millis(1);

    fn start(&mut self, now: InGameTime, delay: Duration, period: Duration) {
        self.period = period.max(Self::MIN_PERIOD);
        self.next_fire = Some(now + delay);
    }

    fn cancel(&mut self) {
        self.next_fire = None;
    }

    fn fire(&mut self) {
        if let Some(time) = self.next_fire.as_mut() {
            *time += self.period;
        }
    }

    /// The period between two ticks.
    pub const fn period(&self) -> Duration {
        self.period
    }

    /// When the schedule fires next, or `None` if it is not running.
    pub const fn next_fire(&self) -> Option<InGameTime> {
        self.next_fire
    }
}

impl Scheduler {
    /// Starts (or restarts) both schedules relative to `now`.
    pub fn start(&mut self, now: InGameTime, config: &Configuration) {
        self.gravity
            .start(now, config.gravity_delay, config.gravity_period);
        self.render
            .start(now, config.render_delay, config.render_period);
    }

    /// Stops both schedules. Cancelling twice has no further effect.
    pub fn cancel(&mut self) {
        self.gravity.cancel();
        self.render.cancel();
    }

    /// Whether any schedule is running.
    pub const fn is_active(&self) -> bool {
        self.gravity.next_fire.is_some() || self.render.next_fire.is_some()
    }

    /// Read accessor for one of the schedules.
    pub const fn timer(&self, kind: TimerKind) -> &Timer {
        match kind {
            TimerKind::Gravity => &self.gravity,
            TimerKind::Render => &self.render,
        }
    }

    /// The earliest pending tick.
    ///
    /// When both schedules are due at the same instant, gravity comes first.
    pub fn next_due(&self) -> Option<(InGameTime, TimerKind)> {
        let gravity = self.gravity.next_fire.map(|t| (t, TimerKind::Gravity));
        let render = self.render.next_fire.map(|t| (t, TimerKind::Render));
        match (gravity, render) {
            (Some(g), Some(r)) => Some(if r.0 < g.0 { r } else { g }),
            (g, r) => g.or(r),
        }
    }

    /// Marks the pending tick of a schedule as processed, moving it one period ahead.
    pub fn fire(&mut self, kind: TimerKind) {
        match kind {
            TimerKind::Gravity => self.gravity.fire(),
            TimerKind::Render => self.render.fire(),
        }
    }
}
