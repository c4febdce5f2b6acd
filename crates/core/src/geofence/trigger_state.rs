//! Per-reminder hysteresis state
//!
//! A reminder id is present while it is suppressed: a notification was sent
//! during the current visit and the user has neither moved beyond the re-arm
//! radius nor outlasted the cooldown. Cooldowns are stored as deadlines and
//! checked lazily whenever the tracker is consulted, so no timer runs per
//! reminder.
//!
//! Every mutation happens under one short-held lock, which makes the
//! check-and-insert for a trigger atomic across overlapping ticks. The
//! tracker also carries an epoch that [`TriggerTracker::clear`] bumps; ticks
//! that started before a clear are rejected so they cannot resurrect state
//! after the monitor stops.

use std::collections::HashMap;
use std::time::Instant;

use georemind_domain::GeofenceConfig;
use parking_lot::Mutex;

/// Outcome of evaluating one reminder against one sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Entered the trigger radius while armed; notify now.
    Triggered,
    /// Left beyond the re-arm radius; the next arrival fires again.
    Rearmed,
    /// Dead zone, still suppressed, or still far away.
    Unchanged,
    /// The tracker was cleared after this tick started.
    Stale,
}

#[derive(Debug, Default)]
struct TrackerInner {
    epoch: u64,
    deadlines: HashMap<String, Instant>,
}

/// Triggered-reminder set with cooldown deadlines.
#[derive(Debug, Default)]
pub struct TriggerTracker {
    inner: Mutex<TrackerInner>,
}

impl TriggerTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current epoch; pass it back to [`evaluate`](Self::evaluate).
    pub fn epoch(&self) -> u64 {
        self.inner.lock().epoch
    }

    /// Apply the hysteresis rules for one reminder at `distance_m`.
    pub fn evaluate(
        &self,
        epoch: u64,
        reminder_id: &str,
        distance_m: f64,
        now: Instant,
        settings: &GeofenceConfig,
    ) -> Transition {
        let mut inner = self.inner.lock();
        if inner.epoch != epoch {
            return Transition::Stale;
        }

        if inner.deadlines.get(reminder_id).is_some_and(|deadline| now >= *deadline) {
            inner.deadlines.remove(reminder_id);
        }

        let suppressed = inner.deadlines.contains_key(reminder_id);
        if distance_m <= settings.trigger_radius_m && !suppressed {
            let deadline = now.checked_add(settings.cooldown()).unwrap_or(now);
            inner.deadlines.insert(reminder_id.to_owned(), deadline);
            Transition::Triggered
        } else if distance_m > settings.rearm_radius_m && suppressed {
            inner.deadlines.remove(reminder_id);
            Transition::Rearmed
        } else {
            Transition::Unchanged
        }
    }

    /// Drop every entry whose cooldown has elapsed. Returns how many expired.
    pub fn purge_expired(&self, epoch: u64, now: Instant) -> usize {
        let mut inner = self.inner.lock();
        if inner.epoch != epoch {
            return 0;
        }
        let before = inner.deadlines.len();
        inner.deadlines.retain(|_, deadline| now < *deadline);
        before - inner.deadlines.len()
    }

    pub fn is_triggered(&self, reminder_id: &str, now: Instant) -> bool {
        self.inner.lock().deadlines.get(reminder_id).is_some_and(|deadline| now < *deadline)
    }

    /// Sorted ids that are currently suppressed.
    pub fn snapshot(&self, now: Instant) -> Vec<String> {
        let inner = self.inner.lock();
        let mut ids: Vec<String> = inner
            .deadlines
            .iter()
            .filter(|(_, deadline)| now < **deadline)
            .map(|(id, _)| id.clone())
            .collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.inner.lock().deadlines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Forget all state and invalidate in-flight ticks.
    pub fn clear(&self) {
        let mut inner = self.inner.lock();
        inner.deadlines.clear();
        inner.epoch = inner.epoch.wrapping_add(1);
    }
}
