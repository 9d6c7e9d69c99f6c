use std::num::NonZeroU32;

use serde::Serialize;
use tracing::{debug, warn};

use super::interval::Interval;
use crate::clock::Clock;
use crate::error::Result;
use crate::storage::KvStore;

/// Store key of the single live interval.
pub const INTERVAL_KEY: &str = "recordToNotion/1.1";

/// What the menu-bar style check reports.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum TimerStatus {
    Idle,
    Running {
        remaining_secs: i64,
        progress: f64,
        paused: bool,
    },
    /// The interval reached its target and has been cleared.
    Completed { length_secs: u64 },
}

/// Owns the one persisted interval. Holds no timer state in memory;
/// every call reads or replaces the stored value wholesale.
pub struct IntervalTracker<S, C> {
    store: S,
    clock: C,
}

impl<S: KvStore, C: Clock> IntervalTracker<S, C> {
    pub fn new(store: S, clock: C) -> Self {
        Self { store, clock }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Start a new interval now, replacing whatever was stored.
    pub fn create_interval(&self, target_minutes: NonZeroU32) -> Result<Interval> {
        let interval = Interval::start(target_minutes, self.clock.now_epoch_secs());
        self.save(&interval)?;
        debug!(length = interval.length(), "interval created");
        Ok(interval)
    }

    pub fn duration(&self, interval: &Interval) -> u64 {
        interval.duration(self.clock.now_epoch_secs())
    }

    pub fn progress(&self, interval: &Interval) -> f64 {
        interval.progress(self.clock.now_epoch_secs())
    }

    pub fn remaining(&self, interval: &Interval) -> i64 {
        interval.remaining(self.clock.now_epoch_secs())
    }

    /// Drop the stored interval. Idempotent.
    pub fn reset_interval(&self) -> Result<()> {
        if self.store.remove(INTERVAL_KEY)? {
            debug!("interval reset");
        }
        Ok(())
    }

    /// The stored interval, if any. A value that fails to parse is
    /// treated as absent.
    pub fn current_interval(&self) -> Result<Option<Interval>> {
        let Some(raw) = self.store.get(INTERVAL_KEY)? else {
            return Ok(None);
        };
        if raw.is_empty() {
            return Ok(None);
        }
        match serde_json::from_str::<Interval>(&raw) {
            Ok(interval) => Ok(Some(interval)),
            Err(e) => {
                warn!(error = %e, "discarding corrupt stored interval");
                Ok(None)
            }
        }
    }

    /// Report the current state, clearing the interval once it is complete.
    pub fn check(&self) -> Result<TimerStatus> {
        let Some(interval) = self.current_interval()? else {
            return Ok(TimerStatus::Idle);
        };
        let now = self.clock.now_epoch_secs();
        if interval.is_complete(now) {
            self.reset_interval()?;
            return Ok(TimerStatus::Completed {
                length_secs: interval.length(),
            });
        }
        Ok(TimerStatus::Running {
            remaining_secs: interval.remaining(now),
            progress: interval.progress(now),
            paused: !interval.is_running(),
        })
    }

    /// Pause the stored interval. `None` when nothing is stored.
    pub fn pause(&self) -> Result<Option<Interval>> {
        self.mutate(|interval, now| interval.pause(now))
    }

    /// Resume the stored interval. `None` when nothing is stored.
    pub fn resume(&self) -> Result<Option<Interval>> {
        self.mutate(|interval, now| interval.resume(now))
    }

    fn mutate(&self, f: impl FnOnce(&mut Interval, i64) -> bool) -> Result<Option<Interval>> {
        let Some(mut interval) = self.current_interval()? else {
            return Ok(None);
        };
        if f(&mut interval, self.clock.now_epoch_secs()) {
            self.save(&interval)?;
        }
        Ok(Some(interval))
    }

    fn save(&self, interval: &Interval) -> Result<()> {
        let json = serde_json::to_string(interval)?;
        self.store.set(INTERVAL_KEY, &json)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::clock::FixedClock;
    use crate::storage::MemoryStore;

    fn tracker() -> (IntervalTracker<MemoryStore, Arc<FixedClock>>, Arc<FixedClock>) {
        let clock = Arc::new(FixedClock::new(1_700_000_000));
        (IntervalTracker::new(MemoryStore::new(), clock.clone()), clock)
    }

    fn minutes(m: u32) -> NonZeroU32 {
        NonZeroU32::new(m).unwrap()
    }

    #[test]
    fn create_persists_and_starts_at_zero() {
        let (tracker, _) = tracker();
        let created = tracker.create_interval(minutes(15)).unwrap();
        assert_eq!(created.length(), 900);
        assert_eq!(tracker.duration(&created), 0);
        assert_eq!(tracker.current_interval().unwrap(), Some(created));
    }

    #[test]
    fn create_overwrites_previous_interval() {
        let (tracker, clock) = tracker();
        tracker.create_interval(minutes(15)).unwrap();
        clock.advance(100);
        let second = tracker.create_interval(minutes(1)).unwrap();
        assert_eq!(tracker.current_interval().unwrap(), Some(second));
    }

    #[test]
    fn duration_grows_with_the_clock() {
        let (tracker, clock) = tracker();
        let interval = tracker.create_interval(minutes(10)).unwrap();
        let first = tracker.duration(&interval);
        clock.advance(42);
        let second = tracker.duration(&interval);
        assert!(first <= second);
        assert_eq!(second, 42);
        assert_eq!(
            tracker.progress(&interval),
            second as f64 / interval.length() as f64 * 100.0
        );
    }

    #[test]
    fn reset_twice_is_fine() {
        let (tracker, _) = tracker();
        tracker.create_interval(minutes(5)).unwrap();
        tracker.reset_interval().unwrap();
        tracker.reset_interval().unwrap();
        assert!(tracker.current_interval().unwrap().is_none());
    }

    #[test]
    fn corrupt_json_reads_as_absent() {
        let (tracker, _) = tracker();
        tracker.store().set(INTERVAL_KEY, "{not json").unwrap();
        assert!(tracker.current_interval().unwrap().is_none());
        tracker.store().set(INTERVAL_KEY, "").unwrap();
        assert!(tracker.current_interval().unwrap().is_none());
    }

    #[test]
    fn check_clears_completed_interval() {
        let (tracker, clock) = tracker();
        assert_eq!(tracker.check().unwrap(), TimerStatus::Idle);

        tracker.create_interval(minutes(1)).unwrap();
        clock.advance(30);
        assert_eq!(
            tracker.check().unwrap(),
            TimerStatus::Running {
                remaining_secs: 30,
                progress: 50.0,
                paused: false
            }
        );

        clock.advance(30);
        assert_eq!(
            tracker.check().unwrap(),
            TimerStatus::Completed { length_secs: 60 }
        );
        assert!(tracker.current_interval().unwrap().is_none());
    }

    #[test]
    fn paused_interval_stops_accumulating() {
        let (tracker, clock) = tracker();
        tracker.create_interval(minutes(1)).unwrap();
        clock.advance(20);
        let paused = tracker.pause().unwrap().unwrap();
        clock.advance(1_000);
        assert_eq!(tracker.duration(&paused), 20);
        assert!(matches!(
            tracker.check().unwrap(),
            TimerStatus::Running { paused: true, remaining_secs: 40, .. }
        ));

        tracker.resume().unwrap();
        clock.advance(5);
        let resumed = tracker.current_interval().unwrap().unwrap();
        assert_eq!(tracker.duration(&resumed), 25);
    }

    #[test]
    fn pause_without_interval_is_none() {
        let (tracker, _) = tracker();
        assert!(tracker.pause().unwrap().is_none());
        assert!(tracker.resume().unwrap().is_none());
    }
}
