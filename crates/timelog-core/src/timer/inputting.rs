use super::tracker::IntervalTracker;
use crate::clock::Clock;
use crate::error::Result;
use crate::storage::KvStore;

/// Store key of the "record form is open" marker.
pub const INPUTTING_FLAG_KEY: &str = "recordToNotion/inputting";

/// Marker set while a record is being entered, so the periodic
/// recording check does not prompt on top of an open form.
pub struct InputtingFlag<S> {
    store: S,
}

impl<S: KvStore> InputtingFlag<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn set(&self) -> Result<()> {
        self.store.set(INPUTTING_FLAG_KEY, "true")
    }

    pub fn get(&self) -> Result<Option<String>> {
        self.store.get(INPUTTING_FLAG_KEY)
    }

    /// Returns whether the marker was present.
    pub fn remove(&self) -> Result<bool> {
        self.store.remove(INPUTTING_FLAG_KEY)
    }
}

/// True when nothing is being timed and no record is being entered,
/// i.e. the user should be asked what they are doing.
pub fn needs_record<S1, C, S2>(
    tracker: &IntervalTracker<S1, C>,
    flag: &InputtingFlag<S2>,
) -> Result<bool>
where
    S1: KvStore,
    C: Clock,
    S2: KvStore,
{
    Ok(tracker.current_interval()?.is_none() && flag.get()?.is_none())
}
