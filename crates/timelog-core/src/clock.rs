//! Wall-clock source injected into the tracker and the request builders,
//! so tests can pin "now".

use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{DateTime, FixedOffset, Local, Offset, Utc};

/// Provides the current time across the library.
pub trait Clock: Send + Sync {
    /// Current epoch time in whole seconds, rounded to the nearest second.
    fn now_epoch_secs(&self) -> i64;

    /// Current time in the user's local offset.
    fn now_local(&self) -> DateTime<FixedOffset>;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now_epoch_secs(&self) -> i64 {
        (Utc::now().timestamp_millis() as f64 / 1000.0).round() as i64
    }

    fn now_local(&self) -> DateTime<FixedOffset> {
        Local::now().fixed_offset()
    }
}

/// Manually driven clock for tests.
#[derive(Debug)]
pub struct FixedClock {
    epoch_secs: AtomicI64,
    offset: FixedOffset,
}

impl FixedClock {
    pub fn new(epoch_secs: i64) -> Self {
        Self::with_offset(epoch_secs, Utc.fix())
    }

    pub fn with_offset(epoch_secs: i64, offset: FixedOffset) -> Self {
        Self {
            epoch_secs: AtomicI64::new(epoch_secs),
            offset,
        }
    }

    pub fn set(&self, epoch_secs: i64) {
        self.epoch_secs.store(epoch_secs, Ordering::SeqCst);
    }

    pub fn advance(&self, secs: i64) {
        self.epoch_secs.fetch_add(secs, Ordering::SeqCst);
    }
}

impl Clock for FixedClock {
    fn now_epoch_secs(&self) -> i64 {
        self.epoch_secs.load(Ordering::SeqCst)
    }

    fn now_local(&self) -> DateTime<FixedOffset> {
        let utc = DateTime::<Utc>::from_timestamp(self.now_epoch_secs(), 0).unwrap_or_default();
        utc.with_timezone(&self.offset)
    }
}

impl<C: Clock + ?Sized> Clock for std::sync::Arc<C> {
    fn now_epoch_secs(&self) -> i64 {
        (**self).now_epoch_secs()
    }

    fn now_local(&self) -> DateTime<FixedOffset> {
        (**self).now_local()
    }
}
