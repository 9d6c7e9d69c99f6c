mod inputting;
mod interval;
mod tracker;

pub use inputting::{needs_record, InputtingFlag, INPUTTING_FLAG_KEY};
pub use interval::{format_remaining, Interval, Part};
pub use tracker::{IntervalTracker, TimerStatus, INTERVAL_KEY};
