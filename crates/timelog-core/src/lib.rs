//! # timelog core library
//!
//! Business logic behind the `timelog` CLI, which records timestamped
//! activity logs into a Notion database and keeps a timer for the task
//! in progress.
//!
//! ## Architecture
//!
//! - **Timer**: a single persisted interval whose elapsed time is derived
//!   from stored wall-clock checkpoints, so it survives restarts
//! - **Classifier**: ordered keyword rules suggesting an activity category
//!   from a title, with a debounced variant for live input
//! - **Storage**: injectable key-value store (SQLite or in-memory) and
//!   TOML configuration
//! - **Notion**: record store client, request bodies and page renderings
//!
//! ## Key Components
//!
//! - [`IntervalTracker`]: create, inspect, pause and reset the interval
//! - [`ActivityClassifier`]: title to category
//! - [`Debouncer`]: cancel-and-reschedule timer
//! - [`RecordStore`]: create/query/update records

pub mod classifier;
pub mod clock;
pub mod credentials;
pub mod error;
pub mod form;
pub mod notion;
pub mod storage;
pub mod timer;

pub use classifier::{classify, ActivityClassifier, ClassificationDebouncer, Debouncer};
pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{ConfigError, CoreError, NotionError, StorageError, ValidationError};
pub use form::{RecordForm, SubmitOutcome, UpdateForm};
pub use notion::{NotionClient, Page, RecordStore};
pub use storage::{Config, Database, KvStore, MemoryStore};
pub use timer::{InputtingFlag, Interval, IntervalTracker, TimerStatus};
