//! Activity category suggestion from a task title.

mod debounce;
mod rules;
pub mod taxonomy;

pub use debounce::{ClassificationDebouncer, DebounceOutcome, Debouncer, Pending};
pub use rules::{classify, ActivityClassifier, ClassificationRule};
pub use taxonomy::{section_of, Section};
