use timelog_core::storage::Database;
use timelog_core::timer::needs_record;
use timelog_core::{InputtingFlag, IntervalTracker, SystemClock};

/// Prints `true` when no interval is running and no record is being
/// entered, so a scheduler can prompt the user.
pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let tracker = IntervalTracker::new(&db, SystemClock);
    let flag = InputtingFlag::new(&db);
    println!("{}", needs_record(&tracker, &flag)?);
    Ok(())
}
