use std::num::NonZeroU32;

use clap::Subcommand;
use timelog_core::storage::Database;
use timelog_core::timer::format_remaining;
use timelog_core::{IntervalTracker, SystemClock, TimerStatus};

#[derive(Subcommand)]
pub enum TimerAction {
    /// Start a new interval, replacing any existing one
    Start {
        /// Target length in minutes
        minutes: NonZeroU32,
    },
    /// Show the remaining time; clears the interval once it is complete
    Status {
        /// Print the state as JSON
        #[arg(long)]
        json: bool,
    },
    /// Pause the interval
    Pause,
    /// Resume a paused interval
    Resume,
    /// Drop the interval
    Reset,
}

fn status_line(status: &TimerStatus) -> String {
    match status {
        TimerStatus::Idle => "--:--".to_string(),
        TimerStatus::Running {
            remaining_secs,
            paused: false,
            ..
        } => format_remaining(*remaining_secs),
        TimerStatus::Running {
            remaining_secs,
            paused: true,
            ..
        } => format!("{} (paused)", format_remaining(*remaining_secs)),
        TimerStatus::Completed { length_secs } => {
            format!("done ({} min)", length_secs / 60)
        }
    }
}

pub fn run(action: TimerAction) -> Result<(), Box<dyn std::error::Error>> {
    let tracker = IntervalTracker::new(Database::open()?, SystemClock);

    match action {
        TimerAction::Start { minutes } => {
            let interval = tracker.create_interval(minutes)?;
            println!("{}", serde_json::to_string_pretty(&interval)?);
        }
        TimerAction::Status { json } => {
            let status = tracker.check()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&status)?);
            } else {
                println!("{}", status_line(&status));
            }
        }
        TimerAction::Pause => {
            tracker.pause()?.ok_or("no interval to pause")?;
            println!("{}", status_line(&tracker.check()?));
        }
        TimerAction::Resume => {
            tracker.resume()?.ok_or("no interval to resume")?;
            println!("{}", status_line(&tracker.check()?));
        }
        TimerAction::Reset => {
            tracker.reset_interval()?;
            println!("{{\"type\": \"timer_reset\"}}");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_lines() {
        assert_eq!(status_line(&TimerStatus::Idle), "--:--");
        let running = TimerStatus::Running {
            remaining_secs: 125,
            progress: 10.0,
            paused: false,
        };
        assert_eq!(status_line(&running), "02:05");
        let paused = TimerStatus::Running {
            remaining_secs: 125,
            progress: 10.0,
            paused: true,
        };
        assert_eq!(status_line(&paused), "02:05 (paused)");
        assert_eq!(
            status_line(&TimerStatus::Completed { length_secs: 1500 }),
            "done (25 min)"
        );
    }
}
