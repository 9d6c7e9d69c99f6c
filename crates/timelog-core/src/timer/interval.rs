//! Interval data model.
//!
//! An interval is a target length plus an ordered list of running
//! segments. Elapsed time is always derived from the stored timestamps,
//! never accumulated, so a restarted process sees the same duration.

use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};

/// One contiguous running segment. `paused_at == None` means still running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    pub started_at: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paused_at: Option<i64>,
}

impl Part {
    pub fn running(started_at: i64) -> Self {
        Self {
            started_at,
            paused_at: None,
        }
    }

    pub fn is_live(&self) -> bool {
        self.paused_at.is_none()
    }

    /// Seconds this part contributes at `now`. Clamped at zero so a clock
    /// that stepped backwards never yields negative time.
    pub fn elapsed(&self, now: i64) -> u64 {
        let end = self.paused_at.unwrap_or(now);
        end.saturating_sub(self.started_at).max(0) as u64
    }
}

/// A timed task attempt.
///
/// Invariants, checked on every deserialization:
/// - at least one part
/// - only the last part may be live
/// - `paused_at >= started_at` for completed parts
/// - `length > 0`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawInterval")]
pub struct Interval {
    parts: Vec<Part>,
    length: u64,
}

#[derive(Deserialize)]
struct RawInterval {
    parts: Vec<Part>,
    length: u64,
}

impl TryFrom<RawInterval> for Interval {
    type Error = String;

    fn try_from(raw: RawInterval) -> Result<Self, Self::Error> {
        if raw.length == 0 {
            return Err("interval length must be positive".into());
        }
        let Some((last, earlier)) = raw.parts.split_last() else {
            return Err("interval has no parts".into());
        };
        if earlier.iter().any(Part::is_live) {
            return Err("only the last part may be running".into());
        }
        let inverted = earlier
            .iter()
            .chain(std::iter::once(last))
            .any(|p| p.paused_at.is_some_and(|paused| paused < p.started_at));
        if inverted {
            return Err("part paused before it started".into());
        }
        Ok(Self {
            parts: raw.parts,
            length: raw.length,
        })
    }
}

impl Interval {
    /// Fresh single-part interval running since `now`.
    pub fn start(target_minutes: NonZeroU32, now: i64) -> Self {
        Self {
            parts: vec![Part::running(now)],
            length: u64::from(target_minutes.get()) * 60,
        }
    }

    pub fn parts(&self) -> &[Part] {
        &self.parts
    }

    /// Target length in seconds.
    pub fn length(&self) -> u64 {
        self.length
    }

    pub fn is_running(&self) -> bool {
        self.parts.last().is_some_and(Part::is_live)
    }

    /// Elapsed seconds across every part.
    pub fn duration(&self, now: i64) -> u64 {
        self.parts.iter().map(|p| p.elapsed(now)).sum()
    }

    /// Percentage of the target length elapsed. Not clamped; anything
    /// at or above 100 means complete.
    pub fn progress(&self, now: i64) -> f64 {
        self.duration(now) as f64 / self.length as f64 * 100.0
    }

    /// Seconds left until the target length; negative once overrun.
    pub fn remaining(&self, now: i64) -> i64 {
        self.length as i64 - self.duration(now) as i64
    }

    pub fn is_complete(&self, now: i64) -> bool {
        self.progress(now) >= 100.0
    }

    /// Close the live part at `now`. Returns false if already paused.
    pub fn pause(&mut self, now: i64) -> bool {
        match self.parts.last_mut() {
            Some(last) if last.is_live() => {
                last.paused_at = Some(now.max(last.started_at));
                true
            }
            _ => false,
        }
    }

    /// Open a new live part at `now`. Returns false if already running.
    pub fn resume(&mut self, now: i64) -> bool {
        if self.is_running() {
            return false;
        }
        self.parts.push(Part::running(now));
        true
    }
}

/// Render seconds as `MM:SS`, or `H:MM:SS` from one hour up. Negative
/// values (overrun) carry a leading `-`.
pub fn format_remaining(secs: i64) -> String {
    let sign = if secs < 0 { "-" } else { "" };
    let abs = secs.unsigned_abs();
    let (h, m, s) = (abs / 3600, abs % 3600 / 60, abs % 60);
    if h > 0 {
        format!("{sign}{h}:{m:02}:{s:02}")
    } else {
        format!("{sign}{m:02}:{s:02}")
    }
}
