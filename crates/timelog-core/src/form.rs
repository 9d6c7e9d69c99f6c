//! Record form values, validation and the decisions made around
//! submitting them.
//!
//! Create form times are relative: `start_minutes` is an offset from now
//! (zero or negative) and `minutes` is the task length. Update form times
//! are absolute local datetimes in `YYYY-MM-DDTHH:MM`.

use std::num::NonZeroU32;
use std::sync::LazyLock;

use chrono::{DateTime, FixedOffset};
use regex::Regex;
use serde::Serialize;

use crate::classifier::taxonomy::BREAK;
use crate::error::ValidationError;
use crate::notion::Page;
use crate::storage::NotionProperties;

/// Effectivity select values and their labels.
pub const EFFECTIVITY_OPTIONS: &[(&str, &str)] = &[("A", "Good"), ("B", "Not bad"), ("C", "Bad")];

/// Tension select values and their labels.
pub const TENSION_OPTIONS: &[(&str, &str)] = &[("high", "高い"), ("normal", "普通"), ("low", "低い")];

/// Kinds of unproductive time a record can be tagged with.
pub const WASTE_TIME_CATEGORIES: &[&str] = &[
    "浪費",
    "徒労時間（見返りがない時間）",
    "他人時間（他人がやっても問題ないことをしている時間）",
    "隙間時間（タスクの合間の無為な時間）",
    "邪魔時間（無駄話など予期せぬ邪魔に費やした時間）",
    "対処時間（不注意や準備不足により、必要より多く使ってしまった時間）",
    "過信時間（見積もりが甘かったせいで、タスクが進まなかった時間）",
];

pub const DEFAULT_EFFECTIVITY: &str = "C";
pub const DEFAULT_MINUTES: i64 = 30;

static FORM_DATETIME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d{4}-\d{2}-\d{2}T\d{2}:\d{2}$").expect("datetime pattern is valid")
});

/// Parse a user-typed minute count.
pub fn parse_minutes(field: &str, raw: &str) -> Result<i64, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Required(field.to_string()));
    }
    trimmed
        .parse::<i64>()
        .map_err(|_| ValidationError::NotANumber {
            field: field.to_string(),
            value: raw.to_string(),
        })
}

/// Empty means "not chosen"; anything else must be one of `allowed`.
fn check_option<'a>(
    field: &str,
    value: &str,
    allowed: impl IntoIterator<Item = &'a str>,
) -> Result<(), ValidationError> {
    let allowed: Vec<&str> = allowed.into_iter().collect();
    if value.is_empty() || allowed.iter().any(|option| *option == value) {
        return Ok(());
    }
    Err(ValidationError::InvalidValue {
        field: field.to_string(),
        message: format!("'{value}' is not one of: {}", allowed.join(", ")),
    })
}

fn effectivity_values() -> impl Iterator<Item = &'static str> {
    EFFECTIVITY_OPTIONS.iter().map(|(value, _)| *value)
}

/// Values of the "record a new activity" form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordForm {
    pub title: String,
    pub start_minutes: i64,
    pub minutes: i64,
    pub effectivity: String,
    pub waste_time_category: String,
    pub activity_category: String,
    pub reflection: String,
    pub tension: String,
    pub continue_register: bool,
}

impl Default for RecordForm {
    fn default() -> Self {
        Self {
            title: String::new(),
            start_minutes: 0,
            minutes: DEFAULT_MINUTES,
            effectivity: DEFAULT_EFFECTIVITY.to_string(),
            waste_time_category: String::new(),
            activity_category: String::new(),
            reflection: String::new(),
            tension: String::new(),
            continue_register: false,
        }
    }
}

/// What to do once a record has been created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Keep the form open, pre-filled for the next record.
    ContinueRegister(RecordForm),
    /// Start a timer for the task just recorded.
    StartTimer(NonZeroU32),
    /// Nothing left to do.
    Close,
}

impl RecordForm {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::Required("title".into()));
        }
        if self.start_minutes > 0 {
            return Err(ValidationError::OutOfRange {
                field: "start_minutes".into(),
                bound: "0 or less".into(),
            });
        }
        if self.minutes < 0 {
            return Err(ValidationError::OutOfRange {
                field: "minutes".into(),
                bound: "0 or more".into(),
            });
        }
        check_option("effectivity", &self.effectivity, effectivity_values())?;
        check_option(
            "tension",
            &self.tension,
            TENSION_OPTIONS.iter().map(|(value, _)| *value),
        )?;
        check_option(
            "waste_time_category",
            &self.waste_time_category,
            WASTE_TIME_CATEGORIES.iter().copied(),
        )
    }

    /// Minutes of the task still ahead of now.
    pub fn task_minutes(&self) -> i64 {
        self.minutes.abs() - self.start_minutes.abs()
    }

    /// Fill in the activity category from the title unless the user
    /// already chose one.
    pub fn suggest_category(&mut self, suggest: impl FnOnce(&str) -> Option<String>) {
        if self.activity_category.is_empty() {
            if let Some(category) = suggest(&self.title) {
                self.activity_category = category;
            }
        }
    }

    /// Turn the form into a break of `minutes`.
    pub fn apply_break(&mut self, minutes: i64) {
        self.title = BREAK.to_string();
        self.minutes = minutes;
        self.activity_category = BREAK.to_string();
    }

    /// Start where the latest record ended: the gap since then becomes
    /// both the (negative) start offset and the length.
    pub fn apply_since_last(&mut self, latest_end: DateTime<FixedOffset>, now: DateTime<FixedOffset>) {
        let gap = (now - latest_end).num_minutes().max(0);
        self.start_minutes = -gap;
        self.minutes = gap;
    }

    /// Reuse the title, categories and tension of an earlier record.
    pub fn copy_from(&mut self, page: &Page, props: &NotionProperties) {
        if let Some(title) = page.title(props) {
            self.title = title.to_string();
        }
        self.waste_time_category = page
            .select(&props.waste_time_category)
            .unwrap_or_default()
            .to_string();
        self.activity_category = page
            .select(&props.activity_category)
            .unwrap_or_default()
            .to_string();
        if let Some(tension) = page.select(&props.tension) {
            self.tension = tension.to_string();
        }
    }

    /// Decide what happens after this form was submitted successfully.
    pub fn after_submit(&self) -> SubmitOutcome {
        let task_minutes = self.task_minutes();
        if self.continue_register && task_minutes <= 0 {
            let next_start = self.start_minutes + self.minutes;
            return SubmitOutcome::ContinueRegister(RecordForm {
                start_minutes: next_start,
                minutes: if next_start > 0 { next_start } else { DEFAULT_MINUTES },
                continue_register: true,
                ..RecordForm::default()
            });
        }
        match u32::try_from(task_minutes).ok().and_then(NonZeroU32::new) {
            Some(minutes) => SubmitOutcome::StartTimer(minutes),
            None => SubmitOutcome::Close,
        }
    }
}

/// Values of the "update a recent record" form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UpdateForm {
    pub page_id: String,
    pub title: String,
    pub start: String,
    pub end: String,
    pub effectivity: String,
    pub waste_time_category: String,
    pub activity_category: String,
    pub reflection: String,
}

impl UpdateForm {
    /// Pre-fill from an existing page.
    pub fn from_page(page: &Page, props: &NotionProperties) -> Self {
        let (start, end) = page.date_range(props).unwrap_or_default();
        let minute_prefix = |s: &str| s.get(..16).unwrap_or(s).to_string();
        Self {
            page_id: page.id.clone(),
            title: page.title(props).unwrap_or_default().to_string(),
            start: minute_prefix(start),
            end: end.map(minute_prefix).unwrap_or_default(),
            effectivity: page.select(&props.effectivity).unwrap_or_default().to_string(),
            waste_time_category: page
                .select(&props.waste_time_category)
                .unwrap_or_default()
                .to_string(),
            activity_category: page
                .select(&props.activity_category)
                .unwrap_or_default()
                .to_string(),
            reflection: page.rich_text(&props.reflection).unwrap_or_default().to_string(),
        }
    }

    /// Set the end to the current minute.
    pub fn end_now(&mut self, now: DateTime<FixedOffset>) {
        self.end = now.format("%Y-%m-%dT%H:%M").to_string();
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.page_id.is_empty() {
            return Err(ValidationError::Required("page_id".into()));
        }
        if self.title.trim().is_empty() {
            return Err(ValidationError::Required("title".into()));
        }
        for (field, value) in [("start", &self.start), ("end", &self.end)] {
            if value.is_empty() {
                return Err(ValidationError::Required(field.into()));
            }
            if !FORM_DATETIME.is_match(value) {
                return Err(ValidationError::BadDateFormat {
                    field: field.into(),
                    value: value.clone(),
                });
            }
        }
        check_option("effectivity", &self.effectivity, effectivity_values())?;
        check_option(
            "waste_time_category",
            &self.waste_time_category,
            WASTE_TIME_CATEGORIES.iter().copied(),
        )
    }
}
