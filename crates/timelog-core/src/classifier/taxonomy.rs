use serde::Serialize;

/// Top-level grouping of activity categories. Daily reports split on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Section {
    Work,
    Personal,
}

impl Section {
    pub fn as_str(&self) -> &'static str {
        match self {
            Section::Work => "Work",
            Section::Personal => "Personal",
        }
    }
}

pub const DEVELOPMENT: &str = "開発";
pub const MEETING: &str = "会議";
pub const REVIEW: &str = "レビュー";
pub const RESEARCH: &str = "調査";
pub const DOCUMENTATION: &str = "ドキュメント";
pub const COMMUNICATION: &str = "コミュニケーション";
pub const PLANNING: &str = "計画";

pub const BREAK: &str = "休憩";
pub const MEAL: &str = "食事";
pub const EXERCISE: &str = "運動";
pub const STUDY: &str = "学習";
pub const HOUSEWORK: &str = "家事";
pub const COMMUTE: &str = "移動";
pub const SLEEP: &str = "睡眠";
pub const LEISURE: &str = "娯楽";

pub const WORK_CATEGORIES: &[&str] = &[
    DEVELOPMENT,
    MEETING,
    REVIEW,
    RESEARCH,
    DOCUMENTATION,
    COMMUNICATION,
    PLANNING,
];

pub const PERSONAL_CATEGORIES: &[&str] = &[
    BREAK, MEAL, EXERCISE, STUDY, HOUSEWORK, COMMUTE, SLEEP, LEISURE,
];

/// Categories in display order, grouped by section.
pub fn activity_sections() -> [(Section, &'static [&'static str]); 2] {
    [
        (Section::Work, WORK_CATEGORIES),
        (Section::Personal, PERSONAL_CATEGORIES),
    ]
}

/// Section a category belongs to. Unknown or empty categories count as
/// personal time.
pub fn section_of(category: &str) -> Section {
    if WORK_CATEGORIES.contains(&category) {
        Section::Work
    } else {
        Section::Personal
    }
}

pub fn is_known_category(category: &str) -> bool {
    WORK_CATEGORIES.contains(&category) || PERSONAL_CATEGORIES.contains(&category)
}
