//! Ordered keyword rules mapping a task title to an activity category.
//!
//! Rules are tried top to bottom and the first match wins, even when a
//! later rule's keyword also appears in the title. There is no scoring.

use std::sync::LazyLock;

use regex::Regex;

use super::taxonomy::*;

/// Built-in rule table. Latin keywords are written lower-case because
/// titles are lower-cased before matching; Japanese keywords match as
/// written. Word boundaries are ASCII-only (`(?-u:\b)`) so a Latin
/// keyword written flush against kana or kanji, as in `定例MTG`, still
/// counts as a whole word.
const DEFAULT_RULES: &[(&str, &str)] = &[
    (r"レビュー|(?-u:\b)review", REVIEW),
    (
        r"実装|修正|開発|コーディング|バグ|リファクタ|デプロイ|(?-u:\b)fix|(?-u:\b)bug|implement|refactor|(?-u:\b)cod(e|ing)(?-u:\b)|(?-u:\b)deploy|(?-u:\b)pr(?-u:\b)",
        DEVELOPMENT,
    ),
    (
        r"会議|ミーティング|打ち合わせ|打合せ|面談|商談|1on1|(?-u:\b)mtg(?-u:\b)|meeting|(?-u:\b)sync(?-u:\b)",
        MEETING,
    ),
    (r"調査|リサーチ|検証|調べ|research|investigat", RESEARCH),
    (
        r"ドキュメント|資料|仕様書|議事録|執筆|(?-u:\b)docs?(?-u:\b)|(?-u:\b)write|writing",
        DOCUMENTATION,
    ),
    (
        r"メール|チャット|返信|連絡|(?-u:\b)slack(?-u:\b)|(?-u:\b)mail(?-u:\b)|(?-u:\b)email(?-u:\b)",
        COMMUNICATION,
    ),
    (r"計画|タスク|振り返り|段取り|(?-u:\b)plan|(?-u:\b)todo(?-u:\b)", PLANNING),
    (r"休憩|昼寝|仮眠|(?-u:\b)break(?-u:\b)|(?-u:\b)rest(?-u:\b)", BREAK),
    (
        r"食事|朝食|昼食|夕食|ご飯|ランチ|ディナー|breakfast|lunch|dinner",
        MEAL,
    ),
    (
        r"運動|筋トレ|散歩|ジム|ランニング|ストレッチ|(?-u:\b)gym(?-u:\b)|workout|(?-u:\b)run(ning)?(?-u:\b)|(?-u:\b)walk",
        EXERCISE,
    ),
    (r"勉強|学習|読書|(?-u:\b)study|(?-u:\b)learn|(?-u:\b)reading(?-u:\b)", STUDY),
    (
        r"掃除|洗濯|料理|買い物|家事|(?-u:\b)cleaning(?-u:\b)|(?-u:\b)cooking(?-u:\b)|(?-u:\b)laundry(?-u:\b)",
        HOUSEWORK,
    ),
    (r"移動|通勤|帰宅|(?-u:\b)commute", COMMUTE),
    (r"睡眠|就寝|(?-u:\b)sleep", SLEEP),
    (r"ゲーム|動画|漫画|映画|(?-u:\b)game|youtube|netflix|(?-u:\b)sns(?-u:\b)", LEISURE),
];

/// One (pattern, category) pair.
#[derive(Debug, Clone)]
pub struct ClassificationRule {
    pattern: Regex,
    category: String,
}

impl ClassificationRule {
    pub fn new(pattern: &str, category: impl Into<String>) -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: Regex::new(pattern)?,
            category: category.into(),
        })
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn matches(&self, lowered_title: &str) -> bool {
        self.pattern.is_match(lowered_title)
    }
}

/// Linear scan over an ordered rule list.
#[derive(Debug, Clone)]
pub struct ActivityClassifier {
    rules: Vec<ClassificationRule>,
}

static DEFAULT_CLASSIFIER: LazyLock<ActivityClassifier> = LazyLock::new(|| {
    let rules = DEFAULT_RULES
        .iter()
        .map(|(pattern, category)| {
            ClassificationRule::new(pattern, *category).expect("built-in rule pattern is valid")
        })
        .collect();
    ActivityClassifier::new(rules)
});

impl ActivityClassifier {
    pub fn new(rules: Vec<ClassificationRule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[ClassificationRule] {
        &self.rules
    }

    /// Category of the first rule matching anywhere in the title, or
    /// `None` to leave the field for manual entry.
    pub fn classify(&self, title: &str) -> Option<&str> {
        let lowered = title.to_lowercase();
        self.rules
            .iter()
            .find(|rule| rule.matches(&lowered))
            .map(ClassificationRule::category)
    }
}

impl Default for ActivityClassifier {
    fn default() -> Self {
        DEFAULT_CLASSIFIER.clone()
    }
}

/// Classify with the built-in rule table.
pub fn classify(title: &str) -> Option<&'static str> {
    DEFAULT_CLASSIFIER.classify(title)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_rules_compile_and_map_to_known_categories() {
        let classifier = ActivityClassifier::default();
        assert_eq!(classifier.rules().len(), DEFAULT_RULES.len());
        for rule in classifier.rules() {
            assert!(is_known_category(rule.category()), "{}", rule.category());
        }
    }

    #[test]
    fn first_matching_rule_wins() {
        // "タスク" alone would mean planning, but the fix rule comes first.
        assert_eq!(classify("開発用タスクを修正する"), Some(DEVELOPMENT));
        assert_eq!(classify("タスクの整理"), Some(PLANNING));
    }

    #[test]
    fn japanese_titles() {
        assert_eq!(classify("会議の準備"), Some(MEETING));
        assert_eq!(classify("PRのレビュー"), Some(REVIEW));
        assert_eq!(classify("昼食"), Some(MEAL));
        assert_eq!(classify("休憩"), Some(BREAK));
        assert_eq!(classify("通勤中に読書"), Some(STUDY));
    }

    #[test]
    fn latin_keywords_are_case_insensitive() {
        assert_eq!(classify("Fix login BUG"), Some(DEVELOPMENT));
        assert_eq!(classify("Weekly MTG"), Some(MEETING));
        assert_eq!(classify("Lunch with team"), Some(MEAL));
    }

    #[test]
    fn latin_keywords_inside_longer_words_do_not_match() {
        assert_eq!(classify("xyz123 unrelated"), None);
        // "run" and "pr" are embedded, not whole words.
        assert_eq!(classify("brunch"), None);
        assert_eq!(classify("sprint"), None);
        assert_eq!(classify(""), None);
    }

    #[test]
    fn latin_keywords_next_to_japanese_text() {
        assert_eq!(classify("定例MTG"), Some(MEETING));
        assert_eq!(classify("MTGの準備"), Some(MEETING));
        assert_eq!(classify("PR作成"), Some(DEVELOPMENT));
        assert_eq!(classify("codeを書く"), Some(DEVELOPMENT));
        assert_eq!(classify("朝のrunning"), Some(EXERCISE));
    }

    #[test]
    fn custom_rules_keep_their_order() {
        let classifier = ActivityClassifier::new(vec![
            ClassificationRule::new("a", "first").unwrap(),
            ClassificationRule::new("ab", "second").unwrap(),
        ]);
        assert_eq!(classifier.classify("AB"), Some("first"));
        assert!(ClassificationRule::new("(", "bad").is_err());
    }
}
