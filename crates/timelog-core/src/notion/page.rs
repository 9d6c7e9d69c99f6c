//! Read access to Notion page objects and their text renderings.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::NotionError;
use crate::storage::NotionProperties;

/// A database page. Only the fields this crate reads are typed; property
/// values stay as raw JSON because their names are user-configured.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub id: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub properties: Map<String, Value>,
}

/// `HH:MM` out of an ISO-8601 datetime, empty for date-only values.
fn clock_time(iso: &str) -> &str {
    iso.get(11..16).unwrap_or("")
}

impl Page {
    pub fn property(&self, name: &str) -> Option<&Value> {
        self.properties.get(name)
    }

    /// Plain text of the first title fragment.
    pub fn title(&self, props: &NotionProperties) -> Option<&str> {
        self.property(&props.title)?
            .get("title")?
            .get(0)?
            .get("plain_text")?
            .as_str()
    }

    /// Raw `start` and optional `end` of the time property.
    pub fn date_range(&self, props: &NotionProperties) -> Option<(&str, Option<&str>)> {
        let date = self.property(&props.time)?.get("date")?;
        let start = date.get("start")?.as_str()?;
        let end = date.get("end").and_then(Value::as_str);
        Some((start, end))
    }

    pub fn start_time(&self, props: &NotionProperties) -> Option<DateTime<FixedOffset>> {
        let (start, _) = self.date_range(props)?;
        DateTime::parse_from_rfc3339(start).ok()
    }

    pub fn end_time(&self, props: &NotionProperties) -> Option<DateTime<FixedOffset>> {
        let (_, end) = self.date_range(props)?;
        DateTime::parse_from_rfc3339(end?).ok()
    }

    /// Plain text of the first rich-text fragment of `name`.
    pub fn rich_text(&self, name: &str) -> Option<&str> {
        self.property(name)?
            .get("rich_text")?
            .get(0)?
            .get("plain_text")?
            .as_str()
    }

    /// Selected option name of `name`, if one is selected.
    pub fn select(&self, name: &str) -> Option<&str> {
        self.property(name)?.get("select")?.get("name")?.as_str()
    }

    fn require_title(&self, props: &NotionProperties) -> Result<&str, NotionError> {
        self.title(props).ok_or_else(|| self.missing(&props.title))
    }

    fn require_range(&self, props: &NotionProperties) -> Result<(&str, Option<&str>), NotionError> {
        self.date_range(props).ok_or_else(|| self.missing(&props.time))
    }

    fn missing(&self, property: &str) -> NotionError {
        NotionError::MissingProperty {
            page_id: self.id.clone(),
            property: property.to_string(),
        }
    }
}

/// Title only.
pub fn extract_page_title<'a>(page: &'a Page, props: &NotionProperties) -> Result<&'a str, NotionError> {
    page.require_title(props)
}

/// One-line summary: `title HH:MM ~ HH:MM`.
pub fn format_page_title(page: &Page, props: &NotionProperties) -> Result<String, NotionError> {
    let title = page.require_title(props)?;
    let (start, end) = page.require_range(props)?;
    Ok(format!(
        "{title} {} ~ {}",
        clock_time(start),
        end.map(clock_time).unwrap_or("")
    ))
}

/// Clipboard text after an update. Records that start in the future
/// carry their success criteria; past ones carry a reflection.
pub fn page_to_clipboard_text(
    page: &Page,
    props: &NotionProperties,
    now: DateTime<FixedOffset>,
) -> Result<String, NotionError> {
    let title = page.require_title(props)?;
    let (start, end) = page.require_range(props)?;
    let reflection = page.rich_text(&props.reflection).unwrap_or("");

    let heading = match page.start_time(props) {
        Some(start_at) if start_at > now => "## 達成基準",
        _ => "## 振り返り",
    };

    Ok(format!(
        "{} ~ {} \n{title}\n\n{heading}\n{reflection}",
        clock_time(start),
        end.map(clock_time).unwrap_or("")
    ))
}

/// Block used in the daily reflection report.
pub fn format_for_reflection(page: &Page, props: &NotionProperties) -> Result<String, NotionError> {
    let mut out = format!("### {}", format_page_title(page, props)?);
    let fields = [
        ("カテゴリ", page.select(&props.activity_category)),
        ("効果", page.select(&props.effectivity)),
        ("テンション", page.select(&props.tension)),
        ("時間分類", page.select(&props.waste_time_category)),
    ];
    for (label, value) in fields {
        if let Some(value) = value.filter(|v| !v.is_empty()) {
            out.push_str(&format!("\n- {label}: {value}"));
        }
    }
    if let Some(reflection) = page.rich_text(&props.reflection).filter(|r| !r.is_empty()) {
        out.push('\n');
        out.push_str(reflection);
    }
    Ok(out)
}


#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::fixtures::page;
    use super::*;

    fn props() -> NotionProperties {
        NotionProperties::default()
    }

    #[test]
    fn accessors_read_api_shapes() {
        let p = page(
            "p1",
            "設計",
            "2024-05-01T10:00:00.000+09:00",
            Some("2024-05-01T10:30:00.000+09:00"),
            Some("開発"),
        );
        assert_eq!(p.title(&props()), Some("設計"));
        assert_eq!(p.select("Category"), Some("開発"));
        assert_eq!(p.select("WasteTimeCategory"), None);
        assert_eq!(p.rich_text("Reflection"), Some("went fine"));
        assert_eq!(p.end_time(&props()).unwrap().to_rfc3339(), "2024-05-01T10:30:00+09:00");
    }

    #[test]
    fn page_title_line() {
        let p = page(
            "p1",
            "設計",
            "2024-05-01T10:00:00.000+09:00",
            Some("2024-05-01T10:30:00.000+09:00"),
            None,
        );
        assert_eq!(format_page_title(&p, &props()).unwrap(), "設計 10:00 ~ 10:30");
        assert_eq!(extract_page_title(&p, &props()).unwrap(), "設計");
    }

    #[test]
    fn missing_title_names_the_property() {
        let mut p = page("p1", "x", "2024-05-01T10:00:00.000+09:00", None, None);
        p.properties.remove("Name");
        let err = format_page_title(&p, &props()).unwrap_err();
        assert!(err.to_string().contains("'Name'"));
    }

    #[test]
    fn clipboard_heading_depends_on_start() {
        let p = page(
            "p1",
            "設計",
            "2024-05-01T10:00:00.000+09:00",
            Some("2024-05-01T10:30:00.000+09:00"),
            None,
        );
        let jst = FixedOffset::east_opt(9 * 3600).unwrap();

        let before = jst.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap();
        let text = page_to_clipboard_text(&p, &props(), before).unwrap();
        assert_eq!(text, "10:00 ~ 10:30 \n設計\n\n## 達成基準\nwent fine");

        let after = jst.with_ymd_and_hms(2024, 5, 1, 11, 0, 0).unwrap();
        let text = page_to_clipboard_text(&p, &props(), after).unwrap();
        assert!(text.contains("## 振り返り\nwent fine"));
    }

    #[test]
    fn reflection_block_skips_empty_fields() {
        let p = page(
            "p1",
            "設計",
            "2024-05-01T10:00:00.000+09:00",
            Some("2024-05-01T10:30:00.000+09:00"),
            Some("開発"),
        );
        let block = format_for_reflection(&p, &props()).unwrap();
        assert_eq!(
            block,
            "### 設計 10:00 ~ 10:30\n- カテゴリ: 開発\n- 効果: B\n- テンション: normal\nwent fine"
        );
    }
}
