use chrono::{FixedOffset, NaiveDate};

use super::page::{format_for_reflection, Page};
use crate::classifier::taxonomy::{section_of, Section};
use crate::error::NotionError;
use crate::storage::NotionProperties;

/// Whether the record starts or ends on `date` in the local offset.
pub fn touches_date(page: &Page, props: &NotionProperties, date: NaiveDate, offset: FixedOffset) -> bool {
    let on_date = |t: chrono::DateTime<FixedOffset>| t.with_timezone(&offset).date_naive() == date;
    page.start_time(props).is_some_and(on_date) || page.end_time(props).is_some_and(on_date)
}

/// Markdown reflection report for one day, grouped into work and
/// personal sections. Empty sections are left out.
pub fn daily_report(
    pages: &[Page],
    props: &NotionProperties,
    date: NaiveDate,
    offset: FixedOffset,
) -> Result<String, NotionError> {
    let mut work = Vec::new();
    let mut personal = Vec::new();

    for page in pages.iter().filter(|p| touches_date(p, props, date, offset)) {
        let category = page.select(&props.activity_category).unwrap_or_default();
        let block = format_for_reflection(page, props)?;
        match section_of(category) {
            Section::Work => work.push(block),
            Section::Personal => personal.push(block),
        }
    }

    let sections = [(Section::Work, work), (Section::Personal, personal)];
    Ok(sections
        .into_iter()
        .filter(|(_, blocks)| !blocks.is_empty())
        .map(|(section, blocks)| format!("## {}\n{}", section.as_str(), blocks.join("\n----\n")))
        .collect::<Vec<_>>()
        .join("\n\n\n"))
}

#[cfg(test)]
mod tests {
    use super::super::page::fixtures::page;
    use super::*;

    fn jst() -> FixedOffset {
        FixedOffset::east_opt(9 * 3600).unwrap()
    }

    fn may_first() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()
    }

    #[test]
    fn records_crossing_midnight_belong_to_both_days() {
        let props = NotionProperties::default();
        let late = page(
            "p",
            "夜更かし",
            "2024-04-30T23:30:00.000+09:00",
            Some("2024-05-01T00:30:00.000+09:00"),
            None,
        );
        assert!(touches_date(&late, &props, may_first(), jst()));
        let earlier = page("q", "x", "2024-04-30T21:00:00.000+09:00", None, None);
        assert!(!touches_date(&earlier, &props, may_first(), jst()));
    }

    #[test]
    fn dates_compare_in_the_local_offset() {
        let props = NotionProperties::default();
        // 16:00 UTC on Apr 30 is 01:00 May 1 in JST.
        let utc = page("p", "x", "2024-04-30T16:00:00.000Z", None, None);
        assert!(touches_date(&utc, &props, may_first(), jst()));
    }

    #[test]
    fn report_groups_work_before_personal() {
        let props = NotionProperties::default();
        let pages = vec![
            page("1", "朝食", "2024-05-01T08:00:00.000+09:00", Some("2024-05-01T08:30:00.000+09:00"), Some("食事")),
            page("2", "実装", "2024-05-01T09:00:00.000+09:00", Some("2024-05-01T10:00:00.000+09:00"), Some("開発")),
            page("3", "会議", "2024-05-01T10:00:00.000+09:00", Some("2024-05-01T11:00:00.000+09:00"), Some("会議")),
            page("4", "前日", "2024-04-30T21:00:00.000+09:00", Some("2024-04-30T22:00:00.000+09:00"), Some("開発")),
        ];
        let report = daily_report(&pages, &props, may_first(), jst()).unwrap();

        let work_at = report.find("## Work").unwrap();
        let personal_at = report.find("## Personal").unwrap();
        assert!(work_at < personal_at);
        assert!(report.contains("### 実装 09:00 ~ 10:00"));
        assert!(report.contains("went fine\n----\n### 会議 10:00 ~ 11:00"));
        assert!(report.contains("\n\n\n## Personal\n### 朝食 08:00 ~ 08:30"));
        assert!(!report.contains("前日"));
    }

    #[test]
    fn empty_day_is_empty_report() {
        let props = NotionProperties::default();
        assert_eq!(daily_report(&[], &props, may_first(), jst()).unwrap(), "");
    }
}
