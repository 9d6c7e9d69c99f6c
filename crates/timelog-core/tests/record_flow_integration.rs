//! Record submission flow against an in-memory record store.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{FixedOffset, NaiveDate, TimeZone};
use serde_json::{json, Value};

use timelog_core::error::Result;
use timelog_core::notion::{
    daily_query_params, daily_report, format_page_title, page_create_params, page_to_clipboard_text,
    page_update_params, search_params, QueryResponse,
};
use timelog_core::storage::NotionProperties;
use timelog_core::{
    classify, Clock, FixedClock, IntervalTracker, MemoryStore, Page, RecordForm, RecordStore,
    SubmitOutcome, UpdateForm,
};

/// Keeps created pages and echoes them back the way the API would.
#[derive(Default)]
struct FakeStore {
    pages: Mutex<Vec<Page>>,
}

fn echo(id: String, body: &Value) -> Page {
    let mut properties = body["properties"].clone();
    // The API answers with plain_text alongside the submitted text.
    for prop in properties.as_object_mut().unwrap().values_mut() {
        for kind in ["title", "rich_text"] {
            if let Some(parts) = prop.get_mut(kind).and_then(Value::as_array_mut) {
                for part in parts {
                    part["plain_text"] = part["text"]["content"].clone();
                }
            }
        }
    }
    serde_json::from_value(json!({ "id": id, "properties": properties })).unwrap()
}

#[async_trait]
impl RecordStore for FakeStore {
    async fn create_record(&self, body: &Value) -> Result<Page> {
        let mut pages = self.pages.lock().unwrap();
        let page = echo(format!("page-{}", pages.len() + 1), body);
        pages.push(page.clone());
        Ok(page)
    }

    async fn query_records(&self, query: &Value) -> Result<QueryResponse> {
        let mut results = self.pages.lock().unwrap().clone();
        if query["sorts"][0]["direction"] == "descending" {
            results.reverse();
        }
        if let Some(size) = query["page_size"].as_u64() {
            results.truncate(size as usize);
        }
        Ok(QueryResponse {
            results,
            has_more: false,
            next_cursor: None,
        })
    }

    async fn update_record(&self, page_id: &str, body: &Value) -> Result<Page> {
        let mut pages = self.pages.lock().unwrap();
        let updated = echo(page_id.to_string(), body);
        if let Some(slot) = pages.iter_mut().find(|p| p.id == page_id) {
            *slot = updated.clone();
        }
        Ok(updated)
    }
}

fn jst() -> FixedOffset {
    FixedOffset::east_opt(9 * 3600).unwrap()
}

#[tokio::test]
async fn create_classify_and_start_timer() {
    let props = NotionProperties::default();
    let store = FakeStore::default();
    let clock = Arc::new(FixedClock::with_offset(
        jst().with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap().timestamp(),
        jst(),
    ));
    let tracker = IntervalTracker::new(MemoryStore::new(), clock.clone());

    let mut form = RecordForm {
        title: "開発用タスクを修正する".into(),
        minutes: 25,
        ..RecordForm::default()
    };
    form.suggest_category(|title| classify(title).map(str::to_string));
    form.validate().unwrap();

    let body = page_create_params(&form, &props, "db", clock.now_local());
    let page = store.create_record(&body).await.unwrap();
    assert_eq!(page.select(&props.activity_category), Some("開発"));
    assert_eq!(format_page_title(&page, &props).unwrap(), "開発用タスクを修正する 10:00 ~ 10:25");

    let SubmitOutcome::StartTimer(minutes) = form.after_submit() else {
        panic!("a future task should start a timer");
    };
    let interval = tracker.create_interval(minutes).unwrap();
    assert_eq!(interval.length(), 25 * 60);
}

#[tokio::test]
async fn continue_registering_past_blocks_then_update_latest() {
    let props = NotionProperties::default();
    let store = FakeStore::default();
    let now = jst().with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();

    let mut form = RecordForm {
        title: "会議の準備".into(),
        start_minutes: -90,
        minutes: 30,
        continue_register: true,
        ..RecordForm::default()
    };
    form.suggest_category(|title| classify(title).map(str::to_string));
    store
        .create_record(&page_create_params(&form, &props, "db", now))
        .await
        .unwrap();

    let SubmitOutcome::ContinueRegister(mut next) = form.after_submit() else {
        panic!("past block with continue should keep the form open");
    };
    assert_eq!(next.start_minutes, -60);
    next.title = "昼食".into();
    next.minutes = 60;
    next.continue_register = false;
    next.suggest_category(|title| classify(title).map(str::to_string));
    store
        .create_record(&page_create_params(&next, &props, "db", now))
        .await
        .unwrap();
    assert_eq!(next.after_submit(), SubmitOutcome::Close);

    let recent = store
        .query_records(&search_params(&props, 5, now))
        .await
        .unwrap()
        .results;
    let titles: Vec<_> = recent
        .iter()
        .rev()
        .map(|p| format_page_title(p, &props).unwrap())
        .collect();
    assert_eq!(titles, ["会議の準備 10:30 ~ 11:00", "昼食 11:00 ~ 12:00"]);

    let mut update = UpdateForm::from_page(&recent[0], &props);
    assert_eq!(update.start, "2024-05-01T11:00");
    update.reflection = "ゆっくり食べた".into();
    update.end_now(now + chrono::Duration::minutes(5));
    update.validate().unwrap();
    let updated = store
        .update_record(&update.page_id, &page_update_params(&update, &props, jst()))
        .await
        .unwrap();
    let text = page_to_clipboard_text(&updated, &props, now).unwrap();
    assert_eq!(text, "11:00 ~ 12:05 \n昼食\n\n## 振り返り\nゆっくり食べた");

    let day = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
    let all = store
        .query_all(&daily_query_params(&props, day, jst()))
        .await
        .unwrap();
    let report = daily_report(&all, &props, day, jst()).unwrap();
    assert!(report.starts_with("## Work\n### 会議の準備 10:30 ~ 11:00\n- カテゴリ: 会議"));
    assert!(report.contains("## Personal\n### 昼食 11:00 ~ 12:05"));
}
