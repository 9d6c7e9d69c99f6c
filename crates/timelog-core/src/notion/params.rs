//! Request bodies for the Notion pages and database-query endpoints.

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveTime, TimeZone};
use serde_json::{json, Map, Value};

use crate::form::{RecordForm, UpdateForm};
use crate::storage::NotionProperties;

/// Local ISO-8601 timestamp `minutes` from `now`, seconds zeroed,
/// e.g. `2024-05-01T10:30:00+09:00`.
pub fn format_minutes(now: DateTime<FixedOffset>, minutes: i64) -> String {
    (now + Duration::minutes(minutes))
        .format("%Y-%m-%dT%H:%M:00%:z")
        .to_string()
}

fn title_value(content: &str) -> Value {
    json!({ "title": [{ "text": { "content": content } }] })
}

fn rich_text_value(content: &str) -> Value {
    json!({ "rich_text": [{ "text": { "content": content } }] })
}

/// Select options cannot be empty strings, so blank choices are left out.
fn insert_select(properties: &mut Map<String, Value>, name: &str, option: &str) {
    if !option.is_empty() {
        properties.insert(name.to_string(), json!({ "select": { "name": option } }));
    }
}

/// Body for `POST /pages` from the record form.
pub fn page_create_params(
    form: &RecordForm,
    props: &NotionProperties,
    database_id: &str,
    now: DateTime<FixedOffset>,
) -> Value {
    let start = format_minutes(now, form.start_minutes);
    let end = format_minutes(now, form.start_minutes + form.minutes);

    let mut properties = Map::new();
    properties.insert(props.title.clone(), title_value(&form.title));
    properties.insert(
        props.time.clone(),
        json!({ "date": { "start": start, "end": end } }),
    );
    properties.insert(props.reflection.clone(), rich_text_value(&form.reflection));
    properties.insert(
        props.expected_work_time.clone(),
        json!({ "number": form.minutes }),
    );
    insert_select(&mut properties, &props.effectivity, &form.effectivity);
    insert_select(&mut properties, &props.activity_category, &form.activity_category);
    insert_select(&mut properties, &props.waste_time_category, &form.waste_time_category);
    insert_select(&mut properties, &props.tension, &form.tension);

    json!({
        "parent": { "database_id": database_id },
        "properties": properties,
    })
}

/// Body for `PATCH /pages/{id}` from the update form. The form's
/// minute-precision datetimes are completed with the local offset.
pub fn page_update_params(
    form: &UpdateForm,
    props: &NotionProperties,
    offset: FixedOffset,
) -> Value {
    let start = format!("{}:00.000{offset}", form.start);
    let end = format!("{}:00.000{offset}", form.end);

    let mut properties = Map::new();
    properties.insert(props.title.clone(), title_value(&form.title));
    properties.insert(
        props.time.clone(),
        json!({ "date": { "start": start, "end": end } }),
    );
    properties.insert(props.reflection.clone(), rich_text_value(&form.reflection));
    insert_select(&mut properties, &props.effectivity, &form.effectivity);
    insert_select(&mut properties, &props.activity_category, &form.activity_category);
    insert_select(&mut properties, &props.waste_time_category, &form.waste_time_category);

    json!({ "properties": properties })
}

/// Query for recent records: the last 24 hours up to two hours ahead,
/// newest first.
pub fn search_params(props: &NotionProperties, page_size: u32, now: DateTime<FixedOffset>) -> Value {
    json!({
        "filter": {
            "and": [
                { "property": props.time, "date": { "on_or_after": format_minutes(now, -1440) } },
                { "property": props.time, "date": { "before": format_minutes(now, 120) } },
            ]
        },
        "sorts": [{ "property": props.time, "direction": "descending" }],
        "page_size": page_size,
    })
}

/// Query for one local day. The window opens at 21:00 the evening before
/// so records that spill over midnight are caught; the report filters
/// them by date afterwards.
pub fn daily_query_params(props: &NotionProperties, date: NaiveDate, offset: FixedOffset) -> Value {
    let midnight = date.and_time(NaiveTime::MIN);
    let window_start = offset
        .from_local_datetime(&midnight)
        .single()
        .map(|dt| dt - Duration::hours(3))
        .map(|dt| dt.format("%Y-%m-%dT%H:%M:00%:z").to_string())
        .unwrap_or_default();
    let window_end = format!("{}T23:59:59{offset}", date.format("%Y-%m-%d"));

    json!({
        "filter": {
            "and": [
                { "property": props.time, "date": { "on_or_after": window_start } },
                { "property": props.time, "date": { "before": window_end } },
            ]
        },
        "sorts": [{ "property": props.time, "direction": "ascending" }],
    })
}
