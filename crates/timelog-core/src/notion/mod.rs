//! Notion database as the record store: HTTP client, request bodies,
//! page readers and text renderings.

mod client;
mod page;
mod params;
mod report;

pub use client::{NotionClient, QueryResponse, RecordStore, NOTION_VERSION};
pub use page::{
    extract_page_title, format_for_reflection, format_page_title, page_to_clipboard_text, Page,
};
pub use params::{
    daily_query_params, format_minutes, page_create_params, page_update_params, search_params,
};
pub use report::{daily_report, touches_date};
