use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info};

use super::page::Page;
use crate::error::{NotionError, Result};

pub const NOTION_VERSION: &str = "2022-06-28";

/// One page of query results.
#[derive(Debug, Clone, Deserialize)]
pub struct QueryResponse {
    #[serde(default)]
    pub results: Vec<Page>,
    #[serde(default)]
    pub has_more: bool,
    #[serde(default)]
    pub next_cursor: Option<String>,
}

/// The hosted database the form glue writes records into.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn create_record(&self, body: &Value) -> Result<Page>;

    /// One page of results for a filter/sort query.
    async fn query_records(&self, query: &Value) -> Result<QueryResponse>;

    async fn update_record(&self, page_id: &str, body: &Value) -> Result<Page>;

    /// Follow `next_cursor` until every matching record is collected.
    async fn query_all(&self, query: &Value) -> Result<Vec<Page>> {
        let mut query = query.clone();
        let mut pages = Vec::new();
        loop {
            let batch = self.query_records(&query).await?;
            pages.extend(batch.results);
            match batch.next_cursor {
                Some(cursor) if batch.has_more => {
                    query["start_cursor"] = Value::String(cursor);
                }
                _ => return Ok(pages),
            }
        }
    }
}

/// Notion REST client scoped to one database.
pub struct NotionClient {
    http: Client,
    base_url: String,
    token: String,
    database_id: String,
}

impl NotionClient {
    pub fn new(
        base_url: impl Into<String>,
        token: impl Into<String>,
        database_id: impl Into<String>,
    ) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
            database_id: database_id.into(),
        }
    }

    pub fn database_id(&self) -> &str {
        &self.database_id
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .bearer_auth(&self.token)
            .header("Notion-Version", NOTION_VERSION)
    }

    async fn send<T: for<'de> Deserialize<'de>>(&self, builder: RequestBuilder) -> Result<T> {
        let resp = self.authorized(builder).send().await?;
        Ok(Self::check(resp).await?.json::<T>().await?)
    }

    async fn check(resp: Response) -> Result<Response> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let body = resp.text().await.unwrap_or_default();
        Err(NotionError::Api {
            status: status.as_u16(),
            body,
        }
        .into())
    }
}

#[async_trait]
impl RecordStore for NotionClient {
    async fn create_record(&self, body: &Value) -> Result<Page> {
        info!("creating Notion page");
        let builder = self.http.post(format!("{}/pages", self.base_url)).json(body);
        let page: Page = self.send(builder).await?;
        debug!(page_id = %page.id, "page created");
        Ok(page)
    }

    async fn query_records(&self, query: &Value) -> Result<QueryResponse> {
        debug!(database_id = %self.database_id, "querying Notion database");
        let url = format!("{}/databases/{}/query", self.base_url, self.database_id);
        self.send(self.http.post(url).json(query)).await
    }

    async fn update_record(&self, page_id: &str, body: &Value) -> Result<Page> {
        info!(page_id, "updating Notion page");
        let url = format!("{}/pages/{}", self.base_url, page_id);
        self.send(self.http.patch(url).json(body)).await
    }
}
