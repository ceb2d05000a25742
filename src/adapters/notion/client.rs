//! Notion REST client
//!
//! [`NotionClient`] implements [`RecordSource`] over the Notion API. It is
//! created with [`NotionClient::connect`], which resolves the configured
//! database to its first data source.

use super::blocks::render_blocks;
use super::models::{
    Block, DatabaseObject, ErrorBody, ListResponse, PageObject, QueryRequest, QuerySort, PAGE_SIZE,
};
use super::source::{RecordPage, RecordSource};
use crate::config::NotionConfig;
use crate::core::retry::Retrier;
use crate::domain::ids::{DataSourceId, DatabaseId, PageId};
use crate::domain::record::{Record, SortOrder};
use crate::domain::{DiaryError, NotionError, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION};
use reqwest::{Client, ClientBuilder, RequestBuilder, StatusCode};
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use std::time::Duration;
use url::Url;

/// Map a non-success HTTP status and body to a [`NotionError`]
pub fn error_for_status(status: StatusCode, body: &str) -> NotionError {
    let parsed: Option<ErrorBody> = serde_json::from_str(body).ok();
    let message = parsed
        .as_ref()
        .map(|b| b.message.clone())
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| body.chars().take(500).collect());

    match status.as_u16() {
        401 | 403 => NotionError::AuthenticationFailed(message),
        404 => NotionError::ObjectNotFound(message),
        409 => NotionError::Conflict(message),
        429 => NotionError::RateLimited(message),
        s if status.is_server_error() => NotionError::ServerError { status: s, message },
        s => NotionError::ClientError {
            status: s,
            code: parsed.map(|b| b.code).unwrap_or_default(),
            message,
        },
    }
}

fn request_error(err: reqwest::Error) -> NotionError {
    if err.is_timeout() {
        NotionError::Timeout(err.to_string())
    } else {
        NotionError::ConnectionFailed(err.to_string())
    }
}

/// Notion API client bound to one data source
pub struct NotionClient {
    client: Client,
    base_url: String,
    data_source: DataSourceId,
    date_property: String,
}

impl NotionClient {
    /// Build the HTTP client and resolve the database's data source
    ///
    /// The database lookup goes through `retrier`.
    ///
    /// # Errors
    ///
    /// Returns `Configuration` for an unusable base URL or token,
    /// `MalformedRemoteResponse` when the database lists no data source,
    /// and the remote error when the lookup fails.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use notion_diary::adapters::notion::NotionClient;
    /// use notion_diary::config::load_config;
    /// use notion_diary::core::retry::{Retrier, RetryPolicy};
    ///
    /// # async fn example() -> notion_diary::domain::Result<()> {
    /// let config = load_config("notion-diary.toml")?;
    /// let retrier = Retrier::new(RetryPolicy::from(&config.notion.retry));
    /// let client = NotionClient::connect(&config.notion, &retrier).await?;
    /// println!("data source: {}", client.data_source_id());
    /// # Ok(())
    /// # }
    /// ```
    pub async fn connect(config: &NotionConfig, retrier: &Retrier) -> Result<Self> {
        let client = build_http_client(config)?;
        let base_url = normalize_base_url(&config.base_url)?;
        let database_id =
            DatabaseId::new(config.database_id.trim()).map_err(DiaryError::Configuration)?;

        let url = format!("{}/databases/{}", base_url, database_id);
        let database: DatabaseObject = retrier
            .call("retrieve_database", || send_json(client.get(&url)))
            .await?;

        let data_source = database
            .data_sources
            .as_ref()
            .and_then(|sources| sources.first())
            .ok_or_else(|| {
                DiaryError::MalformedRemoteResponse(format!(
                    "database {} returned no data sources; is it shared with the integration?",
                    database.id
                ))
            })?;
        let data_source =
            DataSourceId::new(data_source.id.clone()).map_err(DiaryError::MalformedRemoteResponse)?;

        tracing::info!(
            database_id = %database_id,
            data_source_id = %data_source,
            "Resolved Notion data source"
        );

        Ok(Self {
            client,
            base_url,
            data_source,
            date_property: config.fields.date.clone(),
        })
    }

    /// Data source the client queries
    pub fn data_source_id(&self) -> &DataSourceId {
        &self.data_source
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn list_children(&self, id: &PageId) -> Result<Vec<Block>> {
        let url = self.url(&format!("blocks/{}/children", id));
        let page_size = PAGE_SIZE.to_string();
        let mut blocks = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let mut query = vec![("page_size", page_size.as_str())];
            if let Some(c) = cursor.as_deref() {
                query.push(("start_cursor", c));
            }

            let page: ListResponse<Block> = send_json(self.client.get(&url).query(&query)).await?;
            let next = page.continuation();
            blocks.extend(page.results);

            match next {
                Some(next) => cursor = Some(next),
                None => break,
            }
        }

        Ok(blocks)
    }
}

fn build_http_client(config: &NotionConfig) -> Result<Client> {
    let mut auth = HeaderValue::from_str(&config.token.expose_secret().bearer())
        .map_err(|_| DiaryError::Configuration("notion.token contains invalid characters".to_string()))?;
    auth.set_sensitive(true);

    let version = HeaderValue::from_str(&config.api_version).map_err(|_| {
        DiaryError::Configuration(format!("Invalid notion.api_version '{}'", config.api_version))
    })?;

    let mut headers = HeaderMap::new();
    headers.insert(AUTHORIZATION, auth);
    headers.insert(HeaderName::from_static("notion-version"), version);

    ClientBuilder::new()
        .default_headers(headers)
        .timeout(Duration::from_secs(config.timeout_seconds))
        .connect_timeout(Duration::from_secs(config.timeout_seconds.min(30)))
        .build()
        .map_err(|e| DiaryError::Configuration(format!("Failed to build HTTP client: {e}")))
}

fn normalize_base_url(base_url: &str) -> Result<String> {
    let parsed = Url::parse(base_url)
        .map_err(|e| DiaryError::Configuration(format!("Invalid notion.base_url '{base_url}': {e}")))?;
    Ok(parsed.as_str().trim_end_matches('/').to_string())
}

async fn send(request: RequestBuilder) -> Result<reqwest::Response> {
    let response = request.send().await.map_err(request_error)?;
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let err = error_for_status(status, &body);
    tracing::debug!(status = status.as_u16(), error = %err, "Notion request failed");
    Err(err.into())
}

async fn send_json<T: DeserializeOwned>(request: RequestBuilder) -> Result<T> {
    let response = send(request).await?;
    response
        .json::<T>()
        .await
        .map_err(|e| NotionError::InvalidResponse(e.to_string()).into())
}

#[async_trait]
impl RecordSource for NotionClient {
    async fn query_page(&self, cursor: Option<&str>, sort: SortOrder) -> Result<RecordPage> {
        let url = self.url(&format!("data_sources/{}/query", self.data_source));
        let body = QueryRequest {
            start_cursor: cursor.map(str::to_string),
            sorts: vec![QuerySort::for_order(sort, &self.date_property)],
            page_size: PAGE_SIZE,
        };

        let page: ListResponse<PageObject> = send_json(self.client.post(&url).json(&body)).await?;
        let next_cursor = page.continuation();
        let results = page
            .results
            .into_iter()
            .map(PageObject::into_record)
            .collect::<Result<Vec<_>>>()?;

        tracing::debug!(
            count = results.len(),
            has_next = next_cursor.is_some(),
            "Fetched listing page"
        );
        Ok(RecordPage {
            results,
            next_cursor,
        })
    }

    async fn fetch_record(&self, id: &PageId) -> Result<Record> {
        let page: PageObject = send_json(self.client.get(self.url(&format!("pages/{}", id)))).await?;
        page.into_record()
    }

    async fn update_number(&self, id: &PageId, property: &str, value: u64) -> Result<()> {
        let body = serde_json::json!({
            "properties": {
                property: { "number": value }
            }
        });
        send(self.client.patch(self.url(&format!("pages/{}", id))).json(&body)).await?;
        Ok(())
    }

    async fn render_text(&self, id: &PageId) -> Result<String> {
        let blocks = self.list_children(id).await?;
        Ok(render_blocks(&blocks))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(401, "AuthenticationFailed" ; "unauthorized")]
    #[test_case(403, "AuthenticationFailed" ; "forbidden")]
    #[test_case(404, "ObjectNotFound" ; "not found")]
    #[test_case(409, "Conflict" ; "conflict")]
    #[test_case(429, "RateLimited" ; "rate limited")]
    #[test_case(502, "ServerError" ; "bad gateway")]
    #[test_case(400, "ClientError" ; "validation")]
    fn test_status_mapping(status: u16, expected: &str) {
        let err = error_for_status(
            StatusCode::from_u16(status).unwrap(),
            r#"{"object":"error","status":400,"code":"validation_error","message":"bad"}"#,
        );
        assert!(format!("{err:?}").starts_with(expected), "{err:?}");
    }

    #[test]
    fn test_client_error_keeps_code_and_message() {
        let err = error_for_status(
            StatusCode::BAD_REQUEST,
            r#"{"object":"error","status":400,"code":"validation_error","message":"Date is not a property"}"#,
        );
        match err {
            NotionError::ClientError {
                status,
                code,
                message,
            } => {
                assert_eq!(status, 400);
                assert_eq!(code, "validation_error");
                assert_eq!(message, "Date is not a property");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_non_json_body_becomes_message() {
        let err = error_for_status(StatusCode::BAD_GATEWAY, "<html>upstream</html>");
        assert!(err.to_string().contains("<html>upstream</html>"));
        assert!(err.is_transient());
    }

    #[test]
    fn test_normalize_base_url() {
        assert_eq!(
            normalize_base_url("https://api.notion.com/v1/").unwrap(),
            "https://api.notion.com/v1"
        );
        assert!(normalize_base_url("not a url").is_err());
    }
}
