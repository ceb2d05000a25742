//! Integration tests for the Notion REST client against a mock server

use mockito::{Matcher, Server, ServerGuard};
use notion_diary::adapters::notion::{NotionClient, RecordSource};
use notion_diary::config::{parse_config, NotionConfig};
use notion_diary::core::retry::{Retrier, RetryPolicy};
use notion_diary::domain::ids::PageId;
use notion_diary::domain::record::{PropertyValue, SortOrder};
use notion_diary::domain::{DiaryError, NotionError};
use serde_json::json;

fn notion_config(base_url: &str) -> NotionConfig {
    let toml = format!(
        r#"
[notion]
token = "secret_test_token"
database_id = "db1"
base_url = "{base_url}"
timeout_seconds = 5

[notion.fields]
date = "Date"
word_count = "Word Count"

[notion.retry]
max_attempts = 3
initial_delay_ms = 1
max_delay_ms = 5
jitter = false
"#
    );
    parse_config(&toml).unwrap().notion
}

fn retrier() -> Retrier {
    Retrier::new(RetryPolicy::immediate(3))
}

fn page_json(id: &str, date: &str, words: Option<u64>) -> serde_json::Value {
    json!({
        "object": "page",
        "id": id,
        "created_time": "2024-03-01T00:00:00.000Z",
        "last_edited_time": "2024-03-02T10:30:00.000Z",
        "properties": {
            "Date": {"id": "a", "type": "date", "date": {"start": date, "end": null}},
            "Word Count": {"id": "b", "type": "number", "number": words},
            "Name": {"id": "title", "type": "title", "title": [{"plain_text": "日记"}]}
        }
    })
}

async fn connected(server: &mut ServerGuard) -> NotionClient {
    server
        .mock("GET", "/databases/db1")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "object": "database",
                "id": "db1",
                "data_sources": [{"id": "ds1", "name": "Diary"}, {"id": "ds2", "name": "Other"}]
            })
            .to_string(),
        )
        .create_async()
        .await;

    NotionClient::connect(&notion_config(&server.url()), &retrier())
        .await
        .unwrap()
}

#[tokio::test]
async fn test_connect_resolves_first_data_source() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/databases/db1")
        .match_header("authorization", "Bearer secret_test_token")
        .match_header("notion-version", "2025-09-03")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"object":"database","id":"db1","data_sources":[{"id":"ds1"}]}"#)
        .create_async()
        .await;

    let client = NotionClient::connect(&notion_config(&server.url()), &retrier())
        .await
        .unwrap();

    assert_eq!(client.data_source_id().as_str(), "ds1");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_connect_without_data_sources_is_malformed() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/databases/db1")
        .with_status(200)
        .with_body(r#"{"object":"database","id":"db1","data_sources":[]}"#)
        .create_async()
        .await;

    let err = NotionClient::connect(&notion_config(&server.url()), &retrier())
        .await
        .err()
        .unwrap();

    assert!(matches!(err, DiaryError::MalformedRemoteResponse(_)));
}

#[tokio::test]
async fn test_server_errors_are_retried_until_exhausted() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/databases/db1")
        .with_status(503)
        .with_body(r#"{"object":"error","status":503,"code":"service_unavailable","message":"busy"}"#)
        .expect(3)
        .create_async()
        .await;

    let err = NotionClient::connect(&notion_config(&server.url()), &retrier())
        .await
        .err()
        .unwrap();

    match err {
        DiaryError::RemoteCallExhausted {
            operation,
            attempts,
            source,
        } => {
            assert_eq!(operation, "retrieve_database");
            assert_eq!(attempts, 3);
            assert!(matches!(
                *source,
                DiaryError::Notion(NotionError::ServerError { status: 503, .. })
            ));
        }
        other => panic!("unexpected {other:?}"),
    }
    mock.assert_async().await;
}

#[tokio::test]
async fn test_unauthorized_is_not_retried() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/databases/db1")
        .with_status(401)
        .with_body(r#"{"object":"error","status":401,"code":"unauthorized","message":"API token is invalid."}"#)
        .expect(1)
        .create_async()
        .await;

    let err = NotionClient::connect(&notion_config(&server.url()), &retrier())
        .await
        .err()
        .unwrap();

    assert!(matches!(
        err,
        DiaryError::Notion(NotionError::AuthenticationFailed(_))
    ));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_query_pages_follow_cursor() {
    let mut server = Server::new_async().await;
    let client = connected(&mut server).await;

    let first = server
        .mock("POST", "/data_sources/ds1/query")
        .match_body(Matcher::Json(json!({
            "sorts": [{"property": "Date", "direction": "descending"}],
            "page_size": 100
        })))
        .with_status(200)
        .with_body(
            json!({
                "object": "list",
                "results": [page_json("p1", "2024-03-02", Some(10))],
                "next_cursor": "cur2",
                "has_more": true
            })
            .to_string(),
        )
        .create_async()
        .await;
    let second = server
        .mock("POST", "/data_sources/ds1/query")
        .match_body(Matcher::PartialJson(json!({"start_cursor": "cur2"})))
        .with_status(200)
        .with_body(
            json!({
                "object": "list",
                "results": [page_json("p2", "2024-03-01", None)],
                "next_cursor": null,
                "has_more": false
            })
            .to_string(),
        )
        .create_async()
        .await;

    let page = client
        .query_page(None, SortOrder::DateDescending)
        .await
        .unwrap();
    assert_eq!(page.next_cursor.as_deref(), Some("cur2"));
    assert_eq!(page.results.len(), 1);
    let record = &page.results[0];
    assert_eq!(record.id.as_str(), "p1");
    assert_eq!(record.date_property("Date").unwrap(), Some("2024-03-02"));
    assert_eq!(record.number_property("Word Count").unwrap(), Some(10.0));
    assert_eq!(
        record.properties["Name"],
        PropertyValue::Text {
            text: "日记".to_string()
        }
    );

    let page = client
        .query_page(Some("cur2"), SortOrder::DateDescending)
        .await
        .unwrap();
    assert!(page.next_cursor.is_none());
    assert_eq!(page.results[0].id.as_str(), "p2");

    first.assert_async().await;
    second.assert_async().await;
}

#[tokio::test]
async fn test_last_edited_sort_uses_timestamp() {
    let mut server = Server::new_async().await;
    let client = connected(&mut server).await;

    let mock = server
        .mock("POST", "/data_sources/ds1/query")
        .match_body(Matcher::PartialJson(json!({
            "sorts": [{"timestamp": "last_edited_time", "direction": "descending"}]
        })))
        .with_status(200)
        .with_body(r#"{"object":"list","results":[],"next_cursor":null,"has_more":false}"#)
        .create_async()
        .await;

    let page = client
        .query_page(None, SortOrder::LastEditedDescending)
        .await
        .unwrap();

    assert!(page.results.is_empty());
    mock.assert_async().await;
}

#[tokio::test]
async fn test_fetch_and_update_number() {
    let mut server = Server::new_async().await;
    let client = connected(&mut server).await;

    server
        .mock("GET", "/pages/p1")
        .with_status(200)
        .with_body(page_json("p1", "2024-03-02", Some(3)).to_string())
        .create_async()
        .await;
    let patch = server
        .mock("PATCH", "/pages/p1")
        .match_body(Matcher::Json(json!({
            "properties": {"Word Count": {"number": 42}}
        })))
        .with_status(200)
        .with_body(page_json("p1", "2024-03-02", Some(42)).to_string())
        .create_async()
        .await;

    let id = PageId::new("p1").unwrap();
    let record = client.fetch_record(&id).await.unwrap();
    assert_eq!(record.number_property("Word Count").unwrap(), Some(3.0));

    client.update_number(&id, "Word Count", 42).await.unwrap();
    patch.assert_async().await;
}

#[tokio::test]
async fn test_missing_page_maps_to_not_found() {
    let mut server = Server::new_async().await;
    let client = connected(&mut server).await;

    server
        .mock("GET", "/pages/gone")
        .with_status(404)
        .with_body(r#"{"object":"error","status":404,"code":"object_not_found","message":"Could not find page"}"#)
        .create_async()
        .await;

    let err = client
        .fetch_record(&PageId::new("gone").unwrap())
        .await
        .unwrap_err();
    assert!(matches!(err, DiaryError::Notion(NotionError::ObjectNotFound(_))));
}

#[tokio::test]
async fn test_render_text_pages_through_children() {
    let mut server = Server::new_async().await;
    let client = connected(&mut server).await;

    server
        .mock("GET", "/blocks/p1/children")
        .match_query(Matcher::Regex("^page_size=100$".to_string()))
        .with_status(200)
        .with_body(
            json!({
                "object": "list",
                "results": [
                    {"id": "b1", "type": "heading_2", "heading_2": {"rich_text": [{"plain_text": "早上"}]}},
                    {"id": "b2", "type": "paragraph", "paragraph": {"rich_text": [{"plain_text": "喝了咖啡。"}]}}
                ],
                "next_cursor": "b3",
                "has_more": true
            })
            .to_string(),
        )
        .create_async()
        .await;
    server
        .mock("GET", "/blocks/p1/children")
        .match_query(Matcher::Regex("start_cursor=b3".to_string()))
        .with_status(200)
        .with_body(
            json!({
                "object": "list",
                "results": [
                    {"id": "b3", "type": "to_do", "to_do": {"checked": false, "rich_text": [{"plain_text": "写作"}]}}
                ],
                "next_cursor": null,
                "has_more": false
            })
            .to_string(),
        )
        .create_async()
        .await;

    let text = client.render_text(&PageId::new("p1").unwrap()).await.unwrap();

    assert_eq!(text, "## 早上\n\n喝了咖啡。\n\n- [ ] 写作\n");
}
