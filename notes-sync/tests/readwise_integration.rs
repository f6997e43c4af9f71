use config::RetryPolicy;
use notes_core::{NoteKind, ProcessedNote};
use notes_sync::ReadwiseClient;
use serde_json::json;
use std::time::Instant;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn highlight(id: &str, text: &str) -> ProcessedNote {
    ProcessedNote {
        id: id.to_string(),
        kind: NoteKind::Highlight,
        created: "2024-01-01T00:00:00Z".to_string(),
        modified: "2024-01-01T00:00:00Z".to_string(),
        text: text.to_string(),
        reference: None,
        reference_raw: None,
        resource_id: "LLS:1".to_string(),
        resource_title: "Book".to_string(),
        color: None,
        offset: None,
    }
}

fn plain_note(id: &str, text: &str) -> ProcessedNote {
    ProcessedNote {
        kind: NoteKind::Note,
        ..highlight(id, text)
    }
}

fn no_pause_policy() -> RetryPolicy {
    RetryPolicy {
        max_rate_limit_retries: 5,
        batch_pause_ms: 0,
    }
}

#[tokio::test]
async fn rate_limited_batch_is_retried_and_counted_once() {
    let server = MockServer::start().await;

    // First attempt: 429 with a one-second backoff. Second attempt: accepted.
    Mock::given(method("POST"))
        .and(path("/highlights/"))
        .respond_with(
            ResponseTemplate::new(429).insert_header("Retry-After", "1"),
        )
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/highlights/"))
        .and(header("Authorization", "Token rw-token"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let client =
        ReadwiseClient::with_base_url("rw-token", no_pause_policy(), server.uri()).unwrap();

    let notes = vec![highlight("n1", "one"), highlight("n2", "two")];
    let started = Instant::now();
    let report = client.send(&notes).await;

    assert_eq!(report.sent, 2);
    assert_eq!(report.errors, 0);
    assert!(started.elapsed().as_millis() >= 1000);
}

#[tokio::test]
async fn exhausted_rate_limit_retries_drop_the_batch() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/highlights/"))
        .respond_with(
            ResponseTemplate::new(429).insert_header("Retry-After", "0"),
        )
        .mount(&server)
        .await;

    let policy = RetryPolicy {
        max_rate_limit_retries: 1,
        batch_pause_ms: 0,
    };
    let client = ReadwiseClient::with_base_url("rw-token", policy, server.uri()).unwrap();

    let report = client.send(&[highlight("n1", "one")]).await;
    assert_eq!(report.sent, 0);
    assert_eq!(report.errors, 1);
}

#[tokio::test]
async fn failed_batch_does_not_block_later_batches() {
    let server = MockServer::start().await;

    // 150 highlights split into batches of 100 and 50: the first batch is
    // rejected outright, the second goes through.
    Mock::given(method("POST"))
        .and(path("/highlights/"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/highlights/"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let client =
        ReadwiseClient::with_base_url("rw-token", no_pause_policy(), server.uri()).unwrap();

    let notes: Vec<ProcessedNote> = (0..150)
        .map(|i| highlight(&format!("n{i}"), &format!("text {i}")))
        .collect();
    let report = client.send(&notes).await;

    assert_eq!(report.errors, 100);
    assert_eq!(report.sent, 50);
}

#[tokio::test]
async fn only_textual_highlights_are_delivered() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/highlights/"))
        .and(body_partial_json(json!({
            "highlights": [{
                "text": "kept",
                "title": "Book",
                "source_type": "logos",
                "highlight_url": "logos://note/h1",
            }]
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let client =
        ReadwiseClient::with_base_url("rw-token", no_pause_policy(), server.uri()).unwrap();

    let notes = vec![
        highlight("h1", "kept"),
        highlight("h2", "   "),
        plain_note("n1", "a note, not a highlight"),
    ];
    let report = client.send(&notes).await;

    assert_eq!(report.sent, 1);
    assert_eq!(report.errors, 0);
}

#[tokio::test]
async fn nothing_to_send_makes_no_requests() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client =
        ReadwiseClient::with_base_url("rw-token", no_pause_policy(), server.uri()).unwrap();
    let report = client.send(&[plain_note("n1", "text")]).await;

    assert_eq!(report.sent, 0);
    assert_eq!(report.errors, 0);
}
