//! Citation lookups against a scripted local HTTP endpoint: retry and
//! backoff behaviour, fail-closed exhaustion, chunking.

use std::collections::VecDeque;
use std::io::{BufRead, BufReader, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;

use scholar_core::config::CitationProviderConfig;
use scholar_core::errors::CitationError;
use scholar_core::ScholarError;
use scholar_retrieval::citations::CitationProvider;

// ---------------------------------------------------------------------------
// Scripted endpoint
// ---------------------------------------------------------------------------

/// One status per expected request, served in order. Every 200 answers
/// with as many `citationCount` rows as the request carried ids, each
/// row counting 42.
struct ScriptedEndpoint {
    base_url: String,
    /// Ids-per-request, in arrival order.
    request_sizes: Arc<Mutex<Vec<usize>>>,
}

fn serve_one(stream: TcpStream, status: u16, sizes: &Mutex<Vec<usize>>) {
    let mut reader = BufReader::new(stream);

    let mut request_line = String::new();
    reader.read_line(&mut request_line).unwrap();
    assert!(
        request_line.contains("/graph/v1/paper/batch"),
        "unexpected request line: {request_line}"
    );

    let mut content_length = 0usize;
    loop {
        let mut line = String::new();
        reader.read_line(&mut line).unwrap();
        if line == "\r\n" {
            break;
        }
        if let Some(value) = line.to_ascii_lowercase().strip_prefix("content-length:") {
            content_length = value.trim().parse().unwrap();
        }
    }

    let mut body = vec![0u8; content_length];
    reader.read_exact(&mut body).unwrap();
    let request: serde_json::Value = serde_json::from_slice(&body).unwrap();
    let id_count = request["ids"].as_array().unwrap().len();
    sizes.lock().unwrap().push(id_count);

    let (status_line, body) = if status == 200 {
        let rows: Vec<serde_json::Value> = (0..id_count)
            .map(|_| serde_json::json!({ "citationCount": 42 }))
            .collect();
        ("200 OK", serde_json::to_string(&rows).unwrap())
    } else {
        ("500 Internal Server Error", String::new())
    };
    // Connection: close, so each retry reconnects instead of reusing a
    // pooled connection into a dead script.
    let response = format!(
        "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\n\
         Content-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    );
    let mut stream = reader.into_inner();
    stream.write_all(response.as_bytes()).unwrap();
    stream.flush().unwrap();
}

fn scripted_endpoint(statuses: Vec<u16>) -> ScriptedEndpoint {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());
    let request_sizes = Arc::new(Mutex::new(Vec::new()));

    let sizes = Arc::clone(&request_sizes);
    thread::spawn(move || {
        let mut script: VecDeque<u16> = statuses.into();
        while let Some(status) = script.pop_front() {
            let (stream, _) = listener.accept().unwrap();
            serve_one(stream, status, &sizes);
        }
    });

    ScriptedEndpoint {
        base_url,
        request_sizes,
    }
}

fn provider(base_url: &str, max_batch_size: usize) -> CitationProvider {
    CitationProvider::from_config(&CitationProviderConfig::SemanticScholar {
        url: base_url.to_string(),
        api_key: None,
        max_batch_size,
    })
    .unwrap()
}

fn fqns(ids: &[&str]) -> Vec<String> {
    ids.iter().map(|id| format!("arxiv/{id}")).collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[tokio::test]
async fn lookup_recovers_after_a_transient_failure() {
    let endpoint = scripted_endpoint(vec![500, 200]);
    let provider = provider(&endpoint.base_url, 500);

    let ids = fqns(&["2401.00001", "2401.00002"]);
    let counts = provider.citation_counts(&ids).await.unwrap();

    assert_eq!(counts.len(), 2);
    assert_eq!(counts["arxiv/2401.00001"], Some(42));
    assert_eq!(counts["arxiv/2401.00002"], Some(42));
    // The failed attempt still reached the endpoint.
    assert_eq!(endpoint.request_sizes.lock().unwrap().as_slice(), [2, 2]);
}

#[tokio::test]
async fn lookup_fails_closed_once_retries_exhaust() {
    let endpoint = scripted_endpoint(vec![500, 500, 500]);
    let provider = provider(&endpoint.base_url, 500);

    let err = provider
        .citation_counts(&fqns(&["2401.00001"]))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ScholarError::Citation(CitationError::RetriesExhausted { attempts: 3, .. })
    ));
    // Exactly three attempts, no fourth.
    assert_eq!(endpoint.request_sizes.lock().unwrap().len(), 3);
}

#[tokio::test]
async fn lookups_chunk_at_the_configured_batch_size() {
    let endpoint = scripted_endpoint(vec![200, 200]);
    let provider = provider(&endpoint.base_url, 2);

    let ids = fqns(&["2401.00001", "2401.00002", "2401.00003"]);
    let counts = provider.citation_counts(&ids).await.unwrap();

    assert_eq!(counts.len(), 3);
    assert!(ids.iter().all(|id| counts[id] == Some(42)));
    // Three ids at a batch size of two split into a pair and a single.
    let mut sizes = endpoint.request_sizes.lock().unwrap().clone();
    sizes.sort_unstable();
    assert_eq!(sizes, [1, 2]);
}
