//! Integration tests for the HTTP lookups.
//!
//! A tiny HTTP/1.1 stub on a local port answers each request with a canned
//! status and body, so the real clients run end to end without touching
//! MusicBrainz or Deezer.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use sonority_core::model::{Catalog, CatalogItem, SimilarityMatrix};
use sonority_core::{Library, Recommender};
use sonority_enrich::config::ClientSettings;
use sonority_enrich::{DeezerClient, EnrichError, Enricher, MusicBrainzClient};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

type Handler = Arc<dyn Fn(&str) -> (u16, String) + Send + Sync>;

/// Start a stub server; returns its base URL and the request targets seen.
async fn serve(handler: Handler) -> (String, Arc<Mutex<Vec<String>>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let log = Arc::clone(&seen);

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            let handler = Arc::clone(&handler);
            let log = Arc::clone(&log);
            tokio::spawn(async move {
                let mut buf = vec![0_u8; 16 * 1024];
                let mut read = 0;
                loop {
                    let n = socket.read(&mut buf[read..]).await.unwrap_or(0);
                    read += n;
                    if n == 0 || buf[..read].windows(4).any(|w| w == b"\r\n\r\n") {
                        break;
                    }
                }
                let request = String::from_utf8_lossy(&buf[..read]).to_string();
                let target = request.split_whitespace().nth(1).unwrap_or("").to_string();
                log.lock().unwrap().push(request);

                let (status, body) = handler(&target);
                let response = format!(
                    "HTTP/1.1 {status} STUB\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                    body.len()
                );
                socket.write_all(response.as_bytes()).await.ok();
                socket.shutdown().await.ok();
            });
        }
    });

    (format!("http://{addr}"), seen)
}

fn settings(base_url: &str, retries: usize) -> ClientSettings {
    ClientSettings {
        base_url: base_url.to_string(),
        user_agent: "sonority-tests/0.1".to_string(),
        timeout: Duration::from_secs(5),
        retries,
        requests_per_second: 100,
    }
}

fn recording_json(title: &str) -> String {
    format!(
        r#"{{"count": 1, "recordings": [{{
            "id": "mbid-{title}",
            "title": "{title}",
            "artist-credit": [{{"name": "The Testers"}}],
            "first-release-date": "2001-02-03",
            "tags": [{{"count": 3, "name": "indie"}}]
        }}]}}"#
    )
}

fn cover_json(title: &str) -> String {
    format!(r#"{{"data": [{{"album": {{"cover_big": "https://covers.test/{title}.jpg"}}}}], "total": 1}}"#)
}

#[tokio::test]
async fn test_musicbrainz_search_sends_phrase_query() {
    let (base, seen) = serve(Arc::new(|_: &str| (200, recording_json("Blackbird")))).await;
    let client = MusicBrainzClient::new(&settings(&format!("{base}/ws/2"), 0)).unwrap();

    let metadata = client
        .search_recording("The Beatles", "Blackbird")
        .await
        .unwrap()
        .unwrap();

    assert_eq!(metadata.id, "mbid-Blackbird");
    assert_eq!(metadata.artist_name, "The Testers");
    assert_eq!(metadata.release_date.as_deref(), Some("2001-02-03"));
    assert_eq!(metadata.genre.as_deref(), Some("indie"));

    let requests = seen.lock().unwrap();
    let request = &requests[0];
    assert!(request.starts_with("GET /ws/2/recording/?"));
    assert!(request.contains("fmt=json"));
    assert!(request.contains("limit=1"));
    assert!(request.contains("artist%3A%22The+Beatles%22+AND+recording%3A%22Blackbird%22"));
    assert!(request.to_lowercase().contains("user-agent: sonority-tests/0.1"));
}

#[tokio::test]
async fn test_musicbrainz_empty_result_is_none() {
    let (base, _) = serve(Arc::new(|_: &str| (200, r#"{"count": 0, "recordings": []}"#.to_string()))).await;
    let client = MusicBrainzClient::new(&settings(&base, 0)).unwrap();

    let result = client.search_recording("Nobody", "Nothing").await.unwrap();
    assert!(result.is_none());
}

#[tokio::test]
async fn test_musicbrainz_failure_status_is_error() {
    let (base, _) = serve(Arc::new(|_: &str| (503, String::new()))).await;
    let client = MusicBrainzClient::new(&settings(&base, 0)).unwrap();

    let err = client.search_recording("A", "B").await.unwrap_err();
    assert!(matches!(err, EnrichError::RateLimited { .. }));
}

#[tokio::test]
async fn test_musicbrainz_garbage_body_is_parse_error() {
    let (base, _) = serve(Arc::new(|_: &str| (200, "<html>oops</html>".to_string()))).await;
    let client = MusicBrainzClient::new(&settings(&base, 0)).unwrap();

    let err = client.search_recording("A", "B").await.unwrap_err();
    assert!(matches!(err, EnrichError::Parse { .. }));
}

#[tokio::test]
async fn test_transient_failure_is_retried_when_configured() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let (base, _) = serve(Arc::new(move |_: &str| {
        if counter.fetch_add(1, Ordering::SeqCst) == 0 {
            (502, String::new())
        } else {
            (200, recording_json("Angie"))
        }
    }))
    .await;
    let client = MusicBrainzClient::new(&settings(&base, 2)).unwrap();

    let metadata = client.search_recording("The Rolling Stones", "Angie").await.unwrap();
    assert_eq!(metadata.unwrap().id, "mbid-Angie");
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_deezer_search_returns_big_cover() {
    let (base, seen) = serve(Arc::new(|_: &str| (200, cover_json("Discovery")))).await;
    let client = DeezerClient::new(&settings(&base, 0)).unwrap();

    let url = client.search_cover_art("Daft Punk", "Digital").await.unwrap();
    assert_eq!(url.as_deref(), Some("https://covers.test/Discovery.jpg"));

    let requests = seen.lock().unwrap();
    assert!(requests[0].starts_with("GET /search?"));
    assert!(requests[0].contains("q=artist%3A%22Daft+Punk%22+track%3A%22Digital%22"));
    assert!(requests[0].contains("limit=1"));
}

#[tokio::test]
async fn test_enricher_degrades_failures_to_absent_fields() {
    let (mb_base, _) = serve(Arc::new(|_: &str| (500, String::new()))).await;
    let (dz_base, _) = serve(Arc::new(|_: &str| {
        (
            200,
            r#"{"error": {"type": "DataException", "message": "no data", "code": 800}}"#.to_string(),
        )
    }))
    .await;

    let enricher = Enricher::disabled()
        .with_recordings(Arc::new(MusicBrainzClient::new(&settings(&mb_base, 0)).unwrap()))
        .with_cover_art(Arc::new(DeezerClient::new(&settings(&dz_base, 0)).unwrap()));

    assert!(enricher.lookup_recording("A", "B").await.is_none());
    assert!(enricher.lookup_cover_art("A", "B").await.is_none());
}

#[tokio::test]
async fn test_unreachable_service_is_absent_not_fatal() {
    // Bind then drop to get a port nobody is listening on.
    let addr = TcpListener::bind("127.0.0.1:0")
        .await
        .unwrap()
        .local_addr()
        .unwrap();
    let base = format!("http://{addr}");
    let client = MusicBrainzClient::new(&settings(&base, 0)).unwrap();

    let err = client.search_recording("A", "B").await.unwrap_err();
    assert!(matches!(err, EnrichError::Request(_)));

    let enricher = Enricher::disabled().with_recordings(Arc::new(client));
    assert!(enricher.lookup_recording("A", "B").await.is_none());
}

#[tokio::test]
async fn test_recommend_then_enrich_end_to_end() {
    // Metadata for every title except C; cover art only for B.
    let (mb_base, _) = serve(Arc::new(|target: &str| {
        if target.contains("%22C%22") {
            (500, String::new())
        } else {
            (200, recording_json("hit"))
        }
    }))
    .await;
    let (dz_base, _) = serve(Arc::new(|target: &str| {
        if target.contains("%22B%22") {
            (200, cover_json("B"))
        } else {
            (200, r#"{"data": [], "total": 0}"#.to_string())
        }
    }))
    .await;

    let catalog: Catalog = ["A", "B", "C", "D", "E"]
        .into_iter()
        .map(|t| CatalogItem::new(t, "X"))
        .collect();
    let similarity = SimilarityMatrix::from_rows(vec![
        vec![1.0, 0.9, 0.2, 0.8, 0.5],
        vec![0.9, 1.0, 0.3, 0.6, 0.4],
        vec![0.2, 0.3, 1.0, 0.1, 0.7],
        vec![0.8, 0.6, 0.1, 1.0, 0.3],
        vec![0.5, 0.4, 0.7, 0.3, 1.0],
    ])
    .unwrap();
    let library = Library::new(catalog, similarity).unwrap();
    let recommendations = Recommender::new(&library).recommend("A").unwrap();

    let enricher = Enricher::disabled()
        .with_recordings(Arc::new(MusicBrainzClient::new(&settings(&mb_base, 0)).unwrap()))
        .with_cover_art(Arc::new(DeezerClient::new(&settings(&dz_base, 0)).unwrap()));
    let enriched = enricher.enrich_all(recommendations).await;

    let titles: Vec<_> = enriched.iter().map(|e| e.title()).collect();
    assert_eq!(titles, vec!["B", "D", "E", "C"]);

    assert_eq!(enriched[0].cover_art_url(), Some("https://covers.test/B.jpg"));
    assert_eq!(enriched[0].release_date(), Some("2001-02-03"));
    assert!(enriched[1].cover_art_url().is_none());
    assert_eq!(enriched[1].genre(), Some("indie"));
    assert!(enriched[3].metadata.is_none());
    assert!(enriched[3].cover_art_url().is_none());
}
