//! The archive.org enrichment step is best-effort: a healthy payload yields
//! title/author/download links, and every failure mode degrades to `None`
//! without surfacing an error.

use std::time::Duration;

use coursebase::content::ArchiveMetaClient;

fn client() -> ArchiveMetaClient {
    ArchiveMetaClient::new(mockito::server_url(), Duration::from_secs(2))
}

#[tokio::test]
async fn healthy_payload_is_enriched() {
    let _m = mockito::mock("GET", "/metadata/physics-course-101")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{
                "metadata": {
                    "title": "Physics Course 101",
                    "creator": "R. Feynman"
                },
                "files": [
                    {"name": "lecture1.mp4", "format": "MPEG4"},
                    {"name": "lecture1.ogv", "format": "Ogg Video"}
                ]
            }"#,
        )
        .create();

    let meta = client().fetch("physics-course-101").await.unwrap();

    assert_eq!(meta.title.as_deref(), Some("Physics Course 101"));
    assert_eq!(meta.creator.as_deref(), Some("R. Feynman"));
    assert_eq!(meta.downloads.len(), 2);
    assert_eq!(meta.downloads[0].format, "MPEG4");
    assert_eq!(
        meta.downloads[0].url,
        "https://archive.org/download/physics-course-101/lecture1.mp4"
    );
    assert_eq!(
        meta.details_url,
        "https://archive.org/details/physics-course-101"
    );
}

#[tokio::test]
async fn creator_served_as_array_is_flattened() {
    let _m = mockito::mock("GET", "/metadata/multi-author")
        .with_status(200)
        .with_body(r#"{"metadata": {"title": "T", "creator": ["First", "Second"]}}"#)
        .create();

    let meta = client().fetch("multi-author").await.unwrap();

    assert_eq!(meta.creator.as_deref(), Some("First"));
    assert!(meta.downloads.is_empty());
}

#[tokio::test]
async fn missing_item_degrades_to_none() {
    let _m = mockito::mock("GET", "/metadata/gone")
        .with_status(404)
        .create();

    assert!(client().fetch("gone").await.is_none());
}

#[tokio::test]
async fn malformed_payload_degrades_to_none() {
    let _m = mockito::mock("GET", "/metadata/garbled")
        .with_status(200)
        .with_body("this is not json")
        .create();

    assert!(client().fetch("garbled").await.is_none());
}

#[tokio::test]
async fn unreachable_server_degrades_to_none() {
    let unreachable =
        ArchiveMetaClient::new("http://127.0.0.1:9", Duration::from_millis(200));

    assert!(unreachable.fetch("anything").await.is_none());
}
