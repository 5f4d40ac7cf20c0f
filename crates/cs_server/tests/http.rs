use cs_core::diff::calc_diff;
use cs_core::version_store::{server_init, version_diff_path};
use cs_core::wire::{FileDiff, HistoryLog, VersionDiff};
use std::path::PathBuf;

fn lines(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

async fn start_server(root: PathBuf) -> String {
    server_init(&root, "t").expect("server init");
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        cs_server::http::serve(root, listener).await.expect("serve");
    });
    format!("http://{}", addr)
}

fn sample_push() -> VersionDiff {
    VersionDiff {
        prev_version: 0,
        cur_version: 0,
        edited_files: vec![FileDiff::edited("./a.ml", calc_diff(&[], &lines(&["x", "y"])))],
    }
}

#[tokio::test]
async fn requests_without_a_valid_token_get_401() {
    let root = tempfile::tempdir().expect("tempdir").keep();
    let base = start_server(root).await;

    for url in [
        format!("{}/version", base),
        format!("{}/version?token=wrong", base),
        format!("{}/diff?token=wrong&from=0", base),
        format!("{}/history", base),
    ] {
        let resp = reqwest::get(&url).await.expect("request");
        assert_eq!(resp.status(), reqwest::StatusCode::UNAUTHORIZED);
        assert_eq!(resp.text().await.expect("body"), "Unauthorized Access");
    }
}

#[tokio::test]
async fn version_starts_at_zero_and_tracks_appends() {
    let root = tempfile::tempdir().expect("tempdir").keep();
    let base = start_server(root).await;
    let client = reqwest::Client::new();

    let resp: serde_json::Value = client
        .get(format!("{}/version?token=t", base))
        .send()
        .await
        .expect("get version")
        .json()
        .await
        .expect("parse");
    assert_eq!(resp, serde_json::json!({ "version": 0 }));

    let pushed: serde_json::Value = client
        .post(format!("{}/diff?token=t", base))
        .json(&sample_push())
        .send()
        .await
        .expect("post diff")
        .json()
        .await
        .expect("parse push response");
    assert_eq!(pushed, serde_json::json!({ "version": 1 }));

    let resp: serde_json::Value = client
        .get(format!("{}/version?token=t", base))
        .send()
        .await
        .expect("get version")
        .json()
        .await
        .expect("parse");
    assert_eq!(resp, serde_json::json!({ "version": 1 }));
}

#[tokio::test]
async fn pulled_diff_covers_the_requested_range() {
    let root = tempfile::tempdir().expect("tempdir").keep();
    let base = start_server(root).await;
    let client = reqwest::Client::new();

    client
        .post(format!("{}/diff?token=t", base))
        .json(&sample_push())
        .send()
        .await
        .expect("post diff");

    let vd: VersionDiff = client
        .get(format!("{}/diff?token=t&from=0", base))
        .send()
        .await
        .expect("get diff")
        .json()
        .await
        .expect("parse diff");
    assert_eq!(vd.prev_version, 0);
    assert_eq!(vd.cur_version, 1);
    assert_eq!(vd.edited_files.len(), 1);
    assert_eq!(vd.edited_files[0].file_name, "./a.ml");

    let identity: VersionDiff = client
        .get(format!("{}/diff?token=t&from=1&to=1", base))
        .send()
        .await
        .expect("get diff")
        .json()
        .await
        .expect("parse diff");
    assert_eq!(identity, VersionDiff::identity(1));
}

#[tokio::test]
async fn bad_diff_parameters_get_400() {
    let root = tempfile::tempdir().expect("tempdir").keep();
    let base = start_server(root).await;
    let client = reqwest::Client::new();

    for url in [
        format!("{}/diff?token=t", base),
        format!("{}/diff?token=t&from=abc", base),
        format!("{}/diff?token=t&from=9", base),
        format!("{}/diff?token=t&from=0&to=9", base),
    ] {
        let resp = client.get(&url).send().await.expect("request");
        assert_eq!(resp.status(), reqwest::StatusCode::BAD_REQUEST, "url {}", url);
    }

    let resp = client
        .post(format!("{}/diff?token=t", base))
        .body("{not json")
        .send()
        .await
        .expect("post");
    assert_eq!(resp.status(), reqwest::StatusCode::BAD_REQUEST);
}

#[tokio::test(flavor = "multi_thread")]
async fn concurrent_pushes_serialize_into_consecutive_versions() {
    let root = tempfile::tempdir().expect("tempdir").keep();
    let base = start_server(root.clone()).await;
    let client = reqwest::Client::new();

    let first = client
        .post(format!("{}/diff?token=t", base))
        .json(&sample_push())
        .send();
    let second = client
        .post(format!("{}/diff?token=t", base))
        .json(&sample_push())
        .send();
    let (first, second) = tokio::join!(first, second);

    let first: serde_json::Value = first.expect("first push").json().await.expect("parse");
    let second: serde_json::Value = second.expect("second push").json().await.expect("parse");
    let mut versions = vec![
        first["version"].as_u64().expect("first version"),
        second["version"].as_u64().expect("second version"),
    ];
    versions.sort_unstable();
    assert_eq!(versions, vec![1, 2]);
    assert!(version_diff_path(&root, 1).exists());
    assert!(version_diff_path(&root, 2).exists());
}

#[tokio::test]
async fn history_lists_one_entry_per_stored_version() {
    let root = tempfile::tempdir().expect("tempdir").keep();
    let base = start_server(root).await;
    let client = reqwest::Client::new();

    client
        .post(format!("{}/diff?token=t", base))
        .json(&sample_push())
        .send()
        .await
        .expect("post diff");

    let log: HistoryLog = client
        .get(format!("{}/history?token=t", base))
        .send()
        .await
        .expect("get history")
        .json()
        .await
        .expect("parse history");
    let versions: Vec<u64> = log.log.iter().map(|entry| entry.version).collect();
    assert_eq!(versions, vec![0, 1]);
    assert!(log.log.iter().all(|entry| entry.timestamp > 0.0));
}
