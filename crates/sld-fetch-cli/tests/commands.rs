//! Subcommand integration tests.
//!
//! Fetch runs against a local wiremock archive host; annotate runs against
//! small files in a temp directory.

use std::fs;
use std::path::PathBuf;

use serde_json::{json, Value};
use wiremock::matchers::{method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

use sld_fetch::{jurisdictions, Chamber, SourceTemplate, TaskResult};
use sld_fetch_cli::commands::annotate_cmd::{self, AnnotateOptions};
use sld_fetch_cli::commands::fetch_cmd::{self, FetchOptions};
use sld_fetch_cli::commands::plan_cmd;

// ─────────────────────── helpers ───────────────────────

const ZIP_BODY: &[u8] = b"PK\x03\x04fake-archive";

async fn archive_host() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path_regex(r"^/geo/tiger/TIGER2018/SLD[LU]/tl_2018_\d{2}_sld[lu]\.zip$"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(ZIP_BODY))
        .mount(&server)
        .await;
    server
}

fn fetch_opts(server: &MockServer, output_dir: PathBuf) -> FetchOptions {
    FetchOptions {
        output_dir,
        base_url: server.uri(),
        states: Vec::new(),
        chambers: Vec::new(),
        fail_fast: false,
        skip_existing: false,
        create_dir: false,
        timeout: None,
    }
}

// ═══════════════════════════════════════════════════════
// FETCH
// ═══════════════════════════════════════════════════════

#[tokio::test]
async fn fetch_filtered_states_and_chamber() {
    let server = archive_host().await;
    let dir = tempfile::tempdir().unwrap();
    let mut opts = fetch_opts(&server, dir.path().to_path_buf());
    opts.states = vec!["ca".to_string(), "Puerto Rico".to_string()];
    opts.chambers = vec![Chamber::Upper];

    let report = fetch_cmd::run(&opts, true).await.unwrap();

    assert!(report.is_success());
    assert_eq!(report.written(), 2);
    assert_eq!(fs::read(dir.path().join("tl_2018_06_sldu.zip")).unwrap(), ZIP_BODY);
    assert_eq!(fs::read(dir.path().join("tl_2018_72_sldu.zip")).unwrap(), ZIP_BODY);
    assert!(!dir.path().join("tl_2018_06_sldl.zip").exists());
}

#[tokio::test]
async fn fetch_create_dir() {
    let server = archive_host().await;
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("nested").join("data");
    let mut opts = fetch_opts(&server, out.clone());
    opts.states = vec!["01".to_string()];
    opts.create_dir = true;

    let report = fetch_cmd::run(&opts, true).await.unwrap();

    assert_eq!(report.written(), 2);
    assert!(out.join("tl_2018_01_sldl.zip").is_file());
}

#[tokio::test]
async fn fetch_fail_fast_stops_on_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/geo/tiger/TIGER2018/SLDU/tl_2018_01_sldu.zip"))
        .respond_with(ResponseTemplate::new(404))
        .with_priority(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(ZIP_BODY))
        .mount(&server)
        .await;
    let dir = tempfile::tempdir().unwrap();
    let mut opts = fetch_opts(&server, dir.path().to_path_buf());
    opts.fail_fast = true;

    let report = fetch_cmd::run(&opts, true).await.unwrap();

    assert!(report.aborted);
    assert_eq!(report.outcomes.len(), 2);
    assert!(matches!(
        report.outcomes[1].result,
        TaskResult::Failed { .. }
    ));
    assert!(dir.path().join("tl_2018_01_sldl.zip").is_file());
    assert!(!dir.path().join("tl_2018_02_sldl.zip").exists());
}

#[tokio::test]
async fn fetch_skip_existing_leaves_file() {
    let server = archive_host().await;
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("tl_2018_01_sldl.zip"), b"kept").unwrap();
    let mut opts = fetch_opts(&server, dir.path().to_path_buf());
    opts.states = vec!["AL".to_string()];
    opts.skip_existing = true;

    let report = fetch_cmd::run(&opts, true).await.unwrap();

    assert_eq!(report.skipped(), 1);
    assert_eq!(report.written(), 1);
    assert_eq!(fs::read(dir.path().join("tl_2018_01_sldl.zip")).unwrap(), b"kept");
}

#[tokio::test]
async fn fetch_unknown_state_is_setup_error() {
    let server = archive_host().await;
    let dir = tempfile::tempdir().unwrap();
    let mut opts = fetch_opts(&server, dir.path().to_path_buf());
    opts.states = vec!["Atlantis".to_string()];

    let err = fetch_cmd::run(&opts, true).await.unwrap_err();

    assert!(format!("{err:#}").contains("Atlantis"));
    assert!(server.received_requests().await.unwrap().is_empty());
}

// ═══════════════════════════════════════════════════════
// PLAN
// ═══════════════════════════════════════════════════════

#[test]
fn plan_covers_all_jurisdictions() {
    let source = SourceTemplate::default();
    let all = jurisdictions::select::<&str>(&[]).unwrap();

    let tasks = plan_cmd::run(&source, &all, &Chamber::ALL, true).unwrap();

    assert_eq!(tasks.len(), 104);
    assert_eq!(
        tasks[0].url,
        "https://www2.census.gov/geo/tiger/TIGER2018/SLDL/tl_2018_01_sldl.zip"
    );
    assert_eq!(
        tasks[103].destination,
        PathBuf::from("./data/tl_2018_72_sldu.zip")
    );
}

// ═══════════════════════════════════════════════════════
// ANNOTATE
// ═══════════════════════════════════════════════════════

#[test]
fn annotate_with_default_file_names() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("sldu-ocdid.csv"),
        "id,census_geoid_14\nocd-division/country:us/state:ny/sldu:5,sldu-36005\n",
    )
    .unwrap();
    fs::write(
        dir.path().join("sldl-ocdid.csv"),
        "id,census_geoid_14\nocd-division/country:us/state:ny/sldl:5,sldl-36005\n",
    )
    .unwrap();
    let collection = json!({
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "properties": { "MTFCC": "G5210", "STATEFP": "36", "GEOID": "36005" },
                "geometry": null
            },
            {
                "type": "Feature",
                "properties": { "MTFCC": "G5220", "STATEFP": "36", "GEOID": "36999" },
                "geometry": null
            }
        ]
    });
    fs::write(dir.path().join("sld.geojson"), collection.to_string()).unwrap();

    let opts = AnnotateOptions::resolve(dir.path(), None, None, None, None);
    let stats = annotate_cmd::run(&opts, true).unwrap();

    assert_eq!(stats.features, 2);
    assert_eq!(stats.matched, 1);

    let written = fs::read_to_string(dir.path().join("sld-with-ocdid.geojson")).unwrap();
    let parsed: Value = serde_json::from_str(&written).unwrap();
    assert_eq!(
        parsed["features"][0]["properties"],
        json!({ "ocdid": "ocd-division/country:us/state:ny/sldu:5", "type": "sldu", "state": "ny" })
    );
    assert_eq!(
        parsed["features"][1]["properties"],
        json!({ "ocdid": null, "type": "sldl", "state": "ny" })
    );
}

#[test]
fn annotate_missing_inputs_is_error() {
    let dir = tempfile::tempdir().unwrap();
    let opts = AnnotateOptions::resolve(dir.path(), None, None, None, None);

    let err = annotate_cmd::run(&opts, true).unwrap_err();

    assert!(format!("{err:#}").contains("sldu-ocdid.csv"));
}
