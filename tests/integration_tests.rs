//! Integration tests using mock HTTP server
//!
//! Tests the full end-to-end flow: signed HTTP requests → pagination →
//! normalized records → JSON-lines messages and persisted state

use marvel_connector::auth::Authenticator;
use marvel_connector::connector::{Connector, MarvelConnector};
use marvel_connector::engine::{Message, SyncConfig, SyncEngine};
use marvel_connector::output::{JsonLinesWriter, MessageSink};
use marvel_connector::state::StateManager;
use marvel_connector::stream::Resource;
use marvel_connector::MarvelConfig;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::collections::HashMap;
use tempfile::tempdir;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ============================================================================
// Fixtures
// ============================================================================

fn refs(kind: &str, ids: &[i64]) -> Value {
    let items: Vec<_> = ids
        .iter()
        .map(|id| {
            json!({
                "resourceURI": format!("http://gateway.marvel.com/v1/public/{kind}/{id}"),
                "name": "x"
            })
        })
        .collect();
    json!({
        "available": ids.len(),
        "collectionURI": format!("http://gateway.marvel.com/v1/public/{kind}"),
        "items": items,
        "returned": ids.len()
    })
}

fn character(id: i64) -> Value {
    json!({
        "id": id,
        "name": format!("Character {id}"),
        "description": "",
        "modified": format!("2014-04-{:02}T14:18:17-0400", (id % 28) + 1),
        "thumbnail": {"path": "http://i.annihil.us/u/prod/marvel/i/mg/c/e0/535fecbbb9784", "extension": "jpg"},
        "resourceURI": format!("http://gateway.marvel.com/v1/public/characters/{id}"),
        "comics": refs("comics", &[21366, 24571]),
        "series": refs("series", &[1945]),
        "stories": refs("stories", &[]),
        "events": refs("events", &[269]),
        "urls": [{"type": "detail", "url": "http://marvel.com/comics/characters/1011334/3-d_man"}]
    })
}

fn comic() -> Value {
    json!({
        "id": 82967,
        "digitalId": 0,
        "title": "Marvel Previews (2017)",
        "issueNumber": 0,
        "variantDescription": "",
        "description": null,
        "modified": "2019-11-07T08:46:15-0500",
        "isbn": 42,
        "upc": "75960608839302811",
        "diamondCode": "",
        "ean": "",
        "issn": "",
        "format": "",
        "pageCount": 112,
        "textObjects": [],
        "resourceURI": "http://gateway.marvel.com/v1/public/comics/82967",
        "urls": [],
        "series": {"resourceURI": "http://gateway.marvel.com/v1/public/series/23665", "name": "Marvel Previews (2017 - Present)"},
        "variants": [{"resourceURI": "http://gateway.marvel.com/v1/public/comics/82965", "name": "variant"}],
        "collections": [],
        "collectedIssues": [],
        "dates": [{"type": "onsaleDate", "date": "2099-10-30T00:00:00-0500"}],
        "prices": [{"type": "printPrice", "price": 0}],
        "thumbnail": {"path": "http://i.annihil.us/u/prod/marvel/i/mg/b/40/image_not_available", "extension": "jpg"},
        "images": [],
        "creators": refs("creators", &[10021]),
        "characters": refs("characters", &[]),
        "stories": refs("stories", &[183698, 183699]),
        "events": refs("events", &[])
    })
}

fn page(offset: usize, records: Vec<Value>) -> Value {
    json!({
        "code": 200,
        "status": "Ok",
        "etag": "f0fbae65eb2f8f28bdeea0a29be8749a4e67acb3",
        "data": {
            "offset": offset,
            "limit": 100,
            "total": 137,
            "count": records.len(),
            "results": records
        }
    })
}

fn config_for(server: &MockServer) -> MarvelConfig {
    MarvelConfig::new("public-key", "private-key").with_base_url(server.uri())
}

async fn read_all(
    config: &MarvelConfig,
    resources: &[Resource],
    state: StateManager,
) -> (Vec<Value>, SyncEngine) {
    let mut engine = SyncEngine::new(state).with_config(SyncConfig::new());
    let mut writer = JsonLinesWriter::new(Vec::new());
    MarvelConnector::new()
        .read(config, resources, &mut engine, &mut writer)
        .await
        .unwrap();
    writer.flush().unwrap();

    let output = String::from_utf8(writer.into_inner()).unwrap();
    let lines = output
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    (lines, engine)
}

fn records(lines: &[Value]) -> Vec<&Value> {
    lines
        .iter()
        .filter(|l| l["type"] == "RECORD")
        .map(|l| &l["record"]["data"])
        .collect()
}

fn query(request: &wiremock::Request) -> HashMap<String, String> {
    request
        .url
        .query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect()
}

// ============================================================================
// End-to-end reads
// ============================================================================

#[tokio::test]
async fn test_two_page_read() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/characters"))
        .and(query_param("offset", "0"))
        .and(query_param("limit", "100"))
        .and(query_param("orderBy", "modified"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(page(0, (1..=100).map(character).collect())),
        )
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/characters"))
        .and(query_param("offset", "100"))
        .and(query_param("limit", "100"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(
            100,
            (101..=137).map(character).collect(),
        )))
        .expect(1)
        .mount(&server)
        .await;

    let config = config_for(&server);
    let (lines, engine) =
        read_all(&config, &[Resource::Characters], StateManager::in_memory()).await;

    let data = records(&lines);
    assert_eq!(data.len(), 137);
    assert_eq!(data[0]["comics"], json!([21366, 24571]));
    assert_eq!(data[0]["stories"], json!([]));
    assert_eq!(data[136]["id"], 137);

    assert_eq!(lines[0]["type"], "SCHEMA");
    assert_eq!(lines[0]["stream"], "characters");
    assert_eq!(lines.iter().filter(|l| l["type"] == "STATE").count(), 2);
    assert_eq!(engine.stats().pages_fetched, 2);
    assert!(engine.state().get_cursor("characters").await.is_some());
}

#[tokio::test]
async fn test_requests_are_signed_per_request() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/characters"))
        .and(query_param("offset", "0"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(page(0, (1..=100).map(character).collect())),
        )
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/characters"))
        .and(query_param("offset", "100"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(100, vec![character(101)])))
        .mount(&server)
        .await;

    let config = config_for(&server);
    read_all(&config, &[Resource::Characters], StateManager::in_memory()).await;

    let auth = Authenticator::new("public-key", "private-key").unwrap();
    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 2);
    for request in &requests {
        let params = query(request);
        let ts = params.get("ts").unwrap();
        assert_eq!(params.get("apikey").map(String::as_str), Some("public-key"));
        assert_eq!(params.get("hash"), Some(&auth.sign(ts).hash));
        assert!(!params.contains_key("modifiedSince"));
    }
}

#[tokio::test]
async fn test_user_agent_header() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/comics"))
        .and(header("User-Agent", "tap-marvel/1.0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(0, vec![comic()])))
        .expect(1)
        .mount(&server)
        .await;

    let config = config_for(&server).with_user_agent("tap-marvel/1.0");
    let (lines, _) = read_all(&config, &[Resource::Comics], StateManager::in_memory()).await;

    let data = records(&lines);
    assert_eq!(data.len(), 1);
    assert_eq!(data[0]["series"], 23665);
    assert_eq!(data[0]["isbn"], "42");
    assert_eq!(data[0]["variants"], json!([82965]));
    assert_eq!(data[0]["creators"], json!([10021]));
    assert_eq!(data[0]["stories"], json!([183698, 183699]));
    assert_eq!(data[0]["description"], Value::Null);
}

#[tokio::test]
async fn test_developer_mode_reads_one_page() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/characters"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(page(0, (1..=100).map(character).collect())),
        )
        .expect(1)
        .mount(&server)
        .await;

    let config = config_for(&server).with_developer_mode(true);
    let (lines, _) =
        read_all(&config, &[Resource::Characters], StateManager::in_memory()).await;

    assert_eq!(records(&lines).len(), 100);
}

#[tokio::test]
async fn test_incremental_read_uses_and_persists_state() {
    let server = MockServer::start().await;
    let dir = tempdir().unwrap();
    let state_path = dir.path().join("state.json");
    std::fs::write(
        &state_path,
        r#"{"streams": {"characters": {"cursor": "2014-04-01T00:00:00-0400"}}}"#,
    )
    .unwrap();

    Mock::given(method("GET"))
        .and(path("/characters"))
        .and(query_param("modifiedSince", "2014-04-01T00:00:00-0400"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(page(0, vec![character(3), character(9)])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let config = config_for(&server);
    let state = StateManager::from_file(&state_path).unwrap();
    let (lines, _) = read_all(&config, &[Resource::Characters], state).await;

    assert_eq!(records(&lines).len(), 2);

    let saved: Value =
        serde_json::from_str(&std::fs::read_to_string(&state_path).unwrap()).unwrap();
    assert_eq!(
        saved["streams"]["characters"]["cursor"],
        "2014-04-10T14:18:17-0400"
    );
}

#[tokio::test]
async fn test_start_date_when_no_state() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/characters"))
        .and(query_param("modifiedSince", "2010-01-01T00:00:00Z"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(0, vec![])))
        .expect(1)
        .mount(&server)
        .await;

    let config = config_for(&server).with_start_date("2010-01-01T00:00:00Z");
    let (lines, engine) =
        read_all(&config, &[Resource::Characters], StateManager::in_memory()).await;

    assert!(records(&lines).is_empty());
    assert!(engine.state().get_cursor("characters").await.is_none());
}

#[tokio::test]
async fn test_read_all_streams_in_order() {
    let server = MockServer::start().await;

    for resource in Resource::ALL {
        Mock::given(method("GET"))
            .and(path(format!("/{}", resource.name())))
            .respond_with(ResponseTemplate::new(200).set_body_json(page(0, vec![])))
            .expect(1)
            .mount(&server)
            .await;
    }

    let config = config_for(&server);
    let (lines, engine) = read_all(&config, &Resource::ALL, StateManager::in_memory()).await;

    let schemas: Vec<_> = lines
        .iter()
        .filter(|l| l["type"] == "SCHEMA")
        .map(|l| l["stream"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(
        schemas,
        vec!["characters", "comics", "creators", "events", "series", "stories"]
    );
    assert_eq!(engine.stats().streams_synced, 6);
}

#[tokio::test]
async fn test_invalid_credentials_fail_stream() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/series"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "code": "InvalidCredentials",
            "message": "The passed API key is invalid."
        })))
        .expect(1)
        .mount(&server)
        .await;

    let config = config_for(&server);
    let mut engine = SyncEngine::new(StateManager::in_memory());
    let mut sink: Vec<Message> = Vec::new();
    let summary = MarvelConnector::new()
        .read(&config, &[Resource::Series], &mut engine, &mut sink)
        .await
        .unwrap();

    assert_eq!(summary.status(), "FAILED");
    assert!(summary.streams[0]
        .error
        .as_deref()
        .unwrap()
        .contains("InvalidCredentials"));
}

#[tokio::test]
async fn test_read_rejects_invalid_config() {
    let config = MarvelConfig::new("public-key", "");
    let mut engine = SyncEngine::new(StateManager::in_memory());
    let mut sink: Vec<Message> = Vec::new();

    let result = MarvelConnector::new()
        .read(&config, &[Resource::Comics], &mut engine, &mut sink)
        .await;

    assert!(matches!(
        result,
        Err(marvel_connector::Error::MissingConfigField { ref field }) if field == "private_key"
    ));
    assert!(sink.is_empty());
}
