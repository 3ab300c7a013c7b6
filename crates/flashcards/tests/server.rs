//! The web front end served against an in-memory table.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde_json::json;

use flashcards::notion::{Page, PropertyValue, RichText, CHECKBOX_PROPERTY, NAME_PROPERTY};
use flashcards::{
    build_router, load_deck, AppState, CardListView, Config, Error, FlashcardRecord, HttpMutator,
    Result, TableClient,
};

#[derive(Debug)]
struct MemoryTable {
    rows: Mutex<Vec<(String, String, bool)>>,
    fail_updates: bool,
}

impl MemoryTable {
    fn new(rows: &[(&str, &str, bool)]) -> Self {
        Self {
            rows: Mutex::new(
                rows.iter()
                    .map(|(id, name, checked)| (id.to_string(), name.to_string(), *checked))
                    .collect(),
            ),
            fail_updates: false,
        }
    }

    fn checked(&self, id: &str) -> Option<bool> {
        self.rows
            .lock()
            .unwrap()
            .iter()
            .find(|(row_id, _, _)| row_id == id)
            .map(|(_, _, checked)| *checked)
    }
}

#[async_trait::async_trait]
impl TableClient for MemoryTable {
    async fn query_database(&self, _database_id: &str) -> Result<Vec<Page>> {
        let rows = self.rows.lock().unwrap();
        Ok(rows
            .iter()
            .map(|(id, name, checked)| {
                let mut properties = HashMap::new();
                properties.insert(
                    NAME_PROPERTY.to_string(),
                    PropertyValue::Title {
                        title: vec![RichText {
                            plain_text: name.clone(),
                        }],
                    },
                );
                properties.insert(
                    CHECKBOX_PROPERTY.to_string(),
                    PropertyValue::Checkbox { checkbox: *checked },
                );
                Page {
                    id: id.clone(),
                    properties: Some(properties),
                }
            })
            .collect())
    }

    async fn update_checkbox(&self, page_id: &str, checked: bool) -> Result<()> {
        if self.fail_updates {
            return Err(Error::remote_status(503, "service unavailable"));
        }
        let mut rows = self.rows.lock().unwrap();
        match rows.iter_mut().find(|(id, _, _)| id == page_id) {
            Some(row) => {
                row.2 = checked;
                Ok(())
            }
            None => Err(Error::remote_status(404, format!("no page {page_id}"))),
        }
    }
}

fn config(database_id: Option<&str>) -> Config {
    let mut config = Config::default();
    config.notion.database_id = database_id.map(str::to_string);
    config
}

async fn start_app(table: Arc<MemoryTable>, config: Config) -> SocketAddr {
    let app = build_router(AppState::new(table, config));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind listener");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move { axum::serve(listener, app).await.expect("serve app") });
    addr
}

fn pets() -> Arc<MemoryTable> {
    Arc::new(MemoryTable::new(&[("a", "Cat", false), ("b", "Dog", true)]))
}

#[tokio::test]
async fn index_renders_cards_in_display_order() {
    let addr = start_app(pets(), config(Some("db"))).await;

    let response = reqwest::get(format!("http://{addr}/")).await.expect("get /");
    assert_eq!(response.status(), 200);
    let body = response.text().await.expect("body");

    let dog = body.find("data-page-id=\"b\"").expect("dog card");
    let cat = body.find("data-page-id=\"a\"").expect("cat card");
    assert!(dog < cat);
    assert!(body.contains(
        r#"[{"page_id":"b","name":"Dog","checkbox":true},{"page_id":"a","name":"Cat","checkbox":false}]"#
    ));
}

#[tokio::test]
async fn index_without_database_id_is_a_failed_render() {
    let addr = start_app(pets(), config(None)).await;

    let response = reqwest::get(format!("http://{addr}/")).await.expect("get /");
    assert_eq!(response.status(), 500);
    assert!(response.text().await.unwrap().contains("database id not defined"));
}

#[tokio::test]
async fn healthz_answers_ok() {
    let addr = start_app(pets(), config(Some("db"))).await;

    let response = reqwest::get(format!("http://{addr}/healthz")).await.unwrap();
    assert_eq!(response.status(), 200);
    assert_eq!(response.text().await.unwrap(), "ok");
}

#[tokio::test]
async fn mutation_endpoint_writes_full_sequence() {
    let table = pets();
    let addr = start_app(table.clone(), config(Some("db"))).await;

    let response = reqwest::Client::new()
        .post(format!("http://{addr}/api/pages"))
        .json(&json!([
            {"name": "Dog", "checkbox": false, "page_id": "b"},
            {"name": "Cat", "checkbox": true, "page_id": "a"}
        ]))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 204);
    assert_eq!(table.checked("a"), Some(true));
    assert_eq!(table.checked("b"), Some(false));
}

#[tokio::test]
async fn mutation_endpoint_rejects_duplicate_ids() {
    let table = pets();
    let addr = start_app(table.clone(), config(Some("db"))).await;

    let response = reqwest::Client::new()
        .post(format!("http://{addr}/api/pages"))
        .json(&json!([
            {"name": "Cat", "checkbox": true, "page_id": "a"},
            {"name": "Cat", "checkbox": true, "page_id": "a"}
        ]))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 422);
    assert_eq!(table.checked("a"), Some(false));
}

#[tokio::test]
async fn mutation_endpoint_reports_remote_failure() {
    let table = Arc::new(MemoryTable {
        fail_updates: true,
        ..MemoryTable::new(&[("a", "Cat", false)])
    });
    let addr = start_app(table, config(Some("db"))).await;

    let response = reqwest::Client::new()
        .post(format!("http://{addr}/api/pages"))
        .json(&json!([{"name": "Cat", "checkbox": true, "page_id": "a"}]))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 502);
    let body: serde_json::Value = response.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("service unavailable"));
}

#[tokio::test]
async fn view_toggle_round_trips_through_server() {
    let table = pets();
    let addr = start_app(table.clone(), config(Some("db"))).await;

    let deck = load_deck(table.as_ref(), Some("db")).await.unwrap();
    let mutator = HttpMutator::new(&format!("http://{addr}"), Duration::from_secs(5)).unwrap();
    let mut view = CardListView::new(deck, Arc::new(mutator));

    view.toggle("a").unwrap().wait().await.unwrap();

    assert_eq!(
        view.deck().to_records(),
        vec![
            FlashcardRecord::new("b", "Dog", true),
            FlashcardRecord::new("a", "Cat", true),
        ]
    );
    assert_eq!(table.checked("a"), Some(true));
    assert_eq!(table.checked("b"), Some(true));
}
