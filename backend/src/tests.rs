//! Integration tests for the PHARMADICES backend.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use serde_json::{json, Value};
use tempfile::TempDir;

use crate::autocomplete::AutocompleteIndex;
use crate::catalog::{sample::sample_medicines, Catalog};
use crate::config::Config;
use crate::db::{init_database, Repository};
use crate::search::SearchIndex;
use crate::tracker::ReminderBuffer;
use crate::{create_router, AppState};

/// Test fixture for integration tests.
struct TestFixture {
    client: Client,
    base_url: String,
    _temp_dir: TempDir,
}

impl TestFixture {
    async fn new() -> Self {
        Self::with_psk(Some("test-api-key".to_string())).await
    }

    async fn with_psk(psk: Option<String>) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let db_path = temp_dir.path().join("test.sqlite");
        let index_path = temp_dir.path().join("index");

        let pool = init_database(&db_path).await.expect("Failed to init DB");
        let repo = Arc::new(Repository::new(pool));

        let catalog = Arc::new(Catalog::new(sample_medicines()));
        let search = Arc::new(SearchIndex::open(&index_path).expect("Failed to init search"));
        search
            .rebuild(catalog.all())
            .await
            .expect("Failed to build index");
        let autocomplete = Arc::new(AutocompleteIndex::build(catalog.all()));

        let config = Config {
            api_psk: psk.clone(),
            db_path,
            index_path,
            dataset_path: temp_dir.path().join("medicines.json"),
            bind_addr: "127.0.0.1:0".parse().unwrap(),
            log_level: "warn".to_string(),
            reminder_interval: Duration::from_secs(60),
        };

        let state = AppState {
            repo,
            search,
            catalog,
            autocomplete,
            reminders: ReminderBuffer::new(),
            config: Arc::new(config),
        };

        let app = create_router(state);

        // Bind to random port
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind");
        let addr = listener.local_addr().expect("Failed to get addr");
        let base_url = format!("http://{}", addr);

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        // Wait for server to start
        tokio::time::sleep(Duration::from_millis(100)).await;

        let mut client_builder = Client::builder();
        if let Some(key) = psk {
            let mut headers = reqwest::header::HeaderMap::new();
            headers.insert("x-api-key", key.parse().unwrap());
            client_builder = client_builder.default_headers(headers);
        }

        TestFixture {
            client: client_builder.build().unwrap(),
            base_url,
            _temp_dir: temp_dir,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get(&self, path: &str) -> (u16, Value) {
        let resp = self.client.get(self.url(path)).send().await.unwrap();
        let status = resp.status().as_u16();
        (status, resp.json().await.unwrap())
    }

    async fn post(&self, path: &str, body: Value) -> (u16, Value) {
        let resp = self
            .client
            .post(self.url(path))
            .json(&body)
            .send()
            .await
            .unwrap();
        let status = resp.status().as_u16();
        (status, resp.json().await.unwrap())
    }

    async fn put(&self, path: &str, body: Value) -> (u16, Value) {
        let resp = self
            .client
            .put(self.url(path))
            .json(&body)
            .send()
            .await
            .unwrap();
        let status = resp.status().as_u16();
        (status, resp.json().await.unwrap())
    }
}

#[tokio::test]
async fn test_health_check() {
    let fixture = TestFixture::new().await;

    let resp = fixture
        .client
        .get(fixture.url("/health"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(resp.text().await.unwrap(), "OK");
}

#[tokio::test]
async fn test_auth_missing_psk() {
    let fixture = TestFixture::new().await;

    // Plain client without the default header
    let resp = Client::new()
        .get(fixture.url("/api/medicines"))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 401);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn test_auth_invalid_and_bearer_psk() {
    let fixture = TestFixture::new().await;

    let wrong = Client::new()
        .get(fixture.url("/api/medicines"))
        .header("x-api-key", "wrong-key")
        .send()
        .await
        .unwrap();
    assert_eq!(wrong.status(), 401);

    let bearer = Client::new()
        .get(fixture.url("/api/medicines"))
        .header("Authorization", "Bearer test-api-key")
        .send()
        .await
        .unwrap();
    assert_eq!(bearer.status(), 200);
}

#[tokio::test]
async fn test_auth_disabled_without_psk() {
    let fixture = TestFixture::with_psk(None).await;

    let (status, body) = fixture.get("/api/revision").await;
    assert_eq!(status, 200);
    assert_eq!(body["success"], true);
    assert!(body["data"]["schemaVersion"].is_number());
    assert!(body["revisionId"].is_number());
}

#[tokio::test]
async fn test_catalog_listing_and_detail() {
    let fixture = TestFixture::new().await;

    let (status, body) = fixture.get("/api/medicines").await;
    assert_eq!(status, 200);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["total"], 6);
    assert_eq!(body["data"]["items"].as_array().unwrap().len(), 6);

    let (_, filtered) = fixture.get("/api/medicines?q=para&field=name").await;
    assert_eq!(filtered["data"]["total"], 1);
    assert_eq!(filtered["data"]["items"][0]["name"], "Paracetamol");

    let (_, by_type) = fixture.get("/api/medicines?type=capsule").await;
    assert_eq!(by_type["data"]["total"], 1);
    assert_eq!(by_type["data"]["items"][0]["name"], "Omeprazole");

    let (status, detail) = fixture.get("/api/medicines/1").await;
    assert_eq!(status, 200);
    assert_eq!(detail["data"]["medicine"]["name"], "Paracetamol");
    assert_eq!(detail["data"]["isFavorite"], false);
    assert_eq!(detail["data"]["hasSchedule"], false);

    let (status, missing) = fixture.get("/api/medicines/999").await;
    assert_eq!(status, 404);
    assert_eq!(missing["success"], false);
    assert_eq!(missing["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_full_text_search() {
    let fixture = TestFixture::new().await;

    let (status, body) = fixture.get("/api/search?q=paracetamol").await;
    assert_eq!(status, 200);
    let results = body["data"]["results"].as_array().unwrap();
    assert!(!results.is_empty());
    assert_eq!(results[0]["medicine"]["id"], 1);

    let (_, uses) = fixture.get("/api/search?q=infections").await;
    assert_eq!(uses["data"]["results"][0]["medicine"]["id"], 2);

    let (_, empty) = fixture.get("/api/search?q=").await;
    assert_eq!(empty["data"]["total"], 0);

    let (status, far) = fixture
        .get("/api/search?q=pain&offset=18446744073709551610")
        .await;
    assert_eq!(status, 200);
    assert_eq!(far["data"]["total"], 0);
}

#[tokio::test]
async fn test_autocomplete_and_recent_searches() {
    let fixture = TestFixture::new().await;

    let (status, body) = fixture.get("/api/autocomplete?q=pan").await;
    assert_eq!(status, 200);
    let suggestions = body["data"].as_array().unwrap();
    assert!(!suggestions.is_empty());

    let (_, recent) = fixture
        .post("/api/recent-searches", json!({ "term": "Omeprazole" }))
        .await;
    assert_eq!(recent["data"][0], "Omeprazole");

    let (_, recent) = fixture.get("/api/recent-searches").await;
    assert_eq!(recent["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_favorite_toggle_twice() {
    let fixture = TestFixture::new().await;

    let (status, added) = fixture.post("/api/favorites/3", json!({})).await;
    assert_eq!(status, 200);
    assert_eq!(added["data"]["isFavorite"], true);
    let revision_after_add = added["revisionId"].as_i64().unwrap();

    let (_, list) = fixture.get("/api/favorites").await;
    assert_eq!(list["data"]["ids"], json!([3]));

    let (_, removed) = fixture.post("/api/favorites/3", json!({})).await;
    assert_eq!(removed["data"]["isFavorite"], false);
    assert!(removed["revisionId"].as_i64().unwrap() > revision_after_add);

    let (_, list) = fixture.get("/api/favorites").await;
    assert_eq!(list["data"]["ids"], json!([]));

    let (status, _) = fixture.post("/api/favorites/999", json!({})).await;
    assert_eq!(status, 404);
}

#[tokio::test]
async fn test_schedule_and_take_dose() {
    let fixture = TestFixture::new().await;

    let (status, saved) = fixture
        .put(
            "/api/schedules",
            json!({
                "medicineId": 1,
                "dosage": "500mg",
                "frequency": "twice",
                "duration": 5
            }),
        )
        .await;
    assert_eq!(status, 200);
    assert_eq!(saved["data"]["times"], json!(["08:00", "20:00"]));
    assert_eq!(saved["data"]["version"], 1);

    let (status, taken) = fixture
        .post(
            "/api/schedules/1/doses",
            json!({ "time": "08:00", "expectedVersion": 1 }),
        )
        .await;
    assert_eq!(status, 200);
    assert_eq!(taken["data"]["version"], 2);
    assert_eq!(taken["data"]["completedDoses"][0]["time"], "08:00");

    // Same slot again today
    let (status, again) = fixture
        .post("/api/schedules/1/doses", json!({ "time": "08:00" }))
        .await;
    assert_eq!(status, 400);
    assert_eq!(again["error"]["code"], "VALIDATION_ERROR");

    // Not a scheduled time
    let (status, _) = fixture
        .post("/api/schedules/1/doses", json!({ "time": "09:30" }))
        .await;
    assert_eq!(status, 400);

    // Stale version
    let (status, conflict) = fixture
        .post(
            "/api/schedules/1/doses",
            json!({ "time": "20:00", "expectedVersion": 1 }),
        )
        .await;
    assert_eq!(status, 409);
    assert_eq!(conflict["error"]["code"], "VERSION_MISMATCH");
    assert_eq!(conflict["error"]["details"]["currentVersion"], 2);

    let (_, today) = fixture.get("/api/schedules/today").await;
    let slots = today["data"].as_array().unwrap();
    assert_eq!(slots.len(), 2);
    assert!(slots.iter().any(|s| s["time"] == "08:00" && s["taken"] == true));

    let (_, activity) = fixture.get("/api/activity").await;
    let types: Vec<&str> = activity["data"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|a| a["type"].as_str())
        .collect();
    assert!(types.contains(&"dose-taken"));
}

#[tokio::test]
async fn test_schedule_validation() {
    let fixture = TestFixture::new().await;

    let (status, body) = fixture
        .put(
            "/api/schedules",
            json!({ "medicineId": 1, "dosage": "", "frequency": "once" }),
        )
        .await;
    assert_eq!(status, 400);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");

    let (status, _) = fixture
        .put(
            "/api/schedules",
            json!({ "medicineId": 1, "dosage": "1 tablet", "frequency": "custom", "customTimes": [] }),
        )
        .await;
    assert_eq!(status, 400);

    let (status, _) = fixture.get("/api/schedules/1").await;
    assert_eq!(status, 404);
}

#[tokio::test]
async fn test_review_submit_replaces_previous() {
    let fixture = TestFixture::new().await;

    let review = |rating: i64, title: &str| {
        json!({
            "rating": rating,
            "title": title,
            "text": "Worked as expected.",
            "effectiveness": "very-effective",
            "recommend": true
        })
    };

    let (status, first) = fixture.put("/api/medicines/2/reviews", review(4, "Good")).await;
    assert_eq!(status, 200);
    assert_eq!(first["data"]["isOwn"], true);

    let (_, _) = fixture.put("/api/medicines/2/reviews", review(2, "Meh")).await;

    let (_, summary) = fixture.get("/api/medicines/2/reviews").await;
    assert_eq!(summary["data"]["reviewCount"], 1);
    assert_eq!(summary["data"]["averageRating"], 2.0);
    assert_eq!(summary["data"]["reviews"][0]["title"], "Meh");

    let (status, invalid) = fixture.put("/api/medicines/2/reviews", review(6, "Too much")).await;
    assert_eq!(status, 400);
    assert_eq!(invalid["error"]["code"], "VALIDATION_ERROR");

    let resp = fixture
        .client
        .delete(fixture.url("/api/medicines/2/reviews"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let (_, summary) = fixture.get("/api/medicines/2/reviews").await;
    assert_eq!(summary["data"]["reviewCount"], 0);
}

#[tokio::test]
async fn test_dosage_calculation() {
    let fixture = TestFixture::new().await;

    let (status, body) = fixture
        .post(
            "/api/dosage",
            json!({
                "medicineId": 1,
                "age": 30,
                "weight": 70.0,
                "category": "adult"
            }),
        )
        .await;
    assert_eq!(status, 200);
    assert_eq!(body["data"]["status"], "dose");
    assert_eq!(body["data"]["minDose"], 700.0);
    assert_eq!(body["data"]["maxDose"], 1050.0);
    assert_eq!(body["data"]["maxDailyDose"], 4000.0);

    let (status, _) = fixture
        .post(
            "/api/dosage",
            json!({ "medicineId": 1, "age": 30, "weight": 0.0, "category": "adult" }),
        )
        .await;
    assert_eq!(status, 400);
}

#[tokio::test]
async fn test_interaction_selection_and_check() {
    let fixture = TestFixture::new().await;

    let (status, body) = fixture.post("/api/interactions/check", json!({})).await;
    assert_eq!(status, 400);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");

    fixture.post("/api/interactions/selection/1", json!({})).await;
    let (_, selection) = fixture.post("/api/interactions/selection/2", json!({})).await;
    assert_eq!(selection["data"]["ids"], json!([1, 2]));

    let (status, report) = fixture.post("/api/interactions/check", json!({})).await;
    assert_eq!(status, 200);
    assert_eq!(report["data"]["medicines"].as_array().unwrap().len(), 2);
    assert!(report["data"]["summary"]["high"].is_number());

    let (status, analyzed) = fixture
        .post("/api/interactions/analyze", json!({ "medicineIds": [1, 5, 1] }))
        .await;
    assert_eq!(status, 200);
    assert_eq!(analyzed["data"]["medicines"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_comparison_limit() {
    let fixture = TestFixture::new().await;

    for id in 1..=4 {
        let (status, _) = fixture.post(&format!("/api/comparison/{}", id), json!({})).await;
        assert_eq!(status, 200);
    }

    let (status, full) = fixture.post("/api/comparison/5", json!({})).await;
    assert_eq!(status, 422);
    assert_eq!(full["error"]["code"], "LIMIT_REACHED");

    let (status, table) = fixture.get("/api/comparison/table").await;
    assert_eq!(status, 200);
    assert_eq!(table["data"]["headers"].as_array().unwrap().len(), 4);
    assert_eq!(table["data"]["rows"].as_array().unwrap().len(), 12);

    // Toggling a selected id removes it
    let (_, selection) = fixture.post("/api/comparison/4", json!({})).await;
    assert_eq!(selection["data"]["ids"], json!([1, 2, 3]));
}

#[tokio::test]
async fn test_stores() {
    let fixture = TestFixture::new().await;

    let (status, all) = fixture.get("/api/stores").await;
    assert_eq!(status, 200);
    assert_eq!(all["data"]["cityName"], "All Cities");
    assert!(!all["data"]["stores"].as_array().unwrap().is_empty());

    let (status, nearest) = fixture.get("/api/stores/nearest?lat=32.6071&lng=70.9115").await;
    assert_eq!(status, 200);
    let ranked = nearest["data"].as_array().unwrap();
    assert!(!ranked.is_empty());
    assert_eq!(ranked[0]["city"], "lakki-marwat");
    assert!(ranked[0]["distanceKm"].is_number());

    let (status, _) = fixture.get("/api/stores/nearest?lat=120&lng=0").await;
    assert_eq!(status, 400);
}

#[tokio::test]
async fn test_json_export_and_print() {
    let fixture = TestFixture::new().await;

    let (status, body) = fixture.get("/api/export?format=json&type=tablet").await;
    assert_eq!(status, 200);
    assert_eq!(body["data"]["filename"], "pharmadices_medicines.json");
    assert_eq!(body["data"]["mimeType"], "application/json");

    let document: Value = serde_json::from_str(body["data"]["content"].as_str().unwrap()).unwrap();
    assert_eq!(document["exportInfo"]["totalMedicines"], 4);
    assert_eq!(document["medicines"].as_array().unwrap().len(), 4);

    let (status, csv) = fixture.get("/api/export?format=csv").await;
    assert_eq!(status, 200);
    assert!(csv["data"]["content"].as_str().unwrap().starts_with("ID,Name"));

    let (status, _) = fixture.get("/api/export?q=nothing-matches-this").await;
    assert_eq!(status, 400);

    let resp = fixture
        .client
        .get(fixture.url("/api/medicines/1/print"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    assert!(resp.text().await.unwrap().contains("Paracetamol"));
}

#[tokio::test]
async fn test_dashboard() {
    let fixture = TestFixture::new().await;

    fixture.post("/api/favorites/2", json!({})).await;
    fixture
        .put(
            "/api/schedules",
            json!({ "medicineId": 3, "dosage": "20mg", "frequency": "once" }),
        )
        .await;

    let (status, body) = fixture.get("/api/dashboard").await;
    assert_eq!(status, 200);
    let data = &body["data"];
    assert_eq!(data["stats"]["scheduledMedicines"], 1);
    assert_eq!(data["stats"]["favoriteMedicines"], 1);
    assert_eq!(data["favorites"]["total"], 1);
    assert_eq!(data["insights"]["mostUsedType"], "capsule");
    assert_eq!(data["todaySchedule"].as_array().unwrap().len(), 1);
    assert_eq!(data["recentActivity"].as_array().unwrap().len(), 2);

    let (status, export) = fixture.get("/api/dashboard/export").await;
    assert_eq!(status, 200);
    assert!(export["data"]["filename"]
        .as_str()
        .unwrap()
        .starts_with("pharmadices-dashboard-"));
    assert_eq!(export["data"]["data"]["version"], "1.0");
    assert_eq!(export["data"]["data"]["favorites"], json!([2]));

    let (status, backup) = fixture.post("/api/dashboard/backup", json!({})).await;
    assert_eq!(status, 200);
    assert!(backup["data"]["display"].as_str().unwrap().contains("..."));

    let (_, tip) = fixture.get("/api/health-tips/12").await;
    assert_eq!(tip["data"]["index"], 2);
}

#[tokio::test]
async fn test_preferences_and_saved_searches() {
    let fixture = TestFixture::new().await;

    let (status, prefs) = fixture.get("/api/preferences").await;
    assert_eq!(status, 200);
    assert!(prefs["data"]["userId"].as_str().unwrap().starts_with("user_"));
    assert_eq!(prefs["data"]["userName"], "Anonymous User");

    let (_, updated) = fixture
        .put(
            "/api/preferences",
            json!({ "userName": "Amina", "disclaimerAcknowledged": true }),
        )
        .await;
    assert_eq!(updated["data"]["userName"], "Amina");
    assert_eq!(updated["data"]["disclaimerAcknowledged"], true);
    assert_eq!(updated["data"]["userId"], prefs["data"]["userId"]);

    let (status, saved) = fixture
        .post(
            "/api/saved-searches",
            json!({ "drugClass": "Antihistamine", "sortBy": "name" }),
        )
        .await;
    assert_eq!(status, 200);
    assert_eq!(saved["data"]["resultsCount"], 1);

    let (_, list) = fixture.get("/api/saved-searches").await;
    assert_eq!(list["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_revision_increments_on_writes() {
    let fixture = TestFixture::new().await;

    let (_, before) = fixture.get("/api/revision").await;
    let start = before["data"]["revisionId"].as_i64().unwrap();

    fixture.post("/api/favorites/1", json!({})).await;
    fixture.post("/api/comparison/1", json!({})).await;

    let (_, after) = fixture.get("/api/revision").await;
    assert!(after["data"]["revisionId"].as_i64().unwrap() >= start + 2);

    // Reads leave the revision alone
    fixture.get("/api/medicines").await;
    let (_, again) = fixture.get("/api/revision").await;
    assert_eq!(again["data"]["revisionId"], after["data"]["revisionId"]);
}
