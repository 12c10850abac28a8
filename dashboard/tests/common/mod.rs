//! In-process mock of the hospital backend used by the integration tests.
#![allow(dead_code)]

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use hospital_dashboard::{ApiClient, DashboardConfig};
use serde_json::{json, Map, Value};

pub const DEPARTMENTS: &str = "departments";
pub const DOCTORS: &str = "doctors";
pub const PATIENTS: &str = "patients";
pub const REGISTER: &str = "patients/register";
pub const SLOW_RESPONSE: Duration = Duration::from_millis(300);

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub method: &'static str,
    pub path: String,
    pub body: Value,
}

#[derive(Debug, Default)]
pub struct Store {
    next_id: i64,
    collections: HashMap<&'static str, BTreeMap<i64, Value>>,
    /// Collections whose GET (or, for `REGISTER`, whose POST) answers 500
    /// with a JSON error
    pub failing: HashSet<&'static str>,
    /// Collections whose GET answers 503 with a plain-text body
    pub unavailable: HashSet<&'static str>,
    /// Collections (or `REGISTER`) whose POST answers with only the new id
    pub id_only: HashSet<&'static str>,
    /// Collections whose next GET is answered late, with the rows as they
    /// were when the request arrived
    pub slow: HashSet<&'static str>,
    pub requests: Vec<RecordedRequest>,
}

type Shared = Arc<Mutex<Store>>;

impl Store {
    fn records(&self, collection: &str) -> impl Iterator<Item = &Value> {
        self.collections
            .get(collection)
            .into_iter()
            .flat_map(|records| records.values())
    }

    fn name_of(&self, collection: &str, id: &Value) -> Value {
        id.as_i64()
            .and_then(|id| self.collections.get(collection)?.get(&id))
            .map(|record| record["name"].clone())
            .unwrap_or(Value::Null)
    }

    fn count_where(&self, collection: &str, field: &str, id: i64) -> usize {
        self.records(collection)
            .filter(|record| record[field].as_i64() == Some(id))
            .count()
    }

    /// Stored record plus the fields the real backend computes
    fn view(&self, collection: &str, record: &Value) -> Value {
        let id = record["id"].as_i64().unwrap_or_default();
        let computed = match collection {
            DEPARTMENTS => json!({
                "head_doctor_name": self.name_of(DOCTORS, &record["head_doctor_id"]),
                "num_doctors_in_dept": self.count_where(DOCTORS, "department_id", id),
                "num_patients_assigned": self.count_where(PATIENTS, "assigned_department_id", id),
            }),
            DOCTORS => json!({
                "department_name": self.name_of(DEPARTMENTS, &record["department_id"]),
                "departments_headed_count": self.count_where(DEPARTMENTS, "head_doctor_id", id),
                "patients_assigned_count": self.count_where(PATIENTS, "assigned_doctor_id", id),
            }),
            _ => json!({
                "assigned_doctor_name": self.name_of(DOCTORS, &record["assigned_doctor_id"]),
                "assigned_department_name":
                    self.name_of(DEPARTMENTS, &record["assigned_department_id"]),
            }),
        };

        let mut record = record.clone();
        if let (Some(object), Value::Object(computed)) = (record.as_object_mut(), computed) {
            object.extend(computed);
        }
        record
    }

    fn insert(&mut self, collection: &'static str, body: Value) -> Value {
        self.next_id += 1;
        let id = self.next_id;
        let mut object = body.as_object().cloned().unwrap_or_else(Map::new);
        object.insert("id".into(), json!(id));
        let record = Value::Object(object);
        self.collections
            .entry(collection)
            .or_default()
            .insert(id, record.clone());
        record
    }

    /// Add a record directly, bypassing the request log
    pub fn seed(&mut self, collection: &'static str, body: Value) -> i64 {
        self.insert(collection, body)["id"].as_i64().unwrap()
    }

    pub fn remove(&mut self, collection: &str, id: i64) {
        if let Some(records) = self.collections.get_mut(collection) {
            records.remove(&id);
        }
    }

    pub fn get(&self, collection: &str, id: i64) -> Option<Value> {
        self.collections.get(collection)?.get(&id).cloned()
    }

    pub fn len(&self, collection: &str) -> usize {
        self.records(collection).count()
    }

    pub fn requests_with(&self, method: &str) -> Vec<RecordedRequest> {
        self.requests
            .iter()
            .filter(|request| request.method == method)
            .cloned()
            .collect()
    }

    pub fn last_request(&self) -> Option<RecordedRequest> {
        self.requests.last().cloned()
    }

    fn record(&mut self, method: &'static str, path: String, body: Value) {
        self.requests.push(RecordedRequest { method, path, body });
    }
}

fn error(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(json!({ "error": message.into() }))).into_response()
}

fn not_found(collection: &str) -> Response {
    let label = match collection {
        DEPARTMENTS => "Department",
        DOCTORS => "Doctor",
        _ => "Patient",
    };
    error(StatusCode::NOT_FOUND, format!("{label} not found"))
}

fn has_name(body: &Value) -> bool {
    body["name"].as_str().is_some_and(|name| !name.trim().is_empty())
}

fn list(store: &Shared, collection: &'static str) -> Response {
    let mut store = store.lock().unwrap();
    store.record("GET", format!("/api/{collection}"), Value::Null);
    if store.failing.contains(collection) {
        return error(StatusCode::INTERNAL_SERVER_ERROR, "database unavailable");
    }
    if store.unavailable.contains(collection) {
        return (StatusCode::SERVICE_UNAVAILABLE, "Service Unavailable").into_response();
    }
    let records: Vec<Value> = store
        .records(collection)
        .map(|record| store.view(collection, record))
        .collect();
    Json(records).into_response()
}

fn create(store: &Shared, collection: &'static str, body: Value) -> Response {
    let mut store = store.lock().unwrap();
    store.record("POST", format!("/api/{collection}"), body.clone());
    if !has_name(&body) {
        return error(StatusCode::BAD_REQUEST, "Name is required");
    }
    let record = store.insert(collection, body);
    if store.id_only.contains(collection) {
        return (
            StatusCode::CREATED,
            Json(json!({ "id": record["id"], "message": "created" })),
        )
            .into_response();
    }
    let view = store.view(collection, &record);
    (StatusCode::CREATED, Json(view)).into_response()
}

fn update(store: &Shared, collection: &'static str, id: i64, body: Value) -> Response {
    let mut store = store.lock().unwrap();
    store.record("PUT", format!("/api/{collection}/{id}"), body.clone());
    if store.get(collection, id).is_none() {
        return not_found(collection);
    }
    if !has_name(&body) {
        return error(StatusCode::BAD_REQUEST, "Name is required");
    }
    let mut object = body.as_object().cloned().unwrap_or_else(Map::new);
    object.insert("id".into(), json!(id));
    let record = Value::Object(object);
    store
        .collections
        .entry(collection)
        .or_default()
        .insert(id, record.clone());
    Json(store.view(collection, &record)).into_response()
}

fn delete(store: &Shared, collection: &'static str, id: i64) -> Response {
    let mut store = store.lock().unwrap();
    store.record("DELETE", format!("/api/{collection}/{id}"), Value::Null);
    if store.get(collection, id).is_none() {
        return not_found(collection);
    }
    store.remove(collection, id);
    Json(json!({ "message": "deleted" })).into_response()
}

fn register(store: &Shared, body: Value) -> Response {
    let mut store = store.lock().unwrap();
    store.record("POST", format!("/api/{REGISTER}"), body.clone());
    if store.failing.contains(REGISTER) {
        return error(StatusCode::INTERNAL_SERVER_ERROR, "database unavailable");
    }
    if !has_name(&body) {
        return error(StatusCode::BAD_REQUEST, "Name is required");
    }
    let mut object = body.as_object().cloned().unwrap_or_else(Map::new);
    object.insert("patient_type".into(), json!("outpatient"));
    object.insert("assigned_doctor_id".into(), Value::Null);
    object.insert("assigned_department_id".into(), Value::Null);
    let record = store.insert(PATIENTS, Value::Object(object));
    if store.id_only.contains(REGISTER) {
        return (StatusCode::CREATED, Json(json!({ "id": record["id"] }))).into_response();
    }
    (StatusCode::CREATED, Json(record)).into_response()
}

fn collection_routes(router: Router<Shared>, collection: &'static str) -> Router<Shared> {
    router
        .route(
            &format!("/api/{collection}"),
            get(move |State(store): State<Shared>| async move {
                let response = list(&store, collection);
                let slow = store.lock().unwrap().slow.remove(collection);
                if slow {
                    tokio::time::sleep(SLOW_RESPONSE).await;
                }
                response
            })
            .post(
                move |State(store): State<Shared>, Json(body): Json<Value>| async move {
                    create(&store, collection, body)
                },
            ),
        )
        .route(
            &format!("/api/{collection}/:id"),
            put(
                move |State(store): State<Shared>,
                      Path(id): Path<i64>,
                      Json(body): Json<Value>| async move {
                    update(&store, collection, id, body)
                },
            )
            .delete(
                move |State(store): State<Shared>, Path(id): Path<i64>| async move {
                    delete(&store, collection, id)
                },
            ),
        )
}

/// Running mock backend
pub struct MockBackend {
    pub base_url: String,
    store: Shared,
}

impl MockBackend {
    pub async fn start() -> Self {
        let store: Shared = Arc::new(Mutex::new(Store::default()));

        let mut app = Router::new();
        for collection in [DEPARTMENTS, DOCTORS, PATIENTS] {
            app = collection_routes(app, collection);
        }
        let app = app
            .route(
                &format!("/api/{REGISTER}"),
                post(|State(store): State<Shared>, Json(body): Json<Value>| async move {
                    register(&store, body)
                }),
            )
            .with_state(store.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind mock backend");
        let addr = listener.local_addr().expect("Failed to read local address");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Mock backend error");
        });

        Self {
            base_url: format!("http://{addr}/api"),
            store,
        }
    }

    pub fn store(&self) -> MutexGuard<'_, Store> {
        self.store.lock().unwrap()
    }

    pub fn config(&self) -> DashboardConfig<'static> {
        DashboardConfig::new(self.base_url.clone())
    }

    pub fn client(&self) -> ApiClient {
        ApiClient::new(&self.config()).expect("Failed to build client")
    }
}

/// Base URL with nothing listening behind it
pub async fn dead_base_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}/api")
}
