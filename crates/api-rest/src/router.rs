//! Router assembly, shared state and OpenAPI document.

use crate::{method_guard, patients};
use api_shared::{
    Address, ErrorRes, HealthRes, HealthService, MessageRes, PatientEchoRes, PatientPayload,
    PatientRow,
};
use axum::{extract::State, response::Json, routing::get, routing::put, Router};
use patients_core::PatientService;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Application state for the REST API server
///
/// Contains shared state that needs to be accessible to all request handlers.
#[derive(Clone)]
pub struct AppState {
    pub patient_service: PatientService,
}

impl AppState {
    pub fn new(patient_service: PatientService) -> Self {
        Self { patient_service }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health,
        patients::list_patients,
        patients::create_patient,
        patients::update_patient,
        patients::delete_patient,
    ),
    components(schemas(
        HealthRes,
        Address,
        PatientPayload,
        PatientRow,
        PatientEchoRes,
        MessageRes,
        ErrorRes,
    ))
)]
pub struct ApiDoc;

/// Builds the full HTTP surface over `state`.
///
/// Unsupported verbs on `/patients` and `/patients/:id` fall through to the method guard and get
/// a 405 with an `Allow` header. HEAD on `/patients` is routed to the guard explicitly, otherwise
/// axum would answer it with the GET handler.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route(
            "/patients",
            get(patients::list_patients)
                .post(patients::create_patient)
                .head(method_guard::collection_fallback)
                .fallback(method_guard::collection_fallback),
        )
        .route(
            "/patients/:id",
            put(patients::update_patient)
                .delete(patients::delete_patient)
                .fallback(method_guard::resource_fallback),
        )
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint for the REST API
#[axum::debug_handler]
async fn health(State(_state): State<AppState>) -> Json<HealthRes> {
    Json(HealthService::check_health())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{header, Method, Request, StatusCode};
    use http_body_util::BodyExt;
    use patients_core::{
        PatientColumns, PatientId, PatientStore, SqlitePatientStore, StorageError, StorageResult,
    };
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tower::ServiceExt;

    /// Store whose every statement fails.
    struct BrokenStore;

    #[async_trait]
    impl PatientStore for BrokenStore {
        async fn list(&self) -> StorageResult<Vec<PatientRow>> {
            Err(StorageError::Unavailable("connection lost".into()))
        }
        async fn insert(&self, _columns: PatientColumns) -> StorageResult<PatientId> {
            Err(StorageError::Unavailable("connection lost".into()))
        }
        async fn update(&self, _id: PatientId, _columns: PatientColumns) -> StorageResult<usize> {
            Err(StorageError::Unavailable("connection lost".into()))
        }
        async fn delete(&self, _id: PatientId) -> StorageResult<usize> {
            Err(StorageError::Unavailable("connection lost".into()))
        }
    }

    fn sqlite_app() -> Router {
        let store = SqlitePatientStore::open_in_memory().expect("open store");
        build_router(AppState::new(PatientService::new(Arc::new(store))))
    }

    fn broken_app() -> Router {
        build_router(AppState::new(PatientService::new(Arc::new(BrokenStore))))
    }

    struct Reply {
        status: StatusCode,
        allow: Option<String>,
        body: Vec<u8>,
    }

    impl Reply {
        fn json(&self) -> Value {
            serde_json::from_slice(&self.body).expect("json body")
        }

        fn text(&self) -> String {
            String::from_utf8(self.body.clone()).expect("utf-8 body")
        }
    }

    async fn send(app: &Router, method: Method, uri: &str, body: Option<&str>) -> Reply {
        let mut request = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(text) => {
                request = request.header(header::CONTENT_TYPE, "application/json");
                Body::from(text.to_string())
            }
            None => Body::empty(),
        };
        let response = app
            .clone()
            .oneshot(request.body(body).expect("request"))
            .await
            .expect("response");

        let status = response.status();
        let allow = response
            .headers()
            .get(header::ALLOW)
            .map(|v| v.to_str().expect("ascii header").to_string());
        let body = response
            .into_body()
            .collect()
            .await
            .expect("read body")
            .to_bytes()
            .to_vec();
        Reply {
            status,
            allow,
            body,
        }
    }

    fn sam_smith() -> Value {
        json!({
            "firstName": "Sam",
            "lastName": "Smith",
            "dob": "1990-01-01",
            "status": "Active",
            "addresses": [{
                "addressLine1": "123 Main St",
                "city": "Anytown",
                "state": "CA",
                "zipcode": "12345"
            }],
            "fields": {"notes": "Some notes"}
        })
    }

    #[tokio::test]
    async fn health_reports_alive() {
        let reply = send(&sqlite_app(), Method::GET, "/health", None).await;
        assert_eq!(reply.status, StatusCode::OK);
        assert_eq!(
            reply.json(),
            json!({"ok": true, "message": "Patients REST API is alive"})
        );
    }

    #[tokio::test]
    async fn create_echoes_payload_and_list_shows_stored_row() {
        let app = sqlite_app();

        let reply = send(&app, Method::POST, "/patients", Some(&sam_smith().to_string())).await;
        assert_eq!(reply.status, StatusCode::CREATED);
        let mut expected = sam_smith();
        expected["id"] = json!(1);
        assert_eq!(reply.json(), expected);

        let reply = send(&app, Method::GET, "/patients", None).await;
        assert_eq!(reply.status, StatusCode::OK);
        assert_eq!(
            reply.json(),
            json!([{
                "id": 1,
                "first_name": "Sam",
                "middle_name": "",
                "last_name": "Smith",
                "date_of_birth": "1990-01-01",
                "status": "Active",
                "addresses": "[{\"addressLine1\":\"123 Main St\",\"city\":\"Anytown\",\"state\":\"CA\",\"zipcode\":\"12345\"}]",
                "phone_numbers": "[]",
                "additional_fields": "{\"notes\":\"Some notes\"}"
            }])
        );
    }

    #[tokio::test]
    async fn create_rejects_each_structural_rule() {
        let app = sqlite_app();

        let mut missing_name = sam_smith();
        missing_name["firstName"] = json!("   ");
        let mut no_addresses = sam_smith();
        no_addresses["addresses"] = json!([]);
        let mut no_city = sam_smith();
        no_city["addresses"][0]["city"] = json!("");
        let mut blank_key = sam_smith();
        blank_key["fields"] = json!({"": "x"});

        let cases = [
            (missing_name.to_string(), "Required fields are missing"),
            (no_addresses.to_string(), "At least one address is required"),
            (no_city.to_string(), "Required address fields are missing"),
            (blank_key.to_string(), "Keys in additional_fields cannot be empty"),
            (
                r#"{"firstName":"Sam","lastName":"Smith","dob":"1990-01-01","status":"Active","addresses":[{"addressLine1":"1","city":"c","state":"s","zipcode":"z"}],"fields":{"a":"1","a":"2"}}"#
                    .to_string(),
                "Keys in additional_fields must be unique",
            ),
        ];

        for (body, message) in cases {
            let reply = send(&app, Method::POST, "/patients", Some(&body)).await;
            assert_eq!(reply.status, StatusCode::BAD_REQUEST, "{message}");
            assert_eq!(reply.json(), json!({ "message": message }));
        }

        let reply = send(&app, Method::GET, "/patients", None).await;
        assert_eq!(reply.json(), json!([]));
    }

    #[tokio::test]
    async fn malformed_body_is_a_bad_request() {
        let reply = send(&sqlite_app(), Method::POST, "/patients", Some("{not json")).await;
        assert_eq!(reply.status, StatusCode::BAD_REQUEST);
        let body = reply.json();
        assert_eq!(body["message"], "Malformed patient payload");
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn update_echoes_payload_with_integer_id() {
        let app = sqlite_app();
        send(&app, Method::POST, "/patients", Some(&sam_smith().to_string())).await;

        let mut changed = sam_smith();
        changed["status"] = json!("Churned");
        changed["fields"] = json!({"plan": "gold"});

        let reply = send(&app, Method::PUT, "/patients/1", Some(&changed.to_string())).await;
        assert_eq!(reply.status, StatusCode::OK);
        let mut expected = changed.clone();
        expected["id"] = json!(1);
        assert_eq!(reply.json(), expected);

        let reply = send(&app, Method::GET, "/patients", None).await;
        let row = &reply.json()[0];
        assert_eq!(row["status"], "Churned");
        assert_eq!(row["additional_fields"], "{\"plan\":\"gold\"}");
    }

    #[tokio::test]
    async fn non_integer_id_is_rejected() {
        let app = sqlite_app();

        let reply = send(&app, Method::DELETE, "/patients/abc", None).await;
        assert_eq!(reply.status, StatusCode::BAD_REQUEST);
        assert_eq!(reply.json(), json!({"message": "Invalid patient id: abc"}));

        let reply = send(&app, Method::PUT, "/patients/abc", Some(&sam_smith().to_string())).await;
        assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn delete_removes_the_row() {
        let app = sqlite_app();
        send(&app, Method::POST, "/patients", Some(&sam_smith().to_string())).await;

        let reply = send(&app, Method::DELETE, "/patients/1", None).await;
        assert_eq!(reply.status, StatusCode::OK);
        assert_eq!(reply.json(), json!({"message": "Deleted patient with id 1"}));

        let reply = send(&app, Method::GET, "/patients", None).await;
        assert_eq!(reply.json(), json!([]));
    }

    #[tokio::test]
    async fn delete_of_unknown_id_still_succeeds() {
        let reply = send(&sqlite_app(), Method::DELETE, "/patients/42", None).await;
        assert_eq!(reply.status, StatusCode::OK);
        assert_eq!(reply.json(), json!({"message": "Deleted patient with id 42"}));
    }

    #[tokio::test]
    async fn storage_failures_surface_as_500() {
        let app = broken_app();

        let reply = send(&app, Method::GET, "/patients", None).await;
        assert_eq!(reply.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            reply.json(),
            json!({
                "message": "Database error",
                "error": "database connection unavailable: connection lost"
            })
        );

        let reply = send(&app, Method::POST, "/patients", Some(&sam_smith().to_string())).await;
        assert_eq!(reply.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(reply.json()["message"], "Database error");

        let reply = send(&app, Method::PUT, "/patients/3", Some(&sam_smith().to_string())).await;
        assert_eq!(reply.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(reply.json()["message"], "Unable to update patient with id 3");

        let reply = send(&app, Method::DELETE, "/patients/3", None).await;
        assert_eq!(reply.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            reply.json(),
            json!({
                "message": "Unable to delete patient with id 3",
                "error": "database connection unavailable: connection lost"
            })
        );
    }

    #[tokio::test]
    async fn validation_is_checked_before_storage() {
        let mut payload = sam_smith();
        payload["addresses"] = json!([]);
        let reply = send(
            &broken_app(),
            Method::POST,
            "/patients",
            Some(&payload.to_string()),
        )
        .await;
        assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn unsupported_verbs_get_405_with_allow_header() {
        let app = sqlite_app();

        let reply = send(&app, Method::DELETE, "/patients", None).await;
        assert_eq!(reply.status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(reply.allow.as_deref(), Some("GET, POST"));
        assert_eq!(reply.text(), "Method DELETE Not Allowed");

        let reply = send(&app, Method::GET, "/patients/1", None).await;
        assert_eq!(reply.status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(reply.allow.as_deref(), Some("PUT, DELETE"));
        assert_eq!(reply.text(), "Method GET Not Allowed");

        let reply = send(&app, Method::PATCH, "/patients/1", None).await;
        assert_eq!(reply.status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(reply.text(), "Method PATCH Not Allowed");

        for uri in ["/patients", "/patients/1"] {
            let reply = send(&app, Method::HEAD, uri, None).await;
            assert_eq!(reply.status, StatusCode::METHOD_NOT_ALLOWED, "{uri}");
        }
        let reply = send(&app, Method::HEAD, "/patients", None).await;
        assert_eq!(reply.allow.as_deref(), Some("GET, POST"));
    }

    #[tokio::test]
    async fn unknown_keys_are_echoed_and_stored() {
        let app = sqlite_app();

        let mut payload = sam_smith();
        payload["email"] = json!("s@x.io");
        payload["addresses"][0]["country"] = json!("US");

        let reply = send(&app, Method::POST, "/patients", Some(&payload.to_string())).await;
        assert_eq!(reply.status, StatusCode::CREATED);
        let mut expected = payload.clone();
        expected["id"] = json!(1);
        assert_eq!(reply.json(), expected);

        let reply = send(&app, Method::GET, "/patients", None).await;
        let stored: Value = serde_json::from_str(
            reply.json()[0]["addresses"]
                .as_str()
                .expect("addresses column is text"),
        )
        .expect("addresses column is JSON");
        assert_eq!(stored, payload["addresses"]);
    }

    #[tokio::test]
    async fn update_echo_keeps_explicit_nulls() {
        let app = sqlite_app();
        send(&app, Method::POST, "/patients", Some(&sam_smith().to_string())).await;

        let mut changed = sam_smith();
        changed["middleName"] = Value::Null;
        changed["id"] = json!(77);

        let reply = send(&app, Method::PUT, "/patients/1", Some(&changed.to_string())).await;
        assert_eq!(reply.status, StatusCode::OK);
        let mut expected = changed.clone();
        expected["id"] = json!(1);
        assert_eq!(reply.json(), expected);
        let echo = reply.json();
        let echo = echo.as_object().expect("echo is an object");
        assert_eq!(echo.get("middleName"), Some(&Value::Null));
    }

    #[tokio::test]
    async fn openapi_document_is_served() {
        let reply = send(&sqlite_app(), Method::GET, "/api-docs/openapi.json", None).await;
        assert_eq!(reply.status, StatusCode::OK);
        assert!(reply.json()["paths"]["/patients/{id}"].is_object());
    }
}
