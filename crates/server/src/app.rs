//! Router and request handlers.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use axum::{Form, Json, Router};
use serde::{Deserialize, Serialize};
use sheetview_core::{RenderedView, SourceEvent, ViewEvent, Viewer, CSV_CONTENT_TYPE};
use tower_http::trace::TraceLayer;
use tracing::{debug, warn};

use crate::html::render_page;

/// Health check response.
#[derive(Serialize, Deserialize)]
pub struct Health {
    /// Server status ("ok" when healthy).
    pub status: String,
    /// Server version from Cargo.toml.
    pub version: String,
}

/// Shared handle on the single viewer. The lock is never held across an await.
#[derive(Clone)]
pub struct AppState {
    viewer: Arc<Mutex<Viewer>>,
}

impl AppState {
    pub fn new(viewer: Viewer) -> Self {
        Self {
            viewer: Arc::new(Mutex::new(viewer)),
        }
    }

    fn viewer(&self) -> MutexGuard<'_, Viewer> {
        self.viewer.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[derive(Deserialize)]
pub struct SheetForm {
    name: String,
}

/// Create the application router.
///
/// This is separated from `main()` to allow testing.
pub fn create_router(viewer: Viewer, body_limit: usize) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/upload", post(upload))
        .route("/default", post(use_default))
        .route("/sheet", post(select_sheet))
        .route("/view", post(update_view))
        .route("/full", post(toggle_full))
        .route("/reload", post(reload))
        .route("/download", get(download))
        .route("/api/page", get(api_page))
        .route("/health", get(health))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .with_state(AppState::new(viewer))
}

/// Health check endpoint handler.
pub async fn health() -> Json<Health> {
    Json(Health {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

async fn index(State(state): State<AppState>) -> Html<String> {
    let view = state.viewer().page();
    Html(render_page(&view))
}

async fn api_page(State(state): State<AppState>) -> Json<RenderedView> {
    Json(state.viewer().page())
}

async fn upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Redirect, (StatusCode, String)> {
    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| (err.status(), err.body_text()))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let name = field.file_name().unwrap_or_default().to_string();
        let data = field
            .bytes()
            .await
            .map_err(|err| (err.status(), err.body_text()))?;
        upload = Some((name, data.to_vec()));
    }

    match upload {
        Some((name, data)) if !(name.is_empty() && data.is_empty()) => {
            debug!(file = %name, bytes = data.len(), "upload received");
            load_source(state, SourceEvent::Upload { name, data }).await;
        }
        _ => debug!("upload form submitted without a file"),
    }
    Ok(Redirect::to("/"))
}

async fn use_default(State(state): State<AppState>) -> Redirect {
    load_source(state, SourceEvent::UseDefaultFile).await;
    Redirect::to("/")
}

async fn reload(State(state): State<AppState>) -> Redirect {
    load_source(state, SourceEvent::Reload).await;
    Redirect::to("/")
}

/// Apply a source change on the blocking pool. Decoding a workbook is CPU and
/// file bound, and the viewer lock is held for the whole load.
async fn load_source(state: AppState, event: SourceEvent) {
    let task = tokio::task::spawn_blocking(move || {
        let mut viewer = state.viewer();
        viewer.handle_source(event)
    });
    match task.await {
        Ok(Ok(())) => {}
        Ok(Err(err)) => warn!(error = %err, "workbook not loaded"),
        Err(err) => warn!(error = %err, "workbook load task failed"),
    }
}

async fn select_sheet(State(state): State<AppState>, Form(form): Form<SheetForm>) -> Redirect {
    state
        .viewer()
        .handle_view(ViewEvent::SelectSheet { name: form.name });
    Redirect::to("/")
}

/// Table controls arrive as repeated `column` fields plus `search` and an
/// optional `stats` checkbox.
async fn update_view(
    State(state): State<AppState>,
    Form(fields): Form<Vec<(String, String)>>,
) -> Redirect {
    state.viewer().handle_view(controls_event(fields));
    Redirect::to("/")
}

fn controls_event(fields: Vec<(String, String)>) -> ViewEvent {
    let mut columns = Vec::new();
    let mut search = String::new();
    let mut show_stats = false;
    for (key, value) in fields {
        match key.as_str() {
            "column" => columns.push(value),
            "search" => search = value,
            "stats" => show_stats = true,
            _ => {}
        }
    }
    ViewEvent::Controls {
        columns,
        search,
        show_stats,
    }
}

async fn toggle_full(State(state): State<AppState>) -> Redirect {
    state.viewer().handle_view(ViewEvent::ToggleFullSheet);
    Redirect::to("/")
}

async fn download(State(state): State<AppState>) -> Response {
    let result = state.viewer().download();
    match result {
        Ok(Some(file)) => (
            [
                (header::CONTENT_TYPE, CSV_CONTENT_TYPE.to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    content_disposition(&file.file_name),
                ),
            ],
            file.bytes,
        )
            .into_response(),
        Ok(None) => (StatusCode::NOT_FOUND, "no sheet selected").into_response(),
        Err(err) => {
            warn!(error = %err, "export failed");
            (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()).into_response()
        }
    }
}

/// Attachment header with an ASCII fallback and an RFC 5987 UTF-8 name.
fn content_disposition(file_name: &str) -> String {
    let fallback: String = file_name
        .chars()
        .map(|c| {
            if c.is_ascii() && !c.is_ascii_control() && c != '"' && c != '\\' {
                c
            } else {
                '_'
            }
        })
        .collect();
    let encoded: String = file_name
        .bytes()
        .map(|b| {
            if b.is_ascii_alphanumeric() || b"-._~".contains(&b) {
                char::from(b).to_string()
            } else {
                format!("%{b:02X}")
            }
        })
        .collect();
    format!("attachment; filename=\"{fallback}\"; filename*=UTF-8''{encoded}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use rust_xlsxwriter::Workbook;
    use sheetview_core::ViewerConfig;
    use tower::ServiceExt;

    const BOUNDARY: &str = "sheetviewboundary";

    fn app() -> Router {
        create_router(
            Viewer::new(ViewerConfig {
                default_path: None,
                ..ViewerConfig::default()
            }),
            1024 * 1024,
        )
    }

    fn workbook_bytes() -> Vec<u8> {
        let mut workbook = Workbook::new();
        let plan = workbook.add_worksheet();
        plan.set_name("Plan").unwrap();
        plan.write_string(0, 0, "Task").unwrap();
        plan.write_string(1, 0, "Survey").unwrap();
        let budget = workbook.add_worksheet();
        budget.set_name("Budget").unwrap();
        budget.write_string(0, 0, "Item").unwrap();
        budget.write_string(0, 1, "Year").unwrap();
        budget.write_string(1, 0, "Travel").unwrap();
        budget.write_number(1, 1, 2024.0).unwrap();
        budget.write_string(2, 0, "Printing").unwrap();
        budget.write_number(2, 1, 2025.0).unwrap();
        workbook.save_to_buffer().unwrap()
    }

    fn multipart_upload(file_name: &str, data: &[u8]) -> Request<Body> {
        let mut body = format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
        )
        .into_bytes();
        body.extend_from_slice(data);
        body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

        Request::builder()
            .method("POST")
            .uri("/upload")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    fn form(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn body_bytes(response: Response) -> Vec<u8> {
        axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap()
            .to_vec()
    }

    async fn page_json(app: &Router) -> serde_json::Value {
        let response = app.clone().oneshot(get_request("/api/page")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        serde_json::from_slice(&body_bytes(response).await).unwrap()
    }

    #[tokio::test]
    async fn test_health_endpoint_body() {
        let response = app().oneshot(get_request("/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let health: Health = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert_eq!(health.status, "ok");
        assert_eq!(health.version, env!("CARGO_PKG_VERSION"));
    }

    #[tokio::test]
    async fn test_not_found() {
        let response = app().oneshot(get_request("/nonexistent")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_index_starts_idle() {
        let response = app().oneshot(get_request("/")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let html = String::from_utf8(body_bytes(response).await).unwrap();
        assert!(html.contains("No file uploaded."));
    }

    #[tokio::test]
    async fn test_download_without_selection_is_404() {
        let response = app().oneshot(get_request("/download")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_upload_select_filter_download() {
        let app = app();

        let response = app
            .clone()
            .oneshot(multipart_upload("plan.xlsx", &workbook_bytes()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/");

        let page = page_json(&app).await;
        assert_eq!(page["sidebar"][0]["text"], "File uploaded: plan.xlsx");
        assert_eq!(page["body"]["selector"]["rows"][0][1]["label"], "Budget");

        let response = app.clone().oneshot(form("/sheet", "name=Budget")).await.unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);

        let response = app
            .clone()
            .oneshot(form("/view", "column=Year&column=Item&search=2025&stats=on"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);

        let page = page_json(&app).await;
        let panel = &page["body"]["panel"];
        assert_eq!(panel["heading"], "Sheet: Budget (rows: 2)");
        assert_eq!(panel["table"]["columns"], serde_json::json!(["Year", "Item"]));
        assert_eq!(panel["table"]["rows"], serde_json::json!([["2025", "Printing"]]));
        assert_eq!(panel["summary"]["kind"], "table");

        let response = app.clone().oneshot(get_request("/download")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/csv; charset=utf-8"
        );
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"Budget.csv\"; filename*=UTF-8''Budget.csv"
        );
        assert_eq!(
            body_bytes(response).await,
            b"\xEF\xBB\xBFYear,Item\n2025,Printing\n"
        );
    }

    #[tokio::test]
    async fn test_load_source_updates_shared_viewer() {
        let state = AppState::new(Viewer::default());
        load_source(
            state.clone(),
            SourceEvent::Upload {
                name: "plan.xlsx".into(),
                data: workbook_bytes(),
            },
        )
        .await;

        let viewer = state.viewer();
        let book = viewer.book().unwrap();
        assert_eq!(book.sheet_names(), ["Plan", "Budget"]);
        assert_eq!(viewer.loader().decode_count(), 1);
    }

    #[tokio::test]
    async fn test_malformed_upload_shows_error() {
        let app = app();
        let response = app
            .clone()
            .oneshot(multipart_upload("broken.xls", b"garbage"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);

        let page = page_json(&app).await;
        assert_eq!(page["body"]["state"], "idle");
        assert_eq!(page["sidebar"][0]["level"], "error");
    }

    #[tokio::test]
    async fn test_default_without_path_warns() {
        let app = app();
        let response = app.clone().oneshot(form("/default", "")).await.unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);

        let page = page_json(&app).await;
        assert_eq!(page["sidebar"][0]["level"], "warning");
    }

    #[test]
    fn test_controls_event_collects_repeated_columns() {
        let event = controls_event(vec![
            ("column".into(), "B".into()),
            ("search".into(), "x".into()),
            ("column".into(), "A".into()),
        ]);
        assert_eq!(
            event,
            ViewEvent::Controls {
                columns: vec!["B".into(), "A".into()],
                search: "x".into(),
                show_stats: false,
            }
        );
    }

    #[test]
    fn test_content_disposition_encodes_non_ascii() {
        assert_eq!(
            content_disposition("الخطة.csv"),
            "attachment; filename=\"_____.csv\"; filename*=UTF-8''%D8%A7%D9%84%D8%AE%D8%B7%D8%A9.csv"
        );
    }
}
