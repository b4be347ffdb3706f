#![cfg(not(tarpaulin_include))]
#![cfg(feature = "web")]
use axum::{
    Json, Router,
    extract::{Multipart, Path, State},
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use log::{error, info};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};
use tokio::net::TcpListener;
use tower_http::services::ServeDir;

use crate::charts;
use crate::employee::EmployeeTable;
use crate::filter::{self, FilterOptions, FilterSpec};
use crate::kpi::KpiSummary;
use crate::loader;
use crate::sample;

pub struct AppState {
    // The session's one shared table. Reloads swap the Arc wholesale, so a
    // reader holding the old table keeps a consistent snapshot.
    table: RwLock<Option<Arc<EmployeeTable>>>,
    default_path: PathBuf,
    // True while the table is the built-in sample rather than real data;
    // surfaced to the client as an informational notice.
    sample_fallback: AtomicBool,
}

impl AppState {
    fn current_table(&self) -> Option<Arc<EmployeeTable>> {
        self.table.read().unwrap().clone()
    }

    fn replace_table(&self, table: Arc<EmployeeTable>) {
        *self.table.write().unwrap() = Some(table);
    }
}

#[derive(Serialize)]
struct StatusResponse {
    status: String,
    message: Option<String>,
}

impl StatusResponse {
    fn error(message: impl Into<String>) -> Json<StatusResponse> {
        Json(StatusResponse {
            status: "error".to_string(),
            message: Some(message.into()),
        })
    }

    fn no_data() -> Json<StatusResponse> {
        Json(StatusResponse {
            status: "no_data".to_string(),
            message: Some("No data loaded. Check the source file and try again.".to_string()),
        })
    }

    fn empty() -> Json<StatusResponse> {
        Json(StatusResponse {
            status: "empty".to_string(),
            message: Some(
                "No rows match the selected filters. Please adjust the filters.".to_string(),
            ),
        })
    }
}

pub async fn run(bind_addr: &str, default_path: PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    // One load up front; a failure leaves the state empty and the UI
    // reports "no data" until a good upload arrives.
    let fell_back = !default_path.exists();
    let table = match loader::load(None, &default_path) {
        Ok(table) => {
            info!("loaded {} employees at startup", table.len());
            Some(table)
        }
        Err(e) => {
            error!("could not load data at startup: {}", e);
            None
        }
    };

    let app_state = Arc::new(AppState {
        table: RwLock::new(table),
        default_path,
        sample_fallback: AtomicBool::new(fell_back),
    });

    // Build router
    let app = Router::new()
        .route("/", get(serve_dashboard))
        .route("/api/options", get(get_options))
        .route("/api/view", post(post_view))
        .route("/api/upload", post(post_upload))
        .route("/api/chart/:kind", post(post_chart))
        .route("/api/sample", get(get_sample))
        .route("/api/reload", post(post_reload))
        .nest_service("/static", ServeDir::new("static"))
        .with_state(app_state);

    // Start server
    let listener = TcpListener::bind(bind_addr).await?;
    println!("Listening on http://{}", bind_addr);
    axum::serve(listener, app).await?;

    Ok(())
}

async fn serve_dashboard() -> Html<&'static str> {
    Html(include_str!("./static/dashboard.html"))
}

/// Filter controls derived from the full table, never from a filtered view.
async fn get_options(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match state.current_table() {
        Some(table) => Json(serde_json::json!({
            "status": "ok",
            "options": FilterOptions::from_table(&table),
            "sample_data": state.sample_fallback.load(Ordering::Relaxed),
        }))
        .into_response(),
        None => StatusResponse::no_data().into_response(),
    }
}

/// The dashboard cycle: apply the filters, compute KPIs, return the rows.
/// "No rows match" is a distinct status from "no data loaded".
async fn post_view(
    State(state): State<Arc<AppState>>,
    Json(spec): Json<FilterSpec>,
) -> impl IntoResponse {
    let Some(table) = state.current_table() else {
        return StatusResponse::no_data().into_response();
    };

    let rows = filter::apply(&table, &spec);
    if rows.is_empty() {
        return StatusResponse::empty().into_response();
    }

    let kpis = KpiSummary::compute(&rows);
    Json(serde_json::json!({
        "status": "ok",
        "kpis": kpis,
        "rows": rows,
    }))
    .into_response()
}

async fn post_upload(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> impl IntoResponse {
    // Process the multipart form data
    let mut file_data = Vec::new();
    while let Some(field) = multipart.next_field().await.unwrap_or(None) {
        if field.name().unwrap_or("unknown") == "file" {
            file_data = field.bytes().await.unwrap_or_default().to_vec();
        }
    }

    if file_data.is_empty() {
        return StatusResponse::error("No file data received").into_response();
    }

    // A failed parse leaves the previously loaded table untouched.
    match loader::load_from_bytes(&file_data) {
        Ok(table) => {
            info!("upload replaced the table with {} employees", table.len());
            state.replace_table(table);
            state.sample_fallback.store(false, Ordering::Relaxed);
            Json(StatusResponse {
                status: "ok".to_string(),
                message: None,
            })
            .into_response()
        }
        Err(e) => StatusResponse::error(e.to_string()).into_response(),
    }
}

/// Re-run source resolution (default path, sample fallback) on demand.
async fn post_reload(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let fell_back = !state.default_path.exists();
    match loader::load(None, &state.default_path) {
        Ok(table) => {
            info!("reload replaced the table with {} employees", table.len());
            state.replace_table(table);
            state.sample_fallback.store(fell_back, Ordering::Relaxed);
            Json(StatusResponse {
                status: "ok".to_string(),
                message: None,
            })
            .into_response()
        }
        Err(e) => StatusResponse::error(e.to_string()).into_response(),
    }
}

async fn post_chart(
    Path(kind): Path<String>,
    State(state): State<Arc<AppState>>,
    Json(spec): Json<FilterSpec>,
) -> impl IntoResponse {
    let Some(table) = state.current_table() else {
        return StatusResponse::no_data().into_response();
    };

    let rows = filter::apply(&table, &spec);
    if rows.is_empty() {
        // Chart rendering is skipped for the cycle; the filters stay
        // adjustable client-side.
        return StatusCode::NO_CONTENT.into_response();
    }

    let rendered = match kind.as_str() {
        "age" => charts::age_histogram(&rows),
        "salary" => charts::salary_boxplot(&rows),
        "area" => charts::area_bar_chart(&rows),
        "status" => charts::status_pie(&rows),
        "evolution" => charts::headcount_evolution(&rows),
        _ => return StatusCode::NOT_FOUND.into_response(),
    };

    match rendered {
        Ok(png) => Response::builder()
            .status(StatusCode::OK)
            .header(header::CONTENT_TYPE, "image/png")
            .body(axum::body::Body::from(png))
            .unwrap(),
        Err(e) => StatusResponse::error(e.to_string()).into_response(),
    }
}

/// The downloadable example spreadsheet, same schema as the sample table.
async fn get_sample() -> impl IntoResponse {
    match sample::sample_xlsx_bytes() {
        Ok(bytes) => Response::builder()
            .status(StatusCode::OK)
            .header(header::CONTENT_TYPE, sample::XLSX_MIME)
            .header(
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", sample::SAMPLE_FILE_NAME),
            )
            .body(axum::body::Body::from(bytes))
            .unwrap(),
        Err(e) => StatusResponse::error(e.to_string()).into_response(),
    }
}
