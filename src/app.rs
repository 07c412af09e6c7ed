use axum::{
    Json, Router,
    body::Body,
    extract::{Multipart, State},
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use plotters::style::{BLUE, RED, RGBColor};
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;
use tower_http::services::ServeDir;

use crate::downloader;
use crate::error::PipelineError;
use crate::graph::{BarSeries, ChartOptions, bar_chart};
use crate::loader;
use crate::normalize;
use crate::table::DataTable;
use crate::views;

const GREEN_BARS: RGBColor = RGBColor(46, 139, 87);
const ORANGE_BARS: RGBColor = RGBColor(255, 165, 0);

/// Shared server state: the current upload's normalized table, or `None`
/// while idle. A new upload replaces it wholesale; the aggregate views are
/// recomputed from it on every request.
pub struct AppState {
    dataset: Mutex<Option<DataTable>>,
}

impl AppState {
    pub fn new() -> Self {
        AppState {
            dataset: Mutex::new(None),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

pub async fn run(addr: &str) -> Result<(), Box<dyn std::error::Error>> {
    let app_state = Arc::new(AppState::new());

    let app = router(app_state);

    let listener = TcpListener::bind(addr).await?;
    log::info!("listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(serve_landing))
        .route("/api/upload", post(upload_workbook))
        .route("/api/top_managers", get(top_managers_json))
        .route("/charts/quota_credit.png", get(quota_credit_chart))
        .route("/charts/performance_tenure.png", get(performance_tenure_chart))
        .route("/charts/quota_achievement.png", get(quota_achievement_chart))
        .route("/download/top_managers.csv", get(download_top_managers))
        .nest_service("/static", ServeDir::new("static"))
        .with_state(state)
}

async fn serve_landing() -> Html<&'static str> {
    Html(include_str!("./static/index.html"))
}

async fn upload_workbook(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Response {
    // Pull the workbook bytes out of the multipart form data
    let mut file_data = Vec::new();

    while let Some(field) = multipart.next_field().await.unwrap_or(None) {
        if field.name() == Some("workbook") {
            file_data = field.bytes().await.unwrap_or_default().to_vec();
        }
    }

    if file_data.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({
                "status": "error",
                "message": "No file data received",
            })),
        )
            .into_response();
    }

    match loader::from_xlsx_bytes(&file_data) {
        Ok(mut table) => {
            normalize::normalize(&mut table);
            log::info!("dataset replaced: {} rows", table.len());

            let rows = table.len();
            let columns = table.columns.clone();
            *state.dataset.lock().unwrap() = Some(table);

            Json(serde_json::json!({
                "status": "ok",
                "rows": rows,
                "columns": columns,
            }))
            .into_response()
        }
        Err(e) => {
            log::warn!("upload rejected: {}", e);
            error_response(e)
        }
    }
}

async fn top_managers_json(State(state): State<Arc<AppState>>) -> Response {
    let guard = state.dataset.lock().unwrap();
    let Some(table) = guard.as_ref() else {
        return idle_response();
    };

    match views::top_managers(table) {
        Ok(rows) => Json(serde_json::json!({
            "status": "ok",
            "rows": rows,
        }))
        .into_response(),
        Err(e) => error_response(e),
    }
}

async fn quota_credit_chart(State(state): State<Arc<AppState>>) -> Response {
    chart_response(&state, render_quota_credit)
}

async fn performance_tenure_chart(State(state): State<Arc<AppState>>) -> Response {
    chart_response(&state, render_performance_tenure)
}

async fn quota_achievement_chart(State(state): State<Arc<AppState>>) -> Response {
    chart_response(&state, render_quota_achievement)
}

async fn download_top_managers(State(state): State<Arc<AppState>>) -> Response {
    let guard = state.dataset.lock().unwrap();
    let Some(table) = guard.as_ref() else {
        return idle_response();
    };

    let csv = views::top_managers(table).and_then(|rows| downloader::top_managers_csv(&rows));

    match csv {
        Ok(bytes) => Response::builder()
            .status(StatusCode::OK)
            .header(header::CONTENT_TYPE, "text/csv; charset=utf-8")
            .header(
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", downloader::CSV_FILENAME),
            )
            .body(Body::from(bytes))
            .unwrap(),
        Err(e) => error_response(e),
    }
}

fn chart_response(
    state: &AppState,
    render: fn(&DataTable) -> Result<Vec<u8>, PipelineError>,
) -> Response {
    let guard = state.dataset.lock().unwrap();
    let Some(table) = guard.as_ref() else {
        return idle_response();
    };

    match render(table) {
        Ok(png) => Response::builder()
            .status(StatusCode::OK)
            .header(header::CONTENT_TYPE, "image/png")
            .body(Body::from(png))
            .unwrap(),
        Err(e) => error_response(e),
    }
}

fn render_quota_credit(table: &DataTable) -> Result<Vec<u8>, PipelineError> {
    let rows = views::quota_credit_by_unit(table)?;
    let labels: Vec<String> = rows.iter().map(|r| r.bu.clone()).collect();
    let series = [
        BarSeries {
            name: "FY25 Quota".into(),
            color: BLUE,
            values: rows.iter().map(|r| Some(r.quota)).collect(),
        },
        BarSeries {
            name: "FY25 Credit".into(),
            color: RED,
            values: rows.iter().map(|r| Some(r.credit)).collect(),
        },
    ];
    let options = ChartOptions {
        title: "FY25 Quota vs Credit by Business Unit".into(),
        x_label: "BU".into(),
        y_label: "Amount".into(),
        ..Default::default()
    };
    bar_chart(&labels, &series, &options).map_err(|e| PipelineError::Chart(e.to_string()))
}

fn render_performance_tenure(table: &DataTable) -> Result<Vec<u8>, PipelineError> {
    let rows = views::performance_per_tenure_by_unit(table)?;
    let labels: Vec<String> = rows.iter().map(|r| r.bu.clone()).collect();
    let series = [BarSeries {
        name: "Performance per Tenure".into(),
        color: GREEN_BARS,
        values: rows.iter().map(|r| r.performance_per_tenure).collect(),
    }];
    let options = ChartOptions {
        title: "FY25 Performance per Tenure by Business Unit".into(),
        x_label: "BU".into(),
        y_label: "Avg Attainment / Tenure".into(),
        ..Default::default()
    };
    bar_chart(&labels, &series, &options).map_err(|e| PipelineError::Chart(e.to_string()))
}

fn render_quota_achievement(table: &DataTable) -> Result<Vec<u8>, PipelineError> {
    let rows = views::quota_achievement_by_unit(table)?;
    let labels: Vec<String> = rows.iter().map(|r| r.bu.clone()).collect();
    let series = [BarSeries {
        name: "Quota Achievement %".into(),
        color: ORANGE_BARS,
        values: rows.iter().map(|r| r.achievement_pct).collect(),
    }];
    let options = ChartOptions {
        title: "FY25 Quota Achievement % by Business Unit".into(),
        x_label: "BU".into(),
        y_label: "Percentage".into(),
        ..Default::default()
    };
    bar_chart(&labels, &series, &options).map_err(|e| PipelineError::Chart(e.to_string()))
}

// The idle state is informational, not a failure: nothing has been uploaded
// yet, so there is nothing to compute.
fn idle_response() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({
            "status": "idle",
            "message": "Upload an Excel workbook to begin analysis.",
        })),
    )
        .into_response()
}

fn error_response(err: PipelineError) -> Response {
    let status = match &err {
        PipelineError::MissingColumn(_) => StatusCode::UNPROCESSABLE_ENTITY,
        PipelineError::Workbook(_) | PipelineError::NoSheets | PipelineError::EmptySheet => {
            StatusCode::BAD_REQUEST
        }
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };

    (
        status,
        Json(serde_json::json!({
            "status": "error",
            "message": err.to_string(),
        })),
    )
        .into_response()
}
