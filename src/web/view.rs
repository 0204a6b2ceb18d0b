use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{
    config::SimulationConfig,
    dashboard::Dashboard,
    telemetry::{EngineState, VehicleReading},
};

// View Models
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    pub reading: VehicleReading,
    pub alert: Option<AlertBanner>,
    pub chart: DistanceChartView,
    pub tick_counter: u64,
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct AlertBanner {
    pub title: String,
    pub message: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DistanceChartView {
    pub points: Vec<ChartPoint>,
    /// Reference line of the alert zone.
    pub threshold_m: f64,
    pub window_size: usize,
    /// Highest distance plus headroom, `None` while waiting for data.
    pub y_axis_max: Option<f64>,
}

#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChartPoint {
    pub label: String,
    pub distance_m: f64,
}

const Y_AXIS_HEADROOM_M: f64 = 5.0;

impl DashboardView {
    pub fn new(state: &EngineState, config: &SimulationConfig) -> Self {
        let alert = state.alert_active.then(|| AlertBanner {
            title: "CRASH ALERT!".to_string(),
            message: format!(
                "V2V Distance critically low: {}m",
                state.latest.v2v_distance_m
            ),
        });

        let points = state
            .history
            .iter()
            .map(|sample| ChartPoint {
                label: format!("T{}", sample.tick),
                distance_m: sample.distance_m,
            })
            .collect();

        let y_axis_max = state
            .history
            .iter()
            .map(|sample| sample.distance_m)
            .reduce(f64::max)
            .map(|max| max + Y_AXIS_HEADROOM_M);

        Self {
            reading: state.latest,
            alert,
            chart: DistanceChartView {
                points,
                threshold_m: config.crash_threshold_m,
                window_size: config.max_history_length,
                y_axis_max,
            },
            tick_counter: state.tick_counter,
            generated_at: Utc::now(),
        }
    }
}

#[derive(Clone)]
struct ApiState {
    dashboard: Dashboard,
    simulation: Arc<SimulationConfig>,
}

// Routes and Handlers
pub fn routes(dashboard: Dashboard, simulation: SimulationConfig) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/api/state", get(state_api))
        .route("/api/dashboard", get(dashboard_api))
        .with_state(ApiState {
            dashboard,
            simulation: Arc::new(simulation),
        })
}

async fn state_api(State(api): State<ApiState>) -> Json<EngineState> {
    Json(api.dashboard.snapshot())
}

async fn dashboard_api(State(api): State<ApiState>) -> Json<DashboardView> {
    let state = api.dashboard.snapshot();
    Json(DashboardView::new(&state, &api.simulation))
}
