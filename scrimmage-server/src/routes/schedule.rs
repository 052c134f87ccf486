//! Event schedule endpoints
//!
//! Generation runs on the blocking pool under the configured timeout. On
//! timeout the generator is cancelled and the request fails without
//! touching the stored rounds.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use scrimmage_core::{Round, ScheduleConfig};
use scrimmage_scheduler::{
    CancellationToken, GenerationStats, GeneratorOptions, RoundGenerator, ScheduleError,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::state::{RoundRecord, ServerState};

/// Body of a generation request: the schedule config plus an optional seed
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleRequest {
    #[serde(flatten)]
    pub config: ScheduleConfig,
    #[serde(default)]
    pub seed: Option<u64>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleResponse {
    pub event_id: String,
    pub seed: u64,
    pub generated_at: DateTime<Utc>,
    pub rounds: Vec<Round>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<GenerationStats>,
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

fn error_response(msg: &str, status: StatusCode) -> Response {
    (
        status,
        Json(ErrorBody {
            error: msg.to_string(),
        }),
    )
        .into_response()
}

/// POST /api/events/:event_id/schedule
pub async fn generate_event_schedule(
    State(state): State<Arc<ServerState>>,
    Path(event_id): Path<String>,
    Json(req): Json<ScheduleRequest>,
) -> Response {
    if let Err(e) = req.config.validate() {
        tracing::warn!("Rejected schedule for event {}: {}", event_id, e);
        return error_response(&e.to_string(), StatusCode::BAD_REQUEST);
    }

    let token = CancellationToken::new();
    let worker_token = token.clone();
    let options = GeneratorOptions {
        seed: req.seed,
        ..Default::default()
    };
    let config = req.config;

    let task = tokio::task::spawn_blocking(move || {
        RoundGenerator::new(&config, options)?
            .with_cancellation(worker_token)
            .run()
    });

    let outcome = match tokio::time::timeout(state.generation_timeout, task).await {
        Ok(Ok(outcome)) => outcome,
        Ok(Err(e)) => {
            tracing::error!("Generation task for event {} failed: {}", event_id, e);
            return error_response("schedule generation failed", StatusCode::INTERNAL_SERVER_ERROR);
        }
        Err(_) => {
            token.cancel();
            tracing::warn!(
                "Generation for event {} exceeded {} ms, cancelled",
                event_id,
                state.generation_timeout.as_millis()
            );
            return error_response("schedule generation timed out", StatusCode::GATEWAY_TIMEOUT);
        }
    };

    let schedule = match outcome {
        Ok(schedule) => schedule,
        Err(ScheduleError::Config(e)) => {
            return error_response(&e.to_string(), StatusCode::BAD_REQUEST);
        }
        Err(e @ ScheduleError::Cancelled { .. }) => {
            return error_response(&e.to_string(), StatusCode::SERVICE_UNAVAILABLE);
        }
        Err(e) => {
            tracing::error!("Generation for event {} failed: {}", event_id, e);
            return error_response(&e.to_string(), StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let seed = schedule.stats.seed;
    let generated_at = Utc::now();
    let records = schedule
        .rounds
        .iter()
        .map(|round| RoundRecord {
            event_id: event_id.clone(),
            seed,
            generated_at,
            round: round.clone(),
        })
        .collect();

    if let Err(e) = state.store.replace_rounds(&event_id, records) {
        tracing::error!("Failed to store rounds for event {}: {:#}", event_id, e);
        return error_response("failed to store rounds", StatusCode::INTERNAL_SERVER_ERROR);
    }

    tracing::info!(
        "Stored {} rounds for event {} (seed {})",
        schedule.rounds.len(),
        event_id,
        seed
    );

    Json(ScheduleResponse {
        event_id,
        seed,
        generated_at,
        rounds: schedule.rounds,
        stats: Some(schedule.stats),
    })
    .into_response()
}

/// GET /api/events/:event_id/rounds
pub async fn get_event_rounds(
    State(state): State<Arc<ServerState>>,
    Path(event_id): Path<String>,
) -> Response {
    let records = match state.store.load_rounds(&event_id) {
        Ok(records) => records,
        Err(e) => {
            tracing::error!("Failed to load rounds for event {}: {:#}", event_id, e);
            return error_response("failed to load rounds", StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let Some(first) = records.first() else {
        return error_response("no schedule for this event", StatusCode::NOT_FOUND);
    };

    Json(ScheduleResponse {
        event_id,
        seed: first.seed,
        generated_at: first.generated_at,
        rounds: records.iter().map(|r| r.round.clone()).collect(),
        stats: None,
    })
    .into_response()
}
