//! API route handlers.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;

use crate::calculator::{build_combinations, parse_odds, settle_tickets};
use crate::config::AppConfig;
use crate::types::{
    CombinationRequest, CombinationResponse, ErrorResponse, HealthResponse, OddsParseRequest,
    OddsParseResponse, SettleRequest, SettleResponse,
};

/// Application state shared across handlers.
pub struct AppState {
    pub config: AppConfig,
}

/// Error type for API handlers.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: msg.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ErrorResponse {
            error: self.status.to_string(),
            message: self.message,
        });
        (self.status, body).into_response()
    }
}

/// Build the application router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/combinations", post(combinations))
        .route("/odds/parse", post(odds_parse))
        .route("/settle", post(settle))
        .with_state(state)
}

/// Health check endpoint.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Combination endpoint.
pub async fn combinations(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CombinationRequest>,
) -> Result<Json<CombinationResponse>, ApiError> {
    Ok(Json(build_combinations(&req, &state.config.betting)))
}

/// Odds text import endpoint.
pub async fn odds_parse(Json(req): Json<OddsParseRequest>) -> Result<Json<OddsParseResponse>, ApiError> {
    if req.text.trim().is_empty() {
        return Err(ApiError::bad_request("No odds text provided"));
    }
    Ok(Json(parse_odds(&req)))
}

/// Settlement endpoint.
pub async fn settle(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SettleRequest>,
) -> Result<Json<SettleResponse>, ApiError> {
    settle_tickets(&req, &state.config.betting)
        .map(Json)
        .map_err(|e| ApiError::bad_request(format!("{:#}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bet_type::BetCategory;
    use crate::payout::RaceResult;
    use crate::selection::Selection;
    use crate::types::TicketRequest;

    fn state() -> State<Arc<AppState>> {
        State(Arc::new(AppState {
            config: AppConfig::default(),
        }))
    }

    #[tokio::test]
    async fn test_health() {
        let Json(resp) = health().await;
        assert_eq!(resp.status, "ok");
    }

    #[tokio::test]
    async fn test_combinations_handler() {
        let req: CombinationRequest = serde_json::from_str(
            r#"{"bet_type": "trifecta", "selection": {"method": "box", "horses": [1, 2, 3]}}"#,
        )
        .unwrap();
        let Json(resp) = combinations(state(), Json(req)).await.unwrap();
        assert_eq!(resp.count, 6);
        assert_eq!(resp.expected.total_cost, 600);
    }

    #[tokio::test]
    async fn test_odds_parse_rejects_empty_text() {
        let req = OddsParseRequest {
            text: "  \n".to_string(),
            bet_type: None,
        };
        let err = odds_parse(Json(req)).await.unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_settle_invalid_result_is_bad_request() {
        let mut result = RaceResult::new(1, 2, None);
        result.second = None;
        let req = SettleRequest {
            tickets: vec![TicketRequest {
                bet_type: BetCategory::Win,
                selection: Selection::Direct { horses: vec![1] },
                unit_stake: None,
                result: None,
            }],
            result: Some(result),
            field_size: None,
        };
        let err = settle(state(), Json(req)).await.unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert!(err.message.contains("1st and 2nd"));
    }

    #[tokio::test]
    async fn test_settle_handler() {
        let req = SettleRequest {
            tickets: vec![TicketRequest {
                bet_type: BetCategory::Win,
                selection: Selection::Direct { horses: vec![1] },
                unit_stake: None,
                result: None,
            }],
            result: Some(RaceResult::new(1, 2, None).with_dividend(340)),
            field_size: None,
        };
        let Json(resp) = settle(state(), Json(req)).await.unwrap();
        assert_eq!(resp.summary.total_payout, 340);
        assert_eq!(resp.summary.profit, 240);
    }
}
