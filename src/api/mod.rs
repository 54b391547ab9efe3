pub mod handlers;

use crate::config::SolarConstants;
use crate::error::{ComputationError, InputError, RenderError, UpstreamError};
use crate::service::{EconomicsCalculator, IrradianceSource, ProposalRenderer};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tower::ServiceBuilder;

pub use handlers::{calculate_bep, generate_pdf, pvout};

/// 共享状态: 数据源与无状态计算服务
#[derive(Clone)]
pub struct AppState {
    pub irradiance: Arc<dyn IrradianceSource>,
    pub calculator: Arc<EconomicsCalculator>,
    pub renderer: Arc<ProposalRenderer>,
}

impl AppState {
    pub fn new(irradiance: Arc<dyn IrradianceSource>, solar: SolarConstants) -> Self {
        Self {
            irradiance,
            calculator: Arc::new(EconomicsCalculator::new(solar.clone())),
            renderer: Arc::new(ProposalRenderer::new(solar)),
        }
    }
}

/// 构建路由
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/pvout", post(pvout))
        .route("/api/calculate_bep", post(calculate_bep))
        .route("/api/generate_pdf", post(generate_pdf))
        .layer(ServiceBuilder::new())
        .with_state(state)
}

/// 接口错误, 统一输出 `{"status": "failed", "message": ...}`
#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Input(#[from] InputError),
    #[error(transparent)]
    Upstream(#[from] UpstreamError),
    #[error(transparent)]
    Computation(#[from] ComputationError),
    #[error(transparent)]
    Render(#[from] RenderError),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            // 与现有前端约定一致: 无效测算结果按服务端错误返回
            ApiError::Input(InputError::InvalidResults) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Input(_) => StatusCode::BAD_REQUEST,
            ApiError::Upstream(_) | ApiError::Computation(_) | ApiError::Render(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

#[derive(Debug, Serialize)]
pub struct FailedResponse {
    pub status: &'static str,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = FailedResponse {
            status: "failed",
            message: self.to_string(),
        };
        (self.status_code(), Json(body)).into_response()
    }
}
