use super::{ApiError, AppState};
use crate::error::InputError;
use crate::models::{EconomicsInput, EconomicsOutcome, IrradianceQuery, ProposalRequest, RawEconomicsInput};
use axum::{
    extract::{rejection::JsonRejection, Json, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use chrono::Local;
use serde::{Deserialize, Serialize};

const PDF_FILENAME: &str = "Proposal_PLTS.pdf";

/// 请求体: "lat,lon"
#[derive(Debug, Deserialize)]
pub struct PvoutRequest {
    #[serde(default)]
    pub coordinates: String,
}

/// 响应体
#[derive(Debug, Serialize)]
pub struct PvoutResponse {
    pub status: &'static str,
    pub pvout_value: String,
    pub raw_value: f64,
}

fn body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    match payload {
        Ok(Json(value)) => Ok(value),
        Err(rejection) => {
            tracing::warn!("Rejected request body: {}", rejection.body_text());
            Err(InputError::Body(rejection.body_text()).into())
        }
    }
}

/// 坐标 -> 年 PVOUT (kWh/kWp/year)
pub async fn pvout(
    State(state): State<AppState>,
    payload: Result<Json<PvoutRequest>, JsonRejection>,
) -> Result<Json<PvoutResponse>, ApiError> {
    let req = body(payload)?;

    let query: IrradianceQuery = req.coordinates.parse().map_err(|e: InputError| {
        tracing::warn!("Invalid coordinates {:?}: {}", req.coordinates, e);
        e
    })?;

    tracing::info!("PVOUT lookup lat={} lon={}", query.latitude, query.longitude);
    let result = state.irradiance.annual_yield(query).await.map_err(|e| {
        tracing::error!("PVOUT lookup failed: {}", e);
        e
    })?;

    Ok(Json(PvoutResponse {
        status: "success",
        pvout_value: result.formatted_display,
        raw_value: result.annual_yield_kwh_per_kwp,
    }))
}

/// 经济测算 (BEP)
pub async fn calculate_bep(
    State(state): State<AppState>,
    payload: Result<Json<RawEconomicsInput>, JsonRejection>,
) -> Result<Json<EconomicsOutcome>, ApiError> {
    let raw = body(payload)?;

    let result = EconomicsInput::try_from(&raw).and_then(|input| {
        tracing::info!(
            "BEP calculation pvout={} bill={} tariff={:?} target={}%",
            input.annual_yield,
            input.monthly_bill_rp,
            input.tariff_rp_per_kwh,
            input.savings_target_pct
        );
        state.calculator.compute(&input)
    });

    match result {
        Ok(r) => Ok(Json(EconomicsOutcome::Success(r))),
        Err(e) => {
            tracing::warn!("BEP calculation failed: {}", e);
            Err(e.into())
        }
    }
}

/// 生成 PDF 提案 (附件下载)
pub async fn generate_pdf(
    State(state): State<AppState>,
    payload: Result<Json<ProposalRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let mut req = body(payload)?;
    req.issued_on.get_or_insert_with(|| Local::now().date_naive());

    let document = state.renderer.render(&req).map_err(|e| {
        tracing::warn!("Proposal rejected for {:?}: {}", req.customer_name, e);
        e
    })?;
    let bytes = document.to_pdf()?;
    tracing::info!("Proposal generated for {:?} ({} bytes)", req.customer_name, bytes.len());

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", PDF_FILENAME),
            ),
        ],
        bytes,
    )
        .into_response())
}
