use super::economics::{coerce_f64, EconomicsOutcome, EconomicsResult};
use crate::error::InputError;
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// `/api/generate_pdf` 请求体
#[derive(Debug, Clone, Deserialize)]
pub struct ProposalRequest {
    #[serde(rename = "nama", default = "default_customer_name")]
    pub customer_name: String,
    #[serde(rename = "coordinates", default = "default_coordinates")]
    pub coordinates_display: String,
    #[serde(rename = "tagihan_listrik", default, deserialize_with = "lenient_f64")]
    pub monthly_bill_rp: f64,
    #[serde(rename = "penghematan_persen", default, deserialize_with = "lenient_f64")]
    pub savings_target_pct: f64,
    #[serde(default, deserialize_with = "lenient_outcome")]
    pub results: Option<EconomicsOutcome>,
    /// 提案日期, 未提供时由接口层填入当天日期
    #[serde(default)]
    pub issued_on: Option<NaiveDate>,
}

impl ProposalRequest {
    /// 只有 status 为 success 的测算结果才能生成提案
    pub fn successful_results(&self) -> Result<&EconomicsResult, InputError> {
        match &self.results {
            Some(EconomicsOutcome::Success(results)) => Ok(results),
            _ => Err(InputError::InvalidResults),
        }
    }
}

fn default_customer_name() -> String {
    "Pelanggan Yth.".to_string()
}

fn default_coordinates() -> String {
    "-".to_string()
}

fn lenient_f64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(coerce_f64(&value).filter(|v| v.is_finite()).unwrap_or(0.0))
}

/// 无法识别的 results 视为缺失, 由 [`ProposalRequest::successful_results`] 统一拒绝
fn lenient_outcome<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<EconomicsOutcome>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn applies_defaults_for_missing_fields() {
        let req: ProposalRequest = serde_json::from_value(json!({})).unwrap();
        assert_eq!(req.customer_name, "Pelanggan Yth.");
        assert_eq!(req.coordinates_display, "-");
        assert_eq!(req.monthly_bill_rp, 0.0);
        assert_eq!(req.successful_results(), Err(InputError::InvalidResults));
    }

    #[test]
    fn failed_or_garbage_results_are_rejected() {
        let req: ProposalRequest = serde_json::from_value(json!({
            "nama": "Budi",
            "results": {"status": "failed", "message": "Parameter pvout_annual wajib diisi"}
        }))
        .unwrap();
        assert_eq!(req.successful_results(), Err(InputError::InvalidResults));

        let req: ProposalRequest = serde_json::from_value(json!({
            "results": {"status": "success"}
        }))
        .unwrap();
        assert!(req.results.is_none());
    }

    #[test]
    fn accepts_string_amounts() {
        let req: ProposalRequest = serde_json::from_value(json!({
            "tagihan_listrik": "1500000",
            "penghematan_persen": 80
        }))
        .unwrap();
        assert_eq!(req.monthly_bill_rp, 1_500_000.0);
        assert_eq!(req.savings_target_pct, 80.0);
    }
}
