use crate::config::PvgisConfig;
use crate::error::UpstreamError;
use crate::models::{IrradianceQuery, IrradianceResult};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

/// 年发电量数据源
#[async_trait]
pub trait IrradianceSource: Send + Sync {
    /// 查询坐标处每 kWp 的年发电量
    async fn annual_yield(&self, query: IrradianceQuery) -> Result<IrradianceResult, UpstreamError>;
}

/// PVGIS (JRC) PVcalc 客户端
///
/// 每次请求只调用一次上游, 不缓存也不重试。
pub struct PvgisClient {
    client: Client,
    base_url: String,
    system_loss_pct: f64,
}

impl PvgisClient {
    pub fn new(config: &PvgisConfig) -> Result<Self, UpstreamError> {
        let client = Client::builder().build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            system_loss_pct: config.system_loss_pct,
        })
    }
}

#[async_trait]
impl IrradianceSource for PvgisClient {
    async fn annual_yield(&self, query: IrradianceQuery) -> Result<IrradianceResult, UpstreamError> {
        let url = format!("{}/PVcalc", self.base_url);
        tracing::debug!("PVGIS request lat={} lon={}", query.latitude, query.longitude);

        let resp = self
            .client
            .get(&url)
            .query(&[
                ("lat", query.latitude.to_string()),
                ("lon", query.longitude.to_string()),
                ("peakpower", "1".to_string()),
                ("loss", self.system_loss_pct.to_string()),
                ("outputformat", "json".to_string()),
            ])
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            return Err(UpstreamError::Rejected {
                status: status.as_u16(),
                message: rejection_message(&body),
            });
        }

        let annual = parse_annual_yield(&body)?;
        Ok(IrradianceResult::from_annual_yield(annual))
    }
}

#[derive(Deserialize)]
struct PvcalcResponse {
    outputs: PvcalcOutputs,
}

#[derive(Deserialize)]
struct PvcalcOutputs {
    totals: PvcalcTotals,
}

#[derive(Deserialize)]
struct PvcalcTotals {
    fixed: PvcalcFixed,
}

#[derive(Deserialize)]
struct PvcalcFixed {
    #[serde(rename = "E_y")]
    e_y: f64,
}

#[derive(Deserialize)]
struct PvgisErrorBody {
    message: String,
}

/// 提取 outputs.totals.fixed.E_y
fn parse_annual_yield(body: &str) -> Result<f64, UpstreamError> {
    let parsed: PvcalcResponse =
        serde_json::from_str(body).map_err(|e| UpstreamError::Malformed(e.to_string()))?;
    let e_y = parsed.outputs.totals.fixed.e_y;
    if !e_y.is_finite() || e_y < 0.0 {
        return Err(UpstreamError::Malformed(format!("E_y = {}", e_y)));
    }
    Ok(e_y)
}

fn rejection_message(body: &str) -> String {
    match serde_json::from_str::<PvgisErrorBody>(body) {
        Ok(err) => err.message,
        Err(_) if body.trim().is_empty() => "empty response".to_string(),
        Err(_) => body.chars().take(200).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_pvcalc_totals() {
        let body = r#"{
            "inputs": {"location": {"latitude": -6.6, "longitude": 106.8}},
            "outputs": {
                "monthly": {"fixed": []},
                "totals": {"fixed": {"E_d": 3.84, "E_m": 116.9, "E_y": 1402.77, "SD_y": 41.2}}
            }
        }"#;
        assert_eq!(parse_annual_yield(body).unwrap(), 1402.77);
    }

    #[test]
    fn missing_totals_is_malformed() {
        let err = parse_annual_yield(r#"{"outputs": {}}"#).unwrap_err();
        assert!(matches!(err, UpstreamError::Malformed(_)));
    }

    #[test]
    fn surfaces_pvgis_error_message() {
        let body = r#"{"message": "Location over the sea. Please, select another location", "status": 400}"#;
        assert_eq!(
            rejection_message(body),
            "Location over the sea. Please, select another location"
        );
        assert_eq!(rejection_message("  "), "empty response");
        assert_eq!(rejection_message("Bad Gateway"), "Bad Gateway");
    }

    #[test]
    fn trims_trailing_slash_from_base_url() {
        let config = PvgisConfig {
            base_url: "http://localhost:9/api/".to_string(),
            system_loss_pct: 14.0,
        };
        let client = PvgisClient::new(&config).unwrap();
        assert_eq!(client.base_url, "http://localhost:9/api");
    }
}
