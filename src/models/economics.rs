use crate::error::ComputationError;
use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// `/api/calculate_bep` 请求体 (字段未经校验)
///
/// 前端可能传数字或数字字符串, 校验统一在 [`EconomicsInput::try_from`] 中完成。
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawEconomicsInput {
    #[serde(default)]
    pub pvout_annual: Option<Value>,
    #[serde(default)]
    pub tagihan_listrik: Option<Value>,
    #[serde(default)]
    pub tarif_listrik: Option<Value>,
    #[serde(default)]
    pub penghematan_persen: Option<Value>,
}

/// 经济测算输入
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EconomicsInput {
    /// kWh/kWp/year
    pub annual_yield: f64,
    pub monthly_bill_rp: f64,
    /// 缺省或非正数时使用默认电价
    pub tariff_rp_per_kwh: Option<f64>,
    pub savings_target_pct: f64,
}

impl TryFrom<&RawEconomicsInput> for EconomicsInput {
    type Error = ComputationError;

    fn try_from(raw: &RawEconomicsInput) -> Result<Self, Self::Error> {
        let annual_yield = required("pvout_annual", raw.pvout_annual.as_ref())?;
        let monthly_bill_rp = required("tagihan_listrik", raw.tagihan_listrik.as_ref())?;
        let savings_target_pct = required("penghematan_persen", raw.penghematan_persen.as_ref())?;

        let tariff_rp_per_kwh = match raw.tarif_listrik.as_ref() {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) if s.trim().is_empty() => None,
            Some(v) => Some(coerce_f64(v).ok_or(ComputationError::NotNumeric("tarif_listrik"))?),
        };

        Ok(Self {
            annual_yield,
            monthly_bill_rp,
            tariff_rp_per_kwh,
            savings_target_pct,
        })
    }
}

fn required(field: &'static str, value: Option<&Value>) -> Result<f64, ComputationError> {
    match value {
        None | Some(Value::Null) => Err(ComputationError::Missing(field)),
        Some(v) => coerce_f64(v).ok_or(ComputationError::NotNumeric(field)),
    }
}

/// 数字或数字字符串 -> f64
pub fn coerce_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// 投资回收期 (年)
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Payback {
    Years(f64),
    /// 没有正向节省时回收期不存在
    Infinite,
}

const INFINITE_SENTINEL: &str = "Inf";

impl fmt::Display for Payback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // 整数也保留 ".0", 如 "7.0"
            Payback::Years(years) => write!(f, "{:?}", years),
            Payback::Infinite => f.write_str(INFINITE_SENTINEL),
        }
    }
}

impl Serialize for Payback {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Payback::Years(years) => serializer.serialize_f64(*years),
            Payback::Infinite => serializer.serialize_str(INFINITE_SENTINEL),
        }
    }
}

impl<'de> Deserialize<'de> for Payback {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        if let Value::String(s) = &value {
            if matches!(s.trim().to_ascii_lowercase().as_str(), "inf" | "infinity") {
                return Ok(Payback::Infinite);
            }
        }
        match coerce_f64(&value) {
            Some(years) if years.is_finite() => Ok(Payback::Years(years)),
            _ => Err(de::Error::custom(format!("invalid payback value: {}", value))),
        }
    }
}

/// 测算结果, 字段名与前端约定保持一致
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EconomicsResult {
    #[serde(rename = "TDL_Used")]
    pub tariff_used: f64,
    #[serde(rename = "PVOut_Annual")]
    pub pvout_annual: f64,
    #[serde(rename = "PVOUT_Bulanan_Efektif")]
    pub pvout_effective_monthly: f64,
    #[serde(rename = "Kebutuhan_kWh_Bulanan")]
    pub monthly_energy_need_kwh: f64,
    #[serde(rename = "Kapasitas_kWp")]
    pub system_size_kwp: f64,
    #[serde(rename = "Jumlah_Panel")]
    pub panel_count: u64,
    #[serde(rename = "Estimasi_Area_m2")]
    pub roof_area_m2: f64,
    #[serde(rename = "Total_Investasi")]
    pub total_investment_rp: f64,
    #[serde(rename = "Produksi_kWh_Bulanan")]
    pub monthly_production_kwh: f64,
    #[serde(rename = "Penghematan_Tahunan_Rp")]
    pub annual_savings_rp: f64,
    #[serde(rename = "BEP_Tahun")]
    pub payback_years: Payback,
    #[serde(rename = "LOSS_FACTOR")]
    pub loss_factor: f64,
}

impl EconomicsResult {
    /// 月节省金额 (Rp)
    pub fn monthly_savings_rp(&self) -> f64 {
        self.monthly_production_kwh * self.tariff_used
    }
}

/// 带 status 标签的测算结果
///
/// 序列化为 `{"status": "success", ...结果字段}` 或 `{"status": "failed", "message": ...}`。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum EconomicsOutcome {
    Success(EconomicsResult),
    Failed { message: String },
}
