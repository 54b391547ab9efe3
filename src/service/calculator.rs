use crate::config::SolarConstants;
use crate::error::ComputationError;
use crate::models::{EconomicsInput, EconomicsResult, Payback};

/// 组件数量上限, 保证 f64 -> u64 精确转换
const MAX_PANEL_COUNT: f64 = (1u64 << 53) as f64;

/// 经济测算服务 (纯计算, 无状态)
#[derive(Debug, Clone)]
pub struct EconomicsCalculator {
    constants: SolarConstants,
}

impl EconomicsCalculator {
    pub fn new(constants: SolarConstants) -> Self {
        Self { constants }
    }

    /// 由月电费、电价、节省目标和年 PVOUT 推算装机容量与回收期
    pub fn compute(&self, input: &EconomicsInput) -> Result<EconomicsResult, ComputationError> {
        let c = &self.constants;

        let annual_yield = non_negative("pvout_annual", input.annual_yield)?;
        let monthly_bill_rp = non_negative("tagihan_listrik", input.monthly_bill_rp)?;
        let savings_target_pct = non_negative("penghematan_persen", input.savings_target_pct)?;

        // 1. 电价: 未提供或非正数时使用默认电价
        let tariff = match input.tariff_rp_per_kwh {
            Some(t) if t.is_finite() && t > 0.0 => t,
            Some(t) if t.is_nan() || t == f64::INFINITY => {
                return Err(ComputationError::InvalidValue { field: "tarif_listrik", value: t });
            }
            _ => c.default_tariff_rp_per_kwh,
        };

        // 2. 月用电量
        let monthly_energy_need_kwh = monthly_bill_rp / tariff;

        // 3. 有效月 PVOUT
        let pvout_effective_monthly = annual_yield / 12.0 * c.loss_factor;
        if pvout_effective_monthly <= 0.0 {
            return Err(ComputationError::ZeroYield);
        }

        // 4. 装机容量
        let system_size_kwp = monthly_energy_need_kwh * (savings_target_pct / 100.0) / pvout_effective_monthly;

        // 5-7. 组件数量, 屋顶面积, 投资 (线性成本模型)
        let panels = (finite("Kapasitas_kWp", system_size_kwp)? * 1000.0 / c.panel_watt_peak).ceil();
        if !(0.0..=MAX_PANEL_COUNT).contains(&panels) {
            return Err(ComputationError::OutOfRange("Jumlah_Panel"));
        }
        let panel_count = panels as u64;
        let roof_area_m2 = panel_count as f64 * c.panel_area_m2;
        let total_investment_rp = system_size_kwp * c.price_per_kwp_rp;

        // 8-9. 发电量与节省
        let monthly_production_kwh = system_size_kwp * pvout_effective_monthly;
        let annual_savings_rp = monthly_production_kwh * tariff * 12.0;

        for (field, value) in [
            ("Kebutuhan_kWh_Bulanan", monthly_energy_need_kwh),
            ("Estimasi_Area_m2", roof_area_m2),
            ("Total_Investasi", total_investment_rp),
            ("Produksi_kWh_Bulanan", monthly_production_kwh),
            ("Penghematan_Tahunan_Rp", annual_savings_rp),
        ] {
            finite(field, value)?;
        }

        // 10. 回收期
        let payback_years = if annual_savings_rp > 0.0 {
            let years = finite("BEP_Tahun", total_investment_rp / annual_savings_rp)?;
            Payback::Years(round_to(years, 2))
        } else {
            Payback::Infinite
        };

        Ok(EconomicsResult {
            tariff_used: tariff,
            pvout_annual: annual_yield,
            pvout_effective_monthly,
            monthly_energy_need_kwh,
            system_size_kwp,
            panel_count,
            roof_area_m2,
            total_investment_rp,
            monthly_production_kwh,
            annual_savings_rp,
            payback_years,
            loss_factor: c.loss_factor,
        })
    }
}

fn finite(field: &'static str, value: f64) -> Result<f64, ComputationError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ComputationError::OutOfRange(field))
    }
}

fn non_negative(field: &'static str, value: f64) -> Result<f64, ComputationError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(ComputationError::InvalidValue { field, value })
    }
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round() / scale
}
