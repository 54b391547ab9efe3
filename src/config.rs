use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

/// 默认配置文件 (可选, 不存在时忽略)
const DEFAULT_CONFIG_FILE: &str = "plts";

/// 应用配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub pvgis: PvgisConfig,
    pub solar: SolarConstants,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

/// PVGIS (JRC) 接口配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PvgisConfig {
    pub base_url: String,
    /// 传给 PVcalc 的系统损耗 (%)
    pub system_loss_pct: f64,
}

impl Default for PvgisConfig {
    fn default() -> Self {
        Self {
            base_url: "https://re.jrc.ec.europa.eu/api/v5_2".to_string(),
            system_loss_pct: 14.0,
        }
    }
}

/// 光伏测算常量
///
/// 数值必须与现有工具保持一致, 否则输出结果会不同。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolarConstants {
    /// 单块组件峰值功率 (Wp)
    pub panel_watt_peak: f64,
    /// 性能系数 / 损耗系数 (0..1)
    pub loss_factor: f64,
    /// 每 kWp 安装单价 (Rp/kWp), 线性成本模型
    pub price_per_kwp_rp: f64,
    /// 单块组件占用面积 (m²)
    pub panel_area_m2: f64,
    /// 未提供电价时使用的 PLN 电价 (Rp/kWh)
    pub default_tariff_rp_per_kwh: f64,
}

impl Default for SolarConstants {
    fn default() -> Self {
        Self {
            panel_watt_peak: 550.0,
            loss_factor: 0.85,
            price_per_kwp_rp: 15_000_000.0,
            panel_area_m2: 2.6,
            default_tariff_rp_per_kwh: 1699.53,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// RUST_LOG 未设置时的过滤级别
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// 加载配置: 默认值 < plts.toml < PLTS_* 环境变量
    pub fn load() -> Result<Self, ConfigError> {
        let file = std::env::var("PLTS_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());
        Self::load_from(&file)
    }

    pub fn load_from(file: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = Config::builder()
            .add_source(File::with_name(file).required(false))
            .add_source(
                Environment::with_prefix("PLTS")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let solar = &self.solar;
        let positive = [
            ("solar.panel_watt_peak", solar.panel_watt_peak),
            ("solar.price_per_kwp_rp", solar.price_per_kwp_rp),
            ("solar.panel_area_m2", solar.panel_area_m2),
            ("solar.default_tariff_rp_per_kwh", solar.default_tariff_rp_per_kwh),
        ];
        for (key, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::Message(format!("{} must be positive, got {}", key, value)));
            }
        }
        if !(solar.loss_factor > 0.0 && solar.loss_factor <= 1.0) {
            return Err(ConfigError::Message(format!(
                "solar.loss_factor must be in (0, 1], got {}",
                solar.loss_factor
            )));
        }
        Ok(())
    }
}
