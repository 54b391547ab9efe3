use crate::error::InputError;
use std::str::FromStr;

/// PVOUT 显示精度 (小数位)
pub const YIELD_DISPLAY_DECIMALS: usize = 2;

/// 坐标查询
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IrradianceQuery {
    pub latitude: f64,
    pub longitude: f64,
}

impl IrradianceQuery {
    /// 校验经纬度范围后构造
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, InputError> {
        check_range("latitude", latitude, 90.0)?;
        check_range("longitude", longitude, 180.0)?;
        Ok(Self { latitude, longitude })
    }
}

fn check_range(field: &'static str, value: f64, limit: f64) -> Result<(), InputError> {
    if !value.is_finite() {
        return Err(InputError::NotNumeric { field });
    }
    if value < -limit || value > limit {
        return Err(InputError::OutOfRange {
            field,
            value,
            min: -limit,
            max: limit,
        });
    }
    Ok(())
}

/// 解析 "lat,lon" 格式
impl FromStr for IrradianceQuery {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.trim().split(',').collect();
        let [lat, lon] = parts.as_slice() else {
            return Err(InputError::CoordinateFormat);
        };

        let latitude = lat
            .trim()
            .parse::<f64>()
            .map_err(|_| InputError::NotNumeric { field: "latitude" })?;
        let longitude = lon
            .trim()
            .parse::<f64>()
            .map_err(|_| InputError::NotNumeric { field: "longitude" })?;

        Self::new(latitude, longitude)
    }
}

/// 年发电量查询结果 (kWh/kWp/year)
#[derive(Debug, Clone, PartialEq)]
pub struct IrradianceResult {
    pub annual_yield_kwh_per_kwp: f64,
    pub formatted_display: String,
}

impl IrradianceResult {
    /// 数值与显示值按同一精度取整, 保证两者一致
    pub fn from_annual_yield(raw: f64) -> Self {
        let scale = 10f64.powi(YIELD_DISPLAY_DECIMALS as i32);
        let annual_yield_kwh_per_kwp = (raw * scale).round() / scale;
        Self {
            annual_yield_kwh_per_kwp,
            formatted_display: format!("{:.*}", YIELD_DISPLAY_DECIMALS, annual_yield_kwh_per_kwp),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_coordinates_with_spaces() {
        let q: IrradianceQuery = " -6.595, 106.816 ".parse().unwrap();
        assert_eq!(q.latitude, -6.595);
        assert_eq!(q.longitude, 106.816);
    }

    #[test]
    fn rejects_wrong_part_count() {
        assert_eq!("1".parse::<IrradianceQuery>(), Err(InputError::CoordinateFormat));
        assert_eq!("1,2,3".parse::<IrradianceQuery>(), Err(InputError::CoordinateFormat));
        assert_eq!("".parse::<IrradianceQuery>(), Err(InputError::CoordinateFormat));
    }

    #[test]
    fn rejects_non_numeric_parts() {
        assert_eq!(
            "abc,106".parse::<IrradianceQuery>(),
            Err(InputError::NotNumeric { field: "latitude" })
        );
        assert_eq!(
            "-6,NaN".parse::<IrradianceQuery>(),
            Err(InputError::NotNumeric { field: "longitude" })
        );
    }

    #[test]
    fn rejects_out_of_range_latitude() {
        let err = "91,0".parse::<IrradianceQuery>().unwrap_err();
        assert!(matches!(err, InputError::OutOfRange { field: "latitude", .. }));
        assert!(err.to_string().contains("latitude"));

        assert!("0,180".parse::<IrradianceQuery>().is_ok());
        assert!("0,-180.5".parse::<IrradianceQuery>().is_err());
    }

    #[test]
    fn display_value_matches_numeric_value() {
        for raw in [0.0, 1400.0, 1423.456, 1523.994_9, 987.005] {
            let result = IrradianceResult::from_annual_yield(raw);
            let parsed: f64 = result.formatted_display.parse().unwrap();
            assert_eq!(parsed, result.annual_yield_kwh_per_kwp);
            assert!((result.annual_yield_kwh_per_kwp - raw).abs() <= 0.005 + 1e-9);
        }
    }
}
