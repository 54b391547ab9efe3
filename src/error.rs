use thiserror::Error;

/// 请求参数错误 (HTTP 400)
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InputError {
    #[error("Input Salah: format koordinat harus \"lat,lon\"")]
    CoordinateFormat,

    #[error("Input Salah: {field} bukan angka")]
    NotNumeric { field: &'static str },

    #[error("Input Salah: {field} {value} di luar rentang [{min}, {max}]")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("Data perhitungan tidak valid.")]
    InvalidResults,

    #[error("Body JSON tidak valid: {0}")]
    Body(String),
}

/// PVGIS 查询失败 (HTTP 500)
#[derive(Error, Debug)]
pub enum UpstreamError {
    #[error("Gagal menghubungi PVGIS: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("PVGIS menolak permintaan ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("Respons PVGIS tidak lengkap: {0}")]
    Malformed(String),
}

/// 经济测算失败
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ComputationError {
    #[error("Parameter {0} wajib diisi")]
    Missing(&'static str),

    #[error("Parameter {0} harus berupa angka")]
    NotNumeric(&'static str),

    #[error("Parameter {field} harus bernilai non-negatif dan terhingga, diterima {value}")]
    InvalidValue { field: &'static str, value: f64 },

    #[error("PVOUT efektif bernilai nol, kapasitas tidak dapat dihitung")]
    ZeroYield,

    #[error("Hasil {0} di luar jangkauan numerik, periksa kembali input")]
    OutOfRange(&'static str),
}

/// PDF 序列化失败
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Gagal membuat PDF: {0}")]
    Pdf(String),
}
