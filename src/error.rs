//! # 统一错误处理模块
//!
//! 定义 xtalkit 的所有错误类型，使用 `thiserror` 派生。
//!
//! ## 依赖关系
//! - 被所有其他模块使用
//! - 无外部模块依赖

use thiserror::Error;

/// xtalkit 统一错误类型
#[derive(Error, Debug)]
pub enum XtalkitError {
    // ─────────────────────────────────────────────────────────────
    // 配置错误（构造计算器时）
    // ─────────────────────────────────────────────────────────────
    #[error("Unknown radiation source: '{name}'. Use a wavelength in angstrom or one of the named lines (see `xtalkit radiation`)")]
    UnknownRadiation { name: String },

    #[error("Invalid wavelength: {value} (must be a positive length in angstrom)")]
    InvalidWavelength { value: f64 },

    // ─────────────────────────────────────────────────────────────
    // 计算错误
    // ─────────────────────────────────────────────────────────────
    #[error("Unable to calculate XRD pattern: no scattering coefficients for element '{element}'")]
    MissingScatteringData { element: String },

    #[error("Invalid occupancy {occupancy} for species '{element}' (must be in (0, 1])")]
    InvalidOccupancy { element: String, occupancy: f64 },

    #[error(
        "Reciprocal point with |g| = {g} lies beyond the limiting sphere for wavelength {wavelength} (lambda*g/2 > 1)"
    )]
    BraggCondition { g: f64, wavelength: f64 },

    // ─────────────────────────────────────────────────────────────
    // 参数错误
    // ─────────────────────────────────────────────────────────────
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid range format: {0}")]
    InvalidRange(String),

    // ─────────────────────────────────────────────────────────────
    // CSV 错误
    // ─────────────────────────────────────────────────────────────
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    // ─────────────────────────────────────────────────────────────
    // 其他
    // ─────────────────────────────────────────────────────────────
    #[error("{0}")]
    Other(String),
}

/// Result 类型别名
pub type Result<T> = std::result::Result<T, XtalkitError>;
