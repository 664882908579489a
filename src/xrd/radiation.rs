//! # 辐射源波长
//!
//! 特征 X 射线谱线的命名波长表，以及计算器构造时使用的
//! 波长选择类型。
//!
//! ## 依赖关系
//! - 被 `xrd/calculator.rs` 与 `commands/` 使用
//! - 纯静态数据，无外部模块依赖

use crate::error::{Result, XtalkitError};

/// 特征谱线波长表 (Å)
pub static WAVELENGTHS: &[(&str, f64)] = &[
    ("CuKa", 1.54184),
    ("CuKa2", 1.54439),
    ("CuKa1", 1.54056),
    ("CuKb1", 1.39222),
    ("MoKa", 0.71073),
    ("MoKa2", 0.71359),
    ("MoKa1", 0.70930),
    ("MoKb1", 0.63229),
    ("CrKa", 2.29100),
    ("CrKa2", 2.29361),
    ("CrKa1", 2.28970),
    ("CrKb1", 2.08487),
    ("FeKa", 1.93735),
    ("FeKa2", 1.93998),
    ("FeKa1", 1.93604),
    ("FeKb1", 1.75661),
    ("CoKa", 1.79026),
    ("CoKa2", 1.79285),
    ("CoKa1", 1.78896),
    ("CoKb1", 1.63079),
    ("AgKa", 0.560885),
    ("AgKa2", 0.563813),
    ("AgKa1", 0.559421),
    ("AgKb1", 0.497082),
];

/// 波长选择：命名谱线或显式数值
#[derive(Debug, Clone, PartialEq)]
pub enum Wavelength {
    /// 命名特征谱线，如 "CuKa"
    Line(String),
    /// 显式波长 (Å)
    Angstrom(f64),
}

impl Wavelength {
    /// 解析用户输入：先查命名谱线（不区分大小写），再按数值解析
    pub fn parse(input: &str) -> Result<Self> {
        if WAVELENGTHS
            .iter()
            .any(|(name, _)| name.eq_ignore_ascii_case(input))
        {
            return Ok(Wavelength::Line(input.to_string()));
        }
        match input.parse::<f64>() {
            Ok(value) => Ok(Wavelength::Angstrom(value)),
            Err(_) => Err(XtalkitError::UnknownRadiation {
                name: input.to_string(),
            }),
        }
    }

    /// 解析为数值波长 (Å)；未知谱线名或非正数值为配置错误
    pub fn resolve(&self) -> Result<f64> {
        let value = match self {
            Wavelength::Line(name) => WAVELENGTHS
                .iter()
                .find(|(key, _)| key.eq_ignore_ascii_case(name))
                .map(|(_, wl)| *wl)
                .ok_or_else(|| XtalkitError::UnknownRadiation { name: name.clone() })?,
            Wavelength::Angstrom(value) => *value,
        };

        if value > 0.0 && value.is_finite() {
            Ok(value)
        } else {
            Err(XtalkitError::InvalidWavelength { value })
        }
    }
}

impl Default for Wavelength {
    fn default() -> Self {
        Wavelength::Line("CuKa".to_string())
    }
}

impl std::fmt::Display for Wavelength {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Wavelength::Line(name) => write!(f, "{}", name),
            Wavelength::Angstrom(value) => write!(f, "{} Å", value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_line() {
        let wl = Wavelength::parse("CuKa").unwrap();
        assert!((wl.resolve().unwrap() - 1.54184).abs() < 1e-12);
    }

    #[test]
    fn test_named_line_case_insensitive() {
        let wl = Wavelength::parse("moka1").unwrap();
        assert!((wl.resolve().unwrap() - 0.70930).abs() < 1e-12);
    }

    #[test]
    fn test_explicit_value() {
        let wl = Wavelength::parse("0.709").unwrap();
        assert!((wl.resolve().unwrap() - 0.709).abs() < 1e-12);
    }

    #[test]
    fn test_unknown_name() {
        assert!(matches!(
            Wavelength::parse("NiKa"),
            Err(XtalkitError::UnknownRadiation { .. })
        ));
    }

    #[test]
    fn test_nonpositive_value_rejected() {
        assert!(matches!(
            Wavelength::Angstrom(0.0).resolve(),
            Err(XtalkitError::InvalidWavelength { .. })
        ));
        assert!(matches!(
            Wavelength::Angstrom(-1.5).resolve(),
            Err(XtalkitError::InvalidWavelength { .. })
        ));
    }

    #[test]
    fn test_default_is_cu_ka() {
        assert!((Wavelength::default().resolve().unwrap() - 1.54184).abs() < 1e-12);
    }
}
