//! # 原子散射系数表
//!
//! 每个元素的原子序数 Z 与电子散射高斯拟合系数 (aᵢ, bᵢ)，
//! 供 De Graef / McHenry 形式的原子形状因子使用：
//!
//! f(s) = Z - 41.78214 · s² · Σᵢ aᵢ exp(-bᵢ s²)
//! 其中 s = sin(θ)/λ = |g|/2
//!
//! 数据打包为 JSON 资源，进程内首次使用时解析一次，此后只读。
//! 表中没有的元素是致命错误：一个元素缺失会使整个结构的
//! 结构因子失效。
//!
//! ## 数据来源
//! Structure of Materials, Marc De Graef & Michael E. McHenry, Appendix
//!
//! ## 依赖关系
//! - 被 `xrd/calculator.rs` 调用
//! - 使用 `serde_json` 解析打包数据

use serde::Deserialize;
use std::collections::HashMap;
use std::sync::LazyLock;

use crate::error::{Result, XtalkitError};

/// 单个元素的散射参数
#[derive(Debug, Clone, Deserialize)]
pub struct ScatteringParams {
    /// 原子序数
    pub z: f64,
    /// 高斯拟合系数对 (aᵢ, bᵢ)
    pub coeffs: [[f64; 2]; 4],
}

impl ScatteringParams {
    /// 原子形状因子 f(s)，s = sin(θ)/λ
    pub fn form_factor(&self, s: f64) -> f64 {
        let s2 = s * s;
        let series: f64 = self
            .coeffs
            .iter()
            .map(|[a, b]| a * (-b * s2).exp())
            .sum();
        self.z - 41.78214 * s2 * series
    }
}

/// 打包的散射参数表，首次访问时解析
static SCATTERING_PARAMS: LazyLock<HashMap<String, ScatteringParams>> = LazyLock::new(|| {
    serde_json::from_str(include_str!("../../data/atomic_scattering_params.json"))
        .expect("embedded atomic_scattering_params.json must be well-formed")
});

/// 查询元素的散射参数；表中没有的元素返回错误
pub fn lookup(element: &str) -> Result<&'static ScatteringParams> {
    SCATTERING_PARAMS
        .get(element)
        .ok_or_else(|| XtalkitError::MissingScatteringData {
            element: element.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_loads() {
        assert!(SCATTERING_PARAMS.len() >= 40);
    }

    #[test]
    fn test_lookup_si() {
        let params = lookup("Si").unwrap();
        assert!((params.z - 14.0).abs() < 1e-12);
    }

    #[test]
    fn test_lookup_missing_element_is_fatal() {
        assert!(matches!(
            lookup("U"),
            Err(XtalkitError::MissingScatteringData { .. })
        ));
    }

    #[test]
    fn test_form_factor_at_zero_equals_z() {
        // s = 0 时级数项消失，f(0) = Z
        for symbol in ["C", "Si", "Fe", "Cu", "Cs"] {
            let params = lookup(symbol).unwrap();
            assert!((params.form_factor(0.0) - params.z).abs() < 1e-12);
        }
    }

    #[test]
    fn test_form_factor_decreases_with_s() {
        let params = lookup("Fe").unwrap();
        let f0 = params.form_factor(0.0);
        let f1 = params.form_factor(0.3);
        assert!(f1 < f0);
        assert!(f1 > 0.0);
    }
}
