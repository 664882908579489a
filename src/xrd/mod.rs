//! # XRD 计算模块
//!
//! 提供 X 射线衍射图样计算功能。
//!
//! ## 子模块
//! - `radiation`: 辐射源波长表与波长选择
//! - `scattering`: 原子散射系数表
//! - `families`: Miller 指数对称等价族分组
//! - `calculator`: XRD 衍射图样计算
//!
//! ## 依赖关系
//! - 被 `commands/pattern.rs` 使用
//! - 使用 `models/structure.rs` 与 `symmetry/`

pub mod calculator;
pub mod families;
pub mod radiation;
pub mod scattering;

pub use calculator::{DiffractionPattern, DiffractionPeak, XrdCalculator};
pub use families::{Hkl, HklFamily};
pub use radiation::Wavelength;
