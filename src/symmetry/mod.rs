//! # 对称性精修接口
//!
//! 结构精修（spglib 一类的对称性分析）是外部协作者，这里只定义
//! 计算器消费它的窄接口。symprec = 0 表示不做精修。
//!
//! ## 依赖关系
//! - 被 `xrd/calculator.rs` 使用
//! - 使用 `models/structure.rs`

use crate::error::Result;
use crate::models::Crystal;

/// 结构精修协作者接口
pub trait StructureRefiner {
    /// 以给定对称性精度精修结构，返回精修后的副本
    fn refine(&self, crystal: &Crystal, symprec: f64) -> Result<Crystal>;
}

/// 恒等精修器：原样返回输入结构
pub struct IdentityRefiner;

impl StructureRefiner for IdentityRefiner {
    fn refine(&self, crystal: &Crystal, _symprec: f64) -> Result<Crystal> {
        Ok(crystal.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Lattice, Site};

    #[test]
    fn test_identity_refiner_returns_input() {
        let lattice = Lattice::from_parameters(4.0, 4.0, 4.0, 90.0, 90.0, 90.0);
        let crystal = Crystal::new("Fe", lattice, vec![Site::new("Fe", [0.0, 0.0, 0.0])]);

        let refined = IdentityRefiner.refine(&crystal, 1e-3).unwrap();
        assert_eq!(refined.name, crystal.name);
        assert_eq!(refined.sites.len(), crystal.sites.len());
    }
}
