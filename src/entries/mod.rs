//! # 热力学 entry 模块
//!
//! `Entry` 是「组成 + 能量」的最小能力集：要求 `composition()` 与
//! `energy()`，其余能力（每原子能量、归一化、等价判断、散列）都由
//! 这两个方法派生，不依赖类型继承。
//!
//! ## 依赖关系
//! - 使用 `models/composition.rs`
//! - 子模块: computed

pub mod computed;

pub use computed::{ComputedEntry, PdEntry};

use std::hash::{Hash, Hasher};

use crate::models::Composition;

/// 能量比较容差（等价判断用）
const ENERGY_TOL: f64 = 1e-8;

/// 归一化模式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NormalizationMode {
    /// 归一化到约化化学式单元
    FormulaUnit,
    /// 归一化到单原子
    Atom,
}

/// 组成与能量的容器能力集
pub trait Entry {
    /// 组成
    fn composition(&self) -> &Composition;

    /// 能量 (eV)
    fn energy(&self) -> f64;

    /// 每原子能量 (eV/atom)
    fn energy_per_atom(&self) -> f64 {
        self.energy() / self.composition().num_atoms()
    }

    /// 是否为单质 entry
    fn is_element(&self) -> bool {
        self.composition().is_element()
    }

    /// 化学式
    fn formula(&self) -> String {
        self.composition().formula()
    }

    /// 归一化因子
    fn normalization_factor(&self, mode: NormalizationMode) -> f64 {
        match mode {
            NormalizationMode::Atom => self.composition().num_atoms(),
            NormalizationMode::FormulaUnit => self.composition().reduced().1,
        }
    }

    /// 归一化后的 (组成, 能量)
    fn normalized(&self, mode: NormalizationMode) -> (Composition, f64) {
        let factor = self.normalization_factor(mode);
        (
            self.composition().scaled(1.0 / factor),
            self.energy() / factor,
        )
    }
}

/// 按组成与能量判断两个 entry 等价（能量容差 1e-8）
pub fn entries_equal(a: &dyn Entry, b: &dyn Entry) -> bool {
    (a.energy() - b.energy()).abs() < ENERGY_TOL && a.composition() == b.composition()
}

/// 与 `entries_equal` 一致的散列值：化学式 + 能量截断到 8 位小数
pub fn entry_hash(entry: &dyn Entry) -> u64 {
    let mut hasher = std::collections::hash_map::DefaultHasher::new();
    entry.formula().hash(&mut hasher);
    format!("{:.8}", entry.energy()).hash(&mut hasher);
    hasher.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    struct TestEntry {
        composition: Composition,
        energy: f64,
    }

    impl Entry for TestEntry {
        fn composition(&self) -> &Composition {
            &self.composition
        }

        fn energy(&self) -> f64 {
            self.energy
        }
    }

    fn fe2o3(energy: f64) -> TestEntry {
        TestEntry {
            composition: Composition::from_formula("Fe2O3").unwrap(),
            energy,
        }
    }

    #[test]
    fn test_energy_per_atom() {
        let entry = fe2o3(-10.0);
        assert!((entry.energy_per_atom() - (-2.0)).abs() < 1e-12);
    }

    #[test]
    fn test_normalized_per_formula_unit() {
        let entry = TestEntry {
            composition: Composition::from_formula("Fe4O6").unwrap(),
            energy: -20.0,
        };
        let (comp, energy) = entry.normalized(NormalizationMode::FormulaUnit);
        assert_eq!(comp.formula(), "Fe2O3");
        assert!((energy - (-10.0)).abs() < 1e-12);
    }

    #[test]
    fn test_normalized_per_atom() {
        let entry = fe2o3(-10.0);
        let (comp, energy) = entry.normalized(NormalizationMode::Atom);
        assert!((comp.num_atoms() - 1.0).abs() < 1e-12);
        assert!((energy - (-2.0)).abs() < 1e-12);
    }

    #[test]
    fn test_equality_by_composition_and_energy() {
        let a = fe2o3(-10.0);
        let b = fe2o3(-10.0);
        let c = fe2o3(-9.0);
        assert!(entries_equal(&a, &b));
        assert!(!entries_equal(&a, &c));

        let d = TestEntry {
            composition: Composition::from_formula("FeO").unwrap(),
            energy: -10.0,
        };
        assert!(!entries_equal(&a, &d));
    }

    #[test]
    fn test_hash_consistent_with_equality() {
        let a = fe2o3(-10.0);
        let b = fe2o3(-10.0);
        assert_eq!(entry_hash(&a), entry_hash(&b));
    }
}
