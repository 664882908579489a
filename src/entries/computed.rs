//! # 具体 entry 类型
//!
//! `ComputedEntry`：计算得到的能量加可选修正项；
//! `PdEntry`：相图用的命名 entry。两者都只携带数据，
//! 能力全部来自 `Entry` trait。
//!
//! ## 依赖关系
//! - 被 `entries/mod.rs` 导出
//! - 使用 `models/composition.rs`

use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

use crate::entries::{entries_equal, entry_hash, Entry};
use crate::models::{Composition, Crystal};

/// 计算得到的 entry：未修正能量 + 修正项
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputedEntry {
    composition: Composition,
    /// 未修正能量 (eV)
    pub uncorrected_energy: f64,
    /// 能量修正项 (eV)，计入 `energy()`
    pub correction: f64,
}

impl ComputedEntry {
    pub fn new(composition: Composition, energy: f64) -> Self {
        ComputedEntry {
            composition,
            uncorrected_energy: energy,
            correction: 0.0,
        }
    }

    pub fn with_correction(mut self, correction: f64) -> Self {
        self.correction = correction;
        self
    }

    /// 从带能量的晶体结构构造
    pub fn from_crystal(crystal: &Crystal) -> Option<Self> {
        crystal
            .energy
            .map(|energy| ComputedEntry::new(crystal.composition(), energy))
    }
}

impl Entry for ComputedEntry {
    fn composition(&self) -> &Composition {
        &self.composition
    }

    fn energy(&self) -> f64 {
        self.uncorrected_energy + self.correction
    }
}

impl PartialEq for ComputedEntry {
    fn eq(&self, other: &Self) -> bool {
        entries_equal(self, other)
    }
}

impl Hash for ComputedEntry {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(entry_hash(self));
    }
}

/// 相图 entry：命名的组成-能量点
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PdEntry {
    composition: Composition,
    energy: f64,
    /// 显示名称（缺省为化学式）
    pub name: String,
}

impl PdEntry {
    pub fn new(composition: Composition, energy: f64) -> Self {
        let name = composition.formula();
        PdEntry {
            composition,
            energy,
            name,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

impl Entry for PdEntry {
    fn composition(&self) -> &Composition {
        &self.composition
    }

    fn energy(&self) -> f64 {
        self.energy
    }
}

impl PartialEq for PdEntry {
    fn eq(&self, other: &Self) -> bool {
        entries_equal(self, other)
    }
}

impl Hash for PdEntry {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(entry_hash(self));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Lattice, Site};

    #[test]
    fn test_computed_entry_correction() {
        let comp = Composition::from_formula("Fe2O3").unwrap();
        let entry = ComputedEntry::new(comp, -10.0).with_correction(-0.5);
        assert!((entry.energy() - (-10.5)).abs() < 1e-12);
        assert!((entry.uncorrected_energy - (-10.0)).abs() < 1e-12);
    }

    #[test]
    fn test_computed_entry_from_crystal() {
        let lattice = Lattice::from_parameters(4.0, 4.0, 4.0, 90.0, 90.0, 90.0);
        let mut crystal = Crystal::new(
            "Fe",
            lattice,
            vec![
                Site::new("Fe", [0.0, 0.0, 0.0]),
                Site::new("Fe", [0.5, 0.5, 0.5]),
            ],
        );
        assert!(ComputedEntry::from_crystal(&crystal).is_none());

        crystal.energy = Some(-16.0);
        let entry = ComputedEntry::from_crystal(&crystal).unwrap();
        assert!((entry.energy_per_atom() - (-8.0)).abs() < 1e-12);
    }

    #[test]
    fn test_pd_entry_name_defaults_to_formula() {
        let entry = PdEntry::new(Composition::from_formula("LiFePO4").unwrap(), -3.0);
        assert_eq!(entry.name, "FeLiO4P");

        let named = entry.with_name("olivine");
        assert_eq!(named.name, "olivine");
    }

    #[test]
    fn test_cross_type_equality_semantics() {
        let comp = Composition::from_formula("Fe2O3").unwrap();
        let a = ComputedEntry::new(comp.clone(), -10.0);
        let b = PdEntry::new(comp, -10.0);
        assert!(entries_equal(&a, &b));
        assert_eq!(entry_hash(&a), entry_hash(&b));
    }
}
