//! # 数据模型模块
//!
//! 定义统一的晶体结构与化学组成数据模型。
//!
//! ## 依赖关系
//! - 被 `xrd/`、`entries/` 和 `commands/` 使用
//! - 子模块: composition, structure

pub mod composition;
pub mod structure;

pub use composition::Composition;
pub use structure::{Crystal, Lattice, ReciprocalPoint, Site, Species};
