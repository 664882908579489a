//! # xtalkit - 晶体学与谱学分析工具箱
//!
//! 对原子结构做晶体学、热力学与谱学分析；核心是 X 射线衍射
//! 图样计算器。既可作为库使用，也提供 CLI（见 `main.rs`）。
//!
//! ## 依赖关系
//! ```text
//! lib.rs
//!   ├── cli/        (命令行参数定义)
//!   ├── commands/   (命令执行逻辑)
//!   ├── models/     (晶格、结构、组成数据模型)
//!   ├── entries/    (组成 + 能量容器能力集)
//!   ├── symmetry/   (对称性精修接口)
//!   ├── xrd/        (衍射图样计算核心)
//!   ├── utils/      (终端输出工具)
//!   └── error.rs    (错误处理)
//! ```

pub mod cli;
pub mod commands;
pub mod entries;
pub mod error;
pub mod models;
pub mod symmetry;
pub mod utils;
pub mod xrd;

pub use error::{Result, XtalkitError};
