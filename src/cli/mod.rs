//! # CLI 模块
//!
//! 使用 `clap` 定义命令行参数和子命令。
//!
//! ## 命令结构
//! - `pattern`: 由命令行给出的结构计算 XRD 衍射图样
//! - `radiation`: 列出命名特征谱线
//!
//! ## 依赖关系
//! - 被 `main.rs` 使用
//! - 子模块: pattern

pub mod pattern;

use clap::{Parser, Subcommand};

/// xtalkit - 晶体学与谱学分析工具箱
#[derive(Parser)]
#[command(name = "xtalkit")]
#[command(author = "Changjiang Wu")]
#[command(version)]
#[command(about = "A crystallographic and spectral analysis toolkit for atomic structures", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// 可用的子命令
#[derive(Subcommand)]
pub enum Commands {
    /// Calculate the X-ray diffraction pattern of a structure given inline
    Pattern(pattern::PatternArgs),

    /// List the named characteristic radiation lines
    Radiation,
}
