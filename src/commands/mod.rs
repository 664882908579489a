//! # 命令执行模块
//!
//! 实现各子命令的业务逻辑。
//!
//! ## 依赖关系
//! - 被 `main.rs` 调用
//! - 使用 `cli/`, `models/`, `xrd/`, `utils/`
//! - 子模块: pattern, radiation

pub mod pattern;
pub mod radiation;

use crate::cli::Commands;
use crate::error::Result;

/// 执行命令
pub fn run(cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Pattern(args) => pattern::execute(args),
        Commands::Radiation => radiation::execute(),
    }
}
