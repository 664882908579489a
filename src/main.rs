//! # xtalkit CLI 入口
//!
//! 解析命令行并分发到 `commands/`。
//!
//! ## 子命令
//! - `pattern`   - 由命令行给出的结构计算 XRD 衍射图样
//! - `radiation` - 列出命名特征谱线

use clap::Parser;

use xtalkit::cli::Cli;
use xtalkit::{commands, utils};

fn main() {
    // Initialize colored output for Windows compatibility
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    let cli = Cli::parse();

    if let Err(e) = commands::run(cli.command) {
        utils::output::print_error(&format!("{}", e));
        std::process::exit(1);
    }
}
