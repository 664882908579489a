//! # radiation 子命令实现
//!
//! 列出可用的命名特征谱线及其波长。
//!
//! ## 依赖关系
//! - 使用 `xrd/radiation.rs` 的波长表
//! - 使用 `utils/output.rs`

use tabled::{Table, Tabled};

use crate::error::Result;
use crate::utils::output;
use crate::xrd::radiation::WAVELENGTHS;

/// 执行 radiation 命令
pub fn execute() -> Result<()> {
    #[derive(Tabled)]
    struct LineRow {
        #[tabled(rename = "Line")]
        name: &'static str,
        #[tabled(rename = "Wavelength (Å)")]
        wavelength: String,
    }

    let rows: Vec<LineRow> = WAVELENGTHS
        .iter()
        .map(|&(name, wl)| LineRow {
            name,
            wavelength: format!("{:.6}", wl),
        })
        .collect();

    output::print_header("Named characteristic radiation lines");
    let table = Table::new(&rows);
    println!("{}", table);

    Ok(())
}
