//! # pattern 子命令实现
//!
//! 从命令行参数组装晶体结构并计算 X 射线衍射图样。
//!
//! ## 功能
//! - 晶格参数或晶格向量两种输入形式
//! - 位点合并：相同分数坐标的多个物种并入同一位点（部分占据）
//! - rayon 线程池并行计算
//! - 终端表格（tabled）或 stdout CSV 输出
//!
//! ## 依赖关系
//! - 使用 `cli/pattern.rs` 定义的 PatternArgs 与解析函数
//! - 使用 `xrd/` 模块进行计算
//! - 使用 `models/structure.rs` 组装结构

use std::collections::HashMap;
use std::io;

use crate::cli::pattern::{
    parse_debye_waller, parse_lattice, parse_range, parse_site, parse_vectors, OutputFormat,
    PatternArgs,
};
use crate::error::{Result, XtalkitError};
use crate::models::{Crystal, Lattice, Site, Species};
use crate::utils::{output, progress};
use crate::xrd::{DiffractionPattern, HklFamily, Wavelength, XrdCalculator};

/// 位点合并时的坐标容差
const POSITION_TOL: f64 = 1e-8;

/// 执行 pattern 命令
pub fn execute(args: PatternArgs) -> Result<()> {
    output::print_header("X-Ray Diffraction Pattern Calculation");

    let lattice = match (&args.lattice, &args.vectors) {
        (Some(spec), _) => parse_lattice(spec)?,
        (None, Some(spec)) => parse_vectors(spec)?,
        (None, None) => {
            return Err(XtalkitError::InvalidArgument(
                "Either --lattice or --vectors is required".to_string(),
            ))
        }
    };

    let crystal = build_crystal(&args.name, lattice, &args.sites)?;
    output::print_success(&format!(
        "Assembled structure: {} ({} sites)",
        crystal.formula(),
        crystal.sites.len()
    ));

    let wavelength = Wavelength::parse(&args.wavelength)?;
    output::print_info(&format!(
        "Using wavelength: {:.4} Å ({})",
        wavelength.resolve()?,
        wavelength
    ));

    let range = parse_range(&args.range)?;
    match range {
        Some((lo, hi)) => output::print_info(&format!("2θ range: {:.1}° - {:.1}°", lo, hi)),
        None => output::print_info("2θ range: full limiting sphere"),
    }

    let mut dw_factors = HashMap::new();
    for spec in &args.debye_waller {
        let (element, factor) = parse_debye_waller(spec)?;
        dw_factors.insert(element, factor);
    }

    let calculator = XrdCalculator::new(wavelength)?.with_debye_waller_factors(dw_factors);

    // 线程池按 --jobs 配置，计算器内部的并行迭代继承它
    let jobs = if args.jobs == 0 {
        num_cpus::get()
    } else {
        args.jobs
    };
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(jobs)
        .build()
        .map_err(|e| XtalkitError::Other(e.to_string()))?;

    let spinner = progress::create_spinner("Computing diffraction pattern...");
    let pattern = pool.install(|| calculator.get_pattern(&crystal, !args.unscaled, range));
    spinner.finish_and_clear();
    let pattern = pattern?;

    if pattern.peaks.is_empty() {
        output::print_warning("No diffraction peaks in the requested range");
        return Ok(());
    }

    output::print_success(&format!(
        "Calculated {} diffraction peaks",
        pattern.peaks.len()
    ));

    match args.format {
        OutputFormat::Table => print_peak_table(&pattern, args.top),
        OutputFormat::Csv => write_csv(&pattern, args.top)?,
    }

    Ok(())
}

/// 组装晶体：相同分数坐标的位点声明并入同一位点
fn build_crystal(name: &str, lattice: Lattice, site_specs: &[String]) -> Result<Crystal> {
    let mut sites: Vec<Site> = Vec::new();

    for spec in site_specs {
        let (element, position, occupancy) = parse_site(spec)?;
        let species = Species {
            element,
            occupancy,
        };

        match sites.iter_mut().find(|site| {
            site.position
                .iter()
                .zip(position.iter())
                .all(|(a, b)| (a - b).abs() < POSITION_TOL)
        }) {
            Some(site) => site.species.push(species),
            None => sites.push(Site {
                species: vec![species],
                position,
                label: None,
            }),
        }
    }

    Ok(Crystal::new(name, lattice, sites))
}

/// 峰位表格
fn print_peak_table(pattern: &DiffractionPattern, top: usize) {
    use tabled::{Table, Tabled};

    #[derive(Tabled)]
    struct PeakRow {
        #[tabled(rename = "2θ (°)")]
        two_theta: String,
        #[tabled(rename = "d (Å)")]
        d_spacing: String,
        #[tabled(rename = "I")]
        intensity: String,
        #[tabled(rename = "{hkl} × mult")]
        families: String,
    }

    let count = if top == 0 { pattern.peaks.len() } else { top };
    let rows: Vec<PeakRow> = pattern
        .peaks
        .iter()
        .take(count)
        .map(|p| PeakRow {
            two_theta: format!("{:.3}", p.two_theta),
            d_spacing: format!("{:.4}", p.d_spacing),
            intensity: format!("{:.2}", p.intensity),
            families: p
                .families
                .iter()
                .map(format_family)
                .collect::<Vec<_>>()
                .join(", "),
        })
        .collect();

    if !rows.is_empty() {
        output::print_header(&format!("{} — {} peaks", pattern.structure_name, rows.len()));
        let table = Table::new(&rows);
        println!("{}", table);
    }
}

/// CSV 输出到 stdout：每个指数族一行
fn write_csv(pattern: &DiffractionPattern, top: usize) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(io::stdout());

    wtr.write_record(["2theta", "d_spacing", "intensity", "hkl", "multiplicity"])?;

    let count = if top == 0 { pattern.peaks.len() } else { top };
    for peak in pattern.peaks.iter().take(count) {
        for family in &peak.families {
            wtr.write_record(&[
                format!("{:.4}", peak.two_theta),
                format!("{:.6}", peak.d_spacing),
                format!("{:.4}", peak.intensity),
                family
                    .hkl
                    .iter()
                    .map(|i| i.to_string())
                    .collect::<Vec<_>>()
                    .join(" "),
                family.multiplicity.to_string(),
            ])?;
        }
    }

    wtr.flush().map_err(|e| XtalkitError::Other(e.to_string()))?;
    Ok(())
}

/// "(h k l) × mult"
fn format_family(family: &HklFamily) -> String {
    let indices = family
        .hkl
        .iter()
        .map(|i| i.to_string())
        .collect::<Vec<_>>()
        .join(" ");
    format!("({}) ×{}", indices, family.multiplicity)
}
