//! # pattern 子命令 CLI 定义
//!
//! 结构完全由命令行参数给出：晶格参数（或晶格向量）加若干位点，
//! 不经过任何结构文件格式。
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/pattern.rs`
//! - 解析产物使用 `models/structure.rs`

use clap::{Args, ValueEnum};

use crate::error::{Result, XtalkitError};
use crate::models::Lattice;

/// 输出格式
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum OutputFormat {
    /// Peak table on the terminal
    Table,
    /// CSV rows on stdout (2theta, d, intensity, hkl, multiplicity)
    Csv,
}

/// pattern 子命令参数
#[derive(Args, Debug)]
pub struct PatternArgs {
    /// Lattice parameters: a,b,c,alpha,beta,gamma (angstrom, degrees)
    #[arg(
        short,
        long,
        value_name = "A,B,C,ALPHA,BETA,GAMMA",
        required_unless_present = "vectors",
        conflicts_with = "vectors"
    )]
    pub lattice: Option<String>,

    /// Lattice vectors: nine comma-separated components (rows a, b, c)
    #[arg(long, value_name = "AX,AY,AZ,BX,BY,BZ,CX,CY,CZ")]
    pub vectors: Option<String>,

    /// Site spec El:x,y,z[:occupancy]; repeat per species, shared positions merge into one site
    #[arg(short, long = "site", value_name = "EL:X,Y,Z[:OCCU]", required = true)]
    pub sites: Vec<String>,

    /// Structure name used in output headers
    #[arg(long, default_value = "structure")]
    pub name: String,

    /// X-ray wavelength: named line (CuKa, MoKa1, ...) or value in angstrom
    #[arg(short, long, default_value = "CuKa")]
    pub wavelength: String,

    /// 2theta range in degrees (e.g. "0-90"), or "none" for the full limiting sphere
    #[arg(short, long, default_value = "0-90")]
    pub range: String,

    /// Report absolute intensities instead of scaling the maximum peak to 100
    #[arg(long, default_value_t = false)]
    pub unscaled: bool,

    /// Debye-Waller factor EL=B; repeat per element
    #[arg(long = "debye-waller", value_name = "EL=B")]
    pub debye_waller: Vec<String>,

    /// Number of parallel jobs (0 = auto)
    #[arg(short, long, default_value_t = 0)]
    pub jobs: usize,

    /// Number of top peaks to print (0 = all)
    #[arg(long, default_value_t = 0)]
    pub top: usize,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

/// 解析晶格参数形式 "a,b,c,alpha,beta,gamma"
pub fn parse_lattice(spec: &str) -> Result<Lattice> {
    let values = parse_floats(spec, 6, "lattice")?;
    Ok(Lattice::from_parameters(
        values[0], values[1], values[2], values[3], values[4], values[5],
    ))
}

/// 解析晶格向量形式（9 个分量，行优先 a, b, c）
pub fn parse_vectors(spec: &str) -> Result<Lattice> {
    let v = parse_floats(spec, 9, "vectors")?;
    Ok(Lattice::from_vectors([
        [v[0], v[1], v[2]],
        [v[3], v[4], v[5]],
        [v[6], v[7], v[8]],
    ]))
}

/// 解析位点 "El:x,y,z[:occupancy]" 为 (元素, 分数坐标, 占据率)
pub fn parse_site(spec: &str) -> Result<(String, [f64; 3], f64)> {
    let parts: Vec<&str> = spec.split(':').collect();
    if parts.len() != 2 && parts.len() != 3 {
        return Err(XtalkitError::InvalidArgument(format!(
            "Invalid site '{}'. Expected EL:X,Y,Z[:OCCU]",
            spec
        )));
    }

    let element = parts[0].trim();
    if element.is_empty() || !element.chars().next().unwrap().is_ascii_uppercase() {
        return Err(XtalkitError::InvalidArgument(format!(
            "Invalid element symbol in site '{}'",
            spec
        )));
    }

    let coords = parse_floats(parts[1], 3, "site position")?;
    let occupancy = if parts.len() == 3 {
        parts[2].trim().parse::<f64>().map_err(|_| {
            XtalkitError::InvalidArgument(format!("Invalid occupancy in site '{}'", spec))
        })?
    } else {
        1.0
    };

    Ok((
        element.to_string(),
        [coords[0], coords[1], coords[2]],
        occupancy,
    ))
}

/// 解析 2θ 范围："lo-hi" 或 "none"（完整限制球）
pub fn parse_range(spec: &str) -> Result<Option<(f64, f64)>> {
    if spec.eq_ignore_ascii_case("none") {
        return Ok(None);
    }

    let parts: Vec<&str> = spec.split('-').collect();
    if parts.len() != 2 {
        return Err(XtalkitError::InvalidRange(spec.to_string()));
    }

    let min: f64 = parts[0]
        .trim()
        .parse()
        .map_err(|_| XtalkitError::InvalidRange(spec.to_string()))?;
    let max: f64 = parts[1]
        .trim()
        .parse()
        .map_err(|_| XtalkitError::InvalidRange(spec.to_string()))?;

    if min < 0.0 || max <= min || max > 180.0 {
        return Err(XtalkitError::InvalidRange(format!(
            "{} (must be 0 <= min < max <= 180)",
            spec
        )));
    }

    Ok(Some((min, max)))
}

/// 解析 Debye-Waller 因子 "El=B"
pub fn parse_debye_waller(spec: &str) -> Result<(String, f64)> {
    let (element, value) = spec.split_once('=').ok_or_else(|| {
        XtalkitError::InvalidArgument(format!(
            "Invalid Debye-Waller spec '{}'. Expected EL=B",
            spec
        ))
    })?;
    let factor = value.trim().parse::<f64>().map_err(|_| {
        XtalkitError::InvalidArgument(format!("Invalid Debye-Waller value in '{}'", spec))
    })?;
    Ok((element.trim().to_string(), factor))
}

/// 解析逗号分隔的定长浮点列表
fn parse_floats(spec: &str, expected: usize, what: &str) -> Result<Vec<f64>> {
    let values: std::result::Result<Vec<f64>, _> = spec
        .split(',')
        .map(|part| part.trim().parse::<f64>())
        .collect();
    match values {
        Ok(values) if values.len() == expected => Ok(values),
        _ => Err(XtalkitError::InvalidArgument(format!(
            "Invalid {} '{}': expected {} comma-separated numbers",
            what, spec, expected
        ))),
    }
}
