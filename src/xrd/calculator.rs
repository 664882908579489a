//! # XRD 衍射图样计算器
//!
//! 实现 X 射线衍射图样计算的核心算法。
//!
//! ## 算法概述
//! 1. 计算晶体学倒易晶格，枚举限制球内的全部倒易点
//! 2. 对每个倒易点由 Bragg 条件求衍射角：sin(θ) = λ|g|/2
//! 3. 对全部 (位点, 物种) 贡献求复数结构因子
//!    F = Σ f · occu · exp(2πi g·r) · exp(-B s²)
//! 4. 强度 I = F·F*，乘 Lorentz 极化因子
//!    P(θ) = (1 + cos²2θ) / (sin²θ cosθ)
//! 5. 2θ 容差内的峰合并，按对称等价族分组指数，过滤并归一化
//!
//! 倒易点彼此独立，用 rayon 并行求值；聚合按排定的枚举顺序
//! 串行执行，结果与逐点串行计算一致。
//!
//! ## 参考
//! - Structure of Materials, Marc De Graef & Michael E. McHenry, ch. 11-12
//!
//! ## 依赖关系
//! - 被 `commands/pattern.rs` 调用
//! - 使用 `models/structure.rs` 的 Crystal, Lattice
//! - 使用 `xrd/scattering.rs` 获取原子散射系数
//! - 使用 `xrd/families.rs` 分组 Miller 指数
//! - 使用 `symmetry/` 的精修接口

use num_complex::Complex64;
use rayon::prelude::*;
use serde::Serialize;
use std::collections::HashMap;
use std::f64::consts::PI;

use crate::error::{Result, XtalkitError};
use crate::models::{Crystal, ReciprocalPoint};
use crate::symmetry::StructureRefiner;
use crate::xrd::families::{unique_families, Hkl, HklFamily};
use crate::xrd::radiation::Wavelength;
use crate::xrd::scattering;

/// 峰合并使用的 2θ 容差（度）
pub const TWO_THETA_TOL: f64 = 1e-5;

/// 峰过滤阈值：相对最大峰的强度百分比须超过此值
pub const SCALED_INTENSITY_TOL: f64 = 1e-3;

/// 衍射峰
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiffractionPeak {
    /// 衍射角 2θ（度）
    pub two_theta: f64,
    /// 强度（scaled 时 0-100，否则为绝对值）
    pub intensity: f64,
    /// 贡献指数按对称等价分组后的族列表
    pub families: Vec<HklFamily>,
    /// d 间距（Å），d = 1/|g|
    pub d_spacing: f64,
}

/// XRD 衍射图谱：按 2θ 升序的峰列表
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiffractionPattern {
    pub peaks: Vec<DiffractionPeak>,
    /// 使用的波长（Å）
    pub wavelength: f64,
    /// 结构名称
    pub structure_name: String,
}

impl DiffractionPattern {
    /// 2θ 序列（度）
    pub fn two_thetas(&self) -> Vec<f64> {
        self.peaks.iter().map(|p| p.two_theta).collect()
    }

    /// 强度序列
    pub fn intensities(&self) -> Vec<f64> {
        self.peaks.iter().map(|p| p.intensity).collect()
    }

    /// 每个峰的指数族列表
    pub fn hkls(&self) -> Vec<&[HklFamily]> {
        self.peaks.iter().map(|p| p.families.as_slice()).collect()
    }

    /// d 间距序列（Å）
    pub fn d_spacings(&self) -> Vec<f64> {
        self.peaks.iter().map(|p| p.d_spacing).collect()
    }
}

/// 展平的 (位点, 物种) 贡献记录
struct SiteContribution {
    z: f64,
    coeffs: [[f64; 2]; 4],
    frac_coords: [f64; 3],
    occupancy: f64,
    dw_factor: f64,
}

/// 单个倒易点的求值结果
struct PointIntensity {
    two_theta: f64,
    intensity: f64,
    hkl: Hkl,
    d_spacing: f64,
}

/// 聚合中的峰：首见 2θ 为键
struct RawPeak {
    two_theta: f64,
    intensity: f64,
    hkls: Vec<Hkl>,
    d_spacing: f64,
}

/// XRD 计算器
pub struct XrdCalculator {
    /// X 射线波长（Å）
    wavelength: f64,
    /// 对称性精修精度；0 表示不精修
    symprec: f64,
    /// 每元素 Debye-Waller 因子，缺省 0
    debye_waller_factors: HashMap<String, f64>,
    /// 外部精修协作者
    refiner: Option<Box<dyn StructureRefiner + Send + Sync>>,
}

impl XrdCalculator {
    /// 创建计算器；未知谱线名或非正波长在此失败，不产生部分状态
    pub fn new(wavelength: Wavelength) -> Result<Self> {
        Ok(Self {
            wavelength: wavelength.resolve()?,
            symprec: 0.0,
            debye_waller_factors: HashMap::new(),
            refiner: None,
        })
    }

    pub fn with_symprec(mut self, symprec: f64) -> Self {
        self.symprec = symprec;
        self
    }

    pub fn with_debye_waller_factors(mut self, factors: HashMap<String, f64>) -> Self {
        self.debye_waller_factors = factors;
        self
    }

    pub fn with_refiner(mut self, refiner: Box<dyn StructureRefiner + Send + Sync>) -> Self {
        self.refiner = Some(refiner);
        self
    }

    /// 波长（Å）
    pub fn wavelength(&self) -> f64 {
        self.wavelength
    }

    /// 计算衍射图样
    ///
    /// - `scaled`: 把最大峰线性缩放到 100
    /// - `two_theta_range`: 2θ 窗口（度）；`None` 时取半径 2/λ 的完整限制球
    pub fn get_pattern(
        &self,
        crystal: &Crystal,
        scaled: bool,
        two_theta_range: Option<(f64, f64)>,
    ) -> Result<DiffractionPattern> {
        let refined;
        let crystal = if self.symprec > 0.0 && self.refiner.is_some() {
            refined = self
                .refiner
                .as_ref()
                .unwrap()
                .refine(crystal, self.symprec)?;
            &refined
        } else {
            crystal
        };

        let wavelength = self.wavelength;
        let is_hex = crystal.lattice.is_hexagonal();

        // Bragg 条件给出的倒易球窗口；|g| = 1/d
        let (min_r, max_r) = match two_theta_range {
            None => (0.0, 2.0 / wavelength),
            Some((lo, hi)) => (
                2.0 * (lo.to_radians() / 2.0).sin() / wavelength,
                2.0 * (hi.to_radians() / 2.0).sin() / wavelength,
            ),
        };

        let recip_lattice = crystal.lattice.reciprocal_lattice_crystallographic();
        let mut recip_pts = recip_lattice.points_in_sphere(max_r);
        if min_r > 0.0 {
            recip_pts.retain(|pt| pt.g >= min_r);
        }

        let contributions = self.site_contributions(crystal)?;

        // 枚举顺序：g 升序，其后 Miller 分量降序——峰合并的代表角由此确定
        recip_pts.sort_by(|a, b| {
            a.g.total_cmp(&b.g)
                .then(b.hkl[0].total_cmp(&a.hkl[0]))
                .then(b.hkl[1].total_cmp(&a.hkl[1]))
                .then(b.hkl[2].total_cmp(&a.hkl[2]))
        });

        let evaluated: Vec<Option<PointIntensity>> = recip_pts
            .par_iter()
            .map(|pt| self.evaluate_point(pt, &contributions, is_hex))
            .collect::<Result<Vec<_>>>()?;

        let raw_peaks = aggregate_peaks(evaluated.into_iter().flatten());

        Ok(assemble_pattern(
            raw_peaks,
            scaled,
            wavelength,
            crystal.name.clone(),
        ))
    }

    /// 展平结构为 (位点, 物种) 贡献记录；占据率与散射数据在此校验
    fn site_contributions(&self, crystal: &Crystal) -> Result<Vec<SiteContribution>> {
        let mut contributions = Vec::new();
        for site in &crystal.sites {
            for sp in &site.species {
                if !(sp.occupancy > 0.0 && sp.occupancy <= 1.0) {
                    return Err(XtalkitError::InvalidOccupancy {
                        element: sp.element.clone(),
                        occupancy: sp.occupancy,
                    });
                }
                let params = scattering::lookup(&sp.element)?;
                contributions.push(SiteContribution {
                    z: params.z,
                    coeffs: params.coeffs,
                    frac_coords: site.position,
                    occupancy: sp.occupancy,
                    dw_factor: self
                        .debye_waller_factors
                        .get(&sp.element)
                        .copied()
                        .unwrap_or(0.0),
                });
            }
        }
        Ok(contributions)
    }

    /// 单个倒易点的结构因子与强度；g = 0 的原点不参与
    fn evaluate_point(
        &self,
        pt: &ReciprocalPoint,
        contributions: &[SiteContribution],
        is_hex: bool,
    ) -> Result<Option<PointIntensity>> {
        if pt.g == 0.0 {
            return Ok(None);
        }

        // 枚举器给出连续浮点指数，物理上应落在整数上
        let h = pt.hkl[0].round() as i32;
        let k = pt.hkl[1].round() as i32;
        let l = pt.hkl[2].round() as i32;

        let theta = bragg_angle(pt.g, self.wavelength)?;
        let s = pt.g / 2.0;
        let s2 = s * s;

        let mut f_hkl = Complex64::new(0.0, 0.0);
        for c in contributions {
            let g_dot_r = h as f64 * c.frac_coords[0]
                + k as f64 * c.frac_coords[1]
                + l as f64 * c.frac_coords[2];

            let series: f64 = c.coeffs.iter().map(|[a, b]| a * (-b * s2).exp()).sum();
            let fs = c.z - 41.78214 * s2 * series;
            let dw_correction = (-c.dw_factor * s2).exp();

            f_hkl += Complex64::from_polar(1.0, 2.0 * PI * g_dot_r)
                * (fs * c.occupancy * dw_correction);
        }

        // I = F·F*；虚部解析为零，数值上取实部
        let i_hkl = (f_hkl * f_hkl.conj()).re;

        let lorentz_factor =
            (1.0 + (2.0 * theta).cos().powi(2)) / (theta.sin().powi(2) * theta.cos());

        let two_theta = (2.0 * theta).to_degrees();

        // 六方晶格记录 Miller–Bravais 4 指数，只影响显示与分组
        let hkl: Hkl = if is_hex {
            vec![h, k, -h - k, l]
        } else {
            vec![h, k, l]
        };

        Ok(Some(PointIntensity {
            two_theta,
            intensity: i_hkl * lorentz_factor,
            hkl,
            d_spacing: 1.0 / pt.g,
        }))
    }
}

/// Bragg 角 θ = asin(λ|g|/2)
///
/// λ|g|/2 > 1 意味着倒易点超出限制球。枚举半径本应排除这种点，
/// 出现即为逻辑错误而非用户输入问题。
fn bragg_angle(g: f64, wavelength: f64) -> Result<f64> {
    let sin_theta = wavelength * g / 2.0;
    if sin_theta > 1.0 {
        return Err(XtalkitError::BraggCondition { g, wavelength });
    }
    Ok(sin_theta.asin())
}

/// 按处理顺序聚合：在已见 2θ 中线性查找容差内的首个条目，
/// 命中则累加强度并追加指数，否则以新角度开新条目。
/// 合并簇的代表角是首个被处理的点，不取质心。
fn aggregate_peaks(points: impl Iterator<Item = PointIntensity>) -> Vec<RawPeak> {
    let mut two_thetas: Vec<f64> = Vec::new();
    let mut peaks: Vec<RawPeak> = Vec::new();

    for point in points {
        match two_thetas
            .iter()
            .position(|&t| (t - point.two_theta).abs() < TWO_THETA_TOL)
        {
            Some(idx) => {
                peaks[idx].intensity += point.intensity;
                peaks[idx].hkls.push(point.hkl);
            }
            None => {
                two_thetas.push(point.two_theta);
                peaks.push(RawPeak {
                    two_theta: point.two_theta,
                    intensity: point.intensity,
                    hkls: vec![point.hkl],
                    d_spacing: point.d_spacing,
                });
            }
        }
    }

    peaks
}

/// 过滤、分组、排序与归一化
fn assemble_pattern(
    mut raw_peaks: Vec<RawPeak>,
    scaled: bool,
    wavelength: f64,
    structure_name: String,
) -> DiffractionPattern {
    let max_intensity = raw_peaks
        .iter()
        .map(|p| p.intensity)
        .fold(0.0_f64, f64::max);

    raw_peaks.sort_by(|a, b| a.two_theta.total_cmp(&b.two_theta));

    let mut peaks = Vec::new();
    for raw in raw_peaks {
        if max_intensity > 0.0 && raw.intensity / max_intensity * 100.0 > SCALED_INTENSITY_TOL {
            peaks.push(DiffractionPeak {
                two_theta: raw.two_theta,
                intensity: raw.intensity,
                families: unique_families(&raw.hkls),
                d_spacing: raw.d_spacing,
            });
        }
    }

    if scaled && max_intensity > 0.0 {
        for peak in &mut peaks {
            peak.intensity *= 100.0 / max_intensity;
        }
    }

    DiffractionPattern {
        peaks,
        wavelength,
        structure_name,
    }
}
