//! # 晶体结构数据模型
//!
//! 定义统一的晶体结构表示：晶格、位点（含部分占据）与晶体。
//!
//! ## 依赖关系
//! - 被 `xrd/` 和 `commands/` 使用
//! - 使用 `models/composition.rs` 计算化学组成

use serde::{Deserialize, Serialize};

use crate::models::Composition;

/// 判定六方晶格的角度容差（度）
const HEX_ANGLE_TOL: f64 = 5.0;
/// 判定六方晶格的长度容差（Å）
const HEX_LENGTH_TOL: f64 = 0.01;

/// 晶格参数表示
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lattice {
    /// 晶格向量矩阵 (3x3)，行向量表示 a, b, c
    /// [[a1, a2, a3], [b1, b2, b3], [c1, c2, c3]]
    pub matrix: [[f64; 3]; 3],
}

impl Lattice {
    /// 从晶格参数 (a, b, c, alpha, beta, gamma) 创建晶格
    /// 角度单位：度
    pub fn from_parameters(a: f64, b: f64, c: f64, alpha: f64, beta: f64, gamma: f64) -> Self {
        let alpha_rad = alpha.to_radians();
        let beta_rad = beta.to_radians();
        let gamma_rad = gamma.to_radians();

        // 计算晶格向量
        let cos_alpha = alpha_rad.cos();
        let cos_beta = beta_rad.cos();
        let cos_gamma = gamma_rad.cos();
        let sin_gamma = gamma_rad.sin();

        let a_vec = [a, 0.0, 0.0];
        let b_vec = [b * cos_gamma, b * sin_gamma, 0.0];

        let c1 = c * cos_beta;
        let c2 = c * (cos_alpha - cos_beta * cos_gamma) / sin_gamma;
        let c3 = (c * c - c1 * c1 - c2 * c2).sqrt();
        let c_vec = [c1, c2, c3];

        Lattice {
            matrix: [a_vec, b_vec, c_vec],
        }
    }

    /// 从晶格向量矩阵创建
    pub fn from_vectors(matrix: [[f64; 3]; 3]) -> Self {
        Lattice { matrix }
    }

    /// 获取晶格参数 (a, b, c, alpha, beta, gamma)
    pub fn parameters(&self) -> (f64, f64, f64, f64, f64, f64) {
        let a_vec = self.matrix[0];
        let b_vec = self.matrix[1];
        let c_vec = self.matrix[2];

        let a = norm(&a_vec);
        let b = norm(&b_vec);
        let c = norm(&c_vec);

        let alpha = (dot(&b_vec, &c_vec) / (b * c)).acos().to_degrees();
        let beta = (dot(&a_vec, &c_vec) / (a * c)).acos().to_degrees();
        let gamma = (dot(&a_vec, &b_vec) / (a * b)).acos().to_degrees();

        (a, b, c, alpha, beta, gamma)
    }

    /// 计算晶格体积（有符号）
    pub fn volume(&self) -> f64 {
        let [a, b, c] = self.matrix;
        dot(&a, &cross(&b, &c))
    }

    /// 晶体学约定的倒易晶格（不含 2π 因子），|g| = 1/d
    ///
    /// b1 = (a2 × a3) / V, b2 = (a3 × a1) / V, b3 = (a1 × a2) / V
    pub fn reciprocal_lattice_crystallographic(&self) -> Lattice {
        let [a, b, c] = self.matrix;
        let volume = self.volume();

        let b1 = scale(&cross(&b, &c), 1.0 / volume);
        let b2 = scale(&cross(&c, &a), 1.0 / volume);
        let b3 = scale(&cross(&a, &b), 1.0 / volume);

        Lattice {
            matrix: [b1, b2, b3],
        }
    }

    /// 判断是否为六方晶格：两个 90° 角、一个 60°/120° 角，
    /// 且两条直角边等长
    pub fn is_hexagonal(&self) -> bool {
        let (a, b, c, alpha, beta, gamma) = self.parameters();
        let lengths = [a, b, c];
        let angles = [alpha, beta, gamma];

        let right: Vec<usize> = (0..3)
            .filter(|&i| (angles[i] - 90.0).abs() < HEX_ANGLE_TOL)
            .collect();
        let hex: Vec<usize> = (0..3)
            .filter(|&i| {
                (angles[i] - 60.0).abs() < HEX_ANGLE_TOL
                    || (angles[i] - 120.0).abs() < HEX_ANGLE_TOL
            })
            .collect();

        right.len() == 2
            && hex.len() == 1
            && (lengths[right[0]] - lengths[right[1]]).abs() < HEX_LENGTH_TOL
    }

    /// 枚举球内的全部晶格点：|h·v1 + k·v2 + l·v3| <= radius
    ///
    /// 每个整数指标的精确上界由对偶基向量给出：|m_i| <= radius · |d_i|，
    /// 其中 d_i = (v_j × v_k) / V。原点包含在返回结果中。
    pub fn points_in_sphere(&self, radius: f64) -> Vec<ReciprocalPoint> {
        let [v1, v2, v3] = self.matrix;
        let volume = self.volume();
        if volume.abs() < 1e-12 || radius <= 0.0 {
            return Vec::new();
        }

        let duals = [
            scale(&cross(&v2, &v3), 1.0 / volume),
            scale(&cross(&v3, &v1), 1.0 / volume),
            scale(&cross(&v1, &v2), 1.0 / volume),
        ];
        let bound = |i: usize| (radius * norm(&duals[i]) + 1e-8).floor() as i64;
        let (bh, bk, bl) = (bound(0), bound(1), bound(2));

        let mut points = Vec::new();
        for h in -bh..=bh {
            for k in -bk..=bk {
                for l in -bl..=bl {
                    let cart = [
                        h as f64 * v1[0] + k as f64 * v2[0] + l as f64 * v3[0],
                        h as f64 * v1[1] + k as f64 * v2[1] + l as f64 * v3[1],
                        h as f64 * v1[2] + k as f64 * v2[2] + l as f64 * v3[2],
                    ];
                    let g = norm(&cart);
                    if g <= radius {
                        points.push(ReciprocalPoint {
                            hkl: [h as f64, k as f64, l as f64],
                            g,
                        });
                    }
                }
            }
        }
        points
    }
}

/// 球内晶格点：浮点 Miller 指数与倒易矢量模长
#[derive(Debug, Clone, PartialEq)]
pub struct ReciprocalPoint {
    /// Miller 指数（来自枚举器的连续浮点表示）
    pub hkl: [f64; 3],
    /// 倒易矢量模长 |g| = 1/d
    pub g: f64,
}

/// 位点上的一种占据物种
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Species {
    /// 元素符号
    pub element: String,
    /// 占据率，(0, 1]
    pub occupancy: f64,
}

/// 晶体位点：一个分数坐标上的一种或多种占据物种
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Site {
    /// 占据物种列表；部分/无序占据时多于一个
    pub species: Vec<Species>,

    /// 分数坐标 [x, y, z]
    pub position: [f64; 3],

    /// 可选：位点标签（用于区分同种元素的不同位置）
    pub label: Option<String>,
}

impl Site {
    /// 完全占据的单物种位点
    pub fn new(element: impl Into<String>, position: [f64; 3]) -> Self {
        Site {
            species: vec![Species {
                element: element.into(),
                occupancy: 1.0,
            }],
            position,
            label: None,
        }
    }

    /// 部分/无序占据的位点
    pub fn partial<S: Into<String>>(species: Vec<(S, f64)>, position: [f64; 3]) -> Self {
        Site {
            species: species
                .into_iter()
                .map(|(element, occupancy)| Species {
                    element: element.into(),
                    occupancy,
                })
                .collect(),
            position,
            label: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

/// 晶体结构
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Crystal {
    /// 结构名称
    pub name: String,

    /// 晶格
    pub lattice: Lattice,

    /// 位点列表
    pub sites: Vec<Site>,

    /// 能量 (eV)
    pub energy: Option<f64>,

    /// 空间群
    pub space_group: Option<String>,
}

impl Crystal {
    pub fn new(name: impl Into<String>, lattice: Lattice, sites: Vec<Site>) -> Self {
        Crystal {
            name: name.into(),
            lattice,
            sites,
            energy: None,
            space_group: None,
        }
    }

    /// 化学组成（占据率加权）
    pub fn composition(&self) -> Composition {
        Composition::from_pairs(self.sites.iter().flat_map(|site| {
            site.species
                .iter()
                .map(|sp| (sp.element.clone(), sp.occupancy))
        }))
    }

    /// 化学式
    pub fn formula(&self) -> String {
        self.composition().formula()
    }

    /// 原子数（占据率之和）
    pub fn num_atoms(&self) -> f64 {
        self.sites
            .iter()
            .flat_map(|site| site.species.iter())
            .map(|sp| sp.occupancy)
            .sum()
    }
}

fn dot(a: &[f64; 3], b: &[f64; 3]) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

fn cross(a: &[f64; 3], b: &[f64; 3]) -> [f64; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

fn scale(v: &[f64; 3], s: f64) -> [f64; 3] {
    [v[0] * s, v[1] * s, v[2] * s]
}

fn norm(v: &[f64; 3]) -> f64 {
    dot(v, v).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lattice_from_parameters_cubic() {
        let lattice = Lattice::from_parameters(5.0, 5.0, 5.0, 90.0, 90.0, 90.0);
        let (a, b, c, alpha, beta, gamma) = lattice.parameters();

        assert!((a - 5.0).abs() < 1e-6);
        assert!((b - 5.0).abs() < 1e-6);
        assert!((c - 5.0).abs() < 1e-6);
        assert!((alpha - 90.0).abs() < 1e-6);
        assert!((beta - 90.0).abs() < 1e-6);
        assert!((gamma - 90.0).abs() < 1e-6);
    }

    #[test]
    fn test_lattice_volume_cubic() {
        let lattice = Lattice::from_parameters(5.0, 5.0, 5.0, 90.0, 90.0, 90.0);
        let vol = lattice.volume().abs();

        // 5^3 = 125
        assert!((vol - 125.0).abs() < 1e-6);
    }

    #[test]
    fn test_reciprocal_lattice_cubic() {
        let lattice = Lattice::from_vectors([[5.0, 0.0, 0.0], [0.0, 5.0, 0.0], [0.0, 0.0, 5.0]]);
        let recip = lattice.reciprocal_lattice_crystallographic();
        let (a, b, c, _, _, _) = recip.parameters();

        // 晶体学约定：|b_i| = 1/a_i
        assert!((a - 0.2).abs() < 1e-12);
        assert!((b - 0.2).abs() < 1e-12);
        assert!((c - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_is_hexagonal() {
        let hexagonal = Lattice::from_parameters(3.0, 3.0, 5.0, 90.0, 90.0, 120.0);
        assert!(hexagonal.is_hexagonal());

        let cubic = Lattice::from_parameters(5.0, 5.0, 5.0, 90.0, 90.0, 90.0);
        assert!(!cubic.is_hexagonal());

        let orthorhombic = Lattice::from_parameters(3.0, 4.0, 5.0, 90.0, 90.0, 90.0);
        assert!(!orthorhombic.is_hexagonal());
    }

    #[test]
    fn test_points_in_sphere_cubic() {
        // 倒易晶格 |b_i| = 0.2；半径 0.45 内的点满足 h² + k² + l² <= 5.0625
        let lattice = Lattice::from_vectors([[5.0, 0.0, 0.0], [0.0, 5.0, 0.0], [0.0, 0.0, 5.0]]);
        let recip = lattice.reciprocal_lattice_crystallographic();
        let points = recip.points_in_sphere(0.45);

        // 范数平方 0..=5 的格点计数: 1 + 6 + 12 + 8 + 6 + 24 = 57
        assert_eq!(points.len(), 57);
        assert!(points.iter().any(|p| p.g == 0.0));
        assert!(points.iter().all(|p| p.g <= 0.45));
    }

    #[test]
    fn test_points_in_sphere_monotone_in_radius() {
        let lattice = Lattice::from_parameters(4.0, 5.0, 6.0, 90.0, 95.0, 103.0);
        let recip = lattice.reciprocal_lattice_crystallographic();

        let small = recip.points_in_sphere(0.4).len();
        let large = recip.points_in_sphere(0.8).len();
        assert!(large >= small);
    }

    #[test]
    fn test_crystal_formula() {
        let lattice = Lattice::from_parameters(5.0, 5.0, 5.0, 90.0, 90.0, 90.0);
        let sites = vec![
            Site::new("Na", [0.0, 0.0, 0.0]),
            Site::new("Na", [0.5, 0.5, 0.0]),
            Site::new("Na", [0.5, 0.0, 0.5]),
            Site::new("Na", [0.0, 0.5, 0.5]),
            Site::new("Cl", [0.5, 0.0, 0.0]),
            Site::new("Cl", [0.0, 0.5, 0.0]),
            Site::new("Cl", [0.0, 0.0, 0.5]),
            Site::new("Cl", [0.5, 0.5, 0.5]),
        ];
        let crystal = Crystal::new("NaCl", lattice, sites);

        assert_eq!(crystal.formula(), "Cl4Na4");
        assert!((crystal.num_atoms() - 8.0).abs() < 1e-12);
    }

    #[test]
    fn test_partial_site_num_atoms() {
        let lattice = Lattice::from_parameters(4.0, 4.0, 4.0, 90.0, 90.0, 90.0);
        let sites = vec![Site::partial(
            vec![("Fe", 0.5), ("Ni", 0.5)],
            [0.0, 0.0, 0.0],
        )];
        let crystal = Crystal::new("FeNi", lattice, sites);

        assert!((crystal.num_atoms() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_site_with_label() {
        let site = Site::new("Fe", [0.0, 0.0, 0.0]).with_label("Fe1");
        assert_eq!(site.label, Some("Fe1".to_string()));
    }
}
