//! # Miller 指数族分组
//!
//! 把一个衍射峰的全部贡献指数按符号/置换等价分组为对称等价族，
//! 族的大小即多重度。代表元取字典序最大的成员。
//!
//! ## 依赖关系
//! - 被 `xrd/calculator.rs` 调用
//! - 无外部模块依赖

use serde::Serialize;

/// Miller 指数：非六方 3 元组，六方 Miller–Bravais 4 元组
pub type Hkl = Vec<i32>;

/// 对称等价指数族
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HklFamily {
    /// 代表指数（族内字典序最大者）
    pub hkl: Hkl,
    /// 多重度（族内成员数）
    pub multiplicity: usize,
}

/// 两个指数是否符号/置换等价：绝对值排序后相同
fn is_equivalent(a: &[i32], b: &[i32]) -> bool {
    sorted_abs(a) == sorted_abs(b)
}

fn sorted_abs(hkl: &[i32]) -> Vec<i32> {
    let mut key: Vec<i32> = hkl.iter().map(|i| i.abs()).collect();
    key.sort_unstable();
    key
}

/// 线性扫描分组：每个指数并入首个等价组，否则开新组
pub fn unique_families(hkls: &[Hkl]) -> Vec<HklFamily> {
    let mut groups: Vec<Vec<&Hkl>> = Vec::new();

    for hkl in hkls {
        match groups
            .iter_mut()
            .find(|group| is_equivalent(group[0], hkl))
        {
            Some(group) => group.push(hkl),
            None => groups.push(vec![hkl]),
        }
    }

    groups
        .into_iter()
        .map(|group| HklFamily {
            hkl: (*group.iter().max().unwrap()).clone(),
            multiplicity: group.len(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cubic_100_family() {
        let hkls: Vec<Hkl> = vec![
            vec![1, 0, 0],
            vec![-1, 0, 0],
            vec![0, 1, 0],
            vec![0, -1, 0],
            vec![0, 0, 1],
            vec![0, 0, -1],
        ];
        let families = unique_families(&hkls);

        assert_eq!(families.len(), 1);
        assert_eq!(families[0].hkl, vec![1, 0, 0]);
        assert_eq!(families[0].multiplicity, 6);
    }

    #[test]
    fn test_mixed_families_preserve_counts() {
        // {300} 与 {221} 同峰不同族
        let hkls: Vec<Hkl> = vec![
            vec![3, 0, 0],
            vec![0, 3, 0],
            vec![2, 2, 1],
            vec![2, -2, 1],
            vec![-2, 2, 1],
            vec![1, 2, 2],
        ];
        let families = unique_families(&hkls);

        assert_eq!(families.len(), 2);
        let total: usize = families.iter().map(|f| f.multiplicity).sum();
        assert_eq!(total, hkls.len());

        let f300 = families.iter().find(|f| f.hkl == vec![3, 0, 0]).unwrap();
        assert_eq!(f300.multiplicity, 2);
        let f221 = families.iter().find(|f| f.hkl == vec![2, 2, 1]).unwrap();
        assert_eq!(f221.multiplicity, 4);
    }

    #[test]
    fn test_representative_is_lexicographic_max() {
        let hkls: Vec<Hkl> = vec![vec![-1, 0, 0], vec![0, 0, 1]];
        let families = unique_families(&hkls);
        assert_eq!(families[0].hkl, vec![0, 0, 1]);
    }

    #[test]
    fn test_four_index_tuples() {
        let hkls: Vec<Hkl> = vec![vec![1, 0, -1, 0], vec![0, 1, -1, 0], vec![-1, 1, 0, 0]];
        let families = unique_families(&hkls);
        assert_eq!(families.len(), 1);
        assert_eq!(families[0].multiplicity, 3);
        assert_eq!(families[0].hkl, vec![1, 0, -1, 0]);
    }
}
