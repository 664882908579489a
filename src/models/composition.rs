//! # 化学组成数据模型
//!
//! 元素符号到数量的映射，支持化学式解析与约化。
//!
//! ## 依赖关系
//! - 被 `models/structure.rs` 和 `entries/` 使用
//! - 无外部模块依赖

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{Result, XtalkitError};

/// 判定数量近似相等/近似整数的容差
const AMOUNT_TOL: f64 = 1e-8;

/// 化学组成：元素符号 → 数量
///
/// 数量允许非整数（占据率加权的组成）。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Composition {
    amounts: BTreeMap<String, f64>,
}

impl Composition {
    /// 从 (元素, 数量) 序列构造；同一元素累加，丢弃非正数量
    pub fn from_pairs<S, I>(pairs: I) -> Self
    where
        S: Into<String>,
        I: IntoIterator<Item = (S, f64)>,
    {
        let mut amounts: BTreeMap<String, f64> = BTreeMap::new();
        for (element, amount) in pairs {
            *amounts.entry(element.into()).or_insert(0.0) += amount;
        }
        amounts.retain(|_, amt| *amt > AMOUNT_TOL);
        Composition { amounts }
    }

    /// 解析化学式字符串，如 "Fe2O3"、"LiFePO4"、"Fe0.5Ni0.5"
    ///
    /// 仅支持平铺形式（不支持括号分组）。
    pub fn from_formula(formula: &str) -> Result<Self> {
        let mut pairs: Vec<(String, f64)> = Vec::new();
        let chars: Vec<char> = formula.trim().chars().collect();
        let mut i = 0;

        while i < chars.len() {
            if !chars[i].is_ascii_uppercase() {
                return Err(XtalkitError::InvalidArgument(format!(
                    "Cannot parse formula '{}': expected element symbol at position {}",
                    formula, i
                )));
            }
            let mut symbol = chars[i].to_string();
            i += 1;
            while i < chars.len() && chars[i].is_ascii_lowercase() {
                symbol.push(chars[i]);
                i += 1;
            }

            let start = i;
            while i < chars.len() && (chars[i].is_ascii_digit() || chars[i] == '.') {
                i += 1;
            }
            let amount = if start == i {
                1.0
            } else {
                chars[start..i]
                    .iter()
                    .collect::<String>()
                    .parse::<f64>()
                    .map_err(|_| {
                        XtalkitError::InvalidArgument(format!(
                            "Cannot parse formula '{}': bad amount for '{}'",
                            formula, symbol
                        ))
                    })?
            };
            pairs.push((symbol, amount));
        }

        if pairs.is_empty() {
            return Err(XtalkitError::InvalidArgument(format!(
                "Cannot parse formula '{}': empty",
                formula
            )));
        }
        Ok(Composition::from_pairs(pairs))
    }

    /// 指定元素的数量（缺失为 0）
    pub fn amount(&self, element: &str) -> f64 {
        self.amounts.get(element).copied().unwrap_or(0.0)
    }

    /// 所含元素（字母序）
    pub fn elements(&self) -> Vec<&str> {
        self.amounts.keys().map(String::as_str).collect()
    }

    /// 原子总数
    pub fn num_atoms(&self) -> f64 {
        self.amounts.values().sum()
    }

    /// 是否为单质
    pub fn is_element(&self) -> bool {
        self.amounts.len() == 1
    }

    /// 化学式字符串（字母序，数量为 1 时省略）
    pub fn formula(&self) -> String {
        self.amounts
            .iter()
            .map(|(el, amt)| format!("{}{}", el, format_amount(*amt)))
            .collect::<Vec<_>>()
            .join("")
    }

    /// 约化组成与约化因子：(约化组成, factor)
    ///
    /// 全部数量接近整数时取整数最大公约数，否则因子为 1。
    pub fn reduced(&self) -> (Composition, f64) {
        let mut ints: Vec<u64> = Vec::with_capacity(self.amounts.len());
        for amt in self.amounts.values() {
            let rounded = amt.round();
            if (amt - rounded).abs() > AMOUNT_TOL || rounded < 1.0 {
                return (self.clone(), 1.0);
            }
            ints.push(rounded as u64);
        }

        let factor = ints.iter().copied().fold(0, gcd);
        if factor <= 1 {
            return (self.clone(), 1.0);
        }
        (self.scaled(1.0 / factor as f64), factor as f64)
    }

    /// 约化化学式
    pub fn reduced_formula(&self) -> String {
        self.reduced().0.formula()
    }

    /// 全部数量乘以 factor
    pub fn scaled(&self, factor: f64) -> Composition {
        Composition {
            amounts: self
                .amounts
                .iter()
                .map(|(el, amt)| (el.clone(), amt * factor))
                .collect(),
        }
    }

    /// 逐元素数量比较（容差 AMOUNT_TOL）
    pub fn almost_equals(&self, other: &Composition) -> bool {
        if self.amounts.len() != other.amounts.len() {
            return false;
        }
        self.amounts
            .iter()
            .all(|(el, amt)| (other.amount(el) - amt).abs() < AMOUNT_TOL)
    }
}

impl PartialEq for Composition {
    fn eq(&self, other: &Self) -> bool {
        self.almost_equals(other)
    }
}

impl std::fmt::Display for Composition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.formula())
    }
}

/// 数量显示：1 省略，整数不带小数点，其余保留原值
fn format_amount(amount: f64) -> String {
    if (amount - 1.0).abs() < AMOUNT_TOL {
        String::new()
    } else if (amount - amount.round()).abs() < AMOUNT_TOL {
        format!("{}", amount.round() as i64)
    } else {
        format!("{}", amount)
    }
}

fn gcd(a: u64, b: u64) -> u64 {
    if b == 0 {
        a
    } else {
        gcd(b, a % b)
    }
}
