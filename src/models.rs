// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Largest amount `tx add` accepts (1e15).
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(2764472320, 232830, 0, false, 0);
pub const AMOUNT_DP: u32 = 2;
/// Largest unit count `tx add` accepts (1e12).
pub const MAX_UNITS: Decimal = Decimal::from_parts(3567587328, 232, 0, false, 0);
pub const UNITS_DP: u32 = 8;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Username must be at least 4 characters")]
    ShortUsername,
    #[error("PIN must be exactly 6 digits")]
    BadPin,
    #[error("Display name is required")]
    MissingName,
    #[error("Item label is required")]
    MissingItem,
    #[error("Amount must be greater than zero, got {0}")]
    NonPositiveAmount(Decimal),
    #[error("Units must be greater than zero, got {0}")]
    NonPositiveUnits(Decimal),
    #[error("Amount {0} is out of range, expected at most 1000000000000000 with 2 decimal places")]
    AmountOutOfRange(Decimal),
    #[error("Units {0} are out of range, expected at most 1000000000000 with 8 decimal places")]
    UnitsOutOfRange(Decimal),
    #[error("Unknown category '{0}', see `category list`")]
    UnknownCategory(String),
    #[error("Unknown transaction type '{0}', expected income|expense")]
    UnknownType(String),
    #[error("Unknown period '{0}', expected day|week|month")]
    UnknownPeriod(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Income,
    Expense,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Income => "income",
            TransactionType::Expense => "expense",
        }
    }
}

impl FromStr for TransactionType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "income" => Ok(TransactionType::Income),
            "expense" => Ok(TransactionType::Expense),
            other => Err(ValidationError::UnknownType(other.to_string())),
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Closed set of transaction categories.
///
/// The stable key (`food`, `investment`, ...) is what gets stored and used for
/// grouping; the Thai label is only for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Food,
    Shopping,
    Transport,
    Vehicle,
    Housing,
    Internet,
    Investment,
    Salary,
    Bonus,
    Other,
}

impl Category {
    pub const ALL: [Category; 10] = [
        Category::Food,
        Category::Shopping,
        Category::Transport,
        Category::Vehicle,
        Category::Housing,
        Category::Internet,
        Category::Investment,
        Category::Salary,
        Category::Bonus,
        Category::Other,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Category::Food => "food",
            Category::Shopping => "shopping",
            Category::Transport => "transport",
            Category::Vehicle => "vehicle",
            Category::Housing => "housing",
            Category::Internet => "internet",
            Category::Investment => "investment",
            Category::Salary => "salary",
            Category::Bonus => "bonus",
            Category::Other => "other",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Category::Food => "ค่าอาหาร",
            Category::Shopping => "ช้อปปิ้ง",
            Category::Transport => "เดินทาง",
            Category::Vehicle => "ผ่อนรถ/ยานพาหนะ",
            Category::Housing => "ค่าบ้าน/หอพัก",
            Category::Internet => "เน็ต/โทรศัพท์",
            Category::Investment => "หุ้น/การลงทุน",
            Category::Salary => "เงินเดือน",
            Category::Bonus => "โบนัส",
            Category::Other => "อื่นๆ",
        }
    }

    /// Chart colour used by the presentation layer.
    pub fn color(&self) -> &'static str {
        match self {
            Category::Food => "#FF6B6B",
            Category::Shopping => "#FFD93D",
            Category::Transport => "#4D96FF",
            Category::Vehicle => "#6BCB77",
            Category::Housing => "#9A616D",
            Category::Internet => "#A8D8EA",
            Category::Investment => "#6C5CE7",
            Category::Salary => "#00B894",
            Category::Bonus => "#FDCB6E",
            Category::Other => "#B2BEC3",
        }
    }

    pub fn allows(&self, ty: TransactionType) -> bool {
        match self {
            Category::Salary | Category::Bonus => ty == TransactionType::Income,
            Category::Other => true,
            _ => ty == TransactionType::Expense,
        }
    }

    /// Like `from_str`, but anything unrecognized is `Other`. Used for stored rows.
    pub fn parse_lenient(s: &str) -> Category {
        s.parse().unwrap_or(Category::Other)
    }
}

/// Accepts a key (any case) or a display label.
impl FromStr for Category {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Category::ALL
            .into_iter()
            .find(|c| c.key().eq_ignore_ascii_case(s) || c.label() == s)
            .ok_or_else(|| ValidationError::UnknownCategory(s.to_string()))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SummaryPeriod {
    Day,
    Week,
    #[default]
    Month,
}

impl FromStr for SummaryPeriod {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "day" => Ok(SummaryPeriod::Day),
            "week" => Ok(SummaryPeriod::Week),
            "month" => Ok(SummaryPeriod::Month),
            other => Err(ValidationError::UnknownPeriod(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub date: NaiveDate,
    pub item: String,
    pub category: Category,
    pub amount: Decimal,
    pub r#type: TransactionType,
    pub note: Option<String>,
    pub units: Option<Decimal>,
    pub slip_image: Option<String>,
}

impl Transaction {
    /// Uppercased ticker, if this record can take part in portfolio valuation.
    pub fn holding_symbol(&self) -> Option<String> {
        if self.category != Category::Investment {
            return None;
        }
        let symbol = self.note.as_deref().map(str::trim).filter(|s| !s.is_empty())?;
        match self.units {
            Some(u) if u > Decimal::ZERO => Some(symbol.to_uppercase()),
            _ => None,
        }
    }
}

/// A transaction that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTransaction {
    pub date: NaiveDate,
    pub item: String,
    pub category: Category,
    pub amount: Decimal,
    pub r#type: TransactionType,
    pub note: Option<String>,
    pub units: Option<Decimal>,
    pub slip_image: Option<String>,
}

impl NewTransaction {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.item.trim().is_empty() {
            return Err(ValidationError::MissingItem);
        }
        if self.amount <= Decimal::ZERO {
            return Err(ValidationError::NonPositiveAmount(self.amount));
        }
        if !within(self.amount, MAX_AMOUNT, AMOUNT_DP) {
            return Err(ValidationError::AmountOutOfRange(self.amount));
        }
        if let Some(u) = self.units {
            if u <= Decimal::ZERO {
                return Err(ValidationError::NonPositiveUnits(u));
            }
            if !within(u, MAX_UNITS, UNITS_DP) {
                return Err(ValidationError::UnitsOutOfRange(u));
            }
        }
        Ok(())
    }
}

fn within(d: Decimal, max: Decimal, dp: u32) -> bool {
    d <= max && d.normalize().scale() <= dp
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub income: Decimal,
    pub expense: Decimal,
    pub investment: Decimal,
    pub balance: Decimal,
    pub category_breakdown: BTreeMap<Category, Decimal>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioItem {
    pub symbol: String,
    pub total_units: Decimal,
    pub total_cost: Decimal,
    pub avg_cost: Decimal,
    pub market_price: Decimal,
    pub market_value: Decimal,
    pub pl_amount: Decimal,
    pub pl_percentage: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioTotals {
    pub market_value: Decimal,
    pub total_cost: Decimal,
    pub pl_amount: Decimal,
    pub pl_percentage: Decimal,
}
