// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{Category, Summary, Transaction, TransactionType};
use rust_decimal::Decimal;
use std::collections::BTreeMap;

/// Income, spending, investment and net balance over `txs`, plus spending per
/// category. Investment purchases are kept out of both `expense` and the
/// breakdown. Sums saturate at the `Decimal` bounds instead of overflowing.
pub fn summarize<'a, I>(txs: I) -> Summary
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let mut income = Decimal::ZERO;
    let mut expense = Decimal::ZERO;
    let mut investment = Decimal::ZERO;
    let mut category_breakdown: BTreeMap<Category, Decimal> = BTreeMap::new();

    for t in txs {
        match (t.r#type, t.category) {
            (TransactionType::Income, _) => income = income.saturating_add(t.amount),
            (TransactionType::Expense, Category::Investment) => {
                investment = investment.saturating_add(t.amount)
            }
            (TransactionType::Expense, cat) => {
                expense = expense.saturating_add(t.amount);
                let spent = category_breakdown.entry(cat).or_insert(Decimal::ZERO);
                *spent = spent.saturating_add(t.amount);
            }
        }
    }

    Summary {
        income,
        expense,
        investment,
        balance: income.saturating_sub(expense).saturating_sub(investment),
        category_breakdown,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartPoint {
    pub category: Category,
    pub label: &'static str,
    pub value: Decimal,
    pub share: Decimal,
    pub color: &'static str,
}

impl Summary {
    /// Breakdown rows for a pie chart, largest first. `share` is a percentage
    /// of total spending.
    pub fn chart_points(&self) -> Vec<ChartPoint> {
        let mut points: Vec<ChartPoint> = self
            .category_breakdown
            .iter()
            .map(|(cat, value)| ChartPoint {
                category: *cat,
                label: cat.label(),
                value: *value,
                share: if self.expense.is_zero() {
                    Decimal::ZERO
                } else {
                    value
                        .checked_div(self.expense)
                        .map_or(Decimal::ZERO, |r| r.saturating_mul(Decimal::ONE_HUNDRED))
                },
                color: cat.color(),
            })
            .collect();
        points.sort_by(|a, b| b.value.cmp(&a.value).then(a.category.cmp(&b.category)));
        points
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn tx(ty: TransactionType, category: Category, amount: Decimal) -> Transaction {
        Transaction {
            id: 0,
            date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            item: "x".into(),
            category,
            amount,
            r#type: ty,
            note: None,
            units: None,
            slip_image: None,
        }
    }

    #[test]
    fn empty_input_is_all_zero() {
        let s = summarize(std::iter::empty());
        assert_eq!(s.income, Decimal::ZERO);
        assert_eq!(s.expense, Decimal::ZERO);
        assert_eq!(s.investment, Decimal::ZERO);
        assert_eq!(s.balance, Decimal::ZERO);
        assert!(s.category_breakdown.is_empty());
        assert!(s.chart_points().is_empty());
    }

    #[test]
    fn investment_is_separate_from_expense() {
        let txs = vec![
            tx(TransactionType::Income, Category::Salary, dec!(1000)),
            tx(TransactionType::Expense, Category::Food, dec!(120.50)),
            tx(TransactionType::Expense, Category::Food, dec!(30)),
            tx(TransactionType::Expense, Category::Transport, dec!(49.5)),
            tx(TransactionType::Expense, Category::Investment, dec!(500)),
        ];
        let s = summarize(&txs);
        assert_eq!(s.income, dec!(1000));
        assert_eq!(s.expense, dec!(200));
        assert_eq!(s.investment, dec!(500));
        assert_eq!(s.balance, dec!(300));
        assert_eq!(s.category_breakdown.len(), 2);
        assert_eq!(s.category_breakdown[&Category::Food], dec!(150.50));
        assert!(!s.category_breakdown.contains_key(&Category::Investment));
    }

    #[test]
    fn chart_points_are_sorted_with_shares() {
        let txs = vec![
            tx(TransactionType::Expense, Category::Food, dec!(25)),
            tx(TransactionType::Expense, Category::Housing, dec!(75)),
        ];
        let points = summarize(&txs).chart_points();
        assert_eq!(points[0].category, Category::Housing);
        assert_eq!(points[0].share, dec!(75));
        assert_eq!(points[1].color, "#FF6B6B");
    }

    #[test]
    fn sums_near_decimal_max_saturate() {
        let txs = vec![
            tx(TransactionType::Income, Category::Salary, Decimal::MAX),
            tx(TransactionType::Income, Category::Bonus, Decimal::MAX),
            tx(TransactionType::Expense, Category::Food, Decimal::MAX),
            tx(TransactionType::Expense, Category::Food, Decimal::MAX),
            tx(TransactionType::Expense, Category::Investment, Decimal::MAX),
        ];
        let s = summarize(&txs);
        assert_eq!(s.income, Decimal::MAX);
        assert_eq!(s.expense, Decimal::MAX);
        assert_eq!(s.category_breakdown[&Category::Food], Decimal::MAX);
        assert_eq!(s.balance, Decimal::MIN);
        assert_eq!(s.chart_points()[0].share, dec!(100));
    }
}
