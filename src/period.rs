// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Day / week / month windows around a reference date.

use crate::models::{SummaryPeriod, Transaction};
use chrono::{Datelike, Days, NaiveDate};

/// Inclusive `(start, end)` window containing `reference`.
///
/// Weeks run Sunday to Saturday.
pub fn period_bounds(reference: NaiveDate, period: SummaryPeriod) -> (NaiveDate, NaiveDate) {
    match period {
        SummaryPeriod::Day => (reference, reference),
        SummaryPeriod::Week => {
            let back = u64::from(reference.weekday().num_days_from_sunday());
            let start = reference - Days::new(back);
            (start, start + Days::new(6))
        }
        SummaryPeriod::Month => {
            let start = reference.with_day(1).unwrap_or(reference);
            let end = start
                .checked_add_months(chrono::Months::new(1))
                .and_then(|next| next.pred_opt())
                .unwrap_or(reference);
            (start, end)
        }
    }
}

pub fn in_period(date: NaiveDate, reference: NaiveDate, period: SummaryPeriod) -> bool {
    let (start, end) = period_bounds(reference, period);
    start <= date && date <= end
}

/// Transactions dated inside the window, in their original order.
pub fn filter_period(
    txs: &[Transaction],
    reference: NaiveDate,
    period: SummaryPeriod,
) -> Vec<&Transaction> {
    let (start, end) = period_bounds(reference, period);
    txs.iter()
        .filter(|t| start <= t.date && t.date <= end)
        .collect()
}
