// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::models::SkuReport;

pub const NOT_APPLICABLE: &str = "N/A";

/// Units sold as a share of units ordered, rounded to one decimal place.
/// `None` when the ordered quantity is untracked or zero.
pub fn sell_through(r: &SkuReport) -> Option<Decimal> {
    let ordered = r.ordered_quantity.filter(|q| *q > 0)?;
    let pct = Decimal::from(r.total_quantity_sold) * Decimal::ONE_HUNDRED / Decimal::from(ordered);
    Some(pct.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero))
}

pub fn fmt_percent(v: Option<Decimal>) -> String {
    match v {
        Some(p) => format!("{:.1}%", p),
        None => NOT_APPLICABLE.to_string(),
    }
}

pub fn fmt_money(d: Decimal) -> String {
    let d = d.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    if d.is_sign_negative() && !d.is_zero() {
        format!("-${:.2}", d.abs())
    } else {
        format!("${:.2}", d.abs())
    }
}

/// Untracked amounts are not the same as zero and must never render as `$0.00`.
pub fn fmt_optional_money(d: Option<Decimal>) -> String {
    d.map(fmt_money)
        .unwrap_or_else(|| NOT_APPLICABLE.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn money_pads_and_rounds() {
        assert_eq!(fmt_money(Decimal::new(5, 0)), "$5.00");
        assert_eq!(fmt_money(Decimal::new(12345, 3)), "$12.35");
        assert_eq!(fmt_money(Decimal::new(-250, 2)), "-$2.50");
    }

    #[test]
    fn percent_keeps_one_digit() {
        assert_eq!(fmt_percent(Some(Decimal::new(75, 0))), "75.0%");
        assert_eq!(fmt_percent(None), "N/A");
    }
}
