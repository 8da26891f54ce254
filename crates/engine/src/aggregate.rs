//! Pure aggregation of a day's line items into totals.
//!
//! This is deliberately a free function with no I/O: the totals of a record
//! depend only on its own lines, and computing them must not be a side effect
//! of saving the record.

use serde::{Deserialize, Serialize};

use crate::{ExpenseLine, LedgerError, MoneyCents, RevenueLine};

/// Derived totals for one day's record.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyTotals {
    pub money_in: MoneyCents,
    pub money_out: MoneyCents,
    pub daily_profit: MoneyCents,
}

/// Computes `money_in`, `money_out` and `daily_profit` from line items.
///
/// - `money_in` sums the positive revenue amounts.
/// - `money_out` sums the absolute value of negative revenue amounts plus all
///   expense amounts.
/// - `daily_profit = money_in - money_out`.
///
/// Fails with [`LedgerError::InvalidAmount`] if any expense amount is
/// negative, or on arithmetic overflow.
pub fn aggregate(
    revenue_lines: &[RevenueLine],
    expense_lines: &[ExpenseLine],
) -> Result<DailyTotals, LedgerError> {
    let overflow = || LedgerError::InvalidAmount("amount overflow".to_string());

    let mut money_in = MoneyCents::ZERO;
    let mut money_out = MoneyCents::ZERO;

    for line in revenue_lines {
        if line.amount.is_positive() {
            money_in = money_in.checked_add(line.amount).ok_or_else(overflow)?;
        } else {
            money_out = money_out
                .checked_add(line.amount.abs())
                .ok_or_else(overflow)?;
        }
    }

    for line in expense_lines {
        if line.amount.is_negative() {
            return Err(LedgerError::InvalidAmount(format!(
                "expense '{}' has a negative amount",
                line.description
            )));
        }
        money_out = money_out.checked_add(line.amount).ok_or_else(overflow)?;
    }

    let daily_profit = money_in.checked_sub(money_out).ok_or_else(overflow)?;

    Ok(DailyTotals {
        money_in,
        money_out,
        daily_profit,
    })
}
