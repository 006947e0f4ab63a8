//! Ledger domain types for journal creation and ledger reads.

use std::ops::Bound;

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use khata_shared::types::{JournalEntryId, OrganizationId, TransactionLineId};

use super::entry::{LineMeta, Side};
use super::error::LedgerError;

/// Largest debit/credit difference still treated as balanced.
pub const BALANCE_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 3);

/// Debit and credit sums of a set of lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalTotals {
    /// Sum of debit amounts.
    pub debit: Decimal,
    /// Sum of credit amounts.
    pub credit: Decimal,
}

impl JournalTotals {
    /// Sums `(side, amount)` pairs; `None` if either side overflows.
    pub fn from_lines(lines: impl IntoIterator<Item = (Side, Decimal)>) -> Option<Self> {
        lines
            .into_iter()
            .try_fold(Self::default(), |mut totals, (side, amount)| {
                match side {
                    Side::Debit => totals.debit = totals.debit.checked_add(amount)?,
                    Side::Credit => totals.credit = totals.credit.checked_add(amount)?,
                }
                Some(totals)
            })
    }

    /// Debits minus credits.
    #[must_use]
    pub fn difference(&self) -> Decimal {
        self.debit - self.credit
    }

    /// Whether the difference is within [`BALANCE_TOLERANCE`].
    #[must_use]
    pub fn is_balanced(&self) -> bool {
        self.difference().abs() <= BALANCE_TOLERANCE
    }
}

/// Half-open datetime range: `start` inclusive, `end` exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DateRange {
    /// Inclusive lower bound.
    pub start: Option<DateTime<Utc>>,
    /// Exclusive upper bound.
    pub end: Option<DateTime<Utc>>,
}

impl DateRange {
    /// No bounds.
    #[must_use]
    pub const fn unbounded() -> Self {
        Self {
            start: None,
            end: None,
        }
    }

    /// Builds a range from instants, rejecting `start > end`.
    pub fn new(start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> Result<Self, LedgerError> {
        if let (Some(s), Some(e)) = (start, end) {
            if s > e {
                return Err(LedgerError::InvalidDateRange { start: s, end: e });
            }
        }
        Ok(Self { start, end })
    }

    /// Builds a range covering whole calendar days (UTC), both dates inclusive.
    pub fn from_dates(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Result<Self, LedgerError> {
        let midnight = |d: NaiveDate| d.and_time(NaiveTime::default()).and_utc();
        let start = start.map(midnight);
        let end = end.and_then(|d| midnight(d).checked_add_signed(Duration::days(1)));
        Self::new(start, end)
    }

    /// Lower bound for a line query.
    #[must_use]
    pub fn since_bound(&self) -> Bound<DateTime<Utc>> {
        self.start.map_or(Bound::Unbounded, Bound::Included)
    }

    /// Upper bound for a line query.
    #[must_use]
    pub fn until_bound(&self) -> Bound<DateTime<Utc>> {
        self.end.map_or(Bound::Unbounded, Bound::Excluded)
    }

    /// Whether the instant falls inside the range.
    #[must_use]
    pub fn contains(&self, at: &DateTime<Utc>) -> bool {
        self.start.is_none_or(|s| *at >= s) && self.end.is_none_or(|e| *at < e)
    }
}

/// One row of an account ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerRow {
    /// Posting time.
    pub date: DateTime<Utc>,
    /// Voucher number or journal id.
    pub reference: String,
    /// Line description or journal memo.
    pub description: String,
    /// Debit amount (zero for credit lines).
    pub debit: Decimal,
    /// Credit amount (zero for debit lines).
    pub credit: Decimal,
    /// Running balance after this line.
    pub balance: Decimal,
    /// Literal path the line was posted under.
    pub accounts: String,
    /// Parent journal entry.
    pub journal_id: JournalEntryId,
    /// Source line.
    pub line_id: TransactionLineId,
}

/// Opening balance, rows and closing balance for one account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerReport {
    /// Balance before the first row.
    pub opening_balance: Decimal,
    /// Rows in chronological order.
    pub transactions: Vec<LedgerRow>,
    /// Balance after the last row.
    pub closing_balance: Decimal,
}

/// Raw journal line as submitted.
#[derive(Debug, Clone)]
pub struct JournalLineInput {
    /// Ledger path to post against.
    pub account: String,
    /// Amount text as submitted; parsed without floats.
    pub amount: String,
    /// `debit` or `credit`.
    pub entry_type: String,
    /// Metadata stored on the line.
    pub meta: LineMeta,
}

/// Input for creating a journal entry.
#[derive(Debug, Clone)]
pub struct CreateJournalEntryInput {
    /// Tenant.
    pub organization_id: OrganizationId,
    /// Free-text memo; required.
    pub memo: String,
    /// Posting time; defaults to now.
    pub datetime: Option<DateTime<Utc>>,
    /// Lines in submission order.
    pub lines: Vec<JournalLineInput>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_tolerance_is_one_thousandth() {
        assert_eq!(BALANCE_TOLERANCE, dec!(0.001));
    }

    #[test]
    fn test_totals_balanced_within_tolerance() {
        let totals = JournalTotals::from_lines([(Side::Debit, dec!(100.0005)), (Side::Credit, dec!(100))]).unwrap();
        assert!(totals.is_balanced());
        let totals = JournalTotals::from_lines([(Side::Debit, dec!(100.002)), (Side::Credit, dec!(100))]).unwrap();
        assert!(!totals.is_balanced());
        assert_eq!(totals.difference(), dec!(0.002));
    }

    #[test]
    fn test_totals_overflow_is_none() {
        let huge = dec!(70000000000000000000000000000);
        assert!(JournalTotals::from_lines([(Side::Debit, huge), (Side::Debit, huge)]).is_none());
        assert!(JournalTotals::from_lines([(Side::Debit, huge), (Side::Credit, huge)]).is_some());
    }

    #[test]
    fn test_date_range_from_dates_covers_whole_end_day() {
        let range = DateRange::from_dates(
            NaiveDate::from_ymd_opt(2024, 1, 1),
            NaiveDate::from_ymd_opt(2024, 1, 31),
        )
        .unwrap();
        let late = NaiveDate::from_ymd_opt(2024, 1, 31)
            .unwrap()
            .and_hms_opt(23, 59, 59)
            .unwrap()
            .and_utc();
        let next = NaiveDate::from_ymd_opt(2024, 2, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
            .and_utc();
        assert!(range.contains(&late));
        assert!(!range.contains(&next));
    }

    #[test]
    fn test_date_range_rejects_inverted_bounds() {
        let result = DateRange::from_dates(
            NaiveDate::from_ymd_opt(2024, 2, 1),
            NaiveDate::from_ymd_opt(2024, 1, 1),
        );
        assert!(matches!(result, Err(LedgerError::InvalidDateRange { .. })));
    }

    #[test]
    fn test_unbounded_range_bounds() {
        let range = DateRange::unbounded();
        assert_eq!(range.since_bound(), Bound::Unbounded);
        assert_eq!(range.until_bound(), Bound::Unbounded);
    }
}
