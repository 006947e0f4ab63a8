//! Journal entry aggregate.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use khata_shared::types::{JournalEntryId, OrganizationId};

use super::entry::TransactionLine;
use super::types::JournalTotals;

/// Lifecycle state of a persisted journal entry.
///
/// Drafts live only in memory as [`super::writer::DraftJournal`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JournalStatus {
    /// Persisted; lines are immutable.
    Committed,
    /// Soft-voided; lines are retained but excluded from balances.
    Voided,
}

/// A balanced group of transaction lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalEntry {
    /// Entry ID.
    pub id: JournalEntryId,
    /// Tenant.
    pub organization_id: OrganizationId,
    /// Free-text memo.
    pub memo: String,
    /// Posting time shared by all lines.
    pub datetime: DateTime<Utc>,
    /// Soft-void flag.
    pub voided: bool,
    /// Why the entry was voided.
    pub void_reason: Option<String>,
    /// When the entry was voided.
    pub voided_at: Option<DateTime<Utc>>,
    /// Insertion time.
    pub created_at: DateTime<Utc>,
    /// Lines in insertion order.
    pub lines: Vec<TransactionLine>,
}

impl JournalEntry {
    /// Current lifecycle state.
    #[must_use]
    pub fn status(&self) -> JournalStatus {
        if self.voided {
            JournalStatus::Voided
        } else {
            JournalStatus::Committed
        }
    }

    /// Returns true if the entry can still be voided.
    #[must_use]
    pub fn can_void(&self) -> bool {
        self.status() == JournalStatus::Committed
    }

    /// Debit and credit sums over the lines; `None` on overflow.
    #[must_use]
    pub fn totals(&self) -> Option<JournalTotals> {
        JournalTotals::from_lines(self.lines.iter().map(|l| (l.side, l.amount)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::Side;
    use crate::testing::journal_with_lines;
    use rust_decimal_macros::dec;

    #[test]
    fn test_status_follows_void_flag() {
        let mut entry = journal_with_lines(&[("Assets:Cash", Side::Debit, dec!(10)), ("Income:Sales", Side::Credit, dec!(10))]);
        assert_eq!(entry.status(), JournalStatus::Committed);
        assert!(entry.can_void());

        entry.voided = true;
        assert_eq!(entry.status(), JournalStatus::Voided);
        assert!(!entry.can_void());
    }

    #[test]
    fn test_totals() {
        let entry = journal_with_lines(&[
            ("Assets:Cash", Side::Debit, dec!(60)),
            ("Assets:Bank", Side::Debit, dec!(40)),
            ("Income:Sales", Side::Credit, dec!(100)),
        ]);
        let totals = entry.totals().unwrap();
        assert_eq!(totals.debit, dec!(100));
        assert_eq!(totals.credit, dec!(100));
        assert!(totals.is_balanced());
    }
}
