// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2025 Daniel Negri
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! Committed transaction records.
//!
//! A record exists exactly when the balance change it describes was applied;
//! rejected operations leave no trace. Records are immutable and never
//! deleted.

use crate::base::{AccountNumber, TransactionId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of money movement a record describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Deposit,
    Withdrawal,
    Transfer,
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransactionKind::Deposit => f.write_str("deposit"),
            TransactionKind::Withdrawal => f.write_str("withdrawal"),
            TransactionKind::Transfer => f.write_str("transfer"),
        }
    }
}

/// A committed money movement.
///
/// A transfer is one record: `account_id` is the debited source and
/// `counterparty_account_id` the credited destination. Deposits and
/// withdrawals carry no counterparty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Log-assigned id, monotonic in commit order.
    pub id: TransactionId,
    /// The account this record is filed under (transfer source).
    pub account_id: AccountNumber,
    /// Transfer destination; `None` for deposits and withdrawals.
    pub counterparty_account_id: Option<AccountNumber>,
    pub kind: TransactionKind,
    /// Amount moved, in minor currency units; strictly positive.
    pub amount: u64,
    /// Commit time, immutable.
    pub timestamp: DateTime<Utc>,
}
