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

//! Append-only transaction log.
//!
//! Ids are assigned under the log's write lock from the committed length,
//! so they are dense, monotonic, and agree with log order. [`TransactionLog::append`]
//! is called from inside an account-lock closure; the store persists the
//! balance change only after the append returns, which makes record and
//! balance commit or abort together.

use crate::base::{AccountNumber, TransactionId};
use crate::error::LedgerError;
use crate::transaction::{Transaction, TransactionKind};
use chrono::Utc;
use parking_lot::RwLock;
use std::sync::Arc;

/// Durable, ordered record of every committed money movement.
#[derive(Debug, Default)]
pub struct TransactionLog {
    entries: RwLock<Vec<Arc<Transaction>>>,
}

impl TransactionLog {
    /// Creates an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a committed movement and returns the stored record.
    ///
    /// Must only be called while holding the lock(s) of the account(s) the
    /// movement touches; the caller commits the balance change after this
    /// returns `Ok`.
    pub fn append(
        &self,
        kind: TransactionKind,
        account_id: AccountNumber,
        counterparty_account_id: Option<AccountNumber>,
        amount: u64,
    ) -> Result<Arc<Transaction>, LedgerError> {
        let mut entries = self.entries.write();
        let transaction = Arc::new(Transaction {
            id: TransactionId(entries.len() as u64 + 1),
            account_id,
            counterparty_account_id,
            kind,
            amount,
            timestamp: Utc::now(),
        });
        entries.push(Arc::clone(&transaction));
        Ok(transaction)
    }

    /// Transactions filed under `account_id`, ordered by id ascending.
    pub fn list_by_account(&self, account_id: AccountNumber) -> Vec<Arc<Transaction>> {
        self.entries
            .read()
            .iter()
            .filter(|tx| tx.account_id == account_id)
            .cloned()
            .collect()
    }

    /// Every transaction, ordered by id ascending. Privileged callers only;
    /// gating happens at the service boundary.
    pub fn list_all(&self) -> Vec<Arc<Transaction>> {
        self.entries.read().iter().cloned().collect()
    }

    /// Number of committed transactions.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// True when nothing has been committed yet.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}
