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

//! Ledger engine: atomic money movement over store and log.
//!
//! Every mutating operation runs as one atomic unit of work: account lock
//! acquisition, activity and balance checks, balance mutation, transaction
//! record append, commit. The log append is the last fallible step inside
//! the locked unit, so a transaction record exists exactly when the balance
//! change it describes was applied.
//!
//! # Concurrency
//!
//! There is no global engine lock. Operations on different accounts run in
//! parallel; operations on the same account serialize on its record lock.
//! Transfers lock both accounts in ascending account-number order, which is
//! what keeps two simultaneous transfers over the same pair in opposite
//! directions from deadlocking.

use crate::account::Account;
use crate::base::AccountNumber;
use crate::error::LedgerError;
use crate::store::AccountStore;
use crate::transaction::{Transaction, TransactionKind};
use crate::transaction_log::TransactionLog;
use std::sync::Arc;
use tracing::{debug, error};

/// Orchestrates deposits, withdrawals, and transfers as atomic units.
///
/// Constructed from explicitly passed-in store and log handles; the engine
/// owns no global state and can be instantiated per process, per test, or
/// per scenario.
///
/// # Invariants
///
/// - `balance >= 0` for every account at every observable point (unsigned
///   representation plus checked debits).
/// - Transfers preserve the total balance sum exactly; deposits and
///   withdrawals change it by exactly the committed amount.
/// - One transaction record per committed operation; none for rejected ones.
pub struct LedgerEngine {
    store: Arc<AccountStore>,
    log: Arc<TransactionLog>,
}

impl LedgerEngine {
    /// Creates an engine over the given store and log handles.
    pub fn new(store: Arc<AccountStore>, log: Arc<TransactionLog>) -> Self {
        Self { store, log }
    }

    /// Creates an engine with a fresh empty store and log.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(AccountStore::new()), Arc::new(TransactionLog::new()))
    }

    /// The underlying account store (provisioning, snapshots).
    pub fn store(&self) -> &Arc<AccountStore> {
        &self.store
    }

    /// Credits `amount` to an account.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::InvalidAmount`] - `amount` is zero.
    /// - [`LedgerError::AccountNotFound`] - no such account.
    /// - [`LedgerError::AccountInactive`] - account is deactivated.
    /// - [`LedgerError::BalanceOverflow`] - credit exceeds representable balance.
    pub fn deposit(
        &self,
        number: AccountNumber,
        amount: u64,
    ) -> Result<Account, LedgerError> {
        if amount == 0 {
            return Err(LedgerError::InvalidAmount);
        }

        let result = self.store.with_lock(number, |account| {
            account.ensure_active()?;
            account.credit(amount)?;
            self.log
                .append(TransactionKind::Deposit, number, None, amount)?;
            Ok(account.clone())
        });

        match &result {
            Ok(account) => {
                debug!(account = %number, amount, balance = account.balance, "deposit committed");
            }
            Err(LedgerError::BalanceOverflow) => {
                error!(account = %number, amount, "deposit aborted: balance overflow");
            }
            Err(_) => {}
        }
        result
    }

    /// Debits `amount` from an account.
    ///
    /// The balance precondition is checked against the record held under
    /// lock, in the same unit as the mutation.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::InvalidAmount`] - `amount` is zero.
    /// - [`LedgerError::AccountNotFound`] - no such account.
    /// - [`LedgerError::AccountInactive`] - account is deactivated.
    /// - [`LedgerError::InsufficientFunds`] - `amount` exceeds the balance.
    pub fn withdraw(
        &self,
        number: AccountNumber,
        amount: u64,
    ) -> Result<Account, LedgerError> {
        if amount == 0 {
            return Err(LedgerError::InvalidAmount);
        }

        let result = self.store.with_lock(number, |account| {
            account.ensure_active()?;
            account.debit(amount)?;
            self.log
                .append(TransactionKind::Withdrawal, number, None, amount)?;
            Ok(account.clone())
        });

        if let Ok(account) = &result {
            debug!(account = %number, amount, balance = account.balance, "withdrawal committed");
        }
        result
    }

    /// Moves `amount` from `source` to `dest` and records one transfer.
    ///
    /// Both accounts are locked (ascending-number order) before either side
    /// is checked or mutated; the debit, the credit, and the single
    /// transfer record commit together or not at all.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::InvalidAmount`] - `amount` is zero.
    /// - [`LedgerError::SameAccount`] - `source == dest`.
    /// - [`LedgerError::AccountNotFound`] - either side missing; the error
    ///   names the source when both are, since it resolves first.
    /// - [`LedgerError::AccountInactive`] - either side deactivated.
    /// - [`LedgerError::InsufficientFunds`] - source balance below `amount`.
    /// - [`LedgerError::BalanceOverflow`] - destination credit overflows.
    pub fn transfer(
        &self,
        source: AccountNumber,
        dest: AccountNumber,
        amount: u64,
    ) -> Result<Arc<Transaction>, LedgerError> {
        if amount == 0 {
            return Err(LedgerError::InvalidAmount);
        }
        if source == dest {
            return Err(LedgerError::SameAccount);
        }

        let result = self.store.with_lock_pair(source, dest, |src, dst| {
            src.ensure_active()?;
            dst.ensure_active()?;
            src.debit(amount)?;
            dst.credit(amount)?;
            self.log
                .append(TransactionKind::Transfer, source, Some(dest), amount)
        });

        match &result {
            Ok(transaction) => {
                debug!(
                    id = %transaction.id,
                    source = %source,
                    dest = %dest,
                    amount,
                    "transfer committed"
                );
            }
            Err(LedgerError::BalanceOverflow) => {
                error!(source = %source, dest = %dest, amount, "transfer aborted: balance overflow");
            }
            Err(_) => {}
        }
        result
    }

    /// Transactions filed under one account, ordered by id ascending.
    ///
    /// Pure read; takes no account lock. The account must exist, but an
    /// account with no history yields an empty list.
    pub fn list_transactions(
        &self,
        number: AccountNumber,
    ) -> Result<Vec<Arc<Transaction>>, LedgerError> {
        // Existence check only; deactivated accounts keep their history readable.
        self.store.get(number)?;
        Ok(self.log.list_by_account(number))
    }

    /// Every committed transaction, ordered by id ascending.
    pub fn list_all_transactions(&self) -> Vec<Arc<Transaction>> {
        self.log.list_all()
    }

    /// Retrieves a point-in-time account snapshot.
    pub fn get_account(&self, number: AccountNumber) -> Result<Account, LedgerError> {
        self.store.get(number)
    }

    /// Activates or deactivates an account.
    ///
    /// Administration path: produces no transaction record, since no money
    /// moves. Deactivation is the only retirement an account ever gets.
    pub fn set_account_active(
        &self,
        number: AccountNumber,
        active: bool,
    ) -> Result<Account, LedgerError> {
        let result = self.store.with_lock(number, |account| {
            account.active = active;
            Ok(account.clone())
        });

        if let Ok(account) = &result {
            debug!(account = %number, active = account.active, "account status changed");
        }
        result
    }
}
