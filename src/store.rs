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

//! Concurrent account store with per-account locking.
//!
//! Concurrency is controlled at account granularity: each record sits
//! behind its own [`Mutex`], and [`AccountStore::with_lock`] /
//! [`AccountStore::with_lock_pair`] run a closure against a scratch copy of
//! the locked record(s), persisting the scratch only when the closure
//! returns `Ok`. An error at any step discards the scratch, so other
//! callers observe the record strictly before-or-after a mutation, never
//! mid-flight.
//!
//! Pair locking always acquires in ascending account-number order,
//! regardless of which side is the source; two transfers over the same pair
//! in opposite directions serialize instead of deadlocking.

use crate::account::Account;
use crate::base::AccountNumber;
use crate::error::LedgerError;
use dashmap::DashMap;
use parking_lot::Mutex;
use std::sync::Arc;

/// Store mapping account number to a locked balance record.
#[derive(Debug, Default)]
pub struct AccountStore {
    accounts: DashMap<AccountNumber, Arc<Mutex<Account>>>,
}

impl AccountStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a freshly provisioned account.
    ///
    /// Called by the provisioning collaborator (and by test/batch seeding);
    /// steady-state ledger operations never create accounts.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::AccountExists`] when the number is taken.
    pub fn register(&self, account: Account) -> Result<(), LedgerError> {
        use dashmap::mapref::entry::Entry;

        // Entry API makes the check-and-insert atomic.
        match self.accounts.entry(account.number) {
            Entry::Occupied(_) => Err(LedgerError::AccountExists(account.number)),
            Entry::Vacant(entry) => {
                entry.insert(Arc::new(Mutex::new(account)));
                Ok(())
            }
        }
    }

    /// Returns a point-in-time snapshot of one account.
    pub fn get(&self, number: AccountNumber) -> Result<Account, LedgerError> {
        let handle = self.handle(number)?;
        let account = handle.lock();
        Ok(account.clone())
    }

    /// Runs `f` against the locked account as one atomic unit.
    ///
    /// The closure receives a scratch copy of the current record; the store
    /// persists the scratch only when `f` returns `Ok`. On `Err` the stored
    /// record is untouched and the error propagates.
    pub fn with_lock<T>(
        &self,
        number: AccountNumber,
        f: impl FnOnce(&mut Account) -> Result<T, LedgerError>,
    ) -> Result<T, LedgerError> {
        let handle = self.handle(number)?;
        let mut guard = handle.lock();
        let mut scratch = guard.clone();
        let out = f(&mut scratch)?;
        *guard = scratch;
        Ok(out)
    }

    /// Runs `f` against two locked accounts as one atomic unit.
    ///
    /// Locks are acquired in ascending account-number order whatever the
    /// argument order; `f` still sees the records as `(a, b)`. Both records
    /// persist on `Ok`, neither on `Err`.
    ///
    /// # Errors
    ///
    /// `a` is resolved before `b`, so [`LedgerError::AccountNotFound`] names
    /// the first missing side. Callers must reject `a == b` beforehand.
    pub fn with_lock_pair<T>(
        &self,
        a: AccountNumber,
        b: AccountNumber,
        f: impl FnOnce(&mut Account, &mut Account) -> Result<T, LedgerError>,
    ) -> Result<T, LedgerError> {
        debug_assert_ne!(a, b, "pair lock requires distinct accounts");

        let handle_a = self.handle(a)?;
        let handle_b = self.handle(b)?;

        // Canonical order: lower account number first.
        let (low, high) = if a < b {
            (&handle_a, &handle_b)
        } else {
            (&handle_b, &handle_a)
        };
        let mut guard_low = low.lock();
        let mut guard_high = high.lock();

        let (guard_a, guard_b) = if a < b {
            (&mut guard_low, &mut guard_high)
        } else {
            (&mut guard_high, &mut guard_low)
        };

        let mut scratch_a = guard_a.clone();
        let mut scratch_b = guard_b.clone();
        let out = f(&mut scratch_a, &mut scratch_b)?;
        **guard_a = scratch_a;
        **guard_b = scratch_b;
        Ok(out)
    }

    /// Point-in-time snapshot of all accounts, ordered by account number.
    pub fn accounts(&self) -> Vec<Account> {
        let mut snapshot: Vec<Account> = self
            .accounts
            .iter()
            .map(|entry| entry.value().lock().clone())
            .collect();
        snapshot.sort_by_key(|account| account.number);
        snapshot
    }

    /// Number of registered accounts.
    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    /// True when no account has been registered.
    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    /// Clones the lock handle so the map shard reference is released before
    /// the record lock is taken; shard locks therefore never participate in
    /// lock ordering.
    fn handle(&self, number: AccountNumber) -> Result<Arc<Mutex<Account>>, LedgerError> {
        self.accounts
            .get(&number)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or(LedgerError::AccountNotFound(number))
    }
}
