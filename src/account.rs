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

//! Account records and balance mutation primitives.
//!
//! An [`Account`] is plain data; the store wraps it in a per-account lock
//! and hands clones to mutation closures. Balances are integer minor
//! currency units, so non-negativity holds by construction and overdraft is
//! ruled out by the checked [`Account::debit`].
//!
//! # Example
//!
//! ```
//! use bank_ledger_rs::{Account, AccountNumber, UserId};
//!
//! let account = Account::new(AccountNumber(1111111111), UserId(1), 1_000_000);
//! assert_eq!(account.balance, 1_000_000);
//! assert!(account.active);
//! ```

use crate::base::{AccountNumber, UserId};
use crate::error::LedgerError;
use serde::{Deserialize, Serialize};

/// A bank account balance row.
///
/// Created once at provisioning; mutated only inside the store's locked
/// atomic unit; deactivated instead of deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Opaque account number, unique and immutable.
    pub number: AccountNumber,
    /// Owning user; one owner per account, immutable once created.
    pub owner_id: UserId,
    /// Balance in minor currency units.
    pub balance: u64,
    /// Inactive accounts reject all mutating operations.
    pub active: bool,
}

impl Account {
    /// Creates an active account with a starting balance.
    pub fn new(number: AccountNumber, owner_id: UserId, balance: u64) -> Self {
        Self {
            number,
            owner_id,
            balance,
            active: true,
        }
    }

    /// Fails with [`LedgerError::AccountInactive`] unless the account is active.
    pub fn ensure_active(&self) -> Result<(), LedgerError> {
        if self.active {
            Ok(())
        } else {
            Err(LedgerError::AccountInactive(self.number))
        }
    }

    /// Increases the balance.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::InvalidAmount`] when `amount` is zero.
    /// - [`LedgerError::BalanceOverflow`] when the credit would exceed `u64::MAX`.
    pub fn credit(&mut self, amount: u64) -> Result<(), LedgerError> {
        if amount == 0 {
            return Err(LedgerError::InvalidAmount);
        }
        self.balance = self
            .balance
            .checked_add(amount)
            .ok_or(LedgerError::BalanceOverflow)?;
        Ok(())
    }

    /// Decreases the balance.
    ///
    /// The balance check happens here, against the record held under lock —
    /// never against an earlier unlocked read.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::InvalidAmount`] when `amount` is zero.
    /// - [`LedgerError::InsufficientFunds`] when `amount` exceeds the balance.
    pub fn debit(&mut self, amount: u64) -> Result<(), LedgerError> {
        if amount == 0 {
            return Err(LedgerError::InvalidAmount);
        }
        if self.balance < amount {
            return Err(LedgerError::InsufficientFunds);
        }
        self.balance -= amount;
        Ok(())
    }
}
