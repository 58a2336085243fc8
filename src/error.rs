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

//! Error types for ledger operations.

use crate::auth::{Operation, Role};
use crate::base::AccountNumber;
use thiserror::Error;

/// Ledger operation errors.
///
/// All variants except [`LedgerError::BalanceOverflow`] are expected
/// outcomes returned to the caller; an overflow is an internal failure that
/// aborts the atomic unit with no partial effect.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// Amount is zero (negative amounts are unrepresentable at the boundary)
    #[error("invalid amount (must be positive)")]
    InvalidAmount,

    /// Transfer names the same account on both sides
    #[error("source and destination accounts are the same")]
    SameAccount,

    /// Referenced account does not exist
    #[error("account {0} not found")]
    AccountNotFound(AccountNumber),

    /// Account exists but is deactivated
    #[error("account {0} is inactive")]
    AccountInactive(AccountNumber),

    /// Debit would exceed the current balance
    #[error("insufficient funds")]
    InsufficientFunds,

    /// The role table denies this operation
    #[error("role '{role}' may not perform {operation}")]
    Unauthorized { role: Role, operation: Operation },

    /// Caller does not own the account it is operating on
    #[error("account {0} is not owned by the caller")]
    NotAccountOwner(AccountNumber),

    /// Provisioning attempted to reuse an account number
    #[error("account {0} already exists")]
    AccountExists(AccountNumber),

    /// Credit would overflow the balance representation
    #[error("balance overflow")]
    BalanceOverflow,
}
