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

//! Role-based operation gating.
//!
//! The role table lives in exactly one place: [`authorize`]. Handlers never
//! re-check roles themselves; they call through the service boundary, which
//! consults this table before touching the engine. Adding an [`Operation`]
//! variant forces the match below to name it — there is no default arm and
//! therefore no implicit allow.

use crate::error::LedgerError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Coarse-grained permission category carried by a verified session.
///
/// The identity service encodes these as numeric role ids (1 = admin,
/// 2 = customer); the boundary maps them to this enum before anything else
/// runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Customer,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Admin => f.write_str("admin"),
            Role::Customer => f.write_str("customer"),
        }
    }
}

/// Ledger operations subject to role gating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    Deposit,
    Withdraw,
    Transfer,
    ListOwnTransactions,
    ListAllTransactions,
    AdministerAccounts,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Deposit => f.write_str("deposit"),
            Operation::Withdraw => f.write_str("withdraw"),
            Operation::Transfer => f.write_str("transfer"),
            Operation::ListOwnTransactions => f.write_str("list_own_transactions"),
            Operation::ListAllTransactions => f.write_str("list_all_transactions"),
            Operation::AdministerAccounts => f.write_str("administer_accounts"),
        }
    }
}

/// Checks whether `role` may perform `operation`.
///
/// Pure policy check: no I/O, no panics, no business logic.
///
/// | operation | admin | customer |
/// |-----------|-------|----------|
/// | deposit / withdraw / transfer / list own | deny | allow |
/// | list all / administer accounts | allow | deny |
///
/// # Errors
///
/// Returns [`LedgerError::Unauthorized`] when the table denies the pair.
pub fn authorize(role: Role, operation: Operation) -> Result<(), LedgerError> {
    let allowed = match (role, operation) {
        (Role::Customer, Operation::Deposit)
        | (Role::Customer, Operation::Withdraw)
        | (Role::Customer, Operation::Transfer)
        | (Role::Customer, Operation::ListOwnTransactions) => true,
        (Role::Admin, Operation::ListAllTransactions)
        | (Role::Admin, Operation::AdministerAccounts) => true,
        (Role::Admin, Operation::Deposit)
        | (Role::Admin, Operation::Withdraw)
        | (Role::Admin, Operation::Transfer)
        | (Role::Admin, Operation::ListOwnTransactions) => false,
        (Role::Customer, Operation::ListAllTransactions)
        | (Role::Customer, Operation::AdministerAccounts) => false,
    };

    if allowed {
        Ok(())
    } else {
        Err(LedgerError::Unauthorized { role, operation })
    }
}
