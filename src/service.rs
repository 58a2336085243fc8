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

//! Service boundary: the only surface the transport layer calls.
//!
//! The transport layer hands every call an already-verified [`Session`] —
//! credential checking belongs to the external identity service. The
//! boundary validates request shape, consults the authorization gate,
//! enforces account ownership where the operation acts on the caller's own
//! money, and only then invokes the engine.
//!
//! Amounts arrive as `u64`, so negative inputs are unrepresentable past
//! deserialization; zero is rejected by the engine as `InvalidAmount`.

use crate::account::Account;
use crate::auth::{authorize, Operation, Role};
use crate::base::{AccountNumber, UserId};
use crate::engine::LedgerEngine;
use crate::error::LedgerError;
use crate::transaction::Transaction;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Verified identity pair issued by the external identity service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user_id: UserId,
    pub role: Role,
}

impl Session {
    pub fn new(user_id: UserId, role: Role) -> Self {
        Self { user_id, role }
    }
}

/// Deposit into an account.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DepositRequest {
    pub account_number: AccountNumber,
    pub amount: u64,
}

/// Withdraw from an account owned by the caller.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct WithdrawRequest {
    pub account_number: AccountNumber,
    pub amount: u64,
}

/// Transfer from a caller-owned account to another account.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TransferRequest {
    pub account_number: AccountNumber,
    pub dest_account_number: AccountNumber,
    pub amount: u64,
}

/// List the caller's transactions for one owned account.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ListTransactionsRequest {
    pub account_number: AccountNumber,
}

/// Activate or deactivate an account (administration).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SetAccountStatusRequest {
    pub account_number: AccountNumber,
    pub active: bool,
}

/// Role-gated facade over the ledger engine.
pub struct LedgerService {
    engine: LedgerEngine,
}

impl LedgerService {
    /// Wraps an engine behind the authorization boundary.
    pub fn new(engine: LedgerEngine) -> Self {
        Self { engine }
    }

    /// Direct engine access for provisioning and reporting shells.
    pub fn engine(&self) -> &LedgerEngine {
        &self.engine
    }

    /// Deposits into any active account.
    ///
    /// Deposits are not ownership-restricted: paying into someone else's
    /// account is a legitimate operation.
    pub fn deposit(
        &self,
        session: &Session,
        request: DepositRequest,
    ) -> Result<Account, LedgerError> {
        authorize(session.role, Operation::Deposit)?;
        self.engine.deposit(request.account_number, request.amount)
    }

    /// Withdraws from an account the caller owns.
    pub fn withdraw(
        &self,
        session: &Session,
        request: WithdrawRequest,
    ) -> Result<Account, LedgerError> {
        authorize(session.role, Operation::Withdraw)?;
        self.ensure_owner(session, request.account_number)?;
        self.engine.withdraw(request.account_number, request.amount)
    }

    /// Transfers from a caller-owned source account.
    ///
    /// Returns the committed transfer record as confirmation.
    pub fn transfer(
        &self,
        session: &Session,
        request: TransferRequest,
    ) -> Result<Arc<Transaction>, LedgerError> {
        authorize(session.role, Operation::Transfer)?;
        self.ensure_owner(session, request.account_number)?;
        self.engine.transfer(
            request.account_number,
            request.dest_account_number,
            request.amount,
        )
    }

    /// Lists the caller's own transactions, id-ascending.
    pub fn list_own_transactions(
        &self,
        session: &Session,
        request: ListTransactionsRequest,
    ) -> Result<Vec<Arc<Transaction>>, LedgerError> {
        authorize(session.role, Operation::ListOwnTransactions)?;
        self.ensure_owner(session, request.account_number)?;
        self.engine.list_transactions(request.account_number)
    }

    /// Lists every committed transaction, id-ascending. Admin only.
    pub fn list_all_transactions(
        &self,
        session: &Session,
    ) -> Result<Vec<Arc<Transaction>>, LedgerError> {
        authorize(session.role, Operation::ListAllTransactions)?;
        Ok(self.engine.list_all_transactions())
    }

    /// Activates or deactivates an account. Admin only.
    pub fn set_account_status(
        &self,
        session: &Session,
        request: SetAccountStatusRequest,
    ) -> Result<Account, LedgerError> {
        authorize(session.role, Operation::AdministerAccounts)?;
        self.engine
            .set_account_active(request.account_number, request.active)
    }

    /// Ownership gate for operations on the caller's own money.
    ///
    /// `owner_id` is immutable once an account is created, so reading it
    /// outside the mutation lock cannot race with the operation itself.
    fn ensure_owner(
        &self,
        session: &Session,
        number: AccountNumber,
    ) -> Result<(), LedgerError> {
        let account = self.engine.get_account(number)?;
        if account.owner_id == session.user_id {
            Ok(())
        } else {
            Err(LedgerError::NotAccountOwner(number))
        }
    }
}
