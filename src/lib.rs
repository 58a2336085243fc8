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

//! # Bank Ledger
//!
//! This library provides a banking ledger engine for deposits, withdrawals,
//! and transfers over persisted account balances, gated by user role.
//!
//! ## Core Components
//!
//! - [`AccountStore`]: concurrent account records with per-account locked
//!   read-modify-write
//! - [`TransactionLog`]: append-only record of every committed movement
//! - [`LedgerEngine`]: deposit/withdraw/transfer as atomic units over store
//!   and log
//! - [`authorize`]: the role-to-operation table
//! - [`LedgerService`]: the boundary the transport layer calls
//! - [`LedgerError`]: error taxonomy shared by all of the above
//!
//! ## Example
//!
//! ```
//! use bank_ledger_rs::{
//!     Account, AccountNumber, DepositRequest, LedgerEngine, LedgerService, Role, Session,
//!     UserId,
//! };
//!
//! let engine = LedgerEngine::in_memory();
//! engine
//!     .store()
//!     .register(Account::new(AccountNumber(1111111111), UserId(1), 1_000_000))
//!     .unwrap();
//!
//! let service = LedgerService::new(engine);
//! let session = Session::new(UserId(1), Role::Customer);
//!
//! let account = service
//!     .deposit(
//!         &session,
//!         DepositRequest {
//!             account_number: AccountNumber(1111111111),
//!             amount: 500,
//!         },
//!     )
//!     .unwrap();
//! assert_eq!(account.balance, 1_000_500);
//! ```
//!
//! ## Concurrency
//!
//! Locking is per account: operations on different accounts proceed in
//! parallel, operations on the same account serialize, and transfers lock
//! their pair in ascending account-number order so opposite-direction
//! transfers cannot deadlock. Every mutation commits its balance change and
//! its transaction record together or not at all.

pub mod account;
pub mod auth;
mod base;
mod engine;
pub mod error;
mod service;
mod store;
mod transaction;
mod transaction_log;

pub use account::Account;
pub use auth::{authorize, Operation, Role};
pub use base::{AccountNumber, TransactionId, UserId};
pub use engine::LedgerEngine;
pub use error::LedgerError;
pub use service::{
    DepositRequest, LedgerService, ListTransactionsRequest, Session, SetAccountStatusRequest,
    TransferRequest, WithdrawRequest,
};
pub use store::AccountStore;
pub use transaction::{Transaction, TransactionKind};
pub use transaction_log::TransactionLog;
