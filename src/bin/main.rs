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

use bank_ledger_rs::{
    Account, AccountNumber, DepositRequest, LedgerEngine, LedgerService, Role, Session,
    SetAccountStatusRequest, TransferRequest, UserId, WithdrawRequest,
};
use clap::Parser;
use csv::{ReaderBuilder, Trim, Writer};
use serde::Deserialize;
use std::fs::File;
use std::io::{BufReader, Read, Write};
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;

/// Bank Ledger - Replay banking operations against seeded accounts
///
/// Seeds accounts from one CSV file, replays an operations CSV through the
/// role-gated service boundary, and writes the resulting account snapshots
/// to stdout. Rejected operations are skipped and leave no trace, exactly
/// as they would at the service boundary.
#[derive(Parser, Debug)]
#[command(name = "bank-ledger-rs")]
#[command(about = "A banking ledger that replays operation CSVs", long_about = None)]
struct Args {
    /// Path to CSV file with starting accounts
    ///
    /// Expected format: account,owner,balance,active
    /// Example: 1111111111,1,1000000,true
    #[arg(value_name = "ACCOUNTS")]
    accounts: PathBuf,

    /// Path to CSV file with operations
    ///
    /// Expected format: op,user,role,account,dest,amount
    /// Example: transfer,1,customer,1111111111,2222222222,300000
    #[arg(value_name = "OPERATIONS")]
    operations: PathBuf,

    /// Also write the committed transaction log as CSV to this path
    #[arg(long, value_name = "FILE")]
    transactions: Option<PathBuf>,
}

fn main() {
    // Log level via RUST_LOG, defaulting to info.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();

    let args = Args::parse();

    let accounts_file = match File::open(&args.accounts) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Error opening file '{}': {}", args.accounts.display(), e);
            process::exit(1);
        }
    };
    let operations_file = match File::open(&args.operations) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Error opening file '{}': {}", args.operations.display(), e);
            process::exit(1);
        }
    };

    let engine = LedgerEngine::in_memory();
    if let Err(e) = seed_accounts(&engine, BufReader::new(accounts_file)) {
        eprintln!("Error seeding accounts: {}", e);
        process::exit(1);
    }

    let service = LedgerService::new(engine);
    if let Err(e) = process_operations(&service, BufReader::new(operations_file)) {
        eprintln!("Error processing operations: {}", e);
        process::exit(1);
    }

    if let Some(path) = &args.transactions {
        let out = match File::create(path) {
            Ok(f) => f,
            Err(e) => {
                eprintln!("Error creating file '{}': {}", path.display(), e);
                process::exit(1);
            }
        };
        if let Err(e) = write_transactions(&service, out) {
            eprintln!("Error writing transactions: {}", e);
            process::exit(1);
        }
    }

    if let Err(e) = write_accounts(&service, std::io::stdout()) {
        eprintln!("Error writing output: {}", e);
        process::exit(1);
    }
}

/// Raw CSV record for the accounts seed file.
///
/// Fields: `account, owner, balance, active`
#[derive(Debug, Deserialize)]
struct AccountRecord {
    account: u64,
    owner: u64,
    balance: u64,
    active: bool,
}

/// Raw CSV record for the operations file.
///
/// Fields: `op, user, role, account, dest, amount`
#[derive(Debug, Deserialize)]
struct OperationRecord {
    op: String,
    user: u64,
    role: String,
    account: u64,
    #[serde(deserialize_with = "csv::invalid_option")]
    dest: Option<u64>,
    #[serde(deserialize_with = "csv::invalid_option")]
    amount: Option<u64>,
}

impl OperationRecord {
    fn session(&self) -> Option<Session> {
        let role = match self.role.to_lowercase().as_str() {
            "admin" => Role::Admin,
            "customer" => Role::Customer,
            _ => return None,
        };
        Some(Session::new(UserId(self.user), role))
    }
}

/// Seed the store from an accounts CSV.
///
/// Provisioning stand-in: each row registers one account. Duplicate
/// account numbers are an input error and fail the run.
pub fn seed_accounts<R: Read>(
    engine: &LedgerEngine,
    reader: R,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut rdr = ReaderBuilder::new()
        .trim(Trim::All)
        .has_headers(true)
        .from_reader(reader);

    for result in rdr.deserialize::<AccountRecord>() {
        let record = result?;
        let mut account = Account::new(
            AccountNumber(record.account),
            UserId(record.owner),
            record.balance,
        );
        account.active = record.active;
        engine.store().register(account)?;
    }

    Ok(())
}

/// Replay operations from a CSV reader through the service boundary.
///
/// Streaming parse, so arbitrarily large operation files never load fully
/// into memory. Malformed rows and rejected operations are skipped; a
/// rejected operation leaves no balance change and no transaction record.
///
/// # CSV Format
///
/// Expected columns: `op, user, role, account, dest, amount`
/// - `op`: deposit, withdraw, transfer, activate, deactivate
/// - `user`: acting user id
/// - `role`: admin or customer (as verified upstream)
/// - `account`: target account (transfer source)
/// - `dest`: transfer destination (empty otherwise)
/// - `amount`: amount in minor units (empty for activate/deactivate)
///
/// # Errors
///
/// Returns a CSV error if the reader fails or the CSV structure is invalid.
/// Individual operation rejections are logged but don't stop processing.
pub fn process_operations<R: Read>(
    service: &LedgerService,
    reader: R,
) -> Result<(), csv::Error> {
    let mut rdr = ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true) // Allow missing dest/amount fields
        .has_headers(true)
        .from_reader(reader);

    for result in rdr.deserialize::<OperationRecord>() {
        let record = match result {
            Ok(record) => record,
            Err(e) => {
                tracing::debug!("skipping malformed row: {}", e);
                continue;
            }
        };

        let Some(session) = record.session() else {
            tracing::debug!(role = %record.role, "skipping row with unknown role");
            continue;
        };
        let account_number = AccountNumber(record.account);

        let outcome = match record.op.to_lowercase().as_str() {
            "deposit" => {
                let Some(amount) = record.amount else { continue };
                service
                    .deposit(&session, DepositRequest { account_number, amount })
                    .map(|_| ())
            }
            "withdraw" | "withdrawal" => {
                let Some(amount) = record.amount else { continue };
                service
                    .withdraw(&session, WithdrawRequest { account_number, amount })
                    .map(|_| ())
            }
            "transfer" => {
                let (Some(dest), Some(amount)) = (record.dest, record.amount) else {
                    continue;
                };
                service
                    .transfer(
                        &session,
                        TransferRequest {
                            account_number,
                            dest_account_number: AccountNumber(dest),
                            amount,
                        },
                    )
                    .map(|_| ())
            }
            "activate" | "deactivate" => service
                .set_account_status(
                    &session,
                    SetAccountStatusRequest {
                        account_number,
                        active: record.op.to_lowercase() == "activate",
                    },
                )
                .map(|_| ()),
            other => {
                tracing::debug!(op = other, "skipping unknown operation");
                continue;
            }
        };

        if let Err(e) = outcome {
            tracing::debug!(op = %record.op, account = %account_number, "rejected: {}", e);
        }
    }

    Ok(())
}

/// Write account snapshots to a CSV writer.
///
/// # CSV Format
///
/// Columns: `number, owner_id, balance, active`, ordered by account number.
///
/// # Errors
///
/// Returns a CSV error if writing fails.
pub fn write_accounts<W: Write>(service: &LedgerService, writer: W) -> Result<(), csv::Error> {
    let mut wtr = Writer::from_writer(writer);

    for account in service.engine().store().accounts() {
        wtr.serialize(&account)?;
    }

    wtr.flush()?;
    Ok(())
}

/// Write the committed transaction log to a CSV writer, id ascending.
pub fn write_transactions<W: Write>(
    service: &LedgerService,
    writer: W,
) -> Result<(), csv::Error> {
    let mut wtr = Writer::from_writer(writer);

    for transaction in service.engine().list_all_transactions() {
        wtr.serialize(transaction.as_ref())?;
    }

    wtr.flush()?;
    Ok(())
}
