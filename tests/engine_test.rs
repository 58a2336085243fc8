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

//! Engine public API integration tests.

use bank_ledger_rs::{
    Account, AccountNumber, LedgerEngine, LedgerError, TransactionId, TransactionKind, UserId,
};

const ALICE: AccountNumber = AccountNumber(1111111111);
const BOB: AccountNumber = AccountNumber(2222222222);
const DORMANT: AccountNumber = AccountNumber(3333333333);
const UNKNOWN: AccountNumber = AccountNumber(9999999999);

/// Engine with Alice (1,000,000), Bob (500,000), and a deactivated account.
fn seeded_engine() -> LedgerEngine {
    let engine = LedgerEngine::in_memory();
    engine
        .store()
        .register(Account::new(ALICE, UserId(1), 1_000_000))
        .unwrap();
    engine
        .store()
        .register(Account::new(BOB, UserId(2), 500_000))
        .unwrap();
    let mut dormant = Account::new(DORMANT, UserId(3), 100_000);
    dormant.active = false;
    engine.store().register(dormant).unwrap();
    engine
}

fn total_balance(engine: &LedgerEngine) -> u64 {
    engine
        .store()
        .accounts()
        .iter()
        .map(|account| account.balance)
        .sum()
}

// === Deposits ===

#[test]
fn deposit_credits_balance_and_records_transaction() {
    let engine = seeded_engine();

    let account = engine.deposit(ALICE, 500).unwrap();
    assert_eq!(account.balance, 1_000_500);

    let transactions = engine.list_transactions(ALICE).unwrap();
    assert_eq!(transactions.len(), 1);
    assert_eq!(transactions[0].kind, TransactionKind::Deposit);
    assert_eq!(transactions[0].amount, 500);
    assert_eq!(transactions[0].account_id, ALICE);
    assert_eq!(transactions[0].counterparty_account_id, None);
}

#[test]
fn deposit_zero_amount_rejected() {
    let engine = seeded_engine();

    let result = engine.deposit(ALICE, 0);
    assert_eq!(result, Err(LedgerError::InvalidAmount));
    assert!(engine.list_transactions(ALICE).unwrap().is_empty());
}

#[test]
fn deposit_unknown_account_fails() {
    let engine = seeded_engine();

    let result = engine.deposit(UNKNOWN, 500);
    assert_eq!(result, Err(LedgerError::AccountNotFound(UNKNOWN)));
    assert!(engine.list_all_transactions().is_empty());
}

#[test]
fn deposit_inactive_account_rejected_without_state_change() {
    let engine = seeded_engine();

    let result = engine.deposit(DORMANT, 500);
    assert_eq!(result, Err(LedgerError::AccountInactive(DORMANT)));

    let account = engine.get_account(DORMANT).unwrap();
    assert_eq!(account.balance, 100_000);
    assert!(engine.list_all_transactions().is_empty());
}

// === Withdrawals ===

#[test]
fn withdraw_debits_balance_and_records_transaction() {
    let engine = seeded_engine();

    let account = engine.withdraw(ALICE, 250_000).unwrap();
    assert_eq!(account.balance, 750_000);

    let transactions = engine.list_transactions(ALICE).unwrap();
    assert_eq!(transactions.len(), 1);
    assert_eq!(transactions[0].kind, TransactionKind::Withdrawal);
    assert_eq!(transactions[0].amount, 250_000);
}

#[test]
fn withdraw_beyond_balance_leaves_no_trace() {
    let engine = seeded_engine();

    let result = engine.withdraw(ALICE, 2_000_000);
    assert_eq!(result, Err(LedgerError::InsufficientFunds));

    // Balance unchanged and no transaction recorded.
    assert_eq!(engine.get_account(ALICE).unwrap().balance, 1_000_000);
    assert!(engine.list_transactions(ALICE).unwrap().is_empty());
}

#[test]
fn withdraw_entire_balance_allowed() {
    let engine = seeded_engine();

    let account = engine.withdraw(BOB, 500_000).unwrap();
    assert_eq!(account.balance, 0);
}

#[test]
fn withdraw_inactive_account_rejected() {
    let engine = seeded_engine();

    let result = engine.withdraw(DORMANT, 10);
    assert_eq!(result, Err(LedgerError::AccountInactive(DORMANT)));
}

// === Transfers ===

#[test]
fn transfer_moves_funds_and_records_single_transaction() {
    let engine = seeded_engine();

    let transaction = engine.transfer(ALICE, BOB, 300_000).unwrap();

    assert_eq!(engine.get_account(ALICE).unwrap().balance, 700_000);
    assert_eq!(engine.get_account(BOB).unwrap().balance, 800_000);

    // Exactly one record, filed under the source with the destination as
    // counterparty.
    let all = engine.list_all_transactions();
    assert_eq!(all.len(), 1);
    assert_eq!(transaction.kind, TransactionKind::Transfer);
    assert_eq!(transaction.account_id, ALICE);
    assert_eq!(transaction.counterparty_account_id, Some(BOB));
    assert_eq!(transaction.amount, 300_000);
}

#[test]
fn transfer_preserves_total_balance() {
    let engine = seeded_engine();
    let before = total_balance(&engine);

    engine.transfer(ALICE, BOB, 123_456).unwrap();

    assert_eq!(total_balance(&engine), before);
}

#[test]
fn transfer_to_same_account_rejected() {
    let engine = seeded_engine();

    let result = engine.transfer(ALICE, ALICE, 100);
    assert_eq!(result, Err(LedgerError::SameAccount));
}

#[test]
fn transfer_zero_amount_rejected() {
    let engine = seeded_engine();

    let result = engine.transfer(ALICE, BOB, 0);
    assert_eq!(result, Err(LedgerError::InvalidAmount));
}

#[test]
fn transfer_insufficient_funds_leaves_both_sides_untouched() {
    let engine = seeded_engine();

    let result = engine.transfer(BOB, ALICE, 600_000);
    assert_eq!(result, Err(LedgerError::InsufficientFunds));

    assert_eq!(engine.get_account(ALICE).unwrap().balance, 1_000_000);
    assert_eq!(engine.get_account(BOB).unwrap().balance, 500_000);
    assert!(engine.list_all_transactions().is_empty());
}

#[test]
fn transfer_distinguishes_missing_source_from_missing_destination() {
    let engine = seeded_engine();

    let result = engine.transfer(UNKNOWN, ALICE, 100);
    assert_eq!(result, Err(LedgerError::AccountNotFound(UNKNOWN)));

    let result = engine.transfer(ALICE, UNKNOWN, 100);
    assert_eq!(result, Err(LedgerError::AccountNotFound(UNKNOWN)));
}

#[test]
fn transfer_rejects_inactive_source() {
    let engine = seeded_engine();

    let result = engine.transfer(DORMANT, ALICE, 10);
    assert_eq!(result, Err(LedgerError::AccountInactive(DORMANT)));
    assert_eq!(engine.get_account(ALICE).unwrap().balance, 1_000_000);
}

#[test]
fn transfer_rejects_inactive_destination() {
    let engine = seeded_engine();

    let result = engine.transfer(ALICE, DORMANT, 10);
    assert_eq!(result, Err(LedgerError::AccountInactive(DORMANT)));

    // Source untouched even though it was checked first.
    assert_eq!(engine.get_account(ALICE).unwrap().balance, 1_000_000);
    assert!(engine.list_all_transactions().is_empty());
}

// === Listing ===

#[test]
fn list_transactions_is_ordered_and_filtered() {
    let engine = seeded_engine();

    engine.deposit(ALICE, 100).unwrap();
    engine.deposit(BOB, 200).unwrap();
    engine.withdraw(ALICE, 50).unwrap();
    engine.transfer(ALICE, BOB, 25).unwrap();

    let for_alice = engine.list_transactions(ALICE).unwrap();
    let kinds: Vec<TransactionKind> = for_alice.iter().map(|tx| tx.kind).collect();
    assert_eq!(
        kinds,
        vec![
            TransactionKind::Deposit,
            TransactionKind::Withdrawal,
            TransactionKind::Transfer,
        ]
    );
    assert!(for_alice.windows(2).all(|w| w[0].id < w[1].id));

    // Bob's listing carries only his own deposit; the incoming transfer is
    // filed under the source.
    let for_bob = engine.list_transactions(BOB).unwrap();
    assert_eq!(for_bob.len(), 1);
    assert_eq!(for_bob[0].kind, TransactionKind::Deposit);
}

#[test]
fn list_all_transactions_is_ordered_by_id() {
    let engine = seeded_engine();

    engine.deposit(ALICE, 1).unwrap();
    engine.deposit(BOB, 2).unwrap();
    engine.transfer(ALICE, BOB, 1).unwrap();

    let all = engine.list_all_transactions();
    let ids: Vec<TransactionId> = all.iter().map(|tx| tx.id).collect();
    assert_eq!(ids, vec![TransactionId(1), TransactionId(2), TransactionId(3)]);
}

#[test]
fn list_transactions_unknown_account_fails() {
    let engine = seeded_engine();

    let result = engine.list_transactions(UNKNOWN);
    assert_eq!(result, Err(LedgerError::AccountNotFound(UNKNOWN)));
}

#[test]
fn list_transactions_empty_history_yields_empty_list() {
    let engine = seeded_engine();

    let transactions = engine.list_transactions(BOB).unwrap();
    assert!(transactions.is_empty());
}

// === Account administration ===

#[test]
fn deactivation_blocks_mutations_and_reactivation_restores_them() {
    let engine = seeded_engine();

    let account = engine.set_account_active(ALICE, false).unwrap();
    assert!(!account.active);

    assert_eq!(
        engine.deposit(ALICE, 100),
        Err(LedgerError::AccountInactive(ALICE))
    );

    engine.set_account_active(ALICE, true).unwrap();
    engine.deposit(ALICE, 100).unwrap();
    assert_eq!(engine.get_account(ALICE).unwrap().balance, 1_000_100);
}

#[test]
fn status_change_records_no_transaction() {
    let engine = seeded_engine();

    engine.set_account_active(DORMANT, true).unwrap();
    assert!(engine.list_all_transactions().is_empty());
}

#[test]
fn deactivated_account_history_stays_readable() {
    let engine = seeded_engine();

    engine.deposit(ALICE, 500).unwrap();
    engine.set_account_active(ALICE, false).unwrap();

    let transactions = engine.list_transactions(ALICE).unwrap();
    assert_eq!(transactions.len(), 1);
}

// === Conservation ===

#[test]
fn mixed_sequence_changes_total_by_net_of_deposits_and_withdrawals() {
    let engine = seeded_engine();
    let before = total_balance(&engine);

    engine.deposit(ALICE, 10_000).unwrap();
    engine.transfer(ALICE, BOB, 4_000).unwrap();
    engine.withdraw(BOB, 1_500).unwrap();
    engine.transfer(BOB, ALICE, 2_000).unwrap();
    engine.withdraw(ALICE, 500).unwrap();

    // Net: +10,000 deposited, -2,000 withdrawn; transfers cancel out.
    assert_eq!(total_balance(&engine), before + 10_000 - 2_000);
}
