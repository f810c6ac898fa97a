// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

//! The payment ledger behind the modal's PAYMENTS page. Balances are never
//! patched incrementally: a payment may land chronologically before existing
//! entries, so every record re-sorts the whole ledger and rebuilds the
//! running balance from the case's buyback amount.

use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};

use crate::ids::PaymentEntryId;
use crate::{dates, money};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentEntry {
    pub id: PaymentEntryId,
    pub date: String,
    pub amount_cents: i64,
    pub balance_cents: i64,
    pub is_final: bool,
}

impl PaymentEntry {
    pub const fn kind_label(&self) -> &'static str {
        if self.is_final { "Paid" } else { "Payment" }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentLedger {
    starting_cents: i64,
    entries: Vec<PaymentEntry>,
    next_id: i64,
}

impl PaymentLedger {
    /// Build a ledger over `starting_cents` (the case's buyback amount).
    /// Seed entries may carry stale balances; they are recomputed here.
    pub fn new(starting_cents: i64, seed: Vec<PaymentEntry>) -> Self {
        let next_id = seed.iter().map(|entry| entry.id.get()).max().unwrap_or(0) + 1;
        let mut ledger = Self {
            starting_cents,
            entries: seed,
            next_id,
        };
        ledger.recompute();
        ledger
    }

    pub const fn starting_cents(&self) -> i64 {
        self.starting_cents
    }

    /// Entries in display order: descending by date.
    pub fn entries(&self) -> &[PaymentEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all payment amounts, independent of any ordering.
    pub fn total_paid_cents(&self) -> i64 {
        self.entries.iter().map(|entry| entry.amount_cents).sum()
    }

    /// Validate and record a payment, then re-establish the balance
    /// invariant over the entire ledger. The error message is the blocking
    /// text surfaced to the user; nothing changes on failure.
    pub fn record(
        &mut self,
        date_input: &str,
        amount_text: &str,
        is_final: bool,
    ) -> Result<PaymentEntryId> {
        let amount_cents = money::parse_input(amount_text).unwrap_or(0);
        if amount_cents <= 0 || date_input.trim().is_empty() {
            bail!("Please enter a valid Amount Paid and Payment Date (mm/dd/yy).");
        }

        let id = PaymentEntryId::new(self.next_id);
        self.next_id += 1;
        self.entries.push(PaymentEntry {
            id,
            date: dates::canonical_form(date_input.trim()),
            amount_cents,
            balance_cents: 0,
            is_final,
        });
        self.recompute();
        Ok(id)
    }

    /// Sort ascending by date (entry id as tie-break), walk the running
    /// balance down from the starting amount flooring at zero, then flip to
    /// descending for display.
    fn recompute(&mut self) {
        self.entries
            .sort_by_key(|entry| (dates::parse_canonical(&entry.date), entry.id.get()));

        let mut balance = self.starting_cents;
        for entry in &mut self.entries {
            balance -= entry.amount_cents;
            entry.balance_cents = balance.max(0);
            balance = entry.balance_cents;
        }

        self.entries.reverse();
    }
}
