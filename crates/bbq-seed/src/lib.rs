// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

//! Deterministic mock fixtures: the initial case records ship as an embedded
//! JSON document, and per-case note/payment histories are generated from
//! small constant tables keyed off the case id.

use anyhow::{Context, Result};
use bbq_app::{CaseId, CaseRecord, NoteEntry, NoteEntryId, PaymentEntry, PaymentEntryId};

const CASES_JSON: &str = include_str!("../fixtures/cases.json");

const NOTE_AUTHORS: [&str; 4] = [
    "Jeremy Morrison",
    "Jane Doe",
    "Alex Ward",
    "Robin Turner",
];

const NOTE_BODIES: [&str; 6] = [
    "Called dealer, left voicemail. Follow-up scheduled.",
    "Received email from dealer, requested more information.",
    "Initial contact made. Dealer will review documents.",
    "Sent demand letter to dealer via certified mail.",
    "Dealer disputes the shortage amount; escalating to manager review.",
    "Confirmed payoff figures with servicing.",
];

const NOTE_STAMPS: [&str; 6] = [
    "06/12 04:49 PM",
    "06/12 04:50 PM",
    "06/11 09:30 AM",
    "06/10 02:15 PM",
    "06/07 11:05 AM",
    "06/03 03:40 PM",
];

pub fn seed_cases() -> Result<Vec<CaseRecord>> {
    serde_json::from_str(CASES_JSON).context("parse embedded case fixture")
}

/// Three deterministic notes per case, newest first, varied by case id so
/// adjacent rows do not show identical histories.
pub fn note_history(case_id: CaseId) -> Vec<NoteEntry> {
    let offset = case_id.get().unsigned_abs() as usize;
    (0..3)
        .map(|index| NoteEntry {
            id: NoteEntryId::new((offset * 10 + index) as i64),
            stamp: NOTE_STAMPS[(offset + index) % NOTE_STAMPS.len()].to_owned(),
            author: NOTE_AUTHORS[(offset + index) % NOTE_AUTHORS.len()].to_owned(),
            body: NOTE_BODIES[(offset + index) % NOTE_BODIES.len()].to_owned(),
            duration_minutes: if index == 0 { 5 } else { 0 },
        })
        .collect()
}

/// Seed payment history. Balances are left at zero; the ledger recomputes
/// them against the case's buyback amount when the modal opens.
pub fn payment_history(case_id: CaseId) -> Vec<PaymentEntry> {
    match case_id.get() {
        1 => vec![
            PaymentEntry {
                id: PaymentEntryId::new(1),
                date: "01/15/2024".to_owned(),
                amount_cents: 250_000,
                balance_cents: 0,
                is_final: false,
            },
            PaymentEntry {
                id: PaymentEntryId::new(2),
                date: "12/20/2023".to_owned(),
                amount_cents: 175_000,
                balance_cents: 0,
                is_final: false,
            },
        ],
        7 => vec![
            PaymentEntry {
                id: PaymentEntryId::new(1),
                date: "06/30/2023".to_owned(),
                amount_cents: 200_000,
                balance_cents: 0,
                is_final: false,
            },
            PaymentEntry {
                id: PaymentEntryId::new(2),
                date: "07/14/2023".to_owned(),
                amount_cents: 225_000,
                balance_cents: 0,
                is_final: true,
            },
        ],
        _ => Vec::new(),
    }
}
