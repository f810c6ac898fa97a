// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

//! In-memory owner of the authoritative case collection plus the seeded
//! note and payment histories. Nothing outside this type mutates the
//! collection; rows and modals hand edited records back through
//! [`Store::update_case`], the single mutation entry point.

use anyhow::{Result, bail};
use bbq_app::{CaseId, CaseRecord, NoteEntry, PaymentEntry};
use std::collections::{BTreeMap, BTreeSet};

pub const APP_NAME: &str = "bbq";

#[derive(Debug, Clone, Default)]
pub struct Store {
    cases: Vec<CaseRecord>,
    notes: BTreeMap<CaseId, Vec<NoteEntry>>,
    payments: BTreeMap<CaseId, Vec<PaymentEntry>>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cases(cases: Vec<CaseRecord>) -> Result<Self> {
        let mut seen = BTreeSet::new();
        for case in &cases {
            if !seen.insert(case.id) {
                bail!("duplicate case id {} in seed data", case.id.get());
            }
        }
        Ok(Self {
            cases,
            ..Self::default()
        })
    }

    pub fn cases(&self) -> &[CaseRecord] {
        &self.cases
    }

    pub fn len(&self) -> usize {
        self.cases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }

    pub fn get_case(&self, id: CaseId) -> Option<&CaseRecord> {
        self.cases.iter().find(|case| case.id == id)
    }

    /// Replace one record by identity. Callers always send the full record,
    /// never a diff.
    pub fn update_case(&mut self, record: CaseRecord) -> Result<()> {
        match self.cases.iter_mut().find(|case| case.id == record.id) {
            Some(slot) => {
                *slot = record;
                Ok(())
            }
            None => bail!("unknown case id {}", record.id.get()),
        }
    }

    pub fn seed_notes(&mut self, case_id: CaseId, notes: Vec<NoteEntry>) {
        self.notes.insert(case_id, notes);
    }

    pub fn seed_payments(&mut self, case_id: CaseId, payments: Vec<PaymentEntry>) {
        self.payments.insert(case_id, payments);
    }

    pub fn note_history(&self, case_id: CaseId) -> &[NoteEntry] {
        self.notes.get(&case_id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn payment_history(&self, case_id: CaseId) -> &[PaymentEntry] {
        self.payments
            .get(&case_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}
