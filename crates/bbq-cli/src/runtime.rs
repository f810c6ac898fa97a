// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::Result;
use bbq_app::{CaseId, CaseRecord, NoteEntry, PaymentEntry};
use bbq_store::Store;

pub struct StoreRuntime {
    store: Store,
}

impl StoreRuntime {
    pub fn new(store: Store) -> Self {
        Self { store }
    }
}

impl bbq_tui::AppRuntime for StoreRuntime {
    fn load_cases(&mut self) -> Result<Vec<CaseRecord>> {
        Ok(self.store.cases().to_vec())
    }

    fn update_case(&mut self, record: &CaseRecord) -> Result<()> {
        self.store.update_case(record.clone())
    }

    fn load_note_history(&mut self, case_id: CaseId) -> Result<Vec<NoteEntry>> {
        Ok(self.store.note_history(case_id).to_vec())
    }

    fn load_payment_history(&mut self, case_id: CaseId) -> Result<Vec<PaymentEntry>> {
        Ok(self.store.payment_history(case_id).to_vec())
    }
}
