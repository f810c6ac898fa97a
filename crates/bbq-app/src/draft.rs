// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

//! Row editing state: a committed record plus a local draft, with dirty
//! flags defined as a pure field-by-field comparison between the two. The
//! draft reacts to a small event set (external update, field edit, save)
//! instead of re-deriving itself from effect chains.

use crate::{BbStatus, BbType, CaseRecord, LetterKind, dates};

/// The six designated fields whose edits enable the row Save action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DirtyFields {
    pub bb_type: bool,
    pub bb_status: bool,
    pub date_filed: bool,
    pub due_date: bool,
    pub amount: bool,
    pub follow_up: bool,
}

impl DirtyFields {
    pub fn between(committed: &CaseRecord, draft: &CaseRecord) -> Self {
        Self {
            bb_type: committed.bb_type != draft.bb_type,
            bb_status: committed.bb_status != draft.bb_status,
            date_filed: committed.date_filed != draft.date_filed,
            due_date: committed.due_date != draft.due_date,
            amount: committed.amount_cents != draft.amount_cents,
            follow_up: committed.follow_up_date != draft.follow_up_date,
        }
    }

    pub const fn any(self) -> bool {
        self.bb_type
            || self.bb_status
            || self.date_filed
            || self.due_date
            || self.amount
            || self.follow_up
    }
}

/// An edit to one of the designated fields. Date edits carry the raw input
/// text; the draft decides whether to accept it.
#[derive(Debug, Clone, PartialEq)]
pub enum DraftEdit {
    BbType(Option<BbType>),
    BbStatus(Option<BbStatus>),
    DateFiled(String),
    DueDate(String),
    Amount(i64),
    FollowUpDate(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum DraftEvent {
    ExternalUpdate(CaseRecord),
    Edit(DraftEdit),
    SavePressed,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DraftOutcome {
    Updated,
    /// The keystroke would have broken the date pattern; draft unchanged.
    Rejected,
    /// Hand this record to the container as the new committed copy.
    Save(CaseRecord),
    SaveUnavailable,
}

/// Combined payload of the note / promise-to-pay modal's Done action.
#[derive(Debug, Clone, PartialEq)]
pub struct NoteSave {
    pub follow_up_date: String,
    pub promise_date: String,
    pub promise_amount_cents: i64,
    pub letter: Option<LetterKind>,
    pub note: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RowDraft {
    committed: CaseRecord,
    draft: CaseRecord,
    edited: bool,
}

impl RowDraft {
    pub fn new(record: CaseRecord) -> Self {
        Self {
            draft: record.clone(),
            committed: record,
            edited: false,
        }
    }

    pub fn committed(&self) -> &CaseRecord {
        &self.committed
    }

    pub fn draft(&self) -> &CaseRecord {
        &self.draft
    }

    /// Any field touched since the last external update, designated or not.
    pub fn is_edited(&self) -> bool {
        self.edited
    }

    pub fn dirty_fields(&self) -> DirtyFields {
        DirtyFields::between(&self.committed, &self.draft)
    }

    pub fn is_core_dirty(&self) -> bool {
        self.dirty_fields().any()
    }

    pub fn apply(&mut self, event: DraftEvent) -> DraftOutcome {
        match event {
            DraftEvent::ExternalUpdate(record) => {
                self.draft = record.clone();
                self.committed = record;
                self.edited = false;
                DraftOutcome::Updated
            }
            DraftEvent::Edit(edit) => self.apply_edit(edit),
            DraftEvent::SavePressed => {
                if !self.is_core_dirty() {
                    return DraftOutcome::SaveUnavailable;
                }
                // Re-normalize the canonical date fields in case a short-form
                // value slipped through an edit path.
                let mut record = self.draft.clone();
                record.date_filed = dates::canonical_form(&record.date_filed);
                record.due_date = dates::canonical_form(&record.due_date);
                record.follow_up_date = dates::canonical_form(&record.follow_up_date);
                DraftOutcome::Save(record)
            }
        }
    }

    fn apply_edit(&mut self, edit: DraftEdit) -> DraftOutcome {
        match edit {
            DraftEdit::BbType(value) => self.draft.bb_type = value,
            DraftEdit::BbStatus(value) => self.draft.bb_status = value,
            DraftEdit::Amount(cents) => self.draft.amount_cents = cents,
            DraftEdit::DateFiled(input) => {
                let Some(value) = dates::normalize_input(&input) else {
                    return DraftOutcome::Rejected;
                };
                self.draft.date_filed = value;
            }
            DraftEdit::DueDate(input) => {
                let Some(value) = dates::normalize_input(&input) else {
                    return DraftOutcome::Rejected;
                };
                self.draft.due_date = value;
            }
            DraftEdit::FollowUpDate(input) => {
                let Some(value) = dates::normalize_input(&input) else {
                    return DraftOutcome::Rejected;
                };
                self.draft.follow_up_date = value;
            }
        }
        self.edited = true;
        DraftOutcome::Updated
    }

    /// The fee-breakdown modal overwrites the amount and propagates at once,
    /// not gated behind the row Save. Returns the record to commit.
    pub fn apply_amount_adjustment(&mut self, cents: i64) -> CaseRecord {
        self.draft.amount_cents = cents;
        self.edited = true;
        self.draft.clone()
    }

    /// The note modal's Done payload also commits immediately as one unit.
    /// Returns the record to commit.
    pub fn apply_note_save(&mut self, save: &NoteSave) -> CaseRecord {
        self.draft.follow_up_date = save.follow_up_date.clone();
        self.draft.promise_date = save.promise_date.clone();
        self.draft.promise_amount_cents = save.promise_amount_cents;
        self.draft.has_note = !save.note.trim().is_empty() || self.draft.has_note;
        self.draft.letter_sent = save.letter.is_some() || self.draft.letter_sent;
        self.edited = true;
        self.draft.clone()
    }
}
