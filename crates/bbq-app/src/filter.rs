// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

//! The container's filter pipeline and tab-count aggregation. Stages run in
//! a fixed order, each narrowing the previous stage's output; counts always
//! come from the full unfiltered collection.

use std::collections::BTreeSet;

use crate::{BbStatus, BbType, CaseCategory, CaseRecord, TabKind};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterState {
    pub tab: TabKind,
    pub search: String,
    pub active_only: bool,
    pub follow_up_only: bool,
    pub statuses: BTreeSet<BbStatus>,
    pub types: BTreeSet<BbType>,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            tab: TabKind::All,
            search: String::new(),
            // The Active toggle starts on.
            active_only: true,
            follow_up_only: false,
            statuses: BTreeSet::new(),
            types: BTreeSet::new(),
        }
    }
}

impl FilterState {
    pub fn matches(&self, record: &CaseRecord) -> bool {
        if let Some(category) = self.tab.category()
            && record.category != category
        {
            return false;
        }
        if self.active_only && !record.is_active {
            return false;
        }
        if self.follow_up_only && record.follow_up_date.trim().is_empty() {
            return false;
        }
        if !self.statuses.is_empty()
            && !record
                .bb_status
                .is_some_and(|status| self.statuses.contains(&status))
        {
            return false;
        }
        if !self.types.is_empty()
            && !record.bb_type.is_some_and(|kind| self.types.contains(&kind))
        {
            return false;
        }
        if !self.search.is_empty() && !matches_search(record, &self.search) {
            return false;
        }
        true
    }
}

/// Case-insensitive substring search across the four searchable fields.
fn matches_search(record: &CaseRecord, term: &str) -> bool {
    let needle = term.to_lowercase();
    [
        record.dealer_name.as_str(),
        record.primary_name.as_str(),
        record.dealer_id.as_str(),
        record.account_number.as_str(),
    ]
    .into_iter()
    .any(|haystack| haystack.to_lowercase().contains(&needle))
}

pub fn apply_filters<'a>(records: &'a [CaseRecord], filter: &FilterState) -> Vec<&'a CaseRecord> {
    records
        .iter()
        .filter(|record| filter.matches(record))
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TabCounts {
    pub all: usize,
    pub pending_file: usize,
    pub bb_letter_sent: usize,
    pub demand_letter_sent: usize,
    pub forced_ach_processed: usize,
    pub referred_to_legal: usize,
    pub paid_settled: usize,
}

impl TabCounts {
    pub const fn for_tab(self, tab: TabKind) -> usize {
        match tab {
            TabKind::All => self.all,
            TabKind::Category(CaseCategory::PendingFile) => self.pending_file,
            TabKind::Category(CaseCategory::BbLetterSent) => self.bb_letter_sent,
            TabKind::Category(CaseCategory::DemandLetterSent) => self.demand_letter_sent,
            TabKind::Category(CaseCategory::ForcedAchProcessed) => self.forced_ach_processed,
            TabKind::Category(CaseCategory::ReferredToLegal) => self.referred_to_legal,
            TabKind::Category(CaseCategory::PaidSettled) => self.paid_settled,
        }
    }
}

/// Real per-category counts over the full collection, by exact category
/// equality.
pub fn tab_counts(records: &[CaseRecord]) -> TabCounts {
    let of = |category: CaseCategory| {
        records
            .iter()
            .filter(|record| record.category == category)
            .count()
    };
    TabCounts {
        all: records.len(),
        pending_file: of(CaseCategory::PendingFile),
        bb_letter_sent: of(CaseCategory::BbLetterSent),
        demand_letter_sent: of(CaseCategory::DemandLetterSent),
        forced_ach_processed: of(CaseCategory::ForcedAchProcessed),
        referred_to_legal: of(CaseCategory::ReferredToLegal),
        paid_settled: of(CaseCategory::PaidSettled),
    }
}

#[cfg(test)]
mod tests {
    use super::{FilterState, apply_filters, tab_counts};
    use crate::{
        BbStatus, BbType, CaseCategory, CaseId, CaseRecord, DealerType, RepoStatus, TabKind,
        TitleStatus,
    };
    use std::collections::BTreeSet;

    fn case(id: i64, category: CaseCategory, active: bool) -> CaseRecord {
        CaseRecord {
            id: CaseId::new(id),
            dealer_name: format!("Dealer {id}"),
            dealer_number: format!("{}", 6600 + id),
            primary_name: format!("Primary {id}"),
            dealer_id: format!("D-{id:04}"),
            branch: 1,
            rsm: "R. Smith".to_owned(),
            fund: 2,
            account_number: format!("AC-{id:05}"),
            bb_type: Some(BbType::BuybackFiled),
            bb_status: Some(BbStatus::CalledDealer),
            date_filed: "01/05/2024".to_owned(),
            due_date: "02/05/2024".to_owned(),
            amount_cents: 100_000,
            days_past_due: 10,
            repo_status: RepoStatus::None,
            current_status: "-".to_owned(),
            follow_up_date: String::new(),
            has_note: false,
            letter_sent: false,
            is_active: active,
            category,
            dealer_address_line_1: String::new(),
            dealer_address_line_2: String::new(),
            dealer_phone: String::new(),
            dealer_email: String::new(),
            dealer_type: DealerType::NonFranchise,
            insurance_status: String::new(),
            registration_status: String::new(),
            registration_issue_date: String::new(),
            title_status: TitleStatus::Outstanding,
            title_received_date: String::new(),
            loan_insurance_status: String::new(),
            promise_date: String::new(),
            promise_amount_cents: 0,
        }
    }

    #[test]
    fn tab_and_active_toggle_compose() {
        let a = case(1, CaseCategory::PendingFile, true);
        let b = case(2, CaseCategory::PendingFile, false);
        let records = vec![a, b];

        let mut filter = FilterState {
            tab: TabKind::Category(CaseCategory::PendingFile),
            ..FilterState::default()
        };
        let visible = apply_filters(&records, &filter);
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].id.get(), 1);

        filter.active_only = false;
        assert_eq!(apply_filters(&records, &filter).len(), 2);
    }

    #[test]
    fn follow_up_toggle_requires_a_follow_up_date() {
        let mut with_date = case(1, CaseCategory::PendingFile, true);
        with_date.follow_up_date = "03/10/2024".to_owned();
        let without = case(2, CaseCategory::PendingFile, true);
        let records = vec![with_date, without];

        let filter = FilterState {
            follow_up_only: true,
            ..FilterState::default()
        };
        let visible = apply_filters(&records, &filter);
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].id.get(), 1);
    }

    #[test]
    fn multi_select_status_and_type_narrow_the_result() {
        let mut legal = case(1, CaseCategory::PendingFile, true);
        legal.bb_status = Some(BbStatus::ReferredToLegal);
        legal.bb_type = Some(BbType::Unwind);
        let called = case(2, CaseCategory::PendingFile, true);
        let mut unset = case(3, CaseCategory::PendingFile, true);
        unset.bb_status = None;
        let records = vec![legal, called, unset];

        let filter = FilterState {
            statuses: BTreeSet::from([BbStatus::ReferredToLegal]),
            ..FilterState::default()
        };
        let visible = apply_filters(&records, &filter);
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].id.get(), 1);

        let filter = FilterState {
            statuses: BTreeSet::from([BbStatus::ReferredToLegal]),
            types: BTreeSet::from([BbType::BuybackFiled]),
            ..FilterState::default()
        };
        assert!(apply_filters(&records, &filter).is_empty());
    }

    #[test]
    fn search_spans_the_four_searchable_fields_case_insensitively() {
        let mut by_dealer = case(1, CaseCategory::PendingFile, true);
        by_dealer.dealer_name = "Summit Auto".to_owned();
        let mut by_primary = case(2, CaseCategory::PendingFile, true);
        by_primary.primary_name = "Jordan Summers".to_owned();
        let mut by_dealer_id = case(3, CaseCategory::PendingFile, true);
        by_dealer_id.dealer_id = "SUM-77".to_owned();
        let mut by_account = case(4, CaseCategory::PendingFile, true);
        by_account.account_number = "ACC-SUM".to_owned();
        let unrelated = case(5, CaseCategory::PendingFile, true);
        let records = vec![by_dealer, by_primary, by_dealer_id, by_account, unrelated];

        let filter = FilterState {
            search: "sum".to_owned(),
            ..FilterState::default()
        };
        let visible = apply_filters(&records, &filter);
        let ids: Vec<i64> = visible.iter().map(|record| record.id.get()).collect();
        assert_eq!(ids, vec![1, 2, 3, 4]);
    }

    #[test]
    fn counts_come_from_the_unfiltered_collection() {
        let records = vec![
            case(1, CaseCategory::PendingFile, true),
            case(2, CaseCategory::PendingFile, false),
            case(3, CaseCategory::PaidSettled, true),
            case(4, CaseCategory::ReferredToLegal, false),
        ];

        let counts = tab_counts(&records);
        assert_eq!(counts.all, 4);
        assert_eq!(counts.pending_file, 2);
        assert_eq!(counts.paid_settled, 1);
        assert_eq!(counts.referred_to_legal, 1);
        assert_eq!(counts.bb_letter_sent, 0);
        assert_eq!(
            counts.for_tab(TabKind::Category(CaseCategory::PendingFile)),
            2
        );
        assert_eq!(counts.for_tab(TabKind::All), 4);
    }
}
