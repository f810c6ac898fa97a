// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

//! Fee-breakdown calculator: ten independent line items and the two payout
//! totals derived from them. Saving returns whichever total the selector
//! points at; the caller overwrites the case's buyback amount with it.

use serde::{Deserialize, Serialize};

pub const DEFAULT_DOC_PROCESSING_FEE_CENTS: i64 = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeeField {
    AdvanceToDealer,
    Balance,
    InterestOwing,
    DiscountUnearned,
    DocProcessingFee,
    Gps,
    RepoFees,
    CpiEstimate,
    ServicingFees,
    PaymentRefund,
}

impl FeeField {
    pub const ALL: [Self; 10] = [
        Self::AdvanceToDealer,
        Self::Balance,
        Self::InterestOwing,
        Self::DiscountUnearned,
        Self::DocProcessingFee,
        Self::Gps,
        Self::RepoFees,
        Self::CpiEstimate,
        Self::ServicingFees,
        Self::PaymentRefund,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Self::AdvanceToDealer => "Advance to Dealer",
            Self::Balance => "Balance",
            Self::InterestOwing => "Interest Owing",
            Self::DiscountUnearned => "Discount Unearned",
            Self::DocProcessingFee => "Document Processing Fee",
            Self::Gps => "BB GPS",
            Self::RepoFees => "Repo / Transportation Fees",
            Self::CpiEstimate => "BB CPI EST",
            Self::ServicingFees => "Servicing Fees",
            Self::PaymentRefund => "BB PMT RFD",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Payout {
    #[default]
    CurrentBalance,
    CheckToDealer,
}

impl Payout {
    pub const fn label(self) -> &'static str {
        match self {
            Self::CurrentBalance => "Current Balance",
            Self::CheckToDealer => "Check to Dealer",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FeeBreakdown {
    pub advance_to_dealer_cents: i64,
    pub balance_cents: i64,
    pub interest_owing_cents: i64,
    pub discount_unearned_cents: i64,
    pub doc_processing_fee_cents: i64,
    pub gps_cents: i64,
    pub repo_fees_cents: i64,
    pub cpi_estimate_cents: i64,
    pub servicing_fees_cents: i64,
    pub payment_refund_cents: i64,
}

impl FeeBreakdown {
    /// The load-defaults baseline: zeros everywhere except the case's
    /// current buyback amount as the balance and a nominal processing fee.
    pub fn defaults_for(current_amount_cents: i64) -> Self {
        Self {
            balance_cents: current_amount_cents,
            doc_processing_fee_cents: DEFAULT_DOC_PROCESSING_FEE_CENTS,
            ..Self::default()
        }
    }

    pub const fn get(self, field: FeeField) -> i64 {
        match field {
            FeeField::AdvanceToDealer => self.advance_to_dealer_cents,
            FeeField::Balance => self.balance_cents,
            FeeField::InterestOwing => self.interest_owing_cents,
            FeeField::DiscountUnearned => self.discount_unearned_cents,
            FeeField::DocProcessingFee => self.doc_processing_fee_cents,
            FeeField::Gps => self.gps_cents,
            FeeField::RepoFees => self.repo_fees_cents,
            FeeField::CpiEstimate => self.cpi_estimate_cents,
            FeeField::ServicingFees => self.servicing_fees_cents,
            FeeField::PaymentRefund => self.payment_refund_cents,
        }
    }

    pub fn set(&mut self, field: FeeField, cents: i64) {
        match field {
            FeeField::AdvanceToDealer => self.advance_to_dealer_cents = cents,
            FeeField::Balance => self.balance_cents = cents,
            FeeField::InterestOwing => self.interest_owing_cents = cents,
            FeeField::DiscountUnearned => self.discount_unearned_cents = cents,
            FeeField::DocProcessingFee => self.doc_processing_fee_cents = cents,
            FeeField::Gps => self.gps_cents = cents,
            FeeField::RepoFees => self.repo_fees_cents = cents,
            FeeField::CpiEstimate => self.cpi_estimate_cents = cents,
            FeeField::ServicingFees => self.servicing_fees_cents = cents,
            FeeField::PaymentRefund => self.payment_refund_cents = cents,
        }
    }

    pub const fn check_to_dealer_cents(self) -> i64 {
        self.advance_to_dealer_cents + self.doc_processing_fee_cents
    }

    pub const fn current_balance_cents(self) -> i64 {
        self.balance_cents - self.discount_unearned_cents
            + self.interest_owing_cents
            + self.doc_processing_fee_cents
            + self.gps_cents
            + self.repo_fees_cents
            + self.cpi_estimate_cents
            + self.servicing_fees_cents
            - self.payment_refund_cents
    }

    pub const fn total_for(self, payout: Payout) -> i64 {
        match payout {
            Payout::CurrentBalance => self.current_balance_cents(),
            Payout::CheckToDealer => self.check_to_dealer_cents(),
        }
    }
}
