// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};
use time::Date;

use crate::dates;
use crate::ids::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BbType {
    AulShortage,
    BbLegalBuyback,
    BreachOfMasterDealerAgreement,
    BuybackFiled,
    BuybackRequested,
    ComplianceHold,
    CourtesyBuyback,
    DealerBuyback,
    DparRequest,
    FirstPaymentDefault,
    GapRequest,
    KbbDiscrepancy,
    RecourseAccount,
    TbLegalBuyback,
    TitleBuyback,
    Unwind,
    VoluntarySurrender,
    WarrantyCancellation,
}

impl BbType {
    pub const ALL: [Self; 18] = [
        Self::AulShortage,
        Self::BbLegalBuyback,
        Self::BreachOfMasterDealerAgreement,
        Self::BuybackFiled,
        Self::BuybackRequested,
        Self::ComplianceHold,
        Self::CourtesyBuyback,
        Self::DealerBuyback,
        Self::DparRequest,
        Self::FirstPaymentDefault,
        Self::GapRequest,
        Self::KbbDiscrepancy,
        Self::RecourseAccount,
        Self::TbLegalBuyback,
        Self::TitleBuyback,
        Self::Unwind,
        Self::VoluntarySurrender,
        Self::WarrantyCancellation,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AulShortage => "Aul Shortage",
            Self::BbLegalBuyback => "BB Legal Buyback",
            Self::BreachOfMasterDealerAgreement => "Breach of Master Dealer Agreement",
            Self::BuybackFiled => "Buyback Filed",
            Self::BuybackRequested => "Buyback Requested",
            Self::ComplianceHold => "Compliance Hold",
            Self::CourtesyBuyback => "Courtesy Buyback",
            Self::DealerBuyback => "Dealer Buyback",
            Self::DparRequest => "DPAR request",
            Self::FirstPaymentDefault => "First Payment Default",
            Self::GapRequest => "Gap Request",
            Self::KbbDiscrepancy => "KBB Discrepancy",
            Self::RecourseAccount => "Recourse Account",
            Self::TbLegalBuyback => "TB Legal Buyback",
            Self::TitleBuyback => "Title Buyback",
            Self::Unwind => "Unwind",
            Self::VoluntarySurrender => "Voluntary Surrender",
            Self::WarrantyCancellation => "Warranty Cancellation",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BbStatus {
    ThirdPartyGapPaid,
    ActiveArrangements,
    ActiveInstallments,
    AdditionalRecourseReceived,
    ApprovedCustPtp,
    AtpcReceived,
    AtpcRequested,
    AulCallMade,
    AulLetterSent,
    AulPaid,
    BbAchPending,
    BbAchReturnedFwdToLegal,
    BbCheckProcessed,
    BbCorpLegalDlrCollect,
    BbCorpLegalDlrNotCollect,
    BrandedHistory,
    BrandedTitle,
    BuybackPaid,
    BuybackPaidOfr,
    BuybackSettled,
    CalledDealer,
    CloseAsABb,
    ClosedWithinRcrs,
    CoBuybackPaid,
    CorpLegal,
    CustomerClaimsAgainstDealer,
    CustomerFraud,
    CustomerNotCooperating,
    DeadBuyback,
    DeadChargeOff,
    DealerFraud,
    DealerOob,
    DealerToSecureOwnUnit,
    DeferredPickPayment,
    DemandLetterRequested,
    DemandLetterSent,
    DparPaid,
    EmailedDealer,
    ExecutiveWaive,
    ExtOfRcrsAndSecDepReq,
    ExtensionOfRecourseRequested,
    ForcedAch,
    GapClaimPaidOut,
    GapRefundPaid,
    GapRefundRequest,
    IdentityTheft,
    InsClaimPending,
    InsClaimRepairable,
    InsClaimTtl,
    JudgmentEntered,
    KbbPaid,
    KbbPast,
    KbbSettled,
    LegalNotPursued,
    LetterSent,
    LienRemoval,
    Lmtcb,
    ManagerReview,
    ManagerWaive,
    MechanicalIssues,
    MonitorBuyback,
    MultipleAncillaryDue,
    NewBbContactDealer,
    NoBreachFound,
    NoMechanicalIssues,
    OpenInsuranceClaim,
    OutForRepo,
    PartialBuybackPaid,
    PartialRepuPosted,
    PendingDealerArrangements,
    PendingTitleFromAuction,
    PostdatedCkInhouse,
    ReferredToLegal,
    RepoBuyback,
    RepuPosted,
    ReqAssistFromRsm,
    SecuredTitle,
    SmallBalanceNoLegal,
    StrawPurchase,
    TbbPaid,
    TbdPart,
    TitlePerfected,
    UnderAmReview,
    UnderMechanicalReview,
    UnpaidGapWarr,
    UnpaidTrade,
    VcGapWaived,
    VehicleRepaired,
    VehicleRepossessed,
    VehicleSurrenderedAtDlr,
    VoluntarySurrender,
    VrReceived,
    WarrantyPaid,
    WcDemandLetterSent,
    WcLegalBuyback,
}

impl BbStatus {
    pub const ALL: [Self; 95] = [
        Self::ThirdPartyGapPaid,
        Self::ActiveArrangements,
        Self::ActiveInstallments,
        Self::AdditionalRecourseReceived,
        Self::ApprovedCustPtp,
        Self::AtpcReceived,
        Self::AtpcRequested,
        Self::AulCallMade,
        Self::AulLetterSent,
        Self::AulPaid,
        Self::BbAchPending,
        Self::BbAchReturnedFwdToLegal,
        Self::BbCheckProcessed,
        Self::BbCorpLegalDlrCollect,
        Self::BbCorpLegalDlrNotCollect,
        Self::BrandedHistory,
        Self::BrandedTitle,
        Self::BuybackPaid,
        Self::BuybackPaidOfr,
        Self::BuybackSettled,
        Self::CalledDealer,
        Self::CloseAsABb,
        Self::ClosedWithinRcrs,
        Self::CoBuybackPaid,
        Self::CorpLegal,
        Self::CustomerClaimsAgainstDealer,
        Self::CustomerFraud,
        Self::CustomerNotCooperating,
        Self::DeadBuyback,
        Self::DeadChargeOff,
        Self::DealerFraud,
        Self::DealerOob,
        Self::DealerToSecureOwnUnit,
        Self::DeferredPickPayment,
        Self::DemandLetterRequested,
        Self::DemandLetterSent,
        Self::DparPaid,
        Self::EmailedDealer,
        Self::ExecutiveWaive,
        Self::ExtOfRcrsAndSecDepReq,
        Self::ExtensionOfRecourseRequested,
        Self::ForcedAch,
        Self::GapClaimPaidOut,
        Self::GapRefundPaid,
        Self::GapRefundRequest,
        Self::IdentityTheft,
        Self::InsClaimPending,
        Self::InsClaimRepairable,
        Self::InsClaimTtl,
        Self::JudgmentEntered,
        Self::KbbPaid,
        Self::KbbPast,
        Self::KbbSettled,
        Self::LegalNotPursued,
        Self::LetterSent,
        Self::LienRemoval,
        Self::Lmtcb,
        Self::ManagerReview,
        Self::ManagerWaive,
        Self::MechanicalIssues,
        Self::MonitorBuyback,
        Self::MultipleAncillaryDue,
        Self::NewBbContactDealer,
        Self::NoBreachFound,
        Self::NoMechanicalIssues,
        Self::OpenInsuranceClaim,
        Self::OutForRepo,
        Self::PartialBuybackPaid,
        Self::PartialRepuPosted,
        Self::PendingDealerArrangements,
        Self::PendingTitleFromAuction,
        Self::PostdatedCkInhouse,
        Self::ReferredToLegal,
        Self::RepoBuyback,
        Self::RepuPosted,
        Self::ReqAssistFromRsm,
        Self::SecuredTitle,
        Self::SmallBalanceNoLegal,
        Self::StrawPurchase,
        Self::TbbPaid,
        Self::TbdPart,
        Self::TitlePerfected,
        Self::UnderAmReview,
        Self::UnderMechanicalReview,
        Self::UnpaidGapWarr,
        Self::UnpaidTrade,
        Self::VcGapWaived,
        Self::VehicleRepaired,
        Self::VehicleRepossessed,
        Self::VehicleSurrenderedAtDlr,
        Self::VoluntarySurrender,
        Self::VrReceived,
        Self::WarrantyPaid,
        Self::WcDemandLetterSent,
        Self::WcLegalBuyback,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ThirdPartyGapPaid => "3P GAP Paid",
            Self::ActiveArrangements => "Active Arrangements",
            Self::ActiveInstallments => "Active Installments",
            Self::AdditionalRecourseReceived => "Additional Recourse Received",
            Self::ApprovedCustPtp => "Approved Cust PTP",
            Self::AtpcReceived => "ATPC Received",
            Self::AtpcRequested => "ATPC Requested",
            Self::AulCallMade => "AUL Call Made",
            Self::AulLetterSent => "AUL Letter Sent",
            Self::AulPaid => "AUL Paid",
            Self::BbAchPending => "BB ACH Pending",
            Self::BbAchReturnedFwdToLegal => "BB ACH Returned/FWD to Legal",
            Self::BbCheckProcessed => "BB Check Processed",
            Self::BbCorpLegalDlrCollect => "BB Corp Legal - Dlr Collect",
            Self::BbCorpLegalDlrNotCollect => "BB Corp Legal - Dlr Not Collect",
            Self::BrandedHistory => "Branded History",
            Self::BrandedTitle => "Branded Title",
            Self::BuybackPaid => "Buyback Paid",
            Self::BuybackPaidOfr => "Buyback Paid - OFR",
            Self::BuybackSettled => "Buyback Settled",
            Self::CalledDealer => "Called Dealer",
            Self::CloseAsABb => "Close as a BB",
            Self::ClosedWithinRcrs => "Closed within RCRS",
            Self::CoBuybackPaid => "CO Buyback Paid",
            Self::CorpLegal => "Corp Legal",
            Self::CustomerClaimsAgainstDealer => "Customer Claims Against Dealer",
            Self::CustomerFraud => "Customer Fraud",
            Self::CustomerNotCooperating => "Customer Not Cooperating",
            Self::DeadBuyback => "Dead Buyback",
            Self::DeadChargeOff => "Dead Charge Off",
            Self::DealerFraud => "Dealer Fraud",
            Self::DealerOob => "Dealer OOB",
            Self::DealerToSecureOwnUnit => "Dealer to Secure Own Unit",
            Self::DeferredPickPayment => "Deferred Pick Payment",
            Self::DemandLetterRequested => "Demand letter requested",
            Self::DemandLetterSent => "Demand Letter Sent",
            Self::DparPaid => "DPAR Paid",
            Self::EmailedDealer => "Emailed Dealer",
            Self::ExecutiveWaive => "Executive Waive",
            Self::ExtOfRcrsAndSecDepReq => "Ext of Rcrs & Sec Dep Req",
            Self::ExtensionOfRecourseRequested => "Extension of Recourse Requested",
            Self::ForcedAch => "Forced ACH",
            Self::GapClaimPaidOut => "GAP Claim Paid Out",
            Self::GapRefundPaid => "Gap Refund Paid",
            Self::GapRefundRequest => "Gap Refund Request",
            Self::IdentityTheft => "Identity Theft",
            Self::InsClaimPending => "Ins Claim Pending",
            Self::InsClaimRepairable => "Ins Claim Repairable",
            Self::InsClaimTtl => "Ins Claim TTL",
            Self::JudgmentEntered => "Judgment Entered",
            Self::KbbPaid => "KBB Paid",
            Self::KbbPast => "KBB Past",
            Self::KbbSettled => "KBB Settled",
            Self::LegalNotPursued => "Legal Not Pursued",
            Self::LetterSent => "Letter Sent",
            Self::LienRemoval => "Lien Removal",
            Self::Lmtcb => "LMTCB",
            Self::ManagerReview => "Manager Review",
            Self::ManagerWaive => "Manager Waive",
            Self::MechanicalIssues => "Mechanical Issues",
            Self::MonitorBuyback => "Monitor BuyBack",
            Self::MultipleAncillaryDue => "Multiple Ancillary Due",
            Self::NewBbContactDealer => "New BB - Contact Dealer",
            Self::NoBreachFound => "No Breach Found",
            Self::NoMechanicalIssues => "No Mechanical Issues",
            Self::OpenInsuranceClaim => "Open Insurance Claim",
            Self::OutForRepo => "Out for Repo",
            Self::PartialBuybackPaid => "Partial Buyback Paid",
            Self::PartialRepuPosted => "Partial REPU Posted",
            Self::PendingDealerArrangements => "Pending Dealer Arrangements",
            Self::PendingTitleFromAuction => "Pending Title from Auction",
            Self::PostdatedCkInhouse => "Postdated Ck Inhouse",
            Self::ReferredToLegal => "Referred to Legal",
            Self::RepoBuyback => "Repo Buyback",
            Self::RepuPosted => "REPU Posted",
            Self::ReqAssistFromRsm => "Req Assist from RSM",
            Self::SecuredTitle => "Secured Title",
            Self::SmallBalanceNoLegal => "Small Balance - No Legal",
            Self::StrawPurchase => "Straw Purchase",
            Self::TbbPaid => "TBB Paid",
            Self::TbdPart => "TBD Part",
            Self::TitlePerfected => "Title Perfected",
            Self::UnderAmReview => "Under AM Review",
            Self::UnderMechanicalReview => "Under Mechanical Review",
            Self::UnpaidGapWarr => "Unpaid GAP/WARR",
            Self::UnpaidTrade => "Unpaid Trade",
            Self::VcGapWaived => "VC GAP Waived",
            Self::VehicleRepaired => "Vehicle Repaired",
            Self::VehicleRepossessed => "Vehicle Repossessed",
            Self::VehicleSurrenderedAtDlr => "Vehicle Surrendered at Dlr",
            Self::VoluntarySurrender => "Voluntary Surrender",
            Self::VrReceived => "VR Received",
            Self::WarrantyPaid => "Warranty Paid",
            Self::WcDemandLetterSent => "WC Demand Letter Sent",
            Self::WcLegalBuyback => "WC Legal Buyback",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|status| status.as_str() == value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RepoStatus {
    None,
    PendingRecovery,
    Repossessed,
    Sold,
}

impl RepoStatus {
    pub const ALL: [Self; 4] = [
        Self::None,
        Self::PendingRecovery,
        Self::Repossessed,
        Self::Sold,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "-",
            Self::PendingRecovery => "Pending Recovery",
            Self::Repossessed => "Repossessed",
            Self::Sold => "Sold",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|status| status.as_str() == value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TitleStatus {
    Received,
    Outstanding,
}

impl TitleStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Received => "Received",
            Self::Outstanding => "Outstanding",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Received" => Some(Self::Received),
            "Outstanding" => Some(Self::Outstanding),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DealerType {
    Franchise,
    NonFranchise,
    TreatAsFranchise,
}

impl DealerType {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Franchise => "Franchise",
            Self::NonFranchise => "Non Franchise",
            Self::TreatAsFranchise => "Treat as Franchise",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Franchise" => Some(Self::Franchise),
            "Non Franchise" => Some(Self::NonFranchise),
            "Treat as Franchise" => Some(Self::TreatAsFranchise),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LetterKind {
    CheckToDealer,
    CtdCb,
    CurrentBalance,
    DemandLetter,
    ExtensionOfRecourse,
    Insurance,
    Legal,
}

impl LetterKind {
    pub const ALL: [Self; 7] = [
        Self::CheckToDealer,
        Self::CtdCb,
        Self::CurrentBalance,
        Self::DemandLetter,
        Self::ExtensionOfRecourse,
        Self::Insurance,
        Self::Legal,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CheckToDealer => "Check to Dealer",
            Self::CtdCb => "CTD-CB",
            Self::CurrentBalance => "Current Balance",
            Self::DemandLetter => "Demand Letter",
            Self::ExtensionOfRecourse => "Extension of Recourse",
            Self::Insurance => "Insurance",
            Self::Legal => "Legal",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|letter| letter.as_str() == value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CaseCategory {
    PendingFile,
    BbLetterSent,
    DemandLetterSent,
    ForcedAchProcessed,
    ReferredToLegal,
    PaidSettled,
}

impl CaseCategory {
    pub const ALL: [Self; 6] = [
        Self::PendingFile,
        Self::BbLetterSent,
        Self::DemandLetterSent,
        Self::ForcedAchProcessed,
        Self::ReferredToLegal,
        Self::PaidSettled,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PendingFile => "Pending File",
            Self::BbLetterSent => "BB Letter Sent",
            Self::DemandLetterSent => "Demand Letter Sent",
            Self::ForcedAchProcessed => "Forced ACH Processed",
            Self::ReferredToLegal => "Referred to Legal",
            Self::PaidSettled => "Paid / Settled",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|category| category.as_str() == value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TabKind {
    All,
    Category(CaseCategory),
}

impl TabKind {
    pub const ALL: [Self; 7] = [
        Self::All,
        Self::Category(CaseCategory::PendingFile),
        Self::Category(CaseCategory::BbLetterSent),
        Self::Category(CaseCategory::DemandLetterSent),
        Self::Category(CaseCategory::ForcedAchProcessed),
        Self::Category(CaseCategory::ReferredToLegal),
        Self::Category(CaseCategory::PaidSettled),
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Self::All => "All",
            Self::Category(category) => category.as_str(),
        }
    }

    pub const fn category(self) -> Option<CaseCategory> {
        match self {
            Self::All => None,
            Self::Category(category) => Some(category),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseRecord {
    pub id: CaseId,
    pub dealer_name: String,
    pub dealer_number: String,
    pub primary_name: String,
    pub dealer_id: String,
    pub branch: i64,
    pub rsm: String,
    pub fund: i64,
    pub account_number: String,
    pub bb_type: Option<BbType>,
    pub bb_status: Option<BbStatus>,
    pub date_filed: String,
    pub due_date: String,
    pub amount_cents: i64,
    pub days_past_due: i64,
    pub repo_status: RepoStatus,
    pub current_status: String,
    pub follow_up_date: String,
    pub has_note: bool,
    pub letter_sent: bool,
    pub is_active: bool,
    pub category: CaseCategory,
    pub dealer_address_line_1: String,
    pub dealer_address_line_2: String,
    pub dealer_phone: String,
    pub dealer_email: String,
    pub dealer_type: DealerType,
    pub insurance_status: String,
    pub registration_status: String,
    pub registration_issue_date: String,
    pub title_status: TitleStatus,
    pub title_received_date: String,
    pub loan_insurance_status: String,
    pub promise_date: String,
    pub promise_amount_cents: i64,
}

impl CaseRecord {
    /// A promise to pay counts only while its amount is set and its date is
    /// still ahead of `today` (date-only comparison).
    pub fn has_active_promise(&self, today: Date) -> bool {
        self.promise_amount_cents > 0 && dates::is_future(&self.promise_date, today)
    }

    /// Display projection of the raw loan-insurance status feed.
    pub fn loan_insurance_display(&self) -> &'static str {
        match self.loan_insurance_status.as_str() {
            "Customer Provided" | "Active" => "ACTIVE",
            _ => "NOT ACTIVE",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteEntry {
    pub id: NoteEntryId,
    pub stamp: String,
    pub author: String,
    pub body: String,
    pub duration_minutes: i64,
}
