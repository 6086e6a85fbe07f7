use serde::{Deserialize, Serialize};
use std::fmt;

/// how interest is charged over the life of the loan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum InterestMethod {
    /// interest computed once on the full principal and spread evenly
    Simple,
    /// interest charged monthly on the outstanding balance, fixed payment
    ReducingBalance,
}

impl InterestMethod {
    pub fn label(&self) -> &'static str {
        match self {
            InterestMethod::Simple => "simple",
            InterestMethod::ReducingBalance => "reducingBalance",
        }
    }
}

impl fmt::Display for InterestMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// input fields of a loan application, used to attach errors to form fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LoanField {
    Principal,
    AnnualRatePercent,
    TermMonths,
    InterestMethod,
    ProcessingFee,
    DisbursementDate,
}

impl LoanField {
    pub const ALL: [LoanField; 6] = [
        LoanField::Principal,
        LoanField::AnnualRatePercent,
        LoanField::TermMonths,
        LoanField::InterestMethod,
        LoanField::ProcessingFee,
        LoanField::DisbursementDate,
    ];

    /// field name as used by the form layer
    pub fn name(&self) -> &'static str {
        match self {
            LoanField::Principal => "principal",
            LoanField::AnnualRatePercent => "annualRatePercent",
            LoanField::TermMonths => "termMonths",
            LoanField::InterestMethod => "interestMethod",
            LoanField::ProcessingFee => "processingFee",
            LoanField::DisbursementDate => "disbursementDate",
        }
    }
}

impl fmt::Display for LoanField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// treatment of the principal left over after the final installment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RoundingAdjustment {
    /// leave per-installment rounding drift in place
    #[default]
    None,
    /// fold any residual principal into the last installment
    BalanceFinalInstallment,
}
