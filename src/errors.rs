use rust_decimal::Decimal;
use thiserror::Error;

use crate::decimal::Money;
use crate::types::LoanField;

/// a violated precondition on the loan terms
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("principal below minimum: minimum {minimum}, provided {provided}")]
    PrincipalBelowMinimum {
        minimum: Money,
        provided: Money,
    },

    #[error("term too short: at least 1 month required, provided {provided}")]
    TermTooShort {
        provided: u32,
    },

    #[error("term too long: maximum {maximum} months, provided {provided}")]
    TermTooLong {
        maximum: u32,
        provided: u32,
    },

    #[error("interest rate out of range: {provided}% not within 0% to {maximum}%")]
    RateOutOfRange {
        maximum: Decimal,
        provided: Decimal,
    },

    #[error("processing fee cannot be negative: {provided}")]
    NegativeProcessingFee {
        provided: Money,
    },
}

impl ValidationError {
    /// the form field that caused the failure
    pub fn field(&self) -> LoanField {
        match self {
            ValidationError::PrincipalBelowMinimum { .. } => LoanField::Principal,
            ValidationError::TermTooShort { .. } | ValidationError::TermTooLong { .. } => {
                LoanField::TermMonths
            }
            ValidationError::RateOutOfRange { .. } => LoanField::AnnualRatePercent,
            ValidationError::NegativeProcessingFee { .. } => LoanField::ProcessingFee,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CalculatorError {
    #[error("validation failed for {}: {0}", .0.field())]
    Validation(#[from] ValidationError),

    #[error("missing required field: {field}")]
    MissingField {
        field: LoanField,
    },

    #[error("could not parse {field}: {message}")]
    Parse {
        field: LoanField,
        message: String,
    },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration {
        message: String,
    },

    #[error("invalid date: {message}")]
    InvalidDate {
        message: String,
    },

    #[error("calculation error: {message}")]
    CalculationError {
        message: String,
    },
}

impl CalculatorError {
    /// the form field this error belongs to, if any
    pub fn field(&self) -> Option<LoanField> {
        match self {
            CalculatorError::Validation(err) => Some(err.field()),
            CalculatorError::MissingField { field } | CalculatorError::Parse { field, .. } => {
                Some(*field)
            }
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, CalculatorError>;
