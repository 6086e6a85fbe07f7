use chrono::NaiveDate;
use hourglass_rs::{SafeTimeProvider, TimeSource};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::config::CalculatorConfig;
use crate::decimal::{Money, Rate};
use crate::errors::{CalculatorError, Result, ValidationError};
use crate::types::{InterestMethod, LoanField};

/// validated terms of one loan application
///
/// Only obtainable through [`LoanTermsBuilder`] or [`LoanTerms::new`], so a
/// value of this type always satisfies the limits it was checked against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoanTerms {
    principal: Money,
    annual_rate: Rate,
    term_months: u32,
    interest_method: InterestMethod,
    processing_fee: Money,
    disbursement_date: NaiveDate,
}

impl LoanTerms {
    /// validate and build terms against the default limits
    pub fn new(
        principal: Money,
        annual_rate: Rate,
        term_months: u32,
        interest_method: InterestMethod,
        processing_fee: Money,
        disbursement_date: NaiveDate,
    ) -> Result<Self> {
        let terms = Self::unchecked(
            principal,
            annual_rate,
            term_months,
            interest_method,
            processing_fee,
            disbursement_date,
        );
        terms.check(&CalculatorConfig::default())?;
        Ok(terms)
    }

    /// callers must run `check` or `violations` before handing the value out
    pub(crate) fn unchecked(
        principal: Money,
        annual_rate: Rate,
        term_months: u32,
        interest_method: InterestMethod,
        processing_fee: Money,
        disbursement_date: NaiveDate,
    ) -> Self {
        Self {
            principal,
            annual_rate,
            term_months,
            interest_method,
            processing_fee,
            disbursement_date,
        }
    }

    pub fn builder() -> LoanTermsBuilder {
        LoanTermsBuilder::new()
    }

    pub fn principal(&self) -> Money {
        self.principal
    }

    pub fn annual_rate(&self) -> Rate {
        self.annual_rate
    }

    pub fn term_months(&self) -> u32 {
        self.term_months
    }

    pub fn interest_method(&self) -> InterestMethod {
        self.interest_method
    }

    pub fn processing_fee(&self) -> Money {
        self.processing_fee
    }

    pub fn disbursement_date(&self) -> NaiveDate {
        self.disbursement_date
    }

    /// re-check against a (possibly stricter) configuration
    pub fn check(&self, config: &CalculatorConfig) -> std::result::Result<(), ValidationError> {
        let errors = self.violations(config);
        match errors.into_iter().next() {
            Some(first) => Err(first),
            None => Ok(()),
        }
    }

    /// every violated precondition, in field order
    pub fn violations(&self, config: &CalculatorConfig) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if self.principal < config.minimum_principal {
            errors.push(ValidationError::PrincipalBelowMinimum {
                minimum: config.minimum_principal,
                provided: self.principal,
            });
        }

        let rate_percent = self.annual_rate.as_percentage();
        if rate_percent < Decimal::ZERO || rate_percent > config.maximum_rate_percent {
            errors.push(ValidationError::RateOutOfRange {
                maximum: config.maximum_rate_percent,
                provided: rate_percent.normalize(),
            });
        }

        if self.term_months < 1 {
            errors.push(ValidationError::TermTooShort {
                provided: self.term_months,
            });
        } else if self.term_months > config.maximum_term_months {
            errors.push(ValidationError::TermTooLong {
                maximum: config.maximum_term_months,
                provided: self.term_months,
            });
        }

        if self.processing_fee.is_negative() {
            errors.push(ValidationError::NegativeProcessingFee {
                provided: self.processing_fee,
            });
        }

        errors
    }
}

/// builder for loan terms
pub struct LoanTermsBuilder {
    principal: Option<Money>,
    annual_rate: Option<Rate>,
    term_months: Option<u32>,
    interest_method: Option<InterestMethod>,
    processing_fee: Option<Money>,
    disbursement_date: Option<NaiveDate>,
    config: CalculatorConfig,
}

impl Default for LoanTermsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl LoanTermsBuilder {
    pub fn new() -> Self {
        Self {
            principal: None,
            annual_rate: None,
            term_months: None,
            interest_method: None,
            processing_fee: None,
            disbursement_date: None,
            config: CalculatorConfig::default(),
        }
    }

    pub fn principal(mut self, principal: Money) -> Self {
        self.principal = Some(principal);
        self
    }

    pub fn rate(mut self, rate: Rate) -> Self {
        self.annual_rate = Some(rate);
        self
    }

    /// annual rate in percent, e.g. `dec!(12.5)`
    pub fn rate_percent(mut self, percent: Decimal) -> Self {
        self.annual_rate = Some(Rate::from_percent(percent));
        self
    }

    pub fn term_months(mut self, months: u32) -> Self {
        self.term_months = Some(months);
        self
    }

    pub fn interest_method(mut self, method: InterestMethod) -> Self {
        self.interest_method = Some(method);
        self
    }

    pub fn processing_fee(mut self, fee: Money) -> Self {
        self.processing_fee = Some(fee);
        self
    }

    pub fn disbursement_date(mut self, date: NaiveDate) -> Self {
        self.disbursement_date = Some(date);
        self
    }

    /// validate against these limits instead of the defaults
    pub fn config(mut self, config: CalculatorConfig) -> Self {
        self.config = config;
        self
    }

    /// Build, taking today's date from the system clock when no
    /// disbursement date was given
    pub fn build(self) -> Result<LoanTerms> {
        let time = SafeTimeProvider::new(TimeSource::System);
        self.build_with_time(&time)
    }

    /// Build with an explicit time provider for the default disbursement date
    pub fn build_with_time(self, time_provider: &SafeTimeProvider) -> Result<LoanTerms> {
        self.config.validate()?;

        let principal = self.principal.ok_or(CalculatorError::MissingField {
            field: LoanField::Principal,
        })?;

        let annual_rate = self.annual_rate.ok_or(CalculatorError::MissingField {
            field: LoanField::AnnualRatePercent,
        })?;

        let term_months = self.term_months.ok_or(CalculatorError::MissingField {
            field: LoanField::TermMonths,
        })?;

        let interest_method = self.interest_method.ok_or(CalculatorError::MissingField {
            field: LoanField::InterestMethod,
        })?;

        let terms = LoanTerms {
            principal,
            annual_rate,
            term_months,
            interest_method,
            processing_fee: self.processing_fee.unwrap_or(Money::ZERO),
            disbursement_date: self
                .disbursement_date
                .unwrap_or_else(|| time_provider.now().date_naive()),
        };

        terms.check(&self.config)?;
        Ok(terms)
    }
}
