pub mod reducing_balance;
pub mod simple;

use chrono::{Months, NaiveDate};
use log::{debug, trace, warn};
use rust_decimal::Decimal;

use crate::config::CalculatorConfig;
use crate::decimal::{Money, Rate};
use crate::errors::{CalculatorError, Result};
use crate::terms::LoanTerms;
use crate::types::{InterestMethod, RoundingAdjustment};

/// one scheduled repayment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Installment {
    pub installment_number: u32,
    pub due_date: NaiveDate,
    pub principal_amount: Money,
    pub interest_amount: Money,
    /// principal plus interest for this installment; the processing fee is never
    /// spread over installments, so with a fee this is below the headline
    /// `AmortizationResult::monthly_payment` of the simple method
    pub total_amount: Money,
    /// principal still outstanding once this installment is paid
    pub remaining_principal: Money,
}

/// repayment preview for one set of loan terms
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AmortizationResult {
    pub principal: Money,
    pub annual_rate: Rate,
    pub term_months: u32,
    pub interest_method: InterestMethod,
    pub disbursement_date: NaiveDate,
    pub total_interest: Money,
    pub processing_fee: Money,
    pub total_repayable: Money,
    /// simple method: `total_repayable / term_months`, which includes a share of the fee
    pub monthly_payment: Money,
    pub schedule: Vec<Installment>,
}

impl AmortizationResult {
    /// installment by its 1-based number
    pub fn installment(&self, installment_number: u32) -> Option<&Installment> {
        installment_number
            .checked_sub(1)
            .and_then(|idx| self.schedule.get(idx as usize))
    }

    /// sum of the principal portions across the schedule
    pub fn total_principal_scheduled(&self) -> Money {
        self.schedule.iter().map(|i| i.principal_amount).sum()
    }

    /// sum of every installment total, fee excluded
    pub fn total_installments(&self) -> Money {
        self.schedule.iter().map(|i| i.total_amount).sum()
    }

    /// principal left unpaid after the last installment because of rounding
    pub fn final_residual(&self) -> Money {
        self.schedule
            .last()
            .map(|i| i.remaining_principal)
            .unwrap_or(self.principal)
    }

    /// due date of the last installment
    pub fn maturity_date(&self) -> Option<NaiveDate> {
        self.schedule.last().map(|i| i.due_date)
    }
}

/// figures produced by one interest method before policy is applied
pub(crate) struct MethodSchedule {
    pub monthly_payment: Money,
    pub total_interest: Money,
    pub total_repayable: Money,
    pub installments: Vec<Installment>,
}

/// amortization calculator
#[derive(Debug, Clone, Default)]
pub struct AmortizationCalculator {
    config: CalculatorConfig,
}

impl AmortizationCalculator {
    pub fn new(config: CalculatorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &CalculatorConfig {
        &self.config
    }

    /// calculate the full repayment preview
    pub fn compute(&self, terms: &LoanTerms) -> Result<AmortizationResult> {
        terms.check(&self.config)?;

        let mut method_schedule = match terms.interest_method() {
            InterestMethod::Simple => simple::schedule(terms)?,
            InterestMethod::ReducingBalance => reducing_balance::schedule(terms)?,
        };

        if self.config.rounding_adjustment == RoundingAdjustment::BalanceFinalInstallment {
            balance_final_installment(terms, &mut method_schedule)?;
        }

        for installment in &method_schedule.installments {
            trace!(
                "installment {} due {}: principal {} interest {} total {} remaining {}",
                installment.installment_number,
                installment.due_date,
                installment.principal_amount,
                installment.interest_amount,
                installment.total_amount,
                installment.remaining_principal,
            );
        }

        let result = AmortizationResult {
            principal: terms.principal(),
            annual_rate: terms.annual_rate(),
            term_months: terms.term_months(),
            interest_method: terms.interest_method(),
            disbursement_date: terms.disbursement_date(),
            total_interest: method_schedule.total_interest,
            processing_fee: terms.processing_fee(),
            total_repayable: method_schedule.total_repayable,
            monthly_payment: method_schedule.monthly_payment,
            schedule: method_schedule.installments,
        };

        debug!(
            "{} schedule for {} at {} over {} months: monthly {}, interest {}, repayable {}, residual {}",
            result.interest_method,
            result.principal,
            result.annual_rate,
            result.term_months,
            result.monthly_payment,
            result.total_interest,
            result.total_repayable,
            result.final_residual(),
        );

        Ok(result)
    }
}

/// compute with the default limits and no rounding adjustment
pub fn compute(terms: &LoanTerms) -> Result<AmortizationResult> {
    AmortizationCalculator::default().compute(terms)
}

/// fold the leftover principal into the last installment
fn balance_final_installment(terms: &LoanTerms, method_schedule: &mut MethodSchedule) -> Result<()> {
    let Some(last) = method_schedule.installments.last_mut() else {
        return Ok(());
    };

    let residual = last.remaining_principal;
    if residual.is_zero() {
        return Ok(());
    }

    if residual.abs() >= Money::ONE {
        warn!("balancing a residual of {} into installment {}", residual, last.installment_number);
    }

    last.principal_amount = checked_sum(&[last.principal_amount, residual], "final principal")?;
    last.total_amount = checked_sum(&[last.total_amount, residual], "final installment")?;
    last.remaining_principal = Money::ZERO;

    // reducing-balance totals are derived from the installments
    if terms.interest_method() == InterestMethod::ReducingBalance {
        let mut amounts: Vec<Money> =
            method_schedule.installments.iter().map(|i| i.total_amount).collect();
        amounts.push(terms.processing_fee());
        method_schedule.total_repayable = checked_sum(&amounts, "total repayable")?;
        method_schedule.total_interest =
            method_schedule.total_repayable - terms.principal() - terms.processing_fee();
    }

    Ok(())
}

/// due date of an installment, counted in whole calendar months from disbursement
pub(crate) fn due_date(disbursement_date: NaiveDate, installment_number: u32) -> Result<NaiveDate> {
    disbursement_date
        .checked_add_months(Months::new(installment_number))
        .ok_or_else(|| CalculatorError::InvalidDate {
            message: format!(
                "{} plus {} months is out of range",
                disbursement_date, installment_number
            ),
        })
}

/// overflow-checked money sum
pub(crate) fn checked_sum(amounts: &[Money], what: &str) -> Result<Money> {
    amounts
        .iter()
        .try_fold(Money::ZERO, |acc, m| acc.checked_add(*m))
        .ok_or_else(|| CalculatorError::CalculationError {
            message: format!("{} overflowed", what),
        })
}

/// overflow-checked decimal product
pub(crate) fn checked_product(factors: &[Decimal], what: &str) -> Result<Decimal> {
    factors
        .iter()
        .try_fold(Decimal::ONE, |acc, f| acc.checked_mul(*f))
        .ok_or_else(|| CalculatorError::CalculationError {
            message: format!("{} overflowed", what),
        })
}
