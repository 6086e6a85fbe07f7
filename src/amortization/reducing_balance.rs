use rust_decimal::Decimal;

use super::{checked_product, checked_sum, due_date, Installment, MethodSchedule};
use crate::decimal::{Money, Rate};
use crate::errors::{CalculatorError, Result};
use crate::terms::LoanTerms;

/// fixed monthly payment, interest charged on the outstanding balance
pub(crate) fn schedule(terms: &LoanTerms) -> Result<MethodSchedule> {
    let monthly_rate = terms.annual_rate().monthly_rate();

    if monthly_rate.is_zero() {
        return equal_principal(terms);
    }

    let principal = terms.principal();
    let term_months = terms.term_months();
    let monthly_payment = annuity_payment(principal, monthly_rate, term_months)?;

    let mut installments = Vec::with_capacity(term_months as usize);
    let mut remaining_principal = principal;
    let mut paid = Money::ZERO;

    for i in 1..=term_months {
        let interest_amount = remaining_principal.apply_rate(monthly_rate);
        let principal_amount = monthly_payment - interest_amount;
        remaining_principal -= principal_amount;
        paid = checked_sum(&[paid, monthly_payment], "total repayable")?;

        installments.push(Installment {
            installment_number: i,
            due_date: due_date(terms.disbursement_date(), i)?,
            principal_amount,
            interest_amount,
            total_amount: monthly_payment,
            remaining_principal,
        });
    }

    let total_repayable = checked_sum(&[paid, terms.processing_fee()], "total repayable")?;
    let total_interest = total_repayable - principal - terms.processing_fee();

    Ok(MethodSchedule {
        monthly_payment,
        total_interest,
        total_repayable,
        installments,
    })
}

/// zero-rate loans repay equal slices of principal with no interest
fn equal_principal(terms: &LoanTerms) -> Result<MethodSchedule> {
    let principal = terms.principal();
    let term_months = terms.term_months();
    let monthly_payment = principal.per_period(term_months);

    let mut installments = Vec::with_capacity(term_months as usize);
    let mut remaining_principal = principal;

    for i in 1..=term_months {
        remaining_principal -= monthly_payment;

        installments.push(Installment {
            installment_number: i,
            due_date: due_date(terms.disbursement_date(), i)?,
            principal_amount: monthly_payment,
            interest_amount: Money::ZERO,
            total_amount: monthly_payment,
            remaining_principal,
        });
    }

    Ok(MethodSchedule {
        monthly_payment,
        total_interest: Money::ZERO,
        total_repayable: checked_sum(&[principal, terms.processing_fee()], "total repayable")?,
        installments,
    })
}

/// EMI = P * r * (1 + r)^n / ((1 + r)^n - 1)
pub fn annuity_payment(principal: Money, monthly_rate: Rate, months: u32) -> Result<Money> {
    let r = monthly_rate.as_decimal();

    if months == 0 {
        return Ok(principal);
    }

    if r.is_zero() {
        return Ok(principal.per_period(months));
    }

    let base = Decimal::ONE + r;
    let mut compound = Decimal::ONE;
    for _ in 0..months {
        compound = compound
            .checked_mul(base)
            .ok_or_else(|| CalculatorError::CalculationError {
                message: format!("compounding {} over {} months overflowed", monthly_rate, months),
            })?;
    }

    let numerator = checked_product(&[principal.as_decimal(), r, compound], "annuity numerator")?;
    let denominator = compound - Decimal::ONE;

    numerator
        .checked_div(denominator)
        .map(Money::from_decimal)
        .ok_or_else(|| CalculatorError::CalculationError {
            message: format!("monthly rate {} too small to amortize", monthly_rate),
        })
}
