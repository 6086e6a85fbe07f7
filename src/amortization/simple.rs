use rust_decimal::Decimal;

use super::{checked_product, checked_sum, due_date, Installment, MethodSchedule};
use crate::decimal::Money;
use crate::errors::Result;
use crate::terms::LoanTerms;

/// flat schedule: interest on the full principal for the whole term, spread evenly
pub(crate) fn schedule(terms: &LoanTerms) -> Result<MethodSchedule> {
    let principal = terms.principal();
    let term_months = terms.term_months();

    // principal x rate x (months / 12), multiplied out first to avoid a repeating twelfth
    let interest = checked_product(
        &[
            principal.as_decimal(),
            terms.annual_rate().as_decimal(),
            Decimal::from(term_months),
        ],
        "simple interest",
    )? / Decimal::from(12);
    let total_interest = Money::from_decimal(interest);

    let total_repayable = checked_sum(
        &[principal, total_interest, terms.processing_fee()],
        "total repayable",
    )?;
    let monthly_payment = total_repayable.per_period(term_months);

    let principal_amount = principal.per_period(term_months);
    let interest_amount = total_interest.per_period(term_months);
    let total_amount = checked_sum(&[principal_amount, interest_amount], "installment total")?;

    let mut installments = Vec::with_capacity(term_months as usize);
    let mut remaining_principal = principal;

    for i in 1..=term_months {
        remaining_principal -= principal_amount;

        installments.push(Installment {
            installment_number: i,
            due_date: due_date(terms.disbursement_date(), i)?,
            principal_amount,
            interest_amount,
            total_amount,
            remaining_principal,
        });
    }

    Ok(MethodSchedule {
        monthly_payment,
        total_interest,
        total_repayable,
        installments,
    })
}
