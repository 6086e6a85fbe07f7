//! serializable and printable views of a repayment preview

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::amortization::{AmortizationResult, Installment};
use crate::decimal::{Money, Rate};
use crate::types::InterestMethod;

/// what the preview modal shows
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchedulePreview {
    pub summary: SummaryView,
    pub schedule: Vec<InstallmentView>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryView {
    pub interest_method: InterestMethod,
    pub annual_rate: Rate,
    pub term_months: u32,
    pub disbursement_date: NaiveDate,
    pub maturity_date: Option<NaiveDate>,
    pub principal: Money,
    pub total_interest: Money,
    pub processing_fee: Money,
    pub total_repayable: Money,
    pub monthly_payment: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstallmentView {
    pub installment_number: u32,
    pub due_date: NaiveDate,
    pub principal_amount: Money,
    pub interest_amount: Money,
    pub total_amount: Money,
}

impl InstallmentView {
    fn from_installment(installment: &Installment) -> Self {
        InstallmentView {
            installment_number: installment.installment_number,
            due_date: installment.due_date,
            principal_amount: installment.principal_amount.for_display(),
            interest_amount: installment.interest_amount.for_display(),
            total_amount: installment.total_amount.for_display(),
        }
    }
}

impl SchedulePreview {
    /// amounts are rounded to display precision; the result itself is untouched
    pub fn from_result(result: &AmortizationResult) -> Self {
        SchedulePreview {
            summary: SummaryView {
                interest_method: result.interest_method,
                annual_rate: result.annual_rate,
                term_months: result.term_months,
                disbursement_date: result.disbursement_date,
                maturity_date: result.maturity_date(),
                principal: result.principal.for_display(),
                total_interest: result.total_interest.for_display(),
                processing_fee: result.processing_fee.for_display(),
                total_repayable: result.total_repayable.for_display(),
                monthly_payment: result.monthly_payment.for_display(),
            },
            schedule: result
                .schedule
                .iter()
                .map(InstallmentView::from_installment)
                .collect(),
        }
    }

    /// convert to pretty-printed json string
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// fixed-width text table followed by the summary totals
    pub fn render_table(&self) -> String {
        let mut out = format!(
            "{:>4}  {:<10}  {:>14}  {:>14}  {:>14}\n",
            "#", "due", "principal", "interest", "total"
        );
        for row in &self.schedule {
            out.push_str(&format!(
                "{:>4}  {:<10}  {:>14}  {:>14}  {:>14}\n",
                row.installment_number,
                row.due_date,
                money_cell(row.principal_amount),
                money_cell(row.interest_amount),
                money_cell(row.total_amount),
            ));
        }

        let summary = &self.summary;
        let totals = [
            ("principal", summary.principal),
            ("total interest", summary.total_interest),
            ("processing fee", summary.processing_fee),
            ("total repayable", summary.total_repayable),
            ("monthly payment", summary.monthly_payment),
        ];

        out.push('\n');
        for (label, amount) in totals {
            out.push_str(&format!("{:<15}  {:>14}\n", label, money_cell(amount)));
        }

        out
    }
}

fn money_cell(amount: Money) -> String {
    format!("{:.2}", amount.as_decimal())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::amortization::compute;
    use crate::terms::LoanTerms;
    use rust_decimal_macros::dec;

    fn preview(method: InterestMethod) -> SchedulePreview {
        let terms = LoanTerms::builder()
            .principal(Money::from_major(1_000))
            .rate_percent(dec!(12))
            .term_months(3)
            .interest_method(method)
            .processing_fee(Money::from_major(15))
            .disbursement_date(NaiveDate::from_ymd_opt(2024, 1, 10).unwrap())
            .build()
            .unwrap();
        SchedulePreview::from_result(&compute(&terms).unwrap())
    }

    #[test]
    fn test_view_rounds_for_display() {
        let view = preview(InterestMethod::Simple);

        assert_eq!(view.summary.total_interest, Money::from_major(30));
        assert_eq!(view.summary.total_repayable, Money::from_major(1_045));
        assert_eq!(view.summary.monthly_payment, Money::from_decimal(dec!(348.33)));
        assert_eq!(view.schedule[0].principal_amount, Money::from_decimal(dec!(333.33)));
        assert_eq!(view.schedule[0].interest_amount, Money::from_major(10));
        assert_eq!(
            view.summary.maturity_date,
            NaiveDate::from_ymd_opt(2024, 4, 10)
        );
    }

    #[test]
    fn test_json_round_trip_keeps_summary() {
        let view = preview(InterestMethod::ReducingBalance);
        let json = view.to_json_pretty().unwrap();

        assert!(json.contains("\"interestMethod\": \"reducingBalance\""));
        assert!(json.contains("\"dueDate\": \"2024-02-10\""));

        let parsed: SchedulePreview = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.summary, view.summary);
        assert_eq!(parsed.schedule.len(), 3);
    }

    #[test]
    fn test_render_table() {
        let table = preview(InterestMethod::Simple).render_table();
        let lines: Vec<&str> = table.lines().collect();

        assert!(lines[0].contains("principal"));
        assert!(lines[1].contains("2024-02-10"));
        assert!(lines[1].contains("333.33"));
        assert!(lines[1].ends_with("343.33"));
        assert!(table.contains("total repayable         1045.00"));
    }
}
