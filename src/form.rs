use chrono::NaiveDate;
use hourglass_rs::SafeTimeProvider;
use rust_decimal::Decimal;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::amortization::{AmortizationCalculator, AmortizationResult};
use crate::config::CalculatorConfig;
use crate::decimal::{Money, Rate};
use crate::errors::CalculatorError;
use crate::terms::LoanTerms;
use crate::types::{InterestMethod, LoanField};

/// date format accepted for the disbursement date
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// raw loan application fields exactly as typed by the user
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoanApplicationForm {
    pub principal: String,
    pub annual_rate_percent: String,
    pub term_months: String,
    pub interest_method: String,
    /// blank means no fee
    pub processing_fee: String,
    /// blank means today
    pub disbursement_date: String,
}

/// an inline message for one form field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: LoanField,
    pub message: String,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl FieldError {
    /// inline message for an error tied to a form field
    pub fn from_error(err: CalculatorError) -> Option<Self> {
        let field = err.field()?;
        let message = match err {
            CalculatorError::Validation(inner) => inner.to_string(),
            CalculatorError::Parse { message, .. } => message,
            other => other.to_string(),
        };
        Some(FieldError { field, message })
    }
}

/// every field error found in one submission
#[derive(Error, Debug, Clone, Default, PartialEq, Eq)]
#[error("{} field(s) need attention", .errors.len())]
pub struct FormErrors {
    pub errors: Vec<FieldError>,
}

impl FormErrors {
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// message to show next to a field, if any
    pub fn for_field(&self, field: LoanField) -> Option<&str> {
        self.errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }

    pub fn fields(&self) -> Vec<LoanField> {
        self.errors.iter().map(|e| e.field).collect()
    }

    fn push(&mut self, err: CalculatorError) {
        if let Some(field_error) = FieldError::from_error(err) {
            self.errors.push(field_error);
        }
    }
}

/// outcome of asking for a repayment preview
#[derive(Debug, Clone, PartialEq)]
pub enum PreviewState {
    /// schedule computed, the preview can be shown
    Ready(AmortizationResult),
    /// inputs rejected; nothing is shown except inline messages
    Invalid(FormErrors),
    /// inputs were valid but the schedule could not be produced
    Failed(CalculatorError),
}

impl PreviewState {
    pub fn is_ready(&self) -> bool {
        matches!(self, PreviewState::Ready(_))
    }

    pub fn result(&self) -> Option<&AmortizationResult> {
        match self {
            PreviewState::Ready(result) => Some(result),
            _ => None,
        }
    }
}

impl LoanApplicationForm {
    /// parse and validate every field, collecting all problems
    pub fn to_terms(
        &self,
        config: &CalculatorConfig,
        time_provider: &SafeTimeProvider,
    ) -> Result<LoanTerms, FormErrors> {
        let mut errors = FormErrors::default();

        let principal = collect(&mut errors, parse_money(&self.principal, LoanField::Principal));
        let rate_percent = collect(
            &mut errors,
            parse_decimal(&self.annual_rate_percent, LoanField::AnnualRatePercent),
        );
        let term_months = collect(&mut errors, parse_term(&self.term_months));
        let interest_method = collect(&mut errors, parse_method(&self.interest_method));
        let processing_fee = collect(&mut errors, parse_fee(&self.processing_fee));
        let disbursement_date = collect(
            &mut errors,
            parse_date(&self.disbursement_date, time_provider),
        );

        let failed = errors.fields();

        // fields that failed to parse are checked with a neutral stand-in and their
        // range errors dropped, so each field reports at most one message
        let candidate = LoanTerms::unchecked(
            principal.unwrap_or(config.minimum_principal),
            rate_percent.map(Rate::from_percent).unwrap_or(Rate::ZERO),
            term_months.unwrap_or(1),
            interest_method.unwrap_or(InterestMethod::Simple),
            processing_fee.unwrap_or(Money::ZERO),
            disbursement_date.unwrap_or(NaiveDate::MIN),
        );

        for violation in candidate.violations(config) {
            if !failed.contains(&violation.field()) {
                errors.push(violation.into());
            }
        }

        if errors.is_empty() {
            Ok(candidate)
        } else {
            errors.errors.sort_by_key(|e| field_order(e.field));
            Err(errors)
        }
    }

    /// validate and compute; invalid input yields no schedule
    pub fn preview(
        &self,
        calculator: &AmortizationCalculator,
        time_provider: &SafeTimeProvider,
    ) -> PreviewState {
        let terms = match self.to_terms(calculator.config(), time_provider) {
            Ok(terms) => terms,
            Err(errors) => {
                log::debug!("preview withheld: {}", errors);
                return PreviewState::Invalid(errors);
            }
        };

        match calculator.compute(&terms) {
            Ok(result) => PreviewState::Ready(result),
            Err(err) => match FieldError::from_error(err.clone()) {
                Some(field_error) => PreviewState::Invalid(FormErrors {
                    errors: vec![field_error],
                }),
                None => PreviewState::Failed(err),
            },
        }
    }
}

fn collect<T>(errors: &mut FormErrors, parsed: Result<T, CalculatorError>) -> Option<T> {
    match parsed {
        Ok(value) => Some(value),
        Err(err) => {
            errors.push(err);
            None
        }
    }
}

fn field_order(field: LoanField) -> usize {
    LoanField::ALL
        .iter()
        .position(|f| *f == field)
        .unwrap_or(LoanField::ALL.len())
}

fn required(raw: &str, field: LoanField) -> Result<&str, CalculatorError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(CalculatorError::Parse {
            field,
            message: "this field is required".to_string(),
        });
    }
    Ok(trimmed)
}

fn parse_decimal(raw: &str, field: LoanField) -> Result<Decimal, CalculatorError> {
    let trimmed = required(raw, field)?;
    Decimal::from_str(trimmed).map_err(|_| CalculatorError::Parse {
        field,
        message: format!("'{}' is not a number", trimmed),
    })
}

fn parse_money(raw: &str, field: LoanField) -> Result<Money, CalculatorError> {
    parse_decimal(raw, field).map(Money::from_decimal)
}

fn parse_fee(raw: &str) -> Result<Money, CalculatorError> {
    if raw.trim().is_empty() {
        return Ok(Money::ZERO);
    }
    parse_money(raw, LoanField::ProcessingFee)
}

fn parse_term(raw: &str) -> Result<u32, CalculatorError> {
    let trimmed = required(raw, LoanField::TermMonths)?;
    trimmed.parse::<u32>().map_err(|_| CalculatorError::Parse {
        field: LoanField::TermMonths,
        message: format!("'{}' is not a whole number of months", trimmed),
    })
}

fn parse_method(raw: &str) -> Result<InterestMethod, CalculatorError> {
    let trimmed = required(raw, LoanField::InterestMethod)?;
    let normalized: String = trimmed
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_ascii_lowercase();

    match normalized.as_str() {
        "simple" | "flat" => Ok(InterestMethod::Simple),
        "reducingbalance" | "reducing" | "declining" | "decliningbalance" => {
            Ok(InterestMethod::ReducingBalance)
        }
        _ => Err(CalculatorError::Parse {
            field: LoanField::InterestMethod,
            message: format!("unknown interest method '{}'", trimmed),
        }),
    }
}

fn parse_date(raw: &str, time_provider: &SafeTimeProvider) -> Result<NaiveDate, CalculatorError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(time_provider.now().date_naive());
    }
    NaiveDate::parse_from_str(trimmed, DATE_FORMAT).map_err(|e| CalculatorError::Parse {
        field: LoanField::DisbursementDate,
        message: format!("'{}' is not a date ({})", trimmed, e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use hourglass_rs::TimeSource;
    use rust_decimal_macros::dec;
    use test_log::test;

    fn test_time() -> SafeTimeProvider {
        SafeTimeProvider::new(TimeSource::Test(
            Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap(),
        ))
    }

    fn filled() -> LoanApplicationForm {
        LoanApplicationForm {
            principal: "1000".to_string(),
            annual_rate_percent: "12".to_string(),
            term_months: "12".to_string(),
            interest_method: "simple".to_string(),
            processing_fee: String::new(),
            disbursement_date: "2024-07-01".to_string(),
        }
    }

    #[test]
    fn test_valid_form_builds_terms() {
        let terms = filled()
            .to_terms(&CalculatorConfig::default(), &test_time())
            .unwrap();

        assert_eq!(terms.principal(), Money::from_major(1_000));
        assert_eq!(terms.annual_rate().as_decimal(), dec!(0.12));
        assert_eq!(terms.term_months(), 12);
        assert_eq!(terms.interest_method(), InterestMethod::Simple);
        assert_eq!(terms.processing_fee(), Money::ZERO);
        assert_eq!(terms.disbursement_date(), NaiveDate::from_ymd_opt(2024, 7, 1).unwrap());
    }

    #[test]
    fn test_blank_date_defaults_to_today() {
        let form = LoanApplicationForm {
            disbursement_date: "  ".to_string(),
            ..filled()
        };
        let terms = form
            .to_terms(&CalculatorConfig::default(), &test_time())
            .unwrap();
        assert_eq!(terms.disbursement_date(), NaiveDate::from_ymd_opt(2024, 6, 15).unwrap());
    }

    #[test]
    fn test_interest_method_spellings() {
        for raw in ["reducingBalance", "reducing_balance", "Reducing Balance", "declining"] {
            assert_eq!(parse_method(raw).unwrap(), InterestMethod::ReducingBalance);
        }
        assert_eq!(parse_method("SIMPLE").unwrap(), InterestMethod::Simple);
        assert!(parse_method("compound").is_err());
    }

    #[test]
    fn test_all_field_errors_reported_together() {
        let form = LoanApplicationForm {
            principal: "50".to_string(),
            annual_rate_percent: "150".to_string(),
            term_months: "0".to_string(),
            interest_method: "simple".to_string(),
            processing_fee: "-10".to_string(),
            disbursement_date: "2024-07-01".to_string(),
        };

        let errors = form
            .to_terms(&CalculatorConfig::default(), &test_time())
            .unwrap_err();
        assert_eq!(
            errors.fields(),
            vec![
                LoanField::Principal,
                LoanField::AnnualRatePercent,
                LoanField::TermMonths,
                LoanField::ProcessingFee,
            ]
        );
        assert_eq!(
            errors.for_field(LoanField::Principal),
            Some("principal below minimum: minimum 100, provided 50")
        );
        assert!(errors.for_field(LoanField::DisbursementDate).is_none());
    }

    #[test]
    fn test_parse_errors_mixed_with_range_errors() {
        let form = LoanApplicationForm {
            principal: "lots".to_string(),
            annual_rate_percent: "101".to_string(),
            term_months: "12.5".to_string(),
            interest_method: String::new(),
            processing_fee: String::new(),
            disbursement_date: "01/07/2024".to_string(),
        };

        let errors = form
            .to_terms(&CalculatorConfig::default(), &test_time())
            .unwrap_err();
        assert_eq!(
            errors.fields(),
            vec![
                LoanField::Principal,
                LoanField::AnnualRatePercent,
                LoanField::TermMonths,
                LoanField::InterestMethod,
                LoanField::DisbursementDate,
            ]
        );
        assert_eq!(errors.for_field(LoanField::Principal), Some("'lots' is not a number"));
        assert_eq!(
            errors.for_field(LoanField::InterestMethod),
            Some("this field is required")
        );
    }

    #[test]
    fn test_preview_ready() {
        let calculator = AmortizationCalculator::default();
        let state = filled().preview(&calculator, &test_time());

        assert!(state.is_ready());
        let result = state.result().unwrap();
        assert_eq!(result.schedule.len(), 12);
        assert_eq!(result.total_repayable, Money::from_major(1_120));
    }

    #[test]
    fn test_preview_inert_on_invalid_input() {
        let calculator = AmortizationCalculator::default();
        let form = LoanApplicationForm {
            term_months: "0".to_string(),
            ..filled()
        };

        match form.preview(&calculator, &test_time()) {
            PreviewState::Invalid(errors) => {
                assert_eq!(errors.fields(), vec![LoanField::TermMonths]);
                assert_eq!(errors.to_string(), "1 field(s) need attention");
            }
            other => panic!("expected invalid preview, got {:?}", other),
        }
    }

    #[test]
    fn test_preview_respects_calculator_limits() {
        let calculator = AmortizationCalculator::new(CalculatorConfig {
            maximum_term_months: 6,
            ..CalculatorConfig::default()
        })
        .unwrap();

        let state = filled().preview(&calculator, &test_time());
        assert!(!state.is_ready());
        assert!(state.result().is_none());
    }

    #[test]
    fn test_preview_fails_cleanly_on_overflowing_amounts() {
        let calculator = AmortizationCalculator::default();

        let huge_simple = LoanApplicationForm {
            principal: "79000000000000000000000000000".to_string(),
            annual_rate_percent: "100".to_string(),
            term_months: "1".to_string(),
            ..filled()
        };
        assert!(matches!(
            huge_simple.preview(&calculator, &test_time()),
            PreviewState::Failed(CalculatorError::CalculationError { .. })
        ));

        let huge_fee = LoanApplicationForm {
            principal: "50000000000000000000000000000".to_string(),
            annual_rate_percent: "0".to_string(),
            interest_method: "reducingBalance".to_string(),
            processing_fee: "50000000000000000000000000000".to_string(),
            ..filled()
        };
        assert!(matches!(
            huge_fee.preview(&calculator, &test_time()),
            PreviewState::Failed(CalculatorError::CalculationError { .. })
        ));
    }
}
