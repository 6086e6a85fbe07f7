pub mod amortization;
pub mod config;
pub mod decimal;
pub mod errors;
pub mod form;
pub mod preview;
pub mod terms;
pub mod types;

// re-export key types
pub use amortization::{compute, AmortizationCalculator, AmortizationResult, Installment};
pub use config::CalculatorConfig;
pub use decimal::{Money, Rate};
pub use errors::{CalculatorError, Result, ValidationError};
pub use form::{FieldError, FormErrors, LoanApplicationForm, PreviewState};
pub use preview::SchedulePreview;
pub use terms::{LoanTerms, LoanTermsBuilder};
pub use types::{InterestMethod, LoanField, RoundingAdjustment};

// re-export external dependencies that users will need
pub use chrono;
pub use hourglass_rs::{SafeTimeProvider, TimeSource};
pub use rust_decimal::Decimal;

#[cfg(test)]
mod tests {
    use super::*;

    // verifies the public types can cross thread boundaries
    fn is_normal<T: Sized + Send + Sync + Unpin>() {}

    #[test]
    fn normal_types() {
        is_normal::<LoanTerms>();
        is_normal::<AmortizationResult>();
        is_normal::<AmortizationCalculator>();
        is_normal::<PreviewState>();
        is_normal::<SchedulePreview>();
    }
}
