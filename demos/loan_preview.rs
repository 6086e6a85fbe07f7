/// loan preview - validate a loan application form and print its repayment schedule
use loan_amortization_rs::{
    AmortizationCalculator, CalculatorConfig, LoanApplicationForm, PreviewState, SafeTimeProvider,
    SchedulePreview, TimeSource,
};
use simple_logger::SimpleLogger;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    SimpleLogger::new()
        .with_level(log::LevelFilter::Debug)
        .init()?;

    let time = SafeTimeProvider::new(TimeSource::System);
    let calculator = AmortizationCalculator::new(CalculatorConfig::default())?;

    // a group loan of 25,000 over two years
    let form = LoanApplicationForm {
        principal: "25000".to_string(),
        annual_rate_percent: "18".to_string(),
        term_months: "24".to_string(),
        interest_method: "reducingBalance".to_string(),
        processing_fee: "250".to_string(),
        disbursement_date: String::new(),
    };

    match form.preview(&calculator, &time) {
        PreviewState::Ready(result) => {
            let preview = SchedulePreview::from_result(&result);
            println!("{}", preview.render_table());
            println!("{}", preview.to_json_pretty()?);
        }
        PreviewState::Invalid(errors) => {
            for error in &errors.errors {
                println!("{}", error);
            }
        }
        PreviewState::Failed(err) => return Err(err.into()),
    }

    // the same form with out-of-range inputs produces only field messages
    let rejected = LoanApplicationForm {
        principal: "50".to_string(),
        term_months: "0".to_string(),
        ..form
    };
    if let PreviewState::Invalid(errors) = rejected.preview(&calculator, &time) {
        println!("\n{}", errors);
        for error in &errors.errors {
            println!("  {}", error);
        }
    }

    Ok(())
}
