use super::ui;
use crate::core::convert::{ConversionEngine, ConversionResult, parse_amount};
use crate::core::error::ConvertError;
use anyhow::Result;
use futures::future::join_all;
use tracing::debug;

/// Converts `amount` from `from` into each target currency and prints the
/// outcome. Fails if any of the conversions failed.
pub async fn run(
    engine: &ConversionEngine,
    amount: &str,
    from: &str,
    targets: &[String],
) -> Result<()> {
    let amount = parse_amount(amount);

    let spinner = ui::new_spinner("Converting...");
    let futures = targets
        .iter()
        .map(|to| async move { (to.as_str(), engine.convert(amount, from, to).await) });
    let results = join_all(futures).await;
    spinner.finish_and_clear();

    // A lone failure is reported once, through the returned error
    match results.as_slice() {
        [(_, Ok(result))] => print_result(result),
        [(_, Err(_))] => {}
        _ => print_table(&results),
    }

    outcome(&results)
}

/// Exit status for a batch: the error itself when every conversion failed,
/// a count when only some did.
fn outcome(results: &[(&str, Result<ConversionResult, ConvertError>)]) -> Result<()> {
    let failed: Vec<&ConvertError> = results
        .iter()
        .filter_map(|(_, result)| result.as_ref().err())
        .collect();
    debug!(total = results.len(), failed = failed.len(), "Conversions finished");
    match failed.first() {
        Some(error) if failed.len() == results.len() => Err((*error).clone().into()),
        Some(_) => anyhow::bail!("{} of {} conversions failed", failed.len(), results.len()),
        None => Ok(()),
    }
}

fn print_result(result: &ConversionResult) {
    println!(
        "{} {} = {}",
        result.amount,
        result.from,
        ui::style_text(&result.display_text, ui::StyleType::Value)
    );
    println!("{}", ui::style_text(&result.rate_text, ui::StyleType::Subtle));
}

fn print_table(results: &[(&str, Result<ConversionResult, ConvertError>)]) {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Currency"),
        ui::header_cell("Amount"),
        ui::header_cell("Rate"),
    ]);

    for (to, result) in results {
        match result {
            Ok(result) => table.add_row(vec![
                comfy_table::Cell::new(result.to.as_str()),
                ui::value_cell(&result.display_text),
                ui::value_cell(&result.rate_text),
            ]),
            Err(error) => table.add_row(vec![
                comfy_table::Cell::new(to.to_uppercase()),
                ui::error_cell(&error.to_string()),
                ui::value_cell(""),
            ]),
        };
    }

    println!("{table}");
}
