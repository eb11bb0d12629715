//! Line driven converter session.
//!
//! Bare amounts behave like typing into the amount field: they are converted
//! once input has been quiet for the debounce period. `convert` submits
//! immediately and `swap` flips the currencies.

use super::ui;
use crate::core::controller::{InteractionController, Renderer};
use crate::core::convert::ConversionResult;
use crate::core::currency::CurrencyCode;
use crate::core::error::ConvertError;
use anyhow::Result;
use indicatif::ProgressBar;
use std::sync::Mutex;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

const HELP: &str = "\
Commands:
  <amount>      set the amount (converted after a short pause)
  from <CODE>   set the source currency
  to <CODE>     set the target currency
  swap          swap source and target
  convert       convert now
  help          show this message
  quit          leave";

/// Renders controller output to the terminal.
#[derive(Default)]
pub struct TerminalRenderer {
    spinner: Mutex<Option<ProgressBar>>,
}

impl Renderer for TerminalRenderer {
    fn loading(&self, active: bool) {
        let mut spinner = self.spinner.lock().unwrap_or_else(|e| e.into_inner());
        if active {
            *spinner = Some(ui::new_spinner("Converting..."));
        } else if let Some(spinner) = spinner.take() {
            spinner.finish_and_clear();
        }
    }

    fn success(&self, result: &ConversionResult) {
        println!(
            "{} {}",
            ui::style_text(&result.display_text, ui::StyleType::Value),
            ui::style_text(&format!("({})", result.rate_text), ui::StyleType::Subtle)
        );
        println!(
            "{}",
            ui::style_text("Conversion completed successfully!", ui::StyleType::Success)
        );
    }

    fn error(&self, error: &ConvertError) {
        println!(
            "{}",
            ui::style_text(&error.to_string(), ui::StyleType::Error)
        );
    }
}

#[derive(Debug, PartialEq)]
enum Command<'a> {
    Amount(&'a str),
    From(&'a str),
    To(&'a str),
    Swap,
    Convert,
    Help,
    Quit,
}

fn parse_command(line: &str) -> Command<'_> {
    let line = line.trim();
    let (word, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    match word.to_lowercase().as_str() {
        "from" => Command::From(rest.trim()),
        "to" => Command::To(rest.trim()),
        "swap" => Command::Swap,
        "convert" | "" => Command::Convert,
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        _ => Command::Amount(line),
    }
}

fn show_code(code: Option<&CurrencyCode>) -> String {
    code.map_or_else(|| "---".to_string(), CurrencyCode::to_string)
}

fn print_selection(controller: &InteractionController) {
    let selection = controller.selection();
    let amount = if selection.has_amount() {
        selection.amount.as_str()
    } else {
        "---"
    };
    let line = format!(
        "{} -> {}  amount: {}",
        show_code(selection.from.as_ref()),
        show_code(selection.to.as_ref()),
        amount
    );
    println!("{}", ui::style_text(&line, ui::StyleType::Subtle));
}

pub async fn run(mut controller: InteractionController) -> Result<()> {
    println!(
        "{}",
        ui::style_text("Currency converter", ui::StyleType::Title)
    );
    println!("{HELP}");
    print_selection(&controller);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let command = parse_command(&line);
        debug!(?command, "Interactive command");
        match command {
            Command::Amount(amount) => controller.amount_changed(amount),
            Command::From(code) => {
                controller.select_from(code);
                print_selection(&controller);
            }
            Command::To(code) => {
                controller.select_to(code);
                print_selection(&controller);
            }
            Command::Swap => {
                controller.swap().await;
                print_selection(&controller);
            }
            Command::Convert => controller.submit().await,
            Command::Help => println!("{HELP}"),
            Command::Quit => break,
        }
    }
    Ok(())
}
