use super::ui;
use crate::core::currency::SUPPORTED_CURRENCIES;
use comfy_table::Cell;

/// Prints the currencies offered for selection.
pub fn run(default_from: &str, default_to: &str) {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Code"),
        ui::header_cell("Currency"),
        ui::header_cell("Default"),
    ]);

    for (code, name) in SUPPORTED_CURRENCIES {
        let default = if code.eq_ignore_ascii_case(default_from) {
            "from"
        } else if code.eq_ignore_ascii_case(default_to) {
            "to"
        } else {
            ""
        };
        table.add_row(vec![Cell::new(code), Cell::new(name), Cell::new(default)]);
    }

    println!(
        "{}",
        ui::style_text("Supported currencies", ui::StyleType::Title)
    );
    println!("{table}");
}
