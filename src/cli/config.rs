use colored::Colorize;
use comfy_table::{Cell, Table};

use crate::error::Result;
use crate::importer::SignConvention;
use crate::settings::{load_settings, save_settings, settings_path};

pub fn show() -> Result<()> {
    let settings = load_settings();
    println!("Settings file: {}", settings_path().display());

    let mut table = Table::new();
    table.set_header(vec!["Setting", "Value"]);
    table.add_row(vec![Cell::new("converted_file"), Cell::new(&settings.converted_file)]);
    table.add_row(vec![Cell::new("enhanced_file"), Cell::new(&settings.enhanced_file)]);
    table.add_row(vec![
        Cell::new("auto_enhance_spec_file"),
        Cell::new(&settings.auto_enhance_spec_file),
    ]);
    table.add_row(vec![
        Cell::new("icici_credit_sign"),
        Cell::new(settings.icici_credit_sign.key()),
    ]);
    let rules = match &settings.account_rules {
        Some(value) => value.to_string(),
        None => "(built-in)".to_string(),
    };
    table.add_row(vec![Cell::new("account_rules"), Cell::new(rules)]);
    println!("{table}");
    Ok(())
}

pub fn set_sign(sign: SignConvention) -> Result<()> {
    let mut settings = load_settings();
    settings.icici_credit_sign = sign;
    save_settings(&settings)?;
    println!("{} icici_credit_sign = {}", "Saved:".green().bold(), sign.key());
    Ok(())
}
