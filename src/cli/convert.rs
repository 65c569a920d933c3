use std::path::{Path, PathBuf};

use colored::Colorize;
use comfy_table::{Cell, Table};

use crate::converter::{convert_statements, ConvertResult};
use crate::error::Result;
use crate::importer::ParserRegistry;
use crate::settings::load_settings;

pub fn run(input_dir: &Path, output: Option<PathBuf>) -> Result<()> {
    let settings = load_settings();
    let output = output.unwrap_or_else(|| PathBuf::from(&settings.converted_file));
    let rules = settings.inference_rules()?;
    let registry = ParserRegistry::from_settings(&settings);

    let result = convert_statements(input_dir, &output, &rules, &registry)?;
    print_summary(&result);
    println!(
        "{} {} transactions written to {}",
        "Converted:".green().bold(),
        result.total,
        output.display()
    );
    Ok(())
}

fn print_summary(result: &ConvertResult) {
    let mut table = Table::new();
    table.set_header(vec!["Account", "Type", "Files", "Transactions"]);
    for account in &result.accounts {
        table.add_row(vec![
            Cell::new(&account.name),
            Cell::new(account.account_type.name()),
            Cell::new(account.files),
            Cell::new(account.transactions),
        ]);
    }
    println!("{table}");
    if result.duplicates > 0 {
        println!(
            "{}",
            format!("Dropped {} duplicate transactions.", result.duplicates).yellow()
        );
    }
}
