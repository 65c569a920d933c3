use std::path::{Path, PathBuf};

use colored::Colorize;

use crate::categorizer::SpecSource;
use crate::enhancer::enhance_statement;
use crate::error::Result;
use crate::reviewer::TerminalPrompter;
use crate::settings::load_settings;

pub fn run(
    input_file: &Path,
    output: Option<PathBuf>,
    auto_enhance_spec: Option<PathBuf>,
    only_auto: bool,
) -> Result<()> {
    let settings = load_settings();
    let output = output.unwrap_or_else(|| PathBuf::from(&settings.enhanced_file));
    let spec = match auto_enhance_spec {
        Some(path) => SpecSource::Explicit(path),
        None => SpecSource::Default(PathBuf::from(&settings.auto_enhance_spec_file)),
    };

    let summary = enhance_statement(input_file, &output, &spec, only_auto, &mut TerminalPrompter)?;

    if summary.candidates == 0 {
        println!("{}", "Nothing new to enhance.".green());
        return Ok(());
    }
    println!(
        "{} {} of {} new transactions ({} by rule, {} manually) written to {}",
        "Enhanced:".green().bold(),
        summary.written(),
        summary.candidates,
        summary.auto,
        summary.manual,
        output.display()
    );
    if summary.skipped > 0 {
        println!(
            "{}",
            format!("{} transactions matched no rule and were left for later.", summary.skipped).yellow()
        );
    }
    Ok(())
}
