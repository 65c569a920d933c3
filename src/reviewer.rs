use colored::Colorize;
use comfy_table::{Cell, Table};
use dialoguer::Input;

use crate::error::{LedgerError, Result};
use crate::fmt::{amount, colored_amount};
use crate::models::{AmountPerCategory, Category, ConvertedTransaction, Enhancement};

/// Source of operator answers during manual enhancement.
pub trait Prompter {
    /// Reads one line of input. An empty string is a valid answer.
    fn input(&mut self, prompt: &str) -> Result<String>;

    fn notice(&mut self, message: &str) {
        println!("{message}");
    }

    fn show_transaction(&mut self, txn: &ConvertedTransaction) {
        println!("{}", "\u{2500}".repeat(60).cyan());
        println!("{}", transaction_card(txn));
    }
}

/// Reads answers from the terminal.
pub struct TerminalPrompter;

impl Prompter for TerminalPrompter {
    fn input(&mut self, prompt: &str) -> Result<String> {
        let value: String = Input::new()
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()?;
        Ok(value)
    }

    fn notice(&mut self, message: &str) {
        println!("{}", message.yellow());
    }
}

pub fn transaction_card(txn: &ConvertedTransaction) -> Table {
    let mut table = Table::new();
    table.add_row(vec![Cell::new("Account"), Cell::new(&txn.account_name)]);
    table.add_row(vec![Cell::new("Date"), Cell::new(txn.timestamp.format("%d %b %Y"))]);
    table.add_row(vec![Cell::new("Amount"), Cell::new(colored_amount(txn.amount))]);
    table.add_row(vec![Cell::new("Mode"), Cell::new(&txn.bank_payment_mode)]);
    table.add_row(vec![Cell::new("Serial"), Cell::new(&txn.bank_serial)]);
    table.add_row(vec![Cell::new("Remarks"), Cell::new(&txn.bank_remarks)]);
    table
}

/// Splits comma-separated labels, lowercased and trimmed, dropping empties
/// and repeats.
pub fn parse_labels(raw: &str) -> Vec<String> {
    let mut labels: Vec<String> = Vec::new();
    for label in raw.split(',') {
        let label = label.trim().to_lowercase();
        if !label.is_empty() && !labels.contains(&label) {
            labels.push(label);
        }
    }
    labels
}

/// Empty input means zero. Anything else must be a finite number.
fn prompt_amount(prompter: &mut dyn Prompter, category: Category) -> Result<f64> {
    let raw = prompter.input(&format!("{} component?", category.label()))?;
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(0.0);
    }
    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(LedgerError::InvalidAmount(raw.to_string())),
    }
}

fn prompt_categories(txn: &ConvertedTransaction, prompter: &mut dyn Prompter) -> Result<AmountPerCategory> {
    loop {
        let mut categories = AmountPerCategory::default();
        let mut sum = 0.0;
        for &category in Category::for_amount(txn.amount) {
            let value = prompt_amount(prompter, category)?;
            *categories.get_mut(category) = value;
            sum += value;
        }
        if sum == txn.amount {
            return Ok(categories);
        }
        prompter.notice(&format!(
            "The amounts should add up to the transaction amount, but {} != {}",
            amount(sum),
            amount(txn.amount)
        ));
    }
}

/// Asks the operator for the category split, labels and summary of `txn`.
/// Only the buckets matching the amount's sign are offered, and the split is
/// asked again until it adds up to the amount exactly.
pub fn manual_enhance(txn: &ConvertedTransaction, prompter: &mut dyn Prompter) -> Result<Enhancement> {
    prompter.show_transaction(txn);
    prompter.notice("Provide amount distribution among categories...");
    let categories = prompt_categories(txn, prompter)?;

    let labels = parse_labels(&prompter.input("Any labels? (comma-separated, case-insensitive)")?);
    let summary = prompter.input("Summary?")?.trim().to_string();

    Ok(Enhancement {
        categories,
        labels,
        summary,
        auto_enhanced: false,
    })
}

/// Replays canned answers in place of a terminal.
#[cfg(test)]
pub struct ScriptedPrompter {
    answers: std::collections::VecDeque<String>,
    pub notices: Vec<String>,
}

#[cfg(test)]
impl ScriptedPrompter {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            notices: Vec::new(),
        }
    }
}

#[cfg(test)]
impl Prompter for ScriptedPrompter {
    fn input(&mut self, prompt: &str) -> Result<String> {
        self.answers
            .pop_front()
            .ok_or_else(|| {
                std::io::Error::new(std::io::ErrorKind::UnexpectedEof, format!("no answer left for: {prompt}")).into()
            })
    }

    fn notice(&mut self, message: &str) {
        self.notices.push(message.to_string());
    }

    fn show_transaction(&mut self, _txn: &ConvertedTransaction) {}
}
