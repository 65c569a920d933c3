use std::path::Path;

use comfy_table::{Cell, Table};

use crate::categorizer::{load_rules, SpecSource};
use crate::error::Result;
use crate::models::{AutoEnhanceRule, Category};

fn split_text(rule: &AutoEnhanceRule) -> String {
    let buckets = if rule.for_credit {
        Category::CREDIT
    } else {
        Category::DEBIT
    };
    buckets
        .iter()
        .filter(|c| rule.categories.get(**c) != 0.0)
        .map(|c| format!("{} {}%", c.label(), rule.categories.get(*c)))
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn run(spec_file: &Path) -> Result<()> {
    let rules = load_rules(&SpecSource::Explicit(spec_file.to_path_buf()))?;
    if rules.is_empty() {
        println!("No rules in {}.", spec_file.display());
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["#", "Applies to", "Keywords", "Split", "Labels", "Summary"]);
    for (i, rule) in rules.iter().enumerate() {
        table.add_row(vec![
            Cell::new(i),
            Cell::new(if rule.for_credit { "credit" } else { "debit" }),
            Cell::new(rule.remarks_keywords.join(", ")),
            Cell::new(split_text(rule)),
            Cell::new(rule.labels.join(", ")),
            Cell::new(&rule.summary),
        ]);
    }
    println!("{table}");
    println!("{} valid rules.", rules.len());
    Ok(())
}
