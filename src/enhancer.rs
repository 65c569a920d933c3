use std::collections::HashSet;
use std::path::Path;

use crate::categorizer::{auto_enhance, load_rules, SpecSource};
use crate::checksum::compute_checksum;
use crate::error::{LedgerError, Result, ResultExt};
use crate::models::{ConvertedTransaction, EnhancedTransaction};
use crate::reviewer::{manual_enhance, Prompter};
use crate::store::{read_json, read_json_if_exists, write_json_atomic};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct EnhanceSummary {
    pub candidates: usize,
    pub auto: usize,
    pub manual: usize,
    pub skipped: usize,
}

impl EnhanceSummary {
    pub fn written(&self) -> usize {
        self.auto + self.manual
    }
}

fn sort_statement(statement: &mut [EnhancedTransaction]) {
    statement.sort_by(|a, b| b.transaction.timestamp.cmp(&a.transaction.timestamp));
}

/// Enhances every converted transaction not yet present in the enhanced
/// statement, by rule first and by prompting otherwise. The enhanced file is
/// rewritten after each transaction so an aborted run keeps finished work.
pub fn enhance_statement(
    converted_path: &Path,
    enhanced_path: &Path,
    spec: &SpecSource,
    only_auto: bool,
    prompter: &mut dyn Prompter,
) -> Result<EnhanceSummary> {
    let converted: Vec<ConvertedTransaction> = read_json(converted_path)
        .with_context(|| format!("failed to read converted statement file: {}", converted_path.display()))?;
    if converted.is_empty() {
        return Err(LedgerError::EmptyConvertedStatement(converted_path.to_path_buf()));
    }

    let mut enhanced: Vec<EnhancedTransaction> = read_json_if_exists(enhanced_path)
        .with_context(|| format!("failed to read enhanced statement file: {}", enhanced_path.display()))?
        .unwrap_or_default();
    let mut known: HashSet<String> = enhanced.iter().map(|t| t.correlation_id.clone()).collect();

    let rules = load_rules(spec)?;

    let mut candidates = Vec::new();
    for txn in converted {
        let checksum = compute_checksum(&txn)
            .with_context(|| format!("failed to compute checksum for: {}", txn.bank_remarks))?;
        // Exact repeats inside the converted file collapse into one candidate.
        if known.insert(checksum.clone()) {
            candidates.push((txn, checksum));
        }
    }

    let mut summary = EnhanceSummary {
        candidates: candidates.len(),
        ..Default::default()
    };
    tracing::info!(
        existing = enhanced.len(),
        candidates = summary.candidates,
        rules = rules.len(),
        "starting enhancement"
    );

    for (txn, checksum) in candidates {
        let enhancement = match auto_enhance(&txn, &rules) {
            Some(e) => {
                summary.auto += 1;
                e
            }
            None if only_auto => {
                tracing::debug!(correlation_id = %checksum, "no rule matched, skipping");
                summary.skipped += 1;
                continue;
            }
            None => {
                let e = manual_enhance(&txn, prompter)?;
                summary.manual += 1;
                e
            }
        };

        tracing::debug!(correlation_id = %checksum, auto = enhancement.auto_enhanced, "enhanced transaction");
        enhanced.push(EnhancedTransaction::new(txn, checksum, enhancement));
        sort_statement(&mut enhanced);
        write_json_atomic(enhanced_path, &enhanced)
            .with_context(|| format!("failed to write enhanced statement file: {}", enhanced_path.display()))?;
    }

    tracing::info!(
        auto = summary.auto,
        manual = summary.manual,
        skipped = summary.skipped,
        "enhancement finished"
    );
    Ok(summary)
}
