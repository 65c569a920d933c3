use std::collections::HashSet;
use std::path::Path;

use crate::accounts::{AccountType, InferenceRules};
use crate::checksum::compute_checksum;
use crate::error::{LedgerError, Result, ResultExt};
use crate::importer::{read_statement_grid, ParserRegistry, StatementFormat};
use crate::models::ConvertedTransaction;
use crate::store::{list_csv_files, list_visible_dirs, write_json_atomic};

pub struct AccountSummary {
    pub name: String,
    pub account_type: AccountType,
    pub files: usize,
    pub transactions: usize,
}

pub struct ConvertResult {
    pub accounts: Vec<AccountSummary>,
    pub duplicates: usize,
    pub total: usize,
}

struct AccountPlan {
    name: String,
    account_type: AccountType,
    format: StatementFormat,
}

/// Works out the statement format for every account directory. Fails before
/// any statement is read if an account is unknown or has no parser.
fn plan_accounts(
    input_dir: &Path,
    rules: &InferenceRules,
    registry: &ParserRegistry,
) -> Result<Vec<AccountPlan>> {
    let dirs = list_visible_dirs(input_dir)
        .with_context(|| format!("failed to list account directories in: {}", input_dir.display()))?;

    let mut plans = Vec::with_capacity(dirs.len());
    for name in dirs {
        let account_type = rules
            .infer(&name)
            .with_context(|| format!("failed to infer account type for: {name}"))?;
        let format = registry.get(account_type).ok_or_else(|| LedgerError::NoParser {
            account_type,
            account: name.clone(),
        })?;
        plans.push(AccountPlan {
            name,
            account_type,
            format,
        });
    }
    Ok(plans)
}

/// Parses every statement under `input_dir` into one list, most recent first.
pub fn collect_statement(
    input_dir: &Path,
    rules: &InferenceRules,
    registry: &ParserRegistry,
) -> Result<(Vec<ConvertedTransaction>, ConvertResult)> {
    let plans = plan_accounts(input_dir, rules, registry)?;

    let mut statement: Vec<ConvertedTransaction> = Vec::new();
    let mut accounts = Vec::with_capacity(plans.len());

    for plan in plans {
        let account_dir = input_dir.join(&plan.name);
        let files = list_csv_files(&account_dir)
            .with_context(|| format!("failed to list csv files in: {}", account_dir.display()))?;

        let mut count = 0usize;
        for file in &files {
            let path = account_dir.join(file);
            let grid = read_statement_grid(&path)
                .with_context(|| format!("failed to read csv file: {}", path.display()))?;
            let mut transactions = plan.format.parse(grid);

            if transactions.is_empty() {
                tracing::warn!(file = %path.display(), format = plan.format.name(), "no transactions found");
            } else {
                tracing::debug!(file = %path.display(), transactions = transactions.len(), "parsed statement file");
            }

            for txn in transactions.iter_mut() {
                txn.account_name = plan.name.clone();
            }
            count += transactions.len();
            statement.append(&mut transactions);
        }

        tracing::info!(
            account = %plan.name,
            account_type = %plan.account_type,
            files = files.len(),
            transactions = count,
            "converted account"
        );
        accounts.push(AccountSummary {
            name: plan.name,
            account_type: plan.account_type,
            files: files.len(),
            transactions: count,
        });
    }

    let duplicates = dedup_statement(&mut statement)?;
    if duplicates > 0 {
        tracing::debug!(duplicates, "dropped transactions repeated across statement files");
    }

    // Stable: same-day transactions keep their statement order.
    statement.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

    let total = statement.len();
    Ok((
        statement,
        ConvertResult {
            accounts,
            duplicates,
            total,
        },
    ))
}

/// Drops transactions whose content (and so correlation ID) repeats an
/// earlier one, such as rows present in two overlapping exports.
fn dedup_statement(statement: &mut Vec<ConvertedTransaction>) -> Result<usize> {
    let before = statement.len();
    let mut seen = HashSet::with_capacity(before);
    let mut kept = Vec::with_capacity(before);
    for txn in statement.drain(..) {
        if seen.insert(compute_checksum(&txn)?) {
            kept.push(txn);
        }
    }
    *statement = kept;
    Ok(before - statement.len())
}

/// Converts all account directories under `input_dir` and writes the
/// combined statement to `output`.
pub fn convert_statements(
    input_dir: &Path,
    output: &Path,
    rules: &InferenceRules,
    registry: &ParserRegistry,
) -> Result<ConvertResult> {
    let (statement, result) = collect_statement(input_dir, rules, registry)?;
    write_json_atomic(output, &statement)
        .with_context(|| format!("failed to write converted statement file: {}", output.display()))?;
    Ok(result)
}
