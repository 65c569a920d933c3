use std::collections::BTreeMap;
use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::accounts::AccountType;
use crate::error::Result;
use crate::models::ConvertedTransaction;
use crate::settings::Settings;

/// Raw cells of one statement file, row by row.
pub type Grid = Vec<Vec<String>>;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Parses a statement amount. Thousands separators are allowed; empty and
/// non-numeric cells are `None`.
pub fn parse_amount(raw: &str) -> Option<f64> {
    let s = raw.replace(',', "");
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parses a date in the bank's fixed layout. Unpadded day or month values
/// do not match.
pub fn parse_date(raw: &str, format: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    let date = NaiveDate::parse_from_str(raw, format).ok()?;
    (date.format(format).to_string() == raw).then_some(date)
}

/// Signed amount from separate debit and credit columns. Debits come out
/// negative; when the debit side is missing or zero the credit side wins.
/// `None` when neither side parses.
pub fn debit_credit_amount(debit: &str, credit: &str) -> Option<f64> {
    match (parse_amount(debit), parse_amount(credit)) {
        (None, None) => None,
        (Some(d), _) if d != 0.0 => Some(-d),
        (_, credit) => Some(credit.unwrap_or(0.0)),
    }
}

/// Reads every row of a CSV file. Rows may have differing field counts.
pub fn read_statement_grid(file_path: &Path) -> Result<Grid> {
    let file = std::fs::File::open(file_path)?;
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(std::io::BufReader::new(file));
    let mut grid = Vec::new();
    for result in rdr.byte_records() {
        let record = result?;
        grid.push(
            record
                .iter()
                .map(|field| String::from_utf8_lossy(field).into_owned())
                .collect(),
        );
    }
    Ok(grid)
}

// ---------------------------------------------------------------------------
// Table scanning
// ---------------------------------------------------------------------------

/// What a row parser made of one row.
#[derive(Debug, Clone, PartialEq)]
pub enum RowOutcome {
    Accept(ConvertedTransaction),
    Skip,
    /// The transaction table is over; everything after this row is ignored.
    EndOfTable,
}

/// Scans `grid` for the exact `header` row and feeds the rows starting
/// `offset` rows below it to `parse_row` until it reports the end of the
/// table. A missing header gives an empty list.
pub fn scan_table<F>(mut grid: Grid, header: &[&str], offset: usize, mut parse_row: F) -> Vec<ConvertedTransaction>
where
    F: FnMut(&[String]) -> RowOutcome,
{
    for row in grid.iter_mut() {
        for cell in row.iter_mut() {
            let trimmed = cell.trim();
            if trimmed.len() != cell.len() {
                *cell = trimmed.to_string();
            }
        }
    }

    let Some(header_idx) = grid.iter().position(|row| row.iter().map(String::as_str).eq(header.iter().copied())) else {
        return Vec::new();
    };
    let start = header_idx + offset;
    if start >= grid.len() {
        return Vec::new();
    }

    let mut transactions = Vec::new();
    for (idx, row) in grid[start..].iter().enumerate() {
        match parse_row(row) {
            RowOutcome::Accept(txn) => transactions.push(txn),
            RowOutcome::Skip => {}
            RowOutcome::EndOfTable => {
                tracing::debug!(row = start + idx, "transaction table ended");
                break;
            }
        }
    }
    transactions
}

fn is_blank_row(row: &[String]) -> bool {
    row.first().map_or(true, |cell| cell.is_empty())
}

// ---------------------------------------------------------------------------
// Statement formats - enum dispatch instead of trait objects
// ---------------------------------------------------------------------------

/// How the "BillingAmountSign" column of a credit card statement maps to
/// the sign of the amount.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum SignConvention {
    /// "CR" marks payments and refunds (positive); anything else is spend.
    #[default]
    CrIsCredit,
    /// "CR" marks spend (negative); anything else is positive.
    CrIsDebit,
}

impl SignConvention {
    pub fn apply(self, amount: f64, indicator: &str) -> f64 {
        let is_cr = indicator == "CR";
        match (self, is_cr) {
            (Self::CrIsCredit, true) | (Self::CrIsDebit, false) => amount,
            _ => -amount,
        }
    }

    pub fn key(&self) -> &'static str {
        match self {
            Self::CrIsCredit => "cr_is_credit",
            Self::CrIsDebit => "cr_is_debit",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StatementFormat {
    IciciSavings,
    IciciCredit { sign: SignConvention },
    HdfcSavings,
}

impl StatementFormat {
    pub fn name(&self) -> &'static str {
        match self {
            Self::IciciSavings => "ICICI savings account statement",
            Self::IciciCredit { .. } => "ICICI credit card statement",
            Self::HdfcSavings => "HDFC savings account statement",
        }
    }

    pub fn header(&self) -> &'static [&'static str] {
        match self {
            Self::IciciSavings => &ICICI_SAVINGS_HEADER,
            Self::IciciCredit { .. } => &ICICI_CREDIT_HEADER,
            Self::HdfcSavings => &HDFC_SAVINGS_HEADER,
        }
    }

    /// Rows between the header and the first transaction row, inclusive of the header.
    pub fn header_offset(&self) -> usize {
        match self {
            Self::IciciSavings => 1,
            Self::IciciCredit { .. } => 2,
            Self::HdfcSavings => 1,
        }
    }

    pub fn parse(&self, grid: Grid) -> Vec<ConvertedTransaction> {
        let header = self.header();
        let offset = self.header_offset();
        match *self {
            Self::IciciSavings => scan_table(grid, header, offset, icici_savings_row),
            Self::IciciCredit { sign } => scan_table(grid, header, offset, |row| icici_credit_row(row, sign)),
            Self::HdfcSavings => scan_table(grid, header, offset, hdfc_savings_row),
        }
    }
}

/// Account type to statement format. Built once at start-up.
#[derive(Debug, Clone)]
pub struct ParserRegistry {
    formats: BTreeMap<AccountType, StatementFormat>,
}

impl ParserRegistry {
    pub fn new(icici_credit_sign: SignConvention) -> Self {
        let mut formats = BTreeMap::new();
        formats.insert(AccountType::IciciSavings, StatementFormat::IciciSavings);
        formats.insert(
            AccountType::IciciCredit,
            StatementFormat::IciciCredit {
                sign: icici_credit_sign,
            },
        );
        formats.insert(AccountType::HdfcSavings, StatementFormat::HdfcSavings);
        // No HDFC credit card format yet.
        Self { formats }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.icici_credit_sign)
    }

    pub fn get(&self, account_type: AccountType) -> Option<StatementFormat> {
        self.formats.get(&account_type).copied()
    }
}

impl Default for ParserRegistry {
    fn default() -> Self {
        Self::new(SignConvention::default())
    }
}

// ---------------------------------------------------------------------------
// ICICI savings
// ---------------------------------------------------------------------------

const ICICI_SAVINGS_HEADER: [&str; 6] = ["DATE", "MODE", "PARTICULARS", "DEPOSITS", "WITHDRAWALS", "BALANCE"];

fn icici_savings_row(row: &[String]) -> RowOutcome {
    if is_blank_row(row) {
        return RowOutcome::Skip;
    }
    let Some(timestamp) = parse_date(&row[0], "%d-%m-%Y") else {
        return RowOutcome::EndOfTable;
    };
    if row.len() < 5 {
        return RowOutcome::EndOfTable;
    }
    let Some(amount) = debit_credit_amount(&row[4], &row[3]) else {
        return RowOutcome::EndOfTable;
    };
    if amount == 0.0 {
        return RowOutcome::Skip;
    }
    RowOutcome::Accept(ConvertedTransaction {
        account_name: String::new(),
        amount,
        timestamp,
        bank_serial: String::new(),
        bank_payment_mode: row[1].clone(),
        bank_remarks: row[2].clone(),
    })
}

// ---------------------------------------------------------------------------
// ICICI credit card
// ---------------------------------------------------------------------------

const ICICI_CREDIT_HEADER: [&str; 7] = [
    "Date",
    "Sr.No.",
    "Transaction Details",
    "Reward Point Header",
    "Intl.Amount",
    "Amount(in Rs)",
    "BillingAmountSign",
];

fn icici_credit_row(row: &[String], sign: SignConvention) -> RowOutcome {
    if is_blank_row(row) {
        return RowOutcome::Skip;
    }
    let Some(timestamp) = parse_date(&row[0], "%d/%m/%Y") else {
        return RowOutcome::EndOfTable;
    };
    if row.len() < 7 {
        return RowOutcome::EndOfTable;
    }
    let Some(amount) = parse_amount(&row[5]) else {
        return RowOutcome::EndOfTable;
    };
    if amount == 0.0 {
        return RowOutcome::Skip;
    }
    RowOutcome::Accept(ConvertedTransaction {
        account_name: String::new(),
        amount: sign.apply(amount, &row[6]),
        timestamp,
        bank_serial: row[1].clone(),
        bank_payment_mode: String::new(),
        bank_remarks: row[2].clone(),
    })
}

// ---------------------------------------------------------------------------
// HDFC savings
// ---------------------------------------------------------------------------

const HDFC_SAVINGS_HEADER: [&str; 7] = [
    "Date",
    "Narration",
    "Value Dat",
    "Debit Amount",
    "Credit Amount",
    "Chq/Ref Number",
    "Closing Balance",
];

fn hdfc_savings_row(row: &[String]) -> RowOutcome {
    if is_blank_row(row) {
        return RowOutcome::Skip;
    }
    let Some(timestamp) = parse_date(&row[0], "%d/%m/%y") else {
        return RowOutcome::EndOfTable;
    };
    if row.len() < 6 {
        return RowOutcome::EndOfTable;
    }
    let Some(amount) = debit_credit_amount(&row[3], &row[4]) else {
        return RowOutcome::EndOfTable;
    };
    if amount == 0.0 {
        return RowOutcome::Skip;
    }
    RowOutcome::Accept(ConvertedTransaction {
        account_name: String::new(),
        amount,
        timestamp,
        bank_serial: row[5].clone(),
        bank_payment_mode: String::new(),
        bank_remarks: row[1].clone(),
    })
}
