use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Bank-agnostic transaction produced by a statement parser.
///
/// `amount` is negative for debits and positive for credits. Parsers leave
/// `account_name` empty; the converter stamps it with the account directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConvertedTransaction {
    pub account_name: String,
    pub amount: f64,
    pub timestamp: NaiveDate,
    pub bank_serial: String,
    pub bank_payment_mode: String,
    pub bank_remarks: String,
}

/// Distribution of a transaction's amount over the budget buckets.
///
/// Debit buckets are only populated for negative amounts and credit buckets
/// only for positive ones. `ignorable` is shared.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AmountPerCategory {
    pub essentials: f64,
    pub investments: f64,
    pub savings: f64,
    pub luxury: f64,

    pub salary: f64,
    pub returns: f64,
    pub misc: f64,

    pub ignorable: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Essentials,
    Investments,
    Savings,
    Luxury,
    Salary,
    Returns,
    Misc,
    Ignorable,
}

impl Category {
    pub const DEBIT: &'static [Category] = &[
        Category::Essentials,
        Category::Investments,
        Category::Savings,
        Category::Luxury,
        Category::Ignorable,
    ];

    pub const CREDIT: &'static [Category] = &[
        Category::Salary,
        Category::Returns,
        Category::Misc,
        Category::Ignorable,
    ];

    /// Buckets a transaction of the given signed amount may be split across.
    pub fn for_amount(amount: f64) -> &'static [Category] {
        if amount > 0.0 {
            Self::CREDIT
        } else {
            Self::DEBIT
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Essentials => "Essentials",
            Self::Investments => "Investments",
            Self::Savings => "Savings",
            Self::Luxury => "Luxury",
            Self::Salary => "Salary",
            Self::Returns => "Returns",
            Self::Misc => "Misc",
            Self::Ignorable => "Ignorable",
        }
    }
}

impl AmountPerCategory {
    pub fn get(&self, category: Category) -> f64 {
        match category {
            Category::Essentials => self.essentials,
            Category::Investments => self.investments,
            Category::Savings => self.savings,
            Category::Luxury => self.luxury,
            Category::Salary => self.salary,
            Category::Returns => self.returns,
            Category::Misc => self.misc,
            Category::Ignorable => self.ignorable,
        }
    }

    pub fn get_mut(&mut self, category: Category) -> &mut f64 {
        match category {
            Category::Essentials => &mut self.essentials,
            Category::Investments => &mut self.investments,
            Category::Savings => &mut self.savings,
            Category::Luxury => &mut self.luxury,
            Category::Salary => &mut self.salary,
            Category::Returns => &mut self.returns,
            Category::Misc => &mut self.misc,
            Category::Ignorable => &mut self.ignorable,
        }
    }

    pub fn has_only_debit(&self) -> bool {
        self.salary == 0.0 && self.returns == 0.0 && self.misc == 0.0
    }

    pub fn has_only_credit(&self) -> bool {
        self.essentials == 0.0 && self.investments == 0.0 && self.savings == 0.0 && self.luxury == 0.0
    }

    pub fn debit_sum(&self) -> f64 {
        self.sum_of(Category::DEBIT)
    }

    pub fn credit_sum(&self) -> f64 {
        self.sum_of(Category::CREDIT)
    }

    fn sum_of(&self, categories: &[Category]) -> f64 {
        categories.iter().map(|c| self.get(*c)).sum()
    }
}

/// A converted transaction together with its budget annotations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnhancedTransaction {
    #[serde(flatten)]
    pub transaction: ConvertedTransaction,
    pub correlation_id: String,
    pub categories: AmountPerCategory,
    pub labels: Vec<String>,
    pub summary: String,
    pub auto_enhanced: bool,
}

/// Annotations produced by either a matching rule or a manual review.
#[derive(Debug, Clone, PartialEq)]
pub struct Enhancement {
    pub categories: AmountPerCategory,
    pub labels: Vec<String>,
    pub summary: String,
    pub auto_enhanced: bool,
}

impl EnhancedTransaction {
    pub fn new(transaction: ConvertedTransaction, correlation_id: String, enhancement: Enhancement) -> Self {
        Self {
            transaction,
            correlation_id,
            categories: enhancement.categories,
            labels: enhancement.labels,
            summary: enhancement.summary,
            auto_enhanced: enhancement.auto_enhanced,
        }
    }
}

/// One element of an auto-enhance spec file. Category values are percentages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutoEnhanceRule {
    #[serde(default)]
    pub for_credit: bool,
    pub remarks_keywords: Vec<String>,
    pub categories: AmountPerCategory,
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default)]
    pub summary: String,
}
