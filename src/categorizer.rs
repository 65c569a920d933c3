use std::path::PathBuf;

use crate::error::{LedgerError, Result, ResultExt};
use crate::models::{AmountPerCategory, AutoEnhanceRule, Category, ConvertedTransaction, Enhancement};
use crate::store::read_json_if_exists;

/// Where the auto-enhance spec comes from.
#[derive(Debug, Clone)]
pub enum SpecSource {
    /// Passed by the user; it must exist.
    Explicit(PathBuf),
    /// The configured default; used only when present.
    Default(PathBuf),
}

/// Checks a rule's percentages: only buckets of the rule's polarity (plus
/// `ignorable`) may be set, none may be negative, and they sum to 100.
pub fn validate_rule(rule: &AutoEnhanceRule) -> std::result::Result<(), String> {
    let cats = &rule.categories;
    let mut all = Category::DEBIT.iter().chain(Category::CREDIT.iter());
    if let Some(c) = all.find(|c| cats.get(**c) < 0.0) {
        return Err(format!("negative percentage for {}", c.label()));
    }
    let sum = if rule.for_credit {
        if !cats.has_only_credit() {
            return Err("credit rule has debit categories".to_string());
        }
        cats.credit_sum()
    } else {
        if !cats.has_only_debit() {
            return Err("debit rule has credit categories".to_string());
        }
        cats.debit_sum()
    };
    if sum != 100.0 {
        return Err(format!("category percentages sum to {sum}, expected 100"));
    }
    Ok(())
}

pub fn validate_rules(rules: &[AutoEnhanceRule]) -> Result<()> {
    for (index, rule) in rules.iter().enumerate() {
        validate_rule(rule).map_err(|reason| LedgerError::InvalidRule { index, reason })?;
    }
    Ok(())
}

/// Loads and validates the auto-enhance spec. A missing default spec means
/// no rules.
pub fn load_rules(source: &SpecSource) -> Result<Vec<AutoEnhanceRule>> {
    let (path, explicit) = match source {
        SpecSource::Explicit(p) => (p.as_path(), true),
        SpecSource::Default(p) => (p.as_path(), false),
    };
    let rules: Option<Vec<AutoEnhanceRule>> = read_json_if_exists(path)
        .with_context(|| format!("failed to read the spec file at: {}", path.display()))?;
    let rules = match rules {
        Some(rules) => rules,
        None if explicit => {
            return Err(LedgerError::Context {
                context: format!("failed to read the spec file at: {}", path.display()),
                source: Box::new(std::io::Error::from(std::io::ErrorKind::NotFound).into()),
            })
        }
        None => return Ok(Vec::new()),
    };
    validate_rules(&rules).with_context(|| format!("invalid auto-enhance spec file: {}", path.display()))?;
    tracing::info!(path = %path.display(), rules = rules.len(), "using auto-enhance spec");
    Ok(rules)
}

fn applies_to(rule: &AutoEnhanceRule, amount: f64) -> bool {
    if rule.for_credit {
        amount > 0.0
    } else {
        amount < 0.0
    }
}

fn contains_any_no_case(haystack: &str, keywords: &[String]) -> bool {
    let haystack = haystack.to_lowercase();
    keywords.iter().any(|k| haystack.contains(&k.to_lowercase()))
}

/// First rule, in spec order, whose polarity fits the amount and whose
/// keywords appear in the bank remarks.
pub fn find_rule<'a>(txn: &ConvertedTransaction, rules: &'a [AutoEnhanceRule]) -> Option<&'a AutoEnhanceRule> {
    rules
        .iter()
        .find(|rule| applies_to(rule, txn.amount) && contains_any_no_case(&txn.bank_remarks, &rule.remarks_keywords))
}

/// Turns a rule's percentages into amounts for `amount`. The sign comes
/// from the amount itself.
pub fn distribute(percentages: &AmountPerCategory, amount: f64) -> AmountPerCategory {
    let mut out = AmountPerCategory::default();
    for &category in Category::for_amount(amount) {
        let pct = percentages.get(category);
        if pct != 0.0 {
            *out.get_mut(category) = pct * amount / 100.0;
        }
    }
    out
}

pub fn auto_enhance(txn: &ConvertedTransaction, rules: &[AutoEnhanceRule]) -> Option<Enhancement> {
    let rule = find_rule(txn, rules)?;
    Some(Enhancement {
        categories: distribute(&rule.categories, txn.amount),
        labels: rule.labels.clone(),
        summary: rule.summary.clone(),
        auto_enhanced: true,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn txn(amount: f64, remarks: &str) -> ConvertedTransaction {
        ConvertedTransaction {
            account_name: "ICICI".to_string(),
            amount,
            timestamp: NaiveDate::from_ymd_opt(2023, 1, 15).unwrap(),
            bank_serial: String::new(),
            bank_payment_mode: "UPI".to_string(),
            bank_remarks: remarks.to_string(),
        }
    }

    fn rule(for_credit: bool, keywords: &[&str], categories: AmountPerCategory, summary: &str) -> AutoEnhanceRule {
        AutoEnhanceRule {
            for_credit,
            remarks_keywords: keywords.iter().map(|k| k.to_string()).collect(),
            categories,
            labels: vec!["auto".to_string()],
            summary: summary.to_string(),
        }
    }

    fn debit_split() -> AmountPerCategory {
        AmountPerCategory {
            essentials: 60.0,
            investments: 40.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_percentages_become_amounts() {
        let rules = vec![rule(false, &["rent"], debit_split(), "Rent")];
        let enhanced = auto_enhance(&txn(-1000.0, "IMPS RENT MARCH"), &rules).unwrap();
        assert_eq!(enhanced.categories.essentials, -600.0);
        assert_eq!(enhanced.categories.investments, -400.0);
        assert_eq!(enhanced.categories.debit_sum(), -1000.0);
        assert_eq!(enhanced.labels, vec!["auto"]);
        assert_eq!(enhanced.summary, "Rent");
        assert!(enhanced.auto_enhanced);
    }

    #[test]
    fn test_credit_rule_with_ignorable() {
        let cats = AmountPerCategory {
            salary: 90.0,
            ignorable: 10.0,
            ..Default::default()
        };
        let rules = vec![rule(true, &["acme"], cats, "Salary")];
        let enhanced = auto_enhance(&txn(50000.0, "NEFT ACME CORP"), &rules).unwrap();
        assert_eq!(enhanced.categories.salary, 45000.0);
        assert_eq!(enhanced.categories.ignorable, 5000.0);
        assert_eq!(enhanced.categories.credit_sum(), 50000.0);
    }

    #[test]
    fn test_polarity_is_respected() {
        let credit_cats = AmountPerCategory { misc: 100.0, ..Default::default() };
        let rules = vec![rule(true, &["swiggy"], credit_cats, "Refund")];
        assert!(auto_enhance(&txn(-250.0, "UPI SWIGGY"), &rules).is_none());
        assert!(auto_enhance(&txn(250.0, "UPI SWIGGY REFUND"), &rules).is_some());
    }

    #[test]
    fn test_first_matching_rule_wins() {
        let rules = vec![
            rule(false, &["amazon"], AmountPerCategory { luxury: 100.0, ..Default::default() }, "Shopping"),
            rule(false, &["amazon pay"], debit_split(), "Bills"),
        ];
        let found = find_rule(&txn(-10.0, "Amazon Pay India"), &rules).unwrap();
        assert_eq!(found.summary, "Shopping");
    }

    #[test]
    fn test_keyword_match_is_case_insensitive() {
        let rules = vec![rule(false, &["ZoMaTo"], debit_split(), "Food")];
        assert!(find_rule(&txn(-10.0, "upi/zomato/123"), &rules).is_some());
        assert!(find_rule(&txn(-10.0, "upi/swiggy/123"), &rules).is_none());
    }

    #[test]
    fn test_validate_accepts_good_rules() {
        assert!(validate_rule(&rule(false, &["x"], debit_split(), "")).is_ok());
        let cats = AmountPerCategory { returns: 50.0, ignorable: 50.0, ..Default::default() };
        assert!(validate_rule(&rule(true, &["x"], cats, "")).is_ok());
        let cats = AmountPerCategory { ignorable: 100.0, ..Default::default() };
        assert!(validate_rule(&rule(true, &["x"], cats.clone(), "")).is_ok());
        assert!(validate_rule(&rule(false, &["x"], cats, "")).is_ok());
    }

    #[test]
    fn test_validate_rejects_credit_rule_with_debit_bucket() {
        let cats = AmountPerCategory { salary: 50.0, luxury: 50.0, ..Default::default() };
        assert!(validate_rule(&rule(true, &["x"], cats, "")).is_err());
    }

    #[test]
    fn test_validate_rejects_bad_sums() {
        let cats = AmountPerCategory { salary: 60.0, returns: 30.0, ..Default::default() };
        let err = validate_rule(&rule(true, &["x"], cats, "")).unwrap_err();
        assert!(err.contains("90"));

        let cats = AmountPerCategory { essentials: 100.0, savings: 1.0, ..Default::default() };
        assert!(validate_rule(&rule(false, &["x"], cats, "")).is_err());
    }

    #[test]
    fn test_validate_rejects_debit_rule_with_credit_bucket() {
        let cats = AmountPerCategory { essentials: 50.0, misc: 50.0, ..Default::default() };
        assert!(validate_rule(&rule(false, &["x"], cats, "")).is_err());
    }

    #[test]
    fn test_validate_rejects_negative_percentages() {
        let cats = AmountPerCategory { essentials: 150.0, savings: -50.0, ..Default::default() };
        assert!(validate_rule(&rule(false, &["x"], cats, "")).is_err());
    }

    #[test]
    fn test_validate_rules_reports_index() {
        let bad = AmountPerCategory { essentials: 10.0, ..Default::default() };
        let rules = vec![rule(false, &["a"], debit_split(), ""), rule(false, &["b"], bad, "")];
        let err = validate_rules(&rules).unwrap_err();
        assert!(matches!(err, LedgerError::InvalidRule { index: 1, .. }));
    }

    #[test]
    fn test_load_rules_missing_default_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let rules = load_rules(&SpecSource::Default(dir.path().join("spec.json"))).unwrap();
        assert!(rules.is_empty());
    }

    #[test]
    fn test_load_rules_missing_explicit_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_rules(&SpecSource::Explicit(dir.path().join("spec.json"))).unwrap_err();
        assert!(err.to_string().contains("spec.json"));
        assert!(matches!(err.root(), LedgerError::Io(_)));
    }

    #[test]
    fn test_load_rules_validates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("spec.json");
        std::fs::write(
            &path,
            r#"[{"for_credit": true, "remarks_keywords": ["x"], "categories": {"salary": 100}, "labels": [], "summary": ""},
                {"for_credit": true, "remarks_keywords": ["y"], "categories": {"essentials": 100}, "labels": [], "summary": ""}]"#,
        )
        .unwrap();
        let err = load_rules(&SpecSource::Default(path)).unwrap_err();
        assert!(matches!(err.root(), LedgerError::InvalidRule { index: 1, .. }));
    }
}
