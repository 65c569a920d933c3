use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{LedgerError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AccountType {
    IciciSavings,
    IciciCredit,
    HdfcSavings,
    HdfcCredit,
}

const ALL_ACCOUNT_TYPES: &[AccountType] = &[
    AccountType::IciciSavings,
    AccountType::IciciCredit,
    AccountType::HdfcSavings,
    AccountType::HdfcCredit,
];

impl AccountType {
    pub fn key(&self) -> &'static str {
        match self {
            Self::IciciSavings => "icici-savings",
            Self::IciciCredit => "icici-credit",
            Self::HdfcSavings => "hdfc-savings",
            Self::HdfcCredit => "hdfc-credit",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::IciciSavings => "ICICI Savings",
            Self::IciciCredit => "ICICI Credit Card",
            Self::HdfcSavings => "HDFC Savings",
            Self::HdfcCredit => "HDFC Credit Card",
        }
    }

    pub fn from_key(key: &str) -> Option<AccountType> {
        ALL_ACCOUNT_TYPES.iter().find(|t| t.key() == key).copied()
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

// ---------------------------------------------------------------------------
// Inference rules
// ---------------------------------------------------------------------------

/// A node of the keyword tree: either a final account type or more keywords
/// to check against the same account name.
#[derive(Debug, Clone, PartialEq)]
pub enum RuleNode {
    Terminal(AccountType),
    Nested(Vec<(String, RuleNode)>),
}

/// Keyword rules mapping an informal account directory name to an account type.
#[derive(Debug, Clone, PartialEq)]
pub struct InferenceRules {
    root: Vec<(String, RuleNode)>,
}

impl Default for InferenceRules {
    fn default() -> Self {
        // "credit" comes first so that "HDFC Credit Card" is not taken for
        // the HDFC savings account.
        Self {
            root: vec![
                (
                    "credit".to_string(),
                    RuleNode::Nested(vec![
                        ("icici".to_string(), RuleNode::Terminal(AccountType::IciciCredit)),
                        ("hdfc".to_string(), RuleNode::Terminal(AccountType::HdfcCredit)),
                    ]),
                ),
                ("icici".to_string(), RuleNode::Terminal(AccountType::IciciSavings)),
                ("hdfc".to_string(), RuleNode::Terminal(AccountType::HdfcSavings)),
            ],
        }
    }
}

impl InferenceRules {
    /// Builds rules from a JSON object such as
    /// `{"credit": {"icici": "icici-credit"}, "icici": "icici-savings"}`.
    /// Key order is kept and decides precedence.
    pub fn from_json(value: &Value) -> Result<Self> {
        Ok(Self {
            root: parse_level(value, "<root>")?,
        })
    }

    /// Resolves the account type for an account directory name.
    pub fn infer(&self, account: &str) -> Result<AccountType> {
        let lowered = account.to_lowercase();
        resolve(&lowered, &self.root).ok_or_else(|| LedgerError::NoRulesMatched(account.to_string()))
    }
}

fn parse_level(value: &Value, path: &str) -> Result<Vec<(String, RuleNode)>> {
    let Value::Object(map) = value else {
        return Err(LedgerError::InvalidRuleStructure(path.to_string()));
    };
    let mut level = Vec::with_capacity(map.len());
    for (keyword, child) in map {
        let child_path = if path == "<root>" {
            keyword.clone()
        } else {
            format!("{path}.{keyword}")
        };
        let node = match child {
            Value::String(key) => AccountType::from_key(key)
                .map(RuleNode::Terminal)
                .ok_or_else(|| LedgerError::InvalidRuleStructure(format!("{child_path} (unknown account type '{key}')")))?,
            Value::Object(_) => RuleNode::Nested(parse_level(child, &child_path)?),
            _ => return Err(LedgerError::InvalidRuleStructure(child_path)),
        };
        level.push((keyword.to_lowercase(), node));
    }
    Ok(level)
}

fn resolve(account: &str, rules: &[(String, RuleNode)]) -> Option<AccountType> {
    let (_, node) = rules.iter().find(|(keyword, _)| account.contains(keyword.as_str()))?;
    match node {
        RuleNode::Terminal(account_type) => Some(*account_type),
        RuleNode::Nested(children) => resolve(account, children),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_infer_default_rules() {
        let rules = InferenceRules::default();
        assert_eq!(rules.infer("ICICI Bank").unwrap(), AccountType::IciciSavings);
        assert_eq!(rules.infer("my hdfc account").unwrap(), AccountType::HdfcSavings);
        assert_eq!(rules.infer("ICICI Credit Card").unwrap(), AccountType::IciciCredit);
        assert_eq!(rules.infer("HDFC Credit Card").unwrap(), AccountType::HdfcCredit);
    }

    #[test]
    fn test_infer_no_match() {
        let rules = InferenceRules::default();
        let err = rules.infer("SBI Savings").unwrap_err();
        assert!(matches!(err, LedgerError::NoRulesMatched(ref a) if a == "SBI Savings"));
    }

    #[test]
    fn test_nested_level_without_match_is_error() {
        // "credit" matches but no bank keyword under it does.
        let rules = InferenceRules::default();
        assert!(matches!(
            rules.infer("Amex Credit").unwrap_err(),
            LedgerError::NoRulesMatched(_)
        ));
    }

    #[test]
    fn test_from_json_preserves_order() {
        let value = json!({
            "credit": {"icici": "icici-credit", "hdfc": "hdfc-credit"},
            "icici": "icici-savings",
            "hdfc": "hdfc-savings",
        });
        let rules = InferenceRules::from_json(&value).unwrap();
        assert_eq!(rules, InferenceRules::default());
    }

    #[test]
    fn test_from_json_keywords_are_case_insensitive() {
        let rules = InferenceRules::from_json(&json!({"ICICI": "icici-savings"})).unwrap();
        assert_eq!(rules.infer("icici joint").unwrap(), AccountType::IciciSavings);
    }

    #[test]
    fn test_from_json_rejects_invalid_structure() {
        let err = InferenceRules::from_json(&json!({"credit": 42})).unwrap_err();
        assert!(matches!(err, LedgerError::InvalidRuleStructure(ref p) if p == "credit"));

        let err = InferenceRules::from_json(&json!({"credit": {"icici": "amex-gold"}})).unwrap_err();
        assert!(matches!(err, LedgerError::InvalidRuleStructure(_)));

        let err = InferenceRules::from_json(&json!(["icici"])).unwrap_err();
        assert!(matches!(err, LedgerError::InvalidRuleStructure(_)));
    }

    #[test]
    fn test_key_roundtrip() {
        for t in ALL_ACCOUNT_TYPES {
            assert_eq!(AccountType::from_key(t.key()), Some(*t));
            assert_eq!(serde_json::to_value(t).unwrap(), json!(t.key()));
        }
        assert_eq!(AccountType::from_key("sbi-savings"), None);
    }
}
