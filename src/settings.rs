use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::accounts::InferenceRules;
use crate::error::{LedgerError, Result};
use crate::importer::SignConvention;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub converted_file: String,
    pub enhanced_file: String,
    pub auto_enhance_spec_file: String,
    pub icici_credit_sign: SignConvention,
    /// Custom account-type keyword rules; the built-in rules apply when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_rules: Option<serde_json::Value>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            converted_file: "./converted-statement.json".to_string(),
            enhanced_file: "./enhanced-statement.json".to_string(),
            auto_enhance_spec_file: "./auto-enhance-spec.json".to_string(),
            icici_credit_sign: SignConvention::default(),
            account_rules: None,
        }
    }
}

impl Settings {
    pub fn inference_rules(&self) -> Result<InferenceRules> {
        match &self.account_rules {
            Some(value) => InferenceRules::from_json(value),
            None => Ok(InferenceRules::default()),
        }
    }
}

fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("ledgerconv")
}

pub fn settings_path() -> PathBuf {
    config_dir().join("settings.json")
}

pub fn load_settings() -> Settings {
    load_settings_from(&settings_path())
}

pub fn load_settings_from(path: &Path) -> Settings {
    if !path.exists() {
        return Settings::default();
    }
    let content = std::fs::read_to_string(path).unwrap_or_default();
    match serde_json::from_str(&content) {
        Ok(settings) => settings,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "ignoring unreadable settings file");
            Settings::default()
        }
    }
}

pub fn save_settings(settings: &Settings) -> Result<()> {
    save_settings_to(settings, &settings_path())
}

pub fn save_settings_to(settings: &Settings, path: &Path) -> Result<()> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }
    let json = serde_json::to_string_pretty(settings)
        .map_err(|e| LedgerError::Settings(e.to_string()))?;
    std::fs::write(path, format!("{json}\n"))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accounts::AccountType;

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let settings = Settings {
            converted_file: "/tmp/conv.json".to_string(),
            icici_credit_sign: SignConvention::CrIsDebit,
            ..Default::default()
        };
        save_settings_to(&settings, &path).unwrap();
        let loaded = load_settings_from(&path);
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_load_returns_defaults_when_missing() {
        let dir = tempfile::tempdir().unwrap();
        let s = load_settings_from(&dir.path().join("nope.json"));
        assert_eq!(s, Settings::default());
        assert_eq!(s.icici_credit_sign, SignConvention::CrIsCredit);
    }

    #[test]
    fn test_load_merges_with_defaults() {
        let json = r#"{"enhanced_file": "/data/enhanced.json", "icici_credit_sign": "cr_is_debit"}"#;
        let s: Settings = serde_json::from_str(json).unwrap();
        assert_eq!(s.enhanced_file, "/data/enhanced.json");
        assert_eq!(s.converted_file, "./converted-statement.json");
        assert_eq!(s.icici_credit_sign, SignConvention::CrIsDebit);
    }

    #[test]
    fn test_save_creates_config_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deep").join("nested").join("settings.json");
        save_settings_to(&Settings::default(), &path).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_custom_account_rules() {
        let json = r#"{"account_rules": {"axis": "hdfc-savings"}}"#;
        let s: Settings = serde_json::from_str(json).unwrap();
        let rules = s.inference_rules().unwrap();
        assert_eq!(rules.infer("Axis Salary").unwrap(), AccountType::HdfcSavings);
    }
}
