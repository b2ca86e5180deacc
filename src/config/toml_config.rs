use crate::domain::model::{BranchEntry, BranchMap};
use crate::utils::error::{ReportError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Optional settings file. All sections may be omitted; missing values
/// fall back to CLI flags and then to the built-in defaults.
///
/// ```toml
/// [intake]
/// inbox = "Entrada"
/// interval_seconds = 30
///
/// [output]
/// dir = "${REPORT_OUTPUT_DIR}"
///
/// [[branches]]
/// sheet = "Campus II"
/// name = "Biblioteca Campus II"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub intake: Option<IntakeConfig>,
    pub output: Option<OutputConfig>,
    #[serde(default)]
    pub branches: Vec<BranchEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntakeConfig {
    pub inbox: Option<PathBuf>,
    pub interval_seconds: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub dir: Option<PathBuf>,
}

impl TomlConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(ReportError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| ReportError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR_NAME}` occurrences with the environment value;
    /// unset variables are left as-is.
    fn substitute_env_vars(content: &str) -> String {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").unwrap();

        re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .to_string()
    }

    pub fn inbox(&self) -> Option<PathBuf> {
        self.intake.as_ref().and_then(|i| i.inbox.clone())
    }

    pub fn interval_seconds(&self) -> Option<u64> {
        self.intake.as_ref().and_then(|i| i.interval_seconds)
    }

    pub fn output_dir(&self) -> Option<PathBuf> {
        self.output.as_ref().and_then(|o| o.dir.clone())
    }

    /// Branch map override; `None` when the file declares no branches so
    /// the built-in map applies.
    pub fn branch_map(&self) -> Option<BranchMap> {
        if self.branches.is_empty() {
            None
        } else {
            Some(BranchMap::new(self.branches.clone()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_basic_config() {
        let toml_content = r#"
[intake]
inbox = "Dados"
interval_seconds = 10

[output]
dir = "Resultados"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.inbox(), Some(PathBuf::from("Dados")));
        assert_eq!(config.interval_seconds(), Some(10));
        assert_eq!(config.output_dir(), Some(PathBuf::from("Resultados")));
        assert!(config.branch_map().is_none());
    }

    #[test]
    fn test_branches_keep_declared_order() {
        let toml_content = r#"
[[branches]]
sheet = "Campus II"
name = "Biblioteca Campus II"

[[branches]]
sheet = "Unidade 1"
name = "Biblioteca Campus I - Unid. 1"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        let branches = config.branch_map().unwrap();
        let sheets: Vec<&str> = branches.iter().map(|e| e.sheet.as_str()).collect();

        assert_eq!(sheets, vec!["Campus II", "Unidade 1"]);
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("TEST_REPORT_INBOX", "CaixaDeEntrada");

        let toml_content = r#"
[intake]
inbox = "${TEST_REPORT_INBOX}"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.inbox(), Some(PathBuf::from("CaixaDeEntrada")));

        std::env::remove_var("TEST_REPORT_INBOX");
    }

    #[test]
    fn test_invalid_toml_is_a_config_error() {
        assert!(TomlConfig::from_toml_str("intake = ").is_err());
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();

        let toml_content = r#"
[intake]
interval_seconds = 60
"#;
        temp_file.write_all(toml_content.as_bytes()).unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.interval_seconds(), Some(60));
    }
}
