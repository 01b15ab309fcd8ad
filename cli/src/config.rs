use ahk_core::lint::LintConfig;
use ahk_lsp::DiagnosticOptions;
use anyhow::Context;
use serde::Deserialize;
use std::path::Path;

/// Optional `--config` file:
///
/// ```toml
/// [lint]
/// maxLoopDepth = 4
/// indentWidth = 2
///
/// [diagnostics]
/// enableStandards = false
/// severityFilter = "warning"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    pub lint: LintConfig,
    pub diagnostics: DiagnosticOptions,
}

impl CliConfig {
    pub fn from_toml_str(text: &str) -> anyhow::Result<Self> {
        toml::from_str(text).context("invalid config")
    }

    /// Defaults when no path is given.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = std::fs::read_to_string(path).with_context(|| format!("Failed to read config '{}'", path.display()))?;
        let config = Self::from_toml_str(&text).with_context(|| format!("in {}", path.display()))?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }
}
