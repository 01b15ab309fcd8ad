//! Documentation index consulted by completions.
//!
//! The JSON format mirrors the published AutoHotkey index: top-level
//! `functions`, `classes`, `variables` and `directives` arrays whose entries use
//! PascalCase field names (`Name`, `Description`, `Parameters`, ...).

use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ParameterDoc {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, rename = "Type", skip_serializing_if = "Option::is_none")]
    pub ty: Option<String>,
    #[serde(default)]
    pub optional: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ExampleDoc {
    #[serde(default)]
    pub description: String,
    pub code: String,
}

/// A function, or a method when `path` names its class.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct FunctionDoc {
    pub name: String,
    pub path: String,
    pub category: String,
    pub description: String,
    pub parameters: Vec<ParameterDoc>,
    pub return_type: Option<String>,
    pub examples: Vec<ExampleDoc>,
}

impl FunctionDoc {
    /// `Name(A, B)` for display.
    pub fn signature(&self) -> String {
        let params: Vec<&str> = self.parameters.iter().map(|p| p.name.as_str()).collect();
        format!("{}({})", self.name, params.join(", "))
    }

    /// Snippet with one tab stop per parameter: `Name(${1:A}, ${2:B})`.
    pub fn snippet(&self) -> String {
        let params: Vec<String> = self
            .parameters
            .iter()
            .enumerate()
            .map(|(i, p)| format!("${{{}:{}}}", i + 1, p.name))
            .collect();
        format!("{}({})", self.name, params.join(", "))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct PropertyDoc {
    pub name: String,
    pub description: String,
    #[serde(rename = "Type")]
    pub ty: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ClassDoc {
    pub name: String,
    pub category: String,
    pub description: String,
    pub methods: Vec<FunctionDoc>,
    pub properties: Vec<PropertyDoc>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct VariableDoc {
    pub name: String,
    pub category: String,
    pub description: String,
    #[serde(rename = "Type")]
    pub ty: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct DirectiveDoc {
    pub name: String,
    pub category: String,
    pub description: String,
}

/// Read-only lookups used by the completion analyzer. Searches match the query
/// as a case-insensitive substring of the name or the description; an empty
/// query matches everything.
pub trait DocSource: Send + Sync {
    fn search_functions(&self, query: &str) -> Vec<&FunctionDoc>;
    fn search_classes(&self, query: &str) -> Vec<&ClassDoc>;
    fn search_variables(&self, query: &str) -> Vec<&VariableDoc>;
    fn search_directives(&self, query: &str) -> Vec<&DirectiveDoc>;
    /// Exact (case-insensitive) class lookup.
    fn find_class(&self, name: &str) -> Option<&ClassDoc>;
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocIndex {
    pub functions: Vec<FunctionDoc>,
    pub classes: Vec<ClassDoc>,
    pub variables: Vec<VariableDoc>,
    pub directives: Vec<DirectiveDoc>,
}

static BUILTIN: Lazy<DocIndex> = Lazy::new(|| match DocIndex::from_json_str(include_str!("../data/builtin_index.json")) {
    Ok(index) => index,
    Err(err) => {
        tracing::warn!(error = %err, "bundled documentation index is invalid");
        DocIndex::default()
    }
});

impl DocIndex {
    pub fn from_json_str(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        let index = Self::from_json_str(&text).with_context(|| format!("parsing {}", path.display()))?;
        tracing::debug!(
            functions = index.functions.len(),
            classes = index.classes.len(),
            variables = index.variables.len(),
            directives = index.directives.len(),
            "loaded documentation index"
        );
        Ok(index)
    }

    /// Small index compiled into the crate, covering common functions, classes,
    /// built-in variables and directives.
    pub fn builtin() -> &'static DocIndex {
        &BUILTIN
    }
}

fn matches(query: &str, name: &str, description: &str) -> bool {
    if query.is_empty() {
        return true;
    }
    let query = query.to_lowercase();
    name.to_lowercase().contains(&query) || description.to_lowercase().contains(&query)
}

impl DocSource for DocIndex {
    fn search_functions(&self, query: &str) -> Vec<&FunctionDoc> {
        self.functions
            .iter()
            .filter(|f| matches(query, &f.name, &f.description))
            .collect()
    }

    fn search_classes(&self, query: &str) -> Vec<&ClassDoc> {
        self.classes
            .iter()
            .filter(|c| matches(query, &c.name, &c.description))
            .collect()
    }

    fn search_variables(&self, query: &str) -> Vec<&VariableDoc> {
        self.variables
            .iter()
            .filter(|v| matches(query, &v.name, &v.description))
            .collect()
    }

    fn search_directives(&self, query: &str) -> Vec<&DirectiveDoc> {
        self.directives
            .iter()
            .filter(|d| matches(query, &d.name, &d.description))
            .collect()
    }

    fn find_class(&self, name: &str) -> Option<&ClassDoc> {
        self.classes.iter().find(|c| c.name.eq_ignore_ascii_case(name))
    }
}
