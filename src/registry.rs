use crate::domain::models::ScriptType;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

fn default_true() -> bool {
    true
}

/// File-backed registry of packages, files, identified formats and
/// format-policy rules. Loaded once per invocation, queried read-only.
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct Registry {
    #[serde(default)]
    pub packages: Vec<PackageRecord>,
    #[serde(default)]
    pub files: Vec<FileRecord>,
    #[serde(default)]
    pub formats: Vec<FormatVersion>,
    #[serde(default)]
    pub rules: Vec<Rule>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct PackageRecord {
    pub uuid: String,
    /// On-disk root; may start with the shared-root placeholder token.
    pub current_path: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct FileRecord {
    pub uuid: String,
    /// Package the file belongs to.
    pub package: String,
    #[serde(default)]
    pub original_location: String,
    /// Classification of what the file is for ("access", "preservation",
    /// "original", ...).
    #[serde(default)]
    pub group_use: String,
    /// Identified format version, when format identification ran.
    #[serde(default)]
    pub format: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct FormatVersion {
    pub uuid: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_true")]
    pub active: bool,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Rule {
    /// Format this rule applies to; absent on default-purpose rules.
    #[serde(default)]
    pub format: Option<String>,
    pub purpose: String,
    #[serde(default = "default_true")]
    pub active: bool,
    pub command: RuleCommand,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct RuleCommand {
    pub script_type: ScriptType,
    pub command: String,
    pub description: String,
    /// Structured marker: does this command report a policy verdict in its
    /// output? Rules without it fall back to the description heuristic.
    #[serde(default)]
    pub policy_check: Option<bool>,
    pub tool: Tool,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Tool {
    pub description: String,
    pub version: String,
}

#[derive(thiserror::Error, Debug)]
pub enum RegistryError {
    #[error("file not found: {0}")]
    FileNotFound(String),
    #[error("package not found: {0}")]
    PackageNotFound(String),
    #[error("no file has original location: {0}")]
    OriginalLocationNotFound(String),
    #[error("multiple files share original location: {0}")]
    OriginalLocationAmbiguous(String),
    #[error("duplicate record identifier: {0}")]
    DuplicateRecord(String),
}

pub fn load_registry(path: &Path) -> anyhow::Result<Registry> {
    if !path.is_file() {
        anyhow::bail!("registry not found: {}", path.display());
    }
    let raw = std::fs::read_to_string(path)?;
    let registry: Registry = serde_json::from_str(&raw)?;
    validate(&registry)?;
    Ok(registry)
}

pub fn validate(r: &Registry) -> anyhow::Result<()> {
    let mut seen = HashSet::new();
    for uuid in r.packages.iter().map(|p| &p.uuid) {
        if !seen.insert(uuid) {
            return Err(RegistryError::DuplicateRecord(uuid.clone()).into());
        }
    }
    seen.clear();
    for uuid in r.files.iter().map(|f| &f.uuid) {
        if !seen.insert(uuid) {
            return Err(RegistryError::DuplicateRecord(uuid.clone()).into());
        }
    }
    seen.clear();
    for uuid in r.formats.iter().map(|f| &f.uuid) {
        if !seen.insert(uuid) {
            return Err(RegistryError::DuplicateRecord(uuid.clone()).into());
        }
    }
    Ok(())
}

pub fn file_by_uuid<'a>(r: &'a Registry, uuid: &str) -> Result<&'a FileRecord, RegistryError> {
    r.files
        .iter()
        .find(|f| f.uuid == uuid)
        .ok_or_else(|| RegistryError::FileNotFound(uuid.to_string()))
}

pub fn package_by_uuid<'a>(r: &'a Registry, uuid: &str) -> Result<&'a PackageRecord, RegistryError> {
    r.packages
        .iter()
        .find(|p| p.uuid == uuid)
        .ok_or_else(|| RegistryError::PackageNotFound(uuid.to_string()))
}

/// Locate the file whose recorded original location matches, scoped to one
/// package. Zero matches and multiple matches are distinct errors; both
/// mean the caller cannot resolve an identifier.
pub fn file_by_original_location<'a>(
    r: &'a Registry,
    location: &str,
    package_uuid: &str,
) -> Result<&'a FileRecord, RegistryError> {
    let mut matches = r
        .files
        .iter()
        .filter(|f| f.package == package_uuid && f.original_location == location);
    match (matches.next(), matches.next()) {
        (Some(f), None) => Ok(f),
        (Some(_), Some(_)) => Err(RegistryError::OriginalLocationAmbiguous(
            location.to_string(),
        )),
        (None, _) => Err(RegistryError::OriginalLocationNotFound(location.to_string())),
    }
}

/// Active format version identified for a file, if any. Absence is not an
/// error: it means no format-specific rules can apply.
pub fn active_format_for_file<'a>(r: &'a Registry, file_uuid: &str) -> Option<&'a FormatVersion> {
    let file = r.files.iter().find(|f| f.uuid == file_uuid)?;
    let format_uuid = file.format.as_deref()?;
    r.formats
        .iter()
        .find(|f| f.uuid == format_uuid && f.active)
}

pub fn active_rules<'a>(r: &'a Registry, format_uuid: &str, purpose: &str) -> Vec<&'a Rule> {
    r.rules
        .iter()
        .filter(|rule| {
            rule.active && rule.purpose == purpose && rule.format.as_deref() == Some(format_uuid)
        })
        .collect()
}

/// Rules matching a purpose tag regardless of format. Used for the
/// `default_*` fallback purposes.
pub fn rules_for_purpose<'a>(r: &'a Registry, purpose: &str) -> Vec<&'a Rule> {
    r.rules
        .iter()
        .filter(|rule| rule.active && rule.purpose == purpose)
        .collect()
}
