use crate::cli::{MalformedOutput, Purpose};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use uuid::Uuid;

#[derive(Serialize)]
pub struct JsonOut<T: Serialize> {
    pub ok: bool,
    pub data: T,
}

/// How a rule command expects to be launched.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum ScriptType {
    Command,
    BashScript,
    PythonScript,
    AsIs,
}

/// The two invocation strategies a script type can map to.
///
/// `Inline` commands get placeholder tokens substituted into the command
/// string and receive no arguments. `Positional` commands run unchanged and
/// receive the target file path and the policy-definitions directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgumentShape {
    Inline,
    Positional,
}

impl ScriptType {
    pub fn argument_shape(self) -> ArgumentShape {
        match self {
            ScriptType::Command | ScriptType::BashScript => ArgumentShape::Inline,
            ScriptType::PythonScript | ScriptType::AsIs => ArgumentShape::Positional,
        }
    }
}

/// Decoded JSON a rule command writes to stdout.
///
/// Every field is optional on the wire; absent fields read as `None`.
#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CommandOutput {
    #[serde(default)]
    pub event_outcome_information: Option<String>,
    #[serde(default)]
    pub event_outcome_detail_note: Option<String>,
    #[serde(default)]
    pub policy: Option<String>,
    #[serde(default)]
    pub stdout: Option<String>,
}

/// One line of the validation event log.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ValidationEvent {
    pub event_id: Uuid,
    pub file_uuid: String,
    pub event_type: String,
    pub detail: String,
    pub outcome: Option<String>,
    pub outcome_detail_note: Option<String>,
    pub recorded_at: u64,
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RuleOutcome {
    Passed,
    Failed,
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CheckOutcome {
    NotApplicable,
    Pass,
    Fail,
}

impl CheckOutcome {
    /// Not-applicable and pass are indistinguishable at the exit-code level.
    pub fn exit_code(self) -> u8 {
        match self {
            CheckOutcome::NotApplicable | CheckOutcome::Pass => 0,
            CheckOutcome::Fail => 1,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RuleResult {
    pub description: String,
    pub outcome: RuleOutcome,
    pub outcome_information: Option<String>,
    pub outcome_detail_note: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CheckReport {
    pub outcome: CheckOutcome,
    pub file_path: String,
    /// Absent for manually normalized access derivatives.
    pub file_uuid: Option<String>,
    pub package_uuid: String,
    pub purpose: Purpose,
    pub manually_normalized: bool,
    pub rules: Vec<RuleResult>,
}

/// Inputs for one policy check, as handed in on the command line.
#[derive(Debug, Clone)]
pub struct CheckRequest {
    pub file_path: String,
    pub file_uuid: String,
    pub package_uuid: String,
    pub shared_root: PathBuf,
    pub purpose: Purpose,
}

#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    #[serde(default)]
    pub general: ConfigGeneral,
}

#[derive(Debug, Deserialize, Default)]
pub struct ConfigGeneral {
    #[serde(default)]
    pub malformed_output: Option<MalformedOutput>,
    #[serde(default)]
    pub policies_dir: Option<String>,
}
