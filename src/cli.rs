use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};

#[derive(Parser, Debug)]
#[command(
    name = "polcheck",
    version,
    about = "Check a preserved file against its format-policy rules"
)]
pub struct Cli {
    /// Absolute path of the file to check.
    pub file_path: String,
    /// File identifier, or the literal "None" for files never assigned one.
    pub file_uuid: String,
    /// Identifier of the package the file belongs to.
    pub package_uuid: String,
    /// Shared storage root; registry package paths resolve against it.
    pub shared_root: String,
    #[arg(long, value_enum, default_value_t = Purpose::CheckingPolicy)]
    pub purpose: Purpose,
    #[arg(long, help = "Output a machine-readable JSON report")]
    pub json: bool,
    #[arg(long, help = "Registry file (default: <shared-root>/registry.json)")]
    pub registry: Option<String>,
    #[arg(
        long,
        help = "Validation event log (default: <shared-root>/events.jsonl)"
    )]
    pub events: Option<String>,
    #[arg(long, help = "Config file (default: ~/.config/polcheck/config.toml)")]
    pub config: Option<String>,
    #[arg(
        long,
        value_enum,
        help = "How to treat rule output that is not valid JSON"
    )]
    pub malformed_output: Option<MalformedOutput>,
}

/// Why the check runs; selects which registry rules apply.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "camelCase")]
pub enum Purpose {
    CheckingPolicy,
    CheckingAccessDerivativePolicy,
    CheckingPresDerivativePolicy,
    CheckingOriginalPolicy,
}

impl Purpose {
    /// Purpose tag as it appears on registry rules.
    pub fn registry_tag(self) -> &'static str {
        match self {
            Purpose::CheckingPolicy => "checkingPolicy",
            Purpose::CheckingAccessDerivativePolicy => "checkingAccessDerivativePolicy",
            Purpose::CheckingPresDerivativePolicy => "checkingPresDerivativePolicy",
            Purpose::CheckingOriginalPolicy => "checkingOriginalPolicy",
        }
    }
}

/// A rule command is expected to print one JSON object. This picks what a
/// run does when one prints something else.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum MalformedOutput {
    /// Mark the rule failed and keep aggregating.
    Failed,
    /// Abort the whole check with an error.
    Error,
}
