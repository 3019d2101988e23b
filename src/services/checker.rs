use crate::cli::{MalformedOutput, Purpose};
use crate::domain::constants::{
    ACCESS_DERIVATIVE_PARENT_SUFFIX, CATEGORY_ORIGINALS, CATEGORY_PRESERVATION,
    LEGACY_POLICY_CHECK_MARKER, LEGACY_POLICY_TOOL_MARKER, MANUAL_ACCESS_LOCATION_PREFIX,
    NO_FILE_UUID, PASS_OUTCOME, POLICIES_SUBDIR, UUID_PREFIX_LEN,
};
use crate::domain::models::{
    CheckOutcome, CheckReport, CheckRequest, CommandOutput, RuleOutcome, RuleResult,
};
use crate::registry::{self, FileRecord, Registry, Rule, RuleCommand};
use crate::services::archive;
use crate::services::config::Settings;
use crate::services::events::{validation_event, EventLog};
use crate::services::exec;
use crate::services::output::Printer;
use std::path::{Path, PathBuf};

#[derive(thiserror::Error, Debug)]
pub enum CheckError {
    #[error("command {description} produced output that is not valid JSON: {source}")]
    BadOutput {
        description: String,
        source: serde_json::Error,
    },
}

/// Checks one file against the policy rules registered for its format and
/// purpose. Built per invocation; owns no state beyond the inputs.
pub struct PolicyChecker<'a> {
    registry: &'a Registry,
    events: &'a EventLog,
    printer: &'a Printer,
    file_path: String,
    file_uuid: String,
    package_uuid: String,
    shared_root: PathBuf,
    policies_dir: PathBuf,
    purpose: Purpose,
    malformed_output: MalformedOutput,
    manually_normalized: bool,
}

impl<'a> PolicyChecker<'a> {
    pub fn new(
        registry: &'a Registry,
        events: &'a EventLog,
        printer: &'a Printer,
        request: CheckRequest,
        settings: &Settings,
    ) -> Self {
        let policies_dir = settings
            .policies_dir
            .clone()
            .unwrap_or_else(|| request.shared_root.join(POLICIES_SUBDIR));
        let manually_normalized =
            is_manually_normalized_access_derivative(&request.file_path, &request.file_uuid);
        Self {
            registry,
            events,
            printer,
            file_path: request.file_path,
            file_uuid: request.file_uuid,
            package_uuid: request.package_uuid,
            shared_root: request.shared_root,
            policies_dir,
            purpose: request.purpose,
            malformed_output: settings.malformed_output,
            manually_normalized,
        }
    }

    /// Run the whole check: resolve the file, pick the applicable rules,
    /// execute them in registry order, fold the per-rule outcomes.
    pub fn check(&self) -> anyhow::Result<CheckReport> {
        let record = if self.manually_normalized {
            None
        } else {
            match registry::file_by_uuid(self.registry, &self.file_uuid) {
                Ok(f) => Some(f),
                Err(_) => {
                    self.printer.info(&format!(
                        "Not performing a policy check because no file record has identifier {}.",
                        self.file_uuid
                    ));
                    return Ok(self.report(CheckOutcome::NotApplicable, vec![]));
                }
            }
        };
        if !purpose_applies(self.purpose, record, self.manually_normalized) {
            return Ok(self.report(CheckOutcome::NotApplicable, vec![]));
        }
        let rules = self.resolve_rules();
        if rules.is_empty() {
            self.printer.info(
                "Not performing a policy check because there are no relevant policy rules.",
            );
            return Ok(self.report(CheckOutcome::NotApplicable, vec![]));
        }
        let archive_dir = if self.purpose == Purpose::CheckingPresDerivativePolicy {
            archive::package_policies_dir(
                self.registry,
                &self.package_uuid,
                &self.shared_root,
                self.printer,
            )
        } else {
            None
        };
        let mut results = Vec::with_capacity(rules.len());
        for rule in rules {
            results.push(self.execute_rule(rule, archive_dir.as_deref())?);
        }
        let outcome = if results.iter().any(|r| r.outcome == RuleOutcome::Failed) {
            CheckOutcome::Fail
        } else {
            CheckOutcome::Pass
        };
        Ok(self.report(outcome, results))
    }

    fn report(&self, outcome: CheckOutcome, rules: Vec<RuleResult>) -> CheckReport {
        CheckReport {
            outcome,
            file_path: self.file_path.clone(),
            file_uuid: if self.manually_normalized {
                None
            } else {
                Some(self.file_uuid.clone())
            },
            package_uuid: self.package_uuid.clone(),
            purpose: self.purpose,
            manually_normalized: self.manually_normalized,
            rules,
        }
    }

    /// Format-specific rules first; when that query yields nothing (or no
    /// format could be resolved), fall back to the default-purpose rules.
    fn resolve_rules(&self) -> Vec<&'a Rule> {
        let effective_uuid = if self.manually_normalized {
            self.derivative_original_uuid()
        } else {
            Some(self.file_uuid.clone())
        };
        let format = effective_uuid
            .and_then(|uuid| registry::active_format_for_file(self.registry, &uuid));
        let mut rules = Vec::new();
        if let Some(format) = format {
            self.printer
                .info(&format!("File format: {}", format.description));
            rules = registry::active_rules(self.registry, &format.uuid, self.purpose.registry_tag());
        }
        if rules.is_empty() {
            rules = registry::rules_for_purpose(self.registry, &default_purpose_tag(self.purpose));
        }
        rules
    }

    /// Manually normalized access derivatives carry no identifier of their
    /// own. Recover the identifier of the file they were normalized from by
    /// reconstructing its recorded original location from the derivative's
    /// filename. Zero or multiple matches leave the identifier undefined.
    fn derivative_original_uuid(&self) -> Option<String> {
        let name = derivative_original_name(&self.file_path)?;
        let location = format!("{}{}", MANUAL_ACCESS_LOCATION_PREFIX, name);
        registry::file_by_original_location(self.registry, &location, &self.package_uuid)
            .ok()
            .map(|f| f.uuid.clone())
    }

    fn execute_rule(&self, rule: &Rule, archive_dir: Option<&Path>) -> anyhow::Result<RuleResult> {
        let (body, args) = exec::build_invocation(
            &rule.command,
            &self.file_uuid,
            &self.package_uuid,
            &self.file_path,
            &self.policies_dir,
        );
        self.printer
            .info(&format!("Running {}", rule.command.description));
        let run = exec::run(rule.command.script_type, &body, &args)?;
        if run.status != 0 {
            self.printer.fail(&format!(
                "Command {} failed with exit status {}; stderr: {}",
                rule.command.description,
                run.status,
                run.stderr.trim_end()
            ));
            return Ok(self.rule_result(rule, RuleOutcome::Failed, CommandOutput::default()));
        }
        let output: CommandOutput = match serde_json::from_str(&run.stdout) {
            Ok(output) => output,
            Err(source) => {
                return match self.malformed_output {
                    MalformedOutput::Failed => {
                        self.printer.fail(&format!(
                            "Command {} produced output that is not valid JSON; treating the rule as failed.",
                            rule.command.description
                        ));
                        Ok(self.rule_result(rule, RuleOutcome::Failed, CommandOutput::default()))
                    }
                    MalformedOutput::Error => Err(CheckError::BadOutput {
                        description: rule.command.description.clone(),
                        source,
                    }
                    .into()),
                };
            }
        };
        if let Some(archive_dir) = archive_dir {
            if let Err(e) = archive::save_artifacts(
                archive_dir,
                &self.policies_dir,
                archive_category(self.purpose),
                &self.file_path,
                &output,
                self.printer,
            ) {
                self.printer
                    .warn(&format!("unable to archive policy artifacts: {:#}", e));
            }
        }
        self.printer.info(&format!(
            "Command {} completed with output {}",
            rule.command.description,
            run.stdout.trim_end()
        ));
        let mut outcome = RuleOutcome::Passed;
        if reports_policy_verdict(&rule.command)
            && output.event_outcome_information.as_deref() != Some(PASS_OUTCOME)
        {
            self.printer.fail(&format!(
                "Command {} returned a non-pass outcome for the policy check; outcome: {}; details: {}",
                rule.command.description,
                output.event_outcome_information.as_deref().unwrap_or(""),
                output.event_outcome_detail_note.as_deref().unwrap_or(""),
            ));
            outcome = RuleOutcome::Failed;
        }
        self.printer.info(&format!(
            "Recording validation event for {} ({})",
            self.file_path, self.file_uuid
        ));
        if !self.manually_normalized {
            let detail = format!(
                "program=\"{}\"; version=\"{}\"",
                rule.command.tool.description, rule.command.tool.version
            );
            let event = validation_event(
                &self.file_uuid,
                detail,
                output.event_outcome_information.clone(),
                output.event_outcome_detail_note.clone(),
            );
            self.events.record(&event)?;
        }
        Ok(self.rule_result(rule, outcome, output))
    }

    fn rule_result(&self, rule: &Rule, outcome: RuleOutcome, output: CommandOutput) -> RuleResult {
        RuleResult {
            description: rule.command.description.clone(),
            outcome,
            outcome_information: output.event_outcome_information,
            outcome_detail_note: output.event_outcome_detail_note,
        }
    }
}

pub fn is_manually_normalized_access_derivative(file_path: &str, file_uuid: &str) -> bool {
    file_uuid == NO_FILE_UUID
        && Path::new(file_path)
            .parent()
            .map(|p| p.ends_with(ACCESS_DERIVATIVE_PARENT_SUFFIX))
            .unwrap_or(false)
}

/// Strip the `<uuid>-` prefix a derivative filename carries to recover the
/// name the file had when it was staged for manual normalization.
fn derivative_original_name(file_path: &str) -> Option<&str> {
    let name = Path::new(file_path).file_name()?.to_str()?;
    name.get(UUID_PREFIX_LEN..).filter(|rest| !rest.is_empty())
}

fn purpose_applies(
    purpose: Purpose,
    record: Option<&FileRecord>,
    manually_normalized: bool,
) -> bool {
    let group_use = record.map(|f| f.group_use.as_str()).unwrap_or("");
    match purpose {
        Purpose::CheckingPolicy => true,
        Purpose::CheckingAccessDerivativePolicy => manually_normalized || group_use == "access",
        Purpose::CheckingPresDerivativePolicy => group_use == "preservation",
        Purpose::CheckingOriginalPolicy => group_use == "original",
    }
}

/// Does this command's output carry a policy verdict to enforce? The
/// structured tag wins when present; untagged rules keep the historical
/// description heuristic.
fn reports_policy_verdict(command: &RuleCommand) -> bool {
    match command.policy_check {
        Some(tagged) => tagged,
        None => {
            command.description.contains(LEGACY_POLICY_CHECK_MARKER)
                && command.description.contains(LEGACY_POLICY_TOOL_MARKER)
        }
    }
}

fn default_purpose_tag(purpose: Purpose) -> String {
    format!("default_{}", purpose.registry_tag())
}

fn archive_category(purpose: Purpose) -> &'static str {
    match purpose {
        Purpose::CheckingPresDerivativePolicy => CATEGORY_PRESERVATION,
        _ => CATEGORY_ORIGINALS,
    }
}
