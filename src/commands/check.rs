use crate::*;
use std::path::{Path, PathBuf};

pub fn handle_check(cli: &Cli) -> anyhow::Result<CheckOutcome> {
    let config = load_config(cli.config.as_deref().map(Path::new))?;
    let settings = resolve_settings(cli.malformed_output, &config);

    let shared_root = PathBuf::from(&cli.shared_root);
    let registry_path = cli
        .registry
        .as_ref()
        .map(PathBuf::from)
        .unwrap_or_else(|| shared_root.join("registry.json"));
    let registry = load_registry(&registry_path)?;
    let events_path = cli
        .events
        .as_ref()
        .map(PathBuf::from)
        .unwrap_or_else(|| shared_root.join("events.jsonl"));
    let events = EventLog::new(events_path);
    let printer = Printer::new(cli.json);

    let checker = PolicyChecker::new(
        &registry,
        &events,
        &printer,
        CheckRequest {
            file_path: cli.file_path.clone(),
            file_uuid: cli.file_uuid.clone(),
            package_uuid: cli.package_uuid.clone(),
            shared_root,
            purpose: cli.purpose,
        },
        &settings,
    );
    let report = checker.check()?;

    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&JsonOut {
                ok: report.outcome != CheckOutcome::Fail,
                data: &report
            })?
        );
    } else {
        for rule in &report.rules {
            let label = match rule.outcome {
                RuleOutcome::Passed => "passed",
                RuleOutcome::Failed => "failed",
            };
            println!("{}\t{}", rule.description, label);
        }
        let summary = match report.outcome {
            CheckOutcome::NotApplicable => "not applicable",
            CheckOutcome::Pass => "passed",
            CheckOutcome::Fail => "failed",
        };
        println!("policy check {}: {}", summary, report.file_path);
    }
    Ok(report.outcome)
}
