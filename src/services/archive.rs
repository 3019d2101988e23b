use crate::domain::constants::SHARED_PATH_TOKEN;
use crate::domain::models::CommandOutput;
use crate::registry::{self, Registry};
use crate::services::output::Printer;
use std::path::{Path, PathBuf};

/// Resolve the `logs/policies/` directory of a package.
///
/// The package root comes from its registry record, with the shared-root
/// placeholder substituted once. A `logs/` directory must already exist
/// there; `logs/policies/` is created on demand. Every miss degrades to
/// `None` so the check itself can proceed without archiving.
pub fn package_policies_dir(
    r: &Registry,
    package_uuid: &str,
    shared_root: &Path,
    printer: &Printer,
) -> Option<PathBuf> {
    let package = match registry::package_by_uuid(r, package_uuid) {
        Ok(p) => p,
        Err(_) => {
            printer.warn(&format!(
                "unable to resolve a package record for {}",
                package_uuid
            ));
            return None;
        }
    };
    let root = package
        .current_path
        .replacen(SHARED_PATH_TOKEN, &shared_root.to_string_lossy(), 1);
    let logs = PathBuf::from(root).join("logs");
    if !logs.is_dir() {
        printer.warn(&format!(
            "unable to find a logs/ directory in the package with identifier {}",
            package_uuid
        ));
        return None;
    }
    let policies = logs.join("policies");
    if policies.is_dir() {
        return Some(policies);
    }
    match std::fs::create_dir_all(&policies) {
        Ok(()) => Some(policies),
        Err(_) => None,
    }
}

/// Archive the artifacts of one rule run: raw validator output under a
/// per-policy directory, plus a copy of the policy document itself.
pub fn save_artifacts(
    package_policies_dir: &Path,
    shared_policies_dir: &Path,
    category: &str,
    file_path: &str,
    output: &CommandOutput,
    printer: &Printer,
) -> anyhow::Result<()> {
    save_stdout(package_policies_dir, category, file_path, output)?;
    save_policy_copy(package_policies_dir, shared_policies_dir, output, printer)?;
    Ok(())
}

fn save_stdout(
    package_policies_dir: &Path,
    category: &str,
    file_path: &str,
    output: &CommandOutput,
) -> anyhow::Result<()> {
    let (Some(policy), Some(raw)) = (&output.policy, &output.stdout) else {
        return Ok(());
    };
    let stem = Path::new(policy)
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| policy.clone());
    let dir = package_policies_dir.join(category).join(stem);
    std::fs::create_dir_all(&dir)?;
    let Some(name) = Path::new(file_path).file_name() else {
        return Ok(());
    };
    std::fs::write(dir.join(format!("{}.xml", name.to_string_lossy())), raw)?;
    Ok(())
}

/// Copy the named policy document next to the archived outputs, skipping
/// the copy when a previous rule already placed it there.
fn save_policy_copy(
    package_policies_dir: &Path,
    shared_policies_dir: &Path,
    output: &CommandOutput,
    printer: &Printer,
) -> anyhow::Result<()> {
    let Some(policy) = &output.policy else {
        return Ok(());
    };
    let dst = package_policies_dir.join(policy);
    if dst.is_file() {
        return Ok(());
    }
    let src = shared_policies_dir.join(policy);
    if !src.is_file() {
        printer.warn(&format!("unable to find policy file at {}", src.display()));
        return Ok(());
    }
    std::fs::copy(src, dst)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn registry_with_package(current_path: &str) -> Registry {
        serde_json::from_value(json!({
            "packages": [{"uuid": "p-1", "current_path": current_path}]
        }))
        .expect("registry fixture")
    }

    #[test]
    fn resolution_requires_an_existing_logs_dir() {
        let tmp = tempfile::TempDir::new().expect("tempdir");
        let shared = tmp.path();
        std::fs::create_dir_all(shared.join("pkg")).expect("package dir");
        let r = registry_with_package("%sharedPath%/pkg");
        let printer = Printer::new(false);

        assert!(package_policies_dir(&r, "p-1", shared, &printer).is_none());

        std::fs::create_dir_all(shared.join("pkg/logs")).expect("logs dir");
        let policies =
            package_policies_dir(&r, "p-1", shared, &printer).expect("policies dir resolved");
        assert_eq!(policies, shared.join("pkg/logs/policies"));
        assert!(policies.is_dir());
    }

    #[test]
    fn unknown_package_resolves_to_none() {
        let tmp = tempfile::TempDir::new().expect("tempdir");
        let r = registry_with_package("%sharedPath%/pkg");
        let printer = Printer::new(false);
        assert!(package_policies_dir(&r, "p-other", tmp.path(), &printer).is_none());
    }

    #[test]
    fn artifacts_land_under_category_and_policy_stem() {
        let tmp = tempfile::TempDir::new().expect("tempdir");
        let shared_policies = tmp.path().join("policies");
        let pkg_policies = tmp.path().join("logs/policies");
        std::fs::create_dir_all(&shared_policies).expect("shared policies");
        std::fs::create_dir_all(&pkg_policies).expect("package policies");
        std::fs::write(shared_policies.join("NYULib.xml"), "<policy/>").expect("policy doc");

        let output = CommandOutput {
            policy: Some("NYULib.xml".to_string()),
            stdout: Some("<report/>".to_string()),
            ..CommandOutput::default()
        };
        let printer = Printer::new(false);
        save_artifacts(
            &pkg_policies,
            &shared_policies,
            "preservationDerivatives",
            "/data/objects/video.mkv",
            &output,
            &printer,
        )
        .expect("archive artifacts");

        let report = pkg_policies.join("preservationDerivatives/NYULib/video.mkv.xml");
        assert_eq!(
            std::fs::read_to_string(report).expect("archived report"),
            "<report/>"
        );
        assert_eq!(
            std::fs::read_to_string(pkg_policies.join("NYULib.xml")).expect("archived policy"),
            "<policy/>"
        );
    }

    #[test]
    fn policy_copy_is_skipped_when_already_present() {
        let tmp = tempfile::TempDir::new().expect("tempdir");
        let shared_policies = tmp.path().join("policies");
        let pkg_policies = tmp.path().join("logs/policies");
        std::fs::create_dir_all(&shared_policies).expect("shared policies");
        std::fs::create_dir_all(&pkg_policies).expect("package policies");
        std::fs::write(shared_policies.join("NYULib.xml"), "from-shared").expect("policy doc");
        std::fs::write(pkg_policies.join("NYULib.xml"), "already-archived").expect("existing copy");

        let output = CommandOutput {
            policy: Some("NYULib.xml".to_string()),
            stdout: Some("<report/>".to_string()),
            ..CommandOutput::default()
        };
        let printer = Printer::new(false);
        save_artifacts(
            &pkg_policies,
            &shared_policies,
            "originals",
            "/data/objects/video.mkv",
            &output,
            &printer,
        )
        .expect("archive artifacts");

        assert_eq!(
            std::fs::read_to_string(pkg_policies.join("NYULib.xml")).expect("existing copy"),
            "already-archived"
        );
    }

    #[test]
    fn missing_policy_fields_archive_nothing() {
        let tmp = tempfile::TempDir::new().expect("tempdir");
        let pkg_policies = tmp.path().join("logs/policies");
        std::fs::create_dir_all(&pkg_policies).expect("package policies");

        let printer = Printer::new(false);
        save_artifacts(
            &pkg_policies,
            tmp.path(),
            "originals",
            "/data/objects/video.mkv",
            &CommandOutput::default(),
            &printer,
        )
        .expect("archive artifacts");

        assert_eq!(
            std::fs::read_dir(&pkg_policies).expect("read dir").count(),
            0
        );
    }
}
