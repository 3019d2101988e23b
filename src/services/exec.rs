use crate::domain::constants::{
    FILE_UUID_TOKEN, PACKAGE_UUID_TOKEN, TYPE_TOKEN, TYPE_VALUE,
};
use crate::domain::models::{ArgumentShape, ScriptType};
use crate::registry::RuleCommand;
use std::path::Path;
use std::process::Command;

#[derive(thiserror::Error, Debug)]
pub enum ExecError {
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },
    #[error("failed to stage script for execution: {0}")]
    Stage(std::io::Error),
}

/// Captured result of one rule command run. `status` is the process exit
/// code, or -1 when the process was killed by a signal.
#[derive(Debug)]
pub struct RunResult {
    pub status: i32,
    pub stdout: String,
    pub stderr: String,
}

pub fn substitute(template: &str, file_uuid: &str, package_uuid: &str) -> String {
    template
        .replace(FILE_UUID_TOKEN, file_uuid)
        .replace(PACKAGE_UUID_TOKEN, package_uuid)
        .replace(TYPE_TOKEN, TYPE_VALUE)
}

/// Build the (command body, arguments) pair for a rule command.
///
/// Inline commands get tokens substituted and no arguments; positional
/// commands run verbatim with the file path and policy-definitions
/// directory appended.
pub fn build_invocation(
    command: &RuleCommand,
    file_uuid: &str,
    package_uuid: &str,
    file_path: &str,
    policies_dir: &Path,
) -> (String, Vec<String>) {
    match command.script_type.argument_shape() {
        ArgumentShape::Inline => (substitute(&command.command, file_uuid, package_uuid), vec![]),
        ArgumentShape::Positional => (
            command.command.clone(),
            vec![
                file_path.to_string(),
                policies_dir.to_string_lossy().to_string(),
            ],
        ),
    }
}

/// Run a rule command and capture its exit status and output. Blocks until
/// the child exits; rule commands carry no timeout.
pub fn run(script_type: ScriptType, body: &str, args: &[String]) -> Result<RunResult, ExecError> {
    match script_type {
        ScriptType::Command => {
            let mut c = Command::new("sh");
            c.arg("-c").arg(body);
            run_captured(c)
        }
        ScriptType::BashScript => {
            let mut c = Command::new("bash");
            c.arg("-c").arg(body);
            run_captured(c)
        }
        ScriptType::PythonScript => {
            let mut c = Command::new("python3");
            c.arg("-c").arg(body);
            c.args(args);
            run_captured(c)
        }
        ScriptType::AsIs => {
            let staged = stage_script(body)?;
            let mut c = Command::new(&staged);
            c.args(args);
            let result = run_captured(c);
            let _ = std::fs::remove_file(&staged);
            result
        }
    }
}

fn run_captured(mut command: Command) -> Result<RunResult, ExecError> {
    let program = command.get_program().to_string_lossy().to_string();
    let out = command
        .output()
        .map_err(|source| ExecError::Spawn { program, source })?;
    Ok(RunResult {
        status: out.status.code().unwrap_or(-1),
        stdout: String::from_utf8_lossy(&out.stdout).to_string(),
        stderr: String::from_utf8_lossy(&out.stderr).to_string(),
    })
}

/// Write an `asIs` script body to a private temp file and mark it
/// executable. The caller removes the file after the run.
fn stage_script(body: &str) -> Result<std::path::PathBuf, ExecError> {
    let path = std::env::temp_dir().join(format!("polcheck-{}", uuid::Uuid::new_v4()));
    std::fs::write(&path, body).map_err(ExecError::Stage)?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mut perms = std::fs::metadata(&path).map_err(ExecError::Stage)?.permissions();
        perms.set_mode(0o755);
        std::fs::set_permissions(&path, perms).map_err(ExecError::Stage)?;
    }
    Ok(path)
}
