//! polcheck: checks one preserved file against the format-policy rules
//! registered for its format and purpose, and folds the per-rule verdicts
//! into a single exit status (0 = pass or not applicable, 1 = fail,
//! 2 = hard error).

use clap::Parser;
use std::process::ExitCode;

mod cli;
mod commands;
mod domain;
mod registry;
mod services;

pub use cli::*;
pub use commands::*;
pub use domain::constants::*;
pub use domain::models::*;
pub use registry::*;
pub use services::archive::*;
pub use services::checker::*;
pub use services::config::*;
pub use services::events::*;
pub use services::exec::*;
pub use services::output::*;

fn main() -> ExitCode {
    let cli = Cli::parse();
    match handle_check(&cli) {
        Ok(outcome) => ExitCode::from(outcome.exit_code()),
        Err(e) => {
            if cli.json {
                let envelope = serde_json::json!({
                    "ok": false,
                    "error": { "code": err_code(&e), "message": format!("{:#}", e) }
                });
                println!("{}", envelope);
            } else {
                eprintln!("error: {:#}", e);
            }
            ExitCode::from(2)
        }
    }
}

fn err_code(e: &anyhow::Error) -> &'static str {
    if e.downcast_ref::<ExecError>().is_some() {
        "EXEC"
    } else if e.downcast_ref::<CheckError>().is_some() {
        "BAD_OUTPUT"
    } else if e.downcast_ref::<RegistryError>().is_some() {
        "REGISTRY"
    } else if e.downcast_ref::<std::io::Error>().is_some() {
        "IO"
    } else if e.downcast_ref::<serde_json::Error>().is_some() {
        "PARSE"
    } else if e.downcast_ref::<toml::de::Error>().is_some() {
        "CONFIG"
    } else {
        "ERROR"
    }
}
