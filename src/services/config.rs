use crate::cli::MalformedOutput;
use crate::domain::models::ConfigFile;
use std::path::{Path, PathBuf};

/// Effective settings after folding the command line over the config file.
pub struct Settings {
    pub malformed_output: MalformedOutput,
    /// Override for the policy-definitions directory; defaults to the
    /// fixed subdirectory of the shared root when absent.
    pub policies_dir: Option<PathBuf>,
}

/// Load the optional config file. An explicit path must exist; the default
/// location (`~/.config/polcheck/config.toml`) may be absent.
pub fn load_config(explicit: Option<&Path>) -> anyhow::Result<ConfigFile> {
    let path = match explicit {
        Some(p) => {
            if !p.is_file() {
                anyhow::bail!("config file not found: {}", p.display());
            }
            p.to_path_buf()
        }
        None => {
            let home = std::env::var("HOME")?;
            let p = PathBuf::from(home).join(".config/polcheck/config.toml");
            if !p.exists() {
                return Ok(ConfigFile::default());
            }
            p
        }
    };
    let raw = std::fs::read_to_string(path)?;
    Ok(toml::from_str(&raw)?)
}

/// Precedence: command-line flag, then config file, then built-in default.
pub fn resolve_settings(flag: Option<MalformedOutput>, file: &ConfigFile) -> Settings {
    Settings {
        malformed_output: flag
            .or(file.general.malformed_output)
            .unwrap_or(MalformedOutput::Failed),
        policies_dir: file.general.policies_dir.as_ref().map(PathBuf::from),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_beats_file_beats_default() {
        let mut file = ConfigFile::default();
        assert_eq!(
            resolve_settings(None, &file).malformed_output,
            MalformedOutput::Failed
        );

        file.general.malformed_output = Some(MalformedOutput::Error);
        assert_eq!(
            resolve_settings(None, &file).malformed_output,
            MalformedOutput::Error
        );
        assert_eq!(
            resolve_settings(Some(MalformedOutput::Failed), &file).malformed_output,
            MalformedOutput::Failed
        );
    }

    #[test]
    fn config_file_parses_general_table() {
        let file: ConfigFile = toml::from_str(
            "[general]\nmalformed_output = \"error\"\npolicies_dir = \"/srv/policies\"\n",
        )
        .expect("parse config");
        assert_eq!(file.general.malformed_output, Some(MalformedOutput::Error));
        assert_eq!(file.general.policies_dir.as_deref(), Some("/srv/policies"));

        let empty: ConfigFile = toml::from_str("").expect("parse empty config");
        assert!(empty.general.malformed_output.is_none());
        assert!(empty.general.policies_dir.is_none());
    }
}
