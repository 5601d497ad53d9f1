use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Run configuration, loaded from a TOML document.
///
/// `state_file` and `backup_dir` are resolved relative to the config file's
/// directory when not absolute.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub region: String,
    pub rule_set_name: String,
    pub membership_set_name: String,
    #[serde(default = "default_state_file")]
    pub state_file: PathBuf,
    #[serde(default = "default_backup_dir")]
    pub backup_dir: PathBuf,
}

fn default_state_file() -> PathBuf {
    PathBuf::from("state.json")
}

fn default_backup_dir() -> PathBuf {
    PathBuf::from("backups")
}

pub fn load_config(path: &Path) -> Result<Config> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    let mut config: Config = toml::from_str(&raw)
        .with_context(|| format!("failed to parse config {}", path.display()))?;

    if let Some(base) = path.parent().filter(|base| !base.as_os_str().is_empty()) {
        config.state_file = resolve(base, &config.state_file);
        config.backup_dir = resolve(base, &config.backup_dir);
    }
    Ok(config)
}

fn resolve(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn loads_and_resolves_relative_paths() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("origin-shift.toml");
        fs::write(
            &path,
            r#"
region = "ap-northeast-1"
rule_set_name = "web"
membership_set_name = "edge"
state_file = "region.json"
"#,
        )
        .expect("write");

        let config = load_config(&path).expect("load");
        assert_eq!(config.region, "ap-northeast-1");
        assert_eq!(config.state_file, dir.path().join("region.json"));
        assert_eq!(config.backup_dir, dir.path().join("backups"));
    }

    #[test]
    fn missing_required_field_is_an_error() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("origin-shift.toml");
        fs::write(&path, "region = \"us-east-1\"\n").expect("write");
        assert!(load_config(&path).is_err());
    }
}
