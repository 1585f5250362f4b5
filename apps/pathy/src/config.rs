//! Configuration discovery and effective settings resolution.
//!
//! Pathy reads `pathy.toml|yaml|yml` from the first config directory found
//! among `--config-dir`, `$PATHY_CONFIG_DIR` and the platform config dir
//! (`dirs::config_dir()/pathy`, e.g. `~/.config/pathy`), and merges it with
//! CLI flags into `Effective`.
//! Defaults:
//! - `var`: `PATH`
//! - `output`: `human`
//! - `color`: true unless `NO_COLOR` is set
//! - `doctor.check_dirs`: false
//! - `known`: the built-in variable table
//!
//! Overrides precedence: CLI > config file > defaults.

use crate::models::known::{self, KnownVariable};
use serde::Deserialize;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Default, Deserialize, Clone)]
/// Doctor-related configuration section under `[doctor]`.
pub struct DoctorCfg {
    pub check_dirs: Option<bool>,
}

#[derive(Debug, Default, Deserialize, Clone)]
/// Root configuration loaded from `pathy.toml|yaml`.
pub struct PathyConfig {
    pub var: Option<String>,
    pub output: Option<String>,
    pub color: Option<bool>,
    pub doctor: Option<DoctorCfg>,
    #[serde(default)]
    pub known: Vec<KnownVariable>, // [[known]] name/subdirs/extensions
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Human,
    Json,
}

impl OutputMode {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "human" => Some(OutputMode::Human),
            "json" => Some(OutputMode::Json),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
/// Fully-resolved configuration used by commands after applying precedence.
pub struct Effective {
    pub var: String,
    pub output: OutputMode,
    pub color: bool,
    pub check_dirs: bool,
    pub known: Vec<KnownVariable>,
    pub config_file: Option<PathBuf>,
}

/// First candidate config directory, honoring the CLI override.
pub fn config_dir(cli_dir: Option<&str>) -> Option<PathBuf> {
    config_dir_from(cli_dir, std::env::var_os("PATHY_CONFIG_DIR"))
}

fn config_dir_from(cli_dir: Option<&str>, env_dir: Option<OsString>) -> Option<PathBuf> {
    if let Some(d) = cli_dir {
        return Some(PathBuf::from(d));
    }
    if let Some(d) = env_dir.filter(|d| !d.is_empty()) {
        return Some(PathBuf::from(d));
    }
    dirs::config_dir().map(|d| d.join("pathy"))
}

/// Path of the config file inside `dir`, if one exists.
pub fn config_file(dir: &Path) -> Option<PathBuf> {
    ["pathy.toml", "pathy.yaml", "pathy.yml"]
        .iter()
        .map(|name| dir.join(name))
        .find(|p| p.is_file())
}

/// Load `PathyConfig` from `pathy.toml` or `pathy.yaml|yml` if present.
/// A file that fails to parse is reported and treated as absent.
pub fn load_config(dir: &Path) -> Option<PathyConfig> {
    let path = config_file(dir)?;
    let s = match fs::read_to_string(&path) {
        Ok(s) => s,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "cannot read config");
            return None;
        }
    };
    let parsed = if path.extension().is_some_and(|e| e == "toml") {
        toml::from_str::<PathyConfig>(&s).map_err(|e| e.to_string())
    } else {
        serde_yaml::from_str::<PathyConfig>(&s).map_err(|e| e.to_string())
    };
    match parsed {
        Ok(cfg) => Some(cfg),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "ignoring invalid config");
            None
        }
    }
}

/// Resolve `Effective` by merging CLI flags, discovered config, and defaults.
pub fn resolve_effective(
    cli_var: Option<&str>,
    cli_output: Option<&str>,
    cli_config_dir: Option<&str>,
) -> Effective {
    let dir = config_dir(cli_config_dir);
    let cfg = dir.as_deref().and_then(load_config).unwrap_or_default();
    let config_file = dir.as_deref().and_then(config_file);

    let var = cli_var
        .map(|s| s.to_string())
        .or(cfg.var)
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| "PATH".to_string());

    let output_src = cli_output.map(|s| s.to_string()).or(cfg.output);
    let output = match output_src.as_deref() {
        None => OutputMode::Human,
        Some(s) => OutputMode::parse(s).unwrap_or_else(|| {
            tracing::warn!(output = s, "unknown output mode, using human");
            OutputMode::Human
        }),
    };

    let color = std::env::var_os("NO_COLOR").is_none() && cfg.color.unwrap_or(true);
    let check_dirs = cfg
        .doctor
        .as_ref()
        .and_then(|d| d.check_dirs)
        .unwrap_or(false);
    let known = known::merge(known::builtin(), cfg.known);

    let eff = Effective {
        var,
        output,
        color,
        check_dirs,
        known,
        config_file,
    };
    tracing::debug!(
        var = %eff.var,
        output = ?eff.output,
        config = ?eff.config_file,
        "resolved settings"
    );
    eff
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_load_toml_and_precedence() {
        let dir = tempdir().unwrap();
        let mut f = fs::File::create(dir.path().join("pathy.toml")).unwrap();
        writeln!(
            f,
            "{}",
            r#"
var = "PYTHONPATH"
output = "json"
[doctor]
check_dirs = true
[[known]]
name = "PERL5LIB"
extensions = [".pm"]
    "#
        )
        .unwrap();

        // Resolve using an explicit dir to avoid global env races
        let eff = resolve_effective(None, None, dir.path().to_str());
        assert_eq!(eff.var, "PYTHONPATH");
        assert_eq!(eff.output, OutputMode::Json);
        assert!(eff.check_dirs);
        assert!(eff.known.iter().any(|k| k.name == "PERL5LIB" && !k.subdirs));
        assert_eq!(eff.config_file, Some(dir.path().join("pathy.toml")));

        // CLI wins over the file
        let eff = resolve_effective(Some("CDPATH"), Some("human"), dir.path().to_str());
        assert_eq!(eff.var, "CDPATH");
        assert_eq!(eff.output, OutputMode::Human);
    }

    #[test]
    fn test_load_yaml() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("pathy.yaml"),
            "var: GEM_PATH\nknown:\n  - name: GEM_PATH\n    subdirs: true\n",
        )
        .unwrap();
        let eff = resolve_effective(None, None, dir.path().to_str());
        assert_eq!(eff.var, "GEM_PATH");
        let gem = eff.known.iter().find(|k| k.name == "GEM_PATH").unwrap();
        assert!(gem.subdirs);
    }

    #[test]
    fn test_defaults_without_config() {
        let dir = tempdir().unwrap();
        let eff = resolve_effective(None, None, dir.path().to_str());
        assert_eq!(eff.var, "PATH");
        assert_eq!(eff.output, OutputMode::Human);
        assert!(!eff.check_dirs);
        assert_eq!(eff.known, known::builtin());
        assert!(eff.config_file.is_none());
    }

    #[test]
    fn test_invalid_config_is_ignored() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("pathy.toml"), "var = [").unwrap();
        assert!(load_config(dir.path()).is_none());
        let eff = resolve_effective(None, Some("xml"), dir.path().to_str());
        assert_eq!(eff.var, "PATH");
        assert_eq!(eff.output, OutputMode::Human);
    }

    #[test]
    fn test_config_dir_lookup_order() {
        let env = Some(OsString::from("/env/pathy"));
        assert_eq!(
            config_dir_from(Some("/cli"), env.clone()),
            Some(PathBuf::from("/cli"))
        );
        assert_eq!(config_dir_from(None, env), Some(PathBuf::from("/env/pathy")));
        let platform = dirs::config_dir().map(|d| d.join("pathy"));
        assert_eq!(config_dir_from(None, Some(OsString::new())), platform);
        assert_eq!(config_dir_from(None, None), platform);
    }
}
