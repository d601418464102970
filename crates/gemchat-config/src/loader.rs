use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::debug;

use crate::Config;

/// Ordered list of config file locations searched from lowest to highest priority.
/// Later files override earlier ones.
fn config_search_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    // 1. System-wide default
    paths.push(PathBuf::from("/etc/gemchat/config.toml"));

    // 2. XDG / home
    if let Some(home) = dirs::home_dir() {
        paths.push(home.join(".config/gemchat/config.toml"));
    }
    if let Some(cfg) = dirs::config_dir() {
        paths.push(cfg.join("gemchat/config.toml"));
    }

    // 3. Workspace-local
    paths.push(PathBuf::from(".gemchat/config.toml"));
    paths.push(PathBuf::from("gemchat.toml"));

    paths
}

/// Load configuration by merging all discovered TOML files.
/// The `extra` argument may provide an explicit path (e.g. `--config` CLI flag).
pub fn load(extra: Option<&Path>) -> anyhow::Result<Config> {
    let mut merged = toml::Value::Table(toml::map::Map::new());

    for path in config_search_paths() {
        if path.is_file() {
            debug!(path = %path.display(), "loading config layer");
            merge_toml(&mut merged, read_layer(&path)?);
        }
    }

    if let Some(p) = extra {
        debug!(path = %p.display(), "loading explicit config");
        merge_toml(&mut merged, read_layer(p)?);
    }

    let config: Config = merged
        .try_into()
        .context("config has an invalid shape")?;
    Ok(config)
}

fn read_layer(path: &Path) -> anyhow::Result<toml::Value> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    toml::from_str(&text).with_context(|| format!("parsing {}", path.display()))
}

/// Deep-merge `src` into `dst`; src wins on scalar conflicts.
fn merge_toml(dst: &mut toml::Value, src: toml::Value) {
    match (dst, src) {
        (toml::Value::Table(d), toml::Value::Table(s)) => {
            for (k, v) in s {
                let entry = d.entry(k).or_insert(toml::Value::Table(toml::map::Map::new()));
                merge_toml(entry, v);
            }
        }
        (dst, src) => *dst = src,
    }
}

// ─── Unit tests ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn val(s: &str) -> toml::Value {
        toml::from_str(s).unwrap()
    }

    #[test]
    fn merge_scalar_src_wins() {
        let mut dst = val(r#"x = 1"#);
        merge_toml(&mut dst, val(r#"x = 2"#));
        assert_eq!(dst["x"].as_integer(), Some(2));
    }

    #[test]
    fn merge_nested_tables() {
        let mut dst = val(r#"[endpoint]
provider = "gemini"
api_key_env = "GEMINI_API_KEY""#);
        let src = val(r#"[endpoint]
provider = "mock""#);
        merge_toml(&mut dst, src);
        assert_eq!(dst["endpoint"]["provider"].as_str(), Some("mock"));
        assert_eq!(dst["endpoint"]["api_key_env"].as_str(), Some("GEMINI_API_KEY"));
    }

    #[test]
    fn load_fails_for_missing_explicit_path() {
        let result = load(Some(Path::new("/tmp/gemchat_nonexistent_config_xyz.toml")));
        assert!(result.is_err());
    }

    #[test]
    fn load_explicit_file_overrides_defaults() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        writeln!(f, r#"[endpoint]
provider = "mock"

[reveal]
chunk_size = 4
delay_ms = 0"#).unwrap();
        let cfg = load(Some(f.path())).unwrap();
        assert_eq!(cfg.endpoint.provider, "mock");
        assert_eq!(cfg.reveal.chunk_size, 4);
        assert_eq!(cfg.reveal.delay_ms, 0);
        assert!(cfg.reveal.enabled);
        assert_eq!(cfg.storage.history_key, "geminiChats");
    }

    #[test]
    fn load_rejects_malformed_toml() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        writeln!(f, "[endpoint\nprovider = ").unwrap();
        assert!(load(Some(f.path())).is_err());
    }
}
