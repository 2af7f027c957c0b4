//! XML configuration support.
//! - Loads settings from config.xml (quick_xml + serde).
//! - Writes a secure template on request (`--init-config`).
//!
//! Notes:
//! - Unknown XML fields and unparsable values are hard errors so that
//!   misconfigurations surface before any folder is touched.
//! - The root folder is never read from the file; it is always a CLI argument.

use anyhow::{anyhow, bail, Context, Result};
use quick_xml::de::from_str as from_xml_str;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::paths::{default_config_path, default_log_path, path_has_symlink_ancestor};
use super::types::{Config, LogLevel, PruneOrder, Taxonomy};
use super::{CONFIG_ENV, DEFAULT_MARKERS, INDEX_FILE_DEFAULT};

use crate::platform::{set_dir_mode_0700, set_file_mode_0600, write_config_secure_new_0600};

/// Struct mirroring the XML config for deserialization.
#[derive(Debug, Deserialize)]
#[serde(rename = "config")]
#[serde(deny_unknown_fields)]
struct XmlConfig {
    log_level: Option<String>,
    log_file: Option<String>,
    prune_order: Option<String>,
    completed_name: Option<String>,
    markers: Option<XmlMarkers>,
    ignored_file: Option<String>,
    archive_extension: Option<String>,
    unit_suffix: Option<String>,
    index_file: Option<String>,
    index_html: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct XmlMarkers {
    #[serde(rename = "marker", default)]
    marker: Vec<String>,
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|s| !s.is_empty())
}

// Map XmlConfig -> Config, starting from defaults.
fn xml_to_config(parsed: XmlConfig) -> Result<Config> {
    let mut cfg = Config::default();
    let mut taxonomy = Taxonomy::default();

    if let Some(s) = non_empty(parsed.log_level.as_deref()) {
        cfg.log_level = s.parse::<LogLevel>().map_err(|e| anyhow!(e))?;
    }
    if let Some(s) = non_empty(parsed.log_file.as_deref()) {
        cfg.log_file = Some(PathBuf::from(s));
    }
    if let Some(s) = non_empty(parsed.prune_order.as_deref()) {
        cfg.prune_order = s.parse::<PruneOrder>().map_err(|e| anyhow!(e))?;
    }
    if let Some(s) = non_empty(parsed.completed_name.as_deref()) {
        taxonomy.completed_name = s.to_string();
    }
    if let Some(m) = parsed.markers {
        let markers: Vec<String> = m
            .marker
            .iter()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        if markers.is_empty() {
            bail!("<markers> is present but lists no <marker> names");
        }
        taxonomy.markers = markers;
    }
    if let Some(s) = non_empty(parsed.ignored_file.as_deref()) {
        taxonomy.ignored_file = s.to_string();
    }
    if let Some(s) = non_empty(parsed.archive_extension.as_deref()) {
        taxonomy.archive_extension = s.trim_start_matches('.').to_string();
    }
    cfg.unit_suffix = non_empty(parsed.unit_suffix.as_deref()).map(str::to_string);
    if let Some(s) = non_empty(parsed.index_file.as_deref()) {
        cfg.index_file = s.to_string();
    }
    cfg.index_html = non_empty(parsed.index_html.as_deref()).map(str::to_string);

    cfg.taxonomy = taxonomy;
    Ok(cfg)
}

/// Load a Config from a specific XML file path.
pub fn load_config_from_xml_path(path: &Path) -> Result<Config> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("read config xml '{}'", path.display()))?;
    let parsed: XmlConfig = from_xml_str(&contents)
        .with_context(|| format!("parse config xml '{}'", path.display()))?;
    xml_to_config(parsed).with_context(|| format!("invalid value in '{}'", path.display()))
}

/// Find and load the config file.
///
/// Precedence:
/// 1) `explicit` (from `--config`); must exist
/// 2) `$COURSE_TIDY_CONFIG`; must exist
/// 3) the OS default location; silently skipped when absent
///
/// Returns Ok(None) when no file applies so callers fall back to defaults.
pub fn resolve_config(explicit: Option<&Path>) -> Result<Option<Config>> {
    if let Some(p) = explicit {
        debug!(path = %p.display(), "loading config from --config");
        return load_config_from_xml_path(p).map(Some);
    }

    let env_set = env::var_os(CONFIG_ENV).is_some();
    let path = default_config_path()?;
    if !path.exists() {
        if env_set {
            bail!(
                "{CONFIG_ENV} points to '{}' which does not exist",
                path.display()
            );
        }
        debug!(path = %path.display(), "no config file; using defaults");
        return Ok(None);
    }
    debug!(path = %path.display(), "loading config");
    load_config_from_xml_path(&path).map(Some)
}

/// Create a template config file and its parent directory (best-effort permissions).
/// Uses secure creation to avoid following attacker-controlled symlinks on Unix.
pub fn create_template_config(path: &Path) -> Result<()> {
    if path_has_symlink_ancestor(path)? {
        bail!(
            "Refusing to create config: ancestor of {} is a symlink",
            path.display()
        );
    }
    if path.exists() {
        bail!("Config file already exists: {}", path.display());
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
        let _ = set_dir_mode_0700(parent);
    }

    let suggested_log = default_log_path()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|_| "/path/to/course_tidy.log".into());
    let markers: String = DEFAULT_MARKERS
        .iter()
        .map(|m| format!("    <marker>{m}</marker>\n"))
        .collect();

    let content = format!(
        "<!--\n  course_tidy configuration (XML)\n\n    log_level          -> quiet | normal | info | debug\n    log_file           -> path to log file (optional; console output is kept)\n    prune_order        -> before-promotion | after-promotion | never\n    completed_name     -> folder inside a marker whose contents get promoted\n    markers/marker     -> category folder names inside each unit (exact match)\n    ignored_file       -> OS metadata file never moved\n    archive_extension  -> archives to expand in place\n    unit_suffix        -> suffix appended by the tag-units pass (optional)\n    index_file         -> file name for the JSON directory index\n    index_html         -> also render the index as HTML under this file name (optional)\n\n  CLI flags override XML values.\n-->\n<config>\n  <log_level>normal</log_level>\n  <log_file>{}</log_file>\n  <prune_order>before-promotion</prune_order>\n  <completed_name>Completed</completed_name>\n  <markers>\n{}  </markers>\n  <ignored_file>.DS_Store</ignored_file>\n  <archive_extension>zip</archive_extension>\n  <index_file>{}</index_file>\n</config>\n",
        suggested_log, markers, INDEX_FILE_DEFAULT
    );

    // Atomic, secure write (create_new + 0600 on Unix), then tighten perms.
    write_config_secure_new_0600(path, content.as_bytes())?;
    let _ = set_file_mode_0600(path);

    info!("Created template config at {}", path.display());
    Ok(())
}
