//! CLI definition and parsing.
//! Defines Args and provides parse() for command-line handling.
//!
//! Notes:
//! - ROOT is required unless --print-config or --init-config is given.
//! - --debug is a shorthand for --log-level debug.
//! - --passes replaces the preset entirely.

use clap::{Parser, ValueHint};
use std::path::{Path, PathBuf};

use crate::config::types::{Config, LogLevel, PruneOrder};
use crate::errors::TidyError;
use crate::pipeline::{PassId, Pipeline, Preset};

/// Tidy a delivered course tree in place.
/// CLI flags override config values (which are loaded from XML if present).
#[derive(Parser, Debug, Clone)]
#[command(
    author,
    version,
    about = "Flatten, prune and rename a course delivery tree in place"
)]
pub struct Args {
    /// Root folder whose immediate subfolders are the units to tidy.
    #[arg(
        value_name = "ROOT",
        value_hint = ValueHint::DirPath,
        required_unless_present_any = ["print_config", "init_config"]
    )]
    pub root: Option<PathBuf>,

    /// Explicit config file (overrides COURSE_TIDY_CONFIG and the default location).
    #[arg(long, value_name = "PATH", value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Built-in pass sequence to run.
    #[arg(long, default_value_t = Preset::Cleanup, help = "Pass sequence: cleanup, moveup or crawford")]
    pub preset: Preset,

    /// Comma-separated pass names, run in the given order instead of the preset.
    #[arg(long, value_delimiter = ',', value_name = "PASS,...")]
    pub passes: Vec<PassId>,

    /// Where irrelevance pruning runs relative to promotion.
    #[arg(long, help = "Prune placement: before-promotion, after-promotion or never")]
    pub prune_order: Option<PruneOrder>,

    /// Suffix appended to every unit folder name by the tag-units pass.
    #[arg(long, allow_hyphen_values = true)]
    pub unit_suffix: Option<String>,

    /// Also run tag-units at the end (requires a unit suffix).
    #[arg(long, help = "Append the unit suffix to every unit folder name")]
    pub tag_units: bool,

    /// Write the JSON directory index at the root after the other passes.
    #[arg(long)]
    pub write_index: bool,

    /// Also render the index as an HTML page with this file name (implies --write-index).
    #[arg(long, value_name = "NAME")]
    pub index_html: Option<String>,

    /// Enable debug logging (equivalent to `--log-level debug`).
    #[arg(
        short = 'd',
        long,
        help = "Enable debug logging (shorthand for --log-level debug)"
    )]
    pub debug: bool,

    /// Set log level. One of: quiet, normal, info, debug.
    #[arg(long, help = "Set log level: quiet, normal, info, debug")]
    pub log_level: Option<String>,

    /// Also append logs to this file.
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub log_file: Option<PathBuf>,

    /// Print where course_tidy will look for the config file, then exit.
    #[arg(long, help = "Print the config file location used by course_tidy and exit")]
    pub print_config: bool,

    /// Write a template config file (at --config or the default location), then exit.
    #[arg(long, help = "Write a template config file and exit")]
    pub init_config: bool,

    /// Emit logs in structured JSON (includes timestamp, level, and structured fields).
    #[arg(long, help = "Emit logs in structured JSON")]
    pub json: bool,
}

impl Args {
    /// Root folder with stray shell quoting removed.
    pub fn resolved_root(&self) -> Option<PathBuf> {
        self.root.as_deref().map(Self::sanitize_path)
    }

    #[inline]
    fn sanitize_path(p: &Path) -> PathBuf {
        Self::sanitize_str(&p.to_string_lossy())
    }

    fn sanitize_str(s: &str) -> PathBuf {
        // Quotes survive when the tool is invoked from PowerShell or CMD.
        let trimmed = s.trim();
        let mut inner = if trimmed.len() >= 2
            && ((trimmed.starts_with('"') && trimmed.ends_with('"'))
                || (trimmed.starts_with('\'') && trimmed.ends_with('\'')))
        {
            trimmed[1..trimmed.len() - 1].to_string()
        } else {
            trimmed.trim_matches(|c| c == '\'' || c == '"').to_string()
        };
        inner.retain(|c| c != '\'' && c != '"');

        // One trailing separator, never the filesystem root itself.
        if inner.len() > 1 && (inner.ends_with('\\') || inner.ends_with('/')) {
            inner.pop();
        }
        PathBuf::from(inner)
    }

    /// Effective log level derived from flags.
    /// Precedence: --debug > --log-level value > None (use config default).
    pub fn effective_log_level(&self) -> Option<LogLevel> {
        if self.debug {
            return Some(LogLevel::Debug);
        }
        self.log_level.as_deref().and_then(LogLevel::parse)
    }

    /// Apply CLI overrides to a loaded Config (in-place). No-ops for unset flags.
    pub fn apply_overrides(&self, cfg: &mut Config) {
        if let Some(level) = self.effective_log_level() {
            cfg.log_level = level;
        }
        if let Some(lf) = &self.log_file {
            cfg.log_file = Some(lf.clone());
        }
        if let Some(order) = self.prune_order {
            cfg.prune_order = order;
        }
        if let Some(suffix) = &self.unit_suffix {
            cfg.unit_suffix = Some(suffix.clone());
        }
        if let Some(name) = &self.index_html {
            cfg.index_html = Some(name.clone());
        }
    }

    /// Pass list requested on the command line: --passes if given, else the
    /// preset for the configured prune placement, plus the optional trailers.
    pub fn resolved_passes(&self, prune_order: PruneOrder) -> Vec<PassId> {
        let mut passes = if self.passes.is_empty() {
            self.preset.passes(prune_order)
        } else {
            self.passes.clone()
        };
        if self.tag_units && !passes.contains(&PassId::TagUnits) {
            passes.push(PassId::TagUnits);
        }
        let wants_index = self.write_index || self.index_html.is_some();
        if wants_index && !passes.contains(&PassId::WriteIndex) {
            passes.push(PassId::WriteIndex);
        }
        passes
    }

    /// Validated pipeline for `cfg`; fails before anything touches the tree.
    pub fn build_pipeline(&self, cfg: Config) -> Result<Pipeline, TidyError> {
        let passes = self.resolved_passes(cfg.prune_order);
        Pipeline::new(passes, cfg)
    }
}

pub fn parse() -> Args {
    Args::parse()
}
