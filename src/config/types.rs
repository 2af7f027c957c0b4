//! Core configuration types.
//! - Config holds runtime settings with sensible defaults.
//! - Taxonomy names the folders and extensions the passes recognize.
//! - LogLevel and PruneOrder are user-facing enums with simple parsing helpers.

use std::ffi::OsStr;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use super::{
    ARCHIVE_EXTENSION_DEFAULT, COMPLETED_NAME_DEFAULT, DEFAULT_MARKERS, IGNORED_FILE_DEFAULT,
    INDEX_FILE_DEFAULT, MARKUP_EXTENSIONS,
};

/// Program-defined verbosity levels exposed to users/config.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LogLevel {
    /// Only errors
    Quiet,
    /// Informational output (default)
    #[default]
    Normal,
    /// More info (like verbose)
    Info,
    /// Debug/trace
    Debug,
}

impl LogLevel {
    /// Parse common string names into our LogLevel (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "quiet" | "error" | "none" => Some(LogLevel::Quiet),
            "normal" => Some(LogLevel::Normal),
            "info" | "verbose" | "detailed" => Some(LogLevel::Info),
            "debug" | "trace" => Some(LogLevel::Debug),
            _ => None,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LogLevel::Quiet => "quiet",
            LogLevel::Normal => "normal",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
        };
        f.write_str(s)
    }
}

impl FromStr for LogLevel {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("invalid log level: '{s}'"))
    }
}

/// When unit folders are judged irrelevant relative to promotion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PruneOrder {
    /// Judge the original layout: keep a unit only if a marker/Completed path exists.
    #[default]
    BeforePromotion,
    /// Judge after promotion: promoted payload also keeps a unit.
    AfterPromotion,
    /// Never prune.
    Never,
}

impl PruneOrder {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "before-promotion" | "before" | "prune-first" => Some(PruneOrder::BeforePromotion),
            "after-promotion" | "after" | "promote-first" => Some(PruneOrder::AfterPromotion),
            "never" | "none" | "off" => Some(PruneOrder::Never),
            _ => None,
        }
    }
}

impl fmt::Display for PruneOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PruneOrder::BeforePromotion => "before-promotion",
            PruneOrder::AfterPromotion => "after-promotion",
            PruneOrder::Never => "never",
        })
    }
}

impl FromStr for PruneOrder {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| {
            format!("invalid prune order: '{s}' (expected before-promotion, after-promotion or never)")
        })
    }
}

/// Names the passes match against. All comparisons are exact and case-sensitive,
/// except extensions which ignore ASCII case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Taxonomy {
    /// Category folders found directly inside a unit folder.
    pub markers: Vec<String>,
    /// Folder inside a marker whose contents are finished deliverables.
    pub completed_name: String,
    /// OS metadata file excluded from moves and from "has files" checks.
    pub ignored_file: String,
    /// Archive extension, without the dot.
    pub archive_extension: String,
    /// Markup extensions, without the dot.
    pub markup_extensions: Vec<String>,
}

impl Default for Taxonomy {
    fn default() -> Self {
        Self {
            markers: DEFAULT_MARKERS.iter().map(|s| s.to_string()).collect(),
            completed_name: COMPLETED_NAME_DEFAULT.to_string(),
            ignored_file: IGNORED_FILE_DEFAULT.to_string(),
            archive_extension: ARCHIVE_EXTENSION_DEFAULT.to_string(),
            markup_extensions: MARKUP_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl Taxonomy {
    pub fn with_markers<I, S>(markers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            markers: markers.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn is_marker(&self, name: &OsStr) -> bool {
        self.markers.iter().any(|m| OsStr::new(m) == name)
    }

    pub fn is_ignored(&self, name: &OsStr) -> bool {
        name == OsStr::new(&self.ignored_file)
    }

    /// `<unit>/<marker>/<completed>` for every marker, in configured order.
    pub fn completed_paths(&self, unit: &Path) -> Vec<(String, PathBuf)> {
        self.markers
            .iter()
            .map(|m| (m.clone(), unit.join(m).join(&self.completed_name)))
            .collect()
    }

    pub fn is_archive(&self, path: &Path) -> bool {
        path.extension()
            .and_then(OsStr::to_str)
            .is_some_and(|e| e.eq_ignore_ascii_case(&self.archive_extension))
    }

    /// The markup extension carried by `name`, as written on disk.
    pub fn markup_extension<'a>(&self, name: &'a str) -> Option<&'a str> {
        let (_, ext) = name.rsplit_once('.')?;
        self.markup_extensions
            .iter()
            .any(|m| m.eq_ignore_ascii_case(ext))
            .then_some(ext)
    }
}

/// Runtime configuration for a tidy run. The root folder is never part of it:
/// it is always passed explicitly to each operation.
#[derive(Debug, Clone)]
pub struct Config {
    pub taxonomy: Taxonomy,
    /// Console verbosity
    pub log_level: LogLevel,
    /// Optional path to a log file
    pub log_file: Option<PathBuf>,
    /// Where pruning sits relative to promotion
    pub prune_order: PruneOrder,
    /// Suffix appended to unit folder names by the tag-units pass
    pub unit_suffix: Option<String>,
    /// File name of the JSON directory index written at the root
    pub index_file: String,
    /// Optional file name for an HTML rendering of the same index
    pub index_html: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            taxonomy: Taxonomy::default(),
            log_level: LogLevel::Normal,
            log_file: None,
            prune_order: PruneOrder::default(),
            unit_suffix: None,
            index_file: INDEX_FILE_DEFAULT.to_string(),
            index_html: None,
        }
    }
}

impl Config {
    /// Construct a Config with an explicit taxonomy; other fields use defaults.
    pub fn new(taxonomy: Taxonomy) -> Self {
        Self {
            taxonomy,
            ..Default::default()
        }
    }
}
