//! Config module.
//! Provides configuration types, default paths, XML loading, and root validation.

pub mod paths;
pub mod types;
mod validate;
pub mod xml;

pub use paths::{default_config_path, default_log_path, path_has_symlink_ancestor};
pub use types::{Config, LogLevel, PruneOrder, Taxonomy};
pub use validate::validate_root;
pub use xml::{create_template_config, load_config_from_xml_path, resolve_config};

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "COURSE_TIDY_CONFIG";

/// Marker folder names recognized out of the box (case-sensitive).
pub const DEFAULT_MARKERS: [&str; 4] = [
    "Text to Speech, including image_formula_equation descriptions",
    "Full Remediation",
    "Magnification",
    "Text to Speech, no image_formula_equation descriptions",
];
pub const COMPLETED_NAME_DEFAULT: &str = "Completed";
/// Finder metadata file never moved and never counted as payload.
pub const IGNORED_FILE_DEFAULT: &str = ".DS_Store";
/// Resource-fork folder macOS archivers add next to real content.
pub const OS_METADATA_DIR: &str = "__MACOSX";
pub const ARCHIVE_EXTENSION_DEFAULT: &str = "zip";
pub const MARKUP_EXTENSIONS: [&str; 2] = ["html", "htm"];
pub const INDEX_FILE_DEFAULT: &str = "data.json";

/// Vendor log screenshots dropped by the CrawfordTech passes (case-sensitive suffix).
pub const LOG_IMAGE_SUFFIX: &str = "LOG.png";
/// Per-quote folders the vendor nests next to the real content.
pub const QUOTE_FOLDER_PATTERN: &str = r"^Quote #\d+$";
/// Due-date wrapper folders directly inside a unit.
pub const DUE_FOLDER_PATTERN: &str = r"\bDue\b";
