//! Core library for `course_tidy`.
//!
//! Rewrites a course delivery tree in place: expands archives, promotes
//! finished deliverables out of marker folders, collapses wrapper folders,
//! prunes unfinished units, and renames markup after its title. Every
//! operation takes the root folder explicitly and reports what it did.

pub mod cli;
pub mod config;
pub mod errors;
pub mod fs_ops;
pub mod output;
pub mod passes;
pub mod pipeline;
pub mod platform;
pub mod report;
pub mod shutdown;

pub use config::{
    create_template_config, default_config_path, default_log_path, load_config_from_xml_path,
    path_has_symlink_ancestor, resolve_config, validate_root, Config, LogLevel, PruneOrder,
    Taxonomy,
};
pub use errors::TidyError;
pub use pipeline::{PassId, Pipeline, Preset, RunReport};
pub use report::{Action, Event, Report};
