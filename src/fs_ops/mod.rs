//! Filesystem operations shared by the passes.

mod atomic;
mod helpers;
mod relocate;
mod remove;
mod walk;

pub use atomic::move_entry;
pub use helpers::io_error_with_help;
pub use relocate::relocate_contents;
pub use remove::{remove_dir_if_present, remove_existing};
pub use walk::{
    depth_below, dirs_bottom_up, files_matching, has_direct_files, holds_files, subdirs,
    unit_folders,
};
