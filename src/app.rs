//! Application orchestrator.
//! Loads/merges config, initializes logging, installs the signal handler,
//! validates the root and pass list, then runs the pipeline.

use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tracing::{debug, error};

use course_tidy::cli::Args;
use course_tidy::config::CONFIG_ENV;
use course_tidy::output as out;
use course_tidy::{create_template_config, default_config_path, resolve_config, shutdown, Config, TidyError};

use crate::logging::init_tracing;

fn print_config_location() {
    if let Ok(cfg_env) = std::env::var(CONFIG_ENV) {
        out::print_info(&format!("Using {CONFIG_ENV} (explicit):\n  {cfg_env}\n"));
        out::print_info(&format!("To override, unset {CONFIG_ENV} or pass --config."));
        return;
    }
    match default_config_path() {
        Ok(p) => {
            out::print_info(&format!("Default course_tidy config path:\n  {}\n", p.display()));
            if p.exists() {
                out::print_info("A config file already exists at that location.");
            } else {
                out::print_info("No config file exists there yet. Run with --init-config to create a template.");
            }
        }
        Err(e) => out::print_error(&format!("Could not determine a default config path: {e}")),
    }
}

fn log_fatal(e: &anyhow::Error) {
    let Some(te) = e.downcast_ref::<TidyError>() else {
        error!(error = ?e, "Run failed");
        return;
    };
    let code = te.code();
    match te {
        TidyError::RootNotFound(path) => {
            error!(code, kind = "root_not_found", path = %path.display(), "Run failed")
        }
        TidyError::RootNotDirectory(path) => {
            error!(code, kind = "root_not_directory", path = %path.display(), "Run failed")
        }
        TidyError::PermissionDenied { path, context } => {
            error!(code, kind = "permission_denied", path = %path.display(), %context, "Run failed")
        }
        TidyError::PassOrder { pass, requires } => {
            error!(code, kind = "pass_order", %pass, %requires, "Invalid pass list")
        }
        TidyError::UnknownPass(name) => error!(code, kind = "unknown_pass", %name, "Invalid pass list"),
        TidyError::MissingUnitSuffix => error!(code, kind = "missing_unit_suffix", "Invalid pass list"),
        TidyError::Interrupted => error!(code, kind = "interrupted", "Run aborted by user"),
        _ => error!(code, kind = "tidy_error", error = ?te, "Run failed"),
    }
}

/// Run the CLI application.
pub fn run(args: Args) -> Result<()> {
    // Handled before logging init
    if args.print_config {
        print_config_location();
        return Ok(());
    }
    if args.init_config {
        let path = match &args.config {
            Some(p) => p.clone(),
            None => default_config_path()?,
        };
        create_template_config(&path)?;
        out::print_success(&format!("A template course_tidy config was written to: {}", path.display()));
        out::print_info(&format!("Edit it, then run course_tidy ROOT. To use a different file set {CONFIG_ENV} or pass --config."));
        return Ok(());
    }

    // Config file first, CLI wins.
    let mut cfg = resolve_config(args.config.as_deref())?.unwrap_or_else(Config::default);
    args.apply_overrides(&mut cfg);

    let guard_opt = init_tracing(&cfg.log_level, cfg.log_file.as_deref(), args.json).map_err(|e| {
        out::print_error(&format!("Failed to initialize logging: {}", e));
        e
    })?;

    // Guard needs to be dropped on SIGINT to flush logs
    let guard_slot = Arc::new(Mutex::new(guard_opt));
    {
        let guard_slot = Arc::clone(&guard_slot);
        ctrlc::set_handler(move || {
            shutdown::request();
            out::print_warn("Received interrupt; finishing the current item and stopping...");
            if let Ok(mut g) = guard_slot.lock() {
                let _ = g.take();
            }
        })
        .context("install signal handler")?;
    }

    debug!("Starting course_tidy: {:?}", args);

    let result = (|| -> Result<()> {
        let root: PathBuf = args
            .resolved_root()
            .context("ROOT is required (see --help)")?;
        let pipeline = args.build_pipeline(cfg.clone())?;
        debug!(passes = ?pipeline.passes(), "pipeline validated");

        let run = pipeline.run(&root)?;
        let total = run.total();
        out::print_summary(&total);
        Ok(())
    })();

    if let Err(e) = &result {
        log_fatal(e);
    }

    // Ensure logs are flushed before exit
    if let Ok(mut g) = guard_slot.lock() {
        let _ = g.take();
    }

    result
}
