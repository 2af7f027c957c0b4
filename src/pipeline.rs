//! Ordered pass pipeline.
//!
//! Passes are named, composed into a list, and validated against their
//! declared ordering constraints before anything touches the tree. A
//! constraint only applies when both passes are part of the pipeline.

use anyhow::Result;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{info, info_span};

use crate::config::{validate_root, Config, PruneOrder};
use crate::errors::TidyError;
use crate::passes::{archive, compact, crawford, index, markers, metadata, promote, prune, rename, sweep, tag};
use crate::report::Report;
use crate::shutdown;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PassId {
    ExpandArchives,
    StripOsMetadata,
    DropMarkers,
    SweepEmpty,
    PruneIrrelevant,
    PromoteCompleted,
    Compact,
    RenameByTitle,
    StripDirSuffix,
    RelocateDocuments,
    TagUnits,
    DropLogImages,
    DropQuoteFolders,
    FlattenDueFolders,
    WriteIndex,
}

impl PassId {
    pub const ALL: [PassId; 15] = [
        PassId::ExpandArchives,
        PassId::StripOsMetadata,
        PassId::DropMarkers,
        PassId::SweepEmpty,
        PassId::PruneIrrelevant,
        PassId::PromoteCompleted,
        PassId::Compact,
        PassId::RenameByTitle,
        PassId::StripDirSuffix,
        PassId::RelocateDocuments,
        PassId::TagUnits,
        PassId::DropLogImages,
        PassId::DropQuoteFolders,
        PassId::FlattenDueFolders,
        PassId::WriteIndex,
    ];

    pub fn name(self) -> &'static str {
        match self {
            PassId::ExpandArchives => "expand-archives",
            PassId::StripOsMetadata => "strip-os-metadata",
            PassId::DropMarkers => "drop-markers",
            PassId::SweepEmpty => "sweep-empty",
            PassId::PruneIrrelevant => "prune-irrelevant",
            PassId::PromoteCompleted => "promote-completed",
            PassId::Compact => "compact",
            PassId::RenameByTitle => "rename-by-title",
            PassId::StripDirSuffix => "strip-dir-suffix",
            PassId::RelocateDocuments => "relocate-documents",
            PassId::TagUnits => "tag-units",
            PassId::DropLogImages => "drop-log-images",
            PassId::DropQuoteFolders => "drop-quote-folders",
            PassId::FlattenDueFolders => "flatten-due-folders",
            PassId::WriteIndex => "write-index",
        }
    }

    /// Passes that must appear earlier in the list whenever both are present.
    pub fn requires(self, prune_order: PruneOrder) -> Vec<PassId> {
        match self {
            PassId::Compact => vec![PassId::PromoteCompleted],
            PassId::StripDirSuffix => vec![PassId::RenameByTitle],
            PassId::RelocateDocuments => vec![PassId::RenameByTitle, PassId::StripDirSuffix],
            PassId::FlattenDueFolders => vec![PassId::DropQuoteFolders],
            PassId::PromoteCompleted if prune_order == PruneOrder::BeforePromotion => {
                vec![PassId::PruneIrrelevant]
            }
            PassId::PruneIrrelevant if prune_order == PruneOrder::AfterPromotion => {
                vec![PassId::PromoteCompleted]
            }
            _ => Vec::new(),
        }
    }

    fn run(self, root: &Path, cfg: &Config) -> Result<Report> {
        let tax = &cfg.taxonomy;
        match self {
            PassId::ExpandArchives => archive::expand_archives(root, tax),
            PassId::StripOsMetadata => metadata::strip_os_metadata(root),
            PassId::DropMarkers => markers::drop_markers(root, tax),
            PassId::SweepEmpty => sweep::sweep_empty(root),
            PassId::PruneIrrelevant => prune::prune_irrelevant(root, tax, cfg.prune_order),
            PassId::PromoteCompleted => promote::promote_completed(root, tax),
            PassId::Compact => compact::compact_units(root, tax),
            PassId::RenameByTitle => rename::rename_by_title(root, tax),
            PassId::StripDirSuffix => rename::strip_dir_suffix(root, tax),
            PassId::RelocateDocuments => rename::relocate_documents(root, tax),
            PassId::TagUnits => tag::tag_units(root, cfg.unit_suffix.as_deref().unwrap_or_default()),
            PassId::DropLogImages => crawford::drop_log_images(root),
            PassId::DropQuoteFolders => crawford::drop_quote_folders(root),
            PassId::FlattenDueFolders => crawford::flatten_due_folders(root, tax),
            PassId::WriteIndex => index::write_index(root, tax, &cfg.index_file, cfg.index_html.as_deref()),
        }
    }
}

impl fmt::Display for PassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PassId {
    type Err = TidyError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        PassId::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| TidyError::UnknownPass(wanted.to_string()))
    }
}

/// Built-in pass sequences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Preset {
    /// Full clean-up of a freshly delivered tree.
    #[default]
    Cleanup,
    /// Drop marker folders and flatten whatever is left.
    Moveup,
    /// CrawfordTech delivery: drop log screenshots and quote folders, then
    /// lift due-date folders into their unit.
    Crawford,
}

impl Preset {
    pub fn passes(self, prune_order: PruneOrder) -> Vec<PassId> {
        use PassId::*;
        match self {
            Preset::Cleanup => {
                let mut passes = vec![ExpandArchives, StripOsMetadata, SweepEmpty];
                match prune_order {
                    PruneOrder::BeforePromotion => passes.extend([PruneIrrelevant, PromoteCompleted, Compact]),
                    PruneOrder::AfterPromotion => passes.extend([PromoteCompleted, Compact, PruneIrrelevant]),
                    PruneOrder::Never => passes.extend([PromoteCompleted, Compact]),
                }
                passes.extend([SweepEmpty, RenameByTitle, StripDirSuffix, RelocateDocuments]);
                passes
            }
            Preset::Moveup => vec![DropMarkers, StripOsMetadata, Compact, SweepEmpty],
            Preset::Crawford => vec![DropLogImages, DropQuoteFolders, FlattenDueFolders],
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Preset::Cleanup => "cleanup",
            Preset::Moveup => "moveup",
            Preset::Crawford => "crawford",
        })
    }
}

impl FromStr for Preset {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cleanup" => Ok(Preset::Cleanup),
            "moveup" | "move-up" => Ok(Preset::Moveup),
            "crawford" | "crawfordtech" => Ok(Preset::Crawford),
            other => Err(format!("unknown preset '{other}' (expected cleanup, moveup or crawford)")),
        }
    }
}

/// Check every declared ordering constraint of `passes`.
pub fn validate_order(passes: &[PassId], prune_order: PruneOrder) -> Result<(), TidyError> {
    for (i, pass) in passes.iter().enumerate() {
        for required in pass.requires(prune_order) {
            let present = passes.contains(&required);
            let earlier = passes[..i].contains(&required);
            if present && !earlier {
                return Err(TidyError::PassOrder { pass: *pass, requires: required });
            }
        }
    }
    Ok(())
}

/// What one run did, pass by pass.
#[derive(Debug, Default)]
pub struct RunReport {
    pub root: PathBuf,
    pub passes: Vec<(PassId, Report)>,
}

impl RunReport {
    /// Every pass ledger merged in run order.
    pub fn total(&self) -> Report {
        let mut all = Report::new();
        for (_, r) in &self.passes {
            all.merge(r.clone());
        }
        all
    }

    pub fn for_pass(&self, id: PassId) -> impl Iterator<Item = &Report> {
        self.passes.iter().filter(move |(p, _)| *p == id).map(|(_, r)| r)
    }
}

/// A validated pass sequence bound to its configuration.
#[derive(Debug, Clone)]
pub struct Pipeline {
    passes: Vec<PassId>,
    config: Config,
}

impl Pipeline {
    /// Validate `passes` against their ordering constraints and against what
    /// the configuration provides. Nothing is touched on disk.
    pub fn new(passes: Vec<PassId>, config: Config) -> Result<Self, TidyError> {
        validate_order(&passes, config.prune_order)?;
        if passes.contains(&PassId::TagUnits)
            && config.unit_suffix.as_deref().is_none_or(str::is_empty)
        {
            return Err(TidyError::MissingUnitSuffix);
        }
        Ok(Self { passes, config })
    }

    pub fn preset(preset: Preset, config: Config) -> Result<Self, TidyError> {
        let passes = preset.passes(config.prune_order);
        Self::new(passes, config)
    }

    /// Append a pass at the end, re-validating the sequence.
    pub fn with_pass(mut self, pass: PassId) -> Result<Self, TidyError> {
        self.passes.push(pass);
        Self::new(self.passes, self.config)
    }

    pub fn passes(&self) -> &[PassId] {
        &self.passes
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Validate `root`, then run every pass to completion in order. A
    /// shutdown request is honoured between passes and between items.
    pub fn run(&self, root: &Path) -> Result<RunReport> {
        let root = validate_root(root)?;
        let mut run = RunReport {
            root: root.clone(),
            passes: Vec::with_capacity(self.passes.len()),
        };
        for pass in &self.passes {
            if shutdown::is_requested() {
                return Err(TidyError::Interrupted.into());
            }
            let span = info_span!("pass", name = %pass);
            let _enter = span.enter();
            info!("starting");
            let report = pass.run(&root, &self.config)?;
            info!(changes = report.changes(), "finished");
            run.passes.push((*pass, report));
        }
        Ok(run)
    }
}
