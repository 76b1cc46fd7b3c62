//! Per-experiment file locations.

use derive_more::Display;
use std::path::{Path, PathBuf};

/// The kinds of file stored for each experiment.
///
/// Every category maps to `{template}_{experiment_id}.{extension}` under
/// either the primary (NWB) directory or the analysis files directory.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileCategory {
    /// Primary session file with trials, stimulus presentations and metadata.
    #[display("nwb")]
    Nwb,
    #[display("trial_response")]
    TrialResponse,
    #[display("flash_response")]
    FlashResponse,
    #[display("extended_stimulus_presentations")]
    ExtendedStimulusPresentations,
}

impl FileCategory {
    pub const ALL: [FileCategory; 4] =
        [Self::Nwb, Self::TrialResponse, Self::FlashResponse, Self::ExtendedStimulusPresentations];

    pub fn template(self) -> &'static str {
        match self {
            Self::Nwb => "behavior_ophys_session",
            Self::TrialResponse => "trial_response_df",
            Self::FlashResponse => "flash_response_df",
            Self::ExtendedStimulusPresentations => "extended_stimulus_presentations_df",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::Nwb => "nwb",
            _ => "h5",
        }
    }

    /// Whether files of this category live in the analysis files directory.
    pub fn is_analysis(self) -> bool {
        !matches!(self, Self::Nwb)
    }

    pub fn file_name(self, experiment_id: u64) -> String {
        format!("{}_{experiment_id}.{}", self.template(), self.extension())
    }

    /// The file of this category for `experiment_id`, under whichever of the
    /// two base directories the category belongs to.
    pub fn path(self, nwb_base_dir: &Path, analysis_files_base_dir: &Path, experiment_id: u64) -> PathBuf {
        let base = match self.is_analysis() {
            true => analysis_files_base_dir,
            false => nwb_base_dir,
        };
        base.join(self.file_name(experiment_id))
    }
}

/// The four file paths belonging to one experiment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionPaths {
    pub nwb: PathBuf,
    pub trial_response: PathBuf,
    pub flash_response: PathBuf,
    pub extended_stimulus_presentations: PathBuf,
}

impl SessionPaths {
    /// Lay out every category for `experiment_id` under the two base directories.
    pub fn new(nwb_base_dir: &Path, analysis_files_base_dir: &Path, experiment_id: u64) -> Self {
        let path = |category: FileCategory| category.path(nwb_base_dir, analysis_files_base_dir, experiment_id);
        Self {
            nwb: path(FileCategory::Nwb),
            trial_response: path(FileCategory::TrialResponse),
            flash_response: path(FileCategory::FlashResponse),
            extended_stimulus_presentations: path(FileCategory::ExtendedStimulusPresentations),
        }
    }

    pub fn get(&self, category: FileCategory) -> &Path {
        match category {
            FileCategory::Nwb => &self.nwb,
            FileCategory::TrialResponse => &self.trial_response,
            FileCategory::FlashResponse => &self.flash_response,
            FileCategory::ExtendedStimulusPresentations => &self.extended_stimulus_presentations,
        }
    }
}
