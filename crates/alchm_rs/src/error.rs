//! Facade errors. Only construction and thread startup can fail.

use thiserror::Error;

use alchm_alignment::AlignmentError;
use alchm_config::ConfigError;
use alchm_scoring::ScoringError;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RecommenderError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Alignment(#[from] AlignmentError),
    #[error(transparent)]
    Scoring(#[from] ScoringError),
    #[error("failed to start background refresh: {0}")]
    Spawn(#[from] std::io::Error),
}
