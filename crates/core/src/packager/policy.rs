//! What a packaging failure does to the rest of the run.
//!
//! A missing input only loses its own archive; anything that breaks while an archive is
//! being produced stops the run.

use super::PackagerError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    MissingFunctionSource,
    MissingRequirements,
    InstallFailed,
    Filesystem,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Log, leave this archive out, keep going.
    Skip,
    /// Log and stop the whole run.
    Abort,
}

pub const POLICY: &[(FailureKind, Outcome)] = &[
    (FailureKind::MissingFunctionSource, Outcome::Skip),
    (FailureKind::MissingRequirements, Outcome::Skip),
    (FailureKind::InstallFailed, Outcome::Abort),
    (FailureKind::Filesystem, Outcome::Abort),
];

impl FailureKind {
    pub fn of(err: &PackagerError) -> FailureKind {
        match err {
            PackagerError::MissingSource(_) => FailureKind::MissingFunctionSource,
            PackagerError::MissingRequirements(_) => FailureKind::MissingRequirements,
            PackagerError::InstallFailed(_) => FailureKind::InstallFailed,
            PackagerError::Io(_) | PackagerError::Archive(_) | PackagerError::Config => {
                FailureKind::Filesystem
            }
        }
    }
}

pub fn outcome_for(kind: FailureKind) -> Outcome {
    POLICY
        .iter()
        .find(|(entry, _)| *entry == kind)
        .map(|(_, outcome)| *outcome)
        .unwrap_or(Outcome::Abort)
}
