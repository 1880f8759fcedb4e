//! Report output port trait.

use crate::domain::error::PsarStopError;
use crate::domain::trail::TrailResult;

/// Port for writing computed stop levels.
pub trait ReportPort {
    fn write(&self, result: &TrailResult, output_path: &str) -> Result<(), PsarStopError>;
}
