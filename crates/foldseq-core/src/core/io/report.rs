use crate::workflows::align::{AlignmentReport, FrameOutcome};
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

#[derive(Debug, Serialize)]
struct ReportRow {
    frame: usize,
    reference_frame: Option<usize>,
    rmsd: Option<f64>,
    matched_atoms: usize,
    reference_atoms: usize,
    mobile_atoms: usize,
    truncated: bool,
}

impl ReportRow {
    fn from_outcome(frame: usize, outcome: &FrameOutcome) -> Self {
        match outcome {
            FrameOutcome::Reference { selected_atoms } => Self {
                frame,
                reference_frame: None,
                rmsd: None,
                matched_atoms: *selected_atoms,
                reference_atoms: *selected_atoms,
                mobile_atoms: *selected_atoms,
                truncated: false,
            },
            FrameOutcome::Aligned {
                reference_frame,
                rmsd,
                matched_atoms,
                reference_atoms,
                mobile_atoms,
            } => Self {
                frame,
                reference_frame: Some(*reference_frame),
                rmsd: Some(*rmsd),
                matched_atoms: *matched_atoms,
                reference_atoms: *reference_atoms,
                mobile_atoms: *mobile_atoms,
                truncated: reference_atoms != mobile_atoms,
            },
        }
    }
}

/// Writes one CSV row per frame of `report`, with a header line.
pub fn write_report_csv<W: Write>(report: &AlignmentReport, writer: W) -> Result<(), ReportError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for record in &report.frames {
        csv_writer.serialize(ReportRow::from_outcome(record.frame, &record.outcome))?;
    }
    csv_writer.flush()?;
    Ok(())
}

pub fn write_report_csv_to_path<P: AsRef<Path>>(
    report: &AlignmentReport,
    path: P,
) -> Result<(), ReportError> {
    let file = File::create(path)?;
    write_report_csv(report, file)
}
