use crate::core::io::pdb::PdbFile;
use crate::core::io::traits::MolecularFile;
use crate::core::models::system::MolecularSystem;
use crate::core::utils::geometry::{self, GeometryError, Superposition};
use crate::engine::config::AlignmentConfig;
use crate::engine::error::EngineError;
use crate::engine::progress::{Progress, ProgressReporter};
use std::path::PathBuf;
use tracing::{debug, info, instrument};

/// Sizes of the atom selections paired between two frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionCounts {
    pub reference: usize,
    pub mobile: usize,
    /// Number of leading atoms actually paired; the shorter of the two.
    pub matched: usize,
}

impl SelectionCounts {
    pub fn is_truncated(&self) -> bool {
        self.reference != self.mobile
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FrameOutcome {
    /// The first frame, written unchanged and used as the initial reference.
    Reference { selected_atoms: usize },
    /// A frame superposed onto the previous, already aligned frame.
    Aligned {
        reference_frame: usize,
        rmsd: f64,
        matched_atoms: usize,
        reference_atoms: usize,
        mobile_atoms: usize,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct FrameRecord {
    pub frame: usize,
    pub output_path: PathBuf,
    pub outcome: FrameOutcome,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AlignmentReport {
    pub output_dir: PathBuf,
    pub frames: Vec<FrameRecord>,
}

impl AlignmentReport {
    pub fn mean_rmsd(&self) -> Option<f64> {
        let values: Vec<f64> = self
            .frames
            .iter()
            .filter_map(|record| match record.outcome {
                FrameOutcome::Aligned { rmsd, .. } => Some(rmsd),
                FrameOutcome::Reference { .. } => None,
            })
            .collect();
        if values.is_empty() {
            None
        } else {
            Some(values.iter().sum::<f64>() / values.len() as f64)
        }
    }
}

/// Superposes `mobile` onto `reference` using the atoms called `atom_name`.
///
/// Atoms are paired by their position in file order. When the two frames
/// select a different number of atoms, both lists are cut to the shorter
/// length before fitting. The resulting transform is applied to every atom
/// of `mobile`.
///
/// # Errors
///
/// Returns [`GeometryError::Empty`] when no atoms can be paired.
pub fn align_frame(
    reference: &MolecularSystem,
    mobile: &mut MolecularSystem,
    atom_name: &str,
) -> Result<(Superposition, SelectionCounts), GeometryError> {
    let reference_points = reference.positions_of(&reference.atom_ids_by_name(atom_name));
    let mobile_points = mobile.positions_of(&mobile.atom_ids_by_name(atom_name));

    let counts = SelectionCounts {
        reference: reference_points.len(),
        mobile: mobile_points.len(),
        matched: reference_points.len().min(mobile_points.len()),
    };

    let fit = geometry::superpose(
        &mobile_points[..counts.matched],
        &reference_points[..counts.matched],
    )?;
    mobile.apply_transform(&fit.rotation, &fit.translation);

    Ok((fit, counts))
}

/// Aligns every frame of the configured range onto its predecessor.
///
/// The first frame is written out unchanged. Each subsequent frame is fitted
/// onto the previous frame *after* that frame was itself transformed, so the
/// whole series ends up in one continuous coordinate frame.
///
/// # Errors
///
/// Any unreadable frame, failed write, or frame pair without common selection
/// atoms aborts the run.
#[instrument(skip_all, name = "alignment_workflow")]
pub fn run(
    config: &AlignmentConfig,
    reporter: &ProgressReporter,
) -> Result<AlignmentReport, EngineError> {
    std::fs::create_dir_all(&config.output_dir).map_err(|source| {
        EngineError::OutputDirectory {
            path: config.output_dir.clone(),
            source,
        }
    })?;

    info!(
        "Aligning frames {}..={} from {:?} into {:?}.",
        config.start_frame, config.end_frame, config.input_dir, config.output_dir
    );
    reporter.report(Progress::RunStart {
        total_frames: config.frame_count() as u64,
    });

    let mut frames = Vec::new();
    let mut previous: Option<(usize, MolecularSystem)> = None;

    for frame in config.start_frame..=config.end_frame {
        reporter.report(Progress::FrameStart { frame });

        let input_path = config.input_path(frame);
        let output_path = config.output_path(frame);
        debug!("Reading frame {} from {:?}", frame, &input_path);
        let (mut system, metadata) =
            PdbFile::read_from_path(&input_path).map_err(|source| EngineError::FrameRead {
                frame,
                path: input_path.clone(),
                source,
            })?;

        let outcome = match &previous {
            None => {
                let selected_atoms = system.atom_ids_by_name(&config.selection_atom).len();
                reporter.report(Progress::Message(format!(
                    "Frame {}: First frame (copied)",
                    frame
                )));
                FrameOutcome::Reference { selected_atoms }
            }
            Some((reference_frame, reference)) => {
                let (fit, counts) = align_frame(reference, &mut system, &config.selection_atom)
                    .map_err(|source| match source {
                        GeometryError::Empty => EngineError::EmptySelection {
                            frame,
                            reference_frame: *reference_frame,
                            atom_name: config.selection_atom.clone(),
                        },
                        other => EngineError::Superposition {
                            frame,
                            source: other,
                        },
                    })?;

                if counts.is_truncated() {
                    let message = format!(
                        "Warning: Frame {} has {} {} atoms vs previous {}",
                        frame, counts.mobile, config.selection_atom, counts.reference
                    );
                    info!("{}", message);
                    reporter.report(Progress::Warning(message));
                }

                reporter.report(Progress::Message(format!(
                    "Frame {}: Aligned to frame {} (RMSD: {:.3} Å)",
                    frame, reference_frame, fit.rmsd
                )));
                FrameOutcome::Aligned {
                    reference_frame: *reference_frame,
                    rmsd: fit.rmsd,
                    matched_atoms: counts.matched,
                    reference_atoms: counts.reference,
                    mobile_atoms: counts.mobile,
                }
            }
        };

        PdbFile::write_to_path(&system, &metadata, &output_path).map_err(|source| {
            EngineError::FrameWrite {
                frame,
                path: output_path.clone(),
                source,
            }
        })?;

        frames.push(FrameRecord {
            frame,
            output_path,
            outcome,
        });
        previous = Some((frame, system));
        reporter.report(Progress::FrameFinish { frame });
    }

    reporter.report(Progress::RunFinish);
    info!("Sequential alignment finished for {} frame(s).", frames.len());

    Ok(AlignmentReport {
        output_dir: config.output_dir.clone(),
        frames,
    })
}
