use super::config::ConfigError;
use crate::core::io::pdb::PdbError;
use crate::core::utils::geometry::GeometryError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to read frame {frame} from '{path}': {source}", path = path.display())]
    FrameRead {
        frame: usize,
        path: PathBuf,
        #[source]
        source: PdbError,
    },

    #[error("Failed to write frame {frame} to '{path}': {source}", path = path.display())]
    FrameWrite {
        frame: usize,
        path: PathBuf,
        #[source]
        source: PdbError,
    },

    #[error("Frame {frame} shares no '{atom_name}' atoms with frame {reference_frame}")]
    EmptySelection {
        frame: usize,
        reference_frame: usize,
        atom_name: String,
    },

    #[error("Superposition of frame {frame} failed: {source}")]
    Superposition {
        frame: usize,
        #[source]
        source: GeometryError,
    },

    #[error("Failed to create output directory '{path}': {source}", path = path.display())]
    OutputDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
