use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_FILE_PREFIX: &str = "fold_block_";
pub const DEFAULT_INDEX_WIDTH: usize = 2;
pub const DEFAULT_EXTENSION: &str = "pdb";
pub const DEFAULT_SELECTION_ATOM: &str = "CA";

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
    #[error("Invalid frame range: start frame {start} is after end frame {end}")]
    InvalidFrameRange { start: usize, end: usize },
    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

/// How frame indices map to file names: `<prefix><zero-padded index>.<extension>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameNaming {
    pub prefix: String,
    /// Minimum number of digits; longer indices are never truncated.
    pub width: usize,
    pub extension: String,
}

impl Default for FrameNaming {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_FILE_PREFIX.to_string(),
            width: DEFAULT_INDEX_WIDTH,
            extension: DEFAULT_EXTENSION.to_string(),
        }
    }
}

impl FrameNaming {
    pub fn file_name(&self, frame: usize) -> String {
        format!(
            "{}{:0width$}.{}",
            self.prefix,
            frame,
            self.extension,
            width = self.width
        )
    }

    pub fn path_in(&self, dir: &Path, frame: usize) -> PathBuf {
        dir.join(self.file_name(frame))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AlignmentConfig {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub start_frame: usize,
    /// Inclusive.
    pub end_frame: usize,
    pub naming: FrameNaming,
    /// Atom name used to pair coordinates between consecutive frames.
    pub selection_atom: String,
}

impl AlignmentConfig {
    /// Number of frames in the inclusive range, saturating at `usize::MAX`.
    pub fn frame_count(&self) -> usize {
        self.end_frame
            .saturating_sub(self.start_frame)
            .saturating_add(1)
    }

    pub fn input_path(&self, frame: usize) -> PathBuf {
        self.naming.path_in(&self.input_dir, frame)
    }

    pub fn output_path(&self, frame: usize) -> PathBuf {
        self.naming.path_in(&self.output_dir, frame)
    }
}

#[derive(Default)]
pub struct AlignmentConfigBuilder {
    input_dir: Option<PathBuf>,
    output_dir: Option<PathBuf>,
    start_frame: Option<usize>,
    end_frame: Option<usize>,
    naming: Option<FrameNaming>,
    selection_atom: Option<String>,
}

impl AlignmentConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn input_dir(mut self, path: PathBuf) -> Self {
        self.input_dir = Some(path);
        self
    }
    pub fn output_dir(mut self, path: PathBuf) -> Self {
        self.output_dir = Some(path);
        self
    }
    pub fn start_frame(mut self, frame: usize) -> Self {
        self.start_frame = Some(frame);
        self
    }
    pub fn end_frame(mut self, frame: usize) -> Self {
        self.end_frame = Some(frame);
        self
    }
    pub fn naming(mut self, naming: FrameNaming) -> Self {
        self.naming = Some(naming);
        self
    }
    pub fn selection_atom(mut self, name: impl Into<String>) -> Self {
        self.selection_atom = Some(name.into());
        self
    }

    pub fn build(self) -> Result<AlignmentConfig, ConfigError> {
        let input_dir = self
            .input_dir
            .ok_or(ConfigError::MissingParameter("input_dir"))?;
        let output_dir = self
            .output_dir
            .ok_or(ConfigError::MissingParameter("output_dir"))?;
        let start_frame = self
            .start_frame
            .ok_or(ConfigError::MissingParameter("start_frame"))?;
        let end_frame = self
            .end_frame
            .ok_or(ConfigError::MissingParameter("end_frame"))?;

        if start_frame > end_frame {
            return Err(ConfigError::InvalidFrameRange {
                start: start_frame,
                end: end_frame,
            });
        }

        let naming = self.naming.unwrap_or_default();
        if naming.extension.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "extension",
                reason: "must not be empty".to_string(),
            });
        }

        let selection_atom = self
            .selection_atom
            .unwrap_or_else(|| DEFAULT_SELECTION_ATOM.to_string())
            .trim()
            .to_string();
        if selection_atom.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "selection_atom",
                reason: "must not be empty".to_string(),
            });
        }

        if input_dir == output_dir {
            return Err(ConfigError::InvalidValue {
                field: "output_dir",
                reason: "must differ from the input directory".to_string(),
            });
        }

        Ok(AlignmentConfig {
            input_dir,
            output_dir,
            start_frame,
            end_frame,
            naming,
            selection_atom,
        })
    }
}
