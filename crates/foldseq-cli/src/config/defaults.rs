use crate::icons::{DEFAULT_BASE_URL, DEFAULT_COLOR};
use foldseq::engine::config::{
    DEFAULT_EXTENSION, DEFAULT_FILE_PREFIX, DEFAULT_INDEX_WIDTH, DEFAULT_SELECTION_ATOM,
};
use std::path::PathBuf;

pub struct DefaultsConfig {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub start_frame: usize,
    pub end_frame: usize,
    pub file_prefix: String,
    pub index_width: usize,
    pub extension: String,
    pub atom_name: String,
    pub icons_output_dir: PathBuf,
    pub icon_color: String,
    pub icon_base_url: String,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("pdb_files"),
            output_dir: PathBuf::from("pdb_files_aligned"),
            start_frame: 0,
            end_frame: 191,
            file_prefix: DEFAULT_FILE_PREFIX.to_string(),
            index_width: DEFAULT_INDEX_WIDTH,
            extension: DEFAULT_EXTENSION.to_string(),
            atom_name: DEFAULT_SELECTION_ATOM.to_string(),
            icons_output_dir: PathBuf::from("icons"),
            icon_color: DEFAULT_COLOR.to_string(),
            icon_base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}
