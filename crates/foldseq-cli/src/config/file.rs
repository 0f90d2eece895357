use crate::error::{CliError, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileAlignConfig {
    pub input_dir: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub start_frame: Option<usize>,
    pub end_frame: Option<usize>,
    pub file_prefix: Option<String>,
    pub index_width: Option<usize>,
    pub extension: Option<String>,
    pub atom_name: Option<String>,
    pub report: Option<PathBuf>,
}

/// One `[[icons.entries]]` table. Exactly one of `slug` or `url` must be given.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileIconEntry {
    pub file_name: String,
    pub slug: Option<String>,
    pub url: Option<String>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileIconsConfig {
    pub output_dir: Option<PathBuf>,
    pub color: Option<String>,
    pub base_url: Option<String>,
    /// Replaces the built-in icon set when present.
    pub entries: Option<Vec<FileIconEntry>>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub align: Option<FileAlignConfig>,
    pub icons: Option<FileIconsConfig>,
}

impl FileConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    pub fn from_toml_str(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_document() {
        let config = FileConfig::from_toml_str(
            r#"
            [align]
            input-dir = "frames"
            output-dir = "frames_aligned"
            start-frame = 4
            end-frame = 20
            file-prefix = "model_"
            index-width = 3
            extension = "ent"
            atom-name = "P"
            report = "rmsd.csv"

            [icons]
            output-dir = "static/icons"
            color = "ff0000"

            [[icons.entries]]
            file-name = "mastodon.svg"
            slug = "mastodon"

            [[icons.entries]]
            file-name = "logo.svg"
            url = "https://example.org/logo.svg"
            "#,
        )
        .unwrap();

        let align = config.align.unwrap();
        assert_eq!(align.input_dir, Some(PathBuf::from("frames")));
        assert_eq!(align.start_frame, Some(4));
        assert_eq!(align.end_frame, Some(20));
        assert_eq!(align.index_width, Some(3));
        assert_eq!(align.atom_name.as_deref(), Some("P"));
        assert_eq!(align.report, Some(PathBuf::from("rmsd.csv")));

        let icons = config.icons.unwrap();
        assert_eq!(icons.color.as_deref(), Some("ff0000"));
        let entries = icons.entries.unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].slug.as_deref(), Some("mastodon"));
        assert_eq!(entries[1].url.as_deref(), Some("https://example.org/logo.svg"));
    }

    #[test]
    fn empty_document_is_all_defaults() {
        let config = FileConfig::from_toml_str("").unwrap();
        assert!(config.align.is_none());
        assert!(config.icons.is_none());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(FileConfig::from_toml_str("[align]\nframes = 3\n").is_err());
        assert!(FileConfig::from_toml_str("[render]\n").is_err());
    }

    #[test]
    fn from_file_wraps_parse_errors_with_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        std::fs::write(&path, "[align\n").unwrap();

        let result = FileConfig::from_file(&path);
        match result {
            Err(CliError::FileParsing { path: p, .. }) => assert_eq!(p, path),
            other => panic!("expected FileParsing error, got {other:?}"),
        }
    }
}
