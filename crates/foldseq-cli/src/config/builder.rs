use super::defaults::DefaultsConfig;
use super::file::{FileConfig, FileIconEntry};
use crate::cli::AlignArgs;
use crate::error::{CliError, Result};
use crate::icons::{self, IconSpec};
use foldseq::engine::config::{AlignmentConfig, AlignmentConfigBuilder, FrameNaming};
use std::path::{Path, PathBuf};

pub struct AlignSettings {
    pub alignment: AlignmentConfig,
    pub report_path: Option<PathBuf>,
}

pub struct IconSettings {
    pub output_dir: PathBuf,
    pub icons: Vec<IconSpec>,
}

pub fn build_align_config(args: &AlignArgs, file_config: FileConfig) -> Result<AlignSettings> {
    let defaults = DefaultsConfig::default();
    let mut file_config = apply_set_values(file_config, &args.set_values)?;
    let align_file = file_config.align.take().unwrap_or_default();

    let naming = FrameNaming {
        prefix: args
            .prefix
            .clone()
            .or(align_file.file_prefix)
            .unwrap_or(defaults.file_prefix),
        width: args
            .width
            .or(align_file.index_width)
            .unwrap_or(defaults.index_width),
        extension: align_file.extension.unwrap_or(defaults.extension),
    };

    let alignment = AlignmentConfigBuilder::new()
        .input_dir(
            args.input_dir
                .clone()
                .or(align_file.input_dir)
                .unwrap_or(defaults.input_dir),
        )
        .output_dir(
            args.output_dir
                .clone()
                .or(align_file.output_dir)
                .unwrap_or(defaults.output_dir),
        )
        .start_frame(
            args.start
                .or(align_file.start_frame)
                .unwrap_or(defaults.start_frame),
        )
        .end_frame(args.end.or(align_file.end_frame).unwrap_or(defaults.end_frame))
        .naming(naming)
        .selection_atom(
            args.atom_name
                .clone()
                .or(align_file.atom_name)
                .unwrap_or(defaults.atom_name),
        )
        .build()
        .map_err(|e| CliError::Config(e.to_string()))?;

    Ok(AlignSettings {
        alignment,
        report_path: args.report.clone().or(align_file.report),
    })
}

pub fn build_icon_settings(
    output_dir: Option<&Path>,
    color: Option<&str>,
    set_values: &[String],
    file_config: FileConfig,
) -> Result<IconSettings> {
    let defaults = DefaultsConfig::default();
    let mut file_config = apply_set_values(file_config, set_values)?;
    let icons_file = file_config.icons.take().unwrap_or_default();

    let color = color
        .map(str::to_string)
        .or(icons_file.color)
        .unwrap_or(defaults.icon_color);
    validate_color(&color)?;
    let base_url = icons_file.base_url.unwrap_or(defaults.icon_base_url);

    let icons = match icons_file.entries {
        Some(entries) => entries
            .into_iter()
            .map(|entry| icon_from_entry(entry, &base_url, &color))
            .collect::<Result<Vec<_>>>()?,
        None => icons::default_icon_set(&base_url, &color),
    };

    Ok(IconSettings {
        output_dir: output_dir
            .map(Path::to_path_buf)
            .or(icons_file.output_dir)
            .unwrap_or(defaults.icons_output_dir),
        icons,
    })
}

fn icon_from_entry(entry: FileIconEntry, base_url: &str, color: &str) -> Result<IconSpec> {
    let name = &entry.file_name;
    if name.is_empty() || name.contains(['/', '\\']) || name == "." || name == ".." {
        return Err(CliError::Config(format!(
            "Icon file name '{}' must be a plain file name.",
            name
        )));
    }
    match (entry.slug, entry.url) {
        (Some(slug), None) => Ok(IconSpec::from_slug(entry.file_name, base_url, &slug, color)),
        (None, Some(url)) => Ok(IconSpec {
            file_name: entry.file_name,
            url,
        }),
        _ => Err(CliError::Config(format!(
            "Icon entry '{}' needs exactly one of `slug` or `url`.",
            name
        ))),
    }
}

fn validate_color(color: &str) -> Result<()> {
    if color.is_empty() || !color.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(CliError::Config(format!(
            "Invalid icon color '{}': expected a hex code or colour name without '#'.",
            color
        )));
    }
    Ok(())
}

fn parse_value<T: std::str::FromStr>(key: &str, value: &str, kind: &str) -> Result<T> {
    value.parse().map_err(|_| {
        CliError::Config(format!("Invalid {} value for {}: {}", kind, key, value))
    })
}

fn apply_set_values(mut config: FileConfig, set_values: &[String]) -> Result<FileConfig> {
    for kv_pair in set_values {
        let Some((key, value)) = kv_pair.split_once('=') else {
            return Err(CliError::Config(format!(
                "Invalid --set format: '{}'. Expected KEY=VALUE.",
                kv_pair
            )));
        };
        let key = key.trim();
        let value = value.trim();

        if let Some(field) = key.strip_prefix("align.") {
            let align = config.align.get_or_insert_with(Default::default);
            match field {
                "input-dir" => align.input_dir = Some(PathBuf::from(value)),
                "output-dir" => align.output_dir = Some(PathBuf::from(value)),
                "start-frame" => align.start_frame = Some(parse_value(key, value, "integer")?),
                "end-frame" => align.end_frame = Some(parse_value(key, value, "integer")?),
                "file-prefix" => align.file_prefix = Some(value.to_string()),
                "index-width" => align.index_width = Some(parse_value(key, value, "integer")?),
                "extension" => align.extension = Some(value.to_string()),
                "atom-name" => align.atom_name = Some(value.to_string()),
                "report" => align.report = Some(PathBuf::from(value)),
                _ => return Err(unsupported_key(key)),
            }
        } else if let Some(field) = key.strip_prefix("icons.") {
            let icons = config.icons.get_or_insert_with(Default::default);
            match field {
                "output-dir" => icons.output_dir = Some(PathBuf::from(value)),
                "color" => icons.color = Some(value.to_string()),
                "base-url" => icons.base_url = Some(value.to_string()),
                _ => return Err(unsupported_key(key)),
            }
        } else {
            return Err(unsupported_key(key));
        }
    }
    Ok(config)
}

fn unsupported_key(key: &str) -> CliError {
    CliError::Config(format!("Unsupported configuration key for --set: '{}'", key))
}
