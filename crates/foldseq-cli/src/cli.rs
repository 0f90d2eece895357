use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    version,
    about = "foldseq - sequential rigid-body alignment of numbered structure frames, plus a small icon fetcher.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Path to a TOML configuration file.
    /// Defaults to `config.toml` in the platform configuration directory, if present.
    #[arg(short, long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Align each frame of a numbered PDB series onto the previous aligned frame.
    Align(AlignArgs),
    /// Fetch the static SVG icons used by the project website.
    Icons(IconsArgs),
}

/// Arguments for the `align` subcommand.
#[derive(Args, Debug, Default)]
pub struct AlignArgs {
    // --- Location Overrides ---
    /// Directory holding the input frames.
    #[arg(short, long, value_name = "DIR")]
    pub input_dir: Option<PathBuf>,

    /// Directory receiving the aligned frames. Created if missing.
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    // --- Frame Range Overrides ---
    /// First frame index of the series.
    #[arg(short, long, value_name = "INT")]
    pub start: Option<usize>,

    /// Last frame index of the series (inclusive).
    #[arg(short, long, value_name = "INT")]
    pub end: Option<usize>,

    // --- Naming Overrides ---
    /// File name prefix placed before the frame index.
    #[arg(long, value_name = "TEXT")]
    pub prefix: Option<String>,

    /// Minimum number of digits of the zero-padded frame index.
    #[arg(long, value_name = "INT")]
    pub width: Option<usize>,

    /// Atom name used to pair coordinates between frames.
    #[arg(short = 'a', long, value_name = "NAME")]
    pub atom_name: Option<String>,

    /// Write a per-frame RMSD report in CSV format.
    #[arg(short, long, value_name = "PATH")]
    pub report: Option<PathBuf>,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S align.end-frame=50
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}

/// Arguments for the `icons` subcommand.
#[derive(Args, Debug)]
pub struct IconsArgs {
    #[command(subcommand)]
    pub command: IconCommands,
}

/// Available commands for icon management.
#[derive(Subcommand, Debug)]
pub enum IconCommands {
    /// Download every configured icon, continuing past individual failures.
    Download {
        /// Directory receiving the icon files. Created if missing.
        #[arg(short, long, value_name = "DIR")]
        output_dir: Option<PathBuf>,

        /// Hex colour (without '#') requested from the icon CDN.
        #[arg(long, value_name = "HEX")]
        color: Option<String>,

        /// Set a specific configuration value, overriding the config file.
        #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
        set_values: Vec<String>,
    },
    /// Show the file names and URLs that would be downloaded.
    List,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn align_flags_are_parsed() {
        let cli = Cli::parse_from([
            "foldseq", "-vv", "align", "-i", "frames", "-o", "aligned", "-s", "3", "-e", "9",
            "--width", "3", "-a", "P", "-S", "align.extension=ent",
        ]);
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Align(args) => {
                assert_eq!(args.input_dir, Some(PathBuf::from("frames")));
                assert_eq!(args.output_dir, Some(PathBuf::from("aligned")));
                assert_eq!(args.start, Some(3));
                assert_eq!(args.end, Some(9));
                assert_eq!(args.width, Some(3));
                assert_eq!(args.atom_name.as_deref(), Some("P"));
                assert_eq!(args.set_values, vec!["align.extension=ent".to_string()]);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn global_config_flag_is_accepted_after_subcommand() {
        let cli = Cli::parse_from(["foldseq", "icons", "list", "--config", "custom.toml"]);
        assert_eq!(cli.config, Some(PathBuf::from("custom.toml")));
        assert!(matches!(
            cli.command,
            Commands::Icons(IconsArgs {
                command: IconCommands::List
            })
        ));
    }

    #[test]
    fn quiet_conflicts_with_verbose() {
        let result = Cli::try_parse_from(["foldseq", "-q", "-v", "icons", "list"]);
        assert!(result.is_err());
    }
}
