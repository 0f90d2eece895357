use crate::cli::{IconCommands, IconsArgs};
use crate::config::builder::{IconSettings, build_icon_settings};
use crate::config::file::FileConfig;
use crate::error::Result;
use crate::icons::{DownloadProgress, IconDownloader};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use tracing::info;

pub async fn run(args: IconsArgs, file_config: FileConfig) -> Result<()> {
    match args.command {
        IconCommands::Download {
            output_dir,
            color,
            set_values,
        } => {
            let settings = build_icon_settings(
                output_dir.as_deref(),
                color.as_deref(),
                &set_values,
                file_config,
            )?;
            handle_download(settings).await
        }
        IconCommands::List => {
            let settings = build_icon_settings(None, None, &[], file_config)?;
            handle_list(&settings);
            Ok(())
        }
    }
}

async fn handle_download(settings: IconSettings) -> Result<()> {
    let downloader = IconDownloader::new(settings.output_dir)?;

    let pb = ProgressBar::with_draw_target(None, ProgressDrawTarget::stderr_with_hz(4));
    pb.set_style(
        ProgressStyle::with_template("{spinner:.green} {bytes}/{total_bytes} ({bytes_per_sec})")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );

    let summary = downloader
        .download_all(&settings.icons, |progress| match progress {
            DownloadProgress::Started { file_name } => {
                pb.reset();
                pb.set_length(0);
                pb.suspend(|| println!("Downloading {}...", file_name));
            }
            DownloadProgress::Receiving { total_size } => {
                if let Some(size) = total_size {
                    pb.set_length(size);
                }
            }
            DownloadProgress::Downloading { downloaded } => {
                pb.set_position(downloaded);
            }
            DownloadProgress::Finished { file_name, .. } => {
                pb.suspend(|| println!("✓ {} downloaded", file_name));
            }
            DownloadProgress::Failed { file_name, reason } => {
                pb.suspend(|| println!("✗ Failed to download {}: {}", file_name, reason));
            }
        })
        .await;
    pb.finish_and_clear();
    let summary = summary?;

    if !summary.failed.is_empty() {
        info!(
            "{} of {} icon(s) could not be downloaded.",
            summary.failed.len(),
            settings.icons.len()
        );
    }

    println!();
    println!(
        "Icons saved to {}/ directory",
        downloader.output_dir().display()
    );
    Ok(())
}

fn handle_list(settings: &IconSettings) {
    println!("Icons are saved to: {}", settings.output_dir.display());
    for icon in &settings.icons {
        println!("  {:<16} {}", icon.file_name, icon.url);
    }
}
