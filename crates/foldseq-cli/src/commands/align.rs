use crate::cli::AlignArgs;
use crate::config::builder::build_align_config;
use crate::config::file::FileConfig;
use crate::error::{CliError, Result};
use crate::utils::progress::CliProgressHandler;
use foldseq::core::io::report::write_report_csv_to_path;
use foldseq::engine::progress::ProgressReporter;
use foldseq::workflows;
use tracing::info;

pub async fn run(args: AlignArgs, file_config: FileConfig) -> Result<()> {
    let settings = build_align_config(&args, file_config)?;
    let config = &settings.alignment;
    info!(
        "Resolved alignment settings: {:?} -> {:?}, frames {}..={}",
        config.input_dir, config.output_dir, config.start_frame, config.end_frame
    );

    println!("Sequential alignment: each frame aligned to the previous frame");
    println!();

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    let outcome = tokio::task::block_in_place(|| workflows::align::run(config, &reporter));
    progress_handler.finish();
    let report = outcome?;

    if let Some(mean) = report.mean_rmsd() {
        info!("Mean RMSD over aligned frames: {:.3} Å", mean);
    }

    if let Some(path) = &settings.report_path {
        write_report_csv_to_path(&report, path).map_err(|source| CliError::Report {
            path: path.clone(),
            source,
        })?;
        println!("RMSD report written to: {}", path.display());
    }

    println!();
    println!(
        "Sequential alignment complete! Aligned PDB files saved to: {}/",
        report.output_dir.display()
    );
    println!("Each frame is now aligned to its previous frame for smooth transitions.");
    Ok(())
}
