use crate::error::Result;
use futures_util::StreamExt;
use phf::phf_ordered_map;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

pub const DEFAULT_BASE_URL: &str = "https://cdn.simpleicons.org";
pub const DEFAULT_COLOR: &str = "1a2332";

const REQUEST_TIMEOUT_SECS: u64 = 30;
const PARTIAL_SUFFIX: &str = "part";

/// Output file name to Simple Icons slug, in download order.
pub static DEFAULT_ICONS: phf::OrderedMap<&'static str, &'static str> = phf_ordered_map! {
    "github.svg" => "github",
    "linkedin.svg" => "linkedin",
    "email.svg" => "gmail",
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconSpec {
    pub file_name: String,
    pub url: String,
}

impl IconSpec {
    pub fn from_slug(file_name: String, base_url: &str, slug: &str, color: &str) -> Self {
        Self {
            file_name,
            url: format!("{}/{}/{}", base_url.trim_end_matches('/'), slug, color),
        }
    }
}

pub fn default_icon_set(base_url: &str, color: &str) -> Vec<IconSpec> {
    DEFAULT_ICONS
        .entries()
        .map(|(file_name, slug)| IconSpec::from_slug(file_name.to_string(), base_url, slug, color))
        .collect()
}

#[derive(Debug, Clone, Copy)]
pub enum DownloadProgress<'a> {
    Started { file_name: &'a str },
    Receiving { total_size: Option<u64> },
    Downloading { downloaded: u64 },
    Finished { file_name: &'a str, bytes: u64 },
    Failed { file_name: &'a str, reason: &'a str },
}

#[derive(Debug, Default)]
pub struct DownloadSummary {
    pub succeeded: Vec<PathBuf>,
    /// `(file name, reason)` for every icon that could not be fetched.
    pub failed: Vec<(String, String)>,
}

#[derive(Debug)]
pub struct IconDownloader {
    client: reqwest::Client,
    output_dir: PathBuf,
}

impl IconDownloader {
    pub fn new(output_dir: PathBuf) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("foldseq/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;
        Ok(Self { client, output_dir })
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Fetches every icon in order. A failing icon is recorded in the summary and
    /// the next one is attempted; only failing to create the output directory is
    /// returned as an error.
    pub async fn download_all(
        &self,
        icons: &[IconSpec],
        mut progress_callback: impl FnMut(DownloadProgress),
    ) -> Result<DownloadSummary> {
        tokio::fs::create_dir_all(&self.output_dir).await?;
        info!(
            "Downloading {} icon(s) into {:?}",
            icons.len(),
            &self.output_dir
        );

        let mut summary = DownloadSummary::default();
        for icon in icons {
            progress_callback(DownloadProgress::Started {
                file_name: &icon.file_name,
            });
            let target = self.output_dir.join(&icon.file_name);

            match self.download_one(icon, &target, &mut progress_callback).await {
                Ok(bytes) => {
                    info!("Saved {} ({} bytes)", target.display(), bytes);
                    progress_callback(DownloadProgress::Finished {
                        file_name: &icon.file_name,
                        bytes,
                    });
                    summary.succeeded.push(target);
                }
                Err(e) => {
                    let reason = e.to_string();
                    debug!("Failed to download {} from {}: {}", icon.file_name, icon.url, reason);
                    progress_callback(DownloadProgress::Failed {
                        file_name: &icon.file_name,
                        reason: &reason,
                    });
                    summary.failed.push((icon.file_name.clone(), reason));
                }
            }
        }
        Ok(summary)
    }

    async fn download_one<F>(&self, icon: &IconSpec, target: &Path, progress_callback: &mut F) -> Result<u64>
    where
        F: FnMut(DownloadProgress),
    {
        debug!("GET {}", icon.url);
        let response = self
            .client
            .get(&icon.url)
            .send()
            .await?
            .error_for_status()?;
        progress_callback(DownloadProgress::Receiving {
            total_size: response.content_length(),
        });

        // Stream into a sibling file so a failed transfer never clobbers an existing icon.
        let partial = target.with_file_name(format!("{}.{}", icon.file_name, PARTIAL_SUFFIX));
        let written = Self::stream_to_file(response, &partial, progress_callback).await;
        match written {
            Ok(bytes) => {
                tokio::fs::rename(&partial, target).await?;
                Ok(bytes)
            }
            Err(e) => {
                if let Err(cleanup) = tokio::fs::remove_file(&partial).await {
                    debug!("Could not remove {:?}: {}", partial, cleanup);
                }
                Err(e)
            }
        }
    }

    async fn stream_to_file<F>(
        response: reqwest::Response,
        path: &Path,
        progress_callback: &mut F,
    ) -> Result<u64>
    where
        F: FnMut(DownloadProgress),
    {
        let mut file = tokio::fs::File::create(path).await?;
        let mut downloaded: u64 = 0;
        let mut stream = response.bytes_stream();

        while let Some(item) = stream.next().await {
            let chunk = item?;
            file.write_all(&chunk).await?;
            downloaded += chunk.len() as u64;
            progress_callback(DownloadProgress::Downloading { downloaded });
        }
        file.flush().await?;
        Ok(downloaded)
    }
}
