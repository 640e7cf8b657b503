pub mod sources;

use anyhow::{Context, Result};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub use sources::IMAGE_URLS;

pub const MANIFEST_NAME: &str = "README.md";
const KEPT_EXTENSIONS: &[&str] = &[".jpg", ".jpeg", ".png"];

/// Derive a safe local filename from a source URL.
///
/// Takes the last path segment without its query string, falls back to
/// `face_NN` when that is empty, forces an image extension, and replaces
/// anything other than alphanumerics, `.`, `_` and `-` with `_`.
pub fn sanitize_filename(url: &str, index: usize) -> String {
    let last = url.rsplit('/').next().unwrap_or("");
    let mut name = last.split('?').next().unwrap_or("").to_string();

    if name.is_empty() {
        name = format!("face_{:02}", index);
    }

    let lower = name.to_lowercase();
    if !KEPT_EXTENSIONS.iter().any(|ext| lower.ends_with(ext)) {
        name.push_str(".jpg");
    }

    name.chars()
        .map(|c| if c.is_alphanumeric() || matches!(c, '.' | '_' | '-') { c } else { '_' })
        .collect()
}

/// Source of image bytes
pub trait Fetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>>;
}

/// Fetches over HTTP(S), one attempt per URL
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("facebench/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;
        Ok(Self { client })
    }
}

impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        let response = self.client.get(url).send().await?.error_for_status()?;
        let bytes = response.bytes().await?;
        Ok(bytes.to_vec())
    }
}

/// Provenance entry written to the manifest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Source {
    pub name: String,
    pub url: String,
}

#[derive(Debug, Default)]
pub struct AcquisitionSummary {
    /// Every file now present locally, in URL order
    pub sources: Vec<Source>,
    pub downloaded: usize,
    pub existing: usize,
    pub failed: Vec<String>,
    pub manifest_path: PathBuf,
}

pub fn render_manifest(sources: &[Source]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "# Benchmark Images\n");
    let _ = writeln!(out, "This folder contains CC0/royalty-free images downloaded from public sources.\n");
    let _ = writeln!(out, "## Sources");
    for source in sources {
        let _ = writeln!(out, "- {}: {}", source.name, source.url);
    }
    let _ = writeln!(out, "\nUsage: Research/benchmarking only. Replace any failed URLs as needed.");
    out
}

/// Download every URL into `out_dir`, then write the provenance manifest.
///
/// Existing files are kept without fetching. A failed URL is logged and skipped.
pub async fn acquire<F: Fetcher>(out_dir: &Path, urls: &[&str], fetcher: &F) -> Result<AcquisitionSummary> {
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create {}", out_dir.display()))?;

    let mut summary = AcquisitionSummary::default();

    for (index, url) in urls.iter().enumerate() {
        let name = sanitize_filename(url, index);
        let target = out_dir.join(&name);

        if target.exists() {
            println!("Exists: {}", target.display());
            summary.existing += 1;
        } else {
            println!("Downloading: {}", url);
            let saved = match fetcher.fetch(url).await {
                Ok(bytes) => std::fs::write(&target, bytes)
                    .with_context(|| format!("Failed to write {}", target.display())),
                Err(e) => Err(e),
            };
            if let Err(e) = saved {
                let error = format!("{:#}", e);
                tracing::warn!(url = %url, error = %error, "Download failed, skipping");
                summary.failed.push(url.to_string());
                continue;
            }
            summary.downloaded += 1;
        }

        summary.sources.push(Source {
            name,
            url: url.to_string(),
        });
    }

    let manifest_path = out_dir.join(MANIFEST_NAME);
    std::fs::write(&manifest_path, render_manifest(&summary.sources))
        .with_context(|| format!("Failed to write {}", manifest_path.display()))?;
    summary.manifest_path = manifest_path;

    Ok(summary)
}
