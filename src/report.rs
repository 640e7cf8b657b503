use anyhow::{Context, Result};
use std::collections::HashMap;
use std::fmt::Write as _;
use std::path::Path;

use crate::models::{DetectionResult, ImageRef};
use crate::pipeline::PassOutcome;

pub const TITLE: &str = "# Detection Pipeline Benchmark";
/// Cell value when a detector has no result for an image
pub const PLACEHOLDER: &str = "—";

/// Escape characters that would split a table cell
fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|")
}

pub fn format_cell(result: Option<&DetectionResult>) -> String {
    match result {
        Some(r) => format!("{} ({:.2}s)", r.face_count(), r.elapsed_seconds()),
        None => PLACEHOLDER.to_string(),
    }
}

/// Markdown comparison table, one row per discovered image
pub struct Report<'a> {
    images: &'a [ImageRef],
    passes: &'a [PassOutcome],
}

impl<'a> Report<'a> {
    pub fn new(images: &'a [ImageRef], passes: &'a [PassOutcome]) -> Self {
        Self { images, passes }
    }

    /// Table body: image name followed by one cell per pass, in pass order
    pub fn rows(&self) -> Vec<Vec<String>> {
        // First result wins when a pass holds several for one name
        let lookups: Vec<HashMap<&str, &DetectionResult>> = self
            .passes
            .iter()
            .map(|pass| {
                let mut by_name = HashMap::new();
                for result in &pass.results {
                    by_name.entry(result.image_name.as_str()).or_insert(result);
                }
                by_name
            })
            .collect();

        self.images
            .iter()
            .map(|image| {
                let mut row = Vec::with_capacity(lookups.len() + 1);
                row.push(escape_cell(&image.name));
                for lookup in &lookups {
                    row.push(format_cell(lookup.get(image.name.as_str()).copied()));
                }
                row
            })
            .collect()
    }

    pub fn render(&self) -> String {
        let mut header = vec!["Image"];
        header.extend(self.passes.iter().map(|p| p.detector.as_str()));

        let mut out = String::new();
        let _ = writeln!(out, "{}\n", TITLE);
        let _ = writeln!(out, "| {} |", header.join(" | "));
        let separator: Vec<String> = header
            .iter()
            .map(|h| "-".repeat(h.chars().count() + 2))
            .collect();
        let _ = writeln!(out, "|{}|", separator.join("|"));

        for row in self.rows() {
            let _ = writeln!(out, "| {} |", row.join(" | "));
        }

        let skipped: Vec<(&str, &str)> = self
            .passes
            .iter()
            .flat_map(|p| p.skipped.iter().map(move |name| (name.as_str(), p.detector.as_str())))
            .collect();
        if !skipped.is_empty() {
            let _ = writeln!(out, "\n## Unreadable images\n");
            for (image, detector) in skipped {
                let _ = writeln!(out, "- {} ({})", image, detector);
            }
        }

        out
    }

    /// Write the report, replacing any previous one
    pub fn write(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.render())
            .with_context(|| format!("Failed to write report {}", path.display()))
    }
}
