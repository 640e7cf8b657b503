use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

use facebench::acquisition::{self, HttpFetcher, IMAGE_URLS};
use facebench::{Benchmark, DetectorKind, DetectorOptions, ExecutionProvider, KindLoader};

#[derive(Parser)]
#[command(name = "facebench")]
#[command(about = "Benchmark face detectors on a local image set")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Download the curated benchmark images and write their sources to README.md
    Download(DownloadArgs),
    /// Run the detectors over the image directory and write a Markdown report
    Bench(BenchArgs),
}

#[derive(Args)]
struct DownloadArgs {
    /// Directory to save images into
    #[arg(long, value_name = "DIR", default_value = "benchmark_images")]
    out_dir: PathBuf,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 30)]
    timeout_secs: u64,
}

#[derive(Args)]
struct BenchArgs {
    /// Directory searched (recursively) for images
    #[arg(long, value_name = "DIR", default_value = "benchmark_images")]
    images: PathBuf,

    /// Directory for annotated copies
    #[arg(long, value_name = "DIR", default_value = "benchmark_outputs")]
    out_dir: PathBuf,

    /// Markdown report path (overwritten)
    #[arg(long, value_name = "FILE", default_value = "BENCHMARK_RESULTS.md")]
    report: PathBuf,

    /// Detector to run; repeat for several. Defaults to every compiled-in backend
    #[arg(long = "detector", value_enum, value_name = "KIND")]
    detectors: Vec<DetectorKind>,

    /// ONNX execution provider for MTCNN and BlazeFace
    #[arg(long, value_enum, default_value_t = ExecutionProvider::Cpu)]
    provider: ExecutionProvider,

    /// SeetaFace model file
    #[arg(long, value_name = "FILE", default_value = "models/seeta_fd_frontal_v1.0.bin")]
    seeta_model: PathBuf,

    /// TrueType font for box labels (defaults to the bundled DejaVu Sans)
    #[arg(long, value_name = "TTF")]
    font: Option<PathBuf>,

    /// Skip writing annotated images
    #[arg(long)]
    no_annotate: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn download(args: DownloadArgs) -> anyhow::Result<()> {
    let fetcher = HttpFetcher::new(Duration::from_secs(args.timeout_secs))?;
    let summary = acquisition::acquire(&args.out_dir, IMAGE_URLS, &fetcher).await?;

    let out_dir = std::path::absolute(&args.out_dir).unwrap_or(args.out_dir);
    let manifest = std::path::absolute(&summary.manifest_path).unwrap_or(summary.manifest_path);
    println!(
        "\n[OK] Download complete ({} new, {} existing, {} failed). Images in: {}",
        summary.downloaded,
        summary.existing,
        summary.failed.len(),
        out_dir.display()
    );
    println!("[OK] Sources written to: {}", manifest.display());

    Ok(())
}

fn bench(args: BenchArgs) -> anyhow::Result<()> {
    let selected = if args.detectors.is_empty() {
        DetectorKind::compiled()
    } else {
        args.detectors
    };

    let options = DetectorOptions {
        provider: args.provider,
        seeta_model: args.seeta_model,
    };

    let mut benchmark = Benchmark::new(args.images)
        .with_verbose(args.verbose)
        .with_report(args.report)
        .with_font(args.font);

    if !args.no_annotate {
        benchmark = benchmark.with_annotations(args.out_dir);
    }

    for kind in DetectorKind::ALL {
        benchmark = if selected.contains(&kind) {
            benchmark.add_detector(Box::new(KindLoader {
                kind,
                options: options.clone(),
            }))
        } else {
            benchmark.add_column(kind.label())
        };
    }

    benchmark.run()?;
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Command::Download(args) => download(args).await,
        Command::Bench(args) => bench(args),
    }
}
