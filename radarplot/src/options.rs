use clap::Parser;
use std::path::PathBuf;

/// Render FIS-B NEXRAD blocks into PNG mosaics.
///
/// Reads `NEXRAD ...` block lines until end of input, then writes one
/// image per product type and time.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Decoder output to read. Reads stdin when absent or `-`.
    pub input: Option<PathBuf>,

    /// Output directory.
    #[arg(short, long, default_value = ".")]
    pub out_dir: PathBuf,

    /// Output file name prefix.
    #[arg(long, default_value = "nexrad")]
    pub prefix: String,

    /// Skip any image wider or taller than this many pixels.
    #[arg(long, default_value_t = 16_384)]
    pub max_dimension: u32,

    /// Number of render threads.
    #[arg(short, long)]
    pub jobs: Option<usize>,

    /// Report each image's dimensions without rendering.
    #[arg(long)]
    pub dry_run: bool,
}
