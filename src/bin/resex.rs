//! resex command-line front end.
//!
//! Lists the resources embedded in a Windows executable or writes them out as
//! flat files, one per resource.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use resex::{
    extract_to_dir, ArchiveDecoder, ArchiveMeta, CrawlLimits, ExeArchiveDecoder, FileReader,
    LogLogger, Stream,
};

#[derive(Parser)]
#[command(name = "resex")]
#[command(about = "List and extract resources embedded in Windows executables")]
#[command(long_about = "
resex - PE resource extractor

EXAMPLES:
    # Show every resource with its file offset and size
    resex list setup.exe

    # Write all resources into ./out
    resex extract setup.exe -o out

    # Write a single resource
    resex extract setup.exe --entry 'ICON／1／1033'

ENVIRONMENT VARIABLES:
    RESEX_MAX_DEPTH   Deepest resource directory level walked
    RESEX_MAX_NODES   Resource directory entries examined before giving up
    RUST_LOG          Logging level (trace, debug, info, warn, error)
")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List resources as offset, size and path
    List {
        /// Executable to read (.exe, .dll, .sys, etc.)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        #[command(flatten)]
        limits: LimitArgs,
    },

    /// Write resources to disk
    Extract {
        /// Executable to read (.exe, .dll, .sys, etc.)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output directory (created if missing)
        #[arg(short, long, value_name = "DIR", default_value = ".")]
        output: PathBuf,

        /// Only extract the resource with this path
        #[arg(short, long, value_name = "PATH")]
        entry: Option<String>,

        #[command(flatten)]
        limits: LimitArgs,
    },
}

#[derive(Args)]
struct LimitArgs {
    /// Deepest resource directory level walked
    #[arg(long, env = "RESEX_MAX_DEPTH", default_value_t = CrawlLimits::default().max_depth)]
    max_depth: usize,

    /// Resource directory entries examined before giving up
    #[arg(long, env = "RESEX_MAX_NODES", default_value_t = CrawlLimits::default().max_nodes)]
    max_nodes: usize,
}

impl LimitArgs {
    fn decoder(&self) -> ExeArchiveDecoder {
        ExeArchiveDecoder::with_limits(CrawlLimits::new(self.max_depth, self.max_nodes))
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::List { file, limits } => handle_list_command(&file, &limits.decoder()),
        Commands::Extract {
            file,
            output,
            entry,
            limits,
        } => handle_extract_command(&file, &output, entry.as_deref(), &limits.decoder()),
    }
}

fn open_archive(
    path: &Path,
    decoder: &ExeArchiveDecoder,
) -> Result<(FileReader, ArchiveMeta)> {
    let reader = FileReader::open(path)
        .with_context(|| format!("failed to open {}", path.display()))?;
    let mut stream = Stream::new(&reader);
    if !decoder.detect(&mut stream) {
        bail!("{} is not a Windows executable", path.display());
    }
    let meta = decoder
        .enumerate(&LogLogger, &mut stream)
        .with_context(|| format!("failed to read resources of {}", path.display()))?;
    log::info!("{}: {} resources", path.display(), meta.len());
    Ok((reader, meta))
}

fn handle_list_command(file: &Path, decoder: &ExeArchiveDecoder) -> Result<()> {
    let (_, meta) = open_archive(file, decoder)?;
    for entry in &meta {
        println!("{:#010x} {:>10} {}", entry.offset, entry.size, entry.path);
    }
    Ok(())
}

fn handle_extract_command(
    file: &Path,
    output: &Path,
    only: Option<&str>,
    decoder: &ExeArchiveDecoder,
) -> Result<()> {
    let (reader, meta) = open_archive(file, decoder)?;

    let selected: Vec<_> = match only {
        Some(path) => vec![meta
            .find(path)
            .with_context(|| format!("no resource named {path:?}"))?],
        None => meta.iter().collect(),
    };

    let mut stream = Stream::new(&reader);
    let written = extract_to_dir(decoder, &mut stream, &meta, selected, output)
        .with_context(|| format!("failed to extract resources to {}", output.display()))?;
    log::info!("wrote {} files to {}", written.len(), output.display());
    Ok(())
}
