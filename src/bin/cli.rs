//! CooperKV CLI
//!
//! Interactive shell over an embedded engine. Reads one command per line
//! from stdin until EOF or `QUIT`.

use std::io::{self, BufRead, Write};

use clap::Parser;
use cooperkv::command::Command;
use cooperkv::{Config, Engine, FileRwMethod, IndexMode};
use tracing_subscriber::{fmt, EnvFilter};

/// CooperKV CLI
#[derive(Parser, Debug)]
#[command(name = "cooperkv-cli")]
#[command(about = "Interactive shell for the CooperKV storage engine")]
#[command(version)]
struct Args {
    /// Data directory
    #[arg(short, long, default_value = "./cooperkv_data")]
    dir: String,

    /// Max size of one data file in MB
    #[arg(short, long, default_value = "16")]
    block_mb: u64,

    /// Use memory-mapped data files
    #[arg(long)]
    mmap: bool,

    /// Sync the active file after every write
    #[arg(long)]
    sync: bool,

    /// Keep values in memory instead of only their locations
    #[arg(long)]
    cache_values: bool,
}

/// `--block-mb` in bytes, or None if it overflows
fn block_size_bytes(block_mb: u64) -> Option<u64> {
    block_mb.checked_mul(1024 * 1024)
}

fn main() {
    // Initialize tracing/logging (stderr, so command output stays clean)
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,cooperkv=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    tracing::info!("CooperKV CLI v{}", cooperkv::VERSION);

    let block_size = match block_size_bytes(args.block_mb) {
        Some(bytes) => bytes,
        None => {
            tracing::error!("--block-mb {} does not fit in a byte count", args.block_mb);
            std::process::exit(1);
        }
    };

    let config = Config::builder()
        .dir_path(&args.dir)
        .block_size(block_size)
        .rw_method(if args.mmap {
            FileRwMethod::MMap
        } else {
            FileRwMethod::FileIo
        })
        .sync_on_write(args.sync)
        .idx_mode(if args.cache_values {
            IndexMode::KeyValueMemory
        } else {
            IndexMode::KeyOnlyMemory
        })
        .build();

    let engine = match Engine::open(config) {
        Ok(e) => e,
        Err(e) => {
            tracing::error!("Failed to open engine: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = run_shell(&engine) {
        tracing::error!("Shell error: {}", e);
    }

    if let Err(e) = engine.close() {
        tracing::error!("Failed to close engine: {}", e);
        std::process::exit(1);
    }
}

/// Read-eval-print loop over stdin
fn run_shell(engine: &Engine) -> io::Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    for line in stdin.lock().lines() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if trimmed.eq_ignore_ascii_case("quit") || trimmed.eq_ignore_ascii_case("exit") {
            break;
        }

        let result = Command::parse(trimmed).and_then(|cmd| engine.execute(cmd));
        match result {
            Ok(Some(value)) => writeln!(stdout, "{}", String::from_utf8_lossy(&value))?,
            Ok(None) => writeln!(stdout, "OK")?,
            Err(e) => eprintln!("(error) {}", e),
        }
        stdout.flush()?;
    }

    Ok(())
}
