//! blockstore CLI
//!
//! Inspects and edits block store images on disk.

use std::path::PathBuf;

use blockstore::{BlockId, BlockStore, StoreConfig};
use clap::{Args as ClapArgs, Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

/// blockstore CLI
#[derive(Parser, Debug)]
#[command(name = "blockstore")]
#[command(about = "Fixed-block storage engine image tool")]
#[command(version)]
struct Args {
    #[command(flatten)]
    geometry: Geometry,

    #[command(subcommand)]
    command: Commands,
}

/// Image geometry (must match the one the image was written with)
#[derive(ClapArgs, Debug)]
struct Geometry {
    /// Block size in bytes
    #[arg(short, long, global = true, default_value_t = blockstore::config::DEFAULT_BLOCK_SIZE)]
    block_size: usize,

    /// Number of blocks
    #[arg(short, long, global = true, default_value_t = blockstore::config::DEFAULT_TOTAL_BLOCKS)]
    total_blocks: usize,

    /// First block of the bitmap region
    #[arg(long, global = true, default_value_t = blockstore::config::DEFAULT_BITMAP_START_BLOCK)]
    bitmap_start: usize,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Write a fresh, empty image
    Create {
        /// Image path
        image: PathBuf,
    },

    /// Show geometry and usage of an image
    Info {
        /// Image path
        image: PathBuf,
    },

    /// Allocate blocks (first fit)
    Alloc {
        /// Image path
        image: PathBuf,

        /// How many blocks to allocate
        #[arg(short = 'n', long, default_value = "1")]
        count: usize,
    },

    /// Claim a specific block
    Request {
        /// Image path
        image: PathBuf,

        /// Block id
        block: BlockId,
    },

    /// Free a block
    Release {
        /// Image path
        image: PathBuf,

        /// Block id
        block: BlockId,
    },

    /// Write text into a block (zero-padded or cut to the block size)
    Write {
        /// Image path
        image: PathBuf,

        /// Block id
        block: BlockId,

        /// Text to store
        text: String,
    },

    /// Print a block as hex
    Read {
        /// Image path
        image: PathBuf,

        /// Block id
        block: BlockId,
    },
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,blockstore=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config = StoreConfig::builder()
        .block_size(args.geometry.block_size)
        .total_blocks(args.geometry.total_blocks)
        .bitmap_start_block(args.geometry.bitmap_start)
        .build();

    if let Err(e) = run(args.command, config) {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

fn run(command: Commands, config: StoreConfig) -> blockstore::Result<()> {
    match command {
        Commands::Create { image } => {
            let store = BlockStore::create(config)?;
            let written = store.serialize(&image)?;
            tracing::info!("Created {} ({} bytes)", image.display(), written);
        }
        Commands::Info { image } => {
            let store = BlockStore::deserialize(&image, config)?;
            let reserved = store.reserved_blocks();
            println!("block size:    {}", store.block_size());
            println!("total blocks:  {}", store.total_blocks());
            println!("bitmap blocks: {}..{}", reserved.start, reserved.end);
            println!("used blocks:   {}", store.used_blocks());
            println!("free blocks:   {}", store.free_blocks());
            println!("crc32:         {:08x}", store.checksum());
        }
        Commands::Alloc { image, count } => {
            let mut store = BlockStore::deserialize(&image, config)?;
            // Blocks claimed before a failure are still saved
            let mut result = Ok(());
            for _ in 0..count {
                match store.allocate() {
                    Ok(block_id) => println!("{}", block_id),
                    Err(e) => {
                        result = Err(e);
                        break;
                    }
                }
            }
            store.serialize(&image)?;
            result?;
        }
        Commands::Request { image, block } => {
            let mut store = BlockStore::deserialize(&image, config)?;
            store.request(block)?;
            store.serialize(&image)?;
        }
        Commands::Release { image, block } => {
            let mut store = BlockStore::deserialize(&image, config)?;
            store.release(block);
            store.serialize(&image)?;
        }
        Commands::Write { image, block, text } => {
            let mut store = BlockStore::deserialize(&image, config)?;
            let mut data = vec![0u8; store.block_size()];
            let len = text.len().min(data.len());
            data[..len].copy_from_slice(&text.as_bytes()[..len]);
            store.write(block, &data)?;
            store.serialize(&image)?;
        }
        Commands::Read { image, block } => {
            let store = BlockStore::deserialize(&image, config)?;
            let bytes = store.block(block)?;
            for row in bytes.chunks(16) {
                let hex: Vec<String> = row.iter().map(|b| format!("{:02x}", b)).collect();
                println!("{}", hex.join(" "));
            }
        }
    }

    Ok(())
}
