//! radix CLI - Command line interface for radix_merkle
//!
//! Builds trees from JSON files mapping keys to values, and reports their
//! hashes, contents and differences.

use anyhow::Context;
use clap::{Parser, Subcommand};
use radix_merkle::{diff_trees, DiffEntry, RadixTree, TrieConfig};
use std::collections::BTreeMap;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "radix")]
#[command(about = "A content-addressed radix trie with merkle root hashes")]
#[command(version)]
struct Cli {
    /// Output format (json or text)
    #[arg(short, long, default_value = "json")]
    format: OutputFormat,

    /// Digits per key byte (1, 2, 4 or 8)
    #[arg(short, long)]
    parts: Option<usize>,

    /// Path to a JSON tree config
    #[arg(short, long, conflicts_with = "parts")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
enum OutputFormat {
    Json,
    Text,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the root hash of a key/value file
    Hash {
        /// JSON object of string keys to string values ("-" for stdin)
        file: PathBuf,
    },

    /// Look up a single key
    Get {
        /// JSON object of string keys to string values ("-" for stdin)
        file: PathBuf,
        /// The key
        key: String,
    },

    /// Print the tree structure
    Dump {
        /// JSON object of string keys to string values ("-" for stdin)
        file: PathBuf,
    },

    /// List entries in key order
    List {
        /// JSON object of string keys to string values ("-" for stdin)
        file: PathBuf,
        /// Start at the first key at or after this one
        #[arg(long)]
        from: Option<String>,
        /// Skip the `--from` key itself
        #[arg(long, requires = "from")]
        exclusive: bool,
        /// Maximum number of entries to return
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Compare two key/value files
    Compare {
        /// The old file
        old: PathBuf,
        /// The new file
        new: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = match (&cli.config, cli.parts) {
        (Some(path), _) => TrieConfig::load(path)?,
        (None, Some(parts)) => TrieConfig::with_parts(parts),
        (None, None) => TrieConfig::default(),
    };

    match &cli.command {
        Commands::Hash { file } => {
            let tree = load_tree(file, &config)?;
            output(
                &cli.format,
                &serde_json::json!({
                    "root_hash": tree.root_hash().to_hex(),
                    "size": tree.size(),
                    "len": tree.len(),
                    "parts": config.parts
                }),
            )?;
        }

        Commands::Get { file, key } => {
            let tree = load_tree(file, &config)?;
            let value = tree.get(key);
            output(
                &cli.format,
                &serde_json::json!({
                    "key": key,
                    "found": value.is_some(),
                    "value": value
                }),
            )?;
        }

        Commands::Dump { file } => {
            let tree = load_tree(file, &config)?;
            match cli.format {
                OutputFormat::Text => print!("{}", tree.describe()),
                OutputFormat::Json => output(
                    &cli.format,
                    &serde_json::json!({ "dump": tree.describe() }),
                )?,
            }
        }

        Commands::List {
            file,
            from,
            exclusive,
            limit,
        } => {
            let tree = load_tree(file, &config)?;
            let entries: Vec<_> = match from {
                Some(from) => tree.seek(from, !exclusive).take(limit.unwrap_or(usize::MAX)).collect(),
                None => tree.iter().take(limit.unwrap_or(usize::MAX)).collect(),
            };
            let entries: Vec<_> = entries
                .into_iter()
                .map(|(key, value)| {
                    serde_json::json!({
                        "key": String::from_utf8_lossy(&key),
                        "value": value
                    })
                })
                .collect();
            output(&cli.format, &serde_json::json!({ "entries": entries }))?;
        }

        Commands::Compare { old, new } => {
            let old_tree = load_tree(old, &config)?;
            let new_tree = load_tree(new, &config)?;
            let diff = diff_trees(&old_tree, &new_tree)?;
            let entries: Vec<_> = diff.entries.iter().map(entry_json).collect();
            output(
                &cli.format,
                &serde_json::json!({
                    "old": old_tree.root_hash().to_hex(),
                    "new": new_tree.root_hash().to_hex(),
                    "equal": diff.is_empty(),
                    "added": diff.added_count(),
                    "removed": diff.removed_count(),
                    "modified": diff.modified_count(),
                    "entries": entries
                }),
            )?;
        }
    }

    Ok(())
}

fn load_tree(path: &Path, config: &TrieConfig) -> anyhow::Result<RadixTree<String>> {
    let text = if path == Path::new("-") {
        let mut text = String::new();
        std::io::stdin().read_to_string(&mut text)?;
        text
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?
    };
    let entries: BTreeMap<String, String> = serde_json::from_str(&text)
        .with_context(|| format!("{} is not a JSON object of strings", path.display()))?;

    let mut tree = RadixTree::with_config(config)?;
    tree.extend(entries);
    Ok(tree)
}

fn entry_json(entry: &DiffEntry) -> serde_json::Value {
    match entry {
        DiffEntry::Added { key, new_hash } => serde_json::json!({
            "type": "added",
            "key": String::from_utf8_lossy(key),
            "new_hash": new_hash.to_hex()
        }),
        DiffEntry::Removed { key, old_hash } => serde_json::json!({
            "type": "removed",
            "key": String::from_utf8_lossy(key),
            "old_hash": old_hash.to_hex()
        }),
        DiffEntry::Modified {
            key,
            old_hash,
            new_hash,
        } => serde_json::json!({
            "type": "modified",
            "key": String::from_utf8_lossy(key),
            "old_hash": old_hash.to_hex(),
            "new_hash": new_hash.to_hex()
        }),
    }
}

fn output(format: &OutputFormat, value: &serde_json::Value) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string(value)?);
        }
        OutputFormat::Text => {
            println!("{}", serde_json::to_string_pretty(value)?);
        }
    }
    Ok(())
}
