//! Command-line front end for slicebloom filter files.
//!
//! `build` sizes a filter and fills it from newline-delimited values,
//! `insert` and `query` mutate and probe an existing filter file, and
//! `info` reports its parameters and fill statistics.

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use slicebloom::{BloomFilter, FilterConfig, HashAlgorithm, Sizing};

#[derive(Parser)]
#[command(name = "slicebloom", version, about = "Build and query sliced Bloom filter files")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Build a filter from newline-delimited values and write it to a file
    Build {
        /// Number of elements to size the filter for
        #[arg(long, conflicts_with = "scale")]
        capacity: Option<u64>,
        /// Size the filter for this multiple of the input count instead
        #[arg(long)]
        scale: Option<f64>,
        /// Acceptable false positive probability
        #[arg(long, default_value_t = slicebloom::DEFAULT_FALSE_POSITIVE_PROBABILITY)]
        probability: f64,
        /// Digest algorithm: sha256, sha512, sha3_256 or sha3_512
        #[arg(long, value_parser = parse_algorithm, default_value = "sha3_256")]
        hash: HashAlgorithm,
        /// Where to write the encoded filter
        #[arg(long)]
        out: PathBuf,
        /// File of values, one per line; stdin when omitted
        input: Option<PathBuf>,
    },
    /// Probe a filter file; exits with status 1 if any value is absent
    Query {
        /// Encoded filter file
        #[arg(long)]
        filter: PathBuf,
        /// Algorithm to assume when the embedded name is unrecognized
        #[arg(long, value_parser = parse_algorithm)]
        fallback_hash: Option<HashAlgorithm>,
        /// Values to probe
        #[arg(required = true)]
        values: Vec<String>,
    },
    /// Insert values into an existing filter file
    Insert {
        /// Encoded filter file, rewritten in place
        #[arg(long)]
        filter: PathBuf,
        /// Algorithm to assume when the embedded name is unrecognized
        #[arg(long, value_parser = parse_algorithm)]
        fallback_hash: Option<HashAlgorithm>,
        /// Values to insert
        #[arg(required = true)]
        values: Vec<String>,
    },
    /// Print the parameters and fill statistics of a filter file
    Info {
        /// Encoded filter file
        #[arg(long)]
        filter: PathBuf,
        /// Algorithm to assume when the embedded name is unrecognized
        #[arg(long, value_parser = parse_algorithm)]
        fallback_hash: Option<HashAlgorithm>,
        /// Emit JSON instead of plain text
        #[arg(long)]
        json: bool,
    },
}

/// Everything `info` reports about one filter file.
#[derive(Serialize)]
struct FilterInfo {
    config: FilterConfig,
    sizing: Sizing,
    elements_inserted: u64,
    total_bits: u64,
    bits_set: u64,
    fill_ratio: f64,
}

impl From<&BloomFilter> for FilterInfo {
    fn from(filter: &BloomFilter) -> Self {
        Self {
            config: filter.config(),
            sizing: filter.sizing(),
            elements_inserted: filter.len(),
            total_bits: filter.total_bits(),
            bits_set: filter.bits_set(),
            fill_ratio: filter.fill_ratio(),
        }
    }
}

fn main() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("installing the tracing subscriber")?;

    match Cli::parse().command {
        Command::Build { capacity, scale, probability, hash, out, input } => {
            build(capacity, scale, probability, hash, &out, input.as_deref())
        }
        Command::Query { filter, fallback_hash, values } => query(&filter, fallback_hash, &values),
        Command::Insert { filter, fallback_hash, values } => {
            insert(&filter, fallback_hash, &values)
        }
        Command::Info { filter, fallback_hash, json } => info(&filter, fallback_hash, json),
    }
}

fn build(
    capacity: Option<u64>,
    scale: Option<f64>,
    probability: f64,
    hash: HashAlgorithm,
    out: &Path,
    input: Option<&Path>,
) -> Result<()> {
    let values = read_values(input)?;
    let config = match (capacity, scale) {
        (Some(explicit), _) => FilterConfig::new(explicit, probability),
        (None, Some(proportion)) => {
            let scaled = (proportion * values.len() as f64).ceil() as u64;
            FilterConfig::new(scaled, probability)
        }
        (None, None) => bail!("one of --capacity or --scale is required"),
    };
    let filter = BloomFilter::from_values(config.with_hash_algorithm(hash), &values)?;
    fs::write(out, filter.to_bytes()).with_context(|| format!("writing {}", out.display()))?;
    println!(
        "wrote {}: {} values in {} slices of {} bits",
        out.display(),
        filter.len(),
        filter.num_slices(),
        filter.bits_per_slice()
    );
    Ok(())
}

fn query(path: &Path, fallback: Option<HashAlgorithm>, values: &[String]) -> Result<()> {
    let filter = load_filter(path, fallback)?;
    let mut absent = 0u64;
    for value in values {
        if filter.contains(value.as_bytes()) {
            println!("present\t{value}");
        } else {
            absent += 1;
            println!("absent\t{value}");
        }
    }
    if absent > 0 {
        std::process::exit(1);
    }
    Ok(())
}

fn insert(path: &Path, fallback: Option<HashAlgorithm>, values: &[String]) -> Result<()> {
    let mut filter = load_filter(path, fallback)?;
    for value in values {
        filter.insert(value.as_bytes())?;
    }
    fs::write(path, filter.to_bytes()).with_context(|| format!("writing {}", path.display()))?;
    println!("{} now holds {} of {} elements", path.display(), filter.len(), filter.capacity());
    Ok(())
}

fn info(path: &Path, fallback: Option<HashAlgorithm>, json: bool) -> Result<()> {
    let filter = load_filter(path, fallback)?;
    let report = FilterInfo::from(&filter);
    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("capacity: {}", filter.capacity());
        println!("false positive probability: {}", filter.false_positive_probability());
        println!("hash algorithm: {}", filter.hash_algorithm());
        println!("slices: {}", filter.num_slices());
        println!("bits per slice: {}", filter.bits_per_slice());
        println!("elements inserted: {}", filter.len());
        println!("bits set: {} of {}", filter.bits_set(), filter.total_bits());
        println!("fill ratio: {:.4}", filter.fill_ratio());
    }
    Ok(())
}

fn parse_algorithm(name: &str) -> Result<HashAlgorithm, String> {
    HashAlgorithm::from_name(name).ok_or_else(|| {
        format!("unknown hash algorithm {name:?}, expected sha256, sha512, sha3_256 or sha3_512")
    })
}

fn read_values(input: Option<&Path>) -> Result<Vec<String>> {
    let raw = match input {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("reading values from {}", path.display()))?,
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("reading values from stdin")?;
            buffer
        }
    };
    Ok(raw.lines().filter(|line| !line.is_empty()).map(str::to_owned).collect())
}

fn load_filter(path: &Path, fallback: Option<HashAlgorithm>) -> Result<BloomFilter> {
    let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    Ok(BloomFilter::from_bytes(&bytes, fallback)?)
}
