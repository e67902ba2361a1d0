use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use cstds::{Cst, CstCn, CstCnr, CsaIndex, LcpArray, Node, NprSupport};

/// Number of random leaves for the ancestor-path sample.
const PATH_SAMPLE_LEAVES: usize = 10_000;
/// Number of random leaves for the suffix-link chains.
const SL_SAMPLE_LEAVES: usize = 1_000;
/// Number of random leaf pairs for the LCA sample.
const LCA_SAMPLE_PAIRS: usize = 100_000;

#[derive(Parser, Debug)]
#[command(name = "cstds", about = "Compressed suffix tree construction and micro-benchmarks")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Variant {
    /// Uniform block-minima NPR.
    Cn,
    /// Two-tier NPR storing only positions at the bottom level.
    Cnr,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Build a suffix tree index from a text file and serialize it.
    Build {
        /// Input text. A NUL sentinel is appended when missing.
        text_file: PathBuf,
        /// Output path (default: `<text_file>.cst_<variant>_b<B>[_s<b>]`).
        #[arg(short, long)]
        out: Option<PathBuf>,
        /// NPR variant.
        #[arg(long, value_enum, default_value_t = Variant::Cn)]
        variant: Variant,
        /// Block size for the NPR levels.
        #[arg(long, default_value_t = 32)]
        block_size: usize,
        /// Small block size for the bottom level of the cnr variant.
        #[arg(long, default_value_t = 8)]
        small_block: usize,
    },
    /// Load a serialized index and time the navigation operations.
    Measure {
        /// Index file written by `build`.
        index_file: PathBuf,
        /// NPR variant used at build time.
        #[arg(long, value_enum, default_value_t = Variant::Cn)]
        variant: Variant,
        /// Block size used at build time.
        #[arg(long, default_value_t = 32)]
        block_size: usize,
        /// Small block size used at build time (cnr only).
        #[arg(long, default_value_t = 8)]
        small_block: usize,
    },
}

fn main() -> Result<()> {
    // argument errors exit with code 1
    let cli = Cli::try_parse().unwrap_or_else(|e| {
        let _ = e.print();
        std::process::exit(if e.use_stderr() { 1 } else { 0 });
    });

    match cli.command {
        Commands::Build {
            text_file,
            out,
            variant,
            block_size,
            small_block,
        } => run_build(text_file, out, variant, block_size, small_block),
        Commands::Measure {
            index_file,
            variant,
            block_size,
            small_block,
        } => run_measure(index_file, variant, block_size, small_block),
    }
}

fn run_build(
    text_file: PathBuf,
    out: Option<PathBuf>,
    variant: Variant,
    block_size: usize,
    small_block: usize,
) -> Result<()> {
    let mut text = std::fs::read(&text_file)
        .with_context(|| format!("failed to read text from {}", text_file.display()))?;
    if text.last() != Some(&0) {
        text.push(0);
    }

    let out_path = out.unwrap_or_else(|| {
        let suffix = match variant {
            Variant::Cn => format!("cst_cn_b{block_size}"),
            Variant::Cnr => format!("cst_cnr_b{block_size}_s{small_block}"),
        };
        let mut name = text_file.as_os_str().to_owned();
        name.push(".");
        name.push(suffix);
        PathBuf::from(name)
    });

    let start = Instant::now();
    let (n, bytes) = match variant {
        Variant::Cn => {
            let cst = CstCn::build(&text, block_size).context("index construction failed")?;
            (cst.size(), write_index(&out_path, |w| cst.serialize(w))?)
        }
        Variant::Cnr => {
            let cst = CstCnr::build(&text, block_size, small_block)
                .context("index construction failed")?;
            (cst.size(), write_index(&out_path, |w| cst.serialize(w))?)
        }
    };
    let elapsed = start.elapsed();

    println!("Text size: {n} symbols");
    println!("Construction time: {:.2} seconds", elapsed.as_secs_f64());
    println!("Index size: {:.2}n bits", bytes as f64 * 8.0 / n as f64);
    println!("Written to {}", out_path.display());
    Ok(())
}

fn write_index(
    out_path: &PathBuf,
    serialize: impl FnOnce(&mut BufWriter<File>) -> std::io::Result<usize>,
) -> Result<usize> {
    let mut writer = BufWriter::new(
        File::create(out_path)
            .with_context(|| format!("failed to create {}", out_path.display()))?,
    );
    let bytes = serialize(&mut writer).context("serialization failed")?;
    writer.flush().context("serialization failed")?;
    Ok(bytes)
}

fn run_measure(
    index_file: PathBuf,
    variant: Variant,
    block_size: usize,
    small_block: usize,
) -> Result<()> {
    let mut reader = BufReader::new(
        File::open(&index_file)
            .with_context(|| format!("failed to open {}", index_file.display()))?,
    );
    match variant {
        Variant::Cn => {
            let cst = CstCn::load(&mut reader, block_size)
                .with_context(|| format!("failed to load {}", index_file.display()))?;
            run_experiments(&cst);
        }
        Variant::Cnr => {
            let cst = CstCnr::load(&mut reader, block_size, small_block)
                .with_context(|| format!("failed to load {}", index_file.display()))?;
            run_experiments(&cst);
        }
    }
    Ok(())
}

fn run_experiments<C, L, N>(cst: &Cst<C, L, N>)
where
    C: CsaIndex,
    L: LcpArray,
    N: NprSupport,
{
    ancestor_path_experiment(cst);
    suffix_link_experiment(cst);
    lca_experiment(cst);
}

/// Sample every node on the root path of random leaves, then time
/// parent/depth/first-child/sibling/node-depth/child over the sample.
fn ancestor_path_experiment<C, L, N>(cst: &Cst<C, L, N>)
where
    C: CsaIndex,
    L: LcpArray,
    N: NprSupport,
{
    let n = cst.size();
    let mut rng = StdRng::seed_from_u64(1);
    let mut sample = Vec::new();
    let mut symbols = Vec::new();
    let root = cst.root();
    for _ in 0..PATH_SAMPLE_LEAVES {
        let mut node = cst.parent(cst.select_leaf(rng.gen_range(1..=n)));
        while node != root {
            sample.push(node);
            symbols.push(cst.csa().f_char(rng.gen_range(0..n)));
            node = cst.parent(node);
        }
    }
    println!("Path sample size: {}", sample.len());
    if sample.is_empty() {
        return;
    }

    report("Parent", &sample, |&v| {
        std::hint::black_box(cst.parent(v));
    });
    report("Depth", &sample, |&v| {
        std::hint::black_box(cst.depth(v));
    });
    report("First Child", &sample, |&v| {
        std::hint::black_box(cst.first_child(v));
    });
    report("Sibling", &sample, |&v| {
        std::hint::black_box(cst.sibling(v));
    });
    report("Node-Depth", &sample, |&v| {
        std::hint::black_box(cst.node_depth(v));
    });
    let paired: Vec<(Node, u8)> = sample.into_iter().zip(symbols).collect();
    report("Child", &paired, |&(v, c)| {
        std::hint::black_box(cst.child(v, c));
    });
}

/// Follow suffix-link chains from random leaves' parents, then time `sl`.
fn suffix_link_experiment<C, L, N>(cst: &Cst<C, L, N>)
where
    C: CsaIndex,
    L: LcpArray,
    N: NprSupport,
{
    let n = cst.size();
    let mut rng = StdRng::seed_from_u64(2);
    let mut sample = Vec::new();
    let root = cst.root();
    for _ in 0..SL_SAMPLE_LEAVES {
        let mut node = cst.parent(cst.select_leaf(rng.gen_range(1..=n)));
        while node != root {
            sample.push(node);
            node = cst.sl(node);
        }
    }
    println!("Suffix-link sample size: {}", sample.len());
    if sample.is_empty() {
        return;
    }
    report("Suffix Link", &sample, |&v| {
        std::hint::black_box(cst.sl(v));
    });
}

/// Time `lca` over random leaf pairs.
fn lca_experiment<C, L, N>(cst: &Cst<C, L, N>)
where
    C: CsaIndex,
    L: LcpArray,
    N: NprSupport,
{
    let n = cst.size();
    let mut rng = StdRng::seed_from_u64(3);
    let pairs: Vec<(Node, Node)> = (0..LCA_SAMPLE_PAIRS)
        .map(|_| {
            (
                cst.select_leaf(rng.gen_range(1..=n)),
                cst.select_leaf(rng.gen_range(1..=n)),
            )
        })
        .collect();
    report("LCA", &pairs, |&(v, w)| {
        std::hint::black_box(cst.lca(v, w));
    });
}

fn report<T>(name: &str, sample: &[T], mut op: impl FnMut(&T)) {
    let start = Instant::now();
    for item in sample {
        op(item);
    }
    let nanos = start.elapsed().as_nanos() as f64 / sample.len() as f64;
    println!("{name}: {nanos:.2} nanosec");
}
