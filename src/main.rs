use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use std::io::Write;
use std::path::{Path, PathBuf};

use sa_seek::index::genome::{Genome, SequenceStore};
use sa_seek::io::fasta::{open_reference, FastaReader};
use sa_seek::io::output::{HitWriter, OutputFormat};
use sa_seek::search::{SearchEngine, SearchOpt};

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

#[derive(Parser, Debug)]
#[command(
    name = "sa-seek",
    author,
    version,
    about = "Approximate pattern search over a DNA reference with a suffix array",
    arg_required_else_help = true
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    global: GlobalOpts,
}

#[derive(Args, Debug)]
struct GlobalOpts {
    /// Worker threads for index construction and search (0 = all cores)
    #[arg(short = 't', long = "threads", default_value_t = 0, global = true)]
    threads: usize,
    /// Increase log verbosity (-v debug, -vv trace); RUST_LOG overrides
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Build the suffix array of a reference and report statistics (nothing is written to disk)
    Index {
        /// Reference FASTA file (.fa / .fa.gz)
        reference: PathBuf,
    },
    /// Search patterns against a reference allowing up to K mismatches
    Search {
        /// Reference FASTA file (.fa / .fa.gz)
        reference: PathBuf,
        /// Patterns to search for
        patterns: Vec<String>,
        /// FASTA file of query patterns (record id is used as query name)
        #[arg(short = 'q', long = "queries")]
        queries: Option<PathBuf>,
        /// Maximum number of mismatches
        #[arg(short = 'k', long = "max-mismatches", default_value_t = 0)]
        max_mismatches: usize,
        /// Also search the reverse complement of every pattern
        #[arg(long = "both-strands")]
        both_strands: bool,
        /// Keep hits that span the junction of two reference sequences
        #[arg(long = "allow-cross-reference")]
        allow_cross_reference: bool,
        /// Output format
        #[arg(short = 'f', long = "format", value_enum, default_value_t = OutputFormat::Tsv)]
        format: OutputFormat,
        /// Output path (stdout if omitted)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.global.verbose);

    if cli.global.threads > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(cli.global.threads)
            .build_global()
            .context("cannot configure worker thread pool")?;
    }

    match cli.command {
        Commands::Index { reference } => run_index(&reference),
        Commands::Search {
            reference,
            patterns,
            queries,
            max_mismatches,
            both_strands,
            allow_cross_reference,
            format,
            out,
        } => {
            let opt = SearchOpt { max_mismatches, both_strands, allow_cross_reference };
            run_search(&reference, patterns, queries.as_deref(), opt, format, out.as_deref())
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => log::LevelFilter::Info,
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp_millis()
        .init();
}

fn load_engine(reference: &Path) -> Result<SearchEngine> {
    log::info!("loading reference {}", reference.display());
    let genome = Genome::from_fasta(reference)?;
    let mut engine = SearchEngine::new(genome);
    engine.build_index()?;
    Ok(engine)
}

fn run_index(reference: &Path) -> Result<()> {
    let engine = load_engine(reference)?;
    let genome = engine.genome();
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    writeln!(out, "reference: {}", reference.display())?;
    writeln!(out, "sequences: {}", genome.contigs().len())?;
    writeln!(out, "total_len: {}", genome.len())?;
    if let Some(stats) = engine.stats() {
        writeln!(out, "build_time: {:.3}s", stats.build_time.as_secs_f64())?;
        writeln!(out, "built_at: {}", stats.built_at.to_rfc3339())?;
    }
    for c in genome.contigs() {
        writeln!(out, "  {}\t{}\t{}", c.name, c.offset, c.len)?;
    }
    Ok(())
}

fn collect_queries(patterns: Vec<String>, queries: Option<&Path>) -> Result<Vec<(String, Vec<u8>)>> {
    let mut all: Vec<(String, Vec<u8>)> =
        patterns.into_iter().map(|p| (p.clone(), p.into_bytes())).collect();
    if let Some(path) = queries {
        for rec in FastaReader::new(open_reference(path)?) {
            let rec = rec.with_context(|| format!("cannot parse queries from '{}'", path.display()))?;
            all.push((rec.id, rec.seq));
        }
    }
    if all.is_empty() {
        bail!("no patterns given (pass them as arguments or with --queries)");
    }
    Ok(all)
}

fn run_search(
    reference: &Path,
    patterns: Vec<String>,
    queries: Option<&Path>,
    opt: SearchOpt,
    format: OutputFormat,
    out_path: Option<&Path>,
) -> Result<()> {
    // 先校验查询输入，避免无谓地构建索引
    let queries = collect_queries(patterns, queries)?;
    let engine = load_engine(reference)?;

    let sink: Box<dyn Write> = match out_path {
        Some(p) => Box::new(std::io::BufWriter::new(
            std::fs::File::create(p).with_context(|| format!("cannot create output '{}'", p.display()))?,
        )),
        None => Box::new(std::io::BufWriter::new(std::io::stdout())),
    };
    let mut writer = HitWriter::new(sink, format);
    let cmdline = std::env::args().collect::<Vec<_>>().join(" ");
    writer.write_header(engine.genome().contigs(), Some(&cmdline))?;

    let mut failed = 0usize;
    let mut total_hits = 0usize;
    for (name, pattern) in &queries {
        match engine.search_with_opt(pattern, &opt, None) {
            Ok(hits) => {
                log::info!("{}: {} hit(s)", name, hits.len());
                total_hits += hits.len();
                writer.write_hits(name, pattern, &hits)?;
            }
            Err(e) => {
                log::error!("query {} failed: {}", name, e);
                failed += 1;
            }
        }
    }
    writer.finish()?;

    log::info!("{} queries, {} hit(s) total", queries.len(), total_hits);
    if failed > 0 {
        bail!("{} of {} queries failed", failed, queries.len());
    }
    Ok(())
}
