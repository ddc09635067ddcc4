use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use eyre::Result;
use tracing_subscriber::EnvFilter;

use memsim::{report, trace, CacheMemory, CacheParameters, ReplacementPolicy};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum PolicyArg {
    Lru,
    Fifo,
}

impl From<PolicyArg> for ReplacementPolicy {
    fn from(policy: PolicyArg) -> Self {
        match policy {
            PolicyArg::Lru => ReplacementPolicy::LRU,
            PolicyArg::Fifo => ReplacementPolicy::FIFO,
        }
    }
}

/// simulate a set associative cache in front of main memory
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// toml file with memory_size, cache_size, block_size, associativity and policy
    #[arg(short, long)]
    config: PathBuf,
    /// the memory reference trace
    #[arg(short, long)]
    trace: PathBuf,
    /// use this policy instead of the one in the config file
    #[arg(short, long, value_enum)]
    policy: Option<PolicyArg>,
    /// also save the full report as json
    #[arg(long)]
    json: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut params = CacheParameters::from_config_file(&cli.config)?;
    if let Some(policy) = cli.policy {
        params.policy = policy.into();
    }
    let references = trace::load_trace(&cli.trace, params.memory_size)?;

    let mut memory = CacheMemory::new(&params)?;
    let result = memory.run(&references);

    println!("Simulator Output:");
    println!("{}", report::format_geometry(&result.geometry));
    println!("{}", report::format_steps(&result.steps, params.associativity));
    println!("{}", report::format_summary(&result.summary));
    println!(
        "{}",
        report::format_cache_contents(&result.slots, result.geometry.tag_bits)
    );

    if let Some(path) = cli.json {
        result.save(&path)?;
        tracing::info!(path = %path.display(), "report saved");
    }
    Ok(())
}
