// src/bin/compute_stats.rs - Compute per-simulation statistics from raw MCMC output

use std::path::PathBuf;

use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};

use mcmc_stats::error_analysis::DEFAULT_TARGET_BLOCKS;
use mcmc_stats::io::{read_engine_run, read_raw_csv, write_statistics};
use mcmc_stats::pipeline::StatsPipeline;
use mcmc_stats::records::RawRecord;

#[derive(Parser)]
#[command(about = "Aggregate raw per-step MCMC observables into per-simulation statistics")]
struct Cli {
    /// Combined raw-record CSV (all identity columns per row)
    #[arg(long, conflicts_with = "runs")]
    input: Option<PathBuf>,

    /// Engine run files (results_<MODEL>_L<L>_T<T>.csv); simulation ids
    /// are assigned in argument order
    #[arg(long, value_delimiter = ',')]
    runs: Vec<PathBuf>,

    /// Output statistics CSV
    #[arg(long, default_value = "statistics.csv")]
    output: PathBuf,

    /// Use the signed mean <M> instead of <|M|> for the magnetization
    /// estimate (susceptibility always uses signed M)
    #[arg(long)]
    signed_magnetization: bool,

    /// Target jackknife block count
    #[arg(long, default_value_t = DEFAULT_TARGET_BLOCKS)]
    target_blocks: usize,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    colog::init();
    let args = Cli::parse();

    let records: Vec<RawRecord> = if let Some(input) = &args.input {
        read_raw_csv(input)?
    } else if !args.runs.is_empty() {
        let bar = ProgressBar::new(args.runs.len() as u64);
        bar.set_style(ProgressStyle::with_template(
            " {bar:40.cyan/blue} {pos}/{len} [{elapsed_precise}]",
        )?);

        let mut records = Vec::new();
        for (sim_id, path) in args.runs.iter().enumerate() {
            records.extend(read_engine_run(path, sim_id as u64 + 1)?);
            bar.inc(1);
        }
        bar.finish();
        records
    } else {
        return Err("either --input or --runs is required".into());
    };

    let pipeline = StatsPipeline::new(!args.signed_magnetization, args.target_blocks);
    let stats = pipeline.run(&records)?;
    write_statistics(&args.output, &stats)?;

    println!(
        "Computed statistics for {} simulation(s) → {}",
        stats.len(),
        args.output.display()
    );
    Ok(())
}
