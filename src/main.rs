use anyhow::{Context, Result, anyhow, bail};
use clap::Parser;
use crossbeam::channel::{Sender, unbounded};
use std::time::Instant;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use telenorm::config::{Args, RunConfig};
use telenorm::golden::GoldenCheck;
use telenorm::record::CanonicalRecord;
use telenorm::{input, normalize_batch, output};

#[derive(Debug, Default)]
struct RunStats {
    input_bytes: u64,
    records: usize,
    converted: usize,
    failed: usize,
    mismatched: usize,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);
    let config = RunConfig::from_args(args)?;

    let golden = config
        .expect
        .as_deref()
        .map(GoldenCheck::load)
        .transpose()?;

    let start_time = Instant::now();

    // channel for sending converted batches to writer
    let (tx, rx) = unbounded::<Vec<CanonicalRecord>>();

    let output_arg = config.output.clone();
    let writer_handle = std::thread::spawn(move || -> Result<()> {
        let mut writer = output::create_writer(&output_arg)?;
        for batch in rx {
            writer.write_batch(&batch)?;
        }
        writer.finish()
    });

    let mut stats = RunStats::default();
    let outcome = convert_files(&config, golden.as_ref(), &tx, &mut stats);

    // close channel so writer thread can finish
    drop(tx);
    writer_handle
        .join()
        .map_err(|_| anyhow!("writer thread panicked"))??;
    outcome?;

    if config.benchmark {
        print_benchmark_results(&stats, start_time.elapsed());
    }

    info!(
        records = stats.records,
        converted = stats.converted,
        failed = stats.failed,
        mismatched = stats.mismatched,
        "done"
    );

    if stats.failed > 0 {
        bail!("{} of {} record(s) failed to convert", stats.failed, stats.records);
    }
    if stats.mismatched > 0 {
        bail!("{} record(s) differ from the expected output", stats.mismatched);
    }
    Ok(())
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();
}

fn convert_files(
    config: &RunConfig,
    golden: Option<&GoldenCheck>,
    tx: &Sender<Vec<CanonicalRecord>>,
    stats: &mut RunStats,
) -> Result<()> {
    for path in &config.files {
        stats.input_bytes += std::fs::metadata(path)?.len();
        let raw = input::load_records(path, config.batch_size)?;
        debug!(path = %path.display(), records = raw.len(), rule = ?config.rule, "converting");

        let mut index = 0usize;
        for chunk in raw.chunks(config.batch_size) {
            let mut converted = Vec::with_capacity(chunk.len());
            for result in normalize_batch(chunk, config.rule) {
                stats.records += 1;
                match result {
                    Ok(record) => {
                        if let Some(diff) = golden.and_then(|g| g.check(index, &record)) {
                            warn!(path = %path.display(), record = index, "{diff}");
                            stats.mismatched += 1;
                        }
                        stats.converted += 1;
                        converted.push(record);
                    }
                    Err(err) if config.fail_fast => {
                        return Err(err).with_context(|| {
                            format!("{}: record #{index}", path.display())
                        });
                    }
                    Err(err) => {
                        warn!(path = %path.display(), record = index, error = %err, "conversion failed");
                        stats.failed += 1;
                    }
                }
                index += 1;
            }
            tx.send(converted)
                .map_err(|_| anyhow!("writer thread stopped early"))?;
        }
    }
    Ok(())
}

fn print_benchmark_results(stats: &RunStats, duration: std::time::Duration) {
    let duration_secs = duration.as_secs_f64();
    let input_mb = stats.input_bytes as f64 / (1024.0 * 1024.0);

    eprintln!("\n=== BENCHMARK RESULTS ===");
    eprintln!("Input size: {:.2} MB", input_mb);
    eprintln!("Records: {}", stats.records);
    eprintln!("Converted: {}", stats.converted);
    eprintln!("Processing time: {:.3}s", duration_secs);
    eprintln!("Throughput: {:.2} MB/s", input_mb / duration_secs);
    eprintln!(
        "Throughput: {:.0} records/s",
        stats.records as f64 / duration_secs
    );
    if stats.records > 0 {
        eprintln!(
            "Conversion success rate: {:.1}%",
            (stats.converted as f64 / stats.records as f64) * 100.0
        );
    }
}
