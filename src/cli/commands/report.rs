//! Shared execution and rendering for `analyze` and `distributed`

use anyhow::{Context, Result};
use std::path::Path;

use crate::cli::args::{OutputFormat, RunArgs};
use crate::cli::output::Output;
use crate::config::{AnalyzerConfig, ConfigOverrides, DerivedParams, RunConfig, RunMode};
use crate::reports::{ReportGenerator, RunReport, json_document};
use crate::runner::Runner;

/// Resolve configuration, run both engines off the async runtime, then print
/// and optionally write the results
pub async fn execute_run(
    args: &RunArgs,
    mode: RunMode,
    overrides: ConfigOverrides,
    custom_config: Option<&Path>,
    output: &Output,
) -> Result<()> {
    // JSON documents own stdout
    let output = match args.format {
        OutputFormat::Json => output.silenced(),
        OutputFormat::Text => *output,
    };

    let config = AnalyzerConfig::load(custom_config, Some(&overrides))
        .context("Failed to load configuration")?;
    let run_config = resolve(&config, mode, args, &output);

    output.verbose(&format!(
        "Source: {}, io workers {}, cpu workers {}, ranks {}",
        run_config.source_directory.display(),
        run_config.io_workers,
        run_config.cpu_workers,
        run_config.ranks
    ));

    let runner = Runner::new(run_config);
    let report = tokio::task::spawn_blocking(move || runner.run())
        .await
        .context("Analysis task did not complete")?
        .with_context(|| format!("{mode} analysis failed"))?;

    match args.format {
        OutputFormat::Text => print_summary(&report, &output),
        OutputFormat::Json => {
            let document = serde_json::to_string_pretty(&json_document(&report))
                .context("Failed to serialize results")?;
            println!("{document}");
        }
    }

    if config.output.write_files {
        let paths = ReportGenerator::write_artifacts(&report, &config.output.directory)
            .context("Failed to write result files")?;
        output.success(&format!(
            "Wrote {} and {}",
            paths.json.display(),
            paths.csv.display()
        ));
    }

    Ok(())
}

/// Apply `--nim` on top of the loaded config; a bad identifier keeps the
/// configured values
fn resolve(config: &AnalyzerConfig, mode: RunMode, args: &RunArgs, output: &Output) -> RunConfig {
    let run_config = match mode {
        RunMode::Hybrid => RunConfig::single_node(config),
        RunMode::Distributed => RunConfig::distributed(config),
    };

    let Some(identifier) = args.nim.as_deref() else {
        return run_config;
    };

    match DerivedParams::from_identifier(identifier) {
        Ok(derived) => {
            output.info(&format!(
                "Derived from {}: io workers {}, cpu workers {}, file limit {}",
                derived.identifier, derived.io_workers, derived.cpu_workers, derived.file_limit
            ));
            run_config.with_derived(derived, args.limit)
        }
        Err(e) => {
            tracing::warn!("Ignoring identifier: {e}");
            output.warning(&format!("{e}; using configured parameters"));
            run_config
        }
    }
}

fn print_summary(report: &RunReport, output: &Output) {
    let stats = &report.aggregate;
    let perf = &report.performance;

    output.info(&format!(
        "Found {} files in {}",
        report.files_discovered,
        report.source_directory.display()
    ));

    output.header(&format!("{} run {}", report.mode, report.run_id));

    output.section_header("Aggregate");
    output.table_row("Files analyzed", &stats.files.to_string());
    output.table_row("Failed", &stats.failed().to_string());
    output.table_row("Words", &stats.words.to_string());
    output.table_row("Vowels", &stats.vowels.to_string());
    output.table_row("Digits", &stats.digits.to_string());
    output.table_row("Symbols", &stats.symbols.to_string());
    output.table_row("Average word length", &format!("{:.2}", stats.avg_len()));

    let top_words = report.top_words();
    if !top_words.is_empty() {
        output.section_header(&format!("Top {} words", top_words.len()));
        for (word, count) in &top_words {
            output.table_row(word, &count.to_string());
        }
    }

    if !report.rank_elapsed.is_empty() {
        output.section_header("Ranks");
        for (rank, elapsed) in &report.rank_elapsed {
            output.table_row(&format!("Rank {rank}"), &format!("{:.4}s", elapsed.as_secs_f64()));
        }
    }

    output.section_header("Performance");
    output.table_row("Sequential time", &format!("{:.4}s", perf.sequential_time_seconds));
    output.table_row("Parallel time", &format!("{:.4}s", perf.parallel_time_seconds));
    output.table_row(
        "Throughput",
        &format!("{:.2} files/s", perf.throughput_files_per_sec),
    );
    output.table_row("Speedup", &format!("{:.2}x", perf.speedup));
    output.table_row("Efficiency", &format!("{:.1}%", perf.efficiency * 100.0));
    output.table_row(
        "Workers",
        &format!(
            "{} io / {} cpu x {} rank(s)",
            perf.io_workers, perf.cpu_workers, perf.rank_count
        ),
    );
    output.table_row("Total files processed", &report.files_processed().to_string());

    if !stats.failures.is_empty() {
        output.section_header("Failed files");
        for failure in &stats.failures {
            output.warning(&format!(
                "{} ({}): {}",
                failure.file, failure.stage, failure.message
            ));
        }
    }
}
