use serde::Serialize;
use serde_json::{Value, json};

use super::RunReport;
use crate::analysis::AnalysisResult;

#[derive(Serialize)]
struct PerFileEntry<'a> {
    file: String,
    name: String,
    #[serde(flatten)]
    result: &'a AnalysisResult,
}

/// Machine-readable document for `results.json` and `--format json`
///
/// `per_file` lists successful files only, failures are under `failures`.
pub fn json_document(report: &RunReport) -> Value {
    let aggregate = &report.aggregate;

    let per_file: Vec<PerFileEntry<'_>> = report
        .outcomes
        .successes()
        .map(|(task, result)| PerFileEntry {
            file: task.to_string(),
            name: task.file_name(),
            result,
        })
        .collect();

    let len_histogram: serde_json::Map<String, Value> = aggregate
        .len_histogram
        .iter()
        .map(|(length, count)| (length.to_string(), json!(count)))
        .collect();

    json!({
        "run_id": report.run_id,
        "mode": report.mode,
        "source_directory": report.source_directory,
        "files_discovered": report.files_discovered,
        "aggregate": {
            "files": aggregate.files,
            "failed": aggregate.failed(),
            "words": aggregate.words,
            "vowels": aggregate.vowels,
            "digits": aggregate.digits,
            "symbols": aggregate.symbols,
            "avg_len": aggregate.avg_len()
        },
        "per_file": per_file,
        "failures": aggregate.failures.iter().map(|f| json!({
            "file": f.file.to_string(),
            "stage": f.stage,
            "message": f.message
        })).collect::<Vec<_>>(),
        "top_words": report.top_words(),
        "len_histogram": len_histogram,
        "performance": report.performance,
        "ranks": report.rank_elapsed.iter().map(|(rank, elapsed)| json!({
            "rank": rank,
            "elapsed_seconds": elapsed.as_secs_f64()
        })).collect::<Vec<_>>(),
        "derived": report.derived
    })
}
