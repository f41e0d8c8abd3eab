use super::RunReport;

const HEADER: &str = "filename,words,vowels,digits,symbols,avg_len";

/// One row per successfully analyzed file, keyed by base name
pub fn csv_content(report: &RunReport) -> String {
    let mut out = String::with_capacity(64 * (report.outcomes.len() + 1));
    out.push_str(HEADER);
    out.push('\n');

    for (task, result) in report.outcomes.successes() {
        out.push_str(&format!(
            "{},{},{},{},{},{}\n",
            escape(&task.file_name()),
            result.words,
            result.vowels,
            result.digits,
            result.symbols,
            result.avg_len
        ));
    }
    out
}

/// Quote a field when it contains a separator, quote or line break
fn escape(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
