//! # Output Rendering
//!
//! Pure renderers over validation outcomes. Each returns the full text to
//! print; the caller decides whether to print it at all (`--quiet`).
//!
//! - **text** — `✓ VALID <name>` / `✗ INVALID <name>` blocks with indented
//!   `keyword: message (at <pointer>)` lines, optionally colorized.
//! - **json** — array of `{filename, valid, errors, parseError?}`.
//! - **csv** — `filename,valid,error_count,errors` with RFC 4180 quoting.

use clap::{Args, ValueEnum};
use colored::{ColoredString, Colorize};
use serde::Serialize;

use jsv_schema::{
    FileValidationOutcome, SchemaWarning, ValidationError, ValidationResult, WarningKind,
};

/// Report format for `validate` and `batch`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable blocks, colorized unless `--no-color`.
    #[default]
    Text,
    /// JSON array, one object per file.
    Json,
    /// CSV with one row per file.
    Csv,
}

/// Report format for `check`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum CheckFormat {
    #[default]
    Text,
    Json,
}

/// Rendering flags shared by `validate` and `batch`.
#[derive(Args, Debug, Clone, Default)]
pub struct RenderArgs {
    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub output: OutputFormat,

    /// Disable ANSI colors in text output.
    #[arg(long)]
    pub no_color: bool,

    /// Print nothing; the exit code is the only result.
    #[arg(short, long)]
    pub quiet: bool,
}

impl RenderArgs {
    /// Render `outcomes`, or `None` in quiet mode.
    pub fn render(&self, outcomes: &[FileValidationOutcome]) -> Result<Option<String>, serde_json::Error> {
        if self.quiet {
            return Ok(None);
        }
        let rendered = match self.output {
            OutputFormat::Text => render_text(outcomes, !self.no_color),
            OutputFormat::Json => render_json(outcomes)?,
            OutputFormat::Csv => render_csv(outcomes),
        };
        Ok(Some(rendered))
    }
}

#[derive(Serialize)]
struct FileReport<'a> {
    filename: &'a str,
    valid: bool,
    errors: Vec<ErrorReport<'a>>,
    #[serde(rename = "parseError", skip_serializing_if = "Option::is_none")]
    parse_error: Option<&'a str>,
}

#[derive(Serialize)]
struct ErrorReport<'a> {
    keyword: &'a str,
    path: String,
    message: &'a str,
}

impl<'a> From<&'a ValidationError> for ErrorReport<'a> {
    fn from(error: &'a ValidationError) -> Self {
        Self {
            keyword: &error.keyword,
            path: error.pointer(),
            message: &error.message,
        }
    }
}

impl<'a> From<&'a FileValidationOutcome> for FileReport<'a> {
    fn from(outcome: &'a FileValidationOutcome) -> Self {
        Self {
            filename: &outcome.filename,
            valid: outcome.succeeded(),
            errors: errors_of(outcome).iter().map(ErrorReport::from).collect(),
            parse_error: outcome.parse_error.as_deref(),
        }
    }
}

fn errors_of(outcome: &FileValidationOutcome) -> &[ValidationError] {
    outcome
        .result
        .as_ref()
        .map(ValidationResult::errors)
        .unwrap_or_default()
}

fn paint(text: &str, color: bool, style: fn(&str) -> ColoredString) -> String {
    if color {
        style(text).to_string()
    } else {
        text.to_string()
    }
}

/// Text report.
pub fn render_text(outcomes: &[FileValidationOutcome], color: bool) -> String {
    let mut out = String::new();
    for outcome in outcomes {
        if outcome.succeeded() {
            out.push_str(&paint("✓ VALID", color, |s| s.green().bold()));
        } else {
            out.push_str(&paint("✗ INVALID", color, |s| s.red().bold()));
        }
        out.push(' ');
        out.push_str(&outcome.filename);
        out.push('\n');

        if let Some(reason) = &outcome.parse_error {
            out.push_str(&format!("    {}: {reason}\n", paint("parse error", color, |s| s.yellow())));
        }
        for error in errors_of(outcome) {
            out.push_str(&format!("    {error}\n"));
        }
    }

    if outcomes.len() > 1 {
        let valid = outcomes.iter().filter(|o| o.succeeded()).count();
        out.push_str(&format!(
            "{} file(s): {valid} valid, {} invalid\n",
            outcomes.len(),
            outcomes.len() - valid
        ));
    }
    out
}

/// JSON report (pretty-printed array).
pub fn render_json(outcomes: &[FileValidationOutcome]) -> Result<String, serde_json::Error> {
    let reports: Vec<FileReport<'_>> = outcomes.iter().map(FileReport::from).collect();
    let mut json = serde_json::to_string_pretty(&reports)?;
    json.push('\n');
    Ok(json)
}

/// CSV report. Parse failures carry `parse error: ...` in the `errors`
/// column with an `error_count` of zero.
pub fn render_csv(outcomes: &[FileValidationOutcome]) -> String {
    let mut out = String::from("filename,valid,error_count,errors\n");
    for outcome in outcomes {
        let errors = match &outcome.parse_error {
            Some(reason) => format!("parse error: {reason}"),
            None => errors_of(outcome)
                .iter()
                .map(|e| e.message.as_str())
                .collect::<Vec<_>>()
                .join("; "),
        };
        let row = [
            csv_field(&outcome.filename),
            outcome.succeeded().to_string(),
            outcome.error_count().to_string(),
            csv_field(&errors),
        ];
        out.push_str(&row.join(","));
        out.push('\n');
    }
    out
}

/// Quote a CSV field when it contains a delimiter, quote or line break.
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

#[derive(Serialize)]
struct CheckReport<'a> {
    filename: &'a str,
    valid: bool,
    warnings: Vec<WarningReport<'a>>,
}

#[derive(Serialize)]
struct WarningReport<'a> {
    kind: WarningKind,
    keyword: &'a str,
    path: String,
    message: &'a str,
}

/// Text report for `check`. The schema is valid by the time this runs.
pub fn render_check_text(filename: &str, warnings: &[SchemaWarning], color: bool) -> String {
    let mut out = format!("{} {filename}", paint("✓ VALID", color, |s| s.green().bold()));
    if !warnings.is_empty() {
        out.push_str(&format!(" ({} warning(s))", warnings.len()));
    }
    out.push('\n');
    for warning in warnings {
        out.push_str(&format!("    {}: {warning}\n", paint("warning", color, |s| s.yellow())));
    }
    out
}

/// JSON report for `check`.
pub fn render_check_json(filename: &str, warnings: &[SchemaWarning]) -> Result<String, serde_json::Error> {
    let report = CheckReport {
        filename,
        valid: true,
        warnings: warnings
            .iter()
            .map(|w| WarningReport {
                kind: w.kind,
                keyword: &w.keyword,
                path: w.pointer(),
                message: &w.message,
            })
            .collect(),
    };
    let mut json = serde_json::to_string_pretty(&report)?;
    json.push('\n');
    Ok(json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use jsv_schema::PathToken;

    fn error(path: Vec<PathToken>, keyword: &str, message: &str) -> ValidationError {
        ValidationError {
            path,
            keyword: keyword.to_string(),
            message: message.to_string(),
        }
    }

    fn outcomes() -> Vec<FileValidationOutcome> {
        vec![
            FileValidationOutcome {
                filename: "good.json".to_string(),
                result: Some(ValidationResult::from_errors(vec![])),
                parse_error: None,
                elapsed: Duration::from_millis(1),
            },
            FileValidationOutcome {
                filename: "bad, file.json".to_string(),
                result: Some(ValidationResult::from_errors(vec![
                    error(vec![], "required", "missing required property \"name\""),
                    error(vec![PathToken::from("age")], "minimum", "-1 is less than the minimum of 0"),
                ])),
                parse_error: None,
                elapsed: Duration::from_millis(1),
            },
            FileValidationOutcome {
                filename: "broken.json".to_string(),
                result: None,
                parse_error: Some("invalid JSON: EOF while parsing a value at line 1 column 9".to_string()),
                elapsed: Duration::from_millis(1),
            },
        ]
    }

    #[test]
    fn text_lists_each_file_and_violation() {
        let text = render_text(&outcomes(), false);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "✓ VALID good.json");
        assert_eq!(lines[1], "✗ INVALID bad, file.json");
        assert_eq!(lines[2], "    required: missing required property \"name\" (at root)");
        assert_eq!(lines[3], "    minimum: -1 is less than the minimum of 0 (at /age)");
        assert_eq!(lines[4], "✗ INVALID broken.json");
        assert!(lines[5].starts_with("    parse error: invalid JSON"));
        assert_eq!(lines[6], "3 file(s): 1 valid, 2 invalid");
    }

    #[test]
    fn single_file_text_has_no_summary() {
        let text = render_text(&outcomes()[..1], false);
        assert_eq!(text, "✓ VALID good.json\n");
    }

    #[test]
    fn json_shape_matches_contract() {
        let json: serde_json::Value = serde_json::from_str(&render_json(&outcomes()).unwrap()).unwrap();
        let files = json.as_array().unwrap();
        assert_eq!(files.len(), 3);

        assert_eq!(files[0]["valid"], true);
        assert!(files[0].get("parseError").is_none());

        assert_eq!(files[1]["errors"][1]["keyword"], "minimum");
        assert_eq!(files[1]["errors"][1]["path"], "/age");
        assert_eq!(files[1]["errors"][0]["path"], "");

        assert_eq!(files[2]["valid"], false);
        assert_eq!(files[2]["errors"].as_array().unwrap().len(), 0);
        assert!(files[2]["parseError"].as_str().unwrap().contains("invalid JSON"));
    }

    #[test]
    fn csv_quotes_and_joins_messages() {
        let csv = render_csv(&outcomes());
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "filename,valid,error_count,errors");
        assert_eq!(lines[1], "good.json,true,0,");
        assert_eq!(
            lines[2],
            "\"bad, file.json\",false,2,\"missing required property \"\"name\"\"; -1 is less than the minimum of 0\""
        );
        assert!(lines[3].starts_with("broken.json,false,0,parse error: invalid JSON"));
    }

    #[test]
    fn json_and_csv_error_counts_agree() {
        let outcomes = outcomes();
        let json: serde_json::Value = serde_json::from_str(&render_json(&outcomes).unwrap()).unwrap();
        for (file, outcome) in json.as_array().unwrap().iter().zip(&outcomes) {
            assert_eq!(file["errors"].as_array().unwrap().len(), outcome.error_count());
        }
    }

    #[test]
    fn quiet_renders_nothing() {
        let args = RenderArgs {
            quiet: true,
            ..RenderArgs::default()
        };
        assert!(args.render(&outcomes()).unwrap().is_none());
    }

    #[test]
    fn csv_field_escaping() {
        assert_eq!(csv_field("plain"), "plain");
        assert_eq!(csv_field("a,b"), "\"a,b\"");
        assert_eq!(csv_field("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(csv_field("two\nlines"), "\"two\nlines\"");
    }

    #[test]
    fn check_text_counts_warnings() {
        let warnings = vec![SchemaWarning {
            kind: WarningKind::UnrecognizedKeyword,
            keyword: "patternProperties".to_string(),
            path: vec![],
            message: "unrecognized keyword \"patternProperties\" is ignored during validation".to_string(),
        }];
        let text = render_check_text("schema.json", &warnings, false);
        assert!(text.starts_with("✓ VALID schema.json (1 warning(s))\n"));
        assert!(text.contains("    warning: patternProperties: unrecognized keyword"));

        let json: serde_json::Value =
            serde_json::from_str(&render_check_json("schema.json", &warnings).unwrap()).unwrap();
        assert_eq!(json["warnings"][0]["kind"], "unrecognized_keyword");
        assert_eq!(json["warnings"][0]["keyword"], "patternProperties");
    }
}
