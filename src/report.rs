//! Rendering and writing of finished reports.
//!
//! The LaTeX layout is a two-column `tabular` with one `label: & value` row
//! per measurement. Values are printed like a C++ output stream would print
//! a `double` by default: six significant digits in `%g` style.

use std::fs::File;
use std::io::{self, Write as _};
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use log::info;

use crate::error::{Error, Result};
use crate::schema::BenchReport;

/// Destination name that sends the report to stdout instead of a file.
pub const STDOUT: &str = "-";

const SIGNIFICANT_DIGITS: i32 = 6;
const LABEL_WIDTH: usize = 9;

#[derive(Clone, Copy, Debug, Default, ValueEnum, PartialEq, Eq)]
pub enum ReportFormat {
    /// LaTeX `tabular` body.
    #[default]
    Latex,
    /// One `label: value` line per operation.
    Text,
    /// Full report with run metadata.
    Json,
}

pub fn render(report: &BenchReport, format: ReportFormat) -> Result<String> {
    let mut out = String::new();
    match format {
        ReportFormat::Latex => {
            out.push_str("\\begin{tabular}{l|c}\n");
            for m in &report.measurements {
                let label = format!("{}:", m.name);
                out.push_str(&format!(
                    "\t{label:<width$}& {} \\\\\n",
                    format_general(m.mean_ns),
                    width = LABEL_WIDTH
                ));
            }
            out.push_str("\\end{tabular}\n");
        }
        ReportFormat::Text => {
            for m in &report.measurements {
                out.push_str(&format!("{}: {}\n", m.name, format_general(m.mean_ns)));
            }
        }
        ReportFormat::Json => {
            out = serde_json::to_string_pretty(report)?;
            out.push('\n');
        }
    }
    Ok(out)
}

/// Formats `value` in `%g` style with six significant digits.
pub fn format_general(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    if value == 0.0 {
        return if value.is_sign_negative() { "-0" } else { "0" }.to_string();
    }

    // Round to the target precision first; the exponent can shift (9.999996 -> 1e1).
    let sci = format!("{:.*e}", (SIGNIFICANT_DIGITS - 1) as usize, value);
    let (mantissa, exp) = match sci.split_once('e') {
        Some((m, e)) => (m, e.parse::<i32>().unwrap_or(0)),
        None => (sci.as_str(), 0),
    };

    if exp < -4 || exp >= SIGNIFICANT_DIGITS {
        let sign = if exp < 0 { '-' } else { '+' };
        format!("{}e{sign}{:02}", strip_fraction_zeros(mantissa), exp.abs())
    } else {
        let decimals = (SIGNIFICANT_DIGITS - 1 - exp) as usize;
        strip_fraction_zeros(&format!("{value:.decimals$}")).to_string()
    }
}

fn strip_fraction_zeros(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}

/// Opened report target.
///
/// Opening happens before any measuring so an unwritable path fails the
/// run immediately rather than after the benchmarks finish.
#[derive(Debug)]
pub enum Destination {
    File { path: PathBuf, file: File },
    Stdout,
}

impl Destination {
    /// Creates or truncates `path`; [`STDOUT`] selects standard output.
    pub fn open(path: &Path) -> Result<Self> {
        if path == Path::new(STDOUT) {
            return Ok(Destination::Stdout);
        }
        let file = File::create(path).map_err(|source| Error::Output {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Destination::File {
            path: path.to_path_buf(),
            file,
        })
    }

    pub fn write(self, contents: &str) -> Result<()> {
        match self {
            Destination::File { path, mut file } => {
                file.write_all(contents.as_bytes())
                    .and_then(|()| file.flush())
                    .map_err(|source| Error::Output {
                        path: path.clone(),
                        source,
                    })?;
                info!("report written to {}", path.display());
                Ok(())
            }
            Destination::Stdout => {
                let mut stdout = io::stdout().lock();
                stdout
                    .write_all(contents.as_bytes())
                    .and_then(|()| stdout.flush())
                    .map_err(|source| Error::Output {
                        path: PathBuf::from(STDOUT),
                        source,
                    })
            }
        }
    }
}

/// Writes `contents` to `dest`, creating or truncating it.
pub fn write_report(dest: &Path, contents: &str) -> Result<()> {
    Destination::open(dest)?.write(contents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::harness::Accumulation;
    use crate::schema::{Measurement, RunMeta, SCHEMA_VERSION};
    use crate::targets::Arity;
    use std::fs;
    use tempfile::tempdir;

    fn measurement(name: &str, arity: Arity, mean_ns: f64) -> Measurement {
        Measurement {
            name: name.to_string(),
            unit: "ns/call".to_string(),
            arity,
            trials: 4,
            total_ns: (mean_ns * 4.0) as u128,
            mean_ns,
        }
    }

    fn sample_report() -> BenchReport {
        BenchReport {
            run: RunMeta {
                schema_version: SCHEMA_VERSION,
                bench_version: "0.0.0-test".to_string(),
                profile: "quick".to_string(),
                trials: 4,
                seed: Some(1),
                accumulation: Accumulation::Streaming,
                timestamp_unix: 0,
                git_sha: None,
            },
            measurements: vec![
                measurement("sin", Arity::Unary, 21.375),
                measurement("asin", Arity::Unary, 30.0),
                measurement("mult", Arity::Binary, 17.123456789),
            ],
        }
    }

    #[test]
    fn test_format_general() {
        assert_eq!(format_general(21.375), "21.375");
        assert_eq!(format_general(17.123456789), "17.1235");
        assert_eq!(format_general(30.0), "30");
        assert_eq!(format_general(123456.7), "123457");
        assert_eq!(format_general(1234567.0), "1.23457e+06");
        assert_eq!(format_general(999999.5), "1e+06");
        assert_eq!(format_general(100_000_000.0), "1e+08");
        assert_eq!(format_general(0.0001), "0.0001");
        assert_eq!(format_general(0.00001234), "1.234e-05");
        assert_eq!(format_general(0.0), "0");
        assert_eq!(format_general(f64::NAN), "nan");
        assert_eq!(format_general(f64::INFINITY), "inf");
        assert_eq!(format_general(f64::NEG_INFINITY), "-inf");
    }

    #[test]
    fn test_render_latex() {
        let out = render(&sample_report(), ReportFormat::Latex).unwrap();
        assert_eq!(
            out,
            "\\begin{tabular}{l|c}\n\
             \tsin:     & 21.375 \\\\\n\
             \tasin:    & 30 \\\\\n\
             \tmult:    & 17.1235 \\\\\n\
             \\end{tabular}\n"
        );
    }

    #[test]
    fn test_render_text_keeps_order() {
        let out = render(&sample_report(), ReportFormat::Text).unwrap();
        assert_eq!(out, "sin: 21.375\nasin: 30\nmult: 17.1235\n");
    }

    #[test]
    fn test_render_json() {
        let out = render(&sample_report(), ReportFormat::Json).unwrap();
        let parsed: BenchReport = serde_json::from_str(&out).unwrap();

        assert_eq!(parsed.run.schema_version, SCHEMA_VERSION);
        assert_eq!(parsed.run.accumulation, Accumulation::Streaming);
        let names: Vec<&str> = parsed.measurements.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, ["sin", "asin", "mult"]);
        assert_eq!(parsed.measurements[2].arity, Arity::Binary);
        assert!(out.contains("\"accumulation\": \"streaming\""));
    }

    #[test]
    fn test_write_report_truncates() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("Benchmark.txt");

        write_report(&path, "a much longer first report\n").unwrap();
        write_report(&path, "short\n").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "short\n");
    }

    #[test]
    fn test_write_report_unwritable_destination() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing").join("Benchmark.txt");

        match write_report(&path, "x") {
            Err(Error::Output { path: p, .. }) => assert_eq!(p, path),
            other => panic!("expected output error, got {other:?}"),
        }
    }

    #[test]
    fn test_destination_opened_before_write() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("Benchmark.txt");
        fs::write(&path, "stale contents").unwrap();

        let dest = Destination::open(&path).unwrap();
        // Opening alone truncates, as the report is only written at the end.
        assert_eq!(fs::read_to_string(&path).unwrap(), "");

        dest.write("sin: 1\n").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "sin: 1\n");
    }

    #[test]
    fn test_stdout_destination() {
        assert!(matches!(
            Destination::open(Path::new(STDOUT)).unwrap(),
            Destination::Stdout
        ));
    }
}
