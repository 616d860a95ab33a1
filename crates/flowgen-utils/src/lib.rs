//! Utilities for reading and writing flow generation inputs and outputs.

#![warn(unreachable_pub, missing_debug_implementations, missing_docs)]

use std::fs::File;
use std::io::BufWriter;
use std::num::ParseFloatError;
use std::path::{Path, PathBuf};

use flowgen_core::cdf::CdfPoint;
use flowgen_core::flow::FlowRecord;
use ns3_frontend::{Job, ParseTraceError, TraceWriter};

/// Reads CDF control points from a text file with one `value percentile` pair per line.
///
/// The points are not validated as a CDF here; see [`flowgen_core::Cdf::new`].
pub fn read_cdf(path: impl AsRef<Path>) -> Result<Vec<CdfPoint>, Error> {
    let contents = std::fs::read_to_string(path)?;
    Ok(parse_cdf(&contents)?)
}

/// Parses CDF control points, one whitespace-separated `value percentile` pair per line. Blank
/// lines are skipped.
pub fn parse_cdf(s: &str) -> Result<Vec<CdfPoint>, ParseCdfError> {
    s.lines()
        .enumerate()
        .filter(|(_, l)| !l.trim().is_empty())
        .map(|(i, l)| {
            let line = i + 1;
            let fields = l.split_whitespace().collect::<Vec<_>>();
            if fields.len() != 2 {
                return Err(ParseCdfError::WrongNrFields {
                    line,
                    got: fields.len(),
                });
            }
            let parse = |field: &str| {
                field
                    .parse::<f64>()
                    .map_err(|source| ParseCdfError::ParseFloat { line, source })
            };
            Ok(CdfPoint::new(parse(fields[0])?, parse(fields[1])?))
        })
        .collect()
}

/// Writes `flows` as a trace to `path`, returning the number of flows written.
pub fn write_trace(
    path: impl AsRef<Path>,
    flows: impl IntoIterator<Item = FlowRecord>,
) -> Result<usize, Error> {
    let f = File::create(path)?;
    let mut writer = TraceWriter::new(BufWriter::new(f))?;
    let nr_flows = writer.write_all(flows)?;
    writer.finish()?;
    Ok(nr_flows)
}

/// Reads a trace written by [`write_trace`].
pub fn read_trace(path: impl AsRef<Path>) -> Result<Vec<FlowRecord>, Error> {
    let contents = std::fs::read_to_string(path)?;
    Ok(ns3_frontend::parse_trace(&contents)?)
}

/// Reads a list of batch [`Job`]s from a file in JSON or Dhall format.
pub fn read_jobs(path: impl AsRef<Path>) -> Result<Vec<Job>, Error> {
    let contents = std::fs::read_to_string(path.as_ref())?;
    let jobs: Vec<Job> = match path.as_ref().extension().and_then(|ext| ext.to_str()) {
        Some("json") => serde_json::from_str(&contents)?,
        Some("dhall") => serde_dhall::from_str(&contents).parse().map_err(Box::new)?,
        _ => return Err(Error::UnknownFileType(path.as_ref().into())),
    };
    Ok(jobs)
}

/// Error parsing a CDF file.
#[derive(Debug, thiserror::Error)]
pub enum ParseCdfError {
    /// A line does not hold exactly two numbers.
    #[error("line {line}: expected `value percentile`, got {got} fields")]
    WrongNrFields {
        /// 1-based line number.
        line: usize,
        /// Number of fields found.
        got: usize,
    },

    /// A field is not a number.
    #[error("line {line}: malformed number")]
    ParseFloat {
        /// 1-based line number.
        line: usize,
        /// The underlying error.
        source: ParseFloatError,
    },
}

/// Error kinds for inputs, outputs, and I/O.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Unknown file type.
    #[error("unknown file type: {0}")]
    UnknownFileType(PathBuf),

    /// Error deserializing Dhall.
    #[error("Dhall error")]
    Dhall(#[from] Box<serde_dhall::Error>),

    /// Error deserializing JSON.
    #[error("JSON error")]
    Json(#[from] serde_json::Error),

    /// Error parsing a CDF file.
    #[error("malformed CDF file")]
    ParseCdf(#[from] ParseCdfError),

    /// Error parsing a trace.
    #[error("malformed trace")]
    ParseTrace(#[from] ParseTraceError),

    /// I/O error.
    #[error("IO error")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use flowgen_core::{generate, testing};

    use super::*;

    #[test]
    fn parse_cdf_reads_pairs() -> anyhow::Result<()> {
        let points = parse_cdf("0 0\n10 50\n\n20.5   100\n")?;
        assert_eq!(
            points,
            vec![
                CdfPoint::new(0.0, 0.0),
                CdfPoint::new(10.0, 50.0),
                CdfPoint::new(20.5, 100.0)
            ]
        );
        Ok(())
    }

    #[test]
    fn parse_cdf_reports_line_numbers() {
        assert!(matches!(
            parse_cdf("0 0\n10\n20 100\n"),
            Err(ParseCdfError::WrongNrFields { line: 2, got: 1 })
        ));
        assert!(matches!(
            parse_cdf("0 0\n10 50 60\n"),
            Err(ParseCdfError::WrongNrFields { line: 2, got: 3 })
        ));
        assert!(matches!(
            parse_cdf("0 0\n\n1e3 x\n"),
            Err(ParseCdfError::ParseFloat { line: 3, .. })
        ));
    }

    #[test]
    fn trace_file_round_trip() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("traffic.csv");
        let flows = generate(testing::busy_spec(3, 31))?.collect::<Vec<_>>();
        let n = write_trace(&path, flows.iter().copied())?;
        assert_eq!(n, flows.len());
        assert_eq!(read_trace(&path)?, flows);
        Ok(())
    }

    #[test]
    fn read_cdf_from_file() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("cdf.txt");
        std::fs::write(&path, "0 0\n100 50\n200 100\n")?;
        assert_eq!(read_cdf(&path)?, testing::linear_cdf());
        Ok(())
    }

    #[test]
    fn read_jobs_from_json() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("jobs.json");
        std::fs::write(
            &path,
            r#"[{"config": "ns3_config/a.json", "args": ["20"]}, {"config": "b.json"}]"#,
        )?;
        let jobs = read_jobs(&path)?;
        assert_eq!(jobs.len(), 2);
        assert_eq!(jobs[0].config, PathBuf::from("ns3_config/a.json"));
        assert_eq!(jobs[0].args, vec!["20".to_owned()]);
        assert!(jobs[1].args.is_empty());
        Ok(())
    }

    #[test]
    fn read_jobs_rejects_unknown_extensions() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("jobs.yaml");
        std::fs::write(&path, "[]")?;
        assert!(matches!(read_jobs(&path), Err(Error::UnknownFileType(_))));
        Ok(())
    }
}
