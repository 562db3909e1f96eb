//! Parameters of a harness run, read from a whitespace-separated file.
//!
//! The file holds five numbers, in order:
//!
//! ```text
//! n_threads capacity lambda_1 lambda_2 n_snapshots
//! ```
//!
//! `lambda_1` and `lambda_2` are the mean delays, in milliseconds, between
//! consecutive writes and consecutive snapshots respectively.
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use thiserror::Error;

/// Largest accepted mean delay, in milliseconds: one hour.
pub const MAX_MEAN_MS: f64 = 3_600_000.0;

/// Errors that can occur while reading a parameters file.
#[derive(Debug, Error)]
pub enum ParamsError {
    #[error("I/O error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("missing required parameter: {0}")]
    Missing(&'static str),

    #[error("invalid value for {field}: {value:?}")]
    Invalid { field: &'static str, value: String },

    #[error("{0} must be positive")]
    NotPositive(&'static str),

    #[error("{field} must be at most {max} milliseconds")]
    TooLarge { field: &'static str, max: f64 },

    #[error("unexpected trailing input: {0:?}")]
    Trailing(String),
}

/// Workload parameters shared by every thread of a run.
#[derive(Clone, Debug, PartialEq)]
pub struct Params {
    /// Number of writer threads.
    pub n_threads: usize,
    /// Number of components of the snapshot object.
    pub capacity: usize,
    /// Mean delay between writes, in milliseconds.
    pub lambda_1: f64,
    /// Mean delay between snapshots, in milliseconds.
    pub lambda_2: f64,
    /// Number of snapshots taken by each reader thread.
    pub n_snapshots: usize,
}

impl Params {
    /// Reads parameters from the file at `path`.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ParamsError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| ParamsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        contents.parse()
    }
}

fn next<'a, T: FromStr>(
    tokens: &mut impl Iterator<Item = &'a str>,
    field: &'static str,
) -> Result<T, ParamsError> {
    let token = tokens.next().ok_or(ParamsError::Missing(field))?;
    token.parse().map_err(|_| ParamsError::Invalid {
        field,
        value: token.to_string(),
    })
}

fn positive_mean(value: f64, field: &'static str) -> Result<f64, ParamsError> {
    if value.is_nan() || value <= 0.0 {
        return Err(ParamsError::NotPositive(field));
    }
    if value > MAX_MEAN_MS {
        return Err(ParamsError::TooLarge {
            field,
            max: MAX_MEAN_MS,
        });
    }
    Ok(value)
}

impl FromStr for Params {
    type Err = ParamsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut tokens = s.split_whitespace();
        let params = Self {
            n_threads: next(&mut tokens, "n_threads")?,
            capacity: next(&mut tokens, "capacity")?,
            lambda_1: positive_mean(next(&mut tokens, "lambda_1")?, "lambda_1")?,
            lambda_2: positive_mean(next(&mut tokens, "lambda_2")?, "lambda_2")?,
            n_snapshots: next(&mut tokens, "n_snapshots")?,
        };
        if let Some(token) = tokens.next() {
            return Err(ParamsError::Trailing(token.to_string()));
        }
        Ok(params)
    }
}
