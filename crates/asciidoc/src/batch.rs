//! Parallel conversion of many documents.

use crate::convert::convert;
use mdadoc_core::{ConversionOptions, ConvertError};
use rayon::prelude::*;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Instant;

/// A single document to convert.
#[derive(Debug, Clone)]
pub struct BatchInput {
    /// Document identifier (typically the file path).
    pub id: String,
    /// Markdown source.
    pub source: String,
}

/// Options for batch conversion.
#[derive(Debug, Clone, Default)]
pub struct BatchOptions {
    /// Maximum number of threads to use. Defaults to the rayon global pool.
    pub max_threads: Option<usize>,
    /// Whether to keep converting after a failure. Defaults to true.
    pub continue_on_error: Option<bool>,
}

/// Result for a single document in a batch.
#[derive(Debug, Clone)]
pub struct BatchResult {
    /// Identifier matching the input.
    pub id: String,
    /// AsciiDoc output or the conversion error.
    pub output: Result<String, ConvertError>,
}

/// Statistics for a batch run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchStats {
    /// Number of documents processed.
    pub total: u32,
    /// Number of successful conversions.
    pub succeeded: u32,
    /// Number of failed conversions.
    pub failed: u32,
    /// Wall-clock processing time in milliseconds.
    pub processing_time_ms: f64,
}

/// Results in input order plus statistics.
#[derive(Debug, Clone)]
pub struct BatchOutcome {
    /// One entry per processed input.
    pub results: Vec<BatchResult>,
    /// Processing statistics.
    pub stats: BatchStats,
}

/// Converts every input with the same options.
///
/// Options are validated once up front. With `continue_on_error` disabled,
/// inputs are converted in order and processing stops after the first
/// failure; the failing result is the last one returned. Once the options
/// are valid, a document can only fail in the parser, which rejects nothing
/// in the CommonMark and GFM constructs enabled here, so in practice every
/// input is converted either way.
pub fn convert_batch(
    inputs: Vec<BatchInput>,
    options: &ConversionOptions,
    batch: &BatchOptions,
) -> Result<BatchOutcome, ConvertError> {
    options.validate()?;

    let start = Instant::now();
    let continue_on_error = batch.continue_on_error.unwrap_or(true);

    let pool = batch.max_threads.and_then(|threads| {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()
            .ok()
    });

    let total = u32::try_from(inputs.len()).unwrap_or(u32::MAX);
    let succeeded = AtomicU32::new(0);
    let failed = AtomicU32::new(0);

    let process_input = |input: BatchInput| -> BatchResult {
        let output = convert(&input.source, options);
        match &output {
            Ok(_) => succeeded.fetch_add(1, Ordering::Relaxed),
            Err(err) => {
                log::debug!("Conversion of `{}` failed: {err}", input.id);
                failed.fetch_add(1, Ordering::Relaxed)
            }
        };
        BatchResult {
            id: input.id,
            output,
        }
    };

    let results: Vec<BatchResult> = if continue_on_error {
        match pool {
            Some(pool) => pool.install(|| inputs.into_par_iter().map(process_input).collect()),
            None => inputs.into_par_iter().map(process_input).collect(),
        }
    } else {
        let sequential = || {
            let mut results = Vec::with_capacity(inputs.len());
            for input in inputs {
                let result = process_input(input);
                let stop = result.output.is_err();
                results.push(result);
                if stop {
                    break;
                }
            }
            results
        };
        match pool {
            Some(pool) => pool.install(sequential),
            None => sequential(),
        }
    };

    let elapsed = start.elapsed();

    Ok(BatchOutcome {
        results,
        stats: BatchStats {
            total,
            succeeded: succeeded.load(Ordering::Relaxed),
            failed: failed.load(Ordering::Relaxed),
            processing_time_ms: elapsed.as_secs_f64() * 1000.0,
        },
    })
}
