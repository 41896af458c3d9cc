//! Interactive batch input
//!
//! Collects multi-line batches from the user. Lines accumulate until a
//! blank line ends the batch; the exit keyword quits, or, with lines
//! pending, ends the batch so those lines are still processed.

use crate::{KoeError, Result};
use std::io::BufRead;
use std::sync::atomic::{AtomicBool, Ordering};

/// Keyword that ends the session
pub const EXIT_KEYWORD: &str = "exit";

/// Result of one round of batch collection
#[derive(Debug, PartialEq, Eq)]
pub enum Batch {
    /// Lines to synthesize, in entry order (never empty)
    Lines(Vec<String>),
    /// The user asked to quit with nothing pending
    Exit,
}

/// Read one batch of lines from `reader`
///
/// EOF behaves like the exit keyword. Returns `Interrupted` when the
/// flag was raised between lines.
pub fn read_batch(reader: &mut impl BufRead, interrupted: &AtomicBool) -> Result<Batch> {
    let mut lines: Vec<String> = Vec::new();

    loop {
        if interrupted.load(Ordering::SeqCst) {
            return Err(KoeError::Interrupted);
        }

        let mut line = String::new();
        let n = reader.read_line(&mut line)?;
        if n == 0 {
            return Ok(finish(lines));
        }

        let line = line.trim_end_matches(&['\r', '\n'][..]);
        if line.eq_ignore_ascii_case(EXIT_KEYWORD) {
            return Ok(finish(lines));
        }
        if line.is_empty() {
            if lines.is_empty() {
                // Nothing pending yet, keep waiting
                continue;
            }
            return Ok(Batch::Lines(lines));
        }
        lines.push(line.to_string());
    }
}

/// Exit if nothing is pending, otherwise flush the pending lines
fn finish(lines: Vec<String>) -> Batch {
    if lines.is_empty() {
        Batch::Exit
    } else {
        Batch::Lines(lines)
    }
}

/// Read a single trimmed response line, for yes/no and value prompts
pub fn read_response(reader: &mut impl BufRead) -> Result<String> {
    let mut line = String::new();
    reader.read_line(&mut line)?;
    Ok(line.trim().to_string())
}
