//! Splits one input line into a program invocation.
//!
//! Tokenization is plain whitespace splitting; the only extra rule is the
//! background marker: a `&` ending the final token of the line marks the
//! whole invocation as background and is stripped before the argv is built.

use anyhow::{Result, bail};

/// Default ceiling for accepted input lines, in bytes.
pub const DEFAULT_MAX_LINE_LEN: usize = 4096;

/// A parsed input line: the program name with its arguments, plus the
/// background flag recovered from the stripped `&` marker.
///
/// An `Invocation` produced by [`tokenize`] always has a non-empty `argv`;
/// lines with nothing to run yield `None` instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub argv: Vec<String>,
    pub background: bool,
}

impl Invocation {
    /// The program name, i.e. `argv[0]`.
    pub fn name(&self) -> &str {
        &self.argv[0]
    }

    /// The arguments following the program name.
    pub fn args(&self) -> &[String] {
        &self.argv[1..]
    }
}

/// Tokenizes one line of input.
///
/// Lines longer than `max_len` bytes are rejected outright rather than
/// silently truncated. Empty and all-whitespace lines produce `Ok(None)`, as
/// does a line consisting solely of the background marker.
pub fn tokenize(line: &str, max_len: usize) -> Result<Option<Invocation>> {
    if line.len() > max_len {
        bail!("input line exceeds {max_len} bytes and was discarded");
    }

    let mut argv: Vec<String> = line.split_whitespace().map(str::to_owned).collect();

    let mut background = false;
    if let Some(last) = argv.last_mut() {
        if let Some(stripped) = last.strip_suffix('&') {
            background = true;
            if stripped.is_empty() {
                // the marker stood alone, it contributes no argument
                argv.pop();
            } else {
                *last = stripped.to_owned();
            }
        }
    }

    if argv.is_empty() {
        return Ok(None);
    }

    Ok(Some(Invocation { argv, background }))
}
