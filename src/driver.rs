use std::io::{self, BufRead, Read, Write};

use log::{debug, warn};

use crate::eval::Evaluator;
use crate::lexer::OperatorMode;

/// Maximum size of a single input line in bytes, including its terminator.
pub const MAX_INPUT_SIZE: usize = 4096;

/// Driver configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    pub mode: OperatorMode,
    pub max_input_size: usize,
}

impl Config {
    pub fn new(mode: OperatorMode) -> Self {
        Self {
            mode,
            max_input_size: MAX_INPUT_SIZE,
        }
    }

    pub fn with_max_input_size(mut self, max_input_size: usize) -> Self {
        self.max_input_size = max_input_size;
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(OperatorMode::default())
    }
}

/// Counts of the lines processed by a single call to `run`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub evaluated: usize,
    pub failed: usize,
}

/// Consumes input up to and including the next newline without buffering it.
fn discard_rest_of_line<R: BufRead>(input: &mut R) -> io::Result<()> {
    loop {
        let (done, used) = {
            let available = input.fill_buf()?;
            match available.iter().position(|&b| b == b'\n') {
                Some(idx) => (true, idx + 1),
                None => (available.is_empty(), available.len()),
            }
        };

        input.consume(used);
        if done {
            return Ok(());
        }
    }
}

/// Reads expressions line by line from `input` until end of input or an
/// empty line, echoing each line to `output` followed by either
/// `= <result>` or `ERROR: <message>`.
///
/// At most `max_input_size + 1` bytes of a line are ever buffered.
pub fn run<R, W>(config: Config, mut input: R, mut output: W) -> io::Result<Summary>
where
    R: BufRead,
    W: Write,
{
    let mut evaluator = Evaluator::new().with_mode(config.mode);
    let mut summary = Summary::default();
    let mut buf = Vec::new();
    let limit = (config.max_input_size as u64).saturating_add(1);

    loop {
        buf.clear();
        if (&mut input).take(limit).read_until(b'\n', &mut buf)? == 0 {
            break;
        }

        if buf.len() > config.max_input_size {
            if buf.last() != Some(&b'\n') {
                discard_rest_of_line(&mut input)?;
            }

            warn!("rejected line over {} bytes", config.max_input_size);
            summary.evaluated += 1;
            summary.failed += 1;
            writeln!(
                output,
                "ERROR: input exceeds {} bytes",
                config.max_input_size
            )?;
            continue;
        }

        let raw = match buf.as_slice() {
            [line @ .., b'\r', b'\n'] | [line @ .., b'\n'] => line,
            line => line,
        };
        if raw.is_empty() {
            break;
        }

        summary.evaluated += 1;
        let expr = match std::str::from_utf8(raw) {
            Ok(expr) => expr,
            Err(e) => {
                warn!("rejected line: {}", e);
                summary.failed += 1;
                writeln!(output, "ERROR: input is not valid UTF-8")?;
                continue;
            }
        };

        writeln!(output, "{}", expr)?;

        match evaluator.evaluate_line(expr) {
            Ok(result) => {
                debug!("{} = {}", expr, result);
                writeln!(output, "= {}", result)?;
            }
            Err(e) => {
                warn!("{}: {:?}", expr, e);
                summary.failed += 1;
                writeln!(output, "ERROR: {}", e)?;
            }
        }
    }

    output.flush()?;
    Ok(summary)
}
