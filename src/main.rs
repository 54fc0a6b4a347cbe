use scrap::prelude::v1::*;
use log::info;
use std::env;
use std::fmt;
use std::fs::File;
use std::io::{self, BufReader};

use stackcalc::driver::{self, Config};
use stackcalc::OperatorMode;

type RuntimeResult<T> = Result<T, RuntimeError>;

/// Represents an error that can return an exit code.
trait ErrorWithExitCode {
    /// Returns an exit status for a given error;
    fn exit_code(&self) -> i32;
}

enum RuntimeError {
    FileUnreadable,
    Undefined(String),
}

impl fmt::Debug for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FileUnreadable => write!(f, "input file unreadable"),
            Self::Undefined(s) => write!(f, "{}", s),
        }
    }
}

impl ErrorWithExitCode for RuntimeError {
    fn exit_code(&self) -> i32 {
        match self {
            Self::FileUnreadable => 1,
            Self::Undefined(_) => 127,
        }
    }
}

impl fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", &self)
    }
}

fn evaluate_lines(in_file: &str, mode: &str) -> RuntimeResult<()> {
    let mode = mode
        .parse::<OperatorMode>()
        .map_err(RuntimeError::Undefined)?;
    let config = Config::new(mode);
    let stdout = io::stdout();

    let run_res = if in_file == "-" {
        driver::run(config, io::stdin().lock(), stdout.lock())
    } else {
        let f = File::open(in_file).map_err(|_| RuntimeError::FileUnreadable)?;
        driver::run(config, BufReader::new(f), stdout.lock())
    };
    let summary = run_res.map_err(|e| RuntimeError::Undefined(e.to_string()))?;

    info!(
        "evaluated {} lines, {} failed",
        summary.evaluated,
        summary.failed
    );
    Ok(())
}

fn main() {
    env_logger::init();

    let raw_args: Vec<String> = env::args().into_iter().collect::<Vec<String>>();
    let args = raw_args.iter().map(|a| a.as_str()).collect::<Vec<&str>>();

    let cmd = scrap::Cmd::new("stackcalc")
        .description("Evaluates one whitespace-separated infix integer expression per line.")
        .author("Nate Catelli <ncatelli@packetfire.org>")
        .version("0.1.0")
        .with_flag(
            scrap::Flag::expect_string(
                "in-file",
                "i",
                "an input path to read expressions from, - for stdin.",
            )
            .optional()
            .with_default("-".to_string()),
        )
        .with_flag(
            scrap::Flag::expect_string(
                "mode",
                "m",
                "operator classification, lenient or strict.",
            )
            .optional()
            .with_default("lenient".to_string()),
        )
        .with_handler(|(inf, mode)| evaluate_lines(&inf, &mode));

    let help_string = cmd.help();
    let eval_res = cmd
        .evaluate(&args[..])
        .map_err(|e| RuntimeError::Undefined(e.to_string()))
        .and_then(|flags| cmd.dispatch(flags));

    match eval_res {
        Ok(_) => (),
        Err(RuntimeError::FileUnreadable) => {
            println!("unknown input file\n{}", &help_string);
            std::process::exit(1)
        }

        Err(RuntimeError::Undefined(e)) => {
            println!("{}\n{}", e, &help_string);
            std::process::exit(RuntimeError::Undefined(e).exit_code())
        }
    }
}
