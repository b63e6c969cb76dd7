//! Operator pauses between demo phases.

use std::io::{self, BufRead, Write};

use log::info;

use crate::AirSimError;

/// Blocks until the operator lets the demo continue.
pub trait Prompt {
    /// Shows `message` and waits.
    fn wait(&mut self, message: &str) -> Result<(), AirSimError>;
}

/// Prints the message and waits for a line on stdin.
///
/// Line-buffered terminals deliver input on Enter, so "any key" in practice means Enter.
#[derive(Debug, Default)]
pub struct ConsolePrompt;

impl Prompt for ConsolePrompt {
    fn wait(&mut self, message: &str) -> Result<(), AirSimError> {
        let stdin = io::stdin();
        wait_for_line(message, &mut stdin.lock(), &mut io::stdout())
    }
}

/// Logs the message and continues immediately. For unattended runs.
#[derive(Debug, Default)]
pub struct NoWait;

impl Prompt for NoWait {
    fn wait(&mut self, message: &str) -> Result<(), AirSimError> {
        info!("{} (skipped)", message);
        Ok(())
    }
}

fn wait_for_line<R: BufRead, W: Write>(
    message: &str,
    input: &mut R,
    output: &mut W,
) -> Result<(), AirSimError> {
    writeln!(output, "{}", message)?;
    output.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Err(AirSimError::Io(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "input closed while waiting for key press",
        )));
    }
    Ok(())
}
