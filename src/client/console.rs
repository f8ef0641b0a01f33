//! Line-oriented console client.

use std::io::{self, Write};

use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Stdin};

use crate::QuizError;
use crate::config::Endpoint;
use crate::protocol::Verdict;

use super::driver::{Frontend, Outcome, connect, drive};

/// Prints to `output` and reads one answer per line from `input`.
pub struct ConsoleFrontend<R, W> {
    input: R,
    output: W,
}

impl ConsoleFrontend<BufReader<Stdin>, io::Stdout> {
    pub fn stdio() -> Self {
        Self::new(BufReader::new(tokio::io::stdin()), io::stdout())
    }
}

impl<R, W> ConsoleFrontend<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_output(self) -> W {
        self.output
    }
}

impl<R, W> Frontend for ConsoleFrontend<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: Write + Send,
{
    fn question(&mut self, _number: usize, text: &str) -> io::Result<()> {
        writeln!(self.output, "{text}")
    }

    fn result(&mut self, _number: usize, verdict: Verdict) -> io::Result<()> {
        writeln!(self.output, "{verdict}")
    }

    fn score(&mut self, total: usize) -> io::Result<()> {
        writeln!(self.output, "Final Score: {total}")
    }

    fn error(&mut self, message: &str) -> io::Result<()> {
        writeln!(self.output, "ERROR: {message}")
    }

    fn disconnected(&mut self, reason: &str) -> io::Result<()> {
        writeln!(self.output, "{reason}")
    }

    async fn answer(&mut self) -> io::Result<Option<String>> {
        write!(self.output, "Your answer: ")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line).await? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }
}

/// Run the console client against `endpoint`.
pub async fn run(endpoint: &Endpoint) -> Result<Outcome, QuizError> {
    let stream = connect(endpoint).await?;
    println!("Connected to the Quiz Server.");

    let mut frontend = ConsoleFrontend::stdio();
    drive(stream, &mut frontend).await
}
