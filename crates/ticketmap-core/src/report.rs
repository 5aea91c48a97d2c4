use std::io::{self, Write};

/// `tracing` target for user-facing output. Console log layers should filter it out; file
/// layers keep it so the log carries a full transcript.
pub const OUTPUT_TARGET: &str = "ticketmap::output";

const RULE_WIDTH: usize = 80;

/// User-facing output channel with a quiet switch.
///
/// This is passed explicitly to whatever prints user-facing text; there is no global quiet flag.
#[derive(Debug)]
pub struct Reporter<W = io::Stdout> {
    sink: W,
    quiet: bool,
}

impl Reporter<io::Stdout> {
    pub fn stdout(quiet: bool) -> Self {
        Self::new(io::stdout(), quiet)
    }
}

impl<W: Write> Reporter<W> {
    pub fn new(sink: W, quiet: bool) -> Self {
        Self { sink, quiet }
    }

    /// Writes one line to the sink unless quiet. Non-empty lines are always logged.
    pub fn line(&mut self, message: impl AsRef<str>) -> io::Result<()> {
        let message = message.as_ref();
        if !message.is_empty() {
            tracing::info!(target: OUTPUT_TARGET, "OUTPUT: {message}");
        }
        if self.quiet {
            return Ok(());
        }
        writeln!(self.sink, "{message}")
    }

    pub fn blank(&mut self) -> io::Result<()> {
        self.line("")
    }

    pub fn rule(&mut self) -> io::Result<()> {
        self.line("=".repeat(RULE_WIDTH))
    }

    pub fn into_inner(self) -> W {
        self.sink
    }
}
