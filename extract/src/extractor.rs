//! Per-field metadata extraction with fallback chains.
//!
//! Each of the six manual fields has one operation, independently tolerant
//! of partial failure. The typed operations return
//! `Result<_, FieldError>` so callers can branch on the failure kind;
//! [`MetadataExtractor::extract`] is the absorbing boundary that renders
//! every failure into the field's sentinel string. Extraction never
//! panics and never propagates an error: the produced [`CommandMetadata`]
//! always has every field populated.

use std::time::Duration;

use tracing::{debug, info};

use crate::probe::{Probe, ProbeOutcome, ProbeOutput};
use command_manual_core::{
    Catalog, CommandMetadata, DOC_LINK_FAILED, EXAMPLE_TIMED_OUT, FieldError, NO_DOC_LINK,
    NO_EXAMPLE, NO_RELATED, RELATED_FAILED, SYNTAX_FAILED, VERSION_UNAVAILABLE,
};

/// Version flags tried in fixed order; the first zero exit wins.
pub const VERSION_FLAGS: [&str; 3] = ["--version", "-v", "-V"];

/// Number of leading help lines kept as the description.
pub const DESCRIPTION_LINE_LIMIT: usize = 3;

/// Time budget for canned example execution.
pub const EXAMPLE_TIMEOUT: Duration = Duration::from_secs(5);

/// Marker that introduces the documentation pointer in help output.
const DOC_MARKER: &str = "Full documentation";

/// Lines taken after a matched heading/marker (grep `-A 2` convention).
const FOLLOWING_LINES: usize = 2;

/// A canned example that was looked up and executed.
///
/// Exit status is carried in `output`; the caller branches on it. A
/// non-zero exit is still a successful lookup-and-run.
#[derive(Debug, Clone)]
pub struct ExampleRun {
    /// The invocation text from the catalog, verbatim.
    pub invocation: String,
    /// Captured output of running the invocation through the shell.
    pub output: ProbeOutput,
}

/// Derives the six manual fields for a command.
pub struct MetadataExtractor {
    probe: Probe,
    catalog: Catalog,
    example_timeout: Duration,
}

impl MetadataExtractor {
    /// Creates an extractor over the given catalog with a default probe.
    pub fn new(catalog: Catalog) -> Self {
        Self::with_probe(Probe::new(), catalog)
    }

    /// Creates an extractor with an explicit probe (tests inject a fake shell here).
    pub fn with_probe(probe: Probe, catalog: Catalog) -> Self {
        Self {
            probe,
            catalog,
            example_timeout: EXAMPLE_TIMEOUT,
        }
    }

    /// Overrides the example time budget.
    pub fn with_example_timeout(mut self, timeout: Duration) -> Self {
        self.example_timeout = timeout;
        self
    }

    /// Extracts all six fields, rendering every failure into its sentinel.
    pub fn extract(&self, command: &str) -> CommandMetadata {
        let metadata = CommandMetadata {
            name: command.to_string(),
            description: self.description_text(command),
            version: self.version_text(command),
            example: self.example_text(command),
            related: self.related_text(command),
            syntax: self.syntax_text(command),
            documentation_link: self.documentation_link_text(command),
        };
        info!(command, "extracted command metadata");
        metadata
    }

    /// First [`DESCRIPTION_LINE_LIMIT`] lines of `--help` output.
    ///
    /// No `-h` or manual-page fallback: a non-zero `--help` exit is
    /// reported as [`FieldError::NonZeroExit`] carrying stderr.
    pub fn description(&self, command: &str) -> Result<String, FieldError> {
        match self.probe.run(command, &["--help"]) {
            ProbeOutcome::Completed(output) if output.success() => Ok(output
                .stdout
                .trim()
                .lines()
                .take(DESCRIPTION_LINE_LIMIT)
                .collect::<Vec<_>>()
                .join("\n")),
            ProbeOutcome::Completed(output) => Err(FieldError::NonZeroExit {
                stderr: output.stderr.trim().to_string(),
            }),
            ProbeOutcome::TimedOut => Err(FieldError::TimedOut),
            ProbeOutcome::LaunchFailure(reason) => Err(FieldError::Launch(reason)),
        }
    }

    /// First line of output from the first version flag that exits zero.
    ///
    /// Tries [`VERSION_FLAGS`] in order. A launch failure aborts the chain
    /// (the executable is missing for every flag); exhausting all flags is
    /// a [`FieldError::LookupMiss`].
    pub fn version(&self, command: &str) -> Result<String, FieldError> {
        for flag in VERSION_FLAGS {
            match self.probe.run(command, &[flag]) {
                ProbeOutcome::Completed(output) if output.success() => {
                    let first_line = output.stdout.trim().lines().next().unwrap_or_default();
                    return Ok(first_line.to_string());
                }
                ProbeOutcome::Completed(_) => {
                    debug!(command, flag, "version flag rejected, trying next");
                }
                ProbeOutcome::TimedOut => return Err(FieldError::TimedOut),
                ProbeOutcome::LaunchFailure(reason) => return Err(FieldError::Launch(reason)),
            }
        }
        Err(FieldError::LookupMiss)
    }

    /// Looks up and executes the catalog's canned invocation for `command`.
    ///
    /// The invocation runs through the shell (examples use pipelines) under
    /// the example time budget. No catalog entry is a
    /// [`FieldError::LookupMiss`].
    pub fn example(&self, command: &str) -> Result<ExampleRun, FieldError> {
        let Some(invocation) = self.catalog.example_for(command) else {
            return Err(FieldError::LookupMiss);
        };

        match self.probe.run_shell_timed(invocation, self.example_timeout) {
            ProbeOutcome::Completed(output) => Ok(ExampleRun {
                invocation: invocation.to_string(),
                output,
            }),
            ProbeOutcome::TimedOut => Err(FieldError::TimedOut),
            ProbeOutcome::LaunchFailure(reason) => Err(FieldError::Launch(reason)),
        }
    }

    /// Commands sharing this command's name prefix, per shell completion.
    ///
    /// Queries `compgen -c` through the shell and filters out blank entries
    /// and the command's own name. The returned list may be empty.
    pub fn related(&self, command: &str) -> Result<Vec<String>, FieldError> {
        let script = format!("compgen -c -- {}", shell_quote(command));
        match self.probe.run_shell(&script) {
            ProbeOutcome::Completed(output) if output.success() => Ok(output
                .stdout
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty() && *line != command)
                .map(str::to_string)
                .collect()),
            ProbeOutcome::Completed(output) => Err(FieldError::NonZeroExit {
                stderr: output.stderr.trim().to_string(),
            }),
            ProbeOutcome::TimedOut => Err(FieldError::TimedOut),
            ProbeOutcome::LaunchFailure(reason) => Err(FieldError::Launch(reason)),
        }
    }

    /// SYNOPSIS block from the system manual page: the heading plus the
    /// next two lines, trimmed. A page without a SYNOPSIS heading is a
    /// [`FieldError::LookupMiss`].
    pub fn syntax(&self, command: &str) -> Result<String, FieldError> {
        match self.probe.run("man", &[command]) {
            ProbeOutcome::Completed(output) if output.success() => {
                section_block(&output.stdout, "SYNOPSIS").ok_or(FieldError::LookupMiss)
            }
            ProbeOutcome::Completed(output) => Err(FieldError::NonZeroExit {
                stderr: output.stderr.trim().to_string(),
            }),
            ProbeOutcome::TimedOut => Err(FieldError::TimedOut),
            ProbeOutcome::LaunchFailure(reason) => Err(FieldError::Launch(reason)),
        }
    }

    /// Lines following the "Full documentation" marker in `--help` output.
    ///
    /// Takes the marker line and the two lines after it, dropping blanks
    /// and the bare command name. The returned list is empty when the
    /// marker is absent or everything was filtered out.
    pub fn documentation_link(&self, command: &str) -> Result<Vec<String>, FieldError> {
        match self.probe.run(command, &["--help"]) {
            ProbeOutcome::Completed(output) if output.success() => {
                let lines: Vec<&str> = output.stdout.lines().collect();
                let Some(at) = lines.iter().position(|line| line.contains(DOC_MARKER)) else {
                    return Ok(Vec::new());
                };
                Ok(lines[at..]
                    .iter()
                    .take(1 + FOLLOWING_LINES)
                    .filter(|line| !line.trim().is_empty() && line.trim() != command)
                    .map(|line| (*line).to_string())
                    .collect())
            }
            ProbeOutcome::Completed(output) => Err(FieldError::NonZeroExit {
                stderr: output.stderr.trim().to_string(),
            }),
            ProbeOutcome::TimedOut => Err(FieldError::TimedOut),
            ProbeOutcome::LaunchFailure(reason) => Err(FieldError::Launch(reason)),
        }
    }

    fn description_text(&self, command: &str) -> String {
        match self.description(command) {
            Ok(text) => text,
            Err(FieldError::NonZeroExit { stderr }) => format!("Error occurred: {stderr}"),
            Err(e) => exception_text(&e),
        }
    }

    fn version_text(&self, command: &str) -> String {
        match self.version(command) {
            Ok(line) => line,
            Err(FieldError::LookupMiss) => VERSION_UNAVAILABLE.to_string(),
            Err(e) => exception_text(&e),
        }
    }

    fn example_text(&self, command: &str) -> String {
        match self.example(command) {
            Ok(run) if run.output.success() => format!(
                "EXAMPLE for {command}\n\t{}\n{}",
                run.invocation, run.output.stdout
            ),
            Ok(run) => format!(
                "Error running example for {command}\n\t{}\n{}",
                run.invocation, run.output.stderr
            ),
            Err(FieldError::LookupMiss) => NO_EXAMPLE.to_string(),
            Err(FieldError::TimedOut) => EXAMPLE_TIMED_OUT.to_string(),
            Err(e) => exception_text(&e),
        }
    }

    fn related_text(&self, command: &str) -> String {
        match self.related(command) {
            Ok(names) if names.is_empty() => NO_RELATED.to_string(),
            Ok(names) => names.join("\n"),
            Err(FieldError::Launch(_) | FieldError::NonZeroExit { .. }) => {
                RELATED_FAILED.to_string()
            }
            Err(e) => exception_text(&e),
        }
    }

    fn syntax_text(&self, command: &str) -> String {
        match self.syntax(command) {
            Ok(block) => block,
            Err(
                FieldError::Launch(_)
                | FieldError::NonZeroExit { .. }
                | FieldError::LookupMiss,
            ) => SYNTAX_FAILED.to_string(),
            Err(e) => exception_text(&e),
        }
    }

    fn documentation_link_text(&self, command: &str) -> String {
        match self.documentation_link(command) {
            Ok(lines) if lines.is_empty() => NO_DOC_LINK.to_string(),
            Ok(lines) => lines.join("\n"),
            Err(FieldError::Launch(_) | FieldError::NonZeroExit { .. }) => {
                DOC_LINK_FAILED.to_string()
            }
            Err(e) => exception_text(&e),
        }
    }
}

fn exception_text(error: &FieldError) -> String {
    format!("An exception occurred: {error}")
}

/// Finds `heading` at the start of a (possibly indented) line and returns
/// it plus the next [`FOLLOWING_LINES`] lines, trimmed as a block.
fn section_block(text: &str, heading: &str) -> Option<String> {
    let lines: Vec<&str> = text.lines().collect();
    let at = lines
        .iter()
        .position(|line| line.trim_start().starts_with(heading))?;
    let block = lines[at..].iter().take(1 + FOLLOWING_LINES).copied();
    Some(block.collect::<Vec<_>>().join("\n").trim().to_string())
}

/// Quotes a string for safe interpolation into a shell word.
fn shell_quote(word: &str) -> String {
    format!("'{}'", word.replace('\'', "'\\''"))
}
