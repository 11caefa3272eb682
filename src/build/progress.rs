//! Build progress reporting.
//!
//! Each generation step reports when it starts, once per species directory,
//! and when it finishes. Reporters turn those events into console lines,
//! JSON lines, or callbacks.
//!
//! # Example
//!
//! ```ignore
//! use dexsprite::build::{ConsoleProgress, ProgressEvent, ProgressReporter, Step};
//!
//! let reporter = ConsoleProgress::new();
//! reporter.report(ProgressEvent::StepStarted { step: Step::Front, total_species: 251 });
//! ```

use crate::build::result::{BuildStatus, Step};
use serde_json::json;
use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Events that can be reported during a run.
#[derive(Debug, Clone, PartialEq)]
pub enum ProgressEvent {
    /// Run started
    BuildStarted {
        /// Number of steps selected
        steps: usize,
    },
    /// A step started
    StepStarted {
        /// Step
        step: Step,
        /// Number of species directories the step visits
        total_species: usize,
    },
    /// A step finished one species
    SpeciesCompleted {
        /// Step
        step: Step,
        /// Species key
        species: String,
        /// Outcome for the species
        status: BuildStatus,
        /// Duration in milliseconds
        duration_ms: u64,
    },
    /// A step finished all species
    StepCompleted {
        /// Step
        step: Step,
        /// Species with outputs written
        succeeded: usize,
        /// Species skipped
        skipped: usize,
        /// Species failed
        failed: usize,
        /// Duration in milliseconds
        duration_ms: u64,
    },
    /// Run completed
    BuildCompleted {
        /// Whether no species failed
        success: bool,
        /// Total duration in milliseconds
        duration_ms: u64,
        /// Successful species across steps
        succeeded: usize,
        /// Skipped species across steps
        skipped: usize,
        /// Failed species across steps
        failed: usize,
    },
}

impl ProgressEvent {
    /// Machine-readable form of the event.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            ProgressEvent::BuildStarted { steps } => {
                json!({ "event": "build_started", "steps": steps })
            }
            ProgressEvent::StepStarted { step, total_species } => json!({
                "event": "step_started",
                "step": step.name(),
                "total_species": total_species,
            }),
            ProgressEvent::SpeciesCompleted { step, species, status, duration_ms } => {
                let mut value = json!({
                    "event": "species_completed",
                    "step": step.name(),
                    "species": species,
                    "status": status.name(),
                    "duration_ms": duration_ms,
                });
                if let BuildStatus::Failed(err) = status {
                    value["error"] = json!(err);
                }
                value
            }
            ProgressEvent::StepCompleted { step, succeeded, skipped, failed, duration_ms } => json!({
                "event": "step_completed",
                "step": step.name(),
                "succeeded": succeeded,
                "skipped": skipped,
                "failed": failed,
                "duration_ms": duration_ms,
            }),
            ProgressEvent::BuildCompleted { success, duration_ms, succeeded, skipped, failed } => {
                json!({
                    "event": "build_completed",
                    "success": success,
                    "duration_ms": duration_ms,
                    "succeeded": succeeded,
                    "skipped": skipped,
                    "failed": failed,
                })
            }
        }
    }
}

/// Trait for progress reporters.
pub trait ProgressReporter: Send + Sync {
    /// Report a progress event.
    fn report(&self, event: ProgressEvent);

    /// Check if this reporter wants verbose output.
    fn is_verbose(&self) -> bool {
        false
    }
}

/// A progress reporter that discards all events.
#[derive(Debug, Default)]
pub struct NullProgress;

impl NullProgress {
    /// Create a new null progress reporter.
    pub fn new() -> Self {
        Self
    }
}

impl ProgressReporter for NullProgress {
    fn report(&self, _event: ProgressEvent) {}
}

/// A progress reporter that hands every event to a closure.
pub struct CallbackProgress<F> {
    callback: F,
}

impl<F> CallbackProgress<F>
where
    F: Fn(ProgressEvent) + Send + Sync,
{
    /// Wrap a callback.
    pub fn new(callback: F) -> Self {
        Self { callback }
    }
}

impl<F> std::fmt::Debug for CallbackProgress<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallbackProgress").finish()
    }
}

impl<F> ProgressReporter for CallbackProgress<F>
where
    F: Fn(ProgressEvent) + Send + Sync,
{
    fn report(&self, event: ProgressEvent) {
        (self.callback)(event)
    }
}

/// Console progress reporter with optional colors.
pub struct ConsoleProgress {
    /// Whether to use colors
    use_colors: bool,
    /// Whether to show skipped species
    verbose: bool,
    /// Species finished in the current step
    current: AtomicUsize,
    /// Species in the current step
    total: AtomicUsize,
    /// Output writer (for testing)
    output: Mutex<Box<dyn Write + Send>>,
}

impl std::fmt::Debug for ConsoleProgress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConsoleProgress")
            .field("use_colors", &self.use_colors)
            .field("verbose", &self.verbose)
            .field("current", &self.current)
            .field("total", &self.total)
            .finish()
    }
}

impl ConsoleProgress {
    /// Create a console progress reporter writing to stderr.
    ///
    /// Colors are enabled when stderr is a terminal.
    pub fn new() -> Self {
        Self {
            use_colors: atty::is(atty::Stream::Stderr),
            verbose: false,
            current: AtomicUsize::new(0),
            total: AtomicUsize::new(0),
            output: Mutex::new(Box::new(std::io::stderr())),
        }
    }

    /// Create a console progress reporter that writes to a custom output.
    pub fn with_output<W: Write + Send + 'static>(output: W) -> Self {
        Self {
            use_colors: false,
            verbose: false,
            current: AtomicUsize::new(0),
            total: AtomicUsize::new(0),
            output: Mutex::new(Box::new(output)),
        }
    }

    /// Set whether to use colors.
    pub fn with_colors(mut self, use_colors: bool) -> Self {
        self.use_colors = use_colors;
        self
    }

    /// Set verbose mode.
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    fn color(&self, text: &str, color: &str) -> String {
        if self.use_colors {
            format!("{}{}\x1b[0m", color, text)
        } else {
            text.to_string()
        }
    }

    fn green(&self, text: &str) -> String {
        self.color(text, "\x1b[32m")
    }

    fn yellow(&self, text: &str) -> String {
        self.color(text, "\x1b[33m")
    }

    fn red(&self, text: &str) -> String {
        self.color(text, "\x1b[31m")
    }

    fn cyan(&self, text: &str) -> String {
        self.color(text, "\x1b[36m")
    }

    fn bold(&self, text: &str) -> String {
        self.color(text, "\x1b[1m")
    }

    fn prefix(&self, step: Step) -> String {
        self.cyan(&format!("[{}]", step))
    }

    fn writeln(&self, line: &str) {
        if let Ok(mut output) = self.output.lock() {
            let _ = writeln!(output, "{}", line);
        }
    }
}

impl Default for ConsoleProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressReporter for ConsoleProgress {
    fn report(&self, event: ProgressEvent) {
        match event {
            ProgressEvent::BuildStarted { .. } => {}
            ProgressEvent::StepStarted { step, total_species } => {
                self.total.store(total_species, Ordering::SeqCst);
                self.current.store(0, Ordering::SeqCst);
                self.writeln(&format!(
                    "{} Processing {} species...",
                    self.prefix(step),
                    total_species
                ));
            }
            ProgressEvent::SpeciesCompleted { step, species, status, duration_ms } => {
                let current = self.current.fetch_add(1, Ordering::SeqCst) + 1;
                let total = self.total.load(Ordering::SeqCst);

                let status_str = match &status {
                    BuildStatus::Success => self.green("ok"),
                    BuildStatus::Skipped if !self.verbose => return,
                    BuildStatus::Skipped => self.yellow("skipped"),
                    BuildStatus::Failed(_) => self.red("FAILED"),
                };

                self.writeln(&format!(
                    "{} [{}/{}] {} {} ({})",
                    self.prefix(step),
                    current,
                    total,
                    status_str,
                    species,
                    format_duration(duration_ms)
                ));

                if let BuildStatus::Failed(err) = status {
                    self.writeln(&format!("        {}", self.red(&err)));
                }
            }
            ProgressEvent::StepCompleted { step, succeeded, skipped, failed, duration_ms } => {
                let failed_str = format!("{} failed", failed);
                self.writeln(&format!(
                    "{} {} written, {} skipped, {} in {}",
                    self.prefix(step),
                    succeeded,
                    skipped,
                    if failed > 0 { self.red(&failed_str) } else { failed_str },
                    format_duration(duration_ms)
                ));
            }
            ProgressEvent::BuildCompleted { success, duration_ms, succeeded, skipped, failed } => {
                let duration_str = format_duration(duration_ms);

                if success {
                    self.writeln(&format!(
                        "\n{} {} built, {} skipped in {}",
                        self.green("[done]"),
                        self.bold(&succeeded.to_string()),
                        skipped,
                        duration_str
                    ));
                } else {
                    self.writeln(&format!(
                        "\n{} Build failed: {} succeeded, {} skipped, {} {} in {}",
                        self.red("[error]"),
                        succeeded,
                        skipped,
                        failed,
                        if failed == 1 { "failure" } else { "failures" },
                        duration_str
                    ));
                }
            }
        }
    }

    fn is_verbose(&self) -> bool {
        self.verbose
    }
}

/// JSON progress reporter for machine-readable output.
///
/// Writes one JSON object per line.
pub struct JsonProgress {
    output: Mutex<Box<dyn Write + Send>>,
}

impl std::fmt::Debug for JsonProgress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonProgress").finish()
    }
}

impl JsonProgress {
    /// Create a new JSON progress reporter writing to stderr.
    pub fn new() -> Self {
        Self { output: Mutex::new(Box::new(std::io::stderr())) }
    }

    /// Create a JSON progress reporter that writes to a custom output.
    pub fn with_output<W: Write + Send + 'static>(output: W) -> Self {
        Self { output: Mutex::new(Box::new(output)) }
    }
}

impl Default for JsonProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressReporter for JsonProgress {
    fn report(&self, event: ProgressEvent) {
        if let Ok(mut output) = self.output.lock() {
            let _ = writeln!(output, "{}", event.to_json());
        }
    }
}

/// Format a duration in milliseconds to a human-readable string.
pub(crate) fn format_duration(ms: u64) -> String {
    if ms < 1000 {
        format!("{}ms", ms)
    } else if ms < 60_000 {
        format!("{:.1}s", ms as f64 / 1000.0)
    } else {
        let minutes = ms / 60_000;
        let seconds = (ms % 60_000) / 1000;
        format!("{}m {}s", minutes, seconds)
    }
}
