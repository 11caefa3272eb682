//! Build result types.
//!
//! Contains types for representing the outcome of generation steps.

use std::path::PathBuf;
use std::time::Duration;

/// A generation step of a full run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    /// Animated front battle sprites
    Front,
    /// Still back battle sprites
    Back,
    /// Overworld follower sheets
    Overworld,
    /// Menu icons
    Icons,
}

impl Step {
    /// All steps in run order.
    pub const ALL: [Step; 4] = [Step::Front, Step::Back, Step::Overworld, Step::Icons];

    /// Lowercase step name used in progress output.
    pub fn name(self) -> &'static str {
        match self {
            Step::Front => "front",
            Step::Back => "back",
            Step::Overworld => "overworld",
            Step::Icons => "icons",
        }
    }
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Status of a single species within a step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildStatus {
    /// Outputs written
    Success,
    /// Nothing to generate (source asset absent)
    Skipped,
    /// Generation failed with error
    Failed(String),
}

impl BuildStatus {
    /// Check if the status indicates success.
    pub fn is_success(&self) -> bool {
        matches!(self, BuildStatus::Success | BuildStatus::Skipped)
    }

    /// Check if the status indicates failure.
    pub fn is_failure(&self) -> bool {
        matches!(self, BuildStatus::Failed(_))
    }

    /// Status name without the error message.
    pub fn name(&self) -> &'static str {
        match self {
            BuildStatus::Success => "success",
            BuildStatus::Skipped => "skipped",
            BuildStatus::Failed(_) => "failed",
        }
    }
}

impl std::fmt::Display for BuildStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BuildStatus::Failed(err) => write!(f, "failed: {}", err),
            status => f.write_str(status.name()),
        }
    }
}

/// Result of one step for one species.
#[derive(Debug, Clone)]
pub struct TargetResult {
    /// Species key
    pub species: String,
    /// Build status
    pub status: BuildStatus,
    /// Output files produced
    pub outputs: Vec<PathBuf>,
    /// Time spent on the species
    pub duration: Duration,
    /// Why the species was skipped
    pub reason: Option<String>,
}

impl TargetResult {
    /// Create a successful result.
    pub fn success(species: String, outputs: Vec<PathBuf>, duration: Duration) -> Self {
        Self { species, status: BuildStatus::Success, outputs, duration, reason: None }
    }

    /// Create a skipped result.
    pub fn skipped(species: String, reason: String, duration: Duration) -> Self {
        Self {
            species,
            status: BuildStatus::Skipped,
            outputs: vec![],
            duration,
            reason: Some(reason),
        }
    }

    /// Create a failed result.
    pub fn failed(species: String, error: String, duration: Duration) -> Self {
        Self { species, status: BuildStatus::Failed(error), outputs: vec![], duration, reason: None }
    }

    /// Check if this result is successful.
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}

/// Result of one step over all species.
#[derive(Debug, Clone)]
pub struct StepResult {
    /// Step that ran
    pub step: Step,
    /// Per-species results in species order
    pub targets: Vec<TargetResult>,
    /// Failures not tied to a species, such as a missing shared resource
    pub errors: Vec<String>,
    /// Step duration
    pub duration: Duration,
}

impl StepResult {
    /// Create an empty step result.
    pub fn new(step: Step) -> Self {
        Self { step, targets: Vec::new(), errors: Vec::new(), duration: Duration::ZERO }
    }

    /// Get the number of species with outputs written.
    pub fn success_count(&self) -> usize {
        self.targets.iter().filter(|r| matches!(r.status, BuildStatus::Success)).count()
    }

    /// Get the number of skipped species.
    pub fn skipped_count(&self) -> usize {
        self.targets.iter().filter(|r| matches!(r.status, BuildStatus::Skipped)).count()
    }

    /// Get the number of failed species.
    pub fn failed_count(&self) -> usize {
        self.targets.iter().filter(|r| r.status.is_failure()).count()
    }

    /// Check if no species failed and the step itself had no errors.
    pub fn is_success(&self) -> bool {
        self.failed_count() == 0 && self.errors.is_empty()
    }

    /// Get failed species results.
    pub fn failures(&self) -> Vec<&TargetResult> {
        self.targets.iter().filter(|r| r.status.is_failure()).collect()
    }

    /// Find the result of a species.
    pub fn target(&self, species: &str) -> Option<&TargetResult> {
        self.targets.iter().find(|r| r.species == species)
    }
}

/// Result of a complete run.
#[derive(Debug, Default)]
pub struct BuildResult {
    /// Results for each step that ran
    pub steps: Vec<StepResult>,
    /// Total build duration
    pub total_duration: Duration,
}

impl BuildResult {
    /// Create a new empty build result.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a step result.
    pub fn add_step(&mut self, result: StepResult) {
        self.steps.push(result);
    }

    /// Set the total duration.
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.total_duration = duration;
        self
    }

    /// Get the result of a step, if it ran.
    pub fn step(&self, step: Step) -> Option<&StepResult> {
        self.steps.iter().find(|s| s.step == step)
    }

    /// Get the number of successful species across all steps.
    pub fn success_count(&self) -> usize {
        self.steps.iter().map(StepResult::success_count).sum()
    }

    /// Get the number of skipped species across all steps.
    pub fn skipped_count(&self) -> usize {
        self.steps.iter().map(StepResult::skipped_count).sum()
    }

    /// Get the number of failed species across all steps.
    pub fn failed_count(&self) -> usize {
        self.steps.iter().map(StepResult::failed_count).sum()
    }

    /// Check if the overall build succeeded (no failures).
    pub fn is_success(&self) -> bool {
        self.steps.iter().all(StepResult::is_success)
    }

    /// Get all outputs produced.
    pub fn all_outputs(&self) -> Vec<&PathBuf> {
        self.steps.iter().flat_map(|s| s.targets.iter()).flat_map(|r| r.outputs.iter()).collect()
    }

    /// Get failed results together with their step.
    pub fn failures(&self) -> Vec<(Step, &TargetResult)> {
        self.steps
            .iter()
            .flat_map(|s| s.failures().into_iter().map(move |r| (s.step, r)))
            .collect()
    }

    /// Format a summary of the build result.
    pub fn summary(&self) -> String {
        let mut lines = Vec::new();

        let success = self.success_count();
        let skipped = self.skipped_count();
        let failed = self.failed_count();
        let total = success + skipped + failed;

        if !self.is_success() {
            lines.push(format!(
                "Build failed: {} succeeded, {} skipped, {} failed ({} total)",
                success, skipped, failed, total
            ));
            for (step, target) in self.failures() {
                lines.push(format!("  - {} {}: {}", step, target.species, target.status));
            }
            for step in &self.steps {
                for error in &step.errors {
                    lines.push(format!("  - {}: {}", step.step, error));
                }
            }
        } else {
            lines.push(format!(
                "Build succeeded: {} built, {} skipped ({} total) in {:?}",
                success, skipped, total, self.total_duration
            ));
        }

        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step_with(step: Step, targets: Vec<TargetResult>) -> StepResult {
        StepResult { step, targets, errors: Vec::new(), duration: Duration::ZERO }
    }

    #[test]
    fn test_step_display() {
        let names: Vec<String> = Step::ALL.iter().map(|s| s.to_string()).collect();
        assert_eq!(names, vec!["front", "back", "overworld", "icons"]);
    }

    #[test]
    fn test_build_status_display() {
        assert_eq!(BuildStatus::Success.to_string(), "success");
        assert_eq!(BuildStatus::Skipped.to_string(), "skipped");
        assert_eq!(BuildStatus::Failed("error".to_string()).to_string(), "failed: error");
        assert_eq!(BuildStatus::Failed("error".to_string()).name(), "failed");
    }

    #[test]
    fn test_build_status_is_success() {
        assert!(BuildStatus::Success.is_success());
        assert!(BuildStatus::Skipped.is_success());
        assert!(!BuildStatus::Failed("error".to_string()).is_success());
    }

    #[test]
    fn test_target_result_skipped_reason() {
        let result =
            TargetResult::skipped("pikachu".to_string(), "no front.png".to_string(), Duration::ZERO);
        assert!(result.is_success());
        assert_eq!(result.reason.as_deref(), Some("no front.png"));
    }

    #[test]
    fn test_target_result_failed() {
        let result = TargetResult::failed(
            "pikachu".to_string(),
            "unknown species".to_string(),
            Duration::from_millis(5),
        );
        assert!(!result.is_success());
        assert!(result.outputs.is_empty());
    }

    #[test]
    fn test_step_result_counts() {
        let step = step_with(
            Step::Front,
            vec![
                TargetResult::success("a".to_string(), vec![], Duration::ZERO),
                TargetResult::skipped("b".to_string(), "no front.png".to_string(), Duration::ZERO),
                TargetResult::failed("c".to_string(), "error".to_string(), Duration::ZERO),
            ],
        );

        assert_eq!(step.success_count(), 1);
        assert_eq!(step.skipped_count(), 1);
        assert_eq!(step.failed_count(), 1);
        assert!(!step.is_success());
        assert_eq!(step.target("c").map(|r| r.species.as_str()), Some("c"));
    }

    #[test]
    fn test_build_result_totals() {
        let mut result = BuildResult::new();
        result.add_step(step_with(
            Step::Front,
            vec![TargetResult::success(
                "a".to_string(),
                vec![PathBuf::from("1-front-n.gif"), PathBuf::from("1-front-s.gif")],
                Duration::ZERO,
            )],
        ));
        result.add_step(step_with(
            Step::Icons,
            vec![TargetResult::success("a".to_string(), vec![PathBuf::from("1-0.png")], Duration::ZERO)],
        ));

        assert_eq!(result.success_count(), 2);
        assert_eq!(result.all_outputs().len(), 3);
        assert!(result.is_success());
        assert!(result.step(Step::Icons).is_some());
        assert!(result.step(Step::Back).is_none());
    }

    #[test]
    fn test_build_result_summary_success() {
        let mut result = BuildResult::new();
        result.add_step(step_with(
            Step::Back,
            vec![TargetResult::success("a".to_string(), vec![], Duration::ZERO)],
        ));

        let summary = result.with_duration(Duration::from_millis(100)).summary();
        assert!(summary.contains("Build succeeded"));
        assert!(summary.contains("1 built"));
    }

    #[test]
    fn test_step_error_fails_build() {
        let mut step = step_with(
            Step::Overworld,
            vec![TargetResult::success("pikachu".to_string(), vec![], Duration::ZERO)],
        );
        step.errors.push("Missing resource: resources/atlasdata.txt".to_string());

        let mut result = BuildResult::new();
        result.add_step(step);
        assert_eq!(result.failed_count(), 0);
        assert!(!result.is_success());

        let summary = result.summary();
        assert!(summary.contains("Build failed: 1 succeeded"));
        assert!(summary.contains("  - overworld: Missing resource: resources/atlasdata.txt"));
    }

    #[test]
    fn test_build_result_summary_failure() {
        let mut result = BuildResult::new();
        result.add_step(step_with(
            Step::Overworld,
            vec![TargetResult::failed("unown_b".to_string(), "bad sheet".to_string(), Duration::ZERO)],
        ));

        let summary = result.summary();
        assert!(summary.contains("Build failed"));
        assert!(summary.contains("overworld unown_b: failed: bad sheet"));
        assert_eq!(result.failures().len(), 1);
    }
}
