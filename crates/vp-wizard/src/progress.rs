use std::time::Duration;

pub const DEFAULT_GENERATION_TOTAL: Duration = Duration::from_millis(13_000);
pub const DEFAULT_TICK: Duration = Duration::from_millis(200);
pub const DEFAULT_FINALIZE_DELAY: Duration = Duration::from_millis(10_500);

/// Simulated generation timing: progress is a pure function of elapsed time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressModel {
    pub total: Duration,
    pub tick: Duration,
    pub finalize_delay: Duration,
}

impl Default for ProgressModel {
    fn default() -> Self {
        Self {
            total: DEFAULT_GENERATION_TOTAL,
            tick: DEFAULT_TICK,
            finalize_delay: DEFAULT_FINALIZE_DELAY,
        }
    }
}

impl ProgressModel {
    pub fn percent_at(&self, elapsed: Duration) -> f32 {
        if self.total.is_zero() || elapsed >= self.total {
            return 100.0;
        }
        let fraction = elapsed.as_secs_f64() / self.total.as_secs_f64();
        (fraction * 100.0).min(100.0) as f32
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressStage {
    AnalyzingReference,
    ProcessingPrompt,
    ApplyingMagic,
    Finalizing,
}

impl ProgressStage {
    pub fn from_percent(percent: f32) -> Self {
        if percent < 30.0 {
            ProgressStage::AnalyzingReference
        } else if percent < 60.0 {
            ProgressStage::ProcessingPrompt
        } else if percent < 90.0 {
            ProgressStage::ApplyingMagic
        } else {
            ProgressStage::Finalizing
        }
    }

    pub fn caption(self) -> &'static str {
        match self {
            ProgressStage::AnalyzingReference => "Analyzing reference image...",
            ProgressStage::ProcessingPrompt => "Processing your prompt...",
            ProgressStage::ApplyingMagic => "Applying AI magic...",
            ProgressStage::Finalizing => "Finalizing generation...",
        }
    }
}
