//! Multi-pass refinement and detection for one recording.

use std::borrow::Cow;

use tracing::debug;

use crate::audio::{AudioBuffer, reduce_to_mono};
use crate::clipper::{ClipPlan, IntervalSynthesizer};
use crate::config::Config;
use crate::detect::{
    CriticalPoint, CriticalPointCollector, DetectionInput, Detector, build_detectors,
};
use crate::error::{Error, Result};
use crate::separation::{Separator, build_separator};

/// Result of running the orchestrator over one buffer.
#[derive(Debug)]
pub struct PassOutcome {
    /// The bounded clip plan.
    pub plan: ClipPlan,
    /// Every accepted critical point, sorted by timestamp.
    pub points: Vec<CriticalPoint>,
    /// Detectors that were skipped, with the reason.
    pub failures: Vec<Error>,
    /// Separation passes that ran.
    pub passes_completed: u32,
    /// Duration of the analyzed buffer in milliseconds.
    pub duration_ms: f64,
}

/// Drives separation passes, then detection and synthesis on the final
/// buffer.
///
/// Holds no per-run state, so one orchestrator can be reused across
/// recordings.
pub struct PassOrchestrator {
    total_passes: u32,
    separator: Option<Box<dyn Separator>>,
    detectors: Vec<Box<dyn Detector>>,
    synthesizer: IntervalSynthesizer,
}

impl PassOrchestrator {
    /// Create an orchestrator with explicit collaborators.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigValidation`] if passes are requested without a
    /// separator.
    pub fn new(
        config: &Config,
        separator: Option<Box<dyn Separator>>,
        detectors: Vec<Box<dyn Detector>>,
    ) -> Result<Self> {
        let total_passes = config.separation.passes;
        if total_passes > 0 && separator.is_none() {
            return Err(Error::ConfigValidation {
                message: format!(
                    "{total_passes} separation pass(es) requested but no separator given"
                ),
            });
        }

        Ok(Self {
            total_passes,
            separator,
            detectors,
            synthesizer: IntervalSynthesizer::from_config(&config.synthesis),
        })
    }

    /// Create an orchestrator with the built-in separator and the detectors
    /// selected in configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if a detector selection does not resolve.
    pub fn from_config(config: &Config) -> Result<Self> {
        let separator = (config.separation.passes > 0).then(|| build_separator(&config.separation));
        Self::new(config, separator, build_detectors(config)?)
    }

    /// Register an additional detector.
    pub fn register(&mut self, detector: Box<dyn Detector>) {
        self.detectors.push(detector);
    }

    /// Number of separation passes each run performs.
    pub fn total_passes(&self) -> u32 {
        self.total_passes
    }

    /// Run every separation pass in order and return the final buffer.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SeparationPassFailure`] if the separator fails or
    /// returns a buffer of a different shape.
    pub fn refine<'a>(&self, input: &'a AudioBuffer) -> Result<Cow<'a, AudioBuffer>> {
        let mut current = Cow::Borrowed(input);
        let Some(separator) = self.separator.as_deref() else {
            return Ok(current);
        };

        for pass_index in 0..self.total_passes {
            let pass = pass_index + 1;
            debug!("Separation pass {pass}/{} using {}", self.total_passes, separator.name());

            let fail = |source| Error::SeparationPassFailure {
                pass,
                total_passes: self.total_passes,
                collaborator: separator.name().to_string(),
                source,
            };

            let next = separator.separate(&current).map_err(fail)?;
            if !same_shape(&current, &next) {
                return Err(fail(
                    format!(
                        "expected {} frame(s) x {} channel(s) at {} Hz, got {} x {} at {} Hz",
                        current.frames(),
                        current.channels(),
                        current.sample_rate(),
                        next.frames(),
                        next.channels(),
                        next.sample_rate()
                    )
                    .into(),
                ));
            }
            current = Cow::Owned(next);
        }

        Ok(current)
    }

    /// Refine the buffer, run every detector on the result, and synthesize
    /// a clip plan.
    ///
    /// # Errors
    ///
    /// Returns an error if a separation pass fails or the final buffer
    /// cannot be reduced to mono. Detector failures are reported in
    /// [`PassOutcome::failures`] instead.
    pub fn run(&self, input: &AudioBuffer) -> Result<PassOutcome> {
        let refined = self.refine(input)?;
        let mono = reduce_to_mono(&refined)?;
        let duration_ms = refined.duration_ms();

        let detection_input = DetectionInput {
            buffer: &refined,
            mono: &mono,
        };
        let mut collector = CriticalPointCollector::new(duration_ms);
        for detector in &self.detectors {
            collector.add(detector.tag(), detector.detect(&detection_input));
        }
        let collection = collector.finish();

        let plan = self.synthesizer.synthesize(&collection.points, duration_ms);
        debug!(
            "{} point(s) from {} detector(s), {} planned clip(s)",
            collection.points.len(),
            self.detectors.len(),
            plan.len()
        );

        Ok(PassOutcome {
            plan,
            points: collection.points,
            failures: collection.failures,
            passes_completed: self.total_passes,
            duration_ms,
        })
    }
}

fn same_shape(a: &AudioBuffer, b: &AudioBuffer) -> bool {
    a.frames() == b.frames() && a.channels() == b.channels() && a.sample_rate() == b.sample_rate()
}
