// Error types shared by every stage of the identification and tuning pipeline
// Copyright © 2025 Hs293Go
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the "Software"),
// to deal in the Software without restriction, including without limitation
// the rights to use, copy, modify, merge, publish, distribute, sublicense,
// and/or sell copies of the Software, and to permit persons to whom the
// Software is furnished to do so, subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included
// in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES
// OF MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT.
// IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM,
// DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION OF CONTRACT,
// TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION WITH THE SOFTWARE
// OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

use core::fmt;

use crate::identify::Method;
use crate::tuning::TuningRule;

/// The pipeline stage in which an error was raised.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Estimating (k, τ, θ) from recorded samples.
    Identification,
    /// Building the delay-augmented plant model.
    ModelBuilding,
    /// Simulating a step response.
    Simulation,
    /// Computing PID gains and the closed loop around them.
    Tuning,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Identification => "identification",
            Stage::ModelBuilding => "model building",
            Stage::Simulation => "simulation",
            Stage::Tuning => "tuning",
        };
        f.write_str(name)
    }
}

/// Errors produced by the identification, modelling and tuning pipeline.
///
/// All variants are terminal for the call that produced them; nothing in the pipeline is
/// retried. Results computed by earlier stages remain valid.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// Empty or mismatched sequences, non-finite values, or non-increasing time.
    #[error("invalid sample data: {reason}")]
    InvalidSamples {
        /// What was wrong with the samples
        reason: String,
    },

    /// The forward scan found no sample crossing the required fraction of the final value.
    #[error(
        "{method} identification: no output sample reaches {fraction} of the final value \
         (threshold {threshold})"
    )]
    ThresholdNotReached {
        /// Identification method in use
        method: Method,
        /// Fraction of the final output value that was searched for
        fraction: f64,
        /// Absolute output threshold that was searched for
        threshold: f64,
    },

    /// The mean of the step input is zero, so the process gain is undefined.
    #[error("degenerate gain: mean step amplitude is {step_mean}")]
    DegenerateGain {
        /// Mean of the step input series
        step_mean: f64,
    },

    /// τ <= 0 or θ < 0 (or either non-finite) was passed into model building.
    #[error("degenerate model: tau = {tau}, theta = {theta} (need tau > 0, theta >= 0)")]
    DegenerateModel {
        /// Time constant passed in
        tau: f64,
        /// Transport delay passed in
        theta: f64,
    },

    /// A tuning formula would divide by zero or leave its domain.
    #[error("{rule} tuning is undefined: {reason}")]
    TuningDomain {
        /// Tuning rule in use
        rule: TuningRule,
        /// Which parameter made the formula undefined
        reason: String,
    },

    /// The model to be simulated has poles in the right half plane.
    #[error("{stage}: model is unstable (largest pole real part {max_real_pole})")]
    UnstableModel {
        /// Stage that built the model
        stage: Stage,
        /// Largest real part among the model poles
        max_real_pole: f64,
    },

    /// Simulation produced a non-finite sample.
    #[error("{stage}: simulated response is not finite")]
    NonFiniteResponse {
        /// Stage that requested the simulation
        stage: Stage,
    },

    /// The response has a zero or non-finite final value, so its characteristics are undefined.
    #[error("{stage}: response characteristics undefined for final value {final_value}")]
    DegenerateResponse {
        /// Stage that requested the characteristics
        stage: Stage,
        /// Final value the characteristics would be relative to
        final_value: f64,
    },

    /// A simulation time grid was too short, non-finite or not strictly increasing.
    #[error("invalid time grid: {reason}")]
    InvalidTimeGrid {
        /// What was wrong with the grid
        reason: String,
    },

    /// A transfer function had an empty or all-zero denominator, or was improper.
    #[error("invalid transfer function: {reason}")]
    InvalidTransferFunction {
        /// What was wrong with the transfer function
        reason: String,
    },

    /// A selector name did not match any known method, mesh or tuning rule.
    #[error("unsupported {kind}: {value:?}")]
    UnsupportedConfiguration {
        /// Kind of selector being parsed
        kind: &'static str,
        /// The rejected name
        value: String,
    },
}

impl Error {
    /// The pipeline stage the error belongs to, or `None` for a rejected selector name.
    pub fn stage(&self) -> Option<Stage> {
        match self {
            Error::InvalidSamples { .. }
            | Error::ThresholdNotReached { .. }
            | Error::DegenerateGain { .. } => Some(Stage::Identification),
            Error::DegenerateModel { .. } => Some(Stage::ModelBuilding),
            Error::TuningDomain { .. } => Some(Stage::Tuning),
            Error::UnstableModel { stage, .. }
            | Error::NonFiniteResponse { stage }
            | Error::DegenerateResponse { stage, .. } => Some(*stage),
            Error::InvalidTimeGrid { .. } | Error::InvalidTransferFunction { .. } => {
                Some(Stage::Simulation)
            }
            Error::UnsupportedConfiguration { .. } => None,
        }
    }

    /// Re-attributes a stage-carrying error to `stage`.
    ///
    /// Lower-level helpers report [`Stage::Simulation`]; the pipeline stage that called them
    /// rewrites it so the caller sees where the pipeline stopped.
    pub fn at_stage(self, stage: Stage) -> Self {
        match self {
            Error::UnstableModel { max_real_pole, .. } => Error::UnstableModel {
                stage,
                max_real_pole,
            },
            Error::NonFiniteResponse { .. } => Error::NonFiniteResponse { stage },
            Error::DegenerateResponse { final_value, .. } => Error::DegenerateResponse {
                stage,
                final_value,
            },
            other => other,
        }
    }
}

/// Convenience alias for results of the pipeline.
pub type Result<T> = core::result::Result<T, Error>;
