// Delay-augmented plant models and their fit against recorded data
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
use core::str::FromStr;

use crate::config::AnalysisConfig;
use crate::delay;
use crate::error::{Error, Result, Stage};
use crate::samples::SampleSeries;
use crate::sim::{self, StepInfo};
use crate::tf::TransferFunction;

/// Loop configuration of the identified plant.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Mesh {
    /// The bare plant `k / (τs + 1)`.
    Open,
    /// The plant inside a unity negative feedback loop, `G / (1 + G)`.
    Closed,
}

impl Mesh {
    /// Whether the plant is wrapped in unity feedback.
    pub fn has_feedback(&self) -> bool {
        matches!(self, Mesh::Closed)
    }
}

impl fmt::Display for Mesh {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mesh::Open => f.write_str("open loop"),
            Mesh::Closed => f.write_str("closed loop"),
        }
    }
}

impl FromStr for Mesh {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "open" | "opened" | "open loop" => Ok(Mesh::Open),
            "closed" | "closed loop" => Ok(Mesh::Closed),
            _ => Err(Error::UnsupportedConfiguration {
                kind: "mesh",
                value: s.to_owned(),
            }),
        }
    }
}

/// A plant model simulated against a recording.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelFit {
    /// Loop configuration the model was built for.
    pub mesh: Mesh,

    /// RMS deviation of the simulated response from the reference series: the process output
    /// for [`Mesh::Open`], the step input for [`Mesh::Closed`].
    pub fit_error: f64,

    /// The delay-augmented model, unscaled by the step amplitude.
    pub model: TransferFunction,

    /// Instants of the simulated response, identical to the recording's time series.
    pub response_time: Vec<f64>,

    /// Response of `model × step_amplitude` at `response_time`.
    pub response_output: Vec<f64>,

    /// Characteristics of the unscaled model's unit step response.
    pub info: StepInfo,

    /// Mean of the step input used to scale the model.
    pub step_amplitude: f64,
}

/// Builds the FOPDT model `(G or G/(1+G)) · Padé(θ)` with `G = k / (τs + 1)`.
///
/// # Errors
/// - [`Error::DegenerateModel`] if τ <= 0, θ < 0, or any parameter is not finite.
pub fn plant_model(
    k: f64,
    tau: f64,
    theta: f64,
    mesh: Mesh,
    config: &AnalysisConfig,
) -> Result<TransferFunction> {
    if !(tau > 0.0 && tau.is_finite() && theta >= 0.0 && theta.is_finite() && k.is_finite()) {
        return Err(Error::DegenerateModel { tau, theta });
    }
    let plant = TransferFunction::first_order(k, tau)?;
    let plant = if mesh.has_feedback() {
        plant.feedback()?
    } else {
        plant
    };
    let delay = delay::pade(theta, config.pade_order())?;
    Ok(plant.series(&delay))
}

/// Builds the plant model for `(k, τ, θ)`, simulates it on the recording's time grid, and
/// measures the fit. Uses the default [`AnalysisConfig`].
pub fn build_and_simulate(
    step: &[f64],
    time: &[f64],
    output: &[f64],
    k: f64,
    tau: f64,
    theta: f64,
    mesh: Mesh,
) -> Result<ModelFit> {
    let samples = SampleSeries::new(time, step, output)?;
    build_and_simulate_with(&samples, k, tau, theta, mesh, &AnalysisConfig::default())
}

/// Builds the plant model for `(k, τ, θ)`, simulates it on the recording's time grid, and
/// measures the fit.
///
/// The response is that of `model × mean(step)` evaluated exactly at each recorded instant.
/// Open-loop models are compared against the recorded output; closed-loop models against the
/// step input, i.e. as a tracking error. Characteristics are computed on the unscaled model,
/// so the peak is per unit of step amplitude.
///
/// # Errors
/// - [`Error::DegenerateModel`] for invalid `(τ, θ)`.
/// - [`Error::UnstableModel`] if the model has right-half-plane poles (e.g. closed loop with
///   `k < −1`).
/// - [`Error::NonFiniteResponse`] / [`Error::DegenerateResponse`] from the simulation.
pub fn build_and_simulate_with(
    samples: &SampleSeries<'_>,
    k: f64,
    tau: f64,
    theta: f64,
    mesh: Mesh,
    config: &AnalysisConfig,
) -> Result<ModelFit> {
    let model = plant_model(k, tau, theta, mesh, config)?;
    sim::ensure_stable(&model, Stage::ModelBuilding)?;

    let step_amplitude = samples.step_amplitude();
    let scaled = &model * step_amplitude;
    let response_output = sim::step_response(&scaled, samples.time(), 1.0)
        .map_err(|e| e.at_stage(Stage::ModelBuilding))?;

    let reference = match mesh {
        Mesh::Open => samples.output(),
        Mesh::Closed => samples.step(),
    };
    let fit_error = sim::rms_error(&response_output, reference)?;

    let (_, _, info) =
        sim::step_info(&model, config).map_err(|e| e.at_stage(Stage::ModelBuilding))?;

    log::debug!(
        "{} model k = {:.4}, tau = {:.4}, theta = {:.4}: fit error {:.6}",
        mesh,
        k,
        tau,
        theta,
        fit_error
    );

    Ok(ModelFit {
        mesh,
        fit_error,
        model,
        response_time: samples.time().to_vec(),
        response_output,
        info,
        step_amplitude,
    })
}
