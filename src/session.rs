// Immutable analysis context chaining identification, modelling and tuning
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

use crate::config::AnalysisConfig;
use crate::error::Result;
use crate::identify::{self, Identification, Method};
use crate::model::{self, Mesh, ModelFit};
use crate::samples::SampleSeries;
use crate::tuning::{self, PidDesign, TuningRule};

/// An identification method together with its open-loop model fit.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodResult {
    /// Identified parameters.
    pub identification: Identification,
    /// Open-loop model fitted against the recorded output.
    pub fit: ModelFit,
}

/// Both identification methods applied to the same recording.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodComparison {
    /// Smith result.
    pub smith: MethodResult,
    /// Sundaresan result.
    pub sundaresan: MethodResult,
}

impl MethodComparison {
    /// The method whose open-loop model has the lower fit error. Ties go to Sundaresan.
    pub fn best_method(&self) -> Method {
        if self.smith.fit.fit_error < self.sundaresan.fit.fit_error {
            Method::Smith
        } else {
            Method::Sundaresan
        }
    }

    /// The result of the best-fitting method.
    pub fn best(&self) -> &MethodResult {
        self.get(self.best_method())
    }

    /// The result of `method`.
    pub fn get(&self, method: Method) -> &MethodResult {
        match method {
            Method::Smith => &self.smith,
            Method::Sundaresan => &self.sundaresan,
        }
    }
}

/// The same identified plant built as an open and as a closed loop.
#[derive(Debug, Clone, PartialEq)]
pub struct LoopComparison {
    /// Parameters both models were built from.
    pub identification: Identification,
    /// Open-loop model.
    pub open: ModelFit,
    /// Closed-loop model.
    pub closed: ModelFit,
}

impl LoopComparison {
    /// The mesh with the shorter rise time, or `None` if either rise time is unavailable.
    /// Ties go to the closed loop.
    pub fn faster_rise(&self) -> Option<Mesh> {
        let open = self.open.info.rise_time?;
        let closed = self.closed.info.rise_time?;
        Some(if open < closed { Mesh::Open } else { Mesh::Closed })
    }

    /// The mesh with the shorter settling time, or `None` if either settling time is
    /// unavailable. Ties go to the closed loop.
    pub fn faster_settling(&self) -> Option<Mesh> {
        let open = self.open.info.settling_time?;
        let closed = self.closed.info.settling_time?;
        Some(if open < closed { Mesh::Open } else { Mesh::Closed })
    }

    /// The mesh reaching the higher peak. Ties go to the closed loop.
    pub fn higher_peak(&self) -> Mesh {
        if self.open.info.peak > self.closed.info.peak {
            Mesh::Open
        } else {
            Mesh::Closed
        }
    }
}

/// A recording plus the settings every pipeline stage runs with.
///
/// The session holds no mutable state: each method recomputes its results from the
/// recording, so a `Session` can be shared freely between readers.
#[derive(Debug, Clone, Copy)]
pub struct Session<'a> {
    samples: SampleSeries<'a>,
    config: AnalysisConfig,
}

impl<'a> Session<'a> {
    /// Creates a session with the default configuration.
    pub fn new(samples: SampleSeries<'a>) -> Self {
        Self::with_config(samples, AnalysisConfig::default())
    }

    /// Creates a session with a custom configuration.
    pub fn with_config(samples: SampleSeries<'a>, config: AnalysisConfig) -> Self {
        Self { samples, config }
    }

    /// The recording under analysis.
    pub fn samples(&self) -> &SampleSeries<'a> {
        &self.samples
    }

    /// The configuration in use.
    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Identifies the plant with `method`.
    pub fn identify(&self, method: Method) -> Result<Identification> {
        identify::identify_series(&self.samples, method)
    }

    /// Builds and simulates the model for `identification` in `mesh`.
    pub fn fit(&self, identification: &Identification, mesh: Mesh) -> Result<ModelFit> {
        model::build_and_simulate_with(
            &self.samples,
            identification.k,
            identification.tau,
            identification.theta,
            mesh,
            &self.config,
        )
    }

    /// Identifies with `method` and fits the open-loop model.
    pub fn evaluate_method(&self, method: Method) -> Result<MethodResult> {
        let identification = self.identify(method)?;
        let fit = self.fit(&identification, Mesh::Open)?;
        Ok(MethodResult {
            identification,
            fit,
        })
    }

    /// Runs both identification methods and fits their open-loop models.
    ///
    /// # Errors
    /// The first error of either method; a method that cannot be applied leaves nothing to
    /// compare against.
    pub fn compare_methods(&self) -> Result<MethodComparison> {
        let comparison = MethodComparison {
            smith: self.evaluate_method(Method::Smith)?,
            sundaresan: self.evaluate_method(Method::Sundaresan)?,
        };
        log::debug!(
            "fit error Smith {:.6}, Sundaresan {:.6}: {} fits better",
            comparison.smith.fit.fit_error,
            comparison.sundaresan.fit.fit_error,
            comparison.best_method()
        );
        Ok(comparison)
    }

    /// Builds the plant identified by `method` both as an open and a closed loop.
    pub fn compare_loops(&self, method: Method) -> Result<LoopComparison> {
        let identification = self.identify(method)?;
        Ok(LoopComparison {
            open: self.fit(&identification, Mesh::Open)?,
            closed: self.fit(&identification, Mesh::Closed)?,
            identification,
        })
    }

    /// Designs a controller for the plant identified by `method` with `rule`.
    pub fn design_controller(&self, method: Method, rule: TuningRule) -> Result<Option<PidDesign>> {
        let identification = self.identify(method)?;
        let open = self.fit(&identification, Mesh::Open)?;
        self.design_for(&identification, &open, rule)
    }

    /// Designs one controller per rule for the plant identified by `method`.
    ///
    /// Identification and the open-loop model are computed once and shared. Each rule gets its
    /// own outcome, so a rule outside its domain does not hide the others.
    ///
    /// # Errors
    /// The outer error reports a failure to identify or model the plant.
    pub fn design_controllers(
        &self,
        method: Method,
        rules: &[TuningRule],
    ) -> Result<Vec<Result<Option<PidDesign>>>> {
        let identification = self.identify(method)?;
        let open = self.fit(&identification, Mesh::Open)?;
        Ok(rules
            .iter()
            .map(|rule| self.design_for(&identification, &open, *rule))
            .collect())
    }

    fn design_for(
        &self,
        identification: &Identification,
        open: &ModelFit,
        rule: TuningRule,
    ) -> Result<Option<PidDesign>> {
        tuning::tune_and_simulate_with(
            identification.k,
            identification.tau,
            identification.theta,
            &open.model,
            open.step_amplitude,
            rule,
            &self.config,
        )
    }
}
