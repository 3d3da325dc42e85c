// Validated analysis configuration
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

use crate::delay::DEFAULT_PADE_ORDER;

/// Highest supported Padé order. Beyond this the companion-form coefficients span too many
/// orders of magnitude to simulate reliably.
pub const MAX_PADE_ORDER: usize = 10;

/// Errors raised when setting or building an [`AnalysisConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// Padé order is zero or above [`MAX_PADE_ORDER`].
    #[error("Padé order must be between 1 and 10")]
    InvalidPadeOrder,

    /// Settling threshold is outside (0, 1) or not finite.
    #[error("Settling threshold must be in (0, 1)")]
    InvalidSettlingThreshold,

    /// Rise-time limits are not `0 <= lower < upper <= 1`.
    #[error("Rise time limits must satisfy 0 <= lower < upper <= 1")]
    InvalidRiseTimeLimits,

    /// IMC closed-loop time constant is non-positive or not finite.
    #[error("IMC lambda must be positive and finite")]
    InvalidImcLambda,

    /// Fewer than two points requested for automatic response grids.
    #[error("Response grid must have at least 2 points")]
    InvalidResponsePoints,
}

/// Numerical settings shared by the modelling, simulation and tuning stages.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct AnalysisConfig {
    /// Order of the Padé approximant of the transport delay.
    /// Defaults to 5.
    pade_order: usize,

    /// Relative band around the final value used for settling time.
    /// Defaults to 0.02, i.e. 2%.
    settling_threshold: f64,

    /// Fractions of the final value between which rise time is measured.
    /// Defaults to (0.1, 0.9).
    rise_time_limits: (f64, f64),

    /// Desired closed-loop time constant λ of the IMC tuning rule.
    /// Defaults to 20.
    imc_lambda: f64,

    /// Number of samples of the automatic grid used for unscaled step responses.
    /// Defaults to 1000.
    response_points: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        AnalysisConfig {
            pade_order: DEFAULT_PADE_ORDER,
            settling_threshold: 0.02,
            rise_time_limits: (0.1, 0.9),
            imc_lambda: 20.0,
            response_points: 1000,
        }
    }
}

impl AnalysisConfig {
    /// Returns the Padé order.
    pub fn pade_order(&self) -> usize {
        self.pade_order
    }

    /// Returns the settling threshold.
    pub fn settling_threshold(&self) -> f64 {
        self.settling_threshold
    }

    /// Returns the rise-time limits as `(lower, upper)`.
    pub fn rise_time_limits(&self) -> (f64, f64) {
        self.rise_time_limits
    }

    /// Returns the IMC λ.
    pub fn imc_lambda(&self) -> f64 {
        self.imc_lambda
    }

    /// Returns the number of points of automatic response grids.
    pub fn response_points(&self) -> usize {
        self.response_points
    }

    /// Sets the Padé order.
    ///
    /// # Errors
    /// - `ConfigError::InvalidPadeOrder` if `order` is zero or above [`MAX_PADE_ORDER`].
    pub fn set_pade_order(&mut self, order: usize) -> Result<(), ConfigError> {
        if order == 0 || order > MAX_PADE_ORDER {
            return Err(ConfigError::InvalidPadeOrder);
        }
        self.pade_order = order;
        Ok(())
    }

    /// Sets the settling threshold.
    ///
    /// # Errors
    /// - `ConfigError::InvalidSettlingThreshold` unless `0 < threshold < 1`.
    pub fn set_settling_threshold(&mut self, threshold: f64) -> Result<(), ConfigError> {
        if !(threshold > 0.0 && threshold < 1.0) {
            return Err(ConfigError::InvalidSettlingThreshold);
        }
        self.settling_threshold = threshold;
        Ok(())
    }

    /// Sets the rise-time limits.
    ///
    /// # Errors
    /// - `ConfigError::InvalidRiseTimeLimits` unless `0 <= lower < upper <= 1`.
    pub fn set_rise_time_limits(&mut self, lower: f64, upper: f64) -> Result<(), ConfigError> {
        if !(lower >= 0.0 && lower < upper && upper <= 1.0) {
            return Err(ConfigError::InvalidRiseTimeLimits);
        }
        self.rise_time_limits = (lower, upper);
        Ok(())
    }

    /// Sets the IMC λ.
    ///
    /// # Errors
    /// - `ConfigError::InvalidImcLambda` if `lambda` is not positive and finite.
    pub fn set_imc_lambda(&mut self, lambda: f64) -> Result<(), ConfigError> {
        if lambda <= 0.0 || !lambda.is_finite() {
            return Err(ConfigError::InvalidImcLambda);
        }
        self.imc_lambda = lambda;
        Ok(())
    }

    /// Sets the number of points of automatic response grids.
    ///
    /// # Errors
    /// - `ConfigError::InvalidResponsePoints` if `points < 2`.
    pub fn set_response_points(&mut self, points: usize) -> Result<(), ConfigError> {
        if points < 2 {
            return Err(ConfigError::InvalidResponsePoints);
        }
        self.response_points = points;
        Ok(())
    }
}

/// Builder for [`AnalysisConfig`]. Validation is deferred to [`AnalysisConfigBuilder::build`],
/// which reports the first invalid field.
#[derive(Copy, Clone, Debug, Default)]
pub struct AnalysisConfigBuilder {
    pade_order: Option<usize>,
    settling_threshold: Option<f64>,
    rise_time_limits: Option<(f64, f64)>,
    imc_lambda: Option<f64>,
    response_points: Option<usize>,
}

impl AnalysisConfigBuilder {
    /// Sets the Padé order.
    pub fn pade_order(mut self, order: usize) -> Self {
        self.pade_order = Some(order);
        self
    }

    /// Sets the settling threshold.
    pub fn settling_threshold(mut self, threshold: f64) -> Self {
        self.settling_threshold = Some(threshold);
        self
    }

    /// Sets the rise-time limits.
    pub fn rise_time_limits(mut self, lower: f64, upper: f64) -> Self {
        self.rise_time_limits = Some((lower, upper));
        self
    }

    /// Sets the IMC λ.
    pub fn imc_lambda(mut self, lambda: f64) -> Self {
        self.imc_lambda = Some(lambda);
        self
    }

    /// Sets the number of points of automatic response grids.
    pub fn response_points(mut self, points: usize) -> Self {
        self.response_points = Some(points);
        self
    }

    /// Builds the configuration, starting from the defaults and applying every field that
    /// was set.
    pub fn build(self) -> Result<AnalysisConfig, ConfigError> {
        let mut config = AnalysisConfig::default();
        if let Some(order) = self.pade_order {
            config.set_pade_order(order)?;
        }
        if let Some(threshold) = self.settling_threshold {
            config.set_settling_threshold(threshold)?;
        }
        if let Some((lower, upper)) = self.rise_time_limits {
            config.set_rise_time_limits(lower, upper)?;
        }
        if let Some(lambda) = self.imc_lambda {
            config.set_imc_lambda(lambda)?;
        }
        if let Some(points) = self.response_points {
            config.set_response_points(points)?;
        }
        Ok(config)
    }
}
