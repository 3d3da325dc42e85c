// Two-point FOPDT identification from step-response data
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

use crate::error::{Error, Result};
use crate::samples::SampleSeries;

/// Two-point identification method.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Method {
    /// Smith: crossings of 28.3% and 63.2% of the final value.
    Smith,
    /// Sundaresan and Krishnaswamy: crossings of 35.3% and 85.3% of the final value.
    Sundaresan,
}

impl Method {
    /// Both methods, in the order they are compared.
    pub const ALL: [Method; 2] = [Method::Smith, Method::Sundaresan];

    /// Fractions of the final output value marking the instants `t1` and `t2`.
    pub fn thresholds(&self) -> (f64, f64) {
        match self {
            Method::Smith => (0.283, 0.632),
            Method::Sundaresan => (0.353, 0.853),
        }
    }

    /// Maps the two crossing instants to `(τ, θ)`.
    pub fn time_constant_and_delay(&self, t1: f64, t2: f64) -> (f64, f64) {
        match self {
            Method::Smith => {
                let tau = 1.5 * (t2 - t1);
                (tau, t2 - tau)
            }
            Method::Sundaresan => ((2.0 / 3.0) * (t2 - t1), 1.3 * t1 - 0.29 * t2),
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::Smith => f.write_str("Smith"),
            Method::Sundaresan => f.write_str("Sundaresan"),
        }
    }
}

impl FromStr for Method {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "smith" => Ok(Method::Smith),
            "sundaresan" => Ok(Method::Sundaresan),
            _ => Err(Error::UnsupportedConfiguration {
                kind: "identification method",
                value: s.to_owned(),
            }),
        }
    }
}

/// Parameters of an identified first-order-plus-dead-time model `k·e^(−θs) / (τs + 1)`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Identification {
    /// Method that produced the estimate.
    pub method: Method,
    /// Static gain, output change per unit of step amplitude.
    pub k: f64,
    /// Time constant.
    pub tau: f64,
    /// Transport delay. Sundaresan may yield a small negative value on coarse data.
    pub theta: f64,
}

impl fmt::Display for Identification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "G(s) = {:.4}·e^(-{:.4}s) / ({:.4}s + 1)",
            self.k, self.theta, self.tau
        )
    }
}

/// Identifies an FOPDT model from raw step, time and output samples.
///
/// Validates the samples with [`SampleSeries::new`] and forwards to [`identify_series`].
pub fn identify(step: &[f64], time: &[f64], output: &[f64], method: Method) -> Result<Identification> {
    identify_series(&SampleSeries::new(time, step, output)?, method)
}

/// Identifies an FOPDT model from a validated recording.
///
/// Scans forward once for the first samples whose output is at least each threshold fraction
/// of the final output value, takes their instants as `t1` and `t2`, and applies the method's
/// formulas. The gain is `(y_final − y_0) / mean(step)`.
///
/// The scan is literal: the first sample reaching a threshold wins, even if a noisy response
/// later dips back below it.
///
/// # Errors
/// - [`Error::InvalidSamples`] if the output ends where it started.
/// - [`Error::ThresholdNotReached`] if no sample reaches one of the thresholds.
/// - [`Error::DegenerateGain`] if the mean step amplitude is zero.
pub fn identify_series(samples: &SampleSeries<'_>, method: Method) -> Result<Identification> {
    let final_value = samples.final_output();
    let delta = final_value - samples.initial_output();
    if delta == 0.0 {
        return Err(Error::InvalidSamples {
            reason: "output never departs from its initial value".into(),
        });
    }

    let (lower, upper) = method.thresholds();
    let y1 = lower * final_value;
    let y2 = upper * final_value;

    let mut crossing1 = None;
    let mut crossing2 = None;
    for (i, y) in samples.output().iter().enumerate() {
        if crossing1.is_none() && *y >= y1 {
            crossing1 = Some(i);
        }
        if crossing2.is_none() && *y >= y2 {
            crossing2 = Some(i);
        }
        if crossing1.is_some() && crossing2.is_some() {
            break;
        }
    }
    let i1 = crossing1.ok_or(Error::ThresholdNotReached {
        method,
        fraction: lower,
        threshold: y1,
    })?;
    let i2 = crossing2.ok_or(Error::ThresholdNotReached {
        method,
        fraction: upper,
        threshold: y2,
    })?;
    if i1 == 0 {
        log::warn!(
            "{} identification: output already reaches {} of its final value at the first sample",
            method,
            lower
        );
    }

    let step_mean = samples.step_amplitude();
    if step_mean == 0.0 {
        return Err(Error::DegenerateGain { step_mean });
    }

    let t1 = samples.time()[i1];
    let t2 = samples.time()[i2];
    let (tau, theta) = method.time_constant_and_delay(t1, t2);
    let k = delta / step_mean;

    if theta < 0.0 {
        log::warn!(
            "{} identification produced a negative delay ({:.4} s)",
            method,
            theta
        );
    }
    log::debug!(
        "{} identification: t1 = {}, t2 = {}, k = {:.4}, tau = {:.4}, theta = {:.4}",
        method,
        t1,
        t2,
        k,
        tau,
        theta
    );

    Ok(Identification {
        method,
        k,
        tau,
        theta,
    })
}
