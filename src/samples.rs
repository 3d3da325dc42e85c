// Recorded step-response experiment data
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

use crate::error::{Error, Result};

/// A borrowed, validated step-response recording.
///
/// Holds three equal-length series: sampling instants, the applied step input and the
/// measured process output. The data stays owned by the caller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleSeries<'a> {
    time: &'a [f64],
    step: &'a [f64],
    output: &'a [f64],
}

impl<'a> SampleSeries<'a> {
    /// Validates and wraps a recording.
    ///
    /// # Errors
    /// - [`Error::InvalidSamples`] if the series have fewer than two samples, differ in length,
    ///   contain non-finite values, or if time is not strictly increasing.
    pub fn new(time: &'a [f64], step: &'a [f64], output: &'a [f64]) -> Result<Self> {
        if time.len() < 2 {
            return Err(Error::InvalidSamples {
                reason: format!("need at least 2 samples, got {}", time.len()),
            });
        }
        if step.len() != time.len() || output.len() != time.len() {
            return Err(Error::InvalidSamples {
                reason: format!(
                    "mismatched lengths: time {}, step {}, output {}",
                    time.len(),
                    step.len(),
                    output.len()
                ),
            });
        }
        for (name, series) in [("time", time), ("step", step), ("output", output)] {
            if let Some(i) = series.iter().position(|v| !v.is_finite()) {
                return Err(Error::InvalidSamples {
                    reason: format!("{} sample {} is not finite", name, i),
                });
            }
        }
        if let Some(i) = time.windows(2).position(|w| w[1] <= w[0]) {
            return Err(Error::InvalidSamples {
                reason: format!("time is not strictly increasing at index {}", i + 1),
            });
        }
        Ok(Self { time, step, output })
    }

    /// Sampling instants.
    pub fn time(&self) -> &'a [f64] {
        self.time
    }

    /// Applied step input.
    pub fn step(&self) -> &'a [f64] {
        self.step
    }

    /// Measured process output.
    pub fn output(&self) -> &'a [f64] {
        self.output
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.time.len()
    }

    /// Always false; a validated series has at least two samples.
    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    /// Nominal step amplitude, the mean of the step input.
    pub fn step_amplitude(&self) -> f64 {
        self.step.iter().sum::<f64>() / self.step.len() as f64
    }

    /// Output value at the first sample.
    pub fn initial_output(&self) -> f64 {
        self.output[0]
    }

    /// Output value at the last sample, taken as the steady-state value.
    pub fn final_output(&self) -> f64 {
        self.output[self.output.len() - 1]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_step_amplitude_is_mean_of_step() {
        let time = [0.0, 1.0, 2.0, 3.0];
        let step = [0.0, 4.0, 4.0, 4.0];
        let output = [1.0, 1.5, 2.5, 3.0];
        let samples = SampleSeries::new(&time, &step, &output).unwrap();

        assert_eq!(samples.len(), 4);
        assert!(!samples.is_empty());
        assert_relative_eq!(samples.step_amplitude(), 3.0);
        assert_eq!(samples.initial_output(), 1.0);
        assert_eq!(samples.final_output(), 3.0);
    }

    #[test]
    fn test_irregular_time_is_accepted() {
        let time = [0.0, 0.1, 0.5, 0.6, 2.0];
        let values = [0.0, 1.0, 1.0, 1.0, 1.0];
        assert!(SampleSeries::new(&time, &values, &values).is_ok());
    }

    #[test]
    fn test_decreasing_time_is_rejected() {
        let time = [0.0, 2.0, 1.0];
        let values = [1.0; 3];
        assert!(matches!(
            SampleSeries::new(&time, &values, &values),
            Err(Error::InvalidSamples { .. })
        ));
    }
}
