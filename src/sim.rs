// Step-response simulation and response characteristics of transfer functions
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

use nalgebra as na;

use crate::config::AnalysisConfig;
use crate::error::{Error, Result, Stage};
use crate::tf::TransferFunction;

/// Number of slowest time constants covered by an automatic simulation grid.
const AUTO_GRID_TIME_CONSTANTS: f64 = 7.0;

/// Most doublings of an automatic grid while looking for the settling time.
const MAX_GRID_EXTENSIONS: usize = 8;

/// Share of an automatic grid that must lie inside the settling band for the settling time
/// to be accepted without extending the grid.
const MIN_SETTLED_FRACTION: f64 = 0.2;

/// Poles with a real part above this are treated as unstable.
const STABILITY_MARGIN: f64 = 1e-9;

/// Two grid intervals closer than this (relative) share one discretization.
const DT_REUSE_TOLERANCE: f64 = 1e-9;

/// A state-space realization of a proper transfer function.
///
/// Uses the controllable canonical form for the monic denominator
/// `sⁿ + a₁sⁿ⁻¹ + … + aₙ` and padded numerator `b₀sⁿ + b₁sⁿ⁻¹ + … + bₙ`:
/// ```text
///     ┌                    ┐       ┌   ┐
///     │ -a₁  -a₂  …  -aₙ   │       │ 1 │
/// A = │  1    0   …   0    │   B = │ 0 │   Cᵢ = bᵢ - b₀aᵢ,   D = b₀
///     │  ⋮    ⋱   ⋱   ⋮    │       │ ⋮ │
///     │  0    …   1   0    │       │ 0 │
///     └                    ┘       └   ┘
/// ```
#[derive(Debug, Clone)]
pub struct StateSpace {
    a: na::DMatrix<f64>,
    b: na::DVector<f64>,
    c: na::DVector<f64>,
    d: f64,
}

impl StateSpace {
    /// Realizes `tf` in controllable canonical form.
    ///
    /// # Errors
    /// - [`Error::InvalidTransferFunction`] if `tf` is improper.
    pub fn from_tf(tf: &TransferFunction) -> Result<Self> {
        if !tf.is_proper() {
            return Err(Error::InvalidTransferFunction {
                reason: format!(
                    "cannot simulate improper transfer function of order {} with numerator \
                     degree {}",
                    tf.order(),
                    tf.num().len() - 1
                ),
            });
        }
        let n = tf.order();
        let lead = tf.den()[0];
        let den: Vec<f64> = tf.den().iter().map(|c| c / lead).collect();
        let mut num = vec![0.0; n + 1 - tf.num().len()];
        num.extend(tf.num().iter().map(|c| c / lead));

        let d = num[0];
        let mut a = na::DMatrix::<f64>::zeros(n, n);
        let mut b = na::DVector::<f64>::zeros(n);
        let mut c = na::DVector::<f64>::zeros(n);
        for j in 0..n {
            a[(0, j)] = -den[j + 1];
            c[j] = num[j + 1] - d * den[j + 1];
        }
        for i in 1..n {
            a[(i, i - 1)] = 1.0;
        }
        if n > 0 {
            b[0] = 1.0;
        }
        Ok(Self { a, b, c, d })
    }

    /// Number of states.
    pub fn order(&self) -> usize {
        self.a.nrows()
    }

    /// State derivative `x' = Ax + Bu`.
    pub fn f(&self, x: &na::DVector<f64>, u: f64) -> na::DVector<f64> {
        &self.a * x + &self.b * u
    }

    /// Output `y = Cx + Du`.
    pub fn h(&self, x: &na::DVector<f64>, u: f64) -> f64 {
        self.c.dot(x) + self.d * u
    }

    /// Exact zero-order-hold discretization over an interval `dt`.
    ///
    /// Exponentiates the augmented matrix
    /// ```text
    /// ┌        ┐        ┌     ┐
    /// │ A   B  │ dt  →  │ Φ Γ │
    /// │ 0   0  │        │ 0 1 │
    /// └        ┘        └     ┘
    /// ```
    /// so that `x[k+1] = Φx[k] + Γu[k]` holds exactly for piecewise-constant inputs.
    pub fn discretize(&self, dt: f64) -> (na::DMatrix<f64>, na::DVector<f64>) {
        let n = self.order();
        let mut augmented = na::DMatrix::<f64>::zeros(n + 1, n + 1);
        augmented
            .view_mut((0, 0), (n, n))
            .copy_from(&(&self.a * dt));
        augmented
            .view_mut((0, n), (n, 1))
            .copy_from(&(&self.b * dt));
        let expm = augmented.exp();
        let phi = expm.view((0, 0), (n, n)).into_owned();
        let gamma = expm.view((0, n), (n, 1)).column(0).into_owned();
        (phi, gamma)
    }
}

/// Checks that a simulation grid has at least two finite, strictly increasing instants.
pub fn validate_time_grid(time: &[f64]) -> Result<()> {
    if time.len() < 2 {
        return Err(Error::InvalidTimeGrid {
            reason: format!("need at least 2 instants, got {}", time.len()),
        });
    }
    if let Some(i) = time.iter().position(|t| !t.is_finite()) {
        return Err(Error::InvalidTimeGrid {
            reason: format!("instant {} is not finite", i),
        });
    }
    if let Some(i) = time.windows(2).position(|w| w[1] <= w[0]) {
        return Err(Error::InvalidTimeGrid {
            reason: format!("time is not strictly increasing at index {}", i + 1),
        });
    }
    Ok(())
}

/// Simulates the response of `tf` to a step of `amplitude` applied at `time[0]`.
///
/// The output is evaluated exactly at each instant of `time`; the grid need not be uniform.
/// The system starts from rest, so `y[0]` is the direct feedthrough term only.
///
/// # Errors
/// - [`Error::InvalidTimeGrid`] if `time` is not a valid grid.
/// - [`Error::InvalidTransferFunction`] if `tf` is improper.
/// - [`Error::NonFiniteResponse`] if the simulated output diverges.
pub fn step_response(tf: &TransferFunction, time: &[f64], amplitude: f64) -> Result<Vec<f64>> {
    validate_time_grid(time)?;
    let ss = StateSpace::from_tf(tf)?;

    let mut x = na::DVector::<f64>::zeros(ss.order());
    let mut output = Vec::with_capacity(time.len());
    let mut cached: Option<(f64, na::DMatrix<f64>, na::DVector<f64>)> = None;

    for (i, t) in time.iter().enumerate() {
        let y = ss.h(&x, amplitude);
        if !y.is_finite() {
            return Err(Error::NonFiniteResponse {
                stage: Stage::Simulation,
            });
        }
        output.push(y);

        let Some(t_next) = time.get(i + 1) else {
            break;
        };
        if ss.order() == 0 {
            continue;
        }
        let dt = t_next - t;
        let reuse = matches!(&cached, Some((cached_dt, _, _))
            if (dt - cached_dt).abs() <= DT_REUSE_TOLERANCE * cached_dt);
        if !reuse {
            let (phi, gamma) = ss.discretize(dt);
            cached = Some((dt, phi, gamma));
        }
        if let Some((_, phi, gamma)) = &cached {
            x = phi * &x + gamma * amplitude;
        }
    }

    Ok(output)
}

/// Builds a uniform grid from zero long enough for `tf` to settle.
///
/// The horizon covers seven of the slowest stable time constants. Poles on the imaginary axis
/// are ignored; a system without any stable dynamics gets a unit horizon. Pole rates alone do
/// not account for long transport delays; [`step_info`] extends the grid when needed.
pub fn auto_time_grid(tf: &TransferFunction, points: usize) -> Vec<f64> {
    uniform_grid(auto_horizon(tf), points)
}

fn auto_horizon(tf: &TransferFunction) -> f64 {
    let slowest_rate = tf
        .poles()
        .iter()
        .map(|p| -p.re)
        .filter(|rate| *rate > STABILITY_MARGIN)
        .fold(f64::INFINITY, f64::min);
    if slowest_rate.is_finite() {
        AUTO_GRID_TIME_CONSTANTS / slowest_rate
    } else {
        1.0
    }
}

fn uniform_grid(horizon: f64, points: usize) -> Vec<f64> {
    let points = points.max(2);
    let last = (points - 1) as f64;
    (0..points).map(|i| horizon * i as f64 / last).collect()
}

/// Rejects models with poles in the open right half plane.
pub fn ensure_stable(tf: &TransferFunction, stage: Stage) -> Result<()> {
    let max_real_pole = tf.max_pole_real_part();
    if max_real_pole > STABILITY_MARGIN || max_real_pole.is_nan() {
        return Err(Error::UnstableModel {
            stage,
            max_real_pole,
        });
    }
    Ok(())
}

/// Characteristics of a unit step response.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepInfo {
    /// Time to go from the lower to the upper rise limit (10% to 90% by default) of the final
    /// value. `None` if the simulated window ends before the upper limit is reached.
    pub rise_time: Option<f64>,

    /// Time after which the response stays within the settling band (2% by default) of the
    /// final value. `None` if the response has not settled by the end of the window.
    pub settling_time: Option<f64>,

    /// Largest absolute value attained.
    pub peak: f64,

    /// Instant at which the peak is attained.
    pub peak_time: f64,

    /// Percentage by which the response exceeds the final value, zero if it never does.
    pub overshoot: f64,

    /// Final value the characteristics are relative to, the DC gain of the system.
    pub final_value: f64,
}

/// Computes [`StepInfo`] from a sampled unit-step trajectory and its final value.
///
/// # Errors
/// - [`Error::DegenerateResponse`] if `final_value` is zero or not finite.
/// - [`Error::InvalidTimeGrid`] if `time` and `output` differ in length or are too short.
pub fn step_info_from_samples(
    time: &[f64],
    output: &[f64],
    final_value: f64,
    config: &AnalysisConfig,
) -> Result<StepInfo> {
    if time.len() != output.len() || time.len() < 2 {
        return Err(Error::InvalidTimeGrid {
            reason: format!(
                "{} instants for {} output samples",
                time.len(),
                output.len()
            ),
        });
    }
    if final_value == 0.0 || !final_value.is_finite() {
        return Err(Error::DegenerateResponse {
            stage: Stage::Simulation,
            final_value,
        });
    }

    let sign = final_value.signum();
    let (lower, upper) = config.rise_time_limits();
    let first_reaching = |limit: f64| {
        output
            .iter()
            .position(|y| sign * (y - limit * final_value) >= 0.0)
    };
    let rise_time = match (first_reaching(lower), first_reaching(upper)) {
        (Some(lo), Some(hi)) => Some(time[hi] - time[lo]),
        _ => None,
    };

    let threshold = config.settling_threshold();
    let settling_time = match output
        .iter()
        .rposition(|y| (y / final_value - 1.0).abs() >= threshold)
    {
        None => Some(0.0),
        Some(i) if i + 1 < output.len() => Some(time[i + 1] - time[0]),
        Some(_) => None,
    };

    let (peak_index, peak) = output
        .iter()
        .map(|y| y.abs())
        .enumerate()
        .fold((0, f64::NEG_INFINITY), |best, (i, y)| {
            if y > best.1 {
                (i, y)
            } else {
                best
            }
        });
    let signed_max = output
        .iter()
        .map(|y| sign * y)
        .fold(f64::NEG_INFINITY, f64::max);
    let overshoot = ((signed_max / final_value.abs() - 1.0) * 100.0).max(0.0);

    Ok(StepInfo {
        rise_time,
        settling_time,
        peak,
        peak_time: time[peak_index],
        overshoot,
        final_value,
    })
}

/// Simulates the unit step response of `tf` on an automatic grid and computes its
/// characteristics.
///
/// Starts from [`auto_time_grid`] and doubles the horizon, keeping the number of points, until
/// the last fifth of the window lies inside the settling band. Delayed models whose dead time
/// outlasts their slowest pole need this to report a settling time at all.
///
/// Returns the grid, the trajectory, and the [`StepInfo`].
///
/// # Errors
/// - [`Error::UnstableModel`] if `tf` has right-half-plane poles.
/// - [`Error::DegenerateResponse`] if `tf` has no finite, non-zero DC gain.
/// - Any error of [`step_response`].
pub fn step_info(
    tf: &TransferFunction,
    config: &AnalysisConfig,
) -> Result<(Vec<f64>, Vec<f64>, StepInfo)> {
    ensure_stable(tf, Stage::Simulation)?;
    let final_value = tf.dc_gain().unwrap_or(f64::INFINITY);
    if final_value == 0.0 || !final_value.is_finite() {
        return Err(Error::DegenerateResponse {
            stage: Stage::Simulation,
            final_value,
        });
    }

    let mut horizon = auto_horizon(tf);
    let mut extensions = 0;
    loop {
        let time = uniform_grid(horizon, config.response_points());
        let output = step_response(tf, &time, 1.0)?;
        let info = step_info_from_samples(&time, &output, final_value, config)?;
        let settled = matches!(
            info.settling_time,
            Some(ts) if ts <= (1.0 - MIN_SETTLED_FRACTION) * horizon
        );
        if settled || extensions == MAX_GRID_EXTENSIONS {
            if info.settling_time.is_none() {
                log::warn!(
                    "step response has not settled within {:.4} s; settling time unavailable",
                    horizon
                );
            }
            return Ok((time, output, info));
        }
        extensions += 1;
        horizon *= 2.0;
        log::debug!("extending step response window to {:.4} s", horizon);
    }
}

/// Root-mean-square deviation `sqrt(Σ(sim - reference)² / n)`.
///
/// # Errors
/// - [`Error::InvalidSamples`] if the slices are empty or differ in length.
pub fn rms_error(simulated: &[f64], reference: &[f64]) -> Result<f64> {
    if simulated.is_empty() || simulated.len() != reference.len() {
        return Err(Error::InvalidSamples {
            reason: format!(
                "cannot compare {} simulated samples with {} reference samples",
                simulated.len(),
                reference.len()
            ),
        });
    }
    let sum_sq: f64 = simulated
        .iter()
        .zip(reference)
        .map(|(s, r)| (s - r).powi(2))
        .sum();
    Ok((sum_sq / simulated.len() as f64).sqrt())
}
