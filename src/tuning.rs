// Classical PID tuning rules for FOPDT models and closed-loop evaluation
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
use crate::error::{Error, Result, Stage};
use crate::sim::{self, StepInfo};
use crate::tf::TransferFunction;

/// A PID tuning rule for first-order-plus-dead-time processes.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TuningRule {
    /// No controller configured.
    None,
    /// Ziegler–Nichols open-loop (reaction curve) rule.
    ZieglerNichols,
    /// Internal Model Control with closed-loop time constant λ.
    Imc,
    /// Chien–Hrones–Reswick, set-point response without overshoot.
    ChrNoOvershoot,
    /// Chien–Hrones–Reswick, set-point response with 20% overshoot.
    ChrOvershoot,
    /// Cohen–Coon.
    CohenCoon,
    /// Integral of time-weighted absolute error optimal rule (set-point tracking).
    Itae,
}

impl TuningRule {
    /// Every rule that produces a controller.
    pub const CONTROLLERS: [TuningRule; 6] = [
        TuningRule::ZieglerNichols,
        TuningRule::Imc,
        TuningRule::ChrNoOvershoot,
        TuningRule::ChrOvershoot,
        TuningRule::CohenCoon,
        TuningRule::Itae,
    ];

    /// Short display name.
    pub fn title(&self) -> &'static str {
        match self {
            TuningRule::None => "None",
            TuningRule::ZieglerNichols => "Ziegler-Nichols",
            TuningRule::Imc => "IMC",
            TuningRule::ChrNoOvershoot => "CHR without overshoot",
            TuningRule::ChrOvershoot => "CHR with overshoot",
            TuningRule::CohenCoon => "Cohen-Coon",
            TuningRule::Itae => "ITAE",
        }
    }

    /// Qualitative behavior of the tuned loop, where one is commonly quoted.
    pub fn description(&self) -> Option<&'static str> {
        match self {
            TuningRule::ZieglerNichols => Some("fast system, with overshoot"),
            TuningRule::Imc => Some("slow system, no overshoot (long settling time)"),
            TuningRule::ChrNoOvershoot => Some("fast system, no overshoot"),
            TuningRule::ChrOvershoot => Some("slow system, with overshoot"),
            TuningRule::None | TuningRule::CohenCoon | TuningRule::Itae => None,
        }
    }

    /// Whether the formulas divide by the transport delay.
    pub fn requires_delay(&self) -> bool {
        !matches!(self, TuningRule::None | TuningRule::Imc)
    }
}

impl fmt::Display for TuningRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

impl FromStr for TuningRule {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let key: String = s
            .trim()
            .chars()
            .map(|c| match c {
                ' ' | '_' => '-',
                c => c.to_ascii_lowercase(),
            })
            .collect();
        match key.as_str() {
            "none" => Ok(TuningRule::None),
            "ziegler-nichols" | "zn" => Ok(TuningRule::ZieglerNichols),
            "imc" => Ok(TuningRule::Imc),
            "chr-no-overshoot" | "chr-without-overshoot" => Ok(TuningRule::ChrNoOvershoot),
            "chr-overshoot" | "chr-with-overshoot" => Ok(TuningRule::ChrOvershoot),
            "cohen-coon" => Ok(TuningRule::CohenCoon),
            "itae" => Ok(TuningRule::Itae),
            _ => Err(Error::UnsupportedConfiguration {
                kind: "tuning rule",
                value: s.to_owned(),
            }),
        }
    }
}

/// PID gains in the ideal (ISA) form `kp·(1 + 1/(ti·s) + td·s)`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PidGains {
    /// Proportional gain.
    pub kp: f64,
    /// Integral time.
    pub ti: f64,
    /// Derivative time.
    pub td: f64,
}

impl PidGains {
    /// Integral gain `kp / ti`.
    pub fn ki(&self) -> f64 {
        self.kp / self.ti
    }

    /// Derivative gain `kp · td`.
    pub fn kd(&self) -> f64 {
        self.kp * self.td
    }

    /// The controller `(kp·td·s² + kp·s + kp/ti) / s`.
    pub fn transfer_function(&self) -> Result<TransferFunction> {
        TransferFunction::new(&[self.kd(), self.kp, self.ki()], &[1.0, 0.0])
    }
}

fn domain_error(rule: TuningRule, reason: impl Into<String>) -> Error {
    Error::TuningDomain {
        rule,
        reason: reason.into(),
    }
}

/// Computes PID gains for an FOPDT process `k·e^(−θs) / (τs + 1)`.
///
/// Returns `Ok(None)` for [`TuningRule::None`].
///
/// # Errors
/// - [`Error::TuningDomain`] if `k` is zero, `τ <= 0`, `θ < 0`, `θ = 0` for a rule dividing by
///   it, or if the formula yields a non-finite gain or a non-positive integral time.
pub fn pid_gains(
    rule: TuningRule,
    k: f64,
    tau: f64,
    theta: f64,
    config: &AnalysisConfig,
) -> Result<Option<PidGains>> {
    if rule == TuningRule::None {
        return Ok(None);
    }
    if k == 0.0 || !k.is_finite() {
        return Err(domain_error(rule, format!("process gain k = {}", k)));
    }
    if !(tau > 0.0 && tau.is_finite()) {
        return Err(domain_error(rule, format!("time constant tau = {}", tau)));
    }
    if !(theta >= 0.0 && theta.is_finite()) || (theta == 0.0 && rule.requires_delay()) {
        return Err(domain_error(rule, format!("transport delay theta = {}", theta)));
    }

    let ratio = theta / tau;
    let (kp, ti, td) = match rule {
        TuningRule::None => return Ok(None),
        TuningRule::ZieglerNichols => (1.2 * tau / (k * theta), 2.0 * theta, 0.5 * theta),
        TuningRule::Imc => {
            let lambda = config.imc_lambda();
            (
                (2.0 * tau + theta) / (k * (2.0 * lambda + theta)),
                tau + theta / 2.0,
                tau * theta / (2.0 * tau + theta),
            )
        }
        TuningRule::ChrNoOvershoot => (0.6 * tau / (k * theta), tau, 0.5 * theta),
        TuningRule::ChrOvershoot => (0.95 * tau / (k * theta), 1.357 * tau, 0.473 * theta),
        TuningRule::CohenCoon => (
            (tau / (k * theta)) * (16.0 * tau + 3.0 * theta) / (12.0 * tau),
            theta * (32.0 + 6.0 * ratio) / (13.0 + 8.0 * ratio),
            4.0 * theta / (11.0 + 2.0 * ratio),
        ),
        TuningRule::Itae => (
            (0.965 / k) * ratio.powf(-0.85),
            tau / (0.796 - 0.147 * ratio),
            tau * 0.308 * ratio.powf(0.929),
        ),
    };

    if !(kp.is_finite() && ti.is_finite() && td.is_finite()) {
        return Err(domain_error(rule, "formula produced a non-finite gain"));
    }
    if ti <= 0.0 {
        return Err(domain_error(
            rule,
            format!("non-positive integral time ti = {} (theta/tau = {})", ti, ratio),
        ));
    }

    log::debug!(
        "{} gains: kp = {:.6}, ti = {:.6}, td = {:.6}",
        rule,
        kp,
        ti,
        td
    );
    Ok(Some(PidGains { kp, ti, td }))
}

/// A PID controller designed by one tuning rule and its simulated closed loop.
#[derive(Debug, Clone, PartialEq)]
pub struct PidDesign {
    /// Rule that produced the gains.
    pub rule: TuningRule,
    /// Display title: the rule name and, where known, its qualitative behavior.
    pub title: String,
    /// Controller gains.
    pub gains: PidGains,
    /// Controller transfer function.
    pub controller: TransferFunction,
    /// Unity feedback loop around controller and plant in series.
    pub closed_loop: TransferFunction,
    /// Instants of the simulated closed-loop unit step response.
    pub response_time: Vec<f64>,
    /// Closed-loop unit step response, not scaled by the step amplitude.
    pub response_output: Vec<f64>,
    /// Characteristics of the closed-loop unit step response.
    pub info: StepInfo,
    /// Step amplitude of the recording the plant was identified from.
    pub step_amplitude: f64,
}

/// Designs a PID controller with the default [`AnalysisConfig`].
///
/// See [`tune_and_simulate_with`].
pub fn tune_and_simulate(
    k: f64,
    tau: f64,
    theta: f64,
    open_loop_model: &TransferFunction,
    step_amplitude: f64,
    rule: TuningRule,
) -> Result<Option<PidDesign>> {
    tune_and_simulate_with(
        k,
        tau,
        theta,
        open_loop_model,
        step_amplitude,
        rule,
        &AnalysisConfig::default(),
    )
}

/// Designs a PID controller for `(k, τ, θ)` and simulates the unity feedback loop around it in
/// series with `open_loop_model`.
///
/// Returns `Ok(None)` when `rule` is [`TuningRule::None`]. The closed loop is simulated for a
/// unit step on an automatic grid.
///
/// A rule can produce gains that destabilize the loop, typically when the plant gain has the
/// wrong sign or the delay dominates. Such a loop is reported as [`Error::UnstableModel`]
/// instead of being simulated to divergence, so no diverging trajectory is ever returned.
///
/// # Errors
/// - [`Error::TuningDomain`] from [`pid_gains`].
/// - [`Error::UnstableModel`] if the tuned loop has a pole in the right half plane.
/// - Any simulation error, attributed to [`Stage::Tuning`].
pub fn tune_and_simulate_with(
    k: f64,
    tau: f64,
    theta: f64,
    open_loop_model: &TransferFunction,
    step_amplitude: f64,
    rule: TuningRule,
    config: &AnalysisConfig,
) -> Result<Option<PidDesign>> {
    let Some(gains) = pid_gains(rule, k, tau, theta, config)? else {
        return Ok(None);
    };

    let controller = gains.transfer_function()?;
    let closed_loop = controller.series(open_loop_model).feedback()?;
    sim::ensure_stable(&closed_loop, Stage::Tuning)?;
    let (response_time, response_output, info) =
        sim::step_info(&closed_loop, config).map_err(|e| e.at_stage(Stage::Tuning))?;

    let title = match rule.description() {
        Some(description) => format!("{}\n{}", rule.title(), description),
        None => rule.title().to_owned(),
    };

    Ok(Some(PidDesign {
        rule,
        title,
        gains,
        controller,
        closed_loop,
        response_time,
        response_output,
        info,
        step_amplitude,
    }))
}
