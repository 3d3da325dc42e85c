#![warn(missing_docs)]

//! # FOPDT Identification and PID Tuning Library
//!
//! This library identifies a first-order-plus-dead-time (FOPDT) model `k·e^(−θs) / (τs + 1)`
//! from a single recorded step-response experiment, derives PID gains from it with classical
//! tuning rules, and simulates the resulting loops.
//!
//! Every operation is a pure function of its inputs: the same samples and parameters always
//! produce bit-for-bit identical results, and nothing is cached between calls.
//!
//! ## Features
//!
//! - Two-point identification with the Smith and Sundaresan methods, with explicit errors when
//!   a threshold is never crossed instead of an index fault.
//! - Rational transfer-function algebra: series composition, unity feedback, scalar gain.
//! - Padé approximation of the transport delay (order 5 by default).
//! - Exact zero-order-hold step-response simulation evaluated at the recording's own instants.
//! - Six tuning rules: Ziegler–Nichols, IMC, CHR with and without overshoot, Cohen–Coon and
//!   ITAE, each checked against its domain.
//! - Rise time, settling time, peak and overshoot of every simulated response.
//!
//! ## Usage
//!
//! ### Step by step
//!
//! ```rust
//! use fopdt_tune::identify::{identify, Method};
//! use fopdt_tune::model::{build_and_simulate, Mesh};
//! use fopdt_tune::tuning::{tune_and_simulate, TuningRule};
//!
//! let time = [0.0, 1.0, 2.0, 3.0, 4.0, 5.0];
//! let step = [0.0, 5.0, 5.0, 5.0, 5.0, 5.0];
//! let output = [0.0, 0.0, 2.0, 3.5, 4.3, 4.7];
//!
//! let id = identify(&step, &time, &output, Method::Smith).expect("Identification failed");
//! assert!((id.tau - 1.5).abs() < 1e-12);
//! assert!((id.theta - 1.5).abs() < 1e-12);
//!
//! let fit = build_and_simulate(&step, &time, &output, id.k, id.tau, id.theta, Mesh::Open)
//!     .expect("Model building failed");
//! assert_eq!(fit.response_output.len(), time.len());
//!
//! let design = tune_and_simulate(
//!     id.k,
//!     id.tau,
//!     id.theta,
//!     &fit.model,
//!     fit.step_amplitude,
//!     TuningRule::ChrNoOvershoot,
//! )
//! .expect("Tuning failed")
//! .expect("A controller was requested");
//! assert!(design.gains.kp > 0.0);
//! ```
//!
//! ### Session
//!
//! A [`session::Session`] bundles a recording with an [`config::AnalysisConfig`] and runs the
//! whole pipeline: rank the identification methods, compare open and closed loop, and design
//! several controllers at once.
//!
//! ```rust
//! use fopdt_tune::samples::SampleSeries;
//! use fopdt_tune::session::Session;
//! use fopdt_tune::tuning::TuningRule;
//!
//! let time: Vec<f64> = (0..400).map(|i| i as f64 * 0.05).collect();
//! let step = vec![1.0; time.len()];
//! let output: Vec<f64> = time
//!     .iter()
//!     .map(|t| if *t < 1.0 { 0.0 } else { 2.0 * (1.0 - (-(t - 1.0) / 3.0).exp()) })
//!     .collect();
//!
//! let samples = SampleSeries::new(&time, &step, &output).expect("Invalid recording");
//! let session = Session::new(samples);
//!
//! let methods = session.compare_methods().expect("Identification failed");
//! let best = methods.best_method();
//! let designs = session
//!     .design_controllers(best, &[TuningRule::ZieglerNichols, TuningRule::Imc])
//!     .expect("Plant could not be modelled");
//! assert_eq!(designs.len(), 2);
//! ```
//!
//! ## Logging
//!
//! Pipeline milestones are reported through the [`log`] facade at `debug` level, suspicious
//! but legal inputs at `warn` level. The library never installs a logger.

/// Validated analysis settings.
pub mod config;

/// Transport delay approximation.
pub mod delay;

/// Error types of the pipeline.
pub mod error;

/// FOPDT identification from step-response samples.
pub mod identify;

/// Delay-augmented plant models fitted against recordings.
pub mod model;

/// Polynomial arithmetic backing the transfer-function algebra.
pub mod poly;

/// Recorded step-response data.
pub mod samples;

/// Pipeline orchestration over one recording.
pub mod session;

/// Step-response simulation and response characteristics.
pub mod sim;

/// Transfer-function algebra.
pub mod tf;

/// PID tuning rules and closed-loop evaluation.
pub mod tuning;

pub use error::{Error, Result, Stage};

#[doc = include_str!("../README.md")]
#[cfg(doctest)]
pub struct ReadmeDoctests;
