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

use fixtures::recordings::*;

use fopdt_tune::config::{AnalysisConfig, AnalysisConfigBuilder};
use fopdt_tune::identify::{identify, Method};
use fopdt_tune::model::{build_and_simulate, build_and_simulate_with, plant_model, Mesh};
use fopdt_tune::samples::SampleSeries;
use fopdt_tune::sim;
use fopdt_tune::{Error, Stage};

mod test_round_trip {
    use super::*;
    use approx::assert_relative_eq;

    fn fit_error_ratio(method: Method) -> f64 {
        let rec = plant_recording();
        let id = identify(&rec.step, &rec.time, &rec.output, method).unwrap();
        let fit = build_and_simulate(
            &rec.step,
            &rec.time,
            &rec.output,
            id.k,
            id.tau,
            id.theta,
            Mesh::Open,
        )
        .unwrap();
        fit.fit_error / rec.output[rec.output.len() - 1]
    }

    #[test]
    fn test_smith_model_reproduces_recording() {
        assert!(fit_error_ratio(Method::Smith) < 1e-3);
    }

    #[test]
    fn test_sundaresan_model_reproduces_recording() {
        assert!(fit_error_ratio(Method::Sundaresan) < 5e-3);
    }

    #[test]
    fn test_response_is_sampled_on_recording_grid() {
        let rec = plant_recording();
        let fit = build_and_simulate(
            &rec.step,
            &rec.time,
            &rec.output,
            PLANT_K,
            PLANT_TAU,
            PLANT_THETA,
            Mesh::Open,
        )
        .unwrap();

        assert_eq!(fit.mesh, Mesh::Open);
        assert_eq!(fit.response_time, rec.time);
        assert_eq!(fit.response_output.len(), rec.time.len());
        assert_relative_eq!(fit.step_amplitude, PLANT_STEP, epsilon = 1e-12);
        assert_relative_eq!(fit.response_output[0], 0.0, epsilon = 1e-12);
        assert_relative_eq!(
            fit.response_output[rec.time.len() - 1],
            rec.output[rec.time.len() - 1],
            max_relative = 1e-3
        );
    }

    #[test]
    fn test_building_is_repeatable() {
        let rec = plant_recording();
        let build = || {
            build_and_simulate(
                &rec.step,
                &rec.time,
                &rec.output,
                PLANT_K,
                PLANT_TAU,
                PLANT_THETA,
                Mesh::Closed,
            )
            .unwrap()
        };
        assert_eq!(build(), build());
    }
}

mod test_meshes {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_closed_loop_error_is_measured_against_step() {
        let rec = plant_recording();
        let closed = build_and_simulate(
            &rec.step,
            &rec.time,
            &rec.output,
            PLANT_K,
            PLANT_TAU,
            PLANT_THETA,
            Mesh::Closed,
        )
        .unwrap();

        let against_step = sim::rms_error(&closed.response_output, &rec.step).unwrap();
        let against_output = sim::rms_error(&closed.response_output, &rec.output).unwrap();
        assert_eq!(closed.fit_error, against_step);
        assert!(closed.fit_error != against_output);
    }

    #[test]
    fn test_open_and_closed_errors_differ() {
        let rec = plant_recording();
        let fit = |mesh| {
            build_and_simulate(
                &rec.step,
                &rec.time,
                &rec.output,
                PLANT_K,
                PLANT_TAU,
                PLANT_THETA,
                mesh,
            )
            .unwrap()
        };
        let open = fit(Mesh::Open);
        let closed = fit(Mesh::Closed);

        // The closed loop settles at k/(1+k) of the step, far from the step itself
        assert!(open.fit_error < 2e-3);
        assert!(closed.fit_error > 0.5);
    }

    #[test]
    fn test_characteristics_are_per_unit_step() {
        let rec = plant_recording();
        let open = build_and_simulate(
            &rec.step,
            &rec.time,
            &rec.output,
            PLANT_K,
            PLANT_TAU,
            PLANT_THETA,
            Mesh::Open,
        )
        .unwrap();

        // Unscaled by the step amplitude of 2
        assert_relative_eq!(open.info.final_value, PLANT_K, epsilon = 1e-9);
        assert!(open.info.peak <= PLANT_K * (1.0 + 1e-6));
        assert!(open.info.peak > 0.95 * PLANT_K);
        assert!(open.info.overshoot < 1e-6);
        assert!(open.info.rise_time.is_some());
        assert!(open.info.settling_time.is_some());
    }

    #[test]
    fn test_closed_loop_final_value() {
        let rec = plant_recording();
        let closed = build_and_simulate(
            &rec.step,
            &rec.time,
            &rec.output,
            PLANT_K,
            PLANT_TAU,
            PLANT_THETA,
            Mesh::Closed,
        )
        .unwrap();

        assert_relative_eq!(
            closed.info.final_value,
            PLANT_K / (1.0 + PLANT_K),
            epsilon = 1e-9
        );
        let last = closed.response_output[closed.response_output.len() - 1];
        assert_relative_eq!(
            last,
            PLANT_STEP * PLANT_K / (1.0 + PLANT_K),
            max_relative = 1e-3
        );
    }

    #[test]
    fn test_parse_mesh() {
        assert_eq!("opened".parse::<Mesh>().unwrap(), Mesh::Open);
        assert_eq!("Closed".parse::<Mesh>().unwrap(), Mesh::Closed);
        assert!(matches!(
            "half-open".parse::<Mesh>(),
            Err(Error::UnsupportedConfiguration { kind: "mesh", .. })
        ));
    }
}

mod test_plant_model {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_model_order_follows_pade_order() {
        let config = AnalysisConfigBuilder::default().pade_order(2).build().unwrap();
        let model = plant_model(PLANT_K, PLANT_TAU, PLANT_THETA, Mesh::Open, &config).unwrap();
        assert_eq!(model.order(), 3);

        let model = plant_model(
            PLANT_K,
            PLANT_TAU,
            PLANT_THETA,
            Mesh::Open,
            &AnalysisConfig::default(),
        )
        .unwrap();
        assert_eq!(model.order(), 6);
    }

    #[test]
    fn test_zero_delay_gives_bare_plant() {
        let model = plant_model(2.0, 4.0, 0.0, Mesh::Open, &AnalysisConfig::default()).unwrap();
        assert_eq!(model.order(), 1);
        assert_relative_eq!(model.dc_gain().unwrap(), 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_degenerate_parameters_are_rejected() {
        let config = AnalysisConfig::default();
        assert_eq!(
            plant_model(1.0, 0.0, 1.0, Mesh::Open, &config).unwrap_err(),
            Error::DegenerateModel {
                tau: 0.0,
                theta: 1.0
            }
        );
        assert!(matches!(
            plant_model(1.0, 2.0, -0.5, Mesh::Open, &config),
            Err(Error::DegenerateModel { .. })
        ));
        assert!(matches!(
            plant_model(1.0, f64::NAN, 0.5, Mesh::Closed, &config),
            Err(Error::DegenerateModel { .. })
        ));
    }

    #[test]
    fn test_unstable_closed_loop_is_reported() {
        // 1.5s + 1 + k has a right-half-plane root for k < -1
        let rec = plant_recording();
        let samples = SampleSeries::new(&rec.time, &rec.step, &rec.output).unwrap();
        let err = build_and_simulate_with(
            &samples,
            -2.0,
            1.5,
            0.5,
            Mesh::Closed,
            &AnalysisConfig::default(),
        )
        .unwrap_err();

        match err {
            Error::UnstableModel {
                stage,
                max_real_pole,
            } => {
                assert_eq!(stage, Stage::ModelBuilding);
                assert!(max_real_pole > 0.0);
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_scenario_builds_in_both_meshes() {
        let id = identify(&SCENARIO_STEP, &SCENARIO_TIME, &SCENARIO_OUTPUT, Method::Smith).unwrap();
        for mesh in [Mesh::Open, Mesh::Closed] {
            let fit = build_and_simulate(
                &SCENARIO_STEP,
                &SCENARIO_TIME,
                &SCENARIO_OUTPUT,
                id.k,
                id.tau,
                id.theta,
                mesh,
            )
            .unwrap();
            assert_eq!(fit.response_output.len(), SCENARIO_TIME.len());
            assert!(fit.fit_error.is_finite());
        }
    }
}

mod test_characteristics_with_dead_time {
    use super::*;

    // Delayed first order: t90 - t10 = τ ln 9, 2% band entered at θ + τ ln 50
    fn check_delayed_first_order(theta: f64) {
        let tau = 1.0;
        let config = AnalysisConfig::default();
        let model = plant_model(1.0, tau, theta, Mesh::Open, &config).unwrap();
        let (time, _, info) = sim::step_info(&model, &config).unwrap();
        let dt = time[1] - time[0];

        let settling = info
            .settling_time
            .unwrap_or_else(|| panic!("no settling time for theta/tau = {}", theta));
        let expected = theta + tau * 50f64.ln();
        assert!(
            (settling - expected).abs() <= 2.0 * dt + 0.01 * expected,
            "theta/tau = {}: settling {} vs {}",
            theta,
            settling,
            expected
        );

        let rise = info
            .rise_time
            .unwrap_or_else(|| panic!("no rise time for theta/tau = {}", theta));
        assert!(
            (rise - tau * 9f64.ln()).abs() <= 0.15 * tau * 9f64.ln(),
            "theta/tau = {}: rise {}",
            theta,
            rise
        );

        // The recorded fit reports the same characteristics
        let rec = fopdt_recording(1.0, tau, theta, 1.0, 0.01, 2001);
        let fit = build_and_simulate(
            &rec.step,
            &rec.time,
            &rec.output,
            1.0,
            tau,
            theta,
            Mesh::Open,
        )
        .unwrap();
        assert_eq!(fit.info, info);
    }

    #[test]
    fn test_short_delay() {
        check_delayed_first_order(0.1);
    }

    #[test]
    fn test_delay_equal_to_time_constant() {
        check_delayed_first_order(1.0);
    }

    #[test]
    fn test_delay_outlasting_slowest_pole() {
        check_delayed_first_order(3.5);
        check_delayed_first_order(5.0);
    }
}
