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

use fopdt_tune::identify::{identify, identify_series, Method};
use fopdt_tune::samples::SampleSeries;
use fopdt_tune::Error;

mod test_scenario {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_smith_on_scenario() {
        let id = identify(&SCENARIO_STEP, &SCENARIO_TIME, &SCENARIO_OUTPUT, Method::Smith).unwrap();

        // 28.3% of 4.7 is first reached at t = 2, 63.2% at t = 3
        assert_eq!(id.method, Method::Smith);
        assert_relative_eq!(id.tau, 1.5, epsilon = 1e-12);
        assert_relative_eq!(id.theta, 1.5, epsilon = 1e-12);
        assert_relative_eq!(id.k, 4.7 / SCENARIO_STEP_MEAN, epsilon = 1e-12);
        assert_relative_eq!(id.k, 1.128, epsilon = 1e-12);
    }

    #[test]
    fn test_sundaresan_on_scenario() {
        let id = identify(
            &SCENARIO_STEP,
            &SCENARIO_TIME,
            &SCENARIO_OUTPUT,
            Method::Sundaresan,
        )
        .unwrap();

        // 35.3% of 4.7 is first reached at t = 2, 85.3% at t = 4
        assert_relative_eq!(id.tau, 4.0 / 3.0, epsilon = 1e-12);
        assert_relative_eq!(id.theta, 1.3 * 2.0 - 0.29 * 4.0, epsilon = 1e-12);
        assert_relative_eq!(id.k, 1.128, epsilon = 1e-12);
    }

    #[test]
    fn test_raw_and_validated_entry_points_agree() {
        let samples = SampleSeries::new(&SCENARIO_TIME, &SCENARIO_STEP, &SCENARIO_OUTPUT).unwrap();
        for method in Method::ALL {
            assert_eq!(
                identify_series(&samples, method).unwrap(),
                identify(&SCENARIO_STEP, &SCENARIO_TIME, &SCENARIO_OUTPUT, method).unwrap()
            );
        }
    }

    #[test]
    fn test_display_shows_model() {
        let id = identify(&SCENARIO_STEP, &SCENARIO_TIME, &SCENARIO_OUTPUT, Method::Smith).unwrap();
        assert_eq!(id.to_string(), "G(s) = 1.1280·e^(-1.5000s) / (1.5000s + 1)");
    }
}

mod test_synthetic_plant {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_smith_recovers_plant() {
        let rec = plant_recording();
        let id = identify(&rec.step, &rec.time, &rec.output, Method::Smith).unwrap();

        assert_relative_eq!(id.k, PLANT_K, max_relative = 1e-3);
        // Crossings are quantized to the sampling interval
        assert!((id.tau - PLANT_TAU).abs() < 3.0 * PLANT_DT);
        assert!((id.theta - PLANT_THETA).abs() < 3.0 * PLANT_DT);
    }

    #[test]
    fn test_sundaresan_recovers_plant() {
        let rec = plant_recording();
        let id = identify(&rec.step, &rec.time, &rec.output, Method::Sundaresan).unwrap();

        assert_relative_eq!(id.k, PLANT_K, max_relative = 1e-3);
        assert!((id.tau - PLANT_TAU).abs() < 0.1);
        assert!((id.theta - PLANT_THETA).abs() < 0.1);
    }

    #[test]
    fn test_gain_scales_with_step_amplitude() {
        let small = fopdt_recording(PLANT_K, PLANT_TAU, PLANT_THETA, 1.0, PLANT_DT, PLANT_SAMPLES);
        let large = fopdt_recording(PLANT_K, PLANT_TAU, PLANT_THETA, 4.0, PLANT_DT, PLANT_SAMPLES);
        let id_small = identify(&small.step, &small.time, &small.output, Method::Smith).unwrap();
        let id_large = identify(&large.step, &large.time, &large.output, Method::Smith).unwrap();

        assert_relative_eq!(id_small.k, id_large.k, max_relative = 1e-12);
        assert_relative_eq!(id_small.tau, id_large.tau, epsilon = 1e-12);
    }

    #[test]
    fn test_identification_is_repeatable() {
        let rec = plant_recording();
        let first = identify(&rec.step, &rec.time, &rec.output, Method::Sundaresan).unwrap();
        let second = identify(&rec.step, &rec.time, &rec.output, Method::Sundaresan).unwrap();
        assert_eq!(first, second);
    }
}

mod test_failures {
    use super::*;

    #[test]
    fn test_threshold_never_reached() {
        // Final value -5: every sample lies below both thresholds
        let time = [0.0, 1.0, 2.0, 3.0];
        let step = [1.0; 4];
        let output = [-10.0, -8.0, -6.0, -5.0];

        let err = identify(&step, &time, &output, Method::Smith).unwrap_err();
        match err {
            Error::ThresholdNotReached {
                method,
                fraction,
                threshold,
            } => {
                assert_eq!(method, Method::Smith);
                assert_eq!(fraction, 0.283);
                assert!((threshold - 0.283 * -5.0).abs() < 1e-12);
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_zero_mean_step_is_degenerate_gain() {
        let step = [-1.0, 1.0, -1.0, 1.0, -1.0, 1.0];
        let err = identify(&step, &SCENARIO_TIME, &SCENARIO_OUTPUT, Method::Smith).unwrap_err();
        assert_eq!(err, Error::DegenerateGain { step_mean: 0.0 });
    }

    #[test]
    fn test_flat_output_is_rejected() {
        let output = [1.0; 6];
        let err = identify(&SCENARIO_STEP, &SCENARIO_TIME, &output, Method::Smith).unwrap_err();
        assert!(matches!(err, Error::InvalidSamples { .. }));
    }

    #[test]
    fn test_malformed_series_are_rejected() {
        // Length mismatch
        let err = identify(&SCENARIO_STEP[..5], &SCENARIO_TIME, &SCENARIO_OUTPUT, Method::Smith)
            .unwrap_err();
        assert!(matches!(err, Error::InvalidSamples { .. }));

        // Single sample
        let err = identify(&[1.0], &[0.0], &[1.0], Method::Smith).unwrap_err();
        assert!(matches!(err, Error::InvalidSamples { .. }));

        // Time not strictly increasing
        let time = [0.0, 1.0, 1.0, 3.0, 4.0, 5.0];
        let err = identify(&SCENARIO_STEP, &time, &SCENARIO_OUTPUT, Method::Smith).unwrap_err();
        assert!(matches!(err, Error::InvalidSamples { .. }));

        // Non-finite output
        let mut output = SCENARIO_OUTPUT;
        output[3] = f64::NAN;
        let err = identify(&SCENARIO_STEP, &SCENARIO_TIME, &output, Method::Smith).unwrap_err();
        assert!(matches!(err, Error::InvalidSamples { .. }));
    }
}

mod test_method_selection {
    use super::*;

    #[test]
    fn test_parse_method_names() {
        assert_eq!("smith".parse::<Method>().unwrap(), Method::Smith);
        assert_eq!(" Sundaresan ".parse::<Method>().unwrap(), Method::Sundaresan);
        assert_eq!(Method::Smith.to_string(), "Smith");
    }

    #[test]
    fn test_unknown_method_is_unsupported() {
        let err = "broida".parse::<Method>().unwrap_err();
        assert_eq!(
            err,
            Error::UnsupportedConfiguration {
                kind: "identification method",
                value: "broida".to_owned(),
            }
        );
    }

    #[test]
    fn test_thresholds() {
        assert_eq!(Method::Smith.thresholds(), (0.283, 0.632));
        assert_eq!(Method::Sundaresan.thresholds(), (0.353, 0.853));
    }
}
