// Rational approximation of a pure transport delay
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
use crate::tf::TransferFunction;

/// The delay approximant order used when building plant models.
pub const DEFAULT_PADE_ORDER: usize = 5;

/// Builds the `[order/order]` Padé approximant of `e^(-θs)`.
///
/// Coefficients follow the accumulative recurrence of Golub and Van Loan (Alg. 11.3.1), with
/// both polynomials normalized so that the leading denominator coefficient is one. A zero delay
/// yields the unit transfer function.
///
/// # Errors
/// - [`Error::DegenerateModel`] if `theta` is negative or not finite.
/// - [`Error::InvalidTransferFunction`] if `order` is zero.
pub fn pade(theta: f64, order: usize) -> Result<TransferFunction> {
    if !theta.is_finite() || theta < 0.0 {
        return Err(Error::DegenerateModel {
            tau: f64::NAN,
            theta,
        });
    }
    if order == 0 {
        return Err(Error::InvalidTransferFunction {
            reason: "Padé order must be at least 1".into(),
        });
    }
    if theta == 0.0 {
        return TransferFunction::new(&[1.0], &[1.0]);
    }

    let n = order as f64;
    let mut num = vec![0.0; order + 1];
    let mut den = vec![0.0; order + 1];
    num[order] = 1.0;
    den[order] = 1.0;

    let mut cn = 1.0;
    let mut cd = 1.0;
    for k in 1..=order {
        let kf = k as f64;
        let common = (n - kf + 1.0) / (2.0 * n - kf + 1.0) / kf;
        cn *= -theta * common;
        cd *= theta * common;
        num[order - k] = cn;
        den[order - k] = cd;
    }

    let lead = den[0];
    let num: Vec<f64> = num.iter().map(|c| c / lead).collect();
    let den: Vec<f64> = den.iter().map(|c| c / lead).collect();
    TransferFunction::new(&num, &den)
}
