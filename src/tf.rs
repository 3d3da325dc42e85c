// Rational Laplace-domain models and their composition
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
use core::ops::Mul;

use nalgebra as na;

use crate::error::{Error, Result};
use crate::poly;

/// A SISO transfer function `N(s) / D(s)`.
///
/// Polynomials are stored in descending powers of `s`, so `[2.0, 1.0]` is `2s + 1`. Every
/// composition returns a new value; a `TransferFunction` is never mutated in place.
///
/// Improper transfer functions (numerator degree above the denominator degree) are allowed for
/// algebra, since a PID controller is one, but cannot be simulated on their own.
#[derive(Debug, Clone, PartialEq)]
pub struct TransferFunction {
    num: Vec<f64>,
    den: Vec<f64>,
}

impl TransferFunction {
    /// Constructs a transfer function from numerator and denominator coefficients.
    ///
    /// Leading zeros are stripped from both polynomials.
    ///
    /// # Errors
    /// - [`Error::InvalidTransferFunction`] if either polynomial is empty or non-finite, or if
    ///   the denominator is identically zero.
    pub fn new(num: &[f64], den: &[f64]) -> Result<Self> {
        if num.is_empty() || den.is_empty() {
            return Err(Error::InvalidTransferFunction {
                reason: "empty polynomial".into(),
            });
        }
        if !poly::is_finite(num) || !poly::is_finite(den) {
            return Err(Error::InvalidTransferFunction {
                reason: "non-finite coefficient".into(),
            });
        }
        let den = poly::trim(den);
        if den[0] == 0.0 {
            return Err(Error::InvalidTransferFunction {
                reason: "denominator is identically zero".into(),
            });
        }
        Ok(Self {
            num: poly::trim(num),
            den,
        })
    }

    /// A static gain `k / 1`.
    pub fn gain(k: f64) -> Result<Self> {
        Self::new(&[k], &[1.0])
    }

    /// The first-order lag `k / (τs + 1)`.
    pub fn first_order(k: f64, tau: f64) -> Result<Self> {
        Self::new(&[k], &[tau, 1.0])
    }

    /// Numerator coefficients, highest power first.
    pub fn num(&self) -> &[f64] {
        &self.num
    }

    /// Denominator coefficients, highest power first.
    pub fn den(&self) -> &[f64] {
        &self.den
    }

    /// Order of the system, i.e. the degree of the denominator.
    pub fn order(&self) -> usize {
        self.den.len() - 1
    }

    /// True if the numerator degree does not exceed the denominator degree.
    pub fn is_proper(&self) -> bool {
        poly::degree(&self.num) <= self.order()
    }

    /// Series (cascade) composition `self · other`.
    pub fn series(&self, other: &TransferFunction) -> TransferFunction {
        TransferFunction {
            num: poly::mul(&self.num, &other.num),
            den: poly::mul(&self.den, &other.den),
        }
    }

    /// Closes a unity negative feedback loop around `self`: `G / (1 + G)`.
    ///
    /// With `G = N/D` this is `N / (D + N)`; no pole-zero cancellation is attempted.
    ///
    /// # Errors
    /// - [`Error::InvalidTransferFunction`] if `D + N` vanishes identically (e.g. `G = -1`).
    pub fn feedback(&self) -> Result<TransferFunction> {
        TransferFunction::new(&self.num, &poly::add(&self.den, &self.num))
    }

    /// Multiplies the transfer function by a scalar.
    pub fn scale(&self, factor: f64) -> TransferFunction {
        TransferFunction {
            num: poly::scale(&self.num, factor),
            den: self.den.clone(),
        }
    }

    /// Steady-state gain `N(0) / D(0)`, or `None` if the system has a pole at the origin.
    pub fn dc_gain(&self) -> Option<f64> {
        let den0 = poly::eval(&self.den, 0.0);
        if den0 == 0.0 {
            return None;
        }
        Some(poly::eval(&self.num, 0.0) / den0)
    }

    /// Poles of the system, the roots of the denominator.
    ///
    /// Computed as the eigenvalues of the companion matrix of the monic denominator.
    pub fn poles(&self) -> Vec<na::Complex<f64>> {
        let n = self.order();
        if n == 0 {
            return Vec::new();
        }
        let lead = self.den[0];
        let mut companion = na::DMatrix::<f64>::zeros(n, n);
        for j in 0..n {
            companion[(0, j)] = -self.den[j + 1] / lead;
        }
        for i in 1..n {
            companion[(i, i - 1)] = 1.0;
        }
        companion.complex_eigenvalues().iter().copied().collect()
    }

    /// The largest real part among the poles, or `-inf` for a static gain.
    pub fn max_pole_real_part(&self) -> f64 {
        self.poles()
            .iter()
            .map(|p| p.re)
            .fold(f64::NEG_INFINITY, f64::max)
    }
}

impl Mul for &TransferFunction {
    type Output = TransferFunction;

    fn mul(self, rhs: Self) -> Self::Output {
        self.series(rhs)
    }
}

impl Mul<f64> for &TransferFunction {
    type Output = TransferFunction;

    fn mul(self, rhs: f64) -> Self::Output {
        self.scale(rhs)
    }
}

struct PolyDisplay<'a>(&'a [f64]);

impl fmt::Display for PolyDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let degree = self.0.len() - 1;
        let mut first = true;
        for (i, c) in self.0.iter().enumerate() {
            let power = degree - i;
            if *c == 0.0 && !(first && power == 0) {
                continue;
            }
            if first {
                if *c < 0.0 {
                    f.write_str("-")?;
                }
            } else if *c < 0.0 {
                f.write_str(" - ")?;
            } else {
                f.write_str(" + ")?;
            }
            let mag = c.abs();
            let show_coeff = power == 0 || mag != 1.0;
            if show_coeff {
                write!(f, "{}", mag)?;
            }
            match power {
                0 => {}
                1 if show_coeff => f.write_str(" s")?,
                1 => f.write_str("s")?,
                _ if show_coeff => write!(f, " s^{}", power)?,
                _ => write!(f, "s^{}", power)?,
            }
            first = false;
        }
        Ok(())
    }
}

impl fmt::Display for TransferFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}) / ({})",
            PolyDisplay(&self.num),
            PolyDisplay(&self.den)
        )
    }
}
