// Polynomial arithmetic on coefficient slices in descending powers
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

//! Coefficients are stored highest power first: `[a, b, c]` is `a·s² + b·s + c`.

/// Removes leading zero coefficients, keeping at least one coefficient.
pub fn trim(coeffs: &[f64]) -> Vec<f64> {
    match coeffs.iter().position(|c| *c != 0.0) {
        Some(first) => coeffs[first..].to_vec(),
        None => vec![0.0],
    }
}

/// Degree of a (trimmed) polynomial. The zero polynomial has degree 0.
pub fn degree(coeffs: &[f64]) -> usize {
    trim(coeffs).len() - 1
}

/// Sum of two polynomials, aligned at the constant term.
pub fn add(lhs: &[f64], rhs: &[f64]) -> Vec<f64> {
    let len = lhs.len().max(rhs.len());
    let mut out = vec![0.0; len];
    for (o, c) in out[len - lhs.len()..].iter_mut().zip(lhs) {
        *o += *c;
    }
    for (o, c) in out[len - rhs.len()..].iter_mut().zip(rhs) {
        *o += *c;
    }
    trim(&out)
}

/// Product of two polynomials (coefficient convolution).
pub fn mul(lhs: &[f64], rhs: &[f64]) -> Vec<f64> {
    if lhs.is_empty() || rhs.is_empty() {
        return vec![0.0];
    }
    let mut out = vec![0.0; lhs.len() + rhs.len() - 1];
    for (i, a) in lhs.iter().enumerate() {
        for (j, b) in rhs.iter().enumerate() {
            out[i + j] += a * b;
        }
    }
    trim(&out)
}

/// Multiplies every coefficient by `factor`.
pub fn scale(coeffs: &[f64], factor: f64) -> Vec<f64> {
    trim(&coeffs.iter().map(|c| *c * factor).collect::<Vec<_>>())
}

/// Evaluates the polynomial at `x` with Horner's scheme.
pub fn eval(coeffs: &[f64], x: f64) -> f64 {
    coeffs.iter().fold(0.0, |acc, c| acc * x + *c)
}

/// True if every coefficient is finite.
pub fn is_finite(coeffs: &[f64]) -> bool {
    coeffs.iter().all(|c| c.is_finite())
}
