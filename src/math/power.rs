//! One-parameter Box–Cox power transform and its inverse.
//!
//! The standard forms are:
//!
//! - `boxcox(x, λ) = (x^λ - 1) / λ`        (λ ≠ 0), `ln x` in the limit λ → 0
//! - `inv_boxcox(y, λ) = (1 + λ·y)^(1/λ)`  (λ ≠ 0), `e^y` in the limit λ → 0
//!
//! Numerical notes:
//! - `x^λ - 1` suffers from catastrophic cancellation for small `λ·ln x`.
//!   We compute it as `expm1(λ·ln x)` instead.
//! - The inverse is computed as `exp(ln_1p(λ·y) / λ)` for the same reason.
//! - Below `SMALL_LAMBDA` we switch to the analytic λ → 0 limits.
//!
//! Domains: `boxcox` requires `x > 0`; `inv_boxcox` requires `1 + λ·y > 0`.
//! Out-of-domain inputs yield a non-finite result (NaN/±inf) rather than a
//! panic; callers validate or check finiteness.

/// Threshold below which |λ| is treated as zero and the log/exp limits apply.
const SMALL_LAMBDA: f64 = 1e-9;

/// Forward Box–Cox transform.
pub fn boxcox(x: f64, lambda: f64) -> f64 {
    let ln_x = x.ln();

    if lambda.abs() < SMALL_LAMBDA {
        return ln_x;
    }

    // (x^λ - 1) / λ computed as expm1(λ·ln x) / λ.
    (lambda * ln_x).exp_m1() / lambda
}

/// Inverse Box–Cox transform.
pub fn inv_boxcox(y: f64, lambda: f64) -> f64 {
    if lambda.abs() < SMALL_LAMBDA {
        return y.exp();
    }

    // (1 + λ·y)^(1/λ) computed as exp(ln_1p(λ·y) / λ).
    ((lambda * y).ln_1p() / lambda).exp()
}
