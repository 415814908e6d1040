/// Spread shared by every dimension's kernel when none is configured.
pub const DEFAULT_SIGMA: f64 = 15.0;

/// Returns `sigma` when it is usable as a kernel width, otherwise [`DEFAULT_SIGMA`].
pub fn is_usable_sigma(sigma: f64) -> bool {
    sigma.is_finite() && sigma > 0.0
}

pub fn effective_sigma(sigma: f64) -> f64 {
    if is_usable_sigma(sigma) {
        sigma
    } else {
        DEFAULT_SIGMA
    }
}

/// Gaussian similarity of `value` to the reference `mean`.
///
/// This is an unnormalized kernel, not a density: it is exactly `1.0` at the
/// mean and decays symmetrically toward `0.0` as the value moves away.
pub fn likelihood(value: f64, mean: f64, sigma: f64) -> f64 {
    let sigma = effective_sigma(sigma);
    let delta = value - mean;
    (-(delta * delta) / (2.0 * sigma * sigma)).exp()
}
