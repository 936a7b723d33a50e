/// Logistic function `1 / (1 + e^-x)`.
///
/// Evaluated through `e^-|x|` so large negative inputs never overflow the
/// exponential; the result lies in (0, 1) for every finite `x`.
pub fn sigmoid(x: f64) -> f64 {
    let e = (-x.abs()).exp();
    if x >= 0.0 {
        1.0 / (1.0 + e)
    } else {
        e / (1.0 + e)
    }
}

/// Derivative `e^-x / (1 + e^-x)^2`.
///
/// The expression is even in `x`, so it is computed from `e^-|x|` and stays
/// finite (tending to 0) at both tails.
pub fn sigmoid_derivative(x: f64) -> f64 {
    let e = (-x.abs()).exp();
    let denom = 1.0 + e;
    e / (denom * denom)
}
