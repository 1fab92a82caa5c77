// Ordinary-least-squares linear extrapolation.
//
// Fits a degree-1 polynomial to (index, value) pairs and projects it
// forward, clipping every projection to [0,1]. This is the forecasting
// path that is always available — the sequence model falls back to it on
// any failure.

/// Extrapolate `horizon` future values from a series of scores in [0,1].
///
/// Fewer than 2 points can't define a slope: the last known value (or 0.0
/// for an empty series) is repeated for every step.
pub fn linear_extrapolate(series: &[f64], horizon: usize) -> Vec<f64> {
    if series.len() < 2 {
        let last = series.last().copied().unwrap_or(0.0);
        return vec![last; horizon];
    }

    let (slope, intercept) = fit_line(series);
    let n = series.len() as f64;

    (1..=horizon)
        .map(|d| {
            let x = n - 1.0 + d as f64;
            (intercept + slope * x).clamp(0.0, 1.0)
        })
        .collect()
}

/// Least-squares fit of y = slope*x + intercept over x = 0..len.
///
/// Closed form: slope = Σ(x-x̄)(y-ȳ) / Σ(x-x̄)². The caller guarantees
/// at least 2 points, so the denominator is never zero.
pub fn fit_line(series: &[f64]) -> (f64, f64) {
    let n = series.len() as f64;
    let x_mean = (n - 1.0) / 2.0;
    let y_mean = series.iter().sum::<f64>() / n;

    let mut num = 0.0;
    let mut den = 0.0;
    for (i, &y) in series.iter().enumerate() {
        let dx = i as f64 - x_mean;
        num += dx * (y - y_mean);
        den += dx * dx;
    }

    let slope = num / den;
    let intercept = y_mean - slope * x_mean;
    (slope, intercept)
}
