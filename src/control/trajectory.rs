extern crate nalgebra as na;

/// `n` evenly spaced samples from `start` to `stop` inclusive.
pub fn linspace(start: f64, stop: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (n - 1) as f64;
            (0..n).map(|i| start + step * i as f64).collect()
        }
    }
}

/// `n` logarithmically spaced samples from `10^start` to `10^stop`.
pub fn logspace(start: f64, stop: f64, n: usize) -> Vec<f64> {
    linspace(start, stop, n)
        .into_iter()
        .map(|e| 10f64.powf(e))
        .collect()
}

pub fn constant_input(time: &[f64], value: f64) -> na::DMatrix<f64> {
    na::DMatrix::from_element(1, time.len(), value)
}

pub fn step_input(time: &[f64]) -> na::DMatrix<f64> {
    constant_input(time, 1.0)
}

/// `u(t) = sin(omega t)` as a single-input row.
pub fn sinusoid_input(time: &[f64], omega: f64) -> na::DMatrix<f64> {
    na::DMatrix::from_iterator(1, time.len(), time.iter().map(|t| (omega * t).sin()))
}
