use std::f64::consts::PI;

use nalgebra as na;
use na::Complex;

use crate::control::polynomial as poly;
use crate::control::transfer_function::TransferFunction;

pub use crate::control::trajectory::logspace;

/// Bode data sampled on a frequency grid.
#[derive(Clone, Debug)]
pub struct FrequencyResponse {
    /// Frequencies in rad/s.
    pub omega: Vec<f64>,
    pub response: Vec<Complex<f64>>,
    pub magnitude: Vec<f64>,
    /// Unwrapped phase in degrees.
    pub phase_deg: Vec<f64>,
}

impl FrequencyResponse {
    pub fn magnitude_db(&self) -> Vec<f64> {
        self.magnitude.iter().map(|m| 20.0 * m.log10()).collect()
    }
}

pub fn frequency_response(tf: &TransferFunction, omega: &[f64]) -> FrequencyResponse {
    let response: Vec<Complex<f64>> = omega.iter().map(|&w| tf.freq_response(w)).collect();
    let magnitude = response.iter().map(|g| g.norm()).collect();

    let mut phase_deg: Vec<f64> = Vec::with_capacity(response.len());
    for g in &response {
        let mut phase = g.arg().to_degrees();
        if let Some(&prev) = phase_deg.last() {
            while phase - prev > 180.0 {
                phase -= 360.0;
            }
            while phase - prev < -180.0 {
                phase += 360.0;
            }
        }
        phase_deg.push(phase);
    }

    FrequencyResponse {
        omega: omega.to_vec(),
        response,
        magnitude,
        phase_deg,
    }
}

/// Decade range `(lo, hi)` reaching one decade past the extreme nonzero
/// pole and zero magnitudes.
pub fn default_frequency_range(tf: &TransferFunction) -> (f64, f64) {
    let features: Vec<f64> = tf
        .poles()
        .into_iter()
        .chain(tf.zeros())
        .map(|p| p.norm())
        .filter(|m| *m > 1e-9)
        .collect();
    if features.is_empty() {
        return (-2.0, 2.0);
    }
    let lo = features.iter().cloned().fold(f64::INFINITY, f64::min);
    let hi = features.iter().cloned().fold(0.0f64, f64::max);
    (lo.log10().floor() - 1.0, hi.log10().ceil() + 1.0)
}

/// Nyquist contour sampled on positive frequencies; the negative branch is
/// the complex conjugate.
#[derive(Clone, Debug)]
pub struct NyquistCurve {
    pub omega: Vec<f64>,
    pub points: Vec<Complex<f64>>,
    /// Frequencies of open-loop poles on the imaginary axis, repeated by
    /// multiplicity. The contour indents around them to the right.
    pub axis_poles: Vec<f64>,
}

impl NyquistCurve {
    /// Negative-frequency branch ordered from `-w_max` to `-w_min`.
    pub fn mirrored(&self) -> Vec<Complex<f64>> {
        self.points.iter().rev().map(|p| p.conj()).collect()
    }

    /// Net clockwise encirclements of `-1` by the closed contour.
    ///
    /// A step that jumps over `k` imaginary-axis poles follows the image of
    /// the indentation, a large clockwise arc of `k * pi`.
    pub fn encirclements(&self) -> i32 {
        let path: Vec<(f64, Complex<f64>)> = self
            .omega
            .iter()
            .rev()
            .map(|w| -w)
            .zip(self.mirrored())
            .chain(self.omega.iter().cloned().zip(self.points.iter().cloned()))
            .filter(|(_, p)| p.re.is_finite() && p.im.is_finite())
            .map(|(w, p)| (w, p + Complex::new(1.0, 0.0)))
            .collect();
        if path.len() < 2 {
            return 0;
        }

        let mut total = 0.0;
        for i in 0..path.len() {
            let (w_a, a) = path[i];
            let (w_b, b) = path[(i + 1) % path.len()];
            let mut delta = b.arg() - a.arg();
            if delta > PI {
                delta -= 2.0 * PI;
            } else if delta < -PI {
                delta += 2.0 * PI;
            }
            // The wrap from +w_max back to -w_max passes through infinity,
            // where a proper loop has no poles.
            let skipped = if w_b > w_a {
                self.axis_poles
                    .iter()
                    .filter(|&&f| w_a < f && f < w_b)
                    .count()
            } else {
                0
            };
            if skipped > 0 {
                let target = -(skipped as f64) * PI;
                delta += 2.0 * PI * ((target - delta) / (2.0 * PI)).round();
            }
            total += delta;
        }
        -(total / (2.0 * PI)).round() as i32
    }
}

pub fn nyquist_curve(tf: &TransferFunction, omega: &[f64]) -> NyquistCurve {
    let axis_poles = tf
        .poles()
        .into_iter()
        .filter(|p| p.re.abs() <= 1e-9 * (1.0 + p.norm()))
        .map(|p| p.im)
        .collect();
    NyquistCurve {
        omega: omega.to_vec(),
        points: omega.iter().map(|&w| tf.freq_response(w)).collect(),
        axis_poles,
    }
}

/// Classical gain and phase margins of an open loop.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StabilityMargins {
    /// Gain margin as a ratio; infinite when the phase never reaches -180.
    pub gain_margin: f64,
    /// Phase margin in degrees; infinite when the gain never crosses 1.
    pub phase_margin: f64,
    /// Frequency where the gain margin is measured (rad/s), NaN if none.
    pub phase_crossover: f64,
    /// Frequency where the phase margin is measured (rad/s), NaN if none.
    pub gain_crossover: f64,
}

impl StabilityMargins {
    pub fn gain_margin_db(&self) -> f64 {
        if self.gain_margin == 0.0 || self.gain_margin.is_infinite() {
            return f64::INFINITY;
        }
        20.0 * self.gain_margin.log10()
    }
}

/// Frequencies where `|G(jw)| = 1`: the positive roots of
/// `n(s)n(-s) - d(s)d(-s)` on the imaginary axis.
fn gain_crossovers(tf: &TransferFunction) -> Vec<f64> {
    let nn = poly::mul(tf.num(), &poly::reflect(tf.num()));
    let dd = poly::mul(tf.den(), &poly::reflect(tf.den()));
    let in_w2 = poly::even_part_in_w2(&poly::sub(&nn, &dd));
    positive_frequencies(&in_w2)
}

/// Frequencies where `G(jw)` is real and negative: roots of the odd part of
/// `n(s)d(-s)`, which carries `Im G(jw)`.
fn phase_crossovers(tf: &TransferFunction) -> Vec<f64> {
    let cross = poly::mul(tf.num(), &poly::reflect(tf.den()));
    let in_w2 = poly::odd_part_in_w2(&cross);
    positive_frequencies(&in_w2)
        .into_iter()
        .filter(|&w| {
            let g = tf.freq_response(w);
            g.re.is_finite() && g.re < 0.0
        })
        .collect()
}

fn positive_frequencies(in_w2: &[f64]) -> Vec<f64> {
    poly::nonnegative_real_roots(in_w2)
        .into_iter()
        .map(f64::sqrt)
        .filter(|&w| w > 1e-9)
        .collect()
}

pub fn stability_margins(tf: &TransferFunction) -> StabilityMargins {
    let mut margins = StabilityMargins {
        gain_margin: f64::INFINITY,
        phase_margin: f64::INFINITY,
        phase_crossover: f64::NAN,
        gain_crossover: f64::NAN,
    };

    // Gain margin closest to unity on a log scale.
    let mut best = f64::INFINITY;
    for w in phase_crossovers(tf) {
        let gm = 1.0 / tf.freq_response(w).norm();
        if gm.ln().abs() < best {
            best = gm.ln().abs();
            margins.gain_margin = gm;
            margins.phase_crossover = w;
        }
    }

    let mut best = f64::INFINITY;
    for w in gain_crossovers(tf) {
        let phase = tf.freq_response(w).arg().to_degrees();
        let pm = phase.rem_euclid(360.0) - 180.0;
        if pm.abs() < best {
            best = pm.abs();
            margins.phase_margin = pm;
            margins.gain_crossover = w;
        }
    }

    margins
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn tf(num: &[f64], den: &[f64]) -> TransferFunction {
        TransferFunction::new(num, den).unwrap()
    }

    #[test]
    fn high_gain_second_order_margins() {
        let m = stability_margins(&tf(&[10.0], &[1.0, 2.0, 1.0]));
        assert_relative_eq!(m.gain_crossover, 3.0, epsilon = 1e-8);
        assert_relative_eq!(m.phase_margin, 180.0 - 2.0 * 3f64.atan().to_degrees(), epsilon = 1e-6);
        assert!(m.gain_margin.is_infinite());
        assert!(m.phase_crossover.is_nan());
    }

    #[test]
    fn underdamped_margins() {
        let m = stability_margins(&tf(&[1.0], &[1.0, 1.0, 1.0]));
        assert_relative_eq!(m.gain_crossover, 1.0, epsilon = 1e-8);
        assert_relative_eq!(m.phase_margin, 90.0, epsilon = 1e-6);
    }

    #[test]
    fn third_order_has_finite_gain_margin() {
        // 1/(s+1)^3 crosses -180 at w = sqrt(3) where |G| = 1/8.
        let m = stability_margins(&tf(&[1.0], &[1.0, 3.0, 3.0, 1.0]));
        assert_relative_eq!(m.phase_crossover, 3f64.sqrt(), epsilon = 1e-8);
        assert_relative_eq!(m.gain_margin, 8.0, epsilon = 1e-8);
        assert_relative_eq!(m.gain_margin_db(), 20.0 * 8f64.log10(), epsilon = 1e-8);
    }

    #[test]
    fn first_order_never_crosses() {
        let m = stability_margins(&tf(&[1.0], &[1.0, 1.0]));
        assert!(m.gain_margin.is_infinite());
        assert!(m.phase_margin.is_infinite());
    }

    #[test]
    fn phase_is_unwrapped() {
        let g = tf(&[1.0], &[1.0, 3.0, 3.0, 1.0]);
        let fr = frequency_response(&g, &logspace(-2.0, 2.0, 400));
        let last = *fr.phase_deg.last().unwrap();
        assert!(last < -260.0 && last > -270.0);
        assert!(fr.phase_deg.windows(2).all(|w| (w[1] - w[0]).abs() < 10.0));
    }

    #[test]
    fn nyquist_counts_counterclockwise_encirclement() {
        // 2/(s-1): one open-loop RHP pole, closed loop 2/(s+1) is stable,
        // so the contour must circle -1 once counter-clockwise.
        let curve = nyquist_curve(&tf(&[2.0], &[1.0, -1.0]), &logspace(-3.0, 3.0, 2000));
        assert_eq!(curve.encirclements(), -1);

        let curve = nyquist_curve(&tf(&[10.0], &[1.0, 2.0, 1.0]), &logspace(-3.0, 3.0, 2000));
        assert_eq!(curve.encirclements(), 0);
    }

    #[test]
    fn integrator_loop_closes_through_indentation() {
        // K/(s(s+1)^2) closes to s^3 + 2s^2 + s + K, stable only for K < 2.
        let omega = logspace(-2.0, 2.0, 1000);
        let curve = nyquist_curve(&tf(&[1.0], &[1.0, 2.0, 1.0, 0.0]), &omega);
        assert_eq!(curve.axis_poles, vec![0.0]);
        assert_eq!(curve.encirclements(), 0);

        let curve = nyquist_curve(&tf(&[4.0], &[1.0, 2.0, 1.0, 0.0]), &omega);
        assert_eq!(curve.encirclements(), 2);
    }

    #[test]
    fn default_range_brackets_features() {
        let (lo, hi) = default_frequency_range(&tf(&[5.0, 10.0], &[1.0, 10.0]));
        assert_eq!((lo, hi), (-1.0, 2.0));
    }
}
