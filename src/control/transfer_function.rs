use std::fmt;
use std::ops::Mul;

use nalgebra as na;
use na::Complex;

use crate::control::model::{StateSpace, StateSpaceModel};
use crate::control::polynomial as poly;
use crate::error::ControlError;

/// SISO rational transfer function `num(s) / den(s)`, coefficients in
/// descending powers of `s`.
#[derive(Clone, Debug, PartialEq)]
pub struct TransferFunction {
    num: Vec<f64>,
    den: Vec<f64>,
}

impl TransferFunction {
    pub fn new(num: &[f64], den: &[f64]) -> Result<TransferFunction, ControlError> {
        let den = poly::trim(den);
        if poly::is_zero(&den) {
            return Err(ControlError::ZeroDenominator);
        }
        Ok(TransferFunction {
            num: poly::trim(num),
            den,
        })
    }

    /// Static gain `k / 1`.
    pub fn gain(k: f64) -> TransferFunction {
        TransferFunction {
            num: vec![k],
            den: vec![1.0],
        }
    }

    /// `num(s) / s`.
    pub fn over_s(num: &[f64]) -> TransferFunction {
        TransferFunction {
            num: poly::trim(num),
            den: vec![1.0, 0.0],
        }
    }

    pub fn num(&self) -> &[f64] {
        &self.num
    }

    pub fn den(&self) -> &[f64] {
        &self.den
    }

    pub fn poles(&self) -> Vec<Complex<f64>> {
        poly::roots(&self.den)
    }

    pub fn zeros(&self) -> Vec<Complex<f64>> {
        if poly::is_zero(&self.num) {
            return Vec::new();
        }
        poly::roots(&self.num)
    }

    pub fn eval(&self, s: Complex<f64>) -> Complex<f64> {
        poly::eval_complex(&self.num, s) / poly::eval_complex(&self.den, s)
    }

    /// `G(jw)`.
    pub fn freq_response(&self, omega: f64) -> Complex<f64> {
        self.eval(Complex::new(0.0, omega))
    }

    /// `G(0)`; infinite for a pole at the origin, NaN for `0/0`.
    pub fn dc_gain(&self) -> f64 {
        let n0 = poly::eval(&self.num, 0.0);
        let d0 = poly::eval(&self.den, 0.0);
        if d0 == 0.0 {
            if n0 == 0.0 {
                return f64::NAN;
            }
            return f64::INFINITY.copysign(n0);
        }
        n0 / d0
    }

    pub fn is_proper(&self) -> bool {
        poly::degree(&self.num) <= poly::degree(&self.den)
    }

    pub fn series(&self, other: &TransferFunction) -> TransferFunction {
        TransferFunction {
            num: poly::trim(&poly::mul(&self.num, &other.num)),
            den: poly::trim(&poly::mul(&self.den, &other.den)),
        }
    }

    /// Negative feedback loop `G / (1 + G H)`.
    pub fn feedback(&self, h: &TransferFunction) -> TransferFunction {
        let num = poly::mul(&self.num, &h.den);
        let den = poly::add(
            &poly::mul(&self.den, &h.den),
            &poly::mul(&self.num, &h.num),
        );
        TransferFunction {
            num: poly::trim(&num),
            den: poly::trim(&den),
        }
    }

    pub fn unity_feedback(&self) -> TransferFunction {
        self.feedback(&TransferFunction::gain(1.0))
    }

    /// SISO transfer function of a state-space model. The denominator is the
    /// characteristic polynomial of A and the numerator uses
    /// `C adj(sI - A) B = det(sI - A + BC) - det(sI - A)`.
    pub fn from_state_space(model: &impl StateSpaceModel) -> Result<TransferFunction, ControlError> {
        if model.n_inputs() != 1 || model.n_outputs() != 1 {
            return Err(ControlError::NotSiso {
                inputs: model.n_inputs(),
                outputs: model.n_outputs(),
            });
        }
        let mat_a = model.get_mat_a();
        let den = characteristic_polynomial(mat_a);
        let coupled = characteristic_polynomial(&(mat_a - model.get_mat_b() * model.get_mat_c()));
        let d = model.get_mat_d()[(0, 0)];
        let num = poly::add(&poly::sub(&coupled, &den), &poly::scale(&den, d));
        TransferFunction::new(&num, &den)
    }

    /// Controllable canonical realisation.
    pub fn to_state_space(&self) -> Result<StateSpace, ControlError> {
        let n = poly::degree(&self.den);
        if !self.is_proper() {
            return Err(ControlError::ImproperTransferFunction {
                num_degree: poly::degree(&self.num),
                den_degree: n,
            });
        }

        let lead = self.den[0];
        let den: Vec<f64> = self.den.iter().map(|c| c / lead).collect();
        let mut num = vec![0.0; n + 1 - self.num.len()];
        num.extend(self.num.iter().map(|c| c / lead));

        let d = num[0];
        let remainder = poly::sub(&num, &poly::scale(&den, d));

        let mut mat_a = na::DMatrix::<f64>::zeros(n, n);
        for j in 0..n {
            mat_a[(0, j)] = -den[j + 1];
        }
        for i in 1..n {
            mat_a[(i, i - 1)] = 1.0;
        }
        let mut mat_b = na::DMatrix::<f64>::zeros(n, 1);
        if n > 0 {
            mat_b[(0, 0)] = 1.0;
        }
        let mat_c = na::DMatrix::from_row_slice(1, n, &remainder[1..]);

        StateSpace::new(mat_a, mat_b, mat_c, na::dmatrix![d])
    }
}

impl Mul for &TransferFunction {
    type Output = TransferFunction;

    fn mul(self, rhs: &TransferFunction) -> TransferFunction {
        self.series(rhs)
    }
}

impl fmt::Display for TransferFunction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "({}) / ({})",
            poly::format(&self.num),
            poly::format(&self.den)
        )
    }
}

/// Monic characteristic polynomial `det(sI - A)` by Faddeev-LeVerrier.
pub fn characteristic_polynomial(mat_a: &na::DMatrix<f64>) -> Vec<f64> {
    let n = mat_a.nrows();
    let mut coeffs = vec![0.0; n + 1];
    coeffs[0] = 1.0;

    let mut mat_m = na::DMatrix::<f64>::zeros(n, n);
    let identity = na::DMatrix::<f64>::identity(n, n);
    for k in 1..=n {
        mat_m = mat_a * &mat_m + &identity * coeffs[k - 1];
        coeffs[k] = -(mat_a * &mat_m).trace() / k as f64;
    }
    coeffs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::simulator::steady_state_gain;
    use approx::assert_relative_eq;

    #[test]
    fn rejects_zero_denominator() {
        assert!(matches!(
            TransferFunction::new(&[1.0], &[0.0, 0.0]),
            Err(ControlError::ZeroDenominator)
        ));
    }

    #[test]
    fn characteristic_polynomial_of_companion() {
        let mat_a = na::dmatrix![0.0, 1.0; -6.0, -5.0];
        let p = characteristic_polynomial(&mat_a);
        assert_relative_eq!(p[1], 5.0, epsilon = 1e-12);
        assert_relative_eq!(p[2], 6.0, epsilon = 1e-12);
    }

    #[test]
    fn state_space_round_trip_keeps_numerator_and_gain() {
        let tf = TransferFunction::new(&[25.0, 25.0], &[1.0, 4.0, 20.0, 32.0]).unwrap();
        let ss = tf.to_state_space().unwrap();
        let back = TransferFunction::from_state_space(&ss).unwrap();
        assert_relative_eq!(back.dc_gain(), tf.dc_gain(), epsilon = 1e-9);
        assert_relative_eq!(
            steady_state_gain(&ss).unwrap()[(0, 0)],
            25.0 / 32.0,
            epsilon = 1e-12
        );
        for (a, b) in back.num().iter().zip(tf.num()) {
            assert_relative_eq!(*a, *b, epsilon = 1e-9);
        }
    }

    #[test]
    fn biproper_realisation_has_feedthrough() {
        let tf = TransferFunction::new(&[5.0, 10.0], &[1.0, 10.0]).unwrap();
        let ss = tf.to_state_space().unwrap();
        assert_eq!(ss.get_mat_d()[(0, 0)], 5.0);
        assert_relative_eq!(ss.get_mat_c()[(0, 0)], -40.0);
    }

    #[test]
    fn improper_is_rejected() {
        let tf = TransferFunction::new(&[1.0, 0.0, 0.0], &[1.0, 1.0]).unwrap();
        assert!(!tf.is_proper());
        assert!(matches!(
            tf.to_state_space(),
            Err(ControlError::ImproperTransferFunction { .. })
        ));
    }

    #[test]
    fn integrator_in_loop_gives_unit_tracking_and_zero_disturbance_gain() {
        let plant = TransferFunction::new(&[1e-3], &[1.0, 0.05]).unwrap();
        let pi = TransferFunction::new(&[200.0, 50.0], &[1.0, 0.0]).unwrap();
        assert_relative_eq!((&pi * &plant).unity_feedback().dc_gain(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(plant.feedback(&pi).dc_gain(), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn dc_gain_of_integrator_is_infinite() {
        let tf = TransferFunction::new(&[1.0], &[1.0, 0.0]).unwrap();
        assert!(tf.dc_gain().is_infinite());
    }
}
