pub mod pid {
    use crate::control::transfer_function::TransferFunction;

    /// `C(s) = Kp`.
    pub fn proportional(kp: f64) -> TransferFunction {
        TransferFunction::gain(kp)
    }

    /// `C(s) = (Kp s + Ki) / s`.
    pub fn proportional_integral(kp: f64, ki: f64) -> TransferFunction {
        TransferFunction::over_s(&[kp, ki])
    }

    /// Ideal PID `C(s) = (Kd s^2 + Kp s + Ki) / s`.
    pub fn pid(kp: f64, ki: f64, kd: f64) -> TransferFunction {
        TransferFunction::over_s(&[kd, kp, ki])
    }
}

pub mod state_feedback {
    use nalgebra as na;
    use na::Complex;

    use crate::control::model::{StateSpace, StateSpaceModel};
    use crate::control::polynomial as poly;
    use crate::error::ControlError;

    /// Full state feedback `u = -K x`.
    #[derive(Clone, Debug)]
    pub struct Controller {
        gain: na::DMatrix<f64>,
    }

    impl Controller {
        /// Places the closed-loop poles of a single-input model with
        /// Ackermann's formula `K = [0 .. 0 1] Wc^-1 phi(A)`.
        pub fn place(
            model: &impl StateSpaceModel,
            poles: &[Complex<f64>],
        ) -> Result<Controller, ControlError> {
            let n = model.n_states();
            if model.n_inputs() != 1 {
                return Err(ControlError::NotSiso {
                    inputs: model.n_inputs(),
                    outputs: model.n_outputs(),
                });
            }
            if poles.len() != n {
                return Err(ControlError::DimensionMismatch {
                    what: "desired poles",
                    expected: (n, 1),
                    found: (poles.len(), 1),
                });
            }
            let desired = poly::from_roots(poles).ok_or(ControlError::InvalidPoles)?;
            if n == 0 {
                return Ok(Controller {
                    gain: na::DMatrix::zeros(1, 0),
                });
            }

            let mat_a = model.get_mat_a();
            let mat_b = model.get_mat_b();

            let mut mat_wc = na::DMatrix::<f64>::zeros(n, n);
            let mut column = mat_b.clone();
            for i in 0..n {
                mat_wc.column_mut(i).copy_from(&column.column(0));
                column = mat_a * column;
            }
            let mat_wc_inv = mat_wc.try_inverse().ok_or(ControlError::Uncontrollable)?;

            // phi(A) by Horner's scheme on matrices.
            let identity = na::DMatrix::<f64>::identity(n, n);
            let mat_phi = desired
                .iter()
                .fold(na::DMatrix::<f64>::zeros(n, n), |acc, &c| {
                    acc * mat_a + &identity * c
                });

            let mut selector = na::DMatrix::<f64>::zeros(1, n);
            selector[(0, n - 1)] = 1.0;

            Ok(Controller {
                gain: selector * mat_wc_inv * mat_phi,
            })
        }

        pub fn gain(&self) -> &na::DMatrix<f64> {
            &self.gain
        }

        /// Closed loop `dx/dt = (A - B K) x + B r` keeping the plant outputs.
        pub fn closed_loop(&self, model: &impl StateSpaceModel) -> Result<StateSpace, ControlError> {
            StateSpace::new(
                model.get_mat_a() - model.get_mat_b() * &self.gain,
                model.get_mat_b().clone(),
                model.get_mat_c().clone(),
                model.get_mat_d().clone(),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::model::{StateSpace, StateSpaceModel};
    use crate::error::ControlError;
    use approx::assert_relative_eq;
    use nalgebra as na;
    use na::Complex;

    fn unstable_plant() -> StateSpace {
        StateSpace::new(
            na::dmatrix![0.0, 1.0; 2.0, 1.0],
            na::dmatrix![0.0; 1.0],
            na::dmatrix![1.0, 0.0],
            na::dmatrix![0.0],
        )
        .unwrap()
    }

    #[test]
    fn ackermann_matches_hand_computed_gain() {
        let poles = [Complex::new(-2.0, 0.0), Complex::new(-3.0, 0.0)];
        let controller = state_feedback::Controller::place(&unstable_plant(), &poles).unwrap();
        assert_relative_eq!(controller.gain()[(0, 0)], 8.0, epsilon = 1e-9);
        assert_relative_eq!(controller.gain()[(0, 1)], 6.0, epsilon = 1e-9);

        let closed = controller.closed_loop(&unstable_plant()).unwrap();
        let mut placed = closed.poles();
        placed.sort_by(|a, b| a.re.total_cmp(&b.re));
        assert_relative_eq!(placed[0].re, -3.0, epsilon = 1e-8);
        assert_relative_eq!(placed[1].re, -2.0, epsilon = 1e-8);
    }

    #[test]
    fn complex_pair_is_placed() {
        let poles = [Complex::new(-1.0, 2.0), Complex::new(-1.0, -2.0)];
        let controller = state_feedback::Controller::place(&unstable_plant(), &poles).unwrap();
        let closed = controller.closed_loop(&unstable_plant()).unwrap();
        for p in closed.poles() {
            assert_relative_eq!(p.re, -1.0, epsilon = 1e-8);
            assert_relative_eq!(p.im.abs(), 2.0, epsilon = 1e-8);
        }
    }

    #[test]
    fn uncontrollable_pair_is_rejected() {
        let plant = StateSpace::new(
            na::dmatrix![-1.0, 0.0; 0.0, -2.0],
            na::dmatrix![1.0; 0.0],
            na::dmatrix![1.0, 1.0],
            na::dmatrix![0.0],
        )
        .unwrap();
        let poles = [Complex::new(-2.0, 0.0), Complex::new(-3.0, 0.0)];
        assert!(matches!(
            state_feedback::Controller::place(&plant, &poles),
            Err(ControlError::Uncontrollable)
        ));
        assert!(matches!(
            state_feedback::Controller::place(&unstable_plant(), &poles[..1]),
            Err(ControlError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn pid_numerators() {
        assert_eq!(pid::pid(200.0, 50.0, 20.0).num(), &[20.0, 200.0, 50.0]);
        assert_eq!(pid::proportional_integral(200.0, 50.0).den(), &[1.0, 0.0]);
        assert_eq!(pid::proportional(3.0).dc_gain(), 3.0);
    }
}
