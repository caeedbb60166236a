extern crate nalgebra as na;

use na::Complex;

use crate::control::eigen;
use crate::error::{check_shape, ControlError};

/// Continuous-time linear system `dx/dt = A x + B u`, `y = C x + D u`.
pub trait StateSpaceModel {
    fn get_mat_a(&self) -> &na::DMatrix<f64>;
    fn get_mat_b(&self) -> &na::DMatrix<f64>;
    fn get_mat_c(&self) -> &na::DMatrix<f64>;
    fn get_mat_d(&self) -> &na::DMatrix<f64>;

    fn n_states(&self) -> usize {
        self.get_mat_a().nrows()
    }

    fn n_inputs(&self) -> usize {
        self.get_mat_b().ncols()
    }

    fn n_outputs(&self) -> usize {
        self.get_mat_c().nrows()
    }

    fn poles(&self) -> Vec<Complex<f64>> {
        eigen::eigenvalues(self.get_mat_a())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct StateSpace {
    mat_a: na::DMatrix<f64>,
    mat_b: na::DMatrix<f64>,
    mat_c: na::DMatrix<f64>,
    mat_d: na::DMatrix<f64>,
}

impl StateSpace {
    pub fn new(
        mat_a: na::DMatrix<f64>,
        mat_b: na::DMatrix<f64>,
        mat_c: na::DMatrix<f64>,
        mat_d: na::DMatrix<f64>,
    ) -> Result<StateSpace, ControlError> {
        let n = mat_a.nrows();
        let m = mat_b.ncols();
        let p = mat_c.nrows();
        check_shape("state matrix A", mat_a.shape(), (n, n))?;
        check_shape("input matrix B", mat_b.shape(), (n, m))?;
        check_shape("output matrix C", mat_c.shape(), (p, n))?;
        check_shape("feedthrough matrix D", mat_d.shape(), (p, m))?;

        Ok(StateSpace {
            mat_a,
            mat_b,
            mat_c,
            mat_d,
        })
    }

    pub fn scalar(a: f64, b: f64, c: f64, d: f64) -> StateSpace {
        StateSpace {
            mat_a: na::dmatrix![a],
            mat_b: na::dmatrix![b],
            mat_c: na::dmatrix![c],
            mat_d: na::dmatrix![d],
        }
    }

    /// Same system with the direct feedthrough removed.
    pub fn without_feedthrough(&self) -> StateSpace {
        StateSpace {
            mat_d: na::DMatrix::zeros(self.mat_d.nrows(), self.mat_d.ncols()),
            ..self.clone()
        }
    }
}

impl StateSpaceModel for StateSpace {
    fn get_mat_a(&self) -> &na::DMatrix<f64> {
        &self.mat_a
    }

    fn get_mat_b(&self) -> &na::DMatrix<f64> {
        &self.mat_b
    }

    fn get_mat_c(&self) -> &na::DMatrix<f64> {
        &self.mat_c
    }

    fn get_mat_d(&self) -> &na::DMatrix<f64> {
        &self.mat_d
    }
}

macro_rules! impl_state_space_model {
    ($model:ty) => {
        impl crate::control::model::StateSpaceModel for $model {
            fn get_mat_a(&self) -> &na::DMatrix<f64> {
                &self.mat_a
            }

            fn get_mat_b(&self) -> &na::DMatrix<f64> {
                &self.mat_b
            }

            fn get_mat_c(&self) -> &na::DMatrix<f64> {
                &self.mat_c
            }

            fn get_mat_d(&self) -> &na::DMatrix<f64> {
                &self.mat_d
            }
        }
    };
}

pub mod spring_mass_damper {

    extern crate nalgebra as na;
    use std::default::Default;

    #[derive(Clone, Copy, Debug)]
    pub struct Parameters {
        pub m: f64,
        pub k: f64,
        pub b: f64,
    }

    impl Default for Parameters {
        fn default() -> Parameters {
            Parameters {
                m: 250.0,
                k: 40.0,
                b: 40.0,
            }
        }
    }

    /// Mass on a spring with viscous damping; the output is the position.
    #[derive(Clone)]
    pub struct Model {
        mat_a: na::DMatrix<f64>,
        mat_b: na::DMatrix<f64>,
        mat_c: na::DMatrix<f64>,
        mat_d: na::DMatrix<f64>,
    }

    impl Model {
        pub fn new(params: Parameters) -> Model {
            Model {
                mat_a: na::dmatrix![
                    0.0, 1.0;
                    -params.k / params.m, -params.b / params.m
                ],
                mat_b: na::dmatrix![0.0; 1.0 / params.m],
                mat_c: na::dmatrix![1.0, 0.0],
                mat_d: na::dmatrix![0.0],
            }
        }
    }

    impl_state_space_model!(Model);
}

pub mod second_order {

    extern crate nalgebra as na;
    use std::default::Default;

    #[derive(Clone, Copy, Debug)]
    pub struct Parameters {
        /// Damping ratio.
        pub zeta: f64,
        /// Natural frequency in rad/s.
        pub omega0: f64,
    }

    impl Default for Parameters {
        fn default() -> Parameters {
            Parameters {
                zeta: 0.4,
                omega0: 2.0,
            }
        }
    }

    #[derive(Clone)]
    pub struct Model {
        mat_a: na::DMatrix<f64>,
        mat_b: na::DMatrix<f64>,
        mat_c: na::DMatrix<f64>,
        mat_d: na::DMatrix<f64>,
    }

    impl Model {
        pub fn new(params: Parameters) -> Model {
            let w0 = params.omega0;
            Model {
                mat_a: na::dmatrix![
                    0.0, 1.0;
                    -w0 * w0, -2.0 * params.zeta * w0
                ],
                mat_b: na::dmatrix![0.0; 1.0],
                mat_c: na::dmatrix![1.0, 0.0],
                mat_d: na::dmatrix![0.0],
            }
        }
    }

    impl_state_space_model!(Model);
}

pub mod rotation {

    extern crate nalgebra as na;
    use std::default::Default;

    /// `A = [[alpha, beta], [-beta, alpha]]`, eigenvalues `alpha +/- j beta`.
    #[derive(Clone, Copy, Debug)]
    pub struct Parameters {
        pub alpha: f64,
        pub beta: f64,
    }

    impl Default for Parameters {
        fn default() -> Parameters {
            Parameters {
                alpha: -1.0,
                beta: 1.0,
            }
        }
    }

    /// Unforced system observing both states directly.
    #[derive(Clone)]
    pub struct Model {
        mat_a: na::DMatrix<f64>,
        mat_b: na::DMatrix<f64>,
        mat_c: na::DMatrix<f64>,
        mat_d: na::DMatrix<f64>,
    }

    impl Model {
        pub fn new(params: Parameters) -> Model {
            Model {
                mat_a: na::dmatrix![
                    params.alpha, params.beta;
                    -params.beta, params.alpha
                ],
                mat_b: na::DMatrix::zeros(2, 1),
                mat_c: na::DMatrix::identity(2, 2),
                mat_d: na::DMatrix::zeros(2, 1),
            }
        }
    }

    impl_state_space_model!(Model);
}

pub mod cruise_control {

    extern crate nalgebra as na;
    use std::default::Default;

    /// Longitudinal car dynamics `m dv/dt = -b v + u`.
    #[derive(Clone, Copy, Debug)]
    pub struct Parameters {
        /// Vehicle mass [kg]
        pub m: f64,
        /// Drag coefficient [N.s/m]
        pub b: f64,
    }

    impl Default for Parameters {
        fn default() -> Parameters {
            Parameters { m: 1000.0, b: 50.0 }
        }
    }

    #[derive(Clone)]
    pub struct Model {
        mat_a: na::DMatrix<f64>,
        mat_b: na::DMatrix<f64>,
        mat_c: na::DMatrix<f64>,
        mat_d: na::DMatrix<f64>,
    }

    impl Model {
        pub fn new(params: Parameters) -> Model {
            Model {
                mat_a: na::dmatrix![-params.b / params.m],
                mat_b: na::dmatrix![1.0 / params.m],
                mat_c: na::dmatrix![1.0],
                mat_d: na::dmatrix![0.0],
            }
        }
    }

    impl_state_space_model!(Model);
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn rejects_non_conformable_matrices() {
        let err = StateSpace::new(
            na::DMatrix::identity(2, 2),
            na::DMatrix::zeros(3, 1),
            na::DMatrix::zeros(1, 2),
            na::DMatrix::zeros(1, 1),
        )
        .unwrap_err();
        assert!(matches!(err, ControlError::DimensionMismatch { .. }));

        let err = StateSpace::new(
            na::DMatrix::zeros(2, 3),
            na::DMatrix::zeros(2, 1),
            na::DMatrix::zeros(1, 2),
            na::DMatrix::zeros(1, 1),
        )
        .unwrap_err();
        assert!(matches!(err, ControlError::DimensionMismatch { .. }));
    }

    #[test]
    fn overdamped_second_order_has_real_poles() {
        let (zeta, w0) = (1.2f64, 1.0f64);
        let model = second_order::Model::new(second_order::Parameters { zeta, omega0: w0 });
        let mut poles = model.poles();
        poles.sort_by(|a, b| a.re.total_cmp(&b.re));

        let root = w0 * (zeta * zeta - 1.0).sqrt();
        assert_relative_eq!(poles[0].re, -zeta * w0 - root, epsilon = 1e-6);
        assert_relative_eq!(poles[1].re, -zeta * w0 + root, epsilon = 1e-6);
        assert!(poles.iter().all(|p| p.im.abs() < 1e-6 && p.re < 0.0));
    }

    #[test]
    fn rotation_poles_are_alpha_plus_minus_j_beta() {
        let model = rotation::Model::new(rotation::Parameters {
            alpha: -1.0,
            beta: 2.0,
        });
        for p in model.poles() {
            assert_relative_eq!(p.re, -1.0, epsilon = 1e-10);
            assert_relative_eq!(p.im.abs(), 2.0, epsilon = 1e-10);
        }
        assert_eq!(model.n_outputs(), 2);
        assert_eq!(model.n_inputs(), 1);
    }
}
