use nalgebra as na;

use crate::control::model::StateSpaceModel;
pub use crate::control::trajectory::linspace;
use crate::control::trajectory::step_input;
use crate::error::{check_shape, ControlError};

/// Sampled trajectory of a simulated system.
#[derive(Clone, Debug)]
pub struct Response {
    pub time: Vec<f64>,
    /// One row per output, one column per time sample.
    pub outputs: na::DMatrix<f64>,
    /// One row per state, one column per time sample.
    pub states: na::DMatrix<f64>,
}

impl Response {
    pub fn output(&self, index: usize) -> Vec<f64> {
        self.outputs.row(index).iter().cloned().collect()
    }

    pub fn state(&self, index: usize) -> Vec<f64> {
        self.states.row(index).iter().cloned().collect()
    }

    pub fn final_output(&self, index: usize) -> f64 {
        self.outputs[(index, self.outputs.ncols() - 1)]
    }

    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }
}

/// First-order-hold discretisation of a continuous model.
struct Discretization {
    mat_ad: na::DMatrix<f64>,
    mat_bd0: na::DMatrix<f64>,
    mat_bd1: na::DMatrix<f64>,
}

impl Discretization {
    /// Exponentiates `[[A dt, B dt, 0], [0, 0, I], [0, 0, 0]]`; with the
    /// input interpolated linearly between samples the update is
    /// `x[k+1] = Ad x[k] + Bd0 u[k] + Bd1 u[k+1]`.
    fn first_order_hold(model: &impl StateSpaceModel, dt: f64) -> Discretization {
        let n = model.n_states();
        let m = model.n_inputs();
        let size = n + 2 * m;

        let mut mat_m = na::DMatrix::<f64>::zeros(size, size);
        mat_m
            .view_mut((0, 0), (n, n))
            .copy_from(&model.get_mat_a().scale(dt));
        mat_m
            .view_mut((0, n), (n, m))
            .copy_from(&model.get_mat_b().scale(dt));
        mat_m
            .view_mut((n, n + m), (m, m))
            .copy_from(&na::DMatrix::identity(m, m));

        let mat_phi = mat_m.exp();
        let mat_bd1 = mat_phi.view((0, n + m), (n, m)).into_owned();
        let mat_bd0 = mat_phi.view((0, n), (n, m)).into_owned() - &mat_bd1;

        Discretization {
            mat_ad: mat_phi.view((0, 0), (n, n)).into_owned(),
            mat_bd0,
            mat_bd1,
        }
    }
}

fn sample_period(time: &[f64]) -> Result<f64, ControlError> {
    if time.is_empty() {
        return Err(ControlError::InvalidTime("no samples"));
    }
    if time.len() == 1 {
        return Ok(0.0);
    }
    let dt = time[1] - time[0];
    if dt <= 0.0 {
        return Err(ControlError::InvalidTime("samples must increase"));
    }
    let uniform = time
        .windows(2)
        .all(|w| ((w[1] - w[0]) - dt).abs() <= 1e-9 * dt.max(1.0));
    if !uniform {
        return Err(ControlError::InvalidTime("samples must be evenly spaced"));
    }
    Ok(dt)
}

/// Simulates the continuous-time model on a uniform time grid.
///
/// `mat_u` holds one row per input and one column per time sample.
pub fn system_simulate(
    model: &impl StateSpaceModel,
    time: &[f64],
    mat_u: &na::DMatrix<f64>,
    x0: &na::DVector<f64>,
) -> Result<Response, ControlError> {
    let dt = sample_period(time)?;
    let sim_time = time.len();
    let n_state = model.n_states();
    check_shape("input signal", mat_u.shape(), (model.n_inputs(), sim_time))?;
    check_shape("initial state", x0.shape(), (n_state, 1))?;

    let mut mat_x = na::DMatrix::<f64>::zeros(n_state, sim_time);
    mat_x.column_mut(0).copy_from(x0);

    if sim_time > 1 {
        let disc = Discretization::first_order_hold(model, dt);
        for i in 0..sim_time - 1 {
            let x_next = &disc.mat_ad * mat_x.column(i)
                + &disc.mat_bd0 * mat_u.column(i)
                + &disc.mat_bd1 * mat_u.column(i + 1);
            mat_x.column_mut(i + 1).copy_from(&x_next);
        }
    }

    let mat_y = model.get_mat_c() * &mat_x + model.get_mat_d() * mat_u;

    Ok(Response {
        time: time.to_vec(),
        outputs: mat_y,
        states: mat_x,
    })
}

/// Response to a unit step on the first input from rest.
pub fn step_response(
    model: &impl StateSpaceModel,
    time: &[f64],
) -> Result<Response, ControlError> {
    let mut mat_u = na::DMatrix::<f64>::zeros(model.n_inputs(), time.len());
    if model.n_inputs() > 0 {
        mat_u.rows_mut(0, 1).copy_from(&step_input(time));
    }
    let x0 = na::DVector::<f64>::zeros(model.n_states());
    system_simulate(model, time, &mat_u, &x0)
}

/// Response to a unit impulse on the first input. The impulse is folded
/// into the initial state `x(0+) = B e0`; a direct feedthrough term would
/// need a Dirac output and is dropped.
pub fn impulse_response(
    model: &impl StateSpaceModel,
    time: &[f64],
) -> Result<Response, ControlError> {
    if model.get_mat_d().iter().any(|&d| d != 0.0) {
        log::warn!("impulse response ignores the nonzero feedthrough term D");
    }
    if model.n_inputs() == 0 {
        return Err(ControlError::DimensionMismatch {
            what: "input matrix B",
            expected: (model.n_states(), 1),
            found: (model.n_states(), 0),
        });
    }
    let x0 = model.get_mat_b().column(0).into_owned();
    let mat_u = na::DMatrix::<f64>::zeros(model.n_inputs(), time.len());
    system_simulate(model, time, &mat_u, &x0)
}

/// Free response from `x0` with zero input.
pub fn initial_response(
    model: &impl StateSpaceModel,
    time: &[f64],
    x0: &na::DVector<f64>,
) -> Result<Response, ControlError> {
    let mat_u = na::DMatrix::<f64>::zeros(model.n_inputs(), time.len());
    system_simulate(model, time, &mat_u, x0)
}

/// Response to an arbitrary input signal from `x0`.
pub fn forced_response(
    model: &impl StateSpaceModel,
    time: &[f64],
    mat_u: &na::DMatrix<f64>,
    x0: &na::DVector<f64>,
) -> Result<Response, ControlError> {
    system_simulate(model, time, mat_u, x0)
}

/// Simulation horizon that shows the interesting part of a response: a few
/// time constants of the slowest stable mode, a few e-foldings of the
/// fastest unstable one, or ten periods of an undamped oscillation.
pub fn default_horizon(model: &impl StateSpaceModel) -> f64 {
    const EPS: f64 = 1e-9;
    let poles = model.poles();

    let growth = poles
        .iter()
        .filter(|p| p.re > EPS)
        .fold(0.0f64, |acc, p| acc.max(p.re));
    let horizon = if growth > 0.0 {
        5.0 / growth
    } else {
        let slowest_decay = poles
            .iter()
            .filter(|p| p.re < -EPS)
            .map(|p| 7.0 / p.re.abs())
            .fold(0.0f64, f64::max);
        let oscillation = poles
            .iter()
            .filter(|p| p.re.abs() <= EPS && p.im.abs() > EPS)
            .map(|p| 10.0 * 2.0 * std::f64::consts::PI / p.im.abs())
            .fold(0.0f64, f64::max);
        let horizon = slowest_decay.max(oscillation);
        if horizon > 0.0 {
            horizon
        } else {
            10.0
        }
    };
    horizon.clamp(0.1, 1000.0)
}

pub fn default_time(model: &impl StateSpaceModel, samples: usize) -> Vec<f64> {
    linspace(0.0, default_horizon(model), samples)
}

/// DC gain `C (-A)^-1 B + D`, the final value of the step response of a
/// stable system.
pub fn steady_state_gain(model: &impl StateSpaceModel) -> Result<na::DMatrix<f64>, ControlError> {
    let mat_a_inv = (-model.get_mat_a())
        .try_inverse()
        .ok_or(ControlError::Singular("state matrix A"))?;
    Ok(model.get_mat_c() * mat_a_inv * model.get_mat_b() + model.get_mat_d())
}
