use nalgebra as na;

use crate::control::controller::pid;
use crate::control::model::cruise_control::{Model, Parameters};
use crate::control::simulator::{forced_response, linspace, Response};
use crate::control::trajectory::constant_input;
use crate::control::transfer_function::TransferFunction;
use crate::error::ControlError;
use crate::lessons::{tf_step, Lesson, LessonContext};
use crate::plot::Figure;

const TIME_HORIZON: f64 = 50.0;
const SAMPLES: usize = 500;

/// Controller gains and the hill force used as a constant disturbance.
#[derive(Clone, Copy, Debug)]
pub struct Gains {
    pub kp: f64,
    pub ki: f64,
    pub kd: f64,
    /// Constant force [N]
    pub disturbance: f64,
}

impl Default for Gains {
    fn default() -> Gains {
        Gains {
            kp: 200.0,
            ki: 50.0,
            kd: 20.0,
            disturbance: 100.0,
        }
    }
}

/// Closed loops of the plant with P, PI and PID controllers.
pub struct Loops {
    pub p: TransferFunction,
    pub pi: TransferFunction,
    pub pid: TransferFunction,
    /// Disturbance to velocity under PI control.
    pub disturbance: TransferFunction,
}

impl Loops {
    pub fn new(plant: &TransferFunction, gains: Gains) -> Loops {
        let controller_pi = pid::proportional_integral(gains.kp, gains.ki);
        Loops {
            p: (&pid::proportional(gains.kp) * plant).unity_feedback(),
            pi: (&controller_pi * plant).unity_feedback(),
            pid: (&pid::pid(gains.kp, gains.ki, gains.kd) * plant).unity_feedback(),
            disturbance: plant.feedback(&controller_pi),
        }
    }
}

pub struct CruiseControl;

impl Lesson for CruiseControl {
    fn name(&self) -> &'static str {
        "cruise-control"
    }

    fn run(&self, ctx: &mut LessonContext<'_>) -> Result<(), ControlError> {
        let model = Model::new(Parameters::default());
        let gains = Gains::default();
        let time = linspace(0.0, TIME_HORIZON, SAMPLES);

        let open = forced_response(
            &model,
            &time,
            &constant_input(&time, gains.disturbance),
            &na::dvector![0.0],
        )?;
        emit_single(
            ctx,
            &open,
            "Open-loop Step Response: Cruise Control",
            "Open-loop Response (Unstable)",
            "open_loop_response",
        )?;

        let plant = TransferFunction::from_state_space(&model)?;
        let loops = Loops::new(&plant, gains);

        let y_p = tf_step(&loops.p, &time)?;
        emit_single(
            ctx,
            &y_p,
            "Step Response with P Control",
            "Proportional Control Response",
            "P_control_response",
        )?;

        let y_pi = tf_step(&loops.pi, &time)?;
        emit_single(
            ctx,
            &y_pi,
            "Step Response with PI Control",
            "PI Control Response (Perfect Tracking)",
            "PI_control_response",
        )?;

        writeln!(ctx.out)?;
        writeln!(
            ctx.out,
            "Steady-state gain for reference tracking (should be 1): {}",
            loops.pi.dc_gain()
        )?;
        writeln!(
            ctx.out,
            "Steady-state gain for disturbance rejection (should be 0): {}",
            loops.disturbance.dc_gain()
        )?;

        let y_pid = tf_step(&loops.pid, &time)?;
        emit_single(
            ctx,
            &y_pid,
            "Step Response with PID Control",
            "PID Control Response (Damping Added)",
            "PID_control_response",
        )?;

        let mut comparison =
            Figure::time_response("Comparison of P, PI, and PID Controllers", "Velocity (m/s)");
        comparison.add_response(&y_p, 0, "P Control");
        comparison.add_response(&y_pi, 0, "PI Control (Perfect Tracking)");
        comparison.add_response(&y_pid, 0, "PID Control (Damping Added)");
        ctx.emit(&comparison, "PID_comparison")
    }
}

fn emit_single(
    ctx: &mut LessonContext<'_>,
    response: &Response,
    title: &str,
    label: &str,
    name: &str,
) -> Result<(), ControlError> {
    let mut plot = Figure::time_response(title, "Velocity (m/s)");
    plot.add_response(response, 0, label);
    ctx.emit(&plot, name)
}
