use nalgebra as na;
use na::Complex;

use crate::control::controller::state_feedback::Controller;
use crate::control::frequency::{default_frequency_range, frequency_response};
use crate::control::model::{StateSpace, StateSpaceModel};
use crate::control::simulator::{forced_response, linspace, steady_state_gain, step_response};
use crate::control::trajectory::sinusoid_input;
use crate::control::transfer_function::TransferFunction;
use crate::error::ControlError;
use crate::lessons::{format_matrix, format_roots, Lesson, LessonContext};
use crate::plot::Figure;

/// `A = [[0, 1], [2, 1]]` has an eigenvalue at 2.
pub fn open_loop() -> Result<StateSpace, ControlError> {
    StateSpace::new(
        na::dmatrix![0.0, 1.0; 2.0, 1.0],
        na::dmatrix![0.0; 1.0],
        na::dmatrix![1.0, 0.0],
        na::dmatrix![0.0],
    )
}

/// Named sets of desired closed-loop poles.
pub fn parameters() -> Vec<(&'static str, Vec<Complex<f64>>)> {
    let real = |values: &[f64]| -> Vec<Complex<f64>> {
        values.iter().map(|&v| Complex::new(v, 0.0)).collect()
    };
    vec![("Fast", real(&[-2.0, -3.0])), ("Slow", real(&[-0.5, -0.8]))]
}

pub struct PolePlacement;

impl Lesson for PolePlacement {
    fn name(&self) -> &'static str {
        "pole-placement"
    }

    fn run(&self, ctx: &mut LessonContext<'_>) -> Result<(), ControlError> {
        let plant = open_loop()?;
        writeln!(
            ctx.out,
            "Open-loop eigenvalues (should show instability): {}",
            format_roots(&plant.poles())
        )?;

        let short = linspace(0.0, 2.0, 100);
        let mut open_plot =
            Figure::time_response("Open-loop Step Response (Unstable System)", "Output");
        open_plot.add_response(&step_response(&plant, &short)?, 0, "Open-loop Step Response");
        ctx.emit(&open_plot, "open_loop_step")?;

        let long = linspace(0.0, 10.0, 100);
        let u_sin = sinusoid_input(&long, 1.0);
        let x0 = na::DVector::<f64>::zeros(plant.n_states());

        let mut step_plot =
            Figure::time_response("Closed-loop Step Responses (Fast vs. Slow)", "Output");
        let mut sin_plot = Figure::time_response("Closed-loop Sinusoidal Response", "Output");
        let mut loops = Vec::new();

        for (name, poles) in parameters() {
            let controller = Controller::place(&plant, &poles)?;
            let closed = controller.closed_loop(&plant)?;
            let lower = name.to_lowercase();

            writeln!(ctx.out)?;
            writeln!(
                ctx.out,
                "State feedback gain K ({} response): {}",
                lower,
                format_matrix(controller.gain())
            )?;
            writeln!(
                ctx.out,
                "Closed-loop eigenvalues ({} response): {}",
                lower,
                format_roots(&closed.poles())
            )?;
            writeln!(
                ctx.out,
                "Steady-state gain for {} response system: {:.6}",
                lower,
                steady_state_gain(&closed)?[(0, 0)]
            )?;

            step_plot.add_response(
                &step_response(&closed, &long)?,
                0,
                &format!("{} Closed-loop Step Response", name),
            );
            sin_plot.add_response(
                &forced_response(&closed, &long, &u_sin, &x0)?,
                0,
                &format!("{} Closed-loop Sinusoidal Response", name),
            );
            loops.push((name, TransferFunction::from_state_space(&closed)?));
        }

        ctx.emit(&step_plot, "closed_loop_step")?;
        ctx.emit(&sin_plot, "closed_loop_sin")?;

        let range = loops
            .iter()
            .map(|(_, tf)| default_frequency_range(tf))
            .fold((f64::INFINITY, f64::NEG_INFINITY), |acc, r| {
                (acc.0.min(r.0), acc.1.max(r.1))
            });
        let omega = ctx.frequency_grid(range);
        let mut bode = Figure::bode("Bode Plot of Closed-loop System");
        for (name, tf) in &loops {
            bode.add_bode(
                &frequency_response(tf, &omega),
                &format!("{} Response", name),
            );
        }
        ctx.emit(&bode, "bode_plot")
    }
}
