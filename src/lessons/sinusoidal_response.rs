use nalgebra as na;

use crate::control::frequency::{default_frequency_range, frequency_response};
use crate::control::model::StateSpace;
use crate::control::simulator::{forced_response, linspace};
use crate::control::trajectory::sinusoid_input;
use crate::control::transfer_function::TransferFunction;
use crate::error::ControlError;
use crate::lessons::{Lesson, LessonContext};
use crate::plot::Figure;

const TIME_HORIZON: f64 = 20.0;
const SAMPLES: usize = 500;
const X0: f64 = 3.0;

/// Input frequencies in rad/s.
pub fn parameters() -> Vec<f64> {
    vec![3.0, 5.0]
}

pub struct SinusoidalResponse;

impl Lesson for SinusoidalResponse {
    fn name(&self) -> &'static str {
        "sinusoidal-response"
    }

    fn run(&self, ctx: &mut LessonContext<'_>) -> Result<(), ControlError> {
        let sys = StateSpace::scalar(-1.0, 1.0, 1.0, 0.0);
        let time = linspace(0.0, TIME_HORIZON, SAMPLES);

        for omega in parameters() {
            let mat_u = sinusoid_input(&time, omega);
            let response = forced_response(&sys, &time, &mat_u, &na::dvector![X0])?;

            let mut plot = Figure::time_response(
                &format!("Frequency omega: {}", omega),
                "Control, Output, and State",
            );
            plot.axes[0].x_label = "Time t".to_string();
            plot.axes[0]
                .line(response.time.clone(), response.output(0), "y_t")
                .color = (255, 0, 0);
            plot.axes[0]
                .line(response.time.clone(), response.state(0), "x_t")
                .color = (0, 0, 255);
            plot.axes[0]
                .line(time.clone(), mat_u.row(0).iter().cloned().collect(), "u_t")
                .color = (0, 0, 0);

            let tf = TransferFunction::from_state_space(&sys)?;
            let g = tf.freq_response(omega);
            writeln!(
                ctx.out,
                "omega = {}: amplitude ratio {:.4}, phase {:.2} deg",
                omega,
                g.norm(),
                g.arg().to_degrees()
            )?;

            ctx.emit(&plot, &format!("Lec6_scalar_sinusoidal_frequency{}", omega))?;
        }

        let tf = TransferFunction::from_state_space(&sys)?;
        let omega = ctx.frequency_grid(default_frequency_range(&tf));
        let mut bode = Figure::bode_linear(&format!("Bode diagram of {}", tf));
        bode.add_bode(&frequency_response(&tf, &omega), "G");
        ctx.emit(&bode, "matlab_bode")
    }
}
