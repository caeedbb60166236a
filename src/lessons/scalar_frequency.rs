use nalgebra as na;

use crate::control::model::StateSpace;
use crate::control::simulator::{impulse_response, initial_response, linspace, step_response};
use crate::error::ControlError;
use crate::lessons::{Lesson, LessonContext};
use crate::plot::Figure;

const TIME_HORIZON: f64 = 3.0;

/// Scalar systems `(a, b, c, d)`; the second one has a direct feedthrough.
pub fn parameters() -> Vec<(f64, f64, f64, f64)> {
    vec![(-2.0, 1.0, 1.0, 0.0), (-0.5, 3.0, 2.0, 1.5)]
}

/// Step response final value `d - c b / a` of a stable scalar system.
pub fn expected_gain(a: f64, b: f64, c: f64, d: f64) -> f64 {
    d - c * b / a
}

pub struct ScalarFrequency;

impl Lesson for ScalarFrequency {
    fn name(&self) -> &'static str {
        "scalar-frequency"
    }

    /// The figures accumulate across the sweep and are saved after every
    /// system, so the last file of each kind compares all of them.
    fn run(&self, ctx: &mut LessonContext<'_>) -> Result<(), ControlError> {
        let mut step_plot = Figure::time_response("Scalar system step response", "y");
        let mut init_plot = Figure::time_response("Scalar system response from x0 = 1", "y");
        let mut impulse_plot = Figure::time_response("Scalar system impulse response", "y");
        let time = linspace(0.0, TIME_HORIZON, ctx.samples());
        let x0 = na::dvector![1.0];

        for (index, (a, b, c, d)) in parameters().into_iter().enumerate() {
            let label = format!(
                "A: {}, B: {}, C: {}, D: {}, gain: {}",
                a,
                b,
                c,
                d,
                expected_gain(a, b, c, d)
            );
            writeln!(ctx.out, "{}", label)?;

            let sys = StateSpace::scalar(a, b, c, d);
            let step = step_response(&sys, &ctx.default_time(&sys))?;
            step_plot.add_response(&step, 0, &label);

            let init = initial_response(&sys, &time, &x0)?;
            init_plot.add_response(&init, 0, &label);

            let impulse = impulse_response(&sys.without_feedthrough(), &time)?;
            impulse_plot.add_response(&impulse, 0, &label);

            ctx.emit(&step_plot, &format!("Lec6_scalar_step_{}", index))?;
            ctx.emit(&init_plot, &format!("Lec6_scalar_init_{}", index))?;
            ctx.emit(&impulse_plot, &format!("Lec6_scalar_impulse_{}", index))?;
        }
        Ok(())
    }
}
