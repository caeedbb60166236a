use nalgebra as na;

use crate::control::model::StateSpace;
use crate::control::simulator::{initial_response, linspace, step_response};
use crate::error::ControlError;
use crate::lessons::{Lesson, LessonContext};
use crate::plot::Figure;

const TIME_HORIZON: f64 = 5.0;

/// Values of `a` in `dx/dt = a x + u`, from stable to unstable.
pub fn parameters() -> Vec<f64> {
    vec![-2.0, -1.0, -0.5, 0.0, 0.1]
}

pub struct ScalarStability;

impl Lesson for ScalarStability {
    fn name(&self) -> &'static str {
        "scalar-stability"
    }

    fn run(&self, ctx: &mut LessonContext<'_>) -> Result<(), ControlError> {
        let mut step_plot = Figure::time_response("Scalar system step response", "y");
        let mut init_plot = Figure::time_response("Scalar system response from x0 = 1", "y");
        let init_time = linspace(0.0, TIME_HORIZON, ctx.samples());
        let x0 = na::dvector![1.0];

        for a in parameters() {
            let label = format!("exp({}t)", a);
            writeln!(ctx.out, "{}", label)?;

            let sys = StateSpace::scalar(a, 1.0, 1.0, 0.0);
            let step = step_response(&sys, &ctx.default_time(&sys))?;
            step_plot.add_response(&step, 0, &label);

            let init = initial_response(&sys, &init_time, &x0)?;
            init_plot.add_response(&init, 0, &label);
        }

        ctx.emit(&step_plot, "Lec3_scalar_stability_step")?;
        ctx.emit(&init_plot, "Lec3_scalar_stability_init")
    }
}
