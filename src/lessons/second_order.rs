use nalgebra as na;

use crate::control::model::second_order::{Model, Parameters};
use crate::control::simulator::{initial_response, linspace, step_response};
use crate::error::ControlError;
use crate::lessons::{Lesson, LessonContext};
use crate::plot::Figure;

const TIME_HORIZON: f64 = 100.0;

/// Damping ratio and natural frequency pairs, underdamped to overdamped.
pub fn parameters() -> Vec<Parameters> {
    [(0.2, 1.0), (0.4, 2.0), (1.0, 4.0), (1.2, 6.0)]
        .iter()
        .map(|&(zeta, omega0)| Parameters { zeta, omega0 })
        .collect()
}

pub struct SecondOrder;

impl Lesson for SecondOrder {
    fn name(&self) -> &'static str {
        "second-order"
    }

    fn run(&self, ctx: &mut LessonContext<'_>) -> Result<(), ControlError> {
        let mut step_plot = Figure::time_response("Second-order step response", "y");
        let mut init_plot =
            Figure::time_response("Second-order response from x0 = [1, 0]", "y");
        let init_time = linspace(0.0, TIME_HORIZON, ctx.samples());
        let x0 = na::dvector![1.0, 0.0];

        for params in parameters() {
            let label = format!("zeta: {}, w0: {}", params.zeta, params.omega0);
            writeln!(ctx.out, "{}", label)?;

            let model = Model::new(params);
            let step = step_response(&model, &ctx.default_time(&model))?;
            step_plot.add_response(&step, 0, &label);

            let init = initial_response(&model, &init_time, &x0)?;
            init_plot.add_response(&init, 0, &label);
        }

        ctx.emit(&step_plot, "tf_step")?;
        ctx.emit(&init_plot, "tf_init")
    }
}
