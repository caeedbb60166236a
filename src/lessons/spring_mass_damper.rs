use nalgebra as na;

use crate::control::model::spring_mass_damper::{Model, Parameters};
use crate::control::simulator::{initial_response, linspace, step_response};
use crate::error::ControlError;
use crate::lessons::{Lesson, LessonContext};
use crate::plot::Figure;

const TIME_HORIZON: f64 = 100.0;

pub fn parameters() -> Vec<Parameters> {
    [(250.0, 20.0, 20.0), (250.0, 40.0, 40.0), (250.0, 40.0, 80.0)]
        .iter()
        .map(|&(m, k, b)| Parameters { m, k, b })
        .collect()
}

pub struct SpringMassDamper;

impl Lesson for SpringMassDamper {
    fn name(&self) -> &'static str {
        "spring-mass-damper"
    }

    fn run(&self, ctx: &mut LessonContext<'_>) -> Result<(), ControlError> {
        let mut step_plot = Figure::time_response("Spring-mass-damper step response", "Position");
        let mut init_plot = Figure::time_response(
            "Spring-mass-damper response from x0 = [5, 0]",
            "Position",
        );
        let x0 = na::dvector![5.0, 0.0];
        let init_time = linspace(0.0, TIME_HORIZON, ctx.samples());

        for params in parameters() {
            let label = format!(
                "mass: {}, spring: {}, damping: {}",
                params.m, params.k, params.b
            );
            writeln!(ctx.out, "{}", label)?;

            let model = Model::new(params);
            let step = step_response(&model, &ctx.default_time(&model))?;
            step_plot.add_response(&step, 0, &label);

            let init = initial_response(&model, &init_time, &x0)?;
            init_plot.add_response(&init, 0, &label);
        }

        ctx.emit(&step_plot, "Lec2_spring_mass_damper_step")?;
        ctx.emit(&init_plot, "Lec2_spring_mass_damper_init")
    }
}
