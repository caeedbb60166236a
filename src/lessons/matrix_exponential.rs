use nalgebra as na;

use crate::control::model::rotation::{Model, Parameters};
use crate::control::simulator::{initial_response, linspace};
use crate::error::ControlError;
use crate::lessons::{Lesson, LessonContext};
use crate::plot::Figure;

const TIME_HORIZON: f64 = 10.0;

/// `(alpha, beta)` pairs: oscillating modes with decreasing real part.
pub fn parameters() -> Vec<Parameters> {
    [(0.0, 1.0), (0.0, 2.0), (-1.0, 1.0), (-1.0, 2.0), (-2.0, 1.0), (-2.0, 2.0)]
        .iter()
        .map(|&(alpha, beta)| Parameters { alpha, beta })
        .collect()
}

pub struct MatrixExponential;

impl Lesson for MatrixExponential {
    fn name(&self) -> &'static str {
        "matrix-exponential"
    }

    fn run(&self, ctx: &mut LessonContext<'_>) -> Result<(), ControlError> {
        let time = linspace(0.0, TIME_HORIZON, ctx.samples());
        let x0 = na::dvector![1.0, 1.0];

        for (index, params) in parameters().into_iter().enumerate() {
            let label = format!("alpha: {} beta: {}", params.alpha, params.beta);
            writeln!(ctx.out, "{}", label)?;

            let model = Model::new(params);
            let response = initial_response(&model, &time, &x0)?;

            let mut plot = Figure::time_response(&format!("exp(At) x0, {}", label), "x");
            plot.add_response(&response, 0, &format!("x1, {}", label));
            plot.add_response(&response, 1, &format!("x2, {}", label));
            ctx.emit(&plot, &format!("Lec7_matrix_exponential_{}", index))?;
        }
        Ok(())
    }
}
