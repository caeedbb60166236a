use crate::control::frequency::frequency_response;
use crate::control::simulator::linspace;
use crate::control::transfer_function::TransferFunction;
use crate::error::ControlError;
use crate::lessons::{format_roots, tf_step, Lesson, LessonContext};
use crate::plot::naming::slug;
use crate::plot::Figure;

const STEP_HORIZON: f64 = 2.25;
const STEP_SAMPLES: usize = 500;
const BODE_DECADES: (f64, f64) = (-1.0, 2.0);

/// `1 / (s^2 + 2 zeta omega s + omega^2)`.
pub fn second_order(zeta: f64, omega: f64) -> Result<TransferFunction, ControlError> {
    TransferFunction::new(&[1.0], &[1.0, 2.0 * zeta * omega, omega * omega])
}

pub fn parameters() -> Result<Vec<(&'static str, TransferFunction)>, ControlError> {
    let omega = 2.0;
    Ok(vec![
        ("Stable First-Order", TransferFunction::new(&[1.0], &[1.0, 1.0])?),
        ("Unstable First-Order", TransferFunction::new(&[1.0], &[1.0, -1.0])?),
        ("Underdamped Second-Order", second_order(0.3, omega)?),
        ("Critically Damped", second_order(1.0, omega)?),
        ("Overdamped", second_order(2.0, omega)?),
    ])
}

/// File stem: the slug with hyphens dropped, e.g. `stable_firstorder`.
pub fn file_stem(label: &str) -> String {
    slug(label).replace('-', "")
}

pub struct TransferFunctions;

impl Lesson for TransferFunctions {
    fn name(&self) -> &'static str {
        "transfer-functions"
    }

    fn run(&self, ctx: &mut LessonContext<'_>) -> Result<(), ControlError> {
        let systems = parameters()?;
        let time = linspace(0.0, STEP_HORIZON, STEP_SAMPLES);

        let mut step_plot =
            Figure::time_response("Step Responses for Different Transfer Functions", "Output");
        for (label, tf) in &systems {
            step_plot.add_response(&tf_step(tf, &time)?, 0, label);
        }
        ctx.emit(&step_plot, "tf_step_responses")?;

        let omega = ctx.frequency_grid(BODE_DECADES);
        for (label, tf) in &systems {
            let poles = tf.poles();
            let zeros = tf.zeros();
            writeln!(ctx.out)?;
            writeln!(ctx.out, "Transfer Function: {}", label)?;
            writeln!(ctx.out, "  Poles : {}", format_roots(&poles))?;
            writeln!(ctx.out, "  Zeros: {}", format_roots(&zeros))?;

            let stem = file_stem(label);
            let mut pz = Figure::pole_zero(&format!("Pole-Zero Map: {}", label));
            pz.add_pole_zero(&poles, &zeros, label);
            ctx.emit(&pz, &format!("{}_pzmap", stem))?;

            let mut bode = Figure::bode(&format!("Bode Plot: {}", label));
            bode.add_bode(&frequency_response(tf, &omega), label);
            ctx.emit(&bode, &format!("{}_bode", stem))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stems_drop_hyphens() {
        assert_eq!(file_stem("Stable First-Order"), "stable_firstorder");
        assert_eq!(file_stem("Critically Damped"), "critically_damped");
    }

    #[test]
    fn second_order_uses_squared_frequency() {
        let tf = second_order(0.3, 2.0).unwrap();
        assert_eq!(tf.den()[2], 4.0);
        assert!((tf.den()[1] - 1.2).abs() < 1e-12);
    }
}
