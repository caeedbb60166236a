use crate::control::frequency::{frequency_response, stability_margins};
use crate::control::transfer_function::TransferFunction;
use crate::error::ControlError;
use crate::lessons::{write_margins, Lesson, LessonContext};
use crate::plot::naming::{tf_filename, tf_title};
use crate::plot::Figure;

const GAIN: f64 = 5.0;
const DECADES: (f64, f64) = (-2.0, 2.0);

/// `K (s + a) / (s + b)`: phase lead when `a < b`, lag when `a > b`.
#[derive(Clone, Copy, Debug)]
pub struct Compensator {
    pub label: &'static str,
    pub title: &'static str,
    pub a: f64,
    pub b: f64,
}

impl Compensator {
    pub fn transfer_function(&self, k: f64) -> Result<TransferFunction, ControlError> {
        TransferFunction::new(&[k, k * self.a], &[1.0, self.b])
    }
}

pub fn parameters() -> Vec<Compensator> {
    vec![
        Compensator {
            label: "lead",
            title: "Lead Compensator",
            a: 2.0,
            b: 10.0,
        },
        Compensator {
            label: "lag",
            title: "Lag Compensator",
            a: 10.0,
            b: 2.0,
        },
    ]
}

pub struct LeadLag;

impl Lesson for LeadLag {
    fn name(&self) -> &'static str {
        "lead-lag"
    }

    fn run(&self, ctx: &mut LessonContext<'_>) -> Result<(), ControlError> {
        let omega = ctx.frequency_grid(DECADES);

        for compensator in parameters() {
            let tf = compensator.transfer_function(GAIN)?;

            let mut bode = Figure::bode(&format!("{}: {}", compensator.title, tf_title(&tf)));
            bode.add_bode(&frequency_response(&tf, &omega), compensator.label);
            ctx.emit(&bode, &tf_filename(&tf, compensator.label))?;

            writeln!(ctx.out)?;
            writeln!(ctx.out, "--- {} ---", compensator.title)?;
            write_margins(ctx.out, &stability_margins(&tf))?;
        }
        Ok(())
    }
}
