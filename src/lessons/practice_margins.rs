use crate::control::frequency::{default_frequency_range, frequency_response, stability_margins};
use crate::control::transfer_function::TransferFunction;
use crate::error::ControlError;
use crate::lessons::{write_margins, Lesson, LessonContext};
use crate::plot::naming::tf_title;
use crate::plot::Figure;

/// `(25 s + 25) / (s^4 + 4 s^3 + 20 s^2 + 32 s)`, with an integrator.
pub fn open_loop() -> Result<TransferFunction, ControlError> {
    TransferFunction::new(&[25.0, 25.0], &[1.0, 4.0, 20.0, 32.0, 0.0])
}

pub struct PracticeMargins;

impl Lesson for PracticeMargins {
    fn name(&self) -> &'static str {
        "practice-margins"
    }

    fn run(&self, ctx: &mut LessonContext<'_>) -> Result<(), ControlError> {
        let tf = open_loop()?;
        let omega = ctx.frequency_grid(default_frequency_range(&tf));

        let mut bode = Figure::bode(&tf_title(&tf));
        bode.add_bode(&frequency_response(&tf, &omega), "G");
        ctx.emit(&bode, "practice_final_bode")?;

        write_margins(ctx.out, &stability_margins(&tf))
    }
}
