use crate::control::frequency::{
    frequency_response, nyquist_curve, stability_margins, NyquistCurve, StabilityMargins,
};
use crate::control::transfer_function::TransferFunction;
use crate::error::ControlError;
use crate::lessons::{format_roots, write_margins, Lesson, LessonContext};
use crate::plot::naming::slug;
use crate::plot::Figure;

const DECADES: (f64, f64) = (-2.0, 2.0);

pub fn parameters() -> Result<Vec<(&'static str, TransferFunction)>, ControlError> {
    Ok(vec![
        ("Stable 1st-Order", TransferFunction::new(&[1.0], &[1.0, 1.0])?),
        ("Unstable Open-Loop", TransferFunction::new(&[1.0], &[1.0, -1.0])?),
        ("Underdamped 2nd-Order", TransferFunction::new(&[1.0], &[1.0, 1.0, 1.0])?),
        ("High-Gain System", TransferFunction::new(&[10.0], &[1.0, 2.0, 1.0])?),
    ])
}

/// Bode diagram with the crossover frequencies marked and the margins
/// written next to them.
pub fn bode_with_margins(
    tf: &TransferFunction,
    omega: &[f64],
    margins: &StabilityMargins,
    label: &str,
) -> Figure {
    let mut bode = Figure::bode(&format!("Bode Plot with Margins: {}", label));
    bode.add_bode(&frequency_response(tf, omega), label);

    if margins.gain_crossover.is_finite() {
        let phase = &mut bode.axes[1];
        phase.vlines.push(margins.gain_crossover);
        phase.annotate(
            margins.gain_crossover,
            -180.0 + margins.phase_margin,
            format!(
                "PM = {:.1} deg @ {:.2} rad/s",
                margins.phase_margin, margins.gain_crossover
            ),
        );
    }
    let gm_db = margins.gain_margin_db();
    if margins.phase_crossover.is_finite() && gm_db.is_finite() {
        let magnitude = &mut bode.axes[0];
        magnitude.vlines.push(margins.phase_crossover);
        magnitude.annotate(
            margins.phase_crossover,
            0.0,
            format!(
                "GM = {:.1} dB @ {:.2} rad/s",
                gm_db, margins.phase_crossover
            ),
        );
    }
    bode
}

/// Closed-loop right half-plane poles predicted by the Nyquist criterion.
pub struct NyquistCount {
    /// Clockwise encirclements of -1.
    pub n: i32,
    /// Open-loop poles in the right half-plane.
    pub p: i32,
}

impl NyquistCount {
    pub fn new(tf: &TransferFunction, curve: &NyquistCurve) -> NyquistCount {
        NyquistCount {
            n: curve.encirclements(),
            p: tf.poles().iter().filter(|p| p.re > 0.0).count() as i32,
        }
    }

    pub fn z(&self) -> i32 {
        self.n + self.p
    }
}

pub struct Margins;

impl Lesson for Margins {
    fn name(&self) -> &'static str {
        "margins"
    }

    fn run(&self, ctx: &mut LessonContext<'_>) -> Result<(), ControlError> {
        let omega = ctx.frequency_grid(DECADES);

        for (label, tf) in parameters()? {
            let poles = tf.poles();
            let zeros = tf.zeros();
            let margins = stability_margins(&tf);

            writeln!(ctx.out)?;
            writeln!(ctx.out, "=== {} ===", label)?;
            writeln!(ctx.out, "Poles : {}", format_roots(&poles))?;
            writeln!(ctx.out, "Zeros: {}", format_roots(&zeros))?;
            write_margins(ctx.out, &margins)?;

            let stem = slug(label);
            let bode = bode_with_margins(&tf, &omega, &margins, label);
            ctx.emit(&bode, &format!("{}_bode_margins", stem))?;

            let curve = nyquist_curve(&tf, &omega);
            let count = NyquistCount::new(&tf, &curve);
            writeln!(
                ctx.out,
                "Nyquist: N = {}, P = {}, closed-loop RHP poles Z = {}",
                count.n,
                count.p,
                count.z()
            )?;
            let mut nyquist = Figure::nyquist(&format!("Nyquist Plot: {}", label));
            nyquist.axes[0].x_label = "Re[G(jw)]".to_string();
            nyquist.axes[0].y_label = "Im[G(jw)]".to_string();
            nyquist.add_nyquist(&curve, "Nyquist Curve");
            nyquist.add_unit_circle();
            ctx.emit(&nyquist, &format!("{}_nyquist_annotated", stem))?;

            let mut pz = Figure::pole_zero(&format!("Pole-Zero Map: {}", label));
            pz.add_pole_zero(&poles, &zeros, label);
            ctx.emit(&pz, &format!("{}_pzmap", stem))?;
        }

        writeln!(ctx.out)?;
        writeln!(ctx.out, "=== Nyquist Stability Criterion Recap ===")?;
        writeln!(
            ctx.out,
            "If the open loop has P unstable poles and the Nyquist plot encircles -1 N times clockwise,"
        )?;
        writeln!(ctx.out, "then the closed loop has Z = N + P unstable poles.")?;
        writeln!(ctx.out, "For stability we want Z = 0, that is N = -P.")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::trajectory::logspace;

    #[test]
    fn high_gain_bode_marks_phase_margin_only() {
        let tf = TransferFunction::new(&[10.0], &[1.0, 2.0, 1.0]).unwrap();
        let margins = stability_margins(&tf);
        let fig = bode_with_margins(&tf, &logspace(-2.0, 2.0, 50), &margins, "High-Gain System");
        assert_eq!(fig.axes[1].vlines.len(), 1);
        assert!(fig.axes[0].vlines.is_empty());
        assert!(fig.axes[1].annotations[0].text.starts_with("PM = 36.9"));
    }

    #[test]
    fn stable_loop_needs_no_encirclement() {
        let tf = TransferFunction::new(&[10.0], &[1.0, 2.0, 1.0]).unwrap();
        let curve = nyquist_curve(&tf, &logspace(-2.0, 2.0, 1000));
        let count = NyquistCount::new(&tf, &curve);
        assert_eq!((count.n, count.p, count.z()), (0, 0, 0));
    }
}
