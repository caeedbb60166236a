use nalgebra as na;

use crate::control::eigen;
use crate::error::ControlError;
use crate::lessons::{format_complex, format_matrix, format_roots, Lesson, LessonContext};

/// A matrix with real eigenvalues and one with a complex pair.
pub fn parameters() -> Vec<na::DMatrix<f64>> {
    vec![
        na::dmatrix![-2.0, 0.0; 3.0, 1.0],
        na::dmatrix![1.0, 3.0; -3.0, 1.0],
    ]
}

pub struct Eigenvectors;

impl Lesson for Eigenvectors {
    fn name(&self) -> &'static str {
        "eigenvectors"
    }

    fn run(&self, ctx: &mut LessonContext<'_>) -> Result<(), ControlError> {
        for mat_a in parameters() {
            let pairs = eigen::eigenvectors(&mat_a)?;
            let values: Vec<_> = pairs.iter().map(|(lambda, _)| *lambda).collect();

            writeln!(ctx.out, "A = {}", format_matrix(&mat_a))?;
            writeln!(ctx.out, "eigenvalues")?;
            writeln!(ctx.out, "{}", format_roots(&values))?;
            writeln!(ctx.out)?;
            writeln!(ctx.out, "eigenvectors")?;
            for (lambda, vector) in &pairs {
                let entries: Vec<String> = vector.iter().map(format_complex).collect();
                writeln!(
                    ctx.out,
                    "  {} -> [{}]",
                    format_complex(lambda),
                    entries.join(", ")
                )?;
            }
            writeln!(ctx.out)?;
        }
        Ok(())
    }
}
