//! Teaching scripts. Each lesson sweeps a fixed list of systems, simulates
//! them and hands the resulting figures to a [`FigureSink`].

use std::io::Write;

use clap::ValueEnum;
use log::info;
use nalgebra as na;
use na::Complex;

use crate::config::Settings;
use crate::control::frequency::{logspace, StabilityMargins};
use crate::control::model::StateSpaceModel;
use crate::control::simulator::{self, Response};
use crate::control::transfer_function::TransferFunction;
use crate::error::ControlError;
use crate::plot::{Figure, FigureSink};

pub mod cruise_control;
pub mod eigenvectors;
pub mod lead_lag;
pub mod margins;
pub mod matrix_exponential;
pub mod pole_placement;
pub mod practice_margins;
pub mod scalar_frequency;
pub mod scalar_stability;
pub mod second_order;
pub mod sinusoidal_response;
pub mod spring_mass_damper;
pub mod transfer_functions;

/// Everything a lesson may touch while it runs.
pub struct LessonContext<'a> {
    pub sink: &'a mut dyn FigureSink,
    pub settings: &'a Settings,
    /// Diagnostic text for the reader.
    pub out: &'a mut dyn Write,
}

impl LessonContext<'_> {
    pub fn emit(&mut self, figure: &Figure, name: &str) -> Result<(), ControlError> {
        self.sink.emit(figure, name)
    }

    pub fn samples(&self) -> usize {
        self.settings.simulation.default_samples
    }

    /// Time grid over the model's default horizon.
    pub fn default_time(&self, model: &impl StateSpaceModel) -> Vec<f64> {
        simulator::default_time(model, self.samples())
    }

    /// Logarithmic grid between `10^lo` and `10^hi`.
    pub fn frequency_grid(&self, (lo, hi): (f64, f64)) -> Vec<f64> {
        logspace(lo, hi, self.settings.frequency.points)
    }
}

pub trait Lesson {
    fn name(&self) -> &'static str;
    fn run(&self, ctx: &mut LessonContext<'_>) -> Result<(), ControlError>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum LessonKind {
    SpringMassDamper,
    ScalarStability,
    SecondOrder,
    ScalarFrequency,
    SinusoidalResponse,
    MatrixExponential,
    Eigenvectors,
    PolePlacement,
    CruiseControl,
    TransferFunctions,
    Margins,
    LeadLag,
    PracticeMargins,
    All,
}

impl LessonKind {
    const ORDER: [LessonKind; 13] = [
        LessonKind::SpringMassDamper,
        LessonKind::ScalarStability,
        LessonKind::SecondOrder,
        LessonKind::ScalarFrequency,
        LessonKind::SinusoidalResponse,
        LessonKind::MatrixExponential,
        LessonKind::Eigenvectors,
        LessonKind::PolePlacement,
        LessonKind::CruiseControl,
        LessonKind::TransferFunctions,
        LessonKind::Margins,
        LessonKind::LeadLag,
        LessonKind::PracticeMargins,
    ];

    /// The lessons this selection stands for, in running order.
    pub fn expand(self) -> Vec<LessonKind> {
        match self {
            LessonKind::All => LessonKind::ORDER.to_vec(),
            kind => vec![kind],
        }
    }

    /// `None` for [`LessonKind::All`], which is a selection and not a lesson.
    pub fn lesson(self) -> Option<Box<dyn Lesson>> {
        let lesson: Box<dyn Lesson> = match self {
            LessonKind::SpringMassDamper => Box::new(spring_mass_damper::SpringMassDamper),
            LessonKind::ScalarStability => Box::new(scalar_stability::ScalarStability),
            LessonKind::SecondOrder => Box::new(second_order::SecondOrder),
            LessonKind::ScalarFrequency => Box::new(scalar_frequency::ScalarFrequency),
            LessonKind::SinusoidalResponse => Box::new(sinusoidal_response::SinusoidalResponse),
            LessonKind::MatrixExponential => Box::new(matrix_exponential::MatrixExponential),
            LessonKind::Eigenvectors => Box::new(eigenvectors::Eigenvectors),
            LessonKind::PolePlacement => Box::new(pole_placement::PolePlacement),
            LessonKind::CruiseControl => Box::new(cruise_control::CruiseControl),
            LessonKind::TransferFunctions => Box::new(transfer_functions::TransferFunctions),
            LessonKind::Margins => Box::new(margins::Margins),
            LessonKind::LeadLag => Box::new(lead_lag::LeadLag),
            LessonKind::PracticeMargins => Box::new(practice_margins::PracticeMargins),
            LessonKind::All => return None,
        };
        Some(lesson)
    }
}

/// Runs the selected lessons in order, stopping at the first error.
pub fn run(kind: LessonKind, ctx: &mut LessonContext<'_>) -> Result<(), ControlError> {
    for lesson in kind.expand().into_iter().filter_map(LessonKind::lesson) {
        info!("Running lesson {}", lesson.name());
        lesson.run(ctx)?;
    }
    Ok(())
}

pub(crate) fn tf_step(tf: &TransferFunction, time: &[f64]) -> Result<Response, ControlError> {
    simulator::step_response(&tf.to_state_space()?, time)
}

pub(crate) fn format_complex(c: &Complex<f64>) -> String {
    if c.im == 0.0 {
        format!("{:.4}", c.re)
    } else if c.im > 0.0 {
        format!("{:.4}+{:.4}j", c.re, c.im)
    } else {
        format!("{:.4}-{:.4}j", c.re, -c.im)
    }
}

pub(crate) fn format_roots(roots: &[Complex<f64>]) -> String {
    let items: Vec<String> = roots.iter().map(format_complex).collect();
    format!("[{}]", items.join(", "))
}

pub(crate) fn format_matrix(mat: &na::DMatrix<f64>) -> String {
    let rows: Vec<String> = mat
        .row_iter()
        .map(|row| {
            let items: Vec<String> = row.iter().map(|v| format!("{:.4}", v)).collect();
            format!("[{}]", items.join(", "))
        })
        .collect();
    format!("[{}]", rows.join(", "))
}

pub(crate) fn write_margins(
    out: &mut dyn Write,
    margins: &StabilityMargins,
) -> Result<(), ControlError> {
    writeln!(
        out,
        "Gain Margin: {:.2} ({:.2} dB)",
        margins.gain_margin,
        margins.gain_margin_db()
    )?;
    writeln!(out, "Phase Margin: {:.2} deg", margins.phase_margin)?;
    writeln!(out, "Gain Crossover Frequency: {:.2} rad/s", margins.gain_crossover)?;
    writeln!(out, "Phase Crossover Frequency: {:.2} rad/s", margins.phase_crossover)?;
    Ok(())
}
