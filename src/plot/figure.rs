use nalgebra as na;
use na::Complex;
use plotters::style::{Color, Palette, Palette99};

use crate::control::frequency::{FrequencyResponse, NyquistCurve};
use crate::control::simulator::Response;

pub type Rgb = (u8, u8, u8);

pub const CRITICAL_POINT: Rgb = (220, 20, 20);
pub const REFERENCE: Rgb = (128, 128, 128);

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Scale {
    Linear,
    Log,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Style {
    Line,
    Cross,
    Circle,
}

#[derive(Clone, Debug)]
pub struct Trace {
    /// Traces without a label stay out of the legend.
    pub label: Option<String>,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub style: Style,
    pub color: Rgb,
}

#[derive(Clone, Debug)]
pub struct Annotation {
    pub x: f64,
    pub y: f64,
    pub text: String,
}

#[derive(Clone, Debug)]
pub struct Axes {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub x_scale: Scale,
    pub equal_aspect: bool,
    pub traces: Vec<Trace>,
    pub vlines: Vec<f64>,
    pub hlines: Vec<f64>,
    pub annotations: Vec<Annotation>,
}

impl Axes {
    pub fn new(title: &str, x_label: &str, y_label: &str) -> Axes {
        Axes {
            title: title.to_string(),
            x_label: x_label.to_string(),
            y_label: y_label.to_string(),
            x_scale: Scale::Linear,
            equal_aspect: false,
            traces: Vec::new(),
            vlines: Vec::new(),
            hlines: Vec::new(),
            annotations: Vec::new(),
        }
    }

    fn log_x(mut self) -> Axes {
        self.x_scale = Scale::Log;
        self
    }

    /// Colour of the next labelled series.
    pub fn next_color(&self) -> Rgb {
        let used = self.traces.iter().filter(|t| t.label.is_some()).count();
        Palette99::pick(used).rgb()
    }

    pub fn line(&mut self, x: Vec<f64>, y: Vec<f64>, label: &str) -> &mut Trace {
        let color = self.next_color();
        self.push(Trace {
            label: Some(label.to_string()),
            x,
            y,
            style: Style::Line,
            color,
        })
    }

    pub fn push(&mut self, trace: Trace) -> &mut Trace {
        self.traces.push(trace);
        let last = self.traces.len() - 1;
        &mut self.traces[last]
    }

    pub fn annotate(&mut self, x: f64, y: f64, text: impl Into<String>) {
        self.annotations.push(Annotation {
            x,
            y,
            text: text.into(),
        });
    }
}

#[derive(Clone, Debug)]
pub struct Figure {
    pub title: String,
    pub axes: Vec<Axes>,
    linear_magnitude: bool,
}

impl Figure {
    pub fn new(title: &str, axes: Vec<Axes>) -> Figure {
        Figure {
            title: title.to_string(),
            axes,
            linear_magnitude: false,
        }
    }

    pub fn time_response(title: &str, y_label: &str) -> Figure {
        Figure::new(title, vec![Axes::new(title, "Time [s]", y_label)])
    }

    /// Magnitude in dB over phase, both against a logarithmic frequency.
    pub fn bode(title: &str) -> Figure {
        Figure::new(
            title,
            vec![
                Axes::new("Magnitude", "Frequency [rad/s]", "Magnitude [dB]").log_x(),
                Axes::new("Phase", "Frequency [rad/s]", "Phase [deg]").log_x(),
            ],
        )
    }

    /// Bode diagram with the magnitude as a plain ratio.
    pub fn bode_linear(title: &str) -> Figure {
        let mut figure = Figure::bode(title);
        figure.axes[0].y_label = "Magnitude".to_string();
        figure.linear_magnitude = true;
        figure
    }

    /// Complex-plane plot with reference axes and the critical point `-1`.
    pub fn nyquist(title: &str) -> Figure {
        let mut axes = Axes::new(title, "Real", "Imaginary");
        axes.equal_aspect = true;
        axes.vlines.push(0.0);
        axes.hlines.push(0.0);
        axes.push(Trace {
            label: None,
            x: vec![-1.0],
            y: vec![0.0],
            style: Style::Cross,
            color: CRITICAL_POINT,
        });
        axes.annotate(-1.0, 0.0, "-1");
        Figure::new(title, vec![axes])
    }

    pub fn pole_zero(title: &str) -> Figure {
        let mut axes = Axes::new(title, "Real", "Imaginary");
        axes.vlines.push(0.0);
        axes.hlines.push(0.0);
        Figure::new(title, vec![axes])
    }

    /// Plots output `output` of a simulated response on the first axes.
    pub fn add_response(&mut self, response: &Response, output: usize, label: &str) {
        self.axes[0].line(response.time.clone(), response.output(output), label);
    }

    pub fn add_series(&mut self, x: &[f64], y: &[f64], label: &str) {
        self.axes[0].line(x.to_vec(), y.to_vec(), label);
    }

    pub fn add_bode(&mut self, response: &FrequencyResponse, label: &str) {
        let magnitude = if self.linear_magnitude {
            response.magnitude.clone()
        } else {
            response.magnitude_db()
        };
        let color = self.axes[0].next_color();
        for (axes, y) in self
            .axes
            .iter_mut()
            .zip([magnitude, response.phase_deg.clone()])
        {
            axes.push(Trace {
                label: Some(label.to_string()),
                x: response.omega.clone(),
                y,
                style: Style::Line,
                color,
            });
        }
    }

    /// Positive branch labelled, mirrored branch in the same colour.
    pub fn add_nyquist(&mut self, curve: &NyquistCurve, label: &str) {
        let axes = &mut self.axes[0];
        let color = axes.next_color();
        let (x, y) = split_complex(&curve.points);
        axes.push(Trace {
            label: Some(label.to_string()),
            x,
            y,
            style: Style::Line,
            color,
        });
        let (x, y) = split_complex(&curve.mirrored());
        axes.push(Trace {
            label: None,
            x,
            y,
            style: Style::Line,
            color,
        });
    }

    pub fn add_unit_circle(&mut self) {
        let theta = crate::control::trajectory::linspace(0.0, 2.0 * std::f64::consts::PI, 200);
        self.axes[0].push(Trace {
            label: Some("Unit circle".to_string()),
            x: theta.iter().map(|t| t.cos()).collect(),
            y: theta.iter().map(|t| t.sin()).collect(),
            style: Style::Line,
            color: REFERENCE,
        });
    }

    /// Poles as crosses, zeros as circles.
    pub fn add_pole_zero(&mut self, poles: &[Complex<f64>], zeros: &[Complex<f64>], label: &str) {
        let axes = &mut self.axes[0];
        let color = axes.next_color();
        let (x, y) = split_complex(poles);
        axes.push(Trace {
            label: Some(format!("{} poles", label)),
            x,
            y,
            style: Style::Cross,
            color,
        });
        if !zeros.is_empty() {
            let (x, y) = split_complex(zeros);
            axes.push(Trace {
                label: Some(format!("{} zeros", label)),
                x,
                y,
                style: Style::Circle,
                color,
            });
        }
    }

    /// Legend entries of the first axes.
    pub fn labels(&self) -> Vec<&str> {
        self.axes
            .first()
            .map(|axes| {
                axes.traces
                    .iter()
                    .filter_map(|t| t.label.as_deref())
                    .collect()
            })
            .unwrap_or_default()
    }
}

fn split_complex(points: &[Complex<f64>]) -> (Vec<f64>, Vec<f64>) {
    points.iter().map(|p| (p.re, p.im)).unzip()
}
