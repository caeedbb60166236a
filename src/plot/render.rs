use plotters::coord::ranged1d::ValueFormatter;
use plotters::coord::types::RangedCoordf64;
use plotters::coord::Shift;
use plotters::prelude::*;

use crate::error::ControlError;
use crate::plot::figure::{Axes, Figure, Scale, Style, Trace};

fn plot_err<E: std::fmt::Display>(err: E) -> ControlError {
    ControlError::Plot(err.to_string())
}

/// Draws every axes of the figure as a stacked panel on `root`.
pub fn draw<DB: DrawingBackend>(
    figure: &Figure,
    root: &DrawingArea<DB, Shift>,
) -> Result<(), ControlError> {
    root.fill(&WHITE).map_err(plot_err)?;
    let area = root
        .titled(&figure.title, ("sans-serif", 24))
        .map_err(plot_err)?;

    let panels = area.split_evenly((figure.axes.len().max(1), 1));
    for (axes, panel) in figure.axes.iter().zip(panels.iter()) {
        let (x_range, y_range) = data_ranges(axes);
        let mut builder = ChartBuilder::on(panel);
        builder
            .caption(&axes.title, ("sans-serif", 18))
            .margin(10)
            .x_label_area_size(35)
            .y_label_area_size(55);

        match axes.x_scale {
            Scale::Linear => {
                let mut chart = builder
                    .build_cartesian_2d(x_range.0..x_range.1, y_range.0..y_range.1)
                    .map_err(plot_err)?;
                draw_axes(&mut chart, axes, x_range, y_range)?;
            }
            Scale::Log => {
                let mut chart = builder
                    .build_cartesian_2d((x_range.0..x_range.1).log_scale(), y_range.0..y_range.1)
                    .map_err(plot_err)?;
                draw_axes(&mut chart, axes, x_range, y_range)?;
            }
        }
    }

    root.present().map_err(plot_err)?;
    Ok(())
}

fn draw_axes<'a, DB, X>(
    chart: &mut ChartContext<'a, DB, Cartesian2d<X, RangedCoordf64>>,
    axes: &Axes,
    (x_min, x_max): (f64, f64),
    y_range: (f64, f64),
) -> Result<(), ControlError>
where
    DB: DrawingBackend + 'a,
    X: Ranged<ValueType = f64> + ValueFormatter<f64>,
{
    chart
        .configure_mesh()
        .x_desc(axes.x_label.as_str())
        .y_desc(axes.y_label.as_str())
        .draw()
        .map_err(plot_err)?;

    for &x in &axes.vlines {
        chart
            .draw_series(LineSeries::new(
                vec![(x, y_range.0), (x, y_range.1)],
                &BLACK.mix(0.4),
            ))
            .map_err(plot_err)?;
    }
    for &y in &axes.hlines {
        chart
            .draw_series(LineSeries::new(vec![(x_min, y), (x_max, y)], &BLACK.mix(0.4)))
            .map_err(plot_err)?;
    }

    for trace in &axes.traces {
        draw_trace(chart, trace)?;
    }

    for note in &axes.annotations {
        chart
            .draw_series(std::iter::once(Text::new(
                note.text.clone(),
                (note.x, note.y),
                ("sans-serif", 14.0).into_font(),
            )))
            .map_err(plot_err)?;
    }

    if axes.traces.iter().any(|t| t.label.is_some()) {
        chart
            .configure_series_labels()
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .draw()
            .map_err(plot_err)?;
    }
    Ok(())
}

fn draw_trace<'a, DB, X>(
    chart: &mut ChartContext<'a, DB, Cartesian2d<X, RangedCoordf64>>,
    trace: &Trace,
) -> Result<(), ControlError>
where
    DB: DrawingBackend + 'a,
    X: Ranged<ValueType = f64> + ValueFormatter<f64>,
{
    let color = RGBColor(trace.color.0, trace.color.1, trace.color.2);
    let points: Vec<(f64, f64)> = trace
        .x
        .iter()
        .cloned()
        .zip(trace.y.iter().cloned())
        .filter(|(x, y)| x.is_finite() && y.is_finite())
        .collect();

    let style = color.stroke_width(2);
    let label = trace.label.as_deref();

    match trace.style {
        Style::Line => {
            let series = chart
                .draw_series(LineSeries::new(points, style))
                .map_err(plot_err)?;
            if let Some(label) = label {
                series
                    .label(label)
                    .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], style));
            }
        }
        Style::Cross => {
            let series = chart
                .draw_series(points.into_iter().map(|p| Cross::new(p, 6, style)))
                .map_err(plot_err)?;
            if let Some(label) = label {
                series
                    .label(label)
                    .legend(move |(x, y)| Cross::new((x + 10, y), 5, style));
            }
        }
        Style::Circle => {
            let series = chart
                .draw_series(points.into_iter().map(|p| Circle::new(p, 5, style)))
                .map_err(plot_err)?;
            if let Some(label) = label {
                series
                    .label(label)
                    .legend(move |(x, y)| Circle::new((x + 10, y), 4, style));
            }
        }
    }
    Ok(())
}

/// Finite data extents padded by 5%, widened to a unit span when flat.
fn data_ranges(axes: &Axes) -> ((f64, f64), (f64, f64)) {
    let log_x = axes.x_scale == Scale::Log;
    let mut xs: Vec<f64> = Vec::new();
    let mut ys: Vec<f64> = Vec::new();
    for trace in &axes.traces {
        for (&x, &y) in trace.x.iter().zip(&trace.y) {
            if x.is_finite() && y.is_finite() && (!log_x || x > 0.0) {
                xs.push(x);
                ys.push(y);
            }
        }
    }
    for note in axes.annotations.iter().filter(|n| !log_x || n.x > 0.0) {
        xs.push(note.x);
        ys.push(note.y);
    }
    xs.extend(axes.vlines.iter().filter(|&&x| !log_x || x > 0.0));
    ys.extend(axes.hlines.iter());

    let x = if log_x {
        let (lo, hi) = extent(&xs).unwrap_or((0.1, 10.0));
        if hi > lo {
            (lo, hi)
        } else {
            (lo / 10.0, hi * 10.0)
        }
    } else {
        pad(extent(&xs).unwrap_or((0.0, 1.0)))
    };
    let y = pad(extent(&ys).unwrap_or((0.0, 1.0)));

    if axes.equal_aspect && !log_x {
        return equalize(x, y);
    }
    (x, y)
}

fn extent(values: &[f64]) -> Option<(f64, f64)> {
    if values.is_empty() {
        return None;
    }
    let lo = values.iter().cloned().fold(f64::INFINITY, f64::min);
    let hi = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    Some((lo, hi))
}

fn pad((lo, hi): (f64, f64)) -> (f64, f64) {
    let span = hi - lo;
    if span <= f64::EPSILON * hi.abs().max(1.0) {
        return (lo - 1.0, hi + 1.0);
    }
    (lo - 0.05 * span, hi + 0.05 * span)
}

fn equalize(x: (f64, f64), y: (f64, f64)) -> ((f64, f64), (f64, f64)) {
    let half = 0.5 * (x.1 - x.0).max(y.1 - y.0);
    let (cx, cy) = (0.5 * (x.0 + x.1), 0.5 * (y.0 + y.1));
    ((cx - half, cx + half), (cy - half, cy + half))
}
