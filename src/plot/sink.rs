use std::ffi::OsString;
use std::io::{BufRead, Write};
use std::path::PathBuf;

use log::info;
use plotters::prelude::*;

use crate::config::PlotConfig;
use crate::error::ControlError;
use crate::plot::figure::Figure;
use crate::plot::render;

/// Environment variable naming the directory figures are saved to.
pub const PLOT_DIR_VAR: &str = "CONTROL_PLOT_DIR";

/// Where finished figures go.
pub trait FigureSink {
    fn emit(&mut self, figure: &Figure, name: &str) -> Result<(), ControlError>;
}

/// Saves every figure as `{dir}/{name}.svg`.
pub struct FileSink {
    dir: PathBuf,
    size: (u32, u32),
}

impl FileSink {
    pub fn new(dir: impl Into<PathBuf>, size: (u32, u32)) -> FileSink {
        FileSink {
            dir: dir.into(),
            size,
        }
    }

    pub fn path_for(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{}.svg", name))
    }
}

impl FigureSink for FileSink {
    /// The directory must already exist; a missing one fails the save.
    fn emit(&mut self, figure: &Figure, name: &str) -> Result<(), ControlError> {
        let path = self.path_for(name);
        {
            let root = SVGBackend::new(&path, self.size).into_drawing_area();
            render::draw(figure, &root)?;
        }
        info!("Saved {}", path.display());
        Ok(())
    }
}

/// Renders in memory, describes the figure on `output` and waits for one
/// line on `input` before returning. Nothing is written to disk.
pub struct InteractiveSink<R, W> {
    input: R,
    output: W,
    size: (u32, u32),
}

impl<R: BufRead, W: Write> InteractiveSink<R, W> {
    pub fn new(input: R, output: W, size: (u32, u32)) -> InteractiveSink<R, W> {
        InteractiveSink {
            input,
            output,
            size,
        }
    }
}

impl<R: BufRead, W: Write> FigureSink for InteractiveSink<R, W> {
    fn emit(&mut self, figure: &Figure, name: &str) -> Result<(), ControlError> {
        let mut svg = String::new();
        {
            let root = SVGBackend::with_string(&mut svg, self.size).into_drawing_area();
            render::draw(figure, &root)?;
        }

        writeln!(self.output, "== {} ({}) ==", figure.title, name)?;
        for axes in &figure.axes {
            let series: Vec<&str> = axes
                .traces
                .iter()
                .filter_map(|t| t.label.as_deref())
                .collect();
            writeln!(self.output, "  {}: {}", axes.title, series.join(", "))?;
        }
        writeln!(self.output, "  rendered {} bytes of SVG", svg.len())?;
        write!(self.output, "Press Enter to continue...")?;
        self.output.flush()?;

        let mut line = String::new();
        self.input.read_line(&mut line)?;
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Destination {
    File(PathBuf),
    Interactive,
}

impl Destination {
    /// A command-line directory wins over the environment. Any value of the
    /// variable selects files, an empty one meaning the working directory.
    pub fn resolve(cli: Option<PathBuf>, env: Option<OsString>) -> Destination {
        match cli.or_else(|| env.map(PathBuf::from)) {
            Some(dir) => Destination::File(dir),
            None => Destination::Interactive,
        }
    }

    pub fn from_env(cli: Option<PathBuf>) -> Destination {
        Destination::resolve(cli, std::env::var_os(PLOT_DIR_VAR))
    }

    pub fn open(&self, config: &PlotConfig) -> Box<dyn FigureSink> {
        let size = (config.width, config.height);
        match self {
            Destination::File(dir) => Box::new(FileSink::new(dir.clone(), size)),
            Destination::Interactive => Box::new(InteractiveSink::new(
                std::io::stdin().lock(),
                std::io::stdout(),
                size,
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn flag_overrides_environment() {
        assert_eq!(
            Destination::resolve(Some("a".into()), Some("b".into())),
            Destination::File("a".into())
        );
        assert_eq!(
            Destination::resolve(None, Some("b".into())),
            Destination::File("b".into())
        );
        assert_eq!(
            Destination::resolve(None, Some("".into())),
            Destination::File(PathBuf::new())
        );
        assert_eq!(Destination::resolve(None, None), Destination::Interactive);
    }

    #[test]
    fn interactive_sink_waits_for_enter() {
        let mut fig = Figure::time_response("Step", "y");
        fig.add_series(&[0.0, 1.0], &[0.0, 1.0], "a = -1");
        let mut out = Vec::new();
        {
            let mut sink = InteractiveSink::new(Cursor::new("\n\n"), &mut out, (320, 240));
            sink.emit(&fig, "step").unwrap();
        }
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("a = -1"));
        assert!(text.contains("Press Enter"));
    }

    #[test]
    fn empty_directory_saves_beside_the_process() {
        let sink = FileSink::new(PathBuf::new(), (320, 240));
        assert_eq!(sink.path_for("step"), PathBuf::from("step.svg"));
    }
}
