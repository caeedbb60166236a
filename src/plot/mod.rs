pub mod figure;
pub mod naming;
pub mod render;
pub mod sink;

pub use figure::{Axes, Figure, Scale, Style, Trace};
pub use sink::{Destination, FigureSink, FileSink, InteractiveSink};
