use std::path::PathBuf;

use clap::Parser;

use crate::lessons::LessonKind;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about)]
pub struct Args {
    /// Lesson to run
    #[arg(value_enum, default_value_t = LessonKind::All)]
    pub lesson: LessonKind,

    /// Save figures to this directory instead of displaying them
    /// (overrides CONTROL_PLOT_DIR)
    #[arg(long, value_name = "DIR")]
    pub plot_dir: Option<PathBuf>,

    /// Path to settings TOML
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// List the available lessons and exit
    #[arg(long, default_value_t = false)]
    pub list: bool,
}
