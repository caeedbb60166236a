use clap::Parser;
use log::info;

use lti_lessons::cli::Args;
use lti_lessons::config::Settings;
use lti_lessons::lessons::{self, LessonContext, LessonKind};
use lti_lessons::plot::Destination;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    if args.list {
        for kind in LessonKind::All.expand() {
            if let Some(lesson) = kind.lesson() {
                println!("{}", lesson.name());
            }
        }
        return Ok(());
    }

    let settings = Settings::load_or_default(args.config.as_deref())?;
    let destination = Destination::from_env(args.plot_dir.clone());
    match &destination {
        Destination::File(dir) => info!("Saving figures to {}", dir.display()),
        Destination::Interactive => info!("Displaying figures interactively"),
    }

    let mut sink = destination.open(&settings.plot);
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let mut ctx = LessonContext {
        sink: sink.as_mut(),
        settings: &settings,
        out: &mut out,
    };
    lessons::run(args.lesson, &mut ctx)?;

    Ok(())
}
