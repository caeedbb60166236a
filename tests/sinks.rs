use std::io::Cursor;

use lti_lessons::plot::{Destination, Figure, FigureSink, FileSink, InteractiveSink};
use lti_lessons::ControlError;

fn unique_dir(name: &str) -> std::path::PathBuf {
    let mut p = std::env::temp_dir();
    p.push(format!(
        "lti_lessons_sink_test_{}_{}",
        name,
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ));
    p
}

fn sample_figure() -> Figure {
    let mut fig = Figure::time_response("Step", "y");
    fig.add_series(&[0.0, 1.0, 2.0], &[0.0, 0.8, 1.0], "a = -1");
    fig
}

#[test]
fn file_sink_writes_named_svg() {
    let dir = unique_dir("file");
    std::fs::create_dir_all(&dir).unwrap();
    let mut sink = FileSink::new(&dir, (400, 300));
    sink.emit(&sample_figure(), "Lec3_scalar_stability_step").unwrap();

    let path = dir.join("Lec3_scalar_stability_step.svg");
    let contents = std::fs::read_to_string(&path).unwrap();
    assert!(contents.contains("<svg"));
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn file_sink_fails_for_missing_directory() {
    let dir = unique_dir("missing").join("deeper");
    let mut sink = FileSink::new(&dir, (400, 300));
    let result = sink.emit(&sample_figure(), "step");
    assert!(matches!(result, Err(ControlError::Plot(_))));
    assert!(!dir.exists());
}

#[test]
fn interactive_sink_consumes_one_line_per_figure_and_writes_nothing() {
    let dir = unique_dir("interactive");
    let mut input = Cursor::new("\nleftover\n");
    let mut output = Vec::new();
    {
        let mut sink = InteractiveSink::new(&mut input, &mut output, (400, 300));
        sink.emit(&sample_figure(), "step").unwrap();
    }
    assert_eq!(input.position(), 1);
    assert!(!dir.exists());
    assert!(String::from_utf8(output).unwrap().contains("Step"));
}

#[test]
fn destination_prefers_flag_then_environment() {
    let dir = unique_dir("dest");
    assert_eq!(
        Destination::resolve(Some(dir.clone()), None),
        Destination::File(dir.clone())
    );
    assert_eq!(
        Destination::resolve(None, Some(dir.clone().into_os_string())),
        Destination::File(dir)
    );
    assert_eq!(
        Destination::resolve(None, Some("".into())),
        Destination::File("".into())
    );
    assert_eq!(Destination::resolve(None, None), Destination::Interactive);
}
