use std::collections::HashMap;

use approx::assert_relative_eq;
use nalgebra as na;

use lti_lessons::config::Settings;
use lti_lessons::control::controller::state_feedback::Controller;
use lti_lessons::control::simulator::{linspace, steady_state_gain, step_response};
use lti_lessons::error::ControlError;
use lti_lessons::lessons::{self, pole_placement, LessonContext, LessonKind};
use lti_lessons::plot::{Figure, FigureSink};

/// Keeps every emitted figure in memory, in emission order.
#[derive(Default)]
struct RecordingSink {
    figures: Vec<(String, Figure)>,
}

impl RecordingSink {
    fn names(&self) -> Vec<&str> {
        self.figures.iter().map(|(name, _)| name.as_str()).collect()
    }

    fn by_name(&self) -> HashMap<&str, &Figure> {
        self.figures
            .iter()
            .map(|(name, fig)| (name.as_str(), fig))
            .collect()
    }
}

impl FigureSink for RecordingSink {
    fn emit(&mut self, figure: &Figure, name: &str) -> Result<(), ControlError> {
        self.figures.push((name.to_string(), figure.clone()));
        Ok(())
    }
}

fn run_lesson(kind: LessonKind) -> (RecordingSink, String) {
    let settings = Settings::default();
    let mut sink = RecordingSink::default();
    let mut out = Vec::new();
    {
        let mut ctx = LessonContext {
            sink: &mut sink,
            settings: &settings,
            out: &mut out,
        };
        lessons::run(kind, &mut ctx).unwrap();
    }
    (sink, String::from_utf8(out).unwrap())
}

#[test]
fn spring_mass_damper_plots_one_trace_per_configuration() {
    let (sink, text) = run_lesson(LessonKind::SpringMassDamper);
    assert_eq!(
        sink.names(),
        vec!["Lec2_spring_mass_damper_step", "Lec2_spring_mass_damper_init"]
    );
    for (_, fig) in &sink.figures {
        assert_eq!(fig.labels().len(), 3);
    }
    assert!(text.contains("mass: 250, spring: 20, damping: 20"));

    let init = sink.by_name()["Lec2_spring_mass_damper_init"];
    assert_eq!(init.axes[0].traces[0].y[0], 5.0);
}

#[test]
fn scalar_stability_separates_stable_from_unstable() {
    let (sink, _) = run_lesson(LessonKind::ScalarStability);
    let figures = sink.by_name();

    let step = figures["Lec3_scalar_stability_step"];
    assert_eq!(step.labels(), vec!["exp(-2t)", "exp(-1t)", "exp(-0.5t)", "exp(0t)", "exp(0.1t)"]);

    // a = -2 rises monotonically towards 1/2.
    let y = &step.axes[0].traces[0].y;
    assert!(y.windows(2).all(|w| w[1] >= w[0] - 1e-12));
    assert_relative_eq!(*y.last().unwrap(), 0.5, epsilon = 1e-3);

    let init = figures["Lec3_scalar_stability_init"];
    let decaying = &init.axes[0].traces[0].y;
    let growing = &init.axes[0].traces[4].y;
    assert!(decaying.last().unwrap() < &0.01);
    assert_relative_eq!(*growing.last().unwrap(), 0.5f64.exp(), epsilon = 1e-9);
}

#[test]
fn scalar_frequency_saves_after_every_system() {
    let (sink, text) = run_lesson(LessonKind::ScalarFrequency);
    assert_eq!(
        sink.names(),
        vec![
            "Lec6_scalar_step_0",
            "Lec6_scalar_init_0",
            "Lec6_scalar_impulse_0",
            "Lec6_scalar_step_1",
            "Lec6_scalar_init_1",
            "Lec6_scalar_impulse_1",
        ]
    );
    let figures = sink.by_name();
    assert_eq!(figures["Lec6_scalar_step_0"].labels().len(), 1);
    assert_eq!(figures["Lec6_scalar_step_1"].labels().len(), 2);
    assert!(text.contains("gain: 0.5"));
    assert!(text.contains("gain: 13.5"));

    // The feedthrough system starts at d = 1.5 and settles at 13.5.
    let y = &figures["Lec6_scalar_step_1"].axes[0].traces[1].y;
    assert_relative_eq!(y[0], 1.5, epsilon = 1e-12);
    assert_relative_eq!(*y.last().unwrap(), 13.5, epsilon = 2e-2);
}

#[test]
fn matrix_exponential_emits_one_figure_per_pair() {
    let (sink, _) = run_lesson(LessonKind::MatrixExponential);
    let names: Vec<String> = (0..6).map(|i| format!("Lec7_matrix_exponential_{}", i)).collect();
    assert_eq!(sink.names(), names.iter().map(String::as_str).collect::<Vec<_>>());

    // alpha = 0 keeps the norm of the state constant.
    let fig = &sink.figures[0].1;
    let (x1, x2) = (&fig.axes[0].traces[0].y, &fig.axes[0].traces[1].y);
    for (a, b) in x1.iter().zip(x2) {
        assert_relative_eq!(a * a + b * b, 2.0, epsilon = 1e-8);
    }
}

#[test]
fn eigenvectors_only_prints() {
    let (sink, text) = run_lesson(LessonKind::Eigenvectors);
    assert!(sink.figures.is_empty());
    assert!(text.contains("eigenvalues"));
    assert!(text.contains("1.0000+3.0000j"));
}

#[test]
fn pole_placement_steady_state_matches_simulation() {
    let plant = pole_placement::open_loop().unwrap();
    let poles = [na::Complex::new(-2.0, 0.0), na::Complex::new(-3.0, 0.0)];
    let controller = Controller::place(&plant, &poles).unwrap();
    assert_relative_eq!(controller.gain()[(0, 0)], 8.0, epsilon = 1e-9);
    assert_relative_eq!(controller.gain()[(0, 1)], 6.0, epsilon = 1e-9);

    let closed = controller.closed_loop(&plant).unwrap();
    let gain = steady_state_gain(&closed).unwrap()[(0, 0)];
    assert_relative_eq!(gain, 1.0 / 6.0, epsilon = 1e-12);

    let response = step_response(&closed, &linspace(0.0, 10.0, 100)).unwrap();
    assert_relative_eq!(response.final_output(0), gain, epsilon = 1e-3);

    let (sink, text) = run_lesson(LessonKind::PolePlacement);
    assert_eq!(
        sink.names(),
        vec!["open_loop_step", "closed_loop_step", "closed_loop_sin", "bode_plot"]
    );
    assert!(text.contains("[[8.0000, 6.0000]]"));
}

#[test]
fn cruise_control_reports_tracking_and_rejection() {
    let (sink, text) = run_lesson(LessonKind::CruiseControl);
    assert_eq!(
        sink.names(),
        vec![
            "open_loop_response",
            "P_control_response",
            "PI_control_response",
            "PID_control_response",
            "PID_comparison",
        ]
    );
    assert!(text.contains("reference tracking (should be 1): 1"));
    assert!(text.contains("disturbance rejection (should be 0): 0"));

    let figures = sink.by_name();
    let open = &figures["open_loop_response"].axes[0].traces[0].y;
    // 100 N against 50 N.s/m drag heads for 2 m/s with a 20 s time constant.
    assert_relative_eq!(*open.last().unwrap(), 2.0 * (1.0 - (-2.5f64).exp()), epsilon = 1e-6);
    assert_eq!(figures["PID_comparison"].labels().len(), 3);
}

#[test]
fn transfer_function_files_use_hyphen_free_stems() {
    let (sink, _) = run_lesson(LessonKind::TransferFunctions);
    let names = sink.names();
    assert_eq!(names[0], "tf_step_responses");
    assert!(names.contains(&"stable_firstorder_pzmap"));
    assert!(names.contains(&"underdamped_secondorder_bode"));
    assert!(names.contains(&"overdamped_bode"));
    assert_eq!(names.len(), 1 + 2 * 5);
}

#[test]
fn margins_lesson_emits_three_figures_per_system() {
    let (sink, text) = run_lesson(LessonKind::Margins);
    assert_eq!(sink.figures.len(), 12);
    let figures = sink.by_name();
    assert!(figures.contains_key("stable_1st-order_bode_margins"));
    assert!(figures.contains_key("high-gain_system_nyquist_annotated"));
    assert!(figures.contains_key("unstable_open-loop_pzmap"));
    assert!(text.contains("Z = N + P"));
    assert!(text.contains("Phase Margin: 36.87 deg"));
    assert!(text.contains("Phase Margin: 90.00 deg"));
}

#[test]
fn lead_lag_names_follow_coefficients() {
    let (sink, text) = run_lesson(LessonKind::LeadLag);
    assert_eq!(
        sink.names(),
        vec!["bode_lead_num_5_10_den_1_10", "bode_lag_num_5_50_den_1_2"]
    );
    assert!(text.contains("--- Lead Compensator ---"));
    assert!(sink.figures[0].1.title.starts_with("Lead Compensator: G(s) = (5s + 10) / (s + 10)"));
}

#[test]
fn sinusoidal_and_practice_lessons_emit_expected_names() {
    let (sink, _) = run_lesson(LessonKind::SinusoidalResponse);
    assert_eq!(
        sink.names(),
        vec![
            "Lec6_scalar_sinusoidal_frequency3",
            "Lec6_scalar_sinusoidal_frequency5",
            "matlab_bode",
        ]
    );
    let (sink, text) = run_lesson(LessonKind::PracticeMargins);
    assert_eq!(sink.names(), vec!["practice_final_bode"]);
    assert!(text.contains("Gain Margin"));
}

#[test]
fn second_order_lesson_has_four_pairs() {
    let (sink, _) = run_lesson(LessonKind::SecondOrder);
    assert_eq!(sink.names(), vec!["tf_step", "tf_init"]);
    assert_eq!(sink.figures[0].1.labels()[3], "zeta: 1.2, w0: 6");
}
