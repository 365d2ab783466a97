use grapheq_lexer::normalize;
use grapheq_parser::{parse_input, Parsed};
use grapheq_plot::{
    discover_window, AxisRange, ContourField, ContourRenderer, FigureSpec, RangeJob, Renderer,
};
use grapheq_symbolic::{compile, solve_for, CancelToken};

#[test]
fn circle_renders_to_png() {
    let Parsed::Equation(eq) = parse_input(&normalize("x^2+y^2=4")).expect("parse") else {
        panic!("expected an equation");
    };
    let lmr = eq.left_minus_right().clone();
    let token = CancelToken::new();

    let job = RangeJob {
        x_roots: solve_for(&lmr, "x", &token).expect("solve x"),
        y_roots: solve_for(&lmr, "y", &token).expect("solve y"),
        left_minus_right: lmr.clone(),
        x_var: "x".into(),
        y_var: "y".into(),
        x_range: AxisRange::seeded(-3.0, 3.0),
        y_range: AxisRange::undecided(),
    };
    let window = discover_window(&job, &token).expect("window");

    let compiled = compile(&lmr, &["x".to_string(), "y".to_string()]).expect("compile");
    let field = ContourField::build(&compiled, window, 200);

    let figure = FigureSpec {
        title: format!("{lmr} = 0"),
        x_label: "x".into(),
        y_label: "y".into(),
        field,
    };

    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("circle.png");
    ContourRenderer::default()
        .render(&figure, &path)
        .expect("render");

    let metadata = std::fs::metadata(&path).expect("file exists");
    assert!(metadata.len() > 0);
}
