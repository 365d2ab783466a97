use grapheq_lexer::normalize;

#[test]
fn explicit_multiplication_and_exponentiation() {
    assert_eq!(normalize("2x+3=y^2"), "2*x +3=y^2");
    assert_eq!(normalize("3(x+1)"), "3*(x +1)");
    assert_eq!(normalize("(x)(y)"), "(x)*(y)");
}

#[test]
fn implicit_exponent_survives_the_multiplication_stage() {
    // The exponent stage must not be pre-empted by the multiplication
    // stage: `x2` is a power, `2x` is a product.
    assert_eq!(normalize("x2+3x"), "x^2 +3*x");
    assert_eq!(normalize("(x+1)2"), "(x +1)^2");
}

#[test]
fn double_star_power_notation_is_accepted() {
    assert_eq!(normalize("x**2"), "x^2");
}

#[test]
fn letter_runs_become_products() {
    assert_eq!(normalize("xy"), "x*y");
    assert_eq!(normalize("2xy"), "2*x*y");
}

#[test]
fn normalization_is_idempotent() {
    for input in [
        "2x+3=y^2",
        "x2+3x",
        "xy-4",
        "3(x+1)(x-1)",
        "x**2 + y**2 = 4",
        "  spaced   -  out  ",
        "",
        "@#!unparsable",
    ] {
        let once = normalize(input);
        assert_eq!(normalize(&once), once, "not idempotent for {input:?}");
    }
}

#[test]
fn already_strict_input_is_unchanged() {
    for input in ["x^2 + 3*x", "2*x + 3 = y^2", "x = 5"] {
        assert_eq!(normalize(input), input);
    }
}
