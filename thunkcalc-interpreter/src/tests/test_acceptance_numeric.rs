//! Acceptance tests for arithmetic and the numeric model

use crate::number::Number;
use crate::test_harness::CalcTestHarness;

#[test]
fn test_integer_arithmetic() {
    let mut harness = CalcTestHarness::new();

    harness.assert_evaluates_to("5 + 3", "8").unwrap();
    harness.assert_evaluates_to("10 - 4 - 3", "3").unwrap();
    harness.assert_evaluates_to("6 * 7", "42").unwrap();
    harness.assert_evaluates_to("7 / 2", "3").unwrap();
    harness.assert_evaluates_to("-7 / 2", "-3").unwrap();
    harness.assert_evaluates_to("17 % 5", "2").unwrap();
    harness.assert_evaluates_to("-17 % 5", "-2").unwrap();
    harness.assert_evaluates_to("2 + 3 * 4", "14").unwrap();
    harness.assert_evaluates_to("(2 + 3) * 4", "20").unwrap();
}

#[test]
fn test_integer_expressions_match_native_arithmetic() {
    let mut harness = CalcTestHarness::new();
    let cases: [(&str, i64); 6] = [
        ("1 + 2 * 3 - 4 / 2", 1 + 2 * 3 - 4 / 2),
        ("100 / 7 * 7 + 100 % 7", 100 / 7 * 7 + 100 % 7),
        ("-(3 - 10) * 2 / 3", -(3 - 10) * 2 / 3),
        ("9 - 8 - 7 - 6", 9 - 8 - 7 - 6),
        ("1000 / 10 / 3", 1000 / 10 / 3),
        ("2 * -3 + -4 * -5", 2 * -3 + -4 * -5),
    ];
    for (source, expected) in cases {
        harness
            .assert_evaluates_to(source, &expected.to_string())
            .unwrap();
    }
}

#[test]
fn test_mixed_type_promotion() {
    let mut harness = CalcTestHarness::new();

    harness.assert_evaluates_to("1 / 2.0", "0.5").unwrap();
    harness.assert_evaluates_to("1 / 2", "0").unwrap();
    harness.assert_evaluates_to("1.5 + 1", "2.5").unwrap();
    harness.assert_evaluates_to("3.0 * 2", "6").unwrap();
    harness.assert_evaluates_to("7.5 % 2", "1.5").unwrap();

    harness.evaluate("x = 2.0 * 2").unwrap();
    harness.assert_variable("x", Number::Float(4.0)).unwrap();
}

#[test]
fn test_division_by_zero() {
    let mut harness = CalcTestHarness::new();

    harness.assert_error("5 / 0", "division by zero").unwrap();
    harness.assert_error("5 % 0", "division by zero").unwrap();
    harness.assert_error("5.0 / 0", "division by zero").unwrap();
    harness.assert_error("5 / 0.0", "division by zero").unwrap();
}

#[test]
fn test_float_output_format() {
    let mut harness = CalcTestHarness::new();

    harness.assert_evaluates_to("1.5 * 1000000", "1.5e+06").unwrap();
    harness.assert_evaluates_to("1.0 / 100000", "1e-05").unwrap();
    harness.assert_evaluates_to("123456.0", "123456").unwrap();
}

#[test]
fn test_bitwise_and_shift_operators() {
    let mut harness = CalcTestHarness::new();

    harness.assert_evaluates_to("6 & 3", "2").unwrap();
    harness.assert_evaluates_to("6 | 3", "7").unwrap();
    harness.assert_evaluates_to("6 ^ 3", "5").unwrap();
    harness.assert_evaluates_to("7 &^ 2", "5").unwrap();
    harness.assert_evaluates_to("^0", "-1").unwrap();
    harness.assert_evaluates_to("1 << 10", "1024").unwrap();
    harness.assert_evaluates_to("-1024 >> 3", "-128").unwrap();
    harness.assert_evaluates_to("6.7 & 3", "2").unwrap();
    harness.assert_error("1 << -1", "negative shift count").unwrap();
}

#[test]
fn test_comparisons_and_logic() {
    let mut harness = CalcTestHarness::new();

    harness.assert_evaluates_to("1 < 2", "1").unwrap();
    harness.assert_evaluates_to("2 <= 1", "0").unwrap();
    harness.assert_evaluates_to("2 >= 2.0", "1").unwrap();
    harness.assert_evaluates_to("3 != 3", "0").unwrap();
    harness.assert_evaluates_to("3 == 3.0", "1").unwrap();
    harness.assert_evaluates_to("!5", "0").unwrap();
    harness.assert_evaluates_to("2 && 3", "1").unwrap();
    harness.assert_evaluates_to("0 || 0.0", "0").unwrap();
}

#[test]
fn test_short_circuit_skips_unknown_variables() {
    let mut harness = CalcTestHarness::new();

    harness.assert_evaluates_to("0 && nothing", "0").unwrap();
    harness.assert_evaluates_to("1 || nothing", "1").unwrap();
    harness.assert_error("1 && nothing", "unknown variable nothing").unwrap();
}
