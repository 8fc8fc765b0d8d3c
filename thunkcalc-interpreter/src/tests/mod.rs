//! Unit and acceptance tests for the thunkcalc interpreter

pub mod test_acceptance_numeric;
