//! The fixed benchmark suite, in report order.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug)]
pub enum Target {
    Unary(fn(f32) -> f32),
    Binary(fn(f32, f32) -> f32),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Arity {
    Unary,
    Binary,
}

impl Target {
    pub fn arity(&self) -> Arity {
        match self {
            Target::Unary(_) => Arity::Unary,
            Target::Binary(_) => Arity::Binary,
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct Benchmark {
    pub label: &'static str,
    pub target: Target,
}

fn add(a: f32, b: f32) -> f32 {
    a + b
}

fn sub(a: f32, b: f32) -> f32 {
    a - b
}

fn mult(a: f32, b: f32) -> f32 {
    a * b
}

fn div(a: f32, b: f32) -> f32 {
    a / b
}

// `%` on floats truncates toward zero like C's fmod.
fn fmod(a: f32, b: f32) -> f32 {
    a % b
}

pub const SUITE: [Benchmark; 13] = [
    Benchmark { label: "sin", target: Target::Unary(f32::sin) },
    Benchmark { label: "cos", target: Target::Unary(f32::cos) },
    Benchmark { label: "asin", target: Target::Unary(f32::asin) },
    Benchmark { label: "acos", target: Target::Unary(f32::acos) },
    Benchmark { label: "tan", target: Target::Unary(f32::tan) },
    Benchmark { label: "atan", target: Target::Unary(f32::atan) },
    Benchmark { label: "sqrt", target: Target::Unary(f32::sqrt) },
    Benchmark { label: "pow", target: Target::Binary(f32::powf) },
    Benchmark { label: "fmod", target: Target::Binary(fmod) },
    Benchmark { label: "add", target: Target::Binary(add) },
    Benchmark { label: "sub", target: Target::Binary(sub) },
    Benchmark { label: "mult", target: Target::Binary(mult) },
    Benchmark { label: "div", target: Target::Binary(div) },
];

#[cfg(test)]
mod tests {
    use super::*;

    fn find(label: &str) -> Target {
        SUITE
            .iter()
            .find(|b| b.label == label)
            .map(|b| b.target)
            .unwrap()
    }

    #[test]
    fn test_suite_order() {
        let labels: Vec<&str> = SUITE.iter().map(|b| b.label).collect();
        assert_eq!(
            labels,
            [
                "sin", "cos", "asin", "acos", "tan", "atan", "sqrt", "pow", "fmod", "add", "sub",
                "mult", "div"
            ]
        );
    }

    #[test]
    fn test_arity_split() {
        let unary = SUITE.iter().filter(|b| b.target.arity() == Arity::Unary).count();
        assert_eq!(unary, 7);
        assert!(SUITE[7..].iter().all(|b| b.target.arity() == Arity::Binary));
    }

    #[test]
    fn test_arithmetic_targets() {
        let Target::Binary(add) = find("add") else { panic!("add is binary") };
        let Target::Binary(sub) = find("sub") else { panic!("sub is binary") };
        let Target::Binary(mult) = find("mult") else { panic!("mult is binary") };
        let Target::Binary(div) = find("div") else { panic!("div is binary") };

        assert_eq!(add(0.25, 0.5), 0.75);
        assert_eq!(sub(0.25, 0.5), -0.25);
        assert_eq!(mult(0.25, 0.5), 0.125);
        assert_eq!(div(0.25, 0.5), 0.5);
        assert!(div(1.0, 0.0).is_infinite());
        assert!(div(0.0, 0.0).is_nan());
    }

    #[test]
    fn test_fmod_matches_c_semantics() {
        let Target::Binary(fmod) = find("fmod") else { panic!("fmod is binary") };
        assert_eq!(fmod(0.75, 0.5), 0.25);
        assert_eq!(fmod(-0.75, 0.5), -0.25);
        assert!(fmod(0.5, 0.0).is_nan());
    }

    #[test]
    fn test_unary_targets_on_unit_interval() {
        for bench in SUITE.iter() {
            if let Target::Unary(f) = bench.target {
                for x in [0.0f32, 0.5, 1.0] {
                    assert!(f(x).is_finite(), "{}({x}) should be finite", bench.label);
                }
            }
        }
        let Target::Unary(acos) = find("acos") else { panic!("acos is unary") };
        assert_eq!(acos(1.0), 0.0);
    }
}
