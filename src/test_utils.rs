use std::ops::Range;

use rand::Rng;

use crate::DegreeSpec;

pub fn linspace(start: f64, end: f64, num: usize) -> impl Iterator<Item = f64> {
    let step = if num > 1 {
        (end - start) / (num - 1) as f64
    } else {
        0.0
    };
    (0..num).map(move |i| start + i as f64 * step)
}

pub fn random_point(rng: &mut impl Rng, num_variables: usize, range: Range<f64>) -> Vec<f64> {
    (0..num_variables)
        .map(|_| rng.random_range(range.clone()))
        .collect()
}

/// Central difference of the basis vector along `var`.
pub fn numeric_basis_derivative(
    degrees: &DegreeSpec,
    x: &[f64],
    var: usize,
    epsilon: f64,
) -> Vec<f64> {
    let mut x_plus = x.to_vec();
    x_plus[var] += epsilon;
    let mut x_minus = x.to_vec();
    x_minus[var] -= epsilon;

    let plus = crate::eval_basis_functions(degrees, &x_plus).expect("valid point");
    let minus = crate::eval_basis_functions(degrees, &x_minus).expect("valid point");
    plus.iter()
        .zip(&minus)
        .map(|(p, m)| (p - m) / (2.0 * epsilon))
        .collect()
}

/// A closed-form function together with its exact polynomial representation.
pub struct TestFunction {
    pub name: &'static str,
    pub degrees: Vec<u32>,
    /// Coefficients in Kronecker order for `degrees`.
    pub coefficients: Vec<f64>,
    pub func: fn(&[f64]) -> f64,
    pub grad: fn(&[f64]) -> Vec<f64>,
}

/// All test functions. Built fresh on each call, there is no shared registry.
pub fn test_functions() -> Vec<TestFunction> {
    vec![
        TestFunction {
            name: "constant",
            degrees: vec![],
            coefficients: vec![4.5],
            func: |_| 4.5,
            grad: |_| vec![],
        },
        // f(x) = 1 - 2x + 0.5x^3
        TestFunction {
            name: "cubic_1d",
            degrees: vec![3],
            coefficients: vec![1.0, -2.0, 0.0, 0.5],
            func: |x| 1.0 - 2.0 * x[0] + 0.5 * x[0].powi(3),
            grad: |x| vec![-2.0 + 1.5 * x[0] * x[0]],
        },
        // f(x, y) = 1 - 3y + 2x + xy
        TestFunction {
            name: "bilinear",
            degrees: vec![1, 1],
            coefficients: vec![1.0, -3.0, 2.0, 1.0],
            func: |x| 1.0 - 3.0 * x[1] + 2.0 * x[0] + x[0] * x[1],
            grad: |x| vec![2.0 + x[1], -3.0 + x[0]],
        },
        // f(x, y, z) = 2 - x + x^2 z, y unused
        TestFunction {
            name: "mixed_3d",
            degrees: vec![2, 0, 1],
            coefficients: vec![2.0, 0.0, -1.0, 0.0, 0.0, 1.0],
            func: |x| 2.0 - x[0] + x[0] * x[0] * x[2],
            grad: |x| vec![-1.0 + 2.0 * x[0] * x[2], 0.0, x[0] * x[0]],
        },
        // f(x, y) = (1 + x)^2 (1 - y)^2
        TestFunction {
            name: "separable_quadratic",
            degrees: vec![2, 2],
            coefficients: vec![
                1.0, -2.0, 1.0, //
                2.0, -4.0, 2.0, //
                1.0, -2.0, 1.0,
            ],
            func: |x| (1.0 + x[0]).powi(2) * (1.0 - x[1]).powi(2),
            grad: |x| {
                vec![
                    2.0 * (1.0 + x[0]) * (1.0 - x[1]).powi(2),
                    -2.0 * (1.0 + x[0]).powi(2) * (1.0 - x[1]),
                ]
            },
        },
    ]
}

#[allow(dead_code)]
pub fn init_test_logger() {
    use std::io::Write as _;
    let _ = env_logger::builder()
        .is_test(true)
        .format(|buf, record| {
            // Ansi256 ref: https://hexdocs.pm/color_palette/ansi_color_codes.html
            let bg = anstyle::Ansi256Color(240);
            let level_style = buf
                .default_level_style(record.level())
                .bg_color(Some(bg.into()));
            let grey = anstyle::Ansi256Color(255).on(bg);

            let filepath = match record.file() {
                Some(f) => {
                    // Get just the file name, not the full path.
                    let path = std::path::Path::new(f);
                    match path.file_name() {
                        Some(name) => name.to_string_lossy(),
                        None => "unknown".into(),
                    }
                }
                None => "unknown".into(),
            };
            writeln!(
                buf,
                "{grey}[{grey:#}{level_style}{}{level_style:#}{grey} {}:{}]{grey:#}   {}",
                record.level(),
                filepath,
                record.line().unwrap_or(0),
                record.args()
            )
        })
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_functions_are_consistent() {
        for test_fn in test_functions() {
            let degrees = DegreeSpec::from(test_fn.degrees.clone());
            assert_eq!(
                degrees.num_basis_functions(),
                test_fn.coefficients.len() as u64,
                "{}",
                test_fn.name
            );
            let x = vec![0.25; degrees.num_variables()];
            assert_eq!((test_fn.grad)(&x).len(), degrees.num_variables());
        }
    }
}
