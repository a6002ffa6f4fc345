//! Solves a nearly singular system, with and without constraints.
use autoreg::{matrix, solve_auto, solve_non_negative, solve_with_equality};

fn main() -> Result<(), autoreg::Error> {
    let a = matrix::from_rows(&[[1.0, 1.0], [1.0, 1.01]])?;
    let b = [2.0, 3.0];
    let solution = solve_auto(a.as_ref(), &b)?;
    println!(
        "x = {:?} (numerical rank {}, usable rank {}, lambda {:.3e})",
        solution.x(),
        solution.numerical_rank(),
        solution.usable_rank(),
        solution.lambda()
    );

    let e = matrix::from_rows(&[[1.0, 1.0]])?;
    let solution = solve_with_equality(a.as_ref(), &b, e.as_ref(), &[2.0])?;
    println!("with x0 + x1 = 2: x = {:?}", solution.x());

    let a = matrix::from_rows(&[[2.0, 2.0, 1.0], [2.0, 1.0, 0.0], [1.0, 1.0, 0.0]])?;
    let solution = solve_non_negative(a.as_ref(), &[3.9, 3.0, 2.0])?;
    println!("non-negative: x = {:?}, zeroed columns {:?}", solution.x(), solution.active());
    Ok(())
}
