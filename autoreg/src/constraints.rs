//! Linear constraints on the solution: exact equalities, inequalities, and monotone shapes.
mod equality;
mod inequality;
mod shape;

pub use equality::{orthogonalize_constraints, project_out};
pub use shape::{Trend, difference_operator};
