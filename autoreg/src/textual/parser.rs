use super::{Mode, Problem, Row};
use winnow::{
    Result as WResult,
    ascii::{newline, space0},
    combinator::{alt, delimited, eof, opt, preceded, repeat, separated},
    prelude::*,
    token::literal,
};

pub(crate) fn parse_problem(i: &mut &str) -> WResult<Problem> {
    Problem::parse(i)
}

impl Problem {
    /// Parse a whole problem, up to the end of the input.
    pub fn parse(i: &mut &str) -> WResult<Self> {
        blank_lines(i);
        let mode = opt(Mode::parse_header).parse_next(i)?.unwrap_or_default();
        blank_lines(i);
        header("objective").parse_next(i)?;
        let objective: Vec<_> = separated(1.., Row::equation, newline).parse_next(i)?;
        blank_lines(i);
        let equalities = opt(preceded(header("equalities"), rows(Row::equation)))
            .parse_next(i)?
            .unwrap_or_default();
        blank_lines(i);
        let inequalities = opt(preceded(header("inequalities"), rows(Row::inequality)))
            .parse_next(i)?
            .unwrap_or_default();
        blank_lines(i);
        ignore_ws(i);
        eof.parse_next(i)?;
        Ok(Self {
            mode,
            objective,
            equalities,
            inequalities,
        })
    }
}

impl Mode {
    // # mode nonnegative
    fn parse_header(i: &mut &str) -> WResult<Self> {
        let (_, _, _, _, mode, _, _) = (
            '#',
            ws,
            "mode",
            ws,
            alt((
                "nonnegative".value(Self::NonNegative),
                "rising".value(Self::Rising),
                "falling".value(Self::Falling),
            )),
            ws,
            line_end,
        )
            .parse_next(i)?;
        Ok(mode)
    }
}

impl Row {
    // 1, -2.5, 3e-2 = 4
    fn equation(i: &mut &str) -> WResult<Self> {
        Self::with_relation(i, "=")
    }

    // 1, 0 >= 0
    fn inequality(i: &mut &str) -> WResult<Self> {
        Self::with_relation(i, ">=")
    }

    fn with_relation(i: &mut &str, relation: &'static str) -> WResult<Self> {
        ignore_ws(i);
        let coefficients: Vec<f64> =
            separated(1.., delimited(space0, parse_number, space0), ',').parse_next(i)?;
        literal(relation).parse_next(i)?;
        let rhs = delimited(space0, parse_number, space0).parse_next(i)?;
        Ok(Self { coefficients, rhs })
    }
}

fn rows<'s>(
    row: fn(&mut &'s str) -> WResult<Row>,
) -> impl Parser<&'s str, Vec<Row>, winnow::error::ContextError> {
    separated(0.., row, newline)
}

fn header<'s>(name: &'static str) -> impl Parser<&'s str, (), winnow::error::ContextError> {
    ('#', ws, name, ws, line_end).void()
}

fn line_end(i: &mut &str) -> WResult<()> {
    alt((newline.void(), eof.void())).parse_next(i)
}

/// Skip any number of lines containing nothing but whitespace.
fn blank_lines(i: &mut &str) {
    let _: WResult<()> = repeat(0.., (space0, newline)).parse_next(i);
}

fn ws(i: &mut &str) -> WResult<()> {
    space0.parse_next(i).map(|_| ())
}

fn ignore_ws(i: &mut &str) {
    let _ = ws.parse_next(i);
}

fn parse_number(i: &mut &str) -> WResult<f64> {
    winnow::ascii::float.parse_next(i)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_rows() {
        let row = Row::equation.parse("1, -2.5,3e-2 = 4").unwrap();
        assert_eq!(row.coefficients, vec![1.0, -2.5, 0.03]);
        assert_eq!(row.rhs, 4.0);
        let row = Row::inequality.parse("  1,0 >= -1 ").unwrap();
        assert_eq!(row.coefficients, vec![1.0, 0.0]);
        assert_eq!(row.rhs, -1.0);
        assert!(Row::inequality.parse("1, 0 = 1").is_err());
        assert!(Row::equation.parse("= 1").is_err());
    }

    #[test]
    fn parses_full_problem() {
        let txt = "# mode rising
# objective
1, 1 = 2
1, 1.01 = 3

# equalities
1, 1 = 3

# inequalities
1, 0 >= 0
";
        let problem = parse_problem.parse(txt).unwrap();
        assert_eq!(problem.mode, Mode::Rising);
        assert_eq!(problem.objective.len(), 2);
        assert_eq!(problem.objective[1].coefficients, vec![1.0, 1.01]);
        assert_eq!(problem.equalities.len(), 1);
        assert_eq!(problem.inequalities[0].rhs, 0.0);
    }

    #[test]
    fn optional_sections() {
        let problem = parse_problem.parse("# objective\n1 = 2").unwrap();
        assert_eq!(problem.mode, Mode::Plain);
        assert!(problem.equalities.is_empty());
        assert!(problem.inequalities.is_empty());

        let problem = parse_problem
            .parse("# objective\n1 = 2\n\n# equalities\n\n# inequalities\n1 >= 0\n\n")
            .unwrap();
        assert!(problem.equalities.is_empty());
        assert_eq!(problem.inequalities.len(), 1);
    }

    #[test]
    fn rejects_bad_problems() {
        // No objective.
        assert!(parse_problem.parse("# equalities\n1 = 2\n").is_err());
        // Sections out of order.
        assert!(
            parse_problem
                .parse("# objective\n1 = 2\n# inequalities\n1 >= 0\n# equalities\n1 = 1\n")
                .is_err()
        );
        // Unknown mode.
        assert!(parse_problem.parse("# mode sideways\n# objective\n1 = 2\n").is_err());
    }
}
