//! Skeleton tables: the helper m-functions from which larger abbreviated tables are
//! assembled. Each function returns the macro rows of one family; `helper_functions`
//! returns all of them.
//!
//! Parameter conventions: `C`, `B`, `A`, `E` are states; `a`, `b`, `y`, `z`, `w` are symbols.

use crate::types::{Operation, Row};

use Operation::{Erase, Left, Right};

fn row(state: &str, symbols: &[&str], operations: &[Operation], final_state: &str) -> Row {
    Row::new(
        state,
        symbols.iter().copied(),
        operations.iter().cloned(),
        final_state,
    )
}

fn print(symbol: &str) -> Operation {
    Operation::print(symbol)
}

/// `f(C, B, a)`: finds the leftmost `a` and goes to `C`, or to `B` if there is none.
///
/// The search starts from the `ee` marking the beginning of the tape.
pub fn find_left_most() -> Vec<Row> {
    vec![
        row("f(C, B, a)", &["e"], &[Left], "f1(C, B, a)"),
        row("f(C, B, a)", &["!e", " "], &[Left], "f(C, B, a)"),
        row("f1(C, B, a)", &["a"], &[], "C"),
        row("f1(C, B, a)", &["!a"], &[Right], "f1(C, B, a)"),
        row("f1(C, B, a)", &[" "], &[Right], "f2(C, B, a)"),
        row("f2(C, B, a)", &["a"], &[], "C"),
        row("f2(C, B, a)", &["!a"], &[Right], "f1(C, B, a)"),
        row("f2(C, B, a)", &[" "], &[Right], "B"),
    ]
}

/// `e(C, B, a)` erases the first `a` and goes to `C` (`B` if there is none).
/// `e(B, a)` erases every `a` and goes to `B`.
pub fn erase() -> Vec<Row> {
    vec![
        row("e(C, B, a)", &["*", " "], &[], "f(e1(C, B, a), B, a)"),
        row("e1(C, B, a)", &["*", " "], &[Erase], "C"),
        row("e(B, a)", &["*", " "], &[], "e(e(B, a), B, a)"),
    ]
}

/// `pe(C, b)` prints `b` at the end of the sequence of symbols and goes to `C`.
pub fn print_at_the_end() -> Vec<Row> {
    vec![
        row("pe(C, b)", &["*", " "], &[], "f(pe1(C, b), C, e)"),
        row("pe1(C, b)", &["*"], &[Right, Right], "pe1(C, b)"),
        row("pe1(C, b)", &[" "], &[print("b")], "C"),
    ]
}

/// `l(C)` moves left, `fl(C, B, a)` behaves like `f` but moves left before going to `C`.
pub fn find_left() -> Vec<Row> {
    vec![
        row("l(C)", &["*", " "], &[Left], "C"),
        row("fl(C, B, a)", &["*", " "], &[], "f(l(C), B, a)"),
    ]
}

/// `r(C)` moves right, `fr(C, B, a)` behaves like `f` but moves right before going to `C`.
pub fn find_right() -> Vec<Row> {
    vec![
        row("r(C)", &["*", " "], &[Right], "C"),
        row("fr(C, B, a)", &["*", " "], &[], "f(r(C), B, a)"),
    ]
}

/// `c(C, B, a)` writes the first symbol marked `a` at the end and goes to `C`.
///
/// `c1` reads the scanned symbol into its symbol parameter `_b`.
pub fn copy() -> Vec<Row> {
    vec![
        row("c(C, B, a)", &["*", " "], &[], "fl(c1(C), B, a)"),
        row("c1(C)", &["_b"], &[], "pe(C, _b)"),
    ]
}

/// `ce(C, B, a)` copies the first symbol marked `a` and erases the mark.
/// `ce(B, a)` copies every symbol marked `a` in order and erases the marks.
pub fn copy_and_erase() -> Vec<Row> {
    vec![
        row("ce(C, B, a)", &["*", " "], &[], "c(e(C, B, a), B, a)"),
        row("ce(B, a)", &["*", " "], &[], "ce(ce(B, a), B, a)"),
    ]
}

/// `re(C, B, a, b)` replaces the first `a` by `b` and goes to `C` (`B` if there is none).
/// `re(B, a, b)` replaces every `a` by `b`.
pub fn replace() -> Vec<Row> {
    vec![
        row("re(C, B, a, b)", &["*", " "], &[], "f(re1(C, B, a, b), B, a)"),
        row("re1(C, B, a, b)", &["*", " "], &[Erase, print("b")], "C"),
        row("re(B, a, b)", &["*", " "], &[], "re(re(B, a, b), B, a, b)"),
    ]
}

/// `cr(C, B, a, b)` copies the first symbol marked `a` and replaces the mark by `b`.
/// `cr(B, a, b)` does so for every symbol marked `a`.
pub fn copy_and_replace() -> Vec<Row> {
    vec![
        row("cr(C, B, a, b)", &["*", " "], &[], "c(re(C, B, a, b), B, a)"),
        row(
            "cr(B, a, b)",
            &["*", " "],
            &[],
            "cr(cr(B, a, b), re(B, a, b), a, b)",
        ),
    ]
}

/// `cp(C, A, E, a, b)` compares the first symbol marked `a` with the first marked `b`.
/// Goes to `E` if neither exists, to `C` if both exist and are alike, to `A` otherwise.
pub fn compare() -> Vec<Row> {
    vec![
        row(
            "cp(C, A, E, a, b)",
            &["*", " "],
            &[],
            "fl(cp1(C, A, b), f(A, E, b), a)",
        ),
        row("cp1(C, A, b)", &["_y"], &[], "fl(cp2(C, A, _y), A, b)"),
        row("cp2(C, A, y)", &["y"], &[], "C"),
        row("cp2(C, A, y)", &["!y", " "], &[], "A"),
    ]
}

/// `cpe(C, A, E, a, b)` is `cp` that also erases both marks when the symbols are alike.
/// `cpe(A, E, a, b)` compares the whole sequences marked `a` and `b`.
pub fn compare_and_erase() -> Vec<Row> {
    vec![
        row(
            "cpe(C, A, E, a, b)",
            &["*", " "],
            &[],
            "cp(e(e(C, C, b), C, a), A, E, a, b)",
        ),
        row(
            "cpe(A, E, a, b)",
            &["*", " "],
            &[],
            "cpe(cpe(A, E, a, b), A, E, a, b)",
        ),
    ]
}

/// `g(C)` finds the end of the tape. `g(C, a)` finds the last `a`.
pub fn find_right_most() -> Vec<Row> {
    vec![
        row("g(C)", &["*"], &[Right], "g(C)"),
        row("g(C)", &[" "], &[Right], "g1(C)"),
        row("g1(C)", &["*"], &[Right], "g(C)"),
        row("g1(C)", &[" "], &[], "C"),
        row("g(C, a)", &["*", " "], &[], "g(g1(C, a))"),
        row("g1(C, a)", &["a"], &[], "C"),
        row("g1(C, a)", &["!a", " "], &[Left], "g1(C, a)"),
    ]
}

/// `pe2(C, a, b)` prints `a` then `b` at the end.
pub fn print_at_the_end_2() -> Vec<Row> {
    vec![row("pe2(C, a, b)", &["*", " "], &[], "pe(pe(C, b), a)")]
}

/// `ce2` to `ce5` copy and erase the sequences marked by each of their symbol arguments in turn.
pub fn copy_and_erase_n() -> Vec<Row> {
    vec![
        row("ce2(B, a, b)", &["*", " "], &[], "ce(ce(B, b), a)"),
        row("ce3(B, a, b, y)", &["*", " "], &[], "ce(ce2(B, b, y), a)"),
        row(
            "ce4(B, a, b, y, z)",
            &["*", " "],
            &[],
            "ce(ce3(B, b, y, z), a)",
        ),
        row(
            "ce5(B, a, b, y, z, w)",
            &["*", " "],
            &[],
            "ce(ce4(B, b, y, z, w), a)",
        ),
    ]
}

/// `e(C)` erases every mark (the squares right of a figure) and goes to `C`.
pub fn erase_all() -> Vec<Row> {
    vec![
        row("e(C)", &["e"], &[Right], "e1(C)"),
        row("e(C)", &["!e", " "], &[Left], "e(C)"),
        row("e1(C)", &["*"], &[Right, Erase, Right], "e1(C)"),
        row("e1(C)", &[" "], &[], "C"),
    ]
}

/// Returns every skeleton table in one list.
pub fn helper_functions() -> Vec<Row> {
    [
        find_left_most(),
        erase(),
        print_at_the_end(),
        find_left(),
        find_right(),
        copy(),
        copy_and_erase(),
        replace(),
        copy_and_replace(),
        compare(),
        compare_and_erase(),
        find_right_most(),
        print_at_the_end_2(),
        copy_and_erase_n(),
        erase_all(),
    ]
    .concat()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;
    use std::collections::HashSet;

    #[test]
    fn test_all_names_parse() {
        for row in helper_functions() {
            assert!(parse(&row.state, " ").is_ok(), "bad state {}", row.state);
            assert!(
                parse(&row.final_state, " ").is_ok(),
                "bad final state {}",
                row.final_state
            );
        }
    }

    #[test]
    fn test_overloads_differ_in_arity() {
        let signatures: HashSet<(String, usize)> = helper_functions()
            .iter()
            .map(|row| {
                let head = parse(&row.state, " ").unwrap();
                (head.name.clone(), head.arity())
            })
            .collect();

        assert!(signatures.contains(&("e".to_string(), 1)));
        assert!(signatures.contains(&("e".to_string(), 2)));
        assert!(signatures.contains(&("e".to_string(), 3)));
        assert!(signatures.contains(&("g".to_string(), 1)));
        assert!(signatures.contains(&("g".to_string(), 2)));
    }
}
