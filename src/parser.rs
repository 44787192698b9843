//! This module provides the parser for macro invocations, utilizing the `pest` crate.
//! State names and final states of abbreviated tables take the form `name` or
//! `name(arg, arg, ...)`, where each argument is itself an invocation.

use crate::types::TabulaError;
use pest::{iterators::Pair, Parser as PestParser};
use pest_derive::Parser as PestParser;
use std::collections::HashMap;
use std::fmt;

/// Derives a `PestParser` for the invocation grammar defined in `grammar.pest`.
#[derive(PestParser)]
#[grammar = "grammar.pest"]
pub struct InvocationParser;

/// A parsed macro invocation such as `f(e1(C, B, a), B, a)`.
///
/// Plain state names and symbols are invocations without arguments.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Invocation {
    pub name: String,
    pub args: Vec<Invocation>,
}

impl Invocation {
    /// Creates an invocation without arguments.
    pub fn leaf(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            args: Vec::new(),
        }
    }

    pub fn new(name: impl Into<String>, args: Vec<Invocation>) -> Self {
        Self {
            name: name.into(),
            args,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.args.is_empty()
    }

    pub fn arity(&self) -> usize {
        self.args.len()
    }

    /// Replaces every name bound in `bindings` with its value.
    ///
    /// A bound argument is replaced by its value as a whole. The name of an invocation
    /// with arguments is only replaced by a value without arguments of its own.
    pub fn substitute(&self, bindings: &HashMap<String, Invocation>) -> Invocation {
        let bound = bindings.get(&self.name);

        if self.is_leaf() {
            return bound.cloned().unwrap_or_else(|| self.clone());
        }

        let name = match bound {
            Some(value) if value.is_leaf() => value.name.clone(),
            _ => self.name.clone(),
        };

        Invocation {
            name,
            args: self.args.iter().map(|arg| arg.substitute(bindings)).collect(),
        }
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        if self.args.is_empty() {
            return Ok(());
        }

        f.write_str("(")?;
        for (i, arg) in self.args.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{arg}")?;
        }
        f.write_str(")")
    }
}

/// Parses a state name or final state into an `Invocation`.
///
/// Empty arguments (as in `f(x, )`) are read as the `blank` symbol.
///
/// # Returns
///
/// * `Ok(Invocation)` if the input follows the invocation grammar.
/// * `Err(TabulaError::ParseError)` if the parentheses are unbalanced or a name is missing.
pub fn parse(input: &str, blank: &str) -> Result<Invocation, TabulaError> {
    let root = InvocationParser::parse(Rule::call, input.trim())
        .map_err(|e| TabulaError::ParseError(Box::new(e)))?
        .next()
        .ok_or_else(|| TabulaError::ValidationError(format!("Empty invocation: {input:?}")))?;

    Ok(parse_invocation(root, blank))
}

/// Builds an `Invocation` from a `Pair<Rule::invocation>`.
fn parse_invocation(pair: Pair<Rule>, blank: &str) -> Invocation {
    let mut name = String::new();
    let mut args = Vec::new();

    for p in pair.into_inner() {
        match p.as_rule() {
            Rule::name => name = p.as_str().to_string(),
            Rule::arguments => args = parse_arguments(p, blank),
            _ => {}
        }
    }

    Invocation { name, args }
}

/// Parses the arguments of an invocation from a `Pair<Rule::arguments>`.
fn parse_arguments(pair: Pair<Rule>, blank: &str) -> Vec<Invocation> {
    pair.into_inner()
        .filter(|p| p.as_rule() == Rule::argument)
        .map(|argument| match argument.into_inner().next() {
            Some(inner) => parse_invocation(inner, blank),
            None => Invocation::leaf(blank),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(input: &str, name: &str, args: &[&str]) {
        let invocation = parse(input, " ").unwrap();
        assert_eq!(invocation.name, name);
        assert_eq!(
            invocation
                .args
                .iter()
                .map(|arg| arg.to_string())
                .collect::<Vec<_>>(),
            args
        );
    }

    #[test]
    fn test_parse_nested_first() {
        check("f(x(y, z), a, b)", "f", &["x(y, z)", "a", "b"]);
    }

    #[test]
    fn test_parse_nested_middle() {
        check("f(a, x(y, z), b)", "f", &["a", "x(y, z)", "b"]);
    }

    #[test]
    fn test_parse_nested_last() {
        check("f(a, b, x(y, z))", "f", &["a", "b", "x(y, z)"]);
    }

    #[test]
    fn test_parse_nested_twice() {
        check("f(x(y, z), x(y, z), b)", "f", &["x(y, z)", "x(y, z)", "b"]);
    }

    #[test]
    fn test_parse_blank_argument() {
        check("f(x, )", "f", &["x", " "]);
        check("f()", "f", &[" "]);
    }

    #[test]
    fn test_parse_plain_name() {
        let invocation = parse("f", " ").unwrap();
        assert!(invocation.is_leaf());
        assert_eq!(invocation.name, "f");
    }

    #[test]
    fn test_parse_custom_blank() {
        let invocation = parse("pe(C, )", "_").unwrap();
        assert_eq!(
            invocation.args,
            vec![Invocation::leaf("C"), Invocation::leaf("_")]
        );
    }

    #[test]
    fn test_canonical_rendering() {
        let spaced = parse("f( a ,x(y,z) )", " ").unwrap();
        let tight = parse("f(a, x(y, z))", " ").unwrap();
        assert_eq!(spaced, tight);
        assert_eq!(spaced.to_string(), "f(a, x(y, z))");
    }

    #[test]
    fn test_parse_unbalanced() {
        let result = parse("f(a, b", " ");
        assert!(matches!(result, Err(TabulaError::ParseError(_))));
        assert!(parse("", " ").is_err());
        assert!(parse("f)", " ").is_err());
    }

    #[test]
    fn test_substitute() {
        let definition = parse("f(e1(C, B, a), B, a)", " ").unwrap();
        let bindings = HashMap::from([
            ("C".to_string(), parse("ph(x)", " ").unwrap()),
            ("B".to_string(), Invocation::leaf("halt")),
            ("a".to_string(), Invocation::leaf("0")),
        ]);

        let substituted = definition.substitute(&bindings);
        assert_eq!(substituted.to_string(), "f(e1(ph(x), halt, 0), halt, 0)");
    }

    #[test]
    fn test_substitute_bound_name() {
        let bindings = HashMap::from([("C".to_string(), parse("g(q, a)", " ").unwrap())]);
        let substituted = Invocation::leaf("C").substitute(&bindings);
        assert_eq!(substituted, parse("g(q, a)", " ").unwrap());
    }
}
