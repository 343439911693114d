use crate::language::{
    ast::Node,
    errors::SyntaxError,
    parser::{parse_line, Clause, Pattern},
};
use std::collections::{btree_map, BTreeMap};

pub const MATCH_FAILURE_MESSAGE: &str = "failure to pattern match";

/// Every named function of a program, each folded into a single body.
#[derive(Clone, Debug, Default)]
pub struct Runtime {
    functions: BTreeMap<String, Node>,
}

impl Runtime {
    pub fn load(source: &str) -> Result<Self, Vec<SyntaxError>> {
        let mut runtime = Runtime::default();
        runtime.extend_from_source(source)?;
        Ok(runtime)
    }

    /// Parses every clause in `source` and folds it in. Clauses earlier in
    /// the source are tried first, and all of them take precedence over
    /// clauses already loaded.
    pub fn extend_from_source(&mut self, source: &str) -> Result<(), Vec<SyntaxError>> {
        let mut clauses = Vec::new();
        let mut errors = Vec::new();
        let mut offset = 0usize;
        for line in source.split_inclusive('\n') {
            let code = match line.find("--") {
                Some(idx) => &line[..idx],
                None => line,
            };
            if !code.trim().is_empty() {
                match parse_line(code, offset) {
                    Ok(clause) => clauses.push(clause),
                    Err(mut line_errors) => errors.append(&mut line_errors),
                }
            }
            offset += line.len();
        }
        if !errors.is_empty() {
            return Err(errors);
        }
        for clause in clauses.into_iter().rev() {
            self.define(clause);
        }
        Ok(())
    }

    /// Folds `clause` in front of any existing definition of its function.
    pub fn define(&mut self, clause: Clause) {
        let previous = self
            .functions
            .remove(&clause.name)
            .unwrap_or_else(|| Node::match_failure(MATCH_FAILURE_MESSAGE));
        let body = match clause.pattern {
            Some(Pattern::Literal(value)) => Node::ifz(
                Node::difference(Node::Var(0), Node::Constant(value)),
                clause.body,
                previous,
            ),
            Some(Pattern::Binding(_)) | None => clause.body,
        };
        self.functions.insert(clause.name, body);
    }

    pub fn get(&self, name: &str) -> Option<&Node> {
        self.functions.get(name)
    }

    pub fn functions(&self) -> btree_map::Iter<'_, String, Node> {
        self.functions.iter()
    }
}
