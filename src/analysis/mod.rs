//! Range-based abstract interpretation.
//!
//! [`Analyzer::infer`] computes the [`Type`] of a node under an environment
//! of slot types. [`Analyzer::restrict`] runs the other way: it narrows the
//! environment so the node could evaluate to a value of a target type, or
//! reports that no such narrowing exists.

pub mod error;
mod infer;
pub mod options;
pub mod range;
mod restrict;
pub mod types;

pub use error::{AnalysisError, AnalysisResult, Impossible, InferenceError};
pub use options::AnalysisOptions;
pub use range::{Range, NEG_INF, POS_INF, UNDEF};
pub use types::Type;

use crate::language::ast::Node;
use crate::runtime::Runtime;
use std::cell::Cell;

/// Remaining stack below which a recursive step moves to a fresh segment.
pub(crate) const STACK_RED_ZONE: usize = 128 * 1024;
pub(crate) const STACK_GROW_SIZE: usize = 4 * 1024 * 1024;

pub struct Analyzer<'rt> {
    runtime: &'rt Runtime,
    options: AnalysisOptions,
    depth: Cell<usize>,
}

impl<'rt> Analyzer<'rt> {
    pub fn new(runtime: &'rt Runtime) -> Self {
        Self::with_options(runtime, AnalysisOptions::default())
    }

    pub fn with_options(runtime: &'rt Runtime, options: AnalysisOptions) -> Self {
        Self {
            runtime,
            options,
            depth: Cell::new(0),
        }
    }

    /// Type of `name` applied to an argument of type `arg`.
    pub fn infer_function(&self, name: &str, arg: Type) -> AnalysisResult<Type> {
        let body = self.resolve(name)?;
        let _frame = self.enter(name)?;
        self.infer(body, &[arg])
    }

    /// Narrows `arg` so that `name` applied to it could produce `target`.
    pub fn restrict_function(&self, name: &str, arg: Type, target: &Type) -> AnalysisResult<Type> {
        let body = self.resolve(name)?;
        let mut locals = vec![arg];
        {
            let _frame = self.enter(name)?;
            self.restrict(body, &mut locals, target)?;
        }
        Ok(locals.swap_remove(0))
    }

    fn resolve(&self, name: &str) -> AnalysisResult<&'rt Node> {
        self.runtime.get(name).ok_or_else(|| {
            InferenceError::UndefinedFunction {
                name: name.to_string(),
            }
            .into()
        })
    }

    fn enter(&self, name: &str) -> AnalysisResult<CallFrame<'_>> {
        let depth = self.depth.get();
        if depth >= self.options.max_call_depth {
            tracing::debug!(function = name, depth, "call depth limit reached");
            return Err(InferenceError::DepthExceeded {
                name: name.to_string(),
                limit: self.options.max_call_depth,
            }
            .into());
        }
        self.depth.set(depth + 1);
        Ok(CallFrame { depth: &self.depth })
    }
}

struct CallFrame<'a> {
    depth: &'a Cell<usize>,
}

impl Drop for CallFrame<'_> {
    fn drop(&mut self) {
        self.depth.set(self.depth.get() - 1);
    }
}

/// Outcome of assuming one side of a conditional.
enum Branch {
    Reachable(Vec<Type>),
    Unreachable(AnalysisError),
}

impl Analyzer<'_> {
    /// Restricts `cond` to `guard` on a copy of `env`. Fatal errors escape;
    /// anything else marks the branch unreachable.
    fn assume(&self, cond: &Node, guard: &Type, env: &[Type]) -> AnalysisResult<Branch> {
        let mut scratch = env.to_vec();
        match self.restrict(cond, &mut scratch, guard) {
            Ok(()) => Ok(Branch::Reachable(scratch)),
            Err(err) if err.is_fatal() => Err(err),
            Err(err) => {
                tracing::trace!(%cond, %guard, %err, "branch unreachable");
                Ok(Branch::Unreachable(err))
            }
        }
    }
}
