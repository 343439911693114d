use crate::analysis::types::Type;
use crate::language::ast::Node;
use miette::Diagnostic;
use thiserror::Error;

pub type AnalysisResult<T> = Result<T, AnalysisError>;

/// A contradiction found while computing a node's type.
#[derive(Debug, Error, Diagnostic, Clone, PartialEq)]
pub enum InferenceError {
    #[error("cannot add a list: {found}")]
    #[diagnostic(code(range::arithmetic_on_list))]
    ArithmeticOnList { found: Type },
    #[error("cannot negate a {found}")]
    #[diagnostic(code(range::arithmetic_on_list))]
    NegateList { found: Type },
    #[error("element is not a list type: {found}")]
    #[diagnostic(code(range::not_a_list))]
    NotAList { found: Type },
    #[error("cannot take head of an empty list: {found}")]
    #[diagnostic(
        code(range::empty_head),
        help("guard the call so the list is known to hold at least one element")
    )]
    HeadOfEmpty { found: Type },
    #[error("cannot take tail of an empty list: {found}")]
    #[diagnostic(
        code(range::empty_tail),
        help("guard the call so the list is known to hold at least one element")
    )]
    TailOfEmpty { found: Type },
    #[error("undefined function {name}")]
    #[diagnostic(code(range::undefined_function))]
    UndefinedFunction { name: String },
    #[error("undefined: {message}")]
    #[diagnostic(code(range::match_failure))]
    MatchFailure { message: String },
    #[error("variable slot {slot} is not bound")]
    #[diagnostic(code(range::unbound_slot))]
    UnboundSlot { slot: usize },
    #[error("cannot join {left} with {right}")]
    #[diagnostic(code(range::incompatible_types))]
    IncompatibleTypes { left: Type, right: Type },
    #[error("call depth exceeded {limit} while analysing `{name}`")]
    #[diagnostic(
        code(range::depth_exceeded),
        help("the argument range may never shrink toward a base case; try a narrower --arg or raise --max-depth")
    )]
    DepthExceeded { name: String, limit: usize },
}

/// Backward refinement could not make `context` produce a value of `needed`.
#[derive(Debug, Error, Diagnostic, Clone, PartialEq)]
#[error("needed {needed}, but got {found}, in {context}")]
#[diagnostic(code(range::impossible))]
pub struct Impossible {
    pub context: Box<Node>,
    pub found: Type,
    pub needed: Type,
}

impl Impossible {
    pub fn new(context: &Node, found: Type, needed: &Type) -> Self {
        Self {
            context: Box::new(context.clone()),
            found,
            needed: needed.clone(),
        }
    }
}

#[derive(Debug, Error, Diagnostic, Clone, PartialEq)]
pub enum AnalysisError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Inference(#[from] InferenceError),
    #[error(transparent)]
    #[diagnostic(transparent)]
    Impossible(#[from] Impossible),
}

impl AnalysisError {
    /// Fatal errors abort the analysis instead of marking a branch unreachable.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            AnalysisError::Inference(InferenceError::DepthExceeded { .. })
        )
    }
}
