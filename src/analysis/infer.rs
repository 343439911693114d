use super::{Analyzer, Branch, STACK_GROW_SIZE, STACK_RED_ZONE};
use crate::analysis::error::{AnalysisResult, InferenceError};
use crate::analysis::range::Range;
use crate::analysis::types::Type;
use crate::language::ast::Node;

impl Analyzer<'_> {
    /// Computes the type of `node` given the types of its slots. Never
    /// mutates `env`.
    pub fn infer(&self, node: &Node, env: &[Type]) -> AnalysisResult<Type> {
        stacker::maybe_grow(STACK_RED_ZONE, STACK_GROW_SIZE, || self.infer_node(node, env))
    }

    fn infer_node(&self, node: &Node, env: &[Type]) -> AnalysisResult<Type> {
        match node {
            Node::Constant(value) => Ok(Type::constant(*value)),
            Node::EmptyList => Ok(Type::empty_list()),
            Node::Sum(left, right) => {
                let left = scalar_operand(self.infer(left, env)?)?;
                let right = scalar_operand(self.infer(right, env)?)?;
                Ok(Type::Scalar(left + right))
            }
            Node::Negate(inner) => match self.infer(inner, env)? {
                Type::Scalar(range) => Ok(Type::Scalar(-range)),
                found => Err(InferenceError::NegateList { found }.into()),
            },
            Node::Var(slot) => env
                .get(*slot)
                .cloned()
                .ok_or_else(|| InferenceError::UnboundSlot { slot: *slot }.into()),
            Node::Conditional {
                cond,
                non_positive,
                positive,
            } => self.infer_conditional(cond, non_positive, positive, env),
            Node::Cons { head, tail } => {
                let head = self.infer(head, env)?;
                match self.infer(tail, env)? {
                    Type::List { len, elem } => {
                        let elem = if len.end > 0 { head.union(&elem)? } else { head };
                        Ok(Type::list(Range::constant(1) + len, elem))
                    }
                    found => Err(InferenceError::NotAList { found }.into()),
                }
            }
            Node::Head(list) => match self.infer(list, env)? {
                Type::List { len, elem } if len.start >= 1 => Ok(*elem),
                found @ Type::List { .. } => Err(InferenceError::HeadOfEmpty { found }.into()),
                found => Err(InferenceError::NotAList { found }.into()),
            },
            Node::Tail(list) => match self.infer(list, env)? {
                Type::List { len, elem } if len.start >= 1 => Ok(Type::List {
                    len: len.shift(-1),
                    elem,
                }),
                found @ Type::List { .. } => Err(InferenceError::TailOfEmpty { found }.into()),
                found => Err(InferenceError::NotAList { found }.into()),
            },
            Node::Call { name, arg } => {
                let body = self.resolve(name)?;
                let arg = self.infer(arg, env)?;
                let _frame = self.enter(name)?;
                self.infer(body, &[arg])
            }
            Node::MatchFailure { message } => Err(InferenceError::MatchFailure {
                message: message.clone(),
            }
            .into()),
        }
    }

    fn infer_conditional(
        &self,
        cond: &Node,
        non_positive: &Node,
        positive: &Node,
        env: &[Type],
    ) -> AnalysisResult<Type> {
        let lower = match self.assume(cond, &Type::NON_POSITIVE, env)? {
            Branch::Reachable(scratch) => Ok(self.infer(non_positive, &scratch)?),
            Branch::Unreachable(err) => Err(err),
        };
        let upper = match self.assume(cond, &Type::POSITIVE, env)? {
            Branch::Reachable(scratch) => Some(self.infer(positive, &scratch)?),
            Branch::Unreachable(_) => None,
        };
        match (lower, upper) {
            (Ok(lower), Some(upper)) => Ok(lower.union(&upper)?),
            (Ok(only), None) | (Err(_), Some(only)) => Ok(only),
            (Err(err), None) => Err(err),
        }
    }
}

pub(super) fn scalar_operand(ty: Type) -> Result<Range, InferenceError> {
    match ty {
        Type::Scalar(range) => Ok(range),
        found => Err(InferenceError::ArithmeticOnList { found }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::AnalysisError;
    use crate::runtime::Runtime;

    fn infer(node: &Node, env: &[Type]) -> AnalysisResult<Type> {
        let runtime = Runtime::default();
        Analyzer::new(&runtime).infer(node, env)
    }

    #[test]
    fn cons_onto_empty_list_keeps_head_type_exactly() {
        let node = Node::cons(Node::Var(0), Node::EmptyList);
        let ty = infer(&node, &[Type::in_range(2, 4)]).unwrap();
        assert_eq!(ty, Type::list(Range::constant(1), Type::in_range(2, 4)));
    }

    #[test]
    fn cons_joins_head_with_existing_elements() {
        let node = Node::cons(
            Node::Constant(9),
            Node::cons(Node::Constant(1), Node::EmptyList),
        );
        let ty = infer(&node, &[]).unwrap();
        assert_eq!(ty, Type::list(Range::constant(2), Type::in_range(1, 9)));
    }

    #[test]
    fn arithmetic_on_lists_is_an_error() {
        let node = Node::sum(Node::Constant(1), Node::EmptyList);
        assert!(matches!(
            infer(&node, &[]),
            Err(AnalysisError::Inference(InferenceError::ArithmeticOnList { .. }))
        ));
        let node = Node::negate(Node::EmptyList);
        assert!(matches!(
            infer(&node, &[]),
            Err(AnalysisError::Inference(InferenceError::NegateList { .. }))
        ));
    }

    #[test]
    fn tail_shortens_the_list() {
        let list = Type::list(Range::new(2, 5), Type::constant(1));
        let ty = infer(&Node::tail(Node::Var(0)), &[list]).unwrap();
        assert_eq!(ty, Type::list(Range::new(1, 4), Type::constant(1)));
    }

    #[test]
    fn head_and_tail_require_a_non_empty_list() {
        let maybe_empty = Type::list(Range::new(0, 5), Type::constant(1));
        let err = infer(&Node::head(Node::Var(0)), &[maybe_empty.clone()]).unwrap_err();
        assert!(err.to_string().starts_with("cannot take head of an empty list"));
        let err = infer(&Node::tail(Node::Var(0)), &[maybe_empty]).unwrap_err();
        assert!(err.to_string().starts_with("cannot take tail of an empty list"));
        let err = infer(&Node::tail(Node::Constant(3)), &[]).unwrap_err();
        assert!(matches!(
            err,
            AnalysisError::Inference(InferenceError::NotAList { .. })
        ));
    }

    #[test]
    fn conditional_keeps_only_reachable_branch() {
        let node = Node::ifz(Node::Var(0), Node::Constant(10), Node::Constant(20));
        assert_eq!(infer(&node, &[Type::in_range(1, 4)]).unwrap(), Type::constant(20));
        assert_eq!(infer(&node, &[Type::in_range(-4, 0)]).unwrap(), Type::constant(10));
        assert_eq!(
            infer(&node, &[Type::in_range(-4, 4)]).unwrap(),
            Type::in_range(10, 20)
        );
    }

    #[test]
    fn conditional_branches_see_the_narrowed_slot() {
        let node = Node::ifz(Node::Var(0), Node::Var(0), Node::negate(Node::Var(0)));
        let ty = infer(&node, &[Type::in_range(-3, 5)]).unwrap();
        assert_eq!(ty, Type::in_range(-5, 0));
    }

    #[test]
    fn conditional_with_no_reachable_branch_fails() {
        let node = Node::ifz(Node::EmptyList, Node::Constant(1), Node::Constant(2));
        assert!(matches!(
            infer(&node, &[]),
            Err(AnalysisError::Impossible(_))
        ));
    }

    #[test]
    fn unbound_slot_is_reported() {
        assert!(matches!(
            infer(&Node::Var(2), &[Type::undef()]),
            Err(AnalysisError::Inference(InferenceError::UnboundSlot { slot: 2 }))
        ));
    }
}
