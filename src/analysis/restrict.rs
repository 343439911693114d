use super::infer::scalar_operand;
use super::{Analyzer, Branch, STACK_GROW_SIZE, STACK_RED_ZONE};
use crate::analysis::error::{AnalysisError, AnalysisResult, Impossible, InferenceError};
use crate::analysis::range::{Range, POS_INF};
use crate::analysis::types::Type;
use crate::language::ast::Node;

impl Analyzer<'_> {
    /// Narrows `env` so that `node` could evaluate to a value of `target`.
    ///
    /// Slots are only ever narrowed. On failure `env` may have been partially
    /// narrowed; callers that need to roll back pass a copy.
    pub fn restrict(&self, node: &Node, env: &mut [Type], target: &Type) -> AnalysisResult<()> {
        stacker::maybe_grow(STACK_RED_ZONE, STACK_GROW_SIZE, || {
            self.restrict_node(node, env, target)
        })
    }

    fn restrict_node(&self, node: &Node, env: &mut [Type], target: &Type) -> AnalysisResult<()> {
        match node {
            Node::Constant(value) => match target {
                Type::Scalar(range) if range.contains(*value) => Ok(()),
                _ => Err(Impossible::new(node, Type::constant(*value), target).into()),
            },
            Node::EmptyList => match target {
                Type::List { len, .. } if len.contains(0) => Ok(()),
                _ => Err(Impossible::new(node, Type::empty_list(), target).into()),
            },
            Node::Sum(left, right) => {
                let Type::Scalar(wanted) = target else {
                    return Err(self.impossible(node, env, target));
                };
                let left_range = scalar_operand(self.infer(left, env)?)?;
                let right_range = scalar_operand(self.infer(right, env)?)?;
                // Each side is solved against the other's unrestricted range;
                // nothing is committed unless both sides succeed.
                let mut scratch = env.to_vec();
                self.restrict(left, &mut scratch, &Type::Scalar(*wanted + -right_range))?;
                self.restrict(right, &mut scratch, &Type::Scalar(*wanted + -left_range))?;
                env.clone_from_slice(&scratch);
                Ok(())
            }
            Node::Negate(inner) => match target {
                Type::Scalar(range) => self.restrict(inner, env, &Type::Scalar(-*range)),
                _ => Err(self.impossible(node, env, target)),
            },
            Node::Var(slot) => {
                let current = env
                    .get(*slot)
                    .ok_or(InferenceError::UnboundSlot { slot: *slot })?;
                let narrowed = (current.is_list() == target.is_list())
                    .then(|| current.range().intersect(target.range()))
                    .flatten();
                match narrowed {
                    Some(range) => {
                        env[*slot] = current.with_range(range);
                        Ok(())
                    }
                    None => Err(Impossible::new(node, current.clone(), target).into()),
                }
            }
            Node::Conditional {
                cond,
                non_positive,
                positive,
            } => self.restrict_conditional(cond, non_positive, positive, env, target),
            Node::Cons { head, tail } => {
                let Type::List { len, elem } = target else {
                    return Err(self.impossible(node, env, target));
                };
                let Some(len) = len.intersect(Range::new(1, POS_INF)) else {
                    return Err(self.impossible(node, env, target));
                };
                self.restrict(head, env, elem)?;
                self.restrict(tail, env, &Type::list(len.shift(-1), (**elem).clone()))
            }
            Node::Head(list) => {
                let wanted = Type::list(Range::new(1, POS_INF), target.clone());
                self.restrict(list, env, &wanted)
            }
            Node::Tail(list) => match target {
                Type::List { len, elem } => {
                    let wanted = Type::list(len.shift(1), (**elem).clone());
                    self.restrict(list, env, &wanted)
                }
                _ => Err(self.impossible(node, env, target)),
            },
            Node::Call { name, arg } => {
                let body = self.resolve(name)?;
                let mut locals = vec![self.infer(arg, env)?];
                {
                    let _frame = self.enter(name)?;
                    self.restrict(body, &mut locals, target)?;
                }
                self.restrict(arg, env, &locals[0])
            }
            Node::MatchFailure { .. } => Err(Impossible::new(node, Type::undef(), target).into()),
        }
    }

    fn restrict_conditional(
        &self,
        cond: &Node,
        non_positive: &Node,
        positive: &Node,
        env: &mut [Type],
        target: &Type,
    ) -> AnalysisResult<()> {
        let lower = self.restrict_branch(cond, &Type::NON_POSITIVE, non_positive, env, target)?;
        let upper = self.restrict_branch(cond, &Type::POSITIVE, positive, env, target)?;
        match (lower, upper) {
            (Branch::Reachable(lower), Branch::Reachable(upper)) => {
                for (slot, (lower, upper)) in env.iter_mut().zip(lower.iter().zip(&upper)) {
                    *slot = lower.union(upper)?;
                }
                Ok(())
            }
            (Branch::Reachable(only), Branch::Unreachable(_))
            | (Branch::Unreachable(_), Branch::Reachable(only)) => {
                env.clone_from_slice(&only);
                Ok(())
            }
            (Branch::Unreachable(err), Branch::Unreachable(_)) => Err(err),
        }
    }

    fn restrict_branch(
        &self,
        cond: &Node,
        guard: &Type,
        branch: &Node,
        env: &[Type],
        target: &Type,
    ) -> AnalysisResult<Branch> {
        let mut scratch = match self.assume(cond, guard, env)? {
            Branch::Reachable(scratch) => scratch,
            unreachable => return Ok(unreachable),
        };
        match self.restrict(branch, &mut scratch, target) {
            Ok(()) => Ok(Branch::Reachable(scratch)),
            Err(err) if err.is_fatal() => Err(err),
            Err(err) => Ok(Branch::Unreachable(err)),
        }
    }

    /// Builds an `Impossible` for `node`, describing what it currently
    /// evaluates to when that is known.
    fn impossible(&self, node: &Node, env: &[Type], needed: &Type) -> AnalysisError {
        let found = self.infer(node, env).unwrap_or_else(|_| Type::undef());
        Impossible::new(node, found, needed).into()
    }
}
