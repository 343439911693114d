use crate::analysis::{options::AnalysisOptions, STACK_GROW_SIZE, STACK_RED_ZONE};
use crate::language::ast::Node;
use crate::runtime::{
    error::{RuntimeError, RuntimeResult},
    registry::Runtime,
    value::Value,
};
use std::cell::Cell;

/// Strict tree-walking evaluator over the same nodes the analyzer reads.
pub struct Interpreter<'rt> {
    runtime: &'rt Runtime,
    max_call_depth: usize,
    depth: Cell<usize>,
}

impl<'rt> Interpreter<'rt> {
    pub fn new(runtime: &'rt Runtime) -> Self {
        Self::with_options(runtime, AnalysisOptions::default())
    }

    pub fn with_options(runtime: &'rt Runtime, options: AnalysisOptions) -> Self {
        Self {
            runtime,
            max_call_depth: options.max_call_depth,
            depth: Cell::new(0),
        }
    }

    pub fn call(&self, name: &str, arg: Value) -> RuntimeResult<Value> {
        let body = self
            .runtime
            .get(name)
            .ok_or_else(|| RuntimeError::UnknownFunction {
                name: name.to_string(),
            })?;
        let depth = self.depth.get();
        if depth >= self.max_call_depth {
            return Err(RuntimeError::DepthExceeded {
                name: name.to_string(),
                limit: self.max_call_depth,
            });
        }
        self.depth.set(depth + 1);
        let result = self.eval(body, &[arg]);
        self.depth.set(depth);
        result
    }

    pub fn eval(&self, node: &Node, args: &[Value]) -> RuntimeResult<Value> {
        stacker::maybe_grow(STACK_RED_ZONE, STACK_GROW_SIZE, || self.eval_node(node, args))
    }

    fn eval_node(&self, node: &Node, args: &[Value]) -> RuntimeResult<Value> {
        match node {
            Node::Constant(value) => Ok(Value::Int(*value)),
            Node::EmptyList => Ok(Value::List(Vec::new())),
            Node::Sum(left, right) => {
                let lhs = self.eval_int(left, args)?;
                let rhs = self.eval_int(right, args)?;
                lhs.checked_add(rhs)
                    .map(Value::Int)
                    .ok_or_else(|| RuntimeError::Overflow {
                        message: format!("{lhs} + {rhs}"),
                    })
            }
            Node::Negate(inner) => {
                let value = self.eval_int(inner, args)?;
                value
                    .checked_neg()
                    .map(Value::Int)
                    .ok_or_else(|| RuntimeError::Overflow {
                        message: format!("-({value})"),
                    })
            }
            Node::Var(slot) => args
                .get(*slot)
                .cloned()
                .ok_or(RuntimeError::UnboundSlot { slot: *slot }),
            Node::Conditional {
                cond,
                non_positive,
                positive,
            } => {
                if self.eval_int(cond, args)? <= 0 {
                    self.eval(non_positive, args)
                } else {
                    self.eval(positive, args)
                }
            }
            Node::Cons { head, tail } => {
                let head = self.eval(head, args)?;
                let mut items = vec![head];
                items.extend(self.eval_list(tail, args)?);
                Ok(Value::List(items))
            }
            Node::Head(list) => self
                .eval_list(list, args)?
                .into_iter()
                .next()
                .ok_or(RuntimeError::EmptyList { operation: "head" }),
            Node::Tail(list) => {
                let mut items = self.eval_list(list, args)?;
                if items.is_empty() {
                    return Err(RuntimeError::EmptyList { operation: "tail" });
                }
                items.remove(0);
                Ok(Value::List(items))
            }
            Node::Call { name, arg } => {
                let arg = self.eval(arg, args)?;
                self.call(name, arg)
            }
            Node::MatchFailure { message } => Err(RuntimeError::MatchError {
                message: message.clone(),
            }),
        }
    }

    fn eval_int(&self, node: &Node, args: &[Value]) -> RuntimeResult<i64> {
        match self.eval(node, args)? {
            Value::Int(value) => Ok(value),
            other => Err(RuntimeError::TypeMismatch {
                message: format!("expected int, found {} `{}` in {}", other.type_name(), other, node),
            }),
        }
    }

    fn eval_list(&self, node: &Node, args: &[Value]) -> RuntimeResult<Vec<Value>> {
        match self.eval(node, args)? {
            Value::List(items) => Ok(items),
            other => Err(RuntimeError::TypeMismatch {
                message: format!("expected list, found {} `{}` in {}", other.type_name(), other, node),
            }),
        }
    }
}
