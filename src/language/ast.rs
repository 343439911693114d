use std::fmt;

/// An expression tree. Function bodies are folded into a single `Node`
/// whose argument lives in slot 0.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Node {
    Constant(i64),
    EmptyList,
    Sum(Box<Node>, Box<Node>),
    Negate(Box<Node>),
    Var(usize),
    /// Takes `non_positive` when `cond <= 0`, `positive` otherwise.
    Conditional {
        cond: Box<Node>,
        non_positive: Box<Node>,
        positive: Box<Node>,
    },
    Cons {
        head: Box<Node>,
        tail: Box<Node>,
    },
    Head(Box<Node>),
    Tail(Box<Node>),
    Call {
        name: String,
        arg: Box<Node>,
    },
    MatchFailure {
        message: String,
    },
}

impl Node {
    pub fn sum(left: Node, right: Node) -> Node {
        Node::Sum(Box::new(left), Box::new(right))
    }

    /// `left - right`, lowered as `left + -right`.
    pub fn difference(left: Node, right: Node) -> Node {
        Node::sum(left, Node::negate(right))
    }

    pub fn negate(inner: Node) -> Node {
        Node::Negate(Box::new(inner))
    }

    pub fn ifz(cond: Node, non_positive: Node, positive: Node) -> Node {
        Node::Conditional {
            cond: Box::new(cond),
            non_positive: Box::new(non_positive),
            positive: Box::new(positive),
        }
    }

    pub fn cons(head: Node, tail: Node) -> Node {
        Node::Cons {
            head: Box::new(head),
            tail: Box::new(tail),
        }
    }

    pub fn head(list: Node) -> Node {
        Node::Head(Box::new(list))
    }

    pub fn tail(list: Node) -> Node {
        Node::Tail(Box::new(list))
    }

    pub fn call(name: impl Into<String>, arg: Node) -> Node {
        Node::Call {
            name: name.into(),
            arg: Box::new(arg),
        }
    }

    pub fn match_failure(message: impl Into<String>) -> Node {
        Node::MatchFailure {
            message: message.into(),
        }
    }
}

const SLOT_NAMES: &[u8] = b"xyzwabc";

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Constant(value) => write!(f, "{value}"),
            Node::EmptyList => write!(f, "[]"),
            Node::Sum(left, right) => match right.as_ref() {
                Node::Negate(inner) => write!(f, "({left} - {inner})"),
                _ => write!(f, "({left} + {right})"),
            },
            Node::Negate(inner) => write!(f, "-{inner}"),
            Node::Var(slot) => match SLOT_NAMES.get(*slot) {
                Some(name) => write!(f, "{}", *name as char),
                None => write!(f, "@{slot}"),
            },
            Node::Conditional {
                cond,
                non_positive,
                positive,
            } => write!(f, "ifz({cond}, {non_positive}, {positive})"),
            Node::Cons { head, tail } => write!(f, "{head} : {tail}"),
            Node::Head(list) => write!(f, "head({list})"),
            Node::Tail(list) => write!(f, "tail({list})"),
            Node::Call { name, arg } => write!(f, "{name}({arg})"),
            Node::MatchFailure { .. } => write!(f, "undef()"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_differences_and_slots() {
        let node = Node::difference(Node::Var(0), Node::Constant(1));
        assert_eq!(node.to_string(), "(x - 1)");
        assert_eq!(Node::Var(9).to_string(), "@9");
        assert_eq!(
            Node::cons(Node::Var(0), Node::call("repeat", node)).to_string(),
            "x : repeat((x - 1))"
        );
    }
}
