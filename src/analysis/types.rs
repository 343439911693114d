use crate::analysis::error::InferenceError;
use crate::analysis::range::{Range, NEG_INF, POS_INF, UNDEF};
use std::fmt;

/// The abstract value of an expression.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Type {
    Scalar(Range),
    /// `len` bounds the number of elements; `elem` is meaningless when
    /// `len.end == 0`.
    List { len: Range, elem: Box<Type> },
}

impl Type {
    /// `x <= 0`
    pub const NON_POSITIVE: Type = Type::Scalar(Range::new(NEG_INF, 0));
    /// `x > 0`
    pub const POSITIVE: Type = Type::Scalar(Range::new(1, POS_INF));

    pub const fn scalar(range: Range) -> Self {
        Type::Scalar(range)
    }

    pub const fn constant(value: i64) -> Self {
        Type::Scalar(Range::constant(value))
    }

    pub const fn in_range(start: i64, end: i64) -> Self {
        Type::Scalar(Range::new(start, end))
    }

    pub const fn undef() -> Self {
        Type::Scalar(UNDEF)
    }

    pub fn list(len: Range, elem: Type) -> Self {
        Type::List {
            len,
            elem: Box::new(elem),
        }
    }

    pub fn empty_list() -> Self {
        Type::list(Range::constant(0), Type::undef())
    }

    /// Value range for scalars, length range for lists.
    pub fn range(&self) -> Range {
        match self {
            Type::Scalar(range) => *range,
            Type::List { len, .. } => *len,
        }
    }

    pub fn elem(&self) -> Option<&Type> {
        match self {
            Type::Scalar(_) => None,
            Type::List { elem, .. } => Some(elem),
        }
    }

    pub fn is_list(&self) -> bool {
        matches!(self, Type::List { .. })
    }

    pub fn is_constant(&self) -> bool {
        matches!(self, Type::Scalar(range) if range.is_constant())
    }

    /// Same shape and element type, with the outer range replaced.
    pub fn with_range(&self, range: Range) -> Type {
        match self {
            Type::Scalar(_) => Type::Scalar(range),
            Type::List { elem, .. } => Type::List {
                len: range,
                elem: elem.clone(),
            },
        }
    }

    pub fn is_subset_of(&self, other: &Type) -> bool {
        match (self, other) {
            (Type::Scalar(a), Type::Scalar(b)) => b.contains_range(a),
            (
                Type::List { len: a, elem: ea },
                Type::List { len: b, elem: eb },
            ) => b.contains_range(a) && (a.end == 0 || ea.is_subset_of(eb)),
            _ => false,
        }
    }

    /// Over-approximating join of two types of the same shape.
    pub fn union(&self, other: &Type) -> Result<Type, InferenceError> {
        match (self, other) {
            (Type::Scalar(a), Type::Scalar(b)) => Ok(Type::Scalar(a.hull(*b))),
            (
                Type::List { len: a, elem: ea },
                Type::List { len: b, elem: eb },
            ) => {
                let elem = if a.end == 0 {
                    (**eb).clone()
                } else if b.end == 0 {
                    (**ea).clone()
                } else {
                    ea.union(eb)?
                };
                Ok(Type::list(a.hull(*b), elem))
            }
            _ => Err(InferenceError::IncompatibleTypes {
                left: self.clone(),
                right: other.clone(),
            }),
        }
    }
}

// Rendered as `[2, 5][1, 2]int[3, 4]`: list dimensions, then the value range.
impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Scalar(range) => {
                let text = range.to_string();
                if text.starts_with(['[', '(']) {
                    write!(f, "int{text}")
                } else {
                    write!(f, "{text}")
                }
            }
            Type::List { len, elem } => {
                let text = len.to_string();
                if text.starts_with(['[', '(']) {
                    write!(f, "{text}{elem}")
                } else {
                    write!(f, "[{text}]{elem}")
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constants_are_single_valued_scalars() {
        assert!(Type::constant(3).is_constant());
        assert!(!Type::in_range(3, 4).is_constant());
        assert!(!Type::list(Range::constant(1), Type::constant(3)).is_constant());
    }

    #[test]
    fn subset_compares_ranges_and_elements() {
        let small = Type::list(Range::new(1, 2), Type::in_range(0, 3));
        let large = Type::list(Range::new(0, 5), Type::in_range(-1, 9));
        assert!(small.is_subset_of(&large));
        assert!(!large.is_subset_of(&small));

        let wide_elems = Type::list(Range::new(1, 2), Type::undef());
        assert!(!wide_elems.is_subset_of(&large));

        assert!(!Type::in_range(0, 1).is_subset_of(&large));
    }

    #[test]
    fn empty_list_is_a_subset_of_any_element_type() {
        let target = Type::list(Range::new(0, 3), Type::constant(7));
        assert!(Type::empty_list().is_subset_of(&target));
    }

    #[test]
    fn union_ignores_the_empty_list_placeholder() {
        let real = Type::list(Range::new(1, 2), Type::in_range(1, 2));
        let joined = Type::empty_list().union(&real).unwrap();
        assert_eq!(joined, Type::list(Range::new(0, 2), Type::in_range(1, 2)));

        let joined = real.union(&Type::empty_list()).unwrap();
        assert_eq!(joined, Type::list(Range::new(0, 2), Type::in_range(1, 2)));
    }

    #[test]
    fn union_joins_element_types_of_non_empty_lists() {
        let a = Type::list(Range::new(1, 1), Type::constant(1));
        let b = Type::list(Range::new(3, 4), Type::in_range(5, 6));
        assert_eq!(
            a.union(&b).unwrap(),
            Type::list(Range::new(1, 4), Type::in_range(1, 6))
        );
    }

    #[test]
    fn union_rejects_mixed_shapes() {
        let err = Type::constant(1).union(&Type::empty_list()).unwrap_err();
        assert!(matches!(err, InferenceError::IncompatibleTypes { .. }));
    }

    #[test]
    fn display_matches_the_surface_notation() {
        assert_eq!(Type::in_range(1, 8).to_string(), "int[1, 8]");
        assert_eq!(Type::constant(3).to_string(), "3");
        assert_eq!(Type::undef().to_string(), "any");
        assert_eq!(Type::empty_list().to_string(), "[0]any");
        assert_eq!(
            Type::list(Range::new(3, 5), Type::in_range(1, 5)).to_string(),
            "[3, 5]int[1, 5]"
        );
    }
}
