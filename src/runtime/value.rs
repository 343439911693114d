use std::fmt;

/// A concrete result of evaluation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Value {
    Int(i64),
    List(Vec<Value>),
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Int(_) => "int",
            Value::List(_) => "list",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(v) => write!(f, "{v}"),
            Value::List(items) => {
                for item in items {
                    match item {
                        Value::List(_) => write!(f, "({item}) : ")?,
                        Value::Int(_) => write!(f, "{item} : ")?,
                    }
                }
                write!(f, "[]")
            }
        }
    }
}
