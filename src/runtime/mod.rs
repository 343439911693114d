pub mod error;
pub mod interpreter;
pub mod registry;
pub mod value;

pub use interpreter::Interpreter;
pub use registry::Runtime;
