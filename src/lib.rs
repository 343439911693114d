pub mod analysis;
pub mod diagnostics;
pub mod language;
pub mod runtime;
