use crate::{
    analysis::AnalysisError, language::errors::SyntaxError, runtime::error::RuntimeError,
};
use miette::{Diagnostic, NamedSource, Report, SourceSpan};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
#[error("{message}")]
#[diagnostic(code(range::syntax))]
pub struct SyntaxDiagnostic {
    #[source_code]
    src: NamedSource,
    #[label("{label}")]
    span: SourceSpan,
    #[help]
    help: Option<String>,
    message: String,
    label: String,
}

impl SyntaxDiagnostic {
    pub fn from_error(src: NamedSource, err: SyntaxError) -> Self {
        Self {
            src,
            span: err.to_source_span(),
            help: err.help,
            message: err.message,
            label: err.label,
        }
    }
}

pub fn emit_syntax_errors(path: &Path, source: &str, errors: &[SyntaxError]) {
    for err in errors {
        let src = NamedSource::new(path.display().to_string(), source.to_string());
        let diagnostic = SyntaxDiagnostic::from_error(src, err.clone());
        eprintln!("{:?}", Report::new(diagnostic));
    }
}

pub fn report_analysis_error(function: &str, error: AnalysisError) {
    eprintln!("{:?}", Report::new(error).wrap_err(format!("while analysing `{function}`")));
}

pub fn report_runtime_error(error: &RuntimeError) {
    eprintln!("Runtime error: {}", error);
}

pub fn report_io_error(path: &Path, error: &std::io::Error) {
    eprintln!("Failed to access {}: {}", path.display(), error);
}
