use thiserror::Error;

/// Errors surfaced by the compilation pipeline. Every error is fatal: the
/// driver reports the first one and no output file is produced.
#[derive(Debug, Error)]
pub enum CompilerError {
    /// The source text does not match the grammar. Carries pest's rendered
    /// error, which already points at the offending line.
    #[error("ERRO SINTÁTICO: {0}")]
    Syntax(String),

    /// A scoping, typing or arity rule was violated. The line is the
    /// 1-based source line of the offending construct.
    #[error("ERRO SEMÂNTICO (Linha {line}): {message}")]
    Semantic { line: usize, message: String },

    /// The generator reached a state the analyser should have ruled out.
    /// This is a compiler bug, not a user diagnostic.
    #[error("ERRO INTERNO: {0}")]
    Internal(String),

    #[error("{0}")]
    Io(#[from] std::io::Error),
}

impl CompilerError {
    pub fn semantic(line: usize, message: impl Into<String>) -> Self {
        CompilerError::Semantic {
            line,
            message: message.into(),
        }
    }
}
