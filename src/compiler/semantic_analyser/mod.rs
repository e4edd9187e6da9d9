pub mod goianinha_semantic_analyser;
pub(crate) mod function_tracker;

use super::ast::ASTNode;
use super::error::CompilerError;

/// SemanticAnalyser checks that an abstract syntax tree is well formed under
/// the language's declaration, scoping, type and arity rules, and produces
/// the annotated tree consumed by the backend.
pub trait SemanticAnalyser {
    /// Creates a default configuration of a SemanticAnalyser
    fn default() -> Self;

    /// Analyse a tree, returning the annotated tree or the first rule
    /// violation found.
    fn analyse(self, root: ASTNode) -> Result<ASTNode, CompilerError>;
}

// Concrete Definition Export
pub use self::goianinha_semantic_analyser::GoianinhaSemanticAnalyser;
