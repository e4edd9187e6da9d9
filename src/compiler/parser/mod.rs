pub mod goianinha_pest_parser;

use super::ast::ASTNode;
use super::error::CompilerError;

/// Parser handles interpretation of source text into the intermediate
/// representation. Put another way the parser turns a source string into an
/// abstract syntax tree.
pub trait AstParser {
    /// Creates a default configuration of an AstParser
    fn default() -> Self;

    /// Parse a source string into an abstract syntax tree
    fn parse(self, source: &str) -> Result<ASTNode, CompilerError>;
}

// Concrete Definition Export
pub use self::goianinha_pest_parser::PestGoianinhaParser;
