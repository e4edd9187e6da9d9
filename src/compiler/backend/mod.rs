mod mips_code_generator;
mod assembly_builder;

use super::ast::ASTNode;
use super::error::CompilerError;

// Abstract Definitions

/// BackEndGenerator takes an analysed ASTNode tree and generates the target
/// assembly text.
pub trait BackEndGenerator {
    /// Generate default generator configuration
    fn default() -> Self;

    /// Generate assembly from an abstract syntax tree
    fn generate(self, root: &ASTNode) -> Result<MipsAssembly, CompilerError>;
}

// Concrete Definition Export
pub use self::assembly_builder::{MipsAssembly, MipsAssemblyBuilder};
pub use self::mips_code_generator::MipsCodeGenerator;
