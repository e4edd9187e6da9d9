pub mod ast;
pub mod backend;
pub mod error;
pub mod parser;
pub mod semantic_analyser;

#[cfg(test)]
mod test;

use std::fs;
use std::path::Path;

// Interface Definitions
use self::backend::BackEndGenerator;
use self::parser::AstParser;
use self::semantic_analyser::SemanticAnalyser;

// Concrete Definitions Re-Export
pub use self::backend::{MipsAssembly, MipsCodeGenerator};
pub use self::error::CompilerError;
pub use self::parser::PestGoianinhaParser;
pub use self::semantic_analyser::GoianinhaSemanticAnalyser;

/// Compiler is a simple class that holds the configuration of a compilation
/// configuration. Compiler takes three typed parameters defining:
///  the AstParser being used,
///  the SemanticAnalyser being used,
///  and the BackEndGenerator being used.
///
/// # Compilation Diagram
/// goianinha_code -> AstParser -> ASTNode -> SemanticAnalyser -> annotated ASTNode -> BackEndGenerator -> MipsAssembly
pub struct Compiler<P: AstParser, A: SemanticAnalyser, G: BackEndGenerator> {
    parser: P,
    semantic_analyser: A,
    generator: G,
}

#[allow(dead_code)] // Many of the functions on compiler act as a library interface and are not used
impl<P: AstParser, A: SemanticAnalyser, G: BackEndGenerator> Compiler<P, A, G> {
    /// Default generates a default compiler configuration. Default
    /// configuration is determined by the default methods of the parser,
    /// analyser and generator.
    pub fn default() -> Self {
        Compiler {
            parser: P::default(),
            semantic_analyser: A::default(),
            generator: G::default(),
        }
    }

    /// Create new compiler using a preconfigured parser, analyser and
    /// generator.
    pub fn new(parser: P, semantic_analyser: A, generator: G) -> Self {
        Compiler {
            parser,
            semantic_analyser,
            generator,
        }
    }

    /// Compiles a Goianinha source string into MIPS assembly.
    pub fn compile_str(self, source: &str) -> Result<MipsAssembly, CompilerError> {
        let ast = self.parser.parse(source)?;
        let annotated_ast = self.semantic_analyser.analyse(ast)?;
        let assembly = self.generator.generate(&annotated_ast)?;

        Ok(assembly)
    }

    /// Compiles a Goianinha source file into MIPS assembly.
    /// @return: MipsAssembly if Ok. Otherwise the IO error from a failed
    /// read or the first compilation error.
    pub fn compile(self, source_filename: &Path) -> Result<MipsAssembly, CompilerError> {
        let source_str = fs::read_to_string(source_filename)?;

        self.compile_str(source_str.as_str())
    }

    /// Compiles a source file and writes the generated assembly into the
    /// destination file path. Nothing is written unless the whole pipeline
    /// succeeds.
    pub fn compile_and_save(
        self,
        source_filename: &Path,
        dest_filename: &Path,
    ) -> Result<(), CompilerError> {
        let assembly = self.compile(source_filename)?;
        fs::write(dest_filename, assembly.to_string())?;

        Ok(())
    }
}
