mod parser_test;
mod codegen_test;

use super::ast::ASTNode;
use super::backend::{BackEndGenerator, MipsCodeGenerator};
use super::error::CompilerError;
use super::parser::{AstParser, PestGoianinhaParser};
use super::semantic_analyser::{GoianinhaSemanticAnalyser, SemanticAnalyser};
use super::Compiler;

pub(crate) fn parse_source(source: &str) -> ASTNode {
    PestGoianinhaParser::default()
        .parse(source)
        .expect("source should parse")
}

pub(crate) fn analyse_source(source: &str) -> Result<ASTNode, CompilerError> {
    GoianinhaSemanticAnalyser::default().analyse(parse_source(source))
}

pub(crate) fn compile_source(source: &str) -> String {
    Compiler::<PestGoianinhaParser, GoianinhaSemanticAnalyser, MipsCodeGenerator>::default()
        .compile_str(source)
        .expect("source should compile")
        .to_string()
}
