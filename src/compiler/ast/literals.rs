/// Literals are defined constants within a program. See ASTNode for more
/// detail on their usage. They are divided by their representation in text.
#[derive(Debug, Clone, PartialEq)]
#[allow(non_camel_case_types)]
pub enum Literal {
    /// Form: %d
    INT(i64),

    /// Form: '%c'
    /// The parser strips the quotes; escape sequences are not part of the
    /// language.
    CHAR(char),

    /// Form: "%s"
    /// Stored with the surrounding quotes exactly as lexed. The generator
    /// writes the lexeme verbatim after an .asciiz directive.
    STRING(String),
}
