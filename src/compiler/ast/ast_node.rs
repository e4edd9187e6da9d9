use super::datatype::DataType;
use super::literals::Literal;
use super::operators::{BinaryOperation, UnaryOperation};

/// ASTNode is the intermediate representation of a Goianinha program.
/// Each variant carries exactly the children its construct needs; repeated
/// constructs (declaration lists, statement lists, argument lists) are plain
/// vectors. Variants that can be named in a diagnostic carry the 1-based
/// source line they originate from.
#[derive(Debug, Clone, PartialEq)]
#[allow(non_camel_case_types)]
pub enum ASTNode {
    /// Root of every program: the global declaration list followed by the
    /// main block introduced by the `programa` keyword.
    ///
    /// # Example:
    ///     int x;
    ///     programa { x = 1; }
    PROGRAM {
        declarations: Vec<ASTNode>,
        main_body: Box<ASTNode>,
    },

    /// Variable declaration for one or more names sharing a type.
    /// The names are IDENTIFIER leaves.
    ///
    /// # Example:
    ///     int a, b, c;
    ///     ^^^^^^^^^^^^ -> Variable Declaration
    VAR_DECL {
        datatype: DataType,
        names: Vec<ASTNode>,
        line: usize,
    },

    /// Function declaration. Parameters are PARAMETER nodes in positional
    /// order and the body is a BLOCK.
    ///
    /// # Example:
    ///     int soma(int a, int b) { retorne a + b; }
    ///     ^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^ -> Function Declaration
    FUNC_DECL {
        return_type: DataType,
        name: String,
        parameters: Vec<ASTNode>,
        body: Box<ASTNode>,
        line: usize,
    },

    /// A single formal parameter of a function declaration.
    PARAMETER {
        datatype: DataType,
        name: String,
        line: usize,
    },

    /// Braced block: local declarations followed by statements. Blocks open
    /// a scope of their own unless they are a function body, which shares
    /// the function's scope during analysis.
    BLOCK {
        declarations: Vec<ASTNode>,
        statements: Vec<ASTNode>,
    },

    /// Assignment. Goianinha assignments are expressions: the value of the
    /// right-hand side stays available to an enclosing expression.
    ///
    /// # Example:
    ///     x = y + 1;
    ///     ^^^^^^^^^ -> Assignment
    ASSIGNMENT {
        identifier: Box<ASTNode>,
        expression: Box<ASTNode>,
        line: usize,
    },

    /// Conditional statement: `se (cond) entao stmt [senao stmt]`.
    BRANCH {
        condition: Box<ASTNode>,
        then_branch: Box<ASTNode>,
        else_branch: Box<Option<ASTNode>>,
        line: usize,
    },

    /// Loop statement: `enquanto (cond) execute stmt`.
    WHILE_LOOP {
        condition: Box<ASTNode>,
        body: Box<ASTNode>,
        line: usize,
    },

    /// Return statement: `retorne expr;`.
    RETURN {
        expression: Box<ASTNode>,
        line: usize,
    },

    /// Read statement: `leia id;` reads an integer into a variable.
    READ {
        identifier: Box<ASTNode>,
        line: usize,
    },

    /// Write statement: `escreva expr;` or `escreva "cadeia";`.
    WRITE {
        expression: Box<ASTNode>,
        line: usize,
    },

    /// Newline statement: `novalinha;`.
    NEWLINE,

    /// Empty statement: a bare `;`.
    EMPTY,

    /// Binary operation.
    ///
    /// # Example:
    ///     x = a + 2;
    ///           ^ -> Binary Operator
    BINARY_OP {
        op: BinaryOperation,
        lhs: Box<ASTNode>,
        rhs: Box<ASTNode>,
        line: usize,
    },

    /// Unary operation (`-` or `!`).
    UNARY_OP {
        op: UnaryOperation,
        expression: Box<ASTNode>,
        line: usize,
    },

    /// Use of a declared name in an expression or as an assignment target.
    IDENTIFIER {
        name: String,
        line: usize,
    },

    /// Function call expression.
    ///
    /// # Example:
    ///     escreva soma(1, 2);
    ///             ^^^^^^^^^^ -> Function Call
    FUNC_CALL {
        name: String,
        arguments: Vec<ASTNode>,
        line: usize,
    },

    /// Constant leaf (integer, character or string literal).
    LITERAL {
        value: Literal,
        line: usize,
    },

    /// Wrapper produced by the semantic analyser around every expression
    /// node, recording its inferred type. The generator accepts expression
    /// nodes with or without the wrapper.
    TYPED_NODE {
        datatype: DataType,
        inner: Box<ASTNode>,
    },
}

impl ASTNode {
    /// Utility function for simplifying extracting a name out of an
    /// identifier node, unwrapping a typed wrapper if present.
    pub fn identifier_name(&self) -> Option<&str> {
        match self {
            ASTNode::TYPED_NODE { inner, .. } => inner.identifier_name(),
            ASTNode::IDENTIFIER { name, .. } => Some(name),
            _ => None,
        }
    }

    /// Utility function for simplifying extracting the inferred type out of
    /// an analysed expression node.
    pub fn get_type(&self) -> DataType {
        match self {
            ASTNode::TYPED_NODE { datatype, .. } => *datatype,
            _ => panic!("Malformed AST! Node {:?} was meant to be a TYPED_NODE but wasn't!", self),
        }
    }

    /// Strip the typed wrapper, if any, exposing the underlying construct.
    pub fn unwrapped(&self) -> &ASTNode {
        match self {
            ASTNode::TYPED_NODE { inner, .. } => inner.unwrapped(),
            other => other,
        }
    }

    /// Source line of the node. Structural nodes without a line of their own
    /// report line 0; typed wrappers delegate to the wrapped node.
    pub fn line(&self) -> usize {
        match self {
            ASTNode::VAR_DECL { line, .. }
            | ASTNode::FUNC_DECL { line, .. }
            | ASTNode::PARAMETER { line, .. }
            | ASTNode::ASSIGNMENT { line, .. }
            | ASTNode::BRANCH { line, .. }
            | ASTNode::WHILE_LOOP { line, .. }
            | ASTNode::RETURN { line, .. }
            | ASTNode::READ { line, .. }
            | ASTNode::WRITE { line, .. }
            | ASTNode::BINARY_OP { line, .. }
            | ASTNode::UNARY_OP { line, .. }
            | ASTNode::IDENTIFIER { line, .. }
            | ASTNode::FUNC_CALL { line, .. }
            | ASTNode::LITERAL { line, .. } => *line,
            ASTNode::TYPED_NODE { inner, .. } => inner.line(),
            _ => 0,
        }
    }
}
