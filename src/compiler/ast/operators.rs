/// Unary Operations are symbolic functions with one argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(non_camel_case_types)]
pub enum UnaryOperation {
    NEGATE, // - <rhs>
    NOT,    // ! <rhs>
}

impl UnaryOperation {
    pub fn parse(op: &str) -> Option<UnaryOperation> {
        match op {
            "-" => Some(Self::NEGATE),
            "!" => Some(Self::NOT),
            _ => None,
        }
    }
}

/// Binary Operations are symbolic functions with two arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(non_camel_case_types)]
pub enum BinaryOperation {
    ADD,            // <lhs> + <rhs>
    SUB,            // <lhs> - <rhs>
    MUL,            // <lhs> * <rhs>
    DIV,            // <lhs> / <rhs>

    EQUAL,          // <lhs> == <rhs>
    NOT_EQUAL,      // <lhs> != <rhs>
    LESS_THAN,      // <lhs> <  <rhs>
    GREATER_THAN,   // <lhs> >  <rhs>
    LESS_EQUAL,     // <lhs> <= <rhs>
    GREATER_EQUAL,  // <lhs> >= <rhs>

    AND,            // <lhs> e  <rhs>
    OR,             // <lhs> ou <rhs>
}

impl BinaryOperation {
    pub fn parse(op: &str) -> Option<BinaryOperation> {
        match op {
            "+" => Some(Self::ADD),
            "-" => Some(Self::SUB),
            "*" => Some(Self::MUL),
            "/" => Some(Self::DIV),
            "==" => Some(Self::EQUAL),
            "!=" => Some(Self::NOT_EQUAL),
            "<" => Some(Self::LESS_THAN),
            ">" => Some(Self::GREATER_THAN),
            "<=" => Some(Self::LESS_EQUAL),
            ">=" => Some(Self::GREATER_EQUAL),
            "e" => Some(Self::AND),
            "ou" => Some(Self::OR),
            _ => None,
        }
    }

    /// Lexeme as written in source, used in diagnostics.
    pub fn lexeme(&self) -> &'static str {
        match self {
            Self::ADD => "+",
            Self::SUB => "-",
            Self::MUL => "*",
            Self::DIV => "/",
            Self::EQUAL => "==",
            Self::NOT_EQUAL => "!=",
            Self::LESS_THAN => "<",
            Self::GREATER_THAN => ">",
            Self::LESS_EQUAL => "<=",
            Self::GREATER_EQUAL => ">=",
            Self::AND => "e",
            Self::OR => "ou",
        }
    }

    pub fn is_arithmetic(&self) -> bool {
        matches!(self, Self::ADD | Self::SUB | Self::MUL | Self::DIV)
    }

    pub fn is_relational(&self) -> bool {
        matches!(
            self,
            Self::EQUAL
                | Self::NOT_EQUAL
                | Self::LESS_THAN
                | Self::GREATER_THAN
                | Self::LESS_EQUAL
                | Self::GREATER_EQUAL
        )
    }

    pub fn is_logical(&self) -> bool {
        matches!(self, Self::AND | Self::OR)
    }
}
