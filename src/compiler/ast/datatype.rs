use std::fmt;

/// Data types supported by the Goianinha AST model.
///
/// `VOID` is the declared return type of procedures and the type of
/// statement-valued constructs. `FLOAT` is carried for forward compatibility
/// with the symbol-table interface; no language construct produces it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(non_camel_case_types)]
pub enum DataType {
    INT,
    CHAR,
    FLOAT,
    VOID,
}

impl DataType {
    /// Convert a type keyword lexeme to a data type
    pub fn parse(keyword: &str) -> Option<DataType> {
        match keyword.trim() {
            "int" => Some(Self::INT),
            "car" => Some(Self::CHAR),
            _ => None,
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DataType::INT => "int",
            DataType::CHAR => "car",
            DataType::FLOAT => "float",
            DataType::VOID => "void",
        };
        write!(f, "{}", name)
    }
}
