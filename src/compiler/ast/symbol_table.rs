use std::collections::HashMap;

use super::datatype::DataType;

/// Kinds of entities an identifier can be bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(non_camel_case_types)]
pub enum SymbolKind {
    VARIABLE,
    FUNCTION,
    PARAMETER,
}

/// A Symbol defines the data associated with a declared identifier.
/// Symbols are immutable once inserted into a table.
#[derive(Debug, Clone)]
pub struct Symbol {
    name: String,
    kind: SymbolKind,
    datatype: DataType,

    /// Frame offset from $fp for variables and parameters, 0 for functions.
    /// Negative offsets are callee-frame slots, positive offsets address
    /// stack-passed parameters above the saved frame pointer.
    position: i32,

    /// Declared parameter count, functions only.
    num_params: usize,

    /// Scope-stack depth at the moment of insertion. The generator computes
    /// static-link hops as the difference between the active depth and this.
    declaration_depth: usize,
}

impl Symbol {
    pub fn new(name: &str, kind: SymbolKind, datatype: DataType, position: i32, num_params: usize) -> Self {
        Symbol {
            name: name.to_string(),
            kind,
            datatype,
            position,
            num_params,
            declaration_depth: 0,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> SymbolKind {
        self.kind
    }

    pub fn datatype(&self) -> DataType {
        self.datatype
    }

    pub fn position(&self) -> i32 {
        self.position
    }

    pub fn num_params(&self) -> usize {
        self.num_params
    }

    pub fn declaration_depth(&self) -> usize {
        self.declaration_depth
    }
}

/// SymbolTable keeps the bindings visible at the current point of an AST
/// walk as a stack of per-scope maps. Depth 1 is the outermost scope and is
/// present from construction. Lookups search from the innermost scope
/// outward, so an inner declaration shadows an outer one with the same name.
///
/// Each pass of the compiler owns a private table; nothing is shared between
/// the semantic analyser and the code generator.
#[derive(Debug)]
pub struct SymbolTable {
    scopes: Vec<HashMap<String, Symbol>>,
}

impl SymbolTable {
    /// Create a table holding only the outermost scope.
    pub fn new() -> Self {
        SymbolTable {
            scopes: vec![HashMap::new()],
        }
    }

    pub fn enter_scope(&mut self) {
        self.scopes.push(HashMap::new());
    }

    /// Pop the innermost scope. Exiting with no scope open is a no-op.
    pub fn exit_scope(&mut self) {
        self.scopes.pop();
    }

    pub fn scope_count(&self) -> usize {
        self.scopes.len()
    }

    /// Place a symbol into the innermost scope.
    /// @return: true on success, false if the name is already bound in the
    /// innermost scope (the table is left unchanged).
    pub fn insert(&mut self, symbol: Symbol) -> bool {
        if self.scopes.is_empty() {
            self.enter_scope();
        }
        let depth = self.scopes.len();
        let scope = self.scopes.last_mut().unwrap();
        if scope.contains_key(&symbol.name) {
            return false;
        }

        let mut symbol = symbol;
        symbol.declaration_depth = depth;
        scope.insert(symbol.name.clone(), symbol);
        true
    }

    pub fn insert_variable(&mut self, name: &str, datatype: DataType, position: i32) -> bool {
        self.insert(Symbol::new(name, SymbolKind::VARIABLE, datatype, position, 0))
    }

    pub fn insert_parameter(&mut self, name: &str, datatype: DataType, position: i32) -> bool {
        self.insert(Symbol::new(name, SymbolKind::PARAMETER, datatype, position, 0))
    }

    pub fn insert_function(&mut self, name: &str, num_params: usize, return_type: DataType) -> bool {
        self.insert(Symbol::new(name, SymbolKind::FUNCTION, return_type, 0, num_params))
    }

    /// Search every open scope from the innermost outward.
    pub fn lookup(&self, name: &str) -> Option<&Symbol> {
        for scope in self.scopes.iter().rev() {
            if let Some(symbol) = scope.get(name) {
                return Some(symbol);
            }
        }
        None
    }

    /// Search only the innermost scope.
    pub fn lookup_current_scope(&self, name: &str) -> Option<&Symbol> {
        self.scopes.last().and_then(|scope| scope.get(name))
    }
}
