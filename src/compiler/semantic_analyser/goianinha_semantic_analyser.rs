use super::function_tracker::{FunctionSignature, FunctionTracker};
use super::SemanticAnalyser;
use super::super::ast::symbol_table::{SymbolKind, SymbolTable};
use super::super::ast::{ASTNode, BinaryOperation, DataType, Literal, UnaryOperation};
use super::super::error::CompilerError;

/// GoianinhaSemanticAnalyser is a concrete SemanticAnalyser.
///
/// It walks the tree once, building a private symbol table as declarations
/// are encountered, and rebuilds every expression node inside a TYPED_NODE
/// wrapper carrying its inferred type. The walk stops at the first rule
/// violation.
///
/// # Implementation Details
///   + The global scope exists before the walk starts; PROGRAM does not
///     push a scope of its own.
///   + A function body block shares the function's scope: parameters and
///     body locals clash. The `within_function_body` flag suppresses the
///     block's own scope push for exactly one block.
///   + Frame offsets are stamped into symbols while declarations are
///     walked. The backend recomputes its own layout; the offsets here only
///     keep the symbol records complete.
pub struct GoianinhaSemanticAnalyser {
    symbol_table: SymbolTable,
    functions: FunctionTracker,
    frame_offset: i32,
    current_return_type: DataType,
    within_function_body: bool,
}

impl GoianinhaSemanticAnalyser {
    fn analyse_node(&mut self, node: &ASTNode) -> Result<ASTNode, CompilerError> {
        match node {
            ASTNode::PROGRAM { declarations, main_body } => {
                self.analyse_program(declarations, main_body)
            }
            ASTNode::VAR_DECL { datatype, names, line } => {
                self.analyse_var_decl(*datatype, names, *line)
            }
            ASTNode::FUNC_DECL { return_type, name, parameters, body, line } => {
                self.analyse_func_decl(*return_type, name, parameters, body, *line)
            }
            ASTNode::BLOCK { declarations, statements } => {
                self.analyse_block(declarations, statements)
            }
            ASTNode::ASSIGNMENT { identifier, expression, line } => {
                self.analyse_assignment(identifier, expression, *line)
            }
            ASTNode::BRANCH { condition, then_branch, else_branch, line } => {
                self.analyse_branch(condition, then_branch, else_branch, *line)
            }
            ASTNode::WHILE_LOOP { condition, body, line } => {
                self.analyse_while(condition, body, *line)
            }
            ASTNode::RETURN { expression, line } => self.analyse_return(expression, *line),
            ASTNode::READ { identifier, line } => self.analyse_read(identifier, *line),
            ASTNode::WRITE { expression, line } => self.analyse_write(expression, *line),
            ASTNode::NEWLINE => Ok(ASTNode::NEWLINE),
            ASTNode::EMPTY => Ok(ASTNode::EMPTY),
            ASTNode::BINARY_OP { op, lhs, rhs, line } => {
                self.analyse_binary_op(*op, lhs, rhs, *line)
            }
            ASTNode::UNARY_OP { op, expression, line } => {
                self.analyse_unary_op(*op, expression, *line)
            }
            ASTNode::IDENTIFIER { name, line } => self.analyse_identifier(name, *line),
            ASTNode::FUNC_CALL { name, arguments, line } => {
                self.analyse_function_call(name, arguments, *line)
            }
            ASTNode::LITERAL { value, line } => self.analyse_literal(value, *line),
            ASTNode::PARAMETER { .. } => {
                panic!("Malformed AST! Parameters are analysed by their function declaration.")
            }
            ASTNode::TYPED_NODE { .. } => {
                panic!("Malformed AST! Typed nodes shouldn't be in the input tree yet!")
            }
        }
    }

    fn analyse_program(
        &mut self,
        declarations: &[ASTNode],
        main_body: &ASTNode,
    ) -> Result<ASTNode, CompilerError> {
        let mut analysed_declarations = Vec::with_capacity(declarations.len());
        for declaration in declarations {
            analysed_declarations.push(self.analyse_node(declaration)?);
        }
        let main_body = self.analyse_node(main_body)?;

        Ok(ASTNode::PROGRAM {
            declarations: analysed_declarations,
            main_body: Box::new(main_body),
        })
    }

    fn analyse_var_decl(
        &mut self,
        datatype: DataType,
        names: &[ASTNode],
        line: usize,
    ) -> Result<ASTNode, CompilerError> {
        for name_node in names {
            let name = name_node
                .identifier_name()
                .expect("Malformed AST! Declared names must be identifiers");
            self.frame_offset -= 4;
            if !self.symbol_table.insert_variable(name, datatype, self.frame_offset) {
                return Err(CompilerError::semantic(
                    name_node.line(),
                    format!("identificador '{}' já declarado neste escopo", name),
                ));
            }
        }

        Ok(ASTNode::VAR_DECL {
            datatype,
            names: names.to_vec(),
            line,
        })
    }

    fn analyse_func_decl(
        &mut self,
        return_type: DataType,
        name: &str,
        parameters: &[ASTNode],
        body: &ASTNode,
        line: usize,
    ) -> Result<ASTNode, CompilerError> {
        // The function name lands in the enclosing (global) scope.
        if !self.symbol_table.insert_function(name, parameters.len(), return_type) {
            return Err(CompilerError::semantic(
                line,
                format!("identificador '{}' já declarado neste escopo", name),
            ));
        }

        let parameter_types: Vec<DataType> = parameters
            .iter()
            .map(|parameter| match parameter {
                ASTNode::PARAMETER { datatype, .. } => *datatype,
                _ => panic!("Malformed AST! Function parameters must be PARAMETER nodes"),
            })
            .collect();
        self.functions
            .register(name, FunctionSignature::new(parameter_types, return_type));

        // Parameters and body locals share one scope.
        self.symbol_table.enter_scope();
        let saved_offset = self.frame_offset;
        self.frame_offset = 0;

        for parameter in parameters {
            if let ASTNode::PARAMETER { datatype, name, line } = parameter {
                self.frame_offset -= 4;
                if !self.symbol_table.insert_parameter(name, *datatype, self.frame_offset) {
                    return Err(CompilerError::semantic(
                        *line,
                        format!("parâmetro '{}' já declarado", name),
                    ));
                }
            }
        }

        let previous_return_type = self.current_return_type;
        self.current_return_type = return_type;
        self.within_function_body = true;
        let body = self.analyse_node(body);
        self.within_function_body = false;
        self.current_return_type = previous_return_type;

        self.symbol_table.exit_scope();
        self.frame_offset = saved_offset;

        Ok(ASTNode::FUNC_DECL {
            return_type,
            name: name.to_string(),
            parameters: parameters.to_vec(),
            body: Box::new(body?),
            line,
        })
    }

    fn analyse_block(
        &mut self,
        declarations: &[ASTNode],
        statements: &[ASTNode],
    ) -> Result<ASTNode, CompilerError> {
        // A function body runs in the scope its declaration already opened.
        let opens_scope = !self.within_function_body;
        self.within_function_body = false;

        let saved_offset = self.frame_offset;
        if opens_scope {
            self.symbol_table.enter_scope();
            self.frame_offset = 0;
        }

        let result = self.analyse_block_items(declarations, statements);

        if opens_scope {
            self.symbol_table.exit_scope();
        }
        self.frame_offset = saved_offset;

        result
    }

    fn analyse_block_items(
        &mut self,
        declarations: &[ASTNode],
        statements: &[ASTNode],
    ) -> Result<ASTNode, CompilerError> {
        let mut analysed_declarations = Vec::with_capacity(declarations.len());
        for declaration in declarations {
            analysed_declarations.push(self.analyse_node(declaration)?);
        }
        let mut analysed_statements = Vec::with_capacity(statements.len());
        for statement in statements {
            analysed_statements.push(self.analyse_node(statement)?);
        }

        Ok(ASTNode::BLOCK {
            declarations: analysed_declarations,
            statements: analysed_statements,
        })
    }

    fn analyse_assignment(
        &mut self,
        identifier: &ASTNode,
        expression: &ASTNode,
        line: usize,
    ) -> Result<ASTNode, CompilerError> {
        let identifier = self.analyse_node(identifier)?;
        let expression = self.analyse_node(expression)?;
        let target_type = identifier.get_type();
        let value_type = expression.get_type();

        if target_type != value_type {
            return Err(CompilerError::semantic(
                line,
                format!(
                    "atribuição com tipos incompatíveis ({} recebe {})",
                    target_type, value_type
                ),
            ));
        }

        // Assignments are expressions; their value is the target's.
        Ok(ASTNode::TYPED_NODE {
            datatype: target_type,
            inner: Box::new(ASTNode::ASSIGNMENT {
                identifier: Box::new(identifier),
                expression: Box::new(expression),
                line,
            }),
        })
    }

    fn analyse_branch(
        &mut self,
        condition: &ASTNode,
        then_branch: &ASTNode,
        else_branch: &Option<ASTNode>,
        line: usize,
    ) -> Result<ASTNode, CompilerError> {
        let condition = self.analyse_condition(condition, line)?;
        let then_branch = self.analyse_node(then_branch)?;
        let else_branch = match else_branch {
            Some(branch) => Some(self.analyse_node(branch)?),
            None => None,
        };

        Ok(ASTNode::BRANCH {
            condition: Box::new(condition),
            then_branch: Box::new(then_branch),
            else_branch: Box::new(else_branch),
            line,
        })
    }

    fn analyse_while(
        &mut self,
        condition: &ASTNode,
        body: &ASTNode,
        line: usize,
    ) -> Result<ASTNode, CompilerError> {
        let condition = self.analyse_condition(condition, line)?;
        let body = self.analyse_node(body)?;

        Ok(ASTNode::WHILE_LOOP {
            condition: Box::new(condition),
            body: Box::new(body),
            line,
        })
    }

    fn analyse_condition(
        &mut self,
        condition: &ASTNode,
        line: usize,
    ) -> Result<ASTNode, CompilerError> {
        let condition = self.analyse_node(condition)?;
        if condition.get_type() != DataType::INT {
            return Err(CompilerError::semantic(
                line,
                format!("condição deve ser int (encontrado {})", condition.get_type()),
            ));
        }
        Ok(condition)
    }

    fn analyse_return(
        &mut self,
        expression: &ASTNode,
        line: usize,
    ) -> Result<ASTNode, CompilerError> {
        let expression = self.analyse_node(expression)?;
        if expression.get_type() != self.current_return_type {
            return Err(CompilerError::semantic(
                line,
                format!(
                    "retorne com tipo {} em função que retorna {}",
                    expression.get_type(),
                    self.current_return_type
                ),
            ));
        }

        Ok(ASTNode::RETURN {
            expression: Box::new(expression),
            line,
        })
    }

    fn analyse_read(
        &mut self,
        identifier: &ASTNode,
        line: usize,
    ) -> Result<ASTNode, CompilerError> {
        let identifier = self.analyse_node(identifier)?;

        Ok(ASTNode::READ {
            identifier: Box::new(identifier),
            line,
        })
    }

    fn analyse_write(
        &mut self,
        expression: &ASTNode,
        line: usize,
    ) -> Result<ASTNode, CompilerError> {
        let expression = self.analyse_node(expression)?;

        Ok(ASTNode::WRITE {
            expression: Box::new(expression),
            line,
        })
    }

    fn analyse_binary_op(
        &mut self,
        op: BinaryOperation,
        lhs: &ASTNode,
        rhs: &ASTNode,
        line: usize,
    ) -> Result<ASTNode, CompilerError> {
        let lhs = self.analyse_node(lhs)?;
        let rhs = self.analyse_node(rhs)?;
        let lhs_type = lhs.get_type();
        let rhs_type = rhs.get_type();

        if op.is_relational() {
            // Relational operators accept any shared non-void operand type.
            if lhs_type != rhs_type || lhs_type == DataType::VOID {
                return Err(CompilerError::semantic(
                    line,
                    format!(
                        "operandos de '{}' com tipos incompatíveis ({} e {})",
                        op.lexeme(),
                        lhs_type,
                        rhs_type
                    ),
                ));
            }
        } else if lhs_type != DataType::INT || rhs_type != DataType::INT {
            // Arithmetic and logical operators work on int only.
            return Err(CompilerError::semantic(
                line,
                format!(
                    "operandos de '{}' devem ser int ({} e {})",
                    op.lexeme(),
                    lhs_type,
                    rhs_type
                ),
            ));
        }

        Ok(ASTNode::TYPED_NODE {
            datatype: DataType::INT,
            inner: Box::new(ASTNode::BINARY_OP {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
                line,
            }),
        })
    }

    fn analyse_unary_op(
        &mut self,
        op: UnaryOperation,
        expression: &ASTNode,
        line: usize,
    ) -> Result<ASTNode, CompilerError> {
        let expression = self.analyse_node(expression)?;
        if expression.get_type() != DataType::INT {
            let lexeme = match op {
                UnaryOperation::NEGATE => "-",
                UnaryOperation::NOT => "!",
            };
            return Err(CompilerError::semantic(
                line,
                format!(
                    "operando de '{}' deve ser int (encontrado {})",
                    lexeme,
                    expression.get_type()
                ),
            ));
        }

        Ok(ASTNode::TYPED_NODE {
            datatype: DataType::INT,
            inner: Box::new(ASTNode::UNARY_OP {
                op,
                expression: Box::new(expression),
                line,
            }),
        })
    }

    fn analyse_identifier(&mut self, name: &str, line: usize) -> Result<ASTNode, CompilerError> {
        let symbol = self.symbol_table.lookup(name).ok_or_else(|| {
            CompilerError::semantic(line, format!("identificador '{}' não declarado", name))
        })?;

        if symbol.kind() == SymbolKind::FUNCTION {
            return Err(CompilerError::semantic(
                line,
                format!("'{}' é uma função e não pode ser usada como variável", name),
            ));
        }

        Ok(ASTNode::TYPED_NODE {
            datatype: symbol.datatype(),
            inner: Box::new(ASTNode::IDENTIFIER {
                name: name.to_string(),
                line,
            }),
        })
    }

    fn analyse_function_call(
        &mut self,
        name: &str,
        arguments: &[ASTNode],
        line: usize,
    ) -> Result<ASTNode, CompilerError> {
        let mut analysed_arguments = Vec::with_capacity(arguments.len());
        for argument in arguments {
            analysed_arguments.push(self.analyse_node(argument)?);
        }

        let signature = self.functions.find(name).ok_or_else(|| {
            CompilerError::semantic(line, format!("função '{}' não declarada", name))
        })?;

        if signature.parameter_types().len() != analysed_arguments.len() {
            return Err(CompilerError::semantic(
                line,
                format!(
                    "função '{}' espera {} argumento(s), recebeu {}",
                    name,
                    signature.parameter_types().len(),
                    analysed_arguments.len()
                ),
            ));
        }

        for (position, (argument, formal_type)) in analysed_arguments
            .iter()
            .zip(signature.parameter_types().iter())
            .enumerate()
        {
            if argument.get_type() != *formal_type {
                return Err(CompilerError::semantic(
                    line,
                    format!(
                        "argumento {} de '{}' deve ser {} (encontrado {})",
                        position + 1,
                        name,
                        formal_type,
                        argument.get_type()
                    ),
                ));
            }
        }

        Ok(ASTNode::TYPED_NODE {
            datatype: signature.return_type(),
            inner: Box::new(ASTNode::FUNC_CALL {
                name: name.to_string(),
                arguments: analysed_arguments,
                line,
            }),
        })
    }

    fn analyse_literal(&mut self, value: &Literal, line: usize) -> Result<ASTNode, CompilerError> {
        let datatype = match value {
            Literal::INT(_) => DataType::INT,
            // String constants are only valid as escreva arguments and are
            // typed as char like the characters they hold.
            Literal::CHAR(_) | Literal::STRING(_) => DataType::CHAR,
        };

        Ok(ASTNode::TYPED_NODE {
            datatype,
            inner: Box::new(ASTNode::LITERAL {
                value: value.clone(),
                line,
            }),
        })
    }
}

/// SemanticAnalyser Trait Concrete Implementation
impl SemanticAnalyser for GoianinhaSemanticAnalyser {
    fn default() -> Self {
        Self {
            symbol_table: SymbolTable::new(),
            functions: FunctionTracker::new(),
            frame_offset: 0,
            current_return_type: DataType::VOID,
            within_function_body: false,
        }
    }

    fn analyse(mut self, root: ASTNode) -> Result<ASTNode, CompilerError> {
        self.analyse_node(&root)
    }
}
