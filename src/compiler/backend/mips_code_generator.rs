use super::assembly_builder::{MipsAssembly, MipsAssemblyBuilder};
use super::BackEndGenerator;
use super::super::ast::symbol_table::SymbolTable;
use super::super::ast::{ASTNode, BinaryOperation, DataType, Literal, UnaryOperation};
use super::super::error::CompilerError;

/// MipsCodeGenerator is a Backend for Goianinha.
/// It generates MARS/SPIM compatible MIPS32 assembly from an analysed
/// abstract syntax tree.
///
/// # Implementation Details
///   + Registers: $t0 holds the value of the expression just generated,
///     $t1 stages the left operand of binary operations and the base
///     pointer while addressing variables, $v0 carries return values.
///   + The first four call arguments travel in $a0..$a3; arguments five and
///     beyond are pushed onto the stack as they are evaluated and addressed
///     by the callee at +8($fp), +12($fp), ...
///   + The saved-$fp chain doubles as a static link: a variable declared
///     `d` scopes outside the active one is reached with `d` hops of
///     `lw $t1, 0($t1)` starting from $fp.
///   + Global variable declarations are deferred and materialised as the
///     first locals of main's frame, so no .data storage is needed for
///     them.
///
/// # Stack Frame Structure
/// (high addresses at the top)
///         STACK-PASSED PARAMETER N        +8 + 4(N-5)($fp)
///         ...
///         STACK-PASSED PARAMETER 5        +8($fp)
///         SAVED $ra                       +4($fp)
/// FP ->   SAVED CALLER $fp                 0($fp)
///         LOCAL VAR 0                     -4($fp)
///         LOCAL VAR 1                     -8($fp)
///         ...
/// SP ->   (next free slot)
///
/// Block scopes nest the same way minus the saved $ra: every block saves
/// the enclosing $fp and becomes a frame of its own.
pub struct MipsCodeGenerator {
    builder: MipsAssemblyBuilder,
    symbol_table: SymbolTable,

    /// Global declarations seen before main, replayed inside main's block.
    pending_globals: Vec<ASTNode>,

    /// Offset of the next local slot relative to the active frame.
    var_offset: i32,

    in_global_scope: bool,
    within_function: usize,

    /// Blocks opened since the enclosing function's own frame; a `retorne`
    /// unwinds one saved $fp per open block before the function epilogue.
    open_blocks: usize,
}

impl BackEndGenerator for MipsCodeGenerator {
    /// Creates a default configuration of MipsCodeGenerator
    fn default() -> Self {
        Self {
            builder: MipsAssemblyBuilder::new(),
            symbol_table: SymbolTable::new(),
            pending_globals: Vec::new(),
            var_offset: 0,
            in_global_scope: true,
            within_function: 0,
            open_blocks: 0,
        }
    }

    /// Generates assembly from an analysed abstract syntax tree
    fn generate(mut self, root: &ASTNode) -> Result<MipsAssembly, CompilerError> {
        self.generate_node(root)?;
        Ok(self.builder.finalize())
    }
}

impl MipsCodeGenerator {
    fn generate_node(&mut self, node: &ASTNode) -> Result<(), CompilerError> {
        // Variable declarations at the global scope are not emitted where
        // they appear: their storage lives in main's frame.
        if let ASTNode::VAR_DECL { .. } = node {
            if self.in_global_scope && self.within_function == 0 {
                self.pending_globals.push(node.clone());
                return Ok(());
            }
        }

        match node {
            ASTNode::PROGRAM { declarations, main_body } => {
                self.generate_program(declarations, main_body)
            }
            ASTNode::VAR_DECL { datatype, names, .. } => {
                self.generate_var_decl(*datatype, names)
            }
            ASTNode::FUNC_DECL { name, parameters, body, .. } => {
                self.generate_function_definition(name, parameters, body)
            }
            ASTNode::BLOCK { declarations, statements } => {
                self.generate_block(declarations, statements)
            }
            ASTNode::BRANCH { condition, then_branch, else_branch, .. } => {
                self.generate_branch_statement(condition, then_branch, else_branch)
            }
            ASTNode::WHILE_LOOP { condition, body, .. } => {
                self.generate_while_statement(condition, body)
            }
            ASTNode::RETURN { expression, .. } => self.generate_return_statement(expression),
            ASTNode::READ { identifier, .. } => self.generate_read_statement(identifier),
            ASTNode::WRITE { expression, .. } => self.generate_write_statement(expression),
            ASTNode::NEWLINE => self.generate_newline_statement(),
            ASTNode::EMPTY => Ok(()),
            ASTNode::TYPED_NODE { .. }
            | ASTNode::ASSIGNMENT { .. }
            | ASTNode::FUNC_CALL { .. }
            | ASTNode::BINARY_OP { .. }
            | ASTNode::UNARY_OP { .. }
            | ASTNode::IDENTIFIER { .. }
            | ASTNode::LITERAL { .. } => self.generate_expression(node),
            ASTNode::PARAMETER { .. } => {
                panic!("Malformed AST! Parameters are generated by their function definition.")
            }
        }
    }

    fn generate_program(
        &mut self,
        declarations: &[ASTNode],
        main_body: &ASTNode,
    ) -> Result<(), CompilerError> {
        // Functions are emitted first; global variables are deferred.
        for declaration in declarations {
            self.generate_node(declaration)?;
        }

        self.builder.emit_directive(".globl main");
        self.builder.emit_label("main");

        self.builder.comment("MAIN PROLOGUE");
        self.builder.emit("addi $sp, $sp, -4");
        self.builder.emit("sw $ra, 4($sp)");
        self.builder.emit("sw $fp, 0($sp)");
        self.builder.emit("move $fp, $sp");
        self.builder.emit("addi $sp, $sp, -4");

        self.in_global_scope = false;
        self.generate_node(main_body)?;

        self.builder.comment("MAIN EPILOGUE");
        self.builder.emit("lw $ra, 4($fp)");
        self.builder.emit("lw $fp, 0($fp)");
        self.builder.emit("addi $sp, $sp, 4");
        self.builder.emit("li $v0, 10");
        self.builder.emit("syscall");
        Ok(())
    }

    fn generate_block(
        &mut self,
        declarations: &[ASTNode],
        statements: &[ASTNode],
    ) -> Result<(), CompilerError> {
        self.open_blocks += 1;

        // Every block is a frame of its own: the saved $fp doubles as the
        // static link for the scope the block opens.
        self.builder.emit("sw $fp, 0($sp)");
        self.builder.emit("move $fp, $sp");
        self.builder.emit("addi $sp, $sp, -4");

        self.symbol_table.enter_scope();
        let saved_offset = self.var_offset;
        self.var_offset = 0;

        // The first block generated after leaving the global scope is
        // main's body; the deferred globals become its first locals.
        if !self.pending_globals.is_empty() && !self.in_global_scope {
            let globals = std::mem::take(&mut self.pending_globals);
            for declaration in &globals {
                self.generate_node(declaration)?;
            }
        }

        for declaration in declarations {
            self.generate_node(declaration)?;
        }
        for statement in statements {
            self.generate_node(statement)?;
        }

        self.builder.emit("move $sp, $fp");
        self.builder.emit("lw $fp, 0($sp)");

        self.symbol_table.exit_scope();
        self.var_offset = saved_offset;
        self.open_blocks -= 1;
        Ok(())
    }

    fn generate_var_decl(
        &mut self,
        datatype: DataType,
        names: &[ASTNode],
    ) -> Result<(), CompilerError> {
        for name_node in names {
            let name = name_node
                .identifier_name()
                .expect("Malformed AST! Declared names must be identifiers");
            self.var_offset -= 4;
            self.builder.emit("addi $sp, $sp, -4");
            self.symbol_table.insert_variable(name, datatype, self.var_offset);
        }
        Ok(())
    }

    fn generate_function_definition(
        &mut self,
        name: &str,
        parameters: &[ASTNode],
        body: &ASTNode,
    ) -> Result<(), CompilerError> {
        self.open_blocks = 0;
        self.within_function += 1;

        self.builder.comment(&format!("FN {} START", name));
        self.builder.emit_directive(&format!(".globl {}", name));
        self.builder.emit_label(name);

        self.builder.emit("addi $sp, $sp, -4");
        self.builder.emit("sw $ra, 4($sp)");
        self.builder.emit("sw $fp, 0($sp)");
        self.builder.emit("move $fp, $sp");
        self.builder.emit("addi $sp, $sp, -4");

        self.symbol_table.enter_scope();
        let saved_offset = self.var_offset;
        self.var_offset = 0;

        for (index, parameter) in parameters.iter().enumerate() {
            let (datatype, parameter_name) = match parameter {
                ASTNode::PARAMETER { datatype, name, .. } => (*datatype, name.as_str()),
                _ => panic!("Malformed AST! Function parameters must be PARAMETER nodes"),
            };

            if index < 4 {
                // Register arguments get a slot in the callee frame.
                self.var_offset -= 4;
                self.symbol_table.insert_parameter(parameter_name, datatype, self.var_offset);
                self.builder.emit(&format!("sw $a{}, 0($sp)", index));
                self.builder.emit("addi $sp, $sp, -4");
            } else {
                // The caller left the remaining arguments above the saved
                // $fp and $ra; they are addressed, never copied.
                let stack_offset = 8 + 4 * (index as i32 - 4);
                self.symbol_table.insert_parameter(parameter_name, datatype, stack_offset);
            }
        }

        self.generate_node(body)?;

        self.symbol_table.exit_scope();
        self.var_offset = saved_offset;
        self.within_function -= 1;
        self.builder.comment(&format!("FN {} END", name));
        Ok(())
    }

    fn generate_branch_statement(
        &mut self,
        condition: &ASTNode,
        then_branch: &ASTNode,
        else_branch: &Option<ASTNode>,
    ) -> Result<(), CompilerError> {
        match else_branch {
            Some(else_node) => {
                let label_else = self.builder.create_label();
                let label_end = self.builder.create_label();

                self.builder.comment("IF CONDITION");
                self.generate_expression(condition)?;
                self.builder.emit(&format!("beq $t0, $zero, {}", label_else));

                self.builder.comment("IF BRANCH");
                self.generate_node(then_branch)?;
                self.builder.emit(&format!("j {}", label_end));

                self.builder.comment("ELSE BRANCH");
                self.builder.emit_label(&label_else);
                self.generate_node(else_node)?;
                self.builder.emit_label(&label_end);
            }
            None => {
                let label_end = self.builder.create_label();

                self.builder.comment("IF CONDITION");
                self.generate_expression(condition)?;
                self.builder.emit(&format!("beq $t0, $zero, {}", label_end));

                self.builder.comment("IF BRANCH");
                self.generate_node(then_branch)?;
                self.builder.emit_label(&label_end);
            }
        }
        Ok(())
    }

    fn generate_while_statement(
        &mut self,
        condition: &ASTNode,
        body: &ASTNode,
    ) -> Result<(), CompilerError> {
        let label_start = self.builder.create_label();
        let label_end = self.builder.create_label();

        self.builder.comment("WHILE CONDITION");
        self.builder.emit_label(&label_start);
        self.generate_expression(condition)?;
        self.builder.emit(&format!("beq $t0, $zero, {}", label_end));

        self.builder.comment("WHILE BODY");
        self.generate_node(body)?;
        self.builder.emit(&format!("j {}", label_start));
        self.builder.emit_label(&label_end);
        Ok(())
    }

    fn generate_return_statement(&mut self, expression: &ASTNode) -> Result<(), CompilerError> {
        self.generate_expression(expression)?;

        self.builder.comment("RETURN");
        self.builder.emit("move $v0, $t0");

        // Unwind any block frames opened above the function frame before
        // the epilogue reads $ra and the caller's $fp.
        for _ in 0..self.open_blocks {
            self.builder.emit("lw $fp, 0($fp)");
        }
        self.builder.emit("move $sp, $fp");
        self.builder.emit("lw $ra, 4($sp)");
        self.builder.emit("lw $fp, 0($sp)");
        self.builder.emit("addi $sp, $sp, 4");
        self.builder.emit("jr $ra");
        Ok(())
    }

    fn generate_read_statement(&mut self, identifier: &ASTNode) -> Result<(), CompilerError> {
        self.builder.comment("READ");
        self.builder.emit("li $v0, 5");
        self.builder.emit("syscall");

        let offset = self.load_variable_address(identifier)?;
        self.builder.emit(&format!("sw $v0, {}($t1)", offset));
        Ok(())
    }

    fn generate_write_statement(&mut self, expression: &ASTNode) -> Result<(), CompilerError> {
        if let ASTNode::LITERAL { value: Literal::STRING(lexeme), .. } = expression.unwrapped() {
            // The lexeme still carries its quotes; .asciiz takes it as is.
            let label = self.builder.create_label();
            self.builder.data(&format!("{}: .asciiz {}", label, lexeme));

            self.builder.comment("WRITE STRING");
            self.builder.emit("li $v0, 4");
            self.builder.emit(&format!("la $a0, {}", label));
            self.builder.emit("syscall");
            return Ok(());
        }

        self.builder.comment("WRITE VALUE");
        self.generate_expression(expression)?;

        // Variables of type car print as characters, everything else as
        // integers.
        let mut output_syscall = 1;
        if let ASTNode::IDENTIFIER { name, .. } = expression.unwrapped() {
            let symbol = self.symbol_table.lookup(name).ok_or_else(|| {
                CompilerError::Internal(format!(
                    "variável '{}' ausente da tabela de símbolos do gerador",
                    name
                ))
            })?;
            if symbol.datatype() == DataType::CHAR {
                output_syscall = 11;
            }
        }

        self.builder.emit(&format!("li $v0, {}", output_syscall));
        self.builder.emit("move $a0, $t0");
        self.builder.emit("syscall");
        Ok(())
    }

    fn generate_newline_statement(&mut self) -> Result<(), CompilerError> {
        self.builder.comment("NEWLINE");
        self.builder.emit("li $v0, 4");
        self.builder.emit("la $a0, __newline");
        self.builder.emit("syscall");
        Ok(())
    }

    fn generate_expression(&mut self, node: &ASTNode) -> Result<(), CompilerError> {
        match node {
            ASTNode::TYPED_NODE { inner, .. } => self.generate_expression(inner),
            ASTNode::LITERAL { value, .. } => self.generate_literal(value),
            ASTNode::IDENTIFIER { .. } => {
                let offset = self.load_variable_address(node)?;
                self.builder.emit(&format!("lw $t0, {}($t1)", offset));
                Ok(())
            }
            ASTNode::BINARY_OP { op, lhs, rhs, .. } => self.generate_binary_op(*op, lhs, rhs),
            ASTNode::UNARY_OP { op, expression, .. } => self.generate_unary_op(*op, expression),
            ASTNode::ASSIGNMENT { identifier, expression, .. } => {
                self.generate_assignment(identifier, expression)
            }
            ASTNode::FUNC_CALL { name, arguments, .. } => {
                self.generate_function_call(name, arguments)
            }
            _ => panic!("Malformed AST! Node {:?} is not an expression.", node),
        }
    }

    fn generate_literal(&mut self, value: &Literal) -> Result<(), CompilerError> {
        match value {
            Literal::INT(value) => {
                self.builder.emit(&format!("li $t0, {}", value));
                Ok(())
            }
            Literal::CHAR(character) => {
                self.builder.emit(&format!("li $t0, {}", *character as u32));
                Ok(())
            }
            Literal::STRING(_) => Err(CompilerError::Internal(String::from(
                "constante cadeia fora de um comando escreva",
            ))),
        }
    }

    fn generate_binary_op(
        &mut self,
        op: BinaryOperation,
        lhs: &ASTNode,
        rhs: &ASTNode,
    ) -> Result<(), CompilerError> {
        // Left operand parks on the stack while the right one is computed.
        self.generate_expression(lhs)?;
        self.builder.emit("sw $t0, 0($sp)");
        self.builder.emit("addi $sp, $sp, -4");
        self.generate_expression(rhs)?;
        self.builder.emit("lw $t1, 4($sp)");

        match op {
            BinaryOperation::ADD => {
                self.builder.emit("add $t0, $t1, $t0");
            }
            BinaryOperation::SUB => {
                self.builder.emit("sub $t0, $t1, $t0");
            }
            BinaryOperation::MUL => {
                self.builder.emit("mult $t1, $t0");
                self.builder.emit("mflo $t0");
            }
            BinaryOperation::DIV => {
                self.builder.emit("div $t1, $t0");
                self.builder.emit("mflo $t0");
            }
            BinaryOperation::EQUAL => {
                self.builder.emit("sub $t0, $t1, $t0");
                self.builder.emit("sltiu $t0, $t0, 1");
            }
            BinaryOperation::NOT_EQUAL => {
                self.builder.emit("sub $t0, $t1, $t0");
                self.builder.emit("sltu $t0, $zero, $t0");
            }
            BinaryOperation::GREATER_THAN => {
                self.builder.emit("slt $t0, $t0, $t1");
            }
            BinaryOperation::LESS_THAN => {
                self.builder.emit("slt $t0, $t1, $t0");
            }
            BinaryOperation::LESS_EQUAL => {
                self.builder.emit("slt $t0, $t0, $t1");
                self.builder.emit("xori $t0, $t0, 1");
            }
            BinaryOperation::GREATER_EQUAL => {
                self.builder.emit("slt $t0, $t1, $t0");
                self.builder.emit("xori $t0, $t0, 1");
            }
            BinaryOperation::AND => {
                // Operands normalise to 0/1 so any non-zero int is true.
                self.builder.emit("sltu $t1, $zero, $t1");
                self.builder.emit("sltu $t0, $zero, $t0");
                self.builder.emit("and $t0, $t1, $t0");
            }
            BinaryOperation::OR => {
                self.builder.emit("or $t0, $t1, $t0");
                self.builder.emit("sltu $t0, $zero, $t0");
            }
        }

        self.builder.emit("addi $sp, $sp, 4");
        Ok(())
    }

    fn generate_unary_op(
        &mut self,
        op: UnaryOperation,
        expression: &ASTNode,
    ) -> Result<(), CompilerError> {
        self.generate_expression(expression)?;
        match op {
            UnaryOperation::NEGATE => {
                self.builder.emit("neg $t0, $t0");
            }
            UnaryOperation::NOT => {
                self.builder.emit("sltiu $t0, $t0, 1");
            }
        }
        Ok(())
    }

    fn generate_assignment(
        &mut self,
        identifier: &ASTNode,
        expression: &ASTNode,
    ) -> Result<(), CompilerError> {
        self.generate_expression(expression)?;

        let offset = self.load_variable_address(identifier)?;
        self.builder.emit(&format!("sw $t0, {}($t1)", offset));
        Ok(())
    }

    fn generate_function_call(
        &mut self,
        name: &str,
        arguments: &[ASTNode],
    ) -> Result<(), CompilerError> {
        self.builder.comment(&format!("FN CALL {}", name));

        let mut stack_bytes = 0;
        for (index, argument) in arguments.iter().enumerate() {
            self.generate_expression(argument)?;
            if index < 4 {
                self.builder.emit(&format!("move $a{}, $t0", index));
            } else {
                self.builder.emit("sw $t0, 0($sp)");
                self.builder.emit("addi $sp, $sp, -4");
                stack_bytes += 4;
            }
        }

        self.builder.emit(&format!("jal {}", name));

        // The caller owns the stack-passed arguments.
        if stack_bytes > 0 {
            self.builder.emit(&format!("addi $sp, $sp, {}", stack_bytes));
        }

        self.builder.emit("move $t0, $v0");
        Ok(())
    }

    /// Emit the static-link walk leaving the base pointer of the frame that
    /// owns the variable in $t1. @return: the variable's frame offset.
    fn load_variable_address(&mut self, identifier: &ASTNode) -> Result<i32, CompilerError> {
        let name = identifier.identifier_name().ok_or_else(|| {
            CompilerError::Internal(format!(
                "nó {:?} não é um identificador endereçável",
                identifier
            ))
        })?;

        let (position, declaration_depth) = match self.symbol_table.lookup(name) {
            Some(symbol) => (symbol.position(), symbol.declaration_depth()),
            None => {
                return Err(CompilerError::Internal(format!(
                    "variável '{}' ausente da tabela de símbolos do gerador",
                    name
                )))
            }
        };

        let current_depth = self.symbol_table.scope_count();
        if declaration_depth > current_depth {
            return Err(CompilerError::Internal(format!(
                "profundidade da variável '{}' maior que a profundidade atual",
                name
            )));
        }

        self.builder.emit("move $t1, $fp");
        for _ in 0..(current_depth - declaration_depth) {
            self.builder.emit("lw $t1, 0($t1)");
        }

        Ok(position)
    }
}
