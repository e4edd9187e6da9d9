use pest::iterators::Pair;
use pest::Parser;

use super::super::ast::{ASTNode, BinaryOperation, DataType, Literal, UnaryOperation};
use super::super::error::CompilerError;
use super::AstParser;

/// Pest Goianinha Parser parses a string into a series of tokens.
/// These tokens are defined as a Context-Free-Grammar in the
/// src/goianinha.pest file. The tokens generated from this parser are then
/// formalised into the generic abstract syntax tree implementation.
#[derive(Parser)]
#[grammar = "goianinha.pest"]
struct GoianinhaParser;

/// PestGoianinhaParser is a concrete AstParser.
/// It uses the pest library to generate a token sequence from a source
/// string that is then converted into an ASTNode tree. Every node that can
/// appear in a diagnostic records its 1-based source line.
pub struct PestGoianinhaParser;

impl PestGoianinhaParser {
    /// Parses a source string into the root PROGRAM node.
    fn parse_into_node_tree(&self, source: &str) -> Result<ASTNode, CompilerError> {
        let mut pairs = GoianinhaParser::parse(Rule::program, source)
            .map_err(|error| CompilerError::Syntax(error.to_string()))?;

        match pairs.next() {
            Some(pair) => Ok(self.parse_pair_program(pair)),
            None => Err(CompilerError::Syntax(String::from(
                "programa vazio",
            ))),
        }
    }

    /// Parses all pest pair tokens into a valid ASTNode
    fn parse_pair_node(&self, pair: Pair<Rule>) -> ASTNode {
        match pair.as_rule() {
            Rule::identifier => self.parse_pair_identifier(pair),
            Rule::int_const |
            Rule::car_const |
            Rule::string_const => self.parse_pair_literal(pair),
            Rule::or_expr |
            Rule::and_expr |
            Rule::equality_expr |
            Rule::relational_expr |
            Rule::additive_expr |
            Rule::multiplicative_expr => self.parse_pair_binary_expression(pair),
            Rule::unary_expr => self.parse_pair_unary_expression(pair),
            Rule::assignment => self.parse_pair_assignment(pair),
            Rule::func_call => self.parse_pair_function_call(pair),
            Rule::paren_expr => self.parse_pair_paren_expression(pair),
            Rule::var_declaration => self.parse_pair_var_declaration(pair),
            Rule::func_declaration => self.parse_pair_func_declaration(pair),
            Rule::parameter => self.parse_pair_parameter(pair),
            Rule::block => self.parse_pair_block(pair),
            Rule::empty_statement => ASTNode::EMPTY,
            Rule::return_statement => self.parse_pair_return_statement(pair),
            Rule::read_statement => self.parse_pair_read_statement(pair),
            Rule::write_statement => self.parse_pair_write_statement(pair),
            Rule::newline_statement => ASTNode::NEWLINE,
            Rule::if_statement => self.parse_pair_if_statement(pair),
            Rule::while_statement => self.parse_pair_while_statement(pair),
            Rule::expression_statement => self.parse_pair_expression_statement(pair),
            _ => panic!("Whoops! Unprocessed pest rule: {:?}", pair.as_rule()),
        }
    }

    /// Keyword tokens parse as atomic pairs of their own so the reserved
    /// word guard works; tree building skips them.
    fn is_keyword_pair(rule: Rule) -> bool {
        matches!(
            rule,
            Rule::kw_programa
                | Rule::kw_retorne
                | Rule::kw_leia
                | Rule::kw_escreva
                | Rule::kw_novalinha
                | Rule::kw_se
                | Rule::kw_entao
                | Rule::kw_senao
                | Rule::kw_enquanto
                | Rule::kw_execute
        )
    }

    fn parse_pair_program(&self, pair: Pair<Rule>) -> ASTNode {
        let mut declarations = Vec::new();
        let mut main_body = None;

        for inner in pair.into_inner() {
            match inner.as_rule() {
                Rule::var_declaration | Rule::func_declaration => {
                    declarations.push(self.parse_pair_node(inner));
                }
                Rule::block => {
                    main_body = Some(self.parse_pair_block(inner));
                }
                Rule::kw_programa | Rule::EOI => {}
                _ => panic!("Whoops! Unprocessed program item: {:?}", inner.as_rule()),
            }
        }

        ASTNode::PROGRAM {
            declarations,
            main_body: Box::new(main_body.expect("Grammar guarantees a main block")),
        }
    }

    fn parse_pair_var_declaration(&self, pair: Pair<Rule>) -> ASTNode {
        let line = Self::line_of(&pair);
        let mut inner = pair.into_inner();
        let datatype = self.parse_pair_datatype(inner.next().unwrap());
        let names = inner.map(|name| self.parse_pair_identifier(name)).collect();

        ASTNode::VAR_DECL { datatype, names, line }
    }

    fn parse_pair_func_declaration(&self, pair: Pair<Rule>) -> ASTNode {
        let line = Self::line_of(&pair);
        let mut inner = pair.into_inner();
        let return_type = self.parse_pair_datatype(inner.next().unwrap());
        let name = inner.next().unwrap().as_str().to_string();

        let mut parameters = Vec::new();
        let mut body = None;
        for item in inner {
            match item.as_rule() {
                Rule::parameter_list => {
                    parameters = item
                        .into_inner()
                        .map(|parameter| self.parse_pair_parameter(parameter))
                        .collect();
                }
                Rule::block => {
                    body = Some(self.parse_pair_block(item));
                }
                _ => panic!("Whoops! Unprocessed function item: {:?}", item.as_rule()),
            }
        }

        ASTNode::FUNC_DECL {
            return_type,
            name,
            parameters,
            body: Box::new(body.expect("Grammar guarantees a function body")),
            line,
        }
    }

    fn parse_pair_parameter(&self, pair: Pair<Rule>) -> ASTNode {
        let line = Self::line_of(&pair);
        let mut inner = pair.into_inner();
        let datatype = self.parse_pair_datatype(inner.next().unwrap());
        let name = inner.next().unwrap().as_str().to_string();

        ASTNode::PARAMETER { datatype, name, line }
    }

    fn parse_pair_block(&self, pair: Pair<Rule>) -> ASTNode {
        let mut declarations = Vec::new();
        let mut statements = Vec::new();

        for item in pair.into_inner() {
            match item.as_rule() {
                Rule::var_declaration => declarations.push(self.parse_pair_node(item)),
                _ => statements.push(self.parse_pair_node(item)),
            }
        }

        ASTNode::BLOCK { declarations, statements }
    }

    fn parse_pair_return_statement(&self, pair: Pair<Rule>) -> ASTNode {
        let line = Self::line_of(&pair);
        let mut inner = pair
            .into_inner()
            .filter(|item| !Self::is_keyword_pair(item.as_rule()));
        let expression = self.parse_pair_node(inner.next().unwrap());

        ASTNode::RETURN { expression: Box::new(expression), line }
    }

    fn parse_pair_read_statement(&self, pair: Pair<Rule>) -> ASTNode {
        let line = Self::line_of(&pair);
        let mut inner = pair
            .into_inner()
            .filter(|item| !Self::is_keyword_pair(item.as_rule()));
        let identifier = self.parse_pair_identifier(inner.next().unwrap());

        ASTNode::READ { identifier: Box::new(identifier), line }
    }

    fn parse_pair_write_statement(&self, pair: Pair<Rule>) -> ASTNode {
        let line = Self::line_of(&pair);
        let mut inner = pair
            .into_inner()
            .filter(|item| !Self::is_keyword_pair(item.as_rule()));
        let expression = self.parse_pair_node(inner.next().unwrap());

        ASTNode::WRITE { expression: Box::new(expression), line }
    }

    fn parse_pair_if_statement(&self, pair: Pair<Rule>) -> ASTNode {
        let line = Self::line_of(&pair);
        let mut inner = pair
            .into_inner()
            .filter(|item| !Self::is_keyword_pair(item.as_rule()));
        let condition = self.parse_pair_node(inner.next().unwrap());
        let then_branch = self.parse_pair_node(inner.next().unwrap());
        let else_branch = inner.next().map(|branch| self.parse_pair_node(branch));

        ASTNode::BRANCH {
            condition: Box::new(condition),
            then_branch: Box::new(then_branch),
            else_branch: Box::new(else_branch),
            line,
        }
    }

    fn parse_pair_while_statement(&self, pair: Pair<Rule>) -> ASTNode {
        let line = Self::line_of(&pair);
        let mut inner = pair
            .into_inner()
            .filter(|item| !Self::is_keyword_pair(item.as_rule()));
        let condition = self.parse_pair_node(inner.next().unwrap());
        let body = self.parse_pair_node(inner.next().unwrap());

        ASTNode::WHILE_LOOP {
            condition: Box::new(condition),
            body: Box::new(body),
            line,
        }
    }

    fn parse_pair_expression_statement(&self, pair: Pair<Rule>) -> ASTNode {
        self.parse_pair_node(pair.into_inner().next().unwrap())
    }

    fn parse_pair_assignment(&self, pair: Pair<Rule>) -> ASTNode {
        let line = Self::line_of(&pair);
        let mut inner = pair.into_inner();
        let identifier = self.parse_pair_identifier(inner.next().unwrap());
        let expression = self.parse_pair_node(inner.next().unwrap());

        ASTNode::ASSIGNMENT {
            identifier: Box::new(identifier),
            expression: Box::new(expression),
            line,
        }
    }

    /// Folds a precedence-ladder pair (operand, then operator/operand
    /// repetitions) into left-associative BINARY_OP nodes. A ladder pair
    /// with a single operand collapses to the operand itself.
    fn parse_pair_binary_expression(&self, pair: Pair<Rule>) -> ASTNode {
        let mut inner = pair.into_inner();
        let mut node = self.parse_pair_node(inner.next().unwrap());

        while let Some(op_pair) = inner.next() {
            let line = Self::line_of(&op_pair);
            let op = BinaryOperation::parse(op_pair.as_str())
                .unwrap_or_else(|| panic!("Whoops! Unknown binary operator: {}", op_pair.as_str()));
            let rhs = self.parse_pair_node(inner.next().unwrap());

            node = ASTNode::BINARY_OP {
                op,
                lhs: Box::new(node),
                rhs: Box::new(rhs),
                line,
            };
        }

        node
    }

    fn parse_pair_unary_expression(&self, pair: Pair<Rule>) -> ASTNode {
        let mut inner = pair.into_inner();
        let first = inner.next().unwrap();

        match first.as_rule() {
            Rule::unary_op => {
                let line = Self::line_of(&first);
                let op = UnaryOperation::parse(first.as_str())
                    .unwrap_or_else(|| panic!("Whoops! Unknown unary operator: {}", first.as_str()));
                let expression = self.parse_pair_node(inner.next().unwrap());

                ASTNode::UNARY_OP {
                    op,
                    expression: Box::new(expression),
                    line,
                }
            }
            _ => self.parse_pair_node(first),
        }
    }

    fn parse_pair_function_call(&self, pair: Pair<Rule>) -> ASTNode {
        let line = Self::line_of(&pair);
        let mut inner = pair.into_inner();
        let name = inner.next().unwrap().as_str().to_string();
        let arguments = match inner.next() {
            Some(list) => list
                .into_inner()
                .map(|argument| self.parse_pair_node(argument))
                .collect(),
            None => Vec::new(),
        };

        ASTNode::FUNC_CALL { name, arguments, line }
    }

    fn parse_pair_paren_expression(&self, pair: Pair<Rule>) -> ASTNode {
        self.parse_pair_node(pair.into_inner().next().unwrap())
    }

    fn parse_pair_identifier(&self, pair: Pair<Rule>) -> ASTNode {
        ASTNode::IDENTIFIER {
            name: pair.as_str().to_string(),
            line: Self::line_of(&pair),
        }
    }

    /// Parses a pest token pair into an AST literal leaf.
    fn parse_pair_literal(&self, pair: Pair<Rule>) -> ASTNode {
        let line = Self::line_of(&pair);
        let value = match pair.as_rule() {
            Rule::int_const => Literal::INT(pair.as_str().parse().unwrap()),
            Rule::car_const => {
                // Lexeme is exactly 'c'; the character sits between the quotes.
                Literal::CHAR(pair.as_str().chars().nth(1).unwrap())
            }
            Rule::string_const => Literal::STRING(pair.as_str().to_string()),
            _ => panic!("Whoops! Unprocessed literal rule: {:?}", pair.as_rule()),
        };

        ASTNode::LITERAL { value, line }
    }

    fn parse_pair_datatype(&self, pair: Pair<Rule>) -> DataType {
        DataType::parse(pair.as_str())
            .unwrap_or_else(|| panic!("Whoops! Unknown type keyword: {}", pair.as_str()))
    }

    fn line_of(pair: &Pair<Rule>) -> usize {
        pair.as_span().start_pos().line_col().0
    }
}

/// AstParser Trait Concrete Implementation
impl AstParser for PestGoianinhaParser {
    fn default() -> Self {
        PestGoianinhaParser
    }

    /// Parse processes a source string into an abstract syntax tree
    fn parse(self, source: &str) -> Result<ASTNode, CompilerError> {
        self.parse_into_node_tree(source)
    }
}
