use super::parse_source;
use crate::compiler::ast::{ASTNode, BinaryOperation, DataType, Literal, UnaryOperation};
use crate::compiler::parser::{AstParser, PestGoianinhaParser};

#[test]
fn test_parse_empty_program() {
    let program = parse_source("programa { }");

    match program {
        ASTNode::PROGRAM { declarations, main_body } => {
            assert!(declarations.is_empty());
            assert_eq!(
                *main_body,
                ASTNode::BLOCK {
                    declarations: vec![],
                    statements: vec![],
                }
            );
        }
        _ => panic!("Root node should be a PROGRAM"),
    }
}

#[test]
fn test_parse_global_declarations() {
    let program = parse_source("int x, y;\ncar c;\nprograma { }");

    match program {
        ASTNode::PROGRAM { declarations, .. } => {
            assert_eq!(declarations.len(), 2);
            match &declarations[0] {
                ASTNode::VAR_DECL { datatype, names, line } => {
                    assert_eq!(*datatype, DataType::INT);
                    assert_eq!(names.len(), 2);
                    assert_eq!(*line, 1);
                }
                _ => panic!("First declaration should be a VAR_DECL"),
            }
            match &declarations[1] {
                ASTNode::VAR_DECL { datatype, line, .. } => {
                    assert_eq!(*datatype, DataType::CHAR);
                    assert_eq!(*line, 2);
                }
                _ => panic!("Second declaration should be a VAR_DECL"),
            }
        }
        _ => panic!("Root node should be a PROGRAM"),
    }
}

#[test]
fn test_parse_function_declaration() {
    let program = parse_source("int soma(int a, int b) { retorne a + b; }\nprograma { }");

    match program {
        ASTNode::PROGRAM { declarations, .. } => match &declarations[0] {
            ASTNode::FUNC_DECL { return_type, name, parameters, body, .. } => {
                assert_eq!(*return_type, DataType::INT);
                assert_eq!(name, "soma");
                assert_eq!(
                    parameters[0],
                    ASTNode::PARAMETER {
                        datatype: DataType::INT,
                        name: String::from("a"),
                        line: 1,
                    }
                );
                assert_eq!(
                    parameters[1],
                    ASTNode::PARAMETER {
                        datatype: DataType::INT,
                        name: String::from("b"),
                        line: 1,
                    }
                );
                match body.as_ref() {
                    ASTNode::BLOCK { statements, .. } => {
                        assert!(matches!(statements[0], ASTNode::RETURN { .. }))
                    }
                    _ => panic!("Function body should be a BLOCK"),
                }
            }
            _ => panic!("Declaration should be a FUNC_DECL"),
        },
        _ => panic!("Root node should be a PROGRAM"),
    }
}

#[test]
fn test_parse_multiplication_binds_tighter_than_addition() {
    let program = parse_source("programa { int x; x = 1 + 2 * 3; }");

    let ASTNode::PROGRAM { main_body, .. } = program else {
        panic!("Root node should be a PROGRAM");
    };
    let ASTNode::BLOCK { statements, .. } = *main_body else {
        panic!("Main body should be a BLOCK");
    };
    let ASTNode::ASSIGNMENT { expression, .. } = &statements[0] else {
        panic!("Statement should be an ASSIGNMENT");
    };
    let ASTNode::BINARY_OP { op, lhs, rhs, .. } = expression.as_ref() else {
        panic!("Assigned value should be a BINARY_OP");
    };

    assert_eq!(*op, BinaryOperation::ADD);
    assert!(matches!(
        lhs.as_ref(),
        ASTNode::LITERAL { value: Literal::INT(1), .. }
    ));
    assert!(matches!(
        rhs.as_ref(),
        ASTNode::BINARY_OP { op: BinaryOperation::MUL, .. }
    ));
}

#[test]
fn test_parse_if_else_and_while() {
    let program = parse_source(
        "programa {\n  int x;\n  se (x == 0) entao x = 1; senao x = 2;\n  enquanto (x > 0) execute x = x - 1;\n}",
    );

    let ASTNode::PROGRAM { main_body, .. } = program else {
        panic!("Root node should be a PROGRAM");
    };
    let ASTNode::BLOCK { statements, .. } = *main_body else {
        panic!("Main body should be a BLOCK");
    };

    match &statements[0] {
        ASTNode::BRANCH { else_branch, line, .. } => {
            assert!(else_branch.is_some());
            assert_eq!(*line, 3);
        }
        _ => panic!("First statement should be a BRANCH"),
    }
    match &statements[1] {
        ASTNode::WHILE_LOOP { line, .. } => assert_eq!(*line, 4),
        _ => panic!("Second statement should be a WHILE_LOOP"),
    }
}

#[test]
fn test_parse_if_without_else() {
    let program = parse_source("programa { int x; se (1) entao x = 1; }");

    let ASTNode::PROGRAM { main_body, .. } = program else {
        panic!("Root node should be a PROGRAM");
    };
    let ASTNode::BLOCK { statements, .. } = *main_body else {
        panic!("Main body should be a BLOCK");
    };
    let ASTNode::BRANCH { else_branch, .. } = &statements[0] else {
        panic!("Statement should be a BRANCH");
    };

    assert!(else_branch.is_none());
}

#[test]
fn test_parse_statement_forms() {
    let program = parse_source(
        "programa {\n  int x;\n  ;\n  leia x;\n  escreva x;\n  escreva \"ola\";\n  novalinha;\n  { x = 0; }\n}",
    );

    let ASTNode::PROGRAM { main_body, .. } = program else {
        panic!("Root node should be a PROGRAM");
    };
    let ASTNode::BLOCK { statements, .. } = *main_body else {
        panic!("Main body should be a BLOCK");
    };

    assert!(matches!(statements[0], ASTNode::EMPTY));
    assert!(matches!(statements[1], ASTNode::READ { .. }));
    assert!(matches!(statements[2], ASTNode::WRITE { .. }));
    match &statements[3] {
        ASTNode::WRITE { expression, .. } => {
            // The string lexeme keeps its quotes.
            assert_eq!(
                expression.as_ref(),
                &ASTNode::LITERAL {
                    value: Literal::STRING(String::from("\"ola\"")),
                    line: 6,
                }
            );
        }
        _ => panic!("Fourth statement should be a WRITE"),
    }
    assert!(matches!(statements[4], ASTNode::NEWLINE));
    assert!(matches!(statements[5], ASTNode::BLOCK { .. }));
}

#[test]
fn test_parse_char_literal_strips_quotes() {
    let program = parse_source("programa { car c; c = 'A'; }");

    let ASTNode::PROGRAM { main_body, .. } = program else {
        panic!("Root node should be a PROGRAM");
    };
    let ASTNode::BLOCK { statements, .. } = *main_body else {
        panic!("Main body should be a BLOCK");
    };
    let ASTNode::ASSIGNMENT { expression, .. } = &statements[0] else {
        panic!("Statement should be an ASSIGNMENT");
    };

    assert!(matches!(
        expression.as_ref(),
        ASTNode::LITERAL { value: Literal::CHAR('A'), .. }
    ));
}

#[test]
fn test_parse_unary_and_logical_operators() {
    let program = parse_source("programa { int x; x = !(x e 1) ou -x; }");

    let ASTNode::PROGRAM { main_body, .. } = program else {
        panic!("Root node should be a PROGRAM");
    };
    let ASTNode::BLOCK { statements, .. } = *main_body else {
        panic!("Main body should be a BLOCK");
    };
    let ASTNode::ASSIGNMENT { expression, .. } = &statements[0] else {
        panic!("Statement should be an ASSIGNMENT");
    };
    let ASTNode::BINARY_OP { op, lhs, rhs, .. } = expression.as_ref() else {
        panic!("Assigned value should be a BINARY_OP");
    };

    assert_eq!(*op, BinaryOperation::OR);
    assert!(matches!(
        lhs.as_ref(),
        ASTNode::UNARY_OP { op: UnaryOperation::NOT, .. }
    ));
    assert!(matches!(
        rhs.as_ref(),
        ASTNode::UNARY_OP { op: UnaryOperation::NEGATE, .. }
    ));
}

#[test]
fn test_parse_call_with_arguments() {
    let program = parse_source("int f(int a, int b) { retorne a; }\nprograma { escreva f(1, 2); }");

    let ASTNode::PROGRAM { main_body, .. } = program else {
        panic!("Root node should be a PROGRAM");
    };
    let ASTNode::BLOCK { statements, .. } = *main_body else {
        panic!("Main body should be a BLOCK");
    };
    let ASTNode::WRITE { expression, .. } = &statements[0] else {
        panic!("Statement should be a WRITE");
    };
    let ASTNode::FUNC_CALL { name, arguments, line } = expression.as_ref() else {
        panic!("Written value should be a FUNC_CALL");
    };

    assert_eq!(name, "f");
    assert_eq!(arguments.len(), 2);
    assert_eq!(*line, 2);
}

#[test]
fn test_parse_keyword_is_not_an_identifier() {
    let result = PestGoianinhaParser::default().parse("programa { int se; }");
    result.expect_err("reserved words cannot declare variables");
}

#[test]
fn test_parse_identifier_with_keyword_prefix() {
    // "senha" starts with the keyword "se" and must still be an identifier.
    let program = parse_source("programa { int senha; senha = 1; }");

    let ASTNode::PROGRAM { main_body, .. } = program else {
        panic!("Root node should be a PROGRAM");
    };
    let ASTNode::BLOCK { declarations, .. } = *main_body else {
        panic!("Main body should be a BLOCK");
    };
    let ASTNode::VAR_DECL { names, .. } = &declarations[0] else {
        panic!("Declaration should be a VAR_DECL");
    };

    assert_eq!(names[0].identifier_name(), Some("senha"));
}

#[test]
fn test_parse_missing_semicolon_is_a_syntax_error() {
    let result = PestGoianinhaParser::default().parse("programa { int x\n x = 1; }");
    result.expect_err("missing semicolon should fail to parse");
}

#[test]
fn test_parse_comments_are_trivia() {
    let program = parse_source("/* cabecalho */\nprograma { /* vazio */ }");

    match program {
        ASTNode::PROGRAM { declarations, .. } => assert!(declarations.is_empty()),
        _ => panic!("Root node should be a PROGRAM"),
    }
}
