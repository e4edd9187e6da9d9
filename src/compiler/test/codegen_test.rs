use super::{compile_source, parse_source};
use crate::compiler::backend::{BackEndGenerator, MipsCodeGenerator};
use crate::compiler::semantic_analyser::{GoianinhaSemanticAnalyser, SemanticAnalyser};

fn assert_emitted_in_order(assembly: &str, instructions: &[&str]) {
    let mut cursor = 0;
    for instruction in instructions {
        match assembly[cursor..].find(instruction) {
            Some(position) => cursor += position + instruction.len(),
            None => panic!(
                "Instruction '{}' missing (or out of order) in:\n{}",
                instruction, assembly
            ),
        }
    }
}

#[test]
fn test_output_skeleton() {
    let assembly = compile_source("programa { escreva \"ola\"; }");

    assert!(assembly.starts_with(".data\n__newline: .asciiz \"\\n\"\n"));
    assert_eq!(assembly.matches(".data\n").count(), 1);
    assert_eq!(assembly.matches(".text\n").count(), 1);
    assert_eq!(assembly.matches("main:\n").count(), 1);
    assert!(assembly.find(".data").unwrap() < assembly.find(".text").unwrap());

    // Program exit through syscall 10.
    assert_emitted_in_order(&assembly, &["main:", "li $v0, 10\n  syscall"]);
}

#[test]
fn test_global_variable_add_and_write() {
    let assembly = compile_source("int x;\nprograma { x = 2 + 3; escreva x; }");

    // The global lives in main's frame: its slot is reserved after main's
    // prologue, not in .data.
    assert_emitted_in_order(
        &assembly,
        &[
            "main:",
            "  sw $fp, 0($sp)\n  move $fp, $sp\n  addi $sp, $sp, -4\n",
        ],
    );

    assert_emitted_in_order(
        &assembly,
        &[
            "  li $t0, 2\n  sw $t0, 0($sp)\n  addi $sp, $sp, -4\n  li $t0, 3\n  lw $t1, 4($sp)\n  add $t0, $t1, $t0\n  addi $sp, $sp, 4\n",
            "  sw $t0, -4($t1)\n",
            "  li $v0, 1\n  move $a0, $t0\n  syscall\n",
        ],
    );
}

#[test]
fn test_char_variable_write_selects_print_char() {
    let assembly = compile_source("car c;\nprograma { c = 'A'; escreva c; }");

    assert!(assembly.contains("li $t0, 65"));
    assert!(assembly.contains("li $v0, 11"));
    assert!(!assembly.contains("li $v0, 1\n"));
}

#[test]
fn test_char_literal_writes_as_int() {
    let assembly = compile_source("programa { escreva 'A'; }");

    assert_emitted_in_order(&assembly, &["li $t0, 65", "li $v0, 1\n"]);
}

#[test]
fn test_nested_block_takes_one_static_link_hop() {
    let assembly = compile_source(
        "int f() { int y; se (1 == 1) entao { y = 3; } retorne 0; }\nprograma { escreva f(); }",
    );

    // Only the access to y from inside the inner block needs a hop.
    assert_eq!(assembly.matches("lw $t1, 0($t1)").count(), 1);
    assert_emitted_in_order(
        &assembly,
        &["li $t0, 3\n  move $t1, $fp\n  lw $t1, 0($t1)\n  sw $t0, -4($t1)\n"],
    );
}

#[test]
fn test_five_argument_call_layout() {
    let assembly = compile_source(
        "int f(int a, int b, int c, int d, int e) { retorne e; }\nprograma { escreva f(1, 2, 3, 4, 5); }",
    );

    // First four arguments travel in registers, the fifth on the stack,
    // which the caller pops after the call.
    assert_emitted_in_order(
        &assembly,
        &[
            "  li $t0, 1\n  move $a0, $t0\n",
            "  li $t0, 2\n  move $a1, $t0\n",
            "  li $t0, 3\n  move $a2, $t0\n",
            "  li $t0, 4\n  move $a3, $t0\n",
            "  li $t0, 5\n  sw $t0, 0($sp)\n  addi $sp, $sp, -4\n  jal f\n  addi $sp, $sp, 4\n  move $t0, $v0\n",
        ],
    );

    // The callee spills the register arguments in parameter order and
    // addresses the fifth past its saved $fp and $ra.
    assert_emitted_in_order(
        &assembly,
        &[
            "f:",
            "  sw $a0, 0($sp)\n  addi $sp, $sp, -4\n",
            "  sw $a1, 0($sp)\n",
            "  sw $a2, 0($sp)\n",
            "  sw $a3, 0($sp)\n",
        ],
    );
    assert!(assembly.contains("lw $t0, 8($t1)"));
}

#[test]
fn test_function_prologue_and_return_epilogue() {
    let assembly = compile_source("int f(int n) { retorne n; }\nprograma { escreva f(7); }");

    assert_emitted_in_order(
        &assembly,
        &[
            ".globl f\nf:\n",
            "  addi $sp, $sp, -4\n  sw $ra, 4($sp)\n  sw $fp, 0($sp)\n  move $fp, $sp\n  addi $sp, $sp, -4\n",
            "  move $v0, $t0\n",
            // One open block (the body) unwinds before the epilogue.
            "  lw $fp, 0($fp)\n  move $sp, $fp\n  lw $ra, 4($sp)\n  lw $fp, 0($sp)\n  addi $sp, $sp, 4\n  jr $ra\n",
        ],
    );
    assert_emitted_in_order(&assembly, &["jal f"]);
}

#[test]
fn test_if_else_lowering() {
    let assembly = compile_source("programa { int x; se (1) entao x = 1; senao x = 2; }");

    assert_emitted_in_order(
        &assembly,
        &["beq $t0, $zero, L0", "j L1", "L0:", "L1:"],
    );
    assert_eq!(assembly.matches("L0:\n").count(), 1);
    assert_eq!(assembly.matches("L1:\n").count(), 1);
}

#[test]
fn test_if_without_else_lowering() {
    let assembly = compile_source("programa { int x; se (1) entao x = 1; }");

    assert_emitted_in_order(&assembly, &["beq $t0, $zero, L0", "L0:"]);
    assert!(!assembly.contains("j L0"));
}

#[test]
fn test_while_lowering() {
    let assembly = compile_source("programa { int x; x = 3; enquanto (x > 0) execute x = x - 1; }");

    assert_emitted_in_order(
        &assembly,
        &["L0:", "slt $t0, $t0, $t1", "beq $t0, $zero, L1", "j L0", "L1:"],
    );
}

#[test]
fn test_comparison_and_logical_lowerings() {
    let assembly = compile_source(
        "programa { int x; x = 1;\n  se (x <= 2) entao x = 0;\n  se (x >= 1 e x < 3) entao x = 0;\n  se (x == 1 ou x != 2) entao x = 0;\n}",
    );

    // <= and >= negate > and < with xori.
    assert_emitted_in_order(&assembly, &["slt $t0, $t0, $t1\n  xori $t0, $t0, 1\n"]);
    assert_emitted_in_order(&assembly, &["slt $t0, $t1, $t0\n  xori $t0, $t0, 1\n"]);
    // e / ou normalise their operands to 0/1.
    assert_emitted_in_order(
        &assembly,
        &["sltu $t1, $zero, $t1\n  sltu $t0, $zero, $t0\n  and $t0, $t1, $t0\n"],
    );
    assert_emitted_in_order(&assembly, &["or $t0, $t1, $t0\n  sltu $t0, $zero, $t0\n"]);
    assert_emitted_in_order(&assembly, &["sub $t0, $t1, $t0\n  sltiu $t0, $t0, 1\n"]);
    assert_emitted_in_order(&assembly, &["sub $t0, $t1, $t0\n  sltu $t0, $zero, $t0\n"]);
}

#[test]
fn test_unary_lowerings() {
    let assembly = compile_source("programa { int x; x = -1; x = !x; }");

    assert_emitted_in_order(&assembly, &["li $t0, 1\n  neg $t0, $t0\n"]);
    assert_emitted_in_order(&assembly, &["sltiu $t0, $t0, 1"]);
}

#[test]
fn test_string_constants_collect_in_data_section() {
    let assembly = compile_source("programa { escreva \"um\"; escreva \"dois\"; }");

    assert_emitted_in_order(
        &assembly,
        &[
            ".data\n__newline: .asciiz \"\\n\"\nL0: .asciiz \"um\"\nL1: .asciiz \"dois\"\n.text\n",
        ],
    );
    assert_emitted_in_order(&assembly, &["la $a0, L0", "la $a0, L1"]);
}

#[test]
fn test_newline_statement() {
    let assembly = compile_source("programa { novalinha; }");

    assert_emitted_in_order(&assembly, &["li $v0, 4\n  la $a0, __newline\n  syscall\n"]);
}

#[test]
fn test_read_statement() {
    let assembly = compile_source("programa { int x; leia x; }");

    assert_emitted_in_order(
        &assembly,
        &["li $v0, 5\n  syscall\n", "sw $v0, -4($t1)\n"],
    );
}

#[test]
fn test_multiplication_and_division_use_lo() {
    let assembly = compile_source("programa { int x; x = 6 * 7; x = x / 2; }");

    assert_emitted_in_order(&assembly, &["mult $t1, $t0\n  mflo $t0\n"]);
    assert_emitted_in_order(&assembly, &["div $t1, $t0\n  mflo $t0\n"]);
}

#[test]
fn test_every_jump_targets_a_defined_label() {
    let assembly = compile_source(
        "programa { int x; x = 2;\n  enquanto (x > 0) execute {\n    se (x == 1) entao escreva x; senao novalinha;\n    x = x - 1;\n  }\n}",
    );

    for label in ["L0", "L1", "L2", "L3"] {
        let definition = format!("{}:\n", label);
        assert_eq!(assembly.matches(definition.as_str()).count(), 1, "{}", label);
    }
}

#[test]
fn test_regeneration_is_byte_identical() {
    let source = "int f(int a) { retorne a + 1; }\nprograma { int x; x = f(1); escreva x; }";
    let annotated = GoianinhaSemanticAnalyser::default()
        .analyse(parse_source(source))
        .unwrap();

    let first = MipsCodeGenerator::default()
        .generate(&annotated)
        .unwrap()
        .to_string();
    let second = MipsCodeGenerator::default()
        .generate(&annotated)
        .unwrap()
        .to_string();

    assert_eq!(first, second);
    assert_eq!(first, compile_source(source));
}

#[test]
fn test_main_epilogue_restores_frame_and_exits() {
    let assembly = compile_source("programa { }");

    assert_emitted_in_order(
        &assembly,
        &[
            "main:",
            "  addi $sp, $sp, -4\n  sw $ra, 4($sp)\n  sw $fp, 0($sp)\n  move $fp, $sp\n  addi $sp, $sp, -4\n",
            "  move $sp, $fp\n  lw $fp, 0($sp)\n",
            "  lw $ra, 4($fp)\n  lw $fp, 0($fp)\n  addi $sp, $sp, 4\n",
            "  li $v0, 10\n  syscall\n",
        ],
    );
}
