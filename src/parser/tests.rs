use crate::ast::{AstRule, NodeId};
use crate::compile::Session;
use crate::error::{Diagnostic, DiagnosticKind};
use crate::lexer;

use super::parse;

fn parse_source(source: &str) -> (Session, NodeId) {
    let mut cx = Session::new();
    let mut tokens = lexer::lex(source, &mut cx).expect("lexing should succeed");
    let root = parse(&mut cx, &mut tokens).expect("parsing should succeed");
    (cx, root)
}

fn parse_err(source: &str) -> Diagnostic {
    let mut cx = Session::new();
    let mut tokens = lexer::lex(source, &mut cx).expect("lexing should succeed");
    parse(&mut cx, &mut tokens).expect_err("parsing should fail")
}

/// Renders a subtree as `Rule:value(child, child)` for shape assertions.
fn tree(cx: &Session, node: NodeId) -> String {
    let n = &cx.nodes[node];
    let mut s = format!("{:?}", n.rule);
    if let Some(v) = n.value {
        s.push(':');
        s.push_str(cx.interner.resolve(v));
    }
    if !n.children.is_empty() {
        let children: Vec<String> = n.children.iter().map(|&c| tree(cx, c)).collect();
        s.push('(');
        s.push_str(&children.join(", "));
        s.push(')');
    }
    s
}

/// The subtree of the statement at `index` inside the first function's body.
fn stmt_tree(source_body: &str, index: usize) -> String {
    let source = format!("package demo; fun main() {{ {} }}", source_body);
    let (cx, root) = parse_source(&source);
    let function = cx.nodes[root].children[1];
    let block = *cx.nodes[function]
        .children
        .iter()
        .find(|&&c| cx.nodes[c].rule == AstRule::Block)
        .expect("function has a body");
    let stmt = cx.nodes[block].children[index];
    tree(&cx, stmt)
}

#[test]
fn minimal_program() {
    let (cx, root) = parse_source("package demo; fun main() { return 0; }");
    assert_eq!(
        tree(&cx, root),
        "Root(Package(Identifier:demo), \
         Function(Identifier:main, Block(Return(Expression(NumberLiteral:0)))))"
    );
}

#[test]
fn empty_file_has_exactly_one_package_child() {
    let (cx, root) = parse_source("package demo;");
    assert_eq!(tree(&cx, root), "Root(Package(Identifier:demo))");
}

#[test]
fn dotted_package_path() {
    let (cx, root) = parse_source("package app.core.io;");
    assert_eq!(
        tree(&cx, root),
        "Root(Package(Identifier:app, Identifier:core, Identifier:io))"
    );
}

#[test]
fn file_without_package_fails_at_line_one() {
    let err = parse_err("fun main() { return 0; }");
    assert_eq!(err.kind, DiagnosticKind::UnexpectedToken);
    assert_eq!(err.line, 1);
}

#[test]
fn whitespace_only_file_fails_at_line_one() {
    let err = parse_err("   \t ");
    assert_eq!(err.kind, DiagnosticKind::UnexpectedToken);
    assert_eq!(err.line, 1);
}

#[test]
fn arithmetic_precedence_groups_multiplication() {
    assert_eq!(
        stmt_tree("return 1 + 2 * 3 + 4;", 0),
        "Return(Expression(Arithmetic(NumberLiteral:1, Sum, \
         Arithmetic(Expression(NumberLiteral:2), Mul, Expression(NumberLiteral:3)), \
         Sum, Expression(NumberLiteral:4))))"
    );
}

#[test]
fn pointer_and_dereference_prefixes() {
    assert_eq!(
        stmt_tree("*&&x;", 0),
        "Expression(Deref, Ptr, Ptr, Identifier:x)"
    );
}

#[test]
fn call_and_property_chain() {
    assert_eq!(
        stmt_tree("a.b.c(1, d.e);", 0),
        "Expression(PropAccess(Identifier:a, Identifier:b, \
         Call(Identifier:c, Arguments(\
         Argument(Expression(NumberLiteral:1)), \
         Argument(Expression(PropAccess(Identifier:d, Identifier:e)))))))"
    );
}

#[test]
fn call_without_arguments_has_no_arguments_node() {
    assert_eq!(stmt_tree("f();", 0), "Expression(Call(Identifier:f))");
}

#[test]
fn for_loop_with_step() {
    assert_eq!(
        stmt_tree("for i in 0 to 10 step 2 { }", 0),
        "For(Identifier:i, From(Expression(NumberLiteral:0)), \
         To(Expression(NumberLiteral:10)), Step(Expression(NumberLiteral:2)), Block)"
    );
}

#[test]
fn for_loop_without_step() {
    assert_eq!(
        stmt_tree("for i in a to b { x = i; }", 0),
        "For(Identifier:i, From(Expression(Identifier:a)), \
         To(Expression(Identifier:b)), \
         Block(Assignment(Identifier:x, Expression(Identifier:i))))"
    );
}

#[test]
fn two_steps_in_one_for_loop_fail() {
    let err = parse_err("package demo; fun main() { for i in 0 to 9 step 1 step 2 { } }");
    assert_eq!(err.kind, DiagnosticKind::UnexpectedToken);
}

#[test]
fn assignment_statement() {
    assert_eq!(
        stmt_tree("x = y + 1;", 0),
        "Assignment(Identifier:x, Expression(Arithmetic(Identifier:y, Sum, \
         Expression(NumberLiteral:1))))"
    );
}

#[test]
fn declaration_with_builtin_type() {
    assert_eq!(
        stmt_tree("let total: num = 0;", 0),
        "Declaration(Identifier:total, Type(Num), Expression(NumberLiteral:0))"
    );
}

#[test]
fn const_declaration_with_pointer_type() {
    assert_eq!(
        stmt_tree("const name: &&str = s;", 0),
        "ConstDeclaration(Identifier:name, Type(Ptr, Ptr, Str), Expression(Identifier:s))"
    );
}

#[test]
fn generic_type_with_nested_parameter() {
    assert_eq!(
        stmt_tree("let v: a<b, c<d>> = x;", 0),
        "Declaration(Identifier:v, \
         Type(Identifier:a(Type(Identifier:b), Type(Identifier:c(Type(Identifier:d))))), \
         Expression(Identifier:x))"
    );
}

#[test]
fn empty_generic_list_is_pruned() {
    assert_eq!(
        stmt_tree("let v: a<> = x;", 0),
        "Declaration(Identifier:v, Type(Identifier:a), Expression(Identifier:x))"
    );
}

#[test]
fn trailing_empty_generic_is_pruned() {
    assert_eq!(
        stmt_tree("let v: a<b,> = x;", 0),
        "Declaration(Identifier:v, Type(Identifier:a(Type(Identifier:b))), \
         Expression(Identifier:x))"
    );
}

#[test]
fn dotted_type_path_joins_into_one_name() {
    assert_eq!(
        stmt_tree("let v: app.core.buffer = x;", 0),
        "Declaration(Identifier:v, Type(Identifier:app.core.buffer), Expression(Identifier:x))"
    );
}

#[test]
fn unclosed_generic_list_fails() {
    let err = parse_err("package demo; fun main() { let v: a<b = x; }");
    assert_eq!(err.kind, DiagnosticKind::UnexpectedToken);
}

#[test]
fn if_elseif_else_chain() {
    let source = "if a { x = 1; } elseif b { x = 2; } else { x = 3; }";
    assert_eq!(
        stmt_tree(source, 0),
        "If(Expression(Identifier:a), Block(Assignment(Identifier:x, Expression(NumberLiteral:1))))"
    );
    assert_eq!(
        stmt_tree(source, 1),
        "ElseIf(Expression(Identifier:b), Block(Assignment(Identifier:x, Expression(NumberLiteral:2))))"
    );
    assert_eq!(
        stmt_tree(source, 2),
        "Else(Block(Assignment(Identifier:x, Expression(NumberLiteral:3))))"
    );
}

#[test]
fn dangling_else_fails() {
    let err = parse_err("package demo; fun main() { else { } }");
    assert_eq!(err.kind, DiagnosticKind::UnexpectedToken);
}

#[test]
fn elseif_after_other_statement_fails() {
    let err = parse_err("package demo; fun main() { if a { } x = 1; elseif b { } }");
    assert_eq!(err.kind, DiagnosticKind::UnexpectedToken);
}

#[test]
fn while_loop_with_comparison() {
    assert_eq!(
        stmt_tree("while i < 10 { i = i + 1; }", 0),
        "While(Expression(Boolean(Identifier:i, Lt, Expression(NumberLiteral:10))), \
         Block(Assignment(Identifier:i, Expression(Arithmetic(Identifier:i, Sum, \
         Expression(NumberLiteral:1))))))"
    );
}

#[test]
fn nested_bare_block() {
    assert_eq!(
        stmt_tree("{ x = 1; }", 0),
        "Block(Assignment(Identifier:x, Expression(NumberLiteral:1)))"
    );
}

#[test]
fn and_binds_tighter_than_or() {
    assert_eq!(
        stmt_tree("x = a && b || c;", 0),
        "Assignment(Identifier:x, Expression(Boolean(Identifier:a, \
         Boolean(And, Expression(Identifier:b)), Or, Expression(Identifier:c))))"
    );
}

#[test]
fn comparison_after_arithmetic_keeps_its_operator() {
    assert_eq!(
        stmt_tree("x = 1 + 2 == 3;", 0),
        "Assignment(Identifier:x, Expression(Boolean(\
         Arithmetic(NumberLiteral:1, Sum, Expression(NumberLiteral:2)), \
         Eq, Expression(NumberLiteral:3))))"
    );
}

#[test]
fn parenthesized_group_becomes_a_queued_subexpression() {
    assert_eq!(
        stmt_tree("x = (1 + 2) * 3;", 0),
        "Assignment(Identifier:x, Expression(Arithmetic(\
         Expression(Arithmetic(NumberLiteral:1, Sum, Expression(NumberLiteral:2))), \
         Arithmetic(Mul, Expression(NumberLiteral:3)))))"
    );
}

#[test]
fn call_inside_arithmetic_operand() {
    assert_eq!(
        stmt_tree("x = 1 + f(2);", 0),
        "Assignment(Identifier:x, Expression(Arithmetic(NumberLiteral:1, Sum, \
         Expression(Call(Identifier:f, Arguments(Argument(Expression(NumberLiteral:2))))))))"
    );
}

#[test]
fn string_operands_reject_arithmetic() {
    let err = parse_err("package demo; fun main() { x = \"a\" + \"b\"; }");
    assert_eq!(err.kind, DiagnosticKind::UnexpectedToken);
}

#[test]
fn string_operands_allow_comparison() {
    assert_eq!(
        stmt_tree("x = \"s\" == \"done\";", 0),
        "Assignment(Identifier:x, Expression(Boolean(StringLiteral:s, Eq, \
         Expression(StringLiteral:done))))"
    );
}

#[test]
fn missing_operand_fails() {
    let err = parse_err("package demo; fun main() { x = 1 + ; }");
    assert_eq!(err.kind, DiagnosticKind::UnexpectedToken);
}

#[test]
fn missing_semicolon_fails() {
    let err = parse_err("package demo; fun main() { return 0 }");
    assert_eq!(err.kind, DiagnosticKind::UnexpectedToken);
}

#[test]
fn empty_expression_fails() {
    let err = parse_err("package demo; fun main() { let x: num = ; }");
    assert_eq!(err.kind, DiagnosticKind::UnexpectedToken);
}

#[test]
fn public_function_carries_a_public_child() {
    let (cx, root) = parse_source("package demo; pub fun api() { return 0; }");
    let function = cx.nodes[root].children[1];
    assert_eq!(cx.nodes[cx.nodes[function].children[0]].rule, AstRule::Public);
}

#[test]
fn function_with_arguments_and_return_type() {
    let (cx, root) = parse_source("package demo; fun add(a: num, b: num) -> num { return a + b; }");
    let function = cx.nodes[root].children[1];
    assert_eq!(
        tree(&cx, function),
        "Function(Identifier:add, \
         Arguments(Argument(Identifier:a, Type(Num)), Argument(Identifier:b, Type(Num))), \
         Type(Num), \
         Block(Return(Expression(Arithmetic(Identifier:a, Sum, Expression(Identifier:b))))))"
    );
}

#[test]
fn pub_before_import_fails() {
    let err = parse_err("package demo; pub import \"other.zx\";");
    assert_eq!(err.kind, DiagnosticKind::UnexpectedToken);
}

#[test]
fn pub_at_end_of_input_fails() {
    let err = parse_err("package demo; fun main() { return 0; } pub");
    assert_eq!(err.kind, DiagnosticKind::UnexpectedToken);
}

#[test]
fn import_after_function_is_illegal() {
    let err = parse_err("package demo; fun main() { return 0; } import \"late.zx\";");
    assert_eq!(err.kind, DiagnosticKind::IllegalImport);
}

#[test]
fn import_in_prelude_stores_its_path() {
    let (cx, root) = parse_source("package demo; import \"util.zx\"; fun main() { return 0; }");
    assert_eq!(tree(&cx, cx.nodes[root].children[1]), "Import:util.zx");
}

#[test]
fn mod_with_derive_and_members() {
    let (cx, root) = parse_source(
        "package demo;\n\
         pub mod counter {\n\
           derive Printable, Comparable;\n\
           let count: num = 0;\n\
           const max: num = 100;\n\
           pub fun bump() { return 0; }\n\
         }",
    );
    let module = cx.nodes[root].children[1];
    assert_eq!(
        tree(&cx, module),
        "Mod(Public, Identifier:counter, \
         Derive(Identifier:Printable, Identifier:Comparable), \
         Declaration(Identifier:count, Type(Num), Expression(NumberLiteral:0)), \
         ConstDeclaration(Identifier:max, Type(Num), Expression(NumberLiteral:100)), \
         Function(Public, Identifier:bump, Block(Return(Expression(NumberLiteral:0)))))"
    );
}

#[test]
fn trailing_derive_fails() {
    let err = parse_err("package demo; mod broken { let x: num = 0; derive Printable; }");
    assert_eq!(err.kind, DiagnosticKind::UnexpectedToken);
}

#[test]
fn derive_with_trailing_comma_fails() {
    let err = parse_err("package demo; mod broken { derive Printable,; let x: num = 0; }");
    assert_eq!(err.kind, DiagnosticKind::UnexpectedToken);
}

#[test]
fn unexpected_top_level_token_reports_its_position() {
    let err = parse_err("package demo;\nreturn 0;");
    assert_eq!(err.kind, DiagnosticKind::UnexpectedToken);
    assert_eq!(err.line, 2);
    assert_eq!(err.column, 1);
}

#[test]
fn unclosed_block_fails() {
    let err = parse_err("package demo; fun main() { return 0;");
    assert_eq!(err.kind, DiagnosticKind::UnexpectedToken);
}

#[test]
fn every_identifier_and_literal_leaf_carries_a_value() {
    let (cx, root) = parse_source(
        "package app.core;\n\
         import \"x.zx\";\n\
         fun main(flag: bool) -> num {\n\
           let s: str = \"hi\";\n\
           if flag { return 1; }\n\
           return s.len();\n\
         }",
    );

    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        let n = &cx.nodes[node];
        if matches!(
            n.rule,
            AstRule::Identifier
                | AstRule::StringLiteral
                | AstRule::NumberLiteral
                | AstRule::DecimalLiteral
        ) {
            let value = n.value.expect("leaf must carry a value");
            if n.rule != AstRule::StringLiteral {
                assert!(!cx.interner.resolve(value).is_empty());
            }
        }
        stack.extend(n.children.iter().copied());
    }
}
