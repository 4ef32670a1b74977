use super::ast::*;
use super::parse;
use crate::lexer::lex;

/// 辅助函数：词法加语法分析，断言两个阶段都没有错误。
fn parse_ok(src: &str) -> Program {
    let (tokens, lex_errors) = lex(src);
    assert!(lex_errors.is_empty(), "lexer errors: {:?}", lex_errors);
    let (program, parse_errors) = parse(&tokens);
    assert!(parse_errors.is_empty(), "parser errors: {:?}", parse_errors);
    program
}

#[test]
fn test_global_declaration_with_array() {
    let program = parse_ok("int x, a[10];");
    assert_eq!(program.units.len(), 1);
    let Unit::VarDecl(decl) = &program.units[0] else {
        panic!("expected a variable declaration");
    };
    assert_eq!(decl.type_spec.kind, TypeKind::Int);
    assert_eq!(decl.declarators.len(), 2);
    assert_eq!(decl.declarators[0].name.name, "x");
    assert!(decl.declarators[0].array_size.is_none());
    assert_eq!(decl.declarators[1].name.name, "a");
    assert_eq!(
        decl.declarators[1].array_size.as_ref().map(|s| s.value),
        Some(10)
    );
}

#[test]
fn test_function_prototype_allows_unnamed_parameters() {
    let program = parse_ok("int add(int, float b);");
    let Unit::FuncDecl(decl) = &program.units[0] else {
        panic!("expected a function prototype");
    };
    assert_eq!(decl.name.name, "add");
    assert_eq!(decl.params.len(), 2);
    assert!(decl.params[0].name.is_none());
    assert_eq!(decl.params[1].name.as_ref().map(|n| n.name.as_str()), Some("b"));
}

#[test]
fn test_function_definition_with_body() {
    let program = parse_ok("void f(){ int x; x = 1; }");
    let Unit::FuncDef(def) = &program.units[0] else {
        panic!("expected a function definition");
    };
    assert_eq!(def.return_type.kind, TypeKind::Void);
    assert_eq!(def.body.statements.len(), 2);
}

#[test]
fn test_assignment_target_must_be_a_variable() {
    let (tokens, _) = lex("int main(){ 1 = 2; }");
    let (_, errors) = parse(&tokens);
    assert!(!errors.is_empty());
}

#[test]
fn test_expression_layers_build_left_associative_terms() {
    let program = parse_ok("int main(){ x = 1 - 2 - 3; }");
    let Unit::FuncDef(def) = &program.units[0] else {
        panic!("expected a function definition");
    };
    let StatementKind::Expr(stmt) = &def.body.statements[0].kind else {
        panic!("expected an expression statement");
    };
    let ExprKind::Assign { value, .. } = &stmt.expr.as_ref().unwrap().kind else {
        panic!("expected an assignment");
    };
    // (1 - 2) - 3：外层的左操作数本身是一个减法
    let ExprKind::Binary { left, .. } = &value.kind else {
        panic!("expected a binary expression");
    };
    assert!(matches!(left.kind, ExprKind::Binary { .. }));
}

#[test]
fn test_for_loop_shape() {
    let program = parse_ok("int main(){ for(i=0;i<10;i++) x = x + 1; }");
    let Unit::FuncDef(def) = &program.units[0] else {
        panic!("expected a function definition");
    };
    let StatementKind::For { init, condition, step, .. } = &def.body.statements[0].kind else {
        panic!("expected a for statement");
    };
    assert!(init.expr.is_some());
    assert!(condition.expr.is_some());
    assert!(matches!(step.kind, ExprKind::IncDec { .. }));
}

#[test]
fn test_nested_call_arguments() {
    let program = parse_ok("int main(){ x = f(g(1), 2); }");
    let Unit::FuncDef(def) = &program.units[0] else {
        panic!("expected a function definition");
    };
    let StatementKind::Expr(stmt) = &def.body.statements[0].kind else {
        panic!("expected an expression statement");
    };
    let ExprKind::Assign { value, .. } = &stmt.expr.as_ref().unwrap().kind else {
        panic!("expected an assignment");
    };
    let ExprKind::Call { args, .. } = &value.kind else {
        panic!("expected a call");
    };
    assert_eq!(args.len(), 2);
    assert!(matches!(args[0].kind, ExprKind::Call { .. }));
}

#[test]
fn test_recovery_continues_after_a_bad_statement() {
    let (tokens, _) = lex("int main(){ int x; return ; x = 1; }");
    let (program, errors) = parse(&tokens);
    assert!(!errors.is_empty());
    // 恢复之后函数体里应当仍然解析出了后续语句
    let Unit::FuncDef(def) = &program.units[0] else {
        panic!("expected a function definition");
    };
    assert!(def.body.statements.len() >= 2);
}
