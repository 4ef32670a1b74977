//! 把 AST 还原为源代码文本。
//!
//! 分析器不负责排版：归约日志里的代码片段、以及除零检查用到的
//! “右操作数原文”，都由这里统一产出。渲染是规范化的
//! （`int x,y;` 风格），不保留原始空白。

use crate::parser::ast::*;

pub fn render_program(program: &Program) -> String {
    program
        .units
        .iter()
        .map(render_unit)
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_unit(unit: &Unit) -> String {
    match unit {
        Unit::VarDecl(decl) => render_var_declaration(decl),
        Unit::FuncDecl(decl) => render_func_declaration(decl),
        Unit::FuncDef(def) => render_func_definition(def),
    }
}

pub fn render_type(kind: TypeKind) -> &'static str {
    match kind {
        TypeKind::Int => "int",
        TypeKind::Float => "float",
        TypeKind::Void => "void",
    }
}

pub fn render_declarator(declarator: &Declarator) -> String {
    match &declarator.array_size {
        Some(size) => format!("{}[{}]", declarator.name.name, size.text),
        None => declarator.name.name.clone(),
    }
}

pub fn render_var_declaration(decl: &VarDeclaration) -> String {
    let declarators = decl
        .declarators
        .iter()
        .map(render_declarator)
        .collect::<Vec<_>>()
        .join(",");
    format!("{} {};", render_type(decl.type_spec.kind), declarators)
}

pub fn render_param(param: &ParamDecl) -> String {
    match &param.name {
        Some(name) => format!("{} {}", render_type(param.type_spec.kind), name.name),
        None => render_type(param.type_spec.kind).to_string(),
    }
}

pub fn render_params(params: &[ParamDecl]) -> String {
    params.iter().map(render_param).collect::<Vec<_>>().join(",")
}

pub fn render_func_declaration(decl: &FuncDeclaration) -> String {
    format!(
        "{} {}({});",
        render_type(decl.return_type.kind),
        decl.name.name,
        render_params(&decl.params)
    )
}

pub fn render_func_definition(def: &FuncDefinition) -> String {
    format!(
        "{} {}({}){}",
        render_type(def.return_type.kind),
        def.name.name,
        render_params(&def.params),
        render_compound(&def.body)
    )
}

pub fn render_compound(block: &CompoundStatement) -> String {
    if block.statements.is_empty() {
        return "{}".to_string();
    }
    let body = block
        .statements
        .iter()
        .map(render_statement)
        .collect::<Vec<_>>()
        .join("\n");
    format!("{{\n{}\n}}", body)
}

pub fn render_statement(stmt: &Statement) -> String {
    match &stmt.kind {
        StatementKind::VarDecl(decl) => render_var_declaration(decl),
        StatementKind::Expr(expr_stmt) => render_expression_statement(expr_stmt),
        StatementKind::Compound(block) => render_compound(block),
        StatementKind::If {
            condition,
            then_branch,
            else_branch,
        } => {
            let mut out = format!(
                "if({}){}",
                render_expression(condition),
                render_statement(then_branch)
            );
            if let Some(else_branch) = else_branch {
                out.push_str(&format!("else {}", render_statement(else_branch)));
            }
            out
        }
        StatementKind::While { condition, body } => {
            format!(
                "while({}){}",
                render_expression(condition),
                render_statement(body)
            )
        }
        StatementKind::For {
            init,
            condition,
            step,
            body,
        } => {
            format!(
                "for({}{}{}){}",
                render_expression_statement(init),
                render_expression_statement(condition),
                render_expression(step),
                render_statement(body)
            )
        }
        StatementKind::Println { arg } => format!("printf({});", arg.name),
        StatementKind::Return { value } => format!("return {};", render_expression(value)),
    }
}

pub fn render_expression_statement(stmt: &ExpressionStatement) -> String {
    match &stmt.expr {
        Some(expr) => format!("{};", render_expression(expr)),
        None => ";".to_string(),
    }
}

pub fn render_variable(var: &Variable) -> String {
    match &var.index {
        Some(index) => format!("{}[{}]", var.name.name, render_expression(index)),
        None => var.name.name.clone(),
    }
}

pub fn render_expression(expr: &Expression) -> String {
    match &expr.kind {
        ExprKind::ConstInt(text) => text.clone(),
        ExprKind::ConstFloat(text) => text.clone(),
        ExprKind::Variable(var) => render_variable(var),
        ExprKind::Call { name, args } => {
            let args = args
                .iter()
                .map(render_expression)
                .collect::<Vec<_>>()
                .join(",");
            format!("{}({})", name.name, args)
        }
        ExprKind::Unary { op, operand } => {
            let sign = match op {
                UnaryOp::Plus => "+",
                UnaryOp::Minus => "-",
                UnaryOp::Not => "!",
            };
            format!("{}{}", sign, render_expression(operand))
        }
        ExprKind::IncDec { target, op } => {
            let sign = match op {
                IncDecOp::Increment => "++",
                IncDecOp::Decrement => "--",
            };
            format!("{}{}", render_variable(target), sign)
        }
        ExprKind::Binary { op, left, right } => {
            let sign = match op {
                BinaryOp::Add(sign) => sign.to_string(),
                BinaryOp::Mul(sign) => sign.to_string(),
                BinaryOp::Rel(sign) => sign.to_string(),
                BinaryOp::Logic(sign) => sign.to_string(),
            };
            format!(
                "{}{}{}",
                render_expression(left),
                sign,
                render_expression(right)
            )
        }
        ExprKind::Assign { target, value } => {
            format!("{}={}", render_variable(target), render_expression(value))
        }
        ExprKind::Paren(inner) => format!("({})", render_expression(inner)),
    }
}
