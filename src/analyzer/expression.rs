// In src/analyzer/expression.rs

use super::semantic_error::SemanticError;
use super::trace::{promote, ExprLevel};
use super::types::{DataType, NodeKind};
use super::Analyzer;
use crate::lexer::MulSign;
use crate::parser::ast;
use crate::renderer;
use crate::utils::Span;

/// `ExpressionChecker` Trait 负责自底向上的表达式类型传播。
///
/// 每个方法对应一类产生式：先处理子节点，再记录本节点的归约，
/// 最后做本节点的检查并返回传播出的类型。查找失败时返回 int 占位，
/// 让上层的检查得以继续，避免一个错误层层放大。
pub(super) trait ExpressionChecker {
    /// 检查任意表达式，并把它从自然层级提升到 `expected` 层级。
    fn check_expression(&mut self, expr: &ast::Expression, expected: ExprLevel) -> DataType;
    /// 检查变量引用（裸标识符或下标形式）。
    fn check_variable(&mut self, var: &ast::Variable) -> DataType;
    /// 检查函数调用并核对签名。
    fn check_call(&mut self, name: &ast::Ident, args: &[ast::Expression], span: Span) -> DataType;
    /// 检查二元运算。
    fn check_binary(
        &mut self,
        op: ast::BinaryOp,
        left: &ast::Expression,
        right: &ast::Expression,
        span: Span,
    ) -> DataType;
    /// 检查赋值表达式。
    fn check_assignment(
        &mut self,
        target: &ast::Variable,
        value: &ast::Expression,
        span: Span,
    ) -> DataType;
}

impl<'a> ExpressionChecker for Analyzer<'a> {
    fn check_expression(&mut self, expr: &ast::Expression, expected: ExprLevel) -> DataType {
        let line = self.line_of(expr.span);
        let fragment = renderer::render_expression(expr);

        let (data_type, natural) = match &expr.kind {
            ast::ExprKind::ConstInt(_) => {
                self.trace.reduction(line, "factor : CONST_INT", &fragment);
                (DataType::Int, ExprLevel::Factor)
            }
            ast::ExprKind::ConstFloat(_) => {
                self.trace.reduction(line, "factor : CONST_FLOAT", &fragment);
                (DataType::Float, ExprLevel::Factor)
            }
            ast::ExprKind::Variable(var) => (self.check_variable(var), ExprLevel::Variable),
            ast::ExprKind::Call { name, args } => {
                (self.check_call(name, args, expr.span), ExprLevel::Factor)
            }
            ast::ExprKind::Paren(inner) => {
                let inner_type = self.check_expression(inner, ExprLevel::Expression);
                self.trace
                    .reduction(line, "factor : LPAREN expression RPAREN", &fragment);
                (inner_type, ExprLevel::Factor)
            }
            ast::ExprKind::Unary { op, operand } => {
                let operand_type = self.check_expression(operand, ExprLevel::Unary);
                let production = match op {
                    ast::UnaryOp::Plus | ast::UnaryOp::Minus => {
                        "unary_expression : ADDOP unary_expression"
                    }
                    ast::UnaryOp::Not => "unary_expression : NOT unary_expression",
                };
                self.trace.reduction(line, production, &fragment);
                // 一元运算不引入类型变化，结果继承操作数
                (operand_type, ExprLevel::Unary)
            }
            ast::ExprKind::IncDec { target, op } => {
                let target_type = self.check_variable(target);
                let production = match op {
                    ast::IncDecOp::Increment => "factor : variable INCOP",
                    ast::IncDecOp::Decrement => "factor : variable DECOP",
                };
                self.trace.reduction(line, production, &fragment);
                (target_type, ExprLevel::Factor)
            }
            ast::ExprKind::Binary { op, left, right } => {
                let natural = match op {
                    ast::BinaryOp::Add(_) => ExprLevel::Simple,
                    ast::BinaryOp::Mul(_) => ExprLevel::Term,
                    ast::BinaryOp::Rel(_) => ExprLevel::Rel,
                    ast::BinaryOp::Logic(_) => ExprLevel::Logic,
                };
                (self.check_binary(*op, left, right, expr.span), natural)
            }
            ast::ExprKind::Assign { target, value } => (
                self.check_assignment(target, value, expr.span),
                ExprLevel::Expression,
            ),
        };

        promote(&mut self.trace, natural, expected, line, &fragment);
        data_type
    }

    fn check_variable(&mut self, var: &ast::Variable) -> DataType {
        let line = self.line_of(var.span);
        let fragment = renderer::render_variable(var);
        let name = var.name.name.clone();

        match &var.index {
            // 裸标识符
            None => {
                self.trace.reduction(line, "variable : ID", &fragment);
                let record = self.symbol_table.lookup(&name).cloned();
                match record {
                    None => {
                        self.report(SemanticError::UndeclaredVariable {
                            name,
                            span: var.span,
                        });
                        DataType::Int
                    }
                    Some(record) => {
                        // 数组名不带下标不能出现在表达式里
                        if record.node_kind == NodeKind::Array {
                            self.report(SemanticError::ArrayUsedWithoutIndex {
                                name,
                                span: var.span,
                            });
                        }
                        record.data_type
                    }
                }
            }
            // 下标形式
            Some(index) => {
                let index_type = self.check_expression(index, ExprLevel::Expression);
                self.trace
                    .reduction(line, "variable : ID LTHIRD expression RTHIRD", &fragment);

                let element_type = match self.symbol_table.lookup(&name) {
                    Some(record) if record.node_kind == NodeKind::Array => Some(record.data_type),
                    _ => None,
                };
                if element_type.is_none() {
                    self.report(SemanticError::IndexOnNonArray {
                        name: name.clone(),
                        span: var.span,
                    });
                }
                if !index_type.is_int() {
                    self.report(SemanticError::NonIntegerIndex {
                        name,
                        span: var.span,
                    });
                }
                // 失败时退回 int，让类型传播继续
                element_type.unwrap_or(DataType::Int)
            }
        }
    }

    fn check_call(&mut self, name: &ast::Ident, args: &[ast::Expression], span: Span) -> DataType {
        let line = self.line_of(span);

        // 实参逐个分析；实参缓冲属于本次调用，嵌套调用互不干扰
        let mut arg_types = Vec::with_capacity(args.len());
        let mut rendered_args = Vec::new();
        for (i, arg) in args.iter().enumerate() {
            arg_types.push(self.check_expression(arg, ExprLevel::Logic));
            rendered_args.push(renderer::render_expression(arg));
            let production = if i == 0 {
                "arguments : logic_expression"
            } else {
                "arguments : arguments COMMA logic_expression"
            };
            self.trace
                .reduction(self.line_of(arg.span), production, &rendered_args.join(","));
        }
        let rendered_args = rendered_args.join(",");
        if args.is_empty() {
            self.trace.reduction(line, "argument_list : ", "");
        } else {
            self.trace
                .reduction(line, "argument_list : arguments", &rendered_args);
        }
        let fragment = format!("{}({})", name.name, rendered_args);
        self.trace
            .reduction(line, "factor : ID LPAREN argument_list RPAREN", &fragment);

        let record = self.symbol_table.lookup(&name.name).cloned();
        match record {
            None => {
                self.report(SemanticError::UndeclaredFunction {
                    name: name.name.clone(),
                    span,
                });
                DataType::Int
            }
            Some(record) if record.node_kind != NodeKind::Function => {
                self.report(SemanticError::CallOfNonFunction {
                    name: name.name.clone(),
                    span,
                });
                record.data_type
            }
            Some(record) => {
                if arg_types.len() != record.parameters.len() {
                    self.report(SemanticError::ArgumentCountMismatch {
                        name: name.name.clone(),
                        span,
                    });
                } else {
                    for (index, (arg_type, param)) in
                        arg_types.iter().zip(&record.parameters).enumerate()
                    {
                        if *arg_type != param.data_type {
                            self.report(SemanticError::ArgumentTypeMismatch {
                                index: index + 1,
                                name: name.name.clone(),
                                span,
                            });
                        }
                    }
                }
                record.return_type.unwrap_or(record.data_type)
            }
        }
    }

    fn check_binary(
        &mut self,
        op: ast::BinaryOp,
        left: &ast::Expression,
        right: &ast::Expression,
        span: Span,
    ) -> DataType {
        let line = self.line_of(span);

        match op {
            ast::BinaryOp::Add(sign) => {
                let left_type = self.check_expression(left, ExprLevel::Simple);
                let right_type = self.check_expression(right, ExprLevel::Term);
                let fragment = format!(
                    "{}{}{}",
                    renderer::render_expression(left),
                    sign,
                    renderer::render_expression(right)
                );
                self.trace.reduction(
                    line,
                    "simple_expression : simple_expression ADDOP term",
                    &fragment,
                );
                arithmetic_result(left_type, right_type)
            }
            ast::BinaryOp::Mul(sign) => {
                let left_type = self.check_expression(left, ExprLevel::Term);
                let right_type = self.check_expression(right, ExprLevel::Unary);
                let fragment = format!(
                    "{}{}{}",
                    renderer::render_expression(left),
                    sign,
                    renderer::render_expression(right)
                );
                self.trace
                    .reduction(line, "term : term MULOP unary_expression", &fragment);

                match sign {
                    MulSign::Modulus => {
                        // 取模只接受 int 操作数，结果恒为 int
                        if !left_type.is_int() || !right_type.is_int() {
                            self.report(SemanticError::ModulusOnNonInteger { span });
                        }
                        if renderer::render_expression(right) == "0" {
                            self.report(SemanticError::ModulusByZero { span });
                        }
                        DataType::Int
                    }
                    MulSign::Divide => {
                        // 除零检查是文本级的：右操作数原文恰为 "0" 才算
                        if renderer::render_expression(right) == "0" {
                            self.report(SemanticError::DivisionByZero { span });
                        }
                        arithmetic_result(left_type, right_type)
                    }
                    MulSign::Times => arithmetic_result(left_type, right_type),
                }
            }
            ast::BinaryOp::Rel(sign) => {
                let _ = self.check_expression(left, ExprLevel::Simple);
                let _ = self.check_expression(right, ExprLevel::Simple);
                let fragment = format!(
                    "{}{}{}",
                    renderer::render_expression(left),
                    sign,
                    renderer::render_expression(right)
                );
                self.trace.reduction(
                    line,
                    "rel_expression : simple_expression RELOP simple_expression",
                    &fragment,
                );
                DataType::Int
            }
            ast::BinaryOp::Logic(sign) => {
                let _ = self.check_expression(left, ExprLevel::Rel);
                let _ = self.check_expression(right, ExprLevel::Rel);
                let fragment = format!(
                    "{}{}{}",
                    renderer::render_expression(left),
                    sign,
                    renderer::render_expression(right)
                );
                self.trace.reduction(
                    line,
                    "logic_expression : rel_expression LOGICOP rel_expression",
                    &fragment,
                );
                DataType::Int
            }
        }
    }

    fn check_assignment(
        &mut self,
        target: &ast::Variable,
        value: &ast::Expression,
        span: Span,
    ) -> DataType {
        let line = self.line_of(span);

        // 文法：expression : variable ASSIGNOP logic_expression
        // 左边保持在 variable 层级，不做提升
        let lhs = self.check_variable(target);
        let rhs = self.check_expression(value, ExprLevel::Logic);

        let fragment = format!(
            "{}={}",
            renderer::render_variable(target),
            renderer::render_expression(value)
        );
        self.trace.reduction(
            line,
            "expression : variable ASSIGNOP logic_expression",
            &fragment,
        );

        if rhs.is_void() {
            self.report(SemanticError::OperationOnVoid { span });
        } else if lhs != rhs {
            if lhs.is_int() && rhs.is_float() {
                // 唯一允许的收窄：float 赋给 int，降级为警告但仍计数
                self.report(SemanticError::FloatNarrowing { span });
            } else {
                self.report(SemanticError::AssignmentTypeMismatch { lhs, rhs, span });
            }
        }
        lhs
    }
}

/// 四则运算的结果类型：任一侧为 float 则为 float，两侧都是 int 则为
/// int，其余情况继承左操作数。
fn arithmetic_result(left: DataType, right: DataType) -> DataType {
    if left.is_float() || right.is_float() {
        DataType::Float
    } else if left.is_int() && right.is_int() {
        DataType::Int
    } else {
        left
    }
}
