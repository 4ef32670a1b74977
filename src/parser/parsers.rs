//! MiniC 语言的解析器实现。
//! 该版本采用递归下降技术，按文法的分层产生式
//! （logic / rel / simple / term / unary / factor）将 Token 流转换为 AST。

use super::ast::*;
use crate::lexer::Token;
use crate::reporter::{CompilerError, ParserError};
use crate::utils::Span;

// --- 1. 主解析器结构体 ---

/// 解析器结构体，持有解析过程所需的全部状态。
pub struct Parser<'a> {
    /// 从 Lexer 获取的 Token 流的引用。
    tokens: &'a [(Token, Span)],
    /// 收集到的所有语法错误。
    errors: Vec<CompilerError>,
    /// 指向当前待处理 Token 的指针（在 tokens 切片中的索引）。
    current: usize,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: &'a [(Token, Span)]) -> Self {
        Self {
            tokens,
            errors: Vec::new(),
            current: 0,
        }
    }
}

// --- 2. Trait 定义：用于组织解析逻辑 ---

/// `Parse` Trait 是解析器的总入口。
pub trait Parse {
    /// 消耗解析器并启动整个解析过程，最终生成一个 `Program` AST 节点。
    /// 即使存在语法错误也会返回尽力恢复出的 AST。
    fn parse(self) -> (Program, Vec<CompilerError>);
}

/// `UnitParser` Trait 负责解析顶层单元。
trait UnitParser {
    /// 解析一个顶层单元（全局变量声明、函数原型或函数定义）。
    fn parse_unit(&mut self) -> Result<Unit, ()>;
    /// 解析函数形参列表（不含括号）。
    fn parse_parameter_list(&mut self) -> Result<Vec<ParamDecl>, ()>;
}

/// `StatementParser` Trait 负责解析各类语句。
trait StatementParser {
    /// 解析任意类型的语句。
    fn parse_statement(&mut self) -> Result<Statement, ()>;
    /// 解析一个变量声明（也用于全局变量，首标识符已被消费）。
    fn parse_declaration_rest(
        &mut self,
        type_spec: TypeSpecifier,
        first: Ident,
    ) -> Result<VarDeclaration, ()>;
    /// 解析声明列表中的单个条目（标识符已被消费，处理可选的方括号）。
    fn parse_declarator_tail(&mut self, name: Ident) -> Result<Declarator, ()>;
    /// 解析一个 `{...}` 代码块。
    fn parse_compound_statement(&mut self) -> Result<CompoundStatement, ()>;
    /// 解析一个表达式语句（`;` 或 `expression ;`）。
    fn parse_expression_statement(&mut self) -> Result<ExpressionStatement, ()>;
    /// 解析一个类型说明符。
    fn parse_type_specifier(&mut self) -> Result<TypeSpecifier, ()>;
}

/// `ExpressionParser` Trait 负责按文法分层解析表达式。
trait ExpressionParser {
    /// 表达式入口：`logic_expression` 或 `variable = logic_expression`。
    fn parse_expression(&mut self) -> Result<Expression, ()>;
    fn parse_logic_expression(&mut self) -> Result<Expression, ()>;
    fn parse_rel_expression(&mut self) -> Result<Expression, ()>;
    fn parse_simple_expression(&mut self) -> Result<Expression, ()>;
    fn parse_term(&mut self) -> Result<Expression, ()>;
    fn parse_unary_expression(&mut self) -> Result<Expression, ()>;
    fn parse_factor(&mut self) -> Result<Expression, ()>;
    /// 解析变量引用（标识符已被消费，处理可选的下标）。
    fn parse_variable_tail(&mut self, name: Ident) -> Result<Variable, ()>;
    /// 解析函数调用的实参列表（不含括号）。
    fn parse_call_arguments(&mut self) -> Result<Vec<Expression>, ()>;
}

/// `Util` Trait 提供了解析过程中常用的一系列辅助函数。
trait Util {
    /// 查看当前的 Token。
    fn peek(&self) -> Option<&Token>;
    /// 当前 Token 的 span；到达末尾时返回最后一个 Token 之后的空范围。
    fn peek_span(&self) -> Span;
    /// 前一个刚刚被消费的 Token 的 span。
    fn previous_span(&self) -> Span;
    /// 检查是否已到达 Token 流的末尾。
    fn is_at_end(&self) -> bool;
    /// 消费当前 Token 并返回它的克隆，同时前移指针。
    fn advance(&mut self) -> Option<Token>;
    /// 用谓词检查当前 Token。
    fn check(&self, pred: fn(&Token) -> bool) -> bool;
    /// 如果当前 Token 满足谓词，则消费它并返回 `true`。
    fn match_token(&mut self, pred: fn(&Token) -> bool) -> bool;
    /// 消费一个满足谓词的 Token，否则报告错误。
    fn consume(&mut self, pred: fn(&Token) -> bool, expected: &str) -> Result<(), ()>;
    /// 消费并返回一个标识符。
    fn take_ident(&mut self, expected: &str) -> Result<Ident, ()>;
    /// 消费并返回一个整型常量（用于数组大小）。
    fn take_const_int(&mut self) -> Result<ArraySize, ()>;
    /// 当前 Token 是否是类型说明符。
    fn at_type_specifier(&self) -> bool;
    /// 在当前位置记录一个语法错误。
    fn error_at_current(&mut self, expected: &str);
    /// 错误恢复：丢弃 Token 直到一个安全的同步点，以便继续解析。
    fn synchronize(&mut self);
}

// --- 3. 入口实现 ---

impl<'a> Parse for Parser<'a> {
    fn parse(mut self) -> (Program, Vec<CompilerError>) {
        let mut units = Vec::new();
        while !self.is_at_end() {
            let before = self.current;
            match self.parse_unit() {
                Ok(unit) => units.push(unit),
                Err(()) => {
                    self.synchronize();
                    // 同步没有前进时强制跳过一个 Token，避免死循环
                    if self.current == before {
                        self.advance();
                    }
                }
            }
        }
        (Program { units }, self.errors)
    }
}

// --- 4. 顶层单元解析 ---

impl<'a> UnitParser for Parser<'a> {
    fn parse_unit(&mut self) -> Result<Unit, ()> {
        let type_spec = self.parse_type_specifier()?;
        let name = self.take_ident("an identifier after the type specifier")?;

        if self.match_token(|t| matches!(t, Token::LParen)) {
            // 函数原型或函数定义
            let params = if self.check(|t| matches!(t, Token::RParen)) {
                Vec::new()
            } else {
                self.parse_parameter_list()?
            };
            self.consume(|t| matches!(t, Token::RParen), "`)` after the parameter list")?;

            if self.match_token(|t| matches!(t, Token::Semicolon)) {
                let span = type_spec.span.to(self.previous_span());
                return Ok(Unit::FuncDecl(FuncDeclaration {
                    return_type: type_spec,
                    name,
                    params,
                    span,
                }));
            }

            if self.check(|t| matches!(t, Token::LCurl)) {
                let body = self.parse_compound_statement()?;
                let span = type_spec.span.to(body.span);
                return Ok(Unit::FuncDef(FuncDefinition {
                    return_type: type_spec,
                    name,
                    params,
                    body,
                    span,
                }));
            }

            self.error_at_current("`;` or a function body");
            return Err(());
        }

        // 全局变量声明
        let decl = self.parse_declaration_rest(type_spec, name)?;
        Ok(Unit::VarDecl(decl))
    }

    fn parse_parameter_list(&mut self) -> Result<Vec<ParamDecl>, ()> {
        let mut params = Vec::new();
        loop {
            let type_spec = self.parse_type_specifier()?;
            // 原型形式允许只写类型不写形参名
            let name = match self.peek() {
                Some(Token::Ident(_)) => Some(self.take_ident("a parameter name")?),
                _ => None,
            };
            let span = type_spec.span.to(self.previous_span());
            params.push(ParamDecl {
                type_spec,
                name,
                span,
            });
            if !self.match_token(|t| matches!(t, Token::Comma)) {
                break;
            }
        }
        Ok(params)
    }
}

// --- 5. 语句解析 ---

impl<'a> StatementParser for Parser<'a> {
    fn parse_statement(&mut self) -> Result<Statement, ()> {
        let start = self.peek_span();

        if self.at_type_specifier() {
            let type_spec = self.parse_type_specifier()?;
            let name = self.take_ident("an identifier after the type specifier")?;
            let decl = self.parse_declaration_rest(type_spec, name)?;
            let span = decl.span;
            return Ok(Statement {
                kind: StatementKind::VarDecl(decl),
                span,
            });
        }

        match self.peek() {
            Some(Token::LCurl) => {
                let block = self.parse_compound_statement()?;
                let span = block.span;
                Ok(Statement {
                    kind: StatementKind::Compound(block),
                    span,
                })
            }
            Some(Token::If) => {
                self.advance();
                self.consume(|t| matches!(t, Token::LParen), "`(` after `if`")?;
                let condition = self.parse_expression()?;
                self.consume(|t| matches!(t, Token::RParen), "`)` after the condition")?;
                let then_branch = Box::new(self.parse_statement()?);
                let else_branch = if self.match_token(|t| matches!(t, Token::Else)) {
                    Some(Box::new(self.parse_statement()?))
                } else {
                    None
                };
                let span = start.to(self.previous_span());
                Ok(Statement {
                    kind: StatementKind::If {
                        condition,
                        then_branch,
                        else_branch,
                    },
                    span,
                })
            }
            Some(Token::While) => {
                self.advance();
                self.consume(|t| matches!(t, Token::LParen), "`(` after `while`")?;
                let condition = self.parse_expression()?;
                self.consume(|t| matches!(t, Token::RParen), "`)` after the condition")?;
                let body = Box::new(self.parse_statement()?);
                let span = start.to(self.previous_span());
                Ok(Statement {
                    kind: StatementKind::While { condition, body },
                    span,
                })
            }
            Some(Token::For) => {
                self.advance();
                self.consume(|t| matches!(t, Token::LParen), "`(` after `for`")?;
                let init = self.parse_expression_statement()?;
                let condition = self.parse_expression_statement()?;
                let step = self.parse_expression()?;
                self.consume(|t| matches!(t, Token::RParen), "`)` after the loop header")?;
                let body = Box::new(self.parse_statement()?);
                let span = start.to(self.previous_span());
                Ok(Statement {
                    kind: StatementKind::For {
                        init,
                        condition,
                        step,
                        body,
                    },
                    span,
                })
            }
            Some(Token::Println) => {
                self.advance();
                self.consume(|t| matches!(t, Token::LParen), "`(` after `printf`")?;
                let arg = self.take_ident("a variable name")?;
                self.consume(|t| matches!(t, Token::RParen), "`)` after the argument")?;
                self.consume(|t| matches!(t, Token::Semicolon), "`;` after `printf(...)`")?;
                let span = start.to(self.previous_span());
                Ok(Statement {
                    kind: StatementKind::Println { arg },
                    span,
                })
            }
            Some(Token::Return) => {
                self.advance();
                let value = self.parse_expression()?;
                self.consume(|t| matches!(t, Token::Semicolon), "`;` after the return value")?;
                let span = start.to(self.previous_span());
                Ok(Statement {
                    kind: StatementKind::Return { value },
                    span,
                })
            }
            _ => {
                let stmt = self.parse_expression_statement()?;
                let span = stmt.span;
                Ok(Statement {
                    kind: StatementKind::Expr(stmt),
                    span,
                })
            }
        }
    }

    fn parse_declaration_rest(
        &mut self,
        type_spec: TypeSpecifier,
        first: Ident,
    ) -> Result<VarDeclaration, ()> {
        let mut declarators = vec![self.parse_declarator_tail(first)?];
        while self.match_token(|t| matches!(t, Token::Comma)) {
            let name = self.take_ident("an identifier after `,`")?;
            declarators.push(self.parse_declarator_tail(name)?);
        }
        self.consume(|t| matches!(t, Token::Semicolon), "`;` after the declaration")?;
        let span = type_spec.span.to(self.previous_span());
        Ok(VarDeclaration {
            type_spec,
            declarators,
            span,
        })
    }

    fn parse_declarator_tail(&mut self, name: Ident) -> Result<Declarator, ()> {
        let array_size = if self.match_token(|t| matches!(t, Token::LThird)) {
            let size = self.take_const_int()?;
            self.consume(|t| matches!(t, Token::RThird), "`]` after the array size")?;
            Some(size)
        } else {
            None
        };
        let span = name.span.to(self.previous_span());
        Ok(Declarator {
            name,
            array_size,
            span,
        })
    }

    fn parse_compound_statement(&mut self) -> Result<CompoundStatement, ()> {
        let start = self.peek_span();
        self.consume(|t| matches!(t, Token::LCurl), "`{`")?;

        let mut statements = Vec::new();
        while !self.check(|t| matches!(t, Token::RCurl)) && !self.is_at_end() {
            let before = self.current;
            match self.parse_statement() {
                Ok(stmt) => statements.push(stmt),
                Err(()) => {
                    self.synchronize();
                    // 同步没有前进时强制跳过一个 Token，避免死循环
                    if self.current == before {
                        self.advance();
                    }
                }
            }
        }

        self.consume(|t| matches!(t, Token::RCurl), "`}` to close the block")?;
        let span = start.to(self.previous_span());
        Ok(CompoundStatement { statements, span })
    }

    fn parse_expression_statement(&mut self) -> Result<ExpressionStatement, ()> {
        let start = self.peek_span();
        if self.match_token(|t| matches!(t, Token::Semicolon)) {
            return Ok(ExpressionStatement {
                expr: None,
                span: start.to(self.previous_span()),
            });
        }
        let expr = self.parse_expression()?;
        self.consume(|t| matches!(t, Token::Semicolon), "`;` after the expression")?;
        Ok(ExpressionStatement {
            expr: Some(expr),
            span: start.to(self.previous_span()),
        })
    }

    fn parse_type_specifier(&mut self) -> Result<TypeSpecifier, ()> {
        let span = self.peek_span();
        let kind = match self.peek() {
            Some(Token::Int) => TypeKind::Int,
            Some(Token::Float) => TypeKind::Float,
            Some(Token::Void) => TypeKind::Void,
            _ => {
                self.error_at_current("a type specifier (`int`, `float` or `void`)");
                return Err(());
            }
        };
        self.advance();
        Ok(TypeSpecifier { kind, span })
    }
}

// --- 6. 表达式解析 ---

impl<'a> ExpressionParser for Parser<'a> {
    fn parse_expression(&mut self) -> Result<Expression, ()> {
        let start = self.peek_span();
        let left = self.parse_logic_expression()?;

        if self.check(|t| matches!(t, Token::AssignOp)) {
            // 文法要求赋值号左边必须是 variable
            return match left.kind {
                ExprKind::Variable(target) => {
                    self.advance();
                    let value = self.parse_logic_expression()?;
                    let span = start.to(self.previous_span());
                    Ok(Expression {
                        kind: ExprKind::Assign {
                            target,
                            value: Box::new(value),
                        },
                        span,
                    })
                }
                _ => {
                    self.error_at_current("a variable on the left-hand side of `=`");
                    Err(())
                }
            };
        }

        Ok(left)
    }

    fn parse_logic_expression(&mut self) -> Result<Expression, ()> {
        let start = self.peek_span();
        let left = self.parse_rel_expression()?;
        // 文法里逻辑运算符不结合：一个 logic_expression 至多一个 LOGICOP
        if let Some(Token::LogicOp(sign)) = self.peek() {
            let sign = *sign;
            self.advance();
            let right = self.parse_rel_expression()?;
            let span = start.to(self.previous_span());
            return Ok(Expression {
                kind: ExprKind::Binary {
                    op: BinaryOp::Logic(sign),
                    left: Box::new(left),
                    right: Box::new(right),
                },
                span,
            });
        }
        Ok(left)
    }

    fn parse_rel_expression(&mut self) -> Result<Expression, ()> {
        let start = self.peek_span();
        let left = self.parse_simple_expression()?;
        if let Some(Token::RelOp(sign)) = self.peek() {
            let sign = *sign;
            self.advance();
            let right = self.parse_simple_expression()?;
            let span = start.to(self.previous_span());
            return Ok(Expression {
                kind: ExprKind::Binary {
                    op: BinaryOp::Rel(sign),
                    left: Box::new(left),
                    right: Box::new(right),
                },
                span,
            });
        }
        Ok(left)
    }

    fn parse_simple_expression(&mut self) -> Result<Expression, ()> {
        let start = self.peek_span();
        let mut left = self.parse_term()?;
        while let Some(Token::AddOp(sign)) = self.peek() {
            let sign = *sign;
            self.advance();
            let right = self.parse_term()?;
            let span = start.to(self.previous_span());
            left = Expression {
                kind: ExprKind::Binary {
                    op: BinaryOp::Add(sign),
                    left: Box::new(left),
                    right: Box::new(right),
                },
                span,
            };
        }
        Ok(left)
    }

    fn parse_term(&mut self) -> Result<Expression, ()> {
        let start = self.peek_span();
        let mut left = self.parse_unary_expression()?;
        while let Some(Token::MulOp(sign)) = self.peek() {
            let sign = *sign;
            self.advance();
            let right = self.parse_unary_expression()?;
            let span = start.to(self.previous_span());
            left = Expression {
                kind: ExprKind::Binary {
                    op: BinaryOp::Mul(sign),
                    left: Box::new(left),
                    right: Box::new(right),
                },
                span,
            };
        }
        Ok(left)
    }

    fn parse_unary_expression(&mut self) -> Result<Expression, ()> {
        let start = self.peek_span();
        let op = match self.peek() {
            Some(Token::AddOp(crate::lexer::AddSign::Plus)) => Some(UnaryOp::Plus),
            Some(Token::AddOp(crate::lexer::AddSign::Minus)) => Some(UnaryOp::Minus),
            Some(Token::Not) => Some(UnaryOp::Not),
            _ => None,
        };
        if let Some(op) = op {
            self.advance();
            let operand = self.parse_unary_expression()?;
            let span = start.to(self.previous_span());
            return Ok(Expression {
                kind: ExprKind::Unary {
                    op,
                    operand: Box::new(operand),
                },
                span,
            });
        }
        self.parse_factor()
    }

    fn parse_factor(&mut self) -> Result<Expression, ()> {
        let start = self.peek_span();
        match self.peek() {
            Some(Token::LParen) => {
                self.advance();
                let inner = self.parse_expression()?;
                self.consume(|t| matches!(t, Token::RParen), "`)` to close the expression")?;
                let span = start.to(self.previous_span());
                Ok(Expression {
                    kind: ExprKind::Paren(Box::new(inner)),
                    span,
                })
            }
            Some(Token::ConstInt(text)) => {
                let text = text.clone();
                self.advance();
                Ok(Expression {
                    kind: ExprKind::ConstInt(text),
                    span: start,
                })
            }
            Some(Token::ConstFloat(text)) => {
                let text = text.clone();
                self.advance();
                Ok(Expression {
                    kind: ExprKind::ConstFloat(text),
                    span: start,
                })
            }
            Some(Token::Ident(name)) => {
                let ident = Ident {
                    name: name.clone(),
                    span: start,
                };
                self.advance();

                if self.match_token(|t| matches!(t, Token::LParen)) {
                    let args = if self.check(|t| matches!(t, Token::RParen)) {
                        Vec::new()
                    } else {
                        self.parse_call_arguments()?
                    };
                    self.consume(|t| matches!(t, Token::RParen), "`)` after the arguments")?;
                    let span = start.to(self.previous_span());
                    return Ok(Expression {
                        kind: ExprKind::Call { name: ident, args },
                        span,
                    });
                }

                let var = self.parse_variable_tail(ident)?;
                if self.match_token(|t| matches!(t, Token::IncOp)) {
                    let span = start.to(self.previous_span());
                    return Ok(Expression {
                        kind: ExprKind::IncDec {
                            target: var,
                            op: IncDecOp::Increment,
                        },
                        span,
                    });
                }
                if self.match_token(|t| matches!(t, Token::DecOp)) {
                    let span = start.to(self.previous_span());
                    return Ok(Expression {
                        kind: ExprKind::IncDec {
                            target: var,
                            op: IncDecOp::Decrement,
                        },
                        span,
                    });
                }
                let span = var.span;
                Ok(Expression {
                    kind: ExprKind::Variable(var),
                    span,
                })
            }
            _ => {
                self.error_at_current("an expression");
                self.advance();
                Err(())
            }
        }
    }

    fn parse_variable_tail(&mut self, name: Ident) -> Result<Variable, ()> {
        let index = if self.match_token(|t| matches!(t, Token::LThird)) {
            let index = self.parse_expression()?;
            self.consume(|t| matches!(t, Token::RThird), "`]` after the index")?;
            Some(Box::new(index))
        } else {
            None
        };
        let span = name.span.to(self.previous_span());
        Ok(Variable { name, index, span })
    }

    fn parse_call_arguments(&mut self) -> Result<Vec<Expression>, ()> {
        let mut args = vec![self.parse_logic_expression()?];
        while self.match_token(|t| matches!(t, Token::Comma)) {
            args.push(self.parse_logic_expression()?);
        }
        Ok(args)
    }
}

// --- 7. 辅助函数实现 ---

impl<'a> Util for Parser<'a> {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.current).map(|(t, _)| t)
    }

    fn peek_span(&self) -> Span {
        match self.tokens.get(self.current) {
            Some((_, span)) => *span,
            None => {
                let end = self.previous_span().end;
                Span::new(end, end)
            }
        }
    }

    fn previous_span(&self) -> Span {
        if self.current == 0 {
            return Span::default();
        }
        self.tokens
            .get(self.current - 1)
            .map(|(_, span)| *span)
            .unwrap_or_default()
    }

    fn is_at_end(&self) -> bool {
        self.current >= self.tokens.len()
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.current).map(|(t, _)| t.clone());
        if token.is_some() {
            self.current += 1;
        }
        token
    }

    fn check(&self, pred: fn(&Token) -> bool) -> bool {
        self.peek().is_some_and(pred)
    }

    fn match_token(&mut self, pred: fn(&Token) -> bool) -> bool {
        if self.check(pred) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn consume(&mut self, pred: fn(&Token) -> bool, expected: &str) -> Result<(), ()> {
        if self.match_token(pred) {
            Ok(())
        } else {
            self.error_at_current(expected);
            Err(())
        }
    }

    fn take_ident(&mut self, expected: &str) -> Result<Ident, ()> {
        let span = self.peek_span();
        match self.peek() {
            Some(Token::Ident(name)) => {
                let name = name.clone();
                self.advance();
                Ok(Ident { name, span })
            }
            _ => {
                self.error_at_current(expected);
                Err(())
            }
        }
    }

    fn take_const_int(&mut self) -> Result<ArraySize, ()> {
        let span = self.peek_span();
        match self.peek() {
            Some(Token::ConstInt(text)) => {
                let text = text.clone();
                let value = text.parse().unwrap_or(0);
                self.advance();
                Ok(ArraySize { text, value, span })
            }
            _ => {
                self.error_at_current("an integer constant as the array size");
                Err(())
            }
        }
    }

    fn at_type_specifier(&self) -> bool {
        matches!(
            self.peek(),
            Some(Token::Int) | Some(Token::Float) | Some(Token::Void)
        )
    }

    fn error_at_current(&mut self, expected: &str) {
        let found = match self.peek() {
            Some(token) => format!("{}", token),
            None => "end of file".to_string(),
        };
        let error = ParserError::UnexpectedToken {
            expected: expected.to_string(),
            found,
            span: self.peek_span(),
        };
        self.errors.push(error.into());
    }

    fn synchronize(&mut self) {
        while !self.is_at_end() {
            // 分号之后或块边界、下一个声明的开头都是安全的同步点
            if self.match_token(|t| matches!(t, Token::Semicolon)) {
                return;
            }
            if self.check(|t| matches!(t, Token::RCurl | Token::LCurl)) || self.at_type_specifier()
            {
                return;
            }
            self.advance();
        }
    }
}
