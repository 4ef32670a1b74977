// In src/analyzer/statement.rs

use super::expression::ExpressionChecker;
use super::semantic_error::SemanticError;
use super::symbols::{Parameter, SymbolRecord};
use super::trace::ExprLevel;
use super::types::DataType;
use super::Analyzer;
use crate::parser::ast;
use crate::renderer;

/// `StatementChecker` Trait 负责检查各类语句。
pub(super) trait StatementChecker {
    /// 检查任意类型的语句（作为分发函数）。
    fn check_statement(&mut self, stmt: &ast::Statement);
    /// 检查一串语句，记录 statements 链的归约。
    fn check_statements(&mut self, statements: &[ast::Statement]);
    /// 检查一个代码块：进入作用域、注入形参、处理语句、转储并退出。
    fn check_compound(&mut self, block: &ast::CompoundStatement, params: &[Parameter]);
    /// 检查一个变量声明（全局或局部共用）。
    fn check_var_declaration(&mut self, decl: &ast::VarDeclaration);
    /// 检查类型说明符，设置 `current_type` 并返回对应的类型。
    fn check_type_specifier(&mut self, type_spec: &ast::TypeSpecifier) -> DataType;
    /// 检查表达式语句，返回内部表达式的类型（裸分号没有类型）。
    fn check_expression_statement(&mut self, stmt: &ast::ExpressionStatement) -> Option<DataType>;
    /// 处理声明列表中的单个条目：查重、拒绝 void、插入记录。
    fn declare_entry(&mut self, declarator: &ast::Declarator);
}

impl<'a> StatementChecker for Analyzer<'a> {
    fn check_statement(&mut self, stmt: &ast::Statement) {
        let line = self.line_of(stmt.span);
        let fragment = renderer::render_statement(stmt);

        match &stmt.kind {
            ast::StatementKind::VarDecl(decl) => {
                self.check_var_declaration(decl);
                self.trace
                    .reduction(line, "statement : var_declaration", &fragment);
            }
            ast::StatementKind::Expr(expr_stmt) => {
                self.check_expression_statement(expr_stmt);
                self.trace
                    .reduction(line, "statement : expression_statement", &fragment);
            }
            ast::StatementKind::Compound(block) => {
                self.check_compound(block, &[]);
                self.trace
                    .reduction(line, "statement : compound_statement", &fragment);
            }
            ast::StatementKind::If {
                condition,
                then_branch,
                else_branch,
            } => {
                let condition_type = self.check_expression(condition, ExprLevel::Expression);
                self.check_statement(then_branch);
                let production = match else_branch {
                    Some(else_branch) => {
                        self.check_statement(else_branch);
                        "statement : IF LPAREN expression RPAREN statement ELSE statement"
                    }
                    None => "statement : IF LPAREN expression RPAREN statement",
                };
                self.trace.reduction(line, production, &fragment);
                if condition_type.is_void() {
                    self.report(SemanticError::VoidInExpression { span: stmt.span });
                }
            }
            ast::StatementKind::While { condition, body } => {
                let condition_type = self.check_expression(condition, ExprLevel::Expression);
                self.check_statement(body);
                self.trace.reduction(
                    line,
                    "statement : WHILE LPAREN expression RPAREN statement",
                    &fragment,
                );
                if condition_type.is_void() {
                    self.report(SemanticError::VoidInExpression { span: stmt.span });
                }
            }
            ast::StatementKind::For {
                init,
                condition,
                step,
                body,
            } => {
                self.check_expression_statement(init);
                let condition_type = self.check_expression_statement(condition);
                let step_type = self.check_expression(step, ExprLevel::Expression);
                self.check_statement(body);
                self.trace.reduction(
                    line,
                    "statement : FOR LPAREN expression_statement expression_statement expression RPAREN statement",
                    &fragment,
                );
                // 条件和步进都不允许是 void 调用
                if condition_type == Some(DataType::Void) {
                    self.report(SemanticError::VoidInExpression { span: stmt.span });
                }
                if step_type.is_void() {
                    self.report(SemanticError::VoidInExpression { span: stmt.span });
                }
            }
            ast::StatementKind::Println { arg } => {
                self.trace.reduction(
                    line,
                    "statement : PRINTLN LPAREN ID RPAREN SEMICOLON",
                    &fragment,
                );
                if self.symbol_table.lookup(&arg.name).is_none() {
                    self.report(SemanticError::UndeclaredVariable {
                        name: arg.name.clone(),
                        span: arg.span,
                    });
                }
            }
            ast::StatementKind::Return { value } => {
                // 返回值正常分析；与所在函数返回类型的比对不在检查范围内
                let _ = self.check_expression(value, ExprLevel::Expression);
                self.trace
                    .reduction(line, "statement : RETURN expression SEMICOLON", &fragment);
            }
        }
    }

    fn check_statements(&mut self, statements: &[ast::Statement]) {
        let mut rendered = Vec::new();
        for (i, stmt) in statements.iter().enumerate() {
            self.check_statement(stmt);
            rendered.push(renderer::render_statement(stmt));
            let production = if i == 0 {
                "statements : statement"
            } else {
                "statements : statements statement"
            };
            self.trace
                .reduction(self.line_of(stmt.span), production, &rendered.join("\n"));
        }
    }

    fn check_compound(&mut self, block: &ast::CompoundStatement, params: &[Parameter]) {
        self.symbol_table.enter_scope();

        // 函数体作用域里，具名形参先以变量身份入表。
        // 重名形参在构建形参表时已经报告过，这里静默跳过。
        for param in params {
            if param.data_type.is_void() {
                continue;
            }
            if let Some(name) = &param.name {
                self.symbol_table
                    .insert(SymbolRecord::variable(name.clone(), param.data_type));
            }
        }

        let production = if block.statements.is_empty() {
            "compound_statement : LCURL RCURL"
        } else {
            self.check_statements(&block.statements);
            "compound_statement : LCURL statements RCURL"
        };
        self.trace.reduction(
            self.line_of(block.span),
            production,
            &renderer::render_compound(block),
        );

        // 退出前转储，随后整个作用域的记录一并释放
        self.symbol_table.exit_scope(&mut self.trace);
    }

    fn check_var_declaration(&mut self, decl: &ast::VarDeclaration) {
        self.check_type_specifier(&decl.type_spec);

        let mut rendered = Vec::new();
        for (i, declarator) in decl.declarators.iter().enumerate() {
            rendered.push(renderer::render_declarator(declarator));
            let production = match (i == 0, declarator.array_size.is_some()) {
                (true, false) => "declaration_list : ID",
                (true, true) => "declaration_list : ID LTHIRD CONST_INT RTHIRD",
                (false, false) => "declaration_list : declaration_list COMMA ID",
                (false, true) => "declaration_list : declaration_list COMMA ID LTHIRD CONST_INT RTHIRD",
            };
            self.trace.reduction(
                self.line_of(declarator.span),
                production,
                &rendered.join(","),
            );
            self.declare_entry(declarator);
        }

        self.trace.reduction(
            self.line_of(decl.span),
            "var_declaration : type_specifier declaration_list SEMICOLON",
            &renderer::render_var_declaration(decl),
        );
        self.current_type = None;
    }

    fn check_type_specifier(&mut self, type_spec: &ast::TypeSpecifier) -> DataType {
        let (data_type, production) = match type_spec.kind {
            ast::TypeKind::Int => (DataType::Int, "type_specifier : INT"),
            ast::TypeKind::Float => (DataType::Float, "type_specifier : FLOAT"),
            ast::TypeKind::Void => (DataType::Void, "type_specifier : VOID"),
        };
        self.trace.reduction(
            self.line_of(type_spec.span),
            production,
            renderer::render_type(type_spec.kind),
        );
        self.current_type = Some(data_type);
        data_type
    }

    fn check_expression_statement(&mut self, stmt: &ast::ExpressionStatement) -> Option<DataType> {
        let line = self.line_of(stmt.span);
        match &stmt.expr {
            Some(expr) => {
                let data_type = self.check_expression(expr, ExprLevel::Expression);
                self.trace.reduction(
                    line,
                    "expression_statement : expression SEMICOLON",
                    &renderer::render_expression_statement(stmt),
                );
                Some(data_type)
            }
            None => {
                self.trace
                    .reduction(line, "expression_statement : SEMICOLON", ";");
                None
            }
        }
    }

    fn declare_entry(&mut self, declarator: &ast::Declarator) {
        // current_type 由同一声明里的 type_specifier 归约设置
        let Some(declared) = self.current_type else {
            return;
        };
        let name = &declarator.name.name;

        if self.symbol_table.lookup_current_scope(name).is_some() {
            let error = match declarator.array_size {
                Some(_) => SemanticError::MultipleDeclarationOfArray {
                    name: name.clone(),
                    span: declarator.span,
                },
                None => SemanticError::MultipleDeclarationOfVariable {
                    name: name.clone(),
                    span: declarator.span,
                },
            };
            self.report(error);
            return;
        }

        // void 变量和 void 元素的数组都被拒绝
        if declared.is_void() {
            self.report(SemanticError::VoidVariable {
                span: declarator.span,
            });
            return;
        }

        let record = match &declarator.array_size {
            Some(size) => SymbolRecord::array(name.clone(), declared, size.value),
            None => SymbolRecord::variable(name.clone(), declared),
        };
        self.symbol_table.insert(record);
    }
}
