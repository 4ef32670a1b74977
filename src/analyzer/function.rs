// In src/analyzer/function.rs

use super::semantic_error::SemanticError;
use super::statement::StatementChecker;
use super::symbols::{Parameter, SymbolRecord};
use super::types::DataType;
use super::Analyzer;
use crate::parser::ast;
use crate::renderer;

/// `FunctionChecker` Trait 负责函数头、函数体和形参表的检查。
///
/// 函数记录在函数体处理之前就插入全局作用域，这样递归调用
/// 在自己的函数体里就能解析到自己。
pub(super) trait FunctionChecker {
    /// 检查一个函数原型。
    fn check_func_declaration(&mut self, decl: &ast::FuncDeclaration);
    /// 检查一个函数定义。
    fn check_func_definition(&mut self, def: &ast::FuncDefinition);
    /// 检查形参表：记录归约、查重名、填充 `pending_formals`。
    fn check_parameter_list(&mut self, params: &[ast::ParamDecl]);
    /// 消费 `pending_formals` 并把函数记录插入当前（全局）作用域。
    /// 返回形参表副本，供函数体作用域注入形参使用。
    fn register_function(&mut self, name: &ast::Ident, return_type: DataType) -> Vec<Parameter>;
}

impl<'a> FunctionChecker for Analyzer<'a> {
    fn check_func_declaration(&mut self, decl: &ast::FuncDeclaration) {
        let return_type = self.check_type_specifier(&decl.return_type);
        self.current_func_name = Some(decl.name.name.clone());
        self.check_parameter_list(&decl.params);
        let _ = self.register_function(&decl.name, return_type);

        let production = if decl.params.is_empty() {
            "func_declaration : type_specifier ID LPAREN RPAREN SEMICOLON"
        } else {
            "func_declaration : type_specifier ID LPAREN parameter_list RPAREN SEMICOLON"
        };
        self.trace.reduction(
            self.line_of(decl.span),
            production,
            &renderer::render_func_declaration(decl),
        );

        self.current_func_name = None;
        self.current_type = None;
    }

    fn check_func_definition(&mut self, def: &ast::FuncDefinition) {
        let return_type = self.check_type_specifier(&def.return_type);
        self.current_func_name = Some(def.name.name.clone());
        self.check_parameter_list(&def.params);
        // 函数头先入表（在函数体之前），函数体作用域随后注入形参
        let formals = self.register_function(&def.name, return_type);
        self.check_compound(&def.body, &formals);

        let production = if def.params.is_empty() {
            "func_definition : type_specifier ID LPAREN RPAREN compound_statement"
        } else {
            "func_definition : type_specifier ID LPAREN parameter_list RPAREN compound_statement"
        };
        self.trace.reduction(
            self.line_of(def.span),
            production,
            &renderer::render_func_definition(def),
        );

        self.current_func_name = None;
        self.current_type = None;
    }

    fn check_parameter_list(&mut self, params: &[ast::ParamDecl]) {
        let mut rendered = Vec::new();
        for (i, param) in params.iter().enumerate() {
            let data_type = self.check_type_specifier(&param.type_spec);
            rendered.push(renderer::render_param(param));
            let production = match (i == 0, param.name.is_some()) {
                (true, true) => "parameter_list : type_specifier ID",
                (true, false) => "parameter_list : type_specifier",
                (false, true) => "parameter_list : parameter_list COMMA type_specifier ID",
                (false, false) => "parameter_list : parameter_list COMMA type_specifier",
            };
            self.trace
                .reduction(self.line_of(param.span), production, &rendered.join(","));

            if let Some(name) = &param.name {
                let duplicate = self
                    .pending_formals
                    .iter()
                    .any(|formal| formal.name.as_deref() == Some(name.name.as_str()));
                if duplicate {
                    let func = self.current_func_name.clone().unwrap_or_default();
                    self.report(SemanticError::MultipleDeclarationOfParameter {
                        name: name.name.clone(),
                        func,
                        span: param.span,
                    });
                }
            }

            // 重名形参仍然入表：实参个数按书写的形参个数核对
            self.pending_formals.push(Parameter {
                data_type,
                name: param.name.as_ref().map(|ident| ident.name.clone()),
            });
        }
    }

    fn register_function(&mut self, name: &ast::Ident, return_type: DataType) -> Vec<Parameter> {
        // 形参缓冲在消费时清空
        let formals = std::mem::take(&mut self.pending_formals);

        if self.symbol_table.lookup_current_scope(&name.name).is_some() {
            self.report(SemanticError::MultipleDeclarationOfFunction {
                name: name.name.clone(),
                span: name.span,
            });
            return formals;
        }

        self.symbol_table.insert(SymbolRecord::function(
            name.name.clone(),
            return_type,
            formals.clone(),
        ));
        formals
    }
}
