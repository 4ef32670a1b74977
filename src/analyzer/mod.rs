// In src/analyzer/mod.rs

// 1. 声明所有模块
pub mod symbols;
pub mod trace;
pub mod types;
mod expression;
mod function;
mod semantic_error;
mod statement;

// 测试模块
#[cfg(test)]
mod test;

pub use semantic_error::SemanticError;

// 2. 导入依赖
use crate::diagnostics::DiagnosticBag;
use crate::parser::ast;
use crate::renderer;
use crate::utils::{LineMap, Span};
use function::FunctionChecker;
use statement::StatementChecker;
use symbols::{Parameter, SymbolTable};
use trace::TraceLog;
use types::DataType;

/// 语义分析器的主结构体，持有分析过程所需的全部状态。
///
/// 分析是对 AST 的一次后序遍历：每个节点对应一条文法产生式，
/// 访问顺序与自底向上语法分析的归约顺序一致。跨产生式共享的
/// 瞬态状态（`current_type`、形参缓冲等）集中放在这里，而不是
/// 散落在全局变量里。
pub struct Analyzer<'a> {
    /// 作用域栈式符号表，构造时自带全局作用域。
    symbol_table: SymbolTable,
    /// 语义诊断的收集器。
    diagnostics: &'a mut DiagnosticBag,
    /// 归约日志；分析结束后整体移交给调用方渲染。
    trace: TraceLog,
    /// 字节偏移到行号的换算表。
    line_map: &'a LineMap,
    /// 最近一次 type_specifier 归约设置的类型，由声明列表消费。
    current_type: Option<DataType>,
    /// 正在处理的函数名，用于重名形参的诊断。
    current_func_name: Option<String>,
    /// 形参缓冲：函数头分析期间累积，插入函数记录时消费并清空。
    /// 调用实参不经过这里——它们在调用点各自缓冲，嵌套调用互不干扰。
    pending_formals: Vec<Parameter>,
}

impl<'a> Analyzer<'a> {
    pub fn new(diagnostics: &'a mut DiagnosticBag, line_map: &'a LineMap) -> Self {
        Self {
            symbol_table: SymbolTable::new(),
            diagnostics,
            trace: TraceLog::new(),
            line_map,
            current_type: None,
            current_func_name: None,
            pending_formals: Vec::new(),
        }
    }

    /// 主入口：分析整个程序，返回归约日志。
    /// 语义错误不会中断分析；一次运行报告所有能发现的问题。
    pub fn analyze(mut self, program: &ast::Program) -> TraceLog {
        let mut rendered_units = Vec::new();
        for (i, unit) in program.units.iter().enumerate() {
            self.check_unit(unit);
            rendered_units.push(renderer::render_unit(unit));
            let production = if i == 0 {
                "program : unit"
            } else {
                "program : program unit"
            };
            let line = self.line_of(unit_span(unit));
            self.trace
                .reduction(line, production, &rendered_units.join("\n"));
        }

        // 最后一次归约：完整的程序重建文本进入日志
        if let Some(last) = program.units.last() {
            let line = self.line_of(unit_span(last));
            self.trace
                .reduction(line, "start : program", &renderer::render_program(program));
        }

        // 收尾：仍然存活的作用域（至少是全局作用域）自底向上转储
        self.symbol_table.print_all_scopes(&mut self.trace);
        self.trace
    }

    fn check_unit(&mut self, unit: &ast::Unit) {
        match unit {
            ast::Unit::VarDecl(decl) => {
                self.check_var_declaration(decl);
                self.trace.reduction(
                    self.line_of(decl.span),
                    "unit : var_declaration",
                    &renderer::render_var_declaration(decl),
                );
            }
            ast::Unit::FuncDecl(decl) => {
                self.check_func_declaration(decl);
                self.trace.reduction(
                    self.line_of(decl.span),
                    "unit : func_declaration",
                    &renderer::render_func_declaration(decl),
                );
            }
            ast::Unit::FuncDef(def) => {
                self.check_func_definition(def);
                self.trace.reduction(
                    self.line_of(def.span),
                    "unit : func_definition",
                    &renderer::render_func_definition(def),
                );
            }
        }
    }

    /// 归约动作的行号：产生式最后一个 Token 所在的行。
    fn line_of(&self, span: Span) -> usize {
        self.line_map.line_of_end(span)
    }

    /// 报告一条语义诊断：同一行文本同时进入归约日志和诊断收集器。
    fn report(&mut self, error: SemanticError) {
        let line = self.line_of(error.span());
        self.trace.diagnostic(line, &error.to_string());
        self.diagnostics.report(error.into_diagnostic(line));
    }
}

fn unit_span(unit: &ast::Unit) -> Span {
    match unit {
        ast::Unit::VarDecl(decl) => decl.span,
        ast::Unit::FuncDecl(decl) => decl.span,
        ast::Unit::FuncDef(def) => def.span,
    }
}
