pub mod analyzer;
pub mod diagnostics;
pub mod lexer;
pub mod parser;
pub mod renderer;
pub mod reporter;
mod utils;

pub use utils::{LineMap, Span};

use analyzer::Analyzer;
use diagnostics::DiagnosticBag;
use reporter::CompilerError;

/// 一次完整分析的产物。
pub struct AnalysisReport {
    /// 日志文件内容：归约轨迹、诊断行、作用域转储、总计。
    pub log: String,
    /// 错误文件内容：诊断行加总计。
    pub errors: String,
    /// 诊断总数（警告也计入）。
    pub error_count: usize,
    /// 语义诊断收集器，供控制台渲染使用。
    pub diagnostics: DiagnosticBag,
    /// 词法和语法阶段的错误。它们只上控制台，不进错误文件。
    pub syntax_errors: Vec<CompilerError>,
}

/// 顶层的公共 API：分析一段 MiniC 源代码。
///
/// 管道分三步：词法分析、语法分析、语义分析。
/// 前两个阶段的错误不会阻止语义分析——解析器会尽力恢复出
/// 一棵可用的 AST，语义阶段照常跑完并报告所有能发现的问题。
pub fn analyze_source(source: &str) -> AnalysisReport {
    // 1. 词法分析
    let (tokens, lex_errors) = lexer::lex(source);

    // 2. 语法分析
    let (program, parse_errors) = parser::parse(&tokens);

    let mut syntax_errors = lex_errors;
    syntax_errors.extend(parse_errors);

    // 3. 语义分析
    let line_map = LineMap::new(source);
    let mut diagnostics = DiagnosticBag::new(source);
    let trace = Analyzer::new(&mut diagnostics, &line_map).analyze(&program);

    let error_count = diagnostics.error_count();
    AnalysisReport {
        log: trace.render(line_map.line_count(), error_count),
        errors: diagnostics.render_error_file(),
        error_count,
        diagnostics,
        syntax_errors,
    }
}
