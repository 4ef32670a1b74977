//! 归约日志。
//!
//! 分析器对 AST 做后序遍历，遍历顺序与自底向上语法分析的归约顺序
//! 一致；每个节点在这里留下一条 `At line no: N <产生式>` 记录，
//! 后跟渲染出的代码片段。诊断行和作用域转储也按触发顺序插入同一份
//! 日志，最终整体写入 `*_log.txt`。

use std::fmt::Write as _;

/// 日志收集器：先按块累积，分析结束后一次性渲染。
#[derive(Debug, Default)]
pub struct TraceLog {
    entries: Vec<String>,
}

impl TraceLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// 记录一次归约：产生式加上它覆盖的代码片段。
    pub fn reduction(&mut self, line: usize, production: &str, fragment: &str) {
        self.entries
            .push(format!("At line no: {} {}\n\n{}", line, production, fragment));
    }

    /// 记录一条诊断行（与错误文件中的文本一字不差）。
    pub fn diagnostic(&mut self, line: usize, message: &str) {
        self.entries.push(format!("At line no: {} {}", line, message));
    }

    /// 记录一个作用域转储块。
    pub fn scope_dump(&mut self, dump: String) {
        self.entries.push(dump);
    }

    /// 渲染完整的日志文件内容，末尾带总行数和总错误数。
    pub fn render(&self, total_lines: usize, total_errors: usize) -> String {
        let mut out = String::new();
        for entry in &self.entries {
            let _ = writeln!(out, "{}\n", entry);
        }
        let _ = writeln!(out, "Total lines: {}", total_lines);
        let _ = writeln!(out, "Total errors: {}", total_errors);
        out
    }

    #[cfg(test)]
    pub fn entries(&self) -> &[String] {
        &self.entries
    }
}

/// 表达式在文法分层中的自然层级。
///
/// 自底向上的分析里，一个 `factor` 被用作 `expression` 时要经过一串
/// 单元产生式归约（`unary_expression : factor`、`term : unary_expression`
/// ……）。`promote` 按层级逐级补出这些归约记录。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ExprLevel {
    Variable,
    Factor,
    Unary,
    Term,
    Simple,
    Rel,
    Logic,
    Expression,
}

impl ExprLevel {
    /// 上一层的单元产生式。
    fn promotion(self) -> Option<(ExprLevel, &'static str)> {
        match self {
            ExprLevel::Variable => Some((ExprLevel::Factor, "factor : variable")),
            ExprLevel::Factor => Some((ExprLevel::Unary, "unary_expression : factor")),
            ExprLevel::Unary => Some((ExprLevel::Term, "term : unary_expression")),
            ExprLevel::Term => Some((ExprLevel::Simple, "simple_expression : term")),
            ExprLevel::Simple => Some((ExprLevel::Rel, "rel_expression : simple_expression")),
            ExprLevel::Rel => Some((ExprLevel::Logic, "logic_expression : rel_expression")),
            ExprLevel::Logic => Some((ExprLevel::Expression, "expression : logic_expression")),
            ExprLevel::Expression => None,
        }
    }
}

/// 从 `from` 层提升到 `to` 层，逐级补出单元产生式的归约记录。
pub fn promote(trace: &mut TraceLog, from: ExprLevel, to: ExprLevel, line: usize, fragment: &str) {
    let mut level = from;
    while level < to {
        let (next, production) = level
            .promotion()
            .expect("expression levels above `expression` do not exist");
        trace.reduction(line, production, fragment);
        level = next;
    }
}
