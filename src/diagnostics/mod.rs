pub mod codes;

use crate::utils::Span;
use ariadne::{Color, Label as AriadneLabel, Report, ReportKind, Source};
use codes::ErrorCode; // 从子模块中导入 ErrorCode 结构体
use std::fmt::Write as _;

// --- DiagnosticLevel 和 Label ---

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticLevel {
    Error,
    Warning,
}

#[derive(Debug, Clone)]
pub struct Label {
    pub span: Span,
    pub message: String,
}

impl Label {
    pub fn new(span: Span, message: impl Into<String>) -> Self {
        Self {
            span,
            message: message.into(),
        }
    }
}

// --- Diagnostic 结构体 ---

/// 一条语义诊断：错误码、级别、行号，以及写入输出文件的完整消息文本。
/// `labels` 只服务于控制台渲染，不参与文件输出。
#[derive(Debug, Clone)]
pub struct Diagnostic {
    code: &'static str,
    level: DiagnosticLevel,
    line: usize,
    // message 是可变的 String，以便包含动态信息（如具体的变量名）
    message: String,
    labels: Vec<Label>,
}

impl Diagnostic {
    /// 主构造函数接收一个 ErrorCode 引用作为其核心输入。
    pub fn new(error_code: &'static ErrorCode, line: usize, primary_label: Label) -> Self {
        Self {
            code: error_code.code,
            level: error_code.level,
            line,
            message: error_code.message.to_string(), // 从 ErrorCode 获取默认消息
            labels: vec![primary_label],
        }
    }

    /// 覆盖默认消息，以包含动态信息。
    /// 文件输出要求逐字符精确，所以诊断的最终文本总是通过这里注入。
    #[must_use]
    pub fn with_dynamic_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    #[must_use]
    pub fn with_secondary_label(mut self, label: Label) -> Self {
        self.labels.push(label);
        self
    }

    pub fn code(&self) -> &str {
        self.code
    }

    pub fn level(&self) -> DiagnosticLevel {
        self.level
    }

    pub fn line(&self) -> usize {
        self.line
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

// --- DiagnosticBag: 收集器 ---

#[derive(Debug, Default)]
pub struct DiagnosticBag {
    source: String,
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticBag {
    pub fn new(source: &str) -> Self {
        Self {
            source: source.to_string(),
            diagnostics: Vec::new(),
        }
    }

    pub fn report(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.level == DiagnosticLevel::Error)
    }

    /// 诊断总数。警告也计入，与错误文件末尾的计数保持一致。
    pub fn error_count(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.diagnostics.iter()
    }

    /// 渲染错误文件的内容：每条诊断一行，最后是总计。
    /// 没有任何诊断时文件只含 `Total errors: 0`。
    pub fn render_error_file(&self) -> String {
        let mut out = String::new();
        for diag in &self.diagnostics {
            let _ = writeln!(out, "At line no: {} {}", diag.line, diag.message);
        }
        let _ = writeln!(out, "Total errors: {}", self.diagnostics.len());
        out
    }

    /// 用 ariadne 把所有诊断渲染到控制台。
    pub fn print(&self, file_name: &str) {
        print_all(file_name, &self.source, &self.diagnostics);
    }
}

// --- Printer 打印逻辑 ---

fn print_all(file_name: &str, source_code: &str, diagnostics: &[Diagnostic]) {
    let cache = (file_name, Source::from(source_code.to_string()));

    for diag in diagnostics {
        if diag.labels.is_empty() {
            continue;
        }

        let kind = match diag.level {
            DiagnosticLevel::Error => ReportKind::Error,
            DiagnosticLevel::Warning => ReportKind::Warning,
        };

        let color = match diag.level {
            DiagnosticLevel::Error => Color::Red,
            DiagnosticLevel::Warning => Color::Yellow,
        };

        let primary_label_info = &diag.labels[0];

        let mut report = Report::build(
            kind,
            file_name,
            primary_label_info.span.into_range().start,
        )
            .with_message(&diag.message)
            .with_code(diag.code);

        for (i, label_info) in diag.labels.iter().enumerate() {
            let label = AriadneLabel::new((file_name, label_info.span.into_range()))
                .with_message(&label_info.message);

            let final_label = if i == 0 {
                label.with_color(color)
            } else {
                label.with_color(Color::Blue)
            };
            report.add_label(final_label);
        }

        let _ = report.finish().print(cache.clone());
    }
}
