//! 这个模块定义词法和语法阶段的结构化错误。
//! 语义诊断不在这里：它们走 `diagnostics` 模块的 `DiagnosticBag`，
//! 因为语义阶段需要按行号收集并最终写入错误文件。

use crate::utils::Span;
use thiserror::Error;

/// 顶层的前端错误枚举。
/// 词法和语法阶段的错误都会被包含在这里。
#[derive(Debug, Error)]
pub enum CompilerError {
    /// 词法分析阶段的错误
    #[error(transparent)]
    Lexical(#[from] LexerError),

    /// 语法分析阶段的错误
    #[error(transparent)]
    Parsing(#[from] ParserError),
}

impl CompilerError {
    pub fn span(&self) -> Span {
        match self {
            CompilerError::Lexical(LexerError::UnrecognizedToken { span, .. }) => *span,
            CompilerError::Parsing(ParserError::UnexpectedToken { span, .. }) => *span,
        }
    }
}

/// 词法分析器可能产生的所有错误的集合。
#[derive(Debug, Error)]
pub enum LexerError {
    #[error("Unrecognized character '{unrecognized_char}'")]
    UnrecognizedToken { unrecognized_char: char, span: Span },
}

/// 语法分析器可能产生的所有错误的集合。
#[derive(Debug, Error)]
pub enum ParserError {
    #[error("Syntax error: expected {expected}, but found {found}")]
    UnexpectedToken {
        expected: String,
        found: String,
        span: Span,
    },
}
