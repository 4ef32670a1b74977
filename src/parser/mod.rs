//! src/parser/mod.rs
//!
//! 这个模块是语法分析阶段的公共接口。
//! 它的职责是接收一个 Token 流，并将其转换为一个抽象语法树 (AST)。

// 声明子模块。`pub mod ast` 使 AST 定义可以被编译器其他部分访问。
pub mod ast;
mod parsers;
// 测试模块
#[cfg(test)]
mod test;

use crate::lexer::Token;
use crate::reporter::CompilerError;
use crate::utils::Span;
use parsers::{Parse, Parser};

/// 这是 parser 模块唯一的公共入口函数。
///
/// 它是一个纯函数，职责非常单一：
/// - 输入: 一个带 span 的 Token 向量。
/// - 输出: 一个元组，包含尽力恢复出的 Program AST 和一个潜在的语法错误向量。
///
/// 它不关心词法分析或最终的错误报告，只专注于语法分析这一件事。
pub fn parse(tokens: &[(Token, Span)]) -> (ast::Program, Vec<CompilerError>) {
    Parser::new(tokens).parse()
}
