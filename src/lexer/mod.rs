// 导入logos分词库
use logos::Logos;
// 导入错误处理模组
use crate::reporter::{CompilerError, LexerError};
// 导入定位处理
use crate::utils::Span;
use std::fmt;

// 声明单元测试模块
#[cfg(test)]
mod test;

// logos 解析时需要使用的错误类型
#[derive(Debug, Default, Clone, PartialEq)]
pub enum LexingError {
    /// 使用 `#[default]` 来指定当 logos 需要创建一个默认错误实例时
    /// 应该使用哪个变体。
    #[default]
    InvalidToken,
}

/// 加法类运算符的具体符号。语法只关心运算符类别（ADDOP），
/// 分析阶段和渲染再按具体符号区分。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddSign {
    Plus,
    Minus,
}

impl fmt::Display for AddSign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AddSign::Plus => write!(f, "+"),
            AddSign::Minus => write!(f, "-"),
        }
    }
}

/// 乘法类运算符（MULOP）的具体符号。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MulSign {
    Times,
    Divide,
    Modulus,
}

impl fmt::Display for MulSign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MulSign::Times => write!(f, "*"),
            MulSign::Divide => write!(f, "/"),
            MulSign::Modulus => write!(f, "%"),
        }
    }
}

/// 比较类运算符（RELOP）的具体符号。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelSign {
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
    Ne,
}

impl fmt::Display for RelSign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RelSign::Lt => "<",
            RelSign::Le => "<=",
            RelSign::Gt => ">",
            RelSign::Ge => ">=",
            RelSign::Eq => "==",
            RelSign::Ne => "!=",
        };
        write!(f, "{}", s)
    }
}

/// 逻辑类运算符（LOGICOP）的具体符号。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicSign {
    And,
    Or,
}

impl fmt::Display for LogicSign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogicSign::And => write!(f, "&&"),
            LogicSign::Or => write!(f, "||"),
        }
    }
}

/// 词素定义
#[derive(Logos, Debug, PartialEq, Clone)]
// 当 logos 遇到无法识别的字符时，它会报告一个 "LexingError"。
#[logos(error = LexingError)]
// 跳过空白
#[logos(skip r"[ \t\r\n\f]+")]
// 跳过单行注释
#[logos(skip r"//[^\n]*")]
// 跳过块注释
#[logos(skip r"/\*([^*]|\*[^/])*\*/")]
pub enum Token {
    // 关键字
    #[token("if")]
    If,
    #[token("else")]
    Else,
    #[token("for")]
    For,
    #[token("while")]
    While,
    #[token("do")]
    Do,
    #[token("break")]
    Break,
    #[token("int")]
    Int,
    #[token("char")]
    Char,
    #[token("float")]
    Float,
    #[token("double")]
    Double,
    #[token("void")]
    Void,
    #[token("return")]
    Return,
    #[token("switch")]
    Switch,
    #[token("case")]
    Case,
    #[token("default")]
    Default,
    #[token("continue")]
    Continue,
    // println 和 printf 都归到同一个词素，输出阶段统一渲染为 printf
    #[token("println")]
    #[token("printf")]
    Println,

    // 运算符类。每类只保留一个变体，具体符号作为负载携带，
    // 这样语法层可以按类别匹配，而渲染层仍能还原原文。
    #[token("+", |_| AddSign::Plus)]
    #[token("-", |_| AddSign::Minus)]
    AddOp(AddSign),
    #[token("*", |_| MulSign::Times)]
    #[token("/", |_| MulSign::Divide)]
    #[token("%", |_| MulSign::Modulus)]
    MulOp(MulSign),
    #[token("++")]
    IncOp,
    #[token("--")]
    DecOp,
    #[token("<", |_| RelSign::Lt)]
    #[token("<=", |_| RelSign::Le)]
    #[token(">", |_| RelSign::Gt)]
    #[token(">=", |_| RelSign::Ge)]
    #[token("==", |_| RelSign::Eq)]
    #[token("!=", |_| RelSign::Ne)]
    RelOp(RelSign),
    #[token("=")]
    AssignOp,
    #[token("&&", |_| LogicSign::And)]
    #[token("||", |_| LogicSign::Or)]
    LogicOp(LogicSign),
    #[token("!")]
    Not,

    // 分割符号
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("{")]
    LCurl,
    #[token("}")]
    RCurl,
    #[token("[")]
    LThird,
    #[token("]")]
    RThird,
    #[token(",")]
    Comma,
    #[token(";")]
    Semicolon,

    // 浮点数字面量
    // logos 会优先尝试匹配这个更长的规则，然后再尝试匹配整数。
    // 原文保留为字符串：除零检查是文本级的，渲染也需要原样输出。
    #[regex(r"[0-9]+\.[0-9]+([Ee][+-]?[0-9]+)?", |lex| lex.slice().to_string())]
    ConstFloat(String),

    // 整数字面量
    // 和上面一样，先保留为 str
    #[regex("[0-9]+", |lex| lex.slice().to_string())]
    ConstInt(String),

    // 标识符
    // 函数名，变量名等
    #[regex("[a-zA-Z_][a-zA-Z0-9_]*", |lex| lex.slice().to_string())]
    Ident(String),
}

// Implement Display for Token to make it easier to print them out during debugging.
impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// 对源代码进行词法分析，返回一个 Token 向量，并收集所有词法错误。
pub fn lex(source: &str) -> (Vec<(Token, Span)>, Vec<CompilerError>) {
    let mut tokens = Vec::new();
    let mut errors: Vec<CompilerError> = Vec::new();

    // lexer.spanned() 会产生 (Result<Token, LexingError>, Range<usize>)
    let lexer = Token::lexer(source).spanned();

    for (result, span) in lexer {
        match result {
            // 正常的 Token
            Ok(token) => tokens.push((token, span.into())),

            // logos 遇到了一个错误
            Err(_lexing_error) => {
                // LexingError 本身不包含无效字符的信息，
                // 需要从 `source` 和 `span` 中提取。
                let slice = &source[span.clone()];
                let unrecognized_char = slice.chars().next().unwrap_or_default();

                let error = LexerError::UnrecognizedToken {
                    unrecognized_char,
                    span: span.into(),
                };
                errors.push(error.into());
            }
        }
    }

    (tokens, errors)
}
