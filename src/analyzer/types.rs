//! src/analyzer/types.rs
//!
//! 定义了分析器的静态类型全集 `DataType` 以及符号记录的分类标签。
//! MiniC 的类型宇宙非常小：`int`、`float`、`void`，
//! 表达式自底向上传播时只需要在这三者之间做判断。

use std::fmt;

/// 一个经过语义分析的静态类型。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataType {
    Int,
    Float,
    Void,
}

impl DataType {
    /// 检查类型是否为 Void。
    pub fn is_void(&self) -> bool {
        matches!(self, DataType::Void)
    }

    /// 检查此类型是否为整数。
    pub fn is_int(&self) -> bool {
        matches!(self, DataType::Int)
    }

    /// 检查此类型是否为浮点数。
    pub fn is_float(&self) -> bool {
        matches!(self, DataType::Float)
    }
}

// 为 DataType 实现 Display trait；诊断消息里直接用这个拼写
impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataType::Int => write!(f, "int"),
            DataType::Float => write!(f, "float"),
            DataType::Void => write!(f, "void"),
        }
    }
}

/// 符号记录在语法树中扮演的角色。
/// 角色决定适用哪些检查：裸用数组名报错、调用非函数报错等。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Variable,
    Array,
    Function,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKind::Variable => write!(f, "variable"),
            NodeKind::Array => write!(f, "array"),
            NodeKind::Function => write!(f, "function"),
        }
    }
}

/// 符号记录来源 Token 的词法类别，仅用于保留语法树标注。
/// 分析器插入的记录都来自 ID Token。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenClass {
    Identifier,
}
