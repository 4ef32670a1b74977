//! 语义诊断的结构化定义。
//!
//! 每个变体的 `Display` 输出就是写进日志和错误文件的消息原文，
//! 输出文件要求逐字符精确，所以拼写集中定义在 `#[error]` 属性里，
//! 不在别处手拼。

use super::types::DataType;
use crate::diagnostics::codes::*;
use crate::diagnostics::{Diagnostic, Label};
use crate::utils::Span;
use thiserror::Error;

/// 语义错误
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SemanticError {
    #[error("Multiple declaration of variable {name}")]
    MultipleDeclarationOfVariable { name: String, span: Span },

    #[error("Multiple declaration of array {name}")]
    MultipleDeclarationOfArray { name: String, span: Span },

    #[error("Multiple declaration of function {name}")]
    MultipleDeclarationOfFunction { name: String, span: Span },

    #[error("Multiple declaration of parameter {name} in a parameter of {func}")]
    MultipleDeclarationOfParameter {
        name: String,
        func: String,
        span: Span,
    },

    #[error("variable type can not be void")]
    VoidVariable { span: Span },

    #[error("Undeclared variable: {name}")]
    UndeclaredVariable { name: String, span: Span },

    #[error("Undeclared function: {name}")]
    UndeclaredFunction { name: String, span: Span },

    #[error("variable is of array type : {name}")]
    ArrayUsedWithoutIndex { name: String, span: Span },

    #[error("variable is not of array type : {name}")]
    IndexOnNonArray { name: String, span: Span },

    #[error("array index is not of integer type : {name}")]
    NonIntegerIndex { name: String, span: Span },

    #[error("Type mismatch in assignment: {lhs} and {rhs}")]
    AssignmentTypeMismatch {
        lhs: DataType,
        rhs: DataType,
        span: Span,
    },

    #[error("Warning: Assignment of float value into variable of integer type")]
    FloatNarrowing { span: Span },

    #[error("operation on void type")]
    OperationOnVoid { span: Span },

    #[error("A void function cannot be called as a part of an expression")]
    VoidInExpression { span: Span },

    #[error("Inconsistencies in number of arguments in function call: {name}")]
    ArgumentCountMismatch { name: String, span: Span },

    #[error("argument {index} type mismatch in function call: {name}")]
    ArgumentTypeMismatch {
        index: usize,
        name: String,
        span: Span,
    },

    #[error("A function call cannot be made with non-function type identifier: {name}")]
    CallOfNonFunction { name: String, span: Span },

    #[error("Division by 0")]
    DivisionByZero { span: Span },

    #[error("Modulus by 0")]
    ModulusByZero { span: Span },

    #[error("Modulus operator on non integer type")]
    ModulusOnNonInteger { span: Span },
}

impl SemanticError {
    /// 触发位置。诊断行号由调用方用 LineMap 从这里换算。
    pub fn span(&self) -> Span {
        match self {
            SemanticError::MultipleDeclarationOfVariable { span, .. }
            | SemanticError::MultipleDeclarationOfArray { span, .. }
            | SemanticError::MultipleDeclarationOfFunction { span, .. }
            | SemanticError::MultipleDeclarationOfParameter { span, .. }
            | SemanticError::VoidVariable { span }
            | SemanticError::UndeclaredVariable { span, .. }
            | SemanticError::UndeclaredFunction { span, .. }
            | SemanticError::ArrayUsedWithoutIndex { span, .. }
            | SemanticError::IndexOnNonArray { span, .. }
            | SemanticError::NonIntegerIndex { span, .. }
            | SemanticError::AssignmentTypeMismatch { span, .. }
            | SemanticError::FloatNarrowing { span }
            | SemanticError::OperationOnVoid { span }
            | SemanticError::VoidInExpression { span }
            | SemanticError::ArgumentCountMismatch { span, .. }
            | SemanticError::ArgumentTypeMismatch { span, .. }
            | SemanticError::CallOfNonFunction { span, .. }
            | SemanticError::DivisionByZero { span }
            | SemanticError::ModulusByZero { span }
            | SemanticError::ModulusOnNonInteger { span } => *span,
        }
    }

    /// 对应的错误码表项。
    pub fn code(&self) -> &'static ErrorCode {
        match self {
            SemanticError::MultipleDeclarationOfVariable { .. }
            | SemanticError::MultipleDeclarationOfArray { .. } => &E0200_MULTIPLE_DECLARATION,
            SemanticError::MultipleDeclarationOfFunction { .. } => {
                &E0201_MULTIPLE_FUNCTION_DECLARATION
            }
            SemanticError::MultipleDeclarationOfParameter { .. } => {
                &E0202_MULTIPLE_PARAMETER_DECLARATION
            }
            SemanticError::VoidVariable { .. } => &E0203_VOID_VARIABLE,
            SemanticError::UndeclaredVariable { .. } => &E0204_UNDECLARED_VARIABLE,
            SemanticError::UndeclaredFunction { .. } => &E0205_UNDECLARED_FUNCTION,
            SemanticError::ArrayUsedWithoutIndex { .. } => &E0206_ARRAY_WITHOUT_INDEX,
            SemanticError::IndexOnNonArray { .. } => &E0207_INDEX_ON_NON_ARRAY,
            SemanticError::NonIntegerIndex { .. } => &E0208_NON_INTEGER_INDEX,
            SemanticError::AssignmentTypeMismatch { .. } => &E0209_ASSIGNMENT_TYPE_MISMATCH,
            SemanticError::FloatNarrowing { .. } => &W0217_FLOAT_NARROWING,
            SemanticError::OperationOnVoid { .. } | SemanticError::VoidInExpression { .. } => {
                &E0210_VOID_IN_EXPRESSION
            }
            SemanticError::ArgumentCountMismatch { .. } => &E0211_ARGUMENT_COUNT_MISMATCH,
            SemanticError::ArgumentTypeMismatch { .. } => &E0212_ARGUMENT_TYPE_MISMATCH,
            SemanticError::CallOfNonFunction { .. } => &E0213_CALL_OF_NON_FUNCTION,
            SemanticError::DivisionByZero { .. } => &E0214_DIVISION_BY_ZERO,
            SemanticError::ModulusByZero { .. } => &E0215_MODULUS_BY_ZERO,
            SemanticError::ModulusOnNonInteger { .. } => &E0216_MODULUS_ON_NON_INTEGER,
        }
    }

    /// 转换成控制台/文件共用的 Diagnostic。
    /// 完整消息通过 with_dynamic_message 注入，保证与错误文件一致。
    pub fn into_diagnostic(self, line: usize) -> Diagnostic {
        let message = self.to_string();
        let label = Label::new(self.span(), self.code().message);
        Diagnostic::new(self.code(), line, label).with_dynamic_message(message)
    }
}
