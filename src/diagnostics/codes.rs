// src/diagnostics/codes.rs

use crate::diagnostics::DiagnosticLevel;

/// Represents a specific error code with its associated information.
/// This struct serves as the single source of truth for all semantic diagnostics.
#[derive(Debug, Clone)]
pub struct ErrorCode {
    pub code: &'static str,
    pub level: DiagnosticLevel,
    pub message: &'static str,
    pub explanation: &'static str,
}

/*
E02xx: 语义分析 (Semantic Analysis) 错误。
W02xx: 语义分析警告。
*/

// --- E02xx: Semantic Analysis Errors ---

pub const E0200_MULTIPLE_DECLARATION: ErrorCode = ErrorCode {
    code: "E0200",
    level: DiagnosticLevel::Error,
    message: "Symbol is already defined in this scope",
    explanation: "A variable or array with this name has already been declared in the current scope. \
                  Each identifier must be unique within its scope; shadowing is only allowed across scopes.",
};

pub const E0201_MULTIPLE_FUNCTION_DECLARATION: ErrorCode = ErrorCode {
    code: "E0201",
    level: DiagnosticLevel::Error,
    message: "Function is already defined",
    explanation: "A symbol with this name already exists in the global scope, so the function header \
                  cannot be registered again. The first declaration stays in effect.",
};

pub const E0202_MULTIPLE_PARAMETER_DECLARATION: ErrorCode = ErrorCode {
    code: "E0202",
    level: DiagnosticLevel::Error,
    message: "Duplicate parameter name",
    explanation: "Two formal parameters of the same function share a name. Each formal parameter \
                  must have a distinct name because they live in the same function-body scope.",
};

pub const E0203_VOID_VARIABLE: ErrorCode = ErrorCode {
    code: "E0203",
    level: DiagnosticLevel::Error,
    message: "Variable declared with type `void`",
    explanation: "`void` is only meaningful as a function return type. A variable or an array \
                  element cannot have type `void` because it has no values.",
};

pub const E0204_UNDECLARED_VARIABLE: ErrorCode = ErrorCode {
    code: "E0204",
    level: DiagnosticLevel::Error,
    message: "Use of an undeclared variable",
    explanation: "The compiler could not find the definition for this variable in the current scope \
                  or any enclosing scopes. Make sure it is declared before use and check for typos.",
};

pub const E0205_UNDECLARED_FUNCTION: ErrorCode = ErrorCode {
    code: "E0205",
    level: DiagnosticLevel::Error,
    message: "Call of an undeclared function",
    explanation: "No function with this name is visible at the call site. Declare or define the \
                  function before calling it.",
};

pub const E0206_ARRAY_WITHOUT_INDEX: ErrorCode = ErrorCode {
    code: "E0206",
    level: DiagnosticLevel::Error,
    message: "Array used without an index",
    explanation: "An array name cannot appear bare inside an expression; it must be indexed with \
                  `[...]` to produce a value.",
};

pub const E0207_INDEX_ON_NON_ARRAY: ErrorCode = ErrorCode {
    code: "E0207",
    level: DiagnosticLevel::Error,
    message: "Indexing a non-array",
    explanation: "The `[...]` operator can only be applied to a declared array. This identifier \
                  either is not declared or does not name an array.",
};

pub const E0208_NON_INTEGER_INDEX: ErrorCode = ErrorCode {
    code: "E0208",
    level: DiagnosticLevel::Error,
    message: "Array index is not an integer",
    explanation: "Array subscripts must have type `int`. A floating-point or void-typed index is \
                  always rejected.",
};

pub const E0209_ASSIGNMENT_TYPE_MISMATCH: ErrorCode = ErrorCode {
    code: "E0209",
    level: DiagnosticLevel::Error,
    message: "Type mismatch in assignment",
    explanation: "The type of the right-hand side does not match the type of the variable being \
                  assigned. The only tolerated mismatch is the float-to-int narrowing, which is a warning.",
};

pub const E0210_VOID_IN_EXPRESSION: ErrorCode = ErrorCode {
    code: "E0210",
    level: DiagnosticLevel::Error,
    message: "Void value used in an expression context",
    explanation: "A call to a `void` function produces no value, so it cannot be assigned, used as \
                  a condition, or combined with other operands.",
};

pub const E0211_ARGUMENT_COUNT_MISMATCH: ErrorCode = ErrorCode {
    code: "E0211",
    level: DiagnosticLevel::Error,
    message: "Incorrect number of arguments in function call",
    explanation: "The number of arguments provided in the function call does not match the number \
                  of parameters in the function's definition.",
};

pub const E0212_ARGUMENT_TYPE_MISMATCH: ErrorCode = ErrorCode {
    code: "E0212",
    level: DiagnosticLevel::Error,
    message: "Argument type mismatch in function call",
    explanation: "An argument's type differs from the type of the parameter at the same position in \
                  the function's signature.",
};

pub const E0213_CALL_OF_NON_FUNCTION: ErrorCode = ErrorCode {
    code: "E0213",
    level: DiagnosticLevel::Error,
    message: "Cannot call a non-function",
    explanation: "The identifier being used with parentheses `()` is not a function. It might be a \
                  variable or an array.",
};

pub const E0214_DIVISION_BY_ZERO: ErrorCode = ErrorCode {
    code: "E0214",
    level: DiagnosticLevel::Error,
    message: "Division by zero",
    explanation: "The right-hand operand of `/` is the literal `0`. The check is textual; a computed \
                  zero is not detected.",
};

pub const E0215_MODULUS_BY_ZERO: ErrorCode = ErrorCode {
    code: "E0215",
    level: DiagnosticLevel::Error,
    message: "Modulus by zero",
    explanation: "The right-hand operand of `%` is the literal `0`. The check is textual; a computed \
                  zero is not detected.",
};

pub const E0216_MODULUS_ON_NON_INTEGER: ErrorCode = ErrorCode {
    code: "E0216",
    level: DiagnosticLevel::Error,
    message: "Modulus on a non-integer operand",
    explanation: "Both operands of `%` must have type `int`; the result always has type `int`.",
};

// --- W02xx: Semantic Analysis Warnings ---

pub const W0217_FLOAT_NARROWING: ErrorCode = ErrorCode {
    code: "W0217",
    level: DiagnosticLevel::Warning,
    message: "Float value narrowed into an integer variable",
    explanation: "Assigning a `float` value to an `int` variable drops the fractional part. This is \
                  tolerated but reported, and it still increments the error counter.",
};
