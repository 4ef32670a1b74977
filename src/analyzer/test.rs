// In src/analyzer/test.rs

use crate::{analyze_source, AnalysisReport};

/// 辅助函数：分析一段源代码，要求词法和语法阶段完全干净。
fn analyze(src: &str) -> AnalysisReport {
    let report = analyze_source(src);
    assert!(
        report.syntax_errors.is_empty(),
        "unexpected syntax errors: {:?}",
        report.syntax_errors
    );
    report
}

/// 辅助函数：分析并断言没有任何语义诊断。
fn analyze_clean(src: &str) -> AnalysisReport {
    let report = analyze(src);
    assert_eq!(
        report.error_count, 0,
        "expected no diagnostics, got:\n{}",
        report.errors
    );
    report
}

/// 从错误文件内容里取出所有诊断行（不含末尾的总计行）。
fn diagnostic_lines(report: &AnalysisReport) -> Vec<String> {
    report
        .errors
        .lines()
        .filter(|line| line.starts_with("At line no:"))
        .map(str::to_string)
        .collect()
}

/// 取出每条诊断行的行号，用于检查输出顺序。
fn diagnostic_line_numbers(report: &AnalysisReport) -> Vec<usize> {
    diagnostic_lines(report)
        .iter()
        .map(|line| {
            line.trim_start_matches("At line no: ")
                .split_whitespace()
                .next()
                .and_then(|n| n.parse().ok())
                .unwrap_or_else(|| panic!("malformed diagnostic line: {}", line))
        })
        .collect()
}

// --- 规格场景 ---

#[cfg(test)]
mod scenarios {
    use super::*;

    #[test]
    fn s1_multiple_declaration_in_one_line() {
        let report = analyze("int x; int x;");
        assert_eq!(
            report.errors,
            "At line no: 1 Multiple declaration of variable x\nTotal errors: 1\n"
        );
    }

    #[test]
    fn s2_non_integer_array_index() {
        let report = analyze("int main(){ int a[10]; a[2.5] = 3; }");
        let lines = diagnostic_lines(&report);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].ends_with("array index is not of integer type : a"));
    }

    #[test]
    fn s3_void_value_in_assignment() {
        let report = analyze("void f(){} int main(){ int x; x = f(); }");
        let lines = diagnostic_lines(&report);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].ends_with("operation on void type"));
    }

    #[test]
    fn s4_arity_then_argument_type_mismatch() {
        let src = "int add(int a, float b){ return a+3; }\n\
                   int main(){\n\
                   add(1);\n\
                   add(1,2);\n\
                   }";
        let report = analyze(src);
        let lines = diagnostic_lines(&report);
        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[0],
            "At line no: 3 Inconsistencies in number of arguments in function call: add"
        );
        assert_eq!(
            lines[1],
            "At line no: 4 argument 2 type mismatch in function call: add"
        );
    }

    #[test]
    fn s5_float_narrowing_is_a_counted_warning() {
        let report = analyze("int main(){ int x; float y; y=1.5; x=y; }");
        let lines = diagnostic_lines(&report);
        assert_eq!(lines.len(), 1);
        assert!(lines[0]
            .ends_with("Warning: Assignment of float value into variable of integer type"));
        // 警告也计入总数
        assert_eq!(report.error_count, 1);
        assert!(report.errors.ends_with("Total errors: 1\n"));
    }

    #[test]
    fn s6_division_by_zero_then_modulus_on_float() {
        let src = "int main(){\n\
                   int x;\n\
                   x = 5/0;\n\
                   x = 5%2.5;\n\
                   }";
        let report = analyze(src);
        let lines = diagnostic_lines(&report);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "At line no: 3 Division by 0");
        assert_eq!(lines[1], "At line no: 4 Modulus operator on non integer type");
    }
}

// --- 声明与变量引用 ---

#[cfg(test)]
mod declarations {
    use super::*;

    #[test]
    fn test_void_variable_is_rejected() {
        let report = analyze("int main(){ void x; }");
        let lines = diagnostic_lines(&report);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].ends_with("variable type can not be void"));
    }

    #[test]
    fn test_void_array_is_rejected_with_the_same_message() {
        let report = analyze("int main(){ void a[5]; }");
        let lines = diagnostic_lines(&report);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].ends_with("variable type can not be void"));
    }

    #[test]
    fn test_duplicate_array_declaration_names_the_array() {
        let report = analyze("int main(){ int a; int a[10]; }");
        let lines = diagnostic_lines(&report);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].ends_with("Multiple declaration of array a"));
    }

    #[test]
    fn test_undeclared_variable_gets_an_int_placeholder() {
        // y 未声明：报告一次，占位类型 int 让赋值检查不再跟着报错
        let report = analyze("int main(){ int x; x = y; }");
        let lines = diagnostic_lines(&report);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].ends_with("Undeclared variable: y"));
    }

    #[test]
    fn test_array_used_without_index() {
        let report = analyze("int main(){ int a[10]; int x; x = a; }");
        let lines = diagnostic_lines(&report);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].ends_with("variable is of array type : a"));
    }

    #[test]
    fn test_indexing_a_non_array() {
        let report = analyze("int main(){ int x; int y; y = x[2]; }");
        let lines = diagnostic_lines(&report);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].ends_with("variable is not of array type : x"));
    }

    #[test]
    fn test_mixed_declaration_list_classifies_each_entry() {
        let report = analyze_clean("int main(){ int x, a[10], y; a[2] = x + y; }");
        // 数组记录带元素类型和大小，转储里应能看到
        assert!(report.log.contains("a: int array [size=10]"));
        assert!(report.log.contains("x: int variable"));
    }

    #[test]
    fn test_printf_requires_a_declared_variable() {
        let report = analyze("int main(){ int x; printf(y); }");
        let lines = diagnostic_lines(&report);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].ends_with("Undeclared variable: y"));

        analyze_clean("int main(){ int x; printf(x); }");
    }
}

// --- 表达式类型传播 ---

#[cfg(test)]
mod propagation {
    use super::*;

    #[test]
    fn test_int_arithmetic_stays_int() {
        analyze_clean("int main(){ int x; x = 1 + 2 * 3 - 4 / 2; }");
    }

    #[test]
    fn test_float_operand_makes_the_result_float() {
        // 1 + 2.5 的结果是 float，赋给 int 触发收窄警告
        let report = analyze("int main(){ int x; x = 1 + 2.5; }");
        let lines = diagnostic_lines(&report);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("Warning: Assignment of float value"));
    }

    #[test]
    fn test_relational_result_is_int() {
        // y 是 float，但比较的结果是 int，赋给 int 不应有诊断
        analyze_clean("int main(){ int x; float y; y = 2.5; x = y < 3.0; }");
    }

    #[test]
    fn test_logical_result_is_int() {
        // 操作数是 float 也不要紧：逻辑运算的结果恒为 int
        analyze_clean("int main(){ int x; float y; y = 1.5; x = y && 0.5; }");
    }

    #[test]
    fn test_modulus_result_is_int_even_on_bad_operands() {
        // 2.5 % 2 报一次取模错误；结果仍按 int 传播，赋值不再报错
        let report = analyze("int main(){ int x; x = 2.5 % 2; }");
        let lines = diagnostic_lines(&report);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].ends_with("Modulus operator on non integer type"));
    }

    #[test]
    fn test_modulus_by_literal_zero() {
        let report = analyze("int main(){ int x; x = 5 % 0; }");
        let lines = diagnostic_lines(&report);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].ends_with("Modulus by 0"));
    }

    #[test]
    fn test_zero_check_is_textual_not_constant_folding() {
        // 5/(2-2) 在文本上不是 "0"，不要求检测
        analyze_clean("int main(){ int x; x = 5/(2-2); }");
    }

    #[test]
    fn test_parenthesized_zero_is_not_the_literal_zero() {
        analyze_clean("int main(){ int x; x = 5/(0); }");
    }

    #[test]
    fn test_unary_and_incdec_inherit_the_operand_type() {
        analyze_clean("int main(){ int x; x = -x; x = !x; x = x++; x = x--; }");
    }

    #[test]
    fn test_int_into_float_assignment_is_a_mismatch() {
        // 唯一的收窄规则是 float→int；int→float 按普通不匹配报错
        let report = analyze("int main(){ float y; y = 1; }");
        let lines = diagnostic_lines(&report);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].ends_with("Type mismatch in assignment: float and int"));
    }
}

// --- 函数定义与调用 ---

#[cfg(test)]
mod functions {
    use super::*;

    #[test]
    fn test_undeclared_function_is_reported_once() {
        let report = analyze("int main(){ foo(); }");
        let lines = diagnostic_lines(&report);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].ends_with("Undeclared function: foo"));
    }

    #[test]
    fn test_calling_a_variable_is_rejected() {
        let report = analyze("int main(){ int x; x(); }");
        let lines = diagnostic_lines(&report);
        assert_eq!(lines.len(), 1);
        assert!(lines[0]
            .ends_with("A function call cannot be made with non-function type identifier: x"));
    }

    #[test]
    fn test_duplicate_parameter_names() {
        let report = analyze("int f(int a, int a){ return 0; } int main(){ return 0; }");
        let lines = diagnostic_lines(&report);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].ends_with("Multiple declaration of parameter a in a parameter of f"));
    }

    #[test]
    fn test_duplicate_function_declaration() {
        let report = analyze("void f(){} int f(){ return 1; } int main(){ return 0; }");
        let lines = diagnostic_lines(&report);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].ends_with("Multiple declaration of function f"));
    }

    #[test]
    fn test_prototype_with_unnamed_parameters_checks_calls() {
        analyze_clean("int add(int, float); int main(){ int x; x = add(1, 2.5); }");
    }

    #[test]
    fn test_recursion_resolves_inside_the_own_body() {
        analyze_clean(
            "int fact(int n){ if(n < 1) return 1; return n * fact(n - 1); } \
             int main(){ int x; x = fact(5); }",
        );
    }

    #[test]
    fn test_nested_calls_check_both_signatures() {
        let src = "int g(int a){ return a; } \
                   int f(int a, float b){ return a; } \
                   int main(){ int x; x = f(g(1), 2.5); }";
        analyze_clean(src);

        // 外层调用的实参表不会被内层调用破坏：错的还是第 2 个实参
        let bad = "int g(int a){ return a; } \
                   int f(int a, float b){ return a; } \
                   int main(){ int x; x = f(g(1), 2); }";
        let report = analyze(bad);
        let lines = diagnostic_lines(&report);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].ends_with("argument 2 type mismatch in function call: f"));
    }

    #[test]
    fn test_void_call_in_a_condition() {
        let report = analyze("void f(){} int main(){ if(f()) { int x; } return 0; }");
        let lines = diagnostic_lines(&report);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].ends_with("A void function cannot be called as a part of an expression"));
    }

    #[test]
    fn test_void_step_in_a_for_loop() {
        let report = analyze(
            "void f(){} int main(){ int i; for(i=0; i<3; f()) i++; return 0; }",
        );
        let lines = diagnostic_lines(&report);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].ends_with("A void function cannot be called as a part of an expression"));
    }

    #[test]
    fn test_return_expression_is_not_checked_against_the_signature() {
        // 返回值类型与签名不比对，属于刻意的简化
        analyze_clean("int f(){ return 2.5; } int main(){ return 0; }");
    }
}

// --- 作用域规则 ---

#[cfg(test)]
mod scopes {
    use super::*;
    use crate::analyzer::symbols::{SymbolRecord, SymbolTable};
    use crate::analyzer::trace::TraceLog;
    use crate::analyzer::types::DataType;

    #[test]
    fn test_shadowing_resolves_to_the_innermost_record() {
        let mut table = SymbolTable::new();
        assert!(table.insert(SymbolRecord::variable("x", DataType::Int)));

        table.enter_scope();
        assert!(table.insert(SymbolRecord::variable("x", DataType::Float)));
        assert_eq!(table.lookup("x").map(|r| r.data_type), Some(DataType::Float));

        let mut sink = TraceLog::new();
        table.exit_scope(&mut sink);
        assert_eq!(table.lookup("x").map(|r| r.data_type), Some(DataType::Int));
    }

    #[test]
    fn test_insert_rejects_duplicates_without_mutating() {
        let mut table = SymbolTable::new();
        assert!(table.insert(SymbolRecord::variable("x", DataType::Int)));
        assert!(!table.insert(SymbolRecord::variable("x", DataType::Float)));
        assert_eq!(table.lookup("x").map(|r| r.data_type), Some(DataType::Int));
    }

    #[test]
    fn test_lookup_current_scope_ignores_outer_scopes() {
        let mut table = SymbolTable::new();
        table.insert(SymbolRecord::variable("x", DataType::Int));
        table.enter_scope();
        assert!(table.lookup_current_scope("x").is_none());
        assert!(table.lookup("x").is_some());
    }

    #[test]
    fn test_scope_ids_grow_monotonically() {
        let mut table = SymbolTable::new();
        assert_eq!(table.current_scope_id(), 1);
        table.enter_scope();
        assert_eq!(table.current_scope_id(), 2);
        let mut sink = TraceLog::new();
        table.exit_scope(&mut sink);
        table.enter_scope();
        // 编号只增不回收
        assert_eq!(table.current_scope_id(), 3);
    }

    #[test]
    fn test_dump_is_deterministic_for_the_same_insertions() {
        let build = || {
            let mut table = SymbolTable::new();
            // "ab" 和 "ba" 的字节和相同，必然落在同一个桶里
            table.insert(SymbolRecord::variable("ab", DataType::Int));
            table.insert(SymbolRecord::variable("ba", DataType::Float));
            table.insert(SymbolRecord::array("arr", DataType::Int, 4));
            table
        };
        let mut first = TraceLog::new();
        build().print_current_scope(&mut first);
        let mut second = TraceLog::new();
        build().print_current_scope(&mut second);
        assert_eq!(first.entries(), second.entries());
        // 同桶链内保持插入顺序
        let dump = first.entries().join("\n");
        let ab = dump.find("<ab:").expect("ab missing from the dump");
        let ba = dump.find("<ba:").expect("ba missing from the dump");
        assert!(ab < ba);
    }

    #[test]
    fn test_every_scope_is_dumped_exactly_once() {
        // 两个嵌套作用域加全局作用域：日志里应有三个转储块
        let report = analyze_clean("int main(){ { int x; x = 1; } int y; y = 2; }");
        let dumps = report.log.matches("ScopeTable #").count();
        assert_eq!(dumps, 3);
    }

    #[test]
    fn test_global_scope_survives_to_teardown() {
        let report = analyze_clean("int x; int main(){ return 0; }");
        // 全局作用域（编号 1）在收尾时转储，函数记录在里面
        assert!(report.log.contains("ScopeTable # 1"));
        assert!(report.log.contains("main: int function [params=()]"));
        assert!(report.log.contains("x: int variable"));
    }
}

// --- 诊断顺序与计数 ---

#[cfg(test)]
mod ordering {
    use super::*;

    const MESSY: &str = "int x;\n\
                         int x;\n\
                         void f(){}\n\
                         int main(){\n\
                         int a[3];\n\
                         a[1.5] = 2;\n\
                         x = f();\n\
                         foo();\n\
                         return 0;\n\
                         }";

    #[test]
    fn test_diagnostic_lines_are_nondecreasing() {
        let report = analyze(MESSY);
        let numbers = diagnostic_line_numbers(&report);
        assert!(numbers.windows(2).all(|pair| pair[0] <= pair[1]));
    }

    #[test]
    fn test_error_count_matches_the_emitted_lines() {
        let report = analyze(MESSY);
        let lines = diagnostic_lines(&report);
        assert_eq!(report.error_count, lines.len());
        assert!(report
            .errors
            .ends_with(&format!("Total errors: {}\n", lines.len())));
    }

    #[test]
    fn test_diagnostics_also_appear_in_the_log() {
        let report = analyze(MESSY);
        for line in diagnostic_lines(&report) {
            assert!(report.log.contains(&line), "log is missing: {}", line);
        }
    }

    #[test]
    fn test_clean_input_reports_zero_errors() {
        let report = analyze_clean("int main(){ int x; x = 1; return x; }");
        assert_eq!(report.errors, "Total errors: 0\n");
    }
}

// --- 归约日志 ---

#[cfg(test)]
mod log_output {
    use super::*;

    #[test]
    fn test_reductions_are_traced_with_line_numbers() {
        let report = analyze_clean("int x;");
        assert!(report.log.contains("At line no: 1 type_specifier : INT"));
        assert!(report.log.contains("At line no: 1 declaration_list : ID"));
        assert!(report
            .log
            .contains("At line no: 1 var_declaration : type_specifier declaration_list SEMICOLON"));
        assert!(report.log.contains("At line no: 1 start : program"));
    }

    #[test]
    fn test_expression_chain_reductions_are_traced() {
        let report = analyze_clean("int main(){ int x; x = 1; }");
        for production in [
            "factor : CONST_INT",
            "unary_expression : factor",
            "term : unary_expression",
            "simple_expression : term",
            "rel_expression : simple_expression",
            "logic_expression : rel_expression",
            "expression : variable ASSIGNOP logic_expression",
            "expression_statement : expression SEMICOLON",
        ] {
            assert!(
                report.log.contains(production),
                "log is missing `{}`",
                production
            );
        }
    }

    #[test]
    fn test_log_ends_with_the_totals() {
        let report = analyze("int x;\nint x;");
        assert!(report.log.ends_with("Total lines: 2\nTotal errors: 1\n"));
    }

    #[test]
    fn test_println_renders_as_printf() {
        let report = analyze_clean("int main(){ int x; println(x); }");
        assert!(report.log.contains("printf(x);"));
        assert!(report
            .log
            .contains("statement : PRINTLN LPAREN ID RPAREN SEMICOLON"));
    }
}
