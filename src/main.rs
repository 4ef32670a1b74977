// src/main.rs

use clap::Parser;
use minic::analyze_source;
use std::fs;
use std::path::Path;

/// MiniC 语言的语义分析器。
/// 读取一个源文件，输出归约日志和按行号排列的诊断文件。
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// 需要分析的源文件路径
    input_file: Option<String>,
}

fn main() {
    let cli = Cli::parse();

    // 调用方读取错误文件来获知分析结果，所以这里的失败
    // 一律打印短消息后以状态 0 退出。
    let Some(input_file) = cli.input_file else {
        println!("Please provide a source file to analyze.");
        return;
    };

    let input_path = Path::new(&input_file);
    let source = match fs::read_to_string(input_path) {
        Ok(source) => source,
        Err(error) => {
            println!("Cannot open '{}': {}", input_file, error);
            return;
        }
    };

    let report = analyze_source(&source);

    // 词法/语法错误只上控制台
    for error in &report.syntax_errors {
        eprintln!("{}", error);
    }

    // 语义诊断用 ariadne 渲染到控制台
    let source_name = input_path.to_str().unwrap_or("source");
    report.diagnostics.print(source_name);

    // 输出文件放在输入文件旁边：<stem>_log.txt 和 <stem>_error.txt
    let stem = input_path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("out");
    let dir = input_path.parent().unwrap_or_else(|| Path::new("."));
    let log_path = dir.join(format!("{}_log.txt", stem));
    let error_path = dir.join(format!("{}_error.txt", stem));

    if let Err(error) = fs::write(&log_path, &report.log) {
        println!("Cannot write '{}': {}", log_path.display(), error);
        return;
    }
    if let Err(error) = fs::write(&error_path, &report.errors) {
        println!("Cannot write '{}': {}", error_path.display(), error);
        return;
    }

    println!(
        "Analysis finished with {} error(s). See '{}'.",
        report.error_count,
        error_path.display()
    );
}
