use super::*;

/// 辅助函数：断言词法分析没有错误，并返回纯 Token 序列。
fn lex_ok(src: &str) -> Vec<Token> {
    let (tokens, errors) = lex(src);
    assert!(errors.is_empty(), "unexpected lexer errors: {:?}", errors);
    tokens.into_iter().map(|(t, _)| t).collect()
}

#[test]
fn test_keywords_and_identifiers() {
    let tokens = lex_ok("int main void x_1");
    assert_eq!(
        tokens,
        vec![
            Token::Int,
            Token::Ident("main".to_string()),
            Token::Void,
            Token::Ident("x_1".to_string()),
        ]
    );
}

#[test]
fn test_operator_classes() {
    let tokens = lex_ok("+ - * / % < <= == != && ! = ++ --");
    assert_eq!(
        tokens,
        vec![
            Token::AddOp(AddSign::Plus),
            Token::AddOp(AddSign::Minus),
            Token::MulOp(MulSign::Times),
            Token::MulOp(MulSign::Divide),
            Token::MulOp(MulSign::Modulus),
            Token::RelOp(RelSign::Lt),
            Token::RelOp(RelSign::Le),
            Token::RelOp(RelSign::Eq),
            Token::RelOp(RelSign::Ne),
            Token::LogicOp(LogicSign::And),
            Token::Not,
            Token::AssignOp,
            Token::IncOp,
            Token::DecOp,
        ]
    );
}

#[test]
fn test_numeric_literals_keep_their_text() {
    let tokens = lex_ok("42 0 2.5 1.0E3");
    assert_eq!(
        tokens,
        vec![
            Token::ConstInt("42".to_string()),
            Token::ConstInt("0".to_string()),
            Token::ConstFloat("2.5".to_string()),
            Token::ConstFloat("1.0E3".to_string()),
        ]
    );
}

#[test]
fn test_println_and_printf_share_a_token() {
    // 两种拼写都应归到 Println，渲染阶段统一输出 printf
    assert_eq!(lex_ok("println"), vec![Token::Println]);
    assert_eq!(lex_ok("printf"), vec![Token::Println]);
}

#[test]
fn test_comments_and_whitespace_are_skipped() {
    let tokens = lex_ok("int x; // line comment\n/* block\ncomment */ float y;");
    assert_eq!(
        tokens,
        vec![
            Token::Int,
            Token::Ident("x".to_string()),
            Token::Semicolon,
            Token::Float,
            Token::Ident("y".to_string()),
            Token::Semicolon,
        ]
    );
}

#[test]
fn test_unrecognized_character_is_reported() {
    let (tokens, errors) = lex("int x @ y;");
    assert_eq!(errors.len(), 1);
    // 错误不应该打断后续的分词
    assert_eq!(tokens.len(), 4);
}

#[test]
fn test_spans_cover_the_token_text() {
    let (tokens, _) = lex("int abc");
    let (_, span) = &tokens[1];
    assert_eq!(span.start, 4);
    assert_eq!(span.end, 7);
}
