//! Tests for the scanner.

use super::*;

fn scan_all(text: &str) -> Vec<(SyntaxKind, String)> {
    let mut scanner = ScannerState::new(text);
    let mut tokens = Vec::new();
    loop {
        let kind = scanner.scan();
        if kind == SyntaxKind::EndOfFileToken {
            break;
        }
        tokens.push((kind, scanner.token_text().to_string()));
    }
    tokens
}

fn kinds(text: &str) -> Vec<SyntaxKind> {
    scan_all(text).into_iter().map(|(kind, _)| kind).collect()
}

#[test]
fn test_punctuation_longest_match() {
    assert_eq!(
        kinds("a >>>= b ?? c ??= d ... => === !== **="),
        vec![
            SyntaxKind::Identifier,
            SyntaxKind::GreaterThanGreaterThanGreaterThanEqualsToken,
            SyntaxKind::Identifier,
            SyntaxKind::QuestionQuestionToken,
            SyntaxKind::Identifier,
            SyntaxKind::QuestionQuestionEqualsToken,
            SyntaxKind::Identifier,
            SyntaxKind::DotDotDotToken,
            SyntaxKind::EqualsGreaterThanToken,
            SyntaxKind::EqualsEqualsEqualsToken,
            SyntaxKind::ExclamationEqualsEqualsToken,
            SyntaxKind::AsteriskAsteriskEqualsToken,
        ]
    );
}

#[test]
fn test_optional_chain_vs_conditional_decimal() {
    assert_eq!(
        kinds("a?.b"),
        vec![
            SyntaxKind::Identifier,
            SyntaxKind::QuestionDotToken,
            SyntaxKind::Identifier
        ]
    );
    assert_eq!(
        kinds("a?.5:b"),
        vec![
            SyntaxKind::Identifier,
            SyntaxKind::QuestionToken,
            SyntaxKind::NumericLiteral,
            SyntaxKind::ColonToken,
            SyntaxKind::Identifier
        ]
    );
}

#[test]
fn test_keywords_and_contextual_keywords() {
    let tokens = kinds("await async for of let const var yield instanceof");
    assert_eq!(
        tokens,
        vec![
            SyntaxKind::AwaitKeyword,
            SyntaxKind::AsyncKeyword,
            SyntaxKind::ForKeyword,
            SyntaxKind::OfKeyword,
            SyntaxKind::LetKeyword,
            SyntaxKind::ConstKeyword,
            SyntaxKind::VarKeyword,
            SyntaxKind::YieldKeyword,
            SyntaxKind::InstanceOfKeyword,
        ]
    );
    assert!(SyntaxKind::AwaitKeyword.is_contextual_keyword());
    assert!(!SyntaxKind::VarKeyword.is_contextual_keyword());
    assert!(SyntaxKind::VarKeyword.is_identifier_or_keyword());
}

#[test]
fn test_escaped_keyword_is_identifier() {
    assert_eq!(kinds("\\u0061wait"), vec![SyntaxKind::Identifier]);
    assert_eq!(kinds("\\u{61}sync"), vec![SyntaxKind::Identifier]);
}

#[test]
fn test_numeric_literals() {
    let tokens = scan_all("0 1.5 .5 1e10 1_000 0xFF 0o17 0b101 10n 0x1Fn 1.e3");
    let kinds: Vec<_> = tokens.iter().map(|(kind, _)| *kind).collect();
    assert_eq!(
        kinds,
        vec![
            SyntaxKind::NumericLiteral,
            SyntaxKind::NumericLiteral,
            SyntaxKind::NumericLiteral,
            SyntaxKind::NumericLiteral,
            SyntaxKind::NumericLiteral,
            SyntaxKind::NumericLiteral,
            SyntaxKind::NumericLiteral,
            SyntaxKind::NumericLiteral,
            SyntaxKind::BigIntLiteral,
            SyntaxKind::BigIntLiteral,
            SyntaxKind::NumericLiteral,
        ]
    );
    assert_eq!(tokens[4].1, "1_000");
    assert_eq!(tokens[10].1, "1.e3");
}

#[test]
fn test_identifier_after_number_is_an_error() {
    let mut scanner = ScannerState::new("3in x");
    scanner.scan();
    assert_eq!(scanner.scanner_diagnostics().len(), 1);
    assert_eq!(scanner.scanner_diagnostics()[0].code, 1351);
}

#[test]
fn test_string_literals_with_escapes() {
    let tokens = scan_all(r#"'it\'s' "a\"b" 'line\
continued'"#);
    assert_eq!(tokens.len(), 3);
    assert!(tokens.iter().all(|(kind, _)| *kind == SyntaxKind::StringLiteral));
    assert_eq!(tokens[0].1, r"'it\'s'");
}

#[test]
fn test_unterminated_string_reports_diagnostic() {
    let mut scanner = ScannerState::new("'abc\nfoo");
    assert_eq!(scanner.scan(), SyntaxKind::StringLiteral);
    let diags = scanner.scanner_diagnostics();
    assert_eq!(diags.len(), 1);
    assert_eq!(diags[0].message, "Unterminated string literal.");
}

#[test]
fn test_line_break_tracking() {
    let mut scanner = ScannerState::new("a\nb /* x */ c /*\n*/ d // e\n f");
    scanner.scan();
    assert!(!scanner.has_preceding_line_break());
    scanner.scan();
    assert!(scanner.has_preceding_line_break(), "b follows a newline");
    scanner.scan();
    assert!(
        !scanner.has_preceding_line_break(),
        "single-line block comment is not a line break"
    );
    scanner.scan();
    assert!(
        scanner.has_preceding_line_break(),
        "multi-line block comment counts as a line break"
    );
    assert_eq!(scanner.token_text(), "d");
    scanner.scan();
    assert!(scanner.has_preceding_line_break());
    assert_eq!(scanner.token_text(), "f");
}

#[test]
fn test_unicode_line_separator_ends_line_comment() {
    let mut scanner = ScannerState::new("// comment é\u{2028}x");
    assert_eq!(scanner.scan(), SyntaxKind::Identifier);
    assert_eq!(scanner.token_text(), "x");
    assert!(scanner.has_preceding_line_break());
}

#[test]
fn test_html_like_comments() {
    assert_eq!(kinds("a <!-- hidden\nb"), vec![SyntaxKind::Identifier, SyntaxKind::Identifier]);
    assert_eq!(kinds("a\n--> hidden\nb"), vec![SyntaxKind::Identifier, SyntaxKind::Identifier]);
    // Mid-line `-->` is a decrement followed by a comparison
    assert_eq!(
        kinds("a --> b"),
        vec![
            SyntaxKind::Identifier,
            SyntaxKind::MinusMinusToken,
            SyntaxKind::GreaterThanToken,
            SyntaxKind::Identifier
        ]
    );
}

#[test]
fn test_unterminated_block_comment() {
    let mut scanner = ScannerState::new("a /* never closed");
    scanner.scan();
    assert_eq!(scanner.scan(), SyntaxKind::EndOfFileToken);
    assert_eq!(scanner.scanner_diagnostics()[0].code, 1010);
}

#[test]
fn test_template_rescan() {
    let mut scanner = ScannerState::new("`a${b}c${d}e`");
    assert_eq!(scanner.scan(), SyntaxKind::TemplateHead);
    assert_eq!(scanner.token_text(), "`a${");
    assert_eq!(scanner.scan(), SyntaxKind::Identifier);
    assert_eq!(scanner.scan(), SyntaxKind::CloseBraceToken);
    assert_eq!(scanner.re_scan_template_token(), SyntaxKind::TemplateMiddle);
    assert_eq!(scanner.token_text(), "}c${");
    assert_eq!(scanner.scan(), SyntaxKind::Identifier);
    assert_eq!(scanner.scan(), SyntaxKind::CloseBraceToken);
    assert_eq!(scanner.re_scan_template_token(), SyntaxKind::TemplateTail);
    assert_eq!(scanner.token_text(), "}e`");
    assert_eq!(scanner.scan(), SyntaxKind::EndOfFileToken);
}

#[test]
fn test_no_substitution_template_spans_lines() {
    let tokens = scan_all("`line1\nline2`");
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].0, SyntaxKind::NoSubstitutionTemplateLiteral);
}

#[test]
fn test_regex_rescan() {
    let mut scanner = ScannerState::new("/[/]\\//gi.test(x)");
    assert_eq!(scanner.scan(), SyntaxKind::SlashToken);
    assert_eq!(
        scanner.re_scan_slash_token(),
        SyntaxKind::RegularExpressionLiteral
    );
    assert_eq!(scanner.token_text(), "/[/]\\//gi");
    assert_eq!(scanner.scan(), SyntaxKind::DotToken);
}

#[test]
fn test_regex_rescan_from_slash_equals() {
    let mut scanner = ScannerState::new("/=a/");
    assert_eq!(scanner.scan(), SyntaxKind::SlashEqualsToken);
    assert_eq!(
        scanner.re_scan_slash_token(),
        SyntaxKind::RegularExpressionLiteral
    );
    assert_eq!(scanner.token_text(), "/=a/");
}

#[test]
fn test_unterminated_regex() {
    let mut scanner = ScannerState::new("/abc\n/");
    scanner.scan();
    scanner.re_scan_slash_token();
    assert_eq!(scanner.scanner_diagnostics()[0].code, 1161);
}

#[test]
fn test_private_identifier() {
    let tokens = scan_all("#count this.#count");
    assert_eq!(tokens[0], (SyntaxKind::PrivateIdentifier, "#count".to_string()));
    assert_eq!(tokens[3], (SyntaxKind::PrivateIdentifier, "#count".to_string()));
}

#[test]
fn test_invalid_character() {
    let mut scanner = ScannerState::new("a @ b");
    scanner.scan();
    assert_eq!(scanner.scan(), SyntaxKind::Unknown);
    assert_eq!(scanner.scanner_diagnostics()[0].code, 1127);
}

#[test]
fn test_snapshot_restore_discards_diagnostics() {
    let mut scanner = ScannerState::new("a @ b");
    scanner.scan();
    let snapshot = scanner.save_state();
    scanner.scan();
    assert_eq!(scanner.scanner_diagnostics().len(), 1);
    scanner.restore_state(snapshot);
    assert!(scanner.scanner_diagnostics().is_empty());
    assert_eq!(scanner.token_text(), "a");
}

#[test]
fn test_non_ascii_identifiers() {
    let tokens = scan_all("café π_2");
    assert_eq!(tokens.len(), 2);
    assert_eq!(tokens[0].1, "café");
    assert_eq!(tokens[1].1, "π_2");
}

#[test]
fn test_binary_precedence_table() {
    assert!(
        SyntaxKind::AsteriskToken.binary_precedence() > SyntaxKind::PlusToken.binary_precedence()
    );
    assert!(
        SyntaxKind::AmpersandAmpersandToken.binary_precedence()
            > SyntaxKind::BarBarToken.binary_precedence()
    );
    assert_eq!(SyntaxKind::EqualsToken.binary_precedence(), 0);
    assert!(SyntaxKind::BarBarEqualsToken.is_assignment_operator());
    assert!(!SyntaxKind::EqualsEqualsToken.is_assignment_operator());
}
