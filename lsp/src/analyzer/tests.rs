use super::*;
use crate::standards::Violation;
use ahk_core::diagnostic::{DiagnosticCode, Severity};
use tower_lsp::lsp_types::{DiagnosticSeverity, NumberOrString, Position};

use SemanticTokenModifier as M;
use SemanticTokenType as T;

fn find<'a>(tokens: &'a [SemanticToken], line: u32, character: u32) -> &'a SemanticToken {
    tokens
        .iter()
        .find(|t| t.line == line && t.character == character)
        .unwrap_or_else(|| panic!("no token at {line}:{character}: {tokens:?}"))
}

fn codes(diagnostics: &[Diagnostic]) -> Vec<DiagnosticCode> {
    diagnostics.iter().map(|d| d.code).collect()
}

#[test]
fn test_function_declaration_and_parameters() {
    let tokens = classify_semantic_tokens("MyFunc(a, b) {\n  return a + b\n}");

    let name = find(&tokens, 0, 0);
    assert_eq!(name.token_type, T::Function);
    assert_eq!(name.length, 6);
    assert!(name.has(M::Declaration));

    assert_eq!(find(&tokens, 0, 7).token_type, T::Parameter);
    assert_eq!(find(&tokens, 0, 10).token_type, T::Parameter);
    assert_eq!(find(&tokens, 0, 6).token_type, T::Delimiter);

    assert_eq!(find(&tokens, 1, 2).token_type, T::Keyword);
    assert_eq!(find(&tokens, 1, 9).token_type, T::Variable);
    assert_eq!(find(&tokens, 2, 0).token_type, T::Delimiter);
}

#[test]
fn test_lines_and_columns_are_zero_based() {
    let tokens = classify_semantic_tokens("x := 1\n    y := 2");
    assert_eq!((tokens[0].line, tokens[0].character), (0, 0));
    let y = tokens.iter().find(|t| t.length == 1 && t.line == 1).expect("y");
    assert_eq!(y.character, 4);
    assert!(tokens.iter().all(|t| t.line <= 1));
}

#[test]
fn test_call_arguments_are_not_parameters() {
    let tokens = classify_semantic_tokens("MsgBox(a)");
    let call = find(&tokens, 0, 0);
    assert_eq!(call.token_type, T::Function);
    assert!(call.has(M::DefaultLibrary));
    assert!(!call.has(M::Declaration));
    assert_eq!(find(&tokens, 0, 7).token_type, T::Variable);
}

#[test]
fn test_brace_on_next_line_still_declares() {
    let tokens = classify_semantic_tokens("Helper(x)\n{\n}");
    assert!(find(&tokens, 0, 0).has(M::Declaration));
    assert_eq!(find(&tokens, 0, 7).token_type, T::Parameter);
}

#[test]
fn test_members_and_classes() {
    let tokens = classify_semantic_tokens("class Foo extends Bar {\n}\nwin.Show()\nt := win.Title");
    let foo = find(&tokens, 0, 6);
    assert_eq!(foo.token_type, T::Class);
    assert!(foo.has(M::Declaration));
    assert_eq!(find(&tokens, 0, 18).token_type, T::Class);
    assert_eq!(find(&tokens, 2, 0).token_type, T::Variable);
    assert_eq!(find(&tokens, 2, 3).token_type, T::Operator);
    assert_eq!(find(&tokens, 2, 4).token_type, T::Method);
    assert_eq!(find(&tokens, 3, 9).token_type, T::Property);
}

#[test]
fn test_builtin_variables_literals_and_doc_comments() {
    let tokens = classify_semantic_tokens("x := A_Now ; @param doc\ny := true");
    let now = find(&tokens, 0, 5);
    assert_eq!(now.token_type, T::Variable);
    assert!(now.has(M::Readonly) && now.has(M::DefaultLibrary));

    let comment = find(&tokens, 0, 11);
    assert_eq!(comment.token_type, T::Comment);
    assert!(comment.has(M::Documentation));

    let truth = find(&tokens, 1, 5);
    assert_eq!(truth.token_type, T::Keyword);
    assert_eq!(truth.modifiers, vec![M::Readonly]);
}

#[test]
fn test_hotkeys_directives_and_lengths() {
    let tokens = classify_semantic_tokens("#SingleInstance\nF1::Send(\"é\")");
    assert_eq!(find(&tokens, 0, 0).token_type, T::Macro);
    let hotkey = find(&tokens, 1, 0);
    assert_eq!(hotkey.token_type, T::Label);
    assert_eq!(hotkey.length, 4);
    let string = find(&tokens, 1, 9);
    assert_eq!(string.token_type, T::String);
    assert_eq!(string.length, 3);
}

#[test]
fn test_unterminated_string_keeps_prefix() {
    let tokens = classify_semantic_tokens("x := \"abc");
    assert_eq!(tokens[0].token_type, T::Variable);
    assert_eq!(tokens[1].token_type, T::Operator);
}

#[test]
fn test_delta_encoding() {
    let tokens = classify_semantic_tokens("MyFunc(a) {\n  return a\n}");
    let encoded = encode_semantic_tokens(&tokens);
    assert_eq!(encoded.len(), tokens.len());

    assert_eq!((encoded[0].delta_line, encoded[0].delta_start, encoded[0].length), (0, 0, 6));
    assert_eq!(encoded[0].token_type, T::Function.index());
    assert_eq!(encoded[0].token_modifiers_bitset, M::Declaration.bit());
    assert_eq!((encoded[1].delta_line, encoded[1].delta_start), (0, 6));

    let ret = tokens.iter().position(|t| t.token_type == T::Keyword).expect("return");
    assert_eq!((encoded[ret].delta_line, encoded[ret].delta_start), (1, 2));
}

#[test]
fn test_legend_matches_indices() {
    let legend = legend();
    assert_eq!(legend.token_types.len(), SemanticTokenType::ALL.len());
    for ty in SemanticTokenType::ALL {
        assert_eq!(legend.token_types[ty.index() as usize].as_str(), ty.as_str());
    }
    assert_eq!(legend.token_modifiers[2].as_str(), "defaultLibrary");
}

#[test]
fn test_completion_context_order() {
    assert_eq!(detect_context("#Req", "#Req"), CompletionContext::Directive);
    assert_eq!(detect_context("^j::Send", "^j::Se"), CompletionContext::Hotkey);
    assert_eq!(detect_context("; a::b", "; a::b"), CompletionContext::Variable);
    assert_eq!(
        detect_context("Map.Ge", "Map.Ge"),
        CompletionContext::Member {
            receiver: "Map".to_string()
        }
    );
    assert_eq!(detect_context("MsgBox(tex", "MsgBox(tex"), CompletionContext::FunctionCall);
    assert_eq!(detect_context("x := val", "x := val"), CompletionContext::Variable);
    assert_eq!(detect_context("x := ", "x := "), CompletionContext::Global);
}

#[test]
fn test_builtin_variable_prefix() {
    let analyzer = AhkAnalyzer::default();
    let items = analyzer.completions("x := A_", Position::new(0, 7));
    assert!(!items.is_empty());
    assert!(items.iter().all(|i| i.label.starts_with("A_")), "{items:?}");
}

#[test]
fn test_provider_brackets_skip_strings_and_comments() {
    let provider = DiagnosticProvider::default();
    let options = DiagnosticOptions::default();

    let clean = "#Requires AutoHotkey v2.0\ns := \"(\" ; }\nt := \"a`\"(\"";
    let found = codes(&provider.diagnose(clean, &options));
    assert!(!found.iter().any(|c| matches!(
        c,
        DiagnosticCode::UnmatchedBrace
            | DiagnosticCode::UnmatchedParen
            | DiagnosticCode::UnclosedBrace
            | DiagnosticCode::UnclosedParen
    )));

    let broken = provider.diagnose("#Requires AutoHotkey v2.0\nF() {\n  x := 1)\n", &options);
    let unmatched = broken.iter().find(|d| d.code == DiagnosticCode::UnmatchedParen).expect("paren");
    assert_eq!((unmatched.range.start.line, unmatched.range.start.column), (3, 9));
    let unclosed = broken.iter().find(|d| d.code == DiagnosticCode::UnclosedBrace).expect("brace");
    assert_eq!(unclosed.range.start.offset, 30);
    assert_eq!(unclosed.source, PROVIDER_SOURCE);
}

#[test]
fn test_provider_line_heuristics() {
    let provider = DiagnosticProvider::default();
    let options = DiagnosticOptions::default();

    let src = "#Requires AutoHotkey v2.0\ndoThing() {\n}\nif (x) {\n}\nF1::\n\nF2::\n{\n}";
    let diagnostics = provider.diagnose(src, &options);
    let naming: Vec<_> = diagnostics.iter().filter(|d| d.code == DiagnosticCode::FunctionNaming).collect();
    assert_eq!(naming.len(), 1);
    assert_eq!(naming[0].severity, Severity::Hint);
    assert!(naming[0].message.contains("doThing"));

    let empty: Vec<_> = diagnostics.iter().filter(|d| d.code == DiagnosticCode::EmptyHotkey).collect();
    assert_eq!(empty.len(), 1);
    assert_eq!(empty[0].range.start.line, 6);
    assert!(!codes(&diagnostics).contains(&DiagnosticCode::MissingDirective));
}

#[test]
fn test_missing_directive_looks_at_first_five_lines() {
    let provider = DiagnosticProvider::default();
    let options = DiagnosticOptions::default();
    let late = "x := 1\n\n\n\n\n#Requires AutoHotkey v2.0";
    assert!(codes(&provider.diagnose(late, &options)).contains(&DiagnosticCode::MissingDirective));
    assert!(provider.diagnose("  \n", &options).is_empty());
}

#[test]
fn test_standards_mapping_and_toggle() {
    let provider = DiagnosticProvider::default();
    let src = "#Requires AutoHotkey v2.0\nobj := new Thing()";

    let diagnostics = provider.diagnose(src, &DiagnosticOptions::default());
    let standard = diagnostics
        .iter()
        .find(|d| d.code == DiagnosticCode::StandardsViolation)
        .expect("standards");
    assert_eq!(standard.rule_id.as_deref(), Some("standards.no_new_keyword"));
    assert_eq!(standard.source, STANDARDS_SOURCE);
    assert_eq!(standard.severity, Severity::Error);
    assert_eq!((standard.range.start.line, standard.range.start.column), (2, 8));

    let options = DiagnosticOptions {
        enable_standards: false,
        ..DiagnosticOptions::default()
    };
    assert!(provider.diagnose(src, &options).is_empty());
}

#[test]
fn test_severity_filter() {
    let provider = DiagnosticProvider::default();
    let only_warnings = DiagnosticOptions {
        severity_filter: Some("warning".to_string()),
        ..DiagnosticOptions::default()
    };
    let found = provider.diagnose("value = 10", &only_warnings);
    assert_eq!(codes(&found), vec![DiagnosticCode::LegacyAssignment]);
    assert_eq!(found[0].range.start.column, 7);

    let everything = DiagnosticOptions {
        severity_filter: Some("all".to_string()),
        ..DiagnosticOptions::default()
    };
    assert_eq!(
        provider.diagnose("value = 10", &everything),
        provider.diagnose("value = 10", &DiagnosticOptions::default())
    );
}

struct OneRule;

impl RuleEngine for OneRule {
    fn validate(&self, _source: &str) -> Vec<Violation> {
        vec![Violation {
            rule: "custom".to_string(),
            message: "custom rule".to_string(),
            line: 1,
            column: 0,
            severity: Severity::Info,
            suggestion: None,
        }]
    }
}

#[test]
fn test_injected_rule_engine() {
    let analyzer = AhkAnalyzer::new(Arc::new(DocIndex::default()), Arc::new(OneRule));
    let diagnostics = analyzer.diagnose("#Requires AutoHotkey v2.0", &DiagnosticOptions::default());
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].rule_id.as_deref(), Some("standards.custom"));
    assert!(analyzer.completions("x := A_", Position::new(0, 7)).is_empty());
}

#[test]
fn test_lsp_conversion_is_zero_based() {
    let analyzer = AhkAnalyzer::default();
    let diagnostics = analyzer.lsp_diagnostics("x := 5\ny = 10", &DiagnosticOptions::default());
    let warning = diagnostics
        .iter()
        .find(|d| d.code == Some(NumberOrString::String("UseAssignmentOperator".to_string())))
        .expect("lint warning");
    assert_eq!(warning.severity, Some(DiagnosticSeverity::WARNING));
    assert_eq!(warning.range.start, Position::new(1, 2));
    assert_eq!(warning.source.as_deref(), Some(ahk_core::diagnostic::LINT_SOURCE));
}

#[test]
fn test_repeated_calls_agree() {
    let analyzer = AhkAnalyzer::default();
    let src = "F(a) {\n  return a\n}\nx = F(1)\n}";
    let options = DiagnosticOptions::default();
    assert_eq!(analyzer.diagnose(src, &options), analyzer.diagnose(src, &options));
    assert_eq!(analyzer.semantic_tokens(src), analyzer.semantic_tokens(src));
    assert_eq!(analyzer.lint(src), analyzer.lint(src));
}
