use ahk_lsp::{AhkAnalyzer, DocIndex};
use std::sync::Arc;
use tower_lsp::lsp_types::{CompletionItemKind, InsertTextFormat, Position};

fn labels(source: &str, line: u32, character: u32) -> Vec<String> {
    AhkAnalyzer::default()
        .completions(source, Position::new(line, character))
        .into_iter()
        .map(|i| i.label)
        .collect()
}

#[test]
fn function_arguments_offer_snippets() {
    let analyzer = AhkAnalyzer::default();
    let items = analyzer.completions("MsgBox(Str", Position::new(0, 10));
    let names: Vec<&str> = items.iter().map(|i| i.label.as_str()).collect();
    assert_eq!(names, vec!["StrLen", "StrReplace", "StrSplit"]);

    let strlen = &items[0];
    assert_eq!(strlen.kind, Some(CompletionItemKind::FUNCTION));
    assert_eq!(strlen.insert_text.as_deref(), Some("StrLen(${1:String})"));
    assert_eq!(strlen.insert_text_format, Some(InsertTextFormat::SNIPPET));
    assert_eq!(strlen.sort_text.as_deref(), Some("0_StrLen"));
}

#[test]
fn builtin_variables_match_prefix_only() {
    let found = labels("if (x > 1)\n  y := A_Scr", 1, 12);
    assert_eq!(found, vec!["A_ScreenHeight", "A_ScreenWidth", "A_ScriptDir", "A_ScriptFullPath", "A_ScriptName"]);
}

#[test]
fn members_resolve_by_class_name() {
    let analyzer = AhkAnalyzer::default();
    let items = analyzer.completions("Map.Ha", Position::new(0, 6));
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].label, "Has");
    assert_eq!(items[0].kind, Some(CompletionItemKind::METHOD));

    let props = labels("Array.Len", 0, 9);
    assert_eq!(props, vec!["Length"]);

    assert!(labels("arr.Pu", 0, 6).is_empty());
}

#[test]
fn directives_ignore_the_hash_when_ranking() {
    assert_eq!(labels("#Req", 0, 4), vec!["#Requires"]);
    assert_eq!(labels("#", 0, 1).len(), DocIndex::builtin().directives.len());
}

#[test]
fn hotkey_lines_offer_keys() {
    let found = labels("F::", 0, 1);
    assert_eq!(found.len(), 12);
    assert!(found.iter().all(|l| l.starts_with('F')));
}

#[test]
fn global_context_mixes_categories_in_rank_order() {
    let analyzer = AhkAnalyzer::default();
    let items = analyzer.completions("x := ", Position::new(0, 5));
    let array = items.iter().find(|i| i.label == "Array").expect("class");
    assert_eq!(array.insert_text.as_deref(), Some("Array()"));
    assert!(items.iter().any(|i| i.label == "while" && i.kind == Some(CompletionItemKind::KEYWORD)));

    let sorts: Vec<&str> = items.iter().filter_map(|i| i.sort_text.as_deref()).collect();
    let mut sorted = sorts.clone();
    sorted.sort();
    assert_eq!(sorts, sorted);
    assert!(sorts.first().is_some_and(|s| s.starts_with("0_")));
    assert!(sorts.last().is_some_and(|s| s.starts_with("3_")));
}

#[test]
fn positions_past_the_end_fall_back_to_global() {
    assert!(!labels("x := 1", 10, 0).is_empty());
    assert_eq!(labels("F(Slee", 0, 99), vec!["Sleep"]);
}

#[test]
fn custom_index_is_used() {
    let index = DocIndex::from_json_str(
        r#"{ "functions": [{ "Name": "Greet", "Category": "Demo", "Parameters": [{ "Name": "Who" }] }] }"#,
    )
    .expect("index");
    let analyzer = AhkAnalyzer::new(Arc::new(index), Arc::new(ahk_lsp::StandardsEngine::new()));
    let items = analyzer.completions("Call(Gr", Position::new(0, 7));
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].detail.as_deref(), Some("Demo"));
    assert_eq!(items[0].insert_text.as_deref(), Some("Greet(${1:Who})"));
}
