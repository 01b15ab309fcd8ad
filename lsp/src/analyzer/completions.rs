use crate::docs::{ClassDoc, DocSource, FunctionDoc};
use once_cell::sync::Lazy;
use regex::Regex;
use ropey::Rope;
use serde::Serialize;
use tower_lsp::lsp_types::{CompletionItem, CompletionItemKind, Documentation, InsertTextFormat, Position};

static MEMBER_ACCESS: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"(\w+)\.(\w*)$").ok());
static CALL_ARGUMENT: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"\w+\s*\(\s*\w*$").ok());
static BARE_WORD: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"\b\w+$").ok());
static TRAILING_WORD: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"\w*$").ok());

fn is_match(re: &Lazy<Option<Regex>>, text: &str) -> bool {
    re.as_ref().is_some_and(|re| re.is_match(text))
}

const KEYWORDS: &[&str] = &[
    "if", "else", "while", "for", "loop", "break", "continue", "return", "try", "catch", "throw", "class", "extends",
    "static", "global", "local",
];

const HOTKEY_KEYS: &[(&str, &str)] = &[
    ("F1", "Function key F1"),
    ("F2", "Function key F2"),
    ("F3", "Function key F3"),
    ("F4", "Function key F4"),
    ("F5", "Function key F5"),
    ("F6", "Function key F6"),
    ("F7", "Function key F7"),
    ("F8", "Function key F8"),
    ("F9", "Function key F9"),
    ("F10", "Function key F10"),
    ("F11", "Function key F11"),
    ("F12", "Function key F12"),
    ("Ctrl", "Control modifier (^)"),
    ("Alt", "Alt modifier (!)"),
    ("Shift", "Shift modifier (+)"),
    ("Win", "Windows modifier (#)"),
];

/// Syntactic situation at the cursor, decided from the current line alone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum CompletionContext {
    Directive,
    Hotkey,
    /// `receiver.partial`; the receiver is matched against class names only.
    Member { receiver: String },
    FunctionCall,
    Variable,
    Global,
}

/// Classify `before_cursor` (the current line up to the cursor); `line` is the whole line.
pub fn detect_context(line: &str, before_cursor: &str) -> CompletionContext {
    if before_cursor.trim_start().starts_with('#') {
        return CompletionContext::Directive;
    }
    if line.contains("::") && !line.trim_start().starts_with(';') {
        return CompletionContext::Hotkey;
    }
    if let Some(caps) = MEMBER_ACCESS.as_ref().and_then(|re| re.captures(before_cursor)) {
        let receiver = caps.get(1).map_or("", |m| m.as_str()).to_string();
        return CompletionContext::Member { receiver };
    }
    if is_match(&CALL_ARGUMENT, before_cursor) {
        return CompletionContext::FunctionCall;
    }
    if is_match(&BARE_WORD, before_cursor) && !before_cursor.contains('(') {
        return CompletionContext::Variable;
    }
    CompletionContext::Global
}

/// Current line and the text before the cursor. The position is 0-based and
/// counts characters; out-of-range positions clamp to the nearest valid spot.
fn line_at(source: &str, position: Position) -> (String, String) {
    let rope = Rope::from_str(source);
    let idx = position.line as usize;
    if idx >= rope.len_lines() {
        return (String::new(), String::new());
    }
    let line: String = rope.line(idx).chars().filter(|c| *c != '\n' && *c != '\r').collect();
    let before: String = line.chars().take(position.character as usize).collect();
    (line, before)
}

fn trailing_word(text: &str) -> &str {
    TRAILING_WORD
        .as_ref()
        .and_then(|re| re.find(text))
        .map_or("", |m| m.as_str())
}

/// Ranked completion candidates for the cursor position.
pub fn get_completions(source: &str, position: Position, docs: &dyn DocSource) -> Vec<CompletionItem> {
    let (line, before) = line_at(source, position);
    let context = detect_context(&line, &before);
    let prefix = trailing_word(&before);
    tracing::debug!(?context, prefix, "completion context");

    let items = match &context {
        CompletionContext::Directive => directive_items(docs, prefix),
        CompletionContext::Hotkey => hotkey_items(),
        CompletionContext::Member { receiver } => docs.find_class(receiver).map(member_items).unwrap_or_default(),
        CompletionContext::FunctionCall => function_items(docs, prefix),
        CompletionContext::Variable => variable_items(docs, prefix),
        CompletionContext::Global => {
            let mut items = function_items(docs, prefix);
            items.extend(variable_items(docs, prefix));
            items.extend(class_items(docs, prefix));
            items.extend(keyword_items());
            items
        }
    };
    rank(items, prefix)
}

fn rank(mut items: Vec<CompletionItem>, prefix: &str) -> Vec<CompletionItem> {
    if !prefix.is_empty() {
        let wanted = prefix.to_lowercase();
        items.retain(|item| {
            item.label
                .trim_start_matches('#')
                .to_lowercase()
                .starts_with(&wanted)
        });
    }
    items.sort_by(|a, b| a.sort_text.cmp(&b.sort_text).then_with(|| a.label.cmp(&b.label)));
    items
}

fn item(label: &str, kind: CompletionItemKind, detail: String, documentation: &str, sort: &str) -> CompletionItem {
    CompletionItem {
        label: label.to_string(),
        kind: Some(kind),
        detail: Some(detail),
        documentation: (!documentation.is_empty()).then(|| Documentation::String(documentation.to_string())),
        insert_text: Some(label.to_string()),
        sort_text: Some(format!("{}_{}", sort, label)),
        ..Default::default()
    }
}

fn snippet(mut item: CompletionItem, text: String) -> CompletionItem {
    item.insert_text = Some(text);
    item.insert_text_format = Some(InsertTextFormat::SNIPPET);
    item
}

fn function_items(docs: &dyn DocSource, prefix: &str) -> Vec<CompletionItem> {
    docs.search_functions(prefix)
        .into_iter()
        .map(|f| {
            let base = item(&f.name, CompletionItemKind::FUNCTION, f.category.clone(), &f.description, "0");
            snippet(base, f.snippet())
        })
        .collect()
}

fn variable_items(docs: &dyn DocSource, prefix: &str) -> Vec<CompletionItem> {
    docs.search_variables(prefix)
        .into_iter()
        .map(|v| {
            let detail = format!("{} - {}", v.ty, v.category);
            item(&v.name, CompletionItemKind::VARIABLE, detail, &v.description, "1")
        })
        .collect()
}

fn class_items(docs: &dyn DocSource, prefix: &str) -> Vec<CompletionItem> {
    docs.search_classes(prefix)
        .into_iter()
        .map(|c| {
            let mut it = item(&c.name, CompletionItemKind::CLASS, c.category.clone(), &c.description, "2");
            it.insert_text = Some(format!("{}()", c.name));
            it
        })
        .collect()
}

fn keyword_items() -> Vec<CompletionItem> {
    KEYWORDS
        .iter()
        .map(|kw| {
            let doc = format!("AutoHotkey v2 keyword: {}", kw);
            item(kw, CompletionItemKind::KEYWORD, "Keyword".to_string(), &doc, "3")
        })
        .collect()
}

fn directive_items(docs: &dyn DocSource, prefix: &str) -> Vec<CompletionItem> {
    docs.search_directives(prefix)
        .into_iter()
        .map(|d| item(&d.name, CompletionItemKind::KEYWORD, d.category.clone(), &d.description, "0"))
        .collect()
}

fn hotkey_items() -> Vec<CompletionItem> {
    HOTKEY_KEYS
        .iter()
        .map(|(key, description)| item(key, CompletionItemKind::KEYWORD, "Hotkey".to_string(), description, "0"))
        .collect()
}

fn method_documentation(method: &FunctionDoc) -> String {
    let mut doc = method.description.clone();
    if !method.parameters.is_empty() {
        doc.push_str("\n\nParameters:\n");
        for p in &method.parameters {
            let description = if p.description.is_empty() {
                "No description"
            } else {
                p.description.as_str()
            };
            doc.push_str(&format!("- {}: {}\n", p.name, description));
        }
    }
    if let Some(ret) = &method.return_type {
        doc.push_str(&format!("\nReturns: {}", ret));
    }
    doc
}

fn member_items(class: &ClassDoc) -> Vec<CompletionItem> {
    let methods = class.methods.iter().map(|m| {
        let detail = format!("Method - {}", m.description);
        let base = item(&m.name, CompletionItemKind::METHOD, detail, &method_documentation(m), "0");
        snippet(base, m.snippet())
    });
    let properties = class.properties.iter().map(|p| {
        let detail = format!("Property - {}", p.ty.as_deref().unwrap_or("Unknown"));
        item(&p.name, CompletionItemKind::PROPERTY, detail, &p.description, "1")
    });
    methods.chain(properties).collect()
}
