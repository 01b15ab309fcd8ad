use ahk_core::token::{Token, TokenKind, Tokenizer};
use serde::Serialize;
use tower_lsp::lsp_types as lsp;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SemanticTokenType {
    Keyword,
    Number,
    String,
    Comment,
    Operator,
    Delimiter,
    Macro,
    Label,
    Variable,
    Function,
    Method,
    Property,
    Parameter,
    Class,
}

impl SemanticTokenType {
    /// Legend order; `index` is the position in this array.
    pub const ALL: [SemanticTokenType; 14] = [
        SemanticTokenType::Keyword,
        SemanticTokenType::Number,
        SemanticTokenType::String,
        SemanticTokenType::Comment,
        SemanticTokenType::Operator,
        SemanticTokenType::Delimiter,
        SemanticTokenType::Macro,
        SemanticTokenType::Label,
        SemanticTokenType::Variable,
        SemanticTokenType::Function,
        SemanticTokenType::Method,
        SemanticTokenType::Property,
        SemanticTokenType::Parameter,
        SemanticTokenType::Class,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SemanticTokenType::Keyword => "keyword",
            SemanticTokenType::Number => "number",
            SemanticTokenType::String => "string",
            SemanticTokenType::Comment => "comment",
            SemanticTokenType::Operator => "operator",
            SemanticTokenType::Delimiter => "delimiter",
            SemanticTokenType::Macro => "macro",
            SemanticTokenType::Label => "label",
            SemanticTokenType::Variable => "variable",
            SemanticTokenType::Function => "function",
            SemanticTokenType::Method => "method",
            SemanticTokenType::Property => "property",
            SemanticTokenType::Parameter => "parameter",
            SemanticTokenType::Class => "class",
        }
    }

    pub fn index(self) -> u32 {
        self as u32
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SemanticTokenModifier {
    Declaration,
    Readonly,
    DefaultLibrary,
    Documentation,
}

impl SemanticTokenModifier {
    pub const ALL: [SemanticTokenModifier; 4] = [
        SemanticTokenModifier::Declaration,
        SemanticTokenModifier::Readonly,
        SemanticTokenModifier::DefaultLibrary,
        SemanticTokenModifier::Documentation,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SemanticTokenModifier::Declaration => "declaration",
            SemanticTokenModifier::Readonly => "readonly",
            SemanticTokenModifier::DefaultLibrary => "defaultLibrary",
            SemanticTokenModifier::Documentation => "documentation",
        }
    }

    pub fn bit(self) -> u32 {
        1 << (self as u32)
    }
}

/// One classified token. `line` and `character` are 0-based; `length` counts characters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SemanticToken {
    pub line: u32,
    pub character: u32,
    pub length: u32,
    pub token_type: SemanticTokenType,
    pub modifiers: Vec<SemanticTokenModifier>,
}

impl SemanticToken {
    pub fn has(&self, modifier: SemanticTokenModifier) -> bool {
        self.modifiers.contains(&modifier)
    }

    pub fn modifier_bits(&self) -> u32 {
        self.modifiers.iter().fold(0, |acc, m| acc | m.bit())
    }
}

const LIBRARY_FUNCTIONS: &[&str] = &[
    "MsgBox",
    "InputBox",
    "ToolTip",
    "TrayTip",
    "Send",
    "SendInput",
    "SendText",
    "Sleep",
    "Run",
    "RunWait",
    "WinActivate",
    "WinExist",
    "WinWait",
    "WinClose",
    "WinGetTitle",
    "FileRead",
    "FileAppend",
    "FileDelete",
    "FileExist",
    "DirCreate",
    "StrLen",
    "SubStr",
    "InStr",
    "StrReplace",
    "StrSplit",
    "StrUpper",
    "StrLower",
    "Trim",
    "RegExMatch",
    "RegExReplace",
    "Format",
    "Round",
    "Abs",
    "Max",
    "Min",
    "SetTimer",
    "Hotkey",
    "IsSet",
    "IsObject",
    "Type",
    "Gui",
    "Map",
    "Array",
    "Object",
    "Error",
    "ExitApp",
    "Reload",
];

fn is_library_function(name: &str) -> bool {
    LIBRARY_FUNCTIONS.iter().any(|f| f.eq_ignore_ascii_case(name))
}

fn is_doc_comment(text: &str) -> bool {
    text.starts_with(";/**")
        || text.starts_with(";///")
        || ["@param", "@return", "@description"].iter().any(|tag| text.contains(tag))
}

/// Classify every non-structural token of `source`. An unterminated string
/// ends the scan; tokens before it are still classified.
pub fn classify_semantic_tokens(source: &str) -> Vec<SemanticToken> {
    let (tokens, error) = Tokenizer::tokenize_lossy(source);
    if let Some(err) = &error {
        tracing::trace!(error = %err, "semantic tokens from partial token stream");
    }
    let mut out = Vec::with_capacity(tokens.len());
    for (idx, token) in tokens.iter().enumerate() {
        let Some((token_type, modifiers)) = classify(&tokens, idx) else {
            continue;
        };
        if token.end_line > token.line {
            push_line_pieces(&mut out, source, token, token_type, &modifiers);
            continue;
        }
        out.push(SemanticToken {
            line: token.line.saturating_sub(1),
            character: token.column.saturating_sub(1),
            length: token.char_len(source) as u32,
            token_type,
            modifiers,
        });
    }
    tracing::debug!(count = out.len(), "classified semantic tokens");
    out
}

/// Multi-line strings become one token per line so no token runs past its line end.
fn push_line_pieces(
    out: &mut Vec<SemanticToken>,
    source: &str,
    token: &Token,
    token_type: SemanticTokenType,
    modifiers: &[SemanticTokenModifier],
) {
    let text = source.get(token.start..token.end).unwrap_or(&token.text);
    for (offset, piece) in text.split('\n').enumerate() {
        let piece = piece.strip_suffix('\r').unwrap_or(piece);
        let length = piece.chars().count() as u32;
        if length == 0 {
            continue;
        }
        let first = offset == 0;
        out.push(SemanticToken {
            line: token.line.saturating_sub(1) + offset as u32,
            character: if first { token.column.saturating_sub(1) } else { 0 },
            length,
            token_type,
            modifiers: modifiers.to_vec(),
        });
    }
}

fn classify(tokens: &[Token], idx: usize) -> Option<(SemanticTokenType, Vec<SemanticTokenModifier>)> {
    use SemanticTokenModifier as M;
    use SemanticTokenType as T;

    let token = &tokens[idx];
    let classified = match token.kind {
        TokenKind::Newline | TokenKind::Eof => return None,
        TokenKind::True | TokenKind::False | TokenKind::Null => (T::Keyword, vec![M::Readonly]),
        k if k.is_keyword() => (T::Keyword, Vec::new()),
        TokenKind::Number => (T::Number, Vec::new()),
        TokenKind::String => (T::String, Vec::new()),
        TokenKind::Comment if is_doc_comment(&token.text) => (T::Comment, vec![M::Documentation]),
        TokenKind::Comment => (T::Comment, Vec::new()),
        TokenKind::Directive => (T::Macro, Vec::new()),
        TokenKind::Hotkey => (T::Label, Vec::new()),
        TokenKind::BuiltinVar => (T::Variable, vec![M::Readonly, M::DefaultLibrary]),
        TokenKind::Identifier => classify_identifier(tokens, idx),
        TokenKind::Dot => (T::Operator, Vec::new()),
        k if k.is_operator() => (T::Operator, Vec::new()),
        _ => (T::Delimiter, Vec::new()),
    };
    Some(classified)
}

fn kind_at(tokens: &[Token], idx: usize) -> Option<TokenKind> {
    tokens.get(idx).map(|t| t.kind)
}

fn classify_identifier(tokens: &[Token], idx: usize) -> (SemanticTokenType, Vec<SemanticTokenModifier>) {
    use SemanticTokenModifier as M;
    use SemanticTokenType as T;

    let prev = idx.checked_sub(1).and_then(|i| tokens.get(i));
    let followed_by_paren = kind_at(tokens, idx + 1) == Some(TokenKind::LParen);

    if prev.is_some_and(|p| p.is(TokenKind::Dot)) {
        return if followed_by_paren {
            (T::Method, Vec::new())
        } else {
            (T::Property, Vec::new())
        };
    }
    if followed_by_paren {
        let mut modifiers = Vec::new();
        if is_declaration_name(tokens, idx) {
            modifiers.push(M::Declaration);
        }
        if is_library_function(&tokens[idx].text) {
            modifiers.push(M::DefaultLibrary);
        }
        return (T::Function, modifiers);
    }
    if let Some(p) = prev {
        if p.is(TokenKind::Class) {
            return (T::Class, vec![M::Declaration]);
        }
        if p.is(TokenKind::Identifier) && p.text.eq_ignore_ascii_case("extends") {
            return (T::Class, Vec::new());
        }
    }
    if in_parameter_list(tokens, idx) {
        return (T::Parameter, Vec::new());
    }
    (T::Variable, Vec::new())
}

/// `name(...)` followed, across newlines, by `{`.
fn is_declaration_name(tokens: &[Token], idx: usize) -> bool {
    if kind_at(tokens, idx + 1) != Some(TokenKind::LParen) {
        return false;
    }
    if idx > 0 && tokens[idx - 1].is(TokenKind::Dot) {
        return false;
    }
    let mut depth = 0usize;
    let mut cursor = idx + 1;
    while let Some(token) = tokens.get(cursor) {
        match token.kind {
            TokenKind::LParen => depth += 1,
            TokenKind::RParen => {
                depth -= 1;
                if depth == 0 {
                    break;
                }
            }
            TokenKind::LBrace | TokenKind::RBrace | TokenKind::Eof => return false,
            _ => {}
        }
        cursor += 1;
    }
    cursor += 1;
    while matches!(kind_at(tokens, cursor), Some(TokenKind::Newline | TokenKind::Comment)) {
        cursor += 1;
    }
    kind_at(tokens, cursor) == Some(TokenKind::LBrace)
}

/// Scan back to the innermost unclosed `(` and test whether it opens a declaration.
fn in_parameter_list(tokens: &[Token], idx: usize) -> bool {
    let mut depth = 0usize;
    for cursor in (0..idx).rev() {
        match tokens[cursor].kind {
            TokenKind::RParen => depth += 1,
            TokenKind::LParen if depth > 0 => depth -= 1,
            TokenKind::LParen => {
                return cursor > 0
                    && tokens[cursor - 1].is(TokenKind::Identifier)
                    && is_declaration_name(tokens, cursor - 1);
            }
            TokenKind::LBrace | TokenKind::RBrace | TokenKind::Newline => return false,
            _ => {}
        }
    }
    false
}

pub fn legend() -> lsp::SemanticTokensLegend {
    lsp::SemanticTokensLegend {
        token_types: SemanticTokenType::ALL
            .iter()
            .map(|t| lsp::SemanticTokenType::new(t.as_str()))
            .collect(),
        token_modifiers: SemanticTokenModifier::ALL
            .iter()
            .map(|m| lsp::SemanticTokenModifier::new(m.as_str()))
            .collect(),
    }
}

/// Relative encoding: each token's line is a delta from the previous token, and
/// its start is a delta only when both sit on the same line.
pub fn encode_semantic_tokens(tokens: &[SemanticToken]) -> Vec<lsp::SemanticToken> {
    let mut encoded = Vec::with_capacity(tokens.len());
    let (mut last_line, mut last_start) = (0u32, 0u32);
    for token in tokens {
        let delta_line = token.line - last_line;
        let delta_start = if delta_line == 0 {
            token.character - last_start
        } else {
            token.character
        };
        encoded.push(lsp::SemanticToken {
            delta_line,
            delta_start,
            length: token.length,
            token_type: token.token_type.index(),
            token_modifiers_bitset: token.modifier_bits(),
        });
        last_line = token.line;
        last_start = token.character;
    }
    encoded
}
