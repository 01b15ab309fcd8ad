use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TokenKind {
    // Keywords
    If,       // if
    Else,     // else
    ElseIf,   // elseif
    While,    // while
    For,      // for
    Loop,     // loop
    Break,    // break
    Continue, // continue
    Return,   // return
    Class,    // class
    Static,   // static
    Global,   // global
    Local,    // local
    Try,      // try
    Catch,    // catch
    Finally,  // finally
    Throw,    // throw
    And,      // and
    Or,       // or
    Not,      // not
    In,       // in
    Is,       // is
    True,     // true
    False,    // false
    Null,     // null
    // Operators
    Assign,       // :=
    Equals,       // =
    NotEquals,    // !=
    Less,         // <
    Greater,      // >
    LessEqual,    // <=
    GreaterEqual, // >=
    Plus,         // +
    Minus,        // -
    Multiply,     // *
    Divide,       // /
    Modulo,       // mod
    Power,        // **
    Match,        // ~=
    NotMatch,     // !~
    // Delimiters
    LParen,    // (
    RParen,    // )
    LBrace,    // {
    RBrace,    // }
    LBracket,  // [
    RBracket,  // ]
    Comma,     // ,
    Dot,       // .
    Colon,     // :
    Question,  // ?
    Ampersand, // &
    Pipe,      // |
    // Literals
    Number,
    String,
    Identifier,
    BuiltinVar, // A_*
    // Structure
    Hotkey,    // trigger::
    Directive, // #Name
    Comment,   // ; ...
    Newline,
    Eof,
}

impl TokenKind {
    /// Keyword for an already lower-cased word.
    pub fn keyword(lower: &str) -> Option<TokenKind> {
        use TokenKind::*;
        let kind = match lower {
            "if" => If,
            "else" => Else,
            "elseif" => ElseIf,
            "while" => While,
            "for" => For,
            "loop" => Loop,
            "break" => Break,
            "continue" => Continue,
            "return" => Return,
            "class" => Class,
            "static" => Static,
            "global" => Global,
            "local" => Local,
            "try" => Try,
            "catch" => Catch,
            "finally" => Finally,
            "throw" => Throw,
            "and" => And,
            "or" => Or,
            "not" => Not,
            "in" => In,
            "is" => Is,
            "true" => True,
            "false" => False,
            "null" => Null,
            _ => return None,
        };
        Some(kind)
    }

    pub fn is_keyword(self) -> bool {
        use TokenKind::*;
        matches!(
            self,
            If | Else
                | ElseIf
                | While
                | For
                | Loop
                | Break
                | Continue
                | Return
                | Class
                | Static
                | Global
                | Local
                | Try
                | Catch
                | Finally
                | Throw
                | And
                | Or
                | Not
                | In
                | Is
                | True
                | False
                | Null
        )
    }

    pub fn is_operator(self) -> bool {
        use TokenKind::*;
        matches!(
            self,
            Assign
                | Equals
                | NotEquals
                | Less
                | Greater
                | LessEqual
                | GreaterEqual
                | Plus
                | Minus
                | Multiply
                | Divide
                | Modulo
                | Power
                | Match
                | NotMatch
        )
    }

    pub fn is_delimiter(self) -> bool {
        use TokenKind::*;
        matches!(
            self,
            LParen | RParen | LBrace | RBrace | LBracket | RBracket | Comma | Dot | Colon | Question | Ampersand | Pipe
        )
    }

    /// Loop-introducing keywords.
    pub fn is_loop(self) -> bool {
        matches!(self, TokenKind::Loop | TokenKind::While | TokenKind::For)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}
