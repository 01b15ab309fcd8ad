//! Compiled-in name tables. Lookups ignore ASCII case like the language does.

/// Functions the undefined-call check accepts without a declaration.
pub const BUILTIN_FUNCTIONS: &[&str] = &[
    "MsgBox",
    "Send",
    "Click",
    "Sleep",
    "WinActivate",
    "WinExist",
    "FileRead",
    "FileWrite",
    "StrSplit",
    "StrReplace",
    "SubStr",
    "Array",
    "Map",
    "Object",
    "Gui",
    "ToolTip",
    "SetTimer",
];

/// Calls that touch processes or the file system.
pub const DANGEROUS_FUNCTIONS: &[&str] = &["Run", "RunWait", "FileAppend", "FileDelete"];

/// Engine variables that scripts may read but never assign.
pub const READ_ONLY_VARIABLES: &[&str] = &[
    "A_ScriptName",
    "A_ScriptDir",
    "A_WorkingDir",
    "A_ComputerName",
    "A_UserName",
    "A_Now",
    "A_TickCount",
    "A_ScreenWidth",
    "A_ScreenHeight",
];

fn contains(table: &[&str], name: &str) -> bool {
    table.iter().any(|entry| entry.eq_ignore_ascii_case(name))
}

pub fn is_builtin_function(name: &str) -> bool {
    contains(BUILTIN_FUNCTIONS, name) || contains(DANGEROUS_FUNCTIONS, name)
}

pub fn is_dangerous_function(name: &str) -> bool {
    contains(DANGEROUS_FUNCTIONS, name)
}

pub fn is_read_only_variable(name: &str) -> bool {
    contains(READ_ONLY_VARIABLES, name)
}
