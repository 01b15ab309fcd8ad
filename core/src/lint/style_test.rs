#[cfg(test)]
mod tests {
    use crate::{
        diagnostic::{DiagnosticCode, Severity},
        lint::{LintConfig, Linter, lint},
    };

    fn count(src: &str, code: DiagnosticCode) -> usize {
        lint(src).iter().filter(|d| d.code == code).count()
    }

    #[test]
    fn test_hungarian_reported_once_per_name() {
        assert_eq!(count("strName := 1\nstrName := 2\nbOk := 1", DiagnosticCode::HungarianNotation), 1);
        assert_eq!(count("string := 1\nintegral := 2", DiagnosticCode::HungarianNotation), 0);
    }

    #[test]
    fn test_short_names_skip_loop_conventions() {
        let diagnostics = lint("q := 1\ni := 2\nq := 3\nobj.w := 4");
        let found: Vec<_> = diagnostics.iter().filter(|d| d.code == DiagnosticCode::ShortVariableName).collect();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].severity, Severity::Info);
        assert!(found[0].message.contains("'q'"));
    }

    #[test]
    fn test_indentation_follows_braces() {
        let diagnostics = lint("F() {\nx := 1\n    y := 2\n}");
        let found: Vec<_> = diagnostics
            .iter()
            .filter(|d| d.code == DiagnosticCode::InconsistentIndentation)
            .collect();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].range.start.line, 2);
        assert_eq!(found[0].message, "Expected 4 spaces, found 0");
    }

    #[test]
    fn test_indentation_accepts_tabs_and_else_lines() {
        assert_eq!(count("F() {\n\tx := 1\n}", DiagnosticCode::InconsistentIndentation), 0);
        let src = "if a {\n    b()\n} else {\n    c()\n}";
        assert_eq!(count(src, DiagnosticCode::InconsistentIndentation), 0);
    }

    #[test]
    fn test_indentation_ignores_top_level_bodies() {
        let src = "#Requires AutoHotkey v2\nif ready\n    Launch()\nF1::\n    Launch()\n";
        assert_eq!(count(src, DiagnosticCode::InconsistentIndentation), 0);
    }

    #[test]
    fn test_indentation_skips_blank_comment_and_string_lines() {
        let src = "F() {\n\n; note\n    s := \"first\nsecond\"\n}";
        assert_eq!(count(src, DiagnosticCode::InconsistentIndentation), 0);
    }

    #[test]
    fn test_indent_width_is_configurable() {
        let config = LintConfig {
            indent_width: 2,
            ..LintConfig::default()
        };
        let diagnostics = Linter::with_config(config).lint("F() {\n  x := 1\n    y := 2\n}");
        let found: Vec<_> = diagnostics
            .iter()
            .filter(|d| d.code == DiagnosticCode::InconsistentIndentation)
            .collect();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].message, "Expected 2 spaces, found 4");
    }

    #[test]
    fn test_percent_variables_in_strings() {
        assert_eq!(count("MsgBox(\"Hello %name%\")", DiagnosticCode::OldVariableSyntax), 1);
        assert_eq!(count("MsgBox(\"100% sure\")", DiagnosticCode::OldVariableSyntax), 0);
    }

    #[test]
    fn test_missing_requires() {
        assert_eq!(count("x := 1", DiagnosticCode::MissingRequires), 1);
        assert_eq!(count("#Requires AutoHotkey v2.0\nx := 1", DiagnosticCode::MissingRequires), 0);
        assert_eq!(count("", DiagnosticCode::MissingRequires), 0);

        let config = LintConfig {
            require_version_directive: false,
            ..LintConfig::default()
        };
        let diagnostics = Linter::with_config(config).lint("x := 1");
        assert!(diagnostics.iter().all(|d| d.code != DiagnosticCode::MissingRequires));
    }

    #[test]
    fn test_loop_depth_counts_only_loop_braces() {
        let src = "loop {\n  if a {\n  }\n  loop {\n    loop {\n      loop {\n      }\n    }\n  }\n}";
        let diagnostics = lint(src);
        let found: Vec<_> = diagnostics.iter().filter(|d| d.code == DiagnosticCode::DeeplyNestedLoop).collect();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].range.start.line, 6);
    }

    #[test]
    fn test_sibling_loops_do_not_stack() {
        let src = "while a {\n}\nfor k in items {\n}\nloop 3 {\n}\nloop {\n}";
        assert_eq!(count(src, DiagnosticCode::DeeplyNestedLoop), 0);
    }

    #[test]
    fn test_dangerous_functions() {
        let diagnostics = lint("Run(\"notepad\")\nobj.Run()\nfiledelete(path)");
        let found: Vec<_> = diagnostics
            .iter()
            .filter(|d| d.code == DiagnosticCode::PotentialSecurityRisk)
            .collect();
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].message, "Be careful with Run - ensure input is validated");
        assert_eq!(found[1].severity, Severity::Warning);
    }
}
