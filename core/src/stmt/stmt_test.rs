#[cfg(test)]
mod tests {
    use crate::{
        ast::{Alternate, BinaryOp, Expr, LiteralValue, Stmt, UnaryOp},
        stmt::{ParseOutput, parse},
    };

    fn parse_ok(src: &str) -> ParseOutput {
        let out = parse(src).expect("tokenize");
        assert!(out.skipped.is_empty(), "unexpected skipped statements: {:?}", out.skipped);
        out
    }

    fn single_expr(src: &str) -> Expr {
        let out = parse_ok(src);
        assert_eq!(out.program.body.len(), 1);
        match &out.program.body[0] {
            Stmt::Expression(s) => s.expression.clone(),
            other => panic!("expected expression statement, got {:?}", other),
        }
    }

    #[test]
    fn test_assignment_is_right_associative() {
        let expr = single_expr("a := b := 3");
        let Expr::Assignment { target, value, .. } = expr else {
            panic!("expected assignment");
        };
        assert!(matches!(*target, Expr::Identifier { ref name, .. } if name == "a"));
        assert!(matches!(*value, Expr::Assignment { .. }));
    }

    #[test]
    fn test_precedence_factor_over_term() {
        let expr = single_expr("1 + 2 * 3");
        let Expr::Binary { operator, right, .. } = expr else {
            panic!("expected binary");
        };
        assert_eq!(operator, BinaryOp::Add);
        assert!(matches!(*right, Expr::Binary { operator: BinaryOp::Multiply, .. }));
    }

    #[test]
    fn test_precedence_logic_and_comparison() {
        let expr = single_expr("a < 1 or b = 2 and not c");
        let Expr::Binary { operator, right, .. } = expr else {
            panic!("expected binary");
        };
        assert_eq!(operator, BinaryOp::Or);
        let Expr::Binary { operator, right, .. } = *right else {
            panic!("expected and");
        };
        assert_eq!(operator, BinaryOp::And);
        assert!(matches!(*right, Expr::Unary { operator: UnaryOp::Not, .. }));
    }

    #[test]
    fn test_mod_keyword_operator() {
        let expr = single_expr("x := 7 mod 3");
        let Expr::Assignment { value, .. } = expr else {
            panic!("expected assignment");
        };
        assert!(matches!(*value, Expr::Binary { operator: BinaryOp::Modulo, .. }));
    }

    #[test]
    fn test_call_member_chain() {
        let expr = single_expr("obj.items.Push(1, \"two\")");
        let Expr::Call { callee, arguments, .. } = expr else {
            panic!("expected call");
        };
        assert_eq!(arguments.len(), 2);
        assert!(matches!(&arguments[1], Expr::Literal { value: LiteralValue::String(s), .. } if s == "two"));
        let Expr::Member { object, property, .. } = *callee else {
            panic!("expected member");
        };
        assert_eq!(property, "Push");
        assert!(matches!(*object, Expr::Member { ref property, .. } if property == "items"));
    }

    #[test]
    fn test_literals() {
        let out = parse_ok("a := 0x10\nb := 2.5\nc := true\nd := null\ne := A_Now");
        let values: Vec<Expr> = out
            .program
            .body
            .iter()
            .map(|s| match s {
                Stmt::Expression(e) => match &e.expression {
                    Expr::Assignment { value, .. } => (**value).clone(),
                    other => panic!("expected assignment, got {:?}", other),
                },
                other => panic!("expected expression, got {:?}", other),
            })
            .collect();
        assert!(matches!(values[0], Expr::Literal { value: LiteralValue::Number(n), .. } if n == 16.0));
        assert!(matches!(values[1], Expr::Literal { value: LiteralValue::Number(n), .. } if n == 2.5));
        assert!(matches!(values[2], Expr::Literal { value: LiteralValue::Boolean(true), .. }));
        assert!(matches!(values[3], Expr::Literal { value: LiteralValue::Null, .. }));
        assert!(matches!(values[4], Expr::Identifier { builtin: true, .. }));
    }

    #[test]
    fn test_if_elseif_else_chain() {
        let src = "if x = 1 {\n  a()\n} elseif x = 2 {\n  b()\n} else if x = 3 {\n  c()\n}\nelse\n{\n  d()\n}";
        let out = parse_ok(src);
        assert_eq!(out.program.body.len(), 1);
        let Stmt::If(first) = &out.program.body[0] else {
            panic!("expected if");
        };
        assert_eq!(first.consequent.len(), 1);
        let Some(Alternate::ElseIf(second)) = &first.alternate else {
            panic!("expected elseif");
        };
        let Some(Alternate::ElseIf(third)) = &second.alternate else {
            panic!("expected else if");
        };
        let Some(Alternate::Else(last)) = &third.alternate else {
            panic!("expected else");
        };
        assert_eq!(last.len(), 1);
        assert_eq!(out.program.body[0].child_bodies().len(), 4);
    }

    #[test]
    fn test_unbraced_body_runs_to_terminator() {
        let out = parse_ok("if ready\n  Go()\n  Wait()\nelse\n  Stop()");
        let Stmt::If(stmt) = &out.program.body[0] else {
            panic!("expected if");
        };
        assert_eq!(stmt.consequent.len(), 2);
        assert!(matches!(&stmt.alternate, Some(Alternate::Else(body)) if body.len() == 1));
    }

    #[test]
    fn test_loops() {
        let out = parse_ok("while i < 3 {\n i := i + 1\n}\nloop 5 {\n Beep()\n}\nloop {\n break\n}\nfor k, v in items {\n continue\n}");
        let body = &out.program.body;
        assert_eq!(body.len(), 4);
        assert!(matches!(&body[0], Stmt::While(w) if w.body.len() == 1));
        assert!(matches!(&body[1], Stmt::Loop(l) if l.count.is_some()));
        assert!(matches!(&body[2], Stmt::Loop(l) if l.count.is_none() && matches!(l.body[0], Stmt::Break { .. })));
        let Stmt::For(f) = &body[3] else {
            panic!("expected for");
        };
        assert_eq!(f.variables, vec!["k".to_string(), "v".to_string()]);
        assert!(matches!(f.body[0], Stmt::Continue { .. }));
    }

    #[test]
    fn test_parenthesized_for_header() {
        let out = parse_ok("for (item in list)\n{\n  Show(item)\n}");
        assert!(matches!(&out.program.body[0], Stmt::For(f) if f.variables == vec!["item".to_string()]));
    }

    #[test]
    fn test_class_with_methods() {
        let src = "class Dog extends Animal {\n  __New(name) {\n    this.name := name\n  }\n  static Create() {\n    return Dog(\"rex\")\n  }\n}";
        let out = parse_ok(src);
        let Stmt::Class(class) = &out.program.body[0] else {
            panic!("expected class");
        };
        assert_eq!(class.name, "Dog");
        assert_eq!(class.super_class.as_deref(), Some("Animal"));
        assert_eq!(class.body.len(), 2);
        assert!(matches!(&class.body[1], Stmt::Function(f) if f.is_static && f.name == "Create"));
    }

    #[test]
    fn test_hotkey_forms() {
        let src = "^j::Send(\"hi\")\nF2::\n{\n  MsgBox(1)\n}\nF3::\nBeep()\nreturn\nF4::Sleep(5)";
        let out = parse_ok(src);
        let hotkeys: Vec<(&str, usize)> = out
            .program
            .body
            .iter()
            .map(|s| match s {
                Stmt::Hotkey(h) => (h.trigger.as_str(), h.body.len()),
                other => panic!("expected hotkey, got {:?}", other),
            })
            .collect();
        assert_eq!(hotkeys, vec![("^j::", 1), ("F2::", 1), ("F3::", 2), ("F4::", 1)]);
    }

    #[test]
    fn test_directive_value_is_rest_of_line() {
        let out = parse_ok("#Requires AutoHotkey v2.0 ; comment\n#SingleInstance Force");
        let directives: Vec<(&str, &str)> = out
            .program
            .body
            .iter()
            .map(|s| match s {
                Stmt::Directive(d) => (d.directive.as_str(), d.value.as_str()),
                other => panic!("expected directive, got {:?}", other),
            })
            .collect();
        assert_eq!(directives, vec![("#Requires", "AutoHotkey v2.0"), ("#SingleInstance", "Force")]);
    }

    #[test]
    fn test_return_forms() {
        let out = parse_ok("F() {\n  return\n}\nG() {\n  return 1 + 2\n}\nH() { return }");
        for (stmt, has_value) in out.program.body.iter().zip([false, true, false]) {
            let Stmt::Function(f) = stmt else {
                panic!("expected function");
            };
            assert!(matches!(&f.body[0], Stmt::Return(r) if r.argument.is_some() == has_value));
        }
    }

    #[test]
    fn test_spans_cover_statement() {
        let src = "x := 1\nfoo(x, 2)";
        let out = parse_ok(src);
        let span = out.program.body[1].span();
        assert_eq!((span.start.line, span.start.column), (2, 1));
        assert_eq!(&src[span.start.offset..span.end.offset], "foo(x, 2)");
        assert_eq!(out.program.span.end.offset, src.len());
    }

    #[test]
    fn test_ast_serializes_with_type_tags() {
        let out = parse_ok("Add(a, b) {\n  return a + b\n}");
        let json = serde_json::to_value(&out.program).expect("serialize");
        assert_eq!(json["body"][0]["type"], "FunctionDeclaration");
        assert_eq!(json["body"][0]["name"], "Add");
        assert_eq!(json["body"][0]["isStatic"], false);
        assert_eq!(json["body"][0]["body"][0]["argument"]["type"], "BinaryExpression");
        assert_eq!(json["body"][0]["body"][0]["argument"]["operator"], "+");
    }
}
