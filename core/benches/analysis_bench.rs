use ahk_core::{lint::Linter, stmt::StmtParser, token::Tokenizer};
use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

/// A script of `functions` small functions plus a hotkey and a class per ten.
fn generate_script(functions: usize) -> String {
    let mut src = String::from("#Requires AutoHotkey v2.0\n#SingleInstance Force\n\n");
    for i in 0..functions {
        src.push_str(&format!(
            "Compute{i}(value, &out, rest*) {{\n    total := 0\n    loop value {{\n        if A_Index mod 2 = 0 {{\n            total := total + A_Index * {i}\n        }} else {{\n            total := total - 1\n        }}\n    }}\n    out := total\n    return total\n}}\n\n"
        ));
        if i % 10 == 0 {
            src.push_str(&format!(
                "^!{}::\n{{\n    MsgBox(\"Result: \" Compute{i}(10, &r))\n}}\n\nclass Worker{i} extends Base {{\n    Run() {{\n        return this.items.Length\n    }}\n}}\n\n",
                i % 10
            ));
        }
    }
    src
}

fn bench_analysis(c: &mut Criterion) {
    let src = generate_script(200);

    c.bench_function("tokenize_200_functions", |b| {
        b.iter(|| {
            let tokens = Tokenizer::tokenize(black_box(&src)).expect("tokenize");
            black_box(tokens);
        })
    });

    let tokens = Tokenizer::tokenize(&src).expect("tokenize");
    c.bench_function("parse_200_functions", |b| {
        b.iter(|| {
            let parsed = StmtParser::new(black_box(&tokens), &src).parse_program();
            black_box(parsed);
        })
    });

    let linter = Linter::new();
    c.bench_function("lint_200_functions", |b| {
        b.iter(|| {
            let diagnostics = linter.lint(black_box(&src));
            black_box(diagnostics);
        })
    });
}

criterion_group!(analysis, bench_analysis);
criterion_main!(analysis);
