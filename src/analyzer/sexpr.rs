//! # Reference Front-End
//!
//! A small analyzer for an s-expression language, used by the `syntest`
//! binary and by the bundled fixture corpus. It reads the source into forms,
//! reports delimiter and string-literal problems as `ParserError`s, and, when
//! the source reads cleanly, runs a chain of form checks over the result.
//!
//! Diagnostics come out in source order. A source that fails to read gets no
//! semantic checks.

use std::collections::HashSet;
use std::iter::Peekable;
use std::str::Chars;

use tracing::trace;

use super::{AnalysisConfig, Analyzer};
use crate::diagnostic::Diagnostic;

pub const PARSER_ERROR: &str = "ParserError";
pub const SYNTAX_ERROR: &str = "SyntaxError";
pub const DECLARATION_ERROR: &str = "DeclarationError";
pub const WARNING: &str = "Warning";

/// Analyzer for the s-expression language of the bundled corpus.
#[derive(Debug, Default, Clone, Copy)]
pub struct SexprAnalyzer;

impl Analyzer for SexprAnalyzer {
    fn analyze(&self, source: &str, config: &AnalysisConfig) -> Vec<Diagnostic> {
        let (program, mut diagnostics) = read_program(source);
        if diagnostics.is_empty() {
            let mut checks: Vec<Box<dyn FormCheck>> =
                vec![Box::new(DefinitionCheck::default()), Box::new(EmptyFormCheck)];
            for form in &program {
                walk(form, 0, &mut checks, &mut diagnostics);
            }
        }
        trace!(count = diagnostics.len(), "analysis finished");
        apply_config(diagnostics, config)
    }
}

// ============================================================================
// READER
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
enum Form {
    List(Vec<Form>),
    Atom(String),
    Str(String),
}

fn read_program(source: &str) -> (Vec<Form>, Vec<Diagnostic>) {
    let mut reader = Reader {
        chars: source.chars().peekable(),
        line: 1,
    };
    let mut diagnostics = Vec::new();
    let mut open: Vec<(usize, Vec<Form>)> = Vec::new();
    let mut top = Vec::new();

    while let Some(c) = reader.next() {
        let form = match c {
            c if c.is_whitespace() => continue,
            ';' => {
                reader.skip_comment();
                continue;
            }
            '(' => {
                open.push((reader.line, Vec::new()));
                continue;
            }
            ')' => match open.pop() {
                Some((_, items)) => Form::List(items),
                None => {
                    diagnostics.push(Diagnostic::new(
                        PARSER_ERROR,
                        format!("Unexpected closing delimiter ')' on line {}.", reader.line),
                    ));
                    continue;
                }
            },
            '"' => {
                let start = reader.line;
                match reader.read_string() {
                    Some(text) => Form::Str(text),
                    None => {
                        diagnostics.push(Diagnostic::new(
                            PARSER_ERROR,
                            format!("Unterminated string literal starting on line {}.", start),
                        ));
                        break;
                    }
                }
            }
            c => Form::Atom(reader.read_atom(c)),
        };
        match open.last_mut() {
            Some((_, items)) => items.push(form),
            None => top.push(form),
        }
    }

    for (line, _) in &open {
        diagnostics.push(Diagnostic::new(
            PARSER_ERROR,
            format!("Unclosed delimiter '(' opened on line {}.", line),
        ));
    }
    (top, diagnostics)
}

struct Reader<'a> {
    chars: Peekable<Chars<'a>>,
    line: usize,
}

impl Reader<'_> {
    fn next(&mut self) -> Option<char> {
        let c = self.chars.next()?;
        if c == '\n' {
            self.line += 1;
        }
        Some(c)
    }

    fn skip_comment(&mut self) {
        while let Some(c) = self.next() {
            if c == '\n' {
                break;
            }
        }
    }

    /// Reads up to the closing quote. `None` when the source ends first.
    fn read_string(&mut self) -> Option<String> {
        let mut text = String::new();
        loop {
            match self.next()? {
                '"' => return Some(text),
                '\\' => match self.next()? {
                    'n' => text.push('\n'),
                    't' => text.push('\t'),
                    other => text.push(other),
                },
                c => text.push(c),
            }
        }
    }

    fn read_atom(&mut self, first: char) -> String {
        let mut atom = String::from(first);
        while let Some(&c) = self.chars.peek() {
            if c.is_whitespace() || matches!(c, '(' | ')' | '"' | ';') {
                break;
            }
            atom.push(c);
            self.chars.next();
        }
        atom
    }
}

// ============================================================================
// FORM CHECKS
// ============================================================================

/// A check run on every form, outermost first.
trait FormCheck {
    fn check(&mut self, form: &Form, depth: usize, out: &mut Vec<Diagnostic>);
}

fn walk(form: &Form, depth: usize, checks: &mut [Box<dyn FormCheck>], out: &mut Vec<Diagnostic>) {
    for check in checks.iter_mut() {
        check.check(form, depth, out);
    }
    if let Form::List(items) = form {
        for item in items {
            walk(item, depth + 1, checks, out);
        }
    }
}

/// Top-level `(define <name> <value>)` forms.
#[derive(Default)]
struct DefinitionCheck {
    declared: HashSet<String>,
}

impl FormCheck for DefinitionCheck {
    fn check(&mut self, form: &Form, depth: usize, out: &mut Vec<Diagnostic>) {
        if depth != 0 {
            return;
        }
        let Form::List(items) = form else {
            return;
        };
        if !matches!(items.first(), Some(Form::Atom(head)) if head == "define") {
            return;
        }

        let Some(Form::Atom(name)) = items.get(1) else {
            out.push(Diagnostic::new(SYNTAX_ERROR, "Definition requires a name."));
            return;
        };
        if items.len() < 3 {
            out.push(Diagnostic::new(
                SYNTAX_ERROR,
                format!("Definition of `{}` requires a value.", name),
            ));
        }
        if !self.declared.insert(name.clone()) {
            out.push(Diagnostic::new(
                DECLARATION_ERROR,
                "Identifier already declared.",
            ));
        }
    }
}

/// `()` anywhere in the program.
struct EmptyFormCheck;

impl FormCheck for EmptyFormCheck {
    fn check(&mut self, form: &Form, _depth: usize, out: &mut Vec<Diagnostic>) {
        if matches!(form, Form::List(items) if items.is_empty()) {
            out.push(Diagnostic::new(WARNING, "Empty form has no effect."));
        }
    }
}

fn apply_config(diagnostics: Vec<Diagnostic>, config: &AnalysisConfig) -> Vec<Diagnostic> {
    let mut kept = Vec::with_capacity(diagnostics.len());
    for diag in diagnostics {
        let is_warning = diag.kind == WARNING;
        if is_warning && !config.report_warnings {
            continue;
        }
        kept.push(diag);
        if !is_warning && !config.allow_multiple_errors {
            break;
        }
    }
    kept
}
