//! Test support for inspecting parser output.
//!
//! This module provides:
//! - One-call helpers that lex and parse a string with a chosen entry point
//! - S-expression printers for expressions, patterns and types, so tests can
//!   compare tree shapes without caring about source locations
//! - Depth walkers for checking deeply nested input
//! - A runner that executes a closure on a thread with a large stack

use crate::ast::*;
use crate::lexer::Lexer;
use crate::parser::{ParseError, Parser, ParserConfig};

// ============================================================================
// Pipeline helpers
// ============================================================================

fn parser_for(input: &str, config: ParserConfig) -> Result<Parser, String> {
    let tokens = Lexer::new(input, "test.sch")
        .tokenize()
        .map_err(|e| format!("Lexer error: {}", e))?;
    Ok(Parser::with_config(tokens, config))
}

/// Parse a standalone expression
pub fn parse_expr(input: &str) -> Result<Expr, String> {
    parser_for(input, ParserConfig::default())?
        .parse_expression()
        .map_err(|e| format!("Parse error: {}", e))
}

/// Parse a whole module
pub fn parse_module(input: &str) -> Result<Module, String> {
    parser_for(input, ParserConfig::default())?
        .parse_module()
        .map_err(|e| format!("Parse error: {}", e))
}

/// Parse a standalone pattern
pub fn parse_pattern(input: &str) -> Result<Pattern, String> {
    parser_for(input, ParserConfig::default())?
        .parse_pattern()
        .map_err(|e| format!("Parse error: {}", e))
}

/// Parse a standalone type expression
pub fn parse_type(input: &str) -> Result<TypeExpr, String> {
    parser_for(input, ParserConfig::default())?
        .parse_type_expression()
        .map_err(|e| format!("Parse error: {}", e))
}

/// Parse an expression that is expected to fail, returning the error
pub fn expr_error(input: &str) -> Result<ParseError, String> {
    match parser_for(input, ParserConfig::default())?.parse_expression() {
        Ok(expr) => Err(format!("expected a parse error, got {}", expr_sexpr(&expr))),
        Err(err) => Ok(err),
    }
}

/// Parse a module that is expected to fail, returning the error
pub fn module_error(input: &str) -> Result<ParseError, String> {
    match parser_for(input, ParserConfig::default())?.parse_module() {
        Ok(_) => Err(format!("expected a parse error for {:?}", input)),
        Err(err) => Ok(err),
    }
}

/// Parse an expression with a custom nesting limit.
///
/// Panics if the input does not lex.
pub fn parse_expr_with_depth(input: &str, max_depth: usize) -> Result<Expr, ParseError> {
    let tokens = Lexer::new(input, "test.sch")
        .tokenize()
        .unwrap_or_else(|e| panic!("Lexer error: {}", e));
    Parser::with_config(tokens, ParserConfig::default().with_max_depth(max_depth))
        .parse_expression()
}

/// Parse a type expression with a custom nesting limit.
///
/// Panics if the input does not lex.
pub fn parse_type_with_depth(input: &str, max_depth: usize) -> Result<TypeExpr, ParseError> {
    let tokens = Lexer::new(input, "test.sch")
        .tokenize()
        .unwrap_or_else(|e| panic!("Lexer error: {}", e));
    Parser::with_config(tokens, ParserConfig::default().with_max_depth(max_depth))
        .parse_type_expression()
}

/// Run `f` on a thread with a 64 MiB stack and return its result.
///
/// Trees hold `Rc` locations and cannot cross threads, so `f` should reduce
/// what it parses to plain data before returning.
pub fn with_large_stack<T, F>(f: F) -> T
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    let handle = std::thread::Builder::new()
        .stack_size(64 * 1024 * 1024)
        .spawn(f)
        .expect("failed to spawn test thread");
    match handle.join() {
        Ok(value) => value,
        Err(panic) => std::panic::resume_unwind(panic),
    }
}

// ============================================================================
// S-expression printers
// ============================================================================

fn literal_sexpr(lit: &Literal) -> String {
    match lit {
        Literal::Int(n) => n.to_string(),
        Literal::Float(f) => format!("{:?}", f),
        Literal::String(s) => format!("{:?}", s),
        Literal::Bool(b) => b.to_string(),
        Literal::Unit => "()".to_string(),
        Literal::Null => "null".to_string(),
    }
}

fn list(head: &str, items: impl IntoIterator<Item = String>) -> String {
    let mut out = format!("({}", head);
    for item in items {
        out.push(' ');
        out.push_str(&item);
    }
    out.push(')');
    out
}

fn record_entry_sexpr(entry: &RecordEntry) -> String {
    match entry {
        RecordEntry::Field { name, value, .. } => format!("({} {})", name, expr_sexpr(value)),
        RecordEntry::Spread(expr) => format!("(... {})", expr_sexpr(expr)),
    }
}

/// Render an expression as an s-expression, e.g. `(+ 1 (* 2 3))`
pub fn expr_sexpr(expr: &Expr) -> String {
    match &expr.node {
        ExprKind::Lit(lit) => literal_sexpr(lit),
        ExprKind::Var(name) => name.clone(),
        ExprKind::UnaryOp { op, expr } => {
            let head = match op {
                UnaryOp::Negate => "neg",
                UnaryOp::LogicalNot => "not",
                UnaryOp::Deref => "deref",
            };
            list(head, [expr_sexpr(expr)])
        }
        ExprKind::BinOp { op, left, right } => {
            list(op.symbol(), [expr_sexpr(left), expr_sexpr(right)])
        }
        ExprKind::App { func, args } => list(
            "call",
            std::iter::once(expr_sexpr(func)).chain(args.iter().map(expr_sexpr)),
        ),
        ExprKind::Lambda {
            params,
            return_type,
            body,
        } => {
            let params = list(
                "params",
                params.iter().map(|p| match &p.type_annotation {
                    Some(ty) => format!("(: {} {})", pattern_sexpr(&p.pattern), type_sexpr(ty)),
                    None => pattern_sexpr(&p.pattern),
                }),
            );
            let mut parts = vec![params];
            if let Some(ty) = return_type {
                parts.push(format!("(returns {})", type_sexpr(ty)));
            }
            parts.push(expr_sexpr(body));
            list("fn", parts)
        }
        ExprKind::If {
            condition,
            then_branch,
            else_branch,
        } => list(
            "if",
            [
                expr_sexpr(condition),
                expr_sexpr(then_branch),
                expr_sexpr(else_branch),
            ],
        ),
        ExprKind::Match { expr, cases } => list(
            "match",
            std::iter::once(expr_sexpr(expr)).chain(cases.iter().map(|case| {
                let mut parts = vec![pattern_sexpr(&case.pattern)];
                if let Some(guard) = &case.guard {
                    parts.push(list("when", [expr_sexpr(guard)]));
                }
                parts.push(expr_sexpr(&case.body));
                list("case", parts)
            })),
        ),
        ExprKind::Record { fields } => list("record", fields.iter().map(record_entry_sexpr)),
        ExprKind::RecordUpdate { record, updates } => list(
            "update",
            std::iter::once(expr_sexpr(record)).chain(updates.iter().map(record_entry_sexpr)),
        ),
        ExprKind::List { elements } => list(
            "list",
            elements.iter().map(|element| match element {
                ListElement::Element(e) => expr_sexpr(e),
                ListElement::Spread(e) => format!("(... {})", expr_sexpr(e)),
            }),
        ),
        ExprKind::RecordAccess { record, field } => list(".", [expr_sexpr(record), field.clone()]),
        ExprKind::Pipe { expr, func } => list("|>", [expr_sexpr(expr), expr_sexpr(func)]),
        ExprKind::Block { exprs } => list("block", exprs.iter().map(expr_sexpr)),
        ExprKind::Unsafe { expr } => list("unsafe", [expr_sexpr(expr)]),
        ExprKind::TypeAnnotation { expr, type_expr } => {
            list(":", [expr_sexpr(expr), type_sexpr(type_expr)])
        }
        ExprKind::While { condition, body } => {
            list("while", [expr_sexpr(condition), expr_sexpr(body)])
        }
        ExprKind::Tuple { elements } => list("tuple", elements.iter().map(expr_sexpr)),
        ExprKind::Let {
            pattern,
            value,
            mutable,
            recursive,
        } => {
            let mut head = String::from("let");
            if *mutable {
                head.push_str(" mut");
            }
            if *recursive {
                head.push_str(" rec");
            }
            list(&head, [pattern_sexpr(pattern), expr_sexpr(value)])
        }
    }
}

/// Render a pattern as an s-expression, e.g. `(Some (or 1 2))`
pub fn pattern_sexpr(pattern: &Pattern) -> String {
    match &pattern.node {
        PatternKind::Var(name) => name.clone(),
        PatternKind::Wildcard => "_".to_string(),
        PatternKind::Literal(lit) => literal_sexpr(lit),
        PatternKind::Constructor { constructor, args } => {
            list(constructor, args.iter().map(pattern_sexpr))
        }
        PatternKind::Record { fields } => list(
            "record",
            fields
                .iter()
                .map(|f| format!("({} {})", f.name, pattern_sexpr(&f.pattern))),
        ),
        PatternKind::List { elements, rest } => list(
            "list",
            elements.iter().map(pattern_sexpr).chain(
                rest.iter()
                    .map(|r| format!("(... {})", pattern_sexpr(r))),
            ),
        ),
        PatternKind::Or { patterns } => list("or", patterns.iter().map(pattern_sexpr)),
        PatternKind::TypeAnnotated { pattern, type_expr } => {
            list(":", [pattern_sexpr(pattern), type_sexpr(type_expr)])
        }
        PatternKind::Tuple { elements } => list("tuple", elements.iter().map(pattern_sexpr)),
    }
}

/// Render a type expression as an s-expression, e.g. `(Option (List Int))`
pub fn type_sexpr(ty: &TypeExpr) -> String {
    match &ty.node {
        TypeExprKind::Var(name) | TypeExprKind::Const(name) => name.clone(),
        TypeExprKind::Function {
            params,
            return_type,
        } => list(
            "->",
            [
                list("params", params.iter().map(type_sexpr)),
                type_sexpr(return_type),
            ],
        ),
        TypeExprKind::App { constructor, args } => {
            list(&type_sexpr(constructor), args.iter().map(type_sexpr))
        }
        TypeExprKind::Record { fields } => list(
            "record",
            fields
                .iter()
                .map(|f| format!("({} {})", f.name, type_sexpr(&f.type_expr))),
        ),
        TypeExprKind::Union { types } => list("union", types.iter().map(type_sexpr)),
        TypeExprKind::Tuple { elements } => list("tuple", elements.iter().map(type_sexpr)),
    }
}

// ============================================================================
// Depth walkers
// ============================================================================

/// Follow single-element lists inward: returns (nesting depth, innermost expression)
pub fn list_nesting(expr: &Expr) -> (usize, &Expr) {
    let mut depth = 0;
    let mut current = expr;
    while let ExprKind::List { elements } = &current.node {
        depth += 1;
        match elements.first() {
            Some(ListElement::Element(inner)) => current = inner,
            _ => break,
        }
    }
    (depth, current)
}

/// Follow the first argument of nested type applications: returns
/// (number of applications, innermost type)
pub fn type_app_nesting(ty: &TypeExpr) -> (usize, &TypeExpr) {
    let mut depth = 0;
    let mut current = ty;
    while let TypeExprKind::App { args, .. } = &current.node {
        depth += 1;
        match args.first() {
            Some(inner) => current = inner,
            None => break,
        }
    }
    (depth, current)
}

/// Follow the `expr` of nested unary operators: returns (count, operand)
pub fn unary_nesting(expr: &Expr) -> (usize, &Expr) {
    let mut depth = 0;
    let mut current = expr;
    while let ExprKind::UnaryOp { expr, .. } = &current.node {
        depth += 1;
        current = expr;
    }
    (depth, current)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expr_sexpr_shapes() {
        let expr = parse_expr("f(x).y!").unwrap();
        assert_eq!(expr_sexpr(&expr), "(deref (. (call f x) y))");
    }

    #[test]
    fn test_pattern_and_type_sexpr() {
        let pat = parse_pattern("Some([a, ...rest] | _)").unwrap();
        assert_eq!(pattern_sexpr(&pat), "(Some (or (list a (... rest)) _))");
        let ty = parse_type("(Int) -> Option<a>").unwrap();
        assert_eq!(type_sexpr(&ty), "(-> (params Int) (Option a))");
    }

    #[test]
    fn test_list_nesting() {
        let expr = parse_expr("[[[7]]]").unwrap();
        let (depth, leaf) = list_nesting(&expr);
        assert_eq!(depth, 3);
        assert_eq!(leaf.node, ExprKind::Lit(Literal::Int(7)));
    }

    #[test]
    fn test_with_large_stack_returns_value() {
        assert_eq!(with_large_stack(|| 40 + 2), 42);
    }
}
