//! Property-based tests for the parser
//!
//! These tests verify structural properties of parsing:
//! - Fully parenthesized operator trees parse back to the same tree
//! - Parentheses around a single expression are transparent
//! - Prefix and postfix operators stack without limit
//! - Deep nesting of groups, lists and generic types parses to the right depth
//! - Or-patterns wrap exactly when there are two or more alternatives
//! - Error recovery reports the same first error as a plain parse

use proptest::prelude::*;

use schist::ast::{ExprKind, Literal, PatternKind, TypeExprKind};
use schist::lexer::Lexer;
use schist::parser::{Parser, DEFAULT_MAX_DEPTH};
use schist::test_support::*;

// ============================================================================
// Expression Generators
// ============================================================================

const NAMES: [&str; 5] = ["a", "b", "xs", "foo", "bar2"];
const FIELDS: [&str; 3] = ["x", "len", "next"];
const OPERATORS: [&str; 19] = [
    "+", "-", "*", "/", "%", "&", "::", "==", "!=", "<", "<=", ">", ">=", "&&", "||", ">>", "<<",
    "|>", ":=",
];

/// A generated expression tree that knows both its source text and the
/// s-expression the parser should produce for it
#[derive(Debug, Clone)]
enum Gen {
    Int(u16),
    Var(&'static str),
    Bin(&'static str, Box<Gen>, Box<Gen>),
    Neg(Box<Gen>),
    Not(Box<Gen>),
    Deref(Box<Gen>),
    Field(Box<Gen>, &'static str),
    Call(&'static str, Vec<Gen>),
    List(Vec<Gen>),
}

impl Gen {
    /// Source text with every binary operation parenthesized
    fn source(&self) -> String {
        match self {
            Gen::Int(n) => n.to_string(),
            Gen::Var(name) => name.to_string(),
            Gen::Bin(op, l, r) => format!("({} {} {})", l.source(), op, r.source()),
            Gen::Neg(e) => format!("-{}", e.source()),
            Gen::Not(e) => format!("!{}", e.source()),
            Gen::Deref(e) => format!("{}!", e.atom()),
            Gen::Field(e, field) => format!("{}.{}", e.atom(), field),
            Gen::Call(f, args) => format!("{}({})", f, join(args)),
            Gen::List(items) => format!("[{}]", join(items)),
        }
    }

    /// Source text safe to put in front of a postfix operator
    fn atom(&self) -> String {
        match self {
            Gen::Int(_) | Gen::Neg(_) | Gen::Not(_) => format!("({})", self.source()),
            _ => self.source(),
        }
    }

    fn expected(&self) -> String {
        match self {
            Gen::Int(n) => n.to_string(),
            Gen::Var(name) => name.to_string(),
            Gen::Bin(op, l, r) => format!("({} {} {})", op, l.expected(), r.expected()),
            Gen::Neg(e) => format!("(neg {})", e.expected()),
            Gen::Not(e) => format!("(not {})", e.expected()),
            Gen::Deref(e) => format!("(deref {})", e.expected()),
            Gen::Field(e, field) => format!("(. {} {})", e.expected(), field),
            Gen::Call(f, args) => {
                let mut out = format!("(call {}", f);
                for arg in args {
                    out.push(' ');
                    out.push_str(&arg.expected());
                }
                out.push(')');
                out
            }
            Gen::List(items) => {
                let mut out = String::from("(list");
                for item in items {
                    out.push(' ');
                    out.push_str(&item.expected());
                }
                out.push(')');
                out
            }
        }
    }
}

fn join(items: &[Gen]) -> String {
    items
        .iter()
        .map(Gen::source)
        .collect::<Vec<_>>()
        .join(", ")
}

fn arb_gen() -> impl Strategy<Value = Gen> {
    let leaf = prop_oneof![
        any::<u16>().prop_map(Gen::Int),
        prop::sample::select(NAMES.to_vec()).prop_map(Gen::Var),
    ];
    leaf.prop_recursive(4, 32, 3, |inner| {
        prop_oneof![
            4 => (prop::sample::select(OPERATORS.to_vec()), inner.clone(), inner.clone())
                .prop_map(|(op, l, r)| Gen::Bin(op, Box::new(l), Box::new(r))),
            1 => inner.clone().prop_map(|e| Gen::Neg(Box::new(e))),
            1 => inner.clone().prop_map(|e| Gen::Not(Box::new(e))),
            1 => inner.clone().prop_map(|e| Gen::Deref(Box::new(e))),
            1 => (inner.clone(), prop::sample::select(FIELDS.to_vec()))
                .prop_map(|(e, f)| Gen::Field(Box::new(e), f)),
            1 => (prop::sample::select(NAMES.to_vec()), prop::collection::vec(inner.clone(), 0..3))
                .prop_map(|(f, args)| Gen::Call(f, args)),
            1 => prop::collection::vec(inner, 0..3).prop_map(Gen::List),
        ]
    })
}

// ============================================================================
// Expression Properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// Printing a tree with full parentheses and parsing it gives the tree back
    #[test]
    fn parenthesized_trees_round_trip(tree in arb_gen()) {
        let source = tree.source();
        let expr = parse_expr(&source).map_err(TestCaseError::fail)?;
        prop_assert_eq!(expr_sexpr(&expr), tree.expected(), "source: {}", source);
    }

    /// `(((E)))` parses to exactly the node `E` does, locations included
    #[test]
    fn grouping_is_transparent(tree in arb_gen()) {
        let source = tree.source();
        let grouped = parse_expr(&format!("((({})))", source)).map_err(TestCaseError::fail)?;
        let bare = parse_expr(&format!("   {}", source)).map_err(TestCaseError::fail)?;
        prop_assert_eq!(grouped, bare);
    }

    /// A chain of one left-associative operator nests to the left
    #[test]
    fn subtraction_chain_nests_left(n in 2usize..40) {
        let source = vec!["a"; n].join(" - ");
        let expr = parse_expr(&source).map_err(TestCaseError::fail)?;
        let mut depth = 0;
        let mut current = &expr;
        while let ExprKind::BinOp { left, right, .. } = &current.node {
            prop_assert!(matches!(&right.node, ExprKind::Var(a) if a == "a"));
            depth += 1;
            current = left;
        }
        prop_assert_eq!(depth, n - 1);
    }

    /// A chain of cons cells nests to the right
    #[test]
    fn cons_chain_nests_right(n in 2usize..40) {
        let source = vec!["x"; n].join(" :: ");
        let expr = parse_expr(&source).map_err(TestCaseError::fail)?;
        let mut depth = 0;
        let mut current = &expr;
        while let ExprKind::BinOp { left, right, .. } = &current.node {
            prop_assert!(matches!(&left.node, ExprKind::Var(x) if x == "x"));
            depth += 1;
            current = right;
        }
        prop_assert_eq!(depth, n - 1);
    }

    /// Prefix negation stacks: `---5` is three negations of 5
    #[test]
    fn negation_stacks(n in 1usize..60) {
        let source = format!("{}5", "-".repeat(n));
        let expr = parse_expr(&source).map_err(TestCaseError::fail)?;
        let (depth, operand) = unary_nesting(&expr);
        prop_assert_eq!(depth, n);
        prop_assert_eq!(&operand.node, &ExprKind::Lit(Literal::Int(5)));
    }

    /// Postfix dereference stacks: `x!!!` is three dereferences of x
    #[test]
    fn deref_stacks(n in 1usize..60) {
        let source = format!("x{}", "!".repeat(n));
        let expr = parse_expr(&source).map_err(TestCaseError::fail)?;
        let (depth, operand) = unary_nesting(&expr);
        prop_assert_eq!(depth, n);
        prop_assert_eq!(&operand.node, &ExprKind::Var("x".to_string()));
    }
}

// ============================================================================
// Nesting Robustness
// ============================================================================

/// Depth limit for the large-stack runs, well past anything generated below
const DEEP_LIMIT: usize = 512;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn nesting_under_default_limit(n in 50usize..DEFAULT_MAX_DEPTH - 6) {
        let parens = parse_expr(&format!("{}7{}", "(".repeat(n), ")".repeat(n)))
            .map_err(TestCaseError::fail)?;
        prop_assert_eq!(expr_sexpr(&parens), "7");

        let lists = parse_expr(&format!("{}7{}", "[".repeat(n), "]".repeat(n)))
            .map_err(TestCaseError::fail)?;
        let (depth, leaf) = list_nesting(&lists);
        prop_assert_eq!(depth, n);
        prop_assert_eq!(expr_sexpr(leaf), "7");

        let types = parse_type(&format!("{}Int{}", "List<".repeat(n), ">".repeat(n)))
            .map_err(TestCaseError::fail)?;
        prop_assert_eq!(type_app_nesting(&types).0, n);
    }

    #[test]
    fn deep_parentheses(n in 50usize..150) {
        let rendered = with_large_stack(move || {
            let source = format!("{}7{}", "(".repeat(n), ")".repeat(n));
            parse_expr_with_depth(&source, DEEP_LIMIT)
                .map(|e| expr_sexpr(&e))
                .map_err(|e| e.to_string())
        });
        prop_assert_eq!(rendered, Ok("7".to_string()));
    }

    #[test]
    fn deep_lists(n in 50usize..150) {
        let walked = with_large_stack(move || {
            let source = format!("{}7{}", "[".repeat(n), "]".repeat(n));
            parse_expr_with_depth(&source, DEEP_LIMIT)
                .map(|e| {
                    let (depth, leaf) = list_nesting(&e);
                    (depth, expr_sexpr(leaf))
                })
                .map_err(|e| e.to_string())
        });
        prop_assert_eq!(walked, Ok((n, "7".to_string())));
    }

    #[test]
    fn deep_generic_types(n in 50usize..150) {
        let walked = with_large_stack(move || {
            let source = format!("{}Int{}", "List<".repeat(n), ">".repeat(n));
            parse_type_with_depth(&source, DEEP_LIMIT)
                .map(|t| {
                    let (depth, leaf) = type_app_nesting(&t);
                    (depth, matches!(&leaf.node, TypeExprKind::Const(c) if c == "Int"))
                })
                .map_err(|e| e.to_string())
        });
        prop_assert_eq!(walked, Ok((n, true)));
    }
}

// ============================================================================
// Pattern Properties
// ============================================================================

fn arb_simple_pattern() -> impl Strategy<Value = String> {
    prop_oneof![
        (0u16..1000).prop_map(|n| n.to_string()),
        prop::sample::select(NAMES.to_vec()).prop_map(str::to_string),
        Just("_".to_string()),
        "[a-z]{0,6}".prop_map(|s| format!("{:?}", s)),
        Just("None()".to_string()),
        Just("[]".to_string()),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    /// One alternative is never wrapped; k >= 2 alternatives make one Or of k
    #[test]
    fn or_pattern_alternative_count(alts in prop::collection::vec(arb_simple_pattern(), 1..8)) {
        let source = alts.join(" | ");
        let pattern = parse_pattern(&source).map_err(TestCaseError::fail)?;
        match &pattern.node {
            PatternKind::Or { patterns } => {
                prop_assert!(alts.len() >= 2);
                prop_assert_eq!(patterns.len(), alts.len());
            }
            _ => prop_assert_eq!(alts.len(), 1),
        }
    }

    /// Or-patterns keep their shape inside constructors, records, lists and tuples
    #[test]
    fn or_pattern_nests(alts in prop::collection::vec(arb_simple_pattern(), 2..6)) {
        let inner = alts.join(" | ");
        let expected = format!(
            "(or {})",
            alts.iter()
                .map(|a| pattern_sexpr(&parse_pattern(a).expect("alternative parses")))
                .collect::<Vec<_>>()
                .join(" ")
        );
        let cases = [
            (format!("Some({})", inner), format!("(Some {})", expected)),
            (format!("{{ f: {} }}", inner), format!("(record (f {}))", expected)),
            (format!("[{}, z]", inner), format!("(list {} z)", expected)),
            (format!("({}, z)", inner), format!("(tuple {} z)", expected)),
        ];
        for (source, want) in cases {
            let pattern = parse_pattern(&source).map_err(TestCaseError::fail)?;
            prop_assert_eq!(pattern_sexpr(&pattern), want);
        }
    }
}

// ============================================================================
// Recovery Properties
// ============================================================================

const FRAGMENTS: [&str; 22] = [
    "let", "x", "=", "1", ";", "(", ")", "+", "{", "}", "type", "T", "|", "=>", "[", "]", ",",
    "match", "import", "\"m\"", "from", "rec",
];

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// Recovery agrees with a plain parse: same module when there are no
    /// errors, same first error otherwise
    #[test]
    fn recovery_agrees_with_plain_parse(
        parts in prop::collection::vec(prop::sample::select(FRAGMENTS.to_vec()), 0..24)
    ) {
        let source = parts.join(" ");
        let tokens = Lexer::new(&source, "test.sch").tokenize().map_err(|e| TestCaseError::fail(e.to_string()))?;

        let plain = Parser::new(tokens.clone()).parse_module();
        let (module, errors) = Parser::new(tokens).parse_module_recovering();

        match plain {
            Ok(expected) => {
                prop_assert!(errors.is_empty(), "unexpected errors for {:?}: {:?}", source, errors);
                prop_assert_eq!(module, expected);
            }
            Err(first) => {
                prop_assert!(!errors.is_empty());
                prop_assert_eq!(&errors[0], &first);
            }
        }
    }
}
