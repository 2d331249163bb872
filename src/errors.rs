//! Diagnostic rendering for lexer and parser errors.
//!
//! This module provides:
//! - ANSI color support, switched on by the caller
//! - Levenshtein distance for "did you mean?" suggestions
//! - Source snippet formatting with a caret under the offending column
//! - `render_parse_error` / `render_lex_error`, which turn a structured error
//!   into the text shown to a user

use crate::ast::Location;
use crate::lexer::LexError;
use crate::parser::ParseError;

/// Text roles used in a rendered diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    Gutter,
    Caret,
    Hint,
    Location,
}

impl Style {
    fn ansi(self) -> &'static str {
        match self {
            Style::Gutter => "\x1b[36m",
            Style::Caret => "\x1b[31m",
            Style::Hint => "\x1b[33m",
            Style::Location => "\x1b[1m",
        }
    }
}

/// ANSI coloring, a no-op unless enabled
#[derive(Debug, Clone, Copy, Default)]
pub struct Colors {
    pub enabled: bool,
}

impl Colors {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    /// Wrap `text` in the escape codes for `style`
    pub fn paint(&self, style: Style, text: impl std::fmt::Display) -> String {
        if self.enabled {
            format!("{}{}\x1b[0m", style.ansi(), text)
        } else {
            text.to_string()
        }
    }
}

/// How diagnostics are rendered: coloring and an optional file name that
/// replaces the one recorded in each location
#[derive(Debug, Clone, Default)]
pub struct ErrorConfig {
    pub colors: Colors,
    pub filename: Option<String>,
}

impl ErrorConfig {
    pub fn new(use_color: bool) -> Self {
        Self {
            colors: Colors::new(use_color),
            filename: None,
        }
    }

    pub fn with_filename(mut self, name: impl Into<String>) -> Self {
        self.filename = Some(name.into());
        self
    }
}

// ============================================================================
// Levenshtein Distance for "Did you mean?" suggestions
// ============================================================================

/// Compute the Levenshtein edit distance between two strings.
pub fn levenshtein_distance(a: &str, b: &str) -> usize {
    let b: Vec<char> = b.chars().collect();
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0usize; b.len() + 1];

    for (i, ca) in a.chars().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != *cb);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

/// Find similar names from a list of candidates.
///
/// Returns up to 3 suggestions within the given max edit distance,
/// sorted by distance (closest first).
pub fn find_similar<'a>(
    name: &str,
    candidates: impl IntoIterator<Item = &'a str>,
    max_distance: usize,
) -> Vec<String> {
    let mut suggestions: Vec<(&str, usize)> = candidates
        .into_iter()
        .map(|c| (c, levenshtein_distance(name, c)))
        .filter(|&(_, dist)| dist > 0 && dist <= max_distance)
        .collect();

    suggestions.sort_by(|(a, da), (b, db)| da.cmp(db).then_with(|| a.cmp(b)));
    suggestions
        .into_iter()
        .take(3)
        .map(|(s, _)| s.to_string())
        .collect()
}

// ============================================================================
// Source Snippet Formatting
// ============================================================================

/// Format the source line containing `loc` with a caret under its column.
///
/// ```text
/// 12 | let x = (+ 1);
///              ^
/// ```
pub fn format_snippet(source: &str, loc: &Location, colors: &Colors) -> String {
    let line_text = source
        .lines()
        .nth(loc.line.saturating_sub(1) as usize)
        .unwrap_or("");
    let gutter = format!("{} |", loc.line);
    // caret column: gutter, one space, then the column offset
    let padding = " ".repeat(gutter.len() + loc.column.max(1) as usize);
    format!(
        "{} {line_text}\n{padding}{}",
        colors.paint(Style::Gutter, &gutter),
        colors.paint(Style::Caret, '^'),
    )
}

/// `-- SYNTAX ERROR ----...`, padded to a fixed width
pub fn format_header(error_kind: &str, colors: &Colors) -> String {
    const WIDTH: usize = 60;
    let rule = "-".repeat(WIDTH.saturating_sub(error_kind.len() + 4));
    colors.paint(Style::Gutter, format!("-- {error_kind} {rule}"))
}

/// `file:line:column`, with the configured file name taking precedence
pub fn format_location(filename: Option<&str>, loc: &Location, colors: &Colors) -> String {
    let file = filename.unwrap_or(&*loc.file);
    colors.paint(Style::Location, format!("{file}:{}:{}", loc.line, loc.column))
}

fn render(
    kind: &str,
    message: &str,
    hint: Option<&str>,
    loc: &Location,
    source: &str,
    config: &ErrorConfig,
) -> String {
    let colors = &config.colors;
    let mut sections = vec![
        format!(
            "{}\n{}",
            format_header(kind, colors),
            format_location(config.filename.as_deref(), loc, colors)
        ),
        message.to_string(),
        format_snippet(source, loc, colors),
    ];
    if let Some(hint) = hint {
        sections.push(format!("{}: {hint}", colors.paint(Style::Hint, "Hint")));
    }
    sections.join("\n\n")
}

/// Render a parse error against the source it came from
pub fn render_parse_error(err: &ParseError, source: &str, config: &ErrorConfig) -> String {
    let kind = match err {
        ParseError::Internal { .. } => "INTERNAL PARSER ERROR",
        ParseError::NestingTooDeep { .. } => "NESTING TOO DEEP",
        _ => "SYNTAX ERROR",
    };
    render(kind, &err.message(), err.hint(), err.loc(), source, config)
}

/// Render a lexer error against the source it came from
pub fn render_lex_error(err: &LexError, source: &str, config: &ErrorConfig) -> String {
    render("TOKEN ERROR", &err.to_string(), None, err.loc(), source, config)
}

// ============================================================================
// Tests
// ============================================================================
