//! Line-oriented comment removal for C and C++ sources.
//!
//! Each line is handled on its own; the only thing carried from one line to
//! the next is a [`ScanState`]. String and character literals are swapped out
//! for placeholder tokens before comments are searched for, so `"//"` or
//! `'/'` inside a literal survive untouched.

use regex::Regex;
use std::sync::LazyLock;

static LITERAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""(?:\\.|[^"\\])*"|'(?:\\.|[^'\\])*'"#).unwrap());

/// Whether the scanner is sitting inside an unterminated `/* ... */`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScanState {
    #[default]
    Normal,
    InBlockComment,
}

/// A line whose literals have been replaced by `<sentinel><index><sentinel>`.
struct Protected {
    text: String,
    literals: Vec<String>,
    sentinel: char,
}

/// Private use code points. The first one missing from the line is the
/// placeholder delimiter, so a placeholder can never match source text.
fn pick_sentinel(line: &str) -> char {
    ('\u{E000}'..='\u{F8FF}')
        .chain('\u{F0000}'..='\u{FFFFD}')
        .chain('\u{100000}'..='\u{10FFFD}')
        .find(|c| !line.contains(*c))
        .unwrap_or(char::REPLACEMENT_CHARACTER)
}

fn protect_literals(line: &str) -> Protected {
    let sentinel = pick_sentinel(line);
    let mut literals = Vec::new();
    let text = LITERAL
        .replace_all(line, |caps: &regex::Captures| {
            literals.push(caps[0].to_string());
            format!("{}{}{}", sentinel, literals.len() - 1, sentinel)
        })
        .into_owned();

    Protected {
        text,
        literals,
        sentinel,
    }
}

impl Protected {
    fn restore(&self, text: &str) -> String {
        let mut restored = String::with_capacity(text.len());
        for (i, part) in text.split(self.sentinel).enumerate() {
            if i % 2 == 0 {
                restored.push_str(part);
                continue;
            }
            match part.parse::<usize>().ok().and_then(|idx| self.literals.get(idx)) {
                Some(literal) => restored.push_str(literal),
                None => {
                    restored.push(self.sentinel);
                    restored.push_str(part);
                    restored.push(self.sentinel);
                }
            }
        }
        restored
    }
}

/// Removes comments from a line that has no literals left in it.
///
/// Openers are taken left to right. Every complete `/* ... */` is cut out,
/// a `//` drops the rest of the line, and a `/*` without a closer drops the
/// rest of the line and opens a block comment.
fn strip_protected(mut text: String) -> (String, ScanState) {
    let mut from = 0;
    loop {
        let line_at = text[from..].find("//").map(|i| i + from);
        let block_at = text[from..].find("/*").map(|i| i + from);

        match (line_at, block_at) {
            (Some(l), b) if b.is_none_or(|b| l < b) => {
                text.truncate(l);
                return (text, ScanState::Normal);
            }
            (_, Some(b)) => match text[b + 2..].find("*/") {
                Some(end) => {
                    text.replace_range(b..b + 2 + end + 2, "");
                    from = b;
                }
                None => {
                    text.truncate(b);
                    return (text, ScanState::InBlockComment);
                }
            },
            _ => return (text, ScanState::Normal),
        }
    }
}

/// Strips one line given the state left behind by the previous one.
///
/// Returns `None` when nothing but whitespace is left, together with the
/// state to hand to the next line.
pub fn strip_line(line: &str, state: ScanState) -> (Option<String>, ScanState) {
    let code = match state {
        ScanState::Normal => line,
        ScanState::InBlockComment => match line.find("*/") {
            Some(end) => &line[end + 2..],
            None => return (None, ScanState::InBlockComment),
        },
    };

    let protected = protect_literals(code);
    let (stripped, next) = strip_protected(protected.text.clone());
    let restored = protected.restore(&stripped);

    let trimmed = restored.trim_end();
    if trimmed.is_empty() {
        (None, next)
    } else {
        (Some(trimmed.to_string()), next)
    }
}

/// Removes every `//` and `/* */` comment from `content`, dropping lines
/// that end up blank. Input that is empty or only whitespace comes back as is.
pub fn remove_comments(content: &str) -> String {
    if content.trim().is_empty() {
        return content.to_string();
    }

    let mut state = ScanState::Normal;
    let mut kept = Vec::new();
    for line in content.split('\n') {
        let (stripped, next) = strip_line(line, state);
        state = next;
        kept.extend(stripped);
    }

    kept.join("\n")
}
