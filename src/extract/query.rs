//! Alias scanning over embedded query text
//!
//! This is pattern matching, not SQL parsing. Comments are removed, then
//! parenthesized expressions and single-quoted strings are blanked out so only
//! the top level of the query is scanned. Quoted identifiers are kept whole. Aliases are taken from the first
//! top-level select list (between `SELECT` and the matching `FROM`).

use std::sync::LazyLock;

use regex::Regex;

static LINE_COMMENT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"--[^\r\n]*").unwrap());

static BLOCK_COMMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)/\*.*?\*/").unwrap());

static SELECT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\bSELECT\b").unwrap());

static FROM_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\bFROM\b").unwrap());

static ALIAS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\bAS\s+(?:"([^"]+)"|\[([^\]]+)\]|(\w+))"#).unwrap()
});

/// Remove `-- line` and `/* block */` comments.
pub fn strip_comments(sql: &str) -> String {
    let without_blocks = BLOCK_COMMENT_RE.replace_all(sql, " ");
    LINE_COMMENT_RE.replace_all(&without_blocks, "").into_owned()
}

/// Blank out everything nested in parentheses or inside single-quoted
/// strings, keeping byte offsets intact.
///
/// Double-quoted and bracketed identifiers never open a string or a nesting
/// level. With `keep_identifiers` their text (delimiters included) survives at
/// the top level; without it they are blanked like strings.
fn mask_nested(sql: &str, keep_identifiers: bool) -> String {
    let mut masked = String::with_capacity(sql.len());
    let mut depth = 0usize;
    // Closing delimiter of the quoted run being scanned
    let mut closing: Option<char> = None;

    for c in sql.chars() {
        let keep = match closing {
            Some(close) => {
                if c == close {
                    closing = None;
                }
                close != '\'' && keep_identifiers && depth == 0
            }
            None => match c {
                '\'' => {
                    closing = Some('\'');
                    false
                }
                '"' | '[' => {
                    closing = Some(if c == '"' { '"' } else { ']' });
                    keep_identifiers && depth == 0
                }
                '(' => {
                    depth += 1;
                    false
                }
                ')' => {
                    depth = depth.saturating_sub(1);
                    false
                }
                _ => depth == 0,
            },
        };

        if keep {
            masked.push(c);
        } else {
            masked.extend(std::iter::repeat(' ').take(c.len_utf8()));
        }
    }
    masked
}

/// Column aliases of the query's top-level select list, in order.
///
/// Quoted (`"Total Sales"`) and bracketed (`[Total Sales]`) aliases are
/// returned without their delimiters. Duplicates keep their first occurrence.
pub fn select_list_aliases(query: &str) -> Vec<String> {
    let code = strip_comments(query);
    let masked = mask_nested(&code, true);
    // Same offsets with identifiers blanked, so keywords inside them don't count
    let keywords = mask_nested(&code, false);

    let Some(select) = SELECT_RE.find(&keywords) else {
        return Vec::new();
    };
    let list_end = FROM_RE
        .find_at(&keywords, select.end())
        .map(|m| m.start())
        .unwrap_or(keywords.len());

    let select_list = &masked[select.end()..list_end];

    let mut aliases: Vec<String> = Vec::new();
    for caps in ALIAS_RE.captures_iter(select_list) {
        let Some(keyword) = caps.get(0) else {
            continue;
        };
        // `AS` written inside a quoted identifier
        let at = select.end() + keyword.start();
        if !keywords[at..].starts_with(|c: char| c.is_ascii_alphabetic()) {
            continue;
        }
        let alias = caps
            .get(1)
            .or_else(|| caps.get(2))
            .or_else(|| caps.get(3))
            .map(|m| m.as_str().trim())
            .unwrap_or("");
        if !alias.is_empty() && !aliases.iter().any(|a| a == alias) {
            aliases.push(alias.to_string());
        }
    }
    aliases
}
