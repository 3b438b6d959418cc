//! Named-group dialect translation
//!
//! Patterns are stored and edited in the external dialect (`(?P<name>…)`,
//! `(?P=name)`) and matched in the internal one (`(?<name>…)`, `\k<name>`).
//! The rewrite is purely textual and total: malformed patterns pass through
//! untouched and are reported later by the validator.
//!
//! Escaped characters and character-class contents are copied verbatim, so
//! `\(?P<x>` and `[(?P<x>]` are never rewritten. Constructs other than named
//! groups and named backreferences (lookaround, inline flags, conditionals)
//! are not translated. A pattern that already contains internal-dialect
//! syntax before `to_internal` does not round-trip.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    ToInternal,
    ToExternal,
}

/// Rewrite external-dialect named groups and backreferences into internal syntax.
pub fn to_internal(pattern: &str) -> String {
    rewrite(pattern, Direction::ToInternal)
}

/// Rewrite internal-dialect named groups and backreferences into external syntax.
pub fn to_external(pattern: &str) -> String {
    rewrite(pattern, Direction::ToExternal)
}

fn rewrite(pattern: &str, direction: Direction) -> String {
    let mut out = String::with_capacity(pattern.len() + 8);
    let mut rest = pattern;
    let mut in_class = false;

    while let Some(ch) = rest.chars().next() {
        match ch {
            '\\' => {
                if !in_class && direction == Direction::ToExternal {
                    if let Some(name) = named_token(rest, "\\k<", '>') {
                        out.push_str("(?P=");
                        out.push_str(name);
                        out.push(')');
                        rest = &rest["\\k<".len() + name.len() + 1..];
                        continue;
                    }
                }
                // Backslash plus whatever it escapes, copied as one unit
                let escaped_len = rest[1..].chars().next().map_or(0, char::len_utf8);
                let unit = 1 + escaped_len;
                out.push_str(&rest[..unit]);
                rest = &rest[unit..];
                continue;
            }
            '[' if !in_class => {
                in_class = true;
                out.push('[');
                rest = &rest[1..];
                // A leading `]` (optionally after `^`) is a literal member
                for lead in ["^]", "]", "^"] {
                    if let Some(stripped) = rest.strip_prefix(lead) {
                        out.push_str(lead);
                        rest = stripped;
                        break;
                    }
                }
                continue;
            }
            ']' if in_class => in_class = false,
            '(' if !in_class => {
                if let Some((replacement, consumed)) = rewrite_group(rest, direction) {
                    out.push_str(&replacement);
                    rest = &rest[consumed..];
                    continue;
                }
            }
            _ => {}
        }
        out.push(ch);
        rest = &rest[ch.len_utf8()..];
    }

    out
}

/// Rewrite a group opener or backreference at the start of `rest`, returning the
/// replacement text and how many bytes of `rest` it replaces.
fn rewrite_group(rest: &str, direction: Direction) -> Option<(String, usize)> {
    match direction {
        Direction::ToInternal => {
            if let Some(name) = named_token(rest, "(?P<", '>') {
                return Some((format!("(?<{name}>"), "(?P<".len() + name.len() + 1));
            }
            if let Some(name) = named_token(rest, "(?P=", ')') {
                return Some((format!("\\k<{name}>"), "(?P=".len() + name.len() + 1));
            }
            None
        }
        Direction::ToExternal => {
            // `(?<=` and `(?<!` fail the name check and stay lookbehinds
            let name = named_token(rest, "(?<", '>')?;
            Some((format!("(?P<{name}>"), "(?<".len() + name.len() + 1))
        }
    }
}

/// Return the group name in `rest` when it starts with `prefix`, followed by a
/// valid name and the `close` delimiter.
fn named_token<'a>(rest: &'a str, prefix: &str, close: char) -> Option<&'a str> {
    let body = rest.strip_prefix(prefix)?;
    let end = body.find(close)?;
    let name = &body[..end];
    is_group_name(name).then_some(name)
}

fn is_group_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
