//! Identifier case conversion for generated code.

/// Rust keywords that cannot be used as plain field names.
const RUST_KEYWORDS: &[&str] = &[
    "as", "break", "const", "continue", "crate", "else", "enum", "extern", "false", "fn", "for",
    "if", "impl", "in", "let", "loop", "match", "mod", "move", "mut", "pub", "ref", "return",
    "self", "static", "struct", "super", "trait", "true", "type", "unsafe", "use", "where",
    "while", "async", "await", "dyn", "gen", "yield",
];

/// Keywords that are not accepted as raw identifiers either.
const RUST_UNESCAPABLE: &[&str] = &["_", "crate", "self", "super"];

/// Type names the generated Rust module declares or relies on.
pub const RUST_RESERVED_TYPES: &[&str] = &[
    "CanFrame",
    "CanMessage",
    "Err",
    "From",
    "Message",
    "MessageId",
    "Ok",
    "Result",
    "Self",
    "TryFrom",
];

/// Converts a string to snake_case.
#[must_use]
pub fn to_snake_case(s: &str) -> String {
    let mut result = String::with_capacity(s.len() + 4);
    for (i, c) in s.chars().enumerate() {
        if c.is_uppercase() && i > 0 {
            result.push('_');
        }
        result.push(c.to_ascii_lowercase());
    }
    result
}

/// Converts a string to PascalCase.
#[must_use]
pub fn to_pascal_case(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut capitalize_next = true;

    for c in s.chars() {
        if c == '_' || c == '-' {
            capitalize_next = true;
        } else if capitalize_next {
            result.push(c.to_ascii_uppercase());
            capitalize_next = false;
        } else {
            result.push(c);
        }
    }

    result
}

/// Converts a string to SCREAMING_SNAKE_CASE, keeping existing underscores.
#[must_use]
pub fn to_upper_snake(s: &str) -> String {
    s.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_uppercase()
            } else {
                '_'
            }
        })
        .collect()
}

/// Returns a snake_case name usable as a Rust field or binding.
#[must_use]
pub fn rust_field_name(s: &str) -> String {
    let name = to_snake_case(s);
    if RUST_KEYWORDS.contains(&name.as_str()) {
        format!("r#{name}")
    } else {
        name
    }
}

/// Returns true if `s` can name a field of a generated Rust struct.
#[must_use]
pub fn is_rust_field_name(s: &str) -> bool {
    is_identifier(s) && !RUST_UNESCAPABLE.contains(&to_snake_case(s).as_str())
}

/// Returns true if `s` can name a generated Rust type.
#[must_use]
pub fn is_rust_type_name(s: &str) -> bool {
    is_identifier(s) && !RUST_RESERVED_TYPES.contains(&s)
}

/// Returns true if `s` is a plain identifier in both Rust and C.
#[must_use]
pub fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Folds free text onto one line for use in a generated comment.
#[must_use]
pub fn comment_text(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Returns the flattened name of a bitfield subfield: `group_subfield`.
#[must_use]
pub fn subfield_name(group: &str, subfield: &str) -> String {
    format!("{group}_{subfield}")
}
