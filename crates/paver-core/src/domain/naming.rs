//! Identifier case conversion.
//!
//! Service names, table names and column names arrive in whatever casing the
//! author of a definition preferred (`order-items`, `orderItems`,
//! `ORDER_ITEMS`). Generated code needs them in a handful of fixed shapes,
//! and templates reach the same conversions through the `strings` function
//! set, so everything routes through [`split_words`].
//!
//! | Input | `to_pascal_case` | `to_snake_case` | `to_kebab_case` |
//! |-------|------------------|-----------------|-----------------|
//! | `order-items` | `OrderItems` | `order_items` | `order-items` |
//! | `orderItems` | `OrderItems` | `order_items` | `order-items` |
//! | `HTTPRoute` | `HttpRoute` | `http_route` | `http-route` |

/// Convert to snake_case.
pub fn to_snake_case(s: &str) -> String {
    split_words(s).join("_")
}

/// Convert to kebab-case.
pub fn to_kebab_case(s: &str) -> String {
    split_words(s).join("-")
}

/// Convert to PascalCase (the exported-identifier form used in generated
/// type definitions).
pub fn to_pascal_case(s: &str) -> String {
    split_words(s).iter().map(|w| capitalize(w)).collect()
}

/// Convert to lowerCamelCase.
pub fn to_lower_camel_case(s: &str) -> String {
    let words = split_words(s);
    let mut out = String::new();
    for (i, w) in words.iter().enumerate() {
        if i == 0 {
            out.push_str(w);
        } else {
            out.push_str(&capitalize(w));
        }
    }
    out
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => {
            let mut out = String::with_capacity(word.len());
            out.extend(first.to_uppercase());
            out.push_str(chars.as_str());
            out
        }
        None => String::new(),
    }
}

/// Split a string into lower-cased words.
///
/// Boundaries are explicit separators (`_`, `-`, `.`, whitespace), a
/// lower-to-upper transition (`myApp`), and the end of an acronym followed
/// by a capitalised word (`HTTPServer` → `http`, `server`).
pub fn split_words(input: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '_' || c == '-' || c == '.' || c.is_whitespace() {
            if !current.is_empty() {
                words.push(current.to_lowercase());
                current.clear();
            }
            continue;
        }

        if let Some(&next) = chars.peek() {
            if c.is_lowercase() && next.is_uppercase() {
                current.push(c);
                words.push(current.to_lowercase());
                current.clear();
                continue;
            }

            if c.is_uppercase()
                && next.is_uppercase()
                && chars.clone().nth(1).is_some_and(|n| n.is_lowercase())
            {
                current.push(c);
                words.push(current.to_lowercase());
                current.clear();
                continue;
            }
        }

        current.push(c);
    }

    if !current.is_empty() {
        words.push(current.to_lowercase());
    }

    words
}
