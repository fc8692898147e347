//! Naming-convention helpers shared by reconciliation and code synthesis.
//!
//! Code-facing names use PascalCase (types) and camelCase (members);
//! storage-facing names use snake_case. The rules live here and nowhere
//! else.

/// Split a name into words on separators (`_`, `-`, `.`, whitespace) and on
/// camel-case boundaries, acronym runs included (`HTTPServer` → `HTTP`,
/// `Server`).
fn words(name: &str) -> Vec<String> {
    let chars: Vec<char> = name.chars().collect();
    let mut words = Vec::new();
    let mut current = String::new();
    for (i, &c) in chars.iter().enumerate() {
        if !c.is_alphanumeric() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            continue;
        }
        if c.is_uppercase() && !current.is_empty() {
            let prev = chars[i - 1];
            let boundary = prev.is_lowercase()
                || prev.is_ascii_digit()
                || (prev.is_uppercase() && chars.get(i + 1).is_some_and(|n| n.is_lowercase()));
            if boundary {
                words.push(std::mem::take(&mut current));
            }
        }
        current.push(c);
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
    }
}

/// Guard against identifiers that would start with a digit.
fn identifier_safe(name: String) -> String {
    if name.chars().next().is_some_and(|c| c.is_ascii_digit()) {
        format!("_{name}")
    } else {
        name
    }
}

/// Convert a name to snake_case (storage-facing convention).
pub fn snake_case(name: &str) -> String {
    words(name)
        .iter()
        .map(|w| w.to_lowercase())
        .collect::<Vec<_>>()
        .join("_")
}

/// Convert a name to kebab-case (package/manifest convention).
pub fn kebab_case(name: &str) -> String {
    snake_case(name).replace('_', "-")
}

/// Convert a name to PascalCase (code-facing type convention).
pub fn pascal_case(name: &str) -> String {
    identifier_safe(words(name).iter().map(|w| capitalize(w)).collect())
}

/// Convert a name to camelCase (code-facing member convention).
pub fn camel_case(name: &str) -> String {
    let mut words = words(name).into_iter();
    let Some(first) = words.next() else {
        return String::new();
    };
    let mut out = first.to_lowercase();
    for word in words {
        out.push_str(&capitalize(&word));
    }
    identifier_safe(out)
}

/// Simple English pluralization, used for collection-shaped identifiers.
pub fn pluralize(word: &str) -> String {
    if word.ends_with('y') {
        format!("{}ies", &word[..word.len() - 1])
    } else if word.ends_with('s')
        || word.ends_with("sh")
        || word.ends_with("ch")
        || word.ends_with('x')
        || word.ends_with('z')
    {
        format!("{word}es")
    } else if word.ends_with("fe") {
        format!("{}ves", &word[..word.len() - 2])
    } else if word.ends_with('f') {
        format!("{}ves", &word[..word.len() - 1])
    } else {
        format!("{word}s")
    }
}

/// Whether a name can stand unquoted as a TypeScript object key.
fn needs_quoting(name: &str) -> bool {
    name.is_empty()
        || !name
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '_' || c == '$')
        || !name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

/// Escape a string for embedding in a single-quoted TypeScript literal.
pub fn escape_ts_string(s: &str) -> String {
    s.replace('\\', "\\\\").replace('\'', "\\'")
}

/// Quote a TypeScript object key only when the name requires it.
pub fn quote_key(name: &str) -> String {
    if needs_quoting(name) {
        format!("'{}'", escape_ts_string(name))
    } else {
        name.to_string()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_snake_case() {
        assert_eq!(snake_case("User"), "user");
        assert_eq!(snake_case("OrderItem"), "order_item");
        assert_eq!(snake_case("order item"), "order_item");
        assert_eq!(snake_case("order-item"), "order_item");
        assert_eq!(snake_case("HTTPServer"), "http_server");
        assert_eq!(snake_case("customer_id"), "customer_id");
    }

    #[test]
    fn test_pascal_case() {
        assert_eq!(pascal_case("user"), "User");
        assert_eq!(pascal_case("order_item"), "OrderItem");
        assert_eq!(pascal_case("order item"), "OrderItem");
        assert_eq!(pascal_case("OrderItem"), "OrderItem");
        assert_eq!(pascal_case("2fa"), "_2fa");
    }

    #[test]
    fn test_camel_case() {
        assert_eq!(camel_case("User"), "user");
        assert_eq!(camel_case("OrderItem"), "orderItem");
        assert_eq!(camel_case("order_item"), "orderItem");
        assert_eq!(camel_case(""), "");
    }

    #[test]
    fn test_kebab_case() {
        assert_eq!(kebab_case("My Project"), "my-project");
        assert_eq!(kebab_case("OrderItem"), "order-item");
    }

    #[test]
    fn test_pluralize() {
        assert_eq!(pluralize("User"), "Users");
        assert_eq!(pluralize("Category"), "Categories");
        assert_eq!(pluralize("Address"), "Addresses");
        assert_eq!(pluralize("Box"), "Boxes");
        assert_eq!(pluralize("Shelf"), "Shelves");
        assert_eq!(pluralize("Knife"), "Knives");
        assert_eq!(pluralize("Dish"), "Dishes");
    }

    #[test]
    fn test_quote_key() {
        assert_eq!(quote_key("name"), "name");
        assert_eq!(quote_key("_name"), "_name");
        assert_eq!(quote_key("first name"), "'first name'");
        assert_eq!(quote_key("123"), "'123'");
        assert_eq!(quote_key("it's"), "'it\\'s'");
    }
}
