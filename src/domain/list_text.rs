//! Storage encoding for ingredient and step lists.
//!
//! Lists are persisted in a single text column. New rows are written as a
//! JSON array of strings. Reading accepts three shapes so older rows keep
//! working:
//!
//! 1. a JSON array of strings,
//! 2. a bracketed list literal with single- or double-quoted items
//!    (`['flour 200g', 'milk']`), parsed by [`parse_list_literal`],
//! 3. newline-delimited plain text.
//!
//! Stored text is only ever parsed as data.

use serde::{Deserialize, Serialize};

/// Ingredient or step input as it arrives at the API boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ListOrText {
    List(Vec<String>),
    Text(String),
}

impl ListOrText {
    /// Normalizes the input into an ordered list of non-blank, trimmed items.
    #[must_use]
    pub fn into_items(self) -> Vec<String> {
        match self {
            Self::List(items) => clean(items),
            Self::Text(text) => split_lines(&text),
        }
    }
}

impl From<Vec<String>> for ListOrText {
    fn from(items: Vec<String>) -> Self {
        Self::List(items)
    }
}

impl From<&str> for ListOrText {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

/// Encodes items for storage.
#[must_use]
pub fn encode(items: &[String]) -> String {
    serde_json::Value::from(items.to_vec()).to_string()
}

/// Decodes a stored column back into its items.
#[must_use]
pub fn decode(stored: &str) -> Vec<String> {
    let trimmed = stored.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }

    if trimmed.starts_with('[') {
        if let Ok(items) = serde_json::from_str::<Vec<String>>(trimmed) {
            return clean(items);
        }
        if let Some(items) = parse_list_literal(trimmed) {
            return clean(items);
        }
    }

    split_lines(trimmed)
}

fn clean(items: Vec<String>) -> Vec<String> {
    items
        .into_iter()
        .map(|item| item.trim().to_string())
        .filter(|item| !item.is_empty())
        .collect()
}

fn split_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parses a bracketed list of quoted strings such as `['a', "b's"]`.
///
/// Returns `None` for anything that is not exactly such a list.
#[must_use]
pub fn parse_list_literal(input: &str) -> Option<Vec<String>> {
    let mut chars = input.trim().chars().peekable();
    if chars.next()? != '[' {
        return None;
    }

    let mut items = Vec::new();
    loop {
        skip_whitespace(&mut chars);
        match chars.next()? {
            ']' => break,
            quote @ ('\'' | '"') => {
                items.push(read_quoted(&mut chars, quote)?);
                skip_whitespace(&mut chars);
                match chars.next()? {
                    ',' => {}
                    ']' => break,
                    _ => return None,
                }
            }
            _ => return None,
        }
    }

    skip_whitespace(&mut chars);
    if chars.next().is_some() {
        return None;
    }

    Some(items)
}

fn skip_whitespace(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) {
    while chars.peek().is_some_and(|c| c.is_whitespace()) {
        chars.next();
    }
}

fn read_quoted(chars: &mut std::iter::Peekable<std::str::Chars<'_>>, quote: char) -> Option<String> {
    let mut value = String::new();
    loop {
        match chars.next()? {
            c if c == quote => return Some(value),
            '\\' => match chars.next()? {
                'n' => value.push('\n'),
                't' => value.push('\t'),
                'r' => value.push('\r'),
                other => value.push(other),
            },
            c => value.push(c),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn list_and_text_inputs_normalize_identically() {
        let from_list = ListOrText::List(strings(&["flour 200g", "milk 300ml"])).into_items();
        let from_text = ListOrText::Text("flour 200g\nmilk 300ml".to_string()).into_items();

        assert_eq!(from_list, strings(&["flour 200g", "milk 300ml"]));
        assert_eq!(from_list, from_text);
    }

    #[test]
    fn text_input_drops_blank_lines_and_trims() {
        let items = ListOrText::from("  eggs 2 \r\n\r\n sugar\n").into_items();
        assert_eq!(items, strings(&["eggs 2", "sugar"]));
    }

    #[test]
    fn untagged_deserialization_picks_the_right_shape() {
        let list: ListOrText = serde_json::from_str(r#"["a", "b"]"#).unwrap();
        assert_eq!(list, ListOrText::List(strings(&["a", "b"])));

        let text: ListOrText = serde_json::from_str(r#""a\nb""#).unwrap();
        assert_eq!(text, ListOrText::Text("a\nb".to_string()));
    }

    #[test]
    fn encoded_lists_decode_back() {
        let items = strings(&["flour \"00\"", "milk, whole", "line\\slash"]);
        assert_eq!(decode(&encode(&items)), items);
    }

    #[test]
    fn decodes_legacy_list_literals() {
        let stored = "['мука 200г', 'молоко 300мл', \"baker's yeast\", 'it\\'s fine']";
        assert_eq!(
            decode(stored),
            strings(&["мука 200г", "молоко 300мл", "baker's yeast", "it's fine"])
        );
        assert_eq!(decode("[]"), Vec::<String>::new());
    }

    #[test]
    fn decodes_plain_text_fallback() {
        assert_eq!(decode("flour\nmilk"), strings(&["flour", "milk"]));
        assert_eq!(decode("[not a list"), strings(&["[not a list"]));
        assert!(decode("   ").is_empty());
    }

    #[test]
    fn list_literal_parser_rejects_code() {
        assert!(parse_list_literal("__import__('os').system('ls')").is_none());
        assert!(parse_list_literal("['a'] + ['b']").is_none());
        assert!(parse_list_literal("[1, 2]").is_none());
        assert_eq!(parse_list_literal("[ 'a' , ]"), Some(strings(&["a"])));
    }
}
