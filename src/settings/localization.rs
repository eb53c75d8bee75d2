//! Dotted-key lookup into the embedded translation tables.

use std::sync::LazyLock;

use serde_json::Value;

use crate::settings::Language;

static EN: LazyLock<Value> = LazyLock::new(|| {
    serde_json::from_str(include_str!("../../locales/en.json"))
        .expect("embedded English translation table is valid JSON")
});

static UK: LazyLock<Value> = LazyLock::new(|| {
    serde_json::from_str(include_str!("../../locales/uk.json"))
        .expect("embedded Ukrainian translation table is valid JSON")
});

fn table(language: Language) -> &'static Value {
    match language {
        Language::En => &EN,
        Language::Uk => &UK,
    }
}

/// Walk `key` (split on `.`) through the nested table, yielding the string
/// at the end of the path.
fn lookup<'a>(table: &'a Value, key: &str) -> Option<&'a str> {
    let mut node = table;

    for segment in key.split('.') {
        node = node.get(segment)?;
    }

    node.as_str()
}

/// Resolve a dotted translation key such as `goals.deleteConfirm`.
///
/// The key is looked up in `language`'s table first; if any path segment
/// is missing (or the path does not end at a string), the same path is
/// tried in the English table; if that also fails the raw key is returned.
/// This never panics, so a missing translation degrades to a visible key
/// rather than an error.
///
/// After resolution every `{{name}}` placeholder with a matching entry in
/// `substitutions` is replaced; placeholders without a supplied value stay
/// verbatim.
pub fn translate(language: Language, key: &str, substitutions: &[(&str, &str)]) -> String {
    let template = lookup(table(language), key)
        .or_else(|| lookup(&EN, key))
        .unwrap_or(key);

    let mut text = template.to_owned();
    for (name, value) in substitutions {
        text = text.replace(&format!("{{{{{name}}}}}"), value);
    }

    text
}
