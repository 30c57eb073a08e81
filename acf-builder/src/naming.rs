//! Name, label and key derivation shared by every builder.

/// Prefix carried by every generated field key.
pub const FIELD_KEY_PREFIX: &str = "field_";
/// Prefix carried by every field group key.
pub const GROUP_KEY_PREFIX: &str = "group_";

/// Turn a field name into a human label: `hero_image` becomes `Hero Image`.
pub fn generate_label(name: &str) -> String {
    let spaced = name.replace('_', " ");
    let mut label = String::with_capacity(spaced.len());
    let mut at_word_start = true;
    for c in spaced.chars() {
        if at_word_start {
            label.extend(c.to_uppercase());
        } else {
            label.push(c);
        }
        at_word_start = c.is_whitespace();
    }
    label
}

/// Turn a label into a snake_case field name: `Main Content!` becomes `main_content`.
pub fn generate_name(label: &str) -> String {
    let mut name = String::with_capacity(label.len());
    for c in label.chars() {
        if c.is_alphanumeric() {
            name.extend(c.to_lowercase());
        } else if !name.is_empty() && !name.ends_with('_') {
            name.push('_');
        }
    }
    while name.ends_with('_') {
        name.pop();
    }
    name
}

/// Lowercase a builder name and replace spaces so it can sit inside a key.
pub fn normalize_key_name(name: &str) -> String {
    name.to_lowercase().replace(' ', "_")
}

/// Add the `field_` prefix unless the key already carries it.
pub fn prefix_field_key(key: &str) -> String {
    if key.starts_with(FIELD_KEY_PREFIX) {
        key.to_string()
    } else {
        format!("{FIELD_KEY_PREFIX}{key}")
    }
}

/// Build a `group_` key from a group name or an existing group key.
pub fn group_key(name: &str) -> String {
    let bare = name.strip_prefix(GROUP_KEY_PREFIX).unwrap_or(name);
    format!("{GROUP_KEY_PREFIX}{}", normalize_key_name(bare))
}

/// Strip one leading `field_` or `group_` prefix.
pub fn strip_key_prefix(value: &str) -> &str {
    value
        .strip_prefix(FIELD_KEY_PREFIX)
        .or_else(|| value.strip_prefix(GROUP_KEY_PREFIX))
        .unwrap_or(value)
}

/// Namespace a key or field reference under the named builder.
///
/// `namespaced_key("Page Banner", "field_title")` is `field_page_banner_title`;
/// an unnamed builder only re-applies the `field_` prefix. The whole result
/// is lower-cased.
pub fn namespaced_key(namespace: &str, value: &str) -> String {
    let bare = strip_key_prefix(value).to_lowercase();
    if namespace.is_empty() {
        format!("{FIELD_KEY_PREFIX}{bare}")
    } else {
        format!("{FIELD_KEY_PREFIX}{}_{bare}", normalize_key_name(namespace))
    }
}

/// Singularize the last word of a label: `Content Blocks` becomes `Content Block`.
pub fn singularize(label: &str) -> String {
    let split = label.rfind(' ').map(|i| i + 1).unwrap_or(0);
    let (head, word) = label.split_at(split);
    format!("{head}{}", singularize_word(word))
}

fn singularize_word(word: &str) -> String {
    let lower = word.to_lowercase();
    if lower.len() > 3 && lower.ends_with("ies") {
        return format!("{}y", &word[..word.len() - 3]);
    }
    for suffix in ["sses", "shes", "ches", "xes", "zes"] {
        if lower.ends_with(suffix) {
            return word[..word.len() - 2].to_string();
        }
    }
    if lower.ends_with("ss") || lower.ends_with("us") || lower.ends_with("is") {
        return word.to_string();
    }
    match word.strip_suffix('s').or_else(|| word.strip_suffix('S')) {
        Some(stem) if !stem.is_empty() => stem.to_string(),
        _ => word.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("title", "Title")]
    #[case("hero_image", "Hero Image")]
    #[case("call_to_action_url", "Call To Action Url")]
    #[case("", "")]
    fn label_from_name(#[case] name: &str, #[case] expected: &str) {
        assert_eq!(generate_label(name), expected);
    }

    #[rstest]
    #[case("Main Content", "main_content")]
    #[case("  Settings & Options ", "settings_options")]
    #[case("SEO", "seo")]
    fn name_from_label(#[case] label: &str, #[case] expected: &str) {
        assert_eq!(generate_name(label), expected);
    }

    #[rstest]
    #[case("x", "field_x")]
    #[case("field_x", "field_x")]
    #[case("group_x", "field_group_x")]
    fn field_key_prefix_is_idempotent(#[case] key: &str, #[case] expected: &str) {
        assert_eq!(prefix_field_key(key), expected);
        assert_eq!(prefix_field_key(&prefix_field_key(key)), expected);
    }

    #[rstest]
    #[case("banner", "group_banner")]
    #[case("group_banner", "group_banner")]
    #[case("Page Banner", "group_page_banner")]
    fn group_keys(#[case] name: &str, #[case] expected: &str) {
        assert_eq!(group_key(name), expected);
    }

    #[rstest]
    #[case("banner", "field_title", "field_banner_title")]
    #[case("banner", "group_slides", "field_banner_slides")]
    #[case("Page Banner", "title", "field_page_banner_title")]
    #[case("", "field_title", "field_title")]
    #[case("Page", "field_HeroTitle", "field_page_herotitle")]
    fn namespacing(#[case] namespace: &str, #[case] value: &str, #[case] expected: &str) {
        assert_eq!(namespaced_key(namespace, value), expected);
    }

    #[test]
    fn namespacing_strips_only_one_prefix() {
        assert_eq!(
            namespaced_key("page", "field_field_title"),
            "field_page_field_title"
        );
    }

    #[rstest]
    #[case("Sections", "Section")]
    #[case("Content Blocks", "Content Block")]
    #[case("Categories", "Category")]
    #[case("Boxes", "Box")]
    #[case("Address", "Address")]
    #[case("Status", "Status")]
    #[case("Banner", "Banner")]
    fn singular_labels(#[case] label: &str, #[case] expected: &str) {
        assert_eq!(singularize(label), expected);
    }
}
