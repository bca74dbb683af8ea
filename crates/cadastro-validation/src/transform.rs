//! Value transforms applied after a field passes validation

/// Capitalizes every space-separated word: first character upper-cased,
/// the rest lower-cased. Runs of spaces are preserved as-is.
pub fn title_case(value: &str) -> String {
    value
        .split(' ')
        .map(capitalize_word)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize_word(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.as_str().to_lowercase().chars())
            .collect(),
        None => String::new(),
    }
}

pub fn lowercase(value: &str) -> String {
    value.to_lowercase()
}

pub fn uppercase(value: &str) -> String {
    value.to_uppercase()
}

pub fn trim(value: &str) -> String {
    value.trim().to_string()
}
