//! Input tables and expected import lines.

/// english,translation rows for water and sun.
pub const WATER_AND_SUN: &str = "water,מים\nsun,שמש\n";

/// english / pointed Hebrew pairs the fake translator knows.
pub const DICTIONARY: &[(&str, &str)] = &[("water", "מַיִם"), ("sun", "שֶׁמֶשׁ"), ("bread", "לֶחֶם")];

/// The import line for a word with default templates.
pub fn import_line(english: &str, translation: &str, extra: &[&str]) -> String {
    let mut fields = vec![
        format!("<img src=\"{}.png\">", english),
        translation.to_string(),
        format!("[sound:{}.mp3]", translation),
        english.to_string(),
    ];
    fields.extend(extra.iter().map(|f| f.to_string()));
    format!("{}\r\n", fields.join(";"))
}
