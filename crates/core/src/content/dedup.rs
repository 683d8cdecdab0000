use super::trim_blank;

/// Drop lines whose trimmed form equals the trimmed form of the last kept line.
///
/// Only adjacent repeats are collapsed. Kept lines stay verbatim; the joined
/// result is trimmed at both ends.
pub fn clean(text: &str) -> String {
    let mut cleaned = String::with_capacity(text.len());
    let mut previous = "";
    for line in text.split('\n') {
        let trimmed = trim_blank(line);
        if trimmed != previous {
            cleaned.push_str(line);
            cleaned.push('\n');
            previous = trimmed;
        }
    }
    trim_blank(&cleaned).to_string()
}
