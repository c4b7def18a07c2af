use unicode_segmentation::UnicodeSegmentation;

pub fn count_words(text: &str) -> usize {
    text.unicode_words().count()
}

/// First `n` user-perceived characters.
pub fn head_graphemes(text: &str, n: usize) -> String {
    text.graphemes(true).take(n).collect()
}

/// Last `n` user-perceived characters, or the whole text when it is shorter.
pub fn tail_graphemes(text: &str, n: usize) -> String {
    let total = text.graphemes(true).count();
    text.graphemes(true).skip(total.saturating_sub(n)).collect()
}
