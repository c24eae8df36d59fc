/// Maximum number of characters handed to the model per call.
pub const CHUNK_SIZE: usize = 3000;

/// Split `text` into consecutive slices of at most `size` characters.
///
/// Slicing counts Unicode scalar values, so multi-byte characters are
/// never cut. Empty input yields no chunks; a `size` of zero is treated as
/// "no splitting".
#[must_use]
pub fn chunk_text(text: &str, size: usize) -> Vec<&str> {
    if text.is_empty() {
        return Vec::new();
    }
    if size == 0 {
        return vec![text];
    }

    let mut chunks = Vec::with_capacity(text.len() / size + 1);
    let mut start = 0;
    let mut count = 0;
    for (idx, _) in text.char_indices() {
        if count == size {
            chunks.push(&text[start..idx]);
            start = idx;
            count = 0;
        }
        count += 1;
    }
    chunks.push(&text[start..]);
    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_multiple_has_no_trailing_empty_chunk() {
        let text = "ab".repeat(3000);
        let chunks = chunk_text(&text, CHUNK_SIZE);
        assert_eq!(chunks.len(), 2);
        assert!(chunks.iter().all(|c| c.chars().count() == CHUNK_SIZE));
    }

    #[test]
    fn test_multibyte_characters_are_not_split() {
        let text = "é".repeat(5);
        let chunks = chunk_text(&text, 2);
        assert_eq!(chunks, vec!["éé", "éé", "é"]);
    }

    #[test]
    fn test_zero_size_keeps_text_whole() {
        assert_eq!(chunk_text("abc", 0), vec!["abc"]);
    }
}
