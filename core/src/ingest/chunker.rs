/// Fixed sliding-window splitter: no semantic boundary awareness, windows of
/// `size` characters advancing by `size - overlap`. Char-boundary safe.
pub(crate) fn split_text(text: &str, size: usize, overlap: usize) -> Vec<String> {
    debug_assert!(overlap < size);
    let chars: Vec<char> = text.chars().collect();
    if chars.is_empty() {
        return Vec::new();
    }

    let step = size - overlap;
    let mut windows = Vec::new();
    let mut start = 0;
    loop {
        let end = (start + size).min(chars.len());
        let window: String = chars[start..end].iter().collect();
        if !window.trim().is_empty() {
            windows.push(window);
        }
        if end == chars.len() {
            break;
        }
        start += step;
    }
    windows
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_is_a_single_chunk() {
        let chunks = split_text("Hemoglobin 11.2 g/dL", 500, 50);
        assert_eq!(chunks, vec!["Hemoglobin 11.2 g/dL".to_string()]);
    }

    #[test]
    fn windows_overlap_by_the_configured_amount() {
        let text: String = ('a'..='z').cycle().take(120).collect();
        let chunks = split_text(&text, 100, 20);
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].len(), 100);
        // Second window starts 80 chars in and reuses the last 20 chars.
        assert_eq!(&chunks[0][80..], &chunks[1][..20]);
        assert_eq!(chunks[1].len(), 40);
    }

    #[test]
    fn exact_window_size_produces_one_chunk() {
        let text = "x".repeat(500);
        assert_eq!(split_text(&text, 500, 50).len(), 1);
    }

    #[test]
    fn whitespace_only_text_produces_nothing() {
        assert!(split_text("   \n\t  ", 500, 50).is_empty());
        assert!(split_text("", 500, 50).is_empty());
    }

    #[test]
    fn multibyte_text_splits_on_char_boundaries() {
        let text = "µ".repeat(600);
        let chunks = split_text(&text, 500, 50);
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].chars().count(), 500);
        assert_eq!(chunks[1].chars().count(), 150);
    }
}
