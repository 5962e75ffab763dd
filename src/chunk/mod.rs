//! Length-based recursive text splitting
//!
//! Splits page markdown into overlapping fixed-size chunks, preferring
//! natural boundaries (paragraph, line, sentence, word) over mid-word cuts.

/// Target chunk size in characters
pub const CHUNK_SIZE: usize = 1000;

/// Characters of overlap carried into the next chunk
pub const CHUNK_OVERLAP: usize = 200;

/// Splits text into overlapping chunks of at most `chunk_size` characters
///
/// Each cut is placed at the best available boundary inside the back half of
/// the window: paragraph break, then line break, then sentence end, then any
/// whitespace, falling back to a hard cut only when the window contains no
/// boundary at all. The next window starts `overlap` characters before the
/// previous cut.
///
/// `overlap` must be smaller than half of `chunk_size` so every window makes
/// forward progress.
pub fn split_text(text: &str, chunk_size: usize, overlap: usize) -> Vec<String> {
    assert!(chunk_size > 0, "chunk_size must be positive");
    assert!(
        overlap < chunk_size / 2,
        "overlap must be smaller than half the chunk size"
    );

    if text.trim().is_empty() {
        return Vec::new();
    }

    let chars: Vec<char> = text.chars().collect();
    if chars.len() <= chunk_size {
        return vec![text.to_string()];
    }

    let mut chunks = Vec::new();
    let mut start = 0;

    loop {
        let end = usize::min(start + chunk_size, chars.len());

        if end == chars.len() {
            chunks.push(chars[start..end].iter().collect());
            break;
        }

        let cut = boundary_cut(&chars, start, end);
        chunks.push(chars[start..cut].iter().collect());
        start = cut - overlap;
    }

    chunks
}

/// Finds the cut position for a window, searching backwards from `end`
///
/// Only the back half of the window is considered, which keeps every chunk
/// at least half the target size. The returned index is exclusive and sits
/// just after the boundary, so the next window starts on fresh content.
fn boundary_cut(chars: &[char], start: usize, end: usize) -> usize {
    let floor = start + (end - start) / 2;

    // Paragraph break
    for i in (floor..end).rev() {
        if chars[i] == '\n' && i > start && chars[i - 1] == '\n' {
            return i + 1;
        }
    }

    // Line break
    for i in (floor..end).rev() {
        if chars[i] == '\n' {
            return i + 1;
        }
    }

    // Sentence end
    for i in (floor..end).rev() {
        if chars[i] == ' ' && i > start && matches!(chars[i - 1], '.' | '!' | '?') {
            return i + 1;
        }
    }

    // Word boundary
    for i in (floor..end).rev() {
        if chars[i].is_whitespace() {
            return i + 1;
        }
    }

    end
}
