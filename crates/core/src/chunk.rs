//! Paragraph-aware text chunking.
//!
//! Splits document text into bounded-size segments on `\n\n` boundaries so a
//! chunk rarely cuts through the middle of a sentence. Oversized paragraphs
//! are hard-split at the nearest newline or space, snapped back to a UTF-8
//! char boundary. Segment order in the returned vector is the chunk order;
//! the caller assigns contiguous zero-based indices from positions.

/// Split `text` into segments of at most `max_chars` characters.
///
/// Returns an empty vector only for effectively empty input; any text with
/// content produces at least one segment.
pub fn chunk_text(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut segments = Vec::new();
    let mut buf = String::new();
    let mut buf_chars = 0usize;

    for para in text.split("\n\n") {
        let para = para.trim();
        if para.is_empty() {
            continue;
        }
        let para_chars = para.chars().count();

        // Would appending this paragraph overflow the current segment?
        let projected =
            if buf.is_empty() { para_chars } else { buf_chars + 2 + para_chars };
        if projected > max_chars && !buf.is_empty() {
            segments.push(std::mem::take(&mut buf));
            buf_chars = 0;
        }

        if para_chars > max_chars {
            if !buf.is_empty() {
                segments.push(std::mem::take(&mut buf));
                buf_chars = 0;
            }
            hard_split(para, max_chars, &mut segments);
        } else {
            if !buf.is_empty() {
                buf.push_str("\n\n");
                buf_chars += 2;
            }
            buf.push_str(para);
            buf_chars += para_chars;
        }
    }

    if !buf.is_empty() {
        segments.push(buf);
    }
    segments
}

/// Split a single oversized paragraph, preferring newline/space boundaries.
/// The window is measured in characters, so multibyte text fills it the same
/// way ASCII does.
fn hard_split(para: &str, max_chars: usize, out: &mut Vec<String>) {
    let mut rest = para;
    while !rest.is_empty() {
        let window = byte_index_of_char(rest, max_chars);
        if window == rest.len() {
            out.push(rest.to_owned());
            return;
        }
        let cut = rest[..window]
            .rfind('\n')
            .or_else(|| rest[..window].rfind(' '))
            .map(|pos| pos + 1)
            .unwrap_or(window);
        let piece = rest[..cut].trim();
        if !piece.is_empty() {
            out.push(piece.to_owned());
        }
        rest = rest[cut..].trim_start();
    }
}

/// Byte offset of the `n`-th character, or the string length when the string
/// holds fewer than `n` characters. Always a char boundary.
fn byte_index_of_char(s: &str, n: usize) -> usize {
    s.char_indices().nth(n).map_or(s.len(), |(index, _)| index)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_is_one_chunk() {
        let chunks = chunk_text("Hello, world.", 2000);
        assert_eq!(chunks, vec!["Hello, world.".to_owned()]);
    }

    #[test]
    fn empty_and_whitespace_text_yield_no_chunks() {
        assert!(chunk_text("", 2000).is_empty());
        assert!(chunk_text("\n\n   \n\n", 2000).is_empty());
    }

    #[test]
    fn paragraphs_accumulate_until_limit() {
        let text = "aaaa\n\nbbbb\n\ncccc";
        let chunks = chunk_text(text, 11);
        // "aaaa\n\nbbbb" fits in 10; "cccc" starts a new chunk.
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0], "aaaa\n\nbbbb");
        assert_eq!(chunks[1], "cccc");
    }

    #[test]
    fn oversized_paragraph_splits_at_space() {
        let text = "word ".repeat(100);
        let chunks = chunk_text(&text, 40);
        assert!(chunks.len() > 1);
        for chunk in &chunks {
            assert!(chunk.len() <= 40, "chunk too long: {}", chunk.len());
            assert!(!chunk.is_empty());
        }
    }

    #[test]
    fn all_input_text_is_preserved() {
        let text = "First paragraph here.\n\nSecond paragraph here.\n\nThird.";
        let chunks = chunk_text(text, 25);
        let joined = chunks.join(" ");
        for word in ["First", "Second", "Third."] {
            assert!(joined.contains(word), "missing {word}");
        }
    }

    #[test]
    fn multibyte_text_splits_on_char_boundaries() {
        let text = "привет мир ".repeat(50);
        let chunks = chunk_text(&text, 64);
        assert!(!chunks.is_empty());
        assert!(chunks.iter().all(|c| !c.is_empty()));
        assert!(chunks.iter().all(|c| c.chars().count() <= 64));
    }

    #[test]
    fn window_counts_characters_not_bytes() {
        // 100 two-byte characters, no split points: windows of 40 chars each.
        let text = "п".repeat(100);
        let chunks = chunk_text(&text, 40);
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].chars().count(), 40);
        assert_eq!(chunks[1].chars().count(), 40);
        assert_eq!(chunks[2].chars().count(), 20);
    }

    #[test]
    fn chunking_is_deterministic() {
        let text = "Alpha\n\nBeta\n\nGamma\n\nDelta";
        assert_eq!(chunk_text(text, 12), chunk_text(text, 12));
    }
}
