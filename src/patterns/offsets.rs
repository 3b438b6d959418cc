/// Conversion between byte offsets (what the regex engine reports) and character
/// offsets (what `MatchRange` and `Segment` carry).
///
/// ASCII text, the common case for stream names, maps one to one and allocates nothing.
#[derive(Debug, Clone)]
pub(crate) struct CharOffsets {
    /// Byte offset of every character start, followed by the text length.
    /// `None` when the text is pure ASCII.
    boundaries: Option<Vec<usize>>,
    byte_len: usize,
}

impl CharOffsets {
    pub(crate) fn new(text: &str) -> Self {
        let boundaries = if text.is_ascii() {
            None
        } else {
            let mut starts: Vec<usize> = text.char_indices().map(|(i, _)| i).collect();
            starts.push(text.len());
            Some(starts)
        };
        Self {
            boundaries,
            byte_len: text.len(),
        }
    }

    /// Number of characters in the text.
    pub(crate) fn char_len(&self) -> usize {
        match &self.boundaries {
            None => self.byte_len,
            Some(starts) => starts.len() - 1,
        }
    }

    /// Character index of a byte offset. Offsets that fall inside a multi-byte
    /// character resolve to the character containing them.
    pub(crate) fn char_of_byte(&self, byte: usize) -> usize {
        match &self.boundaries {
            None => byte.min(self.byte_len),
            Some(starts) => match starts.binary_search(&byte) {
                Ok(index) => index,
                Err(index) => index.saturating_sub(1),
            },
        }
    }

    /// Byte offset of a character index, clamped to the end of the text.
    pub(crate) fn byte_of_char(&self, ch: usize) -> usize {
        match &self.boundaries {
            None => ch.min(self.byte_len),
            Some(starts) => starts.get(ch).copied().unwrap_or(self.byte_len),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ascii_is_identity() {
        let offsets = CharOffsets::new("Channel HD");
        assert_eq!(offsets.char_len(), 10);
        assert_eq!(offsets.char_of_byte(8), 8);
        assert_eq!(offsets.byte_of_char(8), 8);
        assert_eq!(offsets.byte_of_char(99), 10);
    }

    #[test]
    fn test_multibyte_text() {
        // 'é' is two bytes, '◉' is three
        let text = "Télé ◉ 1";
        let offsets = CharOffsets::new(text);
        assert_eq!(offsets.char_len(), 8);
        assert_eq!(offsets.byte_of_char(2), 3);
        assert_eq!(offsets.char_of_byte(3), 2);
        assert_eq!(offsets.char_of_byte(text.len()), 8);
        assert_eq!(offsets.byte_of_char(8), text.len());
        assert_eq!(&text[offsets.byte_of_char(5)..offsets.byte_of_char(6)], "◉");
    }
}
