use crate::config::DEFAULT_SENTENCES_PER_GROUP;
use crate::types::CHUNK_SEPARATOR;

/// Regroups raw page text into pseudo-paragraphs separated by [`CHUNK_SEPARATOR`].
#[derive(Debug, Clone, Copy)]
pub struct TextPreprocessor {
    sentences_per_group: usize,
}

impl TextPreprocessor {
    pub fn new(sentences_per_group: usize) -> Self {
        Self {
            sentences_per_group: sentences_per_group.max(1),
        }
    }

    /// Strips newlines, splits on '.', and joins every group of fragments
    /// followed by the separator. The periods themselves are consumed by the split.
    pub fn preprocess(&self, text: &str) -> String {
        let flattened = text.replace('\n', "");
        let fragments: Vec<&str> = flattened.split('.').collect();

        Self::combine_fragments(&fragments, self.sentences_per_group)
            .into_iter()
            .map(|group| group + CHUNK_SEPARATOR)
            .collect()
    }

    /// Concatenates consecutive fragments in batches; a trailing partial
    /// batch is kept.
    pub fn combine_fragments(fragments: &[&str], group_size: usize) -> Vec<String> {
        fragments
            .chunks(group_size.max(1))
            .map(|batch| batch.concat())
            .collect()
    }
}

impl Default for TextPreprocessor {
    fn default() -> Self {
        Self::new(DEFAULT_SENTENCES_PER_GROUP)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_groups_sentences_in_threes() {
        let pre = TextPreprocessor::default();
        let out = pre.preprocess("A. B. C. D. E");

        assert_eq!(out, "A B C\n\n\n D E\n\n\n");
    }

    #[test]
    fn test_newlines_are_removed_before_splitting() {
        let pre = TextPreprocessor::default();
        assert_eq!(pre.preprocess("one\ntwo.three\n"), "onetwothree\n\n\n");
    }

    #[test]
    fn test_empty_and_single_char_input() {
        let pre = TextPreprocessor::default();
        assert_eq!(pre.preprocess(""), "\n\n\n");
        assert_eq!(pre.preprocess("x"), "x\n\n\n");
        assert_eq!(pre.preprocess("."), "\n\n\n");
    }

    #[test]
    fn test_trailing_partial_batch_emitted() {
        let groups = TextPreprocessor::combine_fragments(&["a", "b", "c", "d"], 3);
        assert_eq!(groups, vec!["abc".to_string(), "d".to_string()]);
    }

    #[test]
    fn test_newline_stripping_is_a_projection() {
        let pre = TextPreprocessor::default();
        let raw = "First line.\nSecond line.\n\nThird.\nFourth. Fifth";
        let flattened = raw.replace('\n', "");

        assert_eq!(pre.preprocess(raw), pre.preprocess(&flattened));
    }

    #[test]
    fn test_custom_group_size() {
        let pre = TextPreprocessor::new(1);
        assert_eq!(pre.preprocess("a.b"), "a\n\n\nb\n\n\n");
    }
}
