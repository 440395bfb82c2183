/// A contiguous span of the original input, produced by [`tokenize`].
///
/// Tokens never overlap, cover the input with no gaps, and keep their
/// byte offsets into the original string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    /// The token text, borrowed from the original input.
    pub text: &'a str,
    /// Byte offset of the first byte of this token in the original input.
    pub start: usize,
    /// Byte offset one past the last byte of this token.
    pub end: usize,
}

impl<'a> Token<'a> {
    pub fn as_str(&self) -> &'a str {
        self.text
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Splits `input` into tokens at every position immediately before a `<`
/// and immediately after a `>`.
///
/// The boundaries are zero-width: the delimiters stay attached to the token
/// on their owning side. Concatenating the returned tokens reproduces
/// `input` exactly. The empty input yields an empty sequence; all other
/// tokens are non-empty.
pub fn tokenize(input: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut start = 0;
    let mut prev_char: Option<char> = None;

    for (index, ch) in input.char_indices() {
        let boundary = ch == '<' || prev_char == Some('>');
        if boundary && index > start {
            tokens.push(Token {
                text: &input[start..index],
                start,
                end: index,
            });
            start = index;
        }
        prev_char = Some(ch);
    }

    if start < input.len() {
        tokens.push(Token {
            text: &input[start..],
            start,
            end: input.len(),
        });
    }

    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rejoin(tokens: &[Token<'_>]) -> String {
        tokens.iter().map(|t| t.text).collect()
    }

    #[test]
    fn html_seed_splits_into_expected_tokens() {
        let tokens = tokenize("<html a=\"value\">...</html>");
        let texts: Vec<&str> = tokens.iter().map(|t| t.text).collect();
        assert_eq!(texts, vec!["<html a=\"value\">", "...", "</html>"]);
        assert_eq!(tokens[0].start, 0);
        assert_eq!(tokens[0].end, 16);
        assert_eq!(tokens[1].start, 16);
        assert_eq!(tokens[2].end, 26);
    }

    #[test]
    fn round_trip_reproduces_input_exactly() {
        let samples = [
            "",
            "plain text without markup",
            "<html a=\"value\">...</html>",
            "<a><b><c>",
            "><",
            ">>>",
            "<<<",
            "trailing<",
            ">leading",
            "<unclosed",
            "a>b<c>d",
        ];
        for sample in samples {
            let tokens = tokenize(sample);
            assert_eq!(rejoin(&tokens), sample, "round trip failed for {sample:?}");
        }
    }

    #[test]
    fn tokens_cover_input_without_gaps_or_overlaps() {
        let input = "x<y>z<w>";
        let tokens = tokenize(input);
        let mut expected_start = 0;
        for token in &tokens {
            assert_eq!(token.start, expected_start);
            assert!(token.end > token.start, "empty token produced");
            assert_eq!(&input[token.start..token.end], token.text);
            expected_start = token.end;
        }
        assert_eq!(expected_start, input.len());
    }

    #[test]
    fn empty_input_yields_no_tokens() {
        assert!(tokenize("").is_empty());
    }

    #[test]
    fn input_without_delimiters_is_a_single_token() {
        let tokens = tokenize("no markup here");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].text, "no markup here");
    }

    #[test]
    fn multibyte_input_round_trips() {
        let input = "héllo<täg>wörld";
        let tokens = tokenize(input);
        assert_eq!(rejoin(&tokens), input);
        assert_eq!(tokens.len(), 3);
    }
}
