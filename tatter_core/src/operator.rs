use rand::Rng;

/// The fixed character targeted by the substitution operators.
const SUBSTITUTION_TARGET: char = 'a';
/// Length of the run appended by [`Operator::AppendGarbage`].
const GARBAGE_RUN_LEN: usize = 10;

/// The closed set of token-level mutation operators.
///
/// Every operator is a total, pure `(token, rng) -> String` transformation:
/// it never fails, and on inputs too short for its effect it degrades to a
/// no-op instead of signaling an error. Operators only share the RNG stream
/// passed into [`Operator::apply`]; they hold no state of their own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    /// Replace every `a` with a single random character from `b..=z`.
    CharSubstitute,
    /// Replace the entire token with 1..=65 random characters from `a..=z`.
    FullReplace,
    /// Reverse the character order. Identity on length <= 1.
    Reverse,
    /// Replace the token with the empty string.
    DeleteAll,
    /// Wrap the literal substring `value` in double quotes.
    QuoteWrap,
    /// Replace the opening-tag prefix `<html` with `<` plus a random tag name
    /// of 1..=17 characters from `a..=z`.
    TagRename,
    /// Insert one random printable character at a random offset (0..=len).
    InsertRandom,
    /// Insert a copy of a character from a random existing position at a
    /// random offset. No-op on the empty token.
    InsertFromSelf,
    /// Duplicate the character at a random offset. No-op on the empty token.
    DuplicateChar,
    /// Delete the character at a random offset. No-op on the empty token.
    DeleteChar,
    /// Swap two randomly chosen positions (which may coincide). No-op on
    /// length <= 1.
    SwapChars,
    /// Replace the closing-tag literal `</html>` with `>>`.
    CloseTagCorrupt,
    /// Replace every `a` with 1..=9 random characters from `a..=z`.
    CharSubstituteAlt,
    /// Append exactly ten random printable characters.
    AppendGarbage,
    /// Return the token unchanged.
    Identity,
}

impl Operator {
    /// All operators, in table order. Selection is a uniform random index
    /// into this table.
    pub const ALL: [Operator; 15] = [
        Operator::CharSubstitute,
        Operator::FullReplace,
        Operator::Reverse,
        Operator::DeleteAll,
        Operator::QuoteWrap,
        Operator::TagRename,
        Operator::InsertRandom,
        Operator::InsertFromSelf,
        Operator::DuplicateChar,
        Operator::DeleteChar,
        Operator::SwapChars,
        Operator::CloseTagCorrupt,
        Operator::CharSubstituteAlt,
        Operator::AppendGarbage,
        Operator::Identity,
    ];

    /// Draws one operator uniformly at random from [`Operator::ALL`].
    pub fn choose<R: Rng + ?Sized>(rng: &mut R) -> Operator {
        Operator::ALL[rng.random_range(0..Operator::ALL.len())]
    }

    /// Applies this operator to `token`, consuming randomness from `rng`.
    ///
    /// Positional operators index by character, so arbitrary UTF-8 input is
    /// handled without panicking.
    pub fn apply<R: Rng + ?Sized>(self, token: &str, rng: &mut R) -> String {
        match self {
            Operator::CharSubstitute => {
                let run = random_run(rng, 1, b'b', 25);
                token.replace(SUBSTITUTION_TARGET, &run)
            }
            Operator::FullReplace => random_run(rng, 65, b'a', 26),
            Operator::Reverse => token.chars().rev().collect(),
            Operator::DeleteAll => String::new(),
            Operator::QuoteWrap => token.replace("value", "\"value\""),
            Operator::TagRename => {
                let tag_name = random_run(rng, 17, b'a', 26);
                token.replace("<html", &format!("<{tag_name}"))
            }
            Operator::InsertRandom => {
                let mut chars: Vec<char> = token.chars().collect();
                let position = rng.random_range(0..=chars.len());
                chars.insert(position, random_printable(rng));
                chars.into_iter().collect()
            }
            Operator::InsertFromSelf => {
                let mut chars: Vec<char> = token.chars().collect();
                if chars.is_empty() {
                    return token.to_string();
                }
                let position = rng.random_range(0..=chars.len());
                let copied = chars[rng.random_range(0..chars.len())];
                chars.insert(position, copied);
                chars.into_iter().collect()
            }
            Operator::DuplicateChar => {
                let mut chars: Vec<char> = token.chars().collect();
                if chars.is_empty() {
                    return token.to_string();
                }
                let position = rng.random_range(0..chars.len());
                chars.insert(position, chars[position]);
                chars.into_iter().collect()
            }
            Operator::DeleteChar => {
                let mut chars: Vec<char> = token.chars().collect();
                if chars.is_empty() {
                    return token.to_string();
                }
                let position = rng.random_range(0..chars.len());
                chars.remove(position);
                chars.into_iter().collect()
            }
            Operator::SwapChars => {
                let mut chars: Vec<char> = token.chars().collect();
                if chars.len() <= 1 {
                    return token.to_string();
                }
                let first = rng.random_range(0..chars.len());
                let second = rng.random_range(0..chars.len());
                chars.swap(first, second);
                chars.into_iter().collect()
            }
            Operator::CloseTagCorrupt => token.replace("</html>", ">>"),
            Operator::CharSubstituteAlt => {
                let run = random_run(rng, 9, b'a', 26);
                token.replace(SUBSTITUTION_TARGET, &run)
            }
            Operator::AppendGarbage => {
                let mut result = token.to_string();
                for _ in 0..GARBAGE_RUN_LEN {
                    // Printable ASCII including space.
                    result.push(rng.random_range(32u8..127) as char);
                }
                result
            }
            Operator::Identity => token.to_string(),
        }
    }
}

/// Produces a run of random characters: length 1..=`max_len`, each drawn
/// uniformly from the `span`-character alphabet starting at `first`.
fn random_run<R: Rng + ?Sized>(rng: &mut R, max_len: usize, first: u8, span: u8) -> String {
    let length = rng.random_range(1..=max_len);
    (0..length)
        .map(|_| (first + rng.random_range(0..span)) as char)
        .collect()
}

/// One random printable ASCII character, space excluded.
fn random_printable<R: Rng + ?Sized>(rng: &mut R) -> char {
    rng.random_range(33u8..127) as char
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand_chacha::ChaCha8Rng;
    use rand_core::SeedableRng;

    fn test_rng() -> ChaCha8Rng {
        ChaCha8Rng::from_seed([7u8; 32])
    }

    #[test]
    fn every_operator_is_total_on_degenerate_input() {
        let mut rng = test_rng();
        for op in Operator::ALL {
            for input in ["", "x", "é", "日本語"] {
                // Must return without panicking on every input.
                let _ = op.apply(input, &mut rng);
            }
        }
    }

    #[test]
    fn quote_wrap_deforms_value_into_double_quoted_literal() {
        let mut rng = test_rng();
        let result = Operator::QuoteWrap.apply("<html a=\"value\">", &mut rng);
        assert_eq!(result, "<html a=\"\"value\"\">");
    }

    #[test]
    fn quote_wrap_is_identity_when_substring_absent() {
        let mut rng = test_rng();
        assert_eq!(Operator::QuoteWrap.apply("<html>", &mut rng), "<html>");
    }

    #[test]
    fn close_tag_corrupt_rewrites_closing_tag() {
        let mut rng = test_rng();
        assert_eq!(Operator::CloseTagCorrupt.apply("</html>", &mut rng), ">>");
        assert_eq!(Operator::CloseTagCorrupt.apply("...", &mut rng), "...");
    }

    #[test]
    fn char_substitute_replaces_every_target_with_one_letter() {
        let mut rng = test_rng();
        let result = Operator::CharSubstitute.apply("banana", &mut rng);
        assert_eq!(result.len(), 6);
        assert!(!result.contains('a'));
        // All occurrences get the same single replacement character.
        let replacement = result.chars().nth(1).unwrap();
        assert!(('b'..='z').contains(&replacement));
        assert_eq!(result, format!("b{replacement}n{replacement}n{replacement}"));
    }

    #[test]
    fn char_substitute_is_identity_when_target_absent() {
        let mut rng = test_rng();
        assert_eq!(Operator::CharSubstitute.apply("xyz", &mut rng), "xyz");
        assert_eq!(Operator::CharSubstituteAlt.apply("xyz", &mut rng), "xyz");
    }

    #[test]
    fn char_substitute_alt_expands_target_into_lowercase_run() {
        let mut rng = test_rng();
        let result = Operator::CharSubstituteAlt.apply("a", &mut rng);
        assert!((1..=9).contains(&result.len()));
        assert!(result.chars().all(|c| c.is_ascii_lowercase()));
    }

    #[test]
    fn full_replace_produces_bounded_lowercase_run() {
        let mut rng = test_rng();
        for _ in 0..50 {
            let result = Operator::FullReplace.apply("anything at all", &mut rng);
            assert!((1..=65).contains(&result.chars().count()));
            assert!(result.chars().all(|c| c.is_ascii_lowercase()));
        }
    }

    #[test]
    fn reverse_is_identity_on_short_tokens() {
        let mut rng = test_rng();
        assert_eq!(Operator::Reverse.apply("", &mut rng), "");
        assert_eq!(Operator::Reverse.apply("a", &mut rng), "a");
        assert_eq!(Operator::Reverse.apply("ab", &mut rng), "ba");
    }

    #[test]
    fn delete_all_empties_the_token() {
        let mut rng = test_rng();
        assert_eq!(Operator::DeleteAll.apply("<html>", &mut rng), "");
        assert_eq!(Operator::DeleteAll.apply("", &mut rng), "");
    }

    #[test]
    fn tag_rename_keeps_bracket_and_suffix() {
        let mut rng = test_rng();
        let result = Operator::TagRename.apply("<html a=\"value\">", &mut rng);
        assert!(result.starts_with('<'));
        assert!(result.ends_with(" a=\"value\">"));
        let tag: String = result[1..result.len() - " a=\"value\">".len()].to_string();
        assert!((1..=17).contains(&tag.len()));
        assert!(tag.chars().all(|c| c.is_ascii_lowercase()));
    }

    #[test]
    fn insert_random_works_on_empty_token() {
        let mut rng = test_rng();
        let result = Operator::InsertRandom.apply("", &mut rng);
        assert_eq!(result.chars().count(), 1);
        let inserted = result.chars().next().unwrap();
        assert!(('!'..='~').contains(&inserted));
    }

    #[test]
    fn insert_from_self_only_reuses_existing_characters() {
        let mut rng = test_rng();
        assert_eq!(Operator::InsertFromSelf.apply("", &mut rng), "");
        for _ in 0..20 {
            let result = Operator::InsertFromSelf.apply("ab", &mut rng);
            assert_eq!(result.chars().count(), 3);
            assert!(result.chars().all(|c| c == 'a' || c == 'b'));
        }
    }

    #[test]
    fn duplicate_char_grows_token_by_one() {
        let mut rng = test_rng();
        assert_eq!(Operator::DuplicateChar.apply("", &mut rng), "");
        let result = Operator::DuplicateChar.apply("ab", &mut rng);
        assert!(result == "aab" || result == "abb", "got {result:?}");
    }

    #[test]
    fn delete_char_shrinks_token_by_one() {
        let mut rng = test_rng();
        assert_eq!(Operator::DeleteChar.apply("", &mut rng), "");
        let result = Operator::DeleteChar.apply("ab", &mut rng);
        assert!(result == "a" || result == "b", "got {result:?}");
    }

    #[test]
    fn swap_chars_preserves_the_character_multiset() {
        let mut rng = test_rng();
        assert_eq!(Operator::SwapChars.apply("a", &mut rng), "a");
        for _ in 0..20 {
            let result = Operator::SwapChars.apply("abc", &mut rng);
            let mut sorted: Vec<char> = result.chars().collect();
            sorted.sort_unstable();
            assert_eq!(sorted, vec!['a', 'b', 'c']);
        }
    }

    #[test]
    fn append_garbage_adds_fixed_length_printable_suffix() {
        let mut rng = test_rng();
        let result = Operator::AppendGarbage.apply("seed", &mut rng);
        assert!(result.starts_with("seed"));
        let suffix = &result["seed".len()..];
        assert_eq!(suffix.chars().count(), 10);
        assert!(suffix.chars().all(|c| (' '..='~').contains(&c)));
    }

    #[test]
    fn identity_never_changes_the_token() {
        let mut rng = test_rng();
        for input in ["", "x", "<html a=\"value\">"] {
            assert_eq!(Operator::Identity.apply(input, &mut rng), input);
        }
    }
}
