use rand::Rng;

use crate::operator::Operator;
use crate::tokenizer::tokenize;

/// Default probability that any given token is mutated during one pass.
const DEFAULT_MUTATION_PROBABILITY: f64 = 0.7;

/// Produces batches of mutated candidates from a single seed input.
///
/// The engine tokenizes the seed, applies randomly chosen operators per
/// token, and rejoins the tokens in order. Every candidate is guaranteed to
/// differ from the seed in at least one character position: if a whole pass
/// leaves every token unchanged, a mutation is forced on the last token.
#[derive(Debug, Clone, Copy)]
pub struct MutationEngine {
    mutation_probability: f64,
}

impl MutationEngine {
    /// Creates an engine with the given per-token mutation probability.
    ///
    /// Values outside `0.0..=1.0` fall back to the default of 0.7.
    pub fn new(mutation_probability: f64) -> Self {
        let mutation_probability = if (0.0..=1.0).contains(&mutation_probability) {
            mutation_probability
        } else {
            DEFAULT_MUTATION_PROBABILITY
        };
        Self {
            mutation_probability,
        }
    }

    pub fn mutation_probability(&self) -> f64 {
        self.mutation_probability
    }

    /// Produces one mutated candidate from `seed`.
    ///
    /// Each token is mutated with the configured probability, or
    /// unconditionally while no token has changed yet. A token only counts
    /// as mutated if the chosen operator actually altered it, so identity
    /// outcomes (the `Identity` operator, or an operator whose target is
    /// absent) cannot satisfy the at-least-one-mutation rule.
    pub fn mutate_once<R: Rng + ?Sized>(&self, seed: &str, rng: &mut R) -> String {
        let mut pieces: Vec<String> = tokenize(seed)
            .iter()
            .map(|token| token.as_str().to_string())
            .collect();
        // The empty seed still gets one (empty) mutable unit.
        if pieces.is_empty() {
            pieces.push(String::new());
        }

        let mut mutated = false;
        for piece in pieces.iter_mut() {
            if rng.random_bool(self.mutation_probability) || !mutated {
                let operator = Operator::choose(rng);
                let replacement = operator.apply(piece, rng);
                if replacement != *piece {
                    *piece = replacement;
                    mutated = true;
                }
            }
        }

        // Forced fallback: AppendGarbage always changes its token.
        if !mutated {
            if let Some(last) = pieces.last_mut() {
                *last = Operator::AppendGarbage.apply(last, rng);
            }
        }

        pieces.concat()
    }

    /// Produces `count` independent candidates from `seed`.
    ///
    /// Duplicates across the batch are permitted; no deduplication happens.
    pub fn generate<R: Rng + ?Sized>(
        &self,
        seed: &str,
        count: usize,
        rng: &mut R,
    ) -> Vec<String> {
        (0..count).map(|_| self.mutate_once(seed, rng)).collect()
    }
}

impl Default for MutationEngine {
    fn default() -> Self {
        Self::new(DEFAULT_MUTATION_PROBABILITY)
    }
}
