use rand::Rng;
use rand::rngs::SmallRng;

/// How many whole draws (or pool picks) are attempted before giving up on
/// producing something different from `previous`. Bounds generation cost for
/// degenerate configurations such as a single-word list.
pub const DRAW_RETRIES: usize = 8;

/// Sample `count` words uniformly with replacement, joined by single spaces
/// with a trailing period. Retries the whole draw against `previous`, then
/// falls back to the mode's fixed sentence.
pub fn sample_words(
    rng: &mut SmallRng,
    words: &[String],
    count: usize,
    previous: &str,
    fallback: &str,
) -> String {
    if words.is_empty() {
        return fallback.to_string();
    }
    for _ in 0..DRAW_RETRIES {
        let mut drawn = Vec::with_capacity(count);
        for _ in 0..count {
            drawn.push(words[rng.gen_range(0..words.len())].as_str());
        }
        let mut prompt = drawn.join(" ");
        prompt.push('.');
        if prompt != previous {
            return prompt;
        }
    }
    fallback.to_string()
}

/// Pick an element of `options` different from `previous` when one exists:
/// random picks first, then a linear scan, then `options[0]` when the whole
/// pool equals `previous`. A single-element pool is returned as-is since
/// repeats are unavoidable there.
pub fn pick_different(
    rng: &mut SmallRng,
    options: &[String],
    previous: &str,
    empty_fallback: &str,
) -> String {
    if options.is_empty() {
        return empty_fallback.to_string();
    }
    if options.len() == 1 {
        return options[0].clone();
    }
    for _ in 0..DRAW_RETRIES {
        let candidate = &options[rng.gen_range(0..options.len())];
        if candidate != previous {
            return candidate.clone();
        }
    }
    for candidate in options {
        if candidate != previous {
            return candidate.clone();
        }
    }
    options[0].clone()
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;

    use super::*;

    fn rng() -> SmallRng {
        SmallRng::seed_from_u64(7)
    }

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn sample_words_joins_with_trailing_period() {
        let words = strings(&["alpha"]);
        let got = sample_words(&mut rng(), &words, 3, "", "fallback.");
        assert_eq!(got, "alpha alpha alpha.");
    }

    #[test]
    fn sample_words_avoids_previous_with_two_words() {
        let words = strings(&["alpha", "beta"]);
        let mut r = rng();
        let first = sample_words(&mut r, &words, 4, "", "fallback.");
        let second = sample_words(&mut r, &words, 4, &first, "fallback.");
        assert_ne!(second, first);
    }

    #[test]
    fn sample_words_single_word_list_returns_fallback_instead_of_looping() {
        let words = strings(&["alpha"]);
        let previous = "alpha alpha alpha.";
        let got = sample_words(&mut rng(), &words, 3, previous, "fallback.");
        assert_eq!(got, "fallback.");
    }

    #[test]
    fn pick_different_empty_pool_uses_literal_fallback() {
        let got = pick_different(&mut rng(), &[], "prev", "literal");
        assert_eq!(got, "literal");
    }

    #[test]
    fn pick_different_single_element_repeats() {
        let pool = strings(&["only"]);
        assert_eq!(pick_different(&mut rng(), &pool, "only", "literal"), "only");
    }

    #[test]
    fn pick_different_avoids_previous() {
        let pool = strings(&["a", "b", "c"]);
        let mut r = rng();
        for _ in 0..32 {
            let got = pick_different(&mut r, &pool, "b", "literal");
            assert_ne!(got, "b");
        }
    }

    #[test]
    fn pick_different_all_identical_returns_first() {
        let pool = strings(&["same", "same", "same"]);
        assert_eq!(pick_different(&mut rng(), &pool, "same", "literal"), "same");
    }
}
