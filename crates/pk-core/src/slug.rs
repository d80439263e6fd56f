//! # Slug Generation
//!
//! Deterministic transliteration of mixed Bengali/Latin article titles into
//! canonical URL slugs. The mapping table is finite and explicit; this is
//! not a general Unicode transliteration library.

use once_cell::sync::Lazy;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use uuid::Uuid;

/// Bengali codepoint → ASCII fragment. Iterated per codepoint, so vowel
/// signs (matras) and combining marks are mapped individually; the hasant
/// kills the inherent vowel by emitting nothing.
static TRANSLITERATION_TABLE: Lazy<HashMap<char, &'static str>> = Lazy::new(|| {
    HashMap::from([
        // Independent vowels
        ('অ', "a"), ('আ', "a"), ('ই', "i"), ('ঈ', "i"), ('উ', "u"), ('ঊ', "u"),
        ('ঋ', "ri"), ('এ', "e"), ('ঐ', "oi"), ('ও', "o"), ('ঔ', "ou"),
        // Consonants
        ('ক', "k"), ('খ', "kh"), ('গ', "g"), ('ঘ', "gh"), ('ঙ', "ng"),
        ('চ', "ch"), ('ছ', "chh"), ('জ', "j"), ('ঝ', "jh"), ('ঞ', "n"),
        ('ট', "t"), ('ঠ', "th"), ('ড', "d"), ('ঢ', "dh"), ('ণ', "n"),
        ('ত', "t"), ('থ', "th"), ('দ', "d"), ('ধ', "dh"), ('ন', "n"),
        ('প', "p"), ('ফ', "ph"), ('ব', "b"), ('ভ', "bh"), ('ম', "m"),
        ('য', "y"), ('র', "r"), ('ল', "l"),
        ('শ', "sh"), ('ষ', "sh"), ('স', "s"), ('হ', "h"),
        // Precomposed rra, rha, yya
        ('\u{09DC}', "r"), ('\u{09DD}', "rh"), ('\u{09DF}', "y"), ('ৎ', "t"),
        // Vowel signs (matras)
        ('া', "a"), ('ি', "i"), ('ী', "i"), ('ু', "u"), ('ূ', "u"),
        ('ৃ', "ri"), ('ে', "e"), ('ৈ', "oi"), ('ো', "o"), ('ৌ', "ou"),
        // Hasant, anusvara, visarga, chandrabindu, nukta
        ('্', ""), ('ং', "ng"), ('ঃ', ""), ('ঁ', ""), ('\u{09BC}', ""),
        // Bengali digits
        ('০', "0"), ('১', "1"), ('২', "2"), ('৩', "3"), ('৪', "4"),
        ('৫', "5"), ('৬', "6"), ('৭', "7"), ('৮', "8"), ('৯', "9"),
        // Danda punctuation and whitespace
        ('।', "-"), ('॥', "-"),
        (' ', "-"), ('\t', "-"), ('\n', "-"),
    ])
});

/// Converts a title into its canonical slug.
///
/// Pure and total: the same title always yields the same slug, and the
/// output matches `^[a-z0-9]+(-[a-z0-9]+)*$` or is empty. Applying it to an
/// already-canonical slug returns that slug unchanged, which makes
/// re-slugification of legacy titles safe.
pub fn generate_slug(title: &str) -> String {
    let mut raw = String::with_capacity(title.len());
    for ch in title.chars() {
        match TRANSLITERATION_TABLE.get(&ch) {
            Some(fragment) => raw.push_str(fragment),
            None if ch.is_ascii_alphanumeric() => raw.push(ch.to_ascii_lowercase()),
            None => raw.push('-'),
        }
    }

    let mut slug = String::with_capacity(raw.len());
    for ch in raw.chars() {
        if ch == '-' && slug.ends_with('-') {
            continue;
        }
        slug.push(ch);
    }
    slug.trim_matches('-').to_string()
}

/// Fallback token for titles that slug to empty (e.g., punctuation-only):
/// `a-` plus the first 8 hex chars of SHA-256 over the article id.
/// Deterministic per article and valid under the slug grammar.
pub fn fallback_slug(article_id: Uuid) -> String {
    let mut hasher = Sha256::new();
    hasher.update(article_id.as_bytes());
    let digest = hex::encode(hasher.finalize());
    format!("a-{}", &digest[..8])
}

/// The creation-time entry point: `generate_slug` with the empty-slug
/// fallback applied. Callers must never persist an empty slug.
pub fn slug_for_title(title: &str, article_id: Uuid) -> String {
    let slug = generate_slug(title);
    if slug.is_empty() {
        fallback_slug(article_id)
    } else {
        slug
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_canonical(slug: &str) -> bool {
        slug.split('-').all(|part| {
            !part.is_empty()
                && part
                    .chars()
                    .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        })
    }

    #[test]
    fn latin_title() {
        assert_eq!(
            generate_slug("Quantum Computing Basics"),
            "quantum-computing-basics"
        );
    }

    #[test]
    fn bengali_title_with_hasant_and_matras() {
        // হ + hasant + য + া + ল + ো
        assert_eq!(generate_slug("হ্যালো!"), "hyalo");
        // র + ু + স + hasant + ট
        assert_eq!(generate_slug("রুস্ট"), "rust");
    }

    #[test]
    fn precomposed_rra_rha_yya_map() {
        // ব + ড় + ঢ় + য়
        assert_eq!(generate_slug("\u{09AC}\u{09DC}\u{09DD}\u{09DF}"), "brrhy");
    }

    #[test]
    fn decomposed_nukta_spelling_matches_precomposed() {
        // "বয়স" with precomposed yya vs. য + combining nukta
        let precomposed = "\u{09AC}\u{09DF}\u{09B8}";
        let decomposed = "\u{09AC}\u{09AF}\u{09BC}\u{09B8}";
        assert_eq!(generate_slug(precomposed), "bys");
        assert_eq!(generate_slug(decomposed), generate_slug(precomposed));
    }

    #[test]
    fn mixed_script_with_bengali_digits() {
        assert_eq!(generate_slug("বাংলা blog ১০১"), "bangla-blog-101");
    }

    #[test]
    fn hyphen_runs_collapse_and_edges_trim() {
        assert_eq!(generate_slug("  -- Hello,,, World!! --  "), "hello-world");
        assert_eq!(generate_slug("a...b"), "a-b");
    }

    #[test]
    fn deterministic() {
        for title in ["Quantum Computing Basics", "হ্যালো!", "বাংলা blog ১০১", ""] {
            assert_eq!(generate_slug(title), generate_slug(title));
        }
    }

    #[test]
    fn idempotent_on_own_output() {
        for title in [
            "Quantum Computing Basics",
            "হ্যালো!",
            "বাংলা blog ১০১",
            "  -- odd --  title ।।",
            "???",
        ] {
            let once = generate_slug(title);
            assert_eq!(generate_slug(&once), once);
        }
    }

    #[test]
    fn output_is_canonical_or_empty() {
        for title in ["Quantum Computing Basics", "হ্যালো!", "বাংলা blog ১০১", "a"] {
            let slug = generate_slug(title);
            assert!(slug.is_empty() || is_canonical(&slug), "bad slug: {slug:?}");
        }
    }

    #[test]
    fn punctuation_only_title_slugs_to_empty() {
        assert_eq!(generate_slug("???"), "");
        assert_eq!(generate_slug(""), "");
        assert_eq!(generate_slug("।।।"), "");
    }

    #[test]
    fn fallback_applies_only_to_empty_slugs() {
        let id = Uuid::now_v7();
        let slug = slug_for_title("???", id);
        assert!(!slug.is_empty());
        assert!(is_canonical(&slug));
        assert_eq!(slug, slug_for_title("???", id));
        assert_eq!(slug_for_title("Real Title", id), "real-title");
    }
}
