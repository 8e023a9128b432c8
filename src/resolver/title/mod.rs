mod patterns;
mod season;

pub use season::{detect_season, extract_base_title};

use patterns::PATTERNS;

/// Lowercase, strip punctuation, collapse whitespace and drop a trailing
/// `season N` / `part N` / `cour N` suffix.
#[must_use]
pub fn normalize_title(title: &str) -> String {
    let lowered = title.to_lowercase();
    let stripped = PATTERNS.non_word.replace_all(&lowered, "");
    let collapsed = PATTERNS.whitespace.replace_all(&stripped, " ");
    let without_season = PATTERNS.season_tail.replace(&collapsed, "");
    without_season.trim().to_string()
}

/// Similarity in `[0, 1]` between two display titles.
///
/// Containment scores `len(shorter) / len(longer)`; otherwise the score is the
/// normalized Levenshtein similarity. Two empty titles never match.
#[must_use]
pub fn similarity(a: &str, b: &str) -> f64 {
    let a = normalize_title(a);
    let b = normalize_title(b);

    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    if a == b {
        return 1.0;
    }

    let len_a = a.chars().count();
    let len_b = b.chars().count();

    if a.contains(&b) || b.contains(&a) {
        return len_a.min(len_b) as f64 / len_a.max(len_b) as f64;
    }

    let distance = strsim::levenshtein(&a, &b);
    1.0 - distance as f64 / len_a.max(len_b) as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_title() {
        assert_eq!(normalize_title("  Re:ZERO -Starting Life-  "), "rezero -starting life-");
        assert_eq!(normalize_title("Attack on Titan Season 3"), "attack on titan");
        assert_eq!(normalize_title("Spy x Family Part 2"), "spy x family");
        assert_eq!(normalize_title("Mob Psycho 100"), "mob psycho 100");
        assert_eq!(normalize_title(""), "");
    }

    #[test]
    fn test_normalize_keeps_inner_season_words() {
        assert_eq!(normalize_title("Season of Love"), "season of love");
    }

    #[test]
    fn test_similarity_reflexive() {
        for title in ["Frieren", "One Piece", "Kaguya-sama: Love is War"] {
            assert!((similarity(title, title) - 1.0).abs() < f64::EPSILON);
        }
    }

    #[test]
    fn test_similarity_empty() {
        assert_eq!(similarity("", ""), 0.0);
        assert_eq!(similarity("!!!", "???"), 0.0);
        assert_eq!(similarity("Frieren", ""), 0.0);
    }

    #[test]
    fn test_similarity_symmetric() {
        let pairs = [
            ("Sousou no Frieren", "Frieren"),
            ("Bocchi the Rock", "Bocchi the Rock!"),
            ("Naruto", "Boruto"),
            ("Steins;Gate", "Steins Gate 0"),
        ];
        for (a, b) in pairs {
            assert!((similarity(a, b) - similarity(b, a)).abs() < f64::EPSILON);
        }
    }

    #[test]
    fn test_similarity_containment() {
        // "frieren" (7) inside "sousou no frieren" (17)
        let score = similarity("Sousou no Frieren", "Frieren");
        assert!((score - 7.0 / 17.0).abs() < 1e-9);
    }

    #[test]
    fn test_similarity_edit_distance() {
        // naruto -> boruto: two substitutions over six chars
        let score = similarity("Naruto", "Boruto");
        assert!((score - (1.0 - 2.0 / 6.0)).abs() < 1e-9);
    }

    #[test]
    fn test_similarity_ignores_season_suffix() {
        assert!((similarity("Oshi no Ko Season 2", "Oshi no Ko") - 1.0).abs() < f64::EPSILON);
    }
}
