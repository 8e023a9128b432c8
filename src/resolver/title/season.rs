use super::patterns::{PATTERNS, roman_to_season};
use crate::resolver::types::MediaRelation;

/// Infer the season ordinal of a title.
///
/// Title patterns are tried rule by rule across every title before falling
/// back to counting prequel seasons in the relation graph.
#[must_use]
pub fn detect_season(titles: &[&str], relations: &[MediaRelation]) -> u32 {
    let rules: [fn(&str) -> Option<u32>; 3] =
        [season_from_number, season_from_roman, season_from_ordinal];

    for rule in rules {
        if let Some(season) = titles.iter().find_map(|title| rule(title)) {
            return season;
        }
    }

    let prequels = relations.iter().filter(|r| r.is_season_prequel()).count();
    u32::try_from(prequels).map_or(1, |count| count + 1)
}

fn season_from_number(title: &str) -> Option<u32> {
    PATTERNS
        .season_number
        .captures(title)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

fn season_from_roman(title: &str) -> Option<u32> {
    PATTERNS
        .roman_numeral
        .captures(title.trim())
        .and_then(|caps| caps.get(1))
        .and_then(|m| roman_to_season(m.as_str()))
}

fn season_from_ordinal(title: &str) -> Option<u32> {
    PATTERNS
        .ordinal_season
        .captures(title)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// Strip season markers from a title, keeping its original casing.
#[must_use]
pub fn extract_base_title(title: &str) -> String {
    let without_ordinal = PATTERNS.ordinal_season.replace_all(title, " ");
    let without_number = PATTERNS.season_number.replace_all(&without_ordinal, " ");
    let without_roman = PATTERNS.roman_numeral.replace(without_number.trim(), " ");
    let collapsed = PATTERNS.whitespace.replace_all(&without_roman, " ");
    PATTERNS
        .dangling_separator
        .replace(collapsed.trim(), "")
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::types::{MediaFormat, RelationType};

    #[test]
    fn test_detect_from_season_keyword() {
        assert_eq!(detect_season(&["Show Season 2"], &[]), 2);
        assert_eq!(detect_season(&["Show S3"], &[]), 3);
        assert_eq!(detect_season(&["Show Part 2"], &[]), 2);
        assert_eq!(detect_season(&["Show cour 2"], &[]), 2);
    }

    #[test]
    fn test_detect_from_roman_numeral() {
        assert_eq!(detect_season(&["Show II"], &[]), 2);
        assert_eq!(detect_season(&["Overlord IV"], &[]), 4);
        assert_eq!(detect_season(&["Show X"], &[]), 10);
        assert_eq!(detect_season(&["Spy x Family"], &[]), 1);
    }

    #[test]
    fn test_lone_numeral_is_a_title() {
        assert_eq!(detect_season(&["X"], &[]), 1);
        assert_eq!(detect_season(&[" X "], &[]), 1);
        assert_eq!(detect_season(&["X II"], &[]), 2);
        assert_eq!(extract_base_title("X"), "X");
        assert_eq!(extract_base_title("X II"), "X");
    }

    #[test]
    fn test_detect_from_ordinal() {
        assert_eq!(detect_season(&["Show 2nd Season"], &[]), 2);
        assert_eq!(detect_season(&["Show 3rd season"], &[]), 3);
    }

    #[test]
    fn test_rule_precedence_across_titles() {
        // A keyword match in a later title beats a roman numeral in an earlier one
        assert_eq!(detect_season(&["Show II", "Show Season 3"], &[]), 3);
    }

    #[test]
    fn test_detect_from_prequels() {
        let prequel = MediaRelation::new(RelationType::Prequel, 1, Some(MediaFormat::Tv));
        assert_eq!(detect_season(&["Show"], &[prequel]), 2);
    }

    #[test]
    fn test_side_story_prequels_ignored() {
        let relations = vec![
            MediaRelation::new(RelationType::Prequel, 1, Some(MediaFormat::Movie)),
            MediaRelation::new(RelationType::Prequel, 2, Some(MediaFormat::Ova)),
            MediaRelation::new(RelationType::Sequel, 3, Some(MediaFormat::Tv)),
            MediaRelation::new(RelationType::Prequel, 4, None),
        ];
        assert_eq!(detect_season(&["Show"], &relations), 2);
    }

    #[test]
    fn test_detect_default() {
        assert_eq!(detect_season(&["Show"], &[]), 1);
        assert_eq!(detect_season(&[], &[]), 1);
    }

    #[test]
    fn test_extract_base_title() {
        assert_eq!(extract_base_title("Attack on Titan Season 3"), "Attack on Titan");
        assert_eq!(extract_base_title("Overlord II"), "Overlord");
        assert_eq!(extract_base_title("Mushoku Tensei 2nd Season"), "Mushoku Tensei");
        assert_eq!(extract_base_title("Spy x Family Part 2"), "Spy x Family");
        assert_eq!(extract_base_title("Frieren"), "Frieren");
        assert_eq!(extract_base_title("Re:Zero Season 2: Part 2"), "Re:Zero");
    }
}
