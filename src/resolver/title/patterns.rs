use regex::Regex;
use std::sync::LazyLock;

/// Pre-compiled regex patterns for title normalization and season detection
pub struct Patterns {
    // Normalization
    pub non_word: Regex,    // anything but word chars, whitespace, hyphen
    pub whitespace: Regex,  // runs of whitespace
    pub season_tail: Regex, // trailing "season 2", "part 2", "cour 2"

    // Season detection (ordered by rule precedence)
    pub season_number: Regex,   // Season 2, S2, Part 2, Cour 2
    pub roman_numeral: Regex,   // trailing II..X after at least one word
    pub ordinal_season: Regex,  // 2nd Season

    // Base-title cleanup
    pub dangling_separator: Regex, // separators left behind at the end
}

impl Patterns {
    pub fn new() -> Self {
        Self {
            non_word: Regex::new(r"[^\w\s-]").expect("Invalid non_word regex"),
            whitespace: Regex::new(r"\s+").expect("Invalid whitespace regex"),
            season_tail: Regex::new(r"(?i)\s*\b(?:season|part|cour)\s*\d+\s*$")
                .expect("Invalid season_tail regex"),

            season_number: Regex::new(r"(?i)\b(?:season|s|part|cour)\s*(\d+)\b")
                .expect("Invalid season_number regex"),
            roman_numeral: Regex::new(r"\s(II|III|IV|V|VI|VII|VIII|IX|X)\s*$")
                .expect("Invalid roman_numeral regex"),
            ordinal_season: Regex::new(r"(?i)\b(\d+)(?:st|nd|rd|th)\s+season\b")
                .expect("Invalid ordinal_season regex"),

            dangling_separator: Regex::new(r"[\s:\-–~]+$")
                .expect("Invalid dangling_separator regex"),
        }
    }
}

impl Default for Patterns {
    fn default() -> Self {
        Self::new()
    }
}

/// Global singleton for patterns
pub static PATTERNS: LazyLock<Patterns> = LazyLock::new(Patterns::new);

/// Roman numeral lookup for trailing season markers
pub fn roman_to_season(numeral: &str) -> Option<u32> {
    let value = match numeral {
        "II" => 2,
        "III" => 3,
        "IV" => 4,
        "V" => 5,
        "VI" => 6,
        "VII" => 7,
        "VIII" => 8,
        "IX" => 9,
        "X" => 10,
        _ => return None,
    };
    Some(value)
}
