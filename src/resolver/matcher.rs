use crate::resolver::{
    title::{detect_season, extract_base_title, normalize_title, similarity},
    types::{CanonicalMedia, MatchResult, ProviderCandidate},
};

/// Minimum total score for a candidate to be accepted
pub const MIN_ACCEPT_SCORE: f64 = 70.0;

/// A scored candidate
#[derive(Debug, Clone)]
pub struct ScoredCandidate {
    /// The provider search hit
    pub candidate: ProviderCandidate,
    /// Sum of every signal in the breakdown
    pub score: f64,
    /// Breakdown of score components
    pub breakdown: ScoreBreakdown,
}

impl From<ScoredCandidate> for MatchResult {
    fn from(scored: ScoredCandidate) -> Self {
        Self {
            candidate: scored.candidate,
            score: scored.score,
        }
    }
}

/// Breakdown of how the score was calculated
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScoreBreakdown {
    pub title_score: f64,
    pub base_title_score: f64,
    pub exact_score: f64,
    pub season_score: f64,
    pub episode_score: f64,
    pub format_score: f64,
    pub year_score: f64,
}

impl ScoreBreakdown {
    #[must_use]
    pub fn total(&self) -> f64 {
        self.title_score
            + self.base_title_score
            + self.exact_score
            + self.season_score
            + self.episode_score
            + self.format_score
            + self.year_score
    }
}

/// Scores provider candidates against a catalog record
pub struct Matcher;

impl Matcher {
    /// Score and rank candidates, best first. Ties keep provider order.
    #[must_use]
    pub fn rank(
        candidates: Vec<ProviderCandidate>,
        media: &CanonicalMedia,
    ) -> Vec<ScoredCandidate> {
        let canonical_season = Self::canonical_season(media);

        let mut scored: Vec<ScoredCandidate> = candidates
            .into_iter()
            .map(|candidate| Self::score_with_season(candidate, media, canonical_season))
            .collect();

        scored.sort_by(|a, b| b.score.total_cmp(&a.score));

        scored
    }

    /// Get the best candidate if it clears `min_score`
    #[must_use]
    pub fn best_match(
        candidates: Vec<ProviderCandidate>,
        media: &CanonicalMedia,
        min_score: f64,
    ) -> Option<ScoredCandidate> {
        Self::rank(candidates, media)
            .into_iter()
            .next()
            .filter(|m| m.score >= min_score)
    }

    /// Score a single candidate
    #[must_use]
    pub fn score(candidate: &ProviderCandidate, media: &CanonicalMedia) -> f64 {
        Self::breakdown(candidate, media, Self::canonical_season(media)).total()
    }

    fn canonical_season(media: &CanonicalMedia) -> u32 {
        detect_season(&media.match_titles(), &media.relations)
    }

    fn score_with_season(
        candidate: ProviderCandidate,
        media: &CanonicalMedia,
        canonical_season: u32,
    ) -> ScoredCandidate {
        let breakdown = Self::breakdown(&candidate, media, canonical_season);
        ScoredCandidate {
            score: breakdown.total(),
            candidate,
            breakdown,
        }
    }

    fn breakdown(
        candidate: &ProviderCandidate,
        media: &CanonicalMedia,
        canonical_season: u32,
    ) -> ScoreBreakdown {
        let titles = media.match_titles();
        let name = candidate.display_name.as_str();

        ScoreBreakdown {
            // Best title similarity (0-100 points)
            title_score: Self::score_title(&titles, name),
            // Season-agnostic title similarity (0 or 30 points)
            base_title_score: Self::score_base_title(&titles, name),
            // Exact normalized title (0 or 50 points)
            exact_score: Self::score_exact(&titles, name),
            // Season agreement (-30 or 40 points)
            season_score: Self::score_season(canonical_season, detect_season(&[name], &[])),
            // Episode count agreement (-10 to 20 points)
            episode_score: Self::score_episodes(media.episode_count, candidate.episode_count()),
            // Format agreement (0 or 15 points)
            format_score: Self::score_format(media, candidate.kind.as_deref()),
            // Release year agreement (-10 to 15 points)
            year_score: Self::score_year(media.season_year, candidate.release_year),
        }
    }

    fn score_title(titles: &[&str], name: &str) -> f64 {
        titles
            .iter()
            .map(|title| similarity(title, name))
            .fold(0.0, f64::max)
            * 100.0
    }

    fn score_base_title(titles: &[&str], name: &str) -> f64 {
        let base_name = extract_base_title(name);
        let best = titles
            .iter()
            .map(|title| similarity(&extract_base_title(title), &base_name))
            .fold(0.0, f64::max);

        if best > 0.8 { 30.0 } else { 0.0 }
    }

    fn score_exact(titles: &[&str], name: &str) -> f64 {
        let name = normalize_title(name);
        if name.is_empty() {
            return 0.0;
        }

        if titles.iter().any(|title| normalize_title(title) == name) {
            50.0
        } else {
            0.0
        }
    }

    const fn score_season(canonical: u32, candidate: u32) -> f64 {
        // Differing seasons always leave one side above 1
        if canonical == candidate { 40.0 } else { -30.0 }
    }

    const fn score_episodes(canonical: Option<u32>, candidate: Option<u32>) -> f64 {
        match (canonical, candidate) {
            (Some(a), Some(b)) => match a.abs_diff(b) {
                0 => 20.0,
                1..=2 => 10.0,
                3..=10 => 0.0,
                _ => -10.0,
            },
            _ => 0.0,
        }
    }

    fn score_format(media: &CanonicalMedia, kind: Option<&str>) -> f64 {
        match kind {
            Some(kind) if media.format.matches_provider_type(kind) => 15.0,
            _ => 0.0,
        }
    }

    const fn score_year(canonical: Option<i32>, candidate: Option<i32>) -> f64 {
        match (canonical, candidate) {
            (Some(a), Some(b)) => match a.abs_diff(b) {
                0 => 15.0,
                1 => 5.0,
                2 => 0.0,
                _ => -10.0,
            },
            _ => 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::types::MediaFormat;

    fn example_media() -> CanonicalMedia {
        CanonicalMedia::new(1, "Example")
            .with_format(MediaFormat::Tv)
            .with_year(Some(2020))
            .with_episodes(Some(12))
    }

    fn candidate(name: &str) -> ProviderCandidate {
        ProviderCandidate::new(name.to_lowercase().replace(' ', "-"), name)
            .with_kind("tv")
            .with_sub_episodes(Some(12))
            .with_year(Some(2020))
    }

    #[test]
    fn test_exact_candidate_accepted() {
        let media = example_media();
        let score = Matcher::score(&candidate("Example"), &media);

        assert!(score >= MIN_ACCEPT_SCORE);
        assert!((score - 270.0).abs() < 1e-9);
    }

    #[test]
    fn test_season_mismatch_penalty() {
        let media = example_media();
        let first = Matcher::score(&candidate("Example"), &media);
        let second = Matcher::score(&candidate("Example Season 2"), &media);

        assert!(first - second >= 70.0);
    }

    #[test]
    fn test_breakdown_components() {
        let media = example_media();
        let ranked = Matcher::rank(vec![candidate("Example Season 2")], &media);
        let breakdown = &ranked[0].breakdown;

        assert_eq!(breakdown.season_score, -30.0);
        assert_eq!(breakdown.episode_score, 20.0);
        assert_eq!(breakdown.format_score, 15.0);
        assert_eq!(breakdown.year_score, 15.0);
        assert!((ranked[0].score - breakdown.total()).abs() < f64::EPSILON);
    }

    #[test]
    fn test_score_episodes() {
        assert_eq!(Matcher::score_episodes(Some(12), Some(12)), 20.0);
        assert_eq!(Matcher::score_episodes(Some(12), Some(10)), 10.0);
        assert_eq!(Matcher::score_episodes(Some(12), Some(18)), 0.0);
        assert_eq!(Matcher::score_episodes(Some(12), Some(24)), -10.0);
        assert_eq!(Matcher::score_episodes(None, Some(24)), 0.0);
    }

    #[test]
    fn test_score_year() {
        assert_eq!(Matcher::score_year(Some(2020), Some(2020)), 15.0);
        assert_eq!(Matcher::score_year(Some(2020), Some(2021)), 5.0);
        assert_eq!(Matcher::score_year(Some(2020), Some(2022)), 0.0);
        assert_eq!(Matcher::score_year(Some(2020), Some(2015)), -10.0);
        assert_eq!(Matcher::score_year(None, Some(2015)), 0.0);
    }

    #[test]
    fn test_score_season() {
        assert_eq!(Matcher::score_season(1, 1), 40.0);
        assert_eq!(Matcher::score_season(2, 2), 40.0);
        assert_eq!(Matcher::score_season(1, 2), -30.0);
        assert_eq!(Matcher::score_season(3, 1), -30.0);
    }

    #[test]
    fn test_rank_prefers_matching_year() {
        let media = example_media();
        let ranked = Matcher::rank(
            vec![
                candidate("Example").with_year(Some(2008)),
                candidate("Example"),
            ],
            &media,
        );

        assert_eq!(ranked[0].candidate.release_year, Some(2020));
    }

    #[test]
    fn test_best_match_filters_low_score() {
        let media = example_media();
        let unrelated = ProviderCandidate::new("x", "Completely Different Show")
            .with_kind("Movie")
            .with_year(Some(1999));

        assert!(Matcher::best_match(vec![unrelated], &media, MIN_ACCEPT_SCORE).is_none());
    }

    #[test]
    fn test_synonym_title_counts() {
        let media = CanonicalMedia::new(2, "Frieren: Beyond Journey's End")
            .with_romaji("Sousou no Frieren")
            .with_synonym("Frieren at the Funeral")
            .with_format(MediaFormat::Tv)
            .with_year(Some(2023));

        let best = Matcher::best_match(
            vec![ProviderCandidate::new("frieren", "Sousou no Frieren").with_kind("TV")],
            &media,
            MIN_ACCEPT_SCORE,
        );

        assert_eq!(best.map(|m| m.candidate.provider_id).as_deref(), Some("frieren"));
    }
}
