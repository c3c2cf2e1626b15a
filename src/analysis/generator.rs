//! Synthetic keyword analysis
//!
//! Stands in for a real SEO data provider. The record shape is fixed (12
//! trend points, 6 SERP entries, capped suggestion lists) while the values
//! are randomized around keyword length. Every scaling and noise constant
//! lives in [`GeneratorConfig`].

use rand::Rng;

use crate::error::{KeywordError, KeywordResult};
use crate::models::{Competition, KeywordAnalysis, KeywordMetrics, SerpResult, TrendPoint};

pub const TREND_PERIODS: usize = 12;
pub const SERP_SIZE: usize = 6;

/// Templates for generated keyword ideas; `{}` is replaced with the seed
const IDEA_TEMPLATES: [&str; 10] = [
    "{} optimization",
    "{} strategy",
    "{} techniques",
    "{} best practices",
    "{} tools",
    "advanced {}",
    "{} for beginners",
    "{} case study",
    "{} trends",
    "{} analytics",
];

/// Upper bound on ideas returned by [`KeywordGenerator::keyword_ideas`]
pub const MAX_KEYWORD_IDEAS: usize = IDEA_TEMPLATES.len();

const SERP_HOSTS: [&str; 6] = [
    "example.com",
    "site.io",
    "blog.dev",
    "research.ai",
    "guide.net",
    "insights.co",
];

const QUESTION_WORDS: [&str; 6] = ["what", "how", "why", "where", "when", "who"];

const SUGGESTION_POOL: [&str; 20] = [
    "seo tools",
    "keyword finder",
    "backlink checker",
    "long tail keywords",
    "content marketing",
    "blog post ideas",
    "keyword planner alternative",
    "featured snippet ideas",
    "topic cluster",
    "semantic keywords",
    "competitor analysis",
    "search intent",
    "technical seo",
    "site speed",
    "local seo",
    "voice search optimization",
    "ecommerce seo",
    "app store optimization",
    "google trends",
    "search volume",
];

/// Calibration values for generated analyses
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratorConfig {
    pub provider_label: String,
    pub region: String,
    pub notes: Option<String>,

    pub volume_scale: f64,
    pub volume_noise: f64,
    pub min_volume: f64,
    pub max_volume: f64,

    pub difficulty_scale: f64,
    pub difficulty_noise: f64,
    pub min_difficulty: f64,
    pub max_difficulty: f64,

    /// Dollar floor added to every cost-per-click
    pub cpc_base: f64,
    pub cpc_range: f64,

    pub trend_base_scale: f64,
    pub trend_random_range: f64,
    pub trend_min: f64,
    pub trend_max: f64,
    pub trend_wave_amplitude: f64,
    pub trend_noise: f64,

    pub max_suggestions: usize,
    pub max_long_tail: usize,
    pub max_questions: usize,
    pub max_related_searches: usize,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            provider_label: "Mock SERP + Trends".to_string(),
            region: "Global".to_string(),
            notes: Some("Mock provider with cached responses and rate limiting.".to_string()),
            volume_scale: 320.0,
            volume_noise: 2500.0,
            min_volume: 400.0,
            max_volume: 12000.0,
            difficulty_scale: 4.0,
            difficulty_noise: 25.0,
            min_difficulty: 15.0,
            max_difficulty: 90.0,
            cpc_base: 0.25,
            cpc_range: 6.0,
            trend_base_scale: 7.0,
            trend_random_range: 20.0,
            trend_min: 20.0,
            trend_max: 95.0,
            trend_wave_amplitude: 15.0,
            trend_noise: 10.0,
            max_suggestions: 6,
            max_long_tail: 5,
            max_questions: 4,
            max_related_searches: 6,
        }
    }
}

/// Related terms derived from the vocabulary pool
#[derive(Debug, Clone, PartialEq)]
pub struct SuggestionSet {
    pub suggestions: Vec<String>,
    pub long_tail: Vec<String>,
    pub questions: Vec<String>,
    pub related_searches: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct KeywordGenerator {
    config: GeneratorConfig,
}

/// Uniform sample in `[0, span)`, or zero for an empty span
fn noise<R: Rng + ?Sized>(rng: &mut R, span: f64) -> f64 {
    if span > 0.0 {
        rng.random_range(0.0..span)
    } else {
        0.0
    }
}

fn validated(keyword: &str) -> KeywordResult<&str> {
    let keyword = keyword.trim();
    if keyword.is_empty() {
        return Err(KeywordError::empty_keyword());
    }
    Ok(keyword)
}

impl KeywordGenerator {
    pub fn new(config: GeneratorConfig) -> Self {
        Self { config }
    }

    /// Generate an analysis using the thread-local RNG
    pub fn generate(&self, keyword: &str) -> KeywordResult<KeywordAnalysis> {
        self.generate_with(keyword, &mut rand::rng())
    }

    pub fn generate_with<R: Rng + ?Sized>(
        &self,
        keyword: &str,
        rng: &mut R,
    ) -> KeywordResult<KeywordAnalysis> {
        let keyword = validated(keyword)?;
        let cfg = &self.config;
        let len = keyword.chars().count() as f64;

        let search_volume = (len * cfg.volume_scale + noise(rng, cfg.volume_noise))
            .clamp(cfg.min_volume, cfg.max_volume)
            .round() as u32;
        let difficulty = (len * cfg.difficulty_scale + noise(rng, cfg.difficulty_noise))
            .round()
            .clamp(cfg.min_difficulty, cfg.max_difficulty) as u8;
        let cpc = ((noise(rng, cfg.cpc_range) + cfg.cpc_base) * 100.0).round() / 100.0;

        let SuggestionSet {
            suggestions,
            long_tail,
            questions,
            related_searches,
        } = self.build_suggestions(keyword);

        Ok(KeywordAnalysis {
            seed_keyword: keyword.to_string(),
            provider: cfg.provider_label.clone(),
            metrics: KeywordMetrics {
                keyword: keyword.to_string(),
                search_volume,
                competition: Competition::from_difficulty(difficulty),
                difficulty,
                cpc: Some(cpc),
                region: cfg.region.clone(),
                trend: self.build_trend(keyword, rng),
            },
            suggestions,
            long_tail,
            questions,
            related_searches,
            serp: build_serp(keyword),
            notes: cfg.notes.clone(),
        })
    }

    pub fn trend(&self, keyword: &str) -> KeywordResult<Vec<TrendPoint>> {
        let keyword = validated(keyword)?;
        Ok(self.build_trend(keyword, &mut rand::rng()))
    }

    pub fn suggestions(&self, keyword: &str) -> KeywordResult<SuggestionSet> {
        let keyword = validated(keyword)?;
        Ok(self.build_suggestions(keyword))
    }

    /// Templated keyword ideas for a seed, at most `count` of them in template order
    pub fn keyword_ideas(&self, keyword: &str, count: usize) -> KeywordResult<Vec<String>> {
        let keyword = validated(keyword)?;
        Ok(IDEA_TEMPLATES
            .iter()
            .take(count)
            .map(|template| template.replace("{}", keyword))
            .collect())
    }

    /// Every point oscillates around one shared base; this is not a random walk.
    fn build_trend<R: Rng + ?Sized>(&self, keyword: &str, rng: &mut R) -> Vec<TrendPoint> {
        let cfg = &self.config;
        let len = keyword.chars().count() as f64;
        let base = (len * cfg.trend_base_scale + noise(rng, cfg.trend_random_range))
            .floor()
            .clamp(cfg.trend_min, cfg.trend_max);

        (0..TREND_PERIODS)
            .map(|idx| {
                let wave = (idx as f64).sin() * cfg.trend_wave_amplitude;
                let value = (base + wave + noise(rng, cfg.trend_noise))
                    .floor()
                    .clamp(10.0, 100.0);
                TrendPoint {
                    label: format!("M{}", idx + 1),
                    value: value as u8,
                }
            })
            .collect()
    }

    fn build_suggestions(&self, keyword: &str) -> SuggestionSet {
        let cfg = &self.config;
        let normalized = keyword.to_lowercase();
        let head = normalized
            .split(' ')
            .next()
            .filter(|token| !token.is_empty())
            .unwrap_or("seo");
        let seed_len = normalized.chars().count();

        let suggestions = SUGGESTION_POOL
            .iter()
            .filter(|item| item.contains(head))
            .take(cfg.max_suggestions)
            .map(|item| item.to_string())
            .collect();

        let long_tail = SUGGESTION_POOL
            .iter()
            .filter(|item| **item != keyword && item.chars().count() > seed_len)
            .take(cfg.max_long_tail)
            .map(|item| format!("{item} for {keyword}"))
            .collect();

        let questions = QUESTION_WORDS
            .iter()
            .take(cfg.max_questions)
            .map(|q| format!("{q} to improve {keyword}?"))
            .collect();

        let related_searches = SUGGESTION_POOL
            .iter()
            .filter(|item| **item != keyword)
            .take(cfg.max_related_searches)
            .map(|item| item.to_string())
            .collect();

        SuggestionSet {
            suggestions,
            long_tail,
            questions,
            related_searches,
        }
    }
}

fn build_serp(keyword: &str) -> Vec<SerpResult> {
    let slug = keyword.split_whitespace().collect::<Vec<_>>().join("-");

    (0..SERP_SIZE)
        .map(|idx| {
            let feature = if idx == 0 {
                "Featured snippet"
            } else if idx % 2 == 0 {
                "People Also Ask"
            } else {
                "Sitelinks"
            };

            SerpResult {
                title: format!("{keyword} best practices {}", idx + 1),
                url: format!(
                    "https://{}/{slug}-{}",
                    SERP_HOSTS[idx % SERP_HOSTS.len()],
                    idx + 1
                ),
                snippet: format!(
                    "Discover how to improve {keyword} performance with actionable steps and on-page optimizations."
                ),
                rank: idx as u32 + 1,
                features: Some(vec![feature.to_string()]),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    #[test]
    fn test_seo_tools_scenario() {
        let generator = KeywordGenerator::default();
        let analysis = generator.generate("seo tools").unwrap();

        assert_eq!(analysis.metrics.keyword, "seo tools");
        assert_eq!(analysis.metrics.trend.len(), 12);
        assert_eq!(analysis.serp.len(), 6);
        assert_eq!(
            analysis.serp[0].features,
            Some(vec!["Featured snippet".to_string()])
        );
        let ranks: Vec<u32> = analysis.serp.iter().map(|r| r.rank).collect();
        assert_eq!(ranks, vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_metric_bounds_hold_across_seeds() {
        let generator = KeywordGenerator::default();
        let keywords = ["a", "seo", "seo tools", "a very long keyword phrase about marketing"];

        for seed in 0..200u64 {
            let mut rng = StdRng::seed_from_u64(seed);
            for keyword in keywords {
                let analysis = generator.generate_with(keyword, &mut rng).unwrap();
                let metrics = &analysis.metrics;

                assert!((15..=90).contains(&metrics.difficulty));
                assert!((400..=12000).contains(&metrics.search_volume));
                assert_eq!(
                    metrics.competition,
                    Competition::from_difficulty(metrics.difficulty)
                );

                let cpc = metrics.cpc.unwrap();
                assert!((0.25..=6.25).contains(&cpc));
                assert_eq!((cpc * 100.0).round() / 100.0, cpc);

                assert!(metrics.trend.iter().all(|p| (10..=100).contains(&p.value)));
            }
        }
    }

    #[test]
    fn test_same_seed_is_reproducible() {
        let generator = KeywordGenerator::default();
        let a = generator
            .generate_with("content marketing", &mut StdRng::seed_from_u64(7))
            .unwrap();
        let b = generator
            .generate_with("content marketing", &mut StdRng::seed_from_u64(7))
            .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_trend_oscillates_around_shared_base() {
        let config = GeneratorConfig {
            trend_random_range: 0.0,
            trend_noise: 0.0,
            ..GeneratorConfig::default()
        };
        let generator = KeywordGenerator::new(config);
        let trend = generator.trend("seo tools").unwrap();

        // base = floor(9 * 7) = 63; each point is floor(63 + sin(i) * 15)
        let expected: Vec<u8> = (0..12)
            .map(|i| (63.0 + (i as f64).sin() * 15.0).floor() as u8)
            .collect();
        let values: Vec<u8> = trend.iter().map(|p| p.value).collect();
        assert_eq!(values, expected);
        assert_eq!(trend[0].label, "M1");
        assert_eq!(trend[11].label, "M12");
    }

    #[test]
    fn test_serp_urls_unique_and_tagged() {
        let generator = KeywordGenerator::default();
        let analysis = generator.generate("  local   seo  ").unwrap();

        let urls: HashSet<&str> = analysis.serp.iter().map(|r| r.url.as_str()).collect();
        assert_eq!(urls.len(), 6);
        assert_eq!(analysis.serp[0].url, "https://example.com/local-seo-1");
        assert_eq!(analysis.serp[1].features, Some(vec!["Sitelinks".to_string()]));
        assert_eq!(
            analysis.serp[2].features,
            Some(vec!["People Also Ask".to_string()])
        );
    }

    #[test]
    fn test_keyword_ideas_capped_at_count() {
        let generator = KeywordGenerator::default();

        let ideas = generator.keyword_ideas("  seo ", 3).unwrap();
        assert_eq!(ideas, vec!["seo optimization", "seo strategy", "seo techniques"]);

        let all = generator.keyword_ideas("seo", 50).unwrap();
        assert_eq!(all.len(), MAX_KEYWORD_IDEAS);
        assert!(all.contains(&"advanced seo".to_string()));
        assert!(all.contains(&"seo for beginners".to_string()));

        assert!(generator.keyword_ideas("seo", 0).unwrap().is_empty());
        assert!(matches!(
            generator.keyword_ideas(" ", 5),
            Err(KeywordError::Validation(_))
        ));
    }

    #[test]
    fn test_suggestion_caps_and_filters() {
        let generator = KeywordGenerator::default();
        let set = generator.suggestions("seo tools").unwrap();

        assert!(set.suggestions.iter().all(|s| s.contains("seo")));
        assert!(set.suggestions.len() <= 6);
        assert_eq!(set.long_tail.len(), 5);
        assert!(set.long_tail.iter().all(|s| s.ends_with(" for seo tools")));
        assert_eq!(
            set.questions,
            vec![
                "what to improve seo tools?",
                "how to improve seo tools?",
                "why to improve seo tools?",
                "where to improve seo tools?",
            ]
        );
        assert_eq!(set.related_searches.len(), 6);
        assert!(!set.related_searches.contains(&"seo tools".to_string()));
    }

    #[test]
    fn test_empty_keyword_rejected() {
        let generator = KeywordGenerator::default();
        assert!(matches!(
            generator.generate("   "),
            Err(KeywordError::Validation(_))
        ));
        assert!(matches!(generator.trend(""), Err(KeywordError::Validation(_))));
    }
}
