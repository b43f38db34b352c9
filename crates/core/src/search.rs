use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;

use crate::scene::Scene;

pub fn fuzzy_score(needle: &str, hay: &str) -> Option<i64> {
    let m = SkimMatcherV2::default();
    m.fuzzy_match(hay, needle)
}

/// Indices into `scene.tiles` whose name matches `needle`, best match first.
pub fn search_tiles(scene: &Scene, needle: &str) -> Vec<usize> {
    let needle = needle.trim();
    if needle.is_empty() {
        return Vec::new();
    }
    let m = SkimMatcherV2::default();
    let mut hits: Vec<(usize, i64)> = scene
        .tiles
        .iter()
        .enumerate()
        .filter_map(|(i, t)| m.fuzzy_match(&t.name, needle).map(|score| (i, score)))
        .collect();
    hits.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    hits.into_iter().map(|(i, _)| i).collect()
}
