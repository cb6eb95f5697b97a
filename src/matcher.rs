//! Picks the Offstreet location that best fits the lot name typed into T2.
//!
//! T2 and Offstreet name the same structures independently ("Biggy Structure Lot B" vs
//! "P8 - BIGGY STRUCTURE"), so matching is a heuristic: a short alias table first, then a
//! positional character score. A weak match is still a match; the caller never stalls.

use crate::models::candidate::CandidateOption;

/// `alias` found in the request forces the first candidate whose label contains `fragment`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasRule {
    pub alias: String,
    pub fragment: String,
}

impl AliasRule {
    pub fn new(alias: impl Into<String>, fragment: impl Into<String>) -> Self {
        AliasRule {
            alias: alias.into().to_lowercase(),
            fragment: fragment.into().to_lowercase(),
        }
    }

    /// Parses `alias=FRAGMENT;alias=FRAGMENT`. Malformed entries are skipped.
    pub fn parse_list(raw: &str) -> Vec<AliasRule> {
        raw.split(';')
            .filter_map(|entry| {
                let (alias, fragment) = entry.split_once('=')?;
                let (alias, fragment) = (alias.trim(), fragment.trim());
                if alias.is_empty() || fragment.is_empty() {
                    return None;
                }
                Some(AliasRule::new(alias, fragment))
            })
            .collect()
    }
}

const DEFAULT_ALIASES: &[(&str, &str)] = &[("biggy", "BIGGY STRUCTURE")];

#[derive(Debug, Clone)]
pub struct LotMatcher {
    aliases: Vec<AliasRule>,
}

impl Default for LotMatcher {
    fn default() -> Self {
        LotMatcher {
            aliases: DEFAULT_ALIASES
                .iter()
                .map(|(alias, fragment)| AliasRule::new(*alias, *fragment))
                .collect(),
        }
    }
}

impl LotMatcher {
    pub fn with_aliases(aliases: Vec<AliasRule>) -> Self {
        LotMatcher { aliases }
    }

    /// Default table followed by `extra` rules.
    pub fn extended(extra: impl IntoIterator<Item = AliasRule>) -> Self {
        let mut matcher = Self::default();
        matcher.aliases.extend(extra);
        matcher
    }

    pub fn aliases(&self) -> &[AliasRule] {
        &self.aliases
    }

    pub fn best_match<'a>(
        &self,
        requested: &str,
        candidates: &'a [CandidateOption],
    ) -> Option<&'a CandidateOption> {
        if let Some(hit) = self.alias_match(requested, candidates) {
            return Some(hit);
        }

        let mut best: Option<(&CandidateOption, usize)> = None;
        for candidate in candidates {
            let score = positional_score(requested, &candidate.label);
            match best {
                Some((_, top)) if score <= top => {}
                _ => best = Some((candidate, score)),
            }
        }
        best.map(|(candidate, _)| candidate)
    }

    pub fn alias_match<'a>(
        &self,
        requested: &str,
        candidates: &'a [CandidateOption],
    ) -> Option<&'a CandidateOption> {
        let requested = requested.to_lowercase();
        self.aliases
            .iter()
            .filter(|rule| requested.contains(&rule.alias))
            .find_map(|rule| {
                candidates
                    .iter()
                    .find(|c| c.label.to_lowercase().contains(&rule.fragment))
            })
    }

    /// All candidates with their positional scores, best first. Ties keep list order.
    pub fn rank<'a>(
        &self,
        requested: &str,
        candidates: &'a [CandidateOption],
    ) -> Vec<(&'a CandidateOption, usize)> {
        let mut ranked: Vec<_> = candidates
            .iter()
            .map(|c| (c, positional_score(requested, &c.label)))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked
    }
}

/// Number of aligned positions where the lowercased strings agree.
///
/// Keeps scanning past mismatches up to the shorter length.
pub fn positional_score(a: &str, b: &str) -> usize {
    let a = a.to_lowercase();
    let b = b.to_lowercase();
    a.chars().zip(b.chars()).filter(|(x, y)| x == y).count()
}
