use super::{categories::CategorySet, error::ClassifyError};
use regex::Regex;

/// Which step of the cascade produced the label.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MatchRule {
    Exact,
    CaseInsensitive,
    WordBoundary,
    Fallback,
}

impl std::fmt::Display for MatchRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchRule::Exact => write!(f, "exact"),
            MatchRule::CaseInsensitive => write!(f, "case_insensitive"),
            MatchRule::WordBoundary => write!(f, "word_boundary"),
            MatchRule::Fallback => write!(f, "fallback"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Normalized {
    pub label: String,
    pub rule: MatchRule,
}

/// Maps a free-text reply onto exactly one label of a [`CategorySet`].
///
/// Rules are tried in order and the first hit wins:
/// 1. the trimmed reply equals a label;
/// 2. it equals a label ignoring case;
/// 3. a lower-cased label occurs in the lower-cased reply as a whole word, labels in set order;
/// 4. the first label of the set.
#[derive(Clone, Debug)]
pub struct LabelNormalizer {
    categories: CategorySet,
    whole_word: Vec<Regex>,
}

impl LabelNormalizer {
    pub fn new(categories: CategorySet) -> crate::Result<Self, ClassifyError> {
        let whole_word = categories
            .labels()
            .map(|label| {
                Regex::new(&format!(
                    r"(?:^|\W){}(?:\W|$)",
                    regex::escape(&label.to_lowercase())
                ))
                .map_err(|e| ClassifyError::configuration(format!("category `{label}`: {e}")))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            categories,
            whole_word,
        })
    }

    pub fn categories(&self) -> &CategorySet {
        &self.categories
    }

    /// Resolves a distribution key to a label by the exact and case-insensitive rules only.
    /// Keys that name no label are `None`; they never fall back.
    pub fn match_key(&self, key: &str) -> Option<Normalized> {
        let key = key.trim();
        if let Some(label) = self.categories.labels().find(|label| *label == key) {
            return Some(Normalized {
                label: label.to_string(),
                rule: MatchRule::Exact,
            });
        }
        let lowered = key.to_lowercase();
        self.categories
            .labels()
            .find(|label| label.to_lowercase() == lowered)
            .map(|label| Normalized {
                label: label.to_string(),
                rule: MatchRule::CaseInsensitive,
            })
    }

    pub fn normalize(&self, reply: &str) -> Normalized {
        let reply = reply.trim();

        if let Some(label) = self.categories.labels().find(|label| *label == reply) {
            return Normalized {
                label: label.to_string(),
                rule: MatchRule::Exact,
            };
        }

        let lowered = reply.to_lowercase();
        if let Some(label) = self
            .categories
            .labels()
            .find(|label| label.to_lowercase() == lowered)
        {
            return Normalized {
                label: label.to_string(),
                rule: MatchRule::CaseInsensitive,
            };
        }

        if let Some((label, _)) = self
            .categories
            .labels()
            .zip(&self.whole_word)
            .find(|(_, re)| re.is_match(&lowered))
        {
            return Normalized {
                label: label.to_string(),
                rule: MatchRule::WordBoundary,
            };
        }

        Normalized {
            label: self.categories.fallback().to_string(),
            rule: MatchRule::Fallback,
        }
    }
}
