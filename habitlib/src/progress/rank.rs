//! Rank ladders and evaluation.
//!
//! A ladder is an ordered list of tiers, lowest first. Every tier of a ladder
//! uses the same requirement model: either a minimum XP or a map of minimum
//! completed counts per category. The current rank is the highest tier whose
//! requirement is fully met; when none is met the lowest tier is the floor.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::HabitError;
use crate::Result;

use super::xp::{CategoryCounts, ProgressTotals};

/// Which requirement model a ladder uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RankModel {
    /// Per-category completed-entry counts
    #[default]
    Categories,
    /// Minimum accumulated XP
    Xp,
}

/// What a tier demands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Requirement {
    MinXp(u64),
    Categories(BTreeMap<String, u64>),
}

impl Requirement {
    /// Category requirement from `(category, count)` pairs
    pub fn categories<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, u64)>,
        S: Into<String>,
    {
        Requirement::Categories(pairs.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    pub fn model(&self) -> RankModel {
        match self {
            Requirement::MinXp(_) => RankModel::Xp,
            Requirement::Categories(_) => RankModel::Categories,
        }
    }

    /// All parts must be met; partial credit does not count.
    pub fn is_met(&self, totals: &ProgressTotals) -> bool {
        match self {
            Requirement::MinXp(min) => totals.xp >= *min,
            Requirement::Categories(map) => map.iter().all(|(category, required)| {
                if !totals.by_category.contains(category) {
                    tracing::debug!(%category, "category has no completions yet, counting as 0");
                }
                totals.by_category.get(category) >= *required
            }),
        }
    }

    /// Per-part progress, in requirement order.
    pub fn progress(&self, totals: &ProgressTotals) -> Vec<RequirementProgress> {
        match self {
            Requirement::MinXp(min) => vec![RequirementProgress::new("XP", totals.xp, *min)],
            Requirement::Categories(map) => map
                .iter()
                .map(|(category, required)| {
                    RequirementProgress::new(
                        category.clone(),
                        totals.by_category.get(category),
                        *required,
                    )
                })
                .collect(),
        }
    }

    /// Smallest value of `category` that meeting this requirement guarantees.
    fn implied_minimum(&self, category: &str) -> u64 {
        match self {
            Requirement::MinXp(min) => *min,
            Requirement::Categories(map) => match map.get(category) {
                Some(value) => *value,
                None if category == CategoryCounts::TOTAL => map.values().sum(),
                None => 0,
            },
        }
    }

    /// Whether meeting `self` also meets `lower`.
    fn covers(&self, lower: &Requirement) -> bool {
        match (self, lower) {
            (Requirement::MinXp(high), Requirement::MinXp(low)) => high >= low,
            (Requirement::Categories(_), Requirement::Categories(low)) => low
                .iter()
                .all(|(category, value)| self.implied_minimum(category) >= *value),
            _ => false,
        }
    }
}

/// Progress toward one part of a requirement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequirementProgress {
    /// Category name, or "XP"
    pub label: String,
    pub current: u64,
    pub required: u64,
    pub met: bool,
}

impl RequirementProgress {
    fn new(label: impl Into<String>, current: u64, required: u64) -> Self {
        Self {
            label: label.into(),
            current,
            required,
            met: current >= required,
        }
    }
}

/// A named tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rank {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub requirement: Requirement,
}

impl Rank {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        requirement: Requirement,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            requirement,
        }
    }
}

/// Where a user stands on the ladder.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankStanding {
    /// Index of the current rank (0 = lowest)
    pub index: usize,
    pub rank: Rank,
    pub next: Option<Rank>,
    /// Progress toward each part of the next rank's requirement
    pub next_requirements: Vec<RequirementProgress>,
    /// XP still missing for the next rank (XP ladders only)
    pub xp_to_next: Option<u64>,
    /// Progress toward the next rank, 100 at the top of the ladder
    pub percent_to_next: f64,
}

/// One row of the full ladder view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankProgress {
    pub name: String,
    pub description: String,
    pub achieved: bool,
    pub current: bool,
    pub requirements: Vec<RequirementProgress>,
}

/// Rank movement between two sets of totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankChange {
    pub from: String,
    pub to: String,
    pub promoted: bool,
}

/// Ordered, single-model list of ranks (lowest first).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankLadder {
    ranks: Vec<Rank>,
    model: RankModel,
}

impl RankLadder {
    /// Build a ladder from tiers listed lowest first.
    pub fn new(ranks: Vec<Rank>) -> Result<Self> {
        let model = ranks
            .first()
            .map(|r| r.requirement.model())
            .ok_or(HabitError::EmptyRankLadder)?;
        if ranks.iter().any(|r| r.requirement.model() != model) {
            return Err(HabitError::MixedRankModels);
        }

        let ladder = Self { ranks, model };
        if !ladder.is_monotonic() {
            tracing::warn!("rank ladder is not monotonic: a higher tier asks for less than a lower one");
        }
        Ok(ladder)
    }

    /// Built-in category ladder.
    pub fn categories_default() -> Self {
        let ranks = vec![
            Rank::new(
                "Novice",
                "Complete your first challenge day to begin.",
                Requirement::categories([(CategoryCounts::TOTAL, 1)]),
            ),
            Rank::new(
                "Apprentice",
                "Complete days in two different categories.",
                Requirement::categories([("Health", 1), ("Personal Growth", 1)]),
            ),
            Rank::new(
                "Adept",
                "Complete 5 days across at least 3 categories.",
                Requirement::categories([("Health", 2), ("Personal Growth", 2), ("Wellness", 1)]),
            ),
            Rank::new(
                "Master",
                "Reach mastery with 10 completed days.",
                Requirement::categories([("Health", 4), ("Personal Growth", 3), ("Wellness", 3)]),
            ),
            Rank::new(
                "Grand Master",
                "A true habit expert.",
                Requirement::categories([("Health", 7), ("Personal Growth", 7), ("Wellness", 6)]),
            ),
            Rank::new(
                "Legend",
                "Discipline transcended.",
                Requirement::categories([
                    ("Health", 10),
                    ("Personal Growth", 10),
                    ("Wellness", 10),
                ]),
            ),
        ];
        Self {
            ranks,
            model: RankModel::Categories,
        }
    }

    /// Built-in XP ladder.
    pub fn xp_default() -> Self {
        let tiers = [
            ("Novice", 0),
            ("Apprentice", 10),
            ("Adept", 30),
            ("Master", 75),
            ("Grand Master", 150),
            ("Legend", 300),
        ];
        let ranks = tiers
            .iter()
            .map(|(name, min)| {
                Rank::new(
                    *name,
                    format!("Earn {} XP.", min),
                    Requirement::MinXp(*min),
                )
            })
            .collect();
        Self {
            ranks,
            model: RankModel::Xp,
        }
    }

    pub fn for_model(model: RankModel) -> Self {
        match model {
            RankModel::Categories => Self::categories_default(),
            RankModel::Xp => Self::xp_default(),
        }
    }

    pub fn ranks(&self) -> &[Rank] {
        &self.ranks
    }

    pub fn model(&self) -> RankModel {
        self.model
    }

    /// Each tier's requirement covers the one below it.
    pub fn is_monotonic(&self) -> bool {
        self.ranks
            .windows(2)
            .all(|pair| pair[1].requirement.covers(&pair[0].requirement))
    }

    /// Index of the highest tier whose requirement is met (0 when none is).
    pub fn evaluate_index(&self, totals: &ProgressTotals) -> usize {
        self.ranks
            .iter()
            .rposition(|rank| rank.requirement.is_met(totals))
            .unwrap_or(0)
    }

    /// The current rank for the given totals.
    pub fn evaluate(&self, totals: &ProgressTotals) -> &Rank {
        &self.ranks[self.evaluate_index(totals)]
    }

    /// Current rank plus progress toward the next one.
    pub fn standing(&self, totals: &ProgressTotals) -> RankStanding {
        let index = self.evaluate_index(totals);
        let rank = self.ranks[index].clone();
        let next = self.ranks.get(index + 1).cloned();

        let next_requirements = next
            .as_ref()
            .map(|n| n.requirement.progress(totals))
            .unwrap_or_default();

        let (xp_to_next, percent_to_next) = match (&rank.requirement, next.as_ref()) {
            (_, None) => (None, 100.0),
            (Requirement::MinXp(floor), Some(n)) => {
                let target = match n.requirement {
                    Requirement::MinXp(min) => min,
                    Requirement::Categories(_) => *floor,
                };
                let span = target.saturating_sub(*floor).max(1) as f64;
                let gained = totals.xp.saturating_sub(*floor) as f64;
                (
                    Some(target.saturating_sub(totals.xp)),
                    (gained / span * 100.0).floor().clamp(0.0, 100.0),
                )
            }
            (Requirement::Categories(_), Some(_)) => (None, mean_fraction(&next_requirements)),
        };

        tracing::debug!(rank = %rank.name, index, percent_to_next, "evaluated rank");

        RankStanding {
            index,
            rank,
            next,
            next_requirements,
            xp_to_next,
            percent_to_next,
        }
    }

    /// Every tier with its achieved/current flags and requirement progress.
    pub fn progress(&self, totals: &ProgressTotals) -> Vec<RankProgress> {
        let current = self.evaluate_index(totals);
        self.ranks
            .iter()
            .enumerate()
            .map(|(i, rank)| RankProgress {
                name: rank.name.clone(),
                description: rank.description.clone(),
                achieved: i <= current,
                current: i == current,
                requirements: rank.requirement.progress(totals),
            })
            .collect()
    }

    /// Rank movement from `before` to `after`, if any.
    pub fn rank_change(
        &self,
        before: &ProgressTotals,
        after: &ProgressTotals,
    ) -> Option<RankChange> {
        let from = self.evaluate_index(before);
        let to = self.evaluate_index(after);
        (from != to).then(|| RankChange {
            from: self.ranks[from].name.clone(),
            to: self.ranks[to].name.clone(),
            promoted: to > from,
        })
    }
}

/// Average completion of each requirement part, in percent.
fn mean_fraction(parts: &[RequirementProgress]) -> f64 {
    if parts.is_empty() {
        return 100.0;
    }
    let sum: f64 = parts
        .iter()
        .map(|p| {
            if p.required == 0 {
                1.0
            } else {
                (p.current as f64 / p.required as f64).min(1.0)
            }
        })
        .sum();
    (sum / parts.len() as f64 * 100.0).floor()
}
