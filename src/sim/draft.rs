//! The pre-game skill draft.
//!
//! Each round offers a handful of skills from the catalog. The player buys at
//! most one per round with stars, or skips. When the last round closes,
//! leftover stars become attribute points and the campaign moves to play.

use std::collections::BTreeMap;

use rand::{Rng, RngCore};
use serde::Serialize;

use super::effects::apply_effect;
use super::formulas::{check_probability, pick, pick_many, random_int};
use crate::config::CampaignConfig;
use crate::content::Catalog;
use crate::error::DraftError;
use crate::model::{Attribute, GamePhase, GameState, Skill};

pub const POINTS_PER_STAR: u32 = 10;
/// Leftover stars at or above this earn a lump bonus on one attribute.
pub const BONUS_STAR_THRESHOLD: u32 = 5;

const LOW_COST_MAX: u32 = 2;
const HIGH_COST_MIN: u32 = 2;
const ROUND_TWO_LOW_COST_CHANCE: f64 = 60.0;
/// Stars needed for the last round to lean toward expensive skills.
const HIGH_COST_BUDGET: u32 = 3;
/// Lottery weights are reshuffled after this many points.
const REWEIGHT_EVERY: u32 = 10;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkillDraft {
    /// Skills offered this round.
    pub offered: Vec<Skill>,
    /// Ids bought so far, in order.
    pub selected: Vec<String>,
    pub remaining_stars: u32,
    /// 1-based. Exceeds `max_rounds` once the draft is complete.
    pub round: u32,
    pub max_rounds: u32,
    skills_per_round: usize,
}

/// Where the draft stands after a command.
#[derive(Debug, Clone, PartialEq)]
pub enum DraftStep {
    NextRound,
    Complete(StarConversion),
}

/// Attribute points bought with leftover stars.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StarConversion {
    pub stars: u32,
    pub points: u32,
    pub gains: BTreeMap<Attribute, i32>,
    pub bonus: Option<(Attribute, i32)>,
}

impl SkillDraft {
    /// Open round one.
    pub fn start(config: &CampaignConfig, catalog: &Catalog, rng: &mut dyn RngCore) -> Self {
        let mut draft = Self {
            offered: Vec::new(),
            selected: Vec::new(),
            remaining_stars: config.star_budget,
            round: 1,
            max_rounds: config.draft_rounds,
            skills_per_round: config.skills_per_round,
        };
        if draft.is_complete() {
            return draft;
        }
        draft.generate_choices(catalog, rng);
        draft
    }

    pub fn is_complete(&self) -> bool {
        self.round > self.max_rounds
    }

    /// Draw this round's offer.
    ///
    /// Round one offers only cheap skills, round two usually does, and the last
    /// round prefers expensive ones when the budget allows. If the biased pool
    /// is too small, the whole catalog (minus purchases) is used instead.
    pub fn generate_choices(&mut self, catalog: &Catalog, rng: &mut dyn RngCore) {
        let not_selected = |s: &&Skill| !self.selected.contains(&s.id);
        let mut pool: Vec<&Skill> = catalog.skills.iter().collect();
        match self.round {
            1 => pool.retain(|s| s.star_cost <= LOW_COST_MAX),
            2 => {
                if check_probability(rng, ROUND_TWO_LOW_COST_CHANCE) {
                    pool.retain(|s| s.star_cost <= LOW_COST_MAX);
                }
            }
            _ => {
                if self.remaining_stars >= HIGH_COST_BUDGET {
                    let expensive: Vec<&Skill> = pool
                        .iter()
                        .copied()
                        .filter(|s| s.star_cost >= HIGH_COST_MIN)
                        .collect();
                    if expensive.len() >= self.skills_per_round {
                        pool = expensive;
                    }
                }
            }
        }
        pool.retain(not_selected);
        if pool.len() < self.skills_per_round {
            pool = catalog.skills.iter().filter(not_selected).collect();
        }

        self.offered = pick_many(rng, &pool, self.skills_per_round)
            .into_iter()
            .cloned()
            .collect();
        tracing::debug!(
            round = self.round,
            offered = ?self.offered.iter().map(|s| s.id.as_str()).collect::<Vec<_>>(),
            "draft round opened"
        );
    }

    /// Buy an offered skill. Its effects apply to the player at once.
    pub fn select(
        &mut self,
        state: &mut GameState,
        catalog: &Catalog,
        skill_id: &str,
        rng: &mut dyn RngCore,
    ) -> Result<DraftStep, DraftError> {
        if self.is_complete() {
            return Err(DraftError::Closed);
        }
        let skill = self
            .offered
            .iter()
            .find(|s| s.id == skill_id)
            .cloned()
            .ok_or_else(|| DraftError::NotOffered(skill_id.to_string()))?;
        if skill.star_cost > self.remaining_stars {
            return Err(DraftError::Unaffordable {
                skill: skill.id,
                cost: skill.star_cost,
                remaining: self.remaining_stars,
            });
        }

        self.remaining_stars -= skill.star_cost;
        self.selected.push(skill.id.clone());
        for effect in &skill.effects {
            apply_effect(state, catalog, &effect.kind, rng);
        }
        tracing::info!(
            skill = %skill.id,
            cost = skill.star_cost,
            remaining = self.remaining_stars,
            "skill selected"
        );
        state.player.skills.push(skill);
        Ok(self.advance(state, catalog, rng))
    }

    pub fn skip(
        &mut self,
        state: &mut GameState,
        catalog: &Catalog,
        rng: &mut dyn RngCore,
    ) -> Result<DraftStep, DraftError> {
        if self.is_complete() {
            return Err(DraftError::Closed);
        }
        tracing::debug!(round = self.round, "draft round skipped");
        Ok(self.advance(state, catalog, rng))
    }

    /// Close a draft that opened with no rounds to play.
    pub fn finish(
        &mut self,
        state: &mut GameState,
        rng: &mut dyn RngCore,
    ) -> Result<DraftStep, DraftError> {
        if !self.is_complete() || state.phase != GamePhase::SkillSelection {
            return Err(DraftError::Closed);
        }
        Ok(self.complete(state, rng))
    }

    fn advance(
        &mut self,
        state: &mut GameState,
        catalog: &Catalog,
        rng: &mut dyn RngCore,
    ) -> DraftStep {
        self.round += 1;
        if !self.is_complete() {
            self.generate_choices(catalog, rng);
            return DraftStep::NextRound;
        }
        self.complete(state, rng)
    }

    fn complete(&mut self, state: &mut GameState, rng: &mut dyn RngCore) -> DraftStep {
        self.offered.clear();
        let conversion = convert_stars(state, self.remaining_stars, rng);
        state.phase = GamePhase::Playing;
        tracing::info!(
            skills = self.selected.len(),
            leftover_stars = conversion.stars,
            points = conversion.points,
            "draft complete"
        );
        DraftStep::Complete(conversion)
    }
}

/// Spend `stars * 10` points on visible attributes by weighted lottery.
///
/// Each attribute starts with a weight in 1..=4; after every tenth point one
/// random attribute's weight is redrawn in 1..=5. Five or more stars also
/// grant 2..=5 extra points to one random attribute.
pub fn convert_stars(state: &mut GameState, stars: u32, rng: &mut dyn RngCore) -> StarConversion {
    let attributes = &mut state.player.attributes;
    let points = stars * POINTS_PER_STAR;
    let mut weights: [u32; 5] = std::array::from_fn(|_| random_int(rng, 1, 4) as u32);
    let mut gains: BTreeMap<Attribute, i32> = BTreeMap::new();

    for i in 0..points {
        let total: u32 = weights.iter().sum();
        let mut ticket = rng.random_range(0..total);
        let slot = weights
            .iter()
            .position(|&w| {
                if ticket < w {
                    true
                } else {
                    ticket -= w;
                    false
                }
            })
            .unwrap_or(0);
        let attr = Attribute::VISIBLE[slot];
        *gains.entry(attr).or_default() += attributes.adjust(attr, 1);

        if i % REWEIGHT_EVERY == REWEIGHT_EVERY - 1 {
            let slot = rng.random_range(0..weights.len());
            weights[slot] = random_int(rng, 1, 5) as u32;
        }
    }

    let bonus = if stars >= BONUS_STAR_THRESHOLD {
        pick(rng, &Attribute::VISIBLE).copied().map(|attr| {
            let amount = random_int(rng, 2, 5) as i32;
            (attr, attributes.adjust(attr, amount))
        })
    } else {
        None
    };

    StarConversion {
        stars,
        points,
        gains,
        bonus,
    }
}
