//! Random draws and derived-stat formulas shared by every resolver.

use rand::{Rng, RngCore};

use crate::model::{Attribute, Attributes, Loadout, Player};

pub const WIN_RATE_FLOOR: f64 = 15.0;
pub const WIN_RATE_CEILING: f64 = 85.0;
pub const RECRUIT_RATE_FLOOR: f64 = 5.0;
pub const RECRUIT_RATE_CEILING: f64 = 95.0;

const BASE_TROOP_CAP: i64 = 500;
const TROOP_CAP_PER_LEADERSHIP: i64 = 10;
const TROOP_CAP_PER_CITY: i64 = 200;
const ALLY_TROOP_CAP_PER_LEADERSHIP: i64 = 20;
const UPKEEP_PER_CITY: i64 = 20;
/// Troops assumed for a garrisoned general with none assigned.
const DEFAULT_GARRISON_TROOPS: i64 = 500;

/// Uniform integer in `[min, max]`.
pub fn random_int(rng: &mut dyn RngCore, min: i64, max: i64) -> i64 {
    if max <= min {
        return min;
    }
    rng.random_range(min..=max)
}

pub fn random_float(rng: &mut dyn RngCore, min: f64, max: f64) -> f64 {
    if max <= min {
        return min;
    }
    rng.random_range(min..max)
}

/// Uniform draw in `[0, 100)`.
pub fn random_percent(rng: &mut dyn RngCore) -> f64 {
    rng.random_range(0.0..100.0)
}

/// Succeeds with `probability` percent chance. 0 never succeeds, 100 always does.
pub fn check_probability(rng: &mut dyn RngCore, probability: f64) -> bool {
    random_percent(rng) < probability
}

/// Uniformly pick an index into a collection of `len` items.
pub fn pick_index(rng: &mut dyn RngCore, len: usize) -> Option<usize> {
    (len > 0).then(|| rng.random_range(0..len))
}

pub fn pick<'a, T>(rng: &mut dyn RngCore, items: &'a [T]) -> Option<&'a T> {
    pick_index(rng, items.len()).map(|i| &items[i])
}

/// Pick up to `count` distinct items, in random order.
pub fn pick_many<T: Clone>(rng: &mut dyn RngCore, items: &[T], count: usize) -> Vec<T> {
    let mut pool: Vec<T> = items.to_vec();
    let mut picked = Vec::with_capacity(count.min(pool.len()));
    while picked.len() < count && !pool.is_empty() {
        let i = rng.random_range(0..pool.len());
        picked.push(pool.swap_remove(i));
    }
    picked
}

/// Firing chance of an event: every 10 destiny shifts it by `modifier`%.
pub fn event_probability(base: f64, destiny_modifier: f64, destiny: i32) -> f64 {
    let destiny_effect = (f64::from(destiny) / 10.0) * (destiny_modifier / 100.0);
    (base + destiny_effect).clamp(0.0, 100.0)
}

/// Chance (5–95%) of winning a general over.
pub fn recruitment_rate(charisma: i32, general_level: u32, bonus: i32) -> f64 {
    let rate = f64::from(charisma) * 2.0 - f64::from(general_level) * 5.0 + f64::from(bonus);
    rate.clamp(RECRUIT_RATE_FLOOR, RECRUIT_RATE_CEILING)
}

/// Chance (15–85%) that the attacker wins.
pub fn win_probability(player_power: i64, enemy_power: i64) -> f64 {
    let total = (player_power + enemy_power) as f64;
    let ratio = if total > 0.0 {
        player_power as f64 / total
    } else {
        0.5
    };
    (ratio * 100.0).clamp(WIN_RATE_FLOOR, WIN_RATE_CEILING)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CombatPower {
    pub base: f64,
    pub skills: f64,
    pub equipment: f64,
    pub troops: f64,
    pub total: i64,
}

fn player_weight(attr: Attribute) -> f64 {
    match attr {
        Attribute::Strength => 1.5,
        Attribute::Intelligence => 1.2,
        Attribute::Leadership => 1.0,
        _ => 0.8,
    }
}

fn general_weight(attr: Attribute) -> f64 {
    match attr {
        Attribute::Strength => 1.2,
        Attribute::Intelligence => 1.0,
        Attribute::Leadership => 0.8,
        _ => 0.5,
    }
}

fn weighted_equipment(loadout: &Loadout, weight: fn(Attribute) -> f64) -> f64 {
    loadout
        .items()
        .flat_map(|item| item.attribute_bonus.iter())
        .map(|(&attr, &bonus)| f64::from(bonus) * weight(attr))
        .sum()
}

pub fn player_combat_power(player: &Player) -> CombatPower {
    let a = &player.attributes;
    let base = f64::from(a.strength) * 1.5
        + f64::from(a.intelligence) * 1.2
        + f64::from(a.leadership) * 1.0;
    let skills = player.skill_combat_bonus();
    let equipment = weighted_equipment(&player.equipment, player_weight);
    let troops = (player.troops.max(0) as f64).sqrt() * 2.0;
    CombatPower {
        base,
        skills,
        equipment,
        troops,
        total: (base + skills + equipment + troops).floor() as i64,
    }
}

/// Attribute-and-gear power of a general, without troops.
pub fn general_combat_power(attributes: &Attributes, loadout: &Loadout) -> i64 {
    let base = f64::from(attributes.strength) * 1.2
        + f64::from(attributes.intelligence) * 1.0
        + f64::from(attributes.leadership) * 0.8
        + f64::from(attributes.politics) * 0.3
        + f64::from(attributes.charisma) * 0.5;
    (base + weighted_equipment(loadout, general_weight)).round() as i64
}

/// Power contributed by a general's troops when defending.
pub fn garrison_troop_power(troops: i64) -> f64 {
    let troops = if troops > 0 {
        troops
    } else {
        DEFAULT_GARRISON_TROOPS
    };
    (troops as f64).sqrt() * 1.5
}

pub fn troop_cap(leadership: i32, cities_controlled: u32) -> i64 {
    BASE_TROOP_CAP
        + i64::from(leadership) * TROOP_CAP_PER_LEADERSHIP
        + i64::from(cities_controlled) * TROOP_CAP_PER_CITY
}

pub fn ally_troop_cap(leadership: i32) -> i64 {
    i64::from(leadership) * ALLY_TROOP_CAP_PER_LEADERSHIP
}

pub fn upkeep_cost(cities_controlled: u32) -> i64 {
    i64::from(cities_controlled) * UPKEEP_PER_CITY
}
