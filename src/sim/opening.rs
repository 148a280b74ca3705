//! One-time setup between the draft and the first turn: the starting city,
//! its bonus, an occasional starting event, and the season.

use rand::RngCore;

use super::formulas::{check_probability, pick, random_int};
use crate::config::CampaignConfig;
use crate::content::Catalog;
use crate::error::PhaseError;
use crate::model::{
    Attribute, Faction, GameState, MessageCategory, Season, SpecialBonus, TurnMessage,
};

pub const STARTING_EVENT_CHANCE: f64 = 30.0;

const SEASONS: [Season; 4] = [Season::Spring, Season::Summer, Season::Autumn, Season::Winter];
const MENTOR_ATTRIBUTES: [Attribute; 3] = [
    Attribute::Intelligence,
    Attribute::Politics,
    Attribute::Charisma,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StartingEvent {
    Omen,
    Volunteers,
    MerchantPatron,
    Mentor,
}

const STARTING_EVENTS: [StartingEvent; 4] = [
    StartingEvent::Omen,
    StartingEvent::Volunteers,
    StartingEvent::MerchantPatron,
    StartingEvent::Mentor,
];

/// Choose the starting city: a random preferred id present in the catalog,
/// else the catalog's first city.
pub fn choose_start_city(
    catalog: &Catalog,
    config: &CampaignConfig,
    rng: &mut dyn RngCore,
) -> Option<String> {
    let preferred: Vec<&String> = config
        .preferred_start_cities
        .iter()
        .filter(|id| catalog.cities.iter().any(|c| &c.id == *id))
        .collect();
    pick(rng, &preferred)
        .map(|id| (*id).clone())
        .or_else(|| catalog.cities.first().map(|c| c.id.clone()))
}

fn opening(text: impl Into<String>) -> TurnMessage {
    TurnMessage::new(MessageCategory::Opening, text)
}

/// Set the campaign up for its first turn. Returns the opening report lines.
pub fn open_campaign(
    state: &mut GameState,
    catalog: &Catalog,
    config: &CampaignConfig,
    rng: &mut dyn RngCore,
) -> Result<Vec<TurnMessage>, PhaseError> {
    let mut messages = Vec::new();
    let city_id = choose_start_city(catalog, config, rng)
        .ok_or_else(|| PhaseError::Other("catalog has no cities".to_string()))?;
    let city = state
        .cities
        .get_mut(&city_id)
        .ok_or_else(|| PhaseError::UnknownCity(city_id.clone()))?;
    city.faction = Faction::Player;
    city.garrison.clear();
    let city_name = city.name.clone();
    let bonus = city.special_bonus.clone();
    messages.push(opening(format!("Your campaign begins in {city_name}.")));
    tracing::info!(city = %city_id, "starting city chosen");

    let player = &mut state.player;
    match bonus {
        Some(SpecialBonus::Politics) => {
            let gold = player.add_gold(random_int(rng, 100, 300));
            messages.push(opening(format!("A seat of government: +{gold} gold.")));
        }
        Some(SpecialBonus::Recruitment) => {
            let troops = player.gain_troops_capped(random_int(rng, 100, 200));
            messages.push(opening(format!("A recruiting ground: +{troops} troops.")));
        }
        Some(SpecialBonus::Trade) => {
            let gold = player.add_gold(random_int(rng, 150, 250));
            messages.push(opening(format!("A trading hub: +{gold} gold.")));
        }
        Some(SpecialBonus::Defense) => {
            let gain = player
                .attributes
                .adjust(Attribute::Leadership, random_int(rng, 3, 8) as i32);
            messages.push(opening(format!("A strategic fortress: leadership +{gain}.")));
        }
        Some(SpecialBonus::Custom(_)) | None => {}
    }

    if check_probability(rng, STARTING_EVENT_CHANCE) {
        if let Some(&event) = pick(rng, &STARTING_EVENTS) {
            let text = match event {
                StartingEvent::Omen => {
                    let gain = player
                        .attributes
                        .adjust(Attribute::Destiny, random_int(rng, 5, 15) as i32);
                    format!("Strange omens fill the sky: destiny +{gain}.")
                }
                StartingEvent::Volunteers => {
                    let troops = player.gain_troops_capped(random_int(rng, 50, 150));
                    format!("Volunteers rally to your banner: +{troops} troops.")
                }
                StartingEvent::MerchantPatron => {
                    let gold = player.add_gold(random_int(rng, 200, 500));
                    format!("A merchant offers patronage: +{gold} gold.")
                }
                StartingEvent::Mentor => {
                    let attr = pick(rng, &MENTOR_ATTRIBUTES)
                        .copied()
                        .unwrap_or(Attribute::Intelligence);
                    let gain = player.attributes.adjust(attr, random_int(rng, 5, 10) as i32);
                    format!("A wise mentor instructs you: {attr} +{gain}.")
                }
            };
            messages.push(opening(text));
        }
    }

    let season = pick(rng, &SEASONS).copied().unwrap_or(Season::Spring);
    state.season = Some(season);
    let text = match season {
        Season::Spring => {
            let troops = player.gain_troops_capped(random_int(rng, 20, 80));
            format!("Spring: recruits come easily, +{troops} troops.")
        }
        Season::Summer => {
            let gold = player.add_gold(random_int(rng, 50, 150));
            format!("Summer: a rich harvest, +{gold} gold.")
        }
        Season::Autumn => {
            let gain = player
                .attributes
                .adjust(Attribute::Politics, random_int(rng, 2, 6) as i32);
            format!("Autumn: a season for reflection, politics +{gain}.")
        }
        Season::Winter => {
            let gain = player
                .attributes
                .adjust(Attribute::Strength, random_int(rng, 2, 6) as i32);
            format!("Winter: the troops drill hard, strength +{gain}.")
        }
    };
    messages.push(opening(text));
    Ok(messages)
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;
    use crate::testutil::{assert_consistent, test_catalog, test_state};

    #[test]
    fn start_city_is_a_preferred_one() {
        let catalog = test_catalog();
        let config = CampaignConfig::default();
        let mut rng = SmallRng::seed_from_u64(1);
        for _ in 0..50 {
            let id = choose_start_city(&catalog, &config, &mut rng).unwrap();
            assert!(config.preferred_start_cities.contains(&id));
        }
    }

    #[test]
    fn missing_preferred_cities_fall_back_to_the_first() {
        let catalog = test_catalog();
        let config = CampaignConfig {
            preferred_start_cities: vec!["atlantis".to_string()],
            ..CampaignConfig::default()
        };
        let mut rng = SmallRng::seed_from_u64(1);
        assert_eq!(
            choose_start_city(&catalog, &config, &mut rng),
            Some(catalog.cities[0].id.clone())
        );
    }

    #[test]
    fn opening_takes_the_city_and_sets_a_season() {
        let catalog = test_catalog();
        let config = CampaignConfig::default();
        for seed in 0..30 {
            let mut state = test_state(&catalog);
            let mut rng = SmallRng::seed_from_u64(seed);
            let messages = open_campaign(&mut state, &catalog, &config, &mut rng).unwrap();

            let held: Vec<_> = state.player_cities().collect();
            assert_eq!(held.len(), 1);
            assert!(held[0].garrison.is_empty());
            assert!(state.season.is_some());
            assert!(messages.len() >= 2);
            assert!(messages.iter().all(|m| m.category == MessageCategory::Opening));
            assert_consistent(&state);
            assert!(state.player.gold >= config.starting_gold);
        }
    }
}
