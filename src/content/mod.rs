//! Static game content: skills, cities, generals, equipment, and events.
//!
//! A [`Catalog`] is read-only once loaded. Campaigns never hold references into
//! it; [`Catalog::instantiate`] deep-copies the mutable parts into a fresh
//! [`GameState`].

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use serde::de::DeserializeOwned;

use crate::config::CampaignConfig;
use crate::error::ContentError;
use crate::model::{
    City, Equipment, GameEvent, GamePhase, GameSettings, GameState, General, Loadout, Player,
    Skill,
};

const SKILLS_FILE: &str = "skills.json";
const CITIES_FILE: &str = "cities.json";
const GENERALS_FILE: &str = "generals.json";
const EQUIPMENT_FILE: &str = "equipment.json";
const EVENTS_FILE: &str = "events.json";

/// Outcome weights may drift from 100 by float rounding only.
const OUTCOME_TOTAL_TOLERANCE: f64 = 1e-6;

#[derive(Debug, Clone)]
pub struct Catalog {
    pub skills: Vec<Skill>,
    pub cities: Vec<City>,
    pub generals: Vec<General>,
    pub equipment: Vec<Equipment>,
    pub events: Vec<GameEvent>,
}

/// Raw JSON text of each catalog file.
pub struct CatalogSources<'a> {
    pub skills: &'a str,
    pub cities: &'a str,
    pub generals: &'a str,
    pub equipment: &'a str,
    pub events: &'a str,
}

impl Catalog {
    /// The content bundled with the crate.
    pub fn builtin() -> Result<Self, ContentError> {
        Self::from_json_strs(CatalogSources {
            skills: include_str!("../../data/skills.json"),
            cities: include_str!("../../data/cities.json"),
            generals: include_str!("../../data/generals.json"),
            equipment: include_str!("../../data/equipment.json"),
            events: include_str!("../../data/events.json"),
        })
    }

    /// Load every catalog file from `dir` and validate the result.
    pub fn load_dir(dir: &Path) -> Result<Self, ContentError> {
        let read = |file: &str| {
            let path = dir.join(file);
            std::fs::read_to_string(&path).map_err(|source| ContentError::Io { path, source })
        };
        let skills = read(SKILLS_FILE)?;
        let cities = read(CITIES_FILE)?;
        let generals = read(GENERALS_FILE)?;
        let equipment = read(EQUIPMENT_FILE)?;
        let events = read(EVENTS_FILE)?;
        Self::from_json_strs(CatalogSources {
            skills: &skills,
            cities: &cities,
            generals: &generals,
            equipment: &equipment,
            events: &events,
        })
    }

    pub fn from_json_strs(sources: CatalogSources<'_>) -> Result<Self, ContentError> {
        let catalog = Self {
            skills: parse(SKILLS_FILE, sources.skills)?,
            cities: parse(CITIES_FILE, sources.cities)?,
            generals: parse(GENERALS_FILE, sources.generals)?,
            equipment: parse(EQUIPMENT_FILE, sources.equipment)?,
            events: parse(EVENTS_FILE, sources.events)?,
        };
        catalog.validate()?;
        tracing::info!(
            skills = catalog.skills.len(),
            cities = catalog.cities.len(),
            generals = catalog.generals.len(),
            equipment = catalog.equipment.len(),
            events = catalog.events.len(),
            "content catalog loaded"
        );
        Ok(catalog)
    }

    /// Reject content the simulation cannot run against.
    pub fn validate(&self) -> Result<(), ContentError> {
        if self.cities.is_empty() {
            return Err(ContentError::NoCities);
        }
        unique_ids("skill", self.skills.iter().map(|s| s.id.as_str()))?;
        unique_ids("city", self.cities.iter().map(|c| c.id.as_str()))?;
        unique_ids("general", self.generals.iter().map(|g| g.id.as_str()))?;
        unique_ids("equipment", self.equipment.iter().map(|e| e.id.as_str()))?;
        unique_ids("event", self.events.iter().map(|e| e.id.as_str()))?;

        for skill in &self.skills {
            if !(1..=3).contains(&skill.star_cost) {
                return Err(ContentError::StarCost {
                    skill: skill.id.clone(),
                    cost: skill.star_cost,
                });
            }
        }

        let cities: BTreeMap<&str, &City> =
            self.cities.iter().map(|c| (c.id.as_str(), c)).collect();
        let general_ids: HashSet<&str> = self.generals.iter().map(|g| g.id.as_str()).collect();
        for city in &self.cities {
            for target in &city.connections {
                let other = cities.get(target.as_str()).ok_or_else(|| {
                    ContentError::UnknownConnection {
                        city: city.id.clone(),
                        target: target.clone(),
                    }
                })?;
                if !other.is_adjacent_to(&city.id) {
                    return Err(ContentError::AsymmetricConnection {
                        city: city.id.clone(),
                        target: target.clone(),
                    });
                }
            }
            if let Some(general) = city
                .garrison
                .iter()
                .find(|g| !general_ids.contains(g.as_str()))
            {
                return Err(ContentError::UnknownGarrison {
                    city: city.id.clone(),
                    general: general.clone(),
                });
            }
        }

        for event in &self.events {
            if event.outcomes.is_empty() {
                return Err(ContentError::NoOutcomes {
                    event: event.id.clone(),
                });
            }
            if !event.resolves_by_choice() {
                let total: f64 = event.outcomes.iter().map(|o| o.probability).sum();
                if (total - 100.0).abs() > OUTCOME_TOTAL_TOLERANCE {
                    return Err(ContentError::OutcomeTotal {
                        event: event.id.clone(),
                        total,
                    });
                }
            }
        }
        Ok(())
    }

    pub fn total_cities(&self) -> usize {
        self.cities.len()
    }

    pub fn skill(&self, id: &str) -> Option<&Skill> {
        self.skills.iter().find(|s| s.id == id)
    }

    /// Build a fresh campaign state in the draft phase.
    ///
    /// Cities and generals are cloned out of the catalog, so nothing the
    /// campaign does can reach back into the templates.
    pub fn instantiate(&self, config: &CampaignConfig) -> GameState {
        let mut settings = GameSettings::default();
        settings.set_speed(config.game_speed);
        GameState {
            player: Player {
                name: config.player_name.clone(),
                level: 1,
                attributes: config.starting_attributes,
                skills: Vec::new(),
                equipment: Loadout::new(),
                gold: config.starting_gold,
                troops: config.starting_troops,
                max_troops: config.starting_max_troops,
                cities_controlled: 1,
                battles_won: 0,
                battles_lost: 0,
                generals_recruited: 0,
                maintenance_cost: 0,
            },
            cities: self
                .cities
                .iter()
                .map(|c| (c.id.clone(), c.clone()))
                .collect(),
            generals: self.generals.clone(),
            current_turn: 0,
            phase: GamePhase::SkillSelection,
            outcome: None,
            season: None,
            settings,
            turns_without_events: 0,
            event_history: Vec::new(),
            message_log: Vec::new(),
        }
    }
}

fn parse<T: DeserializeOwned>(file: &str, text: &str) -> Result<Vec<T>, ContentError> {
    serde_json::from_str(text).map_err(|source| ContentError::Parse {
        file: file.to_string(),
        source,
    })
}

fn unique_ids<'a>(
    kind: &'static str,
    ids: impl Iterator<Item = &'a str>,
) -> Result<(), ContentError> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(ContentError::DuplicateId {
                kind,
                id: id.to_string(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Faction;

    #[test]
    fn builtin_catalog_loads() {
        let catalog = Catalog::builtin().unwrap();
        assert!(catalog.skills.len() >= 9);
        assert!(catalog.cities.len() >= 10);
        assert!(!catalog.events.is_empty());
    }

    #[test]
    fn builtin_contains_preferred_start_cities() {
        let catalog = Catalog::builtin().unwrap();
        for id in CampaignConfig::default().preferred_start_cities {
            assert!(catalog.cities.iter().any(|c| c.id == id), "missing {id}");
        }
    }

    #[test]
    fn instantiate_copies_cities() {
        let catalog = Catalog::builtin().unwrap();
        let mut state = catalog.instantiate(&CampaignConfig::default());
        let id = catalog.cities[0].id.clone();
        state.cities.get_mut(&id).unwrap().faction = Faction::Player;
        assert_ne!(catalog.cities[0].faction, Faction::Player);
        assert_eq!(state.phase, GamePhase::SkillSelection);
        assert_eq!(state.player.cities_controlled, 1);
    }

    #[test]
    fn asymmetric_connection_is_rejected() {
        let mut catalog = Catalog::builtin().unwrap();
        let first = catalog.cities[0].id.clone();
        let lonely = catalog
            .cities
            .iter()
            .find(|c| c.id != first && !c.is_adjacent_to(&first))
            .map(|c| c.id.clone())
            .unwrap();
        catalog.cities[0].connections.push(lonely);
        assert!(matches!(
            catalog.validate(),
            Err(ContentError::AsymmetricConnection { .. })
        ));
    }

    #[test]
    fn outcome_total_must_be_100() {
        let mut catalog = Catalog::builtin().unwrap();
        let event = catalog
            .events
            .iter_mut()
            .find(|e| !e.resolves_by_choice())
            .unwrap();
        event.outcomes[0].probability += 5.0;
        assert!(matches!(
            catalog.validate(),
            Err(ContentError::OutcomeTotal { .. })
        ));
    }

    #[test]
    fn parse_error_names_the_file() {
        let err = parse::<Skill>(SKILLS_FILE, "[{").unwrap_err();
        assert!(err.to_string().contains("skills.json"));
    }
}
