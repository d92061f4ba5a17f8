//! Lifecycle notifications for presentation collaborators (audio cues, UI
//! popups). Nothing in the simulation reads them back.

use glam::Vec2;
use serde::Serialize;

use crate::entity::{DeathCause, EntityId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InfectionSource {
    Outbreak,
    Contagion,
    Manual,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum FarmEvent {
    Spawned { chicken: EntityId, position: Vec2 },
    Died { chicken: EntityId, cause: DeathCause },
    EggLaid { egg: EntityId, by: EntityId, golden: bool },
    Hatched { egg: EntityId, chicken: EntityId },
    Infected { chicken: EntityId, source: InfectionSource },
    BecameCritical { chicken: EntityId },
    Cured { chicken: EntityId },
    Fed { chicken: EntityId, hunger: f32 },
    Harvested { egg: EntityId, reward: f64, golden: bool },
    OutbreakStarted { remaining: f64 },
}

/// Running counts over a drained event stream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EventTally {
    pub hatched: usize,
    pub eggs_laid: usize,
    pub golden_eggs: usize,
    pub starved: usize,
    pub died_of_disease: usize,
    pub infections: usize,
    pub cured: usize,
    pub outbreak_started: bool,
}

impl EventTally {
    pub fn record(&mut self, event: &FarmEvent) {
        match event {
            FarmEvent::Hatched { .. } => self.hatched += 1,
            FarmEvent::EggLaid { golden, .. } => {
                self.eggs_laid += 1;
                if *golden {
                    self.golden_eggs += 1;
                }
            }
            FarmEvent::Died { cause, .. } => match cause {
                DeathCause::Starvation => self.starved += 1,
                DeathCause::Disease => self.died_of_disease += 1,
            },
            FarmEvent::Infected { .. } => self.infections += 1,
            FarmEvent::Cured { .. } => self.cured += 1,
            FarmEvent::OutbreakStarted { .. } => self.outbreak_started = true,
            FarmEvent::Spawned { .. }
            | FarmEvent::BecameCritical { .. }
            | FarmEvent::Fed { .. }
            | FarmEvent::Harvested { .. } => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(raw: u64) -> EntityId {
        EntityId::from_raw(raw)
    }

    #[test]
    fn tally_counts_by_kind() {
        let mut tally = EventTally::default();
        for event in [
            FarmEvent::EggLaid { egg: id(2), by: id(1), golden: true },
            FarmEvent::EggLaid { egg: id(3), by: id(1), golden: false },
            FarmEvent::Hatched { egg: id(2), chicken: id(4) },
            FarmEvent::Died { chicken: id(1), cause: DeathCause::Disease },
            FarmEvent::Infected { chicken: id(4), source: InfectionSource::Outbreak },
            FarmEvent::OutbreakStarted { remaining: 50.0 },
            FarmEvent::Fed { chicken: id(4), hunger: 80.0 },
        ] {
            tally.record(&event);
        }
        assert_eq!(tally.eggs_laid, 2);
        assert_eq!(tally.golden_eggs, 1);
        assert_eq!(tally.hatched, 1);
        assert_eq!(tally.died_of_disease, 1);
        assert_eq!(tally.starved, 0);
        assert_eq!(tally.infections, 1);
        assert!(tally.outbreak_started);
    }

    #[test]
    fn event_json_is_tagged() {
        let event = FarmEvent::Died { chicken: id(7), cause: DeathCause::Starvation };
        let json = serde_json::to_value(event).unwrap();
        assert_eq!(json["event"], "died");
        assert_eq!(json["cause"], "starvation");
        assert_eq!(json["chicken"], 7);
    }
}
