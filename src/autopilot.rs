use crate::{entity::EntityId, farm::Farm};

/// Actions taken by one [`Autopilot::step`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AutopilotReport {
    pub harvested: usize,
    pub cured: usize,
    pub fed: usize,
}

/// Scripted player for headless runs: sells every egg, then cures the
/// sickest birds, then feeds anyone under `hunger_floor`, while money lasts.
#[derive(Debug, Clone)]
pub struct Autopilot {
    hunger_floor: f32,
}

impl Autopilot {
    pub fn new(hunger_floor: f32) -> Self {
        Self { hunger_floor }
    }

    pub fn step(&self, farm: &mut Farm) -> AutopilotReport {
        let mut report = AutopilotReport::default();

        for id in farm.world().egg_ids() {
            if farm.harvest(id) {
                report.harvested += 1;
            }
        }

        let mut sick: Vec<(EntityId, f32)> = farm
            .world()
            .chickens()
            .filter(|c| c.alive && c.is_sick())
            .map(|c| (c.id, c.sickness_time))
            .collect();
        sick.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
        for (id, _) in sick {
            if farm.cure(id) {
                report.cured += 1;
            }
        }

        let mut hungry: Vec<(EntityId, f32)> = farm
            .world()
            .chickens()
            .filter(|c| c.alive && c.hunger < self.hunger_floor)
            .map(|c| (c.id, c.hunger))
            .collect();
        hungry.sort_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)));
        for (id, _) in hungry {
            if farm.feed(id) {
                report.fed += 1;
            }
        }

        report
    }
}

impl Default for Autopilot {
    fn default() -> Self {
        Self::new(50.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario::Scenario;

    #[test]
    fn keeps_a_lone_chicken_alive() {
        let mut scenario = Scenario::with_seed("autopilot", 5);
        scenario.disease.outbreak_threshold = 0.0;
        let mut farm = Farm::new(&scenario).unwrap();
        let pilot = Autopilot::default();

        let mut fed = 0;
        farm.run_with_hook(0.5, 200, |farm| {
            fed += pilot.step(farm).fed;
        })
        .unwrap();

        assert!(farm.is_game_over());
        assert!(fed > 0);
        assert!(farm.final_score() >= 1);
    }

    #[test]
    fn cures_before_feeding() {
        let mut scenario = Scenario::with_seed("autopilot", 6);
        scenario.reproduction.lay_chance_base = 0.0;
        scenario.reproduction.lay_chance_per_hunger = 0.0;
        let mut farm = Farm::new(&scenario).unwrap();
        let id = farm.world().chicken_ids()[0];
        farm.advance(18.0).unwrap();
        farm.infect(id);

        let report = Autopilot::default().step(&mut farm);
        assert_eq!(report.cured, 1);
        assert_eq!(report.fed, 0);
        assert_eq!(farm.economy().money(), 3.0);
    }
}
