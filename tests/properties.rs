use coop::{
    components::{Chicken, MAX_HUNGER},
    economy::Economy,
    entity::EntityId,
    farm::Farm,
    scenario::{ChickenConfig, EconomyConfig, ReproductionConfig, Scenario},
    systems::separation,
};
use glam::Vec2;
use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn chicken(hunger: f32) -> Chicken {
    let mut rng = ChaCha8Rng::seed_from_u64(0);
    let mut chicken = Chicken::spawn(
        EntityId::from_raw(1),
        Vec2::ZERO,
        0.0,
        &ChickenConfig::default(),
        &ReproductionConfig::default(),
        &mut rng,
    );
    chicken.hunger = hunger;
    chicken
}

proptest! {
    #[test]
    fn feeding_never_overfills(hunger in 0.1f32..=100.0, amount in 0.0f32..500.0) {
        let mut hen = chicken(hunger);
        prop_assert!(hen.feed(amount));
        prop_assert!(hen.hunger <= MAX_HUNGER);
        prop_assert!(hen.hunger >= hunger);
    }

    #[test]
    fn hunger_falls_linearly(dt in 0.0f64..19.0) {
        let mut scenario = Scenario::with_seed("decay", 1);
        scenario.disease.outbreak_threshold = 0.0;
        let mut farm = Farm::new(&scenario).unwrap();
        let id = farm.world().chicken_ids()[0];
        farm.advance(dt).unwrap();
        let hen = farm.world().chicken(id).unwrap();
        prop_assert_eq!(hen.hunger, MAX_HUNGER - dt as f32 * 5.0);
    }

    #[test]
    fn purse_never_goes_negative(
        steps in proptest::collection::vec((0.0f64..3.0, 0.0f64..20.0), 1..60)
    ) {
        let mut economy = Economy::new(&EconomyConfig::default());
        for (dt, cost) in steps {
            economy.tick(dt);
            let before = economy.money();
            let spent = economy.spend(cost);
            prop_assert_eq!(spent, before >= cost);
            prop_assert!(economy.money() >= 0.0);
        }
    }

    #[test]
    fn distant_neighbours_do_not_push(
        x in -5.0f32..5.0,
        y in -5.0f32..5.0,
        offsets in proptest::collection::vec((0.7f32..3.0, 0.0f32..6.28), 0..8)
    ) {
        let position = Vec2::new(x, y);
        let neighbours = offsets
            .iter()
            .map(|(r, angle)| position + Vec2::new(angle.cos(), angle.sin()) * *r);
        prop_assert_eq!(separation(position, neighbours, 0.6), Vec2::ZERO);
    }

    #[test]
    fn close_neighbour_pushes_away(
        r in 0.05f32..0.55,
        angle in 0.0f32..6.28
    ) {
        let offset = Vec2::new(angle.cos(), angle.sin()) * r;
        let push = separation(Vec2::ZERO, [offset], 0.6);
        prop_assert!(push.dot(offset) < 0.0);
        prop_assert!(push.length() <= 1.0 + 1e-4);
    }
}
