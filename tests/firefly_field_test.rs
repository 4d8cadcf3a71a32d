use glowgate::data_structures::fireflies::{
    FIREFLY_COUNT, FIREFLY_HEIGHT, FIREFLY_SPREAD, FireflyField,
};
use rand::{SeedableRng, rngs::StdRng};

#[test]
fn should_scatter_exactly_fifty_particles() {
    let field = FireflyField::scatter();

    assert_eq!(field.positions.len(), FIREFLY_COUNT);
    assert_eq!(field.scales.len(), FIREFLY_COUNT);
    assert_eq!(field.len(), FIREFLY_COUNT);
    assert!(!field.is_empty());
}

#[test]
fn should_keep_every_particle_inside_the_envelope() {
    let half = FIREFLY_SPREAD / 2.0;

    for seed in 0..32u64 {
        let mut rng = StdRng::seed_from_u64(seed);
        let field = FireflyField::generate(&mut rng);

        for position in &field.positions {
            assert!(
                (-half..=half).contains(&position[0]),
                "x out of range: {}",
                position[0]
            );
            assert!(
                (0.0..=FIREFLY_HEIGHT).contains(&position[1]),
                "y out of range: {}",
                position[1]
            );
            assert!(
                (-half..=half).contains(&position[2]),
                "z out of range: {}",
                position[2]
            );
        }
        for scale in &field.scales {
            assert!((0.0..=1.0).contains(scale), "scale out of range: {}", scale);
        }
    }
}

#[test]
fn should_reproduce_the_layout_for_a_fixed_seed() {
    let first = FireflyField::generate(&mut StdRng::seed_from_u64(7));
    let second = FireflyField::generate(&mut StdRng::seed_from_u64(7));

    assert_eq!(first.positions, second.positions);
    assert_eq!(first.scales, second.scales);
}
