//! The ambient firefly particle field.
//!
//! A fixed-count set of points scattered through the clearing: a 6x2x6 box
//! centred on the ground plane. Each particle also carries a scale factor
//! weighting its rendered size. The layout is sampled fresh at startup;
//! there is no seed capture, so two runs scatter differently.

use rand::Rng;

/// Number of fireflies in the field.
pub const FIREFLY_COUNT: usize = 50;

/// Horizontal spread of the field; x and z land in [-SPREAD/2, SPREAD/2].
pub const FIREFLY_SPREAD: f32 = 6.0;

/// Vertical extent of the field; y lands in [0, HEIGHT].
pub const FIREFLY_HEIGHT: f32 = 2.0;

/// Positions and per-particle scales for the firefly field.
#[derive(Clone, Debug)]
pub struct FireflyField {
    pub positions: Vec<[f32; 3]>,
    pub scales: Vec<f32>,
}

impl FireflyField {
    /// Scatter [`FIREFLY_COUNT`] particles with the process-wide RNG.
    pub fn scatter() -> Self {
        Self::generate(&mut rand::rng())
    }

    /// Scatter the field with a caller-supplied RNG.
    ///
    /// Per particle the draw order is x, y, z, scale; four independent
    /// uniform draws.
    pub fn generate<R: Rng>(rng: &mut R) -> Self {
        let mut positions = Vec::with_capacity(FIREFLY_COUNT);
        let mut scales = Vec::with_capacity(FIREFLY_COUNT);

        for _ in 0..FIREFLY_COUNT {
            let x = (rng.random_range(0.0..1.0f32) - 0.5) * FIREFLY_SPREAD;
            let y = rng.random_range(0.0..1.0f32) * FIREFLY_HEIGHT;
            let z = (rng.random_range(0.0..1.0f32) - 0.5) * FIREFLY_SPREAD;
            positions.push([x, y, z]);
            scales.push(rng.random_range(0.0..1.0f32));
        }

        Self { positions, scales }
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}
