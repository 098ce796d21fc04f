use alloc::vec::Vec;
use ndarray::Array2;

use super::*;

/// Purely random placement, optionally keeping one cell free of hazards so the first reveal is safe.
#[derive(Clone, Debug, PartialEq)]
pub struct RandomHazardGenerator {
    seed: u64,
    safe: Option<Position>,
}

impl RandomHazardGenerator {
    pub fn new(seed: u64, safe: Option<Position>) -> Self {
        Self { seed, safe }
    }
}

impl HazardGenerator for RandomHazardGenerator {
    fn generate(self, config: GameConfig) -> HazardLayout {
        use rand::prelude::*;

        let geometry = config.geometry();
        let total_cells = config.total_cells();

        let safe = self.safe.filter(|&pos| {
            if !geometry.contains(pos) {
                log::warn!("Safe cell {:?} is off the board, ignored", pos);
                return false;
            }
            true
        });

        let mut candidates: Vec<CellIndex> = (0..CellIndex::from(total_cells))
            .filter(|&index| Some(index) != safe.map(|pos| geometry.index_of(pos)))
            .collect();

        let max_hazards = total_cells.saturating_sub(1);
        let mut hazards = config.hazards;
        if hazards > max_hazards {
            log::warn!(
                "Too many hazards requested, {} but at most {} fit",
                hazards,
                max_hazards
            );
            hazards = max_hazards;
        }
        let hazards = usize::from(hazards).min(candidates.len());

        // partial shuffle: the first `hazards` candidates become the layout
        let mut rng = SmallRng::seed_from_u64(self.seed);
        for i in 0..hazards {
            let pick = rng.random_range(i..candidates.len());
            candidates.swap(i, pick);
        }

        let mut hazard_mask: Array2<bool> =
            Array2::default((config.size, config.size).to_nd_index());
        for &index in &candidates[..hazards] {
            if let Some(pos) = geometry.position_of(index) {
                hazard_mask[pos.to_nd_index()] = true;
            }
        }

        let layout = HazardLayout::from_hazard_mask(hazard_mask);
        if usize::from(layout.hazard_count()) != hazards {
            log::warn!(
                "Generated hazard count mismatch, actual: {}, requested: {}",
                layout.hazard_count(),
                hazards
            );
        }
        layout
    }
}
