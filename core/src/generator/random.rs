use alloc::collections::BTreeSet;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use rand::seq::index;

use super::*;

/// Uniformly random placement, every cell is equally likely to hold a mine.
///
/// The generator keeps its RNG between layouts, so successive games from the same seed are independent of
/// each other but reproducible as a sequence.
#[derive(Clone, Debug, PartialEq)]
pub struct RandomMinefieldGenerator {
    rng: SmallRng,
}

impl RandomMinefieldGenerator {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }
}

impl MinefieldGenerator for RandomMinefieldGenerator {
    fn generate(&mut self, config: GameConfig) -> MineLayout {
        let size = config.size();
        let total_cells = usize::from(config.total_cells());
        let mut mines = usize::from(config.mines);

        if mines > total_cells {
            log::warn!(
                "Minefield already full, requested {} but only fits {}",
                mines,
                total_cells
            );
            mines = total_cells;
        }

        let cols = usize::from(size.1);
        let mine_set: BTreeSet<Coord2> = index::sample(&mut self.rng, total_cells, mines)
            .into_iter()
            .map(|i| ((i / cols) as Coord, (i % cols) as Coord))
            .collect();
        log::debug!("Generated {} mines on a {:?} board", mine_set.len(), size);

        MineLayout::from_mine_set(size, mine_set)
    }
}
