use crate::*;
pub use random::*;

mod random;

pub trait MinefieldGenerator {
    /// Produces a layout for `config`, which has already been validated.
    fn generate(&mut self, config: GameConfig) -> MineLayout;
}

/// A fixed layout always generates itself, restarting a board built from it replays the same game.
impl MinefieldGenerator for MineLayout {
    fn generate(&mut self, config: GameConfig) -> MineLayout {
        if config != self.game_config() {
            log::warn!(
                "Fixed layout ignores requested config {:?}, keeping {:?}",
                config,
                self.game_config()
            );
        }
        self.clone()
    }
}
