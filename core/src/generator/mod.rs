use crate::*;
pub use random::*;

mod random;

pub trait HazardGenerator {
    fn generate(self, config: GameConfig) -> HazardLayout;
}
