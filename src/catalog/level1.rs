// Catalog level 1: the classic 5 / 3 jugs measuring 4.
use crate::level::LevelDefinition;

pub fn level1() -> LevelDefinition {
    LevelDefinition::catalog(1, vec![5, 3], 4, 6)
}
