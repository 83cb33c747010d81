// Catalog level 2: three cups, target 7 in the 8-cup.
use crate::level::LevelDefinition;

pub fn level2() -> LevelDefinition {
    LevelDefinition::catalog(2, vec![8, 5, 3], 7, 8)
}
