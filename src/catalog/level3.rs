// Catalog level 3: 7 / 4 cups measuring 5.
use crate::level::LevelDefinition;

pub fn level3() -> LevelDefinition {
    LevelDefinition::catalog(3, vec![7, 4], 5, 6)
}
