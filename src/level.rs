//! Level definitions and custom-level validation.
//!
//! A level is a set of cup capacities plus a target volume. Catalog levels
//! carry their number and the known-optimal step count; custom levels are
//! built from user input and carry neither.

use thiserror::Error;

/// Whether a level came from the catalog or was typed in by the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LevelKind {
    Catalog { number: u32, optimal_steps: u32 },
    Custom,
}

/// Immutable description of a puzzle: cups (in display order) and the target.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LevelDefinition {
    pub kind: LevelKind,
    pub cups: Vec<u32>,
    pub target: u32,
}

impl LevelDefinition {
    /// Catalog entry. Catalog data is trusted, so no validation happens here.
    pub fn catalog(number: u32, cups: Vec<u32>, target: u32, optimal_steps: u32) -> Self {
        Self {
            kind: LevelKind::Catalog {
                number,
                optimal_steps,
            },
            cups,
            target,
        }
    }

    pub fn is_custom(&self) -> bool {
        matches!(self.kind, LevelKind::Custom)
    }

    pub fn number(&self) -> Option<u32> {
        match self.kind {
            LevelKind::Catalog { number, .. } => Some(number),
            LevelKind::Custom => None,
        }
    }

    pub fn optimal_steps(&self) -> Option<u32> {
        match self.kind {
            LevelKind::Catalog { optimal_steps, .. } => Some(optimal_steps),
            LevelKind::Custom => None,
        }
    }

    pub fn max_capacity(&self) -> u32 {
        self.cups.iter().copied().max().unwrap_or(0)
    }

    /// Checks the structural invariants shared by every level: at least two
    /// cups, all capacities and the target positive, target not above the
    /// largest capacity.
    pub fn validate(&self) -> Result<(), LevelError> {
        validate_shape(&self.cups, self.target)
    }
}

/// Why a level (custom input or loaded catalog record) was refused.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LevelError {
    #[error("{field} must be a positive integer (got {raw:?})")]
    InvalidInput { field: &'static str, raw: String },

    #[error("target {target} exceeds the largest cup capacity {max_capacity}")]
    UnreachableTarget { target: u32, max_capacity: u32 },

    #[error("a level needs at least two cups (got {count})")]
    TooFewCups { count: usize },
}

fn validate_shape(cups: &[u32], target: u32) -> Result<(), LevelError> {
    if cups.len() < 2 {
        return Err(LevelError::TooFewCups { count: cups.len() });
    }
    if let Some(zero) = cups.iter().find(|c| **c == 0) {
        return Err(LevelError::InvalidInput {
            field: "cup capacity",
            raw: zero.to_string(),
        });
    }
    if target == 0 {
        return Err(LevelError::InvalidInput {
            field: "target",
            raw: target.to_string(),
        });
    }
    let max_capacity = cups.iter().copied().max().unwrap_or(0);
    if target > max_capacity {
        return Err(LevelError::UnreachableTarget {
            target,
            max_capacity,
        });
    }
    Ok(())
}

/// Builds a two-cup custom level.
///
/// Only checks that the target fits under the larger cup. Targets that fit
/// but cannot actually be measured (e.g. odd target with cups 4 and 6) are
/// accepted.
pub fn build_custom_level(cup1: u32, cup2: u32, target: u32) -> Result<LevelDefinition, LevelError> {
    let cups = vec![cup1, cup2];
    validate_shape(&cups, target)?;
    log::debug!("custom level accepted: cups={cups:?} target={target}");
    Ok(LevelDefinition {
        kind: LevelKind::Custom,
        cups,
        target,
    })
}

/// Parses raw text input (as typed in the custom-level form) and builds the level.
pub fn parse_custom_level(cup1: &str, cup2: &str, target: &str) -> Result<LevelDefinition, LevelError> {
    let cup1 = parse_positive("cup 1 capacity", cup1)?;
    let cup2 = parse_positive("cup 2 capacity", cup2)?;
    let target = parse_positive("target", target)?;
    build_custom_level(cup1, cup2, target)
}

fn parse_positive(field: &'static str, raw: &str) -> Result<u32, LevelError> {
    match raw.trim().parse::<u32>() {
        Ok(v) if v > 0 => Ok(v),
        _ => Err(LevelError::InvalidInput {
            field,
            raw: raw.to_string(),
        }),
    }
}
