//! Pour engine: cup volumes, selection and the fill / empty / pour rules.
//!
//! Every action returns the events it produced, in order, for the caller to
//! render. A rejected action leaves cup volumes and the step counter alone.

use std::fmt;

use crate::level::LevelDefinition;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Cup {
    capacity: u32,
    current: u32,
}

impl Cup {
    pub fn new(capacity: u32) -> Self {
        Self {
            capacity,
            current: 0,
        }
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    pub fn current(&self) -> u32 {
        self.current
    }

    pub fn is_full(&self) -> bool {
        self.current == self.capacity
    }

    pub fn is_empty(&self) -> bool {
        self.current == 0
    }

    /// Free space left before the cup overflows.
    pub fn room(&self) -> u32 {
        self.capacity - self.current
    }

    /// Fill level as a percentage of capacity (0.0 ..= 100.0).
    pub fn fill_percent(&self) -> f64 {
        if self.capacity == 0 {
            return 0.0;
        }
        self.current as f64 / self.capacity as f64 * 100.0
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Selection {
    #[default]
    Idle,
    Selected(usize),
}

impl Selection {
    pub fn index(self) -> Option<usize> {
        match self {
            Selection::Idle => None,
            Selection::Selected(i) => Some(i),
        }
    }
}

/// Full puzzle snapshot. Rebuilt from scratch whenever a level is loaded.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct PuzzleState {
    cups: Vec<Cup>,
    target: u32,
    steps: u32,
    selection: Selection,
    optimal_steps: u32,
    is_custom_level: bool,
}

impl PuzzleState {
    pub fn from_level(level: &LevelDefinition) -> Self {
        Self {
            cups: level.cups.iter().map(|&c| Cup::new(c)).collect(),
            target: level.target,
            steps: 0,
            selection: Selection::Idle,
            optimal_steps: level.optimal_steps().unwrap_or(0),
            is_custom_level: level.is_custom(),
        }
    }

    pub fn cups(&self) -> &[Cup] {
        &self.cups
    }

    pub fn target(&self) -> u32 {
        self.target
    }

    pub fn steps(&self) -> u32 {
        self.steps
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn optimal_steps(&self) -> u32 {
        self.optimal_steps
    }

    pub fn is_custom_level(&self) -> bool {
        self.is_custom_level
    }

    /// Won iff some single cup holds exactly the target volume.
    pub fn is_won(&self) -> bool {
        self.cups.iter().any(|c| c.current == self.target)
    }
}

/// Why an action was refused. Rendered as a short notification.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum RejectReason {
    SourceEmpty,
    DestinationFull,
    AlreadyFull,
    AlreadyEmpty,
    SameCup,
    NoSuchCup(usize),
}

impl RejectReason {
    pub fn message(self) -> &'static str {
        match self {
            RejectReason::SourceEmpty => "The source cup is empty!",
            RejectReason::DestinationFull => "The destination cup is already full!",
            RejectReason::AlreadyFull => "This cup is already full!",
            RejectReason::AlreadyEmpty => "This cup is already empty!",
            RejectReason::SameCup => "Pick a different cup to pour into.",
            RejectReason::NoSuchCup(_) => "There is no such cup.",
        }
    }
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EngineEvent {
    /// Any visible change (volumes, steps or selection). Carries the new state.
    StateChanged(PuzzleState),
    ActionRejected(RejectReason),
    /// A successful move took the puzzle from unsolved to solved. Further
    /// moves that keep a cup on the target do not repeat it; moving off the
    /// target and back does.
    Won(PuzzleState),
}

/// Single owner of the mutable puzzle state.
#[derive(Clone, Debug)]
pub struct PourEngine {
    state: PuzzleState,
    // Win status after the last successful move, for edge detection.
    won: bool,
}

impl PourEngine {
    pub fn new(level: &LevelDefinition) -> Self {
        let state = PuzzleState::from_level(level);
        Self {
            won: state.is_won(),
            state,
        }
    }

    pub fn state(&self) -> &PuzzleState {
        &self.state
    }

    pub fn is_won(&self) -> bool {
        self.state.is_won()
    }

    /// Replaces the whole state with a fresh one for `level`.
    pub fn reset(&mut self, level: &LevelDefinition) -> Vec<EngineEvent> {
        self.state = PuzzleState::from_level(level);
        self.won = self.state.is_won();
        log::debug!(
            "level loaded: cups={:?} target={}",
            level.cups,
            level.target
        );
        vec![EngineEvent::StateChanged(self.state.clone())]
    }

    /// Cup click. Selects, deselects, or pours from the selected cup into
    /// `index`; after a pour attempt the selection is always cleared.
    pub fn select_cup(&mut self, index: usize) -> Vec<EngineEvent> {
        if index >= self.state.cups.len() {
            return vec![EngineEvent::ActionRejected(RejectReason::NoSuchCup(index))];
        }
        match self.state.selection {
            Selection::Idle => {
                self.state.selection = Selection::Selected(index);
                vec![EngineEvent::StateChanged(self.state.clone())]
            }
            Selection::Selected(sel) if sel == index => {
                self.state.selection = Selection::Idle;
                vec![EngineEvent::StateChanged(self.state.clone())]
            }
            Selection::Selected(from) => {
                let poured = self.transfer(from, index);
                self.state.selection = Selection::Idle;
                match poured {
                    Ok(()) => self.after_move(),
                    Err(reason) => vec![
                        EngineEvent::ActionRejected(reason),
                        EngineEvent::StateChanged(self.state.clone()),
                    ],
                }
            }
        }
    }

    /// Fills the selected cup. Ignored when nothing is selected.
    pub fn fill(&mut self) -> Vec<EngineEvent> {
        match self.state.selection.index() {
            Some(i) => self.fill_cup(i),
            None => Vec::new(),
        }
    }

    /// Empties the selected cup. Ignored when nothing is selected.
    pub fn empty(&mut self) -> Vec<EngineEvent> {
        match self.state.selection.index() {
            Some(i) => self.empty_cup(i),
            None => Vec::new(),
        }
    }

    pub fn fill_cup(&mut self, index: usize) -> Vec<EngineEvent> {
        let Some(cup) = self.state.cups.get_mut(index) else {
            return vec![EngineEvent::ActionRejected(RejectReason::NoSuchCup(index))];
        };
        if cup.is_full() {
            return vec![EngineEvent::ActionRejected(RejectReason::AlreadyFull)];
        }
        cup.current = cup.capacity;
        self.state.selection = Selection::Idle;
        self.after_move()
    }

    pub fn empty_cup(&mut self, index: usize) -> Vec<EngineEvent> {
        let Some(cup) = self.state.cups.get_mut(index) else {
            return vec![EngineEvent::ActionRejected(RejectReason::NoSuchCup(index))];
        };
        if cup.is_empty() {
            return vec![EngineEvent::ActionRejected(RejectReason::AlreadyEmpty)];
        }
        cup.current = 0;
        self.state.selection = Selection::Idle;
        self.after_move()
    }

    /// Pours from `from` into `to` until `from` is empty or `to` is full.
    /// Leaves the selection untouched.
    pub fn pour(&mut self, from: usize, to: usize) -> Vec<EngineEvent> {
        match self.transfer(from, to) {
            Ok(()) => self.after_move(),
            Err(reason) => vec![EngineEvent::ActionRejected(reason)],
        }
    }

    fn transfer(&mut self, from: usize, to: usize) -> Result<(), RejectReason> {
        let len = self.state.cups.len();
        for i in [from, to] {
            if i >= len {
                return Err(RejectReason::NoSuchCup(i));
            }
        }
        if from == to {
            return Err(RejectReason::SameCup);
        }
        let src = self.state.cups[from];
        let dst = self.state.cups[to];
        if src.is_empty() {
            return Err(RejectReason::SourceEmpty);
        }
        let amount = src.current.min(dst.room());
        if amount == 0 {
            return Err(RejectReason::DestinationFull);
        }
        self.state.cups[from].current -= amount;
        self.state.cups[to].current += amount;
        log::debug!("poured {amount} from cup {from} into cup {to}");
        Ok(())
    }

    // Counts the step and checks for a win after a move that changed a volume.
    fn after_move(&mut self) -> Vec<EngineEvent> {
        self.state.steps += 1;
        let mut events = vec![EngineEvent::StateChanged(self.state.clone())];
        let won = self.state.is_won();
        if won && !self.won {
            log::info!("target {} reached in {} steps", self.state.target, self.state.steps);
            events.push(EngineEvent::Won(self.state.clone()));
        }
        self.won = won;
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn five_three() -> PourEngine {
        PourEngine::new(&LevelDefinition::catalog(1, vec![5, 3], 4, 6))
    }

    fn volumes(engine: &PourEngine) -> Vec<u32> {
        engine.state().cups().iter().map(Cup::current).collect()
    }

    fn won(events: &[EngineEvent]) -> usize {
        events
            .iter()
            .filter(|e| matches!(e, EngineEvent::Won(_)))
            .count()
    }

    #[test]
    fn new_state_is_empty_and_idle() {
        let engine = five_three();
        assert_eq!(volumes(&engine), vec![0, 0]);
        assert_eq!(engine.state().steps(), 0);
        assert_eq!(engine.state().selection(), Selection::Idle);
        assert_eq!(engine.state().optimal_steps(), 6);
        assert!(!engine.state().is_custom_level());
    }

    #[test]
    fn selecting_twice_deselects_without_cost() {
        let mut engine = five_three();
        engine.select_cup(1);
        assert_eq!(engine.state().selection(), Selection::Selected(1));
        engine.select_cup(1);
        assert_eq!(engine.state().selection(), Selection::Idle);
        assert_eq!(engine.state().steps(), 0);
    }

    #[test]
    fn pour_moves_until_destination_full() {
        let mut engine = five_three();
        engine.fill_cup(0);
        let events = engine.pour(0, 1);
        assert_eq!(volumes(&engine), vec![2, 3]);
        assert_eq!(engine.state().steps(), 2);
        assert!(matches!(events.as_slice(), [EngineEvent::StateChanged(_)]));
    }

    #[test]
    fn pour_moves_until_source_empty() {
        let mut engine = five_three();
        engine.fill_cup(1);
        engine.pour(1, 0);
        assert_eq!(volumes(&engine), vec![3, 0]);
    }

    #[test]
    fn pour_from_empty_is_rejected() {
        let mut engine = five_three();
        let events = engine.pour(0, 1);
        assert_eq!(
            events,
            vec![EngineEvent::ActionRejected(RejectReason::SourceEmpty)]
        );
        assert_eq!(engine.state().steps(), 0);
    }

    #[test]
    fn pour_into_full_is_rejected() {
        let mut engine = five_three();
        engine.fill_cup(0);
        engine.fill_cup(1);
        let before = engine.state().clone();
        let events = engine.pour(0, 1);
        assert_eq!(
            events,
            vec![EngineEvent::ActionRejected(RejectReason::DestinationFull)]
        );
        assert_eq!(engine.state(), &before);
    }

    #[test]
    fn pour_into_same_or_missing_cup_is_rejected() {
        let mut engine = five_three();
        engine.fill_cup(0);
        assert_eq!(
            engine.pour(0, 0),
            vec![EngineEvent::ActionRejected(RejectReason::SameCup)]
        );
        assert_eq!(
            engine.pour(0, 7),
            vec![EngineEvent::ActionRejected(RejectReason::NoSuchCup(7))]
        );
        assert_eq!(engine.state().steps(), 1);
    }

    #[test]
    fn select_then_select_other_pours_and_clears_selection() {
        let mut engine = five_three();
        engine.fill_cup(0);
        engine.select_cup(0);
        engine.select_cup(1);
        assert_eq!(volumes(&engine), vec![2, 3]);
        assert_eq!(engine.state().selection(), Selection::Idle);
    }

    #[test]
    fn failed_pour_via_selection_still_clears_selection() {
        let mut engine = five_three();
        engine.select_cup(0);
        let events = engine.select_cup(1);
        assert_eq!(
            events.first(),
            Some(&EngineEvent::ActionRejected(RejectReason::SourceEmpty))
        );
        assert!(matches!(events.last(), Some(EngineEvent::StateChanged(s)) if s.selection() == Selection::Idle));
        assert_eq!(engine.state().steps(), 0);
    }

    #[test]
    fn fill_and_empty_need_a_selection() {
        let mut engine = five_three();
        assert!(engine.fill().is_empty());
        assert!(engine.empty().is_empty());
        assert_eq!(engine.state().steps(), 0);
    }

    #[test]
    fn fill_clears_selection_but_rejection_keeps_it() {
        let mut engine = five_three();
        engine.select_cup(1);
        engine.fill();
        assert_eq!(volumes(&engine), vec![0, 3]);
        assert_eq!(engine.state().selection(), Selection::Idle);

        engine.select_cup(1);
        let events = engine.fill();
        assert_eq!(
            events,
            vec![EngineEvent::ActionRejected(RejectReason::AlreadyFull)]
        );
        assert_eq!(engine.state().selection(), Selection::Selected(1));
        assert_eq!(engine.state().steps(), 1);
    }

    #[test]
    fn empty_rejects_empty_cup() {
        let mut engine = five_three();
        engine.select_cup(0);
        assert_eq!(
            engine.empty(),
            vec![EngineEvent::ActionRejected(RejectReason::AlreadyEmpty)]
        );
        engine.fill();
        engine.select_cup(0);
        engine.empty();
        assert_eq!(volumes(&engine), vec![0, 0]);
        assert_eq!(engine.state().steps(), 2);
    }

    #[test]
    fn classic_solution_wins_once_in_six_steps() {
        let mut engine = five_three();
        let mut wins = 0;
        wins += won(&engine.fill_cup(0));
        wins += won(&engine.pour(0, 1));
        wins += won(&engine.empty_cup(1));
        wins += won(&engine.pour(0, 1));
        assert_eq!(volumes(&engine), vec![0, 2]);
        wins += won(&engine.fill_cup(0));
        assert_eq!(wins, 0);
        let last = engine.pour(0, 1);
        assert_eq!(volumes(&engine), vec![4, 3]);
        assert_eq!(won(&last), 1);
        assert_eq!(engine.state().steps(), 6);
        assert!(engine.is_won());
    }

    #[test]
    fn win_can_be_undone_by_further_moves() {
        let mut engine = PourEngine::new(&LevelDefinition::catalog(9, vec![4, 3], 3, 1));
        assert_eq!(won(&engine.fill_cup(1)), 1);
        engine.empty_cup(1);
        assert!(!engine.is_won());
    }

    #[test]
    fn won_fires_only_when_first_solved() {
        let mut engine = PourEngine::new(&LevelDefinition::catalog(9, vec![4, 3], 3, 1));
        assert_eq!(won(&engine.fill_cup(1)), 1);
        // Still solved: the 3-cup stays on target.
        assert_eq!(won(&engine.fill_cup(0)), 0);
        assert_eq!(won(&engine.empty_cup(0)), 0);
        assert!(engine.is_won());
        // Off the target and back again is a new win.
        engine.empty_cup(1);
        assert_eq!(won(&engine.fill_cup(1)), 1);
    }

    #[test]
    fn reset_rearms_win_detection() {
        let level = LevelDefinition::catalog(9, vec![4, 3], 3, 1);
        let mut engine = PourEngine::new(&level);
        assert_eq!(won(&engine.fill_cup(1)), 1);
        engine.reset(&level);
        assert_eq!(won(&engine.fill_cup(1)), 1);
    }

    #[test]
    fn reset_restores_initial_state() {
        let level = LevelDefinition::catalog(1, vec![5, 3], 4, 6);
        let mut engine = PourEngine::new(&level);
        let initial = engine.state().clone();
        engine.fill_cup(0);
        engine.pour(0, 1);
        engine.select_cup(0);
        engine.reset(&level);
        assert_eq!(engine.state(), &initial);
    }

    #[test]
    fn fill_percent_tracks_volume() {
        let mut engine = five_three();
        engine.fill_cup(0);
        engine.pour(0, 1);
        let cups = engine.state().cups();
        assert!((cups[0].fill_percent() - 40.0).abs() < 1e-9);
        assert!((cups[1].fill_percent() - 100.0).abs() < 1e-9);
    }
}
