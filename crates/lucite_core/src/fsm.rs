//! Flat state machines for widget interaction states
//!
//! Controls combine their toggle state and interaction state (idle, hovered,
//! pressed) into one flat machine; events drive transitions and the widget
//! reads the current state back when building its visuals.

/// Identifier for a state within a machine
pub type StateId = u32;

/// A single transition: `from --[event]--> to`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Transition {
    pub from: StateId,
    pub event: u32,
    pub to: StateId,
}

impl Transition {
    pub fn new(from: StateId, event: u32, to: StateId) -> Self {
        Self { from, event, to }
    }
}

/// A flat interaction state machine
#[derive(Clone, Debug)]
pub struct StateMachine {
    current: StateId,
    transitions: Vec<Transition>,
}

impl StateMachine {
    /// Start building a machine with the given initial state
    pub fn builder(initial: StateId) -> StateMachineBuilder {
        StateMachineBuilder {
            initial,
            transitions: Vec::new(),
        }
    }

    /// The current state
    pub fn current(&self) -> StateId {
        self.current
    }

    /// Force the machine into a state, bypassing transitions
    pub fn set_state(&mut self, state: StateId) {
        self.current = state;
    }

    /// Handle an event; returns the new state if a transition fired
    pub fn handle(&mut self, event: u32) -> Option<StateId> {
        let next = self
            .transitions
            .iter()
            .find(|t| t.from == self.current && t.event == event)
            .map(|t| t.to)?;
        self.current = next;
        Some(next)
    }
}

/// Builder for [`StateMachine`]
pub struct StateMachineBuilder {
    initial: StateId,
    transitions: Vec<Transition>,
}

impl StateMachineBuilder {
    /// Add a transition
    pub fn on(mut self, from: StateId, event: u32, to: StateId) -> Self {
        self.transitions.push(Transition::new(from, event, to));
        self
    }

    /// Finish building
    pub fn build(self) -> StateMachine {
        StateMachine {
            current: self.initial,
            transitions: self.transitions,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const IDLE: StateId = 0;
    const HOVERED: StateId = 1;
    const PRESSED: StateId = 2;

    const ENTER: u32 = 0;
    const LEAVE: u32 = 1;
    const DOWN: u32 = 2;
    const UP: u32 = 3;

    fn machine() -> StateMachine {
        StateMachine::builder(IDLE)
            .on(IDLE, ENTER, HOVERED)
            .on(HOVERED, LEAVE, IDLE)
            .on(HOVERED, DOWN, PRESSED)
            .on(PRESSED, UP, HOVERED)
            .build()
    }

    #[test]
    fn test_transitions() {
        let mut fsm = machine();
        assert_eq!(fsm.current(), IDLE);

        assert_eq!(fsm.handle(ENTER), Some(HOVERED));
        assert_eq!(fsm.handle(DOWN), Some(PRESSED));
        assert_eq!(fsm.handle(UP), Some(HOVERED));
        assert_eq!(fsm.handle(LEAVE), Some(IDLE));
    }

    #[test]
    fn test_unmatched_event_is_ignored() {
        let mut fsm = machine();
        // UP in idle has no transition; state is unchanged
        assert_eq!(fsm.handle(UP), None);
        assert_eq!(fsm.current(), IDLE);
    }

    #[test]
    fn test_force_state() {
        let mut fsm = machine();
        fsm.set_state(PRESSED);
        assert_eq!(fsm.current(), PRESSED);
        assert_eq!(fsm.handle(UP), Some(HOVERED));
    }
}
