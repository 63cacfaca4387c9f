//! Widget context - manages widget registration, FSMs, and dirty tracking
//!
//! The context is the coordinator controls share: it owns each widget's
//! interaction state machine, tracks which widgets changed since the host
//! last rebuilt, and hands out the transition scheduler handle that lift
//! feedback goes through.

use rustc_hash::FxHashSet;
use slotmap::SlotMap;

use lucite_animation::SchedulerHandle;
use lucite_core::{Event, StateId, StateMachine};

use crate::widget::WidgetId;

/// Per-widget data stored in the context
struct WidgetData {
    /// Interaction state machine (if the widget has one)
    fsm: Option<StateMachine>,
}

/// The central widget coordinator
pub struct WidgetContext {
    widgets: SlotMap<WidgetId, WidgetData>,
    dirty: FxHashSet<WidgetId>,
    scheduler: SchedulerHandle,
}

impl WidgetContext {
    /// Create a context over a transition scheduler
    pub fn new(scheduler: SchedulerHandle) -> Self {
        Self {
            widgets: SlotMap::with_key(),
            dirty: FxHashSet::default(),
            scheduler,
        }
    }

    /// The scheduler handle widgets create lift elements against
    pub fn scheduler(&self) -> SchedulerHandle {
        self.scheduler.clone()
    }

    /// Register a widget with no interaction machine
    pub fn register_widget(&mut self) -> WidgetId {
        self.widgets.insert(WidgetData { fsm: None })
    }

    /// Register a widget with an interaction state machine
    pub fn register_widget_with_fsm(&mut self, fsm: StateMachine) -> WidgetId {
        self.widgets.insert(WidgetData { fsm: Some(fsm) })
    }

    /// Remove a widget
    pub fn remove_widget(&mut self, id: WidgetId) {
        self.widgets.remove(id);
        self.dirty.remove(&id);
    }

    /// Check if a widget is registered
    pub fn is_registered(&self, id: WidgetId) -> bool {
        self.widgets.contains_key(id)
    }

    /// Current FSM state of a widget
    pub fn fsm_state(&self, id: WidgetId) -> Option<StateId> {
        self.widgets
            .get(id)
            .and_then(|data| data.fsm.as_ref())
            .map(StateMachine::current)
    }

    /// Force a widget's FSM into a state (programmatic value changes)
    pub fn set_fsm_state(&mut self, id: WidgetId, state: StateId) {
        if let Some(fsm) = self.widgets.get_mut(id).and_then(|data| data.fsm.as_mut()) {
            fsm.set_state(state);
            self.dirty.insert(id);
        }
    }

    /// Feed an event into a widget's FSM
    ///
    /// Returns the new state if a transition fired; the widget is marked
    /// dirty when it does.
    pub fn dispatch_event(&mut self, id: WidgetId, event: &Event) -> Option<StateId> {
        let next = self
            .widgets
            .get_mut(id)
            .and_then(|data| data.fsm.as_mut())
            .and_then(|fsm| fsm.handle(event.event_type));
        if let Some(state) = next {
            tracing::trace!(?id, state, "widget state changed");
            self.dirty.insert(id);
        }
        next
    }

    /// Mark a widget as needing a rebuild
    pub fn mark_dirty(&mut self, id: WidgetId) {
        self.dirty.insert(id);
    }

    /// Check if a widget is dirty
    pub fn is_dirty(&self, id: WidgetId) -> bool {
        self.dirty.contains(&id)
    }

    /// Take the set of dirty widgets, clearing it
    pub fn take_dirty(&mut self) -> Vec<WidgetId> {
        self.dirty.drain().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lucite_animation::TransitionScheduler;
    use lucite_core::event_types;

    fn context() -> (TransitionScheduler, WidgetContext) {
        let scheduler = TransitionScheduler::new();
        let ctx = WidgetContext::new(scheduler.handle());
        (scheduler, ctx)
    }

    #[test]
    fn test_register_and_remove() {
        let (_scheduler, mut ctx) = context();
        let id = ctx.register_widget();
        assert!(ctx.is_registered(id));
        ctx.remove_widget(id);
        assert!(!ctx.is_registered(id));
    }

    #[test]
    fn test_dispatch_marks_dirty_on_transition() {
        let (_scheduler, mut ctx) = context();
        let fsm = StateMachine::builder(0)
            .on(0, event_types::POINTER_ENTER, 1)
            .build();
        let id = ctx.register_widget_with_fsm(fsm);

        // No transition for this event: stays clean
        ctx.dispatch_event(id, &Event::of(event_types::POINTER_UP));
        assert!(!ctx.is_dirty(id));

        let next = ctx.dispatch_event(id, &Event::of(event_types::POINTER_ENTER));
        assert_eq!(next, Some(1));
        assert!(ctx.is_dirty(id));

        let drained = ctx.take_dirty();
        assert_eq!(drained, vec![id]);
        assert!(!ctx.is_dirty(id));
    }
}
