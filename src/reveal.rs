//! Scroll-reveal state. Each tracked element is either active or not; the
//! two thresholds form a dead band so elements hovering near the viewport
//! edge don't flicker.

use std::collections::HashMap;
use std::hash::Hash;

use crate::config::RevealConfig;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RevealState {
    pub active: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Transition {
    Activate,
    Deactivate,
}

impl Transition {
    fn resulting_state(self) -> RevealState {
        RevealState {
            active: self == Transition::Activate,
        }
    }

    /// Width a progress bar should render with after this transition.
    pub fn bar_width(self, declared: &str) -> &str {
        match self {
            Transition::Activate => declared,
            Transition::Deactivate => "0",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hysteresis {
    pub activate_above: f64,
    pub deactivate_below: f64,
}

impl Hysteresis {
    pub fn new(activate_above: f64, deactivate_below: f64) -> Self {
        Self {
            activate_above,
            deactivate_below,
        }
    }

    /// Transition `ratio` would cause from `state`, without taking it.
    pub fn next(&self, state: RevealState, ratio: f64) -> Option<Transition> {
        if !state.active && ratio > self.activate_above {
            Some(Transition::Activate)
        } else if state.active && ratio < self.deactivate_below {
            Some(Transition::Deactivate)
        } else {
            None
        }
    }

    /// Feed one visibility ratio. Returns the transition taken, if any.
    pub fn step(&self, state: &mut RevealState, ratio: f64) -> Option<Transition> {
        let transition = self.next(*state, ratio)?;
        *state = transition.resulting_state();
        Some(transition)
    }
}

impl From<&RevealConfig> for Hysteresis {
    fn from(cfg: &RevealConfig) -> Self {
        Self::new(cfg.activate_above, cfg.deactivate_below)
    }
}

/// Activation state per tracked element, keyed by whatever identifies the
/// element on the host side.
#[derive(Debug)]
pub struct RevealTracker<K> {
    hysteresis: Hysteresis,
    states: HashMap<K, RevealState>,
}

impl<K: Hash + Eq> RevealTracker<K> {
    pub fn new(hysteresis: Hysteresis) -> Self {
        Self {
            hysteresis,
            states: HashMap::new(),
        }
    }

    pub fn register(&mut self, key: K) {
        self.states.entry(key).or_default();
    }

    /// Unregistered keys are ignored.
    pub fn observe(&mut self, key: &K, ratio: f64) -> Option<Transition> {
        let state = self.states.get_mut(key)?;
        self.hysteresis.step(state, ratio)
    }

    /// Like `observe`, but leaves the state alone until `commit`. Lets the
    /// caller record a transition only once it has been rendered.
    pub fn pending(&self, key: &K, ratio: f64) -> Option<Transition> {
        let state = self.states.get(key)?;
        self.hysteresis.next(*state, ratio)
    }

    pub fn commit(&mut self, key: &K, transition: Transition) {
        if let Some(state) = self.states.get_mut(key) {
            *state = transition.resulting_state();
        }
    }

    pub fn is_active(&self, key: &K) -> bool {
        self.states.get(key).is_some_and(|s| s.active)
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}
