//! Orchestrator phase state machine.
//!
//! # States
//! ```text
//! SettingUp → StartingPrimary → StartingSecondary → Running → ShuttingDown → Terminated
//! ```
//! `SettingUp`, `StartingPrimary` and `StartingSecondary` may also jump to
//! `ShuttingDown` on interrupt or spawn failure.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    SettingUp,
    StartingPrimary,
    StartingSecondary,
    Running,
    ShuttingDown,
    Terminated,
}

impl Phase {
    pub fn can_transition_to(self, next: Phase) -> bool {
        use Phase::*;
        matches!(
            (self, next),
            (SettingUp, StartingPrimary)
                | (StartingPrimary, StartingSecondary)
                | (StartingSecondary, Running)
                | (SettingUp | StartingPrimary | StartingSecondary | Running, ShuttingDown)
                | (ShuttingDown, Terminated)
        )
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::SettingUp => "setting-up",
            Phase::StartingPrimary => "starting-primary",
            Phase::StartingSecondary => "starting-secondary",
            Phase::Running => "running",
            Phase::ShuttingDown => "shutting-down",
            Phase::Terminated => "terminated",
        };
        f.write_str(name)
    }
}

/// Current phase plus the transitions taken so far.
#[derive(Debug, Clone)]
pub struct PhaseTracker {
    current: Phase,
    history: Vec<Phase>,
}

impl PhaseTracker {
    pub fn new() -> Self {
        Self {
            current: Phase::SettingUp,
            history: vec![Phase::SettingUp],
        }
    }

    pub fn current(&self) -> Phase {
        self.current
    }

    pub fn history(&self) -> &[Phase] {
        &self.history
    }

    /// Move to `next`. Illegal transitions are refused and logged; the
    /// current phase is left unchanged.
    pub fn advance(&mut self, next: Phase) -> bool {
        if !self.current.can_transition_to(next) {
            tracing::error!(from = %self.current, to = %next, "Illegal phase transition");
            return false;
        }
        tracing::debug!(from = %self.current, to = %next, "Phase transition");
        self.current = next;
        self.history.push(next);
        true
    }
}

impl Default for PhaseTracker {
    fn default() -> Self {
        Self::new()
    }
}
