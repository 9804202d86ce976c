//! Dialogue runner.
//!
//! Owns the policy engine plus one `SessionState` per open session and
//! serializes turns within each session. Sessions are fully isolated; the
//! runner is the seam where a transport layer would plug in.

use std::collections::HashMap;

use thiserror::Error;
use tracing::info;

use crate::domain::acts::SysAct;
use crate::domain::belief::BeliefState;
use crate::domain::foundation::SessionId;
use crate::domain::policy::PolicyEngine;
use crate::domain::session::SessionState;

/// Errors raised by the runner.
#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("unknown session {0}")]
    UnknownSession(SessionId),
}

/// Coordinates decisions across sessions.
pub struct DialogRunner {
    engine: PolicyEngine,
    sessions: HashMap<SessionId, SessionState>,
}

impl DialogRunner {
    /// Creates a runner over a policy engine.
    pub fn new(engine: PolicyEngine) -> Self {
        Self {
            engine,
            sessions: HashMap::new(),
        }
    }

    /// Opens a fresh session and returns its id.
    pub fn open_session(&mut self) -> SessionId {
        let session = SessionState::new(self.engine.config().max_turns);
        let id = *session.id();
        info!(session = %id, "session opened");
        self.sessions.insert(id, session);
        id
    }

    /// Closes a session, discarding its state.
    pub fn close_session(&mut self, id: &SessionId) -> Result<(), RunnerError> {
        self.sessions
            .remove(id)
            .map(|_| info!(session = %id, "session closed"))
            .ok_or(RunnerError::UnknownSession(*id))
    }

    /// Decides one turn for a session.
    pub fn run_turn(
        &mut self,
        id: &SessionId,
        belief: &BeliefState,
    ) -> Result<SysAct, RunnerError> {
        let session = self
            .sessions
            .get_mut(id)
            .ok_or(RunnerError::UnknownSession(*id))?;
        Ok(self.engine.decide(belief, session))
    }

    /// Read access to a session's state, for inspection.
    pub fn session(&self, id: &SessionId) -> Option<&SessionState> {
        self.sessions.get(id)
    }

    /// Number of open sessions.
    pub fn open_session_count(&self) -> usize {
        self.sessions.len()
    }
}
