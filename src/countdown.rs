//! Countdown state machine for a single pending shutdown.
//!
//! ```text
//! Idle ──start/bypass──▶ Active ──tick (reaches 0) / bypass──▶ Expired ──▶ Idle
//!                           │
//!                           └──────────cancel──────────▶ Cancelled ──▶ Idle
//! ```
//!
//! At most one session is active at a time. `start` while a session is active does
//! nothing, which is what keeps a second schedule match or a repeated poll from
//! restarting or duplicating the countdown.
//!
//! `Cancelled` and `Expired` are terminal for a session but never observable as a
//! resting state: the machine resets to `Idle` in the same call and reports what
//! happened through the returned [`Transition`]. Callers act on the transition (emit
//! events, run the shutdown) exactly once.
//!
//! The machine does no timing of its own. It is advanced by calling [`Countdown::tick`]
//! once per second from whatever pulse source the caller owns.

use serde::{Deserialize, Serialize};

/// Default countdown length in seconds (10 minutes)
pub const DEFAULT_COUNTDOWN_SECS: u32 = 600;

/// Identifier of one countdown session, unique within a [`Countdown`]
pub type SessionId = u64;

/// Countdown state
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CountdownState {
    /// No countdown in progress
    #[default]
    Idle,
    /// Counting down towards shutdown
    Active,
    /// Cancelled by the user
    ///
    /// Terminal state of a session. The machine passes through it and lands in `Idle`
    /// within the same call, so [`Countdown::state`] never reports it; it appears as
    /// [`EndReason::terminal_state`] for callers that show how a session ended.
    Cancelled,
    /// Reached zero or was bypassed
    ///
    /// Terminal state of a session, never held between calls (see `Cancelled`).
    Expired,
}

/// Why a countdown session ended
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EndReason {
    /// The countdown reached zero or was bypassed; shutdown follows
    Expired,
    /// The user cancelled the countdown; no shutdown
    Cancelled,
}

impl EndReason {
    /// The terminal state a session ending this way passed through
    pub fn terminal_state(self) -> CountdownState {
        match self {
            EndReason::Expired => CountdownState::Expired,
            EndReason::Cancelled => CountdownState::Cancelled,
        }
    }
}

/// Outcome of a single state machine operation
#[must_use]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Transition {
    /// The operation had no effect in the current state
    Ignored,
    /// A new session became active
    Started {
        /// The new session
        session: SessionId,
        /// Seconds until expiry
        seconds_remaining: u32,
    },
    /// An active session counted down one second and is still active
    Ticked {
        /// The ticking session
        session: SessionId,
        /// Seconds until expiry
        seconds_remaining: u32,
    },
    /// A session ended; the machine is back in `Idle`
    Ended {
        /// The session that ended
        session: SessionId,
        /// Whether it expired or was cancelled
        reason: EndReason,
    },
}

impl Transition {
    /// Whether this transition ended a session by expiry
    pub fn is_expired(&self) -> bool {
        matches!(
            self,
            Transition::Ended {
                reason: EndReason::Expired,
                ..
            }
        )
    }
}

/// Point-in-time view of a countdown, for display
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountdownStatus {
    /// Current state (`Idle` or `Active`)
    pub state: CountdownState,
    /// Seconds until expiry; the default duration while idle
    pub seconds_remaining: u32,
    /// The active session, if any
    pub session: Option<SessionId>,
}

/// The countdown state machine
#[derive(Clone, Debug)]
pub struct Countdown {
    state: CountdownState,
    seconds_remaining: u32,
    default_secs: u32,
    session: SessionId,
}

impl Countdown {
    /// Create an idle countdown whose resting duration is `default_secs`
    pub fn new(default_secs: u32) -> Self {
        Self {
            state: CountdownState::Idle,
            seconds_remaining: default_secs,
            default_secs,
            session: 0,
        }
    }

    /// Current state; always `Idle` or `Active` between calls
    pub fn state(&self) -> CountdownState {
        self.state
    }

    /// Seconds until expiry (the default duration while idle)
    pub fn seconds_remaining(&self) -> u32 {
        self.seconds_remaining
    }

    /// Whether a session is active
    pub fn is_active(&self) -> bool {
        self.state == CountdownState::Active
    }

    /// The active session, if any
    pub fn active_session(&self) -> Option<SessionId> {
        self.is_active().then_some(self.session)
    }

    /// Duration restored after a session ends
    pub fn default_secs(&self) -> u32 {
        self.default_secs
    }

    /// Change the duration restored after a session ends
    ///
    /// An active session keeps its remaining time. An idle countdown shows the new
    /// default immediately.
    pub fn set_default_secs(&mut self, default_secs: u32) {
        self.default_secs = default_secs;
        if !self.is_active() {
            self.seconds_remaining = default_secs;
        }
    }

    /// Snapshot for display
    pub fn status(&self) -> CountdownStatus {
        CountdownStatus {
            state: self.state,
            seconds_remaining: self.seconds_remaining,
            session: self.active_session(),
        }
    }

    /// Begin a countdown of `duration_secs`
    ///
    /// Does nothing if a session is already active: the running countdown is neither
    /// reset nor restarted. A zero duration starts and expires a session at once.
    pub fn start(&mut self, duration_secs: u32) -> Transition {
        if self.is_active() {
            return Transition::Ignored;
        }
        self.session += 1;
        self.state = CountdownState::Active;
        self.seconds_remaining = duration_secs;

        if duration_secs == 0 {
            return self.finish(EndReason::Expired);
        }
        Transition::Started {
            session: self.session,
            seconds_remaining: duration_secs,
        }
    }

    /// Advance an active countdown by one second
    ///
    /// Ignored unless a session is active, so stray pulses arriving after a reset are
    /// harmless. Reports expiry exactly once per session.
    pub fn tick(&mut self) -> Transition {
        if !self.is_active() {
            return Transition::Ignored;
        }
        self.seconds_remaining = self.seconds_remaining.saturating_sub(1);
        if self.seconds_remaining == 0 {
            return self.finish(EndReason::Expired);
        }
        Transition::Ticked {
            session: self.session,
            seconds_remaining: self.seconds_remaining,
        }
    }

    /// Cancel the active countdown and suppress its expiry
    ///
    /// Ignored when no session is active, so repeated cancels are harmless.
    pub fn cancel(&mut self) -> Transition {
        if !self.is_active() {
            return Transition::Ignored;
        }
        self.finish(EndReason::Cancelled)
    }

    /// Expire immediately ("shut down now")
    ///
    /// Fast-forwards the active session if there is one; otherwise creates a session
    /// and expires it in the same step. Never produces two sessions.
    pub fn bypass(&mut self) -> Transition {
        if !self.is_active() {
            self.session += 1;
            self.state = CountdownState::Active;
        }
        self.seconds_remaining = 0;
        self.finish(EndReason::Expired)
    }

    // Passes through Cancelled/Expired and lands in Idle within one call.
    fn finish(&mut self, reason: EndReason) -> Transition {
        self.state = CountdownState::Idle;
        self.seconds_remaining = self.default_secs;
        Transition::Ended {
            session: self.session,
            reason,
        }
    }
}

impl Default for Countdown {
    fn default() -> Self {
        Self::new(DEFAULT_COUNTDOWN_SECS)
    }
}
