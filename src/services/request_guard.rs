use std::sync::{
    atomic::{AtomicU8, Ordering},
    Arc,
};

use serde::Serialize;

use crate::errors::{AppError, AppResult};

/// What the session is waiting on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Activity {
    Idle,
    Generating,
    AwaitingReply,
}

impl Activity {
    fn as_u8(self) -> u8 {
        match self {
            Activity::Idle => 0,
            Activity::Generating => 1,
            Activity::AwaitingReply => 2,
        }
    }

    fn from_u8(value: u8) -> Self {
        match value {
            1 => Activity::Generating,
            2 => Activity::AwaitingReply,
            _ => Activity::Idle,
        }
    }
}

impl std::fmt::Display for Activity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Activity::Idle => write!(f, "idle"),
            Activity::Generating => write!(f, "generating questions"),
            Activity::AwaitingReply => write!(f, "awaiting a tutor reply"),
        }
    }
}

/// The single request-in-flight token of a session. At most one model call
/// may hold it; everyone else is turned away until it is released.
#[derive(Debug, Clone, Default)]
pub struct RequestGate {
    state: Arc<AtomicU8>,
}

/// Held for the duration of one model call; releases the gate on drop.
#[derive(Debug)]
pub struct RequestToken {
    state: Arc<AtomicU8>,
    activity: Activity,
}

impl RequestGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn try_acquire(&self, activity: Activity) -> AppResult<RequestToken> {
        if activity == Activity::Idle {
            return Err(AppError::InternalError(
                "cannot acquire the request gate for idle".to_string(),
            ));
        }

        self.state
            .compare_exchange(
                Activity::Idle.as_u8(),
                activity.as_u8(),
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .map(|_| RequestToken {
                state: Arc::clone(&self.state),
                activity,
            })
            .map_err(|current| {
                AppError::RequestInFlight(format!(
                    "session is {}",
                    Activity::from_u8(current)
                ))
            })
    }

    pub fn current(&self) -> Activity {
        Activity::from_u8(self.state.load(Ordering::Acquire))
    }
}

impl RequestToken {
    pub fn activity(&self) -> Activity {
        self.activity
    }
}

impl Drop for RequestToken {
    fn drop(&mut self) {
        self.state.store(Activity::Idle.as_u8(), Ordering::Release);
    }
}
