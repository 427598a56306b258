//! Lifecycle events and callback sinks
//!
//! ```text
//! forward :      BEGIN                                   COMPLETE
//! forward :      START    END      START    END      START    END
//! |--------------[XXXXXXXXXX]------[XXXXXXXXXX]------[XXXXXXXXXX]
//! backward:      bEND  bSTART      bEND  bSTART      bEND  bSTART
//! backward:      bCOMPLETE                                 bBEGIN
//! ```

use std::ops::{BitOr, BitOrAssign};

use crate::state::TweenState;

/// A lifecycle event fired during an update.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TweenEvent {
    /// Right after the delay, if any
    Begin,
    /// At each iteration beginning
    Start,
    /// At each iteration ending, before the repeat delay
    End,
    /// At the last END event
    Complete,
    /// At the beginning of the first backward iteration
    BackBegin,
    /// At each backward iteration beginning, after the repeat delay
    BackStart,
    /// At each backward iteration ending
    BackEnd,
    /// At the last BACK_END event
    BackComplete,
}

impl TweenEvent {
    pub const ALL: [TweenEvent; 8] = [
        TweenEvent::Begin,
        TweenEvent::Start,
        TweenEvent::End,
        TweenEvent::Complete,
        TweenEvent::BackBegin,
        TweenEvent::BackStart,
        TweenEvent::BackEnd,
        TweenEvent::BackComplete,
    ];

    const fn bit(self) -> u8 {
        1 << self as u8
    }
}

/// Set of events a callback is interested in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Triggers(u8);

impl Triggers {
    pub const NONE: Triggers = Triggers(0);
    pub const BEGIN: Triggers = Triggers(TweenEvent::Begin.bit());
    pub const START: Triggers = Triggers(TweenEvent::Start.bit());
    pub const END: Triggers = Triggers(TweenEvent::End.bit());
    pub const COMPLETE: Triggers = Triggers(TweenEvent::Complete.bit());
    pub const BACK_BEGIN: Triggers = Triggers(TweenEvent::BackBegin.bit());
    pub const BACK_START: Triggers = Triggers(TweenEvent::BackStart.bit());
    pub const BACK_END: Triggers = Triggers(TweenEvent::BackEnd.bit());
    pub const BACK_COMPLETE: Triggers = Triggers(TweenEvent::BackComplete.bit());
    pub const ANY_FORWARD: Triggers = Triggers(0x0f);
    pub const ANY_BACKWARD: Triggers = Triggers(0xf0);
    pub const ANY: Triggers = Triggers(0xff);

    pub const fn contains(self, event: TweenEvent) -> bool {
        self.0 & event.bit() != 0
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl Default for Triggers {
    fn default() -> Self {
        Triggers::COMPLETE
    }
}

impl From<TweenEvent> for Triggers {
    fn from(event: TweenEvent) -> Self {
        Triggers(event.bit())
    }
}

impl BitOr for Triggers {
    type Output = Triggers;

    fn bitor(self, rhs: Triggers) -> Triggers {
        Triggers(self.0 | rhs.0)
    }
}

impl BitOrAssign for Triggers {
    fn bitor_assign(&mut self, rhs: Triggers) {
        self.0 |= rhs.0;
    }
}

/// Receives lifecycle events synchronously, in firing order.
pub trait TweenCallback {
    fn on_event(&mut self, event: TweenEvent, tween: &TweenState);
}

impl<F> TweenCallback for F
where
    F: FnMut(TweenEvent, &TweenState),
{
    fn on_event(&mut self, event: TweenEvent, tween: &TweenState) {
        self(event, tween)
    }
}
