//! Failed-login lockout.
//!
//! # State Machine
//! ```text
//!            failure (n+1 < max)
//!          ┌──────────────┐
//!          ▼              │
//!     ┌─────────┐  ───────┘        ┌────────┐
//!     │ OPEN(n) │ ──failure──────▶ │ LOCKED │
//!     └─────────┘  (n+1 == max)    └────────┘
//!          ▲  │                         │
//!          └──┘ success → OPEN(0)       │ cooldown elapsed (if configured)
//!          ▲                            │
//!          └────────────────────────────┘
//! ```
//!
//! # Design Decisions
//! - Counters live in a keyed map: per username, or one shared key in global scope
//! - LOCKED keys reject attempts before any hashing work happens
//! - `cooldown_secs = 0` makes LOCKED terminal for the process lifetime

pub mod guard;

pub use guard::{LockoutGuard, LockoutState};
