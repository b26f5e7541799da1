//! Role-based access control for menu areas.
//!
//! # Data Flow
//! ```text
//! /menu/{username}              → role lookup → available_choices(role)
//! /menu_option/{username}/{n}   → role lookup → MenuChoice::from(n) → check_access
//! ```
//!
//! # Design Decisions
//! - Roles are a closed enum; unknown role names never parse
//! - The permission table is a `match`, resolved at compile time
//! - Fail closed: any lookup or parse failure denies

pub mod policy;
pub mod role;

pub use policy::{available_choices, check_access, check_access_by_name, MenuChoice};
pub use role::{Role, UnknownRole};
