//! Command handlers. One per top-level action.

pub mod scaffold;
