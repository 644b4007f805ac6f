//! Source parsers for the raw export formats FlowGuard accepts.
//!
//! All parsers fail soft: malformed input yields an empty (or partial)
//! collection, never an error. A project snapshot with fewer sources simply
//! produces a lower-confidence analysis.

pub mod budget;
pub mod chat;
pub mod commits;
