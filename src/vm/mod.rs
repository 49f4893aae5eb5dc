//! The VM core (C7): a generic step/evaluate abstraction over an
//! instruction set, plus the concrete BCH common instruction set (C8).

pub mod bch;
pub mod core;
