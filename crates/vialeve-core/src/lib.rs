//! vialeve-core: answer model, step forms, rule engine, and wizard state.
//!
//! This crate defines the fundamental data model and the two pieces of
//! actual machinery in the screening system: the eligibility rule evaluator
//! and the six-step wizard state machine everything else renders from.

pub mod error;
pub mod forms;
pub mod model;
pub mod rules;
pub mod wizard;
