//! Content invariants and the validation run after every applied command

pub mod invariants;
pub mod validation;
