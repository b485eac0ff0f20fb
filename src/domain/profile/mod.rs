//! Profile domain - Molecular profiles listed per study

mod entity;

pub use entity::{MolecularProfile, MolecularProfileFilter, profiles_by_study};
