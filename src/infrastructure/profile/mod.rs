//! Profile infrastructure - Portal client and per-study profile cache

mod client;
mod source;

pub use client::{MolecularProfileClient, PortalProfileClient};
pub use source::{MolecularProfileSource, MolecularProfilesInStudyCache, molecular_profiles_in_study_cache};

#[cfg(test)]
pub use client::MockMolecularProfileClient;
