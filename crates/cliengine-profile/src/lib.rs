//! Save profiles.
//!
//! Profiles are persisted as records keyed by an identifier. This crate
//! allocates collision-free identifiers, abstracts the record store, and
//! defines the player profile record.

pub mod allocator;
pub mod naming;
pub mod profile;
pub mod store;

pub use allocator::{allocate, allocate_file_name, allocate_with};
pub use naming::to_snake_case;
pub use profile::{Item, PlayerProfile, ProfileSummary};
pub use store::{DirectoryStore, MemoryStore, RecordStore};
