/// The fixed storage slot for the catalog.
pub mod slot;

pub use slot::{LoadError, SaveError, Slot, SLOT_FILE};
