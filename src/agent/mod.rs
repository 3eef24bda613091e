//! The configurable agent: its persona record, how it is stored, and how a chat
//! message is relayed to the model on its behalf.

pub mod persona;
pub mod prompt;
pub mod relay;
pub mod store;

pub use persona::Persona;
pub use store::PersonaStore;
