//! Account entity and synchronization model for a multi-account webmail
//! client.

pub mod account;
pub mod config;
pub mod core;

#[cfg(test)]
mod testing;

pub use account::{
    AccountEntity, AccountHandle, AccountMessage, AccountSnapshot, AfterRemove, FieldEdit,
    RemovalOutcome, RemovalState, Task,
};
pub use config::SessionConfig;
pub use crate::core::collab::Collaborators;
pub use crate::core::wire::{Request, Response};
