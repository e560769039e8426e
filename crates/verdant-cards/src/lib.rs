#![forbid(unsafe_code)]
//! Compiled, read-only entity cards.
//!
//! A card is the per-type projection the traversal services consume:
//! attributes, relations with their impact metadata, views, and derived
//! lifecycle/permission blocks. Cards are built once from the validated
//! registry and owned exclusively by the [`CardCache`].

mod builder;
mod cache;
mod card;
mod guard;

pub use builder::build_card;
pub use cache::{CardCache, CardError};
pub use card::{
    CardAttribute, CardLifecycle, CardMetadata, CardPermissions, CardRelation, CardState,
    EntityCard,
};
pub use guard::check_card;

pub const CRATE_NAME: &str = "verdant-cards";
