//! Domain Layer
//!
//! Read-mostly snapshot types mirroring the REST API's JSON documents,
//! plus the client-owned multi-account token list.

pub mod entities;

pub use entities::{
    Account, AuthToken, Errors, InteractionChange, Post, PostType, Session, TokenList, User,
};
