//! # PlaatBook Client
//!
//! Client core for the PlaatBook social network: users authenticate, post
//! short messages, reply, repost, like/dislike, search, and manage their
//! profile and sessions against a remote REST API.
//!
//! This crate contains the mechanism layer of the client:
//! - A precompiled route matcher and navigation controller
//! - Reactive cells driving re-render on auth/session/route changes
//! - A multi-account token list persisted in durable local storage
//! - Thin HTTP service wrappers around the PlaatBook REST API
//!
//! ## Architecture
//!
//! The crate follows Clean Architecture principles:
//!
//! - **Domain Layer**: API snapshot entities and the token list
//! - **Application Layer**: auth/session store and resource services
//! - **Infrastructure Layer**: HTTP client and token storage
//! - **Presentation Layer**: router, page table, and auth gating
//!
//! ## Module Structure
//!
//! ```text
//! plaatbook_client/
//! +-- config/         Configuration management
//! +-- domain/         Entities: user, session, post, errors, tokens
//! +-- application/    Auth store, posts/users/search services, forms
//! +-- infrastructure/ REST client and token storage
//! +-- presentation/   Route matcher, navigation, page resolution
//! +-- shared/         Common utilities (errors, signals, time)
//! ```

// Configuration module
pub mod config;

// Domain layer - API snapshot types
pub mod domain;

// Application layer - Stores and services
pub mod application;

// Infrastructure layer - External implementations
pub mod infrastructure;

// Presentation layer - Routing and page resolution
pub mod presentation;

// Shared utilities
pub mod shared;

// Application startup and state management
pub mod startup;

// Telemetry and observability
pub mod telemetry;
