//! Application services, one per API resource.

mod auth_service;
mod posts_service;
mod search_service;
mod users_service;

pub use auth_service::{AuthService, AuthUser};
pub use posts_service::PostsService;
pub use search_service::{SearchResults, SearchService};
pub use users_service::{UserProfile, UsersService};
