//! Application pages and auth-gated route resolution.

use crate::application::services::AuthUser;
use crate::presentation::router::{Params, RouteTable};

/// Every page the client can render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Home,
    Login,
    Register,
    PostShow,
    UserShow,
    Search,
    Settings,
    NotFound,
}

impl Page {
    /// Pages that need an authenticated account.
    pub fn requires_auth(self) -> bool {
        matches!(self, Page::Settings)
    }

    /// Pages that make no sense while logged in.
    pub fn guest_only(self) -> bool {
        matches!(self, Page::Login | Page::Register)
    }

    /// Window title, e.g. "Login - PlaatBook".
    pub fn document_title(self) -> String {
        let name = match self {
            Page::Home => "Home",
            Page::Login => "Login",
            Page::Register => "Register",
            Page::PostShow => "Post",
            Page::UserShow => "Profile",
            Page::Search => "Search",
            Page::Settings => "Settings",
            Page::NotFound => "Not Found",
        };
        format!("{} - PlaatBook", name)
    }
}

/// The client's route tree, in match priority order.
pub fn route_table() -> RouteTable<Page> {
    RouteTable::new()
        .route("/", Page::Home)
        .route("/auth/login", Page::Login)
        .route("/auth/register", Page::Register)
        .route("/posts/:post_id", Page::PostShow)
        .route("/users/:user_id", Page::UserShow)
        .route("/search", Page::Search)
        .route("/settings", Page::Settings)
        .fallback(Page::NotFound)
}

/// Outcome of resolving a path against the route tree and auth state.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// The startup validation pass has not finished yet and the page's
    /// gating depends on its outcome; render nothing rather than flash a
    /// logged-out (or logged-in) view.
    Pending,
    /// Render this page with its extracted parameters.
    Render(Page, Params),
    /// Send the user elsewhere before rendering anything.
    Redirect(String),
    /// No route matched and no fallback is registered.
    Blank,
}

/// Resolve the current path, applying the auth gates.
pub fn resolve(table: &RouteTable<Page>, path: &str, auth: &AuthUser) -> Resolution {
    let Some(matched) = table.match_path(path) else {
        return Resolution::Blank;
    };
    let page = *matched.page;

    if page.requires_auth() {
        return match auth {
            AuthUser::Unknown => Resolution::Pending,
            AuthUser::Anonymous => Resolution::Redirect("/auth/login".to_string()),
            AuthUser::Authenticated(_) => Resolution::Render(page, matched.params),
        };
    }
    if page.guest_only() {
        return match auth {
            AuthUser::Unknown => Resolution::Pending,
            AuthUser::Authenticated(_) => Resolution::Redirect("/".to_string()),
            AuthUser::Anonymous => Resolution::Render(page, matched.params),
        };
    }
    Resolution::Render(page, matched.params)
}
