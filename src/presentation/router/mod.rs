//! Client-side router.

mod matcher;
mod navigation;

pub use matcher::{Match, Params, Pattern, RouteTable};
pub use navigation::Navigator;
