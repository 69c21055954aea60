//! Route matching.
//!
//! Path templates like `/users/:user_id` are compiled once at registration
//! into a segment list; matching a path is then a single anchored walk with
//! no per-render pattern work. A `:name` segment matches exactly one
//! non-empty path segment and binds it as a string parameter.
//!
//! A route table yields at most one route per evaluation: the first
//! matching non-fallback route in registration order, else the first
//! registered fallback, else nothing (a blank page; register a fallback).

use std::collections::{HashMap, HashSet};

/// Parameters extracted from a matched path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params {
    values: HashMap<String, String>,
}

impl Params {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn insert(&mut self, name: &str, value: &str) {
        self.values.insert(name.to_string(), value.to_string());
    }
}

#[derive(Debug, Clone)]
enum Segment {
    Literal(String),
    Param(String),
}

/// A compiled path template.
#[derive(Debug, Clone)]
pub struct Pattern {
    raw: String,
    segments: Vec<Segment>,
}

impl Pattern {
    /// Compile a template.
    ///
    /// # Panics
    ///
    /// Panics when the template does not start with `/`, has an unnamed
    /// `:` segment, or binds the same parameter name twice. Route tables
    /// are declared at startup, so a malformed template is a programming
    /// error, not a runtime condition.
    pub fn compile(pattern: &str) -> Self {
        assert!(
            pattern.starts_with('/'),
            "route pattern must start with '/': {:?}",
            pattern
        );
        let mut names = HashSet::new();
        let segments = pattern
            .split('/')
            .map(|segment| match segment.strip_prefix(':') {
                Some(name) => {
                    assert!(!name.is_empty(), "unnamed parameter in pattern {:?}", pattern);
                    assert!(
                        names.insert(name.to_string()),
                        "duplicate parameter :{} in pattern {:?}",
                        name,
                        pattern
                    );
                    Segment::Param(name.to_string())
                }
                None => Segment::Literal(segment.to_string()),
            })
            .collect();
        Self {
            raw: pattern.to_string(),
            segments,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Match a full path against this template, extracting parameters.
    /// The match is anchored: extra or missing segments never match.
    pub fn matches(&self, path: &str) -> Option<Params> {
        let mut params = Params::default();
        let mut segments = self.segments.iter();
        let mut parts = path.split('/');
        loop {
            match (segments.next(), parts.next()) {
                (Some(Segment::Literal(literal)), Some(part)) if literal == part => {}
                (Some(Segment::Param(name)), Some(part)) if !part.is_empty() => {
                    params.insert(name, part);
                }
                (None, None) => return Some(params),
                _ => return None,
            }
        }
    }
}

struct Route<T> {
    pattern: Option<Pattern>,
    page: T,
}

/// One matched route: the registered page value plus extracted parameters.
#[derive(Debug, PartialEq)]
pub struct Match<'a, T> {
    pub page: &'a T,
    pub params: Params,
}

/// Ordered route registrations; built once, matched on every path change.
pub struct RouteTable<T> {
    routes: Vec<Route<T>>,
}

impl<T> Default for RouteTable<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> RouteTable<T> {
    pub fn new() -> Self {
        Self { routes: Vec::new() }
    }

    /// Register a route; see [`Pattern::compile`] for template rules.
    pub fn route(mut self, pattern: &str, page: T) -> Self {
        self.routes.push(Route {
            pattern: Some(Pattern::compile(pattern)),
            page,
        });
        self
    }

    /// Register a fallback rendered only when no pattern matched. When
    /// several fallbacks are registered, the first one wins.
    pub fn fallback(mut self, page: T) -> Self {
        self.routes.push(Route {
            pattern: None,
            page,
        });
        self
    }

    /// Resolve a path to at most one route.
    pub fn match_path(&self, path: &str) -> Option<Match<'_, T>> {
        for route in &self.routes {
            if let Some(pattern) = &route.pattern {
                if let Some(params) = pattern.matches(path) {
                    return Some(Match {
                        page: &route.page,
                        params,
                    });
                }
            }
        }
        self.routes
            .iter()
            .find(|route| route.pattern.is_none())
            .map(|route| Match {
                page: &route.page,
                params: Params::default(),
            })
    }
}
