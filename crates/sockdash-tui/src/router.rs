//! Path routing for dashboard pages.
//!
//! Patterns are `/`-separated segments: literals match exactly, `:name`
//! captures one segment, and a trailing `*` captures the rest (possibly
//! nothing). Empty segments are ignored, so `/ui/` and `/ui` are the same
//! path. Routes are tried in order and the first match wins.

use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Param(String),
    Rest,
}

/// A parsed route pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutePattern {
    raw: String,
    segments: Vec<Segment>,
}

/// Values captured by a match. A trailing `*` is stored under `"*"`.
pub type RouteParams = BTreeMap<String, String>;

fn split(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

impl RoutePattern {
    /// Parse `pattern`. A `*` that is not the last segment is a literal.
    #[must_use]
    pub fn parse(pattern: &str) -> Self {
        let parts: Vec<&str> = split(pattern).collect();
        let last = parts.len().saturating_sub(1);
        let segments = parts
            .iter()
            .enumerate()
            .map(|(i, part)| match (*part, i == last) {
                ("*", true) => Segment::Rest,
                (p, _) if p.len() > 1 && p.starts_with(':') => Segment::Param(p[1..].to_string()),
                (p, _) => Segment::Literal(p.to_string()),
            })
            .collect();
        Self {
            raw: pattern.to_string(),
            segments,
        }
    }

    /// Pattern text as given.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Match `path`, returning the captured parameters.
    #[must_use]
    pub fn matches(&self, path: &str) -> Option<RouteParams> {
        let parts: Vec<&str> = split(path).collect();
        let mut params = RouteParams::new();
        for (i, segment) in self.segments.iter().enumerate() {
            match segment {
                Segment::Rest => {
                    params.insert("*".to_string(), parts.get(i..).unwrap_or_default().join("/"));
                    return Some(params);
                }
                Segment::Literal(lit) => {
                    if parts.get(i) != Some(&lit.as_str()) {
                        return None;
                    }
                }
                Segment::Param(name) => {
                    params.insert(name.clone(), (*parts.get(i)?).to_string());
                }
            }
        }
        (parts.len() == self.segments.len()).then_some(params)
    }
}

/// Sidebar entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavItem {
    /// Label shown in the sidebar.
    pub label: String,
    /// Path navigated to.
    pub path: String,
}

impl NavItem {
    /// Entry `label` pointing at `path`.
    pub fn new(label: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            path: path.into(),
        }
    }
}

/// Ordered route table mapping patterns to targets of type `T`.
#[derive(Debug, Clone)]
pub struct Router<T> {
    routes: Vec<(RoutePattern, T)>,
}

impl<T> Default for Router<T> {
    fn default() -> Self {
        Self { routes: Vec::new() }
    }
}

impl<T> Router<T> {
    /// Empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a route.
    #[must_use]
    pub fn route(mut self, pattern: &str, target: T) -> Self {
        self.routes.push((RoutePattern::parse(pattern), target));
        self
    }

    /// First route matching `path`.
    #[must_use]
    pub fn resolve(&self, path: &str) -> Option<(&T, RouteParams)> {
        self.routes
            .iter()
            .find_map(|(pattern, target)| pattern.matches(path).map(|params| (target, params)))
    }

    /// Number of routes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Whether there are no routes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}
