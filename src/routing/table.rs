use derive_more::{Display, Error};
use percent_encoding::percent_decode_str;
use url::Url;

use super::RouteName;

const RESOLVE_BASE: &str = "http://localhost/";

#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum RouteError {
    #[display("invalid route path `{path}`")]
    InvalidPath {
        #[error(not(source))]
        path: String,
    },
    #[display("route path `{path}` conflicts with already registered `{existing}`")]
    DuplicatePath {
        #[error(not(source))]
        path: String,
        existing: String,
    },
    #[display("route name `{name}` is already registered")]
    DuplicateName {
        #[error(not(source))]
        name: RouteName,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Static(String),
    Param(String),
}

impl Segment {
    fn same_shape(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Static(a), Self::Static(b)) => a == b,
            (Self::Param(_), Self::Param(_)) => true,
            _ => false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RouteEntry<V> {
    pub path: &'static str,
    pub name: RouteName,
    pub view: V,
    segments: Vec<Segment>,
}

/// A resolved entry plus the `:param` values captured from the request path.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteMatch<'a, V> {
    pub entry: &'a RouteEntry<V>,
    pub params: Vec<(String, String)>,
}

impl<V> PartialEq for RouteEntry<V> {
    fn eq(&self, other: &Self) -> bool {
        self.path == other.path && self.name == other.name
    }
}

/// Ordered list of routes. Registration order is match priority.
#[derive(Debug, Clone)]
pub struct RouteTable<V> {
    entries: Vec<RouteEntry<V>>,
}

impl<V> Default for RouteTable<V> {
    fn default() -> Self {
        Self { entries: Vec::new() }
    }
}

impl<V> RouteTable<V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a route. Structurally identical paths (`/a/:x` vs `/a/:y`) and
    /// reused names are rejected and leave the table untouched.
    pub fn register(&mut self, path: &'static str, name: RouteName, view: V) -> Result<(), RouteError> {
        let segments = parse_pattern(path)?;

        if let Some(existing) = self.entries.iter().find(|entry| same_structure(&entry.segments, &segments)) {
            return Err(RouteError::DuplicatePath {
                path: path.to_owned(),
                existing: existing.path.to_owned(),
            });
        }

        if self.entries.iter().any(|entry| entry.name == name) {
            return Err(RouteError::DuplicateName { name });
        }

        self.entries.push(RouteEntry {
            path,
            name,
            view,
            segments,
        });

        Ok(())
    }

    pub fn with_route(mut self, path: &'static str, name: RouteName, view: V) -> Result<Self, RouteError> {
        self.register(path, name, view)?;
        Ok(self)
    }

    pub fn resolve(&self, path: &str) -> Option<RouteMatch<'_, V>> {
        let requested = request_segments(path)?;

        self.entries.iter().find_map(|entry| {
            if entry.segments.len() != requested.len() {
                return None;
            }

            let mut params = Vec::new();
            for (segment, value) in entry.segments.iter().zip(requested.iter()) {
                match segment {
                    Segment::Static(s) if s == value => {}
                    Segment::Static(_) => return None,
                    Segment::Param(param) => params.push((param.clone(), value.clone())),
                }
            }

            Some(RouteMatch { entry, params })
        })
    }

    pub fn by_name(&self, name: RouteName) -> Option<&RouteEntry<V>> {
        self.entries.iter().find(|entry| entry.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &RouteEntry<V>> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn parse_pattern(path: &str) -> Result<Vec<Segment>, RouteError> {
    let invalid = || RouteError::InvalidPath { path: path.to_owned() };

    let Some(rest) = path.strip_prefix('/') else {
        return Err(invalid());
    };

    if path.contains(['?', '#']) {
        return Err(invalid());
    }

    rest.split('/')
        .filter(|s| !s.is_empty())
        .map(|s| match s.strip_prefix(':') {
            Some("") => Err(invalid()),
            Some(param) => Ok(Segment::Param(param.to_owned())),
            None => Ok(Segment::Static(s.to_owned())),
        })
        .collect()
}

fn same_structure(a: &[Segment], b: &[Segment]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.same_shape(y))
}

// query and fragment are dropped, dot segments resolved, empty segments
// collapsed, each segment percent-decoded
fn request_segments(path: &str) -> Option<Vec<String>> {
    let base = Url::parse(RESOLVE_BASE).ok()?;
    let url = base.join(path).ok()?;

    if url.origin() != base.origin() {
        return None;
    }

    Some(
        url.path_segments()?
            .filter(|s| !s.is_empty())
            .map(|s| percent_decode_str(s).decode_utf8_lossy().into_owned())
            .collect(),
    )
}
