//! Route authorization gate
//!
//! Maps the session status to the destinations a user may navigate to and
//! the fallback every other path redirects to. Unknown or forbidden paths
//! always redirect; there is no error page.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::session::{SessionMachine, SessionStatus};

/// A navigable destination with its path parameters bound
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "page", rename_all = "snake_case")]
pub enum Destination {
    /// Landing page: the user directory
    Users,
    UserPlaces { user_id: String },
    NewPlace,
    UpdatePlace { place_id: String },
    Login,
    Register,
}

impl Destination {
    /// Canonical path of this destination
    pub fn path(&self) -> String {
        match self {
            Self::Users => "/".to_string(),
            Self::UserPlaces { user_id } => format!("/{user_id}/places"),
            Self::NewPlace => "/places/new".to_string(),
            Self::UpdatePlace { place_id } => format!("/places/{place_id}"),
            Self::Login => "/auth/login".to_string(),
            Self::Register => "/auth/register".to_string(),
        }
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// Which page a pattern renders
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Page {
    Users,
    UserPlaces,
    NewPlace,
    UpdatePlace,
    Login,
    Register,
}

/// One `pattern -> page` binding
///
/// Segments starting with `:` capture a parameter. Exact bindings match
/// only paths with the same number of segments; prefix bindings also match
/// longer paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteBinding {
    pub pattern: &'static str,
    pub page: Page,
    pub exact: bool,
}

impl RouteBinding {
    const fn exact(pattern: &'static str, page: Page) -> Self {
        Self {
            pattern,
            page,
            exact: true,
        }
    }

    const fn prefix(pattern: &'static str, page: Page) -> Self {
        Self {
            pattern,
            page,
            exact: false,
        }
    }

    /// Bind `path` against this pattern
    pub fn matches(&self, path: &str) -> Option<Destination> {
        let pattern: Vec<&str> = segments(self.pattern).collect();
        let path: Vec<&str> = segments(path).collect();

        if path.len() < pattern.len() || (self.exact && path.len() != pattern.len()) {
            return None;
        }

        let mut param = None;
        for (want, got) in pattern.iter().zip(&path) {
            if want.starts_with(':') {
                param = Some((*got).to_string());
            } else if want != got {
                return None;
            }
        }

        let destination = match self.page {
            Page::Users => Destination::Users,
            Page::UserPlaces => Destination::UserPlaces {
                user_id: param.unwrap_or_default(),
            },
            Page::NewPlace => Destination::NewPlace,
            Page::UpdatePlace => Destination::UpdatePlace {
                place_id: param.unwrap_or_default(),
            },
            Page::Login => Destination::Login,
            Page::Register => Destination::Register,
        };
        Some(destination)
    }
}

fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('?')
        .next()
        .unwrap_or_default()
        .split('/')
        .filter(|s| !s.is_empty())
}

const USERS: RouteBinding = RouteBinding::exact("/", Page::Users);
const USER_PLACES: RouteBinding = RouteBinding::exact("/:userId/places", Page::UserPlaces);
const NEW_PLACE: RouteBinding = RouteBinding::exact("/places/new", Page::NewPlace);
const UPDATE_PLACE: RouteBinding = RouteBinding::prefix("/places/:placeId", Page::UpdatePlace);
const LOGIN: RouteBinding = RouteBinding::exact("/auth/login", Page::Login);
const REGISTER: RouteBinding = RouteBinding::exact("/auth/register", Page::Register);

/// Outcome of resolving a path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Render(Destination),
    Redirect(Destination),
}

impl Resolution {
    /// The destination that ends up on screen
    pub fn destination(&self) -> &Destination {
        match self {
            Self::Render(d) | Self::Redirect(d) => d,
        }
    }

    pub fn is_redirect(&self) -> bool {
        matches!(self, Self::Redirect(_))
    }
}

/// Ordered bindings plus the fallback destination
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteSet {
    bindings: Vec<RouteBinding>,
    fallback: Destination,
}

impl RouteSet {
    pub fn bindings(&self) -> &[RouteBinding] {
        &self.bindings
    }

    pub fn fallback(&self) -> &Destination {
        &self.fallback
    }

    pub fn permits(&self, page: Page) -> bool {
        self.bindings.iter().any(|b| b.page == page)
    }

    /// First matching binding wins; anything else redirects to the fallback
    pub fn resolve(&self, path: &str) -> Resolution {
        self.bindings
            .iter()
            .find_map(|binding| binding.matches(path))
            .map(Resolution::Render)
            .unwrap_or_else(|| Resolution::Redirect(self.fallback.clone()))
    }
}

/// Routes reachable in the given session status
pub fn derive_routes(status: SessionStatus) -> RouteSet {
    match status {
        SessionStatus::Authenticated => RouteSet {
            bindings: vec![USERS, USER_PLACES, NEW_PLACE, UPDATE_PLACE],
            fallback: Destination::Users,
        },
        SessionStatus::Anonymous => RouteSet {
            bindings: vec![USERS, USER_PLACES, LOGIN, REGISTER],
            fallback: Destination::Login,
        },
    }
}

/// Derives routes from the live session on every call
#[derive(Clone)]
pub struct RouteGate {
    session: Arc<SessionMachine>,
}

impl RouteGate {
    pub fn new(session: Arc<SessionMachine>) -> Self {
        Self { session }
    }

    pub fn routes(&self) -> RouteSet {
        derive_routes(self.session.snapshot().status())
    }

    pub fn resolve(&self, path: &str) -> Resolution {
        self.routes().resolve(path)
    }
}
