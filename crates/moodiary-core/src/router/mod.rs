//! Navigation: route table, path resolution and guards.
//!
//! Every screen change goes through `Router::navigate`, which resolves the
//! path against the ordered route table and runs each registered guard
//! against the current session before the transition is allowed.

pub mod guard;
pub mod routes;

use thiserror::Error;
use tracing::debug;

use crate::auth::SessionData;

pub use guard::{GuardDecision, NavigationGuard, RequireAuth};
pub use routes::{
    diary_routes, normalize_path, resolve, RouteDef, RouteMatch, RouteMeta, View, LOGIN_PATH,
};

/// Upper bound on guard redirects followed for one navigation.
const MAX_REDIRECTS: usize = 5;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NavigationError {
    #[error("No route matches {0}")]
    NotFound(String),

    #[error("Too many redirects while navigating to {0}")]
    RedirectLoop(String),
}

/// Result of a successful navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    pub route: RouteMatch,
    /// The path originally asked for, when a guard sent us elsewhere
    pub redirected_from: Option<String>,
}

pub struct Router {
    routes: Vec<RouteDef>,
    guards: Vec<Box<dyn NavigationGuard>>,
}

impl Router {
    pub fn new(routes: Vec<RouteDef>) -> Self {
        Self {
            routes,
            guards: Vec::new(),
        }
    }

    /// The diary route table with the auth guard installed.
    pub fn diary() -> Self {
        Self::new(diary_routes()).with_guard(RequireAuth::default())
    }

    pub fn with_guard(mut self, guard: impl NavigationGuard + 'static) -> Self {
        self.guards.push(Box::new(guard));
        self
    }

    pub fn routes(&self) -> &[RouteDef] {
        &self.routes
    }

    pub fn resolve(&self, path: &str) -> Option<RouteMatch> {
        resolve(&self.routes, path)
    }

    /// Resolve `path` and run every guard, following redirects.
    pub fn navigate(&self, path: &str, session: &SessionData) -> Result<Navigation, NavigationError> {
        let requested = normalize_path(path);
        let mut target = requested.clone();

        for _ in 0..=MAX_REDIRECTS {
            let route = self
                .resolve(&target)
                .ok_or_else(|| NavigationError::NotFound(target.clone()))?;

            match self.run_guards(&route, session) {
                GuardDecision::Allow => {
                    let redirected_from = (route.path != requested).then_some(requested);
                    debug!(to = %route.path, ?redirected_from, "Navigation allowed");
                    return Ok(Navigation {
                        route,
                        redirected_from,
                    });
                }
                GuardDecision::Redirect(next) => {
                    debug!(from = %route.path, to = %next, "Navigation redirected");
                    target = normalize_path(&next);
                }
            }
        }

        Err(NavigationError::RedirectLoop(requested))
    }

    fn run_guards(&self, route: &RouteMatch, session: &SessionData) -> GuardDecision {
        for guard in &self.guards {
            if let GuardDecision::Redirect(to) = guard.before_each(route, session) {
                return GuardDecision::Redirect(to);
            }
        }
        GuardDecision::Allow
    }
}
