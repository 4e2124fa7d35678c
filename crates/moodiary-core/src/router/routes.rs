//! Route table and path matching.

use std::collections::HashMap;

/// Path of the login screen; unauthenticated navigation ends up here.
pub const LOGIN_PATH: &str = "/login";

/// Screen a route renders. Opaque to the router and guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum View {
    Home,
    Login,
    Register,
    DiaryList,
    DiaryCreate,
    DiaryDetail,
    DiaryEdit,
    Stats,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RouteMeta {
    pub requires_auth: bool,
}

impl RouteMeta {
    pub const PUBLIC: RouteMeta = RouteMeta {
        requires_auth: false,
    };
    pub const PROTECTED: RouteMeta = RouteMeta {
        requires_auth: true,
    };
}

/// One entry of the route table. `:name` segments in `path` capture parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteDef {
    pub name: &'static str,
    pub path: &'static str,
    pub view: View,
    pub meta: RouteMeta,
}

impl RouteDef {
    pub const fn new(name: &'static str, path: &'static str, view: View, meta: RouteMeta) -> Self {
        Self {
            name,
            path,
            view,
            meta,
        }
    }

    /// Match a normalized path against this definition, capturing parameters.
    fn matches(&self, path: &str) -> Option<HashMap<String, String>> {
        let pattern: Vec<&str> = split_segments(self.path).collect();
        let actual: Vec<&str> = split_segments(path).collect();
        if pattern.len() != actual.len() {
            return None;
        }

        let mut params = HashMap::new();
        for (expected, given) in pattern.iter().zip(actual.iter()) {
            if let Some(name) = expected.strip_prefix(':') {
                params.insert(name.to_string(), (*given).to_string());
            } else if expected != given {
                return None;
            }
        }
        Some(params)
    }
}

/// A resolved navigation target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch {
    pub name: &'static str,
    /// The concrete, normalized path that was matched
    pub path: String,
    pub view: View,
    pub meta: RouteMeta,
    pub params: HashMap<String, String>,
}

impl RouteMatch {
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    /// The `:id` parameter as a numeric identifier
    pub fn id(&self) -> Option<i64> {
        self.param("id").and_then(|id| id.parse().ok())
    }
}

fn split_segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

/// Strip query/fragment and redundant slashes: `/diaries//3/?x=1` -> `/diaries/3`.
pub fn normalize_path(path: &str) -> String {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    let segments: Vec<&str> = split_segments(path).collect();
    format!("/{}", segments.join("/"))
}

/// Find the first route in `routes` matching `path`. Order matters:
/// `/diaries/new` must precede `/diaries/:id`.
pub fn resolve(routes: &[RouteDef], path: &str) -> Option<RouteMatch> {
    let path = normalize_path(path);
    routes.iter().find_map(|def| {
        def.matches(&path).map(|params| RouteMatch {
            name: def.name,
            path: path.clone(),
            view: def.view,
            meta: def.meta,
            params,
        })
    })
}

/// The diary client's route table.
pub fn diary_routes() -> Vec<RouteDef> {
    vec![
        RouteDef::new("home", "/", View::Home, RouteMeta::PROTECTED),
        RouteDef::new("login", LOGIN_PATH, View::Login, RouteMeta::PUBLIC),
        RouteDef::new("register", "/register", View::Register, RouteMeta::PUBLIC),
        RouteDef::new("diaries", "/diaries", View::DiaryList, RouteMeta::PROTECTED),
        RouteDef::new("diary-create", "/diaries/new", View::DiaryCreate, RouteMeta::PROTECTED),
        RouteDef::new("diary-detail", "/diaries/:id", View::DiaryDetail, RouteMeta::PROTECTED),
        RouteDef::new("diary-edit", "/diaries/:id/edit", View::DiaryEdit, RouteMeta::PROTECTED),
        RouteDef::new("stats", "/stats", View::Stats, RouteMeta::PROTECTED),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path(""), "/");
        assert_eq!(normalize_path("/"), "/");
        assert_eq!(normalize_path("diaries"), "/diaries");
        assert_eq!(normalize_path("/diaries//3/"), "/diaries/3");
        assert_eq!(normalize_path("/diaries/search?keyword=rain#top"), "/diaries/search");
    }

    #[test]
    fn test_resolve_static_and_root() {
        let routes = diary_routes();
        let home = resolve(&routes, "/").expect("home");
        assert_eq!(home.view, View::Home);
        assert!(home.params.is_empty());

        let login = resolve(&routes, "/login").expect("login");
        assert_eq!(login.view, View::Login);
        assert!(!login.meta.requires_auth);
    }

    #[test]
    fn test_resolve_captures_params() {
        let routes = diary_routes();
        let detail = resolve(&routes, "/diaries/42").expect("detail");
        assert_eq!(detail.view, View::DiaryDetail);
        assert_eq!(detail.id(), Some(42));

        let edit = resolve(&routes, "/diaries/42/edit").expect("edit");
        assert_eq!(edit.view, View::DiaryEdit);
        assert_eq!(edit.param("id"), Some("42"));
    }

    #[test]
    fn test_resolve_respects_table_order() {
        let routes = diary_routes();
        let create = resolve(&routes, "/diaries/new").expect("create");
        assert_eq!(create.view, View::DiaryCreate);
        assert!(create.params.is_empty());
    }

    #[test]
    fn test_resolve_unknown_path() {
        let routes = diary_routes();
        assert!(resolve(&routes, "/settings").is_none());
        assert!(resolve(&routes, "/diaries/1/edit/extra").is_none());
    }

    #[test]
    fn test_non_numeric_id() {
        let routes = diary_routes();
        let detail = resolve(&routes, "/diaries/abc").expect("detail");
        assert_eq!(detail.id(), None);
    }
}
