//! Client-side route table and the navigation guard that keeps anonymous users out of
//! authenticated pages.

use url::form_urlencoded;

use crate::api::token::TokenStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Route {
    pub path: &'static str,
    pub name: &'static str,
    pub requires_auth: bool,
}

pub const LOGIN_ROUTE: &str = "login";

pub const ROUTES: &[Route] = &[
    Route { path: "/", name: "home", requires_auth: false },
    Route { path: "/login", name: LOGIN_ROUTE, requires_auth: false },
    Route { path: "/events", name: "events", requires_auth: true },
    Route { path: "/events/create", name: "events-create", requires_auth: true },
];

/// Outcome of the guard for one navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    Proceed,
    /// Go to the named route instead, remembering where the user was headed.
    Redirect { name: &'static str, redirect: String },
}

impl Navigation {
    /// Concrete location for a redirect, e.g. `/login?redirect=%2Fevents`.
    pub fn location(&self) -> Option<String> {
        match self {
            Navigation::Proceed => None,
            Navigation::Redirect { name, redirect } => {
                let path = Router::default().path_of(name).unwrap_or("/");
                let query: String = form_urlencoded::Serializer::new(String::new())
                    .append_pair("redirect", redirect)
                    .finish();
                Some(format!("{}?{}", path, query))
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct Router {
    routes: &'static [Route],
}

impl Default for Router {
    fn default() -> Self {
        Self { routes: ROUTES }
    }
}

impl Router {
    pub fn new(routes: &'static [Route]) -> Self {
        Self { routes }
    }

    pub fn routes(&self) -> &'static [Route] {
        self.routes
    }

    /// Match a full path (query and fragment ignored; a trailing slash is tolerated).
    pub fn resolve(&self, full_path: &str) -> Option<&'static Route> {
        let path = full_path
            .split(['?', '#'])
            .next()
            .unwrap_or(full_path);
        let path = match path.strip_suffix('/') {
            Some(stripped) if !stripped.is_empty() => stripped,
            _ => path,
        };
        self.routes.iter().find(|r| r.path == path)
    }

    pub fn path_of(&self, name: &str) -> Option<&'static str> {
        self.routes.iter().find(|r| r.name == name).map(|r| r.path)
    }

    /// The guard proper: auth-only target and no token means a trip to the login page.
    pub fn guard(&self, full_path: &str, has_token: bool) -> Navigation {
        let requires_auth = self.resolve(full_path).is_some_and(|r| r.requires_auth);
        if requires_auth && !has_token {
            tracing::debug!("Navigation to {} blocked: login required", full_path);
            Navigation::Redirect {
                name: LOGIN_ROUTE,
                redirect: full_path.to_string(),
            }
        } else {
            Navigation::Proceed
        }
    }

    /// Guard against the credentials currently in storage.
    pub fn before_each(&self, full_path: &str, tokens: &TokenStore) -> Navigation {
        self.guard(full_path, tokens.has_access_token())
    }
}
