use dioxus::logger::tracing;

use super::RouteName;
use crate::session::{self, Session, SessionStore};

/// Outcome of a guarded navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Next {
    Proceed,
    Redirect(RouteName),
}

/// Runs before every navigation: anything but the login view requires a
/// session marker with an id in the injected store.
///
/// The guard holds no state of its own. Each call re-reads the store, so
/// login and logout take effect on the next navigation.
#[derive(Debug, Clone)]
pub struct NavigationGuard<S> {
    store: S,
    session_key: &'static str,
    login_route: RouteName,
}

impl<S: SessionStore> NavigationGuard<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            session_key: session::SESSION_KEY,
            login_route: RouteName::Login,
        }
    }

    pub fn with_session_key(mut self, s: &'static str) -> Self {
        self.session_key = s;
        self
    }

    pub fn with_login_route(mut self, name: RouteName) -> Self {
        self.login_route = name;
        self
    }

    #[cfg(test)]
    pub fn with_store<T: SessionStore>(self, store: T) -> NavigationGuard<T> {
        NavigationGuard {
            store,
            session_key: self.session_key,
            login_route: self.login_route,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn session_key(&self) -> &'static str {
        self.session_key
    }

    pub fn login_route(&self) -> RouteName {
        self.login_route
    }

    pub fn session(&self) -> Session {
        Session::load(&self.store, self.session_key)
    }

    /// `to` is `None` when the path matched no declared route; such targets
    /// are guarded like any other non-login view. `from` is accepted for
    /// symmetry with the router hook but not consulted.
    pub fn before_each(&self, to: Option<RouteName>, _from: Option<RouteName>) -> Next {
        if to == Some(self.login_route) {
            return Next::Proceed;
        }

        if self.session().is_authenticated() {
            return Next::Proceed;
        }

        tracing::debug!("no session, redirecting {to:?} to {}", self.login_route);

        Next::Redirect(self.login_route)
    }

    pub fn before_each_with<F: FnOnce(Next)>(&self, to: Option<RouteName>, from: Option<RouteName>, next: F) {
        next(self.before_each(to, from));
    }
}
