use std::rc::Rc;

use dioxus::{logger::tracing, prelude::*};

use crate::{
    api::ApiClient,
    router::{self, Route},
    routing::{RouteName, guard::NavigationGuard, table::RouteTable},
    session::{self, BrowserStore, MemoryStore, SessionStore},
};

pub type AppGuard = NavigationGuard<Rc<dyn SessionStore>>;
pub type AppRoutes = RouteTable<Route>;

/// Backend base URL baked in at build time, e.g. `http://localhost:5000/api`
/// when the backend is not served from the same origin.
const API_URL: Option<&str> = option_env!("PORTAL_API_URL");

// local storage survives restarts; session storage is the fallback when a
// browser blocks it, memory the fallback for desktop and mobile hosts
fn session_store() -> Rc<dyn SessionStore> {
    let local = BrowserStore::default().with_local_storage();
    if local.is_available() {
        return Rc::new(local);
    }

    let session = BrowserStore::default().with_session_storage();
    if session.is_available() {
        tracing::warn!("local storage not available, sessions end with the tab");
        return Rc::new(session);
    }

    tracing::warn!("web storage not available, sessions will not survive a restart");
    Rc::new(MemoryStore::default())
}

#[component]
pub fn App() -> Element {
    use_context_provider(|| {
        let guard = NavigationGuard::new(session_store())
            .with_session_key(session::SESSION_KEY)
            .with_login_route(RouteName::Login);

        Rc::new(guard)
    });

    use_context_provider(|| match API_URL {
        Some(url) => ApiClient::default().with_base_url(url),
        None => ApiClient::default(),
    });

    let routes = use_hook(|| match router::route_table() {
        Ok(table) => Some(provide_context(Rc::new(table))),
        Err(error) => {
            tracing::error!("{error}");
            None
        }
    });

    rsx! {
        document::Link { rel: "stylesheet", href: asset!("/assets/main.css") }

        if routes.is_some() {
            Router::<Route> {}
        } else {
            p {
                "Application routes are misconfigured."
            }
        }
    }
}
