use std::rc::Rc;

use dioxus::{logger::tracing, prelude::*};

use crate::{
    app::{AppGuard, AppRoutes},
    router::Route,
    routing::{
        RouteName,
        guard::{NavigationGuard, Next},
    },
    session::SessionStore,
};

/// What the guard layout does with the current path.
#[derive(Debug, Clone, PartialEq)]
pub enum Guarded {
    Render,
    Redirect(Route),
    /// The guard redirected to a name the table does not declare.
    Undeclared(RouteName),
}

/// Resolves `path` to a route name and runs the guard on it, turning a
/// redirect into the declared view it points at.
pub fn guard_path<S: SessionStore>(routes: &AppRoutes, guard: &NavigationGuard<S>, path: &str) -> Guarded {
    let to = routes.resolve(path).map(|matched| matched.entry.name);

    let mut guarded = Guarded::Render;
    guard.before_each_with(to, None, |next| {
        if let Next::Redirect(name) = next {
            guarded = match routes.by_name(name) {
                Some(entry) => Guarded::Redirect(entry.view.clone()),
                None => Guarded::Undeclared(name),
            };
        }
    });

    guarded
}

/// Wraps every route. The view renders only when the navigation guard lets
/// the current path through; otherwise the login view replaces it.
#[component]
pub fn GuardLayout() -> Element {
    let guard = use_context::<Rc<AppGuard>>();
    let routes = use_context::<Rc<AppRoutes>>();
    let navigator = use_navigator();
    let route = use_route::<Route>();

    let allowed = match guard_path(&routes, guard.as_ref(), &route.to_string()) {
        Guarded::Render => true,
        Guarded::Redirect(target) => {
            navigator.replace(target);
            false
        }
        Guarded::Undeclared(name) => {
            tracing::error!("redirect target {name} is not a declared route");
            false
        }
    };

    rsx! {
        if allowed {
            Outlet::<Route> {}
        } else {
            p {
                class: "p-10",
                "Redirecting..."
            }
        }
    }
}
