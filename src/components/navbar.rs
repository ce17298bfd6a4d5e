use std::rc::Rc;

use dioxus::{logger::tracing, prelude::*};

use crate::{
    api::ApiClient,
    app::{AppGuard, AppRoutes},
    hooks::use_session,
    router::Route,
    session::Session,
};

#[component]
pub fn NavbarComponent() -> Element {
    let guard = use_context::<Rc<AppGuard>>();
    let routes = use_context::<Rc<AppRoutes>>();
    let api = use_context::<ApiClient>();
    let navigator = use_navigator();
    let session = use_session();

    let home = session
        .user()
        .and_then(|user| routes.by_name(user.role.dashboard()))
        .map(|entry| entry.view.clone())
        .unwrap_or(Route::PatientDashboard {});

    let logout = move |_| {
        let guard = Rc::clone(&guard);
        let routes = Rc::clone(&routes);
        let api = api.clone();

        spawn(async move {
            if let Err(error) = api.logout().await {
                tracing::warn!("backend logout failed: {error:?}");
            }

            if let Err(error) = Session::clear(guard.store(), guard.session_key()) {
                tracing::error!("{error:?}");
            }

            if let Some(entry) = routes.by_name(guard.login_route()) {
                navigator.replace(entry.view.clone());
            }
        });
    };

    rsx! {
        nav {
            Link { to: home, "Dashboard" }
            Link { to: Route::BookAppointment {}, "Book appointment" }
            Link { to: Route::Profile {}, "Profile" }

            button {
                onclick: logout,
                class: "bg-green-600 text-white p-4 rounded",

                "Log out"
            }
        }
    }
}
