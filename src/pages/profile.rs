use std::rc::Rc;

use dioxus::{logger::tracing, prelude::*};

use crate::{
    api::ApiClient,
    app::{AppGuard, AppRoutes},
    hooks::use_session,
    session::Session,
};

#[component]
pub fn ProfilePage() -> Element {
    let guard = use_context::<Rc<AppGuard>>();
    let routes = use_context::<Rc<AppRoutes>>();
    let api = use_context::<ApiClient>();
    let navigator = use_navigator();

    let mut refreshed = use_signal(|| 0u32);

    // the marker is only a snapshot of the login response; bring it up to
    // date, or drop it when the backend no longer knows the session
    use_effect(move || {
        let guard = Rc::clone(&guard);
        let routes = Rc::clone(&routes);
        let api = api.clone();

        spawn(async move {
            match api.me().await {
                Ok(Some(user)) => {
                    if let Err(error) = Session::persist(guard.store(), guard.session_key(), &user) {
                        tracing::error!("{error:?}");
                    }
                    *refreshed.write() += 1;
                }
                Ok(None) => {
                    tracing::warn!("backend session expired, clearing stale marker");

                    if let Err(error) = Session::clear(guard.store(), guard.session_key()) {
                        tracing::error!("{error:?}");
                    }

                    if let Some(entry) = routes.by_name(guard.login_route()) {
                        navigator.replace(entry.view.clone());
                    }
                }
                Err(error) => tracing::warn!("profile refresh failed: {error:?}"),
            }
        });
    });

    let _ = refreshed();
    let session = use_session();
    let Some(user) = session.user() else {
        return rsx! {};
    };

    let id = user.id.to_string();
    let name = user.name.clone().unwrap_or_default();
    let email = user.email.clone().unwrap_or_default();
    let phone = user.phone.clone().unwrap_or_default();
    let role = user.role.to_string();
    let member_since = user
        .created_at
        .map(|at| at.format("%Y-%m-%d").to_string())
        .unwrap_or_default();

    rsx! {
        div {
            class: "p-10 grid gap-5",

            h1 { "Profile" }

            dl {
                class: "grid gap-2",
                dt { "ID" }
                dd { "{id}" }
                dt { "Name" }
                dd { "{name}" }
                dt { "Email" }
                dd { "{email}" }
                dt { "Phone" }
                dd { "{phone}" }
                dt { "Role" }
                dd { "{role}" }
                dt { "Member since" }
                dd { "{member_since}" }
            }

            ChangePasswordForm {}
        }
    }
}

#[component]
fn ChangePasswordForm() -> Element {
    let api = use_context::<ApiClient>();

    let mut current = use_signal(String::new);
    let mut next = use_signal(String::new);
    let mut confirm = use_signal(String::new);
    let mut status = use_signal(|| None::<Result<String, String>>);
    let mut pending = use_signal(|| false);

    let submit = move |event: FormEvent| {
        event.prevent_default();

        if next() != confirm() {
            status.set(Some(Err("New passwords do not match".to_owned())));
            return;
        }

        let api = api.clone();
        pending.set(true);

        spawn(async move {
            match api.change_password(&current(), &next()).await {
                Ok(message) => {
                    current.set(String::new());
                    next.set(String::new());
                    confirm.set(String::new());
                    status.set(Some(Ok(message)));
                }
                Err(err) => {
                    tracing::error!("{err:?}");
                    status.set(Some(Err(err.to_string())));
                }
            }

            pending.set(false);
        });
    };

    rsx! {
        form {
            class: "grid gap-3 max-w-md",
            onsubmit: submit,

            h2 { "Change password" }

            input {
                r#type: "password",
                placeholder: "Current password",
                value: "{current}",
                oninput: move |event| current.set(event.value()),
            }
            input {
                r#type: "password",
                placeholder: "New password",
                value: "{next}",
                oninput: move |event| next.set(event.value()),
            }
            input {
                r#type: "password",
                placeholder: "Repeat new password",
                value: "{confirm}",
                oninput: move |event| confirm.set(event.value()),
            }
            button {
                r#type: "submit",
                class: "bg-green-600 text-white p-4 rounded",
                disabled: pending(),

                "Update password"
            }

            {
                match status() {
                    Some(Ok(message)) => rsx! { p { "{message}" } },
                    Some(Err(message)) => rsx! { p { class: "error", "{message}" } },
                    None => rsx! {},
                }
            }
        }
    }
}
