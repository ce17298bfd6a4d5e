use std::rc::Rc;

use dioxus::{logger::tracing, prelude::*};

use crate::{
    api::{ApiClient, Registration},
    app::{AppGuard, AppRoutes},
    session::{Session, SessionUser},
};

async fn sign_in(api: &ApiClient, guard: &AppGuard, email: &str, password: &str) -> anyhow::Result<SessionUser> {
    let user = api.login(email, password).await?;
    Session::persist(guard.store(), guard.session_key(), &user)?;

    Ok(user)
}

async fn sign_up(api: &ApiClient, guard: &AppGuard, registration: &Registration) -> anyhow::Result<SessionUser> {
    let created = api.register(registration).await?;
    tracing::info!("registered {}", created.display_name());

    sign_in(api, guard, &registration.email, &registration.password).await
}

#[component]
pub fn LoginPage() -> Element {
    let guard = use_context::<Rc<AppGuard>>();
    let routes = use_context::<Rc<AppRoutes>>();
    let api = use_context::<ApiClient>();
    let navigator = use_navigator();

    let mut registering = use_signal(|| false);
    let mut name = use_signal(String::new);
    let mut phone = use_signal(String::new);
    let mut email = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut error = use_signal(|| None::<String>);
    let mut pending = use_signal(|| false);

    let signed_in_as = guard.session().user().map(SessionUser::display_name);

    let submit = move |event: FormEvent| {
        event.prevent_default();

        let guard = Rc::clone(&guard);
        let routes = Rc::clone(&routes);
        let api = api.clone();

        pending.set(true);

        spawn(async move {
            let result = if registering() {
                let registration = Registration {
                    name: name(),
                    email: email(),
                    password: password(),
                    phone: phone(),
                };
                sign_up(&api, &guard, &registration).await
            } else {
                sign_in(&api, &guard, &email(), &password()).await
            };

            match result {
                Ok(user) => {
                    error.set(None);
                    password.set(String::new());

                    if let Some(entry) = routes.by_name(user.role.dashboard()) {
                        navigator.replace(entry.view.clone());
                    }
                }
                Err(err) => {
                    tracing::error!("{err:?}");
                    error.set(Some(err.to_string()));
                }
            }

            pending.set(false);
        });
    };

    let (title, toggle) = if registering() {
        ("Create account", "I already have an account")
    } else {
        ("Sign in", "Create an account")
    };

    rsx! {
        div {
            class: "p-10 grid gap-5 max-w-md",

            h1 { "{title}" }

            if let Some(current) = signed_in_as {
                p { "Signed in as {current}." }
            }

            form {
                class: "grid gap-3",
                onsubmit: submit,

                if registering() {
                    input {
                        r#type: "text",
                        placeholder: "Full name",
                        value: "{name}",
                        oninput: move |event| name.set(event.value()),
                    }
                    input {
                        r#type: "tel",
                        placeholder: "Phone (optional)",
                        value: "{phone}",
                        oninput: move |event| phone.set(event.value()),
                    }
                }
                input {
                    r#type: "email",
                    placeholder: "Email",
                    value: "{email}",
                    oninput: move |event| email.set(event.value()),
                }
                input {
                    r#type: "password",
                    placeholder: "Password",
                    value: "{password}",
                    oninput: move |event| password.set(event.value()),
                }
                button {
                    r#type: "submit",
                    class: "bg-green-600 text-white p-4 rounded",
                    disabled: pending(),

                    "{title}"
                }
            }

            button {
                r#type: "button",
                onclick: move |_| {
                    registering.set(!registering());
                    error.set(None);
                },

                "{toggle}"
            }

            if let Some(message) = error() {
                p { class: "error", "{message}" }
            }
        }
    }
}
