use dioxus::prelude::*;

use crate::hooks::use_session;

#[component]
pub fn AdminDashboardPage() -> Element {
    let name = use_session().user().map(|user| user.display_name()).unwrap_or_default();

    rsx! {
        div {
            class: "p-10 grid gap-5",

            h1 { "Admin dashboard" }
            p { "Welcome, {name}." }
        }
    }
}
