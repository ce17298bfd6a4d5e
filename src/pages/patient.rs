use dioxus::prelude::*;

use crate::{hooks::use_session, router::Route};

#[component]
pub fn PatientDashboardPage() -> Element {
    let name = use_session().user().map(|user| user.display_name()).unwrap_or_default();

    rsx! {
        div {
            class: "p-10 grid gap-5",

            h1 { "Patient dashboard" }
            p { "Welcome, {name}." }

            Link {
                to: Route::BookAppointment {},
                "Book an appointment"
            }
        }
    }
}
