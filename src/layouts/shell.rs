use dioxus::prelude::*;

use crate::{components::navbar::NavbarComponent, router::Route};

#[component]
pub fn ShellLayout() -> Element {
    rsx! {
        NavbarComponent {}

        main {
            Outlet::<Route> {}
        }
    }
}
