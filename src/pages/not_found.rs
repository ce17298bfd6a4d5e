use dioxus::prelude::*;

#[component]
pub fn NotFoundPage(segments: Vec<String>) -> Element {
    let path = segments.join("/");

    rsx! {
        div {
            class: "p-10 grid gap-5",
            p {
               "Nothing here at /{path}."
            }
        }
    }
}
