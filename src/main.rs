mod api;
mod app;
mod components;
mod hooks;
mod layouts;
mod pages;
mod router;
mod routing;
mod session;

fn main() {
    dioxus::launch(app::App);
}
