use std::rc::Rc;

use dioxus::prelude::*;

use crate::{app::AppGuard, session::Session};

/// Session as currently persisted. Re-read on every render.
pub fn use_session() -> Session {
    use_context::<Rc<AppGuard>>().session()
}
