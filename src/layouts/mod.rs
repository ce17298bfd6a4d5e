pub mod guard;
pub mod shell;
