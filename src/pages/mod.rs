pub mod admin;
pub mod book_appointment;
pub mod doctor;
pub mod login;
pub mod not_found;
pub mod patient;
pub mod profile;
