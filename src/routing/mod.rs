pub mod guard;
pub mod table;

use derive_more::Display;

/// Names of the application's views. Route lookups by name and the guard's
/// login check go through these rather than through paths.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RouteName {
    Login,
    AdminDashboard,
    DoctorDashboard,
    PatientDashboard,
    BookAppointment,
    Profile,
}
