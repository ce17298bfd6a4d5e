use dioxus::prelude::*;

use crate::{
    layouts::{guard::GuardLayout, shell::ShellLayout},
    pages::{
        admin::AdminDashboardPage, book_appointment::BookAppointmentPage, doctor::DoctorDashboardPage,
        login::LoginPage, not_found::NotFoundPage, patient::PatientDashboardPage, profile::ProfilePage,
    },
    routing::{
        RouteName,
        table::{RouteError, RouteTable},
    },
};

#[derive(Debug, Clone, Routable, PartialEq)]
#[rustfmt::skip]
pub enum Route {
    #[layout(GuardLayout)]
        #[route("/", LoginPage)]
        Login {},

        #[layout(ShellLayout)]
            #[route("/admin", AdminDashboardPage)]
            AdminDashboard {},
            #[route("/doctor", DoctorDashboardPage)]
            DoctorDashboard {},
            #[route("/patient", PatientDashboardPage)]
            PatientDashboard {},
            #[route("/book-appointment", BookAppointmentPage)]
            BookAppointment {},
            #[route("/profile", ProfilePage)]
            Profile {},
            #[route("/:..segments", NotFoundPage)]
            NotFound { segments: Vec<String> },
}

/// Declared views in match order. Paths here mirror the `#[route]`
/// attributes above; the guard resolves names through this table.
pub fn route_table() -> Result<RouteTable<Route>, RouteError> {
    RouteTable::new()
        .with_route("/", RouteName::Login, Route::Login {})?
        .with_route("/admin", RouteName::AdminDashboard, Route::AdminDashboard {})?
        .with_route("/doctor", RouteName::DoctorDashboard, Route::DoctorDashboard {})?
        .with_route("/patient", RouteName::PatientDashboard, Route::PatientDashboard {})?
        .with_route("/book-appointment", RouteName::BookAppointment, Route::BookAppointment {})?
        .with_route("/profile", RouteName::Profile, Route::Profile {})
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_matches_router_paths() {
        let table = route_table().unwrap();

        assert_eq!(table.len(), 6);
        for entry in table.iter() {
            assert_eq!(entry.view.to_string(), entry.path);
            assert_eq!(table.resolve(&entry.view.to_string()).unwrap().entry.name, entry.name);
        }
    }

    #[test]
    fn declared_paths_parse_to_their_variant() {
        let table = route_table().unwrap();

        for entry in table.iter() {
            assert_eq!(entry.path.parse::<Route>().unwrap(), entry.view);
        }
        assert_eq!(
            "/billing/2024".parse::<Route>().unwrap(),
            Route::NotFound {
                segments: vec!["billing".to_owned(), "2024".to_owned()],
            }
        );
    }

    #[test]
    fn unknown_paths_stay_unmatched() {
        let table = route_table().unwrap();
        let not_found = Route::NotFound {
            segments: vec!["billing".to_owned()],
        };

        assert!(table.resolve(&not_found.to_string()).is_none());
        assert!(table.resolve("/admin/settings").is_none());
    }

    #[test]
    fn redirect_target_is_login_view() {
        let table = route_table().unwrap();

        assert_eq!(table.by_name(RouteName::Login).unwrap().view, Route::Login {});
        assert_eq!(
            table.resolve("/book-appointment?doctor=3").unwrap().entry.view,
            Route::BookAppointment {}
        );
    }
}
