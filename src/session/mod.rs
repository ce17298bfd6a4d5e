pub mod storage;

use chrono::NaiveDateTime;
use derive_more::Display;
use dioxus::logger::tracing;
use serde_json::{Number, Value};

use crate::routing::RouteName;

pub use storage::{BrowserStore, MemoryStore, SessionStore};

pub const SESSION_KEY: &str = "user";

#[derive(Debug, Display, Clone, PartialEq, Eq)]
pub enum UserId {
    Number(Number),
    Text(String),
}

impl UserId {
    // zero and "" count as missing, like a falsy id on the login side;
    // booleans, arrays and objects are not identifiers
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) if non_zero(n) => Some(Self::Number(n.clone())),
            Value::String(s) if !s.is_empty() => Some(Self::Text(s.clone())),
            _ => None,
        }
    }
}

fn non_zero(n: &Number) -> bool {
    if let Some(i) = n.as_i64() {
        return i != 0;
    }
    if let Some(u) = n.as_u64() {
        return u != 0;
    }
    n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan())
}

#[derive(Debug, Display, Default, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    #[display("admin")]
    Admin,
    #[display("doctor")]
    Doctor,
    #[display("patient")]
    Patient,
    #[default]
    #[display("unknown")]
    Unknown,
}

impl Role {
    fn parse(s: &str) -> Self {
        match s {
            "admin" => Self::Admin,
            "doctor" => Self::Doctor,
            "patient" => Self::Patient,
            _ => Self::Unknown,
        }
    }

    /// Landing view after login.
    pub fn dashboard(&self) -> RouteName {
        match self {
            Self::Admin => RouteName::AdminDashboard,
            Self::Doctor => RouteName::DoctorDashboard,
            Self::Patient | Self::Unknown => RouteName::PatientDashboard,
        }
    }
}

/// The record the login flow stores under [`SESSION_KEY`]. Only `id` is
/// required; the rest is whatever the backend's user payload carried.
/// The payload itself is kept and is what gets persisted, so roles and
/// fields this struct does not model survive a round trip.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionUser {
    pub id: UserId,
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: Role,
    pub phone: Option<String>,
    pub created_at: Option<NaiveDateTime>,
    record: Value,
}

impl SessionUser {
    pub fn from_value(value: &Value) -> Option<Self> {
        let record = value.as_object()?;
        let id = UserId::from_value(record.get("id")?)?;

        let text = |field: &str| record.get(field).and_then(Value::as_str).map(str::to_owned);

        Some(Self {
            record: value.clone(),
            id,
            name: text("name"),
            email: text("email"),
            role: record
                .get("role")
                .and_then(Value::as_str)
                .map(Role::parse)
                .unwrap_or_default(),
            phone: text("phone"),
            created_at: record
                .get("created_at")
                .and_then(Value::as_str)
                .and_then(|s| s.parse::<NaiveDateTime>().ok()),
        })
    }

    pub fn record(&self) -> &Value {
        &self.record
    }

    pub fn display_name(&self) -> String {
        match (&self.name, &self.email) {
            (Some(name), _) if !name.is_empty() => name.clone(),
            (_, Some(email)) if !email.is_empty() => email.clone(),
            _ => format!("user {}", self.id),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Session {
    Authenticated(SessionUser),
    Anonymous,
}

impl Session {
    /// Never fails: a missing, unparseable or id-less marker is `Anonymous`.
    pub fn decode(raw: Option<&str>) -> Self {
        let Some(raw) = raw else {
            return Self::Anonymous;
        };

        let value = match serde_json::from_str::<Value>(raw) {
            Ok(value) => value,
            Err(err) => {
                tracing::warn!("ignoring malformed session marker: {err}");
                return Self::Anonymous;
            }
        };

        match SessionUser::from_value(&value) {
            Some(user) => Self::Authenticated(user),
            None => Self::Anonymous,
        }
    }

    pub fn load(store: &impl SessionStore, key: &str) -> Self {
        Self::decode(store.get_item(key).as_deref())
    }

    pub fn persist(store: &impl SessionStore, key: &str, user: &SessionUser) -> anyhow::Result<()> {
        store.set_item(key, &serde_json::to_string(user.record())?)
    }

    pub fn clear(store: &impl SessionStore, key: &str) -> anyhow::Result<()> {
        store.remove_item(key)
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }

    pub fn user(&self) -> Option<&SessionUser> {
        match self {
            Self::Authenticated(user) => Some(user),
            Self::Anonymous => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_or_malformed_marker_is_anonymous() {
        for raw in [None, Some(""), Some("not-json"), Some("{"), Some("null"), Some("[1]"), Some("42")] {
            assert_eq!(Session::decode(raw), Session::Anonymous, "{raw:?}");
        }
    }

    #[test]
    fn marker_without_usable_id_is_anonymous() {
        for raw in [
            "{}",
            r#"{"name":"Ann"}"#,
            r#"{"id":null}"#,
            r#"{"id":0}"#,
            r#"{"id":""}"#,
            r#"{"id":0.0}"#,
            r#"{"id":-0.0}"#,
            r#"{"id":true}"#,
            r#"{"id":[1]}"#,
        ] {
            assert_eq!(Session::decode(Some(raw)), Session::Anonymous, "{raw}");
        }
    }

    #[test]
    fn marker_with_id_is_authenticated() {
        let session = Session::decode(Some(r#"{"id": 42}"#));

        assert!(session.is_authenticated());
        assert_eq!(session.user().unwrap().id, UserId::Number(42.into()));
        assert_eq!(session.user().unwrap().role, Role::Unknown);

        let session = Session::decode(Some(r#"{"id": "u-7"}"#));
        assert_eq!(session.user().unwrap().id, UserId::Text("u-7".to_owned()));

        for raw in [
            r#"{"id": 42.0}"#,
            r#"{"id": 1.5}"#,
            r#"{"id": -3}"#,
            r#"{"id": 18446744073709551615}"#,
        ] {
            assert!(Session::decode(Some(raw)).is_authenticated(), "{raw}");
        }

        let session = Session::decode(Some(r#"{"id": 18446744073709551615}"#));
        assert_eq!(session.user().unwrap().id.to_string(), "18446744073709551615");
    }

    #[test]
    fn decodes_backend_user_payload() {
        let raw = r#"{
            "id": 3,
            "name": "Dr. Rao",
            "email": "rao@clinic.test",
            "role": "doctor",
            "phone": null,
            "created_at": "2024-05-01T09:30:00.123456"
        }"#;

        let user = Session::decode(Some(raw)).user().cloned().unwrap();
        assert_eq!(user.name.as_deref(), Some("Dr. Rao"));
        assert_eq!(user.email.as_deref(), Some("rao@clinic.test"));
        assert_eq!(user.role, Role::Doctor);
        assert_eq!(user.phone, None);
        assert_eq!(
            user.created_at.unwrap().format("%Y-%m-%d %H:%M").to_string(),
            "2024-05-01 09:30"
        );
        assert_eq!(user.role.dashboard(), RouteName::DoctorDashboard);
    }

    #[test]
    fn ill_typed_optional_fields_do_not_reject_the_session() {
        let raw = r#"{"id": 9, "role": 5, "name": ["x"], "created_at": "yesterday"}"#;

        let user = Session::decode(Some(raw)).user().cloned().unwrap();
        assert_eq!(user.role, Role::Unknown);
        assert_eq!(user.name, None);
        assert_eq!(user.created_at, None);
        assert_eq!(user.display_name(), "user 9");
    }

    #[test]
    fn persist_and_clear_through_store() {
        let store = MemoryStore::default();
        let user = SessionUser::from_value(&serde_json::json!({
            "id": 12,
            "email": "pat@clinic.test",
            "role": "patient",
            "created_at": "2024-01-02T03:04:05"
        }))
        .unwrap();

        Session::persist(&store, SESSION_KEY, &user).unwrap();
        assert_eq!(Session::load(&store, SESSION_KEY), Session::Authenticated(user.clone()));
        assert_eq!(user.display_name(), "pat@clinic.test");

        Session::clear(&store, SESSION_KEY).unwrap();
        assert_eq!(Session::load(&store, SESSION_KEY), Session::Anonymous);
    }

    #[test]
    fn persisting_keeps_the_backend_record_verbatim() {
        let store = MemoryStore::default();
        let payload = serde_json::json!({
            "id": 5,
            "name": "Sam",
            "role": "nurse",
            "ward": "B2",
            "created_at": null
        });
        let user = SessionUser::from_value(&payload).unwrap();
        assert_eq!(user.role, Role::Unknown);

        Session::persist(&store, SESSION_KEY, &user).unwrap();

        let stored: Value = serde_json::from_str(&store.get_item(SESSION_KEY).unwrap()).unwrap();
        assert_eq!(stored, payload);
        assert_eq!(stored["role"], "nurse");
        assert_eq!(Session::load(&store, SESSION_KEY).user().unwrap().record(), &payload);
    }

    #[test]
    fn roles_land_on_their_dashboard() {
        assert_eq!(Role::parse("admin").dashboard(), RouteName::AdminDashboard);
        assert_eq!(Role::parse("patient").dashboard(), RouteName::PatientDashboard);
        assert_eq!(Role::parse("nurse"), Role::Unknown);
        assert_eq!(Role::Unknown.dashboard(), RouteName::PatientDashboard);
        assert_eq!(Role::Doctor.to_string(), "doctor");
    }
}
