//! Applies a decoded request body onto a programmer.
//!
//! The set of writable fields is a fixed table: `avatarNumber` and
//! `tagLine` are always writable, `nickname` only while the programmer has
//! not been saved yet. Every other key in the body is ignored.

use serde_json::{Map, Value};

use super::validation::FieldErrors;
use crate::database::Programmer;
use crate::middleware::AuthUser;

/// How missing keys are treated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeMode {
    /// POST and PUT: a missing key clears the field
    Replace,
    /// PATCH: a missing key leaves the field alone
    Partial,
}

/// Request body that could not be read as a JSON object
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum MalformedBody {
    #[error("Request body is not valid JSON: {0}")]
    Syntax(String),
    #[error("Request body must be a JSON object, got {0}")]
    NotAnObject(&'static str),
}

/// A request body known to be a JSON object
#[derive(Debug, Clone, Default)]
pub struct RequestBody(Map<String, Value>);

impl RequestBody {
    /// Decode raw bytes. An empty body is an empty object.
    pub fn decode(raw: &[u8]) -> Result<Self, MalformedBody> {
        if raw.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }

        let value: Value = serde_json::from_slice(raw).map_err(|e| MalformedBody::Syntax(e.to_string()))?;
        match value {
            Value::Object(map) => Ok(Self(map)),
            Value::Array(_) => Err(MalformedBody::NotAnObject("an array")),
            Value::String(_) => Err(MalformedBody::NotAnObject("a string")),
            Value::Number(_) => Err(MalformedBody::NotAnObject("a number")),
            Value::Bool(_) => Err(MalformedBody::NotAnObject("a boolean")),
            Value::Null => Err(MalformedBody::NotAnObject("null")),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Writable {
    Always,
    OnCreate,
}

type Setter = fn(&mut Programmer, &Value) -> Result<(), String>;

struct MutableField {
    name: &'static str,
    writable: Writable,
    set: Setter,
}

const MUTABLE_FIELDS: [MutableField; 3] = [
    MutableField {
        name: "avatarNumber",
        writable: Writable::Always,
        set: set_avatar_number,
    },
    MutableField {
        name: "tagLine",
        writable: Writable::Always,
        set: set_tag_line,
    },
    MutableField {
        name: "nickname",
        writable: Writable::OnCreate,
        set: set_nickname,
    },
];

/// Names of the fields a request may write to `programmer`
pub fn writable_fields(programmer: &Programmer) -> Vec<&'static str> {
    let is_new = programmer.is_new();
    MUTABLE_FIELDS
        .iter()
        .filter(|field| field.writable == Writable::Always || is_new)
        .map(|field| field.name)
        .collect()
}

/// Apply `body` onto `programmer`.
///
/// New programmers are assigned to `caller`. Values of the wrong JSON type
/// come back as field errors, to be reported alongside validation failures.
pub fn merge(mode: MergeMode, body: &RequestBody, programmer: &mut Programmer, caller: &AuthUser) -> FieldErrors {
    let is_new = programmer.is_new();
    let cleared = Value::Null;
    let mut errors = FieldErrors::new();

    for field in MUTABLE_FIELDS.iter() {
        if field.writable == Writable::OnCreate && !is_new {
            continue;
        }

        let value = match (body.get(field.name), mode) {
            (Some(value), _) => value,
            (None, MergeMode::Partial) => continue,
            (None, MergeMode::Replace) => &cleared,
        };

        if let Err(message) = (field.set)(programmer, value) {
            errors.add(field.name, message);
        }
    }

    if is_new {
        programmer.owner_id = Some(caller.id);
    }

    tracing::debug!(?mode, is_new, rejected = errors.len(), "Merged request body");
    errors
}

fn set_avatar_number(programmer: &mut Programmer, value: &Value) -> Result<(), String> {
    programmer.avatar_number = None;
    let number = match value {
        Value::Null => return Ok(()),
        Value::Number(n) => n.as_i64().and_then(|n| i32::try_from(n).ok()),
        Value::String(s) => s.trim().parse::<i32>().ok(),
        _ => None,
    };

    match number {
        Some(n) => {
            programmer.avatar_number = Some(n);
            Ok(())
        }
        None => Err("The avatar number must be a whole number".to_string()),
    }
}

fn set_tag_line(programmer: &mut Programmer, value: &Value) -> Result<(), String> {
    programmer.tag_line = optional_string(value).ok_or("The tag line must be text")?;
    Ok(())
}

fn set_nickname(programmer: &mut Programmer, value: &Value) -> Result<(), String> {
    programmer.nickname = optional_string(value).ok_or("The nickname must be text")?;
    Ok(())
}

/// `Some(None)` for null, `None` for a non-string value
fn optional_string(value: &Value) -> Option<Option<String>> {
    match value {
        Value::Null => Some(None),
        Value::String(s) => Some(Some(s.clone())),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use uuid::Uuid;

    fn body(value: Value) -> RequestBody {
        RequestBody::decode(value.to_string().as_bytes()).unwrap()
    }

    fn caller() -> AuthUser {
        AuthUser {
            id: Uuid::new_v4(),
            name: "ryan".to_string(),
        }
    }

    fn existing(owner: Uuid) -> Programmer {
        Programmer {
            id: Some(Uuid::new_v4()),
            nickname: Some("ezra".to_string()),
            avatar_number: Some(3),
            tag_line: Some("hi".to_string()),
            power_level: 7,
            owner_id: Some(owner),
        }
    }

    #[test]
    fn decode_rejects_non_objects() {
        assert!(matches!(RequestBody::decode(b"[1, 2]"), Err(MalformedBody::NotAnObject("an array"))));
        assert!(matches!(RequestBody::decode(b"42"), Err(MalformedBody::NotAnObject("a number"))));
        assert!(matches!(RequestBody::decode(b"null"), Err(MalformedBody::NotAnObject("null"))));
        assert!(matches!(RequestBody::decode(b"{\"nickname\": "), Err(MalformedBody::Syntax(_))));
    }

    #[test]
    fn decode_treats_empty_body_as_empty_object() {
        let body = RequestBody::decode(b"").unwrap();
        assert!(body.get("nickname").is_none());
        assert!(RequestBody::decode(b"  \n").is_ok());
    }

    #[test]
    fn create_sets_whitelisted_fields_and_owner() {
        let user = caller();
        let mut programmer = Programmer::new();

        let errors = merge(
            MergeMode::Replace,
            &body(json!({"nickname": "ezra", "avatarNumber": 3, "tagLine": "hi"})),
            &mut programmer,
            &user,
        );

        assert!(errors.is_empty());
        assert_eq!(programmer.nickname.as_deref(), Some("ezra"));
        assert_eq!(programmer.avatar_number, Some(3));
        assert_eq!(programmer.tag_line.as_deref(), Some("hi"));
        assert_eq!(programmer.owner_id, Some(user.id));
        assert!(programmer.id.is_none());
    }

    #[test]
    fn read_only_keys_are_ignored() {
        let user = caller();
        let mut programmer = Programmer::new();

        merge(
            MergeMode::Replace,
            &body(json!({
                "nickname": "ezra",
                "avatarNumber": 3,
                "powerLevel": 9000,
                "ownerId": Uuid::new_v4(),
                "userId": Uuid::new_v4(),
                "id": Uuid::new_v4(),
            })),
            &mut programmer,
            &user,
        );

        assert_eq!(programmer.power_level, 0);
        assert_eq!(programmer.owner_id, Some(user.id));
        assert!(programmer.id.is_none());
    }

    #[test]
    fn replace_clears_omitted_fields() {
        let user = caller();
        let mut programmer = existing(user.id);

        let errors = merge(MergeMode::Replace, &body(json!({"avatarNumber": 5})), &mut programmer, &user);

        assert!(errors.is_empty());
        assert_eq!(programmer.avatar_number, Some(5));
        assert_eq!(programmer.tag_line, None);
        assert_eq!(programmer.nickname.as_deref(), Some("ezra"));
    }

    #[test]
    fn partial_leaves_omitted_fields_untouched() {
        let user = caller();
        let mut programmer = existing(user.id);
        let before = programmer.clone();

        merge(MergeMode::Partial, &body(json!({})), &mut programmer, &user);
        assert_eq!(programmer, before);

        merge(MergeMode::Partial, &body(json!({"tagLine": "new line"})), &mut programmer, &user);
        assert_eq!(programmer.tag_line.as_deref(), Some("new line"));
        assert_eq!(programmer.avatar_number, Some(3));
    }

    #[test]
    fn partial_with_explicit_null_clears_field() {
        let user = caller();
        let mut programmer = existing(user.id);

        merge(MergeMode::Partial, &body(json!({"tagLine": null})), &mut programmer, &user);
        assert_eq!(programmer.tag_line, None);
    }

    #[test]
    fn nickname_is_immutable_once_saved() {
        let user = caller();
        let mut programmer = existing(user.id);

        merge(MergeMode::Partial, &body(json!({"nickname": "new"})), &mut programmer, &user);
        assert_eq!(programmer.nickname.as_deref(), Some("ezra"));

        merge(MergeMode::Replace, &body(json!({"nickname": "new", "avatarNumber": 1})), &mut programmer, &user);
        assert_eq!(programmer.nickname.as_deref(), Some("ezra"));
    }

    #[test]
    fn update_never_reassigns_owner() {
        let owner = caller();
        let other = caller();
        let mut programmer = existing(owner.id);

        merge(MergeMode::Replace, &body(json!({"avatarNumber": 2})), &mut programmer, &other);
        assert_eq!(programmer.owner_id, Some(owner.id));
    }

    #[test]
    fn wrong_types_become_field_errors() {
        let user = caller();
        let mut programmer = Programmer::new();

        let errors = merge(
            MergeMode::Replace,
            &body(json!({"nickname": 12, "avatarNumber": "abc", "tagLine": ["x"]})),
            &mut programmer,
            &user,
        );

        assert_eq!(errors.fields(), vec!["avatarNumber", "nickname", "tagLine"]);
        assert_eq!(programmer.avatar_number, None);
    }

    #[test]
    fn numeric_strings_are_accepted_for_avatar_number() {
        let user = caller();
        let mut programmer = Programmer::new();

        let errors = merge(MergeMode::Partial, &body(json!({"avatarNumber": " 4 "})), &mut programmer, &user);
        assert!(errors.is_empty());
        assert_eq!(programmer.avatar_number, Some(4));
    }

    #[test]
    fn writable_fields_depend_on_persistence() {
        assert_eq!(writable_fields(&Programmer::new()), vec!["avatarNumber", "tagLine", "nickname"]);
        assert_eq!(writable_fields(&existing(Uuid::new_v4())), vec!["avatarNumber", "tagLine"]);
    }
}
