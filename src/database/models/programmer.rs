use uuid::Uuid;

/// A programmer as the store holds it.
///
/// `id` is absent until the first save; `owner_id` is the user who created
/// the programmer and never changes afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Programmer {
    pub id: Option<Uuid>,
    pub nickname: Option<String>,
    pub avatar_number: Option<i32>,
    pub tag_line: Option<String>,
    pub power_level: i32,
    pub owner_id: Option<Uuid>,
}

impl Programmer {
    /// Blank programmer waiting for its first request body
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_new(&self) -> bool {
        self.id.is_none()
    }

    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.owner_id == Some(user_id)
    }
}
