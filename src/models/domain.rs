use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

/// Which side of a pairing a user sits on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "participant_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Mentor,
    Mentee,
}

impl Role {
    /// The role a user of this role gets paired with
    pub fn counterpart(self) -> Role {
        match self {
            Role::Mentor => Role::Mentee,
            Role::Mentee => Role::Mentor,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Mentor => "mentor",
            Role::Mentee => "mentee",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Matching input: an identifier, a role and a preference set
///
/// Preferences live in a `HashSet`, so duplicates collapse on construction
/// and membership checks stay O(1) during scoring.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participant {
    pub id: String,
    pub role: Role,
    pub preferences: HashSet<String>,
}

impl Participant {
    pub fn new<I, S>(id: impl Into<String>, role: Role, preferences: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id: id.into(),
            role,
            preferences: preferences.into_iter().map(Into::into).collect(),
        }
    }

    pub fn mentor<I, S>(id: impl Into<String>, preferences: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(id, Role::Mentor, preferences)
    }

    pub fn mentee<I, S>(id: impl Into<String>, preferences: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(id, Role::Mentee, preferences)
    }
}

/// A mentor paired with a mentee, and the score the pair was chosen with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchedPair {
    pub mentor: Participant,
    pub mentee: Participant,
    pub score: usize,
}

/// Stored user record
///
/// `password_hash` never leaves the service; responses use [`UserSummary`].
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub preferences: Vec<String>,
    pub bio: Option<String>,
    pub verified: bool,
    pub picture_path: Option<String>,
    pub picture_content_type: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl User {
    pub fn summary(&self) -> UserSummary {
        UserSummary {
            id: self.id,
            username: self.username.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            role: self.role,
            preferences: self.preferences.clone(),
            bio: self.bio.clone(),
            verified: self.verified,
            has_picture: self.picture_path.is_some(),
        }
    }

    pub fn participant(&self) -> Participant {
        Participant::new(self.id.to_string(), self.role, self.preferences.iter().cloned())
    }
}

/// Public projection of a user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: Uuid,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
    pub preferences: Vec<String>,
    pub bio: Option<String>,
    pub verified: bool,
    pub has_picture: bool,
}

/// Fields needed to insert a user
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub preferences: Vec<String>,
    pub bio: Option<String>,
}

/// Partial update; `None` leaves the column untouched
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub role: Option<Role>,
    pub preferences: Option<Vec<String>>,
    pub bio: Option<String>,
}

impl UserChanges {
    pub fn is_empty(&self) -> bool {
        self.username.is_none()
            && self.first_name.is_none()
            && self.last_name.is_none()
            && self.email.is_none()
            && self.password_hash.is_none()
            && self.role.is_none()
            && self.preferences.is_none()
            && self.bio.is_none()
    }
}

/// A short private note owned by a user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Secret {
    pub id: Uuid,
    pub user_id: Uuid,
    pub message: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}
