use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::{Validate, ValidationError};

/// Row of the `users` table.
///
/// `id` and both timestamps stay `None` until the repository saves the row.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct User {
    pub id: Option<i64>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub address: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl User {
    /// Unsaved user built from a transfer object. Any id on the input is ignored.
    pub fn new(dto: UserDto) -> Self {
        Self {
            id: None,
            first_name: dto.first_name,
            last_name: dto.last_name,
            email: dto.email,
            phone: dto.phone,
            address: dto.address,
            created_at: None,
            updated_at: None,
        }
    }

    /// Overwrites the contact fields in place; id and timestamps are kept.
    pub fn apply_update(&mut self, dto: UserDto) {
        self.first_name = dto.first_name;
        self.last_name = dto.last_name;
        self.email = dto.email;
        self.phone = dto.phone;
        self.address = dto.address;
    }
}

/// Public shape of a user, used for request and response bodies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[validate(
        length(max = 50, message = "First name must not exceed 50 characters"),
        custom(function = "not_blank", message = "First name is required")
    )]
    pub first_name: String,
    #[validate(
        length(max = 50, message = "Last name must not exceed 50 characters"),
        custom(function = "not_blank", message = "Last name is required")
    )]
    pub last_name: String,
    #[validate(
        email(message = "Email should be valid"),
        length(max = 100, message = "Email must not exceed 100 characters"),
        custom(function = "not_blank", message = "Email is required")
    )]
    pub email: String,
    #[validate(
        length(max = 20, message = "Phone number must not exceed 20 characters"),
        custom(function = "not_blank", message = "Phone number is required")
    )]
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 255, message = "Address must not exceed 255 characters"))]
    pub address: Option<String>,
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            phone: user.phone,
            address: user.address,
        }
    }
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}
