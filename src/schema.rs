use crate::model::TaskStatus;

// Struct representing the request body for creating or updating a Task.
// Missing fields fall back to an empty string and the pending status.
#[derive(Debug, Default, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct TaskSchema {
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
}

#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct RegisterSchema {
    pub username: String,
    #[serde(default)]
    pub email: String,
    pub password: String,
}

#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct LoginSchema {
    pub username: String,
    pub password: String,
}

// Empty or absent email/password mean "leave unchanged"
#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct UpdateUserSchema {
    pub id: i64,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct DeleteUserSchema {
    pub id: i64,
}
