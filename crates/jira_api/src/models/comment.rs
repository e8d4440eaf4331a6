use crate::models::UserRef;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Clone)]
pub struct Comment {
    pub id: String,
    #[serde(default)]
    pub author: Option<UserRef>,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub created: String,
    #[serde(default)]
    pub visibility: Option<Visibility>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Visibility {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub value: String,
}

#[derive(Debug, Deserialize)]
pub struct CommentsResponse {
    #[serde(default)]
    pub comments: Vec<Comment>,
}

#[derive(Debug, Serialize)]
pub struct CommentRequest<'a> {
    pub body: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visibility: Option<VisibilityRequest<'a>>,
}

/// Restricts a comment to a group, e.g. "Internal users".
#[derive(Debug, Serialize)]
pub struct VisibilityRequest<'a> {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub value: &'a str,
}

impl<'a> VisibilityRequest<'a> {
    pub fn group(value: &'a str) -> Self {
        Self {
            kind: "group",
            value,
        }
    }
}
