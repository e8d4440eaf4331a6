use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Transition {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub to: Option<TransitionTarget>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct TransitionTarget {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct TransitionsResponse {
    #[serde(default)]
    pub transitions: Vec<Transition>,
}
