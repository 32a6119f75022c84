use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct AskPayload {
    #[serde(default)]
    pub question: Option<String>,
    #[serde(default)]
    pub session: Option<String>,
}
