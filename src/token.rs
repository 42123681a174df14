/// Bot credential used for both the gateway identify frame and REST calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub app_id: u64,
    pub access_token: String,
}

impl Token {
    pub fn bot(app_id: u64, access_token: String) -> Self {
        Self {
            app_id,
            access_token,
        }
    }

    /// Wire form carried in the identify payload: `<app_id>.<access_token>`.
    pub fn render(&self) -> String {
        format!("{}.{}", self.app_id, self.access_token)
    }

    /// Value for the `Authorization` header on REST calls.
    pub fn authorization(&self) -> String {
        format!("Bot {}", self.render())
    }
}
