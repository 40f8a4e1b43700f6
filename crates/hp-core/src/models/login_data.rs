/// Credentials handed through to the server bootstrap. Never inspected here.
#[derive(Clone)]
pub struct LoginData {
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for LoginData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginData")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}
