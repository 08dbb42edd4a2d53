use std::fmt;

/// 로그인 자격 증명
///
/// `Debug` 출력에서 비밀번호는 항상 가려집니다.
#[derive(Clone)]
pub struct Login {
    pub email: String,
    pub secret: String,
}

impl Login {
    pub fn new(email: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            secret: secret.into(),
        }
    }

    /// 조회용으로 정규화된 이메일 (앞뒤 공백 제거, 소문자)
    pub fn normalized_email(&self) -> String {
        normalize_email(&self.email)
    }
}

impl fmt::Debug for Login {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Login")
            .field("email", &self.email)
            .field("secret", &"***")
            .finish()
    }
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
