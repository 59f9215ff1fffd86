use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::traits::HiveWorker;
use crate::HiveResult;

#[async_trait]
pub trait TokenWorker: HiveWorker {
    /// Issues a new access token.
    async fn get(&self) -> HiveResult<String>;

    async fn expired(&self, token: &str) -> HiveResult<bool>;

    async fn verify(&self, token: &str) -> HiveResult<bool>;
}

pub trait EncryptionWorker: HiveWorker {
    fn base64_encode(&self, plain: &str) -> String;

    fn base64_decode(&self, encoded: &str) -> HiveResult<String>;

    fn symmetric_encrypt(&self, plain: &str) -> HiveResult<String>;

    fn symmetric_decrypt(&self, cipher: &str) -> HiveResult<String>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

#[async_trait]
pub trait UserWorker: HiveWorker {
    async fn create(&self, email: &str, password: &str) -> HiveResult<AuthUser>;

    async fn get(&self, email: &str) -> HiveResult<Option<AuthUser>>;

    async fn login(&self, email: &str, password: &str) -> HiveResult<AuthUser>;

    async fn password_change_request(&self, email: &str) -> HiveResult<bool>;

    async fn update(&self, user: &AuthUser) -> HiveResult<AuthUser>;

    async fn delete(&self, email: &str) -> HiveResult<bool>;
}
