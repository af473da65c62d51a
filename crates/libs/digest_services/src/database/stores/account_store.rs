use crate::database::DbError;
use sqlx::{Executor, Postgres};

/// App id / config key under which the host stores a user's mail address.
const SETTINGS_APP_ID: &str = "settings";
const EMAIL_KEY: &str = "email";

/// A host account as needed for addressing mail. `email` is `None` when the
/// user has no address on file.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct UserAccount {
    pub user_id: String,
    pub display_name: Option<String>,
    pub email: Option<String>,
}

impl UserAccount {
    /// Display name with the user id as fallback.
    #[must_use]
    pub fn display_name_or_id(&self) -> &str {
        match self.display_name.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => &self.user_id,
        }
    }
}

pub struct AccountStore;

impl AccountStore {
    pub async fn find_account(
        executor: impl Executor<'_, Database = Postgres>,
        user_id: &str,
    ) -> Result<Option<UserAccount>, DbError> {
        Ok(sqlx::query_as::<_, UserAccount>(
            r#"
            SELECT u.uid AS user_id, u.displayname AS display_name, p.configvalue AS email
            FROM users u
            LEFT JOIN preferences p
              ON p.userid = u.uid AND p.appid = $2 AND p.configkey = $3
            WHERE u.uid = $1
            "#,
        )
        .bind(user_id)
        .bind(SETTINGS_APP_ID)
        .bind(EMAIL_KEY)
        .fetch_optional(executor)
        .await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_name_falls_back_to_user_id() {
        let account = UserAccount {
            user_id: "alice".into(),
            display_name: None,
            email: None,
        };
        assert_eq!(account.display_name_or_id(), "alice");

        let account = UserAccount {
            user_id: "alice".into(),
            display_name: Some(String::new()),
            email: None,
        };
        assert_eq!(account.display_name_or_id(), "alice");

        let account = UserAccount {
            user_id: "alice".into(),
            display_name: Some("Alice A.".into()),
            email: None,
        };
        assert_eq!(account.display_name_or_id(), "Alice A.");
    }
}
