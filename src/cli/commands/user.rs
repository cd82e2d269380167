use anyhow::bail;

use crate::config::Config;
use crate::db::Store;
use crate::services::forms::{PASSWORD_MIN_LEN, USERNAME_MAX_LEN};

pub async fn cmd_create_user(
    config: &Config,
    username: &str,
    email: Option<&str>,
    staff: bool,
    password: &str,
) -> anyhow::Result<()> {
    let username = username.trim();
    if username.is_empty() || username.chars().count() > USERNAME_MAX_LEN {
        bail!("Username must be between 1 and {USERNAME_MAX_LEN} characters");
    }
    if password.chars().count() < PASSWORD_MIN_LEN {
        bail!("Password must be at least {PASSWORD_MIN_LEN} characters");
    }

    let store = Store::new(&config.general.database_path).await?;
    if store.user_exists(username).await? {
        bail!("User '{username}' already exists");
    }

    let user = store
        .create_user(
            username,
            email.unwrap_or_default(),
            password,
            staff,
            &config.security,
        )
        .await?;

    let role = if user.is_staff { "staff" } else { "regular" };
    println!("✓ Created {role} user '{}' (id {})", user.username, user.id);
    Ok(())
}
