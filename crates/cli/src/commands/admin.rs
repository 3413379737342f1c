//! Admin account management commands.

use sugar_plum_admin::config::AdminConfig;
use sugar_plum_admin::db::admin_users::AdminUserRepository;
use sugar_plum_admin::db::create_pool;
use sugar_plum_admin::services::auth::AdminAuthService;
use sugar_plum_core::AdminRole;

/// Create an admin account.
///
/// # Errors
///
/// Returns an error for invalid input (email, role, weak password) or if
/// the database operation fails.
pub async fn create_account(
    email: &str,
    name: &str,
    password: &str,
    role: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let role = role.parse::<AdminRole>()?;

    let config = AdminConfig::from_env()?;
    let pool = create_pool(&config.database_url).await?;

    let admin = AdminAuthService::new(&pool)
        .create_account(email, name, role, password)
        .await?;

    tracing::info!(admin_id = %admin.id, email = %admin.email, role = %admin.role, "admin account created");
    Ok(())
}

/// List all admin accounts.
///
/// # Errors
///
/// Returns an error if the database operation fails.
pub async fn list_accounts() -> Result<(), Box<dyn std::error::Error>> {
    let config = AdminConfig::from_env()?;
    let pool = create_pool(&config.database_url).await?;

    let accounts = AdminUserRepository::new(&pool).list_all().await?;

    #[allow(clippy::print_stdout)]
    for account in accounts {
        println!(
            "{:>4}  {:<32}  {:<12}  {}",
            account.id, account.email, account.role, account.name
        );
    }

    Ok(())
}
