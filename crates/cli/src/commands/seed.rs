//! Database seeding: a demo admin account and a starter catalog.
//!
//! Safe to run repeatedly: the admin account is reused if it already exists
//! and products are only inserted when that admin owns none yet.

use rust_decimal::Decimal;

use sugar_plum_admin::config::AdminConfig;
use sugar_plum_admin::db::admin_users::AdminUserRepository;
use sugar_plum_admin::db::create_pool;
use sugar_plum_admin::db::products::ProductRepository;
use sugar_plum_admin::models::product::NewProduct;
use sugar_plum_admin::services::auth::{AdminAuthService, AuthError};
use sugar_plum_core::{AdminRole, CurrencyCode, Email, Price};

/// The starter catalog: (title, description, image, price in cents).
const STARTER_CATALOG: &[(&str, &str, &str, i64)] = &[
    (
        "Sugar Plum Jam",
        "Small-batch jam from late-season sugar plums.",
        "/images/sugar-plum-jam.jpg",
        650,
    ),
    (
        "Damson Preserve",
        "Tart damson plums slow-cooked with raw cane sugar.",
        "/images/damson-preserve.jpg",
        720,
    ),
    (
        "Mirabelle Honey",
        "Wildflower honey infused with mirabelle blossoms.",
        "/images/mirabelle-honey.jpg",
        980,
    ),
    (
        "Greengage Chutney",
        "Savory chutney with greengages, ginger, and mustard seed.",
        "/images/greengage-chutney.jpg",
        840,
    ),
    (
        "Plum Blossom Tea",
        "Loose-leaf white tea scented with plum blossom.",
        "/images/plum-blossom-tea.jpg",
        1250,
    ),
];

/// Seed the database.
///
/// # Errors
///
/// Returns an error if the admin account cannot be created or the catalog
/// inserts fail.
pub async fn run(email: &str, password: &str) -> Result<(), Box<dyn std::error::Error>> {
    let config = AdminConfig::from_env()?;
    let pool = create_pool(&config.database_url).await?;

    let auth = AdminAuthService::new(&pool);
    let admin = match auth
        .create_account(email, "Demo Admin", AdminRole::Admin, password)
        .await
    {
        Ok(admin) => {
            tracing::info!(admin_id = %admin.id, "demo admin created");
            admin
        }
        Err(AuthError::AlreadyExists) => {
            let parsed = Email::parse(email)?;
            AdminUserRepository::new(&pool)
                .get_by_email(&parsed)
                .await?
                .ok_or("admin account vanished between create and lookup")?
        }
        Err(e) => return Err(e.into()),
    };

    let products = ProductRepository::new(&pool);
    if !products.list(Some(admin.id)).await?.is_empty() {
        tracing::info!("catalog already seeded, nothing to do");
        return Ok(());
    }

    for (title, description, image_url, cents) in STARTER_CATALOG {
        let product = products
            .create(
                admin.id,
                &NewProduct {
                    title: (*title).to_string(),
                    description: (*description).to_string(),
                    image_url: (*image_url).to_string(),
                    price: Price::new(Decimal::new(*cents, 2), CurrencyCode::USD)?,
                },
            )
            .await?;
        tracing::info!(product_id = %product.id, title = %product.title, "product seeded");
    }

    Ok(())
}
