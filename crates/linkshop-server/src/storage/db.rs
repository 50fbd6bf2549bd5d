//! SQLite database layer

use super::default_profile;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use linkshop_core::ports::{CategoryStore, ProductStore, ProfileStore, SocialStore, Storage};
use linkshop_core::{
    Category, NewProduct, NewSocial, Price, Product, ProductUpdate, Profile, Result, ShopError,
    Social, SocialUpdate, Tag,
};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use std::str::FromStr;
use std::time::Duration;

const PRODUCT_COLUMNS: &str = r#"
    SELECT p.id, p.title, p.description, p.price_cents, p.image_url, p.image_public_id,
           p.external_url, p.tag, p.category_id, IFNULL(c.name, '') AS category, p.created_at
    FROM products p
    LEFT JOIN categories c ON c.id = p.category_id
"#;

pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Connect to `database_url` (e.g. `sqlite://data/shop.db` or `sqlite::memory:`)
    /// and bring the schema up to date.
    pub async fn connect(database_url: &str) -> Result<Self> {
        tracing::info!("Opening SQLite database at: {}", database_url);

        let in_memory = database_url.contains(":memory:");
        let mut options = SqliteConnectOptions::from_str(database_url)
            .map_err(db_err)?
            .create_if_missing(true);
        if !in_memory {
            options = options
                .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
                .synchronous(sqlx::sqlite::SqliteSynchronous::Normal);
        }

        // An in-memory database lives and dies with its single connection
        let pool_options = if in_memory {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None::<Duration>)
                .max_lifetime(None::<Duration>)
        } else {
            SqlitePoolOptions::new().max_connections(5)
        };

        let pool = pool_options.connect_with(options).await.map_err(db_err)?;

        tracing::info!("SQLite connection established, running migrations...");
        Self::run_migrations(&pool).await?;
        tracing::info!("Database initialization complete");

        Ok(Self { pool })
    }

    async fn run_migrations(pool: &SqlitePool) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS products (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                description TEXT NOT NULL DEFAULT '',
                price_cents INTEGER NOT NULL DEFAULT 0,
                image_url TEXT NOT NULL DEFAULT '',
                category_id INTEGER NULL,
                created_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP
            )
            "#,
        )
        .execute(pool)
        .await
        .map_err(db_err)?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_products_category ON products (category_id)",
        )
        .execute(pool)
        .await
        .map_err(db_err)?;

        // Columns added after the first release
        add_column(pool, "products", "external_url TEXT NOT NULL DEFAULT ''").await?;
        add_column(pool, "products", "tag TEXT NOT NULL DEFAULT 'mychoice'").await?;
        add_column(pool, "products", "image_public_id TEXT NOT NULL DEFAULT ''").await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS categories (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL UNIQUE
            )
            "#,
        )
        .execute(pool)
        .await
        .map_err(db_err)?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS socials (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                url TEXT NOT NULL,
                icon TEXT NOT NULL DEFAULT '',
                ord INTEGER NOT NULL DEFAULT 0
            )
            "#,
        )
        .execute(pool)
        .await
        .map_err(db_err)?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS profile (
                id INTEGER PRIMARY KEY CHECK (id = 1),
                display_name TEXT NOT NULL,
                username TEXT NOT NULL DEFAULT '',
                bio TEXT NOT NULL DEFAULT '',
                highlight TEXT NOT NULL DEFAULT '',
                avatar_url TEXT NOT NULL DEFAULT '',
                updated_at DATETIME DEFAULT CURRENT_TIMESTAMP
            )
            "#,
        )
        .execute(pool)
        .await
        .map_err(db_err)?;

        add_column(pool, "profile", "avatar_public_id TEXT NOT NULL DEFAULT ''").await?;

        let seed = default_profile();
        sqlx::query(
            r#"
            INSERT OR IGNORE INTO profile (id, display_name, username, bio, highlight, avatar_url)
            VALUES (1, ?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(&seed.display_name)
        .bind(&seed.username)
        .bind(&seed.bio)
        .bind(&seed.highlight)
        .bind(&seed.avatar_url)
        .execute(pool)
        .await
        .map_err(db_err)?;

        Ok(())
    }
}

/// `ALTER TABLE .. ADD COLUMN`, tolerating a column that already exists
async fn add_column(pool: &SqlitePool, table: &str, definition: &str) -> Result<()> {
    let statement = format!("ALTER TABLE {} ADD COLUMN {}", table, definition);
    match sqlx::query(&statement).execute(pool).await {
        Ok(_) => {
            tracing::info!("Migrated {}: added {}", table, definition);
            Ok(())
        }
        Err(e) if e.to_string().contains("duplicate column") => Ok(()),
        Err(e) => Err(db_err(e)),
    }
}

fn db_err(e: sqlx::Error) -> ShopError {
    ShopError::Database(e.to_string())
}

fn is_unique_violation(e: &sqlx::Error) -> bool {
    e.as_database_error()
        .map(|d| d.is_unique_violation())
        .unwrap_or(false)
}

fn category_write_err(e: sqlx::Error) -> ShopError {
    if is_unique_violation(&e) {
        ShopError::validation("category already exists")
    } else {
        db_err(e)
    }
}

#[async_trait]
impl ProductStore for Database {
    async fn list_products(&self) -> Result<Vec<Product>> {
        let rows: Vec<ProductRow> =
            sqlx::query_as(&format!("{} ORDER BY p.id DESC", PRODUCT_COLUMNS))
                .fetch_all(&self.pool)
                .await
                .map_err(db_err)?;

        Ok(rows.into_iter().map(|r| r.into()).collect())
    }

    async fn get_product(&self, id: i64) -> Result<Option<Product>> {
        let row: Option<ProductRow> =
            sqlx::query_as(&format!("{} WHERE p.id = ?1", PRODUCT_COLUMNS))
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(db_err)?;

        Ok(row.map(|r| r.into()))
    }

    async fn insert_product(&self, product: &NewProduct) -> Result<i64> {
        let result = sqlx::query(
            r#"
            INSERT INTO products (title, description, price_cents, image_url, image_public_id,
                                  external_url, tag, category_id, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
        )
        .bind(&product.title)
        .bind(&product.description)
        .bind(product.price.cents())
        .bind(&product.image.url)
        .bind(&product.image.public_id)
        .bind(&product.external_url)
        .bind(product.tag.as_str())
        .bind(product.category_id)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(result.last_insert_rowid())
    }

    async fn update_product(&self, id: i64, update: &ProductUpdate) -> Result<bool> {
        if update.is_empty() {
            return Ok(self.get_product(id).await?.is_some());
        }

        let mut query = QueryBuilder::<Sqlite>::new("UPDATE products SET ");
        {
            let mut columns = query.separated(", ");
            if let Some(title) = &update.title {
                columns.push("title = ");
                columns.push_bind_unseparated(title.clone());
            }
            if let Some(description) = &update.description {
                columns.push("description = ");
                columns.push_bind_unseparated(description.clone());
            }
            if let Some(price) = update.price {
                columns.push("price_cents = ");
                columns.push_bind_unseparated(price.cents());
            }
            if let Some(image) = &update.image {
                columns.push("image_url = ");
                columns.push_bind_unseparated(image.url.clone());
                columns.push("image_public_id = ");
                columns.push_bind_unseparated(image.public_id.clone());
            }
            if let Some(external_url) = &update.external_url {
                columns.push("external_url = ");
                columns.push_bind_unseparated(external_url.clone());
            }
            if let Some(tag) = update.tag {
                columns.push("tag = ");
                columns.push_bind_unseparated(tag.as_str());
            }
            if let Some(category_id) = update.category_id {
                columns.push("category_id = ");
                columns.push_bind_unseparated(category_id);
            }
        }
        query.push(" WHERE id = ").push_bind(id);

        let result = query
            .build()
            .execute(&self.pool)
            .await
            .map_err(db_err)?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_product(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM products WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_err)?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl CategoryStore for Database {
    async fn list_categories(&self) -> Result<Vec<Category>> {
        let rows: Vec<(i64, String)> =
            sqlx::query_as("SELECT id, name FROM categories ORDER BY name ASC")
                .fetch_all(&self.pool)
                .await
                .map_err(db_err)?;

        Ok(rows
            .into_iter()
            .map(|(id, name)| Category { id, name })
            .collect())
    }

    async fn get_category(&self, id: i64) -> Result<Option<Category>> {
        let row: Option<(i64, String)> =
            sqlx::query_as("SELECT id, name FROM categories WHERE id = ?1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(db_err)?;

        Ok(row.map(|(id, name)| Category { id, name }))
    }

    async fn insert_category(&self, name: &str) -> Result<Category> {
        let result = sqlx::query("INSERT INTO categories (name) VALUES (?1)")
            .bind(name)
            .execute(&self.pool)
            .await
            .map_err(category_write_err)?;

        Ok(Category {
            id: result.last_insert_rowid(),
            name: name.to_string(),
        })
    }

    async fn rename_category(&self, id: i64, name: &str) -> Result<bool> {
        let result = sqlx::query("UPDATE categories SET name = ?1 WHERE id = ?2")
            .bind(name)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(category_write_err)?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_category(&self, id: i64) -> Result<bool> {
        let mut tx = self.pool.begin().await.map_err(db_err)?;

        sqlx::query("UPDATE products SET category_id = NULL WHERE category_id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(db_err)?;

        let result = sqlx::query("DELETE FROM categories WHERE id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(db_err)?;

        if result.rows_affected() == 0 {
            tx.rollback().await.map_err(db_err)?;
            return Ok(false);
        }

        tx.commit().await.map_err(db_err)?;
        Ok(true)
    }
}

#[async_trait]
impl SocialStore for Database {
    async fn list_socials(&self) -> Result<Vec<Social>> {
        let rows: Vec<SocialRow> =
            sqlx::query_as("SELECT id, name, url, icon, ord FROM socials ORDER BY ord ASC, id ASC")
                .fetch_all(&self.pool)
                .await
                .map_err(db_err)?;

        Ok(rows.into_iter().map(|r| r.into()).collect())
    }

    async fn get_social(&self, id: i64) -> Result<Option<Social>> {
        let row: Option<SocialRow> =
            sqlx::query_as("SELECT id, name, url, icon, ord FROM socials WHERE id = ?1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(db_err)?;

        Ok(row.map(|r| r.into()))
    }

    async fn insert_social(&self, social: &NewSocial) -> Result<Social> {
        let result = sqlx::query("INSERT INTO socials (name, url, icon, ord) VALUES (?1, ?2, ?3, ?4)")
            .bind(&social.name)
            .bind(&social.url)
            .bind(&social.icon)
            .bind(social.ord)
            .execute(&self.pool)
            .await
            .map_err(db_err)?;

        Ok(Social {
            id: result.last_insert_rowid(),
            name: social.name.clone(),
            url: social.url.clone(),
            icon: social.icon.clone(),
            ord: social.ord,
        })
    }

    async fn update_social(&self, id: i64, update: &SocialUpdate) -> Result<bool> {
        if update.is_empty() {
            return Ok(self.get_social(id).await?.is_some());
        }

        let mut query = QueryBuilder::<Sqlite>::new("UPDATE socials SET ");
        {
            let mut columns = query.separated(", ");
            if let Some(name) = &update.name {
                columns.push("name = ");
                columns.push_bind_unseparated(name.clone());
            }
            if let Some(url) = &update.url {
                columns.push("url = ");
                columns.push_bind_unseparated(url.clone());
            }
            if let Some(icon) = &update.icon {
                columns.push("icon = ");
                columns.push_bind_unseparated(icon.clone());
            }
            if let Some(ord) = update.ord {
                columns.push("ord = ");
                columns.push_bind_unseparated(ord);
            }
        }
        query.push(" WHERE id = ").push_bind(id);

        let result = query
            .build()
            .execute(&self.pool)
            .await
            .map_err(db_err)?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_social(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM socials WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_err)?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl ProfileStore for Database {
    async fn get_profile(&self) -> Result<Profile> {
        let row: ProfileRow = sqlx::query_as(
            r#"
            SELECT display_name, username, bio, highlight, avatar_url, avatar_public_id
            FROM profile WHERE id = 1
            "#,
        )
        .fetch_one(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(row.into())
    }

    async fn save_profile(&self, profile: &Profile) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE profile
            SET display_name = ?1, username = ?2, bio = ?3, highlight = ?4,
                avatar_url = ?5, avatar_public_id = ?6, updated_at = datetime('now')
            WHERE id = 1
            "#,
        )
        .bind(&profile.display_name)
        .bind(&profile.username)
        .bind(&profile.bio)
        .bind(&profile.highlight)
        .bind(&profile.avatar_url)
        .bind(&profile.avatar_public_id)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(())
    }
}

impl Storage for Database {
    fn backend_name(&self) -> &'static str {
        "sqlite"
    }
}

// Helper structs for sqlx query_as
#[derive(sqlx::FromRow)]
struct ProductRow {
    id: i64,
    title: String,
    description: String,
    price_cents: i64,
    image_url: String,
    image_public_id: String,
    external_url: String,
    tag: String,
    category_id: Option<i64>,
    category: String,
    created_at: DateTime<Utc>,
}

impl From<ProductRow> for Product {
    fn from(r: ProductRow) -> Self {
        Product {
            id: r.id,
            title: r.title,
            description: r.description,
            price: Price::from_cents(r.price_cents),
            image_url: r.image_url,
            image_public_id: r.image_public_id,
            external_url: r.external_url,
            tag: Tag::from_input(&r.tag).unwrap_or_default(),
            category_id: r.category_id,
            category: r.category,
            created_at: r.created_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct SocialRow {
    id: i64,
    name: String,
    url: String,
    icon: String,
    ord: i32,
}

impl From<SocialRow> for Social {
    fn from(r: SocialRow) -> Self {
        Social {
            id: r.id,
            name: r.name,
            url: r.url,
            icon: r.icon,
            ord: r.ord,
        }
    }
}

#[derive(sqlx::FromRow)]
struct ProfileRow {
    display_name: String,
    username: String,
    bio: String,
    highlight: String,
    avatar_url: String,
    avatar_public_id: String,
}

impl From<ProfileRow> for Profile {
    fn from(r: ProfileRow) -> Self {
        Profile {
            display_name: r.display_name,
            username: r.username,
            bio: r.bio,
            highlight: r.highlight,
            avatar_url: r.avatar_url,
            avatar_public_id: r.avatar_public_id,
            socials: Vec::new(),
        }
    }
}
