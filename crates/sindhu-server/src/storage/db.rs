//! SQLite catalog store (embedded, durable)

use anyhow::{Context, Result as AnyResult};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sindhu_core::ports::{
    CatalogStore, ContactStore, ProductStore, ReviewStore, TestimonialStore, UserStore,
};
use sindhu_core::{
    check_discount, CatalogError, ContactMessage, NewContactMessage, NewProduct,
    NewProductReview, NewTestimonial, NewUser, PricingError, Product, ProductPatch,
    ProductReview, Result, Testimonial, TestimonialPatch, User,
};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use std::str::FromStr;

const PRODUCT_COLUMNS: &str = "id, name, description, price, category, image_url, \
     additional_images, featured, discount_price, stock_count";

pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open (creating if missing) the database file and run migrations
    pub async fn connect(database_path: &str) -> AnyResult<Self> {
        tracing::info!("Opening SQLite database at: {}", database_path);

        if let Some(parent) = std::path::Path::new(database_path).parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await.with_context(|| {
                    format!("Failed to create database directory: {}", parent.display())
                })?;
            }
        }

        let options = SqliteConnectOptions::new()
            .filename(database_path)
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .with_context(|| format!("Failed to connect to SQLite database at: {}", database_path))?;

        Self::from_pool(pool).await
    }

    /// Private in-memory database, gone when the store is dropped
    pub async fn in_memory() -> AnyResult<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);

        // A second connection would see a different, empty database
        let pool = SqlitePoolOptions::new()
            .min_connections(1)
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .context("Failed to open in-memory SQLite database")?;

        Self::from_pool(pool).await
    }

    async fn from_pool(pool: SqlitePool) -> AnyResult<Self> {
        tracing::info!("SQLite connection established, running migrations...");
        Self::run_migrations(&pool)
            .await
            .context("Failed to run database migrations")?;
        tracing::info!("Database initialization complete");
        Ok(Self { pool })
    }

    async fn run_migrations(pool: &SqlitePool) -> AnyResult<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS products (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                description TEXT,
                price INTEGER NOT NULL,
                category TEXT NOT NULL,
                image_url TEXT,
                additional_images TEXT NOT NULL DEFAULT '[]',
                featured BOOLEAN NOT NULL DEFAULT FALSE,
                discount_price INTEGER,
                stock_count INTEGER NOT NULL DEFAULT 0,
                CHECK (discount_price IS NULL OR (discount_price > 0 AND discount_price < price))
            )
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS contact_messages (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                email TEXT NOT NULL,
                phone TEXT NOT NULL,
                message TEXT NOT NULL,
                created_at DATETIME NOT NULL
            )
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS testimonials (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                location TEXT NOT NULL,
                rating INTEGER NOT NULL CHECK (rating BETWEEN 1 AND 5),
                review TEXT NOT NULL
            )
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS product_reviews (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                product_id INTEGER NOT NULL REFERENCES products(id) ON DELETE CASCADE,
                name TEXT NOT NULL,
                rating INTEGER NOT NULL CHECK (rating BETWEEN 1 AND 5),
                review TEXT NOT NULL,
                created_at DATETIME NOT NULL
            )
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                username TEXT UNIQUE NOT NULL,
                password TEXT NOT NULL
            )
            "#,
        )
        .execute(pool)
        .await?;

        Ok(())
    }

    async fn query_products(&self, filter: &str, bind: Option<&str>) -> Result<Vec<Product>> {
        let sql = format!("SELECT {} FROM products {} ORDER BY id", PRODUCT_COLUMNS, filter);
        let mut query = sqlx::query_as::<_, ProductRow>(&sql);
        if let Some(value) = bind {
            query = query.bind(value);
        }
        let rows = query.fetch_all(&self.pool).await.map_err(db_err)?;
        Ok(rows.into_iter().map(Product::from).collect())
    }
}

impl SqliteStore {
    /// Name the pricing rule a rejected update broke
    async fn pricing_error(&self, id: i64, patch: &ProductPatch) -> CatalogError {
        let current = match self.get_product_by_id(id).await {
            Ok(Some(product)) => product.merged(patch),
            Ok(None) => return CatalogError::ProductNotFound(id),
            Err(e) => return e,
        };
        match check_discount(current.price, current.discount_price) {
            Err(e) => e.into(),
            // The row changed again after the rejected write
            Ok(()) => PricingError::DiscountNotBelowPrice.into(),
        }
    }
}

fn db_err(e: sqlx::Error) -> CatalogError {
    CatalogError::Database(e.to_string())
}

fn is_unique_violation(e: &sqlx::Error) -> bool {
    e.as_database_error()
        .map(|db| db.is_unique_violation())
        .unwrap_or(false)
}

fn is_check_violation(e: &sqlx::Error) -> bool {
    e.as_database_error()
        .map(|db| db.is_check_violation())
        .unwrap_or(false)
}

fn is_foreign_key_violation(e: &sqlx::Error) -> bool {
    e.as_database_error()
        .map(|db| db.is_foreign_key_violation())
        .unwrap_or(false)
}

#[async_trait]
impl ProductStore for SqliteStore {
    async fn get_all_products(&self) -> Result<Vec<Product>> {
        self.query_products("", None).await
    }

    async fn get_product_by_id(&self, id: i64) -> Result<Option<Product>> {
        let sql = format!("SELECT {} FROM products WHERE id = ?1", PRODUCT_COLUMNS);
        let row: Option<ProductRow> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(row.map(Product::from))
    }

    async fn get_products_by_category(&self, category: &str) -> Result<Vec<Product>> {
        self.query_products("WHERE category = ?1", Some(category))
            .await
    }

    async fn get_featured_products(&self) -> Result<Vec<Product>> {
        self.query_products("WHERE featured = 1", None).await
    }

    async fn create_product(&self, product: NewProduct) -> Result<Product> {
        product.check_pricing()?;
        let additional_images = serde_json::to_string(&product.additional_images)?;
        let sql = format!(
            r#"
            INSERT INTO products (name, description, price, category, image_url,
                                  additional_images, featured, discount_price, stock_count)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            RETURNING {}
            "#,
            PRODUCT_COLUMNS
        );
        let row: ProductRow = sqlx::query_as(&sql)
            .bind(&product.name)
            .bind(&product.description)
            .bind(product.price)
            .bind(&product.category)
            .bind(&product.image_url)
            .bind(additional_images)
            .bind(product.featured)
            .bind(product.discount_price)
            .bind(product.stock_count)
            .fetch_one(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(row.into())
    }

    async fn update_product(&self, id: i64, patch: ProductPatch) -> Result<Option<Product>> {
        // One statement, so the merge and the pricing CHECK see the same row
        // and no read-to-write lock upgrade is needed
        let sql = format!(
            r#"
            UPDATE products
            SET name = COALESCE(?1, name),
                description = CASE WHEN ?2 THEN ?3 ELSE description END,
                price = COALESCE(?4, price),
                category = COALESCE(?5, category),
                image_url = CASE WHEN ?6 THEN ?7 ELSE image_url END,
                additional_images = COALESCE(?8, additional_images),
                featured = COALESCE(?9, featured),
                discount_price = CASE WHEN ?10 THEN ?11 ELSE discount_price END,
                stock_count = COALESCE(?12, stock_count)
            WHERE id = ?13
            RETURNING {}
            "#,
            PRODUCT_COLUMNS
        );
        let additional_images = patch
            .additional_images
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;

        let result: std::result::Result<Option<ProductRow>, sqlx::Error> = sqlx::query_as(&sql)
            .bind(&patch.name)
            .bind(patch.description.is_some())
            .bind(patch.description.clone().flatten())
            .bind(patch.price)
            .bind(&patch.category)
            .bind(patch.image_url.is_some())
            .bind(patch.image_url.clone().flatten())
            .bind(additional_images)
            .bind(patch.featured)
            .bind(patch.discount_price.is_some())
            .bind(patch.discount_price.flatten())
            .bind(patch.stock_count)
            .bind(id)
            .fetch_optional(&self.pool)
            .await;

        match result {
            Ok(row) => Ok(row.map(Product::from)),
            Err(e) if is_check_violation(&e) => Err(self.pricing_error(id, &patch).await),
            Err(e) => Err(db_err(e)),
        }
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
impl ReviewStore for SqliteStore {
    async fn get_product_reviews(&self, product_id: i64) -> Result<Vec<ProductReview>> {
        let rows: Vec<ReviewRow> = sqlx::query_as(
            r#"
            SELECT id, product_id, name, rating, review, created_at
            FROM product_reviews WHERE product_id = ?1
            ORDER BY id
            "#,
        )
        .bind(product_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(rows.into_iter().map(ProductReview::from).collect())
    }

    async fn create_product_review(&self, review: NewProductReview) -> Result<ProductReview> {
        let product_id = review.product_id;
        let row: ReviewRow = sqlx::query_as(
            r#"
            INSERT INTO product_reviews (product_id, name, rating, review, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            RETURNING id, product_id, name, rating, review, created_at
            "#,
        )
        .bind(review.product_id)
        .bind(&review.name)
        .bind(review.rating)
        .bind(&review.review)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_foreign_key_violation(&e) {
                CatalogError::ProductNotFound(product_id)
            } else {
                db_err(e)
            }
        })?;
        Ok(row.into())
    }
}

#[async_trait]
impl ContactStore for SqliteStore {
    async fn get_all_contact_messages(&self) -> Result<Vec<ContactMessage>> {
        let rows: Vec<ContactRow> = sqlx::query_as(
            r#"
            SELECT id, name, email, phone, message, created_at
            FROM contact_messages ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(rows.into_iter().map(ContactMessage::from).collect())
    }

    async fn create_contact_message(&self, message: NewContactMessage) -> Result<ContactMessage> {
        let row: ContactRow = sqlx::query_as(
            r#"
            INSERT INTO contact_messages (name, email, phone, message, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            RETURNING id, name, email, phone, message, created_at
            "#,
        )
        .bind(&message.name)
        .bind(&message.email)
        .bind(&message.phone)
        .bind(&message.message)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(row.into())
    }
}

#[async_trait]
impl TestimonialStore for SqliteStore {
    async fn get_all_testimonials(&self) -> Result<Vec<Testimonial>> {
        let rows: Vec<TestimonialRow> =
            sqlx::query_as("SELECT id, name, location, rating, review FROM testimonials ORDER BY id")
                .fetch_all(&self.pool)
                .await
                .map_err(db_err)?;
        Ok(rows.into_iter().map(Testimonial::from).collect())
    }

    async fn create_testimonial(&self, testimonial: NewTestimonial) -> Result<Testimonial> {
        let row: TestimonialRow = sqlx::query_as(
            r#"
            INSERT INTO testimonials (name, location, rating, review)
            VALUES (?1, ?2, ?3, ?4)
            RETURNING id, name, location, rating, review
            "#,
        )
        .bind(&testimonial.name)
        .bind(&testimonial.location)
        .bind(testimonial.rating)
        .bind(&testimonial.review)
        .fetch_one(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(row.into())
    }

    async fn update_testimonial(
        &self,
        id: i64,
        patch: TestimonialPatch,
    ) -> Result<Option<Testimonial>> {
        // COALESCE keeps the stored value for every field the patch leaves out
        let row: Option<TestimonialRow> = sqlx::query_as(
            r#"
            UPDATE testimonials
            SET name = COALESCE(?1, name),
                location = COALESCE(?2, location),
                rating = COALESCE(?3, rating),
                review = COALESCE(?4, review)
            WHERE id = ?5
            RETURNING id, name, location, rating, review
            "#,
        )
        .bind(patch.name)
        .bind(patch.location)
        .bind(patch.rating)
        .bind(patch.review)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(row.map(Testimonial::from))
    }

    async fn delete_testimonial(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM testimonials WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl UserStore for SqliteStore {
    async fn get_user(&self, id: i64) -> Result<Option<User>> {
        sqlx::query_as::<_, UserRow>("SELECT id, username, password FROM users WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map(|row| row.map(User::from))
            .map_err(db_err)
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        sqlx::query_as::<_, UserRow>(
            "SELECT id, username, password FROM users WHERE username = ?1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map(|row| row.map(User::from))
        .map_err(db_err)
    }

    async fn create_user(&self, user: NewUser) -> Result<User> {
        let row: UserRow = sqlx::query_as(
            r#"
            INSERT INTO users (username, password)
            VALUES (?1, ?2)
            RETURNING id, username, password
            "#,
        )
        .bind(&user.username)
        .bind(&user.password)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                CatalogError::UsernameTaken(user.username.clone())
            } else {
                db_err(e)
            }
        })?;
        Ok(row.into())
    }
}

impl CatalogStore for SqliteStore {
    fn backend(&self) -> &'static str {
        "sqlite"
    }
}

// Helper structs for sqlx query_as
#[derive(sqlx::FromRow)]
struct ProductRow {
    id: i64,
    name: String,
    description: Option<String>,
    price: i64,
    category: String,
    image_url: Option<String>,
    additional_images: String,
    featured: bool,
    discount_price: Option<i64>,
    stock_count: i64,
}

impl From<ProductRow> for Product {
    fn from(r: ProductRow) -> Self {
        let additional_images = serde_json::from_str(&r.additional_images).unwrap_or_else(|e| {
            tracing::warn!("Product {} has unreadable additional_images: {}", r.id, e);
            Vec::new()
        });

        Product {
            id: r.id,
            name: r.name,
            description: r.description,
            price: r.price,
            category: r.category,
            image_url: r.image_url,
            additional_images,
            featured: r.featured,
            discount_price: r.discount_price,
            stock_count: r.stock_count,
        }
    }
}

#[derive(sqlx::FromRow)]
struct ContactRow {
    id: i64,
    name: String,
    email: String,
    phone: String,
    message: String,
    created_at: DateTime<Utc>,
}

impl From<ContactRow> for ContactMessage {
    fn from(r: ContactRow) -> Self {
        ContactMessage {
            id: r.id,
            name: r.name,
            email: r.email,
            phone: r.phone,
            message: r.message,
            created_at: r.created_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct TestimonialRow {
    id: i64,
    name: String,
    location: String,
    rating: i64,
    review: String,
}

impl From<TestimonialRow> for Testimonial {
    fn from(r: TestimonialRow) -> Self {
        Testimonial {
            id: r.id,
            name: r.name,
            location: r.location,
            rating: r.rating,
            review: r.review,
        }
    }
}

#[derive(sqlx::FromRow)]
struct ReviewRow {
    id: i64,
    product_id: i64,
    name: String,
    rating: i64,
    review: String,
    created_at: DateTime<Utc>,
}

impl From<ReviewRow> for ProductReview {
    fn from(r: ReviewRow) -> Self {
        ProductReview {
            id: r.id,
            product_id: r.product_id,
            name: r.name,
            rating: r.rating,
            review: r.review,
            created_at: r.created_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id: i64,
    username: String,
    password: String,
}

impl From<UserRow> for User {
    fn from(r: UserRow) -> Self {
        User {
            id: r.id,
            username: r.username,
            password: r.password,
        }
    }
}
