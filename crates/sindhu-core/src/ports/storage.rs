//! Storage traits for the catalog
//!
//! Every backend implements the whole family; the server holds an
//! `Arc<dyn CatalogStore>` chosen at startup.

use crate::Result;
use async_trait::async_trait;
use sindhu_types::{
    ContactMessage, NewContactMessage, NewProduct, NewProductReview, NewTestimonial, NewUser,
    Product, ProductPatch, ProductReview, Testimonial, TestimonialPatch, User,
};

/// Product store
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// All products, ascending id
    async fn get_all_products(&self) -> Result<Vec<Product>>;
    async fn get_product_by_id(&self, id: i64) -> Result<Option<Product>>;
    /// Exact, case-sensitive category match
    async fn get_products_by_category(&self, category: &str) -> Result<Vec<Product>>;
    async fn get_featured_products(&self) -> Result<Vec<Product>>;
    /// Fails with `Pricing` when the discount is not positive or not below the price
    async fn create_product(&self, product: NewProduct) -> Result<Product>;
    /// Merge the supplied fields; `None` when the id is unknown. The discount
    /// rule is checked against the merged record atomically with the write.
    async fn update_product(&self, id: i64, patch: ProductPatch) -> Result<Option<Product>>;
    /// `false` when the id is unknown. Removes the product's reviews too.
    async fn delete_product(&self, id: i64) -> Result<bool>;
}

/// Product review store
#[async_trait]
pub trait ReviewStore: Send + Sync {
    async fn get_product_reviews(&self, product_id: i64) -> Result<Vec<ProductReview>>;
    /// Fails with `ProductNotFound` when the product does not exist
    async fn create_product_review(&self, review: NewProductReview) -> Result<ProductReview>;
}

/// Contact message store (append-only)
#[async_trait]
pub trait ContactStore: Send + Sync {
    async fn get_all_contact_messages(&self) -> Result<Vec<ContactMessage>>;
    async fn create_contact_message(&self, message: NewContactMessage) -> Result<ContactMessage>;
}

/// Testimonial store
#[async_trait]
pub trait TestimonialStore: Send + Sync {
    async fn get_all_testimonials(&self) -> Result<Vec<Testimonial>>;
    async fn create_testimonial(&self, testimonial: NewTestimonial) -> Result<Testimonial>;
    async fn update_testimonial(
        &self,
        id: i64,
        patch: TestimonialPatch,
    ) -> Result<Option<Testimonial>>;
    async fn delete_testimonial(&self, id: i64) -> Result<bool>;
}

/// User store
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn get_user(&self, id: i64) -> Result<Option<User>>;
    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>>;
    /// Fails with `UsernameTaken` on a duplicate username
    async fn create_user(&self, user: NewUser) -> Result<User>;
}

/// The full catalog store contract
pub trait CatalogStore:
    ProductStore + ReviewStore + ContactStore + TestimonialStore + UserStore
{
    /// Short backend name for logs and the health endpoint
    fn backend(&self) -> &'static str;
}
