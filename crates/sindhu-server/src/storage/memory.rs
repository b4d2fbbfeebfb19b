//! In-memory catalog store using DashMap
//!
//! Ephemeral: lives as long as the process. Ids come from per-table atomic
//! counters starting at 1.

use async_trait::async_trait;
use chrono::Utc;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use sindhu_core::ports::{
    CatalogStore, ContactStore, ProductStore, ReviewStore, TestimonialStore, UserStore,
};
use sindhu_core::{
    CatalogError, ContactMessage, NewContactMessage, NewProduct, NewProductReview,
    NewTestimonial, NewUser, Product, ProductPatch, ProductReview, Result, Testimonial,
    TestimonialPatch, User,
};
use std::sync::atomic::{AtomicI64, Ordering};

pub struct MemoryStore {
    products: DashMap<i64, Product>,
    contact_messages: DashMap<i64, ContactMessage>,
    testimonials: DashMap<i64, Testimonial>,
    reviews: DashMap<i64, ProductReview>,
    users: DashMap<i64, User>,
    /// username -> user id; the entry lock makes the uniqueness check atomic
    usernames: DashMap<String, i64>,
    product_id: IdSequence,
    message_id: IdSequence,
    testimonial_id: IdSequence,
    review_id: IdSequence,
    user_id: IdSequence,
}

struct IdSequence(AtomicI64);

impl IdSequence {
    fn new() -> Self {
        Self(AtomicI64::new(1))
    }

    fn next(&self) -> i64 {
        self.0.fetch_add(1, Ordering::Relaxed)
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            products: DashMap::new(),
            contact_messages: DashMap::new(),
            testimonials: DashMap::new(),
            reviews: DashMap::new(),
            users: DashMap::new(),
            usernames: DashMap::new(),
            product_id: IdSequence::new(),
            message_id: IdSequence::new(),
            testimonial_id: IdSequence::new(),
            review_id: IdSequence::new(),
            user_id: IdSequence::new(),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of map values, ascending id
fn sorted_values<T: Clone>(map: &DashMap<i64, T>, keep: impl Fn(&T) -> bool) -> Vec<T> {
    let mut entries: Vec<(i64, T)> = map
        .iter()
        .filter(|entry| keep(entry.value()))
        .map(|entry| (*entry.key(), entry.value().clone()))
        .collect();
    entries.sort_by_key(|(id, _)| *id);
    entries.into_iter().map(|(_, value)| value).collect()
}

#[async_trait]
impl ProductStore for MemoryStore {
    async fn get_all_products(&self) -> Result<Vec<Product>> {
        Ok(sorted_values(&self.products, |_| true))
    }

    async fn get_product_by_id(&self, id: i64) -> Result<Option<Product>> {
        Ok(self.products.get(&id).map(|p| p.value().clone()))
    }

    async fn get_products_by_category(&self, category: &str) -> Result<Vec<Product>> {
        Ok(sorted_values(&self.products, |p| p.category == category))
    }

    async fn get_featured_products(&self) -> Result<Vec<Product>> {
        Ok(sorted_values(&self.products, |p| p.featured))
    }

    async fn create_product(&self, product: NewProduct) -> Result<Product> {
        product.check_pricing()?;
        let product = Product::from_new(self.product_id.next(), product);
        self.products.insert(product.id, product.clone());
        Ok(product)
    }

    async fn update_product(&self, id: i64, patch: ProductPatch) -> Result<Option<Product>> {
        let Some(mut product) = self.products.get_mut(&id) else {
            return Ok(None);
        };
        product.try_apply(patch)?;
        Ok(Some(product.clone()))
    }

    async fn delete_product(&self, id: i64) -> Result<bool> {
        if self.products.remove(&id).is_none() {
            return Ok(false);
        }
        self.reviews.retain(|_, review| review.product_id != id);
        Ok(true)
    }
}

#[async_trait]
impl ReviewStore for MemoryStore {
    async fn get_product_reviews(&self, product_id: i64) -> Result<Vec<ProductReview>> {
        Ok(sorted_values(&self.reviews, |r| r.product_id == product_id))
    }

    async fn create_product_review(&self, review: NewProductReview) -> Result<ProductReview> {
        // Holding the product entry blocks a concurrent delete until the review is in
        let Some(_product) = self.products.get(&review.product_id) else {
            return Err(CatalogError::ProductNotFound(review.product_id));
        };
        let review = ProductReview::from_new(self.review_id.next(), review, Utc::now());
        self.reviews.insert(review.id, review.clone());
        Ok(review)
    }
}

#[async_trait]
impl ContactStore for MemoryStore {
    async fn get_all_contact_messages(&self) -> Result<Vec<ContactMessage>> {
        Ok(sorted_values(&self.contact_messages, |_| true))
    }

    async fn create_contact_message(&self, message: NewContactMessage) -> Result<ContactMessage> {
        let message = ContactMessage::from_new(self.message_id.next(), message, Utc::now());
        self.contact_messages.insert(message.id, message.clone());
        Ok(message)
    }
}

#[async_trait]
impl TestimonialStore for MemoryStore {
    async fn get_all_testimonials(&self) -> Result<Vec<Testimonial>> {
        Ok(sorted_values(&self.testimonials, |_| true))
    }

    async fn create_testimonial(&self, testimonial: NewTestimonial) -> Result<Testimonial> {
        let testimonial = Testimonial::from_new(self.testimonial_id.next(), testimonial);
        self.testimonials.insert(testimonial.id, testimonial.clone());
        Ok(testimonial)
    }

    async fn update_testimonial(
        &self,
        id: i64,
        patch: TestimonialPatch,
    ) -> Result<Option<Testimonial>> {
        Ok(self.testimonials.get_mut(&id).map(|mut testimonial| {
            testimonial.apply(patch);
            testimonial.clone()
        }))
    }

    async fn delete_testimonial(&self, id: i64) -> Result<bool> {
        Ok(self.testimonials.remove(&id).is_some())
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn get_user(&self, id: i64) -> Result<Option<User>> {
        Ok(self.users.get(&id).map(|u| u.value().clone()))
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        let Some(id) = self.usernames.get(username).map(|id| *id) else {
            return Ok(None);
        };
        self.get_user(id).await
    }

    async fn create_user(&self, user: NewUser) -> Result<User> {
        match self.usernames.entry(user.username.clone()) {
            Entry::Occupied(_) => Err(CatalogError::UsernameTaken(user.username)),
            Entry::Vacant(slot) => {
                let user = User::from_new(self.user_id.next(), user);
                self.users.insert(user.id, user.clone());
                slot.insert(user.id);
                Ok(user)
            }
        }
    }
}

impl CatalogStore for MemoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }
}
