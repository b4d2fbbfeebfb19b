//! Port traits (interfaces) for dependency injection

pub mod storage;

pub use storage::{
    CatalogStore, ContactStore, ProductStore, ReviewStore, TestimonialStore, UserStore,
};
