//! Sample storefront catalog
//!
//! Loaded into an empty store at startup so a fresh install has something
//! to show. Stores that already hold products are left alone.

use anyhow::{Context, Result};
use sindhu_core::{CatalogStore, NewProduct, NewTestimonial};
use tracing::info;

struct SampleProduct {
    name: &'static str,
    description: &'static str,
    price: i64,
    category: &'static str,
    image_url: &'static str,
    featured: bool,
    discount_price: Option<i64>,
}

const SAMPLE_STOCK: i64 = 10;

const SAMPLE_PRODUCTS: &[SampleProduct] = &[
    SampleProduct {
        name: "Wooden Dining Set",
        description: "Elegant 6-seater dining table with matching chairs",
        price: 35999,
        category: "Furniture",
        image_url: "https://images.unsplash.com/photo-1530018607912-eff2daa1bac4?ixlib=rb-4.0.3&auto=format&fit=crop&w=600&h=400",
        featured: true,
        discount_price: None,
    },
    SampleProduct {
        name: "L-Shaped Sofa",
        description: "Comfortable 3-seater with premium upholstery",
        price: 42499,
        category: "Furniture",
        image_url: "https://images.unsplash.com/photo-1555041469-a586c61ea9bc?ixlib=rb-4.0.3&auto=format&fit=crop&w=600&h=400",
        featured: true,
        discount_price: None,
    },
    SampleProduct {
        name: "Complete Bedroom Set",
        description: "Queen size bed with side tables and wardrobe",
        price: 56999,
        category: "Furniture",
        image_url: "https://images.unsplash.com/photo-1505693416388-ac5ce068fe85?ixlib=rb-4.0.3&auto=format&fit=crop&w=600&h=400",
        featured: true,
        discount_price: None,
    },
    SampleProduct {
        name: "Office Desk",
        description: "Spacious desk with built-in storage for your workspace",
        price: 12999,
        category: "Furniture",
        image_url: "https://images.unsplash.com/photo-1518455027359-f3f8164ba6bd?ixlib=rb-4.0.3&auto=format&fit=crop&w=600&h=400",
        featured: false,
        discount_price: None,
    },
    SampleProduct {
        name: "Bookshelf",
        description: "Modern bookshelf with adjustable shelves",
        price: 8999,
        category: "Furniture",
        image_url: "https://images.unsplash.com/photo-1594620302200-9a0cc02cbc6a?ixlib=rb-4.0.3&auto=format&fit=crop&w=600&h=400",
        featured: false,
        discount_price: None,
    },
    SampleProduct {
        name: "Coffee Table",
        description: "Stylish coffee table with storage compartment",
        price: 5999,
        category: "Furniture",
        image_url: "https://images.unsplash.com/photo-1565374395542-0ce18882c857?ixlib=rb-4.0.3&auto=format&fit=crop&w=600&h=400",
        featured: false,
        discount_price: None,
    },
    SampleProduct {
        name: "Lounge Chair",
        description: "Comfortable lounge chair for your living room",
        price: 15999,
        category: "Furniture",
        image_url: "https://images.unsplash.com/photo-1567538096630-e0c55bd6374c?ixlib=rb-4.0.3&auto=format&fit=crop&w=600&h=400",
        featured: false,
        discount_price: None,
    },
    SampleProduct {
        name: "55\" Smart LED TV",
        description: "4K Ultra HD Smart TV with HDR and voice control",
        price: 48990,
        category: "Electronics",
        image_url: "https://images.unsplash.com/photo-1593305841991-05c297ba4575?ixlib=rb-4.0.3&auto=format&fit=crop&w=600&h=400",
        featured: true,
        discount_price: None,
    },
    SampleProduct {
        name: "Double Door Refrigerator",
        description: "Frost-free with inverter technology for efficiency",
        price: 32990,
        category: "Electronics",
        image_url: "https://images.unsplash.com/photo-1571175443880-49e1d25b2bc5?ixlib=rb-4.0.3&auto=format&fit=crop&w=600&h=400",
        featured: true,
        discount_price: None,
    },
    SampleProduct {
        name: "Front Load Washing Machine",
        description: "8kg capacity with multiple wash programs",
        price: 28499,
        category: "Electronics",
        image_url: "https://images.pexels.com/photos/5816260/pexels-photo-5816260.jpeg?auto=compress&cs=tinysrgb&w=600&h=400",
        featured: true,
        discount_price: None,
    },
    SampleProduct {
        name: "Air Conditioner",
        description: "1.5 ton split AC with inverter technology",
        price: 35990,
        category: "Electronics",
        image_url: "https://images.pexels.com/photos/7318867/pexels-photo-7318867.jpeg?auto=compress&cs=tinysrgb&w=600&h=400",
        featured: false,
        discount_price: None,
    },
    SampleProduct {
        name: "Microwave Oven",
        description: "Convection microwave with multiple cooking modes",
        price: 12499,
        category: "Electronics",
        image_url: "https://images.pexels.com/photos/3847756/pexels-photo-3847756.jpeg?auto=compress&cs=tinysrgb&w=600&h=400",
        featured: false,
        discount_price: None,
    },
    SampleProduct {
        name: "Home Theater System",
        description: "5.1 channel surround sound system",
        price: 26990,
        category: "Electronics",
        image_url: "https://images.unsplash.com/photo-1558403194-611308249627?ixlib=rb-4.0.3&auto=format&fit=crop&w=600&h=400",
        featured: false,
        discount_price: Some(21990),
    },
    SampleProduct {
        name: "Living Room Set",
        description: "Complete living room furniture set including sofa, coffee table, and side tables",
        price: 119999,
        category: "Furniture",
        image_url: "https://images.unsplash.com/photo-1493663284031-b7e3aefcae8e?ixlib=rb-4.0.3&auto=format&fit=crop&w=600&h=400",
        featured: false,
        discount_price: Some(89999),
    },
];

/// (name, location, rating, review)
const SAMPLE_TESTIMONIALS: &[(&str, &str, i64, &str)] = &[
    (
        "Priya Sharma",
        "Delhi",
        5,
        "Great experience shopping at Mr Sindhu. The furniture collection is extensive and of excellent quality. The staff was very helpful and delivery was prompt.",
    ),
    (
        "Rajesh Kumar",
        "Gurgaon",
        4,
        "I bought a smart TV from their electronics section, and I'm really impressed with the quality and after-sales service. The installation team was professional and answered all my questions.",
    ),
    (
        "Arun & Neha Gupta",
        "Noida",
        5,
        "We furnished our entire living room with pieces from Mr Sindhu. The quality is outstanding, prices are reasonable, and the customer service is exceptional. Highly recommended!",
    ),
];

/// Insert the sample catalog when the store has no products.
/// Returns whether anything was inserted.
pub async fn seed_if_empty(store: &dyn CatalogStore) -> Result<bool> {
    let existing = store
        .get_all_products()
        .await
        .context("Failed to inspect catalog before seeding")?;
    if !existing.is_empty() {
        info!("Catalog already has {} products, skipping sample data", existing.len());
        return Ok(false);
    }

    for sample in SAMPLE_PRODUCTS {
        store
            .create_product(NewProduct {
                name: sample.name.to_string(),
                description: Some(sample.description.to_string()),
                price: sample.price,
                category: sample.category.to_string(),
                image_url: Some(sample.image_url.to_string()),
                additional_images: Vec::new(),
                featured: sample.featured,
                discount_price: sample.discount_price,
                stock_count: SAMPLE_STOCK,
            })
            .await
            .with_context(|| format!("Failed to seed product {}", sample.name))?;
    }

    // Testimonials have no independent "empty" check; they ride along with products
    for (name, location, rating, review) in SAMPLE_TESTIMONIALS {
        store
            .create_testimonial(NewTestimonial {
                name: name.to_string(),
                location: location.to_string(),
                rating: *rating,
                review: review.to_string(),
            })
            .await
            .with_context(|| format!("Failed to seed testimonial from {}", name))?;
    }

    info!(
        "Seeded {} sample products and {} testimonials",
        SAMPLE_PRODUCTS.len(),
        SAMPLE_TESTIMONIALS.len()
    );
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use sindhu_core::check_discount;
    use sindhu_core::ports::{ProductStore, TestimonialStore};

    #[test]
    fn test_samples_respect_pricing_rules() {
        for sample in SAMPLE_PRODUCTS {
            assert!(sample.price > 0, "{}", sample.name);
            assert!(
                check_discount(sample.price, sample.discount_price).is_ok(),
                "{}",
                sample.name
            );
        }
        for (_, _, rating, _) in SAMPLE_TESTIMONIALS {
            assert!((1..=5).contains(rating));
        }
    }

    #[tokio::test]
    async fn test_seed_runs_once() {
        let store = MemoryStore::new();

        assert!(seed_if_empty(&store).await.unwrap());
        assert!(!seed_if_empty(&store).await.unwrap());

        let products = store.get_all_products().await.unwrap();
        assert_eq!(products.len(), SAMPLE_PRODUCTS.len());
        assert_eq!(store.get_featured_products().await.unwrap().len(), 6);
        assert_eq!(
            store.get_all_testimonials().await.unwrap().len(),
            SAMPLE_TESTIMONIALS.len()
        );
    }
}
