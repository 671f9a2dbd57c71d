//! # Seed Data Generator
//!
//! Populates the database with test products and coupons for development.
//!
//! ## Usage
//! ```bash
//! # Generate 200 products (default)
//! cargo run -p souk-db --bin seed
//!
//! # Generate custom amount
//! cargo run -p souk-db --bin seed -- --count 1000
//!
//! # Specify database path
//! cargo run -p souk-db --bin seed -- --db ./data/souk.db
//! ```
//!
//! ## Generated Data
//! - Products across market categories (spices, textiles, ceramics, ...)
//!   with prices 1.99 - 9.99, roughly a third carrying an active promotion
//! - A handful of coupons: SOUK10 (10%), SOUK20 (20%), RETIRED (disabled)

use chrono::{Duration, Utc};
use std::env;
use souk_core::{Coupon, Product};
use souk_db::{Database, DbConfig};
use uuid::Uuid;

/// Product categories for realistic test data
const CATEGORIES: &[(&str, &[&str])] = &[
    (
        "Spices",
        &[
            "Saffron Threads",
            "Ras el Hanout",
            "Cumin Seeds",
            "Smoked Paprika",
            "Cinnamon Sticks",
            "Dried Mint",
            "Sumac",
            "Harissa Paste",
            "Preserved Lemons",
            "Orange Blossom Water",
        ],
    ),
    (
        "Textiles",
        &[
            "Wool Rug",
            "Silk Scarf",
            "Woven Blanket",
            "Embroidered Cushion",
            "Linen Tablecloth",
            "Kilim Runner",
            "Cotton Throw",
            "Tapestry Panel",
        ],
    ),
    (
        "Ceramics",
        &[
            "Tagine Pot",
            "Glazed Bowl",
            "Serving Platter",
            "Tea Glasses Set",
            "Mosaic Tile",
            "Clay Pitcher",
            "Painted Vase",
            "Couscous Dish",
        ],
    ),
    (
        "Leather",
        &[
            "Leather Pouf",
            "Messenger Bag",
            "Babouche Slippers",
            "Belt",
            "Journal Cover",
            "Coin Purse",
        ],
    ),
];

/// Size/variant suffixes with price addons in cents
const VARIANTS: &[(&str, i64)] = &[
    ("Small", 0),
    ("Medium", 150),
    ("Large", 300),
    ("Gift Set", 500),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut count: usize = 200;
    let mut db_path = String::from("./souk_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--count" | "-c" => {
                if i + 1 < args.len() {
                    count = args[i + 1].parse().unwrap_or(200);
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Souk Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --count <N>    Number of products to generate (default: 200)");
                println!("  -d, --db <PATH>    Database file path (default: ./souk_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Souk Seed Data Generator");
    println!("===========================");
    println!("Database: {}", db_path);
    println!("Products: {}", count);
    println!();

    let config = DbConfig::new(&db_path);
    let db = Database::new(config).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.products().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} products", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    println!();
    println!("Generating products...");

    let mut generated = 0;
    let start = std::time::Instant::now();

    'outer: for (category_idx, (_category, products)) in CATEGORIES.iter().enumerate() {
        for (product_idx, product_name) in products.iter().enumerate() {
            for (variant_idx, (variant, price_addon)) in VARIANTS.iter().enumerate() {
                if generated >= count {
                    break 'outer;
                }

                let seed = category_idx * 1000 + product_idx * 10 + variant_idx;
                let product = generate_product(product_name, variant, *price_addon, seed);

                if let Err(e) = db.products().insert(&product).await {
                    eprintln!("Failed to insert {}: {}", product.name, e);
                    continue;
                }

                generated += 1;

                if generated % 100 == 0 {
                    println!("  Generated {} products...", generated);
                }
            }
        }
    }

    let elapsed = start.elapsed();
    println!();
    println!("✓ Generated {} products in {:?}", generated, elapsed);

    println!();
    println!("Generating coupons...");

    for (code, label, bps, enabled) in [
        ("SOUK10", "10% off", 1000u32, true),
        ("SOUK20", "20% off", 2000u32, true),
        ("RETIRED", "Old campaign", 1500u32, false),
    ] {
        let coupon = Coupon {
            id: Uuid::new_v4().to_string(),
            label: label.to_string(),
            code: code.to_string(),
            reduction_bps: bps,
            enabled,
            expires_on: (Utc::now() + Duration::days(365)).date_naive(),
            created_at: Utc::now(),
        };
        db.coupons().insert(&coupon).await?;
        println!("  {} ({}, enabled: {})", code, label, enabled);
    }

    println!();
    println!("✓ Seed complete!");

    Ok(())
}

/// Generates a single product with realistic data.
///
/// Roughly every third product gets a promotion window that is currently
/// active (started yesterday, ends in two weeks) at ~75% of the base price.
fn generate_product(name: &str, variant: &str, price_addon: i64, seed: usize) -> Product {
    let now = Utc::now();

    // Base 1.99 - 9.99 plus variant addon
    let base_price = 199 + ((seed * 17) % 800) as i64;
    let price_cents = base_price + price_addon;

    let (promo_price_cents, promo_starts_on, promo_ends_on) = if seed % 3 == 0 {
        (
            Some(price_cents * 75 / 100),
            Some((now - Duration::days(1)).date_naive()),
            Some((now + Duration::days(14)).date_naive()),
        )
    } else {
        (None, None, None)
    };

    Product {
        id: Uuid::new_v4().to_string(),
        name: format!("{} {}", name, variant),
        price_cents,
        promo_price_cents,
        promo_starts_on,
        promo_ends_on,
        is_active: true,
        created_at: now,
        updated_at: now,
    }
}
