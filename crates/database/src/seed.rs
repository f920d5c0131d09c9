//! Bootstrap records for an empty store.

use marketplace_config::SeedConfig;
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::entities::{
    CreateCollegeRequest, CreateProductRequest, CreateUserRequest, ProductStatus, User,
};
use crate::repos::{CollegeRepository, ProductRepository, UserRepository};
use crate::types::DatabaseResult;

/// What a seeding run inserted
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub colleges: u32,
    pub users: u32,
    pub products: u32,
}

impl SeedReport {
    pub fn is_empty(&self) -> bool {
        self.colleges == 0 && self.users == 0 && self.products == 0
    }
}

struct SampleProduct {
    title: &'static str,
    price: f64,
    description: &'static str,
    condition: &'static str,
    category: &'static str,
    tags: &'static [&'static str],
}

const SAMPLE_PRODUCTS: [SampleProduct; 3] = [
    SampleProduct {
        title: "Calculus: Early Transcendentals",
        price: 45.0,
        description: "8th edition, light highlighting in the first three chapters.",
        condition: "good",
        category: "textbooks",
        tags: &["math", "textbook"],
    },
    SampleProduct {
        title: "Mini Fridge",
        price: 60.0,
        description: "3.1 cu ft, fits under a dorm desk. Pick up on campus.",
        condition: "like new",
        category: "appliances",
        tags: &["dorm", "kitchen"],
    },
    SampleProduct {
        title: "Desk Lamp",
        price: 12.5,
        description: "LED lamp with adjustable arm and USB port.",
        condition: "used",
        category: "furniture",
        tags: &["dorm", "lighting"],
    },
];

/// Insert the default college and sample listings into empty tables.
///
/// Each table is checked independently, so running this against a populated store inserts
/// nothing.
pub async fn seed_defaults(pool: &SqlitePool, config: &SeedConfig) -> DatabaseResult<SeedReport> {
    let colleges = CollegeRepository::new(pool.clone());
    let users = UserRepository::new(pool.clone());
    let products = ProductRepository::new(pool.clone());
    let mut report = SeedReport::default();

    if colleges.count().await? == 0 {
        let college = colleges
            .create(&CreateCollegeRequest {
                name: config.college_name.clone(),
                domain: config.college_domain.clone(),
            })
            .await?;
        report.colleges += 1;
        info!(college_id = %college.id, domain = %college.domain, "seeded default college");
    }

    if products.count().await? == 0 {
        let seller = match users.find_by_email(&config.seller_email).await? {
            Some(user) => user,
            None => {
                report.users += 1;
                seed_seller(&users, config).await?
            }
        };

        for sample in &SAMPLE_PRODUCTS {
            products
                .create(&CreateProductRequest {
                    title: sample.title.to_string(),
                    price: sample.price,
                    description: sample.description.to_string(),
                    condition: sample.condition.to_string(),
                    category: sample.category.to_string(),
                    status: ProductStatus::Available,
                    images: Vec::new(),
                    tags: sample.tags.iter().map(|tag| tag.to_string()).collect(),
                    seller_id: seller.id,
                    college_id: None,
                })
                .await?;
            report.products += 1;
        }

        info!(seller_id = %seller.id, count = report.products, "seeded sample products");
    }

    if report.is_empty() {
        debug!("store already populated, nothing seeded");
    }

    Ok(report)
}

async fn seed_seller(users: &UserRepository, config: &SeedConfig) -> DatabaseResult<User> {
    users
        .create(&CreateUserRequest {
            name: config.seller_name.clone(),
            email: config.seller_email.clone(),
            avatar: None,
            year: None,
            department: None,
            college_id: None,
        })
        .await
}
