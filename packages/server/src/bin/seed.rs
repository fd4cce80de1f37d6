use anyhow::{Context, Result};
use server_core::config::Config;
use server_core::domains::auth::hash_password;
use server_core::domains::listings::models::{Category, CreateListing, Listing};
use server_core::domains::reviews::models::{CreateReview, Review};
use server_core::domains::reviews::rating;
use server_core::domains::users::models::user::User;
use sqlx::PgPool;

const DEMO_PASSWORD: &str = "password123";

struct SampleListing {
    title: &'static str,
    description: &'static str,
    location: &'static str,
    country: &'static str,
    price: f64,
    category: Category,
    longitude: f64,
    latitude: f64,
}

const SAMPLE_LISTINGS: &[SampleListing] = &[
    SampleListing {
        title: "Beachfront Villa with Infinity Pool",
        description: "Wake up to the sound of waves. Private pool overlooking the Arabian Sea.",
        location: "Alibaug",
        country: "India",
        price: 320.0,
        category: Category::AmazingPools,
        longitude: 72.87,
        latitude: 18.64,
    },
    SampleListing {
        title: "Alpine A-Frame Cabin",
        description: "Classic wood cabin below Mont Blanc, five minutes from the lifts.",
        location: "Chamonix",
        country: "France",
        price: 210.0,
        category: Category::Mountains,
        longitude: 6.87,
        latitude: 45.92,
    },
    SampleListing {
        title: "Canal-View Studio",
        description: "Compact studio on a quiet canal in the Jordaan.",
        location: "Amsterdam",
        country: "Netherlands",
        price: 180.0,
        category: Category::IconicCities,
        longitude: 4.90,
        latitude: 52.37,
    },
    SampleListing {
        title: "Glass Igloo under the Northern Lights",
        description: "Heated glass roof for aurora watching from bed.",
        location: "Rovaniemi",
        country: "Finland",
        price: 420.0,
        category: Category::Arctic,
        longitude: 25.72,
        latitude: 66.50,
    },
    SampleListing {
        title: "Geodesic Dome in the Vineyards",
        description: "Off-grid dome with a deck facing the valley.",
        location: "Valle de Guadalupe",
        country: "Mexico",
        price: 150.0,
        category: Category::Domes,
        longitude: -116.57,
        latitude: 32.09,
    },
    SampleListing {
        title: "Lakeside Camping Pod",
        description: "Insulated pod a short walk from the water.",
        location: "Lake District",
        country: "United Kingdom",
        price: 85.0,
        category: Category::Camping,
        longitude: -3.08,
        latitude: 54.46,
    },
    SampleListing {
        title: "Working Farm Stay",
        description: "Converted barn on an olive farm. Breakfast from the garden.",
        location: "Tuscany",
        country: "Italy",
        price: 140.0,
        category: Category::Farms,
        longitude: 11.25,
        latitude: 43.77,
    },
    SampleListing {
        title: "Houseboat on the Backwaters",
        description: "Traditional kettuvallam with a cook on board.",
        location: "Alleppey",
        country: "India",
        price: 110.0,
        category: Category::Boats,
        longitude: 76.34,
        latitude: 9.49,
    },
    SampleListing {
        title: "Downtown Loft with Skyline View",
        description: "Tenth-floor loft, floor-to-ceiling windows, steps from the subway.",
        location: "New York",
        country: "United States",
        price: 390.0,
        category: Category::Trending,
        longitude: -74.01,
        latitude: 40.71,
    },
    SampleListing {
        title: "Quiet Room near the Old Town",
        description: "Simple private room a short tram ride from the square.",
        location: "Prague",
        country: "Czech Republic",
        price: 70.0,
        category: Category::Rooms,
        longitude: 14.42,
        latitude: 50.09,
    },
];

#[tokio::main]
async fn main() -> Result<()> {
    // Load config
    let config = Config::from_env()?;

    // Connect to database
    let pool = PgPool::connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;

    println!("✓ Connected to database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run migrations")?;

    println!("✓ Migrations applied");

    let host = find_or_create_user("demo_host", Some("host@example.com"), &pool).await?;
    let guest = find_or_create_user("demo_guest", Some("guest@example.com"), &pool).await?;

    if Listing::count(&pool).await? > 0 {
        println!("⊘ Listings already present, skipping");
        return Ok(());
    }

    println!("\n🚀 Seeding {} listings...\n", SAMPLE_LISTINGS.len());

    let mut created = Vec::new();

    for (idx, sample) in SAMPLE_LISTINGS.iter().enumerate() {
        let listing = Listing::create(
            CreateListing {
                title: sample.title.to_string(),
                description: Some(sample.description.to_string()),
                price: sample.price,
                location: sample.location.to_string(),
                country: sample.country.to_string(),
                category: sample.category,
                image_url: None,
                image_key: None,
                longitude: sample.longitude,
                latitude: sample.latitude,
                owner_id: host.id,
            },
            &pool,
        )
        .await
        .context("Failed to insert listing")?;

        println!(
            "[{}/{}] ✓ {} ({})",
            idx + 1,
            SAMPLE_LISTINGS.len(),
            listing.title,
            listing.category
        );

        created.push(listing);
    }

    // A few reviews from the guest so ratings are non-trivial out of the box
    let sample_reviews = [
        (0, 5, "The pool alone is worth the trip. Spotless and private."),
        (1, 4, "Great location for the lifts, a little chilly at night."),
        (7, 4, "Slow mornings on the water. The food was excellent."),
    ];

    for (listing_idx, rating_value, comment) in sample_reviews {
        let listing = &created[listing_idx];
        Review::create_unique(
            CreateReview {
                listing_id: listing.id,
                author_id: guest.id,
                rating: rating_value,
                comment: comment.to_string(),
            },
            &pool,
        )
        .await
        .context("Failed to insert review")?;

        rating::recalculate(listing.id, &pool).await?;

        println!("  ✓ Review ({} stars) on {}", rating_value, listing.title);
    }

    println!("\n✨ Seed complete!");
    println!("   Users: demo_host / demo_guest (password: {})", DEMO_PASSWORD);
    println!("   Listings: {}", created.len());

    Ok(())
}

async fn find_or_create_user(username: &str, email: Option<&str>, pool: &PgPool) -> Result<User> {
    if let Some(user) = User::find_by_username(username, pool).await? {
        println!("⊘ User {} already exists", username);
        return Ok(user);
    }

    let password_hash = hash_password(DEMO_PASSWORD)?;
    let user = User::create(username, email, &password_hash, pool)
        .await?
        .context("Username taken by a concurrent seed run")?;

    println!("✓ Created user {}", username);
    Ok(user)
}
