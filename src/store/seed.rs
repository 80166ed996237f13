use chrono::{TimeZone, Utc};
use tracing::info;

use super::{ContentStore, MemoryStore, StoreResult};
use crate::auth::Role;
use crate::database::models::{
    Achievement, CategoryDraft, DivisionDraft, JourneyItem, PostDraft, UserDraft, DEFAULT_READ_TIME,
};

pub const DEMO_ADMIN_EMAIL: &str = "admin@example.com";

/// Fill an empty memory store with a small, browsable data set
pub async fn load_demo_content(store: &MemoryStore) -> StoreResult<()> {
    store
        .insert_user(&UserDraft {
            email: DEMO_ADMIN_EMAIL.to_string(),
            name: Some("Site Admin".to_string()),
            role: Role::Admin,
            image: None,
        })
        .await?;

    for (name, slug) in [("News", "news"), ("Press", "press"), ("Engineering", "engineering")] {
        store
            .insert_category(&CategoryDraft { name: name.to_string(), slug: slug.to_string() })
            .await?;
    }

    let divisions = [
        ("Acme Foods", "acme-foods", "Packaged goods and fresh produce", true),
        ("Acme Logistics", "acme-logistics", "Freight and last-mile delivery", true),
        ("Acme Labs", "acme-labs", "Research and product incubation", false),
    ];
    for (name, slug, description, featured) in divisions {
        store
            .insert_division(&DivisionDraft {
                name: name.to_string(),
                slug: slug.to_string(),
                description: Some(description.to_string()),
                logo_url: None,
                website_url: Some(format!("https://{slug}.example.com")),
                featured,
            })
            .await?;
    }

    let posts = [
        ("Welcome to the new site", "welcome", "news", true, Some((2025, 1, 15))),
        ("Quarterly results", "quarterly-results", "press", false, Some((2025, 3, 2))),
        ("How we ship", "how-we-ship", "engineering", false, Some((2025, 4, 20))),
        ("Upcoming launch", "upcoming-launch", "news", false, None),
    ];
    for (title, slug, category, featured, published) in posts {
        store
            .insert_post(&PostDraft {
                title: title.to_string(),
                slug: slug.to_string(),
                excerpt: Some(format!("{title}.")),
                content: format!("# {title}\n\nDemo content."),
                featured,
                category: Some(category.to_string()),
                read_time: DEFAULT_READ_TIME,
                published_at: published.and_then(|(y, m, d)| Utc.with_ymd_and_hms(y, m, d, 9, 0, 0).single()),
            })
            .await?;
    }

    let journey = vec![
        journey_item(1, Some(1998), "Founded", "Started as a two-person workshop."),
        journey_item(2, Some(2008), "Going national", "Opened distribution centres across the country."),
        journey_item(3, Some(2020), "New divisions", "Launched logistics and research arms."),
    ];
    let achievements = vec![
        achievement(1, Some(2015), "Industry award", "Recognised for supply chain innovation."),
        achievement(2, None, "Community partner", "Long-running support for local schools."),
    ];
    store.load_showcase(journey, achievements).await;

    info!("Seeded memory store with demo content");
    Ok(())
}

fn journey_item(display_order: i32, year: Option<i32>, title: &str, description: &str) -> JourneyItem {
    JourneyItem {
        id: 0,
        display_order,
        year,
        title: title.to_string(),
        description: description.to_string(),
        image_url: None,
    }
}

fn achievement(display_order: i32, year: Option<i32>, title: &str, description: &str) -> Achievement {
    Achievement {
        id: 0,
        display_order,
        year,
        title: title.to_string(),
        description: description.to_string(),
        image_url: None,
    }
}
