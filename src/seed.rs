//! Demo data seeding, invoked by the `seed` CLI command. Safe to re-run:
//! existing users are left alone and leads are only created into an empty
//! registry.

use anyhow::{Context, Result};
use sqlx::PgPool;
use tracing::info;

use crate::auth::hash_password;
use crate::database::manager::DatabaseManager;
use crate::database::models::lead::Priority;
use crate::database::models::user::{Role, User};
use crate::database::{leads, locations, users};

struct DemoUser {
    name: &'static str,
    email: &'static str,
    password: &'static str,
    role: Role,
    phone: Option<&'static str>,
    location: Option<(f64, f64)>,
}

const DEMO_USERS: &[DemoUser] = &[
    DemoUser {
        name: "Admin User",
        email: "admin@example.com",
        password: "admin123",
        role: Role::Admin,
        phone: None,
        location: None,
    },
    DemoUser {
        name: "HR Manager",
        email: "hr@example.com",
        password: "hr123456",
        role: Role::Hr,
        phone: None,
        location: None,
    },
    DemoUser {
        name: "CRM Manager",
        email: "crm@example.com",
        password: "crm12345",
        role: Role::Crm,
        phone: None,
        location: None,
    },
    DemoUser {
        name: "Executive Manager",
        email: "executive@example.com",
        password: "exec1234",
        role: Role::Executive,
        phone: None,
        location: None,
    },
    DemoUser {
        name: "Raj Kumar",
        email: "raj.kumar@example.com",
        password: "raj12345",
        role: Role::Salesperson,
        phone: Some("+91 98765 43210"),
        location: Some((28.6139, 77.2090)), // Delhi
    },
    DemoUser {
        name: "Priya Sharma",
        email: "priya.sharma@example.com",
        password: "priya123",
        role: Role::Salesperson,
        phone: Some("+91 98765 43211"),
        location: Some((19.0760, 72.8777)), // Mumbai
    },
    DemoUser {
        name: "Amit Singh",
        email: "amit.singh@example.com",
        password: "amit1234",
        role: Role::Salesperson,
        phone: Some("+91 98765 43212"),
        location: Some((12.9716, 77.5946)), // Bangalore
    },
];

pub async fn run() -> Result<()> {
    let pool = DatabaseManager::pool()
        .await
        .context("database unavailable")?;

    let mut admin_id = None;

    for demo in DEMO_USERS {
        let user = ensure_user(pool, demo).await?;
        if user.role == Role::Admin {
            admin_id = Some(user.id);
        }
        if let Some((lat, lng)) = demo.location {
            locations::upsert(pool, user.id, lat, lng, None).await?;
        }
    }

    let admin_id = admin_id.context("seed produced no admin user")?;

    let (lead_count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM leads")
        .fetch_one(pool)
        .await?;

    if lead_count == 0 {
        seed_leads(pool, admin_id).await?;
        info!("seeded demo leads");
    } else {
        info!(lead_count, "leads already present, skipping lead seed");
    }

    info!("seed complete");
    Ok(())
}

async fn ensure_user(pool: &PgPool, demo: &DemoUser) -> Result<User> {
    if let Some(existing) = users::find_by_email(pool, demo.email).await? {
        info!(email = demo.email, "user already exists, skipping");
        return Ok(existing);
    }

    let user = users::insert(
        pool,
        users::NewUser {
            name: demo.name.to_string(),
            email: demo.email.to_string(),
            password_hash: hash_password(demo.password)?,
            role: demo.role,
            phone: demo.phone.map(str::to_string),
        },
    )
    .await?;

    info!(email = %user.email, role = ?user.role, "created demo user");
    Ok(user)
}

async fn seed_leads(pool: &PgPool, created_by: uuid::Uuid) -> Result<()> {
    let demo_leads = [
        (
            "Sharma Agro Industries",
            "contact@sharmaagro.example.com",
            "+91 11 2345 6789",
            28.7041,
            77.1025,
            Priority::High,
        ),
        (
            "Patel Farm Equipment",
            "sales@patelfarm.example.com",
            "+91 22 2345 6790",
            19.2183,
            72.9781,
            Priority::Medium,
        ),
        (
            "Karnataka Tools Ltd",
            "info@kartools.example.com",
            "+91 80 2345 6791",
            12.9352,
            77.6245,
            Priority::Low,
        ),
    ];

    for (name, email, phone, lat, lng, priority) in demo_leads {
        leads::insert(
            pool,
            leads::NewLead {
                name: name.to_string(),
                contact_email: Some(email.to_string()),
                contact_phone: Some(phone.to_string()),
                address: None,
                latitude: lat,
                longitude: lng,
                priority,
                notes: None,
                created_by,
            },
        )
        .await?;
    }

    Ok(())
}
