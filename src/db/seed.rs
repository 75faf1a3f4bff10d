//! Initial data for a fresh database.

use chrono::Utc;
use sqlx::SqlitePool;

struct SeedProject {
    id: &'static str,
    name: &'static str,
    code: &'static str,
    client: &'static str,
    project_type: &'static str,
    order_amount: i64,
    start_date: &'static str,
    end_date: &'static str,
    status: &'static str,
}

struct SeedMember {
    id: &'static str,
    name: &'static str,
    join_date: &'static str,
    position: &'static str,
    skills: &'static [&'static str],
}

struct SeedAssignment {
    id: &'static str,
    project_id: &'static str,
    member_id: &'static str,
    member_name: &'static str,
    role: &'static str,
    start_date: &'static str,
    end_date: &'static str,
    input_ratio: f64,
    /// First and last month carrying `input_ratio` as weight, inclusive
    weighted_months: (u32, u32),
}

const POSITION_LEVELS: &[&str] = &["Junior", "Intermediate", "Senior", "Lead", "Principal"];

const PROJECTS: &[SeedProject] = &[
    SeedProject {
        id: "p1",
        name: "NextGen Banking System",
        code: "NGB-2026",
        client: "K-Bank",
        project_type: "External",
        order_amount: 5_000_000_000,
        start_date: "2026-01-01",
        end_date: "2026-12-31",
        status: "Active",
    },
    SeedProject {
        id: "p2",
        name: "AI Customer Service Bot",
        code: "AIC-2026",
        client: "Retail Corp",
        project_type: "Internal",
        order_amount: 120_000_000,
        start_date: "2026-03-01",
        end_date: "2026-08-31",
        status: "Planning",
    },
    SeedProject {
        id: "p3",
        name: "Internal R&D Framework",
        code: "RND-001",
        client: "In-House",
        project_type: "Other",
        order_amount: 0,
        start_date: "2026-01-01",
        end_date: "2026-12-31",
        status: "Active",
    },
    SeedProject {
        id: "p4",
        name: "Tooling Sandbox",
        code: "RND-002",
        client: "In-House",
        project_type: "Other",
        order_amount: 0,
        start_date: "2026-01-01",
        end_date: "2026-12-31",
        status: "Active",
    },
];

const MEMBERS: &[SeedMember] = &[
    SeedMember {
        id: "m1",
        name: "Kim Min-su",
        join_date: "2026-01-27",
        position: "Senior",
        skills: &["React", "Node", "AWS"],
    },
    SeedMember {
        id: "m2",
        name: "Lee Ji-young",
        join_date: "2026-01-27",
        position: "Lead",
        skills: &["Java", "Spring", "Architecture"],
    },
    SeedMember {
        id: "m3",
        name: "Park Jun-ho",
        join_date: "2026-01-27",
        position: "Senior",
        skills: &["Python", "AI", "TensorFlow"],
    },
    SeedMember {
        id: "m4",
        name: "Choi Su-jin",
        join_date: "2026-01-27",
        position: "Junior",
        skills: &["UI/UX", "Figma", "CSS"],
    },
    SeedMember {
        id: "m5",
        name: "Jung Tae-woo",
        join_date: "2026-01-27",
        position: "Senior",
        skills: &["DevOps", "Docker", "K8s"],
    },
];

const ASSIGNMENTS: &[SeedAssignment] = &[
    SeedAssignment {
        id: "a1",
        project_id: "p1",
        member_id: "m1",
        member_name: "Kim Min-su",
        role: "PM",
        start_date: "2026-01-01",
        end_date: "2026-12-31",
        input_ratio: 1.0,
        weighted_months: (1, 12),
    },
    SeedAssignment {
        id: "a2",
        project_id: "p1",
        member_id: "m2",
        member_name: "Lee Ji-young",
        role: "PL",
        start_date: "2026-01-01",
        end_date: "2026-12-31",
        input_ratio: 1.0,
        weighted_months: (1, 12),
    },
    SeedAssignment {
        id: "a3",
        project_id: "p3",
        member_id: "m5",
        member_name: "Jung Tae-woo",
        role: "TA",
        start_date: "2026-02-01",
        end_date: "2026-11-30",
        input_ratio: 0.5,
        weighted_months: (2, 11),
    },
];

/// Seed the catalog, projects, members and assignments when no project exists yet.
///
/// Runs in a single transaction. Returns whether anything was written.
pub async fn seed_if_empty(pool: &SqlitePool) -> Result<bool, sqlx::Error> {
    let projects: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM projects")
        .fetch_one(pool)
        .await?;
    if projects > 0 {
        tracing::debug!("Database already populated, skipping seed");
        return Ok(false);
    }

    let now = Utc::now().to_rfc3339();
    let mut tx = pool.begin().await?;

    for (sort_order, name) in POSITION_LEVELS.iter().enumerate() {
        sqlx::query("INSERT OR IGNORE INTO position_levels (name, sort_order) VALUES (?, ?)")
            .bind(*name)
            .bind(sort_order as i64)
            .execute(&mut *tx)
            .await?;
    }

    for project in PROJECTS {
        sqlx::query(
            "INSERT INTO projects (id, name, code, client, type, order_amount, start_date, end_date, status) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)"
        )
        .bind(project.id)
        .bind(project.name)
        .bind(project.code)
        .bind(project.client)
        .bind(project.project_type)
        .bind(project.order_amount)
        .bind(project.start_date)
        .bind(project.end_date)
        .bind(project.status)
        .execute(&mut *tx)
        .await?;
    }

    for member in MEMBERS {
        let inserted = sqlx::query(
            "INSERT OR IGNORE INTO members (id, name, position, join_date, note, deleted, updated_at) VALUES (?, ?, ?, ?, '', 0, ?)"
        )
        .bind(member.id)
        .bind(member.name)
        .bind(member.position)
        .bind(member.join_date)
        .bind(&now)
        .execute(&mut *tx)
        .await?;

        // Members created before seeding keep their own skills.
        if inserted.rows_affected() == 0 {
            continue;
        }
        for skill in member.skills {
            sqlx::query("INSERT INTO member_skills (member_id, skill_name) VALUES (?, ?)")
                .bind(member.id)
                .bind(*skill)
                .execute(&mut *tx)
                .await?;
        }
    }

    for assignment in ASSIGNMENTS {
        let (first, last) = assignment.weighted_months;
        let weights: serde_json::Map<String, serde_json::Value> = (first..=last)
            .map(|month| (format!("2026-{month:02}"), assignment.input_ratio.into()))
            .collect();

        sqlx::query(
            "INSERT INTO assignments (id, project_id, member_id, member_name, role, start_date, end_date, input_ratio, monthly_weights) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)"
        )
        .bind(assignment.id)
        .bind(assignment.project_id)
        .bind(assignment.member_id)
        .bind(assignment.member_name)
        .bind(assignment.role)
        .bind(assignment.start_date)
        .bind(assignment.end_date)
        .bind(assignment.input_ratio)
        .bind(serde_json::Value::Object(weights).to_string())
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;

    tracing::info!(
        "Seeded {} projects, {} members, {} assignments",
        PROJECTS.len(),
        MEMBERS.len(),
        ASSIGNMENTS.len()
    );
    Ok(true)
}
