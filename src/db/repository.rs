use chrono::Utc;
use rand::Rng;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::models::{Chore, ChoreStatus, Group, Member, NewChoreRequest, UpdateChoreRequest};

pub async fn find_group_by_id(db: &SqlitePool, id: &str) -> Result<Option<Group>, sqlx::Error> {
    sqlx::query_as::<_, Group>("SELECT id, name, code, created_at FROM groups WHERE id = ?")
        .bind(id)
        .fetch_optional(db)
        .await
}

pub async fn find_group_by_code(db: &SqlitePool, code: &str) -> Result<Option<Group>, sqlx::Error> {
    sqlx::query_as::<_, Group>("SELECT id, name, code, created_at FROM groups WHERE code = ?")
        .bind(code)
        .fetch_optional(db)
        .await
}

/// Creates a group with a fresh join code and its creator as first member.
pub async fn create_group(
    db: &SqlitePool,
    name: &str,
    creator_name: &str,
) -> Result<(Group, Member), sqlx::Error> {
    let id = Uuid::new_v4().to_string();
    let now = Utc::now().to_rfc3339();

    let code = loop {
        let candidate = generate_code();
        if find_group_by_code(db, &candidate).await?.is_none() {
            break candidate;
        }
    };

    sqlx::query("INSERT INTO groups (id, name, code, created_at) VALUES (?, ?, ?, ?)")
        .bind(&id)
        .bind(name)
        .bind(&code)
        .bind(&now)
        .execute(db)
        .await?;

    let group = Group {
        id,
        name: name.to_string(),
        code,
        created_at: now,
    };
    let creator = insert_member(db, &group.id, creator_name).await?;

    Ok((group, creator))
}

/// Join code format: 3 uppercase letters followed by 6 digits.
fn generate_code() -> String {
    let mut rng = rand::rng();
    let mut code = String::with_capacity(9);
    for _ in 0..3 {
        code.push(rng.random_range('A'..='Z'));
    }
    for _ in 0..6 {
        code.push((b'0' + rng.random_range(0..10u8)) as char);
    }
    code
}

pub async fn fetch_members(db: &SqlitePool, group_id: &str) -> Result<Vec<Member>, sqlx::Error> {
    sqlx::query_as::<_, Member>(
        "SELECT id, group_id, display_name, joined_at FROM members WHERE group_id = ? ORDER BY joined_at, id",
    )
    .bind(group_id)
    .fetch_all(db)
    .await
}

pub async fn find_member_by_id(db: &SqlitePool, id: &str) -> Result<Option<Member>, sqlx::Error> {
    sqlx::query_as::<_, Member>(
        "SELECT id, group_id, display_name, joined_at FROM members WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(db)
    .await
}

pub async fn insert_member(
    db: &SqlitePool,
    group_id: &str,
    display_name: &str,
) -> Result<Member, sqlx::Error> {
    let id = Uuid::new_v4().to_string();
    let now = Utc::now().to_rfc3339();

    sqlx::query("INSERT INTO members (id, group_id, display_name, joined_at) VALUES (?, ?, ?, ?)")
        .bind(&id)
        .bind(group_id)
        .bind(display_name)
        .bind(&now)
        .execute(db)
        .await?;

    Ok(Member {
        id,
        group_id: group_id.to_string(),
        display_name: display_name.to_string(),
        joined_at: now,
    })
}

/// Removing a member leaves their chores behind, unassigned. History is not
/// reattributed to anyone else.
pub async fn delete_member(db: &SqlitePool, id: &str) -> Result<bool, sqlx::Error> {
    let now = Utc::now().to_rfc3339();
    sqlx::query("UPDATE chores SET assigned_to = NULL, updated_at = ? WHERE assigned_to = ?")
        .bind(&now)
        .bind(id)
        .execute(db)
        .await?;

    let result = sqlx::query("DELETE FROM members WHERE id = ?")
        .bind(id)
        .execute(db)
        .await?
        .rows_affected();

    Ok(result > 0)
}

pub async fn fetch_chores(db: &SqlitePool, group_id: &str) -> Result<Vec<Chore>, sqlx::Error> {
    sqlx::query_as::<_, Chore>(
        r#"
        SELECT id, group_id, title, description, assigned_to, due_date, status, created_at, updated_at
        FROM chores
        WHERE group_id = ?
        ORDER BY created_at DESC
        "#,
    )
    .bind(group_id)
    .fetch_all(db)
    .await
}

pub async fn find_chore_by_id(db: &SqlitePool, id: &str) -> Result<Option<Chore>, sqlx::Error> {
    sqlx::query_as::<_, Chore>(
        r#"
        SELECT id, group_id, title, description, assigned_to, due_date, status, created_at, updated_at
        FROM chores
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(db)
    .await
}

pub async fn insert_chore(
    db: &SqlitePool,
    group_id: &str,
    req: NewChoreRequest,
) -> Result<Chore, sqlx::Error> {
    let id = Uuid::new_v4().to_string();
    let now = Utc::now().to_rfc3339();
    let status = ChoreStatus::Pending;

    sqlx::query(
        r#"
        INSERT INTO chores
            (id, group_id, title, description, assigned_to, due_date, status, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(group_id)
    .bind(&req.title)
    .bind(&req.description)
    .bind(&req.assigned_to)
    .bind(&req.due_date)
    .bind(status)
    .bind(&now)
    .bind(&now)
    .execute(db)
    .await?;

    Ok(Chore {
        id,
        group_id: group_id.to_string(),
        title: req.title,
        description: req.description,
        assigned_to: req.assigned_to,
        due_date: req.due_date,
        status,
        created_at: now.clone(),
        updated_at: now,
    })
}

pub async fn update_chore(
    db: &SqlitePool,
    id: &str,
    req: UpdateChoreRequest,
) -> Result<Option<Chore>, sqlx::Error> {
    let mut current = match find_chore_by_id(db, id).await? {
        Some(c) => c,
        None => return Ok(None),
    };

    if let Some(title) = req.title {
        current.title = title;
    }
    if let Some(description) = req.description {
        current.description = Some(description);
    }
    if let Some(due_date) = req.due_date {
        current.due_date = Some(due_date);
    }
    if let Some(assigned_to) = req.assigned_to {
        current.assigned_to = Some(assigned_to);
    }
    current.updated_at = Utc::now().to_rfc3339();

    sqlx::query(
        r#"
        UPDATE chores
        SET title = ?, description = ?, due_date = ?, assigned_to = ?, updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(&current.title)
    .bind(&current.description)
    .bind(&current.due_date)
    .bind(&current.assigned_to)
    .bind(&current.updated_at)
    .bind(id)
    .execute(db)
    .await?;

    Ok(Some(current))
}

pub async fn toggle_chore_status(
    db: &SqlitePool,
    id: &str,
) -> Result<Option<Chore>, sqlx::Error> {
    let mut current = match find_chore_by_id(db, id).await? {
        Some(c) => c,
        None => return Ok(None),
    };

    current.status = current.status.toggled();
    current.updated_at = Utc::now().to_rfc3339();

    sqlx::query("UPDATE chores SET status = ?, updated_at = ? WHERE id = ?")
        .bind(current.status)
        .bind(&current.updated_at)
        .bind(id)
        .execute(db)
        .await?;

    Ok(Some(current))
}

pub async fn delete_chore(db: &SqlitePool, id: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM chores WHERE id = ?")
        .bind(id)
        .execute(db)
        .await?
        .rows_affected();

    Ok(result > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn setup_test_db() -> SqlitePool {
        let pool = SqlitePool::connect("sqlite://:memory:")
            .await
            .expect("Failed to create test db");

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .expect("Failed to run migrations");

        pool
    }

    #[tokio::test]
    async fn test_create_group_with_creator() {
        let pool = setup_test_db().await;

        let (group, creator) = create_group(&pool, "Flat 12", "Alice")
            .await
            .expect("Failed to create group");

        assert_eq!(group.name, "Flat 12");
        assert_eq!(group.code.len(), 9);
        assert!(group.code[..3].chars().all(|c| c.is_ascii_uppercase()));
        assert!(group.code[3..].chars().all(|c| c.is_ascii_digit()));
        assert_eq!(creator.display_name, "Alice");
        assert_eq!(creator.group_id, group.id);

        let members = fetch_members(&pool, &group.id)
            .await
            .expect("Failed to fetch members");
        assert_eq!(members.len(), 1);
        assert_eq!(members[0].id, creator.id);
    }

    #[tokio::test]
    async fn test_join_group_by_code() {
        let pool = setup_test_db().await;

        let (group, _) = create_group(&pool, "Flat 12", "Alice")
            .await
            .expect("Failed to create group");

        let found = find_group_by_code(&pool, &group.code)
            .await
            .expect("Failed to look up code")
            .expect("Group not found by code");
        assert_eq!(found.id, group.id);

        let bob = insert_member(&pool, &found.id, "Bob")
            .await
            .expect("Failed to join group");

        let members = fetch_members(&pool, &group.id)
            .await
            .expect("Failed to fetch members");
        assert_eq!(members.len(), 2);
        assert!(members.iter().any(|m| m.id == bob.id));

        let missing = find_group_by_code(&pool, "ZZZ000000")
            .await
            .expect("Failed to look up code");
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_insert_and_fetch_chore() {
        let pool = setup_test_db().await;

        let (group, alice) = create_group(&pool, "Flat 12", "Alice")
            .await
            .expect("Failed to create group");

        let req = NewChoreRequest {
            title: "Take out the bins".to_string(),
            description: Some("Green bin week".to_string()),
            due_date: Some("2026-08-10".to_string()),
            assigned_to: Some(alice.id.clone()),
            use_fair_assignment: false,
        };
        let chore = insert_chore(&pool, &group.id, req)
            .await
            .expect("Failed to insert chore");

        assert_eq!(chore.title, "Take out the bins");
        assert_eq!(chore.status, ChoreStatus::Pending);
        assert_eq!(chore.assigned_to.as_deref(), Some(alice.id.as_str()));

        let chores = fetch_chores(&pool, &group.id)
            .await
            .expect("Failed to fetch chores");
        assert_eq!(chores.len(), 1);
        assert_eq!(chores[0].id, chore.id);
    }

    #[tokio::test]
    async fn test_update_chore_leaves_status_alone() {
        let pool = setup_test_db().await;

        let (group, alice) = create_group(&pool, "Flat 12", "Alice")
            .await
            .expect("Failed to create group");

        let chore = insert_chore(
            &pool,
            &group.id,
            NewChoreRequest {
                title: "Dishes".to_string(),
                description: None,
                due_date: None,
                assigned_to: None,
                use_fair_assignment: false,
            },
        )
        .await
        .expect("Failed to insert chore");

        let updated = update_chore(
            &pool,
            &chore.id,
            UpdateChoreRequest {
                title: Some("Dishes and counters".to_string()),
                description: None,
                due_date: Some("2026-08-11".to_string()),
                assigned_to: Some(alice.id.clone()),
            },
        )
        .await
        .expect("Failed to update chore")
        .expect("Chore not found");

        assert_eq!(updated.title, "Dishes and counters");
        assert_eq!(updated.due_date.as_deref(), Some("2026-08-11"));
        assert_eq!(updated.assigned_to.as_deref(), Some(alice.id.as_str()));
        assert_eq!(updated.status, ChoreStatus::Pending);
    }

    #[tokio::test]
    async fn test_toggle_chore_status_roundtrip() {
        let pool = setup_test_db().await;

        let (group, _) = create_group(&pool, "Flat 12", "Alice")
            .await
            .expect("Failed to create group");

        let chore = insert_chore(
            &pool,
            &group.id,
            NewChoreRequest {
                title: "Vacuum".to_string(),
                description: None,
                due_date: None,
                assigned_to: None,
                use_fair_assignment: false,
            },
        )
        .await
        .expect("Failed to insert chore");

        let completed = toggle_chore_status(&pool, &chore.id)
            .await
            .expect("Failed to toggle")
            .expect("Chore not found");
        assert_eq!(completed.status, ChoreStatus::Completed);

        let pending_again = toggle_chore_status(&pool, &chore.id)
            .await
            .expect("Failed to toggle")
            .expect("Chore not found");
        assert_eq!(pending_again.status, ChoreStatus::Pending);
    }

    #[tokio::test]
    async fn test_delete_member_unassigns_chores() {
        let pool = setup_test_db().await;

        let (group, alice) = create_group(&pool, "Flat 12", "Alice")
            .await
            .expect("Failed to create group");

        let chore = insert_chore(
            &pool,
            &group.id,
            NewChoreRequest {
                title: "Mop the floor".to_string(),
                description: None,
                due_date: None,
                assigned_to: Some(alice.id.clone()),
                use_fair_assignment: false,
            },
        )
        .await
        .expect("Failed to insert chore");

        let removed = delete_member(&pool, &alice.id)
            .await
            .expect("Failed to delete member");
        assert!(removed);

        let orphaned = find_chore_by_id(&pool, &chore.id)
            .await
            .expect("Failed to fetch chore")
            .expect("Chore disappeared");
        assert!(orphaned.assigned_to.is_none());

        let members = fetch_members(&pool, &group.id)
            .await
            .expect("Failed to fetch members");
        assert!(members.is_empty());
    }

    #[tokio::test]
    async fn test_delete_chore() {
        let pool = setup_test_db().await;

        let (group, _) = create_group(&pool, "Flat 12", "Alice")
            .await
            .expect("Failed to create group");

        let chore = insert_chore(
            &pool,
            &group.id,
            NewChoreRequest {
                title: "Water the plants".to_string(),
                description: None,
                due_date: None,
                assigned_to: None,
                use_fair_assignment: false,
            },
        )
        .await
        .expect("Failed to insert chore");

        assert!(delete_chore(&pool, &chore.id).await.expect("Failed to delete"));
        assert!(!delete_chore(&pool, &chore.id).await.expect("Failed to delete"));

        let chores = fetch_chores(&pool, &group.id)
            .await
            .expect("Failed to fetch chores");
        assert!(chores.is_empty());
    }
}
