use axum::Json;
use axum::extract::{Path, State};
use axum::routing::{delete, patch, post};
use axum::{Router, http::StatusCode, routing::get};
use serde::Serialize;

use crate::db::repository;
use crate::error::AppError;
use crate::fairness::{FairnessService, FairnessSnapshot};
use crate::models::*;
use crate::state::AppState;

#[derive(Serialize)]
struct CreateGroupResponse {
    group: Group,
    creator: Member,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/groups", post(create_group))
        .route("/groups/join", post(join_group))
        .route("/groups/{id}", get(get_group))
        .route("/groups/{id}/members", get(list_members).post(add_member))
        .route("/groups/{id}/members/{member_id}", delete(remove_member))
        .route("/groups/{id}/chores", get(list_chores).post(create_chore))
        .route("/chores/{id}", patch(update_chore).delete(delete_chore))
        .route("/chores/{id}/toggle", patch(toggle_chore))
        .route("/groups/{id}/fairness", get(fairness_snapshot))
        .route("/groups/{id}/fairness/assignee", get(fairness_assignee))
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    sqlx::query("select 1").execute(&state.db).await?;
    Ok(StatusCode::OK)
}

async fn create_group(
    State(state): State<AppState>,
    Json(req): Json<NewGroupRequest>,
) -> Result<Json<CreateGroupResponse>, AppError> {
    if req.name.trim().is_empty() {
        return Err(AppError::BadRequest("Group name must not be empty".to_string()));
    }
    if req.creator_name.trim().is_empty() {
        return Err(AppError::BadRequest("Creator name must not be empty".to_string()));
    }

    let (group, creator) = repository::create_group(&state.db, &req.name, &req.creator_name).await?;
    Ok(Json(CreateGroupResponse { group, creator }))
}

async fn join_group(
    State(state): State<AppState>,
    Json(req): Json<JoinGroupRequest>,
) -> Result<Json<Member>, AppError> {
    if req.display_name.trim().is_empty() {
        return Err(AppError::BadRequest("Display name must not be empty".to_string()));
    }

    let group = repository::find_group_by_code(&state.db, &req.code)
        .await?
        .ok_or(AppError::GroupNotFound)?;
    let member = repository::insert_member(&state.db, &group.id, &req.display_name).await?;
    Ok(Json(member))
}

async fn get_group(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Group>, AppError> {
    let group = repository::find_group_by_id(&state.db, &id)
        .await?
        .ok_or(AppError::GroupNotFound)?;
    Ok(Json(group))
}

async fn list_members(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<Member>>, AppError> {
    let members = state.store.load_members(&id).await?;
    Ok(Json(members))
}

async fn add_member(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<NewMemberRequest>,
) -> Result<Json<Member>, AppError> {
    if req.display_name.trim().is_empty() {
        return Err(AppError::BadRequest("Display name must not be empty".to_string()));
    }

    repository::find_group_by_id(&state.db, &id)
        .await?
        .ok_or(AppError::GroupNotFound)?;
    let member = repository::insert_member(&state.db, &id, &req.display_name).await?;
    Ok(Json(member))
}

async fn remove_member(
    State(state): State<AppState>,
    Path((id, member_id)): Path<(String, String)>,
) -> Result<StatusCode, AppError> {
    let member = repository::find_member_by_id(&state.db, &member_id)
        .await?
        .ok_or(AppError::NotFound)?;
    if member.group_id != id {
        return Err(AppError::NotFound);
    }

    repository::delete_member(&state.db, &member_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn list_chores(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<Chore>>, AppError> {
    let chores = state.store.load_chores(&id).await?;
    Ok(Json(chores))
}

async fn create_chore(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(mut req): Json<NewChoreRequest>,
) -> Result<Json<Chore>, AppError> {
    if req.title.trim().is_empty() {
        return Err(AppError::BadRequest("Chore title must not be empty".to_string()));
    }

    repository::find_group_by_id(&state.db, &id)
        .await?
        .ok_or(AppError::GroupNotFound)?;

    match &req.assigned_to {
        Some(member_id) => {
            let member = repository::find_member_by_id(&state.db, member_id)
                .await?
                .ok_or_else(|| AppError::BadRequest("Assignee does not exist".to_string()))?;
            if member.group_id != id {
                return Err(AppError::BadRequest(
                    "Assignee is not a member of this group".to_string(),
                ));
            }
        }
        None if req.use_fair_assignment => {
            // Recommendation comes from the snapshot as it stands before this
            // chore is inserted. A memberless group leaves it unassigned.
            let service = FairnessService::new(state.store.clone());
            match service.recommend_assignee(&id).await {
                Ok(member) => req.assigned_to = Some(member.id),
                Err(AppError::EmptyGroup) => {}
                Err(e) => return Err(e),
            }
        }
        None => {}
    }

    let chore = repository::insert_chore(&state.db, &id, req).await?;
    Ok(Json(chore))
}

async fn update_chore(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateChoreRequest>,
) -> Result<Json<Chore>, AppError> {
    let current = repository::find_chore_by_id(&state.db, &id)
        .await?
        .ok_or(AppError::NotFound)?;

    if let Some(member_id) = &req.assigned_to {
        let member = repository::find_member_by_id(&state.db, member_id)
            .await?
            .ok_or_else(|| AppError::BadRequest("Assignee does not exist".to_string()))?;
        if member.group_id != current.group_id {
            return Err(AppError::BadRequest(
                "Assignee is not a member of this group".to_string(),
            ));
        }
    }

    let chore = repository::update_chore(&state.db, &id, req)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(chore))
}

async fn toggle_chore(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Chore>, AppError> {
    let chore = repository::toggle_chore_status(&state.db, &id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(chore))
}

async fn delete_chore(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let ok = repository::delete_chore(&state.db, &id).await?;
    if ok {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound)
    }
}

async fn fairness_snapshot(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<FairnessSnapshot>, AppError> {
    let service = FairnessService::new(state.store.clone());
    let snapshot = service.snapshot(&id).await?;
    Ok(Json(snapshot))
}

async fn fairness_assignee(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Member>, AppError> {
    let service = FairnessService::new(state.store.clone());
    let member = service.recommend_assignee(&id).await?;
    Ok(Json(member))
}
