/// Integration tests for the Corkboard API
///
/// These tests drive the full router end-to-end against a real database:
/// - Board/column/card CRUD with membership checks
/// - The reorder batch endpoint and ordering invariants
/// - Invitation issue/accept flow (idempotency, single use)
/// - Cascade deletion
/// - User deletion authorization
///
/// Each test is a no-op when `DATABASE_URL` is unset.

mod common;

use axum::http::StatusCode;
use common::{create_test_user, token_for, TestContext};
use corkboard_shared::models::user::UserRole;
use serde_json::json;
use uuid::Uuid;

async fn create_kanban(ctx: &mut TestContext, name: &str) -> Uuid {
    let (status, body) = ctx
        .request(
            "POST",
            "/v1/kanbans",
            Some(&ctx.jwt_token.clone()),
            Some(json!({ "name": name })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "create kanban failed: {}", body);
    body["id"].as_str().unwrap().parse().unwrap()
}

async fn create_column(ctx: &mut TestContext, kanban_id: Uuid, title: &str) -> Uuid {
    let (status, body) = ctx
        .request(
            "POST",
            &format!("/v1/kanbans/{}/columns", kanban_id),
            Some(&ctx.jwt_token.clone()),
            Some(json!({ "title": title })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "create column failed: {}", body);
    body["id"].as_str().unwrap().parse().unwrap()
}

async fn create_card(ctx: &mut TestContext, column_id: Uuid, title: &str) -> Uuid {
    let (status, body) = ctx
        .request(
            "POST",
            &format!("/v1/columns/{}/cards", column_id),
            Some(&ctx.jwt_token.clone()),
            Some(json!({ "title": title })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "create card failed: {}", body);
    body["id"].as_str().unwrap().parse().unwrap()
}

/// Requests without a token are rejected on protected routes
#[tokio::test]
async fn test_protected_routes_require_token() {
    let Some(mut ctx) = TestContext::new().await.unwrap() else {
        return;
    };

    let (status, _) = ctx.request("GET", "/v1/kanbans", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    ctx.cleanup().await.unwrap();
}

/// Dragging "B" above "A" persists positions B=0, A=1 and the column
/// re-fetches in [B, A] order
#[tokio::test]
async fn test_card_reorder_scenario() {
    let Some(mut ctx) = TestContext::new().await.unwrap() else {
        return;
    };

    let kanban_id = create_kanban(&mut ctx, "Sprint 1").await;
    let column_id = create_column(&mut ctx, kanban_id, "Todo").await;
    let card_a = create_card(&mut ctx, column_id, "A").await;
    let card_b = create_card(&mut ctx, column_id, "B").await;

    let token = ctx.jwt_token.clone();
    let (status, body) = ctx
        .request(
            "POST",
            "/v1/cards/reorder",
            Some(&token),
            Some(json!({
                "placements": [
                    { "card_id": card_b, "column_id": column_id, "position": 0 },
                    { "card_id": card_a, "column_id": column_id, "position": 1 }
                ]
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "reorder failed: {}", body);
    assert_eq!(body["updated"], 2);

    // Re-fetch the board: the column returns [B, A] with unique,
    // strictly increasing positions
    let (status, board) = ctx
        .request(
            "GET",
            &format!("/v1/kanbans/{}/board", kanban_id),
            Some(&token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let cards = board["columns"][0]["cards"].as_array().unwrap();
    assert_eq!(cards.len(), 2);
    assert_eq!(cards[0]["id"].as_str().unwrap(), card_b.to_string());
    assert_eq!(cards[1]["id"].as_str().unwrap(), card_a.to_string());
    assert_eq!(cards[0]["position"], 0);
    assert_eq!(cards[1]["position"], 1);

    ctx.cleanup().await.unwrap();
}

/// A batch that puts two cards in the same slot is rejected before any write
#[tokio::test]
async fn test_reorder_rejects_position_collision() {
    let Some(mut ctx) = TestContext::new().await.unwrap() else {
        return;
    };

    let kanban_id = create_kanban(&mut ctx, "Collision").await;
    let column_id = create_column(&mut ctx, kanban_id, "Todo").await;
    let card_a = create_card(&mut ctx, column_id, "A").await;
    let card_b = create_card(&mut ctx, column_id, "B").await;

    let token = ctx.jwt_token.clone();
    let (status, _) = ctx
        .request(
            "POST",
            "/v1/cards/reorder",
            Some(&token),
            Some(json!({
                "placements": [
                    { "card_id": card_a, "column_id": column_id, "position": 0 },
                    { "card_id": card_b, "column_id": column_id, "position": 0 }
                ]
            })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Nothing was applied: original positions survive
    let (_, board) = ctx
        .request(
            "GET",
            &format!("/v1/kanbans/{}/board", kanban_id),
            Some(&token),
            None,
        )
        .await;
    let cards = board["columns"][0]["cards"].as_array().unwrap();
    assert_eq!(cards[0]["id"].as_str().unwrap(), card_a.to_string());
    assert_eq!(cards[1]["id"].as_str().unwrap(), card_b.to_string());

    ctx.cleanup().await.unwrap();
}

/// Issuing a second invitation for the same (email, kanban) while the first
/// is unused returns the same token
#[tokio::test]
async fn test_invitation_issuance_is_idempotent() {
    let Some(mut ctx) = TestContext::new().await.unwrap() else {
        return;
    };

    let kanban_id = create_kanban(&mut ctx, "Invites").await;
    let email = format!("invitee-{}@example.com", Uuid::new_v4());

    let token = ctx.jwt_token.clone();
    let uri = format!("/v1/kanbans/{}/invitations", kanban_id);

    let (status, first) = ctx
        .request("POST", &uri, Some(&token), Some(json!({ "email": email })))
        .await;
    assert_eq!(status, StatusCode::OK, "issue failed: {}", first);
    let first_token = first["token"].as_str().unwrap().to_string();

    let (status, second) = ctx
        .request("POST", &uri, Some(&token), Some(json!({ "email": email })))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(second["token"].as_str().unwrap(), first_token);

    ctx.cleanup().await.unwrap();
}

/// Accepting a token provisions the user and attaches membership; a second
/// acceptance conflicts and an unknown token is not found, neither mutating
/// membership
#[tokio::test]
async fn test_invitation_acceptance_is_single_use() {
    let Some(mut ctx) = TestContext::new().await.unwrap() else {
        return;
    };

    let kanban_id = create_kanban(&mut ctx, "Single Use").await;
    let email = format!("invitee-{}@example.com", Uuid::new_v4());

    let token = ctx.jwt_token.clone();
    let (_, issued) = ctx
        .request(
            "POST",
            &format!("/v1/kanbans/{}/invitations", kanban_id),
            Some(&token),
            Some(json!({ "email": email })),
        )
        .await;
    let invite_token = issued["token"].as_str().unwrap().to_string();

    // First acceptance succeeds and returns a session
    let (status, accepted) = ctx
        .request(
            "POST",
            "/v1/invitations/accept",
            None,
            Some(json!({ "token": invite_token, "password": "Str0ng!Pass" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "accept failed: {}", accepted);
    assert!(accepted["access_token"].as_str().is_some());
    let new_user_id: Uuid = accepted["user_id"].as_str().unwrap().parse().unwrap();

    let member_count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM kanban_members WHERE kanban_id = $1")
            .bind(kanban_id)
            .fetch_one(&ctx.db)
            .await
            .unwrap();

    // Second acceptance of the same token conflicts
    let (status, _) = ctx
        .request(
            "POST",
            "/v1/invitations/accept",
            None,
            Some(json!({ "token": invite_token, "password": "Str0ng!Pass" })),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    // Unknown token is not found
    let (status, _) = ctx
        .request(
            "POST",
            "/v1/invitations/accept",
            None,
            Some(json!({ "token": "cb_0000000000000000000000000000000v", "password": "Str0ng!Pass" })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Neither failed acceptance changed the membership set
    let member_count_after: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM kanban_members WHERE kanban_id = $1")
            .bind(kanban_id)
            .fetch_one(&ctx.db)
            .await
            .unwrap();
    assert_eq!(member_count, member_count_after);

    sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(new_user_id)
        .execute(&ctx.db)
        .await
        .unwrap();
    ctx.cleanup().await.unwrap();
}

/// Deleting a kanban removes its columns, cards, and nested entities
#[tokio::test]
async fn test_kanban_delete_cascades() {
    let Some(mut ctx) = TestContext::new().await.unwrap() else {
        return;
    };

    let kanban_id = create_kanban(&mut ctx, "Doomed").await;
    let column_id = create_column(&mut ctx, kanban_id, "Todo").await;
    let card_id = create_card(&mut ctx, column_id, "A").await;

    let token = ctx.jwt_token.clone();

    let (status, _) = ctx
        .request(
            "POST",
            &format!("/v1/kanbans/{}/labels", kanban_id),
            Some(&token),
            Some(json!({ "name": "bug", "color": "#e53935" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = ctx
        .request(
            "POST",
            &format!("/v1/cards/{}/checklist", card_id),
            Some(&token),
            Some(json!({ "text": "step one" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = ctx
        .request(
            "POST",
            &format!("/v1/cards/{}/comments", card_id),
            Some(&token),
            Some(json!({ "content": "note" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = ctx
        .request(
            "DELETE",
            &format!("/v1/kanbans/{}", kanban_id),
            Some(&token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    for (table, column, id) in [
        ("columns", "kanban_id", kanban_id),
        ("labels", "kanban_id", kanban_id),
        ("cards", "column_id", column_id),
        ("checklist_items", "card_id", card_id),
        ("comments", "card_id", card_id),
    ] {
        let count: i64 = sqlx::query_scalar(&format!(
            "SELECT COUNT(*) FROM {} WHERE {} = $1",
            table, column
        ))
        .bind(id)
        .fetch_one(&ctx.db)
        .await
        .unwrap();
        assert_eq!(count, 0, "{} rows survived the cascade", table);
    }

    ctx.cleanup().await.unwrap();
}

/// A COLLABORATOR cannot delete another user, and nobody can delete themself
#[tokio::test]
async fn test_user_deletion_authorization() {
    let Some(mut ctx) = TestContext::new().await.unwrap() else {
        return;
    };

    let admin = create_test_user(&ctx.db, UserRole::Admin).await.unwrap();
    let admin_token = token_for(&admin);

    // Collaborator deleting someone else: forbidden
    let collaborator_token = ctx.jwt_token.clone();
    let (status, _) = ctx
        .request(
            "DELETE",
            &format!("/v1/users/{}", admin.id),
            Some(&collaborator_token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Self-deletion: bad request, even as admin
    let (status, _) = ctx
        .request(
            "DELETE",
            &format!("/v1/users/{}", admin.id),
            Some(&admin_token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Admin deleting another user succeeds
    let victim = create_test_user(&ctx.db, UserRole::Collaborator)
        .await
        .unwrap();
    let (status, body) = ctx
        .request(
            "DELETE",
            &format!("/v1/users/{}", victim.id),
            Some(&admin_token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK, "admin delete failed: {}", body);
    assert_eq!(body["deleted"], true);

    sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(admin.id)
        .execute(&ctx.db)
        .await
        .unwrap();
    ctx.cleanup().await.unwrap();
}

/// The board snapshot nests checklist items and reports completion percent
#[tokio::test]
async fn test_board_snapshot_checklist_percent() {
    let Some(mut ctx) = TestContext::new().await.unwrap() else {
        return;
    };

    let kanban_id = create_kanban(&mut ctx, "Snapshot").await;
    let column_id = create_column(&mut ctx, kanban_id, "Doing").await;
    let card_id = create_card(&mut ctx, column_id, "Tracked").await;

    let token = ctx.jwt_token.clone();

    let (_, first) = ctx
        .request(
            "POST",
            &format!("/v1/cards/{}/checklist", card_id),
            Some(&token),
            Some(json!({ "text": "done step" })),
        )
        .await;
    let first_item: Uuid = first["id"].as_str().unwrap().parse().unwrap();

    ctx.request(
        "POST",
        &format!("/v1/cards/{}/checklist", card_id),
        Some(&token),
        Some(json!({ "text": "open step" })),
    )
    .await;

    let (status, _) = ctx
        .request(
            "PUT",
            &format!("/v1/checklist-items/{}", first_item),
            Some(&token),
            Some(json!({ "done": true })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, board) = ctx
        .request(
            "GET",
            &format!("/v1/kanbans/{}/board", kanban_id),
            Some(&token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let card = &board["columns"][0]["cards"][0];
    assert_eq!(card["checklist"].as_array().unwrap().len(), 2);
    assert_eq!(card["checklist_percent"], 50);

    ctx.cleanup().await.unwrap();
}
