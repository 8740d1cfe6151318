/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: Health check endpoint
/// - `auth`: Authentication endpoints (register, login, refresh, logout)
/// - `users`: User self-service and admin user management
/// - `kanbans`: Boards, the nested board snapshot, and membership
/// - `columns`: Columns within a board
/// - `cards`: Cards, the reorder batch, labels/assignees on cards
/// - `labels`: Board-scoped labels
/// - `checklist_items`: Per-card checklists
/// - `comments`: Per-card comments
/// - `attachments`: Per-card attachments (multipart upload)
/// - `invitations`: Invitation issue/accept flow

pub mod attachments;
pub mod auth;
pub mod cards;
pub mod checklist_items;
pub mod columns;
pub mod comments;
pub mod health;
pub mod invitations;
pub mod kanbans;
pub mod labels;
pub mod users;
