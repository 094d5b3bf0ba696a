//! # API Route Modules
//!
//! | Route                      | Module        |
//! |----------------------------|---------------|
//! | `GET /health`              | [`health`]    |
//! | `GET /api/proposals`       | [`proposals`] |
//! | `POST /api/chat`           | [`chat`]      |
//! | `GET /api/request/{id}`    | [`requests`]  |
//! | `POST /api/verify`         | [`verify`]    |
//! | `GET /api/stats`           | [`stats`]     |

pub mod chat;
pub mod health;
pub mod proposals;
pub mod requests;
pub mod stats;
pub mod verify;
