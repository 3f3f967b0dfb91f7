//! Authentication and authorization for the `/api` routes.
//!
//! - [`auth`]: the [`authenticate`](auth::authenticate) layer, the
//!   [`Principal`](auth::Principal) it binds, and the extractors handlers use
//! - [`role`]: role and ownership checks
//!
//! # Flow
//!
//! 1. Client sends `Authorization: Bearer <token>`
//! 2. `authenticate` verifies the token, reads the role claim and loads the
//!    account from the matching table
//! 3. The typed `Principal` is stored in the request extensions
//! 4. Handlers take `AuthUser` (any role) or `RequireStudent` /
//!    `RequireProfessor` / `RequireOrganization`
//! 5. Handlers call `ensure_owner` before touching owned rows
//!
//! Steps 1 to 3 answer 401; role and ownership failures answer 403.

pub mod auth;
pub mod role;
