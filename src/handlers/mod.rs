// handlers/mod.rs - Handler tiers
//
// Public (no auth) → Protected (bearer token resolved to an owner id)
pub mod protected; // /api/* - every route scoped to the authenticated owner
pub mod public;    // /, /health
