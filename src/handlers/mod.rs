// handlers/mod.rs - Two-tier handler layout
//
// Public (no auth) → Protected (bearer token required)
pub mod protected; // Tier 2: Bearer token required (/api/v1/profile, /api/v1/notes)
pub mod public; // Tier 1: No authentication required (/, /health, /api/v1/auth/*)
