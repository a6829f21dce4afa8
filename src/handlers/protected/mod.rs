// handlers/protected/mod.rs - Protected handlers (bearer token required)
//
// Every handler here receives the caller's AuthUser from jwt_auth_middleware
// and passes its owner id straight into the repository.
pub mod cars;
