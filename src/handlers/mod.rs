// handlers/mod.rs - two security tiers
//
// public:    no authentication (/, /health, GET /media/file)
// protected: bearer JWT checked by middleware::jwt_auth_middleware
pub mod protected;
pub mod public;
