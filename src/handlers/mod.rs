pub mod credential_handlers;
pub mod plan_handlers;
