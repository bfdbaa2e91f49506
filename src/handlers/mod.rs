pub mod api;
pub mod dto;
pub mod error;
pub mod routes;
pub mod state;
