pub mod calendar;
pub mod geo;
pub mod invite;
pub mod meeting;
pub mod time_query;
