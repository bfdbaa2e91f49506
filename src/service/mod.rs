pub mod invite_service;
pub mod llm_service;
pub mod meeting_time;
pub mod meeting_time_service;
pub mod time_codec;
pub mod time_query_service;
pub mod timezone_names;
pub mod timezone_offset;
