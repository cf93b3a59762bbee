pub mod browse_service;
pub mod candidate_service;
pub mod match_service;
pub mod notify_service;
pub mod preference_service;
pub mod result_cache;
pub mod session_service;
