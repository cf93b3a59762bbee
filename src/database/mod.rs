pub mod block_repo;
pub mod candidate_repo;
pub mod city_repo;
pub mod like_repo;
pub mod preference_repo;
pub mod user_repo;
