pub mod blocks;
pub mod candidate;
pub mod cities;
pub mod likes;
pub mod user_preferences;
pub mod users;

pub use blocks::BlockRow;
pub use candidate::CandidateProfile;
pub use cities::CityRow;
pub use likes::LikeRow;
pub use user_preferences::UserPreferencesRow;
pub use users::UserRow;
