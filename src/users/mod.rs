pub mod models;
pub mod repo;

pub use models::{NewUser, User, UserWrite};
pub use repo::UserRepo;
