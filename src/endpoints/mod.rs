pub mod users;

pub use users::fetch_random_user;
