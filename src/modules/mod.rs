pub mod agents;
pub mod meetings;
pub mod users;
