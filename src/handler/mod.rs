mod auth_handler;
mod contact_handler;
mod material_handler;
mod stats_handler;
mod system_handler;
mod video_handler;

pub use auth_handler::AuthHandler;
pub use contact_handler::ContactHandler;
pub use material_handler::MaterialHandler;
pub use stats_handler::StatsHandler;
pub use system_handler::SystemHandler;
pub use video_handler::VideoHandler;
