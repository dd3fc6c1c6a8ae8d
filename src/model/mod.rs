mod contact_model;
mod material_model;
mod stats_model;
mod subject;
mod user_model;
mod video_model;

pub use contact_model::*;
pub use material_model::*;
pub use stats_model::*;
pub use subject::*;
pub use user_model::*;
pub use video_model::*;
