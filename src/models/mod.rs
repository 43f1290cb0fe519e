pub mod record;
pub mod story;
pub mod membership;
pub mod integration;
pub mod activity;

pub use record::*;
pub use story::*;
pub use membership::*;
pub use integration::*;
pub use activity::*;
