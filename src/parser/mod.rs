pub mod html;
pub mod timeline;

pub use timeline::{ExperienceTimelineParser, RawExperienceEntry, Timeline};
