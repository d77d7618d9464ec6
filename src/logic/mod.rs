pub mod pipeline;
pub mod projection;
pub mod rules;
