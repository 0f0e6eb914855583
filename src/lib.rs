pub mod crowd;
pub mod fetch;
pub mod infra;
pub mod merge;
pub mod output;
pub mod parser;
pub mod pipeline;
pub mod render;
pub mod services;
pub mod stations;
pub mod summary;
pub mod taxi;
