//! Concrete [`DataMallApi`](crate::services::datamall_api::DataMallApi) sources.

pub mod datamall;
pub mod snapshot;
