pub mod datamall_api;
