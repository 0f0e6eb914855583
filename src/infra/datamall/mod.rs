mod client;

pub use client::{DEFAULT_BASE_URL, DataMallClient, MAX_TAXI_PAGES, TAXI_PAGE_SIZE};
