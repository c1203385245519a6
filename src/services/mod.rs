pub mod series_service;
pub mod series_service_impl;

pub use series_service::{SeriesError, SeriesService};
pub use series_service_impl::StoreSeriesService;
