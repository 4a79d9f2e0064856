pub mod alerts;
pub mod favorites;
pub mod geocoding;
pub mod listings;
pub mod pagination;
pub mod search;
