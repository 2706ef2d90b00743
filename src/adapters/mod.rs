// Adapters layer: concrete implementations for external systems (storage, CSV rosters, geocoding).

pub mod csv_records;
pub mod geocoder;
pub mod storage;
