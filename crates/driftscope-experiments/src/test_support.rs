//! Shared fixtures for unit tests.

use driftscope_ingestion::{BikeRecord, Dataset, DatasetSource, InMemorySource};

/// Two years of 480 hourly records each with matching feature distributions
pub(crate) fn synthetic_dataset() -> Dataset {
    let records = (0..960u32)
        .map(|i| {
            let yr = (i / 480) as u8;
            let phase = (i as f64 * 0.618_033) % 1.0;
            BikeRecord {
                instant: i,
                dteday: format!("201{}-01-{:02}", 1 + yr, 1 + (i % 480) / 24),
                season: 1,
                yr,
                mnth: 1,
                hr: (i % 24) as u8,
                holiday: 0,
                weekday: 0,
                workingday: 1,
                weathersit: 1,
                temp: Some(0.2 + 0.5 * phase),
                atemp: Some(0.2 + 0.5 * phase),
                hum: Some(0.3 + 0.4 * phase),
                windspeed: Some(0.1 + 0.3 * phase),
                cnt: 10 + (i % 24) * 5,
            }
        })
        .collect();

    match InMemorySource::new(records).load() {
        Ok(dataset) => dataset,
        Err(e) => panic!("in-memory source failed: {}", e),
    }
}
