//! CSV link loader.
//!
//! # CSV format
//!
//! One row per link, in ascending `link_id` order starting at 0:
//!
//! ```csv
//! link_id,freespeed_ms
//! 0,13.89
//! 1,27.78
//! ```

use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use nd_core::LinkId;

use crate::{LinkNetwork, LinkNetworkBuilder, NetworkError, NetworkResult};

#[derive(Deserialize)]
struct LinkRecord {
    link_id:      u32,
    freespeed_ms: f64,
}

/// Load a [`LinkNetwork`] from a CSV file.
pub fn load_links_csv(path: &Path) -> NetworkResult<LinkNetwork> {
    let file = std::fs::File::open(path)?;
    load_links_reader(file)
}

/// Like [`load_links_csv`] but accepts any `Read` source.
pub fn load_links_reader<R: Read>(reader: R) -> NetworkResult<LinkNetwork> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut builder = LinkNetworkBuilder::new();

    for result in csv_reader.deserialize::<LinkRecord>() {
        let row = result.map_err(|e| NetworkError::Parse(e.to_string()))?;

        let expected = LinkId(builder.link_count() as u32);
        let found = LinkId(row.link_id);
        if found != expected {
            return Err(NetworkError::LinkOutOfOrder { expected, found });
        }
        if !row.freespeed_ms.is_finite() || row.freespeed_ms <= 0.0 {
            return Err(NetworkError::InvalidSpeed { link: found, value: row.freespeed_ms });
        }

        builder.add_link(row.freespeed_ms);
    }

    Ok(builder.build())
}
