use serde::Deserialize;
use serde::Serialize;

use crate::model::Row;

/// Response of the listing endpoint: the matching rows and their count.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    pub data: Vec<Row>,
    pub total: usize,
}

impl Listing {
    pub fn new(data: Vec<Row>) -> Self {
        let total = data.len();
        Self { data, total }
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
