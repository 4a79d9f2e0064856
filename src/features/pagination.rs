use serde::{Deserialize, Serialize};

/// Page window shared by list endpoints. Out-of-band values are clamped
/// rather than rejected here; the search filter validator has its own,
/// stricter contract.
#[derive(Deserialize, Serialize, Clone, Copy, Debug)]
#[serde(default)]
pub struct Pagination {
    pub limit: i64,
    pub offset: i64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            limit: 20,
            offset: 0,
        }
    }
}

impl Pagination {
    pub fn clamped(self) -> Self {
        Self {
            limit: self.limit.clamp(1, 100),
            offset: self.offset.max(0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamps_out_of_band_values() {
        let page = Pagination {
            limit: 500,
            offset: -3,
        }
        .clamped();

        assert_eq!(page.limit, 100);
        assert_eq!(page.offset, 0);

        let page = Pagination {
            limit: 0,
            offset: 10,
        }
        .clamped();
        assert_eq!(page.limit, 1);
        assert_eq!(page.offset, 10);
    }
}
