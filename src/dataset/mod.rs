pub mod loader;
pub mod reference;

pub use loader::{load_labeled, load_labeled_many, load_unlabeled};
pub use reference::reference_wallets;

use crate::models::AddressRecord;

/// Drop entries that cannot be evaluated (blank address). Order is kept.
pub fn well_formed(records: Vec<AddressRecord>) -> Vec<AddressRecord> {
    let total = records.len();
    let kept: Vec<AddressRecord> = records.into_iter().filter(AddressRecord::is_well_formed).collect();

    if kept.len() < total {
        tracing::debug!(
            skipped = total - kept.len(),
            "Dropped dataset entries with an empty address"
        );
    }

    kept
}
