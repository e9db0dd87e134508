#![doc = include_str!("../README.md")]
#![warn(missing_docs, unused_imports)]

pub use phcc_he::constants;
pub use phcc_he::cryptosystems;
pub use phcc_ledger as ledger;
pub use phcc_numbertheory;
pub use phcc_traits;
