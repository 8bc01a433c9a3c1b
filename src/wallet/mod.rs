//! Account credentials
//!
//! Private keys and seed phrases as the toolchain receives them. Nothing here
//! derives keys or signs; that is the toolchain's job.

pub mod accounts;
pub mod keys;

pub use accounts::{
    Accounts, MnemonicAccounts, DEFAULT_ACCOUNT_COUNT, DEFAULT_HD_PATH, DEFAULT_MNEMONIC,
    MNEMONIC_WORD_COUNTS,
};
pub use keys::{split_private_keys, PrivateKey, Secret, PRIVATE_KEY_LEN};
