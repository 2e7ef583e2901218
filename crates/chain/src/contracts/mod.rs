//! Contract bindings for lending protocols.
//!
//! Currently only the AAVE V3 Pool read interface is bound. Other Aave v3
//! forks that keep the `getUserAccountData` layout work unchanged.

pub mod aave_v3;

pub use aave_v3::{
    encode_account_data_call, parse_account, CallRequest, IPool, ACCOUNT_DATA_CALLDATA_LEN,
    GET_USER_ACCOUNT_DATA_SELECTOR,
};
