pub use crate::codec::TextField;
pub use crate::error::Error;
pub use crate::iter::Iter;
pub use crate::options::{SkipListOptions, MAX_LEVEL_LIMIT};
pub use crate::skiplist::SkipList;

mod codec;
mod error;
mod iter;
mod level;
mod node;
mod options;
mod persist;
mod skiplist;
#[cfg(test)]
mod test_utils;

pub type Result<T> = std::result::Result<T, Error>;

#[macro_export]
macro_rules! ensure {
    ($cond:expr,$err:expr $(,)?) => {
        if !$cond {
            return Err($err);
        }
    };
}
