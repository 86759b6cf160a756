mod double_map;
mod key;
mod map;
mod value;

pub use double_map::StorageDoubleMap;
pub use key::StorageKey;
pub use map::StorageMap;
pub use value::StorageValue;
