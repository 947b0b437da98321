pub mod cycle;
pub mod decimal_ext;
pub mod number;

pub use decimal_ext::DecimalExt;
pub use number::{format_amount, volume_wan_shou, Sign};
