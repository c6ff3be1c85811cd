pub mod forecast;
pub mod series;
pub mod window;

pub use forecast::*;
pub use series::*;
pub use window::*;
