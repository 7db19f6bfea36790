pub use util::*;

mod util;

solutions![d20];
