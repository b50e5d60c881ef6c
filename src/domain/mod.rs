mod expense;
mod ledger;
mod money;
mod month;
mod settlement;

pub use expense::*;
pub use ledger::*;
pub use money::*;
pub use month::*;
pub use settlement::*;
