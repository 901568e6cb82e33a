//! Stock components and a sample contract for testing.
//!
//! Available behind the `test-utils` feature flag. These are minimal
//! implementations that prove the dispatch APIs are usable.

mod failing;
mod fixed;
mod pass_through;
mod recording;
mod repeat;

pub use failing::Failing;
pub use fixed::Fixed;
pub use pass_through::PassThrough;
pub use recording::{CallLog, RecordedCall, Recording};
pub use repeat::{RepeatCall, RepeatContract, RepeatFacade, RepeatReply, Repeater};
